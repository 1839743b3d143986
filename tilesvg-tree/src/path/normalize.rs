// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use svgtypes::PathSegment;

use crate::PathError;

/// A path command after shorthand and arc expansion.
///
/// `L`, `H`, `V`, `C` and `Z` keep their original absolute or relative
/// form. `M` is always absolute, since a relative move depends on whether
/// the previous subpath was closed. Everything else is turned into absolute
/// `CurveTo`s.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Command {
    MoveTo {
        abs: bool,
        x: f64,
        y: f64,
    },
    LineTo {
        abs: bool,
        x: f64,
        y: f64,
    },
    HorizontalLineTo {
        abs: bool,
        x: f64,
    },
    VerticalLineTo {
        abs: bool,
        y: f64,
    },
    CurveTo {
        abs: bool,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        x: f64,
        y: f64,
    },
    ClosePath,
}

/// Tokenizes `d` and expands `S`, `Q`, `T` and `A` commands into cubic curves.
///
/// Fails on the first invalid command or number.
pub fn normalize(text: &str) -> Result<Vec<Command>, PathError> {
    // Previous MoveTo coordinates.
    let mut prev_mx = 0.0;
    let mut prev_my = 0.0;

    // Previous SmoothQuadratic control point.
    let mut prev_tx = 0.0;
    let mut prev_ty = 0.0;

    // Previous coordinates.
    let mut prev_x = 0.0;
    let mut prev_y = 0.0;

    let mut prev_seg = PathSegment::MoveTo {
        abs: true,
        x: 0.0,
        y: 0.0,
    };
    let mut prev_closed = false;

    let mut commands = Vec::with_capacity(32);

    for segment in svgtypes::PathParser::from(text) {
        let segment = segment.map_err(PathError::InvalidData)?;

        // Absolute end point of the segment.
        let (end_x, end_y) = match segment {
            PathSegment::MoveTo { abs, x, y } => {
                let (x, y) = if abs {
                    (x, y)
                } else if prev_closed {
                    // A relative move after a ClosePath is relative to the subpath start.
                    (x + prev_mx, y + prev_my)
                } else {
                    (x + prev_x, y + prev_y)
                };

                commands.push(Command::MoveTo { abs: true, x, y });
                prev_mx = x;
                prev_my = y;
                prev_seg = segment;
                (x, y)
            }
            PathSegment::LineTo { abs, x, y } => {
                commands.push(Command::LineTo { abs, x, y });
                prev_seg = segment;
                if abs {
                    (x, y)
                } else {
                    (x + prev_x, y + prev_y)
                }
            }
            PathSegment::HorizontalLineTo { abs, x } => {
                commands.push(Command::HorizontalLineTo { abs, x });
                prev_seg = segment;
                (if abs { x } else { x + prev_x }, prev_y)
            }
            PathSegment::VerticalLineTo { abs, y } => {
                commands.push(Command::VerticalLineTo { abs, y });
                prev_seg = segment;
                (prev_x, if abs { y } else { y + prev_y })
            }
            PathSegment::CurveTo {
                abs,
                x1,
                y1,
                x2,
                y2,
                x,
                y,
            } => {
                commands.push(Command::CurveTo {
                    abs,
                    x1,
                    y1,
                    x2,
                    y2,
                    x,
                    y,
                });

                let (dx, dy) = if abs { (0.0, 0.0) } else { (prev_x, prev_y) };
                // Remember as absolute.
                prev_seg = PathSegment::CurveTo {
                    abs: true,
                    x1: x1 + dx,
                    y1: y1 + dy,
                    x2: x2 + dx,
                    y2: y2 + dy,
                    x: x + dx,
                    y: y + dy,
                };
                (x + dx, y + dy)
            }
            PathSegment::SmoothCurveTo {
                abs,
                mut x2,
                mut y2,
                mut x,
                mut y,
            } => {
                // The first control point is the reflection of the previous
                // curve's second one, or the current point otherwise.
                let (x1, y1) = match prev_seg {
                    PathSegment::CurveTo { x2, y2, x, y, .. }
                    | PathSegment::SmoothCurveTo { x2, y2, x, y, .. } => {
                        (x * 2.0 - x2, y * 2.0 - y2)
                    }
                    _ => (prev_x, prev_y),
                };

                if !abs {
                    x2 += prev_x;
                    y2 += prev_y;
                    x += prev_x;
                    y += prev_y;
                }

                commands.push(Command::CurveTo {
                    abs: true,
                    x1,
                    y1,
                    x2,
                    y2,
                    x,
                    y,
                });

                prev_seg = PathSegment::SmoothCurveTo {
                    abs: true,
                    x2,
                    y2,
                    x,
                    y,
                };
                (x, y)
            }
            PathSegment::Quadratic {
                abs,
                mut x1,
                mut y1,
                mut x,
                mut y,
            } => {
                if !abs {
                    x1 += prev_x;
                    y1 += prev_y;
                    x += prev_x;
                    y += prev_y;
                }

                commands.push(quad_to_curve(prev_x, prev_y, x1, y1, x, y));

                prev_seg = PathSegment::Quadratic {
                    abs: true,
                    x1,
                    y1,
                    x,
                    y,
                };
                (x, y)
            }
            PathSegment::SmoothQuadratic { abs, mut x, mut y } => {
                let (x1, y1) = match prev_seg {
                    PathSegment::Quadratic { x1, y1, x, y, .. } => (x * 2.0 - x1, y * 2.0 - y1),
                    PathSegment::SmoothQuadratic { x, y, .. } => {
                        (x * 2.0 - prev_tx, y * 2.0 - prev_ty)
                    }
                    _ => (prev_x, prev_y),
                };

                prev_tx = x1;
                prev_ty = y1;

                if !abs {
                    x += prev_x;
                    y += prev_y;
                }

                commands.push(quad_to_curve(prev_x, prev_y, x1, y1, x, y));

                prev_seg = PathSegment::SmoothQuadratic { abs: true, x, y };
                (x, y)
            }
            PathSegment::EllipticalArc {
                abs,
                rx,
                ry,
                x_axis_rotation,
                large_arc,
                sweep,
                mut x,
                mut y,
            } => {
                if !abs {
                    x += prev_x;
                    y += prev_y;
                }

                let svg_arc = kurbo::SvgArc {
                    from: kurbo::Point::new(prev_x, prev_y),
                    to: kurbo::Point::new(x, y),
                    radii: kurbo::Vec2::new(rx, ry),
                    x_rotation: x_axis_rotation.to_radians(),
                    large_arc,
                    sweep,
                };

                match kurbo::Arc::from_svg_arc(&svg_arc) {
                    Some(arc) => {
                        arc.to_cubic_beziers(0.1, |p1, p2, p| {
                            commands.push(Command::CurveTo {
                                abs: true,
                                x1: p1.x,
                                y1: p1.y,
                                x2: p2.x,
                                y2: p2.y,
                                x: p.x,
                                y: p.y,
                            });
                        });
                    }
                    None => {
                        commands.push(Command::LineTo { abs: true, x, y });
                    }
                }

                prev_seg = segment;
                (x, y)
            }
            PathSegment::ClosePath { .. } => {
                if !prev_closed {
                    commands.push(Command::ClosePath);
                }

                prev_seg = segment;
                // ClosePath moves us to the last MoveTo coordinate.
                (prev_mx, prev_my)
            }
        };

        prev_closed = matches!(segment, PathSegment::ClosePath { .. });
        prev_x = end_x;
        prev_y = end_y;
    }

    Ok(commands)
}

fn quad_to_curve(px: f64, py: f64, x1: f64, y1: f64, x: f64, y: f64) -> Command {
    #[inline]
    fn calc(n1: f64, n2: f64) -> f64 {
        (n1 + n2 * 2.0) / 3.0
    }

    Command::CurveTo {
        abs: true,
        x1: calc(px, x1),
        y1: calc(py, y1),
        x2: calc(x, x1),
        y2: calc(y, y1),
        x,
        y,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_basic_commands() {
        let commands = normalize("M 10 20 l 5 5 H 30 v -5 c 1 1 2 2 3 3 Z").unwrap();
        assert_eq!(
            commands,
            vec![
                Command::MoveTo { abs: true, x: 10.0, y: 20.0 },
                Command::LineTo { abs: false, x: 5.0, y: 5.0 },
                Command::HorizontalLineTo { abs: true, x: 30.0 },
                Command::VerticalLineTo { abs: false, y: -5.0 },
                Command::CurveTo { abs: false, x1: 1.0, y1: 1.0, x2: 2.0, y2: 2.0, x: 3.0, y: 3.0 },
                Command::ClosePath,
            ]
        );
    }

    #[test]
    fn relative_move_after_close() {
        let commands = normalize("M 10 10 L 20 10 Z m 5 5").unwrap();
        assert_eq!(commands[3], Command::MoveTo { abs: true, x: 15.0, y: 15.0 });
    }

    #[test]
    fn relative_move_without_close() {
        let commands = normalize("M 10 10 L 20 10 m 5 5").unwrap();
        assert_eq!(commands[2], Command::MoveTo { abs: true, x: 25.0, y: 15.0 });
    }

    #[test]
    fn quadratic_to_cubic() {
        let commands = normalize("M 0 0 Q 3 3 6 0").unwrap();
        assert_eq!(
            commands[1],
            Command::CurveTo { abs: true, x1: 2.0, y1: 2.0, x2: 4.0, y2: 2.0, x: 6.0, y: 0.0 }
        );
    }

    #[test]
    fn smooth_curve_reflects_previous_handle() {
        let commands = normalize("M 0 0 C 0 1 2 1 2 0 s 2 -1 2 0").unwrap();
        assert_eq!(
            commands[2],
            Command::CurveTo { abs: true, x1: 2.0, y1: -1.0, x2: 4.0, y2: -1.0, x: 4.0, y: 0.0 }
        );
    }

    #[test]
    fn smooth_quadratic_without_previous() {
        let commands = normalize("M 0 0 T 6 0").unwrap();
        assert_eq!(
            commands[1],
            Command::CurveTo { abs: true, x1: 0.0, y1: 0.0, x2: 2.0, y2: 0.0, x: 6.0, y: 0.0 }
        );
    }

    #[test]
    fn arc_to_curves() {
        let commands = normalize("M 0 0 A 5 5 0 0 1 10 0").unwrap();
        assert!(commands.len() > 1);
        for c in &commands[1..] {
            assert!(matches!(c, Command::CurveTo { abs: true, .. }));
        }
        match commands.last() {
            Some(Command::CurveTo { x, y, .. }) => {
                assert!((x - 10.0).abs() < 1e-9);
                assert!(y.abs() < 1e-9);
            }
            _ => panic!("expected a curve"),
        }
    }

    #[test]
    fn zero_radius_arc_is_a_line() {
        let commands = normalize("M 0 0 A 0 0 0 0 1 10 0").unwrap();
        assert_eq!(commands[1], Command::LineTo { abs: true, x: 10.0, y: 0.0 });
    }

    #[test]
    fn invalid_command() {
        assert!(matches!(normalize("M 0 0 X 5 5"), Err(PathError::InvalidData(_))));
    }

    #[test]
    fn sequential_close_paths_collapse() {
        let commands = normalize("M 0 0 L 1 1 Z Z").unwrap();
        assert_eq!(commands.len(), 3);
    }
}

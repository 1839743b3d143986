// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

mod normalize;

use kurbo::ParamCurveExtrema;

use crate::geom::are_mirrors;
use crate::{Matrix, PathError, Rect, Sides, Style, Vector};

pub use self::normalize::{normalize, Command};

/// A vertex handle continuity type.
///
/// Inferred from the handles when a path is parsed.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum VertexKind {
    Point,
    Symmetric,
    Asymmetric,
    Disjoint,
}

impl Default for VertexKind {
    fn default() -> Self {
        VertexKind::Point
    }
}

/// A single point on a path.
#[derive(Clone, Copy, PartialEq, Default, Debug)]
pub struct Vertex {
    /// Absolute position.
    pub point: Vector,

    /// Incoming control point, relative to `point`.
    pub in_handle: Option<Vector>,

    /// Outgoing control point, relative to `point`.
    pub out_handle: Option<Vector>,

    /// Handle continuity.
    pub kind: VertexKind,
}

impl Vertex {
    /// Creates a handle-less vertex.
    #[inline]
    pub fn new(point: Vector) -> Self {
        Vertex {
            point,
            ..Vertex::default()
        }
    }

    /// Returns the absolute incoming control point.
    ///
    /// A missing handle coincides with the point.
    #[inline]
    pub fn abs_in(&self) -> Vector {
        self.point + self.in_handle.unwrap_or_default()
    }

    /// Returns the absolute outgoing control point.
    #[inline]
    pub fn abs_out(&self) -> Vector {
        self.point + self.out_handle.unwrap_or_default()
    }

    fn transformed(&self, m: &Matrix) -> Vertex {
        let point = m.apply(self.point);
        Vertex {
            point,
            in_handle: self.in_handle.map(|h| m.apply(self.point + h) - point),
            out_handle: self.out_handle.map(|h| m.apply(self.point + h) - point),
            kind: self.kind,
        }
    }
}

/// Whether the last vertex of a subpath connects back to the first one.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum OpenOrClosed {
    Open,
    Closed,
}

impl Default for OpenOrClosed {
    fn default() -> Self {
        OpenOrClosed::Open
    }
}

/// A continuous run of vertices.
#[allow(missing_docs)]
#[derive(Clone, PartialEq, Default, Debug)]
pub struct Subpath {
    pub vertices: Vec<Vertex>,
    pub closing: OpenOrClosed,
}

impl Subpath {
    /// Checks that the subpath is closed.
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.closing == OpenOrClosed::Closed
    }
}

/// A path definition.
///
/// `path`, `polygon` and `polyline` elements all end up as one.
#[derive(Clone, PartialEq, Default, Debug)]
pub struct PathDef {
    /// Disjoint subpaths, one per move command.
    pub subpaths: Vec<Subpath>,

    /// Presentation attributes, if any were set.
    pub style: Option<Style>,

    /// Display name.
    pub name: String,
}

impl PathDef {
    /// Parses an SVG `d` attribute.
    ///
    /// Arcs and shorthand curves are expanded into cubic curves first, then
    /// each vertex gets its handles and [`VertexKind`] inferred.
    pub fn from_d(text: &str) -> Result<PathDef, PathError> {
        let mut fold = VertexFold::default();
        for command in normalize(text)? {
            fold.step(command);
        }

        Ok(PathDef {
            subpaths: fold.finish(),
            ..PathDef::default()
        })
    }

    /// Creates a path from a `points` attribute of a `polygon` or `polyline`.
    ///
    /// A trailing unpaired value is ignored.
    pub fn from_points(text: &str, closing: OpenOrClosed) -> Result<PathDef, PathError> {
        let numbers = svgtypes::NumberListParser::from(text)
            .collect::<Result<Vec<f64>, _>>()
            .map_err(PathError::InvalidPoints)?;

        let pairs = numbers.chunks_exact(2);
        if !pairs.remainder().is_empty() {
            log::debug!("Odd number of coordinates in '{}'. The last one is ignored.", text);
        }

        let vertices = pairs
            .map(|pair| Vertex::new(Vector::new(pair[0], pair[1])))
            .collect();

        Ok(PathDef {
            subpaths: vec![Subpath { vertices, closing }],
            ..PathDef::default()
        })
    }

    /// Serializes the path into an absolute `d` string.
    ///
    /// Output uses only `M`, `L`, `C` and `Z` and parses back into the same path.
    pub fn to_d(&self) -> String {
        let mut parts = Vec::new();
        for subpath in &self.subpaths {
            let mut iter = subpath.vertices.iter();
            let mut prev = match iter.next() {
                Some(v) => v,
                None => continue,
            };

            parts.push(format!("M {}", prev.point));
            for v in iter {
                if prev.out_handle.is_none() && v.in_handle.is_none() {
                    parts.push(format!("L {}", v.point));
                } else {
                    parts.push(format!("C {} {} {}", prev.abs_out(), v.abs_in(), v.point));
                }

                prev = v;
            }

            if subpath.is_closed() {
                parts.push("Z".to_string());
            }
        }

        parts.join(" ")
    }

    /// Returns a copy of the path with every vertex transformed by `m`.
    ///
    /// Handles are transformed as absolute points, so a translation moves
    /// the control points together with the vertex.
    pub fn transformed(&self, m: &Matrix) -> PathDef {
        let subpaths = self
            .subpaths
            .iter()
            .map(|sp| Subpath {
                vertices: sp.vertices.iter().map(|v| v.transformed(m)).collect(),
                closing: sp.closing,
            })
            .collect();

        PathDef {
            subpaths,
            style: self.style.clone(),
            name: self.name.clone(),
        }
    }

    /// Returns the total number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.subpaths.iter().map(|sp| sp.vertices.len()).sum()
    }

    /// Calculates the path bounding box.
    ///
    /// Curves are bounded by their extrema, not by their control points.
    /// Returns `None` for a path without vertices.
    pub fn bbox(&self) -> Option<Rect> {
        let mut bbox: Option<Rect> = None;
        let mut add = |r: Rect| {
            bbox = Some(match bbox {
                Some(b) => b.union(&r),
                None => r,
            });
        };

        for subpath in &self.subpaths {
            for pair in subpath.vertices.windows(2) {
                let (v1, v2) = (&pair[0], &pair[1]);
                if v1.out_handle.is_some() || v2.in_handle.is_some() {
                    let curve = kurbo::CubicBez::new(
                        to_point(v1.point),
                        to_point(v1.abs_out()),
                        to_point(v2.abs_in()),
                        to_point(v2.point),
                    );
                    let r = curve.bounding_box();
                    add(Rect::from_sides(Sides {
                        left: r.x0,
                        top: r.y0,
                        right: r.x1,
                        bottom: r.y1,
                    }));
                }
            }

            for v in &subpath.vertices {
                add(Rect::new(v.point.x, v.point.y, 0.0, 0.0));
            }
        }

        bbox
    }
}

fn to_point(v: Vector) -> kurbo::Point {
    kurbo::Point::new(v.x, v.y)
}

/// What follows the vertex being finished.
#[derive(Clone, Copy, PartialEq, Debug)]
enum Next {
    Line,
    Curve,
    End,
}

/// Infers the vertex kind, synthesizing a missing handle where the
/// neighbouring segments allow it.
fn finish_vertex(mut v: Vertex, is_first: bool, next: Next) -> Vertex {
    v.kind = match (v.in_handle, v.out_handle) {
        (Some(h_in), Some(h_out)) => {
            if are_mirrors(h_in, h_out) {
                VertexKind::Symmetric
            } else if let (Some(n_in), Some(n_out)) = (h_in.norm(), h_out.norm()) {
                if are_mirrors(n_in, n_out) {
                    VertexKind::Asymmetric
                } else {
                    VertexKind::Disjoint
                }
            } else {
                VertexKind::Disjoint
            }
        }
        (None, Some(h_out)) => {
            if is_first {
                v.in_handle = Some(h_out.mirror());
                VertexKind::Symmetric
            } else {
                // A line ends here and a curve begins.
                VertexKind::Disjoint
            }
        }
        (Some(h_in), None) => {
            if next == Next::Line {
                VertexKind::Disjoint
            } else {
                v.out_handle = Some(h_in.mirror());
                VertexKind::Symmetric
            }
        }
        (None, None) => VertexKind::Point,
    };

    v
}

/// Path parsing state.
///
/// `pending` is the vertex under construction. It is pushed onto `vertices`
/// only once the following command is known, since the kind depends on it.
#[derive(Default)]
struct VertexFold {
    subpaths: Vec<Subpath>,
    vertices: Vec<Vertex>,
    closing: OpenOrClosed,
    pending: Option<Vertex>,
    start: Vector,
}

impl VertexFold {
    fn step(&mut self, command: Command) {
        match command {
            Command::MoveTo { abs, x, y } => {
                let p = self.resolve(abs, x, y);
                // A move that was not followed by anything is simply replaced.
                if !(self.vertices.is_empty() && self.closing == OpenOrClosed::Open) {
                    self.flush();
                }

                self.pending = Some(Vertex::new(p));
                self.start = p;
            }
            Command::LineTo { abs, x, y } => {
                self.begin_segment();
                let p = self.resolve(abs, x, y);
                self.line_to(p);
            }
            Command::HorizontalLineTo { abs, x } => {
                self.begin_segment();
                let pos = self.position();
                let x = if abs { x } else { pos.x + x };
                self.line_to(Vector::new(x, pos.y));
            }
            Command::VerticalLineTo { abs, y } => {
                self.begin_segment();
                let pos = self.position();
                let y = if abs { y } else { pos.y + y };
                self.line_to(Vector::new(pos.x, y));
            }
            Command::CurveTo {
                abs,
                x1,
                y1,
                x2,
                y2,
                x,
                y,
            } => {
                self.begin_segment();
                let pos = self.position();
                let c1 = self.resolve(abs, x1, y1);
                let c2 = self.resolve(abs, x2, y2);
                let p = self.resolve(abs, x, y);

                if let Some(ref mut v) = self.pending {
                    v.out_handle = Some(c1 - pos);
                }
                self.finish_pending(Next::Curve);

                self.pending = Some(Vertex {
                    point: p,
                    in_handle: Some(c2 - p),
                    ..Vertex::default()
                });
            }
            Command::ClosePath => {
                self.closing = OpenOrClosed::Closed;
            }
        }
    }

    fn finish(mut self) -> Vec<Subpath> {
        self.flush();
        self.subpaths
    }

    fn position(&self) -> Vector {
        match self.pending {
            Some(ref v) if self.closing == OpenOrClosed::Open => v.point,
            _ => self.start,
        }
    }

    fn resolve(&self, abs: bool, x: f64, y: f64) -> Vector {
        let p = Vector::new(x, y);
        if abs {
            p
        } else {
            self.position() + p
        }
    }

    /// Makes sure there is an open subpath to draw into.
    ///
    /// Drawing after a `Z` starts a new subpath at the start of the closed one.
    fn begin_segment(&mut self) {
        if self.closing == OpenOrClosed::Closed {
            self.flush();
            self.pending = Some(Vertex::new(self.start));
        } else if self.pending.is_none() {
            self.pending = Some(Vertex::new(self.start));
        }
    }

    fn line_to(&mut self, p: Vector) {
        self.finish_pending(Next::Line);
        self.pending = Some(Vertex::new(p));
    }

    fn finish_pending(&mut self, next: Next) {
        if let Some(v) = self.pending.take() {
            let is_first = self.vertices.is_empty();
            self.vertices.push(finish_vertex(v, is_first, next));
        }
    }

    fn flush(&mut self) {
        self.finish_pending(Next::End);
        if !self.vertices.is_empty() {
            self.subpaths.push(Subpath {
                vertices: std::mem::take(&mut self.vertices),
                closing: self.closing,
            });
        }
        self.closing = OpenOrClosed::Open;
    }
}

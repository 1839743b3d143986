// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::StyleError;

/// Element attributes, keyed by name.
pub type Attributes = HashMap<String, String>;

/// A paint: a paint server reference, a color, or both.
///
/// A paint with neither is the `none` paint.
#[derive(Clone, PartialEq, Default, Debug)]
pub struct Paint {
    /// Upper-case `#RRGGBB` color.
    ///
    /// When `server` is set too, this is the fallback color.
    pub color: Option<String>,

    /// Referenced paint server id, without the `#`.
    pub server: Option<String>,
}

impl Paint {
    /// Creates a plain color paint.
    pub fn with_color(color: &str) -> Result<Self, StyleError> {
        Ok(Paint {
            color: Some(parse_color(color)?),
            server: None,
        })
    }

    /// Checks that this is the `none` paint.
    pub fn is_none(&self) -> bool {
        self.color.is_none() && self.server.is_none()
    }
}

impl fmt::Display for Paint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match (&self.server, &self.color) {
            (Some(id), Some(color)) => write!(f, "url(#{}) {}", id, color),
            (Some(id), None) => write!(f, "url(#{})", id),
            (None, Some(color)) => write!(f, "{}", color),
            (None, None) => write!(f, "none"),
        }
    }
}

/// Presentation attributes of a styled node.
#[derive(Clone, PartialEq, Default, Debug)]
pub struct Style {
    /// `fill`. `None` when the attribute is missing or empty.
    pub fill: Option<Paint>,
    /// `stroke`. `None` when the attribute is missing or empty.
    pub stroke: Option<Paint>,
    /// `stroke-width`, truncated to an integer.
    pub stroke_width: Option<i32>,
}

impl Style {
    /// Extracts the style from element attributes.
    ///
    /// Returns `None` when none of `fill`, `stroke` and `stroke-width` is
    /// present, which is not the same as an empty style.
    pub fn from_attributes(attrs: &Attributes) -> Result<Option<Style>, StyleError> {
        let fill = attrs.get("fill");
        let stroke = attrs.get("stroke");
        let stroke_width = attrs.get("stroke-width");
        if fill.is_none() && stroke.is_none() && stroke_width.is_none() {
            return Ok(None);
        }

        let mut style = Style::default();
        if let Some(value) = fill {
            style.fill = parse_paint(value)?;
        }

        if let Some(value) = stroke {
            style.stroke = parse_paint(value)?;
        }

        if let Some(value) = stroke_width {
            style.stroke_width = parse_stroke_width(value);
        }

        Ok(Some(style))
    }

    /// Converts the style back into presentation attributes.
    pub fn to_attributes(&self) -> Vec<(&'static str, String)> {
        let mut attrs = Vec::new();
        if let Some(ref paint) = self.fill {
            attrs.push(("fill", paint.to_string()));
        }

        if let Some(ref paint) = self.stroke {
            attrs.push(("stroke", paint.to_string()));
        }

        if let Some(width) = self.stroke_width {
            attrs.push(("stroke-width", width.to_string()));
        }

        attrs
    }
}

/// Parses a color and normalizes it into an upper-case `#RRGGBB` string.
///
/// The alpha channel is dropped.
pub fn parse_color(text: &str) -> Result<String, StyleError> {
    let c = svgtypes::Color::from_str(text.trim())
        .map_err(|_| StyleError::InvalidColor(text.to_string()))?;
    Ok(format!("#{:02X}{:02X}{:02X}", c.red, c.green, c.blue))
}

/// Parses a `fill` or `stroke` value.
///
/// `url(#id) color` keeps both parts. An empty value is no paint at all.
pub fn parse_paint(text: &str) -> Result<Option<Paint>, StyleError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }

    let paint = match svgtypes::Paint::from_str(text) {
        Ok(svgtypes::Paint::None) => Paint::default(),
        Ok(svgtypes::Paint::Color(c)) => Paint {
            color: Some(format!("#{:02X}{:02X}{:02X}", c.red, c.green, c.blue)),
            server: None,
        },
        Ok(svgtypes::Paint::FuncIRI(link, fallback)) => {
            let color = match fallback {
                Some(svgtypes::PaintFallback::Color(c)) => {
                    Some(format!("#{:02X}{:02X}{:02X}", c.red, c.green, c.blue))
                }
                _ => None,
            };

            Paint {
                color,
                server: Some(link.to_string()),
            }
        }
        Ok(_) => {
            log::warn!("Paint '{}' is not supported. Ignored.", text);
            return Ok(None);
        }
        Err(_) => {
            return if text.starts_with("url(") {
                Err(StyleError::NotALocalReference(text.to_string()))
            } else {
                Err(StyleError::InvalidPaint(text.to_string()))
            };
        }
    };

    Ok(Some(paint))
}

fn parse_stroke_width(text: &str) -> Option<i32> {
    match svgtypes::Length::from_str(text) {
        Ok(len) if len.number.is_finite() => Some(len.number.trunc() as i32),
        _ => {
            log::warn!("Invalid stroke-width '{}'. Ignored.", text);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(pairs: &[(&str, &str)]) -> Attributes {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn colors() {
        assert_eq!(parse_color("#fff").unwrap(), "#FFFFFF");
        assert_eq!(parse_color("red").unwrap(), "#FF0000");
        assert_eq!(parse_color("rgb(0, 128, 255)").unwrap(), "#0080FF");
        assert!(matches!(parse_color("nope"), Err(StyleError::InvalidColor(_))));
    }

    #[test]
    fn color_paint() {
        let paint = parse_paint("#ff0000").unwrap().unwrap();
        assert_eq!(paint.color.as_deref(), Some("#FF0000"));
        assert!(paint.server.is_none());
    }

    #[test]
    fn url_paint_with_fallback() {
        let paint = parse_paint("url(#grad1) blue").unwrap().unwrap();
        assert_eq!(paint.server.as_deref(), Some("grad1"));
        assert_eq!(paint.color.as_deref(), Some("#0000FF"));
        assert_eq!(paint.to_string(), "url(#grad1) #0000FF");
    }

    #[test]
    fn url_paint() {
        let paint = parse_paint("url(#grad1)").unwrap().unwrap();
        assert_eq!(paint.server.as_deref(), Some("grad1"));
        assert!(paint.color.is_none());
    }

    #[test]
    fn none_and_empty_paint() {
        let paint = parse_paint("none").unwrap().unwrap();
        assert!(paint.is_none());
        assert_eq!(paint.to_string(), "none");
        assert!(parse_paint("").unwrap().is_none());
    }

    #[test]
    fn non_local_reference() {
        assert!(matches!(
            parse_paint("url(other.svg#grad)"),
            Err(StyleError::NotALocalReference(_))
        ));
        assert!(matches!(parse_paint("blah"), Err(StyleError::InvalidPaint(_))));
    }

    #[test]
    fn no_style() {
        let style = Style::from_attributes(&attrs(&[("id", "a"), ("d", "M 0 0")])).unwrap();
        assert!(style.is_none());
    }

    #[test]
    fn full_style() {
        let style = Style::from_attributes(&attrs(&[
            ("fill", "#fff"),
            ("stroke", "url(#g) black"),
            ("stroke-width", "2.7"),
        ]))
        .unwrap()
        .unwrap();

        assert_eq!(style.fill, Some(Paint::with_color("white").unwrap()));
        let stroke = style.stroke.as_ref().unwrap();
        assert_eq!(stroke.server.as_deref(), Some("g"));
        assert_eq!(stroke.color.as_deref(), Some("#000000"));
        assert_eq!(style.stroke_width, Some(2));

        assert_eq!(
            style.to_attributes(),
            vec![
                ("fill", "#FFFFFF".to_string()),
                ("stroke", "url(#g) #000000".to_string()),
                ("stroke-width", "2".to_string()),
            ]
        );
    }

    #[test]
    fn invalid_stroke_width_is_ignored() {
        let style = Style::from_attributes(&attrs(&[("stroke-width", "wide")]))
            .unwrap()
            .unwrap();
        assert_eq!(style, Style::default());
    }

    #[test]
    fn invalid_fill_fails() {
        assert!(Style::from_attributes(&attrs(&[("fill", "#zzz")])).is_err());
    }
}

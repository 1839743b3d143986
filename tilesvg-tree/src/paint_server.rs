// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::fmt;
use std::str::FromStr;

use crate::style::{parse_color, Attributes};
use crate::{StyleError, Vector};

/// A paint server coordinate system.
///
/// `gradientUnits` attribute in the SVG.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Units {
    UserSpaceOnUse,
    ObjectBoundingBox,
}

impl Default for Units {
    fn default() -> Self {
        Units::UserSpaceOnUse
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Units::UserSpaceOnUse => write!(f, "userSpaceOnUse"),
            Units::ObjectBoundingBox => write!(f, "objectBoundingBox"),
        }
    }
}

/// A spread method.
///
/// `spreadMethod` attribute in the SVG.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SpreadMethod {
    Pad,
    Reflect,
    Repeat,
}

impl Default for SpreadMethod {
    fn default() -> Self {
        SpreadMethod::Pad
    }
}

impl fmt::Display for SpreadMethod {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SpreadMethod::Pad => write!(f, "pad"),
            SpreadMethod::Reflect => write!(f, "reflect"),
            SpreadMethod::Repeat => write!(f, "repeat"),
        }
    }
}

/// A gradient stop.
///
/// `stop` element in SVG.
#[derive(Clone, PartialEq, Debug)]
pub struct Stop {
    /// Gradient stop offset.
    ///
    /// `offset` in SVG, clamped to `0..=1`.
    pub offset: f64,

    /// Upper-case `#RRGGBB` color.
    ///
    /// `stop-color` in SVG.
    pub color: String,

    /// Gradient stop opacity.
    ///
    /// `stop-opacity` in SVG.
    pub opacity: f64,
}

impl Stop {
    /// Parses a `stop` element attributes.
    pub fn from_attributes(attrs: &Attributes) -> Result<Stop, StyleError> {
        let offset = number_or_percent(attrs, "offset").unwrap_or(0.0);
        let color = match attrs.get("stop-color") {
            Some(value) => parse_color(value)?,
            None => "#000000".to_string(),
        };
        let opacity = number_or_percent(attrs, "stop-opacity").unwrap_or(1.0);

        Ok(Stop {
            offset: offset.clamp(0.0, 1.0),
            color,
            opacity: opacity.clamp(0.0, 1.0),
        })
    }
}

/// A linear gradient.
///
/// `linearGradient` element in SVG.
#[allow(missing_docs)]
#[derive(Clone, PartialEq, Debug)]
pub struct LinearGradient {
    /// Element's ID.
    ///
    /// Taken from the SVG itself. Can be empty.
    pub id: String,
    pub units: Units,
    pub spread_method: SpreadMethod,
    /// `x1` and `y1`.
    pub point1: Vector,
    /// `x2` and `y2`.
    pub point2: Vector,
    pub stops: Vec<Stop>,
}

impl LinearGradient {
    /// Parses a `linearGradient` element attributes. Stops are added later.
    pub fn from_attributes(attrs: &Attributes) -> LinearGradient {
        LinearGradient {
            id: attrs.get("id").cloned().unwrap_or_default(),
            units: parse_units(attrs),
            spread_method: parse_spread_method(attrs),
            point1: Vector::new(
                number_or_percent(attrs, "x1").unwrap_or(0.0),
                number_or_percent(attrs, "y1").unwrap_or(0.0),
            ),
            point2: Vector::new(
                number_or_percent(attrs, "x2").unwrap_or(1.0),
                number_or_percent(attrs, "y2").unwrap_or(0.0),
            ),
            stops: Vec::new(),
        }
    }
}

/// A radial gradient.
///
/// `radialGradient` element in SVG.
#[allow(missing_docs)]
#[derive(Clone, PartialEq, Debug)]
pub struct RadialGradient {
    /// Element's ID.
    ///
    /// Taken from the SVG itself. Can be empty.
    pub id: String,
    pub units: Units,
    pub spread_method: SpreadMethod,
    /// `fx` and `fy`.
    pub from_center: Vector,
    /// `fr`.
    pub from_radius: f64,
    /// `cx` and `cy`.
    pub to_center: Vector,
    /// `r`.
    pub to_radius: f64,
    pub stops: Vec<Stop>,
}

impl RadialGradient {
    /// Parses a `radialGradient` element attributes. Stops are added later.
    ///
    /// The focal point defaults to the center.
    pub fn from_attributes(attrs: &Attributes) -> RadialGradient {
        let cx = number_or_percent(attrs, "cx").unwrap_or(0.5);
        let cy = number_or_percent(attrs, "cy").unwrap_or(0.5);
        RadialGradient {
            id: attrs.get("id").cloned().unwrap_or_default(),
            units: parse_units(attrs),
            spread_method: parse_spread_method(attrs),
            from_center: Vector::new(
                number_or_percent(attrs, "fx").unwrap_or(cx),
                number_or_percent(attrs, "fy").unwrap_or(cy),
            ),
            from_radius: number_or_percent(attrs, "fr").unwrap_or(0.0),
            to_center: Vector::new(cx, cy),
            to_radius: number_or_percent(attrs, "r").unwrap_or(0.5),
            stops: Vec::new(),
        }
    }
}

/// A paint server.
#[allow(missing_docs)]
#[derive(Clone, PartialEq, Debug)]
pub enum PaintServer {
    Linear(LinearGradient),
    Radial(RadialGradient),
}

impl PaintServer {
    /// Returns the document id.
    pub fn id(&self) -> &str {
        match self {
            PaintServer::Linear(ref lg) => &lg.id,
            PaintServer::Radial(ref rg) => &rg.id,
        }
    }

    /// Returns `"linear"` or `"radial"`.
    pub fn type_name(&self) -> &'static str {
        match self {
            PaintServer::Linear(_) => "linear",
            PaintServer::Radial(_) => "radial",
        }
    }

    /// Returns the gradient units.
    pub fn units(&self) -> Units {
        match self {
            PaintServer::Linear(ref lg) => lg.units,
            PaintServer::Radial(ref rg) => rg.units,
        }
    }

    /// Returns the spread method.
    pub fn spread_method(&self) -> SpreadMethod {
        match self {
            PaintServer::Linear(ref lg) => lg.spread_method,
            PaintServer::Radial(ref rg) => rg.spread_method,
        }
    }

    /// Returns stops in document order.
    pub fn stops(&self) -> &[Stop] {
        match self {
            PaintServer::Linear(ref lg) => &lg.stops,
            PaintServer::Radial(ref rg) => &rg.stops,
        }
    }

    /// Appends a stop.
    pub fn push_stop(&mut self, stop: Stop) {
        match self {
            PaintServer::Linear(ref mut lg) => lg.stops.push(stop),
            PaintServer::Radial(ref mut rg) => rg.stops.push(stop),
        }
    }
}

fn number_or_percent(attrs: &Attributes, name: &str) -> Option<f64> {
    let value = attrs.get(name)?;
    match svgtypes::Length::from_str(value) {
        Ok(svgtypes::Length {
            number,
            unit: svgtypes::LengthUnit::Percent,
        }) => Some(number / 100.0),
        Ok(svgtypes::Length {
            number,
            unit: svgtypes::LengthUnit::None,
        }) => Some(number),
        _ => {
            log::warn!("Invalid '{}' value: '{}'. Using the default one.", name, value);
            None
        }
    }
}

fn parse_units(attrs: &Attributes) -> Units {
    match attrs.get("gradientUnits").map(String::as_str) {
        None | Some("userSpaceOnUse") => Units::UserSpaceOnUse,
        Some("objectBoundingBox") => Units::ObjectBoundingBox,
        Some(value) => {
            log::warn!("Unknown gradientUnits '{}'. Using the default one.", value);
            Units::default()
        }
    }
}

fn parse_spread_method(attrs: &Attributes) -> SpreadMethod {
    match attrs.get("spreadMethod").map(String::as_str) {
        None | Some("pad") => SpreadMethod::Pad,
        Some("reflect") => SpreadMethod::Reflect,
        Some("repeat") => SpreadMethod::Repeat,
        Some(value) => {
            log::warn!("Unknown spreadMethod '{}'. Using the default one.", value);
            SpreadMethod::default()
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
    fn linear_defaults() {
        let lg = LinearGradient::from_attributes(&attrs(&[("id", "lg1")]));
        assert_eq!(lg.id, "lg1");
        assert_eq!(lg.units, Units::UserSpaceOnUse);
        assert_eq!(lg.spread_method, SpreadMethod::Pad);
        assert_eq!(lg.point1, Vector::new(0.0, 0.0));
        assert_eq!(lg.point2, Vector::new(1.0, 0.0));
    }

    #[test]
    fn linear_attributes() {
        let lg = LinearGradient::from_attributes(&attrs(&[
            ("x1", "10"),
            ("y1", "20%"),
            ("x2", "50%"),
            ("y2", "40"),
            ("gradientUnits", "objectBoundingBox"),
            ("spreadMethod", "reflect"),
        ]));
        assert_eq!(lg.point1, Vector::new(10.0, 0.2));
        assert_eq!(lg.point2, Vector::new(0.5, 40.0));
        assert_eq!(lg.units, Units::ObjectBoundingBox);
        assert_eq!(lg.spread_method, SpreadMethod::Reflect);
    }

    #[test]
    fn unknown_keywords_fall_back() {
        let lg = LinearGradient::from_attributes(&attrs(&[
            ("gradientUnits", "meters"),
            ("spreadMethod", "wrap"),
            ("x2", "far"),
        ]));
        assert_eq!(lg.units, Units::UserSpaceOnUse);
        assert_eq!(lg.spread_method, SpreadMethod::Pad);
        assert_eq!(lg.point2, Vector::new(1.0, 0.0));
    }

    #[test]
    fn radial_focus_defaults_to_center() {
        let rg = RadialGradient::from_attributes(&attrs(&[("cx", "10"), ("cy", "20"), ("r", "5")]));
        assert_eq!(rg.to_center, Vector::new(10.0, 20.0));
        assert_eq!(rg.from_center, Vector::new(10.0, 20.0));
        assert_eq!(rg.to_radius, 5.0);
        assert_eq!(rg.from_radius, 0.0);

        let rg = RadialGradient::from_attributes(&attrs(&[("fx", "1"), ("fr", "2")]));
        assert_eq!(rg.to_center, Vector::new(0.5, 0.5));
        assert_eq!(rg.from_center, Vector::new(1.0, 0.5));
        assert_eq!(rg.from_radius, 2.0);
    }

    #[test]
    fn stops() {
        let stop = Stop::from_attributes(&attrs(&[("offset", "50%"), ("stop-color", "#f00")])).unwrap();
        assert_eq!(stop.offset, 0.5);
        assert_eq!(stop.color, "#FF0000");
        assert_eq!(stop.opacity, 1.0);

        let stop = Stop::from_attributes(&attrs(&[("offset", "1.5"), ("stop-opacity", "0.25")])).unwrap();
        assert_eq!(stop.offset, 1.0);
        assert_eq!(stop.color, "#000000");
        assert_eq!(stop.opacity, 0.25);

        assert!(Stop::from_attributes(&attrs(&[("stop-color", "nope")])).is_err());
    }

    #[test]
    fn paint_server_accessors() {
        let mut ps = PaintServer::Linear(LinearGradient::from_attributes(&attrs(&[("id", "a")])));
        ps.push_stop(Stop::from_attributes(&attrs(&[])).unwrap());
        assert_eq!(ps.id(), "a");
        assert_eq!(ps.type_name(), "linear");
        assert_eq!(ps.stops().len(), 1);
    }
}

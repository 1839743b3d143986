// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::str::FromStr;

use svgtypes::Length;
use tilesvg_tree::{Attributes, PathDef};

use crate::Error;

/// Converts a basic shape into path data.
///
/// Returns `None` for shapes with an invalid size, which are not rendered.
pub(crate) fn convert(name: &str, attrs: &Attributes) -> Result<Option<PathDef>, Error> {
    let d = match name {
        "rect" => convert_rect(attrs),
        "circle" => convert_circle(attrs),
        "ellipse" => convert_ellipse(attrs),
        "line" => Some(convert_line(attrs)),
        _ => None,
    };

    match d {
        Some(d) => Ok(Some(PathDef::from_d(&d)?)),
        None => Ok(None),
    }
}

fn convert_rect(attrs: &Attributes) -> Option<String> {
    // 'width' and 'height' attributes must be positive and non-zero.
    let width = number(attrs, "width");
    let height = number(attrs, "height");
    if !(width > 0.0) {
        log::warn!("Rect '{}' has an invalid 'width' value. Skipped.", element_id(attrs));
        return None;
    }
    if !(height > 0.0) {
        log::warn!("Rect '{}' has an invalid 'height' value. Skipped.", element_id(attrs));
        return None;
    }

    let x = number(attrs, "x");
    let y = number(attrs, "y");

    let (mut rx, mut ry) = resolve_rx_ry(attrs);

    // Clamp rx/ry to the half of the width/height.
    if rx > width / 2.0 {
        rx = width / 2.0;
    }
    if ry > height / 2.0 {
        ry = height / 2.0;
    }

    let d = if rx == 0.0 || ry == 0.0 {
        format!(
            "M {} {} H {} V {} H {} Z",
            x,
            y,
            x + width,
            y + height,
            x
        )
    } else {
        format!(
            "M {} {} H {} A {rx} {ry} 0 0 1 {} {} V {} A {rx} {ry} 0 0 1 {} {} \
             H {} A {rx} {ry} 0 0 1 {} {} V {} A {rx} {ry} 0 0 1 {} {} Z",
            x + rx,
            y,
            x + width - rx,
            x + width,
            y + ry,
            y + height - ry,
            x + width - rx,
            y + height,
            x + rx,
            x,
            y + height - ry,
            y + ry,
            x + rx,
            y,
            rx = rx,
            ry = ry,
        )
    };

    Some(d)
}

fn resolve_rx_ry(attrs: &Attributes) -> (f64, f64) {
    // Remove negative values first.
    let rx = optional_number(attrs, "rx").filter(|v| !v.is_sign_negative());
    let ry = optional_number(attrs, "ry").filter(|v| !v.is_sign_negative());

    match (rx, ry) {
        (None, None) => (0.0, 0.0),
        (Some(rx), None) => (rx, rx),
        (None, Some(ry)) => (ry, ry),
        (Some(rx), Some(ry)) => (rx, ry),
    }
}

fn convert_line(attrs: &Attributes) -> String {
    format!(
        "M {} {} L {} {}",
        number(attrs, "x1"),
        number(attrs, "y1"),
        number(attrs, "x2"),
        number(attrs, "y2")
    )
}

fn convert_circle(attrs: &Attributes) -> Option<String> {
    let cx = number(attrs, "cx");
    let cy = number(attrs, "cy");
    let r = number(attrs, "r");

    if !(r > 0.0) {
        log::warn!("Circle '{}' has an invalid 'r' value. Skipped.", element_id(attrs));
        return None;
    }

    Some(ellipse_to_d(cx, cy, r, r))
}

fn convert_ellipse(attrs: &Attributes) -> Option<String> {
    let cx = number(attrs, "cx");
    let cy = number(attrs, "cy");
    let (rx, ry) = resolve_rx_ry(attrs);

    if !(rx > 0.0) {
        log::warn!("Ellipse '{}' has an invalid 'rx' value. Skipped.", element_id(attrs));
        return None;
    }

    if !(ry > 0.0) {
        log::warn!("Ellipse '{}' has an invalid 'ry' value. Skipped.", element_id(attrs));
        return None;
    }

    Some(ellipse_to_d(cx, cy, rx, ry))
}

fn ellipse_to_d(cx: f64, cy: f64, rx: f64, ry: f64) -> String {
    format!(
        "M {} {} A {rx} {ry} 0 0 1 {} {} A {rx} {ry} 0 0 1 {} {} \
         A {rx} {ry} 0 0 1 {} {} A {rx} {ry} 0 0 1 {} {} Z",
        cx + rx,
        cy,
        cx,
        cy + ry,
        cx - rx,
        cy,
        cx,
        cy - ry,
        cx + rx,
        cy,
        rx = rx,
        ry = ry,
    )
}

fn element_id(attrs: &Attributes) -> &str {
    attrs.get("id").map(String::as_str).unwrap_or_default()
}

fn number(attrs: &Attributes, name: &str) -> f64 {
    optional_number(attrs, name).unwrap_or(0.0)
}

/// Parses a unitless or `px` length. Other units are not supported
/// without a viewport and are ignored.
pub(crate) fn optional_number(attrs: &Attributes, name: &str) -> Option<f64> {
    let value = attrs.get(name)?;
    match Length::from_str(value) {
        Ok(Length {
            number,
            unit: svgtypes::LengthUnit::None | svgtypes::LengthUnit::Px,
        }) => Some(number),
        _ => {
            log::warn!("Unsupported '{}' value: '{}'. Ignored.", name, value);
            None
        }
    }
}

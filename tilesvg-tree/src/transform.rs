// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::fmt;

use crate::{Matrix, TransformError};

/// A single entry of an SVG `transform` attribute.
///
/// Angles are in degrees.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Transform {
    Matrix(Matrix),
    Translate {
        x: f64,
        y: f64,
    },
    /// `y` is `None` for the one-argument form, which scales uniformly.
    Scale {
        x: f64,
        y: Option<f64>,
    },
    /// `pivot` is `None` for the one-argument form, which rotates around the origin.
    Rotate {
        a: f64,
        pivot: Option<(f64, f64)>,
    },
    SkewX { a: f64 },
    SkewY { a: f64 },
}

/// An ordered list of transforms, composed left to right.
pub type TransformList = Vec<Transform>;

impl Transform {
    /// Converts the transform into an equivalent matrix.
    pub fn to_matrix(&self) -> Matrix {
        match *self {
            Transform::Matrix(m) => m,
            Transform::Translate { x, y } => Matrix::new_translate(x, y),
            Transform::Scale { x, y } => Matrix::new_scale(x, y.unwrap_or(x)),
            Transform::Rotate { a, pivot } => {
                let (x, y) = pivot.unwrap_or((0.0, 0.0));
                let (sin, cos) = a.to_radians().sin_cos();
                Matrix::new(
                    cos,
                    sin,
                    -sin,
                    cos,
                    -x * cos + y * sin + x,
                    -x * sin - y * cos + y,
                )
            }
            Transform::SkewX { a } => Matrix::new_skew_x(a),
            Transform::SkewY { a } => Matrix::new_skew_y(a),
        }
    }
}

impl From<Matrix> for Transform {
    fn from(m: Matrix) -> Self {
        Transform::Matrix(m)
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Transform::Matrix(m) => write!(
                f,
                "matrix({} {} {} {} {} {})",
                m.a, m.b, m.c, m.d, m.tx, m.ty
            ),
            Transform::Translate { x, y } => write!(f, "translate({} {})", x, y),
            Transform::Scale { x, y: None } => write!(f, "scale({})", x),
            Transform::Scale { x, y: Some(y) } => write!(f, "scale({} {})", x, y),
            Transform::Rotate { a, pivot: None } => write!(f, "rotate({})", a),
            Transform::Rotate {
                a,
                pivot: Some((x, y)),
            } => write!(f, "rotate({} {} {})", a, x, y),
            Transform::SkewX { a } => write!(f, "skewX({})", a),
            Transform::SkewY { a } => write!(f, "skewY({})", a),
        }
    }
}

/// Composes a transform list into a single matrix.
///
/// An empty list yields the identity.
pub fn transforms_to_matrix(list: &[Transform]) -> Matrix {
    list.iter()
        .fold(Matrix::identity(), |m, t| m.multiply(&t.to_matrix()))
}

/// Serializes a transform list into the canonical attribute form.
///
/// Entries are separated by a single space and parsing the result
/// with [`parse_transforms`] reproduces the list.
pub fn transforms_to_string(list: &[Transform]) -> String {
    list.iter()
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parses an SVG `transform` attribute value.
///
/// Any malformed entry fails the whole list.
pub fn parse_transforms(text: &str) -> Result<TransformList, TransformError> {
    let mut list = TransformList::new();

    let mut entries = text.split(')').peekable();
    while let Some(entry) = entries.next() {
        let entry = entry.trim_matches(is_separator);
        if entry.is_empty() {
            continue;
        }

        // Every entry but the trailing remainder was terminated by a ')'.
        if entries.peek().is_none() {
            return Err(TransformError::MissingParenthesis(entry.to_string()));
        }

        let (name, args) = entry
            .split_once('(')
            .ok_or_else(|| TransformError::MissingParenthesis(entry.to_string()))?;
        let name = name.trim();
        let args = parse_numbers(args)?;
        list.push(make_transform(name, &args)?);
    }

    Ok(list)
}

fn is_separator(c: char) -> bool {
    c.is_ascii_whitespace() || c == ','
}

fn parse_numbers(text: &str) -> Result<Vec<f64>, TransformError> {
    svgtypes::NumberListParser::from(text)
        .collect::<Result<Vec<f64>, _>>()
        .map_err(|_| TransformError::InvalidNumber(text.to_string()))
}

fn make_transform(name: &str, args: &[f64]) -> Result<Transform, TransformError> {
    let arity_error = |expected| TransformError::InvalidArity {
        name: name.to_string(),
        expected,
        actual: args.len(),
    };

    let ts = match name {
        "matrix" => match *args {
            [a, b, c, d, tx, ty] => Transform::Matrix(Matrix::new(a, b, c, d, tx, ty)),
            _ => return Err(arity_error("6")),
        },
        "translate" => match *args {
            [x, y] => Transform::Translate { x, y },
            _ => return Err(arity_error("2")),
        },
        "scale" => match *args {
            [x] => Transform::Scale { x, y: None },
            [x, y] => Transform::Scale { x, y: Some(y) },
            _ => return Err(arity_error("1 or 2")),
        },
        "rotate" => match *args {
            [a] => Transform::Rotate { a, pivot: None },
            [a, x, y] => Transform::Rotate {
                a,
                pivot: Some((x, y)),
            },
            _ => return Err(arity_error("1 or 3")),
        },
        "skewX" => match *args {
            [a] => Transform::SkewX { a },
            _ => return Err(arity_error("1")),
        },
        "skewY" => match *args {
            [a] => Transform::SkewY { a },
            _ => return Err(arity_error("1")),
        },
        _ => return Err(TransformError::UnknownFunction(name.to_string())),
    };

    Ok(ts)
}

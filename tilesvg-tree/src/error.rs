// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::fmt;

/// A `transform` attribute parsing error.
#[derive(Debug)]
pub enum TransformError {
    /// A transform entry has no `(` or its argument list is not closed.
    MissingParenthesis(String),

    /// The function name is not one of `matrix`, `translate`, `scale`,
    /// `rotate`, `skewX` or `skewY`.
    UnknownFunction(String),

    /// An argument is not a number.
    InvalidNumber(String),

    /// A function got the wrong number of arguments.
    InvalidArity {
        /// The function name.
        name: String,
        /// The accepted argument counts.
        expected: &'static str,
        /// The number of parsed arguments.
        actual: usize,
    },
}

impl fmt::Display for TransformError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            TransformError::MissingParenthesis(ref entry) => {
                write!(f, "transform '{}' is missing a parenthesis", entry)
            }
            TransformError::UnknownFunction(ref name) => {
                write!(f, "unknown transform function '{}'", name)
            }
            TransformError::InvalidNumber(ref args) => {
                write!(f, "transform arguments '{}' are not a number list", args)
            }
            TransformError::InvalidArity {
                ref name,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "'{}' expects {} arguments, not {}",
                    name, expected, actual
                )
            }
        }
    }
}

impl std::error::Error for TransformError {}

/// A path data parsing error.
#[derive(Debug)]
pub enum PathError {
    /// The `d` attribute contains an invalid command or number.
    InvalidData(svgtypes::Error),

    /// The `points` attribute contains a non-numeric value.
    InvalidPoints(svgtypes::Error),
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            PathError::InvalidData(ref e) => {
                write!(f, "path data parsing failed cause {}", e)
            }
            PathError::InvalidPoints(ref e) => {
                write!(f, "points parsing failed cause {}", e)
            }
        }
    }
}

impl std::error::Error for PathError {}

/// A presentation attribute parsing error.
#[derive(Debug)]
pub enum StyleError {
    /// The value is not a color.
    InvalidColor(String),

    /// The value is not a paint.
    InvalidPaint(String),

    /// A paint references something other than a `#`-prefixed local id.
    NotALocalReference(String),
}

impl fmt::Display for StyleError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            StyleError::InvalidColor(ref s) => write!(f, "'{}' is not a color", s),
            StyleError::InvalidPaint(ref s) => write!(f, "'{}' is not a paint", s),
            StyleError::NotALocalReference(ref s) => {
                write!(f, "'{}' is not a #-prefixed reference", s)
            }
        }
    }
}

impl std::error::Error for StyleError {}

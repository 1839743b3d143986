// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
`tilesvg-parser` imports [SVG] documents into a `tilesvg-tree` project.

The document is streamed element by element. Every `svg` element becomes a tile,
`g` a group, shapes become paths with their transforms baked in, and `use`
elements stay symbolic references to other nodes.

[SVG]: https://en.wikipedia.org/wiki/Scalable_Vector_Graphics
*/

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![warn(missing_copy_implementations)]
#![allow(clippy::collapsible_else_if)]
#![allow(clippy::neg_cmp_op_on_partial_ord)]
#![allow(clippy::needless_update)]

pub mod events;
mod options;
mod parser;
mod shapes;

pub use crate::options::*;
pub use crate::parser::SvgParser;
pub use roxmltree;
pub use tilesvg_tree;

use tilesvg_tree::{ModelType, Node, PathError, Project, StyleError, TransformError};

/// List of all errors.
#[derive(Debug)]
pub enum Error {
    /// Only UTF-8 content are supported.
    NotAnUtf8Str,

    /// Compressed SVG must use the GZip algorithm.
    MalformedGZip,

    /// The document has more XML nodes than `Options::nodes_limit`.
    ElementsLimitReached,

    /// Failed to parse an XML data.
    ParsingFailed(roxmltree::Error),

    /// A required attribute is not set.
    MissingAttribute {
        /// Element name.
        element: &'static str,
        /// Attribute name.
        attribute: &'static str,
    },

    /// `viewBox` must consist of exactly four numbers.
    InvalidViewBox(String),

    /// An element has no enclosing tile or group.
    EmptyStack(ModelType),

    /// A `stop` outside of a gradient.
    OrphanStop,

    /// The document has no `svg` element.
    NoRootElement,

    /// An invalid `transform` attribute.
    InvalidTransform(TransformError),

    /// An invalid `d` or `points` attribute.
    InvalidPath(PathError),

    /// An invalid color or paint.
    InvalidStyle(StyleError),
}

impl From<roxmltree::Error> for Error {
    fn from(e: roxmltree::Error) -> Self {
        Error::ParsingFailed(e)
    }
}

impl From<TransformError> for Error {
    fn from(e: TransformError) -> Self {
        Error::InvalidTransform(e)
    }
}

impl From<PathError> for Error {
    fn from(e: PathError) -> Self {
        Error::InvalidPath(e)
    }
}

impl From<StyleError> for Error {
    fn from(e: StyleError) -> Self {
        Error::InvalidStyle(e)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            Error::NotAnUtf8Str => {
                write!(f, "provided data has not an UTF-8 encoding")
            }
            Error::MalformedGZip => {
                write!(f, "provided data has a malformed GZip content")
            }
            Error::ElementsLimitReached => {
                write!(f, "the maximum number of XML nodes has been reached")
            }
            Error::ParsingFailed(ref e) => {
                write!(f, "SVG data parsing failed cause {}", e)
            }
            Error::MissingAttribute { element, attribute } => {
                write!(f, "'{}' element requires the '{}' attribute", element, attribute)
            }
            Error::InvalidViewBox(ref text) => {
                write!(f, "'{}' is not a valid viewBox", text)
            }
            Error::EmptyStack(kind) => {
                write!(f, "{} is not inside a tile or a group", kind)
            }
            Error::OrphanStop => {
                write!(f, "stop is not inside a gradient")
            }
            Error::NoRootElement => {
                write!(f, "the document has no svg element")
            }
            Error::InvalidTransform(ref e) => {
                write!(f, "invalid transform: {}", e)
            }
            Error::InvalidPath(ref e) => {
                write!(f, "invalid path: {}", e)
            }
            Error::InvalidStyle(ref e) => {
                write!(f, "invalid style: {}", e)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self {
            Error::ParsingFailed(ref e) => Some(e),
            Error::InvalidTransform(ref e) => Some(e),
            Error::InvalidPath(ref e) => Some(e),
            Error::InvalidStyle(ref e) => Some(e),
            _ => None,
        }
    }
}

/// A trait to import tiles into a `Project` from various sources.
pub trait TileLoading {
    /// Imports a tile from an SVG data.
    ///
    /// Can contain an SVG string or a gzip compressed data.
    fn load_tile_data(&mut self, data: &[u8], opt: &Options) -> Result<Node, Error>;

    /// Imports a tile from an SVG string.
    fn load_tile(&mut self, text: &str, opt: &Options) -> Result<Node, Error>;
}

impl TileLoading for Project {
    fn load_tile_data(&mut self, data: &[u8], opt: &Options) -> Result<Node, Error> {
        if data.starts_with(&[0x1f, 0x8b]) {
            let data = decompress_svgz(data)?;
            let text = std::str::from_utf8(&data).map_err(|_| Error::NotAnUtf8Str)?;
            self.load_tile(text, opt)
        } else {
            let text = std::str::from_utf8(data).map_err(|_| Error::NotAnUtf8Str)?;
            self.load_tile(text, opt)
        }
    }

    fn load_tile(&mut self, text: &str, opt: &Options) -> Result<Node, Error> {
        SvgParser::new(text, opt).to_tile(self)
    }
}

/// Decompresses an SVGZ file.
pub fn decompress_svgz(data: &[u8]) -> Result<Vec<u8>, Error> {
    use std::io::Read;

    let mut decoder = flate2::read::GzDecoder::new(data);
    let mut decoded = Vec::with_capacity(data.len() * 2);
    decoder
        .read_to_end(&mut decoded)
        .map_err(|_| Error::MalformedGZip)?;
    Ok(decoded)
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/// Import options.
#[derive(Clone, Debug)]
pub struct Options {
    /// Allow DTD in the document.
    ///
    /// Entities declared in a DTD are expanded by the XML parser.
    ///
    /// Default: true
    pub allow_dtd: bool,

    /// The maximum number of XML nodes in a document.
    ///
    /// Larger documents fail with [`Error::ElementsLimitReached`](crate::Error::ElementsLimitReached).
    ///
    /// Default: 1_000_000
    pub nodes_limit: u32,

    /// Use `title` elements as tile names.
    ///
    /// Only a `title` placed directly inside an `svg` element is used.
    ///
    /// Default: true
    pub use_titles: bool,
}

impl Default for Options {
    fn default() -> Options {
        Options {
            allow_dtd: true,
            nodes_limit: 1_000_000,
            use_titles: true,
        }
    }
}

impl Options {
    pub(crate) fn to_xml_options(&self) -> roxmltree::ParsingOptions {
        roxmltree::ParsingOptions {
            allow_dtd: self.allow_dtd,
            nodes_limit: self.nodes_limit,
            ..Default::default()
        }
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use tilesvg_tree::Attributes;

pub(crate) const SVG_NS: &str = "http://www.w3.org/2000/svg";
pub(crate) const XLINK_NS: &str = "http://www.w3.org/1999/xlink";

/// A receiver of document events, in document order.
pub trait SaxHandler {
    /// The error that aborts the stream.
    type Error;

    /// An element was opened.
    fn open_tag(&mut self, name: &str, attrs: &Attributes) -> Result<(), Self::Error>;

    /// An element was closed. Always paired with `open_tag`.
    fn close_tag(&mut self, name: &str) -> Result<(), Self::Error>;

    /// A text or CDATA node, whitespace included.
    fn text(&mut self, text: &str) -> Result<(), Self::Error>;
}

/// Feeds a parsed document to `handler`.
///
/// SVG elements are reported by their local name, other elements as
/// `{namespace}name`. Attributes are keyed by their local name, except
/// for XLink attributes, which get the `xlink:` prefix.
///
/// Stops at the first handler error.
pub fn stream<H: SaxHandler>(doc: &roxmltree::Document, handler: &mut H) -> Result<(), H::Error> {
    stream_children(doc.root(), handler)
}

fn stream_children<H: SaxHandler>(parent: roxmltree::Node, handler: &mut H) -> Result<(), H::Error> {
    for node in parent.children() {
        if node.is_element() {
            let name = tag_name(node);
            handler.open_tag(&name, &collect_attributes(node))?;
            stream_children(node, handler)?;
            handler.close_tag(&name)?;
        } else if node.is_text() {
            if let Some(text) = node.text() {
                handler.text(text)?;
            }
        }
    }

    Ok(())
}

fn tag_name(node: roxmltree::Node) -> String {
    let name = node.tag_name();
    match name.namespace() {
        None | Some(SVG_NS) => name.name().to_string(),
        Some(ns) => format!("{{{}}}{}", ns, name.name()),
    }
}

fn collect_attributes(node: roxmltree::Node) -> Attributes {
    let mut attrs = Attributes::new();
    for attr in node.attributes() {
        let key = match attr.namespace() {
            None => attr.name().to_string(),
            Some(XLINK_NS) => format!("xlink:{}", attr.name()),
            Some(ns) => format!("{{{}}}{}", ns, attr.name()),
        };

        attrs.insert(key, attr.value().to_string());
    }

    attrs
}

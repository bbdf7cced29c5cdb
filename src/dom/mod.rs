//! Mutable document tree and HTML parsing/serialization.
//!
//! Parsing goes through html5ever's lenient tree builder into an arena DOM.
//! Leniency is load-bearing: Google Docs export HTML is not conformant and
//! must be recovered the way a browser would recover it.

mod arena;
mod serialize;
mod tree_sink;

pub use arena::{ArenaDom, Attribute, NodeData, NodeId, attr_name, html_name};
pub use serialize::{inner_html, to_html};
pub use tree_sink::ArenaSink;

use html5ever::ParseOpts;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use html5ever::tree_builder::TreeBuilderOpts;

/// Parse an HTML document into an arena DOM.
pub fn parse_html(html: &str) -> ArenaDom {
    let opts = ParseOpts {
        tree_builder: TreeBuilderOpts {
            drop_doctype: false,
            ..Default::default()
        },
        ..Default::default()
    };

    parse_document(ArenaSink::new(), opts)
        .from_utf8()
        .one(html.as_bytes())
        .into_dom()
}

/// Parse a fragment of HTML (not a full document).
///
/// The fragment is wrapped in a minimal document so the tree builder runs in
/// body context; the returned DOM's `<body>` holds the fragment's nodes.
pub fn parse_fragment(html: &str) -> ArenaDom {
    let wrapped = format!("<!DOCTYPE html><html><head></head><body>{html}</body></html>");
    parse_html(&wrapped)
}

/// Find the `<body>` element of a parsed document.
pub fn body(dom: &ArenaDom) -> Option<NodeId> {
    dom.elements_by_tag(dom.document(), "body").first().copied()
}

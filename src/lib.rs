//! # doc2md
//!
//! Convert exported Google Docs HTML into clean Markdown suitable for
//! pasting into a CMS.
//!
//! Google Docs exports carry no semantic tags: bold, italic, and code are
//! all `<span>` elements whose meaning is defined by class rules in an
//! embedded stylesheet. The [`clean`] module interprets that stylesheet and
//! rewrites the document tree into semantic HTML; the [`convert`] module
//! hands the cleaned tree to pandoc for Markdown rendering.
//!
//! ## Quick Start
//!
//! ```no_run
//! let html = std::fs::read_to_string("exported.html").unwrap();
//! let cleaned = doc2md::clean_html(&html).unwrap();
//! doc2md::convert::html_to_markdown(&cleaned, "out.md".as_ref()).unwrap();
//! ```
//!
//! To inspect the normalized HTML without converting, use [`clean_html`]
//! directly (the CLI exposes this as `--no-pandoc`).

pub mod clean;
pub mod convert;
pub mod css;
pub mod dom;
mod error;

pub use clean::clean_document;
pub use error::{Error, Result};

/// Parse an exported document, run the normalization pipeline, and return
/// the cleaned HTML.
pub fn clean_html(html: &str) -> Result<String> {
    let mut dom = dom::parse_html(html);
    clean::clean_document(&mut dom)?;
    Ok(dom::to_html(&dom))
}

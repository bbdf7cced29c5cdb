//! HTML normalization pipeline.
//!
//! Google Docs export HTML is a flat soup of presentation-only markup:
//! every piece of formatting is a `<span>` whose meaning lives in an
//! embedded stylesheet. These passes statically interpret that stylesheet
//! and perform structural surgery to recover semantic markup.
//!
//! ## Pipeline Order
//!
//! Passes mutate one shared tree in place and must run in this order;
//! later passes depend on invariants established by earlier ones:
//!
//! 1. **Tables** - flatten single-cell tables
//! 2. **Building blocks** - sentinel-delimited code ranges become `<pre>`
//! 3. **Code** - code-font spans become `<pre>`/`<code>`
//! 4. **Styles** - bold/italic spans become `<b>`/`<i>`
//! 5. **Links** - unwrap Google's redirect URLs
//! 6. **Attrs** - strip `id`/`class`/`style` everywhere
//! 7. **Lang** - mark Python-looking `<pre>` blocks
//! 8. **Backticks** - `` `x` `` in prose becomes `<code>x</code>`
//! 9. **Sweep** - unwrap leftover spans, drop empty paragraphs

mod attrs;
mod backticks;
mod building_blocks;
mod code;
mod lang;
mod links;
mod styles;
mod sweep;
mod tables;

pub use attrs::strip_attributes;
pub use backticks::convert_backticks;
pub use building_blocks::extract_building_blocks;
pub use code::consolidate_code;
pub use lang::tag_code_languages;
pub use links::rewrite_redirect_links;
pub use styles::replace_style_spans;
pub use sweep::remove_spans_and_empty_paragraphs;
pub use tables::flatten_single_cell_tables;

use log::info;

use crate::dom::ArenaDom;
use crate::error::Result;

/// Run the full normalization pipeline on a document, in place.
///
/// On success the tree carries no `id`/`class`/`style` attributes (beyond
/// the language hint), no spans, and no empty paragraphs; recognized code
/// is `<pre>`/`<code>` and redirect links point at their real targets.
///
/// Only the link pass can fail; a failure aborts the run, since passes
/// have ordering dependencies and partially-normalized output is worse
/// than none.
pub fn clean_document(dom: &mut ArenaDom) -> Result<()> {
    info!("flattening single-cell tables");
    flatten_single_cell_tables(dom);
    info!("extracting code building blocks");
    extract_building_blocks(dom);
    info!("consolidating code spans and blocks");
    consolidate_code(dom);
    info!("replacing style spans with <b> and <i>");
    replace_style_spans(dom);
    info!("rewriting redirect links");
    rewrite_redirect_links(dom)?;
    info!("stripping id/class/style attributes");
    strip_attributes(dom);
    info!("tagging code block languages");
    tag_code_languages(dom);
    info!("converting backticks to <code>");
    convert_backticks(dom);
    info!("removing leftover spans and empty paragraphs");
    remove_spans_and_empty_paragraphs(dom);
    Ok(())
}

//! Pass 6: Attribute Stripping

use crate::dom::ArenaDom;

/// Remove `id`, `class`, and inline `style` attributes from every element.
///
/// Ids and classes leak into the converted Markdown as attribute blocks;
/// none of them survive pasting into a CMS anyway. Total and idempotent.
pub fn strip_attributes(dom: &mut ArenaDom) {
    for id in dom.descendants(dom.document()) {
        if dom.is_element(id) {
            dom.remove_attr(id, "id");
            dom.remove_attr(id, "class");
            dom.remove_attr(id, "style");
        }
    }
}

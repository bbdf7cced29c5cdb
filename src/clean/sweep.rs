//! Pass 9: Final Sweep
//!
//! By this point spans are purely structural carriers: everything semantic
//! has been re-tagged or hoisted. Unwrap whatever spans remain, then drop
//! paragraphs left with no content. Must run last; earlier passes still
//! rely on span boundaries.

use crate::dom::{ArenaDom, NodeId};

/// Unwrap all remaining spans and remove paragraphs that end up empty.
pub fn remove_spans_and_empty_paragraphs(dom: &mut ArenaDom) {
    for span in dom.elements_by_tag(dom.document(), "span") {
        if dom.is_attached(span) {
            dom.unwrap(span);
        }
    }

    let empty_paras: Vec<NodeId> = dom
        .elements_by_tag(dom.document(), "p")
        .into_iter()
        .filter(|&p| dom.children(p).next().is_none())
        .collect();
    for para in empty_paras {
        dom.detach(para);
    }
}

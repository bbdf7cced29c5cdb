//! Pass 4: Style-Span Reclassification

use crate::css::StyleClasses;
use crate::dom::ArenaDom;

/// Re-tag spans whose class encodes bold or italic formatting.
///
/// Bold runs first; a span whose class qualifies for both axes is re-tagged
/// `<b>` and is no longer a span when the italic sweep re-queries, so bold
/// wins deterministically.
pub fn replace_style_spans(dom: &mut ArenaDom) {
    let classes = StyleClasses::from_document(dom);

    for (set, tag) in [(&classes.bold, "b"), (&classes.italic, "i")] {
        let spans: Vec<_> = dom
            .elements_by_tag(dom.document(), "span")
            .into_iter()
            .filter(|&span| dom.element_classes(span).iter().any(|c| set.contains(c)))
            .collect();
        for span in spans {
            dom.retag(span, tag);
        }
    }
}

//! Pass 7: Language-Hint Tagging

use crate::dom::ArenaDom;

/// Mark `<pre>` blocks that look like Python with `class="python"`.
///
/// The downstream renderer turns the class into a fenced code block info
/// string. Deliberately narrow: only Python is detected, only by two
/// substrings.
pub fn tag_code_languages(dom: &mut ArenaDom) {
    for pre in dom.elements_by_tag(dom.document(), "pre") {
        let code = dom.text_content(pre);
        if code.contains("import ") || code.contains("def ") {
            dom.set_attr(pre, "class", "python");
        }
    }
}

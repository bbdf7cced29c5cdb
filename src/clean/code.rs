//! Pass 3: Code-Block/Span Consolidation
//!
//! Spans whose class carries a fixed-width font become real code markup.
//! A span that is the sole child of a paragraph-like container is one line
//! of a code *block*; consecutive lines merge into a single `<pre>`. A span
//! sitting inline among other content becomes (or merges into) a `<code>`.
//!
//! Adjacency is structural: lines only merge while nothing but whitespace
//! interrupts the sibling chain.

use crate::css::StyleClasses;
use crate::dom::{ArenaDom, NodeId};

/// Containers whose sole-child code span counts as a code block line.
fn is_line_container(dom: &ArenaDom, id: NodeId) -> bool {
    dom.element_name(id)
        .is_some_and(|name| matches!(name.as_ref(), "p" | "div" | "td"))
}

/// Promote code-class spans into `<pre>` blocks and `<code>` spans.
pub fn consolidate_code(dom: &mut ArenaDom) {
    let classes = StyleClasses::from_document(dom);

    let spans: Vec<NodeId> = dom
        .elements_by_tag(dom.document(), "span")
        .into_iter()
        .filter(|&span| classes.has_code_class(dom, span))
        .collect();

    for span in spans {
        if !dom.is_attached(span) {
            continue;
        }
        let Some(parent) = dom.get(span).map(|n| n.parent) else {
            continue;
        };
        if !is_line_container(dom, parent) {
            continue;
        }

        if dom.children(parent).count() == 1 {
            promote_block_line(dom, parent);
        } else {
            promote_inline(dom, span);
        }
    }

    dom.smooth(dom.document());
    resolve_code_elements(dom);
}

/// The container holds exactly one code-class span: it is one line of a
/// code block. Merge into a preceding `<pre>` if one is structurally
/// adjacent, otherwise the container itself becomes the `<pre>`.
fn promote_block_line(dom: &mut ArenaDom, container: NodeId) {
    let text = dom.text_content(container);

    if let Some(prev) = prev_content_sibling(dom, container)
        && dom.element_name(prev).is_some_and(|n| n.as_ref() == "pre")
    {
        dom.append_text(prev, "\r\n");
        dom.append_text(prev, &text);
        dom.detach(container);
    } else {
        dom.retag(container, "pre");
        dom.set_text_content(container, &text);
    }
}

/// The span is inline among other content: merge into an immediately
/// preceding `<code>` sibling, or become a `<code>` itself.
fn promote_inline(dom: &mut ArenaDom, span: NodeId) {
    let prev = dom.get(span).map(|n| n.prev_sibling).unwrap_or(NodeId::NONE);
    if dom.element_name(prev).is_some_and(|n| n.as_ref() == "code") {
        dom.reparent_children(span, prev);
        dom.detach(span);
    } else {
        dom.retag(span, "code");
    }
}

/// Previous sibling, looking through whitespace-only text nodes. Any other
/// node is content and breaks the run.
fn prev_content_sibling(dom: &ArenaDom, id: NodeId) -> Option<NodeId> {
    let mut cur = dom.get(id).map(|n| n.prev_sibling)?;
    while cur.is_some() {
        match dom.text(cur) {
            Some(text) if text.trim().is_empty() => {
                cur = dom.get(cur).map(|n| n.prev_sibling)?;
            }
            _ => return Some(cur),
        }
    }
    None
}

/// Second sweep: `<code>` elements that turned out to hold whole lines.
///
/// A `<br>` inside a code span means multi-line content, so the break
/// becomes an embedded newline; a `<code>` left as the sole child of a
/// paragraph-like container is really a block, so the container becomes
/// the `<pre>` and the code wrapper dissolves.
fn resolve_code_elements(dom: &mut ArenaDom) {
    for code in dom.elements_by_tag(dom.document(), "code") {
        if !dom.is_attached(code) {
            continue;
        }

        let brs: Vec<NodeId> = dom
            .children(code)
            .filter(|&c| dom.element_name(c).is_some_and(|n| n.as_ref() == "br"))
            .collect();
        for br in &brs {
            let newline = dom.create_text("\n".to_string());
            dom.insert_before(*br, newline);
            dom.detach(*br);
        }
        if !brs.is_empty() {
            dom.smooth(code);
        }

        let Some(parent) = dom.get(code).map(|n| n.parent) else {
            continue;
        };
        if is_line_container(dom, parent) && dom.children(parent).count() == 1 {
            dom.unwrap(code);
            dom.retag(parent, "pre");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{parse_html, to_html};

    const CODE_CSS: &str = "<style>.code{font-family:\"Roboto Mono\"}</style>";

    fn doc(body: &str) -> ArenaDom {
        parse_html(&format!("<html><head>{CODE_CSS}</head><body>{body}</body></html>"))
    }

    #[test]
    fn test_sole_child_span_becomes_pre() {
        let mut dom = doc(r#"<p><span class="code">def f()</span></p>"#);

        consolidate_code(&mut dom);

        let pres = dom.elements_by_tag(dom.document(), "pre");
        assert_eq!(pres.len(), 1);
        assert_eq!(dom.text_content(pres[0]), "def f()");
        assert!(dom.elements_by_tag(pres[0], "span").is_empty());
    }

    #[test]
    fn test_consecutive_lines_merge_into_one_pre() {
        let mut dom = doc(
            r#"<p><span class="code">a=1</span></p><p><span class="code">b=2</span></p>"#,
        );

        consolidate_code(&mut dom);

        let pres = dom.elements_by_tag(dom.document(), "pre");
        assert_eq!(pres.len(), 1);
        assert_eq!(dom.text_content(pres[0]), "a=1\r\nb=2");
    }

    #[test]
    fn test_interrupted_lines_stay_separate_blocks() {
        let mut dom = doc(
            r#"<p><span class="code">a=1</span></p><p>prose</p><p><span class="code">b=2</span></p>"#,
        );

        consolidate_code(&mut dom);

        let pres = dom.elements_by_tag(dom.document(), "pre");
        assert_eq!(pres.len(), 2);
    }

    #[test]
    fn test_inline_span_becomes_code() {
        let mut dom = doc(r#"<p>run <span class="code">program</span> now</p>"#);

        consolidate_code(&mut dom);

        let html = to_html(&dom);
        assert!(html.contains("run <code>program</code> now"));
        assert!(dom.elements_by_tag(dom.document(), "pre").is_empty());
    }

    #[test]
    fn test_adjacent_inline_spans_merge() {
        let mut dom = doc(
            r#"<p>x <span class="code">foo</span><span class="code">bar</span> y</p>"#,
        );

        consolidate_code(&mut dom);

        let codes = dom.elements_by_tag(dom.document(), "code");
        assert_eq!(codes.len(), 1);
        assert_eq!(dom.text_content(codes[0]), "foobar");
    }

    #[test]
    fn test_code_with_br_promotes_to_pre() {
        let mut dom = doc(r#"<p><code>line1<br>line2</code></p>"#);

        consolidate_code(&mut dom);

        let pres = dom.elements_by_tag(dom.document(), "pre");
        assert_eq!(pres.len(), 1);
        assert_eq!(dom.text_content(pres[0]), "line1\nline2");
        assert!(dom.elements_by_tag(dom.document(), "code").is_empty());
    }

    #[test]
    fn test_span_without_code_class_untouched() {
        let mut dom = doc(r#"<p><span class="other">not code</span></p>"#);

        consolidate_code(&mut dom);

        assert!(dom.elements_by_tag(dom.document(), "pre").is_empty());
        assert!(dom.elements_by_tag(dom.document(), "code").is_empty());
    }
}

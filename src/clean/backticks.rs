//! Pass 8: Backtick-to-Code Conversion
//!
//! Writers type `` `literal` `` spans in prose; by this point they sit in
//! plain text. The pair is rewritten to `<code>` markup by substituting on
//! the element's serialized content and re-parsing the result as a
//! fragment, so markup nested around the backticks (a link, say) survives
//! the rewrite.

use regex_lite::Regex;

use crate::dom::{ArenaDom, NodeId, body, inner_html, parse_fragment};

/// Convert backtick pairs in text content into `<code>` elements.
///
/// Runs on smoothed text so a pair split across adjacent text nodes is
/// visible as one run. Non-greedy pairing: an unmatched odd backtick stays
/// literal.
pub fn convert_backticks(dom: &mut ArenaDom) {
    dom.smooth(dom.document());

    // Only elements with a backtick in their *direct* text are rewritten;
    // an element whose only child is another element is handled when that
    // child is visited.
    let candidates: Vec<NodeId> = dom
        .descendants(dom.document())
        .into_iter()
        .filter(|&id| {
            dom.is_element(id)
                && dom
                    .children(id)
                    .any(|c| dom.text(c).is_some_and(|t| t.contains('`')))
        })
        .collect();

    let pair = Regex::new(r"`(.*?)`").unwrap();

    for id in candidates {
        if !dom.is_attached(id) {
            continue;
        }

        let html = inner_html(dom, id);
        let replaced = pair.replace_all(&html, "<code>$1</code>");
        if replaced == html {
            continue;
        }

        let fragment = parse_fragment(&replaced);
        let Some(fragment_body) = body(&fragment) else {
            continue;
        };

        let old: Vec<NodeId> = dom.children(id).collect();
        for child in old {
            dom.detach(child);
        }
        let new: Vec<NodeId> = fragment.children(fragment_body).collect();
        for child in new {
            dom.adopt_subtree(&fragment, child, id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{parse_html, to_html};

    #[test]
    fn test_backtick_pair_becomes_code() {
        let mut dom = parse_html("<p>use `cargo` here</p>");

        convert_backticks(&mut dom);

        assert!(to_html(&dom).contains("use <code>cargo</code> here"));
    }

    #[test]
    fn test_multiple_pairs_in_one_paragraph() {
        let mut dom = parse_html("<p>`a` and `b`</p>");

        convert_backticks(&mut dom);

        assert!(to_html(&dom).contains("<code>a</code> and <code>b</code>"));
    }

    #[test]
    fn test_preserves_surrounding_markup() {
        // Reference case: backticks inside a link must keep the link.
        let mut dom = parse_html(
            r#"<p><span><a href="https://huggingface.co/datasets/MongoDB/cosmopedia-wikihow-chunked">`cosmopedia-wikihow-chunked`</a></span></p>"#,
        );

        convert_backticks(&mut dom);

        let anchors = dom.elements_by_tag(dom.document(), "a");
        assert_eq!(anchors.len(), 1);
        assert_eq!(
            dom.attr(anchors[0], "href"),
            Some("https://huggingface.co/datasets/MongoDB/cosmopedia-wikihow-chunked")
        );
        let codes = dom.elements_by_tag(anchors[0], "code");
        assert_eq!(codes.len(), 1);
        assert_eq!(dom.text_content(codes[0]), "cosmopedia-wikihow-chunked");
    }

    #[test]
    fn test_unmatched_backtick_stays_literal() {
        let mut dom = parse_html("<p>odd ` one</p>");

        convert_backticks(&mut dom);

        let html = to_html(&dom);
        assert!(html.contains("odd ` one"));
        assert!(!html.contains("<code>"));
    }

    #[test]
    fn test_odd_count_leaves_trailing_backtick() {
        let mut dom = parse_html("<p>`a` and ` rest</p>");

        convert_backticks(&mut dom);

        let html = to_html(&dom);
        assert!(html.contains("<code>a</code> and ` rest"));
    }

    #[test]
    fn test_pair_split_across_text_nodes_is_seen() {
        let mut dom = parse_html("<p></p>");
        let p = dom.elements_by_tag(dom.document(), "p")[0];
        let t1 = dom.create_text("`half".to_string());
        let t2 = dom.create_text(" done`".to_string());
        dom.append(p, t1);
        dom.append(p, t2);

        convert_backticks(&mut dom);

        assert!(to_html(&dom).contains("<code>half done</code>"));
    }
}

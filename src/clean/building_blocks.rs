//! Pass 2: Code-Building-Block Extraction
//!
//! Google Docs' "insert code block" feature exports each code range as a
//! run of paragraphs bracketed by two sentinel spans: the first paragraph
//! holds a span whose entire text is U+EC03, the last holds one with
//! U+EC02. The sentinels are structural markers with no content and no
//! escaping mechanism; their presence is the whole contract.

use log::warn;
use regex_lite::Regex;

use crate::dom::{ArenaDom, NodeId, html_name};

/// Sole content of the span opening a code building block.
const BLOCK_START: &str = "\u{EC03}";
/// Sole content of the span closing a code building block.
const BLOCK_END: &str = "\u{EC02}";

/// Rewrite every code building block into a single `<pre>` holding the
/// range's text, one line per original paragraph.
pub fn extract_building_blocks(dom: &mut ArenaDom) {
    let starts: Vec<NodeId> = dom
        .elements_by_tag(dom.document(), "span")
        .into_iter()
        .filter(|&span| dom.text_content(span) == BLOCK_START)
        .collect();

    for start_span in starts {
        if !dom.is_attached(start_span) {
            continue;
        }
        let Some(start_para) = dom.get(start_span).map(|n| n.parent) else {
            continue;
        };
        if !dom.is_element(start_para) {
            continue;
        }
        dom.detach(start_span);

        let mut line_paras = vec![start_para];
        let mut terminated = false;
        // A one-line block carries both sentinels in the same paragraph.
        if let Some(end_span) = find_end_span(dom, start_para) {
            dom.detach(end_span);
            terminated = true;
        }
        let mut cursor = dom.get(start_para).map(|n| n.next_sibling);
        while !terminated && let Some(sibling) = cursor.filter(|id| id.is_some()) {
            cursor = dom.get(sibling).map(|n| n.next_sibling);
            // Whitespace between paragraphs is not part of the range.
            if !dom.is_element(sibling) {
                continue;
            }
            line_paras.push(sibling);
            if let Some(end_span) = find_end_span(dom, sibling) {
                dom.detach(end_span);
                terminated = true;
                break;
            }
        }
        if !terminated {
            warn!("code building block has no end marker; extracting to end of container");
        }

        let lines: Vec<String> = line_paras
            .iter()
            .map(|&para| flatten_line(dom, para))
            .collect();
        let code = lines.join("\n").replace('\u{a0}', " ");

        let pre = dom.create_element(html_name("pre"), vec![]);
        dom.append_text(pre, &code);
        dom.insert_before(start_para, pre);
        for para in line_paras {
            dom.detach(para);
        }
    }
}

fn find_end_span(dom: &ArenaDom, para: NodeId) -> Option<NodeId> {
    dom.elements_by_tag(para, "span")
        .into_iter()
        .find(|&span| dom.text_content(span) == BLOCK_END)
}

/// Flatten one paragraph of a code range to a single text line.
///
/// `<br>` becomes a newline, then a newline followed by whitespace is
/// collapsed to one space: inside a building block Google soft-wraps long
/// logical lines with `<br>` plus indentation, which is not a real break.
fn flatten_line(dom: &mut ArenaDom, line: NodeId) -> String {
    for br in dom.elements_by_tag(line, "br") {
        let newline = dom.create_text("\n".to_string());
        dom.insert_before(br, newline);
        dom.detach(br);
    }
    dom.smooth(line);
    let text = dom.text_content(line);
    let soft_wrap = Regex::new(r"\n\s+").unwrap();
    soft_wrap.replace_all(&text, " ").into_owned()
}

//! Pass 5: Redirect Link Cleanup

use percent_encoding::percent_decode_str;

use crate::dom::ArenaDom;
use crate::error::{Error, Result};

/// Prefix of Google's outbound link redirection wrapper.
const REDIRECT_PREFIX: &str = "https://www.google.com/url";

/// Rewrite anchors pointing at Google's redirect wrapper to the wrapped
/// target (the `q` query parameter).
///
/// A redirect href without a `q` parameter is a hard error: silently
/// passing the wrapper through would publish a tracking URL.
pub fn rewrite_redirect_links(dom: &mut ArenaDom) -> Result<()> {
    for anchor in dom.elements_by_tag(dom.document(), "a") {
        let Some(href) = dom.attr(anchor, "href") else {
            continue;
        };
        if !href.starts_with(REDIRECT_PREFIX) {
            continue;
        }
        let href = href.to_string();
        let target =
            redirect_target(&href).ok_or_else(|| Error::MalformedRedirect(href.clone()))?;
        dom.set_attr(anchor, "href", &target);
    }
    Ok(())
}

/// First `q` parameter of the redirect URL's query string, decoded.
fn redirect_target(href: &str) -> Option<String> {
    let (_, query) = href.split_once('?')?;
    let query = query.split('#').next().unwrap_or(query);

    for pair in query.split('&') {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        if key == "q" {
            let value = value.replace('+', " ");
            return Some(percent_decode_str(&value).decode_utf8_lossy().into_owned());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_html;

    #[test]
    fn test_rewrites_redirect_to_q_parameter() {
        let mut dom = parse_html(
            r#"<a href="https://www.google.com/url?q=https://example.com&amp;sa=D&amp;usg=xyz">x</a>"#,
        );

        rewrite_redirect_links(&mut dom).unwrap();

        let a = dom.elements_by_tag(dom.document(), "a")[0];
        assert_eq!(dom.attr(a, "href"), Some("https://example.com"));
    }

    #[test]
    fn test_percent_encoded_target_is_decoded() {
        let mut dom = parse_html(
            r#"<a href="https://www.google.com/url?q=https%3A%2F%2Fexample.com%2Fa%20b">x</a>"#,
        );

        rewrite_redirect_links(&mut dom).unwrap();

        let a = dom.elements_by_tag(dom.document(), "a")[0];
        assert_eq!(dom.attr(a, "href"), Some("https://example.com/a b"));
    }

    #[test]
    fn test_ordinary_links_untouched() {
        let mut dom = parse_html(r#"<a href="https://example.org/page">x</a>"#);

        rewrite_redirect_links(&mut dom).unwrap();

        let a = dom.elements_by_tag(dom.document(), "a")[0];
        assert_eq!(dom.attr(a, "href"), Some("https://example.org/page"));
    }

    #[test]
    fn test_missing_q_parameter_is_an_error() {
        let mut dom = parse_html(r#"<a href="https://www.google.com/url?sa=D">x</a>"#);

        let err = rewrite_redirect_links(&mut dom).unwrap_err();
        assert!(matches!(err, Error::MalformedRedirect(_)));
    }

    #[test]
    fn test_first_q_occurrence_wins() {
        let mut dom = parse_html(
            r#"<a href="https://www.google.com/url?q=https://first.example&amp;q=https://second.example">x</a>"#,
        );

        rewrite_redirect_links(&mut dom).unwrap();

        let a = dom.elements_by_tag(dom.document(), "a")[0];
        assert_eq!(dom.attr(a, "href"), Some("https://first.example"));
    }
}

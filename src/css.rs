//! Embedded stylesheet interpretation.
//!
//! Google Docs export HTML carries no semantic tags: every piece of
//! formatting is a `<span>` whose class is defined in an embedded
//! stylesheet. Only three properties matter for normalization:
//!
//! - `font-family` with a fixed-width family marks a *code* class;
//! - numeric `font-weight` above 400 marks a *bold* class;
//! - `font-style: italic` marks an *italic* class.
//!
//! Parsing is lenient: a malformed rule contributes nothing rather than
//! aborting the pipeline.

use std::collections::HashSet;

use cssparser::{
    AtRuleParser, ParseError, Parser, ParserInput, QualifiedRuleParser, RuleBodyItemParser,
    RuleBodyParser, StyleSheetParser, Token,
};
use log::debug;

use crate::dom::{ArenaDom, NodeId};

/// Font families treated as code fonts, lowercase.
const CODE_FONTS: &[&str] = &[
    "fira mono",
    "roboto mono",
    "source code pro",
    "courier new",
    "consolas",
];

/// Whether a font-family value names a fixed-width (code) font.
///
/// Surrounding whitespace and quotes are stripped and the comparison is
/// case-insensitive.
pub fn is_code_font(family: &str) -> bool {
    let name = family.trim().trim_matches(['\'', '"']).to_lowercase();
    CODE_FONTS.contains(&name.as_str())
}

/// Class names classified by the formatting they encode.
///
/// A class may appear in more than one set when the rule declares both
/// axes independently (bold and italic, say).
#[derive(Debug, Default)]
pub struct StyleClasses {
    pub code: HashSet<String>,
    pub bold: HashSet<String>,
    pub italic: HashSet<String>,
}

impl StyleClasses {
    /// Classify the classes declared in every `<style>` element of a document.
    pub fn from_document(dom: &ArenaDom) -> Self {
        let mut result = Self::default();
        for style in dom.elements_by_tag(dom.document(), "style") {
            result.extend_from_css(&dom.text_content(style));
        }
        debug!("code classes: {:?}", result.code);
        debug!("bold classes: {:?}", result.bold);
        debug!("italic classes: {:?}", result.italic);
        result
    }

    /// Classify the classes declared in a single stylesheet string.
    pub fn parse(css: &str) -> Self {
        let mut result = Self::default();
        result.extend_from_css(css);
        result
    }

    fn extend_from_css(&mut self, css: &str) {
        let mut input = ParserInput::new(css);
        let mut parser = Parser::new(&mut input);
        let mut rule_parser = RuleParser { classes: self };

        for result in StyleSheetParser::new(&mut parser, &mut rule_parser) {
            // Ignore errors - lenient parsing.
            let _ = result;
        }
    }

    fn record(&mut self, selectors: &str, props: &RuleProps) {
        let is_code = props.font_family.as_deref().is_some_and(is_code_font);
        let is_bold = props.font_weight.is_some_and(|w| w > 400);
        let is_italic = props.italic;
        if !(is_code || is_bold || is_italic) {
            return;
        }

        for selector in selectors.split(',') {
            let class = selector.trim().trim_start_matches('.');
            if class.is_empty() {
                continue;
            }
            if is_code {
                self.code.insert(class.to_string());
            }
            if is_bold {
                self.bold.insert(class.to_string());
            }
            if is_italic {
                self.italic.insert(class.to_string());
            }
        }
    }

    /// Whether any of an element's classes carries a code font.
    pub fn has_code_class(&self, dom: &ArenaDom, id: NodeId) -> bool {
        dom.element_classes(id).iter().any(|c| self.code.contains(c))
    }

    pub fn has_bold_class(&self, dom: &ArenaDom, id: NodeId) -> bool {
        dom.element_classes(id).iter().any(|c| self.bold.contains(c))
    }

    pub fn has_italic_class(&self, dom: &ArenaDom, id: NodeId) -> bool {
        dom.element_classes(id)
            .iter()
            .any(|c| self.italic.contains(c))
    }
}

/// Declared properties of a single rule that the normalizer cares about.
#[derive(Debug, Default)]
struct RuleProps {
    font_family: Option<String>,
    font_weight: Option<i32>,
    italic: bool,
}

/// Parser for top-level stylesheet rules.
struct RuleParser<'a> {
    classes: &'a mut StyleClasses,
}

impl<'i> AtRuleParser<'i> for RuleParser<'_> {
    type Prelude = ();
    type AtRule = ();
    type Error = ();

    fn parse_prelude<'t>(
        &mut self,
        _name: cssparser::CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, ParseError<'i, Self::Error>> {
        // At-rules (@import, @media, ...) never classify spans; skip them.
        Err(input.new_custom_error(()))
    }
}

impl<'i> QualifiedRuleParser<'i> for RuleParser<'_> {
    type Prelude = String;
    type QualifiedRule = ();
    type Error = ();

    fn parse_prelude<'t>(
        &mut self,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, ParseError<'i, Self::Error>> {
        // Capture the selector text verbatim; classification only needs the
        // class name, not a compiled selector.
        let start = input.position();
        while input.next().is_ok() {}
        Ok(input.slice_from(start).trim().to_string())
    }

    fn parse_block<'t>(
        &mut self,
        prelude: Self::Prelude,
        _start: &cssparser::ParserState,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::QualifiedRule, ParseError<'i, Self::Error>> {
        let mut props = RuleProps::default();
        let mut decl_parser = DeclarationCollector { props: &mut props };

        for result in RuleBodyParser::new(input, &mut decl_parser) {
            // Ignore errors - lenient parsing.
            let _ = result;
        }

        self.classes.record(&prelude, &props);
        Ok(())
    }
}

struct DeclarationCollector<'a> {
    props: &'a mut RuleProps,
}

impl<'i> cssparser::DeclarationParser<'i> for DeclarationCollector<'_> {
    type Declaration = ();
    type Error = ();

    fn parse_value<'t>(
        &mut self,
        name: cssparser::CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
        _start: &cssparser::ParserState,
    ) -> Result<Self::Declaration, ParseError<'i, Self::Error>> {
        if name.eq_ignore_ascii_case("font-family") {
            self.props.font_family = parse_first_font_family(input);
        } else if name.eq_ignore_ascii_case("font-weight") {
            if let Ok(&Token::Number { int_value, value, .. }) = input.next() {
                self.props.font_weight = Some(int_value.unwrap_or(value as i32));
            }
        } else if name.eq_ignore_ascii_case("font-style")
            && let Ok(Token::Ident(style)) = input.next()
            && style.eq_ignore_ascii_case("italic")
        {
            self.props.italic = true;
        }

        // Consume the rest of the declaration value so the body parser
        // doesn't reject the declaration as malformed.
        while input.next().is_ok() {}
        Ok(())
    }
}

impl<'i> cssparser::AtRuleParser<'i> for DeclarationCollector<'_> {
    type Prelude = ();
    type AtRule = ();
    type Error = ();

    fn parse_prelude<'t>(
        &mut self,
        _name: cssparser::CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, ParseError<'i, Self::Error>> {
        Err(input.new_custom_error(()))
    }
}

impl<'i> cssparser::QualifiedRuleParser<'i> for DeclarationCollector<'_> {
    type Prelude = ();
    type QualifiedRule = ();
    type Error = ();

    fn parse_prelude<'t>(
        &mut self,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, ParseError<'i, Self::Error>> {
        Err(input.new_custom_error(()))
    }
}

impl<'i> RuleBodyItemParser<'i, (), ()> for DeclarationCollector<'_> {
    fn parse_declarations(&self) -> bool {
        true
    }
    fn parse_qualified(&self) -> bool {
        false
    }
}

/// First font family in a `font-family` declaration, as written
/// (unquoted multi-word names are re-joined with single spaces).
fn parse_first_font_family(input: &mut Parser) -> Option<String> {
    let mut words: Vec<String> = Vec::new();
    while let Ok(token) = input.next() {
        match token {
            Token::QuotedString(s) if words.is_empty() => return Some(s.to_string()),
            Token::Ident(s) => words.push(s.to_string()),
            Token::Comma => break,
            _ => {}
        }
    }
    if words.is_empty() {
        None
    } else {
        Some(words.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_code_font() {
        assert!(is_code_font("Consolas"));
        assert!(is_code_font("  \"Roboto Mono\" "));
        assert!(is_code_font("'courier new'"));
        assert!(!is_code_font("Arial"));
        assert!(!is_code_font("monospace"));
    }

    #[test]
    fn test_classifies_code_bold_italic() {
        let classes = StyleClasses::parse(
            r#"
            .c1 { font-family: "Roboto Mono"; color: #000 }
            .c2 { font-weight: 700 }
            .c3 { font-style: italic }
            .c4 { font-weight: 400 }
            .c5 { font-family: Arial }
            "#,
        );

        assert!(classes.code.contains("c1"));
        assert!(classes.bold.contains("c2"));
        assert!(classes.italic.contains("c3"));
        assert!(!classes.bold.contains("c4"));
        assert!(!classes.code.contains("c5"));
    }

    #[test]
    fn test_rule_can_classify_on_both_axes() {
        let classes = StyleClasses::parse(".c6 { font-weight: 700; font-style: italic }");
        assert!(classes.bold.contains("c6"));
        assert!(classes.italic.contains("c6"));
    }

    #[test]
    fn test_comma_selector_lists() {
        let classes = StyleClasses::parse(".c7, .c8 { font-weight: 600 }");
        assert!(classes.bold.contains("c7"));
        assert!(classes.bold.contains("c8"));
    }

    #[test]
    fn test_unquoted_multiword_family() {
        let classes = StyleClasses::parse(".c9 { font-family: Courier New, monospace }");
        assert!(classes.code.contains("c9"));
    }

    #[test]
    fn test_malformed_rules_are_skipped() {
        let classes = StyleClasses::parse(".good { font-weight: 700 } .bad { font-weight:: }}");
        assert!(classes.bold.contains("good"));
        assert!(!classes.bold.contains("bad"));
    }

    #[test]
    fn test_non_numeric_weight_is_ignored() {
        let classes = StyleClasses::parse(".c10 { font-weight: bold }");
        assert!(classes.bold.is_empty());
    }
}

use crate::error::StyleError;
use crate::style::cssom::{CssRule, Declaration, MediaRule, StyleRule};
use cssparser::{Delimiter, ParseError, Parser, ParserInput, Token};
use lightningcss::declaration::DeclarationBlock;
use lightningcss::printer::PrinterOptions;
use lightningcss::properties::Property;
use lightningcss::rules::{media::MediaRule as LcssMediaRule, style::StyleRule as LcssStyleRule};
use lightningcss::rules::{CssRule as LcssRule, Location};
use lightningcss::stylesheet::{ParserOptions, StyleAttribute, StyleSheet as LightningStyleSheet};
use lightningcss::traits::ToCss;

/// Browsers drop invalid rules and declarations instead of rejecting the
/// whole sheet; error recovery gives us the same behaviour.
fn parser_options<'o, 'i>() -> ParserOptions<'o, 'i> {
    ParserOptions {
        error_recovery: true,
        ..ParserOptions::default()
    }
}

/// Parse a raw CSS string (LightningCSS) and convert it to owned rules.
/// Declaration values keep their authored text.
pub fn parse_stylesheet(css_text: &str) -> Result<Vec<CssRule>, StyleError> {
    let sheet = LightningStyleSheet::parse(css_text, parser_options())
        .map_err(|e| StyleError::Parse(e.to_string()))?;
    Ok(convert_rules(&sheet.rules.0, css_text))
}

/// Parse the contents of a `style="..."` attribute.
pub fn parse_style_attribute(style_text: &str) -> Result<Vec<Declaration>, StyleError> {
    let attribute = StyleAttribute::parse(style_text, parser_options())
        .map_err(|e| StyleError::Parse(e.to_string()))?;
    Ok(convert_declarations(&attribute.declarations, Some(style_text)))
}

fn convert_rules(rules: &[LcssRule<'_>], source: &str) -> Vec<CssRule> {
    let mut owned_rules = Vec::new();
    for rule in rules {
        match rule {
            LcssRule::Style(style_rule) => {
                owned_rules.push(CssRule::Style(convert_style_rule(style_rule, source)))
            }
            LcssRule::Media(media_rule) => {
                owned_rules.push(CssRule::Media(convert_media_rule(media_rule, source)))
            }
            // @font-face, @keyframes, @import and friends never match an element.
            _ => {}
        }
    }
    owned_rules
}

fn convert_media_rule(media_rule: &LcssMediaRule<'_>, source: &str) -> MediaRule {
    let condition = media_rule
        .query
        .to_css_string(PrinterOptions::default())
        .unwrap_or_default();
    MediaRule {
        condition,
        rules: convert_rules(&media_rule.rules.0, source),
    }
}

/// Helper to copy a single StyleRule's selectors + declarations into an owned rule.
fn convert_style_rule(style_rule: &LcssStyleRule<'_>, source: &str) -> StyleRule {
    let mut selectors_vec = Vec::new();
    for selector in &style_rule.selectors.0 {
        match selector.to_css_string(PrinterOptions::default()) {
            Ok(sel_str) => selectors_vec.push(sel_str),
            Err(err) => log::trace!("dropping unprintable selector: {}", err),
        }
    }

    let block = authored_block(source, &style_rule.loc);
    if block.is_none() {
        log::trace!("no authored block at {}:{}", style_rule.loc.line, style_rule.loc.column);
    }
    StyleRule {
        selector_text: selectors_vec.join(", "),
        declarations: convert_declarations(&style_rule.declarations, block),
    }
}

/// Byte offset of a rule location: lines count from 0, columns from 1 in
/// UTF-16 code units.
fn byte_offset(source: &str, location: &Location) -> Option<usize> {
    let mut line = 0;
    let mut line_start = 0;
    let mut chars = source.char_indices().peekable();
    while line < location.line {
        let (idx, c) = chars.next()?;
        match c {
            '\n' | '\x0C' => {
                line += 1;
                line_start = idx + 1;
            }
            '\r' => {
                line += 1;
                line_start = idx + 1;
                if let Some(&(lf, '\n')) = chars.peek() {
                    chars.next();
                    line_start = lf + 1;
                }
            }
            _ => {}
        }
    }

    let mut column = 1;
    for (idx, c) in source[line_start..].char_indices() {
        if column >= location.column {
            return Some(line_start + idx);
        }
        column += c.len_utf16() as u32;
    }
    (column >= location.column).then_some(source.len())
}

/// The text between the braces of the rule starting at `location`.
fn authored_block<'i>(source: &'i str, location: &Location) -> Option<&'i str> {
    let offset = byte_offset(source, location)?;
    let mut input = ParserInput::new(source.get(offset..)?);
    let mut parser = Parser::new(&mut input);
    loop {
        match parser.next() {
            Ok(Token::CurlyBracketBlock) => break,
            Ok(_) => {}
            Err(_) => return None,
        }
    }
    parser
        .parse_nested_block::<_, _, ()>(|block| {
            let start = block.position();
            while block.next().is_ok() {}
            Ok(block.slice_from(start))
        })
        .ok()
}

/// A declaration as written: lowercased name, value text without `!important`.
#[derive(Debug, PartialEq)]
struct AuthoredDeclaration<'i> {
    name: String,
    value: &'i str,
    important: bool,
}

fn split_important(value: &str) -> (&str, bool) {
    let value = value.trim();
    if let Some(bang) = value.rfind('!') {
        if value[bang + 1..].trim_start().eq_ignore_ascii_case("important") {
            return (value[..bang].trim_end(), true);
        }
    }
    (value, false)
}

fn authored_declarations(block: &str) -> Vec<AuthoredDeclaration<'_>> {
    let mut input = ParserInput::new(block);
    let mut parser = Parser::new(&mut input);
    let mut authored = Vec::new();
    while !parser.is_exhausted() {
        let parsed = parser.parse_until_after::<_, _, ()>(Delimiter::Semicolon, |decl| {
            let name = decl.expect_ident()?.to_ascii_lowercase();
            decl.expect_colon()?;
            let start = decl.position();
            while decl.next().is_ok() {}
            Ok((name, decl.slice_from(start)))
        });
        match parsed {
            Ok((name, text)) => {
                let (value, important) = split_important(text);
                authored.push(AuthoredDeclaration {
                    name,
                    value,
                    important,
                });
            }
            Err(ParseError { location, .. }) => {
                log::trace!("skipping unreadable declaration at {}:{}", location.line, location.column)
            }
        }
    }
    authored
}

/// `-webkit-transition` is reported by lightningcss as `transition`.
fn same_property(authored: &str, parsed: &str) -> bool {
    authored == parsed
        || (authored.starts_with('-')
            && authored
                .strip_suffix(parsed)
                .is_some_and(|prefix| prefix.len() > 1 && prefix.ends_with('-')))
}

/// Declarations lightningcss accepted, in source order, with their authored
/// value text. Any it accepted that can't be found in `authored_text` keep
/// the printed value and follow the others.
fn convert_declarations(block: &DeclarationBlock<'_>, authored_text: Option<&str>) -> Vec<Declaration> {
    let normal = block
        .declarations
        .iter()
        .filter_map(|property| convert_property(property, false));
    let important = block
        .important_declarations
        .iter()
        .filter_map(|property| convert_property(property, true));
    let mut remaining: Vec<Declaration> = normal.chain(important).collect();

    let mut declarations = Vec::with_capacity(remaining.len());
    for authored in authored_text.map(authored_declarations).unwrap_or_default() {
        let found = remaining.iter().position(|printed| {
            printed.important == authored.important && same_property(&authored.name, &printed.property)
        });
        if let Some(idx) = found {
            remaining.remove(idx);
            declarations.push(Declaration::new(authored.name, authored.value, authored.important));
        }
    }
    declarations.extend(remaining);
    declarations
}

fn convert_property(property: &Property<'_>, important: bool) -> Option<Declaration> {
    let name = property.property_id().name().to_string();
    match property.value_to_css_string(PrinterOptions::default()) {
        Ok(value) => Some(Declaration::new(name, value, important)),
        Err(err) => {
            log::trace!("dropping declaration {}: {}", name, err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_style_and_media_rules_are_owned() {
        let rules = parse_stylesheet(
            r#"
            .red { color: red; }
            @media (max-width: 600px) {
                #blue { width: 10px; }
            }
            @font-face { font-family: x; src: url(x.woff); }
        "#,
        )
        .unwrap();

        assert_eq!(rules.len(), 2);
        match &rules[0] {
            CssRule::Style(rule) => {
                assert_eq!(rule.selector_text, ".red");
                assert_eq!(rule.css_text(), "color: red");
            }
            other => panic!("expected style rule, got {:?}", other),
        }
        match &rules[1] {
            CssRule::Media(media) => {
                assert!(media.condition.contains("600px"));
                assert_eq!(media.rules.len(), 1);
            }
            other => panic!("expected media rule, got {:?}", other),
        }
    }

    #[test]
    fn test_selector_list_is_joined() {
        let rules = parse_stylesheet("h1, .title { width: 10px }").unwrap();
        let CssRule::Style(rule) = &rules[0] else {
            panic!("expected style rule");
        };
        assert_eq!(rule.selector_text, "h1, .title");
    }

    #[test]
    fn test_important_flag_is_kept() {
        let decls = parse_style_attribute("width: 10px !important; height: 5px").unwrap();
        assert_eq!(
            decls,
            vec![
                Declaration::new("width", "10px", true),
                Declaration::new("height", "5px", false),
            ]
        );
    }

    #[test]
    fn test_invalid_rule_is_dropped_not_fatal() {
        let rules = parse_stylesheet("..broken { color: red } .ok { width: 1px }").unwrap();
        assert_eq!(rules.len(), 1);
    }

    #[test]
    fn test_authored_values_are_kept() {
        let decls = parse_style_attribute("color:blue; background-color: transparent; margin: 0").unwrap();
        assert_eq!(
            decls,
            vec![
                Declaration::new("color", "blue", false),
                Declaration::new("background-color", "transparent", false),
                Declaration::new("margin", "0", false),
            ]
        );

        let rules = parse_stylesheet("p {\n  color: blue;\n  padding: 0px 10px !IMPORTANT\n}").unwrap();
        let CssRule::Style(rule) = &rules[0] else {
            panic!("expected style rule");
        };
        assert_eq!(rule.css_text(), "color: blue; padding: 0px 10px !important");
    }

    #[test]
    fn test_rules_after_multibyte_text_find_their_block() {
        let css = "/* h\u{e9}llo \u{1F355} */ .a { color: blue } @media print {\r\n  .b { width: 0 }\r\n}";
        let rules = parse_stylesheet(css).unwrap();
        let CssRule::Style(rule) = &rules[0] else {
            panic!("expected style rule");
        };
        assert_eq!(rule.css_text(), "color: blue");
        let CssRule::Media(media) = &rules[1] else {
            panic!("expected media rule");
        };
        let CssRule::Style(inner) = &media.rules[0] else {
            panic!("expected style rule");
        };
        assert_eq!(inner.css_text(), "width: 0");
    }

    #[test]
    fn test_prefixed_properties_keep_authored_names() {
        let decls = parse_style_attribute("width: 10px; -webkit-transition: none").unwrap();
        assert_eq!(
            decls,
            vec![
                Declaration::new("width", "10px", false),
                Declaration::new("-webkit-transition", "none", false),
            ]
        );
    }

    #[test]
    fn test_important_suffix_is_split() {
        assert_eq!(split_important(" red ! important "), ("red", true));
        assert_eq!(split_important("url(a!b.png)"), ("url(a!b.png)", false));
    }
}

//! Clipboard text for an inspection.

use crate::config::InspectorTab;
use crate::inspect::result::{group_media_rules, InspectionResult};
use std::fmt::Write;

pub const NOTHING_TO_COPY: &str = "Nothing to copy.";
pub const SOURCES_COPY_TEXT: &str = "List of page stylesheets.";

/// Splits `prop: value; prop: value` on semicolons that sit outside quotes
/// and parentheses, so `url(a;b)` and `"a;b"` stay whole. Empty pieces are
/// dropped.
pub fn split_declarations(text: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut start = 0;

    for (idx, ch) in text.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match (quote, ch) {
            (_, '\\') => escaped = true,
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(ch),
            (None, '(') => depth += 1,
            (None, ')') => depth = depth.saturating_sub(1),
            (None, ';') if depth == 0 => {
                pieces.push(&text[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    pieces.push(&text[start..]);

    pieces
        .into_iter()
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .collect()
}

fn write_block(out: &mut String, selector: &str, declarations: &str, indent: &str) {
    let _ = writeln!(out, "{}{} {{", indent, selector);
    for declaration in split_declarations(declarations) {
        let _ = writeln!(out, "{}  {};", indent, declaration);
    }
    let _ = writeln!(out, "{}}}", indent);
}

/// Authored styles as pasteable CSS: the inline style as a `[style]` block,
/// matched rules, `@media` groups, then the hover rules as a commented example.
pub fn serialize_authored(result: &InspectionResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "/* Authored for: {} */", result.selector_label);

    if let Some(inline) = &result.inline_declaration {
        write_block(&mut out, "[style]", inline, "");
        out.push('\n');
    }

    for rule in &result.matched_rules {
        write_block(&mut out, &rule.selector_text, &rule.declaration_text, "");
        out.push('\n');
    }

    for (condition, rules) in group_media_rules(&result.media_rules) {
        let _ = writeln!(out, "@media {} {{", condition);
        for media_rule in rules {
            write_block(
                &mut out,
                &media_rule.rule.selector_text,
                &media_rule.rule.declaration_text,
                "  ",
            );
        }
        out.push_str("}\n\n");
    }

    if !result.hover_rules.is_empty() {
        out.push_str("/* Hover Styles (example) */\n");
        for hover in &result.hover_rules {
            let important = if hover.important { " !important" } else { "" };
            let _ = writeln!(
                out,
                "{}:hover {{ {}: {}{}; }}",
                result.selector_label, hover.property, hover.value, important
            );
        }
    }

    out.trim_end().to_string()
}

/// The computed snapshot, one `prop: value;` per line.
pub fn serialize_computed(result: &InspectionResult) -> String {
    let mut out = format!("/* Computed for: {} */", result.selector_label);
    for (property, value) in &result.computed_snapshot {
        let _ = write!(out, "\n{}: {};", property, value);
    }
    out
}

/// What a click on the popup copies for the active tab.
pub fn copy_text(tab: InspectorTab, result: Option<&InspectionResult>) -> String {
    match (tab, result) {
        (InspectorTab::Sources, _) => SOURCES_COPY_TEXT.to_string(),
        (_, None) => NOTHING_TO_COPY.to_string(),
        (InspectorTab::Styles, Some(result)) => serialize_authored(result),
        (InspectorTab::Computed, Some(result)) => serialize_computed(result),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inspect::result::{AuthoredRule, HoverRule, MatchedMediaRule};
    use pretty_assertions::assert_eq;

    fn rule(selector: &str, declarations: &str) -> AuthoredRule {
        AuthoredRule {
            selector_text: selector.into(),
            declaration_text: declarations.into(),
            source_href: Some("inline".into()),
        }
    }

    #[test]
    fn test_split_respects_quotes_and_parens() {
        assert_eq!(
            split_declarations(r#"content: "a;b"; background: url(x;y.png); color: red;"#),
            vec![r#"content: "a;b""#, "background: url(x;y.png)", "color: red"]
        );
        assert!(split_declarations(" ; ").is_empty());
    }

    #[test]
    fn test_authored_copy_format() {
        let result = InspectionResult {
            selector_label: "div#x.y".into(),
            inline_declaration: Some("color: blue".into()),
            matched_rules: vec![rule("#x", "color: red; margin: 0px")],
            media_rules: vec![
                MatchedMediaRule {
                    rule: rule(".y", "width: 10px"),
                    media_condition: "print".into(),
                },
                MatchedMediaRule {
                    rule: rule("div", "height: 5px"),
                    media_condition: "screen".into(),
                },
                MatchedMediaRule {
                    rule: rule("#x", "width: 20px"),
                    media_condition: "print".into(),
                },
            ],
            hover_rules: vec![HoverRule {
                property: "color".into(),
                value: "red".into(),
                important: true,
            }],
            computed_snapshot: vec![],
        };

        let expected = "\
/* Authored for: div#x.y */
[style] {
  color: blue;
}

#x {
  color: red;
  margin: 0px;
}

@media print {
  .y {
    width: 10px;
  }
  #x {
    width: 20px;
  }
}

@media screen {
  div {
    height: 5px;
  }
}

/* Hover Styles (example) */
div#x.y:hover { color: red !important; }";
        assert_eq!(serialize_authored(&result), expected);
    }

    #[test]
    fn test_computed_copy_format() {
        let mut result = InspectionResult::empty();
        result.selector_label = "p".into();
        result.computed_snapshot = vec![
            ("display".into(), "block".into()),
            ("color".into(), "rgb(255, 0, 0)".into()),
        ];
        assert_eq!(
            serialize_computed(&result),
            "/* Computed for: p */\ndisplay: block;\ncolor: rgb(255, 0, 0);"
        );
    }

    #[test]
    fn test_copy_text_per_tab() {
        let result = InspectionResult::empty();
        assert_eq!(copy_text(InspectorTab::Styles, None), "Nothing to copy.");
        assert_eq!(copy_text(InspectorTab::Computed, None), "Nothing to copy.");
        assert_eq!(
            copy_text(InspectorTab::Sources, Some(&result)),
            "List of page stylesheets."
        );
        assert_eq!(
            copy_text(InspectorTab::Styles, Some(&result)),
            "/* Authored for: N/A */"
        );
    }
}

//! Rule collection: the inline style plus every stylesheet rule whose selector
//! matches the element, grouped into plain and `@media` rules.

use crate::dom::dom_tree::NodeRef;
use crate::inspect::result::{AuthoredRule, MatchedMediaRule};
use crate::style::css_matcher::SelectorMatcher;
use crate::style::css_parse::parse_style_attribute;
use crate::style::cssom::{declarations_text, CssRule, StyleRule, StyleSheetHandle};
use crate::style::specificity::sort_by_specificity;

/// Authored styling found for one element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectedRules {
    pub inline_declaration: Option<String>,
    pub matched_rules: Vec<AuthoredRule>,
    pub media_rules: Vec<MatchedMediaRule>,
}

/// The element's `style` attribute as `prop: value; prop: value`, or `None`
/// when it is missing or declares nothing.
pub fn inline_declaration(element: &NodeRef) -> Option<String> {
    let style_text = element
        .borrow()
        .as_element()
        .and_then(|elem| elem.attribute("style").map(str::to_string))?;

    match parse_style_attribute(&style_text) {
        Ok(declarations) if !declarations.is_empty() => Some(declarations_text(&declarations)),
        Ok(_) => None,
        Err(err) => {
            log::trace!("style attribute kept verbatim: {}", err);
            let raw = style_text.trim().trim_end_matches(';').trim();
            (!raw.is_empty()).then(|| raw.to_string())
        }
    }
}

/// Walks every readable sheet and returns the rules matching `element`.
/// Plain rules come back sorted by descending specificity; media rules keep
/// discovery order.
pub fn collect_rules(
    element: &NodeRef,
    sheets: &[StyleSheetHandle],
    matcher: &dyn SelectorMatcher,
) -> CollectedRules {
    let mut collected = CollectedRules {
        inline_declaration: inline_declaration(element),
        ..CollectedRules::default()
    };

    for sheet in sheets {
        let rules = match sheet.rule_list() {
            Ok(rules) => rules,
            Err(denied) => {
                log::debug!("skipping stylesheet: {}", denied);
                continue;
            }
        };
        let source_href = sheet.source_label();

        for rule in rules {
            match rule {
                CssRule::Style(style_rule) => {
                    if rule_matches(element, style_rule, matcher) {
                        collected
                            .matched_rules
                            .push(authored_rule(style_rule, &source_href));
                    }
                }
                CssRule::Media(media_rule) => {
                    for inner in &media_rule.rules {
                        // Only one level of nesting is inspected.
                        let CssRule::Style(style_rule) = inner else {
                            continue;
                        };
                        if rule_matches(element, style_rule, matcher) {
                            collected.media_rules.push(MatchedMediaRule {
                                rule: authored_rule(style_rule, &source_href),
                                media_condition: media_rule.condition.clone(),
                            });
                        }
                    }
                }
            }
        }
    }

    sort_by_specificity(&mut collected.matched_rules, |rule| rule.selector_text.as_str());
    collected
}

fn rule_matches(element: &NodeRef, rule: &StyleRule, matcher: &dyn SelectorMatcher) -> bool {
    match matcher.matches(element, &rule.selector_text) {
        Ok(matched) => matched,
        Err(err) => {
            log::trace!("skipping rule {:?}: {}", rule.selector_text, err);
            false
        }
    }
}

fn authored_rule(rule: &StyleRule, source_href: &str) -> AuthoredRule {
    AuthoredRule {
        selector_text: rule.selector_text.clone(),
        declaration_text: rule.css_text(),
        source_href: Some(source_href.to_string()),
    }
}

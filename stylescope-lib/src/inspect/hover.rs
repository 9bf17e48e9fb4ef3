use crate::dom::dom_tree::NodeRef;
use crate::inspect::result::HoverRule;
use crate::style::css_matcher::SelectorMatcher;
use crate::style::cssom::{CssRule, StyleSheetHandle};

const HOVER: &str = ":hover";

/// Selector text before the rightmost `:hover`, trimmed. `None` when the
/// selector has no `:hover` or nothing precedes it.
pub fn hover_base_selector(selector_text: &str) -> Option<&str> {
    let idx = selector_text.rfind(HOVER)?;
    let base = selector_text[..idx].trim();
    (!base.is_empty()).then_some(base)
}

/// Declarations of top-level `:hover` rules whose base selector matches `element`.
pub fn extract_hover_rules(
    element: &NodeRef,
    sheets: &[StyleSheetHandle],
    matcher: &dyn SelectorMatcher,
) -> Vec<HoverRule> {
    let mut hover_rules = Vec::new();
    for sheet in sheets {
        let Ok(rules) = sheet.rule_list() else {
            continue;
        };
        for rule in rules {
            let CssRule::Style(style_rule) = rule else {
                continue;
            };
            let Some(base) = hover_base_selector(&style_rule.selector_text) else {
                continue;
            };
            match matcher.matches(element, base) {
                Ok(true) => {}
                Ok(false) => continue,
                Err(err) => {
                    log::trace!("skipping hover base {:?}: {}", base, err);
                    continue;
                }
            }
            hover_rules.extend(
                style_rule
                    .declarations
                    .iter()
                    .filter(|decl| !decl.value.is_empty())
                    .map(|decl| HoverRule {
                        property: decl.property.clone(),
                        value: decl.value.clone(),
                        important: decl.important,
                    }),
            );
        }
    }
    hover_rules
}

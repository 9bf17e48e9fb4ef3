use crate::dom::dom_tree::NodeRef;
use serde::{Deserialize, Serialize};

/// Label shown when nothing is being inspected.
pub const NO_ELEMENT_LABEL: &str = "N/A";

/// A plain style rule whose selector matches the inspected element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthoredRule {
    pub selector_text: String,
    /// `prop: value; prop: value` as the sheet declared it.
    pub declaration_text: String,
    /// Sheet URL, `"inline"` for `<style>` sheets, `"unknown"` otherwise.
    pub source_href: Option<String>,
}

/// A matched rule nested in an `@media` group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchedMediaRule {
    #[serde(flatten)]
    pub rule: AuthoredRule,
    pub media_condition: String,
}

/// One declaration of a `:hover` rule whose base selector matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoverRule {
    pub property: String,
    pub value: String,
    pub important: bool,
}

/// Everything the inspector found out about one element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InspectionResult {
    pub selector_label: String,
    pub inline_declaration: Option<String>,
    /// Highest specificity first.
    pub matched_rules: Vec<AuthoredRule>,
    pub media_rules: Vec<MatchedMediaRule>,
    pub hover_rules: Vec<HoverRule>,
    /// Allow-list order, uninformative values removed.
    pub computed_snapshot: Vec<(String, String)>,
}

impl InspectionResult {
    /// Placeholder result for "no element under the pointer".
    pub fn empty() -> Self {
        InspectionResult {
            selector_label: NO_ELEMENT_LABEL.to_string(),
            inline_declaration: None,
            matched_rules: Vec::new(),
            media_rules: Vec::new(),
            hover_rules: Vec::new(),
            computed_snapshot: Vec::new(),
        }
    }

    /// True when no authored styling of any kind was found.
    pub fn has_no_authored_rules(&self) -> bool {
        self.inline_declaration.is_none()
            && self.matched_rules.is_empty()
            && self.media_rules.is_empty()
            && self.hover_rules.is_empty()
    }
}

/// `tag#id.class1.class2` for display. Classes starting with `ui_prefix`
/// belong to the inspector and are left out.
pub fn selector_label(element: Option<&NodeRef>, ui_prefix: &str) -> String {
    let Some(element) = element else {
        return NO_ELEMENT_LABEL.to_string();
    };
    let node = element.borrow();
    let Some(elem) = node.as_element() else {
        return NO_ELEMENT_LABEL.to_string();
    };

    let mut label = elem.tag.to_ascii_lowercase();
    if let Some(id) = elem.id() {
        label.push('#');
        label.push_str(id);
    }
    for class_name in elem.classes() {
        if ui_prefix.is_empty() || !class_name.starts_with(ui_prefix) {
            label.push('.');
            label.push_str(class_name);
        }
    }
    label
}

/// Media rules grouped by condition, groups in first-appearance order.
pub fn group_media_rules(media_rules: &[MatchedMediaRule]) -> Vec<(&str, Vec<&MatchedMediaRule>)> {
    let mut groups: Vec<(&str, Vec<&MatchedMediaRule>)> = Vec::new();
    for rule in media_rules {
        match groups
            .iter_mut()
            .find(|(condition, _)| *condition == rule.media_condition)
        {
            Some((_, rules)) => rules.push(rule),
            None => groups.push((rule.media_condition.as_str(), vec![rule])),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{NoLoader, Page};

    #[test]
    fn test_selector_label() {
        let page = Page::parse(
            r#"<DIV id="x" class="y  css-inspector-highlight z">hi</DIV><p>plain</p>"#,
            None,
            &NoLoader,
        )
        .unwrap();
        let div = page.element_by_id("x");
        assert_eq!(selector_label(div.as_ref(), "css-inspector"), "div#x.y.z");

        let p = page.query_selector("p").unwrap();
        assert_eq!(selector_label(p.as_ref(), "css-inspector"), "p");
        assert_eq!(selector_label(None, "css-inspector"), "N/A");
    }

    #[test]
    fn test_empty_result() {
        let result = InspectionResult::empty();
        assert_eq!(result.selector_label, "N/A");
        assert!(result.has_no_authored_rules());
    }

    #[test]
    fn test_media_rules_group_by_first_appearance() {
        let media = |condition: &str, selector: &str| MatchedMediaRule {
            rule: AuthoredRule {
                selector_text: selector.into(),
                declaration_text: "width: 1px".into(),
                source_href: None,
            },
            media_condition: condition.into(),
        };
        let rules = vec![media("print", ".a"), media("screen", ".b"), media("print", ".c")];
        let grouped: Vec<(&str, Vec<&str>)> = group_media_rules(&rules)
            .into_iter()
            .map(|(condition, rules)| {
                (condition, rules.iter().map(|r| r.rule.selector_text.as_str()).collect())
            })
            .collect();
        assert_eq!(grouped, vec![("print", vec![".a", ".c"]), ("screen", vec![".b"])]);
    }
}

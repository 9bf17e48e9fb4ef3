//! Style inspection of a single element.

pub mod collector;
pub mod computed_filter;
pub mod hover;
pub mod result;
pub mod serializer;

use crate::config::InspectorConfig;
use crate::dom::dom_tree::NodeRef;
use crate::page::Page;
use crate::style::computed::{CascadeResolver, ComputedStyleSource};
use crate::style::css_matcher::{DomSelectorMatcher, SelectorMatcher};
use crate::style::cssom::StyleSheetHandle;

pub use result::{selector_label, AuthoredRule, HoverRule, InspectionResult, MatchedMediaRule};

/// Inspects elements against a fixed set of stylesheets. Each call reads the
/// current DOM and sheets afresh, so repeated calls on an unchanged page give
/// equal results.
pub struct StyleInspector<'a> {
    sheets: &'a [StyleSheetHandle],
    matcher: &'a dyn SelectorMatcher,
    computed: &'a dyn ComputedStyleSource,
    config: &'a InspectorConfig,
}

impl<'a> StyleInspector<'a> {
    pub fn new(
        sheets: &'a [StyleSheetHandle],
        matcher: &'a dyn SelectorMatcher,
        computed: &'a dyn ComputedStyleSource,
        config: &'a InspectorConfig,
    ) -> Self {
        StyleInspector {
            sheets,
            matcher,
            computed,
            config,
        }
    }

    pub fn inspect(&self, element: &NodeRef) -> InspectionResult {
        let collected = collector::collect_rules(element, self.sheets, self.matcher);
        let hover_rules = hover::extract_hover_rules(element, self.sheets, self.matcher);
        let computed_snapshot =
            computed_filter::computed_snapshot(element, self.computed, self.config);

        let result = InspectionResult {
            selector_label: selector_label(Some(element), &self.config.ui_prefix),
            inline_declaration: collected.inline_declaration,
            matched_rules: collected.matched_rules,
            media_rules: collected.media_rules,
            hover_rules,
            computed_snapshot,
        };
        log::trace!(
            "inspected {}: {} matched, {} media, {} hover",
            result.selector_label,
            result.matched_rules.len(),
            result.media_rules.len(),
            result.hover_rules.len()
        );
        result
    }

    /// Like [`inspect`](Self::inspect), with the placeholder result when
    /// there is no element.
    pub fn inspect_optional(&self, element: Option<&NodeRef>) -> InspectionResult {
        element.map_or_else(InspectionResult::empty, |element| self.inspect(element))
    }
}

/// Inspects `element` with the page's own sheets, the DOM matcher and the
/// cascade resolver.
pub fn inspect_element(page: &Page, element: &NodeRef, config: &InspectorConfig) -> InspectionResult {
    let matcher = DomSelectorMatcher;
    let resolver = CascadeResolver::new(page.stylesheets(), &matcher);
    StyleInspector::new(page.stylesheets(), &matcher, &resolver, config).inspect(element)
}

// Owned, CSSOM-like view of a page's stylesheets. Nothing here borrows from
// the lightningcss parse, so sheets outlive the source text.
use crate::error::AccessDenied;
use std::fmt;

/// Source label for sheets that come from a `<style>` element.
pub const INLINE_SOURCE: &str = "inline";
/// Source label for sheets with neither an href nor a `<style>` owner.
pub const UNKNOWN_SOURCE: &str = "unknown";

/// One `property: value` pair of a declaration block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub property: String,
    pub value: String,
    pub important: bool,
}

impl Declaration {
    pub fn new(property: impl Into<String>, value: impl Into<String>, important: bool) -> Self {
        Declaration {
            property: property.into(),
            value: value.into(),
            important,
        }
    }
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.property, self.value)?;
        if self.important {
            f.write_str(" !important")?;
        }
        Ok(())
    }
}

/// Serializes a declaration list the way `CSSStyleDeclaration.cssText` reads,
/// minus the trailing semicolon: `color: red; margin: 0`.
pub fn declarations_text(declarations: &[Declaration]) -> String {
    declarations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleRule {
    /// e.g. "div", ".red", "#header, .nav > a"
    pub selector_text: String,
    pub declarations: Vec<Declaration>,
}

impl StyleRule {
    pub fn css_text(&self) -> String {
        declarations_text(&self.declarations)
    }
}

impl fmt::Display for StyleRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {{", self.selector_text)?;
        for decl in &self.declarations {
            writeln!(f, "  {};", decl)?;
        }
        write!(f, "}}")
    }
}

/// An `@media` group and the rules nested in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaRule {
    /// Raw media query text, e.g. "(max-width: 600px)".
    pub condition: String,
    pub rules: Vec<CssRule>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CssRule {
    Style(StyleRule),
    Media(MediaRule),
}

/// Where a stylesheet came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetOwner {
    /// A `<style>` element.
    StyleElement,
    /// A `<link rel="stylesheet">` element.
    Link,
    /// Constructed or otherwise embedded sheets.
    Other,
}

/// A page stylesheet. Reading its rules may be refused, as browsers do for
/// cross-origin sheets.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleSheetHandle {
    pub href: Option<String>,
    pub owner: SheetOwner,
    rules: Result<Vec<CssRule>, AccessDenied>,
}

impl StyleSheetHandle {
    pub fn new(
        href: Option<String>,
        owner: SheetOwner,
        rules: Result<Vec<CssRule>, AccessDenied>,
    ) -> Self {
        StyleSheetHandle { href, owner, rules }
    }

    /// A sheet from a `<style>` element.
    pub fn inline(rules: Vec<CssRule>) -> Self {
        Self::new(None, SheetOwner::StyleElement, Ok(rules))
    }

    /// A readable sheet from a `<link>` element.
    pub fn linked(href: impl Into<String>, rules: Vec<CssRule>) -> Self {
        Self::new(Some(href.into()), SheetOwner::Link, Ok(rules))
    }

    /// A `<link>` sheet whose rules cannot be read.
    pub fn denied(href: impl Into<String>, reason: AccessDenied) -> Self {
        Self::new(Some(href.into()), SheetOwner::Link, Err(reason))
    }

    pub fn is_inline(&self) -> bool {
        self.owner == SheetOwner::StyleElement
    }

    pub fn accessible(&self) -> bool {
        self.rules.is_ok()
    }

    pub fn rule_list(&self) -> Result<&[CssRule], AccessDenied> {
        match &self.rules {
            Ok(rules) => Ok(rules),
            Err(denied) => Err(denied.clone()),
        }
    }

    /// Value recorded as `source_href` on rules matched from this sheet.
    pub fn source_label(&self) -> String {
        match (&self.href, self.owner) {
            (Some(href), _) => href.clone(),
            (None, SheetOwner::StyleElement) => INLINE_SOURCE.to_string(),
            (None, _) => UNKNOWN_SOURCE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declarations_text_joins_pairs() {
        let decls = vec![
            Declaration::new("color", "red", false),
            Declaration::new("margin", "0", true),
        ];
        assert_eq!(declarations_text(&decls), "color: red; margin: 0 !important");
    }

    #[test]
    fn test_source_label_per_owner() {
        assert_eq!(StyleSheetHandle::inline(vec![]).source_label(), "inline");
        assert_eq!(
            StyleSheetHandle::linked("https://a.test/site.css", vec![]).source_label(),
            "https://a.test/site.css"
        );
        let embedded = StyleSheetHandle::new(None, SheetOwner::Other, Ok(vec![]));
        assert_eq!(embedded.source_label(), "unknown");
    }

    #[test]
    fn test_denied_sheet_reports_reason() {
        let sheet = StyleSheetHandle::denied(
            "https://cdn.test/x.css",
            AccessDenied::CrossOrigin {
                href: "https://cdn.test/x.css".into(),
            },
        );
        assert!(!sheet.accessible());
        assert!(matches!(
            sheet.rule_list(),
            Err(AccessDenied::CrossOrigin { .. })
        ));
    }
}

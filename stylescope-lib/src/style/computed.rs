use crate::dom::dom_tree::{self, NodeRef};
use crate::style::css_matcher::SelectorMatcher;
use crate::style::css_parse::parse_style_attribute;
use crate::style::cssom::{CssRule, Declaration, StyleSheetHandle};
use crate::style::specificity::{selector_specificity, Specificity};
use lightningcss::traits::Parse;
use lightningcss::values::color::{CssColor, RGBA};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Represents final set of CSS properties an element gets.
#[derive(Default, Clone, Debug, PartialEq)]
pub struct ComputedStyle {
    pub properties: HashMap<String, String>,
}

impl ComputedStyle {
    pub fn new() -> Self {
        ComputedStyle {
            properties: HashMap::new(),
        }
    }

    /// Like `CSSStyleDeclaration.getPropertyValue`: empty when unknown.
    pub fn get_property_value(&self, property: &str) -> &str {
        self.properties.get(property).map_or("", String::as_str)
    }

    pub fn set(&mut self, property: impl Into<String>, value: impl Into<String>) {
        self.properties.insert(property.into(), value.into());
    }
}

/// The platform's computed-style resolution (`getComputedStyle`).
pub trait ComputedStyleSource {
    fn computed_style(&self, element: &NodeRef) -> ComputedStyle;
}

/// Initial values, written the way browsers report them from `getComputedStyle`.
const INITIAL_VALUES: &[(&str, &str)] = &[
    ("display", "inline"),
    ("position", "static"),
    ("width", "auto"),
    ("height", "auto"),
    ("margin", "0px"),
    ("padding", "0px"),
    ("border", "0px none rgb(0, 0, 0)"),
    ("border-color", "rgb(0, 0, 0)"),
    ("border-top-color", "rgb(0, 0, 0)"),
    ("border-right-color", "rgb(0, 0, 0)"),
    ("border-bottom-color", "rgb(0, 0, 0)"),
    ("border-left-color", "rgb(0, 0, 0)"),
    ("border-radius", "0px"),
    ("border-width", "0px"),
    ("border-style", "none"),
    ("background", "none"),
    ("background-color", "rgba(0, 0, 0, 0)"),
    ("color", "rgb(0, 0, 0)"),
    ("font-family", "serif"),
    ("font-size", "16px"),
    ("font-weight", "400"),
    ("line-height", "normal"),
    ("text-align", "start"),
    ("top", "auto"),
    ("right", "auto"),
    ("bottom", "auto"),
    ("left", "auto"),
    ("z-index", "auto"),
    ("outline", "none"),
    ("outline-color", "rgb(0, 0, 0)"),
    ("overflow", "visible"),
    ("opacity", "1"),
    ("visibility", "visible"),
    ("float", "none"),
    ("clear", "none"),
    ("flex", "0 1 auto"),
    ("align-items", "normal"),
    ("justify-content", "normal"),
    ("grid", "none"),
    ("box-shadow", "none"),
    ("text-shadow", "none"),
    ("transition", "all 0s ease 0s"),
    ("transform", "none"),
    ("cursor", "auto"),
    ("pointer-events", "auto"),
];

/// Properties that inherit from the parent when not set on the element.
const INHERITED_PROPERTIES: &[&str] = &[
    "color",
    "font-family",
    "font-size",
    "font-weight",
    "line-height",
    "text-align",
    "visibility",
    "cursor",
    "pointer-events",
    "letter-spacing",
    "word-spacing",
    "direction",
    "text-shadow",
];

/// Elements the user-agent stylesheet displays as blocks.
const BLOCK_ELEMENTS: &[&str] = &[
    "html", "body", "div", "p", "section", "article", "aside", "header", "footer", "nav",
    "main", "ul", "ol", "li", "form", "fieldset", "h1", "h2", "h3", "h4", "h5", "h6", "pre",
    "blockquote", "figure", "figcaption", "address", "hr", "dl", "dt", "dd", "details",
    "summary", "table",
];

/// Elements the user-agent stylesheet never renders.
const HIDDEN_ELEMENTS: &[&str] = &[
    "head", "style", "script", "title", "meta", "link", "template", "noscript",
];

/// Properties `getComputedStyle` reports as `rgb()`/`rgba()` colours.
const COLOR_VALUED_PROPERTIES: &[&str] = &[
    "color",
    "background-color",
    "border-color",
    "border-top-color",
    "border-right-color",
    "border-bottom-color",
    "border-left-color",
    "outline-color",
];

pub fn initial_value(property: &str) -> Option<&'static str> {
    INITIAL_VALUES
        .iter()
        .find(|(name, _)| *name == property)
        .map(|(_, value)| *value)
}

/// A declaration that takes part in the cascade, with what decides its priority.
struct CascadedDeclaration {
    declaration: Declaration,
    specificity: Specificity,
    source_order: usize,
    inline: bool,
}

impl CascadedDeclaration {
    /// Normal author < normal inline < important author < important inline;
    /// within a layer, specificity then source order.
    fn cmp_priority(&self, other: &Self) -> Ordering {
        (self.declaration.important, self.inline, self.specificity, self.source_order).cmp(&(
            other.declaration.important,
            other.inline,
            other.specificity,
            other.source_order,
        ))
    }
}

/// Approximates `getComputedStyle` from a page's own stylesheets: initial
/// values, a small user-agent `display` table, inheritance, author rules by
/// heuristic specificity and the `style` attribute. Media rules are not applied.
pub struct CascadeResolver<'a> {
    sheets: &'a [StyleSheetHandle],
    matcher: &'a dyn SelectorMatcher,
}

impl<'a> CascadeResolver<'a> {
    pub fn new(sheets: &'a [StyleSheetHandle], matcher: &'a dyn SelectorMatcher) -> Self {
        CascadeResolver { sheets, matcher }
    }

    fn matched_declarations(&self, element: &NodeRef) -> Vec<CascadedDeclaration> {
        let mut cascaded = Vec::new();
        let mut source_order = 0;
        for sheet in self.sheets {
            let Ok(rules) = sheet.rule_list() else {
                continue;
            };
            for rule in rules {
                let CssRule::Style(style_rule) = rule else {
                    continue;
                };
                source_order += 1;
                if !matches!(self.matcher.matches(element, &style_rule.selector_text), Ok(true)) {
                    continue;
                }
                let specificity = selector_specificity(&style_rule.selector_text);
                for declaration in &style_rule.declarations {
                    cascaded.push(CascadedDeclaration {
                        declaration: declaration.clone(),
                        specificity,
                        source_order,
                        inline: false,
                    });
                }
            }
        }

        let inline_text = element
            .borrow()
            .as_element()
            .and_then(|elem| elem.attribute("style").map(str::to_string));
        if let Some(text) = inline_text {
            let declarations = parse_style_attribute(&text).unwrap_or_else(|err| {
                log::trace!("ignoring unparsable style attribute: {}", err);
                Vec::new()
            });
            for declaration in declarations {
                source_order += 1;
                cascaded.push(CascadedDeclaration {
                    declaration,
                    specificity: Specificity::default(),
                    source_order,
                    inline: true,
                });
            }
        }

        cascaded.sort_by(CascadedDeclaration::cmp_priority);
        cascaded
    }
}

impl CascadeResolver<'_> {
    fn style_with_parent(&self, element: &NodeRef, parent_style: Option<&ComputedStyle>) -> ComputedStyle {
        let tag = element
            .borrow()
            .as_element()
            .map(|elem| elem.tag.to_ascii_lowercase())
            .unwrap_or_default();

        let mut computed = ComputedStyle::new();
        for (property, value) in INITIAL_VALUES {
            computed.set(*property, *value);
        }
        if BLOCK_ELEMENTS.contains(&tag.as_str()) {
            computed.set("display", "block");
        } else if HIDDEN_ELEMENTS.contains(&tag.as_str()) {
            computed.set("display", "none");
        }
        if let Some(parent) = parent_style {
            for property in INHERITED_PROPERTIES {
                if let Some(value) = parent.properties.get(*property) {
                    computed.set(*property, value.clone());
                }
            }
        }

        for cascaded in self.matched_declarations(element) {
            let property = cascaded.declaration.property;
            let value = resolve_keyword(&property, &cascaded.declaration.value, parent_style, &computed);
            expand_shorthand(&mut computed, &property, &value);
            computed.set(property, value);
        }

        for property in COLOR_VALUED_PROPERTIES {
            if let Some(value) = computed.properties.get_mut(*property) {
                if let Some(color) = computed_color(value) {
                    *value = color;
                }
            }
        }
        computed
    }
}

impl ComputedStyleSource for CascadeResolver<'_> {
    /// Styles the ancestors from the root down, so depth costs no stack.
    fn computed_style(&self, element: &NodeRef) -> ComputedStyle {
        let mut lineage = vec![element.clone()];
        let mut ancestor = dom_tree::parent_element(element);
        while let Some(node) = ancestor {
            ancestor = dom_tree::parent_element(&node);
            lineage.push(node);
        }

        let mut style: Option<ComputedStyle> = None;
        for node in lineage.iter().rev() {
            style = Some(self.style_with_parent(node, style.as_ref()));
        }
        style.unwrap_or_default()
    }
}

/// A colour written the way `getComputedStyle` reports it: `rgb(r, g, b)`,
/// or `rgba(r, g, b, a)` unless fully opaque. `None` for values that aren't
/// a concrete colour (`currentcolor`, system colours, anything else).
pub fn computed_color(value: &str) -> Option<String> {
    let color = CssColor::parse_string(value.trim()).ok()?;
    let rgba = RGBA::try_from(&color).ok()?;
    if rgba.alpha == u8::MAX {
        return Some(format!("rgb({}, {}, {})", rgba.red, rgba.green, rgba.blue));
    }
    let alpha = (rgba.alpha_f32() * 100.0).round() / 100.0;
    Some(format!("rgba({}, {}, {}, {})", rgba.red, rgba.green, rgba.blue, alpha))
}

/// Whether `value` is a colour with zero alpha, in any notation.
pub fn is_fully_transparent(value: &str) -> bool {
    CssColor::parse_string(value.trim())
        .ok()
        .and_then(|color| RGBA::try_from(&color).ok())
        .is_some_and(|rgba| rgba.alpha == 0)
}

/// Resolves CSS-wide keywords and normalises bare zero lengths.
fn resolve_keyword(
    property: &str,
    value: &str,
    parent: Option<&ComputedStyle>,
    current: &ComputedStyle,
) -> String {
    match value.to_ascii_lowercase().as_str() {
        "inherit" => parent
            .map(|p| p.get_property_value(property).to_string())
            .or_else(|| initial_value(property).map(str::to_string))
            .unwrap_or_default(),
        "initial" | "unset" | "revert" => initial_value(property).unwrap_or_default().to_string(),
        "currentcolor" => current.get_property_value("color").to_string(),
        "0" if property != "opacity" && property != "z-index" => "0px".to_string(),
        _ => value.to_string(),
    }
}

/// Expands shorthand properties into the longhands the snapshot reports.
/// For border, we assume the shorthand is of the form "1px solid black".
fn expand_shorthand(computed: &mut ComputedStyle, property: &str, value: &str) {
    match property {
        "border" => {
            let parts: Vec<&str> = value.split_whitespace().collect();
            if let [width, style, color] = parts.as_slice() {
                computed.set("border-width", *width);
                computed.set("border-style", *style);
                computed.set("border-color", *color);
                for side in ["top", "right", "bottom", "left"] {
                    computed.set(format!("border-{}-color", side), *color);
                }
            }
        }
        "border-color" => {
            for side in ["top", "right", "bottom", "left"] {
                computed.set(format!("border-{}-color", side), value);
            }
        }
        "background" => {
            // A lone token without an image is a colour.
            if !value.contains(char::is_whitespace) && !value.contains("url(") {
                computed.set("background-color", value);
            }
        }
        _ => {}
    }
}

//! Declarative view-model of the inspector UI. The host renders it; nothing
//! here touches the page.

use crate::config::InspectorTab;
use crate::error::AccessDenied;
use crate::inspect::result::{group_media_rules, AuthoredRule, InspectionResult, MatchedMediaRule};
use crate::inspect::serializer::split_declarations;
use crate::session::clipboard::Notification;
use crate::session::state::InspectorState;
use crate::style::computed::ComputedStyle;
use crate::style::cssom::{SheetOwner, StyleSheetHandle};
use serde::Serialize;

pub const PLACEHOLDER_TEXT: &str = "Hover over an element to inspect.";
pub const NO_AUTHORED_RULES_TEXT: &str = "No specific authored rules";
pub const NO_STYLESHEETS_TEXT: &str = "No stylesheets found or accessible by the extension.";
pub const CORS_NOTE: &str =
    "Note: Viewing content of external stylesheets is limited due to browser security (CORS).";

/// Properties whose values get a colour swatch.
pub const COLOR_PROPERTIES: &[&str] = &[
    "color",
    "background-color",
    "border-color",
    "border-top-color",
    "border-right-color",
    "border-bottom-color",
    "border-left-color",
    "outline-color",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InspectorView {
    pub state: InspectorState,
    pub popup_visible: bool,
    pub overlay_visible: bool,
    /// Only pinned popups can be closed.
    pub close_button_visible: bool,
    pub pause_button_label: &'static str,
    pub popup_position: (i32, i32),
    pub tabs: Vec<TabButton>,
    pub selector_label: String,
    pub font_info: Option<String>,
    pub content: TabContent,
    /// Text a click on the popup would copy, if copying is possible.
    pub copy_text: Option<String>,
    pub notification: Option<Notification>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TabButton {
    pub tab: InspectorTab,
    pub title: &'static str,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyLine {
    pub property: String,
    pub value: String,
    /// Normalised colour for a swatch next to the value.
    pub swatch: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleBlock {
    pub selector: String,
    /// File name of the sheet the rule came from.
    pub source: Option<String>,
    pub lines: Vec<PropertyLine>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaGroup {
    pub condition: String,
    pub rules: Vec<RuleBlock>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SourceKind {
    Linked,
    Inline,
    LinkedError,
    EmbeddedOther,
}

impl SourceKind {
    pub fn label(self) -> &'static str {
        match self {
            SourceKind::Linked => "Linked",
            SourceKind::Inline => "Inline",
            SourceKind::LinkedError => "Linked (Error)",
            SourceKind::EmbeddedOther => "Embedded/Other",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceEntry {
    pub title: String,
    pub kind: SourceKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TabContent {
    Placeholder(String),
    Styles {
        inline: Vec<PropertyLine>,
        matched: Vec<RuleBlock>,
        hover: Vec<PropertyLine>,
        media: Vec<MediaGroup>,
    },
    Computed(Vec<PropertyLine>),
    Sources(Vec<SourceEntry>),
}

impl TabContent {
    /// Styles content with nothing to show, rendered as "No specific authored rules".
    pub fn is_empty_styles(&self) -> bool {
        matches!(
            self,
            TabContent::Styles { inline, matched, hover, media }
                if inline.is_empty() && matched.is_empty() && hover.is_empty() && media.is_empty()
        )
    }
}

pub fn tab_buttons(active: InspectorTab) -> Vec<TabButton> {
    [
        (InspectorTab::Styles, "Styles"),
        (InspectorTab::Computed, "Computed"),
        (InspectorTab::Sources, "Sources"),
    ]
    .into_iter()
    .map(|(tab, title)| TabButton {
        tab,
        title,
        active: tab == active,
    })
    .collect()
}

pub fn pause_button_label(state: InspectorState) -> &'static str {
    match state {
        InspectorState::Pinned => "Unpin",
        InspectorState::Paused => "Resume",
        InspectorState::Idle | InspectorState::Hovering => "Pause",
    }
}

/// Top-left corner of the popup: next to the pointer, pulled back inside the
/// viewport when it would overflow.
pub fn popup_position(pointer: (i32, i32), viewport: (u32, u32), popup: (u32, u32), gap: i32) -> (i32, i32) {
    let x = (pointer.0 + gap).min(viewport.0 as i32 - popup.0 as i32 - gap);
    let y = (pointer.1 + gap).min(viewport.1 as i32 - popup.1 as i32 - gap);
    (x, y)
}

/// `Arial 16px`: the first font family, unquoted, and the font size.
pub fn font_info(style: &ComputedStyle) -> String {
    let family = style
        .get_property_value("font-family")
        .split(',')
        .next()
        .unwrap_or_default()
        .trim()
        .replace(['"', '\''], "");
    format!("{} {}", family, style.get_property_value("font-size"))
}

fn is_digits(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_ascii_digit())
}

fn is_number(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_ascii_digit() || c == '.')
}

fn is_percentage(text: &str) -> bool {
    text.strip_suffix('%').is_some_and(is_number)
}

/// Arguments of `name(...)` or `namea(...)`, split on commas and trimmed.
fn function_args<'a>(value: &'a str, name: &str) -> Option<Vec<&'a str>> {
    let rest = value.strip_prefix(name)?;
    let rest = rest.strip_prefix('a').unwrap_or(rest);
    let inner = rest.strip_prefix('(')?.strip_suffix(')')?;
    let args: Vec<&str> = inner.split(',').map(str::trim).collect();
    matches!(args.len(), 3 | 4).then_some(args)
}

/// The colour to paint a swatch with, for hex, `rgb[a]()` and `hsl[a]()` values.
pub fn color_swatch(value: &str) -> Option<String> {
    let value = value.trim().to_ascii_lowercase();

    let valid = if let Some(hex) = value.strip_prefix('#') {
        matches!(hex.len(), 3 | 4 | 6 | 8) && hex.chars().all(|c| c.is_ascii_hexdigit())
    } else if let Some(args) = function_args(&value, "rgb") {
        args[..3]
            .iter()
            .all(|&arg| is_digits(arg.strip_suffix('%').unwrap_or(arg)))
            && args.get(3).map_or(true, |alpha| is_number(alpha))
    } else if let Some(args) = function_args(&value, "hsl") {
        is_number(args[0])
            && is_percentage(args[1])
            && is_percentage(args[2])
            && args.get(3).map_or(true, |alpha| is_number(alpha))
    } else {
        false
    };
    valid.then_some(value)
}

/// `prop: value` to a display line. The value keeps any `!important`; the
/// swatch does not.
pub fn property_line(property: &str, value: &str) -> Option<PropertyLine> {
    let property = property.trim();
    let value = value.trim().trim_end_matches(';').trim();
    if property.is_empty() || value.is_empty() {
        return None;
    }
    let swatch = if COLOR_PROPERTIES.contains(&property.to_ascii_lowercase().as_str()) {
        let bare = value.replace("!important", "");
        color_swatch(&bare)
    } else {
        None
    };
    Some(PropertyLine {
        property: property.to_string(),
        value: value.to_string(),
        swatch,
    })
}

fn declaration_lines(declaration_text: &str) -> Vec<PropertyLine> {
    split_declarations(declaration_text)
        .into_iter()
        .filter_map(|piece| {
            let (property, value) = piece.split_once(':')?;
            property_line(property, value)
        })
        .collect()
}

fn file_name(href: &str) -> &str {
    href.rsplit('/').next().filter(|name| !name.is_empty()).unwrap_or(href)
}

fn rule_block(rule: &AuthoredRule) -> RuleBlock {
    RuleBlock {
        selector: rule.selector_text.clone(),
        source: rule.source_href.as_deref().map(|href| file_name(href).to_string()),
        lines: declaration_lines(&rule.declaration_text),
    }
}

fn media_groups(media_rules: &[MatchedMediaRule]) -> Vec<MediaGroup> {
    group_media_rules(media_rules)
        .into_iter()
        .map(|(condition, rules)| MediaGroup {
            condition: condition.to_string(),
            rules: rules.into_iter().map(|media_rule| rule_block(&media_rule.rule)).collect(),
        })
        .collect()
}

pub fn styles_content(result: &InspectionResult) -> TabContent {
    TabContent::Styles {
        inline: result
            .inline_declaration
            .as_deref()
            .map(declaration_lines)
            .unwrap_or_default(),
        matched: result.matched_rules.iter().map(rule_block).collect(),
        hover: result
            .hover_rules
            .iter()
            .filter_map(|hover| {
                let value = if hover.important {
                    format!("{} !important", hover.value)
                } else {
                    hover.value.clone()
                };
                property_line(&hover.property, &value)
            })
            .collect(),
        media: media_groups(&result.media_rules),
    }
}

pub fn computed_content(result: &InspectionResult) -> TabContent {
    TabContent::Computed(
        result
            .computed_snapshot
            .iter()
            .filter_map(|(property, value)| property_line(property, value))
            .collect(),
    )
}

/// One entry per page stylesheet, in document order.
pub fn source_entries(sheets: &[StyleSheetHandle]) -> Vec<SourceEntry> {
    sheets
        .iter()
        .enumerate()
        .map(|(idx, sheet)| match (&sheet.href, sheet.owner) {
            (Some(href), _) => SourceEntry {
                title: file_name(href).to_string(),
                kind: match sheet.rule_list() {
                    Err(AccessDenied::Unavailable { .. }) => SourceKind::LinkedError,
                    _ => SourceKind::Linked,
                },
            },
            (None, SheetOwner::StyleElement) => SourceEntry {
                title: "Inline <style> tag".to_string(),
                kind: SourceKind::Inline,
            },
            (None, SheetOwner::Link) => SourceEntry {
                title: "Linked Stylesheet (empty or error)".to_string(),
                kind: SourceKind::LinkedError,
            },
            (None, SheetOwner::Other) => SourceEntry {
                title: format!("Sheet {}", idx + 1),
                kind: SourceKind::EmbeddedOther,
            },
        })
        .collect()
}

//! Configuration for the inspector session and the computed-style snapshot.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Properties reported in the computed snapshot, grouped by category
/// (layout, box, visual, typography, positioning, flex/grid, effects).
pub const DEFAULT_COMPUTED_PROPERTIES: &[&str] = &[
    "display",
    "position",
    "width",
    "height",
    "margin",
    "padding",
    "border",
    "border-color",
    "border-top-color",
    "border-right-color",
    "border-bottom-color",
    "border-left-color",
    "border-radius",
    "border-width",
    "background",
    "background-color",
    "color",
    "font-family",
    "font-size",
    "font-weight",
    "line-height",
    "text-align",
    "top",
    "right",
    "bottom",
    "left",
    "z-index",
    "outline",
    "outline-color",
    "overflow",
    "opacity",
    "visibility",
    "float",
    "clear",
    "flex",
    "align-items",
    "justify-content",
    "grid",
    "box-shadow",
    "text-shadow",
    "transition",
    "transform",
    "cursor",
    "pointer-events",
];

/// Resolved values that say nothing about the element.
pub const DEFAULT_UNINFORMATIVE_VALUES: &[&str] = &[
    "none",
    "auto",
    "normal",
    "0px",
    "rgba(0, 0, 0, 0)",
    "transparent",
];

/// Which panel tab is showing.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InspectorTab {
    #[default]
    Styles,
    Computed,
    Sources,
}

/// Configuration for inspector behaviour and layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InspectorConfig {
    // Computed snapshot
    /// Allow-list of properties, in report order.
    pub computed_properties: Vec<String>,
    /// Values that drop a property from the snapshot.
    pub uninformative_values: Vec<String>,

    // Timing
    /// Delay before the popup hides after the pointer leaves.
    #[serde(with = "millis")]
    pub hide_delay: Duration,
    /// How long the copy notification stays up.
    #[serde(with = "millis")]
    pub notification_duration: Duration,

    // Layout
    /// Offset of the copy notification from the click point.
    pub notification_offset: (i32, i32),
    /// Popup size used for placement before it has been measured.
    pub popup_size: (u32, u32),
    /// Gap between the pointer and the popup, and between popup and viewport edge.
    pub popup_gap: i32,
    /// Viewport assumed until the host reports one.
    pub viewport_size: (u32, u32),

    // Behaviour
    /// Ids and classes with this prefix belong to the inspector UI itself.
    pub ui_prefix: String,
    pub initial_tab: InspectorTab,
}

impl Default for InspectorConfig {
    fn default() -> Self {
        Self {
            computed_properties: DEFAULT_COMPUTED_PROPERTIES
                .iter()
                .map(|p| p.to_string())
                .collect(),
            uninformative_values: DEFAULT_UNINFORMATIVE_VALUES
                .iter()
                .map(|v| v.to_string())
                .collect(),

            hide_delay: Duration::from_millis(300),
            notification_duration: Duration::from_millis(2000),

            notification_offset: (-75, -50),
            popup_size: (550, 450),
            popup_gap: 10,
            viewport_size: (1280, 800),

            ui_prefix: "css-inspector".to_string(),
            initial_tab: InspectorTab::Styles,
        }
    }
}

mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_inspector_behaviour() {
        let config = InspectorConfig::default();
        assert_eq!(config.computed_properties.first().map(String::as_str), Some("display"));
        assert_eq!(config.computed_properties.len(), DEFAULT_COMPUTED_PROPERTIES.len());
        assert_eq!(config.hide_delay, Duration::from_millis(300));
        assert!(config.uninformative_values.iter().any(|v| v == "rgba(0, 0, 0, 0)"));
        assert_eq!(config.initial_tab, InspectorTab::Styles);
    }
}

use crate::config::InspectorConfig;
use crate::dom::dom_tree::NodeRef;
use crate::style::computed::{is_fully_transparent, ComputedStyle, ComputedStyleSource};

/// Allow-listed properties of `style` in allow-list order, minus empty and
/// uninformative values.
pub fn filter_computed(style: &ComputedStyle, config: &InspectorConfig) -> Vec<(String, String)> {
    config
        .computed_properties
        .iter()
        .filter_map(|property| {
            let value = style.get_property_value(property).trim();
            if value.is_empty() || is_uninformative(value, config) {
                None
            } else {
                Some((property.clone(), value.to_string()))
            }
        })
        .collect()
}

pub fn computed_snapshot(
    element: &NodeRef,
    source: &dyn ComputedStyleSource,
    config: &InspectorConfig,
) -> Vec<(String, String)> {
    filter_computed(&source.computed_style(element), config)
}

/// A configured sentinel, or a colour nobody can see.
fn is_uninformative(value: &str, config: &InspectorConfig) -> bool {
    config.uninformative_values.iter().any(|v| v == value) || is_fully_transparent(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_sentinels_are_dropped() {
        let mut style = ComputedStyle::new();
        for (property, value) in [
            ("width", "auto"),
            ("float", "none"),
            ("line-height", "normal"),
            ("margin", "0px"),
            ("background-color", "rgba(0, 0, 0, 0)"),
            ("outline-color", "transparent"),
            ("cursor", ""),
            ("padding", "10px"),
            ("display", "block"),
        ] {
            style.set(property, value);
        }

        let snapshot = filter_computed(&style, &InspectorConfig::default());
        assert_eq!(
            snapshot,
            vec![
                ("display".to_string(), "block".to_string()),
                ("padding".to_string(), "10px".to_string()),
            ]
        );
    }

    #[test]
    fn test_custom_allow_list_order() {
        let mut style = ComputedStyle::new();
        style.set("color", "rgb(255, 0, 0)");
        style.set("opacity", "0.5");
        let config = InspectorConfig {
            computed_properties: vec!["opacity".into(), "color".into(), "z-index".into()],
            ..InspectorConfig::default()
        };
        let properties: Vec<String> = filter_computed(&style, &config)
            .into_iter()
            .map(|(p, _)| p)
            .collect();
        assert_eq!(properties, vec!["opacity", "color"]);
    }

    #[test]
    fn test_zero_alpha_colours_are_dropped() {
        let mut style = ComputedStyle::new();
        style.set("background-color", "#0000");
        style.set("border-color", "hsla(10, 50%, 50%, 0)");
        style.set("outline-color", "#00000000");
        style.set("color", "rgba(0, 0, 0, 0.4)");
        let snapshot = filter_computed(&style, &InspectorConfig::default());
        assert_eq!(snapshot, vec![("color".to_string(), "rgba(0, 0, 0, 0.4)".to_string())]);
    }

    #[test]
    fn test_transparent_background_through_the_cascade() {
        use crate::parser::html::create_dom_tree;
        use crate::parser::dom_indices::DomIndices;
        use crate::style::computed::CascadeResolver;
        use crate::style::css_matcher::DomSelectorMatcher;
        use crate::style::css_parse::parse_stylesheet;
        use crate::style::cssom::StyleSheetHandle;

        let document = create_dom_tree(r#"<p id="p">x</p>"#);
        let indices = DomIndices::build(&document);
        let sheets = vec![StyleSheetHandle::inline(
            parse_stylesheet("p { background-color: transparent; color: #00f }").unwrap(),
        )];
        let resolver = CascadeResolver::new(&sheets, &DomSelectorMatcher);
        let snapshot = computed_snapshot(&indices.by_id("p").unwrap(), &resolver, &InspectorConfig::default());

        assert!(snapshot.iter().all(|(property, _)| property != "background-color"));
        assert!(snapshot.contains(&("color".to_string(), "rgb(0, 0, 255)".to_string())));
    }
}

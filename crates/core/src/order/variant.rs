//! Variant option display: labels, images and colour swatches.

use serde::{Deserialize, Deserializer};

use super::VariantOption;

/// Swatch colour for unknown colour names.
pub const FALLBACK_COLOR: &str = "#CCCCCC";

const NAMED_COLORS: &[(&str, &str)] = &[
    ("beige", "#F5F5DC"),
    ("black", "#000000"),
    ("blue", "#0000FF"),
    ("brown", "#A52A2A"),
    ("gray", "#808080"),
    ("grey", "#808080"),
    ("green", "#008000"),
    ("red", "#FF0000"),
    ("white", "#FFFFFF"),
    ("yellow", "#FFFF00"),
    ("orange", "#FFA500"),
    ("pink", "#FFC0CB"),
    ("purple", "#800080"),
    ("navy", "#000080"),
    ("maroon", "#800000"),
    ("olive", "#808000"),
    ("teal", "#008080"),
    ("cyan", "#00FFFF"),
    ("magenta", "#FF00FF"),
    ("lime", "#00FF00"),
    ("silver", "#C0C0C0"),
    ("gold", "#FFD700"),
];

/// Hex value for a colour name, case-insensitive.
#[must_use]
pub fn color_hex(name: &str) -> &'static str {
    let normalized = name.trim().to_lowercase();
    NAMED_COLORS
        .iter()
        .find(|(n, _)| *n == normalized)
        .map_or(FALLBACK_COLOR, |(_, hex)| *hex)
}

/// Parse a colour list stored either as a JSON array or a JSON-encoded string.
///
/// Anything else yields an empty list.
#[must_use]
pub fn parse_color_list(value: &serde_json::Value) -> Vec<String> {
    match value {
        serde_json::Value::Array(items) => items
            .iter()
            .filter_map(|v| v.as_str().map(str::to_owned))
            .collect(),
        serde_json::Value::String(raw) => serde_json::from_str::<Vec<String>>(raw).unwrap_or_default(),
        _ => Vec::new(),
    }
}

pub(super) fn deserialize_colors<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map(parse_color_list).unwrap_or_default())
}

/// What to render for one variant option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionDisplay {
    pub label: String,
    pub image_url: Option<String>,
    pub swatch: Option<String>,
}

impl VariantOption {
    /// Whether the attribute is a colour (`color` or `colour`).
    #[must_use]
    pub fn is_color(&self) -> bool {
        self.attribute_key
            .as_deref()
            .map(|k| k.trim().to_lowercase())
            .is_some_and(|k| k == "color" || k == "colour")
    }

    /// Display data, or `None` when the key or value is missing.
    ///
    /// An image wins over a swatch. Colour options get a swatch from the
    /// first stored colour, else from the colour name.
    #[must_use]
    pub fn display(&self) -> Option<OptionDisplay> {
        self.attribute_key.as_deref().filter(|k| !k.is_empty())?;
        let value = self.value.as_deref().filter(|v| !v.is_empty())?;

        let label = self
            .label
            .as_deref()
            .filter(|l| !l.is_empty())
            .unwrap_or(value)
            .to_owned();

        let image_url = self
            .image_url
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .map(str::to_owned);

        let swatch = if image_url.is_none() && self.is_color() {
            Some(
                self.colors
                    .first()
                    .cloned()
                    .unwrap_or_else(|| color_hex(value).to_owned()),
            )
        } else {
            None
        };

        Some(OptionDisplay {
            label,
            image_url,
            swatch,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn option(key: &str, value: &str) -> VariantOption {
        VariantOption {
            attribute_key: Some(key.to_owned()),
            value: Some(value.to_owned()),
            ..VariantOption::default()
        }
    }

    #[test]
    fn test_color_hex_lookup() {
        assert_eq!(color_hex("Navy"), "#000080");
        assert_eq!(color_hex(" grey "), "#808080");
        assert_eq!(color_hex("chartreuse"), FALLBACK_COLOR);
    }

    #[test]
    fn test_parse_color_list_variants() {
        assert_eq!(
            parse_color_list(&serde_json::json!(["#111111", "#222222"])),
            vec!["#111111", "#222222"]
        );
        assert_eq!(
            parse_color_list(&serde_json::json!("[\"#ABCDEF\"]")),
            vec!["#ABCDEF"]
        );
        assert!(parse_color_list(&serde_json::json!("not json")).is_empty());
        assert!(parse_color_list(&serde_json::json!(42)).is_empty());
    }

    #[test]
    fn test_deserialize_colors_from_string() {
        let opt: VariantOption = serde_json::from_value(serde_json::json!({
            "attributeKey": "color",
            "value": "red",
            "colors": "[\"#FA0000\"]"
        }))
        .unwrap();
        assert_eq!(opt.colors, vec!["#FA0000"]);
        assert_eq!(opt.display().unwrap().swatch.as_deref(), Some("#FA0000"));
    }

    #[test]
    fn test_missing_key_or_value_is_skipped() {
        let mut opt = option("size", "M");
        opt.value = None;
        assert!(opt.display().is_none());
        assert!(VariantOption::default().display().is_none());
    }

    #[test]
    fn test_colour_spelling_and_named_fallback() {
        let display = option(" Colour ", "Gold").display().unwrap();
        assert_eq!(display.swatch.as_deref(), Some("#FFD700"));
        assert_eq!(display.label, "Gold");
    }

    #[test]
    fn test_image_wins_over_swatch() {
        let mut opt = option("color", "red");
        opt.image_url = Some("/img/red.png".to_owned());
        let display = opt.display().unwrap();
        assert_eq!(display.image_url.as_deref(), Some("/img/red.png"));
        assert_eq!(display.swatch, None);
    }

    #[test]
    fn test_non_color_has_no_swatch_and_uses_label() {
        let mut opt = option("size", "xl");
        opt.label = Some("Extra large".to_owned());
        let display = opt.display().unwrap();
        assert_eq!(display.swatch, None);
        assert_eq!(display.label, "Extra large");
    }
}

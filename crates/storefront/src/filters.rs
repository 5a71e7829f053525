//! Custom Askama template filters for the storefront.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Longest card excerpt, in characters, before the ellipsis.
pub const CARD_EXCERPT_CHARS: usize = 140;

/// Footer year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Cache-busting suffix for `main.css`, set by `build.rs`.
///
/// Usage in templates: `{{ ""|css_hash }}`
#[askama::filter_fn]
pub fn css_hash(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<&'static str> {
    Ok(env!("CSS_HASH"))
}

/// Shorten a post excerpt for a card.
///
/// Usage in templates: `{{ excerpt|card_excerpt }}`
#[askama::filter_fn]
pub fn card_excerpt(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(clip_at_word(&value.to_string(), CARD_EXCERPT_CHARS))
}

/// Cut `text` to at most `max` characters on a word boundary, adding `…`.
#[must_use]
pub fn clip_at_word(text: &str, max: usize) -> String {
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if text.chars().count() <= max {
        return text;
    }

    let cut: String = text.chars().take(max).collect();
    let ends_on_word = text.chars().nth(max) == Some(' ');
    let head = match cut.rfind(' ') {
        Some(space) if space > 0 && !ends_on_word => &cut[..space],
        _ => cut.as_str(),
    };
    format!("{}…", head.trim_end_matches([',', '.', ';', ':']))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_untouched() {
        assert_eq!(clip_at_word("Linen  breathes\nwell", 40), "Linen breathes well");
    }

    #[test]
    fn test_clips_on_word_boundary() {
        assert_eq!(
            clip_at_word("Wash linen cold, dry flat, and iron damp.", 18),
            "Wash linen cold…"
        );
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        let armenian = "Սպիտակ վուշե զգեստ ամառվա համար";
        let clipped = clip_at_word(armenian, 12);
        assert_eq!(clipped, "Սպիտակ վուշե…");
    }

    #[test]
    fn test_single_long_word_is_cut() {
        assert_eq!(clip_at_word("abcdefghij", 4), "abcd…");
    }
}

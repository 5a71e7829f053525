//! Free-text search helpers.

/// Trimmed search term as a contains-pattern for `ILIKE`, or `None` when
/// blank.
///
/// `%`, `_` and `\` are escaped so they match literally under the default
/// backslash escape.
///
/// ```
/// use shop_core::search::like_pattern;
///
/// assert_eq!(like_pattern(Some(" linen ")).as_deref(), Some("%linen%"));
/// ```
#[must_use]
pub fn like_pattern(search: Option<&str>) -> Option<String> {
    search
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            let escaped = s
                .replace('\\', "\\\\")
                .replace('%', "\\%")
                .replace('_', "\\_");
            format!("%{escaped}%")
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern(Some(" 50%_off ")).as_deref(), Some("%50\\%\\_off%"));
        assert_eq!(like_pattern(Some(r"a\b")).as_deref(), Some(r"%a\\b%"));
    }

    #[test]
    fn test_blank_search_is_none() {
        assert_eq!(like_pattern(Some("   ")), None);
        assert_eq!(like_pattern(None), None);
    }
}

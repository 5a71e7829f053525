//! Blog post transfer record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{BlogPostId, Language};

/// Blog posts shown per listing page.
pub const BLOG_PAGE_SIZE: u32 = 12;

/// A published blog post in one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub id: BlogPostId,
    pub slug: String,
    pub title: String,
    pub content_html: Option<String>,
    pub excerpt: Option<String>,
    pub featured_image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub published_at: Option<DateTime<Utc>>,
}

impl BlogPost {
    /// Date shown on cards and articles: publication date, else creation date.
    #[must_use]
    pub fn display_date(&self, language: Language) -> String {
        let when = self.published_at.unwrap_or(self.created_at);
        language.format_long_date(when.date_naive())
    }

    /// Trimmed excerpt, if any.
    #[must_use]
    pub fn excerpt(&self) -> Option<&str> {
        self.excerpt
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn post() -> BlogPost {
        let created = Utc.with_ymd_and_hms(2024, 12, 1, 9, 0, 0).unwrap();
        BlogPost {
            id: BlogPostId::generate(),
            slug: "care-guide".to_owned(),
            title: "Care guide".to_owned(),
            content_html: None,
            excerpt: Some("  ".to_owned()),
            featured_image: None,
            created_at: created,
            updated_at: created,
            published_at: Some(Utc.with_ymd_and_hms(2025, 3, 8, 12, 0, 0).unwrap()),
        }
    }

    #[test]
    fn test_display_date_prefers_published_at() {
        assert_eq!(post().display_date(Language::En), "March 8, 2025");
        assert_eq!(post().display_date(Language::Hy), "8 մարտի 2025 թ.");
    }

    #[test]
    fn test_display_date_falls_back_to_created_at() {
        let mut p = post();
        p.published_at = None;
        assert_eq!(p.display_date(Language::Ru), "1 декабря 2024 г.");
    }

    #[test]
    fn test_blank_excerpt_is_none() {
        assert_eq!(post().excerpt(), None);
    }
}

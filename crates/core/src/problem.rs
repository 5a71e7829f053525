//! RFC 7807 problem details.
//!
//! The HTTP crates turn these into `application/problem+json` responses.

use serde::{Deserialize, Serialize};

/// Base URI of problem type identifiers.
pub const PROBLEM_BASE: &str = "https://api.shop.am/problems";

/// Problem details body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    pub instance: String,
}

impl ProblemDetails {
    /// Build a problem for `status`. The type slug and title follow the status.
    #[must_use]
    pub fn new(status: u16, detail: impl Into<String>, instance: impl Into<String>) -> Self {
        let (slug, title) = match status {
            400 => ("bad-request", "Bad Request"),
            401 => ("unauthorized", "Unauthorized"),
            403 => ("forbidden", "Forbidden"),
            404 => ("not-found", "Not Found"),
            409 => ("conflict", "Conflict"),
            429 => ("too-many-requests", "Too Many Requests"),
            _ => ("internal-error", "Internal Server Error"),
        };
        Self {
            kind: format!("{PROBLEM_BASE}/{slug}"),
            title: title.to_owned(),
            status,
            detail: detail.into(),
            instance: instance.into(),
        }
    }

    #[must_use]
    pub fn not_found(detail: impl Into<String>, instance: impl Into<String>) -> Self {
        Self::new(404, detail, instance)
    }

    #[must_use]
    pub fn internal(detail: impl Into<String>, instance: impl Into<String>) -> Self {
        Self::new(500, detail, instance)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_shape() {
        let problem = ProblemDetails::not_found(
            "Blog post not found",
            "http://localhost:3000/api/v1/blog/missing?lang=en",
        );
        let json = serde_json::to_value(&problem).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "https://api.shop.am/problems/not-found",
                "title": "Not Found",
                "status": 404,
                "detail": "Blog post not found",
                "instance": "http://localhost:3000/api/v1/blog/missing?lang=en"
            })
        );
    }

    #[test]
    fn test_unknown_status_is_internal_error() {
        let problem = ProblemDetails::new(503, "down", "/x");
        assert_eq!(problem.kind, "https://api.shop.am/problems/internal-error");
        assert_eq!(problem.title, "Internal Server Error");
        assert_eq!(problem.status, 503);
    }
}

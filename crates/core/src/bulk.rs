//! Tally of best-effort bulk operations.
//!
//! Bulk actions run every item independently; one failure never aborts the
//! rest. Only settled results are counted.

use serde::{Deserialize, Serialize};

/// Result of a bulk operation over `total` items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkOutcome<Id> {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub failed_ids: Vec<Id>,
}

impl<Id> BulkOutcome<Id> {
    /// Tally settled `(id, result)` pairs.
    pub fn tally<T, E>(results: impl IntoIterator<Item = (Id, Result<T, E>)>) -> Self {
        let mut total = 0;
        let mut succeeded = 0;
        let mut failed_ids = Vec::new();
        for (id, result) in results {
            total += 1;
            match result {
                Ok(_) => succeeded += 1,
                Err(_) => failed_ids.push(id),
            }
        }
        Self {
            total,
            succeeded,
            failed: failed_ids.len(),
            failed_ids,
        }
    }

    #[must_use]
    pub const fn is_complete_success(&self) -> bool {
        self.failed == 0
    }

    /// `Bulk delete finished. Success: 3/4`.
    #[must_use]
    pub fn delete_message(&self) -> String {
        format!(
            "Bulk delete finished. Success: {}/{}",
            self.succeeded, self.total
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_count_equals_fulfilled_results() {
        let results = vec![
            (1, Ok::<(), &str>(())),
            (2, Err("gone")),
            (3, Ok(())),
            (4, Err("locked")),
        ];
        let outcome = BulkOutcome::tally(results);
        assert_eq!(outcome.total, 4);
        assert_eq!(outcome.succeeded, 2);
        assert_eq!(outcome.failed, 2);
        assert_eq!(outcome.failed_ids, vec![2, 4]);
        assert!(!outcome.is_complete_success());
        assert_eq!(outcome.delete_message(), "Bulk delete finished. Success: 2/4");
    }

    #[test]
    fn test_empty_tally() {
        let outcome = BulkOutcome::<u8>::tally(Vec::<(u8, Result<(), ()>)>::new());
        assert_eq!(outcome.total, 0);
        assert!(outcome.is_complete_success());
    }
}

//! Best-effort bulk operations.
//!
//! Every item runs concurrently and independently. Failures are logged and
//! tallied, never propagated.

use std::fmt::Display;
use std::future::Future;

use futures::future::join_all;
use sqlx::PgPool;

use shop_core::{BulkOutcome, OrderId, UserId};

use crate::db::{OrderRepository, UserRepository};

/// Run `op` for every id concurrently and tally the settled results.
pub async fn run<Id, T, E, F, Fut>(ids: &[Id], op: F) -> BulkOutcome<Id>
where
    Id: Copy + Display,
    E: Display,
    F: Fn(Id) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let settled = join_all(ids.iter().map(|&id| {
        let fut = op(id);
        async move { (id, fut.await) }
    }))
    .await;

    for (id, result) in &settled {
        if let Err(e) = result {
            tracing::warn!(%id, error = %e, "Bulk item failed");
        }
    }

    BulkOutcome::tally(settled)
}

/// Soft-delete users.
#[tracing::instrument(skip_all, fields(count = ids.len()))]
pub async fn delete_users(pool: &PgPool, ids: &[UserId]) -> BulkOutcome<UserId> {
    let outcome = run(ids, |id| async move { UserRepository::new(pool).soft_delete(id).await }).await;
    tracing::info!(succeeded = outcome.succeeded, total = outcome.total, "Bulk user delete");
    outcome
}

/// Delete orders.
#[tracing::instrument(skip_all, fields(count = ids.len()))]
pub async fn delete_orders(pool: &PgPool, ids: &[OrderId]) -> BulkOutcome<OrderId> {
    let outcome = run(ids, |id| async move { OrderRepository::new(pool).delete(id).await }).await;
    tracing::info!(succeeded = outcome.succeeded, total = outcome.total, "Bulk order delete");
    outcome
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_success_count_matches_fulfilled_items() {
        let ids = [1_u32, 2, 3, 4, 5];
        let outcome = run(&ids, |id| async move {
            if id % 2 == 0 { Err(format!("{id} failed")) } else { Ok(()) }
        })
        .await;

        assert_eq!(outcome.total, 5);
        assert_eq!(outcome.succeeded, 3);
        assert_eq!(outcome.failed_ids, vec![2, 4]);
        assert_eq!(outcome.delete_message(), "Bulk delete finished. Success: 3/5");
    }

    #[tokio::test]
    async fn test_empty_selection_is_noop() {
        let outcome = run(&[] as &[u32], |_| async { Ok::<(), String>(()) }).await;
        assert_eq!(outcome.total, 0);
        assert!(outcome.is_complete_success());
    }
}

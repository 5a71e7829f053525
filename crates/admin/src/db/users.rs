//! User repository for the back-office.
//!
//! Soft-deleted users (`deleted_at IS NOT NULL`) are invisible to every query
//! here.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use shop_core::{Email, PageRequest, Paginated, UserId, UserRole};
use shop_core::search::like_pattern;

use super::{RepositoryError, parse_column};
use crate::models::AdminUserRow;

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct UserRecord {
    id: UserId,
    email: Option<String>,
    phone: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    roles: Vec<String>,
    blocked: bool,
    orders_count: i64,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRecord> for AdminUserRow {
    type Error = RepositoryError;

    fn try_from(row: UserRecord) -> Result<Self, Self::Error> {
        let roles = row
            .roles
            .iter()
            .map(|role| parse_column::<UserRole>("role", role))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            id: row.id,
            email: row.email,
            phone: row.phone,
            first_name: row.first_name,
            last_name: row.last_name,
            roles,
            blocked: row.blocked,
            orders_count: row.orders_count,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct LoginRecord {
    #[sqlx(flatten)]
    user: UserRecord,
    password_hash: Option<String>,
}

const SELECT_USER: &str = r"
    SELECT u.id, u.email, u.phone, u.first_name, u.last_name, u.roles, u.blocked,
           (SELECT COUNT(*) FROM shop.orders o WHERE o.user_id = u.id) AS orders_count,
           u.created_at
    FROM shop.users u
";

/// Outcome of [`UserRepository::upsert_admin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminUpsert {
    Created(UserId),
    Promoted(UserId),
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List users, newest first.
    ///
    /// `search` matches email, phone, first or last name (case-insensitive
    /// substring). `role` keeps users holding that role.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored role is unknown.
    pub async fn list(
        &self,
        search: Option<&str>,
        role: Option<UserRole>,
        page: PageRequest,
    ) -> Result<Paginated<AdminUserRow>, RepositoryError> {
        let pattern = like_pattern(search);
        let role = role.map(UserRole::as_str);

        let total: i64 = sqlx::query_scalar(
            r"
            SELECT COUNT(*)
            FROM shop.users u
            WHERE u.deleted_at IS NULL
              AND ($1::text IS NULL
                   OR u.email ILIKE $1 OR u.phone ILIKE $1
                   OR u.first_name ILIKE $1 OR u.last_name ILIKE $1)
              AND ($2::text IS NULL OR $2 = ANY(u.roles))
            ",
        )
        .bind(pattern.as_deref())
        .bind(role)
        .fetch_one(self.pool)
        .await?;

        let rows = sqlx::query_as::<_, UserRecord>(&format!(
            r"{SELECT_USER}
            WHERE u.deleted_at IS NULL
              AND ($1::text IS NULL
                   OR u.email ILIKE $1 OR u.phone ILIKE $1
                   OR u.first_name ILIKE $1 OR u.last_name ILIKE $1)
              AND ($2::text IS NULL OR $2 = ANY(u.roles))
            ORDER BY u.created_at DESC, u.id
            LIMIT $3 OFFSET $4
            "
        ))
        .bind(pattern.as_deref())
        .bind(role)
        .bind(page.sql_limit())
        .bind(page.offset())
        .fetch_all(self.pool)
        .await?;

        let users = rows
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Paginated::new(
            users,
            u64::try_from(total).unwrap_or_default(),
            page,
        ))
    }

    /// Get a user by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist or was deleted.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: UserId) -> Result<AdminUserRow, RepositoryError> {
        sqlx::query_as::<_, UserRecord>(&format!(
            "{SELECT_USER} WHERE u.id = $1 AND u.deleted_at IS NULL"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?
        .try_into()
    }

    /// Get a user with their password hash for login.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_for_login(
        &self,
        email: &Email,
    ) -> Result<Option<(AdminUserRow, Option<String>)>, RepositoryError> {
        let row = sqlx::query_as::<_, LoginRecord>(
            r"
            SELECT u.id, u.email, u.phone, u.first_name, u.last_name, u.roles, u.blocked,
                   0::BIGINT AS orders_count, u.created_at, u.password_hash
            FROM shop.users u
            WHERE LOWER(u.email) = $1 AND u.deleted_at IS NULL
            ",
        )
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        match row {
            Some(r) => Ok(Some((AdminUserRow::try_from(r.user)?, r.password_hash))),
            None => Ok(None),
        }
    }

    /// Flip the `blocked` flag and return the updated user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn toggle_blocked(&self, id: UserId) -> Result<AdminUserRow, RepositoryError> {
        let updated = sqlx::query(
            r"
            UPDATE shop.users
            SET blocked = NOT blocked, updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            ",
        )
        .bind(id)
        .execute(self.pool)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        self.get(id).await
    }

    /// Apply a partial update and return the updated user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn update(
        &self,
        id: UserId,
        blocked: Option<bool>,
        roles: Option<&[UserRole]>,
    ) -> Result<AdminUserRow, RepositoryError> {
        let roles: Option<Vec<String>> =
            roles.map(|roles| roles.iter().map(|r| r.as_str().to_owned()).collect());

        let updated = sqlx::query(
            r"
            UPDATE shop.users
            SET blocked = COALESCE($2, blocked),
                roles = COALESCE($3, roles),
                updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            ",
        )
        .bind(id)
        .bind(blocked)
        .bind(roles)
        .execute(self.pool)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        self.get(id).await
    }

    /// Soft-delete a user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn soft_delete(&self, id: UserId) -> Result<(), RepositoryError> {
        let deleted = sqlx::query(
            r"
            UPDATE shop.users
            SET deleted_at = NOW(), updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            ",
        )
        .bind(id)
        .execute(self.pool)
        .await?;

        if deleted.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Number of active users, and how many of them are admins.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn counts(&self) -> Result<(i64, i64), RepositoryError> {
        let counts = sqlx::query_as::<_, (i64, i64)>(
            r"
            SELECT COUNT(*),
                   COUNT(*) FILTER (WHERE 'admin' = ANY(roles))
            FROM shop.users
            WHERE deleted_at IS NULL
            ",
        )
        .fetch_one(self.pool)
        .await?;

        Ok(counts)
    }

    /// Create an admin account, or promote and re-key an existing user.
    ///
    /// Promotion adds the `admin` role, sets the password and unblocks the
    /// account.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn upsert_admin(
        &self,
        email: &Email,
        password_hash: &str,
        first_name: Option<&str>,
        last_name: Option<&str>,
    ) -> Result<AdminUpsert, RepositoryError> {
        let existing: Option<UserId> = sqlx::query_scalar(
            "SELECT id FROM shop.users WHERE LOWER(email) = $1 AND deleted_at IS NULL",
        )
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        if let Some(id) = existing {
            sqlx::query(
                r"
                UPDATE shop.users
                SET roles = CASE WHEN 'admin' = ANY(roles) THEN roles
                                 ELSE array_prepend('admin', roles) END,
                    password_hash = $2,
                    blocked = FALSE,
                    first_name = COALESCE($3, first_name),
                    last_name = COALESCE($4, last_name),
                    updated_at = NOW()
                WHERE id = $1
                ",
            )
            .bind(id)
            .bind(password_hash)
            .bind(first_name)
            .bind(last_name)
            .execute(self.pool)
            .await?;
            return Ok(AdminUpsert::Promoted(id));
        }

        let id = UserId::generate();
        sqlx::query(
            r"
            INSERT INTO shop.users (id, email, first_name, last_name, roles, password_hash)
            VALUES ($1, $2, $3, $4, ARRAY['admin', 'customer'], $5)
            ",
        )
        .bind(id)
        .bind(email.as_str())
        .bind(first_name)
        .bind(last_name)
        .bind(password_hash)
        .execute(self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                RepositoryError::Conflict(format!("email already in use: {email}"))
            }
            other => RepositoryError::Database(other),
        })?;

        Ok(AdminUpsert::Created(id))
    }
}

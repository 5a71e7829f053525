//! Order repository for the back-office.
//!
//! Orders are assembled from `orders`, the ordering user, the latest payment
//! and the order lines. Addresses, totals and variant options are JSONB.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use sqlx::types::Json;

use shop_core::order::{
    Address, OrderCustomer, OrderDetails, OrderItem, OrderPayment, OrderTotals, VariantOption,
};
use shop_core::{Currency, OrderId, OrderItemId, OrderStatus, PageRequest, Paginated, UserId};
use shop_core::search::like_pattern;

use super::{RepositoryError, parse_column};
use crate::models::{OrderRow, OrderUpdate};

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct OrderListRecord {
    id: OrderId,
    number: String,
    status: String,
    payment_status: String,
    fulfillment_status: String,
    total: Decimal,
    currency: String,
    customer_email: Option<String>,
    customer_phone: Option<String>,
    items_count: i64,
    created_at: DateTime<Utc>,
}

impl TryFrom<OrderListRecord> for OrderRow {
    type Error = RepositoryError;

    fn try_from(row: OrderListRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            number: row.number,
            status: parse_column("order status", &row.status)?,
            payment_status: parse_column("payment status", &row.payment_status)?,
            fulfillment_status: parse_column("fulfillment status", &row.fulfillment_status)?,
            total: row.total,
            currency: parse_column("currency", &row.currency)?,
            customer_email: row.customer_email,
            customer_phone: row.customer_phone,
            items_count: row.items_count,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct OrderRecord {
    id: OrderId,
    number: String,
    status: String,
    payment_status: String,
    fulfillment_status: String,
    currency: String,
    total: Decimal,
    subtotal: Option<Decimal>,
    shipping_amount: Option<Decimal>,
    discount_amount: Option<Decimal>,
    tax_amount: Option<Decimal>,
    totals: Option<Json<OrderTotals>>,
    customer_email: Option<String>,
    customer_phone: Option<String>,
    shipping_method: String,
    shipping_address: Option<Json<Address>>,
    billing_address: Option<Json<Address>>,
    notes: Option<String>,
    admin_notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
    user_id: Option<UserId>,
    user_first_name: Option<String>,
    user_last_name: Option<String>,
    user_email: Option<String>,
    user_phone: Option<String>,
}

#[derive(Debug, sqlx::FromRow)]
struct PaymentRecord {
    provider: Option<String>,
    method: Option<String>,
    amount: Option<Decimal>,
    currency: Option<String>,
    status: Option<String>,
    card_last4: Option<String>,
    card_brand: Option<String>,
}

impl TryFrom<PaymentRecord> for OrderPayment {
    type Error = RepositoryError;

    fn try_from(row: PaymentRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            provider: row.provider,
            method: row.method,
            amount: row.amount,
            currency: row
                .currency
                .as_deref()
                .map(|c| parse_column::<Currency>("payment currency", c))
                .transpose()?,
            status: row
                .status
                .as_deref()
                .map(|s| parse_column("payment status", s))
                .transpose()?,
            card_last4: row.card_last4,
            card_brand: row.card_brand,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ItemRecord {
    id: OrderItemId,
    product_title: String,
    sku: Option<String>,
    quantity: i32,
    unit_price: Decimal,
    total: Decimal,
    variant_options: Json<Vec<VariantOption>>,
}

impl From<ItemRecord> for OrderItem {
    fn from(row: ItemRecord) -> Self {
        Self {
            id: row.id,
            product_title: row.product_title,
            sku: row.sku,
            quantity: row.quantity,
            unit_price: row.unit_price,
            total: row.total,
            variant_options: row.variant_options.0,
        }
    }
}

fn assemble(
    row: OrderRecord,
    payment: Option<OrderPayment>,
    items: Vec<OrderItem>,
) -> Result<OrderDetails, RepositoryError> {
    let customer = row.user_id.map(|id| OrderCustomer {
        id: Some(id),
        first_name: row.user_first_name,
        last_name: row.user_last_name,
        email: row.user_email,
        phone: row.user_phone,
    });

    Ok(OrderDetails {
        id: row.id,
        number: row.number,
        status: parse_column("order status", &row.status)?,
        payment_status: parse_column("payment status", &row.payment_status)?,
        fulfillment_status: parse_column("fulfillment status", &row.fulfillment_status)?,
        total: row.total,
        currency: parse_column("currency", &row.currency)?,
        subtotal: row.subtotal,
        shipping_amount: row.shipping_amount,
        discount_amount: row.discount_amount,
        tax_amount: row.tax_amount,
        totals: row.totals.map(|t| t.0),
        customer_email: row.customer_email,
        customer_phone: row.customer_phone,
        customer,
        billing_address: row.billing_address.map(|a| a.0),
        shipping_address: row.shipping_address.map(|a| a.0),
        shipping_method: row.shipping_method.into(),
        notes: row.notes,
        admin_notes: row.admin_notes,
        payment,
        items,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List orders, newest first.
    ///
    /// `search` matches the order number, customer email or phone.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored status is unknown.
    pub async fn list(
        &self,
        status: Option<OrderStatus>,
        search: Option<&str>,
        page: PageRequest,
    ) -> Result<Paginated<OrderRow>, RepositoryError> {
        let status = status.map(OrderStatus::as_str);
        let pattern = like_pattern(search);

        let total: i64 = sqlx::query_scalar(
            r"
            SELECT COUNT(*)
            FROM shop.orders o
            WHERE ($1::text IS NULL OR o.status = $1)
              AND ($2::text IS NULL
                   OR o.number ILIKE $2 OR o.customer_email ILIKE $2 OR o.customer_phone ILIKE $2)
            ",
        )
        .bind(status)
        .bind(pattern.as_deref())
        .fetch_one(self.pool)
        .await?;

        let rows = sqlx::query_as::<_, OrderListRecord>(
            r"
            SELECT o.id, o.number, o.status, o.payment_status, o.fulfillment_status,
                   o.total, o.currency, o.customer_email, o.customer_phone,
                   (SELECT COALESCE(SUM(i.quantity), 0)::BIGINT
                    FROM shop.order_items i WHERE i.order_id = o.id) AS items_count,
                   o.created_at
            FROM shop.orders o
            WHERE ($1::text IS NULL OR o.status = $1)
              AND ($2::text IS NULL
                   OR o.number ILIKE $2 OR o.customer_email ILIKE $2 OR o.customer_phone ILIKE $2)
            ORDER BY o.created_at DESC, o.id
            LIMIT $3 OFFSET $4
            ",
        )
        .bind(status)
        .bind(pattern.as_deref())
        .bind(page.sql_limit())
        .bind(page.offset())
        .fetch_all(self.pool)
        .await?;

        let orders = rows
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Paginated::new(
            orders,
            u64::try_from(total).unwrap_or_default(),
            page,
        ))
    }

    /// Load an order with its customer, latest payment and lines.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order does not exist.
    /// Returns `RepositoryError::Database` if a query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored value is invalid.
    pub async fn get(&self, id: OrderId) -> Result<OrderDetails, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRecord>(
            r"
            SELECT o.id, o.number, o.status, o.payment_status, o.fulfillment_status,
                   o.currency, o.total, o.subtotal, o.shipping_amount, o.discount_amount,
                   o.tax_amount, o.totals, o.customer_email, o.customer_phone,
                   o.shipping_method, o.shipping_address, o.billing_address,
                   o.notes, o.admin_notes, o.created_at, o.updated_at,
                   u.id AS user_id, u.first_name AS user_first_name,
                   u.last_name AS user_last_name, u.email AS user_email,
                   u.phone AS user_phone
            FROM shop.orders o
            LEFT JOIN shop.users u ON u.id = o.user_id
            WHERE o.id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        let payment = sqlx::query_as::<_, PaymentRecord>(
            r"
            SELECT provider, method, amount, currency, status, card_last4, card_brand
            FROM shop.payments
            WHERE order_id = $1
            ORDER BY created_at DESC
            LIMIT 1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .map(TryInto::try_into)
        .transpose()?;

        let items = sqlx::query_as::<_, ItemRecord>(
            r"
            SELECT id, product_title, sku, quantity, unit_price, total, variant_options
            FROM shop.order_items
            WHERE order_id = $1
            ORDER BY position, id
            ",
        )
        .bind(id)
        .fetch_all(self.pool)
        .await?
        .into_iter()
        .map(OrderItem::from)
        .collect();

        assemble(row, payment, items)
    }

    /// Apply status and notes changes, then reload the order.
    ///
    /// Blank admin notes clear the stored notes.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order does not exist.
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn update(
        &self,
        id: OrderId,
        update: &OrderUpdate,
    ) -> Result<OrderDetails, RepositoryError> {
        let updated = sqlx::query(
            r"
            UPDATE shop.orders
            SET status = COALESCE($2, status),
                payment_status = COALESCE($3, payment_status),
                fulfillment_status = COALESCE($4, fulfillment_status),
                admin_notes = CASE WHEN $5::text IS NULL THEN admin_notes
                                   ELSE NULLIF(TRIM($5), '') END,
                updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(id)
        .bind(update.status.map(|s| s.as_str()))
        .bind(update.payment_status.map(|s| s.as_str()))
        .bind(update.fulfillment_status.map(|s| s.as_str()))
        .bind(update.admin_notes.as_deref())
        .execute(self.pool)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        self.get(id).await
    }

    /// Delete an order with its lines and payments.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order does not exist.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: OrderId) -> Result<(), RepositoryError> {
        let deleted = sqlx::query("DELETE FROM shop.orders WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if deleted.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Total number of orders and how many are still pending.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn counts(&self) -> Result<(i64, i64), RepositoryError> {
        let counts = sqlx::query_as::<_, (i64, i64)>(
            "SELECT COUNT(*), COUNT(*) FILTER (WHERE status = 'pending') FROM shop.orders",
        )
        .fetch_one(self.pool)
        .await?;

        Ok(counts)
    }
}

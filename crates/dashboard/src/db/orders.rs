//! Order and tracking repository for the dashboard store.
//!
//! Rows are canonical by construction: the sync write path stores the raw
//! upstream status string and reads classify it with the same pure
//! classifier every other consumer uses.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use shipdesk_core::{
    CanonicalOrder, Customer, LastUpdate, LineItem, ShippingAddress, Source, TrackingEvent,
    classify,
};

use super::RepositoryError;

// =============================================================================
// Row Types
// =============================================================================

/// Internal row type for order queries, joined with the latest tracking
/// event for the order's AWB.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    order_id: String,
    awb: Option<String>,
    customer_name: Option<String>,
    customer_phone: Option<String>,
    customer_email: Option<String>,
    status: String,
    courier: Option<String>,
    payment_mode: Option<String>,
    address: Option<String>,
    city: Option<String>,
    state: Option<String>,
    pincode: Option<String>,
    created_at: DateTime<Utc>,
    last_event_at: Option<DateTime<Utc>>,
    last_event_location: Option<String>,
    last_event_remark: Option<String>,
}

#[derive(Debug, sqlx::FromRow)]
struct ItemRow {
    order_id: Uuid,
    name: String,
    quantity: i64,
    total: Decimal,
}

#[derive(Debug, sqlx::FromRow)]
struct EventRow {
    event_time: Option<DateTime<Utc>>,
    location: Option<String>,
    status: Option<String>,
    remark: Option<String>,
}

const ORDER_COLUMNS: &str = r"
    o.id, o.order_id, o.awb, o.customer_name, o.customer_phone, o.customer_email,
    o.status, o.courier, o.payment_mode, o.address, o.city, o.state, o.pincode,
    o.created_at,
    t.event_time AS last_event_at,
    t.location AS last_event_location,
    t.remark AS last_event_remark
";

const LATEST_EVENT_JOIN: &str = r"
    LEFT JOIN LATERAL (
        SELECT event_time, location, remark
        FROM tracking_events
        WHERE awb = o.awb
        ORDER BY event_time DESC NULLS LAST
        LIMIT 1
    ) t ON TRUE
";

fn canonical_from_row(row: OrderRow, line_items: Vec<LineItem>) -> CanonicalOrder {
    let shipping_address = if row.address.is_none()
        && row.city.is_none()
        && row.state.is_none()
        && row.pincode.is_none()
    {
        None
    } else {
        Some(ShippingAddress {
            address: row.address,
            city: row.city,
            state: row.state,
            pincode: row.pincode,
        })
    };

    CanonicalOrder {
        id: row.id.to_string(),
        order_id: row.order_id,
        awb: row.awb.filter(|awb| !awb.is_empty()),
        customer: Customer {
            name: row.customer_name,
            phone: row.customer_phone,
            email: row.customer_email,
        },
        status: classify(&row.status),
        courier: row.courier,
        payment_mode: row.payment_mode,
        line_items,
        shipping_address,
        created_at: Some(row.created_at),
        last_update: LastUpdate {
            timestamp: row
                .last_event_at
                .map(|at| at.to_rfc3339())
                .unwrap_or_default(),
            location: row.last_event_location.unwrap_or_default(),
            remark: row.last_event_remark.unwrap_or_default(),
        },
        source: Source::Database,
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for order and tracking queries against the dashboard store.
#[derive(Clone)]
pub struct OrderRepository {
    pool: PgPool,
}

impl OrderRepository {
    /// Create a new order repository.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetch one page of orders, newest first, with line items and the most
    /// recent tracking event attached.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list_orders(
        &self,
        page: u32,
        page_size: u32,
    ) -> Result<(Vec<CanonicalOrder>, u64), RepositoryError> {
        let limit = i64::from(page_size.max(1));
        let offset = i64::from(page.max(1) - 1) * limit;

        let sql = format!(
            "SELECT {ORDER_COLUMNS} FROM orders o {LATEST_EVENT_JOIN} \
             ORDER BY o.created_at DESC LIMIT $1 OFFSET $2"
        );
        let rows: Vec<OrderRow> = sqlx::query_as(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(&self.pool)
            .await?;

        let orders = self.attach_items(rows).await?;
        Ok((orders, u64::try_from(total).unwrap_or_default()))
    }

    /// Fetch the complete order collection, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list_all_orders(&self) -> Result<Vec<CanonicalOrder>, RepositoryError> {
        let sql = format!(
            "SELECT {ORDER_COLUMNS} FROM orders o {LATEST_EVENT_JOIN} \
             ORDER BY o.created_at DESC"
        );
        let rows: Vec<OrderRow> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;
        self.attach_items(rows).await
    }

    /// Look up the order a waybill belongs to.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_awb(
        &self,
        awb: &str,
    ) -> Result<Option<CanonicalOrder>, RepositoryError> {
        let sql = format!("SELECT {ORDER_COLUMNS} FROM orders o {LATEST_EVENT_JOIN} WHERE o.awb = $1");
        let row: Option<OrderRow> = sqlx::query_as(&sql)
            .bind(awb)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(self.attach_items(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    /// Tracking events for an AWB in feed order (oldest first).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn tracking_history(
        &self,
        awb: &str,
    ) -> Result<Vec<TrackingEvent>, RepositoryError> {
        let rows: Vec<EventRow> = sqlx::query_as(
            "SELECT event_time, location, status, remark FROM tracking_events \
             WHERE awb = $1 ORDER BY event_time ASC NULLS LAST",
        )
        .bind(awb)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| TrackingEvent {
                timestamp: row.event_time.map(|at| at.to_rfc3339()),
                location: row.location,
                status: row.status,
                activity: row.remark,
            })
            .collect())
    }

    /// Idempotent write-through for channel sync, keyed on the
    /// business-visible order id. Line items are replaced wholesale.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails; the
    /// transaction rolls back as a unit.
    pub async fn upsert_order(&self, order: &CanonicalOrder) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let address = order.shipping_address.clone().unwrap_or_default();
        let id: Uuid = sqlx::query_scalar(
            r"
            INSERT INTO orders (order_id, awb, customer_name, customer_phone, customer_email,
                                status, courier, payment_mode, address, city, state, pincode,
                                created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            ON CONFLICT (order_id) DO UPDATE SET
                awb = EXCLUDED.awb,
                customer_name = EXCLUDED.customer_name,
                customer_phone = EXCLUDED.customer_phone,
                customer_email = EXCLUDED.customer_email,
                status = EXCLUDED.status,
                courier = EXCLUDED.courier,
                payment_mode = EXCLUDED.payment_mode,
                address = EXCLUDED.address,
                city = EXCLUDED.city,
                state = EXCLUDED.state,
                pincode = EXCLUDED.pincode,
                updated_at = now()
            RETURNING id
            ",
        )
        .bind(&order.order_id)
        .bind(order.awb.as_deref())
        .bind(order.customer.name.as_deref())
        .bind(order.customer.phone.as_deref())
        .bind(order.customer.email.as_deref())
        .bind(order.status.label())
        .bind(order.courier.as_deref())
        .bind(order.payment_mode.as_deref())
        .bind(address.address.as_deref())
        .bind(address.city.as_deref())
        .bind(address.state.as_deref())
        .bind(address.pincode.as_deref())
        .bind(order.created_at.unwrap_or_else(Utc::now))
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM order_items WHERE order_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        for item in &order.line_items {
            sqlx::query(
                "INSERT INTO order_items (order_id, name, quantity, total) VALUES ($1, $2, $3, $4)",
            )
            .bind(id)
            .bind(&item.name)
            .bind(item.quantity)
            .bind(item.total)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Attach line items to a batch of order rows with one query.
    async fn attach_items(
        &self,
        rows: Vec<OrderRow>,
    ) -> Result<Vec<CanonicalOrder>, RepositoryError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
        let items: Vec<ItemRow> = sqlx::query_as(
            "SELECT order_id, name, quantity, total FROM order_items WHERE order_id = ANY($1)",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_order: HashMap<Uuid, Vec<LineItem>> = HashMap::new();
        for item in items {
            by_order.entry(item.order_id).or_default().push(LineItem {
                name: item.name,
                quantity: item.quantity,
                total: item.total,
            });
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let line_items = by_order.remove(&row.id).unwrap_or_default();
                canonical_from_row(row, line_items)
            })
            .collect())
    }
}

use crate::domain::error::DomainError;
use crate::domain::order::{LineItem, Order, OrderStatus, ShippingAddress};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::{error, info};
use uuid::Uuid;

#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Persists the order and reserves stock for every line item in one
    /// transaction. If any product is missing or short on stock, nothing is
    /// written and no stock changes.
    async fn create(&self, order: Order) -> Result<Order, DomainError>;
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Order>, DomainError>;
}

#[derive(Clone)]
pub struct PgOrderRepository {
    pool: PgPool,
}

impl PgOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    user_id: Uuid,
    total_amount: Decimal,
    street: String,
    city: String,
    state: String,
    zip_code: String,
    country: String,
    status: String,
    created_at: DateTime<Utc>,
}

fn db_err(context: &str, e: sqlx::Error) -> DomainError {
    error!("{}: {}", context, e);
    DomainError::Internal(format!("database error: {}", e))
}

#[async_trait]
impl OrderRepository for PgOrderRepository {
    async fn create(&self, order: Order) -> Result<Order, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_err("failed to begin order transaction", e))?;

        // Compare-and-swap decrement per product. A miss means the product
        // vanished or another order got the stock first; either way the
        // transaction rolls back untouched.
        for item in &order.items {
            let updated = sqlx::query(
                r#"
                UPDATE products
                SET stock = stock - $1
                WHERE id = $2 AND stock >= $1
                "#,
            )
            .bind(item.quantity)
            .bind(item.product_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| db_err("failed to reserve stock", e))?;

            if updated.rows_affected() == 0 {
                let name: Option<String> =
                    sqlx::query_scalar("SELECT name FROM products WHERE id = $1")
                        .bind(item.product_id)
                        .fetch_optional(&mut *tx)
                        .await
                        .map_err(|e| db_err("failed to check product", e))?;

                return Err(match name {
                    Some(name) => DomainError::InsufficientStock(name),
                    None => DomainError::ProductNotFound(item.product_id),
                });
            }
        }

        sqlx::query(
            r#"
            INSERT INTO orders
                (id, user_id, total_amount, street, city, state, zip_code, country, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(order.id)
        .bind(order.user_id)
        .bind(order.total_amount)
        .bind(&order.shipping_address.street)
        .bind(&order.shipping_address.city)
        .bind(&order.shipping_address.state)
        .bind(&order.shipping_address.zip_code)
        .bind(&order.shipping_address.country)
        .bind(order.status.as_str())
        .bind(order.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| db_err("failed to create order", e))?;

        for item in &order.items {
            sqlx::query(
                r#"
                INSERT INTO order_items (order_id, product_id, name, price, quantity)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(order.id)
            .bind(item.product_id)
            .bind(&item.name)
            .bind(item.price)
            .bind(item.quantity)
            .execute(&mut *tx)
            .await
            .map_err(|e| db_err("failed to insert order item", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| db_err("failed to commit order", e))?;

        info!(order_id = %order.id, user_id = %order.user_id, total = %order.total_amount, "order created");
        Ok(order)
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Order>, DomainError> {
        let rows = sqlx::query_as::<_, OrderRow>(
            r#"
            SELECT id, user_id, total_amount, street, city, state, zip_code, country, status, created_at
            FROM orders
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_err("failed to list orders", e))?;

        let mut orders = Vec::with_capacity(rows.len());
        for row in rows {
            let items = sqlx::query_as::<_, LineItem>(
                r#"
                SELECT product_id, name, price, quantity
                FROM order_items
                WHERE order_id = $1
                "#,
            )
            .bind(row.id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_err("failed to load order items", e))?;

            let status = row
                .status
                .parse::<OrderStatus>()
                .map_err(DomainError::Internal)?;

            orders.push(Order {
                id: row.id,
                user_id: row.user_id,
                items,
                total_amount: row.total_amount,
                shipping_address: ShippingAddress {
                    street: row.street,
                    city: row.city,
                    state: row.state,
                    zip_code: row.zip_code,
                    country: row.country,
                },
                status,
                created_at: row.created_at,
            });
        }

        Ok(orders)
    }
}

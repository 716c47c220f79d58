use crate::domain::error::DomainError;
use crate::domain::product::Product;
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{error, info};
use uuid::Uuid;

#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Product>, DomainError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, DomainError>;
    /// Destructive: clears the catalog before inserting the given products.
    async fn replace_all(&self, products: Vec<Product>) -> Result<(), DomainError>;
}

#[derive(Clone)]
pub struct PgProductRepository {
    pool: PgPool,
}

impl PgProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn list(&self) -> Result<Vec<Product>, DomainError> {
        sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, description, price, category, image, stock, created_at
            FROM products
            ORDER BY created_at
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to list products: {}", e);
            DomainError::Internal(format!("database error: {}", e))
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, DomainError> {
        sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, description, price, category, image, stock, created_at
            FROM products
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to find product by id {}: {}", id, e);
            DomainError::Internal(format!("database error: {}", e))
        })
    }

    async fn replace_all(&self, products: Vec<Product>) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            error!("failed to begin transaction: {}", e);
            DomainError::Internal(format!("database error: {}", e))
        })?;

        sqlx::query("DELETE FROM products")
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                error!("failed to clear products: {}", e);
                DomainError::Internal(format!("database error: {}", e))
            })?;

        for product in &products {
            sqlx::query(
                r#"
                INSERT INTO products (id, name, description, price, category, image, stock, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
            )
            .bind(product.id)
            .bind(&product.name)
            .bind(&product.description)
            .bind(product.price)
            .bind(&product.category)
            .bind(&product.image)
            .bind(product.stock)
            .bind(product.created_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                error!("failed to insert product {}: {}", product.name, e);
                DomainError::Internal(format!("database error: {}", e))
            })?;
        }

        tx.commit().await.map_err(|e| {
            error!("failed to commit product seed: {}", e);
            DomainError::Internal(format!("database error: {}", e))
        })?;

        info!(count = products.len(), "catalog replaced");
        Ok(())
    }
}

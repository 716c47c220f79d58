use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub category: String,
    pub image: String,
    pub stock: i32,
    pub created_at: DateTime<Utc>,
}

impl Product {
    pub fn new(
        name: String,
        description: String,
        price: Decimal,
        category: String,
        image: String,
        stock: i32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            description,
            price,
            category,
            image,
            stock,
            created_at: Utc::now(),
        }
    }
}

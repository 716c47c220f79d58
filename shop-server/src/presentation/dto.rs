use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::order::{Order, OrderStatus, ShippingAddress};
use crate::domain::product::Product;
use crate::domain::user::User;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct UserView {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub message: String,
    pub token: String,
    pub user: UserView,
}

// ======================= ORDERS =======================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRequest {
    pub product_id: Uuid,
    pub quantity: i32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub products: Vec<OrderItemRequest>,
    pub shipping_address: ShippingAddress,
}

/// The created order plus the denormalized view the client renders
/// immediately: the owner and the line-item snapshots.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedOrderView {
    #[serde(flatten)]
    pub order: Order,
    pub user: UserView,
    pub product_details: Vec<crate::domain::order::LineItem>,
}

#[derive(Debug, Serialize)]
pub struct CreateOrderResponse {
    pub message: String,
    pub order: PlacedOrderView,
}

/// One past order with product references resolved to current catalog
/// entries where they still exist.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderHistoryView {
    pub id: Uuid,
    pub user_id: Uuid,
    pub products: Vec<OrderHistoryItem>,
    pub total_amount: Decimal,
    pub shipping_address: ShippingAddress,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderHistoryItem {
    #[serde(rename = "productId")]
    pub product: Option<Product>,
    pub name: String,
    pub price: Decimal,
    pub quantity: i32,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

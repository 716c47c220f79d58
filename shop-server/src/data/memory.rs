//! In-memory repositories for service tests. They mirror the Postgres
//! semantics: unique user emails and all-or-nothing stock reservation.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use uuid::Uuid;

use crate::data::order_repository::OrderRepository;
use crate::data::product_repository::ProductRepository;
use crate::data::user_repository::UserRepository;
use crate::domain::error::DomainError;
use crate::domain::order::Order;
use crate::domain::product::Product;
use crate::domain::user::User;

#[derive(Default)]
pub struct MemStore {
    pub users: Mutex<Vec<User>>,
    pub products: Mutex<Vec<Product>>,
    pub orders: Mutex<Vec<Order>>,
}

impl MemStore {
    pub fn with_products(products: Vec<Product>) -> Arc<Self> {
        let store = Self::default();
        *store.products.lock().unwrap() = products;
        Arc::new(store)
    }

    pub fn stock_of(&self, product_id: Uuid) -> Option<i32> {
        self.products
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == product_id)
            .map(|p| p.stock)
    }
}

pub struct MemUserRepository(pub Arc<MemStore>);

#[async_trait]
impl UserRepository for MemUserRepository {
    async fn create(&self, user: User) -> Result<User, DomainError> {
        let mut users = self.0.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email) {
            return Err(DomainError::DuplicateUser(user.email));
        }
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        Ok(self
            .0
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        Ok(self
            .0
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id)
            .cloned())
    }
}

pub struct MemProductRepository(pub Arc<MemStore>);

#[async_trait]
impl ProductRepository for MemProductRepository {
    async fn list(&self) -> Result<Vec<Product>, DomainError> {
        Ok(self.0.products.lock().unwrap().clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, DomainError> {
        Ok(self
            .0
            .products
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn replace_all(&self, products: Vec<Product>) -> Result<(), DomainError> {
        *self.0.products.lock().unwrap() = products;
        Ok(())
    }
}

pub struct MemOrderRepository(pub Arc<MemStore>);

#[async_trait]
impl OrderRepository for MemOrderRepository {
    async fn create(&self, order: Order) -> Result<Order, DomainError> {
        let mut products = self.0.products.lock().unwrap();

        // Validate everything before touching any stock value.
        for item in &order.items {
            let product = products
                .iter()
                .find(|p| p.id == item.product_id)
                .ok_or(DomainError::ProductNotFound(item.product_id))?;
            if product.stock < item.quantity {
                return Err(DomainError::InsufficientStock(product.name.clone()));
            }
        }

        for item in &order.items {
            let product = products
                .iter_mut()
                .find(|p| p.id == item.product_id)
                .expect("validated above");
            product.stock -= item.quantity;
        }

        self.0.orders.lock().unwrap().push(order.clone());
        Ok(order)
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Order>, DomainError> {
        let mut orders: Vec<Order> = self
            .0
            .orders
            .lock()
            .unwrap()
            .iter()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }
}

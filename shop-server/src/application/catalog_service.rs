use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::instrument;

use crate::data::product_repository::ProductRepository;
use crate::domain::{error::DomainError, product::Product};

#[derive(Clone)]
pub struct CatalogService<R: ProductRepository + 'static> {
    repo: Arc<R>,
}

impl<R> CatalogService<R>
where
    R: ProductRepository + 'static,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn list_products(&self) -> Result<Vec<Product>, DomainError> {
        self.repo.list().await
    }

    /// Clears the catalog and inserts the sample products.
    #[instrument(skip(self))]
    pub async fn seed_products(&self) -> Result<(), DomainError> {
        self.repo.replace_all(sample_products()).await
    }
}

pub fn sample_products() -> Vec<Product> {
    vec![
        Product::new(
            "Smartphone X".into(),
            "Latest smartphone with advanced features".into(),
            Decimal::new(69_999, 2),
            "Electronics".into(),
            "https://via.placeholder.com/300".into(),
            50,
        ),
        Product::new(
            "Laptop Pro".into(),
            "High-performance laptop for professionals".into(),
            Decimal::new(129_999, 2),
            "Electronics".into(),
            "https://via.placeholder.com/300".into(),
            30,
        ),
        Product::new(
            "Wireless Headphones".into(),
            "Noise-cancelling wireless headphones".into(),
            Decimal::new(19_999, 2),
            "Electronics".into(),
            "https://via.placeholder.com/300".into(),
            100,
        ),
        Product::new(
            "Running Shoes".into(),
            "Comfortable running shoes for athletes".into(),
            Decimal::new(8_999, 2),
            "Sports".into(),
            "https://via.placeholder.com/300".into(),
            75,
        ),
        Product::new(
            "Coffee Maker".into(),
            "Automatic coffee maker with timer".into(),
            Decimal::new(14_999, 2),
            "Home".into(),
            "https://via.placeholder.com/300".into(),
            40,
        ),
    ]
}

//! Standalone catalog seeder. Clears the products table and inserts the
//! sample catalog, same as POST /api/seed-products on the server.

use rust_decimal::Decimal;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

struct SampleProduct {
    name: &'static str,
    description: &'static str,
    price: Decimal,
    category: &'static str,
    image: &'static str,
    stock: i32,
}

fn sample_products() -> Vec<SampleProduct> {
    vec![
        SampleProduct {
            name: "Smartphone X",
            description: "Latest smartphone with advanced features",
            price: Decimal::new(69_999, 2),
            category: "Electronics",
            image: "https://via.placeholder.com/300",
            stock: 50,
        },
        SampleProduct {
            name: "Laptop Pro",
            description: "High-performance laptop for professionals",
            price: Decimal::new(129_999, 2),
            category: "Electronics",
            image: "https://via.placeholder.com/300",
            stock: 30,
        },
        SampleProduct {
            name: "Wireless Headphones",
            description: "Noise-cancelling wireless headphones",
            price: Decimal::new(19_999, 2),
            category: "Electronics",
            image: "https://via.placeholder.com/300",
            stock: 100,
        },
        SampleProduct {
            name: "Running Shoes",
            description: "Comfortable running shoes for athletes",
            price: Decimal::new(8_999, 2),
            category: "Sports",
            image: "https://via.placeholder.com/300",
            stock: 75,
        },
        SampleProduct {
            name: "Coffee Maker",
            description: "Automatic coffee maker with timer",
            price: Decimal::new(14_999, 2),
            category: "Home",
            image: "https://via.placeholder.com/300",
            stock: 40,
        },
    ]
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "postgres://localhost:5432/ecommerce".into());

    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&database_url)
        .await?;
    println!("Connected to PostgreSQL");

    sqlx::migrate!("../shop-server/migrations").run(&pool).await?;

    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM products").execute(&mut *tx).await?;
    println!("Cleared existing products");

    for product in sample_products() {
        sqlx::query(
            r#"
            INSERT INTO products (id, name, description, price, category, image, stock)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(product.name)
        .bind(product.description)
        .bind(product.price)
        .bind(product.category)
        .bind(product.image)
        .bind(product.stock)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    println!("Sample products added successfully");

    Ok(())
}

#[cfg(test)]
pub mod memory;
pub mod order_repository;
pub mod product_repository;
pub mod user_repository;

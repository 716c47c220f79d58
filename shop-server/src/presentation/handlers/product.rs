use actix_web::{HttpRequest, HttpResponse, get, post, web};
use tracing::info;

use crate::application::catalog_service::CatalogService;
use crate::data::product_repository::PgProductRepository;
use crate::domain::error::DomainError;
use crate::presentation::dto::MessageResponse;
use crate::presentation::utils::request_id;

#[get("/products")]
pub async fn get_products(
    req: HttpRequest,
    catalog: web::Data<CatalogService<PgProductRepository>>,
) -> Result<HttpResponse, DomainError> {
    let products = catalog.list_products().await?;

    info!(
        request_id = %request_id(&req),
        count = products.len(),
        "products retrieved"
    );

    Ok(HttpResponse::Ok().json(products))
}

#[post("/seed-products")]
pub async fn seed_products(
    req: HttpRequest,
    catalog: web::Data<CatalogService<PgProductRepository>>,
) -> Result<HttpResponse, DomainError> {
    catalog.seed_products().await?;

    info!(request_id = %request_id(&req), "catalog seeded");

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Sample products added successfully".into(),
    }))
}

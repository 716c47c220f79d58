mod application;
mod data;
mod domain;
mod infrastructure;
mod presentation;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::middleware::DefaultHeaders;
use actix_web::{App, HttpResponse, HttpServer, Responder, web};
use tracing::info;

use crate::application::auth_service::AuthService;
use crate::application::catalog_service::CatalogService;
use crate::application::order_service::OrderService;
use crate::data::order_repository::PgOrderRepository;
use crate::data::product_repository::PgProductRepository;
use crate::data::user_repository::PgUserRepository;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::database::{create_pool, run_migrations};
use crate::infrastructure::logging::init_logging;
use crate::infrastructure::mailer::Mailer;
use crate::infrastructure::security::JwtKeys;
use crate::presentation::dto::MessageResponse;
use crate::presentation::handlers;
use crate::presentation::middleware::{JwtAuthMiddleware, RequestIdMiddleware, TimingMiddleware};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let config = AppConfig::from_env()?;
    let pool = create_pool(&config.database_url).await?;
    run_migrations(&pool).await?;

    let user_repo = Arc::new(PgUserRepository::new(pool.clone()));
    let product_repo = Arc::new(PgProductRepository::new(pool.clone()));
    let order_repo = Arc::new(PgOrderRepository::new(pool.clone()));
    let mailer = Arc::new(Mailer::new(&config.mail)?);

    let auth_service = AuthService::new(
        Arc::clone(&user_repo),
        JwtKeys::new(config.jwt_secret.clone()),
    );
    let catalog_service = CatalogService::new(Arc::clone(&product_repo));
    let order_service = OrderService::new(
        order_repo,
        Arc::clone(&product_repo),
        Arc::clone(&user_repo),
        mailer,
    );

    info!(host = %config.host, port = config.port, "starting HTTP server");

    let config_data = config.clone();

    HttpServer::new(move || {
        let cors = build_cors(&config_data);
        App::new()
            .wrap(TimingMiddleware)
            .wrap(RequestIdMiddleware)
            .wrap(
                DefaultHeaders::new()
                    .add(("X-Content-Type-Options", "nosniff"))
                    .add(("Referrer-Policy", "no-referrer"))
                    .add(("Permissions-Policy", "geolocation=()"))
                    .add(("Cross-Origin-Opener-Policy", "same-origin")),
            )
            .wrap(cors)
            .app_data(web::Data::new(auth_service.clone()))
            .app_data(web::Data::new(catalog_service.clone()))
            .app_data(web::Data::new(order_service.clone()))
            .service(
                web::scope("/api")
                    .route("/health", web::get().to(health))
                    .service(handlers::auth::register)
                    .service(handlers::auth::login)
                    .service(handlers::product::get_products)
                    .service(handlers::product::seed_products)
                    .service(
                        web::scope("")
                            .wrap(JwtAuthMiddleware::new(auth_service.keys().clone()))
                            .service(handlers::order::create_order)
                            .service(handlers::order::get_orders),
                    ),
            )
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    Ok(())
}

async fn health() -> impl Responder {
    HttpResponse::Ok().json(MessageResponse {
        message: "Server is running!".into(),
    })
}

fn build_cors(config: &AppConfig) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
        .allowed_headers(vec![
            actix_web::http::header::CONTENT_TYPE,
            actix_web::http::header::AUTHORIZATION,
        ])
        .supports_credentials()
        .max_age(3600);

    for origin in &config.cors_origins {
        cors = cors.allowed_origin(origin);
    }

    cors
}

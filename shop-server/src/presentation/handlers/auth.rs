use actix_web::{HttpResponse, Responder, post, web};
use tracing::info;

use crate::application::auth_service::AuthService;
use crate::data::user_repository::PgUserRepository;
use crate::domain::error::DomainError;
use crate::presentation::dto::{AuthResponse, LoginRequest, RegisterRequest, UserView};

#[post("/register")]
pub async fn register(
    service: web::Data<AuthService<PgUserRepository>>,
    payload: web::Json<RegisterRequest>,
) -> Result<impl Responder, DomainError> {
    let payload = payload.into_inner();
    let (user, token) = service
        .register(payload.name, payload.email, payload.password)
        .await?;

    info!(user_id = %user.id, email = %user.email, "user registered");

    Ok(HttpResponse::Created().json(AuthResponse {
        message: "User registered successfully".into(),
        token,
        user: UserView::from(&user),
    }))
}

#[post("/login")]
pub async fn login(
    service: web::Data<AuthService<PgUserRepository>>,
    payload: web::Json<LoginRequest>,
) -> Result<impl Responder, DomainError> {
    let (user, token) = service.login(&payload.email, &payload.password).await?;

    info!(user_id = %user.id, email = %user.email, "user logged in");

    Ok(HttpResponse::Ok().json(AuthResponse {
        message: "Login successful".into(),
        token,
        user: UserView::from(&user),
    }))
}

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{0}")]
    Validation(String),
    #[error("User already exists")]
    DuplicateUser(String),
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Access token required")]
    MissingToken,
    #[error("Invalid token")]
    InvalidToken,
    #[error("Product {0} not found")]
    ProductNotFound(Uuid),
    #[error("Insufficient stock for {0}")]
    InsufficientStock(String),
    #[error("Server error")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

impl ResponseError for DomainError {
    fn status_code(&self) -> StatusCode {
        match self {
            DomainError::Validation(_)
            | DomainError::DuplicateUser(_)
            | DomainError::InvalidCredentials
            | DomainError::ProductNotFound(_)
            | DomainError::InsufficientStock(_) => StatusCode::BAD_REQUEST,
            DomainError::MissingToken => StatusCode::UNAUTHORIZED,
            DomainError::InvalidToken => StatusCode::FORBIDDEN,
            DomainError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = self.to_string();
        let details = match self {
            DomainError::DuplicateUser(email) => Some(json!({ "email": email })),
            DomainError::ProductNotFound(id) => Some(json!({ "productId": id })),
            DomainError::Internal(detail) => Some(json!({ "error": detail })),
            _ => None,
        };
        let body = ErrorBody {
            error: message.as_str(),
            details,
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

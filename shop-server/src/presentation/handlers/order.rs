use actix_web::{HttpRequest, HttpResponse, get, post, web};
use tracing::info;

use crate::application::order_service::OrderService;
use crate::data::order_repository::PgOrderRepository;
use crate::data::product_repository::PgProductRepository;
use crate::data::user_repository::PgUserRepository;
use crate::domain::error::DomainError;
use crate::presentation::dto::{
    CreateOrderRequest, CreateOrderResponse, PlacedOrderView, UserView,
};
use crate::presentation::utils::{AuthenticatedUser, request_id};

type Orders = OrderService<PgOrderRepository, PgProductRepository, PgUserRepository>;

#[post("/orders")]
pub async fn create_order(
    req: HttpRequest,
    user: AuthenticatedUser,
    orders: web::Data<Orders>,
    payload: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, DomainError> {
    let payload = payload.into_inner();
    let (order, owner) = orders
        .place_order(user.id, payload.products, payload.shipping_address)
        .await?;

    info!(
        request_id = %request_id(&req),
        order_id = %order.id,
        user_id = %user.id,
        total = %order.total_amount,
        "order created"
    );

    let product_details = order.items.clone();
    Ok(HttpResponse::Created().json(CreateOrderResponse {
        message: "Order created successfully".into(),
        order: PlacedOrderView {
            order,
            user: UserView::from(&owner),
            product_details,
        },
    }))
}

#[get("/orders")]
pub async fn get_orders(
    req: HttpRequest,
    user: AuthenticatedUser,
    orders: web::Data<Orders>,
) -> Result<HttpResponse, DomainError> {
    let history = orders.list_orders(user.id).await?;

    info!(
        request_id = %request_id(&req),
        user_id = %user.id,
        count = history.len(),
        "orders retrieved"
    );

    Ok(HttpResponse::Ok().json(history))
}

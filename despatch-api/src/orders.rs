use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use despatch_core::Actor;
use despatch_order::intake::CreateOrderInput;
use despatch_order::{Order, OrderItem, ShipmentStatus};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/orders", post(create_order).get(list_orders))
        .route("/v1/orders/{id}", get(get_order).patch(update_order))
        .route("/v1/orders/{id}/status", post(update_status))
}

#[derive(Debug, Deserialize)]
pub struct OrderItemRequest {
    pub product_id: Uuid,
    pub name: String,
    pub price: f64,
    pub quantity: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub phone: String,
    pub address: String,
    pub city: String,
    pub country: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(default)]
    pub items: Vec<OrderItemRequest>,
    pub total: Option<f64>,
    #[serde(default)]
    pub discount: f64,
    #[serde(default)]
    pub shipping_fee: f64,
    #[serde(default)]
    pub cod_amount: f64,
    pub currency: Option<String>,
    pub delivery_boy: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: ShipmentStatus,
    pub collected_amount: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateOrderRequest {
    pub address: Option<String>,
    pub city: Option<String>,
    pub notes: Option<String>,
}

/// POST /v1/orders
///
/// 201 on creation; a duplicate submission inside the dedupe window returns
/// the existing order with 200 instead.
pub async fn create_order(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(req): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<Order>), AppError> {
    let input = CreateOrderInput {
        phone: req.phone,
        address: req.address,
        city: req.city,
        country: req.country,
        latitude: req.latitude,
        longitude: req.longitude,
        items: req
            .items
            .into_iter()
            .map(|i| OrderItem {
                product_id: i.product_id,
                name: i.name,
                price: i.price,
                quantity: i.quantity,
            })
            .collect(),
        total: req.total,
        discount: req.discount,
        shipping_fee: req.shipping_fee,
        cod_amount: req.cod_amount,
        currency: req.currency,
        delivery_boy: req.delivery_boy,
    };

    let outcome = state.intake.create(&actor, input).await?;
    let status = if outcome.deduplicated {
        StatusCode::OK
    } else {
        state.metrics.orders_created.inc();
        StatusCode::CREATED
    };
    Ok((status, Json(outcome.order)))
}

/// POST /v1/orders/{id}/status
pub async fn update_status(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(order_id): Path<Uuid>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<Order>, AppError> {
    let order = state
        .delivery
        .transition(&actor, order_id, req.status, req.collected_amount)
        .await?;
    if req.status == ShipmentStatus::Delivered {
        state.metrics.orders_delivered.inc();
    }
    Ok(Json(order))
}

/// PATCH /v1/orders/{id} — corrective edit of delivery metadata. Financial
/// fields are out of reach here; the service freezes them.
pub async fn update_order(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(order_id): Path<Uuid>,
    Json(req): Json<UpdateOrderRequest>,
) -> Result<Json<Order>, AppError> {
    let order = state
        .delivery
        .update_metadata(&actor, order_id, req.address, req.city, req.notes)
        .await?;
    Ok(Json(order))
}

/// GET /v1/orders/{id}
pub async fn get_order(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(order_id): Path<Uuid>,
) -> Result<Json<Order>, AppError> {
    let order = state
        .orders
        .get_order(order_id)
        .await
        .map_err(|e| AppError::Anyhow(anyhow::anyhow!(e.to_string())))?
        .ok_or_else(|| AppError::NotFoundError(format!("order {}", order_id)))?;

    // Cross-workspace reads 404 rather than leak existence.
    if order.owner_id != actor.owner_id {
        return Err(AppError::NotFoundError(format!("order {}", order_id)));
    }
    Ok(Json(order))
}

/// GET /v1/orders — workspace-scoped listing.
pub async fn list_orders(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<Vec<Order>>, AppError> {
    let orders = state
        .orders
        .list_orders(actor.owner_id)
        .await
        .map_err(|e| AppError::Anyhow(anyhow::anyhow!(e.to_string())))?;
    Ok(Json(orders))
}

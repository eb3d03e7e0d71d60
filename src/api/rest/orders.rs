use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::order::{Order, OrderPatch, OrderStatus};
use crate::state::OrderState;

pub fn router(state: Arc<OrderState>) -> Router {
    Router::new()
        .route("/api/orders", post(create_order).get(list_orders))
        .route("/api/orders/user/:id", get(list_user_orders))
        .route("/api/orders/:id", get(get_order).patch(update_order))
        .route("/api/orders/:id/status", patch(update_status))
        .route("/api/orders/:id/assign-agent", patch(assign_agent))
        .route("/api/orders/:id/rate", post(rate_order))
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .layer(super::cors())
        .with_state(state)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub user_id: Uuid,
    pub restaurant_id: Uuid,
    pub items: Vec<String>,
}

#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: Option<OrderStatus>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignAgentRequest {
    pub delivery_agent_id: Option<Uuid>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateOrderRequest {
    pub user_rating: Option<u8>,
    pub agent_rating: Option<u8>,
}

async fn create_order(
    State(state): State<Arc<OrderState>>,
    Json(payload): Json<CreateOrderRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.items.is_empty() {
        return Err(AppError::BadRequest(
            "order must contain at least one item".to_string(),
        ));
    }

    let order = Order::new(payload.user_id, payload.restaurant_id, payload.items);
    state.orders.insert(order.id, order.clone());

    Ok((StatusCode::CREATED, Json(order)))
}

async fn list_orders(State(state): State<Arc<OrderState>>) -> Json<Vec<Order>> {
    let mut orders: Vec<Order> = state
        .orders
        .iter()
        .map(|entry| entry.value().clone())
        .collect();
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    Json(orders)
}

async fn list_user_orders(
    State(state): State<Arc<OrderState>>,
    Path(user_id): Path<Uuid>,
) -> Json<Vec<Order>> {
    let mut orders: Vec<Order> = state
        .orders
        .iter()
        .filter(|entry| entry.value().user_id == user_id)
        .map(|entry| entry.value().clone())
        .collect();
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    Json(orders)
}

async fn get_order(
    State(state): State<Arc<OrderState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Order>, AppError> {
    let order = state
        .orders
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("order {id} not found")))?;

    Ok(Json(order.value().clone()))
}

/// Applies a partial update under the entry lock, so the status and the agent
/// reference always land together.
async fn update_order(
    State(state): State<Arc<OrderState>>,
    Path(id): Path<Uuid>,
    Json(patch): Json<OrderPatch>,
) -> Result<Json<Order>, AppError> {
    apply_patch(&state, id, &patch)
}

async fn update_status(
    State(state): State<Arc<OrderState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<Json<Order>, AppError> {
    let Some(status) = payload.status else {
        return Err(AppError::BadRequest(
            "missing status in request body".to_string(),
        ));
    };

    apply_patch(
        &state,
        id,
        &OrderPatch {
            status: Some(status),
            ..OrderPatch::default()
        },
    )
}

async fn assign_agent(
    State(state): State<Arc<OrderState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AssignAgentRequest>,
) -> Result<Json<Order>, AppError> {
    let Some(agent_id) = payload.delivery_agent_id else {
        return Err(AppError::BadRequest(
            "missing deliveryAgentId in request body".to_string(),
        ));
    };

    apply_patch(
        &state,
        id,
        &OrderPatch {
            delivery_agent_id: Some(agent_id),
            ..OrderPatch::default()
        },
    )
}

/// Ratings are written once, after delivery; rating moves the order to its
/// terminal RATED state so a second attempt fails the transition check.
async fn rate_order(
    State(state): State<Arc<OrderState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RateOrderRequest>,
) -> Result<Json<Order>, AppError> {
    let (Some(user_rating), Some(agent_rating)) = (payload.user_rating, payload.agent_rating)
    else {
        return Err(AppError::BadRequest(
            "both userRating and agentRating are required".to_string(),
        ));
    };

    if !(1..=5).contains(&user_rating) || !(1..=5).contains(&agent_rating) {
        return Err(AppError::BadRequest(
            "ratings must be between 1 and 5".to_string(),
        ));
    }

    apply_patch(
        &state,
        id,
        &OrderPatch {
            status: Some(OrderStatus::Rated),
            user_rating: Some(user_rating),
            agent_rating: Some(agent_rating),
            ..OrderPatch::default()
        },
    )
}

fn apply_patch(state: &OrderState, id: Uuid, patch: &OrderPatch) -> Result<Json<Order>, AppError> {
    let mut order = state
        .orders
        .get_mut(&id)
        .ok_or_else(|| AppError::NotFound(format!("order {id} not found")))?;

    order.apply(patch)?;
    Ok(Json(order.clone()))
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    orders: usize,
}

async fn health(State(state): State<Arc<OrderState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        orders: state.orders.len(),
    })
}

async fn metrics(State(state): State<Arc<OrderState>>) -> impl IntoResponse {
    super::metrics_response(&state.metrics)
}

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{Timelike, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::order::Order;
use crate::models::restaurant::Restaurant;
use crate::models::user::User;
use crate::state::UserState;

pub fn router(state: Arc<UserState>) -> Router {
    Router::new()
        .route("/api/users/createUser", post(create_user))
        .route("/api/users/restaurants", get(list_restaurants))
        .route("/api/users/orders", post(place_order))
        .route("/api/users/orders/:id/rate", post(rate_order))
        .route("/api/users/orders/:id", get(order_history))
        .route("/health", get(health))
        .layer(super::cors())
        .with_state(state)
}

#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
}

#[derive(Deserialize)]
pub struct ListRestaurantsQuery {
    #[serde(rename = "currentHour")]
    pub current_hour: Option<u8>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    pub user_id: Uuid,
    pub restaurant_id: Uuid,
    pub items: Vec<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateOrderRequest {
    pub user_rating: Option<u8>,
    pub agent_rating: Option<u8>,
}

async fn create_user(
    State(state): State<Arc<UserState>>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.name.trim().is_empty() || payload.email.trim().is_empty() {
        return Err(AppError::BadRequest(
            "name and email are required".to_string(),
        ));
    }

    let email = payload.email.trim().to_ascii_lowercase();
    let taken = state
        .users
        .iter()
        .any(|entry| entry.value().email == email);
    if taken {
        return Err(AppError::Conflict(format!(
            "a user with email {email} already exists"
        )));
    }

    let user = User::new(payload.name, email);
    state.users.insert(user.id, user.clone());

    Ok((StatusCode::CREATED, Json(user)))
}

async fn list_restaurants(
    State(state): State<Arc<UserState>>,
    Query(query): Query<ListRestaurantsQuery>,
) -> Result<Json<Vec<Restaurant>>, AppError> {
    let hour = query
        .current_hour
        .unwrap_or_else(|| Utc::now().hour() as u8);
    if hour > 23 {
        return Err(AppError::BadRequest(
            "currentHour must be between 0 and 23".to_string(),
        ));
    }

    let restaurants = state.restaurants.open_restaurants(hour).await?;
    Ok(Json(restaurants))
}

/// Places an order only when the restaurant is online and open right now.
/// The availability check and the order creation both go through downstream
/// services; their status classes are forwarded as-is.
async fn place_order(
    State(state): State<Arc<UserState>>,
    Json(payload): Json<PlaceOrderRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.items.is_empty() {
        return Err(AppError::BadRequest(
            "order must contain at least one item".to_string(),
        ));
    }
    if !state.users.contains_key(&payload.user_id) {
        return Err(AppError::NotFound(format!(
            "user {} not found",
            payload.user_id
        )));
    }

    let hour = Utc::now().hour() as u8;
    let open_now = state.restaurants.open_restaurants(hour).await?;
    let available = open_now
        .iter()
        .any(|restaurant| restaurant.id == payload.restaurant_id);
    if !available {
        return Err(AppError::BadRequest(
            "restaurant is not available at this hour".to_string(),
        ));
    }

    let order = state
        .orders
        .create_order(payload.user_id, payload.restaurant_id, payload.items)
        .await?;

    Ok((StatusCode::CREATED, Json(order)))
}

async fn rate_order(
    State(state): State<Arc<UserState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RateOrderRequest>,
) -> Result<Json<Order>, AppError> {
    let (Some(user_rating), Some(agent_rating)) = (payload.user_rating, payload.agent_rating)
    else {
        return Err(AppError::BadRequest(
            "both userRating and agentRating are required".to_string(),
        ));
    };

    let order = state.orders.rate_order(id, user_rating, agent_rating).await?;
    Ok(Json(order))
}

async fn order_history(
    State(state): State<Arc<UserState>>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<Order>>, AppError> {
    let orders = state.orders.orders_for_user(user_id).await?;
    Ok(Json(orders))
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    users: usize,
}

async fn health(State(state): State<Arc<UserState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        users: state.users.len(),
    })
}

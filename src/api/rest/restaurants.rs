use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::acceptance;
use crate::error::AppError;
use crate::models::agent::DeliveryAgent;
use crate::models::order::Order;
use crate::models::restaurant::{MenuItem, Restaurant};
use crate::state::RestaurantState;

pub fn router(state: Arc<RestaurantState>) -> Router {
    Router::new()
        .route(
            "/api/restaurants",
            get(list_restaurants).post(create_restaurant),
        )
        .route("/api/restaurants/orders/:orderId/accept", post(accept_order))
        .route(
            "/api/restaurants/menu/:menuItemId",
            put(update_menu_item).delete(delete_menu_item),
        )
        .route("/api/restaurants/:id", put(update_restaurant))
        .route("/api/restaurants/:id/menu", post(create_menu_item))
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .layer(super::cors())
        .with_state(state)
}

#[derive(Deserialize)]
pub struct ListRestaurantsQuery {
    #[serde(rename = "currentHour")]
    pub current_hour: Option<u8>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRestaurantRequest {
    pub name: String,
    pub is_online: bool,
    pub opening_hour: u8,
    pub closing_hour: u8,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRestaurantRequest {
    pub name: Option<String>,
    pub is_online: Option<bool>,
    pub opening_hour: Option<u8>,
    pub closing_hour: Option<u8>,
}

#[derive(Deserialize)]
pub struct CreateMenuItemRequest {
    pub name: String,
    pub price: f64,
    pub available: bool,
}

#[derive(Deserialize)]
pub struct UpdateMenuItemRequest {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub available: Option<bool>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AcceptOrderResponse {
    message: &'static str,
    order: Order,
    assigned_agent: DeliveryAgent,
}

async fn list_restaurants(
    State(state): State<Arc<RestaurantState>>,
    Query(query): Query<ListRestaurantsQuery>,
) -> Result<Json<Vec<Restaurant>>, AppError> {
    if let Some(hour) = query.current_hour {
        if hour > 23 {
            return Err(AppError::BadRequest(
                "currentHour must be between 0 and 23".to_string(),
            ));
        }
    }

    let restaurants = state
        .restaurants
        .iter()
        .filter(|entry| match query.current_hour {
            Some(hour) => entry.value().is_open_at(hour),
            None => true,
        })
        .map(|entry| entry.value().clone())
        .collect();

    Ok(Json(restaurants))
}

async fn create_restaurant(
    State(state): State<Arc<RestaurantState>>,
    Json(payload): Json<CreateRestaurantRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest("name cannot be empty".to_string()));
    }
    validate_hours(payload.opening_hour, payload.closing_hour)?;

    let restaurant = Restaurant {
        id: Uuid::new_v4(),
        name: payload.name,
        is_online: payload.is_online,
        opening_hour: payload.opening_hour,
        closing_hour: payload.closing_hour,
        created_at: Utc::now(),
    };

    state.restaurants.insert(restaurant.id, restaurant.clone());
    Ok((StatusCode::CREATED, Json(restaurant)))
}

async fn update_restaurant(
    State(state): State<Arc<RestaurantState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateRestaurantRequest>,
) -> Result<Json<Restaurant>, AppError> {
    let mut restaurant = state
        .restaurants
        .get_mut(&id)
        .ok_or_else(|| AppError::NotFound(format!("restaurant {id} not found")))?;

    let opening = payload.opening_hour.unwrap_or(restaurant.opening_hour);
    let closing = payload.closing_hour.unwrap_or(restaurant.closing_hour);
    validate_hours(opening, closing)?;

    if let Some(name) = payload.name {
        restaurant.name = name;
    }
    if let Some(is_online) = payload.is_online {
        restaurant.is_online = is_online;
    }
    restaurant.opening_hour = opening;
    restaurant.closing_hour = closing;

    Ok(Json(restaurant.clone()))
}

/// The cross-service acceptance workflow. `NoAgentsAvailable` is surfaced as
/// 400 here, matching the gateway-facing contract, while the agent service's
/// own /assign endpoint keeps its 404.
async fn accept_order(
    State(state): State<Arc<RestaurantState>>,
    Path(order_id): Path<Uuid>,
) -> Result<Json<AcceptOrderResponse>, AppError> {
    let start = Instant::now();
    let result =
        acceptance::accept_order(state.orders.as_ref(), state.agents.as_ref(), order_id).await;

    let outcome = if result.is_ok() { "success" } else { "error" };
    state
        .metrics
        .acceptance_latency_seconds
        .with_label_values(&[outcome])
        .observe(start.elapsed().as_secs_f64());
    state
        .metrics
        .acceptances_total
        .with_label_values(&[outcome])
        .inc();

    match result {
        Ok(accepted) => Ok(Json(AcceptOrderResponse {
            message: "order accepted",
            order: accepted.order,
            assigned_agent: accepted.agent,
        })),
        Err(AppError::NoAgentsAvailable) => Err(AppError::BadRequest(
            "no delivery agents available".to_string(),
        )),
        Err(err) => Err(err),
    }
}

async fn create_menu_item(
    State(state): State<Arc<RestaurantState>>,
    Path(restaurant_id): Path<Uuid>,
    Json(payload): Json<CreateMenuItemRequest>,
) -> Result<impl IntoResponse, AppError> {
    if !state.restaurants.contains_key(&restaurant_id) {
        return Err(AppError::NotFound(format!(
            "restaurant {restaurant_id} not found"
        )));
    }
    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest("name cannot be empty".to_string()));
    }
    if !payload.price.is_finite() || payload.price < 0.0 {
        return Err(AppError::BadRequest(
            "price must be a non-negative number".to_string(),
        ));
    }

    let item = MenuItem {
        id: Uuid::new_v4(),
        restaurant_id,
        name: payload.name,
        price: payload.price,
        available: payload.available,
    };

    state.menu_items.insert(item.id, item.clone());
    Ok((StatusCode::CREATED, Json(item)))
}

async fn update_menu_item(
    State(state): State<Arc<RestaurantState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateMenuItemRequest>,
) -> Result<Json<MenuItem>, AppError> {
    let mut item = state
        .menu_items
        .get_mut(&id)
        .ok_or_else(|| AppError::NotFound(format!("menu item {id} not found")))?;

    if let Some(name) = payload.name {
        item.name = name;
    }
    if let Some(price) = payload.price {
        if !price.is_finite() || price < 0.0 {
            return Err(AppError::BadRequest(
                "price must be a non-negative number".to_string(),
            ));
        }
        item.price = price;
    }
    if let Some(available) = payload.available {
        item.available = available;
    }

    Ok(Json(item.clone()))
}

async fn delete_menu_item(
    State(state): State<Arc<RestaurantState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state
        .menu_items
        .remove(&id)
        .ok_or_else(|| AppError::NotFound(format!("menu item {id} not found")))?;

    Ok(StatusCode::NO_CONTENT)
}

fn validate_hours(opening: u8, closing: u8) -> Result<(), AppError> {
    if opening > 23 || closing > 23 {
        return Err(AppError::BadRequest(
            "openingHour and closingHour must be between 0 and 23".to_string(),
        ));
    }
    if opening > closing {
        return Err(AppError::BadRequest(
            "openingHour must not be after closingHour".to_string(),
        ));
    }
    Ok(())
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    restaurants: usize,
    menu_items: usize,
}

async fn health(State(state): State<Arc<RestaurantState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        restaurants: state.restaurants.len(),
        menu_items: state.menu_items.len(),
    })
}

async fn metrics(State(state): State<Arc<RestaurantState>>) -> impl IntoResponse {
    super::metrics_response(&state.metrics)
}

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::reservation;
use crate::error::AppError;
use crate::models::agent::DeliveryAgent;
use crate::state::AgentState;

pub fn router(state: Arc<AgentState>) -> Router {
    Router::new()
        .route("/agents", post(create_agent).get(list_available_agents))
        .route("/agents/all", get(list_all_agents))
        .route("/agents/assign", post(assign_agent))
        .route("/agents/:id", get(get_agent))
        .route("/agents/:id/available", post(release_agent))
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .layer(super::cors())
        .with_state(state)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAgentRequest {
    pub name: String,
    pub phone_number: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AssignResponse {
    assigned_agent: DeliveryAgent,
}

async fn create_agent(
    State(state): State<Arc<AgentState>>,
    Json(payload): Json<CreateAgentRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.name.trim().is_empty() || payload.phone_number.trim().is_empty() {
        return Err(AppError::BadRequest(
            "name and phoneNumber are required".to_string(),
        ));
    }

    let agent = DeliveryAgent::new(payload.name, payload.phone_number);
    state.agents.insert(agent.id, agent.clone());
    state
        .metrics
        .agents_available
        .set(reservation::available_count(&state.agents));

    Ok((StatusCode::CREATED, Json(agent)))
}

async fn list_available_agents(State(state): State<Arc<AgentState>>) -> Json<Vec<DeliveryAgent>> {
    let agents = state
        .agents
        .iter()
        .filter(|entry| entry.value().is_available)
        .map(|entry| entry.value().clone())
        .collect();

    Json(agents)
}

async fn list_all_agents(State(state): State<Arc<AgentState>>) -> Json<Vec<DeliveryAgent>> {
    let agents = state
        .agents
        .iter()
        .map(|entry| entry.value().clone())
        .collect();

    Json(agents)
}

async fn get_agent(
    State(state): State<Arc<AgentState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeliveryAgent>, AppError> {
    let agent = state
        .agents
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("agent {id} not found")))?;

    Ok(Json(agent.value().clone()))
}

async fn assign_agent(
    State(state): State<Arc<AgentState>>,
) -> Result<Json<AssignResponse>, AppError> {
    let result = reservation::reserve_agent(&state.agents);

    let outcome = if result.is_ok() { "success" } else { "none_available" };
    state
        .metrics
        .reservations_total
        .with_label_values(&[outcome])
        .inc();
    state
        .metrics
        .agents_available
        .set(reservation::available_count(&state.agents));

    let assigned_agent = result?;
    Ok(Json(AssignResponse { assigned_agent }))
}

async fn release_agent(
    State(state): State<Arc<AgentState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeliveryAgent>, AppError> {
    let agent = reservation::release_agent(&state.agents, id)?;
    state
        .metrics
        .agents_available
        .set(reservation::available_count(&state.agents));

    Ok(Json(agent))
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    agents: usize,
    available: i64,
}

async fn health(State(state): State<Arc<AgentState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        agents: state.agents.len(),
        available: reservation::available_count(&state.agents),
    })
}

async fn metrics(State(state): State<Arc<AgentState>>) -> impl IntoResponse {
    super::metrics_response(&state.metrics)
}

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

use crate::models::order::OrderStatus;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("invalid order status transition: {from} -> {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    #[error("no delivery agents available")]
    NoAgentsAvailable,

    #[error("upstream call failed: {0}")]
    Upstream(String),

    /// Order update failed after an agent was reserved; the reservation was
    /// rolled back by a compensating release.
    #[error("order acceptance rolled back, agent {agent_id} released")]
    PartialAcceptance { agent_id: Uuid },

    /// Both the order update and the compensating release failed. Agent
    /// {agent_id} is stuck unavailable until an operator releases it.
    #[error("compensation failed: agent {agent_id} still reserved for failed order {order_id}")]
    CompensationFailed { agent_id: Uuid, order_id: Uuid },

    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) | AppError::InvalidTransition { .. } => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::NoAgentsAvailable => StatusCode::NOT_FOUND,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::PartialAcceptance { .. }
            | AppError::CompensationFailed { .. }
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

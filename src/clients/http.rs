use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::clients::{AgentApi, OrderApi, OrderGateway, RestaurantGateway};
use crate::error::AppError;
use crate::models::agent::DeliveryAgent;
use crate::models::order::{Order, OrderPatch};
use crate::models::restaurant::Restaurant;

/// Shared outbound client with a bounded timeout. A hung downstream call
/// surfaces as `Upstream` after the timeout instead of blocking the caller
/// indefinitely.
pub fn build_client(timeout: std::time::Duration) -> Result<reqwest::Client, AppError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|err| AppError::Internal(format!("failed to build http client: {err}")))
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Maps a non-success downstream response back onto the error class it was
/// produced from, so pass-through endpoints forward status classes verbatim.
async fn decode_error(response: reqwest::Response) -> AppError {
    let status = response.status();
    let message = match response.json::<ErrorBody>().await {
        Ok(body) => body.error,
        Err(_) => status.to_string(),
    };

    match status {
        StatusCode::NOT_FOUND => AppError::NotFound(message),
        StatusCode::BAD_REQUEST => AppError::BadRequest(message),
        StatusCode::CONFLICT => AppError::Conflict(message),
        _ => AppError::Upstream(format!("downstream returned {status}: {message}")),
    }
}

fn transport_error(err: reqwest::Error) -> AppError {
    if err.is_timeout() {
        AppError::Upstream(format!("downstream call timed out: {err}"))
    } else {
        AppError::Upstream(format!("downstream call failed: {err}"))
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, AppError> {
    if response.status().is_success() {
        response.json::<T>().await.map_err(|err| {
            AppError::Upstream(format!("failed to decode downstream body: {err}"))
        })
    } else {
        Err(decode_error(response).await)
    }
}

#[derive(Clone)]
pub struct HttpOrderClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpOrderClient {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl OrderApi for HttpOrderClient {
    async fn get_order(&self, id: Uuid) -> Result<Order, AppError> {
        let response = self
            .client
            .get(format!("{}/api/orders/{id}", self.base_url))
            .send()
            .await
            .map_err(transport_error)?;

        read_json(response).await
    }

    async fn update_order(&self, id: Uuid, patch: OrderPatch) -> Result<Order, AppError> {
        let response = self
            .client
            .patch(format!("{}/api/orders/{id}", self.base_url))
            .json(&patch)
            .send()
            .await
            .map_err(transport_error)?;

        read_json(response).await
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PlaceOrderBody {
    user_id: Uuid,
    restaurant_id: Uuid,
    items: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RateOrderBody {
    user_rating: u8,
    agent_rating: u8,
}

#[async_trait]
impl OrderGateway for HttpOrderClient {
    async fn create_order(
        &self,
        user_id: Uuid,
        restaurant_id: Uuid,
        items: Vec<String>,
    ) -> Result<Order, AppError> {
        let response = self
            .client
            .post(format!("{}/api/orders", self.base_url))
            .json(&PlaceOrderBody {
                user_id,
                restaurant_id,
                items,
            })
            .send()
            .await
            .map_err(transport_error)?;

        read_json(response).await
    }

    async fn rate_order(
        &self,
        id: Uuid,
        user_rating: u8,
        agent_rating: u8,
    ) -> Result<Order, AppError> {
        let response = self
            .client
            .post(format!("{}/api/orders/{id}/rate", self.base_url))
            .json(&RateOrderBody {
                user_rating,
                agent_rating,
            })
            .send()
            .await
            .map_err(transport_error)?;

        read_json(response).await
    }

    async fn orders_for_user(&self, user_id: Uuid) -> Result<Vec<Order>, AppError> {
        let response = self
            .client
            .get(format!("{}/api/orders/user/{user_id}", self.base_url))
            .send()
            .await
            .map_err(transport_error)?;

        read_json(response).await
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AssignedAgentBody {
    assigned_agent: DeliveryAgent,
}

#[derive(Clone)]
pub struct HttpAgentClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAgentClient {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl AgentApi for HttpAgentClient {
    async fn reserve(&self) -> Result<DeliveryAgent, AppError> {
        let response = self
            .client
            .post(format!("{}/agents/assign", self.base_url))
            .send()
            .await
            .map_err(transport_error)?;

        // The agent service answers 404 when the pool is empty or the
        // reservation race was lost on every candidate.
        if response.status() == StatusCode::NOT_FOUND {
            return Err(AppError::NoAgentsAvailable);
        }

        let body: AssignedAgentBody = read_json(response).await?;
        Ok(body.assigned_agent)
    }

    async fn release(&self, id: Uuid) -> Result<DeliveryAgent, AppError> {
        let response = self
            .client
            .post(format!("{}/agents/{id}/available", self.base_url))
            .send()
            .await
            .map_err(transport_error)?;

        read_json(response).await
    }
}

#[derive(Clone)]
pub struct HttpRestaurantClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRestaurantClient {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl RestaurantGateway for HttpRestaurantClient {
    async fn open_restaurants(&self, current_hour: u8) -> Result<Vec<Restaurant>, AppError> {
        let response = self
            .client
            .get(format!(
                "{}/api/restaurants?currentHour={current_hour}",
                self.base_url
            ))
            .send()
            .await
            .map_err(transport_error)?;

        read_json(response).await
    }
}

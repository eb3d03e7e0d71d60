pub mod http;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::agent::DeliveryAgent;
use crate::models::order::{Order, OrderPatch};
use crate::models::restaurant::Restaurant;

pub use http::{HttpAgentClient, HttpOrderClient, HttpRestaurantClient};

/// Order-service operations the acceptance workflow depends on. Injected so
/// the workflow can run against a fake store in tests.
#[async_trait]
pub trait OrderApi: Send + Sync {
    async fn get_order(&self, id: Uuid) -> Result<Order, AppError>;
    async fn update_order(&self, id: Uuid, patch: OrderPatch) -> Result<Order, AppError>;
}

/// Agent-service operations: atomic reservation and its compensating release.
#[async_trait]
pub trait AgentApi: Send + Sync {
    async fn reserve(&self) -> Result<DeliveryAgent, AppError>;
    async fn release(&self, id: Uuid) -> Result<DeliveryAgent, AppError>;
}

/// Order-service operations proxied by the user gateway.
#[async_trait]
pub trait OrderGateway: Send + Sync {
    async fn create_order(
        &self,
        user_id: Uuid,
        restaurant_id: Uuid,
        items: Vec<String>,
    ) -> Result<Order, AppError>;

    async fn rate_order(
        &self,
        id: Uuid,
        user_rating: u8,
        agent_rating: u8,
    ) -> Result<Order, AppError>;

    async fn orders_for_user(&self, user_id: Uuid) -> Result<Vec<Order>, AppError>;
}

/// Restaurant-service operations proxied by the user gateway.
#[async_trait]
pub trait RestaurantGateway: Send + Sync {
    async fn open_restaurants(&self, current_hour: u8) -> Result<Vec<Restaurant>, AppError>;
}

use std::sync::Arc;

use dashmap::DashMap;
use uuid::Uuid;

use crate::clients::{AgentApi, OrderApi, OrderGateway, RestaurantGateway};
use crate::models::agent::DeliveryAgent;
use crate::models::order::Order;
use crate::models::restaurant::{MenuItem, Restaurant};
use crate::models::user::User;
use crate::observability::metrics::Metrics;

/// State for the delivery-agent service. The agents map is the only shared
/// mutable resource touched by concurrent reservations; all writes go through
/// its per-entry locks.
pub struct AgentState {
    pub agents: DashMap<Uuid, DeliveryAgent>,
    pub metrics: Metrics,
}

impl AgentState {
    pub fn new() -> Self {
        Self {
            agents: DashMap::new(),
            metrics: Metrics::new(),
        }
    }
}

impl Default for AgentState {
    fn default() -> Self {
        Self::new()
    }
}

pub struct OrderState {
    pub orders: DashMap<Uuid, Order>,
    pub metrics: Metrics,
}

impl OrderState {
    pub fn new() -> Self {
        Self {
            orders: DashMap::new(),
            metrics: Metrics::new(),
        }
    }
}

impl Default for OrderState {
    fn default() -> Self {
        Self::new()
    }
}

/// State for the restaurant service. The order and agent clients are injected
/// so the acceptance workflow can run against fakes in tests.
pub struct RestaurantState {
    pub restaurants: DashMap<Uuid, Restaurant>,
    pub menu_items: DashMap<Uuid, MenuItem>,
    pub orders: Arc<dyn OrderApi>,
    pub agents: Arc<dyn AgentApi>,
    pub metrics: Metrics,
}

impl RestaurantState {
    pub fn new(orders: Arc<dyn OrderApi>, agents: Arc<dyn AgentApi>) -> Self {
        Self {
            restaurants: DashMap::new(),
            menu_items: DashMap::new(),
            orders,
            agents,
            metrics: Metrics::new(),
        }
    }
}

/// State for the user gateway. Owns the user records; everything else is
/// proxied downstream.
pub struct UserState {
    pub users: DashMap<Uuid, User>,
    pub orders: Arc<dyn OrderGateway>,
    pub restaurants: Arc<dyn RestaurantGateway>,
}

impl UserState {
    pub fn new(orders: Arc<dyn OrderGateway>, restaurants: Arc<dyn RestaurantGateway>) -> Self {
        Self {
            users: DashMap::new(),
            orders,
            restaurants,
        }
    }
}

use chrono::{DateTime, Utc};
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

/// Order lifecycle. Transitions follow a fixed forward-only table:
/// PLACED -> ACCEPTED -> DELIVERED -> RATED. No back-edges, no self-edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Placed,
    Accepted,
    Delivered,
    Rated,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Placed => "PLACED",
            OrderStatus::Accepted => "ACCEPTED",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Rated => "RATED",
        }
    }

    /// Case-insensitive parse. The legacy `pending` spelling is normalized to
    /// PLACED here, at the boundary, so nothing downstream has to know about
    /// it.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "placed" | "pending" => Some(OrderStatus::Placed),
            "accepted" => Some(OrderStatus::Accepted),
            "delivered" => Some(OrderStatus::Delivered),
            "rated" => Some(OrderStatus::Rated),
            _ => None,
        }
    }

    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (OrderStatus::Placed, OrderStatus::Accepted)
                | (OrderStatus::Accepted, OrderStatus::Delivered)
                | (OrderStatus::Delivered, OrderStatus::Rated)
        )
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for OrderStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for OrderStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        OrderStatus::parse(&raw).ok_or_else(|| {
            de::Error::unknown_variant(&raw, &["PLACED", "ACCEPTED", "DELIVERED", "RATED"])
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    pub restaurant_id: Uuid,
    pub items: Vec<String>,
    pub status: OrderStatus,
    pub delivery_agent_id: Option<Uuid>,
    pub user_rating: Option<u8>,
    pub agent_rating: Option<u8>,
    pub created_at: DateTime<Utc>,
}

impl Order {
    pub fn new(user_id: Uuid, restaurant_id: Uuid, items: Vec<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            restaurant_id,
            items,
            status: OrderStatus::Placed,
            delivery_agent_id: None,
            user_rating: None,
            agent_rating: None,
            created_at: Utc::now(),
        }
    }

    /// Applies a partial update atomically. Status changes are validated
    /// against the transition table before any field is touched.
    pub fn apply(&mut self, patch: &OrderPatch) -> Result<(), AppError> {
        if let Some(next) = patch.status {
            if !self.status.can_transition_to(next) {
                return Err(AppError::InvalidTransition {
                    from: self.status,
                    to: next,
                });
            }
            self.status = next;
        }
        if let Some(agent_id) = patch.delivery_agent_id {
            self.delivery_agent_id = Some(agent_id);
        }
        if let Some(rating) = patch.user_rating {
            self.user_rating = Some(rating);
        }
        if let Some(rating) = patch.agent_rating {
            self.agent_rating = Some(rating);
        }

        Ok(())
    }
}

/// Subset of order fields accepted by PATCH /api/orders/:id. Absent fields are
/// left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_agent_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_rating: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_rating: Option<u8>,
}

impl OrderPatch {
    pub fn accept(agent_id: Uuid) -> Self {
        Self {
            status: Some(OrderStatus::Accepted),
            delivery_agent_id: Some(agent_id),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::{Order, OrderPatch, OrderStatus};

    fn placed_order() -> Order {
        Order::new(Uuid::new_v4(), Uuid::new_v4(), vec!["pad thai".to_string()])
    }

    #[test]
    fn forward_transitions_are_allowed() {
        assert!(OrderStatus::Placed.can_transition_to(OrderStatus::Accepted));
        assert!(OrderStatus::Accepted.can_transition_to(OrderStatus::Delivered));
        assert!(OrderStatus::Delivered.can_transition_to(OrderStatus::Rated));
    }

    #[test]
    fn back_edges_and_self_edges_are_rejected() {
        assert!(!OrderStatus::Accepted.can_transition_to(OrderStatus::Placed));
        assert!(!OrderStatus::Placed.can_transition_to(OrderStatus::Placed));
        assert!(!OrderStatus::Rated.can_transition_to(OrderStatus::Delivered));
        assert!(!OrderStatus::Placed.can_transition_to(OrderStatus::Delivered));
    }

    #[test]
    fn parse_is_case_insensitive_and_accepts_pending_alias() {
        assert_eq!(OrderStatus::parse("PLACED"), Some(OrderStatus::Placed));
        assert_eq!(OrderStatus::parse("placed"), Some(OrderStatus::Placed));
        assert_eq!(OrderStatus::parse("pending"), Some(OrderStatus::Placed));
        assert_eq!(OrderStatus::parse("Pending"), Some(OrderStatus::Placed));
        assert_eq!(OrderStatus::parse("accepted"), Some(OrderStatus::Accepted));
        assert_eq!(OrderStatus::parse("cancelled"), None);
    }

    #[test]
    fn apply_rejects_invalid_transition_without_touching_fields() {
        let mut order = placed_order();
        order.status = OrderStatus::Accepted;

        let patch = OrderPatch {
            status: Some(OrderStatus::Accepted),
            delivery_agent_id: Some(Uuid::new_v4()),
            ..OrderPatch::default()
        };

        assert!(order.apply(&patch).is_err());
        assert!(order.delivery_agent_id.is_none());
    }

    #[test]
    fn apply_sets_status_and_agent_together() {
        let mut order = placed_order();
        let agent_id = Uuid::new_v4();

        order.apply(&OrderPatch::accept(agent_id)).unwrap();

        assert_eq!(order.status, OrderStatus::Accepted);
        assert_eq!(order.delivery_agent_id, Some(agent_id));
    }
}

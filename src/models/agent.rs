use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A delivery agent record. `is_available` flips false only through a
/// reservation and back to true only through an explicit release; the
/// assignment link lives on the order, not here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryAgent {
    pub id: Uuid,
    pub name: String,
    pub phone_number: String,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
}

impl DeliveryAgent {
    pub fn new(name: String, phone_number: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            phone_number,
            is_available: true,
            created_at: Utc::now(),
        }
    }
}

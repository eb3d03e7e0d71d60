use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    pub id: Uuid,
    pub name: String,
    pub is_online: bool,
    pub opening_hour: u8,
    pub closing_hour: u8,
    pub created_at: DateTime<Utc>,
}

impl Restaurant {
    /// Open for business at the given hour of day (0..=23).
    pub fn is_open_at(&self, hour: u8) -> bool {
        self.is_online && self.opening_hour <= hour && hour <= self.closing_hour
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub name: String,
    pub price: f64,
    pub available: bool,
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::Restaurant;

    fn restaurant(is_online: bool, opening: u8, closing: u8) -> Restaurant {
        Restaurant {
            id: Uuid::new_v4(),
            name: "Noodle Barn".to_string(),
            is_online,
            opening_hour: opening,
            closing_hour: closing,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn open_within_hours() {
        let r = restaurant(true, 9, 21);
        assert!(r.is_open_at(9));
        assert!(r.is_open_at(15));
        assert!(r.is_open_at(21));
    }

    #[test]
    fn closed_outside_hours_or_offline() {
        assert!(!restaurant(true, 9, 21).is_open_at(8));
        assert!(!restaurant(true, 9, 21).is_open_at(22));
        assert!(!restaurant(false, 0, 23).is_open_at(12));
    }
}

// Canonical record shapes for the reservation core.
// The upstream data sources disagreed on field names and optionality
// (`hours` vs `openingHours`, `images` vs `imageUrl`); these are the single
// authoritative shapes, with optional fields defaulted at deserialization
// so consumers never re-resolve them.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-slot counts of bookable tables in the three size classes.
/// Absence of an entry for a (date, slot) pair means zero availability,
/// not unknown availability.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TableInventory {
    pub two_seater: u32,
    pub four_seater: u32,
    pub large_group: u32,
}

impl TableInventory {
    pub fn new(two_seater: u32, four_seater: u32, large_group: u32) -> Self {
        Self {
            two_seater,
            four_seater,
            large_group,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.two_seater == 0 && self.four_seater == 0 && self.large_group == 0
    }
}

/// Date (`YYYY-MM-DD`) to slot (`HH:MM`) to table counts. Both maps are
/// `BTreeMap`s keyed by zero-padded strings, so iteration order is
/// chronological.
pub type AvailabilityMap = BTreeMap<String, BTreeMap<String, TableInventory>>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub coordinates: Coordinates,
}

/// Opening and closing time for one day of the week.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DayHours {
    pub open: String,
    pub close: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Restaurant {
    pub id: String,
    pub name: String,
    pub description: String,
    pub address: Address,
    pub cuisine_type: String,
    /// 1-4, representing $ to $$$$.
    pub cost_rating: u8,
    /// Derived aggregate, 1-5 stars. Recomputed when reviews change.
    pub rating: f64,
    pub review_count: u32,
    pub images: Vec<String>,
    pub booked_today: u32,
    /// Weekday name to service hours.
    pub hours: BTreeMap<String, DayHours>,
    pub available_tables: AvailabilityMap,
    /// Reference to the managing user; ownership lives elsewhere.
    pub manager_id: String,
}

impl Restaurant {
    /// Per-slot inventory for one date, if any is recorded.
    pub fn inventory_for(&self, date: &str) -> Option<&BTreeMap<String, TableInventory>> {
        self.available_tables.get(date)
    }

    /// Table counts at a single (date, slot) point.
    pub fn inventory_at(&self, date: &str, time: &str) -> Option<&TableInventory> {
        self.available_tables.get(date).and_then(|slots| slots.get(time))
    }

    /// Case-insensitive substring match over city, state, zip code, name,
    /// and cuisine type (the broadened location policy).
    pub fn matches_location(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.address.city.to_lowercase().contains(&needle)
            || self.address.state.to_lowercase().contains(&needle)
            || self.address.zip_code.to_lowercase().contains(&needle)
            || self.name.to_lowercase().contains(&needle)
            || self.cuisine_type.to_lowercase().contains(&needle)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Review {
    pub id: String,
    pub restaurant_id: String,
    pub user_id: String,
    pub user_name: String,
    /// 1-5 stars.
    pub rating: u8,
    pub comment: String,
    pub date: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    #[default]
    Confirmed,
    Cancelled,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: String,
    pub restaurant_id: String,
    pub user_id: String,
    pub date: String,
    pub time: String,
    pub party_size: u32,
    pub status: ReservationStatus,
    pub created_at: DateTime<Utc>,
}

/// One availability search. Transient; constructed per request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub date: String,
    pub time: String,
    pub party_size: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl SearchQuery {
    pub fn new(date: &str, time: &str, party_size: u32) -> Self {
        Self {
            date: date.to_string(),
            time: time.to_string(),
            party_size,
            location: None,
        }
    }

    pub fn with_location(mut self, location: &str) -> Self {
        self.location = Some(location.to_string());
        self
    }
}

/// A restaurant that satisfied a query, paired with every slot on the
/// requested date that can seat the party (full service day, not just the
/// tolerance window).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchMatch {
    pub restaurant: Restaurant,
    pub available_slots: Vec<String>,
}

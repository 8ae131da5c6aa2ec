// Shared error taxonomy for the availability core and the repository.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid time slot: {0}")]
    InvalidTimeSlot(String),

    #[error("Invalid party size: {0}")]
    InvalidPartySize(u32),

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("No tables available at {restaurant_id} on {date} {time}")]
    NoTablesAvailable {
        restaurant_id: String,
        date: String,
        time: String,
    },
}

impl Error {
    pub fn restaurant_not_found(id: &str) -> Self {
        Error::NotFound {
            kind: "restaurant",
            id: id.to_string(),
        }
    }

    pub fn reservation_not_found(id: &str) -> Self {
        Error::NotFound {
            kind: "reservation",
            id: id.to_string(),
        }
    }
}

// Restaurant discovery and table-reservation core: availability search
// over per-restaurant table inventories, a repository abstraction for the
// data layer, and a thin client for a hosted backend.

pub mod client;
pub mod error;
pub mod model;
pub mod repository;
pub mod search;
pub mod seed;
pub mod timeslot;

// Re-export key types for convenience
pub use client::{
    ClientConfig, ClientError, ClientStats, ReservationsApi, ReservationsClient, RetryConfig,
};
pub use error::Error;
pub use model::{
    Address, Reservation, ReservationStatus, Restaurant, Review, SearchMatch, SearchQuery,
    TableInventory,
};
pub use repository::{InMemoryRepository, ReservationRequest, RestaurantRepository};
pub use search::{available_time_slots, satisfies_party_size, search_restaurants, sort_matches, SortKey};
pub use timeslot::{all_time_slots, tolerance_window, DEFAULT_SEARCH_RADIUS};

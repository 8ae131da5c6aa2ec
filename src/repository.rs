// Repository abstraction over the restaurant collection. The original data
// layer was a set of global mutable arrays; here the store is an explicit
// trait object passed to callers, so the matching logic never touches a
// concrete backend. The in-memory implementation also owns the booking
// collaborator: reservation creation/cancellation are the only operations
// that mutate table inventory.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use dashmap::DashMap;
use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::error::Error;
use crate::model::{
    Reservation, ReservationStatus, Restaurant, Review, SearchMatch, SearchQuery, TableInventory,
};
use crate::search::{available_time_slots, search_restaurants};
use crate::timeslot::is_valid_slot;

/// Parameters for creating a reservation. Also the booking request body on
/// the backend client's wire format.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationRequest {
    pub restaurant_id: String,
    pub user_id: String,
    pub date: String,
    pub time: String,
    pub party_size: u32,
}

/// Read-mostly store of restaurants, reviews and reservations.
///
/// `snapshot` hands out a logically atomic copy of the collection; the
/// search methods evaluate the pure matcher over such a snapshot, so a
/// search never observes a concurrent booking mid-computation.
pub trait RestaurantRepository: Send + Sync + 'static {
    /// Copy-on-read snapshot of every restaurant, in insertion order.
    fn snapshot(&self) -> Vec<Restaurant>;

    /// Point lookup; unknown ids are an error, unlike an empty search.
    fn restaurant_by_id(&self, id: &str) -> Result<Restaurant, Error>;

    fn restaurants_by_manager(&self, manager_id: &str) -> Vec<Restaurant>;

    /// Administrative/seed insertion.
    fn add_restaurant(&self, restaurant: Restaurant);

    fn reviews_for(&self, restaurant_id: &str) -> Vec<Review>;

    /// Records a review and recomputes the restaurant's derived rating and
    /// review count.
    fn add_review(&self, review: Review) -> Result<(), Error>;

    fn reservations_for_restaurant(&self, restaurant_id: &str) -> Vec<Reservation>;

    fn reservations_for_user(&self, user_id: &str) -> Vec<Reservation>;

    /// Books a table of the matching size class at the exact requested
    /// slot, decrementing inventory.
    fn create_reservation(&self, request: ReservationRequest) -> Result<Reservation, Error>;

    /// Cancels a reservation and restores its table. Idempotent: a second
    /// cancel returns the record without restocking again.
    fn cancel_reservation(&self, reservation_id: &str) -> Result<Reservation, Error>;

    /// Availability search over the current snapshot.
    fn search(&self, query: &SearchQuery) -> Result<Vec<SearchMatch>, Error> {
        search_restaurants(&self.snapshot(), query)
    }

    /// Qualifying slots for one restaurant and date; `NotFound` on an
    /// unknown id.
    fn available_slots(
        &self,
        restaurant_id: &str,
        date: &str,
        party_size: u32,
    ) -> Result<Vec<String>, Error> {
        let restaurant = self.restaurant_by_id(restaurant_id)?;
        available_time_slots(&restaurant, date, party_size)
    }
}

pub struct InMemoryRepository {
    restaurants: RwLock<Vec<Restaurant>>,
    reviews: DashMap<String, Vec<Review>>,
    reservations: RwLock<Vec<Reservation>>,
    next_reservation_id: AtomicU64,
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self {
            restaurants: RwLock::new(Vec::new()),
            reviews: DashMap::new(),
            reservations: RwLock::new(Vec::new()),
            next_reservation_id: AtomicU64::new(1),
        }
    }

    pub fn with_restaurants(restaurants: Vec<Restaurant>) -> Self {
        let repository = Self::new();
        repository.restaurants.write().extend(restaurants);
        repository
    }

    fn next_reservation_id(&self) -> String {
        format!("res-{}", self.next_reservation_id.fetch_add(1, Ordering::Relaxed))
    }
}

// The table class a party consumes. Booking and restocking must pick the
// same class, so both go through this.
fn class_count(inventory: &mut TableInventory, party_size: u32) -> &mut u32 {
    match party_size {
        1..=2 => &mut inventory.two_seater,
        3..=4 => &mut inventory.four_seater,
        _ => &mut inventory.large_group,
    }
}

impl RestaurantRepository for InMemoryRepository {
    fn snapshot(&self) -> Vec<Restaurant> {
        self.restaurants.read().clone()
    }

    fn restaurant_by_id(&self, id: &str) -> Result<Restaurant, Error> {
        self.restaurants
            .read()
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| Error::restaurant_not_found(id))
    }

    fn restaurants_by_manager(&self, manager_id: &str) -> Vec<Restaurant> {
        self.restaurants
            .read()
            .iter()
            .filter(|r| r.manager_id == manager_id)
            .cloned()
            .collect()
    }

    fn add_restaurant(&self, restaurant: Restaurant) {
        debug!(restaurant_id = %restaurant.id, name = %restaurant.name, "adding restaurant");
        self.restaurants.write().push(restaurant);
    }

    fn reviews_for(&self, restaurant_id: &str) -> Vec<Review> {
        self.reviews
            .get(restaurant_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    fn add_review(&self, review: Review) -> Result<(), Error> {
        let mut restaurants = self.restaurants.write();
        let restaurant = restaurants
            .iter_mut()
            .find(|r| r.id == review.restaurant_id)
            .ok_or_else(|| Error::restaurant_not_found(&review.restaurant_id))?;

        let mut entry = self.reviews.entry(review.restaurant_id.clone()).or_default();
        entry.push(review);

        let total: u32 = entry.iter().map(|r| u32::from(r.rating)).sum();
        restaurant.review_count = entry.len() as u32;
        restaurant.rating = f64::from(total) / entry.len() as f64;
        Ok(())
    }

    fn reservations_for_restaurant(&self, restaurant_id: &str) -> Vec<Reservation> {
        self.reservations
            .read()
            .iter()
            .filter(|r| r.restaurant_id == restaurant_id)
            .cloned()
            .collect()
    }

    fn reservations_for_user(&self, user_id: &str) -> Vec<Reservation> {
        self.reservations
            .read()
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect()
    }

    fn create_reservation(&self, request: ReservationRequest) -> Result<Reservation, Error> {
        if request.party_size == 0 {
            return Err(Error::InvalidPartySize(request.party_size));
        }
        if !is_valid_slot(&request.time) {
            return Err(Error::InvalidTimeSlot(request.time));
        }

        let mut restaurants = self.restaurants.write();
        let restaurant = restaurants
            .iter_mut()
            .find(|r| r.id == request.restaurant_id)
            .ok_or_else(|| Error::restaurant_not_found(&request.restaurant_id))?;

        let no_tables = || Error::NoTablesAvailable {
            restaurant_id: request.restaurant_id.clone(),
            date: request.date.clone(),
            time: request.time.clone(),
        };

        // Booking requires the exact slot; the search-time tolerance window
        // does not apply here.
        let count = restaurant
            .available_tables
            .get_mut(&request.date)
            .and_then(|slots| slots.get_mut(&request.time))
            .map(|inventory| class_count(inventory, request.party_size))
            .ok_or_else(no_tables)?;
        if *count == 0 {
            return Err(no_tables());
        }
        *count -= 1;
        restaurant.booked_today += 1;

        drop(restaurants);

        let reservation = Reservation {
            id: self.next_reservation_id(),
            restaurant_id: request.restaurant_id,
            user_id: request.user_id,
            date: request.date,
            time: request.time,
            party_size: request.party_size,
            status: ReservationStatus::Confirmed,
            created_at: Utc::now(),
        };
        debug!(
            reservation_id = %reservation.id,
            restaurant_id = %reservation.restaurant_id,
            date = %reservation.date,
            time = %reservation.time,
            party_size = reservation.party_size,
            "reservation confirmed"
        );

        self.reservations.write().push(reservation.clone());
        Ok(reservation)
    }

    fn cancel_reservation(&self, reservation_id: &str) -> Result<Reservation, Error> {
        // Never hold both locks at once.
        let reservation = {
            let mut reservations = self.reservations.write();
            let reservation = reservations
                .iter_mut()
                .find(|r| r.id == reservation_id)
                .ok_or_else(|| Error::reservation_not_found(reservation_id))?;

            if reservation.status != ReservationStatus::Confirmed {
                return Ok(reservation.clone());
            }
            reservation.status = ReservationStatus::Cancelled;
            reservation.clone()
        };

        let mut restaurants = self.restaurants.write();
        match restaurants.iter_mut().find(|r| r.id == reservation.restaurant_id) {
            Some(restaurant) => {
                let slots = restaurant
                    .available_tables
                    .entry(reservation.date.clone())
                    .or_default();
                let inventory = slots.entry(reservation.time.clone()).or_default();
                *class_count(inventory, reservation.party_size) += 1;
                restaurant.booked_today = restaurant.booked_today.saturating_sub(1);
            }
            None => {
                // Restaurant removed out from under its reservations; the
                // cancellation itself still stands.
                warn!(
                    reservation_id = %reservation.id,
                    restaurant_id = %reservation.restaurant_id,
                    "cancelled reservation for unknown restaurant, nothing to restock"
                );
            }
        }

        debug!(reservation_id = %reservation.id, "reservation cancelled");
        Ok(reservation)
    }
}

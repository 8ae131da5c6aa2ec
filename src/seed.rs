// Seed data for the repository: a fixed sample catalog, a seeded generator
// for larger datasets, and JSON fixture loading. Optional-field defaults
// are resolved here, at the data-access boundary, not in consumers.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::model::{Address, Coordinates, DayHours, Restaurant, TableInventory};
use crate::timeslot::all_time_slots;

fn inv(two_seater: u32, four_seater: u32, large_group: u32) -> TableInventory {
    TableInventory::new(two_seater, four_seater, large_group)
}

fn day_slots(entries: &[(&str, TableInventory)]) -> BTreeMap<String, TableInventory> {
    entries
        .iter()
        .map(|(time, inventory)| (time.to_string(), *inventory))
        .collect()
}

fn weekly_hours(open: &str, close: &str, close_weekend: &str, close_sunday: &str) -> BTreeMap<String, DayHours> {
    let hours = |open: &str, close: &str| DayHours {
        open: open.to_string(),
        close: close.to_string(),
    };
    [
        ("monday", close),
        ("tuesday", close),
        ("wednesday", close),
        ("thursday", close),
        ("friday", close_weekend),
        ("saturday", close_weekend),
        ("sunday", close_sunday),
    ]
    .into_iter()
    .map(|(day, closes)| (day.to_string(), hours(open, closes)))
    .collect()
}

#[allow(clippy::too_many_arguments)]
fn restaurant(
    id: &str,
    name: &str,
    description: &str,
    street: &str,
    city: &str,
    zip_code: &str,
    (lat, lng): (f64, f64),
    cuisine_type: &str,
    cost_rating: u8,
    rating: f64,
    review_count: u32,
    booked_today: u32,
    hours: BTreeMap<String, DayHours>,
    manager_id: &str,
) -> Restaurant {
    Restaurant {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        address: Address {
            street: street.to_string(),
            city: city.to_string(),
            state: "CA".to_string(),
            zip_code: zip_code.to_string(),
            coordinates: Coordinates { lat, lng },
        },
        cuisine_type: cuisine_type.to_string(),
        cost_rating,
        rating,
        review_count,
        images: Vec::new(),
        booked_today,
        hours,
        available_tables: BTreeMap::new(),
        manager_id: manager_id.to_string(),
    }
}

/// The fixed sample catalog: six San Francisco restaurants with two days of
/// table inventory each. Deterministic; used by tests and demos.
pub fn sample_restaurants() -> Vec<Restaurant> {
    let mut bistro = restaurant(
        "1",
        "The Burgundy Bistro",
        "An elegant French bistro with a cozy ambiance, serving authentic French cuisine with a modern twist.",
        "123 Main St",
        "San Francisco",
        "94105",
        (37.7749, -122.4194),
        "French",
        3,
        4.7,
        128,
        24,
        weekly_hours("17:00", "22:00", "23:00", "21:00"),
        "manager1",
    );
    bistro.available_tables.insert(
        "2025-04-15".to_string(),
        day_slots(&[
            ("17:00", inv(3, 2, 1)),
            ("17:30", inv(2, 1, 1)),
            ("18:00", inv(0, 2, 0)),
            ("18:30", inv(0, 0, 1)),
            ("19:00", inv(1, 0, 0)),
            ("19:30", inv(2, 1, 0)),
            ("20:00", inv(3, 2, 1)),
            ("20:30", inv(4, 2, 1)),
            ("21:00", inv(5, 3, 1)),
        ]),
    );
    bistro.available_tables.insert(
        "2025-04-16".to_string(),
        day_slots(&[
            ("17:00", inv(5, 3, 1)),
            ("17:30", inv(4, 3, 1)),
            ("18:00", inv(2, 2, 1)),
            ("18:30", inv(1, 1, 1)),
            ("19:00", inv(0, 0, 0)),
            ("19:30", inv(0, 1, 0)),
            ("20:00", inv(2, 2, 1)),
            ("20:30", inv(4, 2, 1)),
            ("21:00", inv(5, 3, 1)),
        ]),
    );

    let mut sakura = restaurant(
        "2",
        "Sakura Sushi",
        "Expertly crafted sushi and sashimi from the freshest ingredients, served in a tranquil garden-inspired setting.",
        "456 Market St",
        "San Francisco",
        "94102",
        (37.7895, -122.3999),
        "Japanese",
        4,
        4.9,
        256,
        42,
        weekly_hours("12:00", "22:00", "23:00", "21:00"),
        "manager2",
    );
    sakura.available_tables.insert(
        "2025-04-15".to_string(),
        day_slots(&[
            ("12:00", inv(4, 3, 1)),
            ("12:30", inv(3, 2, 1)),
            ("18:00", inv(2, 1, 0)),
            ("18:30", inv(0, 0, 0)),
            ("19:00", inv(0, 0, 0)),
            ("19:30", inv(1, 0, 0)),
            ("20:00", inv(2, 1, 1)),
            ("20:30", inv(3, 2, 1)),
            ("21:00", inv(4, 3, 1)),
        ]),
    );
    sakura.available_tables.insert(
        "2025-04-16".to_string(),
        day_slots(&[
            ("12:00", inv(5, 3, 1)),
            ("12:30", inv(4, 3, 1)),
            ("18:00", inv(3, 2, 1)),
            ("18:30", inv(2, 1, 0)),
            ("19:00", inv(1, 0, 0)),
            ("19:30", inv(0, 0, 0)),
            ("20:00", inv(1, 1, 0)),
            ("20:30", inv(3, 2, 1)),
            ("21:00", inv(4, 3, 1)),
        ]),
    );

    let mut trattoria = restaurant(
        "3",
        "Trattoria Italiana",
        "Family-owned trattoria serving homemade pasta and wood-fired pizzas from recipes passed down through generations.",
        "789 Mission St",
        "San Francisco",
        "94103",
        (37.7847, -122.4060),
        "Italian",
        2,
        4.5,
        189,
        18,
        weekly_hours("11:30", "22:00", "23:00", "21:00"),
        "manager3",
    );
    trattoria.available_tables.insert(
        "2025-04-15".to_string(),
        day_slots(&[
            ("11:30", inv(4, 3, 1)),
            ("12:00", inv(3, 2, 1)),
            ("18:00", inv(2, 1, 0)),
            ("18:30", inv(1, 0, 0)),
            ("19:00", inv(0, 0, 0)),
            ("19:30", inv(0, 0, 0)),
            ("20:00", inv(2, 1, 0)),
            ("20:30", inv(3, 2, 1)),
            ("21:00", inv(4, 3, 1)),
        ]),
    );

    let mut spice = restaurant(
        "4",
        "Spice Kingdom",
        "Traditional dishes from across India, each prepared with our signature blend of spices.",
        "321 Howard St",
        "San Francisco",
        "94105",
        (37.7914, -122.3944),
        "Indian",
        2,
        4.6,
        165,
        21,
        weekly_hours("11:00", "22:00", "23:00", "21:00"),
        "manager4",
    );
    spice.available_tables.insert(
        "2025-04-15".to_string(),
        day_slots(&[
            ("11:00", inv(4, 3, 1)),
            ("11:30", inv(3, 3, 1)),
            ("18:00", inv(0, 0, 0)),
            ("18:30", inv(0, 0, 0)),
            ("19:00", inv(1, 0, 0)),
            ("19:30", inv(2, 1, 0)),
            ("20:00", inv(3, 2, 1)),
            ("20:30", inv(4, 3, 1)),
            ("21:00", inv(5, 3, 1)),
        ]),
    );

    let mut smokehouse = restaurant(
        "5",
        "The Smokehouse Grill",
        "Southern barbecue: slow-smoked brisket, ribs and pulled pork from a custom-built smokehouse.",
        "555 Folsom St",
        "San Francisco",
        "94105",
        (37.7854, -122.3956),
        "American BBQ",
        2,
        4.4,
        203,
        32,
        weekly_hours("11:30", "21:00", "22:00", "21:00"),
        "manager5",
    );
    smokehouse.available_tables.insert(
        "2025-04-15".to_string(),
        day_slots(&[
            ("11:30", inv(3, 2, 1)),
            ("12:00", inv(2, 2, 1)),
            ("18:00", inv(0, 0, 0)),
            ("18:30", inv(0, 0, 0)),
            ("19:00", inv(1, 0, 0)),
            ("19:30", inv(2, 1, 0)),
            ("20:00", inv(3, 2, 1)),
            ("20:30", inv(4, 2, 1)),
        ]),
    );

    let mut coastal = restaurant(
        "6",
        "Coastal Seafood Co.",
        "Fresh seafood sourced daily from local fishermen, with spectacular ocean views.",
        "888 Embarcadero",
        "San Francisco",
        "94111",
        (37.8002, -122.4001),
        "Seafood",
        3,
        4.8,
        284,
        38,
        weekly_hours("12:00", "22:00", "23:00", "21:00"),
        "manager6",
    );
    coastal.available_tables.insert(
        "2025-04-15".to_string(),
        day_slots(&[
            ("12:00", inv(3, 2, 1)),
            ("12:30", inv(2, 2, 1)),
            ("18:00", inv(0, 0, 0)),
            ("18:30", inv(0, 0, 0)),
            ("19:00", inv(0, 0, 0)),
            ("19:30", inv(1, 0, 0)),
            ("20:00", inv(2, 1, 0)),
            ("20:30", inv(3, 2, 1)),
            ("21:00", inv(4, 3, 1)),
        ]),
    );

    vec![bistro, sakura, trattoria, spice, smokehouse, coastal]
}

const CUISINES: [&str; 8] = [
    "French", "Japanese", "Italian", "Indian", "American BBQ", "Seafood", "Mexican", "Thai",
];

const CITIES: [(&str, &str); 5] = [
    ("San Francisco", "94105"),
    ("Oakland", "94607"),
    ("Berkeley", "94704"),
    ("San Jose", "95113"),
    ("Palo Alto", "94301"),
];

/// Generated catalog of `count` restaurants with three days of inventory
/// starting at `start_date`. Reproducible: the same seed always yields the
/// same catalog.
pub fn generate_restaurants(count: usize, start_date: NaiveDate, seed: u64) -> Vec<Restaurant> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut restaurants = Vec::with_capacity(count);

    for i in 0..count {
        let (city, zip_code) = CITIES[rng.gen_range(0..CITIES.len())];
        let cuisine = CUISINES[rng.gen_range(0..CUISINES.len())];
        let mut r = restaurant(
            &format!("gen-{}", i + 1),
            &format!("{} Table No. {}", cuisine, i + 1),
            "",
            &format!("{} Main St", 100 + i),
            city,
            zip_code,
            (
                37.0 + rng.gen_range(0.0..1.0),
                -122.0 - rng.gen_range(0.0..1.0),
            ),
            cuisine,
            rng.gen_range(1..=4),
            (rng.gen_range(20..=50) as f64) / 10.0,
            rng.gen_range(0..500),
            rng.gen_range(0..60),
            weekly_hours("11:00", "22:00", "23:00", "21:00"),
            &format!("manager-gen-{}", i + 1),
        );

        for day in 0..3 {
            let date = (start_date + Duration::days(day)).format("%Y-%m-%d").to_string();
            let slots = all_time_slots()
                .iter()
                .map(|time| {
                    (
                        time.to_string(),
                        inv(
                            rng.gen_range(0..=5),
                            rng.gen_range(0..=3),
                            rng.gen_range(0..=1),
                        ),
                    )
                })
                .collect();
            r.available_tables.insert(date, slots);
        }

        restaurants.push(r);
    }

    restaurants
}

/// Loads a restaurant catalog from a JSON fixture file. Missing optional
/// fields deserialize to their defaults (see `model`).
pub fn load_fixture(path: impl AsRef<Path>) -> anyhow::Result<Vec<Restaurant>> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read fixture {}", path.display()))?;
    let restaurants: Vec<Restaurant> = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse fixture {}", path.display()))?;
    Ok(restaurants)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeslot::is_valid_slot;

    #[test]
    fn test_sample_catalog_shape() {
        let restaurants = sample_restaurants();
        assert_eq!(restaurants.len(), 6);

        let mut ids: Vec<_> = restaurants.iter().map(|r| r.id.clone()).collect();
        ids.dedup();
        assert_eq!(ids.len(), 6);

        for r in &restaurants {
            assert!((1..=4).contains(&r.cost_rating), "{} cost rating", r.id);
            assert!(!r.manager_id.is_empty());
            for slots in r.available_tables.values() {
                for time in slots.keys() {
                    assert!(is_valid_slot(time), "{} has off-catalog slot {}", r.id, time);
                }
            }
        }
    }

    #[test]
    fn test_generator_is_deterministic_per_seed() {
        let start = NaiveDate::from_ymd_opt(2025, 4, 15).unwrap();
        let a = generate_restaurants(10, start, 42);
        let b = generate_restaurants(10, start, 42);
        assert_eq!(a, b);

        let c = generate_restaurants(10, start, 43);
        assert_ne!(a, c);
    }

    #[test]
    fn test_generated_inventory_covers_requested_dates() {
        let start = NaiveDate::from_ymd_opt(2025, 4, 15).unwrap();
        let restaurants = generate_restaurants(3, start, 7);

        for r in &restaurants {
            let dates: Vec<_> = r.available_tables.keys().cloned().collect();
            assert_eq!(dates, ["2025-04-15", "2025-04-16", "2025-04-17"]);
            for slots in r.available_tables.values() {
                assert_eq!(slots.len(), all_time_slots().len());
            }
        }
    }

    #[test]
    fn test_fixture_round_trip() {
        let restaurants = sample_restaurants();
        let path = std::env::temp_dir().join(format!("booktable-fixture-{}.json", std::process::id()));
        std::fs::write(&path, serde_json::to_string_pretty(&restaurants).unwrap()).unwrap();

        let loaded = load_fixture(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, restaurants);
    }

    #[test]
    fn test_fixture_missing_file_is_an_error() {
        let err = load_fixture("/nonexistent/booktable.json").unwrap_err();
        assert!(err.to_string().contains("failed to read fixture"));
    }
}

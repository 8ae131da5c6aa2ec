// Availability search: matches a requested date/time/party size (and an
// optional free-text location) against per-restaurant table inventories.
// Pure functions over an immutable snapshot; no I/O, no mutation.

use tracing::debug;

use crate::error::Error;
use crate::model::{Restaurant, SearchMatch, SearchQuery, TableInventory};
use crate::timeslot::{tolerance_window, DEFAULT_SEARCH_RADIUS};

/// Whether an inventory can seat a party of the given size.
///
/// The match is class-based, never capacity-summing: a party of 3 requires
/// a four-seater and cannot be seated by combining two two-seaters. Parties
/// of 1-2 consume only two-seaters, 3-4 only four-seaters, 5+ only
/// large-group tables.
pub fn satisfies_party_size(inventory: &TableInventory, party_size: u32) -> Result<bool, Error> {
    if party_size == 0 {
        return Err(Error::InvalidPartySize(party_size));
    }
    Ok(seats_party(inventory, party_size))
}

// Callers that have already validated the party size.
fn seats_party(inventory: &TableInventory, party_size: u32) -> bool {
    match party_size {
        1..=2 => inventory.two_seater > 0,
        3..=4 => inventory.four_seater > 0,
        _ => inventory.large_group > 0,
    }
}

/// Every slot on `date` whose inventory can seat the party, across the
/// whole service day, in chronological order. A date with no recorded
/// inventory yields an empty list, not an error.
pub fn available_time_slots(
    restaurant: &Restaurant,
    date: &str,
    party_size: u32,
) -> Result<Vec<String>, Error> {
    if party_size == 0 {
        return Err(Error::InvalidPartySize(party_size));
    }

    let Some(slots) = restaurant.inventory_for(date) else {
        return Ok(Vec::new());
    };

    Ok(slots
        .iter()
        .filter(|(_, inventory)| seats_party(inventory, party_size))
        .map(|(time, _)| time.clone())
        .collect())
}

/// Restaurants matching the query, in snapshot order. A restaurant matches
/// when it passes the location filter (if any) and has a qualifying table
/// at the requested time or within one slot either side of it. Each match
/// carries the full-day qualifying slots for the requested date.
///
/// Zero matches is success with an empty vector; only malformed input
/// (unknown time slot, zero party size) is an error.
pub fn search_restaurants(
    restaurants: &[Restaurant],
    query: &SearchQuery,
) -> Result<Vec<SearchMatch>, Error> {
    if query.party_size == 0 {
        return Err(Error::InvalidPartySize(query.party_size));
    }
    let window = tolerance_window(&query.time, DEFAULT_SEARCH_RADIUS)?;

    let mut matches = Vec::new();
    for restaurant in restaurants {
        if let Some(location) = query.location.as_deref() {
            if !location.is_empty() && !restaurant.matches_location(location) {
                continue;
            }
        }

        let Some(slots) = restaurant.inventory_for(&query.date) else {
            continue;
        };

        let available = window.iter().any(|slot| {
            slots
                .get(*slot)
                .is_some_and(|inventory| seats_party(inventory, query.party_size))
        });
        if !available {
            continue;
        }

        debug!(
            restaurant_id = %restaurant.id,
            date = %query.date,
            time = %query.time,
            "restaurant matches availability query"
        );
        matches.push(SearchMatch {
            available_slots: available_time_slots(restaurant, &query.date, query.party_size)?,
            restaurant: restaurant.clone(),
        });
    }

    Ok(matches)
}

/// Keys an external collaborator may sort search output by. Sorting is a
/// presentation concern; the matcher itself never reorders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Rating,
    ReviewCount,
    CostRating,
    BookedToday,
}

/// Deterministic sort over exposed fields: primary key descending, ties
/// broken by restaurant id ascending.
pub fn sort_matches(matches: &mut [SearchMatch], key: SortKey) {
    matches.sort_by(|a, b| {
        let (ra, rb) = (&a.restaurant, &b.restaurant);
        let primary = match key {
            SortKey::Rating => rb.rating.total_cmp(&ra.rating),
            SortKey::ReviewCount => rb.review_count.cmp(&ra.review_count),
            SortKey::CostRating => rb.cost_rating.cmp(&ra.cost_rating),
            SortKey::BookedToday => rb.booked_today.cmp(&ra.booked_today),
        };
        primary.then_with(|| ra.id.cmp(&rb.id))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Address;
    use test_case::test_case;

    fn restaurant(id: &str) -> Restaurant {
        Restaurant {
            id: id.to_string(),
            name: format!("Restaurant {}", id),
            cuisine_type: "French".to_string(),
            address: Address {
                street: "123 Main St".to_string(),
                city: "San Francisco".to_string(),
                state: "CA".to_string(),
                zip_code: "94105".to_string(),
                ..Address::default()
            },
            ..Restaurant::default()
        }
    }

    fn with_inventory(id: &str, date: &str, entries: &[(&str, TableInventory)]) -> Restaurant {
        let mut r = restaurant(id);
        let slots = r.available_tables.entry(date.to_string()).or_default();
        for (time, inventory) in entries {
            slots.insert(time.to_string(), *inventory);
        }
        r
    }

    // Class-based matching: each party-size band looks at exactly one count.
    #[test_case(1, TableInventory::new(1, 0, 0), true; "solo uses two seater")]
    #[test_case(2, TableInventory::new(1, 0, 0), true; "couple uses two seater")]
    #[test_case(2, TableInventory::new(0, 5, 5), false; "couple ignores larger tables")]
    #[test_case(3, TableInventory::new(5, 0, 5), false; "party of three needs four seater")]
    #[test_case(4, TableInventory::new(0, 1, 0), true; "party of four uses four seater")]
    #[test_case(5, TableInventory::new(5, 5, 0), false; "large party needs large group table")]
    #[test_case(8, TableInventory::new(0, 0, 1), true; "large party uses large group table")]
    #[test_case(2, TableInventory::new(0, 0, 0), false; "empty inventory seats nobody")]
    fn test_satisfies_party_size(party_size: u32, inventory: TableInventory, expected: bool) {
        assert_eq!(satisfies_party_size(&inventory, party_size).unwrap(), expected);
    }

    #[test]
    fn test_zero_party_size_is_invalid_everywhere() {
        let inventory = TableInventory::new(1, 1, 1);
        assert_eq!(
            satisfies_party_size(&inventory, 0).unwrap_err(),
            Error::InvalidPartySize(0)
        );

        let r = with_inventory("1", "2025-04-15", &[("19:00", inventory)]);
        assert_eq!(
            available_time_slots(&r, "2025-04-15", 0).unwrap_err(),
            Error::InvalidPartySize(0)
        );
        assert_eq!(
            search_restaurants(&[r], &SearchQuery::new("2025-04-15", "19:00", 0)).unwrap_err(),
            Error::InvalidPartySize(0)
        );
    }

    #[test]
    fn test_available_time_slots_scans_whole_day_in_order() {
        let r = with_inventory(
            "1",
            "2025-04-15",
            &[
                ("21:00", TableInventory::new(5, 3, 1)),
                ("11:00", TableInventory::new(3, 2, 1)),
                ("18:00", TableInventory::new(0, 2, 0)),
                ("19:00", TableInventory::new(1, 0, 0)),
            ],
        );

        assert_eq!(
            available_time_slots(&r, "2025-04-15", 2).unwrap(),
            ["11:00", "19:00", "21:00"]
        );
        assert_eq!(
            available_time_slots(&r, "2025-04-15", 4).unwrap(),
            ["11:00", "18:00", "21:00"]
        );
        assert_eq!(available_time_slots(&r, "2025-04-15", 6).unwrap(), ["11:00", "21:00"]);
    }

    #[test]
    fn test_missing_date_yields_empty_slots_not_error() {
        let r = with_inventory("1", "2025-04-15", &[("19:00", TableInventory::new(1, 1, 1))]);
        for party_size in [1, 2, 4, 6] {
            assert!(available_time_slots(&r, "2025-04-20", party_size)
                .unwrap()
                .is_empty());
        }
    }

    // Scenario A: exact-slot hit for a couple, miss for a party of four.
    #[test]
    fn test_exact_slot_match_by_table_class() {
        let r = with_inventory("1", "2025-04-15", &[("19:00", TableInventory::new(1, 0, 0))]);

        let query = SearchQuery::new("2025-04-15", "19:00", 2);
        let results = search_restaurants(std::slice::from_ref(&r), &query).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].restaurant.id, "1");
        assert_eq!(results[0].available_slots, ["19:00"]);

        let query = SearchQuery::new("2025-04-15", "19:00", 4);
        assert!(search_restaurants(std::slice::from_ref(&r), &query)
            .unwrap()
            .is_empty());
    }

    // Scenario B: the tolerance window admits a neighboring slot.
    #[test]
    fn test_neighboring_slot_within_tolerance_matches() {
        let r = with_inventory("1", "2025-04-15", &[("19:00", TableInventory::new(1, 0, 0))]);

        let query = SearchQuery::new("2025-04-15", "19:30", 2);
        let results = search_restaurants(std::slice::from_ref(&r), &query).unwrap();
        assert_eq!(results.len(), 1);

        // Two slots away is outside the window.
        let query = SearchQuery::new("2025-04-15", "20:00", 2);
        assert!(search_restaurants(std::slice::from_ref(&r), &query)
            .unwrap()
            .is_empty());
    }

    // Scenario C: a failing location filter excludes regardless of availability.
    #[test]
    fn test_location_filter_excludes_before_availability() {
        let r = with_inventory("1", "2025-04-15", &[("19:00", TableInventory::new(3, 3, 3))]);

        let query = SearchQuery::new("2025-04-15", "19:00", 2).with_location("99999");
        assert!(search_restaurants(std::slice::from_ref(&r), &query)
            .unwrap()
            .is_empty());
    }

    #[test_case("san francisco", true; "city")]
    #[test_case("94105", true; "zip code")]
    #[test_case("ca", true; "state")]
    #[test_case("restaurant 1", true; "name")]
    #[test_case("french", true; "cuisine")]
    #[test_case("portland", false; "other city")]
    fn test_location_filter_fields(location: &str, expected: bool) {
        let r = with_inventory("1", "2025-04-15", &[("19:00", TableInventory::new(1, 0, 0))]);
        let query = SearchQuery::new("2025-04-15", "19:00", 2).with_location(location);
        let results = search_restaurants(std::slice::from_ref(&r), &query).unwrap();
        assert_eq!(!results.is_empty(), expected);
    }

    #[test]
    fn test_empty_location_filter_is_no_filter() {
        let r = with_inventory("1", "2025-04-15", &[("19:00", TableInventory::new(1, 0, 0))]);
        let query = SearchQuery::new("2025-04-15", "19:00", 2).with_location("");
        assert_eq!(search_restaurants(&[r], &query).unwrap().len(), 1);
    }

    #[test]
    fn test_restaurant_without_date_inventory_is_excluded() {
        let r = with_inventory("1", "2025-04-15", &[("19:00", TableInventory::new(3, 3, 3))]);
        let query = SearchQuery::new("2025-04-16", "19:00", 2);
        assert!(search_restaurants(&[r], &query).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_time_slot_fails_with_no_partial_result() {
        let r = with_inventory("1", "2025-04-15", &[("19:00", TableInventory::new(3, 3, 3))]);
        let query = SearchQuery::new("2025-04-15", "19:15", 2);
        assert_eq!(
            search_restaurants(&[r], &query).unwrap_err(),
            Error::InvalidTimeSlot("19:15".to_string())
        );
    }

    #[test]
    fn test_search_is_idempotent_and_order_stable() {
        let snapshot = vec![
            with_inventory("3", "2025-04-15", &[("19:00", TableInventory::new(1, 0, 0))]),
            with_inventory("1", "2025-04-15", &[("19:30", TableInventory::new(2, 1, 0))]),
            with_inventory("2", "2025-04-15", &[("18:00", TableInventory::new(0, 0, 0))]),
            with_inventory("4", "2025-04-15", &[("20:00", TableInventory::new(1, 1, 1))]),
        ];
        let query = SearchQuery::new("2025-04-15", "19:30", 2);

        let first = search_restaurants(&snapshot, &query).unwrap();
        let second = search_restaurants(&snapshot, &query).unwrap();
        assert_eq!(first, second);

        // Snapshot insertion order, not id order.
        let ids: Vec<_> = first.iter().map(|m| m.restaurant.id.as_str()).collect();
        assert_eq!(ids, ["3", "1", "4"]);
    }

    #[test]
    fn test_sort_matches_descending_with_id_tie_break() {
        let mut matches: Vec<SearchMatch> = [
            ("b", 4.5, 100, 2, 30),
            ("a", 4.5, 250, 3, 30),
            ("c", 4.8, 50, 1, 10),
        ]
        .into_iter()
        .map(|(id, rating, reviews, cost, booked)| {
            let mut r = restaurant(id);
            r.rating = rating;
            r.review_count = reviews;
            r.cost_rating = cost;
            r.booked_today = booked;
            SearchMatch {
                restaurant: r,
                available_slots: vec![],
            }
        })
        .collect();

        let ids = |matches: &[SearchMatch]| -> Vec<String> {
            matches.iter().map(|m| m.restaurant.id.clone()).collect()
        };

        sort_matches(&mut matches, SortKey::Rating);
        assert_eq!(ids(&matches), ["c", "a", "b"]); // 4.5 tie broken by id

        sort_matches(&mut matches, SortKey::ReviewCount);
        assert_eq!(ids(&matches), ["a", "b", "c"]);

        sort_matches(&mut matches, SortKey::CostRating);
        assert_eq!(ids(&matches), ["a", "b", "c"]);

        sort_matches(&mut matches, SortKey::BookedToday);
        assert_eq!(ids(&matches), ["a", "b", "c"]); // 30 tie broken by id
    }
}

// Canonical time-slot catalog and tolerance window computation.
// The catalog is the single source of truth for valid slot keys; every
// inventory entry and search request is keyed by one of these values.

use crate::error::Error;

/// Half-hour marks spanning lunch and dinner service, in chronological
/// order. Zero-padded `HH:MM`, so lexicographic order equals time order.
pub const ALL_TIME_SLOTS: [&str; 22] = [
    "11:00", "11:30", "12:00", "12:30", "13:00", "13:30", "14:00", "14:30", "15:00", "15:30",
    "16:00", "16:30", "17:00", "17:30", "18:00", "18:30", "19:00", "19:30", "20:00", "20:30",
    "21:00", "21:30",
];

/// Default tolerance radius for searches: one slot (30 minutes) either side
/// of the requested time.
pub const DEFAULT_SEARCH_RADIUS: usize = 1;

/// The full ordered catalog of bookable time slots.
pub fn all_time_slots() -> &'static [&'static str] {
    &ALL_TIME_SLOTS
}

/// Position of a slot key in the catalog, or `None` for unknown keys.
pub fn slot_index(time: &str) -> Option<usize> {
    ALL_TIME_SLOTS.iter().position(|slot| *slot == time)
}

/// Whether a slot key is part of the canonical catalog.
pub fn is_valid_slot(time: &str) -> bool {
    slot_index(time).is_some()
}

/// The contiguous run of catalog slots within `radius` positions of the
/// requested time, clamped to the catalog bounds. This is the "close
/// enough" policy for search: a restaurant counts as available if it can
/// seat the party at any slot in the window.
pub fn tolerance_window(requested_time: &str, radius: usize) -> Result<&'static [&'static str], Error> {
    let index =
        slot_index(requested_time).ok_or_else(|| Error::InvalidTimeSlot(requested_time.to_string()))?;

    let start = index.saturating_sub(radius);
    let end = (index + radius).min(ALL_TIME_SLOTS.len() - 1);

    Ok(&ALL_TIME_SLOTS[start..=end])
}

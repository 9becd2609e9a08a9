//! Shared identifier aliases, sentinels and place parsing.

/// Athlete identifier as it appears in the raw export.
pub type UserId = String;
/// Contest identifier as it appears in the raw export.
pub type ContestId = String;
/// Monotonic counter of published index snapshots.
pub type Generation = u64;

/// Numeric place assigned to every non-numeric placement (DNF, DNQ, DSQ, empty).
pub const DNF_PLACE: u32 = 999;
/// Raw place used when a participation carries no place at all.
pub const DNF_PLACE_RAW: &str = "DNF";
/// Leaderboard size used when the caller does not ask for one.
pub const DEFAULT_LEADERBOARD_LIMIT: usize = 50;

/// Parses a raw place string, mapping anything non-numeric to [`DNF_PLACE`].
///
/// Surrounding whitespace is ignored; negative numbers count as non-numeric.
pub fn parse_place(place: &str) -> u32 {
    place.trim().parse::<u32>().unwrap_or(DNF_PLACE)
}

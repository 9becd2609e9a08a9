//! Normalized entity rows produced by [`crate::core::normalize`].

use serde::Serialize;

use crate::types::{ContestId, UserId};

/// One athlete, deduplicated across every contest they appear in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Athlete identifier.
    pub id: UserId,
    /// Display name from the first participation seen.
    pub name: String,
    /// Country of the first contest the athlete was seen in.
    pub country: String,
    /// Sum of points over every participation.
    pub total_points: u64,
    /// Number of participations.
    pub contests_participated: u32,
    /// Earliest contest date, by string comparison.
    pub first_competition: String,
    /// Latest contest date, by string comparison.
    pub last_competition: String,
}

/// One contest with its descriptive fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Contest {
    /// Contest identifier.
    pub id: ContestId,
    /// Contest name.
    pub name: String,
    /// Lowercased name used by contest search.
    #[serde(skip_serializing)]
    pub name_lower: String,
    /// Discipline label.
    pub discipline: String,
    /// Contest date.
    pub date: String,
    /// Host country.
    pub country: String,
    /// Host city.
    pub city: String,
    /// Prize value as displayed.
    pub prize: String,
    /// Gender code.
    pub gender: String,
    /// Category code.
    pub category: String,
    /// Number of participations recorded for this contest.
    pub participant_count: usize,
}

/// A participation seen from the athlete's side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AthleteResult {
    /// Athlete identifier.
    pub user_id: UserId,
    /// Contest identifier.
    pub contest_id: ContestId,
    /// Raw place string.
    pub place: String,
    /// Points earned.
    pub points: u32,
    /// `"{contest_id}#{place}"` with the place left-padded to three characters.
    pub contest_place_key: String,
}

/// A participation seen from the contest's side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    /// Contest identifier.
    pub contest_id: ContestId,
    /// Athlete identifier.
    pub user_id: UserId,
    /// Raw place string.
    pub place: String,
    /// Points earned.
    pub points: u32,
    /// Parsed place, [`crate::types::DNF_PLACE`] when not numeric.
    pub place_numeric: u32,
}

/// The four collections produced by one normalization pass.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Normalized {
    /// Users in first-seen order.
    pub users: Vec<User>,
    /// Contests in input order.
    pub contests: Vec<Contest>,
    /// Results in input order.
    pub results: Vec<AthleteResult>,
    /// Participants in input order.
    pub participants: Vec<Participant>,
}

impl Normalized {
    /// Returns true when no contest was normalized.
    pub fn is_empty(&self) -> bool {
        self.contests.is_empty()
    }
}

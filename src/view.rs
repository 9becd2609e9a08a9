//! Borrowed join and summary views returned by [`crate::core::index::RankingIndex`].
//!
//! Views point into the index's owned rows, so they live no longer than the
//! index snapshot they came from.

use serde::Serialize;

use crate::record::{AthleteResult, Contest, Participant, User};

/// A user joined with every result row carrying its id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserWithResults<'a> {
    /// The user row.
    pub user: &'a User,
    /// Results in contest input order.
    pub results: Vec<&'a AthleteResult>,
}

/// A contest joined with its participants, best place first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContestWithParticipants<'a> {
    /// The contest row.
    pub contest: &'a Contest,
    /// Participants sorted by numeric place.
    pub participants: Vec<&'a Participant>,
}

/// One participation flattened with the contest and athlete it links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContestSummary<'a> {
    /// Contest identifier.
    pub contest_id: &'a str,
    /// Contest name.
    pub contest_name: &'a str,
    /// Contest date.
    pub date: &'a str,
    /// Discipline label.
    pub discipline: &'a str,
    /// Athlete identifier.
    pub user_id: &'a str,
    /// Athlete display name.
    pub user_name: &'a str,
    /// Raw place string, kept for display.
    pub place: &'a str,
    /// Points earned.
    pub points: u32,
}

/// Row counts of an index snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct IndexStats {
    /// Distinct users.
    pub users: usize,
    /// Distinct contests.
    pub contests: usize,
    /// Result rows.
    pub results: usize,
    /// Participant rows.
    pub participants: usize,
}

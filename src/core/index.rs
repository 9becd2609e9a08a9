use tracing::debug;

use crate::{
    core::{
        indices::{PosIndex, VecIndex},
        normalize::normalize,
    },
    raw::RawContest,
    record::{AthleteResult, Contest, Normalized, Participant, User},
    types::{ContestId, UserId, parse_place},
    view::{ContestSummary, ContestWithParticipants, IndexStats, UserWithResults},
};

/// Immutable, fully indexed projection of one contest export.
///
/// Rows are stored once in their collections; every index holds positions.
/// All query methods are pure reads, so a built index can be shared across
/// threads behind an `Arc` without locking.
#[derive(Debug, Default)]
pub struct RankingIndex {
    data: Normalized,
    user_pos: PosIndex<UserId>,
    contest_pos: PosIndex<ContestId>,
    results_by_user: VecIndex<UserId>,
    participants_by_contest: VecIndex<ContestId>,
}

impl RankingIndex {
    /// Returns an index with no rows.
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalizes `raw` and indexes the result.
    pub fn from_raw(raw: &[RawContest]) -> Self {
        Self::build(normalize(raw))
    }

    /// Indexes already normalized collections in one pass over each.
    pub fn build(data: Normalized) -> Self {
        let mut index = Self {
            data,
            ..Self::default()
        };

        for (pos, user) in index.data.users.iter().enumerate() {
            index.user_pos.entry(user.id.clone()).or_insert(pos);
        }
        for (pos, contest) in index.data.contests.iter().enumerate() {
            index.contest_pos.entry(contest.id.clone()).or_insert(pos);
        }
        for (pos, result) in index.data.results.iter().enumerate() {
            index
                .results_by_user
                .entry(result.user_id.clone())
                .or_default()
                .push(pos);
        }
        for (pos, participant) in index.data.participants.iter().enumerate() {
            index
                .participants_by_contest
                .entry(participant.contest_id.clone())
                .or_default()
                .push(pos);
        }

        let stats = index.stats();
        debug!(?stats, "built ranking index");
        index
    }

    /// Looks up a user by id.
    pub fn user(&self, id: &str) -> Option<&User> {
        self.user_pos.get(id).map(|pos| &self.data.users[*pos])
    }

    /// Looks up a contest by id.
    pub fn contest(&self, id: &str) -> Option<&Contest> {
        self.contest_pos.get(id).map(|pos| &self.data.contests[*pos])
    }

    /// Users in first-seen order.
    pub fn users(&self) -> &[User] {
        &self.data.users
    }

    /// Contests in input order.
    pub fn contests(&self) -> &[Contest] {
        &self.data.contests
    }

    /// Results in input order.
    pub fn results(&self) -> &[AthleteResult] {
        &self.data.results
    }

    /// Participants in input order.
    pub fn participants(&self) -> &[Participant] {
        &self.data.participants
    }

    /// The collections this index was built from.
    pub fn normalized(&self) -> &Normalized {
        &self.data
    }

    /// Row counts of every collection.
    pub fn stats(&self) -> IndexStats {
        IndexStats {
            users: self.data.users.len(),
            contests: self.data.contests.len(),
            results: self.data.results.len(),
            participants: self.data.participants.len(),
        }
    }

    /// The user joined with its results in contest input order.
    pub fn user_with_results(&self, user_id: &str) -> Option<UserWithResults<'_>> {
        let user = self.user(user_id)?;
        Some(UserWithResults {
            user,
            results: self.user_result_rows(user_id).collect(),
        })
    }

    /// The contest joined with its participants, ascending by numeric place.
    ///
    /// Participants sharing a place keep their listing order.
    pub fn contest_with_participants(&self, contest_id: &str) -> Option<ContestWithParticipants<'_>> {
        let contest = self.contest(contest_id)?;
        let mut participants: Vec<&Participant> = self.contest_participant_rows(contest_id).collect();
        participants.sort_by_key(|p| p.place_numeric);
        Some(ContestWithParticipants {
            contest,
            participants,
        })
    }

    /// Every contest the user took part in, most recent date first.
    pub fn user_contests(&self, user_id: &str) -> Vec<ContestSummary<'_>> {
        let mut out: Vec<ContestSummary<'_>> = self
            .user_result_rows(user_id)
            .filter_map(|r| self.summary(&r.contest_id, &r.user_id, &r.place, r.points))
            .collect();
        out.sort_by(|a, b| b.date.cmp(a.date));
        out
    }

    /// Every participant of the contest, ascending by place parsed from the
    /// raw place string.
    pub fn contest_results(&self, contest_id: &str) -> Vec<ContestSummary<'_>> {
        let mut out: Vec<ContestSummary<'_>> = self
            .contest_participant_rows(contest_id)
            .filter_map(|p| self.summary(&p.contest_id, &p.user_id, &p.place, p.points))
            .collect();
        out.sort_by_key(|s| parse_place(s.place));
        out
    }

    /// Users whose name contains `pattern`, ignoring case, highest total first.
    ///
    /// An empty pattern matches every user.
    pub fn search_users(&self, pattern: &str) -> Vec<&User> {
        let needle = pattern.to_lowercase();
        let mut out: Vec<&User> = self
            .data
            .users
            .iter()
            .filter(|u| u.name.to_lowercase().contains(&needle))
            .collect();
        sort_by_points(&mut out);
        out
    }

    /// Contests whose name contains `pattern`, ignoring case, most recent first.
    ///
    /// An empty pattern matches every contest.
    pub fn search_contests(&self, pattern: &str) -> Vec<&Contest> {
        let needle = pattern.to_lowercase();
        let mut out: Vec<&Contest> = self
            .data
            .contests
            .iter()
            .filter(|c| c.name_lower.contains(&needle))
            .collect();
        out.sort_by(|a, b| b.date.cmp(&a.date));
        out
    }

    /// The `limit` users with the most points; ties keep first-seen order.
    pub fn leaderboard(&self, limit: usize) -> Vec<&User> {
        let mut out: Vec<&User> = self.data.users.iter().collect();
        sort_by_points(&mut out);
        out.truncate(limit);
        out
    }

    fn user_result_rows<'a>(&'a self, user_id: &str) -> impl Iterator<Item = &'a AthleteResult> + use<'a> {
        self.results_by_user
            .get(user_id)
            .into_iter()
            .flat_map(|positions| positions.iter())
            .map(move |pos| &self.data.results[*pos])
    }

    fn contest_participant_rows<'a>(
        &'a self,
        contest_id: &str,
    ) -> impl Iterator<Item = &'a Participant> + use<'a> {
        self.participants_by_contest
            .get(contest_id)
            .into_iter()
            .flat_map(|positions| positions.iter())
            .map(move |pos| &self.data.participants[*pos])
    }

    fn summary<'a>(
        &'a self,
        contest_id: &str,
        user_id: &str,
        place: &'a str,
        points: u32,
    ) -> Option<ContestSummary<'a>> {
        let contest = self.contest(contest_id)?;
        let user = self.user(user_id)?;
        Some(ContestSummary {
            contest_id: &contest.id,
            contest_name: &contest.name,
            date: &contest.date,
            discipline: &contest.discipline,
            user_id: &user.id,
            user_name: &user.name,
            place,
            points,
        })
    }
}

// Stable, so equal totals keep the order they were collected in.
fn sort_by_points(users: &mut [&User]) {
    users.sort_by(|a, b| b.total_points.cmp(&a.total_points));
}

use hashbrown::{HashMap, HashSet};
use tracing::{debug, warn};

use crate::{
    raw::{RawContest, RawParticipation},
    record::{AthleteResult, Contest, Normalized, Participant, User},
    types::parse_place,
};

/// Splits a denormalized contest export into users, contests, results and
/// participants.
///
/// Users surface in first-seen order; everything else keeps input order.
/// User aggregates are folded in as each participation is visited. A
/// contest id that repeats is merged into the first row carrying it, and its
/// participations take that row's date and country.
pub fn normalize(raw: &[RawContest]) -> Normalized {
    let mut out = Normalized::default();
    let mut user_pos: HashMap<&str, usize> = HashMap::new();
    let mut contest_pos: HashMap<&str, usize> = HashMap::new();
    let mut pairs: HashSet<(usize, usize)> = HashSet::new();

    for contest in raw {
        let cpos = match contest_pos.get(contest.id.as_str()) {
            Some(&pos) => {
                warn!(contest_id = %contest.id, "duplicate contest id, merging participations");
                out.contests[pos].participant_count += contest.athletes.len();
                pos
            }
            None => {
                let pos = out.contests.len();
                contest_pos.insert(contest.id.as_str(), pos);
                out.contests.push(contest_row(contest));
                pos
            }
        };

        let row = &out.contests[cpos];
        for athlete in &contest.athletes {
            let upos = match user_pos.get(athlete.athlete_id.as_str()) {
                Some(&pos) => {
                    fold_into(&mut out.users[pos], athlete, &row.date);
                    pos
                }
                None => {
                    let pos = out.users.len();
                    user_pos.insert(athlete.athlete_id.as_str(), pos);
                    out.users.push(new_user(athlete, row));
                    pos
                }
            };

            if !pairs.insert((upos, cpos)) {
                warn!(
                    user_id = %athlete.athlete_id,
                    contest_id = %contest.id,
                    "athlete listed more than once in a contest"
                );
            }

            out.results.push(AthleteResult {
                user_id: athlete.athlete_id.clone(),
                contest_id: contest.id.clone(),
                place: athlete.place.clone(),
                points: athlete.points,
                contest_place_key: format!("{}#{:0>3}", contest.id, athlete.place),
            });
            out.participants.push(Participant {
                contest_id: contest.id.clone(),
                user_id: athlete.athlete_id.clone(),
                place: athlete.place.clone(),
                points: athlete.points,
                place_numeric: parse_place(&athlete.place),
            });
        }
    }

    debug!(
        users = out.users.len(),
        contests = out.contests.len(),
        results = out.results.len(),
        "normalized contest export"
    );
    out
}

fn contest_row(raw: &RawContest) -> Contest {
    Contest {
        id: raw.id.clone(),
        name: raw.name.clone(),
        name_lower: raw.name.to_lowercase(),
        discipline: raw.discipline.clone(),
        date: raw.date.clone(),
        country: raw.country.clone(),
        city: raw.city.clone(),
        prize: raw.prize.clone(),
        gender: raw.gender.clone(),
        category: raw.category.clone(),
        participant_count: raw.athletes.len(),
    }
}

fn new_user(athlete: &RawParticipation, contest: &Contest) -> User {
    User {
        id: athlete.athlete_id.clone(),
        name: athlete.name.clone(),
        country: contest.country.clone(),
        total_points: u64::from(athlete.points),
        contests_participated: 1,
        first_competition: contest.date.clone(),
        last_competition: contest.date.clone(),
    }
}

// Dates compare as strings; zero-padded ISO dates sort chronologically.
fn fold_into(user: &mut User, athlete: &RawParticipation, date: &str) {
    user.total_points += u64::from(athlete.points);
    user.contests_participated += 1;
    if date < user.first_competition.as_str() {
        user.first_competition = date.to_string();
    }
    if date > user.last_competition.as_str() {
        user.last_competition = date.to_string();
    }
}

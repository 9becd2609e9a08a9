use hashbrown::HashMap;
use proptest::prelude::*;

use podium::{
    core::{RankingIndex, normalize},
    raw::{RawContest, RawParticipation},
    types::parse_place,
};

const PLACES: &[&str] = &["1", "2", "3", "4", "10", "25", "DNF", "DNQ", "DSQ", ""];

fn participation_strategy() -> impl Strategy<Value = RawParticipation> {
    (0u8..12, 0usize..PLACES.len(), 0u32..200).prop_map(|(athlete, place_idx, points)| {
        RawParticipation {
            athlete_id: format!("u{athlete}"),
            name: format!("Athlete {athlete}"),
            place: PLACES[place_idx].to_string(),
            points,
        }
    })
}

fn contest_strategy() -> impl Strategy<Value = RawContest> {
    (
        0u8..8,
        2020u16..2025,
        1u8..13,
        1u8..29,
        prop::collection::vec(participation_strategy(), 0..8),
    )
        .prop_map(|(id, year, month, day, athletes)| RawContest {
            id: format!("c{id}"),
            name: format!("Contest {id}"),
            discipline: "boulder".to_string(),
            date: format!("{year:04}-{month:02}-{day:02}"),
            country: format!("K{}", id % 3),
            city: String::new(),
            prize: String::new(),
            gender: String::new(),
            category: String::new(),
            athletes,
        })
}

fn export_strategy() -> impl Strategy<Value = Vec<RawContest>> {
    prop::collection::vec(contest_strategy(), 0..12)
}

proptest! {
    #[test]
    fn aggregates_match_result_rows(raw in export_strategy()) {
        let out = normalize(&raw);

        let mut totals: HashMap<&str, (u64, u32)> = HashMap::new();
        for r in &out.results {
            let e = totals.entry(r.user_id.as_str()).or_insert((0, 0));
            e.0 += u64::from(r.points);
            e.1 += 1;
        }

        prop_assert_eq!(totals.len(), out.users.len());
        for u in &out.users {
            let (points, count) = totals[u.id.as_str()];
            prop_assert_eq!(u.total_points, points);
            prop_assert_eq!(u.contests_participated, count);
            prop_assert!(u.first_competition <= u.last_competition);
        }
    }

    #[test]
    fn participant_counts_match_rows(raw in export_strategy()) {
        let out = normalize(&raw);

        let mut counts: HashMap<&str, usize> = HashMap::new();
        for p in &out.participants {
            *counts.entry(p.contest_id.as_str()).or_insert(0) += 1;
        }

        for c in &out.contests {
            prop_assert_eq!(c.participant_count, counts.get(c.id.as_str()).copied().unwrap_or(0));
        }
    }

    #[test]
    fn rebuild_is_deterministic(raw in export_strategy()) {
        prop_assert_eq!(normalize(&raw), normalize(&raw));
    }

    #[test]
    fn query_orderings_hold(raw in export_strategy(), pattern in "[a-z0-9 ]{0,3}") {
        let index = RankingIndex::from_raw(&raw);

        for c in index.contests() {
            let view = index.contest_with_participants(&c.id).expect("known contest");
            prop_assert!(view.participants.windows(2).all(|w| w[0].place_numeric <= w[1].place_numeric));
            prop_assert_eq!(view.participants.len(), c.participant_count);

            let rows = index.contest_results(&c.id);
            prop_assert!(rows.windows(2).all(|w| parse_place(w[0].place) <= parse_place(w[1].place)));
        }

        for u in index.users() {
            let rows = index.user_contests(&u.id);
            prop_assert!(rows.windows(2).all(|w| w[0].date >= w[1].date));
            prop_assert_eq!(rows.len(), u.contests_participated as usize);
        }

        let users = index.search_users(&pattern);
        prop_assert!(users.windows(2).all(|w| w[0].total_points >= w[1].total_points));

        let contests = index.search_contests(&pattern);
        prop_assert!(contests.windows(2).all(|w| w[0].date >= w[1].date));

        let board = index.leaderboard(5);
        prop_assert!(board.len() <= 5);
        prop_assert!(board.windows(2).all(|w| w[0].total_points >= w[1].total_points));
    }

    #[test]
    fn dnf_sorts_after_numeric_places(raw in export_strategy()) {
        let index = RankingIndex::from_raw(&raw);

        for c in index.contests() {
            let view = index.contest_with_participants(&c.id).expect("known contest");
            let first_dnf = view.participants.iter().position(|p| p.place.parse::<u32>().is_err());
            if let Some(pos) = first_dnf {
                prop_assert!(view.participants[pos..].iter().all(|p| p.place.parse::<u32>().is_err()));
            }
        }
    }
}

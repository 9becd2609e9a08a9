use tempfile::TempDir;

use podium::{
    core::RankingIndex,
    persist::{ContestSource, KeyValueStore, sqlite::SqliteContestStore},
    raw::{RawContest, RawParticipation},
};

fn contest(id: &str, date: &str, athletes: &[(&str, &str, u32)]) -> RawContest {
    RawContest {
        id: id.to_string(),
        name: format!("Event {id}"),
        discipline: "lead".to_string(),
        date: date.to_string(),
        country: "CH".to_string(),
        city: "Bern".to_string(),
        prize: "300".to_string(),
        gender: "F".to_string(),
        category: "open".to_string(),
        athletes: athletes
            .iter()
            .map(|(athlete, place, points)| RawParticipation {
                athlete_id: athlete.to_string(),
                name: athlete.to_string(),
                place: place.to_string(),
                points: *points,
            })
            .collect(),
    }
}

#[test]
fn put_get_delete_by_contest_id() {
    let mut store = SqliteContestStore::open_in_memory().expect("open");
    let c = contest("k1", "2024-01-01", &[("ann", "1", 10)]);

    assert!(store.get("k1").expect("get").is_none());
    store.put(&c).expect("put");
    assert_eq!(store.get("k1").expect("get"), Some(c));
    assert_eq!(store.len().expect("len"), 1);

    assert!(store.delete("k1").expect("delete"));
    assert!(!store.delete("k1").expect("delete again"));
    assert!(store.is_empty().expect("empty"));
}

#[test]
fn scan_keeps_first_insertion_order_across_upserts() {
    let mut store = SqliteContestStore::open_in_memory().expect("open");
    store.put(&contest("b", "2024-02-01", &[])).expect("put b");
    store.put(&contest("a", "2024-01-01", &[])).expect("put a");
    store.put(&contest("c", "2024-03-01", &[])).expect("put c");

    let updated = contest("b", "2024-02-01", &[("ann", "2", 5)]);
    store.put(&updated).expect("upsert b");

    let scanned = store.scan().expect("scan");
    let ids: Vec<&str> = scanned.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, ["b", "a", "c"]);
    assert_eq!(scanned[0], updated);
}

#[test]
fn reopened_store_feeds_an_index() {
    let tmp = TempDir::new().expect("tmp");
    let db_path = tmp.path().join("contests.db");

    {
        let mut store = SqliteContestStore::open(&db_path).expect("open sqlite");
        let written = store
            .put_all(&[
                contest("A", "2024-01-01", &[("alice", "1", 100), ("bob", "2", 50)]),
                contest("B", "2024-06-01", &[("alice", "3", 30)]),
            ])
            .expect("put_all");
        assert_eq!(written, 2);
    }

    let mut reopened = SqliteContestStore::open(&db_path).expect("reopen");
    let raw = reopened.load_contests().expect("load");
    let index = RankingIndex::from_raw(&raw);

    let alice = index.user("alice").expect("alice");
    assert_eq!(alice.total_points, 130);
    assert_eq!(index.leaderboard(10).len(), 2);
}

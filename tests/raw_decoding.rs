use podium::{
    core::RankingIndex,
    persist::json::read_contests,
    raw::RawContest,
    types::{DNF_PLACE, DNF_PLACE_RAW},
};

#[test]
fn messy_fields_decode_with_defaults() {
    let doc = r#"[
        {
            "id": 42,
            "name": "Open 42",
            "date": "2024-03-01",
            "prize": 1500,
            "athletes": [
                { "athleteId": "a1", "name": "Ann", "place": 1, "points": "75" },
                { "athleteId": "a2", "name": "Ben", "points": 12.9 },
                { "id": "a3", "name": "Cy", "place": "DNS", "points": "lots" },
                { "athleteId": "a4", "name": "Di", "place": null, "points": -4 },
                "not an athlete"
            ]
        }
    ]"#;

    let contests = read_contests(doc.as_bytes()).expect("decode");
    assert_eq!(contests.len(), 1);

    let c = &contests[0];
    assert_eq!(c.id, "42");
    assert_eq!(c.prize, "1500");
    assert_eq!(c.country, "");
    assert_eq!(c.athletes.len(), 4);

    let places: Vec<&str> = c.athletes.iter().map(|a| a.place.as_str()).collect();
    assert_eq!(places, ["1", DNF_PLACE_RAW, "DNS", DNF_PLACE_RAW]);

    let points: Vec<u32> = c.athletes.iter().map(|a| a.points).collect();
    assert_eq!(points, [75, 12, 0, 0]);

    assert_eq!(c.athletes[2].athlete_id, "a3");
}

#[test]
fn missing_athlete_list_is_an_empty_contest() {
    let contests = read_contests(r#"[{ "id": "c", "athletes": null }, { "id": "d" }]"#.as_bytes())
        .expect("decode");
    assert!(contests.iter().all(|c| c.athletes.is_empty()));

    let index = RankingIndex::from_raw(&contests);
    assert_eq!(index.contest("c").map(|c| c.participant_count), Some(0));
}

#[test]
fn non_list_athletes_read_as_empty() {
    let doc = r#"[
        { "id": "a", "athletes": "TBD" },
        { "id": "b", "athletes": {} },
        { "id": "c", "athletes": 3, "name": "Cup C" }
    ]"#;
    let contests = read_contests(doc.as_bytes()).expect("decode");
    let ids: Vec<&str> = contests.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, ["a", "b", "c"]);
    assert!(contests.iter().all(|c| c.athletes.is_empty()));
    assert_eq!(contests[2].name, "Cup C");
}

#[test]
fn non_object_contest_entries_are_skipped() {
    let doc = r#"[
        { "id": "a", "athletes": [{ "athleteId": "u1", "place": 1, "points": 5 }] },
        null,
        "garbage",
        7,
        { "id": "b" }
    ]"#;
    let contests = read_contests(doc.as_bytes()).expect("decode");
    let ids: Vec<&str> = contests.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, ["a", "b"]);

    let index = RankingIndex::from_raw(&contests);
    assert_eq!(index.user("u1").map(|u| u.total_points), Some(5));
}

#[test]
fn null_document_is_empty_export() {
    let contests = read_contests("null".as_bytes()).expect("decode");
    assert!(contests.is_empty());
}

#[test]
fn decoded_dnf_sorts_last() {
    let doc = r#"[{
        "id": "m",
        "date": "2024-01-01",
        "athletes": [
            { "athleteId": "x", "name": "X" },
            { "athleteId": "y", "name": "Y", "place": "4", "points": 3 }
        ]
    }]"#;
    let contests: Vec<RawContest> = serde_json::from_str(doc).expect("decode");
    let index = RankingIndex::from_raw(&contests);

    let view = index.contest_with_participants("m").expect("contest");
    assert_eq!(view.participants[0].user_id, "y");
    assert_eq!(view.participants[1].place_numeric, DNF_PLACE);
}

#[test]
fn serialized_contest_decodes_back_unchanged() {
    let doc = r#"[{
        "id": "r",
        "name": "Round",
        "discipline": "lead",
        "date": "2024-10-10",
        "country": "AT",
        "city": "Innsbruck",
        "prize": "800",
        "gender": "M",
        "category": "senior",
        "athletes": [{ "athleteId": "p", "name": "P", "place": "2", "points": 9 }]
    }]"#;
    let contests = read_contests(doc.as_bytes()).expect("decode");
    let encoded = serde_json::to_string(&contests).expect("encode");
    let decoded = read_contests(encoded.as_bytes()).expect("decode again");
    assert_eq!(decoded, contests);
}

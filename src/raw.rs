//! Denormalized contest export records and their lenient decoding.
//!
//! The export is uncurated external content: numbers arrive as strings,
//! places arrive as numbers, fields go missing. Decoding never rejects a
//! record for a bad field; it substitutes the documented default instead.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::types::{ContestId, DNF_PLACE_RAW, UserId};

/// One athlete's placement inside a [`RawContest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawParticipation {
    /// Athlete identifier.
    #[serde(alias = "id", default, deserialize_with = "lenient_text")]
    pub athlete_id: UserId,
    /// Display name.
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: String,
    /// Raw place, numeric or a sentinel such as `DNF`.
    #[serde(default = "dnf_place", deserialize_with = "lenient_place")]
    pub place: String,
    /// Points earned, never negative.
    #[serde(default, deserialize_with = "lenient_points")]
    pub points: u32,
}

/// A contest record with its embedded participation list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawContest {
    /// Contest identifier.
    #[serde(default, deserialize_with = "lenient_text")]
    pub id: ContestId,
    /// Contest name.
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: String,
    /// Discipline label.
    #[serde(default, deserialize_with = "lenient_text")]
    pub discipline: String,
    /// Zero-padded `YYYY-MM-DD` date.
    #[serde(default, deserialize_with = "lenient_text")]
    pub date: String,
    /// Host country.
    #[serde(default, deserialize_with = "lenient_text")]
    pub country: String,
    /// Host city.
    #[serde(default, deserialize_with = "lenient_text")]
    pub city: String,
    /// Prize value as displayed.
    #[serde(default, deserialize_with = "lenient_text")]
    pub prize: String,
    /// Gender code.
    #[serde(default, deserialize_with = "lenient_text")]
    pub gender: String,
    /// Category code.
    #[serde(default, deserialize_with = "lenient_text")]
    pub category: String,
    /// Participations in export order.
    #[serde(default, deserialize_with = "lenient_athletes")]
    pub athletes: Vec<RawParticipation>,
}

fn dnf_place() -> String {
    DNF_PLACE_RAW.to_string()
}

fn number_text(n: &serde_json::Number) -> String {
    if let Some(v) = n.as_u64() {
        return v.to_string();
    }
    if let Some(v) = n.as_i64() {
        return v.to_string();
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f.is_finite() => format!("{f:.0}"),
        _ => n.to_string(),
    }
}

fn lenient_text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(match Option::<Value>::deserialize(d)? {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => number_text(&n),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    })
}

fn lenient_place<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(match Option::<Value>::deserialize(d)? {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => number_text(&n),
        _ => dnf_place(),
    })
}

fn lenient_points<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
    Ok(match Option::<Value>::deserialize(d)? {
        Some(Value::Number(n)) => points_from_number(&n),
        Some(Value::String(s)) => points_from_text(&s),
        _ => 0,
    })
}

// A non-list value reads as no athletes; non-object entries are dropped.
fn lenient_athletes<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<RawParticipation>, D::Error> {
    Ok(match Option::<Value>::deserialize(d)? {
        Some(Value::Array(entries)) => objects_as(entries),
        _ => Vec::new(),
    })
}

/// Decodes every object in `entries` as `T`, skipping anything else.
pub(crate) fn objects_as<T: serde::de::DeserializeOwned>(entries: Vec<Value>) -> Vec<T> {
    entries
        .into_iter()
        .filter(Value::is_object)
        .filter_map(|v| serde_json::from_value(v).ok())
        .collect()
}

fn points_from_number(n: &serde_json::Number) -> u32 {
    if let Some(v) = n.as_u64() {
        return u32::try_from(v).unwrap_or(u32::MAX);
    }
    n.as_f64().map(points_from_float).unwrap_or(0)
}

fn points_from_text(s: &str) -> u32 {
    let s = s.trim();
    if let Ok(v) = s.parse::<u32>() {
        return v;
    }
    s.parse::<f64>().map(points_from_float).unwrap_or(0)
}

// `as` saturates, and NaN maps to zero.
fn points_from_float(f: f64) -> u32 {
    if f.is_finite() && f > 0.0 { f.trunc() as u32 } else { 0 }
}

use serde::{Deserialize, Serialize};

/// One recorded blood-pressure/pulse observation.
///
/// The timestamp stays an ISO-8601 string rather than a parsed datetime: the
/// browser client submits `datetime-local` values without a zone offset, and
/// the server round-trips them verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub id: String,
    pub timestamp: String,
    pub systolic: i64,
    pub diastolic: i64,
    pub pulse: i64,
    #[serde(default)]
    pub notes: String,
}

/// Client submission for a new reading. Missing id and timestamp are filled
/// in at creation time.
#[derive(Debug, Clone, Deserialize)]
pub struct NewReading {
    pub id: Option<String>,
    pub timestamp: Option<String>,
    pub systolic: i64,
    pub diastolic: i64,
    pub pulse: i64,
    #[serde(default)]
    pub notes: String,
}

/// Partial update; only the fields that are present get merged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReadingPatch {
    pub timestamp: Option<String>,
    pub systolic: Option<i64>,
    pub diastolic: Option<i64>,
    pub pulse: Option<i64>,
    pub notes: Option<String>,
}

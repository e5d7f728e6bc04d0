// API payload type definitions
// Both endpoints answer with a statusCode plus a nested per-RSU body

use std::collections::HashMap;

use serde::Deserialize;

/// Response of the cycles (signal phase) API:
/// `{"statusCode": 200, "body": {rsu: {bound: {movement: {...}}}}}`.
/// A missing or non-200 statusCode means "no data this poll".
#[derive(Debug, Deserialize)]
pub struct CycleMessage {
    #[serde(rename = "statusCode")]
    pub status_code: Option<i64>,
    #[serde(default)]
    pub body: HashMap<String, HashMap<String, HashMap<String, PhaseTimes>>>,
}

impl CycleMessage {
    /// A response that carries no data; what the engine sees when the
    /// transport or decode failed
    pub fn empty() -> Self {
        CycleMessage {
            status_code: None,
            body: HashMap::new(),
        }
    }
}

/// Per-movement phase change timestamps, formatted
/// `YYYY-MM-DD HH:MM:SS.ffffff`. Empty string = color not observed this cycle.
#[derive(Debug, Default, Deserialize)]
pub struct PhaseTimes {
    #[serde(default)]
    pub green: String,
    #[serde(default)]
    pub yellow: String,
    #[serde(default)]
    pub red: String,
}

/// Response of the traffic (detector trigger) API, same envelope as
/// [`CycleMessage`]
#[derive(Debug, Deserialize)]
pub struct TrafficMessage {
    #[serde(rename = "statusCode")]
    pub status_code: Option<i64>,
    #[serde(default)]
    pub body: HashMap<String, HashMap<String, HashMap<String, TriggerTimes>>>,
}

impl TrafficMessage {
    pub fn empty() -> Self {
        TrafficMessage {
            status_code: None,
            body: HashMap::new(),
        }
    }
}

/// Per-movement detector activations: comma-separated seconds offsets
/// relative to the polled timestamp
#[derive(Debug, Default, Deserialize)]
pub struct TriggerTimes {
    #[serde(default)]
    pub trigger_time: String,
}

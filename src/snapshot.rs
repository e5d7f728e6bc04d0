// Snapshot parsing: raw API payloads into structured per-location data
// Failure-flagged or malformed input degrades to empty output, never an error

use std::collections::HashMap;

use chrono::{Duration, NaiveDateTime};
use tracing::{debug, warn};

use crate::constants::CYCLE_TIME_FMT;
use crate::model::{Bound, Location, Movement, TlColor};
use crate::net::messages::{CycleMessage, TrafficMessage};

/// Parsed phase data: per location, one record per observed signal cycle
pub type PhaseSnapshot = HashMap<Location, Vec<CycleRecord>>;

/// Parsed detector activations: per location, absolute activation times
pub type TriggerSnapshot = HashMap<Location, Vec<NaiveDateTime>>;

/// Phase change times observed for one signal cycle. `None` means the color
/// was not observed this cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CycleRecord {
    pub green: Option<NaiveDateTime>,
    pub yellow: Option<NaiveDateTime>,
    pub red: Option<NaiveDateTime>,
}

impl CycleRecord {
    pub fn time(&self, color: TlColor) -> Option<NaiveDateTime> {
        match color {
            TlColor::Green => self.green,
            TlColor::Yellow => self.yellow,
            TlColor::Red => self.red,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.green.is_none() && self.yellow.is_none() && self.red.is_none()
    }
}

/// Build a phase snapshot from a cycles payload. Non-200 (or absent)
/// statusCode yields an empty snapshot. Pure function of its input.
pub fn make_phase_snapshot(msg: &CycleMessage) -> PhaseSnapshot {
    let mut data = PhaseSnapshot::new();
    if msg.status_code != Some(200) {
        return data;
    }

    for (rsu, bounds) in &msg.body {
        for (bound, movements) in bounds {
            for (movement, times) in movements {
                let Some(loc) = parse_location(rsu, bound, movement) else {
                    continue;
                };
                let record = CycleRecord {
                    green: parse_phase_time(&times.green),
                    yellow: parse_phase_time(&times.yellow),
                    red: parse_phase_time(&times.red),
                };
                // Keep the record only if at least one color was observed
                if !record.is_empty() {
                    data.entry(loc).or_default().push(record);
                }
            }
        }
    }

    data
}

/// Build a trigger snapshot from a traffic payload. Offsets are relative
/// seconds added to the poll timestamp used in the request. Pure function of
/// (message, poll time).
pub fn make_trigger_snapshot(msg: &TrafficMessage, tyme: NaiveDateTime) -> TriggerSnapshot {
    let mut events = TriggerSnapshot::new();
    if msg.status_code != Some(200) {
        return events;
    }

    for (rsu, bounds) in &msg.body {
        for (bound, movements) in bounds {
            for (movement, times) in movements {
                let Some(loc) = parse_location(rsu, bound, movement) else {
                    continue;
                };
                for trigger in times.trigger_time.split(',') {
                    if trigger.is_empty() {
                        continue;
                    }
                    match trigger.parse::<f64>() {
                        Ok(offset) => {
                            let micros = (offset * 1e6).round() as i64;
                            events
                                .entry(loc)
                                .or_default()
                                .push(tyme + Duration::microseconds(micros));
                        }
                        Err(err) => {
                            warn!("Unparseable trigger offset {:?}: {}", trigger, err);
                        }
                    }
                }
            }
        }
    }

    events
}

fn parse_location(rsu: &str, bound: &str, movement: &str) -> Option<Location> {
    let rsu_id = match rsu.parse::<u32>() {
        Ok(id) => id,
        Err(_) => {
            debug!("Skipping entry with non-numeric RSU id {:?}", rsu);
            return None;
        }
    };
    let Some(bound) = Bound::from_code(bound) else {
        debug!("Skipping entry with unknown bound {:?}", bound);
        return None;
    };
    let Some(movement) = Movement::from_code(movement) else {
        debug!("Skipping entry with unknown movement {:?}", movement);
        return None;
    };
    Some(Location {
        rsu_id,
        bound,
        movement,
    })
}

fn parse_phase_time(raw: &str) -> Option<NaiveDateTime> {
    if raw.is_empty() {
        return None;
    }
    match NaiveDateTime::parse_from_str(raw, CYCLE_TIME_FMT) {
        Ok(tyme) => Some(tyme),
        Err(err) => {
            warn!("Unparseable phase timestamp {:?}: {}", raw, err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::messages::{CycleMessage, TrafficMessage};

    fn cycle_msg(raw: &str) -> CycleMessage {
        serde_json::from_str(raw).unwrap()
    }

    fn traffic_msg(raw: &str) -> TrafficMessage {
        serde_json::from_str(raw).unwrap()
    }

    fn wbt(rsu_id: u32) -> Location {
        Location {
            rsu_id,
            bound: Bound::Westbound,
            movement: Movement::Through,
        }
    }

    const GOOD_CYCLES: &str = r#"{
        "statusCode": 200,
        "body": {
            "1": {
                "WB": {
                    "T": {
                        "green": "2023-01-01 00:00:40.000000",
                        "yellow": "",
                        "red": "2023-01-01 00:01:20.500000"
                    }
                }
            }
        }
    }"#;

    #[test]
    fn test_phase_snapshot_parses_observed_colors() {
        let data = make_phase_snapshot(&cycle_msg(GOOD_CYCLES));
        assert_eq!(data.len(), 1);
        let records = &data[&wbt(1)];
        assert_eq!(records.len(), 1);
        assert!(records[0].green.is_some());
        assert!(records[0].yellow.is_none());
        assert_eq!(
            records[0].red.unwrap().to_string(),
            "2023-01-01 00:01:20.500"
        );
    }

    #[test]
    fn test_phase_snapshot_non_200_is_empty() {
        let msg = cycle_msg(
            r#"{"statusCode": 500, "body": {"1": {"WB": {"T": {"green": "2023-01-01 00:00:40.000000"}}}}}"#,
        );
        assert!(make_phase_snapshot(&msg).is_empty());
        assert!(make_phase_snapshot(&CycleMessage::empty()).is_empty());
    }

    #[test]
    fn test_phase_snapshot_drops_all_empty_record() {
        let msg = cycle_msg(
            r#"{"statusCode": 200, "body": {"1": {"WB": {"T": {"green": "", "yellow": "", "red": ""}}}}}"#,
        );
        assert!(make_phase_snapshot(&msg).is_empty());
    }

    #[test]
    fn test_phase_snapshot_skips_unknown_codes() {
        let msg = cycle_msg(
            r#"{"statusCode": 200, "body": {"one": {"WB": {"T": {"green": "2023-01-01 00:00:40.000000"}}},
                "1": {"ZZ": {"T": {"green": "2023-01-01 00:00:40.000000"}}}}}"#,
        );
        assert!(make_phase_snapshot(&msg).is_empty());
    }

    #[test]
    fn test_phase_snapshot_idempotent() {
        let msg = cycle_msg(GOOD_CYCLES);
        assert_eq!(make_phase_snapshot(&msg), make_phase_snapshot(&msg));
    }

    #[test]
    fn test_trigger_snapshot_offsets_and_empty_entries() {
        let msg = traffic_msg(
            r#"{"statusCode": 200, "body": {"1": {"WB": {"T": {"trigger_time": "1.5,,30"}}}}}"#,
        );
        let tyme = chrono::NaiveDate::from_ymd_opt(2023, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let events = make_trigger_snapshot(&msg, tyme);
        let times = &events[&wbt(1)];
        assert_eq!(times.len(), 2);
        assert_eq!(times[0].to_string(), "2023-01-01 00:00:01.500");
        assert_eq!(times[1].to_string(), "2023-01-01 00:00:30");
    }

    #[test]
    fn test_trigger_snapshot_non_200_is_empty() {
        let tyme = chrono::NaiveDate::from_ymd_opt(2023, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert!(make_trigger_snapshot(&TrafficMessage::empty(), tyme).is_empty());
    }
}

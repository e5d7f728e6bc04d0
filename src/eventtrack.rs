// Detector event correlation
//
// Events are correlated one full retained window behind the polls, so the
// red history has had time to stabilize before an event looks for its
// reference red start.

use crate::constants::{CYCLE_POINT_WINDOW, EVENT_BATCH_WINDOW};
use crate::model::{epoch_seconds, CyclePointHistory, EventHistory, Location, Point, TlColor};
use crate::snapshot::TriggerSnapshot;

/// Append one poll's trigger snapshot to the stored event batches, as epoch
/// seconds. Oldest batch evicted beyond the retained window.
pub fn update_stored_events(stored: &mut EventHistory, events: &TriggerSnapshot) {
    for (loc, times) in events {
        let batch: Vec<f64> = times.iter().map(|tyme| epoch_seconds(*tyme)).collect();
        stored.push_batch(*loc, batch);
    }
}

/// Correlate the oldest retained event batch of every location against that
/// location's retained red starts. Each event matches the red point with the
/// smallest non-negative `event - red.x`; events with no preceding red are
/// dropped. Locations without a full batch window or without a full red
/// window emit nothing yet. Events within a batch come out in ascending
/// timestamp order.
pub fn correlate_events(
    stored: &EventHistory,
    cycle_points: &CyclePointHistory,
) -> Vec<(Location, Point)> {
    let mut rows = Vec::new();

    for loc in stored.locations() {
        if stored.batch_count(loc) < EVENT_BATCH_WINDOW
            || cycle_points.len(loc, TlColor::Red) < CYCLE_POINT_WINDOW
        {
            continue;
        }
        let Some(batch) = stored.oldest_batch(loc) else {
            continue;
        };

        let mut events = batch.clone();
        events.sort_by(f64::total_cmp);

        for &event in &events {
            let mut diff = f64::INFINITY;
            for point in cycle_points.points(loc, TlColor::Red) {
                let elapsed = event - point.x;
                if (0.0..diff).contains(&elapsed) {
                    diff = elapsed;
                }
            }
            if diff.is_finite() {
                rows.push((*loc, Point { x: event, y: diff }));
            }
        }
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Bound, Movement};

    fn loc() -> Location {
        Location {
            rsu_id: 1,
            bound: Bound::Westbound,
            movement: Movement::Through,
        }
    }

    fn reds(xs: &[f64]) -> CyclePointHistory {
        let mut cycle_points = CyclePointHistory::new();
        for &x in xs {
            cycle_points.push(loc(), TlColor::Red, Point { x, y: 0.0 });
        }
        cycle_points
    }

    fn batches(oldest: Vec<f64>, count: usize) -> EventHistory {
        let mut stored = EventHistory::new();
        stored.push_batch(loc(), oldest);
        for _ in 1..count {
            stored.push_batch(loc(), Vec::new());
        }
        stored
    }

    #[test]
    fn test_event_matches_nearest_preceding_red() {
        let rows = correlate_events(&batches(vec![170.0], 3), &reds(&[100.0, 160.0, 220.0]));
        assert_eq!(rows, vec![(loc(), Point { x: 170.0, y: 10.0 })]);
    }

    #[test]
    fn test_event_before_all_reds_is_dropped() {
        let rows = correlate_events(&batches(vec![90.0], 3), &reds(&[100.0, 160.0, 220.0]));
        assert!(rows.is_empty());
    }

    #[test]
    fn test_requires_full_red_window() {
        let rows = correlate_events(&batches(vec![170.0], 3), &reds(&[100.0, 160.0]));
        assert!(rows.is_empty());
    }

    #[test]
    fn test_requires_full_batch_window() {
        let rows = correlate_events(&batches(vec![170.0], 2), &reds(&[100.0, 160.0, 220.0]));
        assert!(rows.is_empty());
    }

    #[test]
    fn test_batch_emitted_in_ascending_order() {
        let rows = correlate_events(
            &batches(vec![230.0, 170.0, 110.0], 3),
            &reds(&[100.0, 160.0, 220.0]),
        );
        let xs: Vec<f64> = rows.iter().map(|(_, p)| p.x).collect();
        assert_eq!(xs, vec![110.0, 170.0, 230.0]);
        let ys: Vec<f64> = rows.iter().map(|(_, p)| p.y).collect();
        assert_eq!(ys, vec![10.0, 10.0, 10.0]);
    }

    #[test]
    fn test_update_converts_to_epoch_seconds() {
        let mut stored = EventHistory::new();
        let mut snapshot = TriggerSnapshot::new();
        let tyme = chrono::DateTime::from_timestamp(100, 500_000_000)
            .unwrap()
            .naive_utc();
        snapshot.insert(loc(), vec![tyme]);
        update_stored_events(&mut stored, &snapshot);
        assert_eq!(stored.oldest_batch(&loc()), Some(&vec![100.5]));
    }
}

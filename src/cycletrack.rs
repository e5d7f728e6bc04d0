// Cycle point derivation
//
// The diagram's y axis is seconds elapsed since the reference red start of
// the current cycle. Each color either chains off the previous color in the
// same cycle or off the last cycle's red, so missing colors don't break the
// series.

use std::collections::HashMap;

use chrono::Timelike;

use crate::model::{epoch_seconds, CyclePointHistory, Point, TlColor};
use crate::snapshot::PhaseSnapshot;

/// Update the stored cycle points with one poll's phase snapshot. Cycle
/// records are processed in received order; within one record the colors are
/// evaluated strictly green -> yellow -> red.
pub fn update_cycle_points(stored: &mut CyclePointHistory, snapshot: &PhaseSnapshot) {
    for (loc, records) in snapshot {
        for record in records {
            // Points resolved so far for this cycle, carried forwards
            // included; later colors chain on these.
            let mut curr_cycle_points: HashMap<TlColor, Point> = HashMap::new();

            for color in TlColor::ORDER {
                let tyme = record.time(color);
                let prev_point = stored.last(loc, color);
                let prev_red_point = stored.last(loc, TlColor::Red);

                let point = match (tyme, prev_point) {
                    // Never observed this color here: no point yet
                    (None, None) => continue,

                    // Not observed this cycle: carry the last point forward
                    (None, Some(prev)) => prev,

                    // First observation for this color: bootstrap off the
                    // seconds component, there is no cycle reference yet
                    (Some(tyme), None) => Point {
                        x: epoch_seconds(tyme),
                        y: tyme.second() as f64,
                    },

                    (Some(tyme), Some(_)) => {
                        let x = epoch_seconds(tyme);
                        if let (TlColor::Green, Some(prev_red)) = (color, prev_red_point) {
                            // Green offset measured from the previous red start
                            Point {
                                x,
                                y: x - prev_red.x,
                            }
                        } else if color == TlColor::Yellow
                            && curr_cycle_points.contains_key(&TlColor::Green)
                        {
                            chained(curr_cycle_points[&TlColor::Green], x)
                        } else if color == TlColor::Red
                            && curr_cycle_points.contains_key(&TlColor::Yellow)
                        {
                            chained(curr_cycle_points[&TlColor::Yellow], x)
                        } else if color == TlColor::Red
                            && curr_cycle_points.contains_key(&TlColor::Green)
                        {
                            // Yellow skipped entirely this cycle
                            chained(curr_cycle_points[&TlColor::Green], x)
                        } else {
                            // No usable reference: fall back to the bootstrap form
                            Point {
                                x,
                                y: tyme.second() as f64,
                            }
                        }
                    }
                };

                curr_cycle_points.insert(color, point);
                stored.push(*loc, color, point);
            }
        }
    }
}

/// Chain a point onto an earlier one from the same cycle: the offset grows by
/// the elapsed time between the two phase changes.
fn chained(base: Point, x: f64) -> Point {
    Point {
        x,
        y: base.y + x - base.x,
    }
}

// Core value types and rolling per-location state

use std::collections::{HashMap, VecDeque};

use chrono::NaiveDateTime;

use crate::constants::{CYCLE_POINT_WINDOW, EVENT_BATCH_WINDOW};

/// Traffic light colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TlColor {
    Green,
    Yellow,
    Red,
}

impl TlColor {
    /// Fixed evaluation order within one cycle. Yellow and red derivation
    /// depends on green/yellow already being resolved for the same cycle, so
    /// this order is load-bearing.
    pub const ORDER: [TlColor; 3] = [TlColor::Green, TlColor::Yellow, TlColor::Red];

    /// Wire/file name of this color
    pub fn as_str(&self) -> &'static str {
        match self {
            TlColor::Green => "green",
            TlColor::Yellow => "yellow",
            TlColor::Red => "red",
        }
    }
}

/// Approach direction of a signal movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bound {
    Northbound,
    Southbound,
    Eastbound,
    Westbound,
}

impl Bound {
    /// Parse the short code used by the API ("NB", "SB", "EB", "WB")
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "NB" => Some(Bound::Northbound),
            "SB" => Some(Bound::Southbound),
            "EB" => Some(Bound::Eastbound),
            "WB" => Some(Bound::Westbound),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Bound::Northbound => "NB",
            Bound::Southbound => "SB",
            Bound::Eastbound => "EB",
            Bound::Westbound => "WB",
        }
    }
}

/// Turn movement of a signal approach
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Movement {
    Through,
    Left,
    Right,
}

impl Movement {
    /// Parse the short code used by the API ("T", "L", "R")
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "T" => Some(Movement::Through),
            "L" => Some(Movement::Left),
            "R" => Some(Movement::Right),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Movement::Through => "T",
            Movement::Left => "L",
            Movement::Right => "R",
        }
    }
}

/// Identity of one signal movement: RSU + bound + movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Location {
    pub rsu_id: u32,
    pub bound: Bound,
    pub movement: Movement,
}

/// One derived diagram point: x is epoch seconds, y the offset within the
/// cycle in seconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Epoch seconds (with fractional part) for a naive UTC timestamp
pub fn epoch_seconds(tyme: NaiveDateTime) -> f64 {
    tyme.and_utc().timestamp_micros() as f64 / 1e6
}

/// Rolling cycle-point state: per (location, color), the points derived for
/// the last few cycles, oldest first.
#[derive(Debug, Default)]
pub struct CyclePointHistory {
    inner: HashMap<Location, HashMap<TlColor, VecDeque<Point>>>,
}

impl CyclePointHistory {
    pub fn new() -> Self {
        CyclePointHistory {
            inner: HashMap::new(),
        }
    }

    /// Most recently stored point for this color, if any
    pub fn last(&self, loc: &Location, color: TlColor) -> Option<Point> {
        self.inner
            .get(loc)
            .and_then(|colors| colors.get(&color))
            .and_then(|points| points.back())
            .copied()
    }

    /// Append a point for this color, evicting the oldest one once the
    /// retained window is exceeded.
    pub fn push(&mut self, loc: Location, color: TlColor, point: Point) {
        let points = self
            .inner
            .entry(loc)
            .or_default()
            .entry(color)
            .or_default();
        points.push_back(point);
        if points.len() > CYCLE_POINT_WINDOW {
            points.pop_front();
        }
    }

    /// Retained points for this color, oldest first
    pub fn points(&self, loc: &Location, color: TlColor) -> impl Iterator<Item = &Point> {
        self.inner
            .get(loc)
            .and_then(|colors| colors.get(&color))
            .into_iter()
            .flatten()
    }

    /// Number of retained points for this color
    pub fn len(&self, loc: &Location, color: TlColor) -> usize {
        self.inner
            .get(loc)
            .and_then(|colors| colors.get(&color))
            .map_or(0, |points| points.len())
    }

    /// All locations with any stored points
    pub fn locations(&self) -> impl Iterator<Item = &Location> {
        self.inner.keys()
    }
}

/// Rolling detector-event state: per location, the raw epoch-seconds event
/// batches from the last few polls, oldest first.
#[derive(Debug, Default)]
pub struct EventHistory {
    inner: HashMap<Location, VecDeque<Vec<f64>>>,
}

impl EventHistory {
    pub fn new() -> Self {
        EventHistory {
            inner: HashMap::new(),
        }
    }

    /// Append one poll's batch of events, evicting the oldest batch once the
    /// retained window is exceeded.
    pub fn push_batch(&mut self, loc: Location, batch: Vec<f64>) {
        let batches = self.inner.entry(loc).or_default();
        if batches.len() == EVENT_BATCH_WINDOW {
            batches.pop_front();
        }
        batches.push_back(batch);
    }

    /// Number of retained batches for this location
    pub fn batch_count(&self, loc: &Location) -> usize {
        self.inner.get(loc).map_or(0, |batches| batches.len())
    }

    /// Oldest retained batch, i.e. events from two polls before the current
    /// one once the window is full
    pub fn oldest_batch(&self, loc: &Location) -> Option<&Vec<f64>> {
        self.inner.get(loc).and_then(|batches| batches.front())
    }

    /// All locations with any stored batches
    pub fn locations(&self) -> impl Iterator<Item = &Location> {
        self.inner.keys()
    }
}

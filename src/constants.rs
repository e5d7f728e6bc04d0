// Shared constants for the coordination diagram collector

/// Timestamp format used by the cycles API for phase change times
pub const CYCLE_TIME_FMT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Timestamp format for the ?timestamp= query parameter
pub const URL_TIME_FMT: &str = "%Y-%m-%d %H:%M:%S";

/// Timestamp format for the formatted x columns in output rows
pub const PLOT_DATA_TIME_FMT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// 12-hour clock variant of the formatted x columns
pub const PLOT_DATA_12HR_TIME_FMT: &str = "%Y-%m-%d %I:%M:%S%.6f %p";

/// UTC is 8 hours ahead of PST
pub const UTC_TO_PST: i64 = -8;

/// UTC is 7 hours ahead of PDT
pub const UTC_TO_PDT: i64 = -7;

/// Default hour lag when deriving the poll timestamp (fetch data from 1 hour back)
pub const HOUR_LAG: i64 = 1;

/// Retained points per (location, color): the last 3 cycles
pub const CYCLE_POINT_WINDOW: usize = 3;

/// Retained detector event batches per location: the last 3 polls
pub const EVENT_BATCH_WINDOW: usize = 3;

/// Header row written to every output CSV
pub const DATA_HEADER: [&str; 10] = [
    "RSU",
    "Bound",
    "Movement",
    "x",
    "y",
    "x as UTC Time",
    "x as PST Time",
    "x as PDT Time",
    "x as 12-Hr PST Time",
    "x as 12-Hr PDT Time",
];

/// Default cycles (signal phase) API endpoint
pub const CYCLES_API_URL: &str =
    "https://hcub010205.execute-api.us-east-2.amazonaws.com/vista/spat";

/// Default traffic (detector trigger) API endpoint
pub const TRAFFIC_API_URL: &str =
    "https://hcub010205.execute-api.us-east-2.amazonaws.com/vista/traffic";

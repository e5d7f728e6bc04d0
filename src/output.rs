// CSV sink for derived cycle lines and event dots
//
// Every flush truncates the files and rewrites them from current state, so
// the plotting side always reads a consistent view.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};

use crate::constants::{
    DATA_HEADER, PLOT_DATA_12HR_TIME_FMT, PLOT_DATA_TIME_FMT, UTC_TO_PDT, UTC_TO_PST,
};
use crate::model::{CyclePointHistory, Location, Point, TlColor};

/// File sink for one output directory: three per-color line files plus the
/// event dot file.
pub struct CsvSink {
    out_dir: PathBuf,
}

impl CsvSink {
    /// Create the sink, making the output directory if needed
    pub fn new(out_dir: &Path) -> std::io::Result<Self> {
        std::fs::create_dir_all(out_dir)?;
        Ok(CsvSink {
            out_dir: out_dir.to_path_buf(),
        })
    }

    fn color_path(&self, color: TlColor) -> PathBuf {
        self.out_dir.join(format!("{}_lines.csv", color.as_str()))
    }

    fn event_path(&self) -> PathBuf {
        self.out_dir.join("dots.csv")
    }

    /// Truncate the file and write the header row
    fn start_file(path: &Path) -> std::io::Result<BufWriter<File>> {
        let mut writer = BufWriter::new(File::create(path)?);
        writeln!(writer, "{}", DATA_HEADER.join(","))?;
        Ok(writer)
    }

    /// Rewrite the per-color line files with the latest two points of every
    /// location that has at least two for that color.
    pub fn write_cycle_data(&self, stored: &CyclePointHistory) -> std::io::Result<()> {
        for color in TlColor::ORDER {
            let mut writer = Self::start_file(&self.color_path(color))?;
            for loc in stored.locations() {
                let points: Vec<&Point> = stored.points(loc, color).collect();
                if points.len() < 2 {
                    continue;
                }
                for point in &points[points.len() - 2..] {
                    writeln!(writer, "{}", data_row(loc, point.x, point.y))?;
                }
            }
            writer.flush()?;
        }
        Ok(())
    }

    /// Rewrite the event dot file from correlated event rows
    pub fn write_events(&self, rows: &[(Location, Point)]) -> std::io::Result<()> {
        let mut writer = Self::start_file(&self.event_path())?;
        for (loc, point) in rows {
            writeln!(writer, "{}", data_row(loc, point.x, point.y))?;
        }
        writer.flush()
    }
}

/// One output row: location identity, raw x and y, then x rendered as a UTC
/// timestamp, in PST and PDT, and in 12-hour PST and PDT.
pub fn data_row(loc: &Location, x_val: f64, y_val: f64) -> String {
    let utc = DateTime::<Utc>::from_timestamp_micros((x_val * 1e6).round() as i64)
        .unwrap_or(DateTime::UNIX_EPOCH);
    let pst = utc + Duration::hours(UTC_TO_PST);
    let pdt = utc + Duration::hours(UTC_TO_PDT);
    format!(
        "{},{},{},{},{},{},{},{},{},{}",
        loc.rsu_id,
        loc.bound.as_str(),
        loc.movement.as_str(),
        x_val,
        y_val,
        utc.format(PLOT_DATA_TIME_FMT),
        pst.format(PLOT_DATA_TIME_FMT),
        pdt.format(PLOT_DATA_TIME_FMT),
        pst.format(PLOT_DATA_12HR_TIME_FMT),
        pdt.format(PLOT_DATA_12HR_TIME_FMT),
    )
}

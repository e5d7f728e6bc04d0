// Polling driver: once per minute fetch, derive, and flush
//
// Owns both rolling histories; all state mutation happens on this task
// through the two update entry points.

use std::time::Duration;

use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::{debug, info, warn};

use crate::cycletrack;
use crate::eventtrack;
use crate::model::{CyclePointHistory, EventHistory};
use crate::net::api::ApiClient;
use crate::net::messages::{CycleMessage, TrafficMessage};
use crate::output::CsvSink;
use crate::snapshot;

pub struct Coordinator {
    client: ApiClient,
    sink: CsvSink,
    /// Hours to look back when deriving the poll timestamp
    hour_lag: i64,
    cycle_points: CyclePointHistory,
    events: EventHistory,
}

impl Coordinator {
    pub fn new(client: ApiClient, sink: CsvSink, hour_lag: i64) -> Self {
        Coordinator {
            client,
            sink,
            hour_lag,
            cycle_points: CyclePointHistory::new(),
            events: EventHistory::new(),
        }
    }

    /// Current UTC truncated to the whole minute, minus the hour lag
    pub fn poll_time(hour_lag: i64) -> NaiveDateTime {
        Self::truncate_to_minute(Utc::now(), hour_lag)
    }

    fn truncate_to_minute(now: DateTime<Utc>, hour_lag: i64) -> NaiveDateTime {
        let secs = now.timestamp();
        let minute = secs - secs.rem_euclid(60);
        DateTime::from_timestamp(minute - hour_lag * 3600, 0)
            .unwrap_or(DateTime::UNIX_EPOCH)
            .naive_utc()
    }

    /// One poll -> derive -> flush pass for the given poll timestamp. A
    /// failed fetch degrades to an empty message; the derivation engine
    /// never sees transport errors.
    pub async fn poll_once(&mut self, tyme: NaiveDateTime) -> std::io::Result<()> {
        let cycle_msg = match self.client.fetch_cycles(tyme).await {
            Ok(msg) => msg,
            Err(err) => {
                warn!("Cycles fetch for {} failed: {}", tyme, err);
                CycleMessage::empty()
            }
        };
        let traffic_msg = match self.client.fetch_traffic(tyme).await {
            Ok(msg) => msg,
            Err(err) => {
                warn!("Traffic fetch for {} failed: {}", tyme, err);
                TrafficMessage::empty()
            }
        };

        let cycle_data = snapshot::make_phase_snapshot(&cycle_msg);
        let trigger_data = snapshot::make_trigger_snapshot(&traffic_msg, tyme);
        debug!(
            "Poll {}: {} phase locations, {} trigger locations",
            tyme,
            cycle_data.len(),
            trigger_data.len()
        );

        cycletrack::update_cycle_points(&mut self.cycle_points, &cycle_data);
        eventtrack::update_stored_events(&mut self.events, &trigger_data);

        self.flush()
    }

    /// Rewrite all output files from the current state
    pub fn flush(&self) -> std::io::Result<()> {
        self.sink.write_cycle_data(&self.cycle_points)?;
        let rows = eventtrack::correlate_events(&self.events, &self.cycle_points);
        self.sink.write_events(&rows)
    }

    /// Poll on every minute boundary until the task is dropped. The first
    /// pass happens immediately.
    pub async fn run(&mut self) {
        let mut ticker = tokio::time::interval(Duration::from_secs(1));
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        let mut prev_time: Option<NaiveDateTime> = None;

        loop {
            ticker.tick().await;
            let tyme = Self::poll_time(self.hour_lag);
            // Same minute as the last pass: nothing to do yet
            if prev_time == Some(tyme) {
                continue;
            }
            match self.poll_once(tyme).await {
                Ok(()) => info!("Polled {}", tyme),
                Err(err) => warn!("Flush for {} failed: {}", tyme, err),
            }
            prev_time = Some(tyme);
        }
    }
}

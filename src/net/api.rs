// HTTP client for the cycles and traffic APIs
// Both endpoints take a ?timestamp= query and answer with JSON

use chrono::NaiveDateTime;

use crate::constants::URL_TIME_FMT;
use crate::net::messages::{CycleMessage, TrafficMessage};

/// Client for the two polling endpoints. One instance lives for the process
/// lifetime so connections are reused across polls.
pub struct ApiClient {
    http: reqwest::Client,
    cycles_url: String,
    traffic_url: String,
}

impl ApiClient {
    pub fn new(
        cycles_url: String,
        traffic_url: String,
        timeout_secs: u64,
    ) -> reqwest::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()?;
        Ok(ApiClient {
            http,
            cycles_url,
            traffic_url,
        })
    }

    /// Fetch one cycles (signal phase) payload for the given poll timestamp
    pub async fn fetch_cycles(&self, tyme: NaiveDateTime) -> reqwest::Result<CycleMessage> {
        let url = Self::timestamped_url(&self.cycles_url, tyme);
        self.http.get(&url).send().await?.json().await
    }

    /// Fetch one traffic (detector trigger) payload for the given poll timestamp
    pub async fn fetch_traffic(&self, tyme: NaiveDateTime) -> reqwest::Result<TrafficMessage> {
        let url = Self::timestamped_url(&self.traffic_url, tyme);
        self.http.get(&url).send().await?.json().await
    }

    fn timestamped_url(base: &str, tyme: NaiveDateTime) -> String {
        format!("{}?timestamp={}", base, tyme.format(URL_TIME_FMT))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamped_url() {
        let tyme = chrono::NaiveDate::from_ymd_opt(2023, 5, 1)
            .unwrap()
            .and_hms_opt(12, 34, 0)
            .unwrap();
        assert_eq!(
            ApiClient::timestamped_url("https://example.com/spat", tyme),
            "https://example.com/spat?timestamp=2023-05-01 12:34:00"
        );
    }
}

//! gsw-md
//!
//! Market-history retrieval from the Albion Online Data Project.
//!
//! This crate owns the provider abstraction and the concrete HTTP provider.
//! It does **not** reshape anything; callers hand the observations to
//! gsw-table.

pub mod provider;

use anyhow::{anyhow, Result};
use gsw_table::RawObservation;
use tracing::debug;

pub use provider::{FetchOutcome, HistoryProvider, HistoryRequest, ProviderError};

/// Public west-server endpoint of the Albion Online Data Project.
pub const DEFAULT_BASE_URL: &str = "https://west.albion-online-data.com";

/// History granularity accepted by the `time-scale` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeScale {
    Hour,
    SixHours,
    Day,
}

impl TimeScale {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeScale::Hour => "1h",
            TimeScale::SixHours => "6h",
            TimeScale::Day => "24h",
        }
    }

    /// Value of the `time-scale` query parameter.
    pub fn as_query(&self) -> &'static str {
        match self {
            TimeScale::Hour => "1",
            TimeScale::SixHours => "6",
            TimeScale::Day => "24",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "1h" => Ok(TimeScale::Hour),
            "6" | "6h" => Ok(TimeScale::SixHours),
            "24" | "24h" | "1d" => Ok(TimeScale::Day),
            other => Err(anyhow!(
                "invalid time scale '{}'. expected one of: 1 | 6 | 24",
                other
            )),
        }
    }
}

/// Albion Online Data Project history provider.
#[derive(Debug, Clone)]
pub struct AlbionHistoryProvider {
    http: reqwest::Client,
    base_url: String,
}

impl Default for AlbionHistoryProvider {
    fn default() -> Self {
        Self::new_with_base_url(DEFAULT_BASE_URL.to_string())
    }
}

impl AlbionHistoryProvider {
    pub fn new_with_base_url(base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    fn build_history_url(&self, items: &[String]) -> String {
        format!(
            "{}/api/v2/stats/history/{}.json",
            self.base_url.trim_end_matches('/'),
            items.join(",")
        )
    }
}

#[async_trait::async_trait]
impl HistoryProvider for AlbionHistoryProvider {
    fn name(&self) -> &'static str {
        "albion-data"
    }

    async fn fetch_history(&self, req: &HistoryRequest) -> Result<FetchOutcome, ProviderError> {
        if req.items.is_empty() {
            return Err(ProviderError::Config("no item codes requested".to_string()));
        }

        let url = self.build_history_url(&req.items);
        let resp = self
            .http
            .get(&url)
            .query(&[("time-scale", req.time_scale.as_query())])
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            debug!(
                items = %req.items.join(","),
                status = status.as_u16(),
                "history request returned non-success status"
            );
            return Ok(FetchOutcome::Skipped {
                status: status.as_u16(),
            });
        }

        let body = resp
            .text()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;
        let observations: Vec<RawObservation> =
            serde_json::from_str(&body).map_err(|e| ProviderError::Decode(e.to_string()))?;

        debug!(
            items = %req.items.join(","),
            locations = observations.len(),
            "history fetched"
        );
        Ok(FetchOutcome::Fetched(observations))
    }
}

// -----------------
// Tests (no network)
// -----------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_scale_parse() {
        assert_eq!(TimeScale::parse("24").unwrap(), TimeScale::Day);
        assert_eq!(TimeScale::parse("6h").unwrap(), TimeScale::SixHours);
        assert_eq!(TimeScale::parse("1").unwrap(), TimeScale::Hour);
        assert!(TimeScale::parse("12").is_err());
    }

    #[test]
    fn history_url_joins_items_and_trims_slash() {
        let p = AlbionHistoryProvider::new_with_base_url("http://localhost:1234/".to_string());
        let url = p.build_history_url(&["T5_ORE".to_string(), "T5_ORE_LEVEL1@1".to_string()]);
        assert_eq!(
            url,
            "http://localhost:1234/api/v2/stats/history/T5_ORE,T5_ORE_LEVEL1@1.json"
        );
    }

    #[tokio::test]
    async fn empty_request_is_a_config_error() {
        let p = AlbionHistoryProvider::default();
        let req = HistoryRequest {
            items: vec![],
            time_scale: TimeScale::Day,
        };
        let err = p.fetch_history(&req).await.unwrap_err();
        assert!(matches!(err, ProviderError::Config(_)));
    }
}

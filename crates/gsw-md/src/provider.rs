//! Provider boundary for market history retrieval.
//!
//! This module defines **only** the request/outcome types, the error type and
//! the provider trait. No concrete HTTP client and no reshaping belong here.

use std::fmt;

use gsw_table::RawObservation;

use crate::TimeScale;

// ---------------------------------------------------------------------------
// Fetch request
// ---------------------------------------------------------------------------

/// Parameters for one history request passed to a [`HistoryProvider`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRequest {
    /// One or more item codes (e.g. `"T5_ORE"`, `"T5_ORE_LEVEL2@2"`).
    pub items: Vec<String>,
    pub time_scale: TimeScale,
}

impl HistoryRequest {
    pub fn single(item: impl Into<String>, time_scale: TimeScale) -> Self {
        Self {
            items: vec![item.into()],
            time_scale,
        }
    }
}

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// Result of a request that reached the upstream API.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// Success status; one entry per location (and quality) reported.
    Fetched(Vec<RawObservation>),
    /// Non-success status. The variant contributes nothing; it is not retried.
    Skipped { status: u16 },
}

impl FetchOutcome {
    /// Observations, or an empty slice for a skipped request.
    pub fn observations(&self) -> &[RawObservation] {
        match self {
            FetchOutcome::Fetched(obs) => obs,
            FetchOutcome::Skipped { .. } => &[],
        }
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors that a [`HistoryProvider`] implementation may return.
#[derive(Debug)]
pub enum ProviderError {
    /// Network or transport failure.
    Transport(String),
    /// A success response payload could not be decoded.
    Decode(String),
    /// The request itself is unusable (e.g. no item codes).
    Config(String),
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::Transport(msg) => write!(f, "transport error: {msg}"),
            ProviderError::Decode(msg) => write!(f, "decode error: {msg}"),
            ProviderError::Config(msg) => write!(f, "config error: {msg}"),
        }
    }
}

impl std::error::Error for ProviderError {}

// ---------------------------------------------------------------------------
// Provider trait
// ---------------------------------------------------------------------------

/// Upstream market-history contract.
///
/// Object safe, so callers can hold a `Box<dyn HistoryProvider>`.
#[async_trait::async_trait]
pub trait HistoryProvider: Send + Sync {
    /// Human-readable name identifying this provider (e.g. `"albion-data"`).
    fn name(&self) -> &'static str;

    /// Fetch the price history for every item in `req`.
    ///
    /// A non-success HTTP status is an `Ok(FetchOutcome::Skipped)`, not an
    /// error.
    async fn fetch_history(&self, req: &HistoryRequest) -> Result<FetchOutcome, ProviderError>;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

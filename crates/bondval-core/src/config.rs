//! Runtime configuration for the valuation pipeline.
//!
//! # Environment Variables
//!
//! | Variable | Field | Default |
//! |----------|-------|---------|
//! | `BONDVAL_ENDPOINT` | `endpoint` | TreasuryDirect calculator |
//! | `BONDVAL_SERIES` | `series` | `EE` |
//! | `BONDVAL_REQUEST_TIMEOUT_MS` | `request_timeout_ms` | `10000` |
//! | `BONDVAL_MAX_RETRIES` | `retry.max_retries` | `2` |
//! | `BONDVAL_MAX_CONCURRENCY` | `max_concurrency` | unbounded |
//! | `BONDVAL_DISPATCH_TIMEOUT_MS` | `dispatch_timeout_ms` | `60000` (`0` disables) |
//! | `BONDVAL_REQUESTS_PER_SECOND` | `requests_per_second` | unlimited |

use std::env;
use std::num::{NonZeroU32, NonZeroUsize};
use std::str::FromStr;
use std::time::Duration;

use crate::request::DEFAULT_ENDPOINT;
use crate::retry::RetryConfig;
use crate::{BondSeries, ValidationError};

/// Settings shared by the client and the dispatcher.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub endpoint: String,
    pub series: BondSeries,
    pub user_agent: String,
    /// Per-attempt network timeout.
    pub request_timeout_ms: u64,
    pub retry: RetryConfig,
    /// Upper bound on in-flight valuations; `None` runs every bond at once.
    pub max_concurrency: Option<NonZeroUsize>,
    /// Deadline for the whole batch; `None` waits for every bond.
    pub dispatch_timeout_ms: Option<u64>,
    pub requests_per_second: Option<NonZeroU32>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            endpoint: String::from(DEFAULT_ENDPOINT),
            series: BondSeries::Ee,
            user_agent: String::from(concat!("bondval/", env!("CARGO_PKG_VERSION"))),
            request_timeout_ms: 10_000,
            retry: RetryConfig::default(),
            max_concurrency: None,
            dispatch_timeout_ms: Some(60_000),
            requests_per_second: None,
        }
    }
}

impl PipelineConfig {
    /// Defaults overridden by any `BONDVAL_*` variable that is set.
    pub fn from_env() -> Result<Self, ValidationError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ValidationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(endpoint) = lookup("BONDVAL_ENDPOINT") {
            config.endpoint = parse_endpoint("BONDVAL_ENDPOINT", &endpoint)?;
        }
        if let Some(series) = lookup("BONDVAL_SERIES") {
            config.series = series.parse()?;
        }
        if let Some(value) = lookup("BONDVAL_REQUEST_TIMEOUT_MS") {
            config.request_timeout_ms = parse_positive("BONDVAL_REQUEST_TIMEOUT_MS", &value)?;
        }
        if let Some(value) = lookup("BONDVAL_MAX_RETRIES") {
            config.retry.max_retries = parse_number("BONDVAL_MAX_RETRIES", &value)?;
        }
        if let Some(value) = lookup("BONDVAL_MAX_CONCURRENCY") {
            config.max_concurrency = Some(parse_number("BONDVAL_MAX_CONCURRENCY", &value)?);
        }
        if let Some(value) = lookup("BONDVAL_DISPATCH_TIMEOUT_MS") {
            let timeout: u64 = parse_number("BONDVAL_DISPATCH_TIMEOUT_MS", &value)?;
            config.dispatch_timeout_ms = (timeout > 0).then_some(timeout);
        }
        if let Some(value) = lookup("BONDVAL_REQUESTS_PER_SECOND") {
            config.requests_per_second = Some(parse_number("BONDVAL_REQUESTS_PER_SECOND", &value)?);
        }

        Ok(config)
    }

    pub fn dispatch_timeout(&self) -> Option<Duration> {
        self.dispatch_timeout_ms.map(Duration::from_millis)
    }

    /// Connection setup gets at most half of the per-attempt budget.
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis((self.request_timeout_ms / 2).max(1))
    }
}

/// Rejects endpoints that are not absolute http(s) URLs.
pub fn parse_endpoint(key: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.starts_with("https://") || trimmed.starts_with("http://") {
        Ok(trimmed.to_owned())
    } else {
        Err(ValidationError::InvalidConfig {
            key,
            message: format!("'{value}' is not an http(s) URL"),
        })
    }
}

fn parse_number<T>(key: &'static str, value: &str) -> Result<T, ValidationError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|error| ValidationError::InvalidConfig {
            key,
            message: format!("'{value}': {error}"),
        })
}

fn parse_positive(key: &'static str, value: &str) -> Result<u64, ValidationError> {
    match parse_number::<u64>(key, value)? {
        0 => Err(ValidationError::InvalidConfig {
            key,
            message: String::from("must be greater than zero"),
        }),
        parsed => Ok(parsed),
    }
}

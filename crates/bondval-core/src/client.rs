//! Valuation client: one descriptor in, one classified result out.
//!
//! # Example
//!
//! ```rust,ignore
//! use bondval_core::{BondDescriptor, BondValuator, ValuationClient};
//!
//! async fn value_one(client: &ValuationClient) {
//!     let descriptor = BondDescriptor::new("$50", "01/2010", "C123456789EE");
//!     match client.valuate(&descriptor).await {
//!         Ok(valuation) => println!("worth {}", valuation.current_value),
//!         Err(error) => eprintln!("{} ({})", error, error.kind()),
//!     }
//! }
//! ```

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::http_client::{HttpClient, ReqwestHttpClient};
use crate::outcome::ValuationError;
use crate::parser::ResponseParser;
use crate::request::{ValuationRequest, DEFAULT_ENDPOINT};
use crate::retry::RetryConfig;
use crate::throttling::RequestPacer;
use crate::{BondDescriptor, BondSeries, BondValuation, PipelineConfig};

/// Boxed future returned by [`BondValuator::valuate`].
pub type ValuationFuture<'a> =
    Pin<Box<dyn Future<Output = Result<BondValuation, ValuationError>> + Send + 'a>>;

/// Anything that can value a single bond.
///
/// The dispatcher only depends on this trait, so tests and alternative
/// calculators can stand in for the live service.
///
/// # Thread Safety
///
/// Implementations are shared by every worker of a dispatch and must be
/// `Send + Sync`.
pub trait BondValuator: Send + Sync {
    /// Values one bond.
    ///
    /// # Errors
    ///
    /// Returns a [`ValuationError`] classified by where the attempt failed:
    /// descriptor validation, transport, service status, or response parsing.
    fn valuate<'a>(&'a self, descriptor: &'a BondDescriptor) -> ValuationFuture<'a>;
}

/// Calculator client: request builder + transport + parser, with retry.
#[derive(Clone)]
pub struct ValuationClient {
    http_client: Arc<dyn HttpClient>,
    parser: ResponseParser,
    endpoint: String,
    series: BondSeries,
    request_timeout_ms: u64,
    retry: RetryConfig,
    pacer: RequestPacer,
}

impl Default for ValuationClient {
    fn default() -> Self {
        Self {
            http_client: Arc::new(ReqwestHttpClient::default()),
            parser: ResponseParser::default(),
            endpoint: String::from(DEFAULT_ENDPOINT),
            series: BondSeries::default(),
            request_timeout_ms: 10_000,
            retry: RetryConfig::default(),
            pacer: RequestPacer::unlimited(),
        }
    }
}

impl ValuationClient {
    /// Client with a real reqwest transport configured from `config`.
    pub fn from_config(config: &PipelineConfig) -> Self {
        let http_client = ReqwestHttpClient::new(&config.user_agent, config.connect_timeout());
        Self::with_http_client(Arc::new(http_client)).configured(config)
    }

    pub fn with_http_client(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            ..Self::default()
        }
    }

    /// Applies endpoint, series, timeout, retry and pacing settings.
    pub fn configured(mut self, config: &PipelineConfig) -> Self {
        self.endpoint = config.endpoint.clone();
        self.series = config.series;
        self.request_timeout_ms = config.request_timeout_ms;
        self.retry = config.retry.clone();
        self.pacer = RequestPacer::from_quota(config.requests_per_second);
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_series(mut self, series: BondSeries) -> Self {
        self.series = series;
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    async fn attempt(&self, request: &ValuationRequest) -> Result<BondValuation, ValuationError> {
        self.pacer.acquire().await;

        let response = self
            .http_client
            .execute(request.to_http(&self.endpoint, self.request_timeout_ms))
            .await
            .map_err(|error| {
                debug!(
                    serial = %request.serial_number,
                    kind = ?error.kind(),
                    "calculator request failed in transport"
                );
                ValuationError::from(error)
            })?;

        if !response.is_success() {
            return Err(ValuationError::Service {
                status: response.status,
            });
        }

        self.parser.parse(&response.body, &request.serial_number)
    }

    async fn valuate_with_retry(
        &self,
        descriptor: &BondDescriptor,
    ) -> Result<BondValuation, ValuationError> {
        let request = ValuationRequest::from_descriptor(descriptor, self.series)?;
        let max_attempts = self.retry.max_attempts();
        let mut attempt = 1;

        loop {
            debug!(
                serial = %request.serial_number,
                attempt,
                max_attempts,
                "requesting bond valuation"
            );

            match self.attempt(&request).await {
                Ok(valuation) => return Ok(valuation),
                Err(error) if error.retryable() && attempt < max_attempts => {
                    let delay = self.retry.delay_for_retry(attempt - 1);
                    warn!(
                        serial = %request.serial_number,
                        attempt,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        %error,
                        "valuation attempt failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(error) => return Err(error),
            }
        }
    }
}

impl BondValuator for ValuationClient {
    fn valuate<'a>(&'a self, descriptor: &'a BondDescriptor) -> ValuationFuture<'a> {
        Box::pin(self.valuate_with_retry(descriptor))
    }
}

//! # Bondval Core
//!
//! Concurrent valuation pipeline for paper savings bonds.
//!
//! ## Overview
//!
//! Given a portfolio of bond descriptors, the pipeline asks the Treasury's
//! redemption calculator for one valuation per bond in parallel, parses each
//! HTML response into a typed record, and assembles a report ordered by issue
//! month. Every bond gets exactly one outcome: a valuation or a classified
//! failure.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`domain`] | Descriptor, valuation, issue month and series types |
//! | [`request`] | Validates descriptors and builds calculator requests |
//! | [`parser`] | Extracts a valuation from the results table |
//! | [`client`] | One-bond valuation with retry and backoff |
//! | [`dispatcher`] | Parallel fan-out with a join barrier and deadline |
//! | [`report`] | Sorting and partitioning into the final report |
//! | [`pipeline`] | `valuate_all` entry point |
//! | [`config`] | Pipeline settings and `BONDVAL_*` environment overrides |
//! | [`source`] | CSV descriptor loading |
//! | [`http_client`] | HTTP transport abstraction |
//! | [`retry`] | Retry budget and backoff |
//! | [`throttling`] | Optional shared request pacing |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use bondval_core::{valuate_all, BondDescriptor, PipelineConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = PipelineConfig::from_env()?;
//!     let bonds = vec![BondDescriptor::new("$50", "01/2010", "C123456789EE")];
//!
//!     let report = valuate_all(&bonds, &config).await;
//!     for valuation in &report.valuations {
//!         println!("{} {}", valuation.issue_date, valuation.current_value);
//!     }
//!     for failure in &report.failures {
//!         eprintln!("{}: {}", failure.descriptor, failure.detail);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! descriptors ──▶ Dispatcher ──spawn N──▶ ValuationClient ──▶ HttpClient
//!                     │                        │
//!                     │                  ResponseParser
//!                     ▼
//!              slots[i] ◀── outcome i
//!                     │ join barrier / deadline
//!                     ▼
//!              ValuationReport (sorted valuations, failures)
//! ```
//!
//! ## Error Handling
//!
//! Per-bond failures are values, not errors of the batch:
//!
//! ```rust
//! use bondval_core::{ValuationError, ValuationErrorKind};
//!
//! fn describe(error: &ValuationError) -> &'static str {
//!     match error.kind() {
//!         ValuationErrorKind::Transport | ValuationErrorKind::Service => "calculator unreachable",
//!         ValuationErrorKind::Timeout => "batch deadline exceeded",
//!         ValuationErrorKind::InvalidDescriptor => "fix the portfolio row",
//!         _ => "calculator response changed shape",
//!     }
//! }
//! ```

pub mod client;
pub mod config;
pub mod dispatcher;
pub mod domain;
pub mod error;
pub mod http_client;
pub mod outcome;
pub mod parser;
pub mod pipeline;
pub mod report;
pub mod request;
pub mod retry;
pub mod source;
pub mod throttling;

pub use client::{BondValuator, ValuationClient, ValuationFuture};
pub use config::PipelineConfig;
pub use dispatcher::{DispatchConfig, Dispatcher};
pub use domain::{
    BondDescriptor, BondSeries, BondValuation, Denomination, IssueMonth, SerialNumber,
};
pub use error::ValidationError;
pub use http_client::{
    HttpClient, HttpError, HttpErrorKind, HttpRequest, HttpResponse,
    ReqwestHttpClient,
};
pub use outcome::{ValuationError, ValuationErrorKind, ValuationFailure, ValuationOutcome};
pub use parser::{parse_cells, ResponseParser, ResponseSchema};
pub use pipeline::{valuate_all, valuate_with};
pub use report::{ReportSummary, ValuationReport};
pub use request::{ValuationRequest, DEFAULT_ENDPOINT};
pub use retry::{Backoff, RetryConfig};
pub use source::{read_descriptors, read_descriptors_from_path, SourceError};
pub use throttling::RequestPacer;

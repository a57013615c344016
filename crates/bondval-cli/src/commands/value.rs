use std::num::{NonZeroU32, NonZeroUsize};

use bondval_core::config::parse_endpoint;
use bondval_core::{
    read_descriptors_from_path, valuate_all, PipelineConfig, ValidationError, ValuationReport,
};
use tracing::info;

use crate::cli::ValueArgs;
use crate::error::CliError;

pub async fn run(args: &ValueArgs) -> Result<ValuationReport, CliError> {
    let config = apply_overrides(args, PipelineConfig::from_env()?)?;
    let descriptors = read_descriptors_from_path(&args.input)?;

    info!(
        bonds = descriptors.len(),
        path = %args.input.display(),
        series = %config.series,
        "valuing portfolio"
    );

    Ok(valuate_all(&descriptors, &config).await)
}

/// Layers command-line flags over the environment-derived config.
fn apply_overrides(
    args: &ValueArgs,
    mut config: PipelineConfig,
) -> Result<PipelineConfig, ValidationError> {
    if let Some(series) = args.series {
        config.series = series;
    }
    if let Some(endpoint) = &args.endpoint {
        config.endpoint = parse_endpoint("--endpoint", endpoint)?;
    }
    if let Some(timeout_ms) = args.timeout_ms {
        if timeout_ms == 0 {
            return Err(ValidationError::InvalidConfig {
                key: "--timeout-ms",
                message: String::from("must be greater than zero"),
            });
        }
        config.request_timeout_ms = timeout_ms;
    }
    if let Some(retries) = args.retries {
        config.retry.max_retries = retries;
    }
    if let Some(limit) = args.max_concurrency {
        config.max_concurrency = NonZeroUsize::new(limit);
    }
    if let Some(timeout_ms) = args.dispatch_timeout_ms {
        config.dispatch_timeout_ms = (timeout_ms > 0).then_some(timeout_ms);
    }
    if let Some(rate) = args.requests_per_second {
        config.requests_per_second = NonZeroU32::new(rate);
    }

    Ok(config)
}

use std::sync::Arc;

use crate::client::{BondValuator, ValuationClient};
use crate::dispatcher::{DispatchConfig, Dispatcher};
use crate::report::ValuationReport;
use crate::{BondDescriptor, PipelineConfig};

/// Values a whole portfolio against the configured calculator.
///
/// Every descriptor ends up either in `valuations` or in `failures`; a
/// per-bond problem never fails the batch.
pub async fn valuate_all(descriptors: &[BondDescriptor], config: &PipelineConfig) -> ValuationReport {
    let client = ValuationClient::from_config(config);
    valuate_with(Arc::new(client), descriptors, DispatchConfig::from(config)).await
}

/// Same as [`valuate_all`] with an explicit valuator and dispatch limits.
pub async fn valuate_with(
    valuator: Arc<dyn BondValuator>,
    descriptors: &[BondDescriptor],
    dispatch: DispatchConfig,
) -> ValuationReport {
    let outcomes = Dispatcher::new(valuator, dispatch)
        .dispatch(descriptors)
        .await;
    ValuationReport::assemble(outcomes)
}

//! Concurrent fan-out of valuations, one task per descriptor.
//!
//! Results are written into a slot vector sized to the input before any task
//! starts. Each task hands back its own index with its outcome, so slot `i`
//! only ever receives the outcome for descriptor `i` and no two tasks share a
//! slot. The dispatcher is the only owner of the slots before the fan-out and
//! after the join barrier.

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::client::BondValuator;
use crate::outcome::{ValuationError, ValuationOutcome};
use crate::{BondDescriptor, PipelineConfig};

/// Fan-out limits for one dispatch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchConfig {
    /// At most this many valuations in flight; `None` starts all at once.
    pub max_concurrency: Option<NonZeroUsize>,
    /// Deadline for the whole batch; pending valuations become timeouts.
    pub timeout: Option<Duration>,
}

impl DispatchConfig {
    pub fn with_max_concurrency(mut self, limit: usize) -> Self {
        self.max_concurrency = NonZeroUsize::new(limit);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl From<&PipelineConfig> for DispatchConfig {
    fn from(config: &PipelineConfig) -> Self {
        Self {
            max_concurrency: config.max_concurrency,
            timeout: config.dispatch_timeout(),
        }
    }
}

/// Runs one [`BondValuator`] call per descriptor and joins them all.
pub struct Dispatcher {
    valuator: Arc<dyn BondValuator>,
    config: DispatchConfig,
}

impl Dispatcher {
    pub fn new(valuator: Arc<dyn BondValuator>, config: DispatchConfig) -> Self {
        Self { valuator, config }
    }

    /// Values every descriptor and returns exactly one outcome per input,
    /// with `outcomes[i]` belonging to `descriptors[i]`.
    pub async fn dispatch(&self, descriptors: &[BondDescriptor]) -> Vec<ValuationOutcome> {
        let started = Instant::now();
        let deadline = self.config.timeout.map(|timeout| started + timeout);
        let semaphore = self
            .config
            .max_concurrency
            .map(|limit| Arc::new(Semaphore::new(limit.get())));

        let mut slots: Vec<Option<ValuationOutcome>> = vec![None; descriptors.len()];
        let mut tasks = JoinSet::new();

        for (index, descriptor) in descriptors.iter().enumerate() {
            let valuator = Arc::clone(&self.valuator);
            let semaphore = semaphore.clone();
            let descriptor = descriptor.clone();

            tasks.spawn(async move {
                let _permit = match semaphore {
                    Some(semaphore) => semaphore.acquire_owned().await.ok(),
                    None => None,
                };
                let result = valuator.valuate(&descriptor).await;
                ValuationOutcome::new(index, descriptor, result)
            });
        }

        let timed_out = loop {
            let joined = match deadline {
                Some(deadline) => match tokio::time::timeout_at(deadline, tasks.join_next()).await {
                    Ok(joined) => joined,
                    Err(_) => break true,
                },
                None => tasks.join_next().await,
            };

            match joined {
                Some(Ok(outcome)) => place(&mut slots, outcome),
                Some(Err(error)) => warn!(%error, "valuation task did not complete"),
                None => break false,
            }
        };

        if timed_out {
            debug!(pending = tasks.len(), "dispatch deadline reached, cancelling");
            tasks.abort_all();
            while let Some(joined) = tasks.join_next().await {
                match joined {
                    Ok(outcome) => place(&mut slots, outcome),
                    Err(error) if error.is_cancelled() => {}
                    Err(error) => warn!(%error, "valuation task did not complete"),
                }
            }
        }

        let timeout_ms = self
            .config
            .timeout
            .map(|timeout| u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX))
            .unwrap_or_default();

        let outcomes = slots
            .into_iter()
            .zip(descriptors)
            .enumerate()
            .map(|(index, (slot, descriptor))| {
                slot.unwrap_or_else(|| {
                    let error = if timed_out {
                        ValuationError::Timeout { timeout_ms }
                    } else {
                        ValuationError::Internal {
                            message: String::from("valuation task ended without a result"),
                        }
                    };
                    ValuationOutcome::new(index, descriptor.clone(), Err(error))
                })
            })
            .collect::<Vec<_>>();

        let succeeded = outcomes.iter().filter(|outcome| outcome.is_success()).count();
        info!(
            total = outcomes.len(),
            succeeded,
            failed = outcomes.len() - succeeded,
            timed_out,
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "dispatch finished"
        );

        outcomes
    }
}

fn place(slots: &mut [Option<ValuationOutcome>], outcome: ValuationOutcome) {
    let index = outcome.index;
    debug_assert!(slots[index].is_none(), "slot {index} written twice");
    slots[index] = Some(outcome);
}

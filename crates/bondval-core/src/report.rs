//! Turns dispatch outcomes into the ordered valuation report.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::outcome::{ValuationFailure, ValuationOutcome};
use crate::BondValuation;

/// Valuations ordered by issue month, with failures kept apart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValuationReport {
    pub valuations: Vec<BondValuation>,
    /// In input order.
    pub failures: Vec<ValuationFailure>,
}

/// Aggregate figures over the successful valuations.
///
/// A total is `None` when the sum does not fit in a `Decimal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub requested: usize,
    pub valued: usize,
    pub failed: usize,
    pub total_issue_price: Option<Decimal>,
    pub total_current_value: Option<Decimal>,
}

impl ValuationReport {
    /// Partitions outcomes and sorts successes by issue month.
    ///
    /// The sort is stable: bonds issued in the same month keep their input order.
    pub fn assemble(outcomes: Vec<ValuationOutcome>) -> Self {
        let mut valuations = Vec::with_capacity(outcomes.len());
        let mut failures = Vec::new();

        for outcome in outcomes {
            match outcome.result {
                Ok(valuation) => valuations.push(valuation),
                Err(error) => failures.push(ValuationFailure::new(
                    outcome.index,
                    outcome.descriptor,
                    &error,
                )),
            }
        }

        valuations.sort_by_key(BondValuation::issue_ordinal);

        Self {
            valuations,
            failures,
        }
    }

    /// True when every requested bond was valued.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Sum of current values, or `None` on overflow.
    pub fn total_current_value(&self) -> Option<Decimal> {
        checked_total(self.valuations.iter().map(|v| v.current_value))
    }

    /// Sum of issue prices, or `None` on overflow.
    pub fn total_issue_price(&self) -> Option<Decimal> {
        checked_total(self.valuations.iter().map(|v| v.issue_price))
    }

    pub fn summary(&self) -> ReportSummary {
        ReportSummary {
            requested: self.valuations.len() + self.failures.len(),
            valued: self.valuations.len(),
            failed: self.failures.len(),
            total_issue_price: self.total_issue_price(),
            total_current_value: self.total_current_value(),
        }
    }
}

fn checked_total(mut amounts: impl Iterator<Item = Decimal>) -> Option<Decimal> {
    amounts.try_fold(Decimal::ZERO, Decimal::checked_add)
}

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::IssueMonth;

/// Redemption value of one bond as reported by the calculator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BondValuation {
    pub denomination: u32,
    pub issue_date: IssueMonth,
    pub next_accrual_date: String,
    pub final_maturity_date: String,
    pub issue_price: Decimal,
    /// Kept verbatim, including the currency symbol.
    pub gain_amount: String,
    /// Fraction, not percent: `2.30%` is stored as `0.0230`.
    pub interest_rate: Decimal,
    pub current_value: Decimal,
}

impl BondValuation {
    /// Sort key used by the report: months since January 1970.
    pub fn issue_ordinal(&self) -> i64 {
        self.issue_date.ordinal()
    }
}

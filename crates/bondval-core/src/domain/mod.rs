//! # Domain Models
//!
//! Canonical types for savings bond valuation.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`BondDescriptor`] | Raw input row identifying one bond |
//! | [`Denomination`] | Validated face value in whole dollars |
//! | [`SerialNumber`] | Validated serial number |
//! | [`IssueMonth`] | `MM/YYYY` month with a sortable ordinal |
//! | [`BondSeries`] | Paper bond series (EE, I, E) |
//! | [`BondValuation`] | Parsed calculator result for one bond |
//!
//! Descriptors stay raw until a request is built; every other type validates
//! on construction.

mod descriptor;
mod issue_month;
mod series;
mod valuation;

pub use descriptor::{BondDescriptor, Denomination, SerialNumber};
pub use issue_month::IssueMonth;
pub use series::BondSeries;
pub use valuation::BondValuation;

//! Builds calculator requests from bond descriptors.
//!
//! Every descriptor field is validated here so that nothing malformed ever
//! reaches the network.

use crate::http_client::HttpRequest;
use crate::{BondDescriptor, BondSeries, Denomination, IssueMonth, SerialNumber, ValidationError};

/// Public redemption calculator endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://www.treasurydirect.gov/BC/SBCPrice";

/// Form field values that ask the calculator to price the submitted bond.
const CALCULATE_FIELD: &str = "btnAdd.x";
const CALCULATE_ACTION: &str = "CALCULATE";

/// A descriptor that passed validation, ready to be encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValuationRequest {
    pub series: BondSeries,
    pub issue_date: IssueMonth,
    pub denomination: Denomination,
    pub serial_number: SerialNumber,
}

impl ValuationRequest {
    /// Validates a raw descriptor for the given series.
    pub fn from_descriptor(
        descriptor: &BondDescriptor,
        series: BondSeries,
    ) -> Result<Self, ValidationError> {
        let denomination = Denomination::parse(&descriptor.denomination)?;
        if !series.accepts(denomination.dollars()) {
            return Err(ValidationError::UnsupportedDenomination {
                value: denomination.dollars(),
                series: series.as_str(),
                accepted: series
                    .denominations()
                    .iter()
                    .map(u32::to_string)
                    .collect::<Vec<_>>()
                    .join(", "),
            });
        }

        let issue_date = IssueMonth::parse(&descriptor.issue_date)?;
        let serial_number = SerialNumber::parse(&descriptor.serial_number)?;

        Ok(Self {
            series,
            issue_date,
            denomination,
            serial_number,
        })
    }

    /// `application/x-www-form-urlencoded` body in a stable field order.
    pub fn form_body(&self) -> String {
        let issue_date = self.issue_date.to_string();
        let denomination = self.denomination.to_string();
        let fields = [
            ("Series", self.series.as_str()),
            (CALCULATE_FIELD, CALCULATE_ACTION),
            ("IssueDate", issue_date.as_str()),
            ("Denomination", denomination.as_str()),
            ("SerialNumber", self.serial_number.as_str()),
        ];

        fields
            .iter()
            .map(|(name, value)| {
                format!(
                    "{}={}",
                    urlencoding::encode(name),
                    urlencoding::encode(value)
                )
            })
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Full transport request against `endpoint`.
    pub fn to_http(&self, endpoint: &str, timeout_ms: u64) -> HttpRequest {
        HttpRequest::post(endpoint)
            .with_header("Content-Type", "application/x-www-form-urlencoded")
            .with_header("Accept", "text/html,text/plain")
            .with_body(self.form_body())
            .with_timeout_ms(timeout_ms)
    }
}

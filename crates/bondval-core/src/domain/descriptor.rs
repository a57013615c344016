use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// One bond of the portfolio, exactly as the descriptor source supplied it.
///
/// Fields are kept as raw text; validation happens when the request is built
/// so a malformed row fails on its own instead of aborting the batch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BondDescriptor {
    pub denomination: String,
    pub issue_date: String,
    pub serial_number: String,
}

impl BondDescriptor {
    pub fn new(
        denomination: impl Into<String>,
        issue_date: impl Into<String>,
        serial_number: impl Into<String>,
    ) -> Self {
        Self {
            denomination: denomination.into(),
            issue_date: issue_date.into(),
            serial_number: serial_number.into(),
        }
    }
}

impl Display for BondDescriptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.serial_number, self.denomination, self.issue_date
        )
    }
}

/// Face value of a bond in whole dollars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Denomination(u32);

impl Denomination {
    /// Parses money text such as `50`, `$50`, `$1,000` or `100.00`.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyDenomination);
        }

        let invalid = || ValidationError::InvalidDenomination {
            value: input.to_owned(),
        };

        let amount = trimmed.strip_prefix('$').unwrap_or(trimmed).replace(',', "");
        let dollars = match amount.split_once('.') {
            Some((dollars, cents)) => {
                if cents.is_empty() || !cents.bytes().all(|b| b == b'0') {
                    return Err(invalid());
                }
                dollars.to_owned()
            }
            None => amount,
        };

        if dollars.is_empty() || !dollars.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let value: u32 = dollars.parse().map_err(|_| invalid())?;
        if value == 0 {
            return Err(invalid());
        }

        Ok(Self(value))
    }

    pub const fn dollars(self) -> u32 {
        self.0
    }
}

impl Display for Denomination {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validated serial number as printed on the bond.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SerialNumber(String);

impl SerialNumber {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptySerialNumber);
        }

        for (index, ch) in trimmed.chars().enumerate() {
            if !ch.is_ascii_alphanumeric() {
                return Err(ValidationError::SerialNumberInvalidChar { ch, index });
            }
        }

        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for SerialNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for SerialNumber {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<SerialNumber> for String {
    fn from(value: SerialNumber) -> Self {
        value.0
    }
}

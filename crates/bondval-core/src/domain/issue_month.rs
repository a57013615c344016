use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::Month;

use crate::ValidationError;

const EPOCH_YEAR: i32 = 1970;

/// Calendar month in the calculator's `MM/YYYY` encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IssueMonth {
    year: i32,
    month: Month,
}

impl IssueMonth {
    pub fn new(year: i32, month: Month) -> Self {
        Self { year, month }
    }

    /// Parses exactly two month digits, a slash and four year digits.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidIssueDate {
            value: input.to_owned(),
        };

        let trimmed = input.trim();
        let bytes = trimmed.as_bytes();
        if bytes.len() != 7 || bytes[2] != b'/' {
            return Err(invalid());
        }

        let (month_digits, year_digits) = (&trimmed[0..2], &trimmed[3..7]);
        if !month_digits.bytes().all(|b| b.is_ascii_digit())
            || !year_digits.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }

        let month_number: u8 = month_digits.parse().map_err(|_| invalid())?;
        let month = Month::try_from(month_number).map_err(|_| invalid())?;
        let year: i32 = year_digits.parse().map_err(|_| invalid())?;

        Ok(Self { year, month })
    }

    pub const fn year(self) -> i32 {
        self.year
    }

    pub const fn month(self) -> Month {
        self.month
    }

    /// Months elapsed since January 1970; earlier months are negative.
    pub fn ordinal(self) -> i64 {
        i64::from(self.year - EPOCH_YEAR) * 12 + i64::from(u8::from(self.month)) - 1
    }
}

impl Ord for IssueMonth {
    fn cmp(&self, other: &Self) -> Ordering {
        self.ordinal().cmp(&other.ordinal())
    }
}

impl PartialOrd for IssueMonth {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for IssueMonth {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}/{:04}", u8::from(self.month), self.year)
    }
}

impl Serialize for IssueMonth {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for IssueMonth {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(D::Error::custom)
    }
}

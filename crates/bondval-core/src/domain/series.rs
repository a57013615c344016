use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

const EE_DENOMINATIONS: &[u32] = &[50, 75, 100, 200, 500, 1_000, 5_000, 10_000];
const I_DENOMINATIONS: &[u32] = &[50, 75, 100, 200, 500, 1_000, 5_000, 10_000];
const E_DENOMINATIONS: &[u32] = &[10, 25, 50, 75, 100, 200, 500, 1_000, 5_000, 10_000];

/// Paper savings bond series understood by the redemption calculator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BondSeries {
    #[default]
    #[serde(rename = "EE")]
    Ee,
    #[serde(rename = "I")]
    I,
    #[serde(rename = "E")]
    E,
}

impl BondSeries {
    /// Value sent in the calculator's `Series` form field.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ee => "EE",
            Self::I => "I",
            Self::E => "E",
        }
    }

    /// Face values that were issued on paper for this series.
    pub const fn denominations(self) -> &'static [u32] {
        match self {
            Self::Ee => EE_DENOMINATIONS,
            Self::I => I_DENOMINATIONS,
            Self::E => E_DENOMINATIONS,
        }
    }

    pub fn accepts(self, face_value: u32) -> bool {
        self.denominations().contains(&face_value)
    }
}

impl Display for BondSeries {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BondSeries {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "EE" => Ok(Self::Ee),
            "I" => Ok(Self::I),
            "E" => Ok(Self::E),
            _ => Err(ValidationError::InvalidSeries {
                value: value.to_owned(),
            }),
        }
    }
}

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::RateWindowError;

/// Granularity at which raw observations are grouped into compounding periods.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Frequency {
    Day,
    Month,
    Year,
}

impl Frequency {
    pub fn all() -> [Frequency; 3] {
        [Frequency::Day, Frequency::Month, Frequency::Year]
    }
}

// --- String Conversion ---

impl FromStr for Frequency {
    type Err = RateWindowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "day" | "d" | "daily" | "dia" => Ok(Frequency::Day),
            "month" | "m" | "monthly" | "mes" | "mês" => Ok(Frequency::Month),
            "year" | "y" | "yearly" | "ano" => Ok(Frequency::Year),
            _ => Err(RateWindowError::InvalidFrequency {
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Frequency::Day => "day",
            Frequency::Month => "month",
            Frequency::Year => "year",
        };
        write!(f, "{}", s)
    }
}

// --- Serde Integration ---

impl From<Frequency> for String {
    fn from(frequency: Frequency) -> Self {
        frequency.to_string()
    }
}

impl TryFrom<String> for Frequency {
    type Error = RateWindowError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Frequency::from_str(&value)
    }
}

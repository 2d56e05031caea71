use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::RateWindowError;

/// Date format used by the central bank's time-series endpoint.
pub const SOURCE_DATE_FORMAT: &str = "%d/%m/%Y";
/// Date format used in the persisted record file.
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// A single rate reading, in percent, for one calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateObservation {
    pub date: NaiveDate,
    pub rate: f64,
}

impl RateObservation {
    pub fn new(date: NaiveDate, rate: f64) -> Self {
        Self { date, rate }
    }

    /**
    Parse an observation from a raw record.

    ## Arguments
    * `record` - The record as fetched or persisted, with string fields.

    ## Returns
    The parsed observation, or a `ParseDateError` / `ParseRateError` if either field is malformed.
     */
    pub fn from_record(record: &RawRateRecord) -> Result<Self, RateWindowError> {
        let date = parse_record_date(&record.data)?;
        let rate = record
            .valor
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|r| r.is_finite())
            .ok_or_else(|| RateWindowError::ParseRateError {
                date: record.data.clone(),
                value: record.valor.clone(),
            })?;
        Ok(Self { date, rate })
    }
}

/// The record shape served by the rate endpoint and written to the data file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRateRecord {
    pub data: String,
    pub valor: String,
}

impl RawRateRecord {
    pub fn new(data: impl Into<String>, valor: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            valor: valor.into(),
        }
    }

    /// Rewrites the date field in ISO form, leaving the rate untouched.
    pub fn normalized(&self) -> Result<Self, RateWindowError> {
        let date = parse_record_date(&self.data)?;
        Ok(Self {
            data: date.format(ISO_DATE_FORMAT).to_string(),
            valor: self.valor.clone(),
        })
    }
}

impl From<&RateObservation> for RawRateRecord {
    fn from(observation: &RateObservation) -> Self {
        Self {
            data: observation.date.format(ISO_DATE_FORMAT).to_string(),
            valor: observation.rate.to_string(),
        }
    }
}

/// Accepts both `DD/MM/YYYY` and `YYYY-MM-DD`.
pub fn parse_record_date(value: &str) -> Result<NaiveDate, RateWindowError> {
    let value = value.trim();
    let format = if value.contains('/') {
        SOURCE_DATE_FORMAT
    } else {
        ISO_DATE_FORMAT
    };
    Ok(NaiveDate::parse_from_str(value, format)?)
}

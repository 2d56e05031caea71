use std::{
    fs::{self, File},
    io::{BufReader, BufWriter},
    path::Path,
};

use chrono::NaiveDate;
use rand::{rngs::StdRng, Rng as _, SeedableRng as _};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::{
    error::RateWindowError,
    util::date_utils::{date_chunks, days_between},
};

use super::{
    observation::{RateObservation, RawRateRecord, SOURCE_DATE_FORMAT},
    store::TimeSeriesStore,
};

const SERIES_BASE_URL: &str = "https://api.bcb.gov.br/dados/serie";
/// The endpoint refuses daily series queries spanning more than ten years.
const MAX_YEARS_PER_REQUEST: u32 = 10;

/// Reads a JSON array of `{ "data": ..., "valor": ... }` records.
#[instrument]
pub fn load_records(path: &Path) -> Result<Vec<RawRateRecord>, RateWindowError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let records: Vec<RawRateRecord> = serde_json::from_reader(reader)?;
    info!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Writes records as a JSON array, creating the parent directory if needed.
#[instrument(skip(records), fields(records = records.len()))]
pub fn save_records(path: &Path, records: &[RawRateRecord]) -> Result<(), RateWindowError> {
    if let Some(parent_dir) = path.parent() {
        if !parent_dir.as_os_str().is_empty() && !parent_dir.exists() {
            fs::create_dir_all(parent_dir)?;
        }
    }
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer(writer, records)?;
    info!("Saved {} records to {}", records.len(), path.display());
    Ok(())
}

pub fn load_store(path: &Path) -> Result<TimeSeriesStore, RateWindowError> {
    TimeSeriesStore::from_records(&load_records(path)?)
}

pub fn series_url(series_code: u32, start: NaiveDate, end: NaiveDate) -> String {
    format!(
        "{}/bcdata.sgs.{}/dados?formato=json&dataInicial={}&dataFinal={}",
        SERIES_BASE_URL,
        series_code,
        start.format(SOURCE_DATE_FORMAT),
        end.format(SOURCE_DATE_FORMAT)
    )
}

/**
Download a rate series from the central bank's time-series endpoint.

## Arguments
* `series_code` - The series identifier (11 is the daily SELIC rate).
* `start` - First date to request.
* `end` - Last date to request (inclusive).

## Returns
The records with dates rewritten as `YYYY-MM-DD`, in request order.
 */
#[instrument]
pub async fn fetch_records(
    series_code: u32,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<RawRateRecord>, RateWindowError> {
    let client = reqwest::Client::new();
    let mut records = Vec::new();

    for (chunk_start, chunk_end) in date_chunks(start, end, MAX_YEARS_PER_REQUEST)? {
        let url = series_url(series_code, chunk_start, chunk_end);
        info!("Fetching rate series from URL: {}", url);
        let chunk: Vec<RawRateRecord> = client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        debug!("Received {} records for {} to {}", chunk.len(), chunk_start, chunk_end);
        for record in chunk {
            records.push(record.normalized()?);
        }
    }

    info!("Fetched {} records", records.len());
    Ok(records)
}

/// Parameters of a generated series: uniform daily rates in `[low, high)`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SyntheticSeries {
    pub seed: u64,
    pub low: f64,
    pub high: f64,
}

impl Default for SyntheticSeries {
    fn default() -> Self {
        Self {
            seed: 0,
            low: 3.0,
            high: 15.0,
        }
    }
}

impl SyntheticSeries {
    pub fn validate(&self) -> Result<(), RateWindowError> {
        if !(self.low.is_finite() && self.high.is_finite() && self.low < self.high) {
            return Err(RateWindowError::ConfigError(format!(
                "Synthetic rate bounds must satisfy low < high, got {} and {}",
                self.low, self.high
            )));
        }
        Ok(())
    }

    /**
    Generate one observation per calendar day in `[start, end]`.

    The same seed always yields the same series.

    ## Arguments
    * `start` - First date.
    * `end` - Last date (inclusive).

    ## Returns
    The generated store, empty when `start > end`.
     */
    #[instrument(skip(self), fields(seed = self.seed))]
    pub fn generate(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<TimeSeriesStore, RateWindowError> {
        self.validate()?;
        let mut rng = StdRng::seed_from_u64(self.seed);
        let observations: Vec<RateObservation> = start
            .iter_days()
            .take_while(|d| *d <= end)
            .map(|date| RateObservation::new(date, rng.gen_range(self.low..self.high)))
            .collect();
        debug!(
            "Generated {} synthetic observations over {} days",
            observations.len(),
            days_between(start, end) + 1
        );
        TimeSeriesStore::from_observations(observations)
    }
}

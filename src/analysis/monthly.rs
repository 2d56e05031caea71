use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::{
    data::{frequency::Frequency, store::TimeSeriesStore},
    error::RateWindowError,
    util::date_utils::{month_end, month_slices},
};

use super::{
    aggregator::aggregate_observations,
    growth::{profit, validate_capital},
    scanner::window_profit,
    window::{ProfitResult, Window},
};

/// Profit from investing the capital for a single month at that month's mean rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlyProfitEntry {
    pub month_end: NaiveDate,
    pub effective_rate: f64,
    pub profit: f64,
}

impl MonthlyProfitEntry {
    /// `MM/YYYY`.
    pub fn label(&self) -> String {
        self.month_end.format("%m/%Y").to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyProfitReport {
    pub window: Window,
    pub capital: f64,
    pub entries: Vec<MonthlyProfitEntry>,
    /// The whole window compounded once at Month frequency. Not the sum of `entries`.
    pub compounded: ProfitResult,
}

impl MonthlyProfitReport {
    /**
    Break a window down month by month.

    Every calendar month intersecting the window that holds observations gets one entry, using
    that month's mean rate for a single period. Months without observations are left out.

    ## Arguments
    * `store` - The rate series.
    * `capital` - Amount invested each month.
    * `window` - The period to report on, usually the scanner's winner.

    ## Returns
    The report, or `EmptyRange` if the window holds no observations at all.
     */
    #[instrument(skip(store, window), fields(window = %window))]
    pub fn build(
        store: &TimeSeriesStore,
        capital: f64,
        window: Window,
    ) -> Result<Self, RateWindowError> {
        validate_capital(capital)?;
        let compounded = window_profit(store, capital, window, Frequency::Month)?;

        let mut entries = Vec::new();
        for (start, end) in month_slices(window.start(), window.end())? {
            let Some(aggregated) = aggregate_observations(store.range(start, end), Frequency::Month)
            else {
                debug!("No observations between {} and {}, skipping month", start, end);
                continue;
            };
            entries.push(MonthlyProfitEntry {
                month_end: month_end(start)?,
                effective_rate: aggregated.effective_rate,
                profit: profit(capital, aggregated.effective_rate, 1.0),
            });
        }

        debug!(
            "Monthly report: {} months, total {:.2}, compounded {:.2}",
            entries.len(),
            entries.iter().map(|e| e.profit).sum::<f64>(),
            compounded.profit
        );

        Ok(Self {
            window,
            capital,
            entries,
            compounded,
        })
    }

    /// Sum of the per-month profits.
    pub fn total(&self) -> f64 {
        self.entries.iter().map(|e| e.profit).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

use chrono::NaiveDate;
use derive_builder::Builder;
use rayon::prelude::*;
use tracing::{debug, info, instrument};

use crate::{
    data::{frequency::Frequency, store::TimeSeriesStore},
    error::RateWindowError,
    util::date_utils::{add_days, days_between},
};

use super::{
    aggregator::aggregate,
    growth::{future_value, validate_capital},
    window::{ProfitResult, Window},
};

/**
Compound `capital` over `window` using the rate aggregated at `frequency`.

## Arguments
* `store` - The rate series.
* `capital` - Amount invested at the window start.
* `window` - The investment period.
* `frequency` - How observations are grouped into compounding periods.

## Returns
The window's `ProfitResult`, or `EmptyRange` when the window holds no observations.
 */
pub fn window_profit(
    store: &TimeSeriesStore,
    capital: f64,
    window: Window,
    frequency: Frequency,
) -> Result<ProfitResult, RateWindowError> {
    validate_capital(capital)?;
    let aggregated = aggregate(store, &window, frequency)?;
    let future_value = future_value(capital, aggregated.effective_rate, aggregated.periods as f64);
    Ok(ProfitResult {
        window,
        capital,
        effective_rate: aggregated.effective_rate,
        periods: aggregated.periods,
        future_value,
        profit: future_value - capital,
    })
}

/// Exhaustive search for the fixed-length window with the highest daily-compounded profit.
#[derive(Debug, Clone, Builder)]
#[builder(build_fn(error = "RateWindowError"))]
pub struct WindowScanner {
    capital: f64,
    window_days: u32,
    /// Evaluate candidates on the rayon pool. The result is identical either way.
    #[builder(default)]
    parallel: bool,
}

impl WindowScanner {
    pub fn new(capital: f64, window_days: u32) -> Self {
        Self {
            capital,
            window_days,
            parallel: false,
        }
    }

    pub fn capital(&self) -> f64 {
        self.capital
    }

    pub fn window_days(&self) -> u32 {
        self.window_days
    }

    /**
    Scan every window of `window_days` calendar days whose start lies in
    `[range_start, range_end - window_days]`, one day apart.

    Each candidate re-aggregates its whole window at Day frequency. Ties keep the earliest start.
    A candidate without observations fails the scan instead of being skipped, so on a
    business-day series any window of four days or less that covers a weekend is an error.

    ## Arguments
    * `store` - The rate series.
    * `range_start` - First candidate start date.
    * `range_end` - End of the scan range.

    ## Returns
    The best `ProfitResult`. Fails with `InsufficientRange` before scanning when the range is
    shorter than the window, and with `EmptyRange` for the earliest candidate holding no data.
     */
    #[instrument(skip(self, store), fields(capital = self.capital, window_days = self.window_days, parallel = self.parallel))]
    pub fn scan(
        &self,
        store: &TimeSeriesStore,
        range_start: NaiveDate,
        range_end: NaiveDate,
    ) -> Result<ProfitResult, RateWindowError> {
        validate_capital(self.capital)?;
        if self.window_days == 0 {
            return Err(RateWindowError::InvalidWindowLength(self.window_days));
        }
        let range_days = days_between(range_start, range_end);
        let window_days = i64::from(self.window_days);
        if window_days > range_days {
            return Err(RateWindowError::InsufficientRange {
                range_days,
                window_days: self.window_days,
            });
        }

        let candidates = (range_days - window_days + 1) as usize;
        info!(
            "Scanning {} candidate windows between {} and {}",
            candidates, range_start, range_end
        );

        let best = if self.parallel {
            let results: Vec<Result<ProfitResult, RateWindowError>> = (0..candidates)
                .into_par_iter()
                .map(|offset| self.evaluate(store, range_start, offset))
                .collect();
            select_best(results)?
        } else {
            select_best((0..candidates).map(|offset| self.evaluate(store, range_start, offset)))?
        };

        info!("Most profitable window: {}", best);
        Ok(best)
    }

    fn evaluate(
        &self,
        store: &TimeSeriesStore,
        range_start: NaiveDate,
        offset: usize,
    ) -> Result<ProfitResult, RateWindowError> {
        let start = add_days(range_start, offset as i64)?;
        let window = Window::starting_at(start, self.window_days)?;
        window_profit(store, self.capital, window, Frequency::Day)
    }
}

/// Scans with a sequential [`WindowScanner`].
pub fn find_most_profitable_window(
    store: &TimeSeriesStore,
    capital: f64,
    window_days: u32,
    range_start: NaiveDate,
    range_end: NaiveDate,
) -> Result<ProfitResult, RateWindowError> {
    WindowScanner::new(capital, window_days).scan(store, range_start, range_end)
}

/// Folds candidates in start-date order. Only a strictly greater profit replaces the current best.
fn select_best<I>(candidates: I) -> Result<ProfitResult, RateWindowError>
where
    I: IntoIterator<Item = Result<ProfitResult, RateWindowError>>,
{
    let mut best: Option<ProfitResult> = None;
    for candidate in candidates {
        let candidate = candidate?;
        let replace = match &best {
            Some(current) => candidate.profit > current.profit,
            None => true,
        };
        if replace {
            debug!("New best: {}", candidate);
            best = Some(candidate);
        }
    }
    best.ok_or_else(|| RateWindowError::ConfigError("No candidate windows to scan".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{data::observation::RateObservation, util::math_utils::approx_eq};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn daily(start: NaiveDate, rates: &[f64]) -> TimeSeriesStore {
        TimeSeriesStore::from_observations(
            rates
                .iter()
                .enumerate()
                .map(|(i, &r)| RateObservation::new(add_days(start, i as i64).unwrap(), r))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_constant_series_first_window_wins() {
        let start = date(2024, 1, 1);
        let store = daily(start, &[5.0; 10]);
        let end = date(2024, 1, 10);
        let result = WindowScanner::new(1000.0, 3).scan(&store, start, end).unwrap();
        assert_eq!(result.window, Window::new(start, date(2024, 1, 3)).unwrap());
        assert_eq!(result.periods, 3);
        assert!(approx_eq(result.effective_rate, 0.05, 1e-12));
        assert!(approx_eq(result.future_value, 1157.625, 1e-12));
        assert!(approx_eq(result.profit, 157.625, 1e-12));
    }

    #[test]
    fn test_picks_highest_window() {
        let start = date(2024, 1, 1);
        let store = daily(start, &[1.0, 1.0, 1.0, 9.0, 9.0, 1.0, 1.0]);
        let result = find_most_profitable_window(&store, 1000.0, 2, start, date(2024, 1, 7))
            .unwrap();
        assert_eq!(result.window.start(), date(2024, 1, 4));
        assert_eq!(result.window.end(), date(2024, 1, 5));
    }

    #[test]
    fn test_insufficient_range() {
        let start = date(2024, 1, 1);
        let store = daily(start, &[5.0; 10]);
        let cases = [
            (10, date(2024, 1, 10)),
            (3, date(2024, 1, 2)),
            (1, date(2023, 12, 1)),
        ];
        for (window_days, end) in cases {
            let result = WindowScanner::new(1000.0, window_days).scan(&store, start, end);
            assert!(
                matches!(result, Err(RateWindowError::InsufficientRange { .. })),
                "window {} end {}: {:?}",
                window_days,
                end,
                result
            );
        }
    }

    #[test]
    fn test_window_equal_to_range_days() {
        let start = date(2024, 1, 1);
        let store = daily(start, &[5.0; 10]);
        let result = WindowScanner::new(1000.0, 9)
            .scan(&store, start, date(2024, 1, 10))
            .unwrap();
        assert_eq!(result.window.start(), start);
        assert_eq!(result.periods, 9);
    }

    #[test]
    fn test_zero_window() {
        let store = daily(date(2024, 1, 1), &[5.0; 10]);
        let result = WindowScanner::new(1000.0, 0).scan(&store, date(2024, 1, 1), date(2024, 1, 10));
        assert!(matches!(result, Err(RateWindowError::InvalidWindowLength(0))));
    }

    #[test]
    fn test_empty_store() {
        let store = TimeSeriesStore::default();
        let result = WindowScanner::new(1000.0, 3).scan(&store, date(2024, 1, 1), date(2024, 1, 10));
        assert!(matches!(result, Err(RateWindowError::EmptyRange { .. })));
    }

    #[test]
    fn test_invalid_capital() {
        let store = daily(date(2024, 1, 1), &[5.0; 10]);
        let result = WindowScanner::new(-1.0, 3).scan(&store, date(2024, 1, 1), date(2024, 1, 10));
        assert!(matches!(result, Err(RateWindowError::InvalidCapital(_))));
    }

    #[test]
    fn test_builder() {
        let scanner = WindowScannerBuilder::default()
            .capital(1500.0)
            .window_days(500)
            .parallel(true)
            .build()
            .unwrap();
        assert_eq!(scanner.capital(), 1500.0);
        assert_eq!(scanner.window_days(), 500);

        let missing = WindowScannerBuilder::default().capital(1500.0).build();
        assert!(matches!(missing, Err(RateWindowError::BuilderError(_))));
    }

    #[test]
    fn test_window_profit_frequencies() {
        let store = TimeSeriesStore::from_observations(vec![
            RateObservation::new(date(2024, 1, 15), 2.0),
            RateObservation::new(date(2024, 2, 15), 3.0),
        ])
        .unwrap();
        let window = Window::new(date(2024, 1, 1), date(2024, 2, 29)).unwrap();
        let monthly = window_profit(&store, 1000.0, window, Frequency::Month).unwrap();
        assert_eq!(monthly.periods, 2);
        assert!(approx_eq(monthly.profit, 50.625, 1e-12));
        let yearly = window_profit(&store, 1000.0, window, Frequency::Year).unwrap();
        assert_eq!(yearly.periods, 1);
        assert!(approx_eq(yearly.profit, 25.0, 1e-12));
    }
}

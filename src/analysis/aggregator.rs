use chrono::{Datelike as _, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{
    data::{frequency::Frequency, observation::RateObservation, store::TimeSeriesStore},
    error::RateWindowError,
    util::math_utils::mean,
};

use super::window::Window;

/// A window's observations reduced to one per-period rate and a number of periods.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AggregatedRate {
    /// Fractional rate per period (percent / 100).
    pub effective_rate: f64,
    pub periods: usize,
}

/**
Reduce the observations inside `window` to an effective rate and a period count.

Day uses every observation as one period. Month and Year first average each calendar group,
then average the group means, so groups of unequal size weigh the same.

## Arguments
* `store` - The rate series.
* `window` - Inclusive date range to aggregate.
* `frequency` - Grouping granularity.

## Returns
The aggregated rate, or `EmptyRange` if no observation falls inside the window.
 */
pub fn aggregate(
    store: &TimeSeriesStore,
    window: &Window,
    frequency: Frequency,
) -> Result<AggregatedRate, RateWindowError> {
    let observations = store.range(window.start(), window.end());
    aggregate_observations(observations, frequency).ok_or(RateWindowError::EmptyRange {
        start: window.start(),
        end: window.end(),
    })
}

/// Same as [`aggregate`] over an already-selected, date-ordered slice. `None` when empty.
pub fn aggregate_observations(
    observations: &[RateObservation],
    frequency: Frequency,
) -> Option<AggregatedRate> {
    let rates = match frequency {
        Frequency::Day => observations.iter().map(|o| o.rate).collect::<Vec<_>>(),
        // Only months that hold observations become periods; a gap month is not counted.
        Frequency::Month => group_means(observations, |d| (d.year(), d.month())),
        Frequency::Year => group_means(observations, |d| (d.year(), 0)),
    };
    let average = mean(&rates)?;
    Some(AggregatedRate {
        effective_rate: average / 100.0,
        periods: rates.len(),
    })
}

fn group_means<K, F>(observations: &[RateObservation], key: F) -> Vec<f64>
where
    K: PartialEq,
    F: Fn(NaiveDate) -> K,
{
    observations
        .chunk_by(|a, b| key(a.date) == key(b.date))
        .filter_map(|group| {
            let rates: Vec<f64> = group.iter().map(|o| o.rate).collect();
            mean(&rates)
        })
        .collect()
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::{data::store::TimeSeriesStore, error::RateWindowError};

/// `capital * (1 + rate) ^ periods`.
pub fn future_value(capital: f64, rate: f64, periods: f64) -> f64 {
    capital * (1.0 + rate).powf(periods)
}

/// Future value minus the capital put in.
pub fn profit(capital: f64, rate: f64, periods: f64) -> f64 {
    future_value(capital, rate, periods) - capital
}

pub fn validate_capital(capital: f64) -> Result<(), RateWindowError> {
    if capital.is_finite() && capital >= 0.0 {
        Ok(())
    } else {
        Err(RateWindowError::InvalidCapital(capital))
    }
}

/// Running value of the capital after compounding every observation up to `date`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrowthPoint {
    pub date: NaiveDate,
    pub rate: f64,
    pub value: f64,
    pub difference: f64,
}

/**
Compound the capital through the whole series, one observation at a time.

## Arguments
* `store` - The rate series; each rate is a percentage applied for one period.
* `capital` - Starting amount.

## Returns
One point per observation, or `EmptySeries` for an empty store.
 */
#[instrument(skip(store), fields(observations = store.len()))]
pub fn growth_curve(
    store: &TimeSeriesStore,
    capital: f64,
) -> Result<Vec<GrowthPoint>, RateWindowError> {
    validate_capital(capital)?;
    let (Some(start), Some(end)) = (store.first_date(), store.last_date()) else {
        return Err(RateWindowError::EmptySeries);
    };

    let mut value = capital;
    let points: Vec<GrowthPoint> = store
        .iter()
        .map(|o| {
            value *= 1.0 + o.rate / 100.0;
            GrowthPoint {
                date: o.date,
                rate: o.rate,
                value,
                difference: value - capital,
            }
        })
        .collect();

    debug!(
        "Compounded {} observations from {} to {}, final value {:.2}",
        points.len(),
        start,
        end,
        value
    );
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{data::observation::RateObservation, util::math_utils::approx_eq};

    #[test]
    fn test_future_value_scenarios() {
        assert!(approx_eq(future_value(1000.0, 0.05, 3.0), 1157.625, 1e-12));
        assert!(approx_eq(future_value(1000.0, 0.10, 1.0), 1100.0, 1e-12));
        assert!(approx_eq(profit(1000.0, 0.025, 2.0), 50.625, 1e-12));
    }

    #[test]
    fn test_zero_rate_is_flat() {
        for n in [0.0, 1.0, 2.5, 100.0] {
            assert_eq!(future_value(1500.0, 0.0, n), 1500.0);
        }
    }

    #[test]
    fn test_zero_periods() {
        assert_eq!(future_value(1000.0, 0.5, 0.0), 1000.0);
        assert_eq!(future_value(1000.0, -0.5, 0.0), 1000.0);
    }

    #[test]
    fn test_monotonic_in_periods() {
        let mut previous_gain = future_value(1000.0, 0.01, 0.0);
        let mut previous_loss = previous_gain;
        for n in 1..50 {
            let gain = future_value(1000.0, 0.01, n as f64);
            let loss = future_value(1000.0, -0.01, n as f64);
            assert!(gain > previous_gain);
            assert!(loss < previous_loss);
            previous_gain = gain;
            previous_loss = loss;
        }
    }

    #[test]
    fn test_zero_capital() {
        assert_eq!(future_value(0.0, 0.2, 10.0), 0.0);
        assert_eq!(profit(0.0, 0.2, 10.0), 0.0);
    }

    #[test]
    fn test_validate_capital() {
        assert!(validate_capital(0.0).is_ok());
        assert!(validate_capital(1500.0).is_ok());
        assert!(matches!(
            validate_capital(-1.0),
            Err(RateWindowError::InvalidCapital(_))
        ));
        assert!(validate_capital(f64::NAN).is_err());
        assert!(validate_capital(f64::INFINITY).is_err());
    }

    #[test]
    fn test_growth_curve() {
        let d = |day| NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
        let store = TimeSeriesStore::from_observations(vec![
            RateObservation::new(d(2), 10.0),
            RateObservation::new(d(1), 10.0),
            RateObservation::new(d(3), -50.0),
        ])
        .unwrap();
        let curve = growth_curve(&store, 1000.0).unwrap();
        assert_eq!(curve.len(), 3);
        assert!(approx_eq(curve[0].value, 1100.0, 1e-12));
        assert!(approx_eq(curve[1].value, 1210.0, 1e-12));
        assert!(approx_eq(curve[2].value, 605.0, 1e-12));
        assert!(approx_eq(curve[2].difference, -395.0, 1e-12));
    }

    #[test]
    fn test_growth_curve_empty() {
        let result = growth_curve(&TimeSeriesStore::default(), 1000.0);
        assert!(matches!(result, Err(RateWindowError::EmptySeries)));
        assert_eq!(
            result.unwrap_err().to_string(),
            "The rate series has no observations."
        );
    }
}

use chrono::NaiveDate;
use tracing::{debug, instrument};

use crate::error::RateWindowError;

use super::observation::{RateObservation, RawRateRecord};

/// Date-ordered, immutable rate series. Dates are unique.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeSeriesStore {
    observations: Vec<RateObservation>,
}

impl TimeSeriesStore {
    /**
    Build a store from observations in any order.

    ## Arguments
    * `observations` - The observations. They are sorted by date here.

    ## Returns
    The store, or `DuplicateDate` if two observations share a date.
     */
    pub fn from_observations(
        mut observations: Vec<RateObservation>,
    ) -> Result<Self, RateWindowError> {
        observations.sort_by_key(|o| o.date);
        if let Some(pair) = observations.windows(2).find(|w| w[0].date == w[1].date) {
            return Err(RateWindowError::DuplicateDate(pair[0].date));
        }
        Ok(Self { observations })
    }

    #[instrument(skip(records), fields(records = records.len()))]
    pub fn from_records(records: &[RawRateRecord]) -> Result<Self, RateWindowError> {
        let observations = records
            .iter()
            .map(RateObservation::from_record)
            .collect::<Result<Vec<_>, _>>()?;
        let store = Self::from_observations(observations)?;
        debug!(
            "Built store with {} observations ({:?} to {:?})",
            store.len(),
            store.first_date(),
            store.last_date()
        );
        Ok(store)
    }

    /// Observations with `start <= date <= end`. Empty when `start > end`.
    pub fn range(&self, start: NaiveDate, end: NaiveDate) -> &[RateObservation] {
        if start > end {
            return &[];
        }
        let lo = self.observations.partition_point(|o| o.date < start);
        let hi = self.observations.partition_point(|o| o.date <= end);
        &self.observations[lo..hi]
    }

    pub fn observations(&self) -> &[RateObservation] {
        &self.observations
    }

    pub fn iter(&self) -> impl Iterator<Item = &RateObservation> {
        self.observations.iter()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.observations.first().map(|o| o.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.observations.last().map(|o| o.date)
    }

    /// Records in date order with ISO dates, as written back to the data file.
    pub fn to_records(&self) -> Vec<RawRateRecord> {
        self.observations.iter().map(RawRateRecord::from).collect()
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn store() -> TimeSeriesStore {
        TimeSeriesStore::from_observations(vec![
            RateObservation::new(date(2024, 1, 3), 3.0),
            RateObservation::new(date(2024, 1, 1), 1.0),
            RateObservation::new(date(2024, 1, 5), 5.0),
            RateObservation::new(date(2024, 1, 2), 2.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_sorted_on_construction() {
        let store = store();
        let dates: Vec<_> = store.iter().map(|o| o.date.to_string()).collect();
        assert_eq!(dates, ["2024-01-01", "2024-01-02", "2024-01-03", "2024-01-05"]);
        assert_eq!(store.first_date(), Some(date(2024, 1, 1)));
        assert_eq!(store.last_date(), Some(date(2024, 1, 5)));
    }

    #[test]
    fn test_duplicate_date_rejected() {
        let result = TimeSeriesStore::from_observations(vec![
            RateObservation::new(date(2024, 1, 1), 1.0),
            RateObservation::new(date(2024, 1, 1), 2.0),
        ]);
        assert!(matches!(result, Err(RateWindowError::DuplicateDate(d)) if d == date(2024, 1, 1)));
    }

    #[test]
    fn test_range_inclusive() {
        let store = store();
        let rates: Vec<f64> = store
            .range(date(2024, 1, 2), date(2024, 1, 5))
            .iter()
            .map(|o| o.rate)
            .collect();
        assert_eq!(rates, vec![2.0, 3.0, 5.0]);
    }

    #[test]
    fn test_range_sparse_and_empty() {
        let store = store();
        assert_eq!(store.range(date(2024, 1, 4), date(2024, 1, 4)).len(), 0);
        assert_eq!(store.range(date(2024, 1, 5), date(2024, 1, 1)).len(), 0);
        assert_eq!(store.range(date(2023, 1, 1), date(2023, 12, 31)).len(), 0);
        assert_eq!(store.range(date(2023, 1, 1), date(2030, 1, 1)).len(), 4);
    }

    #[test]
    fn test_from_records() {
        let records = vec![
            RawRateRecord::new("02/01/2024", "0.5"),
            RawRateRecord::new("2024-01-01", "0.25"),
        ];
        let store = TimeSeriesStore::from_records(&records).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.observations()[0].rate, 0.25);
        assert_eq!(
            store.to_records(),
            vec![
                RawRateRecord::new("2024-01-01", "0.25"),
                RawRateRecord::new("2024-01-02", "0.5"),
            ]
        );
    }

    #[test]
    fn test_empty_store() {
        let store = TimeSeriesStore::default();
        assert!(store.is_empty());
        assert_eq!(store.first_date(), None);
        assert!(store.range(date(2024, 1, 1), date(2024, 12, 31)).is_empty());
    }
}

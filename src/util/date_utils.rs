use chrono::{Datelike as _, Duration, Months, NaiveDate};

use crate::error::RateWindowError;

/**
Shift a date by a signed number of days.

## Arguments
* `date` - The starting date.
* `days` - Days to add (negative to go back).

## Returns
The shifted date or a RateWindowError if it falls outside chrono's supported range.
 */
pub fn add_days(date: NaiveDate, days: i64) -> Result<NaiveDate, RateWindowError> {
    date.checked_add_signed(Duration::days(days))
        .ok_or_else(|| {
            RateWindowError::DateConversionError(format!(
                "Failed to shift {} by {} days",
                date, days
            ))
        })
}

/// Number of calendar days from `start` to `end`. Negative when `end < start`.
pub fn days_between(start: NaiveDate, end: NaiveDate) -> i64 {
    end.signed_duration_since(start).num_days()
}

pub fn month_start(date: NaiveDate) -> Result<NaiveDate, RateWindowError> {
    date.with_day(1).ok_or_else(|| {
        RateWindowError::DateConversionError(format!("Failed to find month start of {}", date))
    })
}

/// Last calendar day of the month containing `date`.
pub fn month_end(date: NaiveDate) -> Result<NaiveDate, RateWindowError> {
    month_start(date)?
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .ok_or_else(|| {
            RateWindowError::DateConversionError(format!("Failed to find month end of {}", date))
        })
}

/**
Split `[start, end]` into the calendar-month slices it intersects.

## Arguments
* `start` - First day of the range (inclusive).
* `end` - Last day of the range (inclusive).

## Returns
One `(slice_start, slice_end)` pair per month, clipped to the range. Empty if `start > end`.
 */
pub fn month_slices(
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<(NaiveDate, NaiveDate)>, RateWindowError> {
    let mut slices = Vec::new();
    let mut current = start;
    while current <= end {
        let slice_end = month_end(current)?.min(end);
        slices.push((current, slice_end));
        match slice_end.succ_opt() {
            Some(next) => current = next,
            None => break,
        }
    }
    Ok(slices)
}

/**
Split `[start, end]` into consecutive inclusive chunks spanning at most `max_years` each, so a
long history can be fetched in several requests.

## Arguments
* `start` - The overall start date.
* `end` - The overall end date (inclusive).
* `max_years` - Maximum span of a single chunk.

## Returns
A vector of (chunk_start, chunk_end) pairs, or a RateWindowError.
 */
pub fn date_chunks(
    start: NaiveDate,
    end: NaiveDate,
    max_years: u32,
) -> Result<Vec<(NaiveDate, NaiveDate)>, RateWindowError> {
    if start > end {
        return Ok(Vec::new());
    }
    if max_years == 0 {
        return Err(RateWindowError::ConfigError(
            "Chunk span must be at least one year".to_string(),
        ));
    }

    let mut chunks = Vec::new();
    let mut current_start = start;

    while current_start <= end {
        let chunk_end = current_start
            .checked_add_months(Months::new(12 * max_years))
            .and_then(|d| d.pred_opt())
            .map(|d| d.min(end))
            .unwrap_or(end);

        chunks.push((current_start, chunk_end));
        match chunk_end.succ_opt() {
            Some(next) => current_start = next,
            None => break,
        }
    }

    Ok(chunks)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_add_days() {
        assert_eq!(add_days(date(2024, 2, 28), 1).unwrap(), date(2024, 2, 29));
        assert_eq!(add_days(date(2024, 3, 1), -1).unwrap(), date(2024, 2, 29));
        assert!(add_days(NaiveDate::MAX, 1).is_err());
    }

    #[test]
    fn test_days_between() {
        assert_eq!(days_between(date(2024, 1, 1), date(2024, 1, 11)), 10);
        assert_eq!(days_between(date(2024, 1, 11), date(2024, 1, 1)), -10);
        assert_eq!(days_between(date(2024, 1, 1), date(2024, 1, 1)), 0);
    }

    #[test]
    fn test_month_end() {
        assert_eq!(month_end(date(2024, 2, 10)).unwrap(), date(2024, 2, 29));
        assert_eq!(month_end(date(2023, 2, 1)).unwrap(), date(2023, 2, 28));
        assert_eq!(month_end(date(2023, 12, 31)).unwrap(), date(2023, 12, 31));
    }

    #[test]
    fn test_month_slices() {
        let slices = month_slices(date(2024, 1, 20), date(2024, 3, 5)).unwrap();
        assert_eq!(
            slices,
            vec![
                (date(2024, 1, 20), date(2024, 1, 31)),
                (date(2024, 2, 1), date(2024, 2, 29)),
                (date(2024, 3, 1), date(2024, 3, 5)),
            ]
        );
        assert_eq!(
            month_slices(date(2024, 1, 5), date(2024, 1, 5)).unwrap(),
            vec![(date(2024, 1, 5), date(2024, 1, 5))]
        );
        assert!(month_slices(date(2024, 2, 1), date(2024, 1, 1)).unwrap().is_empty());
    }

    #[test]
    fn test_date_chunks_single() {
        let chunks = date_chunks(date(2020, 1, 1), date(2022, 3, 31), 10).unwrap();
        assert_eq!(chunks, vec![(date(2020, 1, 1), date(2022, 3, 31))]);
    }

    #[test]
    fn test_date_chunks_multiple() {
        let chunks = date_chunks(date(2000, 1, 1), date(2022, 3, 31), 10).unwrap();
        assert_eq!(
            chunks,
            vec![
                (date(2000, 1, 1), date(2009, 12, 31)),
                (date(2010, 1, 1), date(2019, 12, 31)),
                (date(2020, 1, 1), date(2022, 3, 31)),
            ]
        );
    }

    #[test]
    fn test_date_chunks_invalid() {
        assert!(date_chunks(date(2022, 1, 1), date(2021, 1, 1), 10)
            .unwrap()
            .is_empty());
        assert!(date_chunks(date(2021, 1, 1), date(2022, 1, 1), 0).is_err());
    }
}

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    error::RateWindowError,
    util::{
        date_utils::{add_days, days_between},
        format_utils::format_percent,
    },
};

/// An inclusive investment period `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Window {
    start: NaiveDate,
    end: NaiveDate,
}

impl Window {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, RateWindowError> {
        if start > end {
            return Err(RateWindowError::InvalidWindow { start, end });
        }
        Ok(Self { start, end })
    }

    /**
    The window covering exactly `days` calendar days starting at `start`.

    ## Arguments
    * `start` - First day of the window.
    * `days` - Length in calendar days; must be at least 1.

    ## Returns
    The window `[start, start + days - 1]`, or `InvalidWindowLength` for zero days.
     */
    pub fn starting_at(start: NaiveDate, days: u32) -> Result<Self, RateWindowError> {
        if days == 0 {
            return Err(RateWindowError::InvalidWindowLength(days));
        }
        let end = add_days(start, i64::from(days) - 1)?;
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Calendar days covered, both ends included.
    pub fn calendar_days(&self) -> i64 {
        days_between(self.start, self.end) + 1
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

/// Outcome of compounding the capital over one window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfitResult {
    pub window: Window,
    pub capital: f64,
    /// Fractional rate applied per period.
    pub effective_rate: f64,
    pub periods: usize,
    pub future_value: f64,
    pub profit: f64,
}

impl fmt::Display for ProfitResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | Rate: {} x {} periods | Future Value: {:.2} | Profit: {:.2}",
            self.window,
            format_percent(self.effective_rate),
            self.periods,
            self.future_value,
            self.profit
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_new_valid() {
        let window = Window::new(date(2024, 1, 1), date(2024, 1, 1)).unwrap();
        assert_eq!(window.calendar_days(), 1);
        assert_eq!(window.start(), window.end());
    }

    #[test]
    fn test_new_inverted() {
        let result = Window::new(date(2024, 1, 2), date(2024, 1, 1));
        assert!(matches!(result, Err(RateWindowError::InvalidWindow { .. })));
    }

    #[test]
    fn test_starting_at() {
        let window = Window::starting_at(date(2024, 2, 27), 3).unwrap();
        assert_eq!(window.end(), date(2024, 2, 29));
        assert_eq!(window.calendar_days(), 3);
        assert!(matches!(
            Window::starting_at(date(2024, 2, 27), 0),
            Err(RateWindowError::InvalidWindowLength(0))
        ));
    }

    #[test]
    fn test_display() {
        let window = Window::new(date(2000, 1, 1), date(2001, 5, 14)).unwrap();
        assert_eq!(window.to_string(), "2000-01-01 to 2001-05-14");
    }
}

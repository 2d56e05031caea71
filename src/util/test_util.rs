use std::path::Path;

use chrono::NaiveDate;
use tracing::{info, subscriber::set_default};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt;

use crate::data::{observation::RateObservation, store::TimeSeriesStore};

use super::date_utils::add_days;

pub struct TracingGuards {
    _subscriber_guard: tracing::subscriber::DefaultGuard,
    _worker_guard: WorkerGuard,
}

pub fn setup_test_tracing(test_name: &str) -> TracingGuards {
    let log_dir = Path::new("tests/logs");
    if !log_dir.exists() {
        std::fs::create_dir_all(log_dir).unwrap();
    }

    let log_file = format!("tests/logs/{}.log", test_name);
    let file_appender = tracing_appender::rolling::never("", &log_file);
    let (non_blocking, worker_guard) = tracing_appender::non_blocking(file_appender);

    let subscriber = fmt::Subscriber::builder()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_level(true)
        .with_target(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_max_level(tracing::Level::DEBUG)
        .finish();

    // Set as default subscriber for this thread
    let subscriber_guard = set_default(subscriber);

    let guards = TracingGuards {
        _subscriber_guard: subscriber_guard,
        _worker_guard: worker_guard,
    };
    info!("-----------------");
    info!("Test: {}", test_name);
    info!("-----------------");
    guards
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// One observation per day starting at `start`, taking rates in order.
pub fn daily_store(start: NaiveDate, rates: &[f64]) -> TimeSeriesStore {
    let observations = rates
        .iter()
        .enumerate()
        .map(|(i, &rate)| RateObservation::new(add_days(start, i as i64).unwrap(), rate))
        .collect();
    TimeSeriesStore::from_observations(observations).unwrap()
}

/// `days` consecutive daily observations all at `rate`.
pub fn constant_store(start: NaiveDate, days: usize, rate: f64) -> TimeSeriesStore {
    daily_store(start, &vec![rate; days])
}

use std::{
    fs::File,
    io::{BufReader, Write as _},
    path::{Path, PathBuf},
};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_yaml::from_reader;
use tracing::{debug, info, instrument};

use crate::{
    analysis::{
        growth::validate_capital,
        scanner::{WindowScanner, WindowScannerBuilder},
    },
    data::{
        observation::ISO_DATE_FORMAT,
        source::{load_store, SyntheticSeries},
        store::TimeSeriesStore,
    },
    error::RateWindowError,
};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RateWindowConfig {
    pub capital: f64,
    #[serde(rename = "window-days")]
    pub window_days: u32,
    #[serde(rename = "start-date")]
    pub start_date: String,
    #[serde(rename = "end-date")]
    pub end_date: String,
    #[serde(rename = "data-file")]
    pub data_file: String,
    #[serde(rename = "series-code", default = "default_series_code")]
    pub series_code: u32,
    #[serde(default)]
    pub parallel: bool,
    #[serde(rename = "currency-symbol", default = "default_currency_symbol")]
    pub currency_symbol: String,
    pub synthetic: Option<SyntheticSeries>,
}

fn default_series_code() -> u32 {
    11
}

fn default_currency_symbol() -> String {
    "R$".to_string()
}

const DEFAULT_DATA: &str = r#"
capital: 1500.0
window-days: 500
start-date: "2000-01-01"
end-date: "2022-03-31"
data-file: "data/selic_data.json"
series-code: 11
parallel: true
currency-symbol: "R$"
synthetic:
  seed: 0
  low: 3.0
  high: 15.0
"#;

impl Default for RateWindowConfig {
    fn default() -> Self {
        Self {
            capital: 1500.0,
            window_days: 500,
            start_date: "2000-01-01".to_string(),
            end_date: "2022-03-31".to_string(),
            data_file: "data/selic_data.json".to_string(),
            series_code: default_series_code(),
            parallel: true,
            currency_symbol: default_currency_symbol(),
            synthetic: Some(SyntheticSeries::default()),
        }
    }
}

impl RateWindowConfig {
    /// Reads the configuration from a YAML file.
    ///
    /// If the file does not exist, it creates a default configuration file.
    ///
    /// # Arguments
    ///
    /// * `filename` - Optional path to the configuration file.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `RateWindowConfig` on success or an `Error` on failure.
    #[instrument(level = "info", skip(filename))]
    pub fn read_config<P: AsRef<Path>>(filename: Option<P>) -> Result<Self, RateWindowError> {
        let path = filename
            .map(|p| p.as_ref().to_path_buf())
            .unwrap_or_else(|| Path::new("config.yml").to_path_buf());

        info!(path = %path.display(), "Reading configuration");

        if !path.exists() {
            info!(
                "Config file does not exist. Creating default config at {}",
                path.display()
            );
            let mut file = File::create(&path)?;
            file.write_all(DEFAULT_DATA.as_bytes())?;
            debug!("Default configuration file created");
            return Ok(RateWindowConfig::default());
        }

        let file = File::open(&path)?;
        let reader = BufReader::new(file);
        let config: Self = from_reader(reader)?;
        config.validate()?;
        info!("Configuration loaded successfully");
        Ok(config)
    }

    /// Checks values that deserialize fine but cannot be analysed.
    pub fn validate(&self) -> Result<(), RateWindowError> {
        validate_capital(self.capital)?;
        if self.window_days == 0 {
            return Err(RateWindowError::InvalidWindowLength(self.window_days));
        }
        if let Some(synthetic) = &self.synthetic {
            synthetic.validate()?;
        }
        Ok(())
    }

    /// Parses `start-date` (`YYYY-MM-DD`).
    pub fn start_date(&self) -> Result<NaiveDate, RateWindowError> {
        Ok(NaiveDate::parse_from_str(&self.start_date, ISO_DATE_FORMAT)?)
    }

    /// Parses `end-date` (`YYYY-MM-DD`).
    pub fn end_date(&self) -> Result<NaiveDate, RateWindowError> {
        Ok(NaiveDate::parse_from_str(&self.end_date, ISO_DATE_FORMAT)?)
    }

    pub fn data_path(&self) -> PathBuf {
        PathBuf::from(&self.data_file)
    }

    pub fn scanner(&self) -> Result<WindowScanner, RateWindowError> {
        WindowScannerBuilder::default()
            .capital(self.capital)
            .window_days(self.window_days)
            .parallel(self.parallel)
            .build()
    }

    /// The configured series: generated when `synthetic` is set, otherwise read from `data-file`.
    #[instrument(level = "debug", skip(self))]
    pub fn load_store(&self) -> Result<TimeSeriesStore, RateWindowError> {
        match &self.synthetic {
            Some(synthetic) => {
                info!("Generating synthetic series with seed {}", synthetic.seed);
                synthetic.generate(self.start_date()?, self.end_date()?)
            }
            None => load_store(&self.data_path()),
        }
    }
}

use chrono::NaiveDate;

#[derive(Debug, thiserror::Error)]
pub enum RateWindowError {
    #[error("Invalid frequency '{value}'. Use 'day', 'month' or 'year'.")]
    InvalidFrequency { value: String },
    #[error("No rate observations between {start} and {end}.")]
    EmptyRange { start: NaiveDate, end: NaiveDate },
    #[error("The rate series has no observations.")]
    EmptySeries,
    #[error("Scan range of {range_days} days is shorter than the {window_days} day window.")]
    InsufficientRange { range_days: i64, window_days: u32 },
    #[error("Window start {start} is after its end {end}.")]
    InvalidWindow { start: NaiveDate, end: NaiveDate },
    #[error("Window length must be at least one day, got {0}.")]
    InvalidWindowLength(u32),
    #[error("Capital must be a finite, non-negative amount, got {0}.")]
    InvalidCapital(f64),
    #[error("Duplicate rate observation for {0}.")]
    DuplicateDate(NaiveDate),
    #[error("Failed to parse rate '{value}' on {date}.")]
    ParseRateError { date: String, value: String },
    #[error("Failed to parse date: {0}")]
    ParseDateError(#[from] chrono::ParseError),
    #[error("Failed to convert date: {0}")]
    DateConversionError(String),
    #[error("Configuration Error: {0}")]
    ConfigError(String),
    #[error("Logging Error: {0}")]
    LoggingError(String),
    #[error("Builder Error: {0}")]
    BuilderError(String),
    #[error("IO Error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Serde YAML Error: {0}")]
    SerdeYamlError(#[from] serde_yaml::Error),
    #[error("Serde JSON Error: {0}")]
    SerdeJsonError(#[from] serde_json::Error),
    #[error("CSV Error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("Fetch Error: {0}")]
    FetchError(#[from] reqwest::Error),
}

impl From<derive_builder::UninitializedFieldError> for RateWindowError {
    fn from(e: derive_builder::UninitializedFieldError) -> Self {
        RateWindowError::BuilderError(e.to_string())
    }
}

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScrapeError>;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Invalid {field} '{value}': expected a YYYY-MM-DD date")]
    InvalidDate { field: &'static str, value: String },

    #[error("Start date {start} is after end date {end}")]
    InvalidDateRange { start: String, end: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Status { status: u16, message: String },

    #[error("Giving up after {attempts} attempts: {last}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        last: Box<ScrapeError>,
    },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("API returned an error document: {0}")]
    Upstream(String),

    #[error("File output error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV output error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Interrupted before the output was written")]
    Interrupted,
}

impl ScrapeError {
    /// Transport failures and non-success statuses are worth another attempt;
    /// everything else is fatal on first sight.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ScrapeError::Network(_) | ScrapeError::Status { .. })
    }
}

impl From<reqwest::Error> for ScrapeError {
    fn from(err: reqwest::Error) -> Self {
        ScrapeError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for ScrapeError {
    fn from(err: serde_json::Error) -> Self {
        ScrapeError::Parse(err.to_string())
    }
}

impl From<quick_xml::Error> for ScrapeError {
    fn from(err: quick_xml::Error) -> Self {
        ScrapeError::Parse(err.to_string())
    }
}

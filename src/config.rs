use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://kokkai.ndl.go.jp/api/speech";

/// The API refuses `maximumRecords` above this.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Which body format to request and how to decode it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ResponseFormat {
    Json,
    Xml,
    /// Request JSON, but decode whatever actually comes back.
    Auto,
}

/// Inclusive `from` / `until` dates, already validated as `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRange {
    pub from: String,
    pub until: String,
}

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub base_url: String,
    pub page_size: u32,
    pub max_retries: u32,
    pub retry_delay: Duration,
    pub page_delay: Duration,
    pub timeout: Duration,
    pub format: ResponseFormat,
}

impl Default for FetchConfig {
    fn default() -> Self {
        FetchConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            page_size: MAX_PAGE_SIZE,
            max_retries: 3,
            retry_delay: Duration::from_secs(2),
            page_delay: Duration::from_millis(500),
            timeout: Duration::from_secs(30),
            format: ResponseFormat::Json,
        }
    }
}

use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDate;
use clap::Parser;

use crate::config::{DateRange, FetchConfig, ResponseFormat, DEFAULT_BASE_URL, MAX_PAGE_SIZE};
use crate::error::{Result, ScrapeError};

#[derive(Debug, Parser)]
#[command(
    name = "speech_scraper",
    about = "Fetch Diet speech records matching keywords and export them as CSV"
)]
pub struct Cli {
    /// Search keywords; each is searched separately and results are merged
    #[arg(long, num_args = 1.., required = true)]
    pub keywords: Vec<String>,

    /// First meeting date to include (YYYY-MM-DD)
    #[arg(long, default_value = "2023-01-01")]
    pub start_date: String,

    /// Last meeting date to include (YYYY-MM-DD)
    #[arg(long, default_value = "2023-12-31")]
    pub end_date: String,

    /// Output CSV path
    #[arg(long, default_value = "output.csv")]
    pub output: PathBuf,

    /// Attempts per page request before giving up
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_retries: u32,

    /// Seconds to wait between attempts
    #[arg(long, default_value_t = 2)]
    pub retry_delay_secs: u64,

    /// Milliseconds to wait between pages of a large result set
    #[arg(long, default_value_t = 500)]
    pub page_delay_ms: u64,

    /// Records requested per page
    #[arg(long, default_value_t = MAX_PAGE_SIZE, value_parser = clap::value_parser!(u32).range(1..=MAX_PAGE_SIZE as i64))]
    pub page_size: u32,

    /// Per-request HTTP timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Response packing to request and decode
    #[arg(long, value_enum, default_value_t = ResponseFormat::Json)]
    pub format: ResponseFormat,

    /// Speech search endpoint
    #[arg(long, env = "SPEECH_API_URL", default_value = DEFAULT_BASE_URL, value_parser = parse_base_url)]
    pub base_url: String,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Validates both dates and their order. Runs before any request is made.
    pub fn date_range(&self) -> Result<DateRange> {
        let start = validate_date("start date", &self.start_date)?;
        let end = validate_date("end date", &self.end_date)?;
        if start > end {
            return Err(ScrapeError::InvalidDateRange {
                start: self.start_date.clone(),
                end: self.end_date.clone(),
            });
        }
        Ok(DateRange {
            from: self.start_date.clone(),
            until: self.end_date.clone(),
        })
    }

    pub fn fetch_config(&self) -> FetchConfig {
        FetchConfig {
            base_url: self.base_url.clone(),
            page_size: self.page_size,
            max_retries: self.max_retries,
            retry_delay: Duration::from_secs(self.retry_delay_secs),
            page_delay: Duration::from_millis(self.page_delay_ms),
            timeout: Duration::from_secs(self.timeout_secs),
            format: self.format,
        }
    }
}

/// Accepts only zero-padded `YYYY-MM-DD` strings naming a real calendar day.
pub fn validate_date(field: &'static str, value: &str) -> Result<NaiveDate> {
    let bytes = value.as_bytes();
    let shaped = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());

    let invalid = || ScrapeError::InvalidDate {
        field,
        value: value.to_string(),
    };

    if !shaped {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| invalid())
}

fn parse_base_url(raw: &str) -> std::result::Result<String, String> {
    let url = url::Url::parse(raw).map_err(|e| format!("invalid URL '{}': {}", raw, e))?;
    match url.scheme() {
        "http" | "https" => Ok(url.to_string()),
        other => Err(format!("unsupported scheme '{}'", other)),
    }
}

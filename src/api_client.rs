use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE, USER_AGENT};
use log::debug;

use crate::config::{DateRange, FetchConfig, ResponseFormat};
use crate::delay_manager;
use crate::error::{Result, ScrapeError};
use crate::response::{self, SpeechPage};

/// Longest slice of an error body kept in a status error.
const ERROR_BODY_LIMIT: usize = 200;

/// Anything that can hand back one page of search results. The paging loop
/// only talks to this, so it runs the same against the live API or a script.
pub trait PageSource {
    fn fetch_page(&self, keyword: &str, range: &DateRange, start_record: u64) -> Result<SpeechPage>;
}

pub struct SpeechApi {
    client: Client,
    config: FetchConfig,
}

impl SpeechApi {
    pub fn new(config: FetchConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(concat!("speech_scraper/", env!("CARGO_PKG_VERSION"))));
        let accept = match config.format {
            ResponseFormat::Xml => "application/xml",
            ResponseFormat::Json | ResponseFormat::Auto => "application/json, application/xml;q=0.9",
        };
        headers.insert(ACCEPT, HeaderValue::from_static(accept));

        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        Ok(SpeechApi { client, config })
    }

    pub fn query_params(&self, keyword: &str, range: &DateRange, start_record: u64) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("any", keyword.to_string()),
            ("from", range.from.clone()),
            ("until", range.until.clone()),
            ("startRecord", start_record.to_string()),
            ("maximumRecords", self.config.page_size.to_string()),
        ];
        // XML is the endpoint's default packing
        if self.config.format != ResponseFormat::Xml {
            params.push(("recordPacking", "json".to_string()));
        }
        params
    }

    /// One GET, no retries. Non-success statuses become [`ScrapeError::Status`].
    fn get_once(&self, params: &[(&'static str, String)]) -> Result<(Option<String>, String)> {
        let resp = self.client.get(&self.config.base_url).query(params).send()?;

        let status = resp.status();
        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(ScrapeError::Status {
                status: status.as_u16(),
                message: body.chars().take(ERROR_BODY_LIMIT).collect(),
            });
        }

        let body = resp.text()?;
        Ok((content_type, body))
    }
}

impl PageSource for SpeechApi {
    fn fetch_page(&self, keyword: &str, range: &DateRange, start_record: u64) -> Result<SpeechPage> {
        let params = self.query_params(keyword, range, start_record);

        let (content_type, body) = delay_manager::retry(
            self.config.max_retries,
            self.config.retry_delay,
            |attempt| {
                debug!("GET {} keyword='{}' startRecord={} (attempt {})", self.config.base_url, keyword, start_record, attempt);
                self.get_once(&params)
            },
        )?;

        response::parse_page(self.config.format, content_type.as_deref(), &body)
    }
}

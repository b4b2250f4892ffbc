use std::time::Duration;
use log::{debug, info};

use crate::api_client::PageSource;
use crate::config::{DateRange, FetchConfig};
use crate::delay_manager;
use crate::error::Result;
use crate::record::SpeechRecord;

/// Why the paging loop for a keyword ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    NoMatches,
    EmptyPage,
    NoNextPosition,
    /// The next position points backwards or past the total. Treated as the
    /// end of data rather than an error.
    InvalidNextPosition(u64),
}

#[derive(Debug, Default)]
pub struct KeywordResult {
    pub records: Vec<SpeechRecord>,
    pub total_reported: u64,
    pub pages: usize,
    pub stop: Option<StopReason>,
}

pub struct Paginator<'a, S: PageSource + ?Sized> {
    source: &'a S,
    page_size: u32,
    page_delay: Duration,
}

impl<'a, S: PageSource + ?Sized> Paginator<'a, S> {
    pub fn new(source: &'a S, config: &FetchConfig) -> Self {
        Paginator {
            source,
            page_size: config.page_size,
            page_delay: config.page_delay,
        }
    }

    /// Pulls every page for `keyword`, starting at record 1.
    pub fn fetch_all(&self, keyword: &str, range: &DateRange) -> Result<KeywordResult> {
        let mut result = KeywordResult::default();
        let mut start_record: u64 = 1;

        let stop = loop {
            let page = self.source.fetch_page(keyword, range, start_record)?;
            result.pages += 1;

            let total = page.number_of_records;
            result.total_reported = total;
            if total == 0 {
                info!("No speeches matched keyword '{}'.", keyword);
                break StopReason::NoMatches;
            }
            if page.records.is_empty() {
                break StopReason::EmptyPage;
            }

            result.records.extend(page.records.iter().map(SpeechRecord::from_raw));

            let multi_page = total > u64::from(self.page_size);
            if multi_page {
                let fetched = result.records.len();
                info!("  {}/{} fetched... ({:.1}%)", fetched, total, fetched as f64 / total as f64 * 100.0);
            }

            let Some(next) = page.next_record_position else {
                break StopReason::NoNextPosition;
            };
            if next > total || next <= start_record {
                break StopReason::InvalidNextPosition(next);
            }

            if multi_page {
                delay_manager::page_delay(self.page_delay);
            }
            start_record = next;
        };

        debug!("Keyword '{}' finished after {} page(s): {:?}", keyword, result.pages, stop);
        result.stop = Some(stop);
        Ok(result)
    }
}

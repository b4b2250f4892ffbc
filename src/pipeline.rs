use std::path::{Path, PathBuf};
use log::info;

use crate::api_client::PageSource;
use crate::collector::RecordCollector;
use crate::config::{DateRange, FetchConfig};
use crate::error::Result;
use crate::exporter;
use crate::interrupt::InterruptFlag;
use crate::paginator::Paginator;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Keyword and the number of records it returned before deduplication.
    pub per_keyword: Vec<(String, usize)>,
    pub duplicates_skipped: usize,
    pub written: usize,
    /// `None` when nothing matched and no file was written.
    pub output: Option<PathBuf>,
}

/// Fetches every keyword in order and merges the results, dropping ids already
/// seen under any earlier keyword.
pub fn collect<S: PageSource + ?Sized>(
    source: &S,
    keywords: &[String],
    range: &DateRange,
    config: &FetchConfig,
) -> Result<(RecordCollector, Vec<(String, usize)>)> {
    let paginator = Paginator::new(source, config);
    let mut collector = RecordCollector::new();
    let mut per_keyword = Vec::with_capacity(keywords.len());

    for keyword in keywords {
        info!("Searching for keyword '{}' ({} to {})...", keyword, range.from, range.until);
        let result = paginator.fetch_all(keyword, range)?;
        let fetched = result.records.len();
        let added = collector.extend(result.records);
        info!("Keyword '{}': {} fetched, {} new.", keyword, fetched, added);
        per_keyword.push((keyword.clone(), fetched));
    }

    Ok((collector, per_keyword))
}

/// Full run: collect, then write the CSV once at the end. Nothing is written
/// when no records were found.
pub fn run<S: PageSource + ?Sized>(
    source: &S,
    keywords: &[String],
    range: &DateRange,
    config: &FetchConfig,
    output: &Path,
    interrupt: &InterruptFlag,
) -> Result<RunSummary> {
    let (collector, per_keyword) = collect(source, keywords, range, config)?;
    let duplicates_skipped = collector.duplicates_skipped();

    if collector.is_empty() {
        info!("No records were retrieved; {} not written.", output.display());
        return Ok(RunSummary {
            per_keyword,
            duplicates_skipped,
            written: 0,
            output: None,
        });
    }

    let written = exporter::export_csv(output, collector.records(), interrupt)?;
    Ok(RunSummary {
        per_keyword,
        duplicates_skipped,
        written,
        output: Some(output.to_path_buf()),
    })
}

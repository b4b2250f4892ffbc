use std::collections::HashSet;
use log::debug;

use crate::record::SpeechRecord;

/// Ordered accumulator for records across all keywords. Ids seen under any
/// earlier keyword suppress later copies; id-less records always go in.
#[derive(Debug, Default)]
pub struct RecordCollector {
    records: Vec<SpeechRecord>,
    seen_ids: HashSet<String>,
    duplicates: usize,
}

impl RecordCollector {
    pub fn new() -> Self {
        RecordCollector::default()
    }

    /// Returns whether the record was kept.
    pub fn push(&mut self, record: SpeechRecord) -> bool {
        if let Some(id) = &record.speech_id {
            if !self.seen_ids.insert(id.clone()) {
                debug!("Skipping duplicate speech {}", id);
                self.duplicates += 1;
                return false;
            }
        }
        self.records.push(record);
        true
    }

    /// Appends in order and returns how many were kept.
    pub fn extend<I: IntoIterator<Item = SpeechRecord>>(&mut self, records: I) -> usize {
        let mut kept = 0;
        for record in records {
            if self.push(record) {
                kept += 1;
            }
        }
        kept
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn duplicates_skipped(&self) -> usize {
        self.duplicates
    }

    pub fn records(&self) -> &[SpeechRecord] {
        &self.records
    }
}

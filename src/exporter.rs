//! CSV projection of merged speech records.
//!
//! Rows are written to a temporary file beside the destination and moved
//! into place only once every row has been flushed, so a failed export never
//! leaves a truncated CSV behind.

use std::io::Write;
use std::path::{Path, PathBuf};

use log::info;
use serde::Serialize;
use tempfile::NamedTempFile;

use crate::error::{Result, ScrapeError};
use crate::interrupt::InterruptFlag;
use crate::record::SpeechRecord;

pub const HEADERS: [&str; 14] = [
    "comment-id",
    "meeting-id",
    "session",
    "name_of_house",
    "name_of_meeting",
    "issue",
    "date",
    "speech_order",
    "speaker",
    "speaker_group",
    "speaker_position",
    "speaker_role",
    "comment-body",
    "speech_url",
];

/// Field order here must match [`HEADERS`].
#[derive(Debug, Serialize)]
pub struct CsvRow<'a> {
    pub comment_id: usize,
    pub meeting_id: &'a str,
    pub session: &'a str,
    pub name_of_house: &'a str,
    pub name_of_meeting: &'a str,
    pub issue: &'a str,
    pub date: &'a str,
    pub speech_order: &'a str,
    pub speaker: &'a str,
    pub speaker_group: &'a str,
    pub speaker_position: &'a str,
    pub speaker_role: &'a str,
    pub comment_body: &'a str,
    pub speech_url: &'a str,
}

impl<'a> CsvRow<'a> {
    pub fn new(comment_id: usize, record: &'a SpeechRecord) -> Self {
        let meeting = &record.meeting;
        CsvRow {
            comment_id,
            meeting_id: &meeting.issue_id,
            session: &meeting.session,
            name_of_house: &meeting.name_of_house,
            name_of_meeting: &meeting.name_of_meeting,
            issue: &meeting.issue,
            date: &meeting.date,
            speech_order: &record.speech_order,
            speaker: &record.speaker,
            speaker_group: &record.speaker_group,
            speaker_position: &record.speaker_position,
            speaker_role: &record.speaker_role,
            comment_body: &record.speech,
            speech_url: &record.speech_url,
        }
    }
}

/// Writes the header and one row per record, numbering `comment-id` from 1
/// in the given order. Returns the number of data rows.
pub fn write_records<W: Write>(writer: W, records: &[SpeechRecord]) -> Result<usize> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    csv_writer.write_record(HEADERS)?;
    for (i, record) in records.iter().enumerate() {
        csv_writer.serialize(CsvRow::new(i + 1, record))?;
    }
    csv_writer.flush()?;
    Ok(records.len())
}

/// Mode for a freshly created CSV. The temp file starts out owner-only, so
/// an existing target's mode is carried over and a new one gets 0644.
#[cfg(unix)]
fn output_permissions(path: &Path) -> std::fs::Permissions {
    use std::os::unix::fs::PermissionsExt;

    match std::fs::metadata(path) {
        Ok(meta) => meta.permissions(),
        Err(_) => std::fs::Permissions::from_mode(0o644),
    }
}

pub fn export_csv(path: &Path, records: &[SpeechRecord], interrupt: &InterruptFlag) -> Result<usize> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    info!("Writing {} records to {}...", records.len(), path.display());

    let _writing = interrupt.writing();
    let mut temp = NamedTempFile::new_in(&dir)?;
    let written = write_records(temp.as_file_mut(), records)?;
    temp.as_file().sync_all()?;
    #[cfg(unix)]
    temp.as_file().set_permissions(output_permissions(path))?;

    // dropping `temp` removes it
    if interrupt.is_requested() {
        return Err(ScrapeError::Interrupted);
    }
    temp.persist(path).map_err(|e| ScrapeError::Io(e.error))?;

    info!("CSV export complete: {} records written to {}.", written, path.display());
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::MeetingInfo;

    fn sample() -> SpeechRecord {
        SpeechRecord {
            speech_id: Some("S1".into()),
            speech_order: "3".into(),
            speaker: "鈴木一郎".into(),
            speaker_group: "無所属".into(),
            speaker_position: "".into(),
            speaker_role: "証人".into(),
            speech: "一行目\n二行目, \"引用\"".into(),
            speech_url: "https://kokkai.ndl.go.jp/txt/M1/3".into(),
            meeting: MeetingInfo {
                issue_id: "M1".into(),
                session: "211".into(),
                name_of_house: "衆議院".into(),
                name_of_meeting: "本会議".into(),
                issue: "第1号".into(),
                date: "2023-01-23".into(),
            },
        }
    }

    #[test]
    fn header_and_rows_follow_fixed_columns() {
        let mut buf = Vec::new();
        let written = write_records(&mut buf, &[sample(), SpeechRecord::default()]).unwrap();
        assert_eq!(written, 2);

        let mut reader = csv::Reader::from_reader(buf.as_slice());
        let headers: Vec<String> = reader.headers().unwrap().iter().map(str::to_string).collect();
        assert_eq!(headers, HEADERS);

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][0], "1");
        assert_eq!(&rows[0][1], "M1");
        assert_eq!(&rows[0][7], "3");
        assert_eq!(&rows[0][12], "一行目\n二行目, \"引用\"");
        assert_eq!(&rows[1][0], "2");
        assert!(rows[1].iter().skip(1).all(|field| field.is_empty()));
    }

    #[test]
    fn export_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("speeches.csv");
        std::fs::write(&path, "stale").unwrap();

        assert_eq!(export_csv(&path, &[sample()], &InterruptFlag::default()).unwrap(), 1);

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("comment-id,meeting-id,session,"));
        assert!(!content.contains("stale"));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn export_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.csv");
        assert!(matches!(
            export_csv(&path, &[sample()], &InterruptFlag::default()),
            Err(ScrapeError::Io(_))
        ));
        assert!(!path.exists());
    }

    #[test]
    fn interrupt_during_export_discards_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("speeches.csv");
        let interrupt = InterruptFlag::default();
        interrupt.request();

        assert!(matches!(export_csv(&path, &[sample()], &interrupt), Err(ScrapeError::Interrupted)));
        assert!(!path.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn new_output_is_world_readable() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("speeches.csv");
        export_csv(&path, &[sample()], &InterruptFlag::default()).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o644);
    }

    #[cfg(unix)]
    #[test]
    fn existing_output_keeps_its_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("speeches.csv");
        std::fs::write(&path, "old").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o640)).unwrap();

        export_csv(&path, &[sample()], &InterruptFlag::default()).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o640);
        assert!(std::fs::read_to_string(&path).unwrap().starts_with("comment-id,"));
    }
}

use crate::response::RawSpeech;

/// Meeting-level fields. The API repeats them on every speech entry rather
/// than nesting them, so they are lifted out here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MeetingInfo {
    pub issue_id: String,
    pub session: String,
    pub name_of_house: String,
    pub name_of_meeting: String,
    pub issue: String,
    pub date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpeechRecord {
    /// `None` when upstream omitted the id or sent it empty; such records are
    /// never deduplicated.
    pub speech_id: Option<String>,
    pub speech_order: String,
    pub speaker: String,
    pub speaker_group: String,
    pub speaker_position: String,
    pub speaker_role: String,
    pub speech: String,
    pub speech_url: String,
    pub meeting: MeetingInfo,
}

impl MeetingInfo {
    pub fn from_raw(raw: &RawSpeech) -> Self {
        let field = |name: &str| raw.get(name).unwrap_or_default().to_string();
        MeetingInfo {
            issue_id: field("issueID"),
            session: field("session"),
            name_of_house: field("nameOfHouse"),
            name_of_meeting: field("nameOfMeeting"),
            issue: field("issue"),
            date: field("date"),
        }
    }
}

impl SpeechRecord {
    pub fn from_raw(raw: &RawSpeech) -> Self {
        let field = |name: &str| raw.get(name).unwrap_or_default().to_string();
        SpeechRecord {
            speech_id: raw
                .get("speechID")
                .filter(|id| !id.is_empty())
                .map(str::to_string),
            speech_order: field("speechOrder"),
            speaker: field("speaker"),
            speaker_group: field("speakerGroup"),
            speaker_position: field("speakerPosition"),
            speaker_role: field("speakerRole"),
            speech: field("speech"),
            speech_url: field("speechURL"),
            meeting: MeetingInfo::from_raw(raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meeting_fields_are_lifted_from_the_entry() {
        let raw: RawSpeech = [
            ("speechID", "S1"),
            ("issueID", "M1"),
            ("session", "211"),
            ("nameOfHouse", "参議院"),
            ("nameOfMeeting", "予算委員会"),
            ("issue", "第3号"),
            ("date", "2023-03-01"),
            ("speechOrder", "4"),
            ("speaker", "山田太郎"),
            ("speechURL", "https://kokkai.ndl.go.jp/txt/M1/4"),
        ]
        .into_iter()
        .collect();

        let record = SpeechRecord::from_raw(&raw);
        assert_eq!(record.speech_id.as_deref(), Some("S1"));
        assert_eq!(record.speech_order, "4");
        assert_eq!(record.speaker, "山田太郎");
        assert_eq!(record.speech_url, "https://kokkai.ndl.go.jp/txt/M1/4");
        assert_eq!(
            record.meeting,
            MeetingInfo {
                issue_id: "M1".into(),
                session: "211".into(),
                name_of_house: "参議院".into(),
                name_of_meeting: "予算委員会".into(),
                issue: "第3号".into(),
                date: "2023-03-01".into(),
            }
        );
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let record = SpeechRecord::from_raw(&RawSpeech::default());
        assert_eq!(record.speech_id, None);
        assert_eq!(record.speaker_group, "");
        assert_eq!(record.meeting, MeetingInfo::default());
    }

    #[test]
    fn empty_id_counts_as_absent() {
        let raw: RawSpeech = [("speechID", "")].into_iter().collect();
        assert_eq!(SpeechRecord::from_raw(&raw).speech_id, None);
    }
}

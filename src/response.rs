//! Decoding of one search-result page.
//!
//! The endpoint packs the same logical page either as JSON or as an XML
//! document. Both decoders produce a [`SpeechPage`] whose entries are plain
//! field maps, so everything downstream is format-agnostic.

use std::collections::BTreeMap;

use quick_xml::events::Event;
use quick_xml::Reader;
use serde_json::{Map, Value};

use crate::config::ResponseFormat;
use crate::error::{Result, ScrapeError};

/// One `speechRecord` entry as delivered: field name to scalar text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawSpeech {
    fields: BTreeMap<String, String>,
}

impl RawSpeech {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawSpeech {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        RawSpeech {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpeechPage {
    /// Total hits for the query, not just this page.
    pub number_of_records: u64,
    pub next_record_position: Option<u64>,
    pub records: Vec<RawSpeech>,
}

pub trait PageParser {
    fn parse(&self, body: &str) -> Result<SpeechPage>;
}

pub struct JsonParser;

pub struct XmlParser;

/// Resolves `Auto` into a concrete format. A `Content-Type` naming json or
/// xml wins; otherwise a body starting with `<` is XML.
pub fn detect_format(content_type: Option<&str>, body: &str) -> ResponseFormat {
    if let Some(ct) = content_type.map(str::to_ascii_lowercase) {
        if ct.contains("json") {
            return ResponseFormat::Json;
        }
        if ct.contains("xml") {
            return ResponseFormat::Xml;
        }
    }
    if body.trim_start_matches('\u{feff}').trim_start().starts_with('<') {
        ResponseFormat::Xml
    } else {
        ResponseFormat::Json
    }
}

pub fn parse_page(format: ResponseFormat, content_type: Option<&str>, body: &str) -> Result<SpeechPage> {
    let format = match format {
        ResponseFormat::Auto => detect_format(content_type, body),
        concrete => concrete,
    };
    match format {
        ResponseFormat::Xml => XmlParser.parse(body),
        _ => JsonParser.parse(body),
    }
}

fn parse_count(field: &str, raw: &str) -> Result<u64> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| ScrapeError::Parse(format!("{} is not a non-negative integer: '{}'", field, raw)))
}

impl JsonParser {
    fn scalar(value: &Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    fn count(obj: &Map<String, Value>, field: &str) -> Result<Option<u64>> {
        match obj.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Number(n)) => n
                .as_u64()
                .map(Some)
                .ok_or_else(|| ScrapeError::Parse(format!("{} is not a non-negative integer: {}", field, n))),
            Some(Value::String(s)) => parse_count(field, s).map(Some),
            Some(other) => Err(ScrapeError::Parse(format!("{} has unexpected type: {}", field, other))),
        }
    }

    fn speech(value: &Value) -> Result<RawSpeech> {
        let obj = value
            .as_object()
            .ok_or_else(|| ScrapeError::Parse("speechRecord entry is not an object".to_string()))?;
        Ok(obj
            .iter()
            .filter_map(|(k, v)| Self::scalar(v).map(|s| (k.clone(), s)))
            .collect())
    }

    fn upstream_message(obj: &Map<String, Value>) -> Option<String> {
        let message = obj.get("message").and_then(Self::scalar)?;
        let details: Vec<String> = match obj.get("details") {
            Some(Value::Array(items)) => items.iter().filter_map(Self::scalar).collect(),
            Some(v) => Self::scalar(v).into_iter().collect(),
            None => Vec::new(),
        };
        if details.is_empty() {
            Some(message)
        } else {
            Some(format!("{} ({})", message, details.join("; ")))
        }
    }
}

impl PageParser for JsonParser {
    fn parse(&self, body: &str) -> Result<SpeechPage> {
        let value: Value = serde_json::from_str(body)?;
        let obj = value
            .as_object()
            .ok_or_else(|| ScrapeError::Parse("expected a JSON object at the top level".to_string()))?;

        if !obj.contains_key("numberOfRecords") {
            if let Some(message) = Self::upstream_message(obj) {
                return Err(ScrapeError::Upstream(message));
            }
        }

        let records = match obj.get("speechRecord") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items.iter().map(Self::speech).collect::<Result<_>>()?,
            // a lone hit may come back unwrapped
            Some(single @ Value::Object(_)) => vec![Self::speech(single)?],
            Some(other) => {
                return Err(ScrapeError::Parse(format!("speechRecord has unexpected type: {}", other)))
            }
        };

        Ok(SpeechPage {
            number_of_records: Self::count(obj, "numberOfRecords")?.unwrap_or(0),
            next_record_position: Self::count(obj, "nextRecordPosition")?,
            records,
        })
    }
}

impl PageParser for XmlParser {
    fn parse(&self, body: &str) -> Result<SpeechPage> {
        let mut reader = Reader::from_str(body);

        let mut path: Vec<String> = Vec::new();
        let mut text = String::new();
        let mut root: Option<String> = None;
        let mut number_of_records: Option<String> = None;
        let mut next_record_position: Option<String> = None;
        let mut error_parts: Vec<String> = Vec::new();
        // open entry and the depth of its <speechRecord> element; entries may
        // sit directly under the root or inside record wrappers
        let mut current: Option<(RawSpeech, usize)> = None;
        let mut records = Vec::new();

        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                    if path.is_empty() {
                        root = Some(name.clone());
                    } else if current.is_none() && name == "speechRecord" {
                        current = Some((RawSpeech::default(), path.len()));
                    }
                    path.push(name);
                    text.clear();
                }
                Event::Empty(e) => {
                    let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                    if path.is_empty() {
                        root = Some(name);
                    } else if current.is_none() && name == "speechRecord" {
                        records.push(RawSpeech::default());
                    }
                }
                Event::Text(t) => text.push_str(&t.unescape()?),
                Event::CData(c) => text.push_str(&String::from_utf8_lossy(&c.into_inner())),
                Event::End(_) => {
                    let name = path.pop().unwrap_or_default();
                    let depth = path.len();
                    let in_error = root.as_deref() == Some("error");

                    if let Some(record_depth) = current.as_ref().map(|(_, d)| *d) {
                        if depth == record_depth {
                            if let Some((speech, _)) = current.take() {
                                records.push(speech);
                            }
                        } else if depth == record_depth + 1 && !text.is_empty() {
                            if let Some((speech, _)) = current.as_mut() {
                                speech.insert(name, text.as_str());
                            }
                        }
                    } else if in_error {
                        // <message>, and <detail> inside <details>
                        let part = text.trim();
                        if depth >= 1 && !part.is_empty() {
                            error_parts.push(part.to_string());
                        }
                    } else if name == "numberOfRecords" && number_of_records.is_none() {
                        number_of_records = Some(text.clone());
                    } else if name == "nextRecordPosition" && next_record_position.is_none() {
                        next_record_position = Some(text.clone());
                    }
                    text.clear();
                }
                Event::Eof => break,
                _ => {}
            }
        }

        match root.as_deref() {
            None => return Err(ScrapeError::Parse("no XML root element".to_string())),
            Some("error") => {
                let message = if error_parts.is_empty() {
                    "unspecified error".to_string()
                } else {
                    error_parts.join("; ")
                };
                return Err(ScrapeError::Upstream(message));
            }
            Some(_) => {}
        }

        let number_of_records = match number_of_records {
            Some(raw) if !raw.trim().is_empty() => parse_count("numberOfRecords", &raw)?,
            _ => 0,
        };
        let next_record_position = match next_record_position {
            Some(raw) if !raw.trim().is_empty() => Some(parse_count("nextRecordPosition", &raw)?),
            _ => None,
        };

        Ok(SpeechPage {
            number_of_records,
            next_record_position,
            records,
        })
    }
}

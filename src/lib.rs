pub mod cli;
pub mod config;
pub mod error;
pub mod logger;
pub mod delay_manager;
pub mod response;
pub mod record;
pub mod api_client;
pub mod paginator;
pub mod collector;
pub mod exporter;
pub mod interrupt;
pub mod pipeline;

// Exporting types for convenience
pub use api_client::{PageSource, SpeechApi};
pub use collector::RecordCollector;
pub use config::{DateRange, FetchConfig, ResponseFormat};
pub use error::{Result, ScrapeError};
pub use interrupt::InterruptFlag;
pub use paginator::{Paginator, StopReason};
pub use pipeline::RunSummary;
pub use record::{MeetingInfo, SpeechRecord};
pub use response::{JsonParser, PageParser, RawSpeech, SpeechPage, XmlParser};

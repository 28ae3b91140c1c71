pub mod html;
pub mod log;
pub mod timestamp;

pub use self::html::{extract_vin, read_vin};
pub use self::log::{extract_log_timestamp, read_log_timestamp};
pub use self::timestamp::normalize_timestamp;

/// Values pulled out of a trace folder's log and report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedMetadata {
    /// Fragment exactly as it appeared in the log, e.g. `Jan 05 14:22:31`
    pub raw_timestamp: String,
    /// `YYYY-MM-DDTHH:MM:SS.000Z`
    pub timestamp: String,
    pub vin: String,
}

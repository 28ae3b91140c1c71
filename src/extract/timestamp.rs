use chrono::NaiveDateTime;

use crate::error::FormatError;

/// Turn a `<Mon> <DD> <HH:MM:SS>` fragment into `YYYY-MM-DDTHH:MM:SS.000Z`.
///
/// The log carries no year, so `assumed_year` is prepended. The clock
/// value is taken as-is; no timezone conversion happens.
pub fn normalize_timestamp(fragment: &str, assumed_year: i32) -> Result<String, FormatError> {
    let stamped = format!("{} {}", assumed_year, fragment.trim());
    let parsed = NaiveDateTime::parse_from_str(&stamped, "%Y %b %d %H:%M:%S").map_err(|source| {
        FormatError {
            fragment: fragment.to_string(),
            source,
        }
    })?;
    Ok(parsed.format("%Y-%m-%dT%H:%M:%S.000Z").to_string())
}

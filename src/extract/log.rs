use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

/// `<Mon> <DD> <HH:MM:SS>`, e.g. `Jan 05 14:22:31`.
fn timestamp_regex() -> &'static Regex {
    static TIMESTAMP_REGEX: OnceLock<Regex> = OnceLock::new();
    TIMESTAMP_REGEX.get_or_init(|| {
        Regex::new(r"[A-Za-z]{3} [0-9]{2} [0-9]{2}:[0-9]{2}:[0-9]{2}")
            .expect("Invalid timestamp regex")
    })
}

/// Return the first timestamp fragment in the log, scanning line by line.
///
/// Lines are decoded lossily; a read error ends the scan.
pub fn extract_log_timestamp<R: BufRead>(mut reader: R) -> Option<String> {
    let mut line = Vec::new();
    loop {
        line.clear();
        match reader.read_until(b'\n', &mut line) {
            Ok(0) => return None,
            Ok(_) => {
                let text = String::from_utf8_lossy(&line);
                if let Some(m) = timestamp_regex().find(&text) {
                    return Some(m.as_str().to_string());
                }
            }
            Err(e) => {
                tracing::warn!("Stopped reading log early: {}", e);
                return None;
            }
        }
    }
}

/// File wrapper for [`extract_log_timestamp`]; an unreadable file yields `None`.
pub fn read_log_timestamp(path: &Path) -> Option<String> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) => {
            tracing::warn!("Cannot open log {}: {}", path.display(), e);
            return None;
        }
    };
    let fragment = extract_log_timestamp(BufReader::new(file));
    tracing::debug!("Log timestamp in {}: {:?}", path.display(), fragment);
    fragment
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::extract_log_timestamp;

    #[test]
    fn returns_first_match_in_document_order() {
        let log = "\
boot sequence start
[kernel] Jan 05 14:22:31 recorder: started
[kernel] Feb 11 09:00:00 recorder: stopped
";
        assert_eq!(
            extract_log_timestamp(Cursor::new(log)).as_deref(),
            Some("Jan 05 14:22:31")
        );
    }

    #[test]
    fn finds_fragment_inside_syslog_style_prefix() {
        let log = "Mon Mar 03 07:45:12 2025 capture opened\n";
        assert_eq!(
            extract_log_timestamp(Cursor::new(log)).as_deref(),
            Some("Mar 03 07:45:12")
        );
    }

    #[test]
    fn no_match_is_none() {
        let log = "2025-01-05 14:22:31 iso style only\nJan 5 14:22:31 single digit day\n";
        assert_eq!(extract_log_timestamp(Cursor::new(log)), None);
    }

    #[test]
    fn invalid_utf8_does_not_stop_the_scan() {
        let mut log = b"\xff\xfe garbage\n".to_vec();
        log.extend_from_slice(b"Dec 24 18:00:00 ok\n");
        assert_eq!(
            extract_log_timestamp(Cursor::new(log)).as_deref(),
            Some("Dec 24 18:00:00")
        );
    }

    #[test]
    fn last_line_without_newline_is_scanned() {
        assert_eq!(
            extract_log_timestamp(Cursor::new("Apr 30 23:59:59")).as_deref(),
            Some("Apr 30 23:59:59")
        );
    }
}

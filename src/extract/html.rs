use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use scraper::{Html, Node};

fn vin_regex() -> &'static Regex {
    static VIN_REGEX: OnceLock<Regex> = OnceLock::new();
    VIN_REGEX.get_or_init(|| Regex::new(r"W[A-Z0-9]{16}").expect("Invalid VIN regex"))
}

/// Concatenated text content of the document, skipping `<script>` and `<style>`.
pub fn visible_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut text = String::new();

    for node in document.tree.root().descendants() {
        let Node::Text(fragment) = node.value() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| matches!(el.name(), "script" | "style"))
        });
        if !hidden {
            text.push_str(fragment);
        }
    }

    text
}

/// Return the first VIN (`W` + 16 upper-case alphanumerics) in the visible text.
pub fn extract_vin(html: &str) -> Option<String> {
    vin_regex()
        .find(&visible_text(html))
        .map(|m| m.as_str().to_string())
}

/// File wrapper for [`extract_vin`]; an unreadable file yields `None`.
pub fn read_vin(path: &Path) -> Option<String> {
    let bytes = match fs::read(path) {
        Ok(b) => b,
        Err(e) => {
            tracing::warn!("Cannot read report {}: {}", path.display(), e);
            return None;
        }
    };
    let vin = extract_vin(&String::from_utf8_lossy(&bytes));
    tracing::debug!("VIN in {}: {:?}", path.display(), vin);
    vin
}

#[cfg(test)]
mod tests {
    use super::{extract_vin, visible_text};

    #[test]
    fn finds_vin_in_span() {
        let html = "<html><body><p>Vehicle</p><span>WA1ZZZ4M0AN123456</span></body></html>";
        assert_eq!(extract_vin(html).as_deref(), Some("WA1ZZZ4M0AN123456"));
    }

    #[test]
    fn no_vin_is_none() {
        let html = "<html><body><td>VIN</td><td>WA1ZZZ4M0</td><td>wa1zzz4m0an123456</td></body></html>";
        assert_eq!(extract_vin(html), None);
    }

    #[test]
    fn script_and_style_content_is_ignored() {
        let html = r#"<html><head>
            <style>.x::after { content: "WSTYLE0000000000A"; }</style>
            <script>var vin = "WSCRIPT000000000B";</script>
            </head><body><div>VIN: WVWZZZ1KZ8W000001</div></body></html>"#;
        assert_eq!(extract_vin(html).as_deref(), Some("WVWZZZ1KZ8W000001"));
    }

    #[test]
    fn first_vin_wins() {
        let html = "<ul><li>WAUZZZ8V0JA000001</li><li>WAUZZZ8V0JA000002</li></ul>";
        assert_eq!(extract_vin(html).as_deref(), Some("WAUZZZ8V0JA000001"));
    }

    #[test]
    fn markup_is_stripped_from_text() {
        let text = visible_text("<p>Drive <b>report</b></p>");
        assert!(text.contains("Drive report"));
        assert!(!text.contains("<b>"));
    }
}

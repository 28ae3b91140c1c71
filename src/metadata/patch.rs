use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use tempfile::NamedTempFile;

use super::fields::{FieldUpdates, MetadataField};

/// Result of patching a document: the new text and the fields not found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patched {
    pub text: String,
    pub skipped: Vec<MetadataField>,
}

/// One regex per field. Capture group 1 is the string value between the quotes.
fn field_regexes() -> &'static [(MetadataField, Regex)] {
    static FIELD_REGEXES: OnceLock<Vec<(MetadataField, Regex)>> = OnceLock::new();
    FIELD_REGEXES.get_or_init(|| {
        MetadataField::ALL
            .iter()
            .map(|&field| {
                let value = match field {
                    // Only ever replace something that already is a VIN
                    MetadataField::Vin => r"W[A-Z0-9]{16}",
                    _ => r#"(?:[^"\\]|\\.)*"#,
                };
                let pattern = format!(r#""{}"\s*:\s*"({})""#, regex::escape(field.key()), value);
                (field, Regex::new(&pattern).expect("Invalid field regex"))
            })
            .collect()
    })
}

fn field_regex(field: MetadataField) -> &'static Regex {
    // ALL and the table are built from the same list
    &field_regexes()[field as usize].1
}

/// Body of a JSON string literal for `value`, without the surrounding quotes.
fn json_string_body(value: &str) -> String {
    let quoted = serde_json::Value::String(value.to_string()).to_string();
    quoted[1..quoted.len() - 1].to_string()
}

/// Replace the value of the first occurrence of each updated field,
/// reporting the fields that were not present.
pub fn patch_fields_report(json_text: &str, updates: &FieldUpdates) -> Patched {
    let mut text = json_text.to_string();
    let mut skipped = Vec::new();

    for (field, value) in updates.iter() {
        let range = field_regex(field)
            .captures(&text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.range());

        match range {
            Some(range) => text.replace_range(range, &json_string_body(value)),
            None => {
                tracing::debug!("Field \"{}\" not present, left unmodified", field);
                skipped.push(field);
            }
        }
    }

    Patched { text, skipped }
}

/// Replace the value of the first occurrence of each updated field.
///
/// Everything outside the replaced values stays byte-identical. Missing
/// fields are skipped.
pub fn patch_fields(json_text: &str, updates: &FieldUpdates) -> String {
    patch_fields_report(json_text, updates).text
}

/// Patch the metadata file at `path` in place.
///
/// The new document goes to a temporary sibling first and is renamed over
/// the original, so readers see either the old or the new file.
pub fn write_patched(path: &Path, updates: &FieldUpdates) -> io::Result<Vec<MetadataField>> {
    let original = fs::read_to_string(path)?;
    let patched = patch_fields_report(&original, updates);

    if patched.text == original {
        tracing::info!("{} already up to date", path.display());
        return Ok(patched.skipped);
    }

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let permissions = fs::metadata(path)?.permissions();
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(patched.text.as_bytes())?;
    // Temp files are created owner-only; keep the document's own mode
    tmp.as_file().set_permissions(permissions)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;

    tracing::info!(
        "Patched {} ({} of {} fields)",
        path.display(),
        updates.len() - patched.skipped.len(),
        updates.len()
    );
    Ok(patched.skipped)
}

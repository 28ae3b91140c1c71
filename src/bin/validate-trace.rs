/// Trace folder validation tool
/// Runs: Required files → Log timestamp → VIN → Folder name → Patch preview
/// Nothing on disk is modified.
use std::path::{Path, PathBuf};

use anyhow::Context;
use trace_uploader::config::Config;
use trace_uploader::extract;
use trace_uploader::metadata::{patch_fields_report, FieldUpdates, FolderName};
use trace_uploader::scanner::required::resolve_trace_files;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("trace_uploader=info".parse()?),
        )
        .init();

    let folder = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .context("usage: validate-trace <trace folder>")?;
    let config_path = std::env::var_os("TRACE_UPLOADER_CONFIG").map(PathBuf::from);
    let config = Config::load_or_default(config_path.as_deref())?;

    println!("=== TRACE VALIDATION ===");
    println!("Folder:       {}", folder.display());
    println!("Assumed year: {}", config.assumed_year);
    println!("Extensions:   {:?}", config.extension_match);
    println!();

    // === STAGE 1: REQUIRED FILES ===
    println!("┌─ STAGE 1: REQUIRED FILES ──────────────────────────────────┐");
    let files = match resolve_trace_files(&folder, config.extension_match) {
        Ok(files) => files,
        Err(e) => return fail(&e),
    };
    println!("  ✓ log:  {}", name_of(&files.log));
    println!("  ✓ html: {}", name_of(&files.html));
    println!("  ✓ json: {}", name_of(&files.json));
    println!("└────────────────────────────────────────────────────────────┘");
    println!();

    // === STAGE 2: LOG TIMESTAMP ===
    println!("┌─ STAGE 2: LOG TIMESTAMP ───────────────────────────────────┐");
    let Some(raw) = extract::read_log_timestamp(&files.log) else {
        return fail("no timestamp found in log file");
    };
    println!("  ✓ Found:      {}", raw);
    let timestamp = match extract::normalize_timestamp(&raw, config.assumed_year) {
        Ok(ts) => ts,
        Err(e) => return fail(&e),
    };
    println!("  ✓ Normalized: {}", timestamp);
    println!("└────────────────────────────────────────────────────────────┘");
    println!();

    // === STAGE 3: VIN ===
    println!("┌─ STAGE 3: VIN ─────────────────────────────────────────────┐");
    let Some(vin) = extract::read_vin(&files.html) else {
        return fail("no VIN found in HTML report");
    };
    println!("  ✓ VIN: {}", vin);
    println!("└────────────────────────────────────────────────────────────┘");
    println!();

    // === STAGE 4: FOLDER NAME ===
    println!("┌─ STAGE 4: FOLDER NAME ─────────────────────────────────────┐");
    let base_name = folder
        .file_name()
        .and_then(|n| n.to_str())
        .context("folder has no usable name")?;
    let name = match FolderName::parse(base_name) {
        Ok(name) => name,
        Err(e) => return fail(&e),
    };
    println!("  ✓ Identifier:  {}", name.identifier);
    println!("  ✓ Description: {}", name.description);
    println!("  ✓ Location:    {}", name.location);
    println!("└────────────────────────────────────────────────────────────┘");
    println!();

    // === STAGE 5: PATCH PREVIEW ===
    println!("┌─ STAGE 5: PATCH PREVIEW ───────────────────────────────────┐");
    let extracted = extract::ExtractedMetadata {
        raw_timestamp: raw,
        timestamp,
        vin,
    };
    let updates = FieldUpdates::derive(&extracted, &name);
    let text = std::fs::read_to_string(&files.json)
        .with_context(|| format!("Cannot read {}", files.json.display()))?;
    let patched = patch_fields_report(&text, &updates);
    for (field, value) in updates.iter() {
        if patched.skipped.contains(&field) {
            println!("  - {:<22} not present", field.key());
        } else {
            println!("  ✓ {:<22} {}", field.key(), value);
        }
    }
    if patched.text == text {
        println!("  ✓ Metadata already up to date");
    }
    println!("└────────────────────────────────────────────────────────────┘");
    println!();

    println!("✓ Trace folder is ready for upload");
    Ok(())
}

fn name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn fail(reason: impl std::fmt::Display) -> anyhow::Result<()> {
    println!("  ✗ FAILED: {}", reason);
    println!("└────────────────────────────────────────────────────────────┘");
    std::process::exit(1);
}

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::Config;
use crate::error::AttemptError;
use crate::extract::{self, ExtractedMetadata};
use crate::ingest::Ingestor;
use crate::metadata::{self, FieldUpdates, FolderName, MetadataField};
use crate::scanner::required::{resolve_trace_files, TraceFiles};
use crate::ui::browser::TraceBrowser;
use crate::ui::console::Operator;
use crate::ui::drives::VolumeSource;

/// Application state machine phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppPhase {
    /// Operator is picking a trace folder
    Browsing,
    /// Resolving files and extracting metadata, nothing written yet
    Inspecting,
    /// Rewriting the metadata file
    Patching,
    /// Passing the folder to the ingestion tool
    HandingOff,
    /// Run finished, one way or another
    Done,
}

/// Everything derived from a trace folder before anything is written.
#[derive(Debug, Clone)]
pub struct TracePlan {
    pub folder: PathBuf,
    pub files: TraceFiles,
    pub extracted: ExtractedMetadata,
    pub name: FolderName,
    pub updates: FieldUpdates,
}

/// What was written, shown to the operator before hand-off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSummary {
    pub folder: PathBuf,
    pub timestamp: String,
    pub vin: String,
    pub location: String,
    pub description: String,
    pub au_number: String,
    /// Fields the metadata file did not contain
    pub skipped: Vec<MetadataField>,
}

impl fmt::Display for UploadSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\nMetadata updated successfully:")?;
        writeln!(f, "   Timestamp:   {}", self.timestamp)?;
        writeln!(f, "   VIN:         {}", self.vin)?;
        writeln!(f, "   Location:    {}", self.location)?;
        writeln!(f, "   Description: {}", self.description)?;
        write!(f, "   AU Number:   {}", self.au_number)?;
        if !self.skipped.is_empty() {
            let names: Vec<&str> = self.skipped.iter().map(|s| s.key()).collect();
            write!(f, "\n   Not present: {}", names.join(", "))?;
        }
        Ok(())
    }
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Metadata patched and the folder handed to ingestion
    HandedOff(UploadSummary),
    /// No volumes, or the operator quit while browsing
    NothingSelected,
    /// The operator declined to retry after a failed attempt
    Aborted,
}

/// Resolve the three files, extract timestamp and VIN, and derive the field
/// updates. Reads only.
pub fn inspect_trace(folder: &Path, config: &Config) -> Result<TracePlan, AttemptError> {
    let files = resolve_trace_files(folder, config.extension_match)?;

    let raw_timestamp = extract::read_log_timestamp(&files.log)
        .ok_or_else(|| AttemptError::MissingTimestamp(files.log.clone()))?;
    let vin = extract::read_vin(&files.html).ok_or_else(|| AttemptError::MissingVin(files.html.clone()))?;
    let timestamp = extract::normalize_timestamp(&raw_timestamp, config.assumed_year)?;

    let base_name = folder
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| AttemptError::UnnamedFolder(folder.to_path_buf()))?;
    let name = FolderName::parse(base_name)?;

    let extracted = ExtractedMetadata {
        raw_timestamp,
        timestamp,
        vin,
    };
    let updates = FieldUpdates::derive(&extracted, &name);

    Ok(TracePlan {
        folder: folder.to_path_buf(),
        files,
        extracted,
        name,
        updates,
    })
}

/// Write the plan's updates into its metadata file.
pub fn apply_plan(plan: &TracePlan) -> Result<UploadSummary, AttemptError> {
    let skipped = metadata::write_patched(&plan.files.json, &plan.updates).map_err(|source| {
        AttemptError::Write {
            path: plan.files.json.clone(),
            source,
        }
    })?;

    Ok(UploadSummary {
        folder: plan.folder.clone(),
        timestamp: plan.extracted.timestamp.clone(),
        vin: plan.extracted.vin.clone(),
        location: plan.name.location.clone(),
        description: plan.name.full.clone(),
        au_number: plan.name.identifier.clone(),
        skipped,
    })
}

/// Top-level pipeline: browse, inspect, patch, hand off.
pub struct App<'a> {
    pub phase: AppPhase,
    config: &'a Config,
    volumes: &'a dyn VolumeSource,
    ingestor: &'a mut dyn Ingestor,
}

impl<'a> App<'a> {
    pub fn new(config: &'a Config, volumes: &'a dyn VolumeSource, ingestor: &'a mut dyn Ingestor) -> Self {
        Self {
            phase: AppPhase::Browsing,
            config,
            volumes,
            ingestor,
        }
    }

    fn set_phase(&mut self, phase: AppPhase) {
        tracing::debug!("Phase {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
    }

    /// Inspect and patch one chosen folder.
    fn prepare(&mut self, folder: &Path) -> Result<UploadSummary, AttemptError> {
        self.set_phase(AppPhase::Inspecting);
        let plan = inspect_trace(folder, self.config)?;
        tracing::info!(
            "Trace {}: timestamp {} (log: {:?}), VIN {}",
            folder.display(),
            plan.extracted.timestamp,
            plan.extracted.raw_timestamp,
            plan.extracted.vin
        );

        self.set_phase(AppPhase::Patching);
        apply_plan(&plan)
    }

    /// Run until one folder has been handed off or the operator gives up.
    pub fn run(&mut self, operator: &mut dyn Operator) -> Result<RunOutcome> {
        loop {
            self.set_phase(AppPhase::Browsing);
            let mut browser = TraceBrowser::new(self.volumes, self.config.extension_match);
            let chosen = browser.run(operator).context("Operator input failed")?;
            let Some(folder) = chosen else {
                self.set_phase(AppPhase::Done);
                return Ok(RunOutcome::NothingSelected);
            };

            match self.prepare(&folder) {
                Ok(summary) => {
                    operator.show(&summary.to_string())?;

                    self.set_phase(AppPhase::HandingOff);
                    if let Err(err) = self.ingestor.hand_off(&folder) {
                        let err = err.context(format!(
                            "Metadata patched, but {} was not handed off",
                            folder.display()
                        ));
                        operator.show(&format!("\n{:#}", err))?;
                        self.set_phase(AppPhase::Done);
                        return Err(err);
                    }

                    self.set_phase(AppPhase::Done);
                    return Ok(RunOutcome::HandedOff(summary));
                }
                Err(err) => {
                    tracing::warn!("Trace folder {} rejected: {}", folder.display(), err);
                    operator.show(&format!("\nCannot process {}:\n  {}", folder.display(), err))?;
                    if !operator.confirm("Select another folder?")? {
                        self.set_phase(AppPhase::Done);
                        return Ok(RunOutcome::Aborted);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::{Path, PathBuf};

    use super::{apply_plan, inspect_trace};
    use crate::config::Config;
    use crate::error::{AttemptError, FolderNameError};

    fn config() -> Config {
        Config {
            assumed_year: 2025,
            ..Config::default()
        }
    }

    fn trace(parent: &Path, name: &str, log: &str, html: &str) -> PathBuf {
        let dir = parent.join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("capture.log"), log).unwrap();
        fs::write(dir.join("report.html"), html).unwrap();
        fs::write(
            dir.join("meta.json"),
            r#"{"date_created": "", "record_date": "", "vin": "W0000000000000000"}"#,
        )
        .unwrap();
        dir
    }

    #[test]
    fn inspect_derives_updates_without_writing() {
        let usb = tempfile::tempdir().unwrap();
        let dir = trace(
            usb.path(),
            "AU12345, ADAS Approval, Wolfsburg",
            "Jan 05 14:22:31 rec start\n",
            "<td>WA1ZZZ4M0AN123456</td>",
        );
        let before = fs::read_to_string(dir.join("meta.json")).unwrap();

        let plan = inspect_trace(&dir, &config()).unwrap();
        assert_eq!(plan.extracted.timestamp, "2025-01-05T14:22:31.000Z");
        assert_eq!(plan.extracted.vin, "WA1ZZZ4M0AN123456");
        assert_eq!(plan.name.identifier, "AU12345");
        assert_eq!(fs::read_to_string(dir.join("meta.json")).unwrap(), before);

        let summary = apply_plan(&plan).unwrap();
        assert_eq!(summary.location, "Wolfsburg");
        assert_eq!(summary.skipped.len(), 4);
        assert_eq!(
            fs::read_to_string(dir.join("meta.json")).unwrap(),
            r#"{"date_created": "2025-01-05T14:22:31.000Z", "record_date": "2025-01-05T14:22:31.000Z", "vin": "WA1ZZZ4M0AN123456"}"#
        );
    }

    #[test]
    fn malformed_timestamp_is_a_format_error() {
        let usb = tempfile::tempdir().unwrap();
        let dir = trace(usb.path(), "AU1, a, b", "Foo 05 14:22:31\n", "WA1ZZZ4M0AN123456");
        assert!(matches!(inspect_trace(&dir, &config()), Err(AttemptError::Format(_))));
    }

    #[test]
    fn missing_vin_is_reported() {
        let usb = tempfile::tempdir().unwrap();
        let dir = trace(usb.path(), "AU1, a, b", "Jan 05 14:22:31\n", "<p>no vin</p>");
        assert!(matches!(inspect_trace(&dir, &config()), Err(AttemptError::MissingVin(_))));
    }

    #[test]
    fn missing_timestamp_is_reported() {
        let usb = tempfile::tempdir().unwrap();
        let dir = trace(usb.path(), "AU1, a, b", "nothing here\n", "WA1ZZZ4M0AN123456");
        assert!(matches!(
            inspect_trace(&dir, &config()),
            Err(AttemptError::MissingTimestamp(_))
        ));
    }

    #[test]
    fn folder_name_needs_three_parts() {
        let usb = tempfile::tempdir().unwrap();
        let dir = trace(usb.path(), "AU1, Wolfsburg", "Jan 05 14:22:31\n", "WA1ZZZ4M0AN123456");
        match inspect_trace(&dir, &config()) {
            Err(AttemptError::FolderName(FolderNameError::WrongPartCount { found, .. })) => {
                assert_eq!(found, 2)
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}

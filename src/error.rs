use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::scanner::types::RequiredKind;

/// A timestamp fragment was found in the log but is not a valid
/// `<Mon> <DD> <HH:MM:SS>` instant.
#[derive(Debug, Error)]
#[error("timestamp fragment {fragment:?} is not a valid `<Mon> <DD> <HH:MM:SS>` time")]
pub struct FormatError {
    pub fragment: String,
    #[source]
    pub source: chrono::format::ParseError,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FolderNameError {
    #[error(
        "folder name {name:?} has {found} comma-separated parts, expected \
         `<identifier>, <description>, <location>`"
    )]
    WrongPartCount { name: String, found: usize },
}

/// Everything that can end a single trace-folder attempt.
///
/// None of these are fatal: the orchestration loop reports them and lets
/// the operator pick another folder or quit.
#[derive(Debug, Error)]
pub enum AttemptError {
    #[error("no *{} file found in {}", .kind.extension(), .folder.display())]
    MissingFile { kind: RequiredKind, folder: PathBuf },

    #[error("no `<Mon> <DD> <HH:MM:SS>` timestamp found in {}", .0.display())]
    MissingTimestamp(PathBuf),

    #[error("no VIN found in {}", .0.display())]
    MissingVin(PathBuf),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    FolderName(#[from] FolderNameError),

    #[error("trace folder {} has no usable name", .0.display())]
    UnnamedFolder(PathBuf),

    #[error("failed to update {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

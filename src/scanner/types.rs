use std::fmt;
use std::path::PathBuf;
use std::time::SystemTime;

use compact_str::CompactString;
use serde::Deserialize;

/// A direct subfolder collected while listing a directory.
#[derive(Debug, Clone)]
pub struct FolderEntry {
    /// Full path to the folder
    pub path: PathBuf,
    /// Folder name (not full path), as shown in menus
    pub name: CompactString,
    /// Last modification time
    pub modified: SystemTime,
}

/// Direct children of one directory, split into folders and files.
#[derive(Debug, Clone, Default)]
pub struct DirListing {
    /// Subfolders, most recently modified first
    pub folders: Vec<FolderEntry>,
    /// Plain file names
    pub files: Vec<CompactString>,
}

/// The three files every trace folder carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequiredKind {
    /// Capture log holding the recording timestamp
    Log,
    /// Test report holding the VIN
    Html,
    /// Metadata document that gets patched
    Json,
}

impl RequiredKind {
    pub const ALL: [RequiredKind; 3] = [RequiredKind::Log, RequiredKind::Html, RequiredKind::Json];

    pub fn extension(self) -> &'static str {
        match self {
            RequiredKind::Log => ".log",
            RequiredKind::Html => ".html",
            RequiredKind::Json => ".json",
        }
    }
}

impl fmt::Display for RequiredKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// How file name suffixes are compared against required extensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExtensionMatch {
    /// `trace.LOG` does not count as a log file
    #[default]
    Exact,
    /// ASCII case is ignored
    IgnoreCase,
}

impl ExtensionMatch {
    pub fn matches(self, file_name: &str, extension: &str) -> bool {
        match self {
            ExtensionMatch::Exact => file_name.ends_with(extension),
            ExtensionMatch::IgnoreCase => {
                let (name, ext) = (file_name.as_bytes(), extension.as_bytes());
                name.len() >= ext.len() && name[name.len() - ext.len()..].eq_ignore_ascii_case(ext)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ExtensionMatch;

    #[test]
    fn exact_match_is_case_sensitive() {
        assert!(ExtensionMatch::Exact.matches("drive.log", ".log"));
        assert!(!ExtensionMatch::Exact.matches("DRIVE.LOG", ".log"));
        assert!(!ExtensionMatch::Exact.matches("drive.log.bak", ".log"));
    }

    #[test]
    fn ignore_case_match_accepts_upper_case_suffix() {
        assert!(ExtensionMatch::IgnoreCase.matches("DRIVE.LOG", ".log"));
        assert!(ExtensionMatch::IgnoreCase.matches("report.Html", ".html"));
        assert!(!ExtensionMatch::IgnoreCase.matches("log", ".log"));
    }
}

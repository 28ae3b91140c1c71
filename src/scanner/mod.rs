pub mod required;
pub mod types;

use std::fs;
use std::io;
use std::path::Path;
use std::time::SystemTime;

use compact_str::CompactString;

use self::types::{DirListing, ExtensionMatch, FolderEntry, RequiredKind};

/// List the direct children of `path`.
///
/// Fails only when the directory itself cannot be read (removed volume,
/// permission denied). Children whose metadata cannot be read are skipped.
pub fn list_directory(path: &Path) -> io::Result<DirListing> {
    let mut listing = DirListing::default();

    for entry in fs::read_dir(path)? {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::debug!("Skipping unreadable entry in {}: {}", path.display(), e);
                continue;
            }
        };
        let child = entry.path();
        let name = CompactString::new(entry.file_name().to_string_lossy());

        // Follows symlinks, so a linked folder is browsable like a real one
        let metadata = match fs::metadata(&child) {
            Ok(m) => m,
            Err(e) => {
                tracing::debug!("Skipping {}: {}", child.display(), e);
                continue;
            }
        };

        if metadata.is_dir() {
            listing.folders.push(FolderEntry {
                path: child,
                name,
                modified: metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH),
            });
        } else if metadata.is_file() {
            listing.files.push(name);
        }
    }

    // Most recent captures first; name keeps equal timestamps stable
    listing
        .folders
        .sort_by(|a, b| b.modified.cmp(&a.modified).then_with(|| a.name.cmp(&b.name)));
    listing.files.sort();

    tracing::debug!(
        "Listed {}: {} folders, {} files",
        path.display(),
        listing.folders.len(),
        listing.files.len()
    );

    Ok(listing)
}

/// Whether a listing holds at least one file of every required kind.
pub fn is_trace_listing(listing: &DirListing, matching: ExtensionMatch) -> bool {
    RequiredKind::ALL.iter().all(|kind| {
        listing
            .files
            .iter()
            .any(|name| matching.matches(name, kind.extension()))
    })
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::time::{Duration, SystemTime};

    use filetime::FileTime;

    use super::{is_trace_listing, list_directory};
    use crate::scanner::types::ExtensionMatch;

    fn set_mtime(path: &std::path::Path, secs_ago: u64) {
        let t = SystemTime::now() - Duration::from_secs(secs_ago);
        filetime::set_file_mtime(path, FileTime::from_system_time(t)).unwrap();
    }

    #[test]
    fn folders_are_listed_most_recent_first() {
        let dir = tempfile::tempdir().unwrap();
        for (name, age) in [("old", 3000), ("newest", 10), ("middle", 600)] {
            let p = dir.path().join(name);
            fs::create_dir(&p).unwrap();
            set_mtime(&p, age);
        }
        fs::write(dir.path().join("notes.txt"), "x").unwrap();

        let listing = list_directory(dir.path()).unwrap();
        let names: Vec<&str> = listing.folders.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["newest", "middle", "old"]);
        assert_eq!(listing.files, ["notes.txt"]);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(list_directory(&dir.path().join("gone")).is_err());
    }

    #[test]
    fn trace_listing_needs_all_three_kinds() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.log"), "").unwrap();
        fs::write(dir.path().join("a.html"), "").unwrap();
        let listing = list_directory(dir.path()).unwrap();
        assert!(!is_trace_listing(&listing, ExtensionMatch::Exact));

        fs::write(dir.path().join("meta.JSON"), "").unwrap();
        let listing = list_directory(dir.path()).unwrap();
        assert!(!is_trace_listing(&listing, ExtensionMatch::Exact));
        assert!(is_trace_listing(&listing, ExtensionMatch::IgnoreCase));
    }
}

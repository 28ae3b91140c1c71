use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use super::types::{ExtensionMatch, RequiredKind};
use crate::error::AttemptError;

/// The resolved files of a trace folder, one per required kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceFiles {
    pub log: PathBuf,
    pub html: PathBuf,
    pub json: PathBuf,
}

/// Find the file in `folder` whose name ends with `extension`.
///
/// When several files match, the one created first wins, ties broken by
/// name. Returns `None` when nothing matches or the folder is unreadable.
pub fn find_required_file(
    folder: &Path,
    extension: &str,
    matching: ExtensionMatch,
) -> Option<PathBuf> {
    let entries = match fs::read_dir(folder) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!("Cannot read {}: {}", folder.display(), e);
            return None;
        }
    };

    let candidates = entries.flatten().filter_map(|entry| {
        let name = entry.file_name();
        if !matching.matches(&name.to_string_lossy(), extension) {
            return None;
        }
        // Follow symlinks, as the folder listing does
        let metadata = fs::metadata(entry.path()).ok()?;
        if !metadata.is_file() {
            return None;
        }
        // Not every filesystem records birth time
        let created = metadata
            .created()
            .or_else(|_| metadata.modified())
            .unwrap_or(SystemTime::UNIX_EPOCH);
        Some((entry.path(), created))
    });

    pick_earliest(candidates)
}

/// Earliest timestamp first, then lexical path order.
pub fn pick_earliest<I>(candidates: I) -> Option<PathBuf>
where
    I: IntoIterator<Item = (PathBuf, SystemTime)>,
{
    candidates
        .into_iter()
        .min_by(|(pa, ta), (pb, tb)| ta.cmp(tb).then_with(|| pa.cmp(pb)))
        .map(|(path, _)| path)
}

/// Resolve all three required files or report the first missing kind.
pub fn resolve_trace_files(
    folder: &Path,
    matching: ExtensionMatch,
) -> Result<TraceFiles, AttemptError> {
    let find = |kind: RequiredKind| {
        find_required_file(folder, kind.extension(), matching).ok_or_else(|| {
            AttemptError::MissingFile {
                kind,
                folder: folder.to_path_buf(),
            }
        })
    };

    Ok(TraceFiles {
        log: find(RequiredKind::Log)?,
        html: find(RequiredKind::Html)?,
        json: find(RequiredKind::Json)?,
    })
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;
    use std::time::{Duration, SystemTime};

    use filetime::FileTime;

    use super::{find_required_file, pick_earliest, resolve_trace_files};
    use crate::error::AttemptError;
    use crate::scanner::types::{ExtensionMatch, RequiredKind};

    #[test]
    fn earliest_candidate_wins_regardless_of_name() {
        let t1 = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000);
        let t2 = SystemTime::UNIX_EPOCH + Duration::from_secs(2_000);
        let picked = pick_earliest(vec![
            (PathBuf::from("a.log"), t2),
            (PathBuf::from("b.log"), t1),
        ]);
        assert_eq!(picked, Some(PathBuf::from("b.log")));
    }

    #[test]
    fn equal_timestamps_fall_back_to_name_order() {
        let t = SystemTime::UNIX_EPOCH + Duration::from_secs(5);
        let picked = pick_earliest(vec![
            (PathBuf::from("z.log"), t),
            (PathBuf::from("m.log"), t),
        ]);
        assert_eq!(picked, Some(PathBuf::from("m.log")));
    }

    #[test]
    fn no_candidates_is_none() {
        assert_eq!(pick_earliest(Vec::new()), None);
    }

    #[test]
    fn find_picks_first_created_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("b.log");
        fs::write(&first, "first").unwrap();
        // Filesystems without birth time fall back to mtime
        let earlier = SystemTime::now() - Duration::from_secs(3600);
        filetime::set_file_mtime(&first, FileTime::from_system_time(earlier)).unwrap();
        std::thread::sleep(Duration::from_millis(50));
        fs::write(dir.path().join("a.log"), "second").unwrap();

        let found = find_required_file(dir.path(), ".log", ExtensionMatch::Exact);
        assert_eq!(found, Some(first));
    }

    #[test]
    fn find_ignores_directories_and_other_extensions() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("nested.log")).unwrap();
        fs::write(dir.path().join("report.html"), "").unwrap();
        assert_eq!(find_required_file(dir.path(), ".log", ExtensionMatch::Exact), None);
    }

    #[test]
    fn find_on_missing_folder_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let gone = dir.path().join("unplugged");
        assert_eq!(find_required_file(&gone, ".json", ExtensionMatch::Exact), None);
    }

    #[test]
    fn resolve_reports_missing_kind() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("drive.log"), "").unwrap();
        fs::write(dir.path().join("meta.json"), "{}").unwrap();

        match resolve_trace_files(dir.path(), ExtensionMatch::Exact) {
            Err(AttemptError::MissingFile { kind, .. }) => assert_eq!(kind, RequiredKind::Html),
            other => panic!("unexpected result: {:?}", other),
        }

        fs::write(dir.path().join("report.html"), "").unwrap();
        let files = resolve_trace_files(dir.path(), ExtensionMatch::Exact).unwrap();
        assert_eq!(files.html, dir.path().join("report.html"));
        assert_eq!(files.json, dir.path().join("meta.json"));
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_file_resolves_when_folder_qualifies() {
        use crate::scanner::{is_trace_listing, list_directory};

        let dir = tempfile::tempdir().unwrap();
        let elsewhere = tempfile::tempdir().unwrap();
        let target = elsewhere.path().join("capture.log");
        fs::write(&target, "Jan 05 14:22:31 start\n").unwrap();
        std::os::unix::fs::symlink(&target, dir.path().join("drive.log")).unwrap();
        fs::write(dir.path().join("report.html"), "").unwrap();
        fs::write(dir.path().join("meta.json"), "{}").unwrap();

        let listing = list_directory(dir.path()).unwrap();
        assert!(is_trace_listing(&listing, ExtensionMatch::Exact));
        let files = resolve_trace_files(dir.path(), ExtensionMatch::Exact).unwrap();
        assert_eq!(files.log, dir.path().join("drive.log"));
    }
}

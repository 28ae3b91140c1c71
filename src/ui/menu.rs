use std::fmt::Write;
use std::time::SystemTime;

use chrono::{DateTime, Local};

use super::browser::FolderView;
use super::drives::Volume;

/// Volume capacity in the largest binary unit that keeps the value >= 1.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];

    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit + 1 < UNITS.len() {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}

/// Local modification date as `(MM.DD.YY)`.
pub fn format_date(time: SystemTime) -> String {
    DateTime::<Local>::from(time).format("(%m.%d.%y)").to_string()
}

pub fn render_volumes(volumes: &[Volume]) -> String {
    let mut out = String::from("\nAvailable volumes:\n");
    for (i, volume) in volumes.iter().enumerate() {
        let size = format_size(volume.total_bytes);
        let _ = writeln!(out, "{:2}. {}  ({})", i + 1, volume.id, size);
    }
    out
}

/// Folder listing with names padded to the widest one so dates line up.
pub fn render_folder(view: &FolderView) -> String {
    let mut out = format!("\n{}\n", view.path.display());
    if view.is_trace {
        out.push_str("  [trace folder: log, html and json present]\n");
    }

    if view.folders.is_empty() {
        out.push_str("  (no subfolders)\n");
        return out;
    }

    let width = view
        .folders
        .iter()
        .map(|f| f.name.chars().count())
        .max()
        .unwrap_or(0);
    for (i, folder) in view.folders.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:2}. {:<width$}  {}",
            i + 1,
            folder.name.as_str(),
            format_date(folder.modified),
            width = width
        );
    }
    out
}

pub fn volume_prompt() -> &'static str {
    "Select volume number (0 to rescan, q to quit): "
}

/// Prompt listing only the choices valid for this folder.
pub fn folder_prompt(view: &FolderView) -> String {
    let mut choices = Vec::new();
    if !view.folders.is_empty() {
        choices.push("number to open");
    }
    if view.is_trace {
        choices.push("u to upload this folder");
    }
    choices.push("0 to go back");
    choices.push("q to quit");
    format!("Choose ({}): ", choices.join(", "))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::time::SystemTime;

    use chrono::{Local, TimeZone};
    use compact_str::CompactString;

    use super::{folder_prompt, format_date, format_size, render_folder, render_volumes};
    use crate::scanner::types::FolderEntry;
    use crate::ui::browser::FolderView;
    use crate::ui::drives::Volume;

    fn local(y: i32, m: u32, d: u32) -> SystemTime {
        SystemTime::from(Local.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap())
    }

    fn entry(name: &str, modified: SystemTime) -> FolderEntry {
        FolderEntry {
            path: PathBuf::from("/media/usb").join(name),
            name: CompactString::new(name),
            modified,
        }
    }

    #[test]
    fn dates_use_month_day_short_year() {
        assert_eq!(format_date(local(2025, 1, 5)), "(01.05.25)");
        assert_eq!(format_date(local(2024, 12, 31)), "(12.31.24)");
    }

    #[test]
    fn sizes_are_human_readable() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(64 * 1024 * 1024 * 1024), "64.0 GB");
        assert_eq!(format_size(1536), "1.5 KB");
    }

    #[test]
    fn folder_names_are_padded_to_widest() {
        let view = FolderView {
            path: PathBuf::from("/media/usb"),
            folders: vec![
                entry("AU1, a, Ulm", local(2025, 3, 2)),
                entry("short", local(2025, 3, 1)),
            ],
            is_trace: false,
        };
        let rendered = render_folder(&view);
        assert!(rendered.contains(" 1. AU1, a, Ulm  (03.02.25)\n"));
        assert!(rendered.contains(" 2. short        (03.01.25)\n"));
    }

    #[test]
    fn empty_folder_offers_only_back() {
        let view = FolderView {
            path: PathBuf::from("/media/usb/empty"),
            folders: Vec::new(),
            is_trace: false,
        };
        assert!(render_folder(&view).contains("(no subfolders)"));
        assert_eq!(folder_prompt(&view), "Choose (0 to go back, q to quit): ");
    }

    #[test]
    fn trace_folder_prompt_offers_upload() {
        let view = FolderView {
            path: PathBuf::from("/media/usb/AU1, a, Ulm"),
            folders: vec![entry("raw", local(2025, 3, 2))],
            is_trace: true,
        };
        assert_eq!(
            folder_prompt(&view),
            "Choose (number to open, u to upload this folder, 0 to go back, q to quit): "
        );
    }

    #[test]
    fn volumes_are_numbered_from_one() {
        let volumes = vec![Volume {
            id: "E:\\".to_string(),
            root: PathBuf::from("E:\\"),
            total_bytes: 2048,
            is_system: false,
        }];
        assert!(render_volumes(&volumes).contains(" 1. E:\\  (2.0 KB)"));
    }
}

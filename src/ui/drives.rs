use std::path::{Path, PathBuf};

/// A volume as reported by the host, before filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeProbe {
    pub id: String,
    pub root: PathBuf,
    /// `None` when the capacity query failed (removed or unready drive)
    pub total_bytes: Option<u64>,
    pub is_system: bool,
}

/// A volume offered for navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Volume {
    pub id: String,
    pub root: PathBuf,
    pub total_bytes: u64,
    pub is_system: bool,
}

/// Host primitive that reports mounted volumes.
pub trait VolumeSource {
    fn probe(&self) -> Vec<VolumeProbe>;
}

impl VolumeSource for Vec<VolumeProbe> {
    fn probe(&self) -> Vec<VolumeProbe> {
        self.clone()
    }
}

/// Volumes the operator may browse: non-system, capacity > 0, sorted by id.
pub fn list_removable_volumes(source: &dyn VolumeSource) -> Vec<Volume> {
    let mut volumes: Vec<Volume> = source
        .probe()
        .into_iter()
        .filter_map(|probe| {
            let Some(total_bytes) = probe.total_bytes else {
                tracing::debug!("Skipping {}: capacity unavailable", probe.id);
                return None;
            };
            if probe.is_system || total_bytes == 0 {
                tracing::debug!(
                    "Skipping {} (system={}, total_bytes={})",
                    probe.id,
                    probe.is_system,
                    total_bytes
                );
                return None;
            }
            Some(Volume {
                id: probe.id,
                root: probe.root,
                total_bytes,
                is_system: false,
            })
        })
        .collect();

    volumes.sort_by(|a, b| a.id.cmp(&b.id));
    tracing::debug!("{} volume(s) available", volumes.len());
    volumes
}

/// Volumes of the machine the uploader runs on.
#[derive(Debug, Clone)]
pub struct HostVolumes {
    system_volume: String,
}

impl HostVolumes {
    /// `system_volume` overrides the detected system drive (`%SystemDrive%` or `/`).
    pub fn new(system_volume: Option<&Path>) -> Self {
        let system_volume = match system_volume {
            Some(path) => path.to_string_lossy().to_string(),
            None => default_system_volume(),
        };
        tracing::debug!("System volume: {}", system_volume);
        Self { system_volume }
    }
}

impl VolumeSource for HostVolumes {
    #[cfg(windows)]
    fn probe(&self) -> Vec<VolumeProbe> {
        probe_logical_drives(&self.system_volume)
    }

    #[cfg(not(windows))]
    fn probe(&self) -> Vec<VolumeProbe> {
        probe_disks(&self.system_volume)
    }
}

#[cfg(windows)]
fn default_system_volume() -> String {
    std::env::var("SystemDrive").unwrap_or_else(|_| "C:".to_string())
}

#[cfg(not(windows))]
fn default_system_volume() -> String {
    "/".to_string()
}

/// Compare volume roots ignoring trailing separators and ASCII case,
/// so `C:`, `c:\` and `C:/` are the same drive.
fn same_volume(a: &str, b: &str) -> bool {
    let norm = |s: &str| s.trim_end_matches(&['\\', '/'][..]).to_ascii_uppercase();
    norm(a) == norm(b)
}

#[cfg(windows)]
fn probe_logical_drives(system_volume: &str) -> Vec<VolumeProbe> {
    use windows::core::PCWSTR;
    use windows::Win32::Storage::FileSystem::{GetDiskFreeSpaceExW, GetLogicalDrives};

    let mask = unsafe { GetLogicalDrives() };

    (0..26u8)
        .filter(|bit| mask & (1u32 << bit) != 0)
        .map(|bit| {
            let root = format!("{}:\\", (b'A' + bit) as char);
            let wide: Vec<u16> = root.encode_utf16().chain(std::iter::once(0)).collect();
            let mut total: u64 = 0;

            let queried = unsafe {
                GetDiskFreeSpaceExW(
                    PCWSTR(wide.as_ptr()),
                    None,
                    Some(&mut total as *mut u64),
                    None,
                )
            };
            let total_bytes = match queried {
                Ok(()) => Some(total),
                Err(e) => {
                    tracing::debug!("Capacity query failed for {}: {}", root, e);
                    None
                }
            };

            VolumeProbe {
                id: root.clone(),
                is_system: same_volume(&root, system_volume),
                root: PathBuf::from(root),
                total_bytes,
            }
        })
        .collect()
}

#[cfg(not(windows))]
fn probe_disks(system_volume: &str) -> Vec<VolumeProbe> {
    let disks = sysinfo::Disks::new_with_refreshed_list();
    disks
        .iter()
        .filter_map(|d| {
            let mount = d.mount_point().to_path_buf();
            if !mount.is_absolute() {
                return None;
            }
            let id = mount.to_string_lossy().to_string();
            Some(VolumeProbe {
                is_system: same_volume(&id, system_volume),
                id,
                root: mount,
                total_bytes: Some(d.total_space()),
            })
        })
        .collect()
}

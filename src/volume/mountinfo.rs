//! Linux volume source
//!
//! Builds the volume list from `/proc/self/mountinfo`, using sysfs for the
//! removable flag and `/dev/disk/by-uuid` for filesystem UUIDs.

use log::{debug, warn};
use std::collections::HashMap;
use std::fs;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::config::ResolverConfig;
use crate::error::ResolveError;
use crate::volume::source::StorageVolumeSource;
use crate::volume::types::StorageVolume;

/// A single parsed line of mountinfo
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountEntry {
    /// `major:minor` of the mounted device
    pub device_number: String,
    pub mount_point: PathBuf,
    pub fs_type: String,
    /// Mount source, e.g. `/dev/sdb1`, or a pseudo name like `tmpfs`
    pub source: String,
}

/// Volume source backed by procfs and sysfs
#[derive(Debug, Clone)]
pub struct MountInfoSource {
    mountinfo_path: PathBuf,
    sysfs_root: PathBuf,
    uuid_dir: PathBuf,
}

impl MountInfoSource {
    pub fn new(
        mountinfo_path: impl Into<PathBuf>,
        sysfs_root: impl Into<PathBuf>,
        uuid_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            mountinfo_path: mountinfo_path.into(),
            sysfs_root: sysfs_root.into(),
            uuid_dir: uuid_dir.into(),
        }
    }

    pub fn from_config(config: &ResolverConfig) -> Self {
        Self::new(&config.mountinfo_path, &config.sysfs_root, &config.uuid_dir)
    }

    /// Resolve a mount entry to a volume, or `None` if it is not backed by a block device
    fn volume_for(
        &self,
        entry: MountEntry,
        uuids: &HashMap<String, String>,
    ) -> Option<StorageVolume> {
        let device_dir = match self.block_device_dir(&entry) {
            Some(dir) => dir,
            None => {
                debug!(
                    "Skipping {} ({} from {}): not a block device",
                    entry.mount_point.display(),
                    entry.device_number,
                    entry.source
                );
                return None;
            }
        };

        let device = device_dir
            .file_name()
            .map(|name| name.to_string_lossy().into_owned());

        let is_removable = self.is_removable(&device_dir);
        let uuid = device.as_ref().and_then(|name| uuids.get(name).cloned());

        Some(StorageVolume {
            is_removable,
            directory: Some(entry.mount_point),
            uuid,
            device,
            fs_type: Some(entry.fs_type),
        })
    }

    /// Sysfs directory of the mounted block device.
    ///
    /// btrfs and other filesystems report an anonymous `0:N` device number, so
    /// a `/dev/<name>` mount source is looked up under `class/block` as well.
    fn block_device_dir(&self, entry: &MountEntry) -> Option<PathBuf> {
        let by_number = self
            .sysfs_root
            .join("dev")
            .join("block")
            .join(&entry.device_number);
        if let Ok(dir) = by_number.canonicalize() {
            return Some(dir);
        }

        let name = Path::new(entry.source.strip_prefix("/dev/")?).file_name()?;
        self.sysfs_root
            .join("class")
            .join("block")
            .join(name)
            .canonicalize()
            .ok()
    }

    /// Partitions carry no `removable` attribute, so fall back to the parent disk
    fn is_removable(&self, device_dir: &Path) -> bool {
        let flag = read_flag(&device_dir.join("removable")).or_else(|| {
            device_dir
                .parent()
                .and_then(|disk| read_flag(&disk.join("removable")))
        });

        flag.unwrap_or(false) || self.is_on_usb_bus(device_dir)
    }

    fn is_on_usb_bus(&self, device_dir: &Path) -> bool {
        let root = self
            .sysfs_root
            .canonicalize()
            .unwrap_or_else(|_| self.sysfs_root.clone());
        let relative = device_dir.strip_prefix(&root).unwrap_or(device_dir);

        relative.components().any(|component| {
            component
                .as_os_str()
                .to_str()
                .is_some_and(|name| name.starts_with("usb"))
        })
    }

    /// Map of device name (`sdb1`) to filesystem UUID
    fn uuid_map(&self) -> HashMap<String, String> {
        let mut uuids = HashMap::new();

        let entries = match fs::read_dir(&self.uuid_dir) {
            Ok(entries) => entries,
            Err(e) => {
                debug!("Cannot read {}: {}", self.uuid_dir.display(), e);
                return uuids;
            }
        };

        for entry in entries.flatten() {
            let uuid = entry.file_name().to_string_lossy().into_owned();
            if let Ok(target) = fs::read_link(entry.path()) {
                if let Some(name) = target.file_name() {
                    uuids
                        .entry(name.to_string_lossy().into_owned())
                        .or_insert(uuid);
                }
            }
        }

        uuids
    }
}

impl StorageVolumeSource for MountInfoSource {
    fn storage_volumes(&self) -> Result<Vec<StorageVolume>, ResolveError> {
        // Mount points are raw bytes; only whitespace and backslash are escaped
        let contents = fs::read(&self.mountinfo_path).map_err(|e| {
            warn!("Failed to read {}: {}", self.mountinfo_path.display(), e);
            ResolveError::ServiceUnavailable(format!(
                "cannot read {}: {}",
                self.mountinfo_path.display(),
                e
            ))
        })?;

        let uuids = self.uuid_map();

        let volumes = contents
            .split(|b| *b == b'\n')
            .filter_map(|line| {
                let entry = parse_mountinfo_line(line);
                if entry.is_none() && !line.trim_ascii().is_empty() {
                    debug!(
                        "Skipping malformed mountinfo line: {}",
                        String::from_utf8_lossy(line)
                    );
                }
                entry
            })
            .filter_map(|entry| self.volume_for(entry, &uuids))
            .collect();

        Ok(volumes)
    }
}

/// Parses one mountinfo line:
/// `id parent major:minor root mount_point options [optional...] - fstype source super_options`
pub fn parse_mountinfo_line(line: &[u8]) -> Option<MountEntry> {
    let fields: Vec<&[u8]> = line
        .split(|b| b.is_ascii_whitespace())
        .filter(|field| !field.is_empty())
        .collect();
    if fields.len() < 7 {
        return None;
    }

    let device_number = std::str::from_utf8(fields[2]).ok()?;
    if !device_number.contains(':') {
        return None;
    }

    let separator = fields.iter().skip(6).position(|field| *field == b"-")? + 6;
    let fs_type = fields.get(separator + 1)?;
    let source = fields.get(separator + 2).copied().unwrap_or(b"none".as_slice());

    Some(MountEntry {
        device_number: device_number.to_string(),
        mount_point: path_from_bytes(decode_octal_escapes(fields[4])),
        fs_type: String::from_utf8_lossy(&decode_octal_escapes(fs_type)).into_owned(),
        source: String::from_utf8_lossy(&decode_octal_escapes(source)).into_owned(),
    })
}

/// Decodes the `\ooo` escapes the kernel uses for space, tab, newline and backslash
pub fn decode_octal_escapes(raw: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(raw.len());
    let mut i = 0;

    while i < raw.len() {
        if raw[i] == b'\\' && i + 3 < raw.len() {
            let digits = &raw[i + 1..i + 4];
            if digits.iter().all(|b| (b'0'..=b'7').contains(b)) {
                let value = digits
                    .iter()
                    .fold(0u32, |acc, b| acc * 8 + u32::from(b - b'0'));
                if let Ok(byte) = u8::try_from(value) {
                    out.push(byte);
                    i += 4;
                    continue;
                }
            }
        }
        out.push(raw[i]);
        i += 1;
    }

    out
}

#[cfg(unix)]
fn path_from_bytes(bytes: Vec<u8>) -> PathBuf {
    use std::os::unix::ffi::OsStringExt;
    PathBuf::from(OsString::from_vec(bytes))
}

#[cfg(not(unix))]
fn path_from_bytes(bytes: Vec<u8>) -> PathBuf {
    PathBuf::from(OsString::from(String::from_utf8_lossy(&bytes).into_owned()))
}

fn read_flag(path: &Path) -> Option<bool> {
    fs::read_to_string(path)
        .ok()
        .map(|value| value.trim() == "1")
}

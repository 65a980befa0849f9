//! Volume record types

use std::path::PathBuf;

/// One storage volume as reported by the operating system
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StorageVolume {
    pub is_removable: bool,
    /// Mount directory, when the volume is mounted somewhere reachable
    pub directory: Option<PathBuf>,
    pub uuid: Option<String>,
    /// Block device name, e.g. `sdb1`
    pub device: Option<String>,
    pub fs_type: Option<String>,
}

impl StorageVolume {
    /// Fixed (non-removable) volume
    pub fn fixed(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: Some(directory.into()),
            ..Self::default()
        }
    }

    /// Removable volume mounted at `directory`
    pub fn removable(directory: impl Into<PathBuf>) -> Self {
        Self {
            is_removable: true,
            directory: Some(directory.into()),
            ..Self::default()
        }
    }

    pub fn with_uuid(mut self, uuid: impl Into<String>) -> Self {
        self.uuid = Some(uuid.into());
        self
    }

    pub fn with_device(mut self, device: impl Into<String>) -> Self {
        self.device = Some(device.into());
        self
    }

    /// Mount directory as a non-empty UTF-8 string, if it has one
    pub fn usable_directory(&self) -> Option<&str> {
        self.directory
            .as_deref()
            .and_then(|dir| dir.to_str())
            .filter(|dir| !dir.is_empty())
    }
}

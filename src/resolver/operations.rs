//! Volume resolution operations

use log::{debug, info};
use std::path::PathBuf;

use crate::error::ResolveError;
use crate::resolver::results::{PathOrigin, ResolvedPath};
use crate::volume::{StorageVolume, StorageVolumeSource};

/// Resolves the mount path of the first removable volume.
///
/// Every call re-enumerates through the injected source; nothing is cached.
#[derive(Debug)]
pub struct VolumeResolver<S> {
    source: S,
    fallback: PathBuf,
}

impl<S: StorageVolumeSource> VolumeResolver<S> {
    pub fn new(source: S, fallback: impl Into<PathBuf>) -> Self {
        Self {
            source,
            fallback: fallback.into(),
        }
    }

    /// Enumerates every volume, in source order
    pub fn volumes(&self) -> Result<Vec<StorageVolume>, ResolveError> {
        self.source.storage_volumes()
    }

    /// Returns the mount directory of the first removable volume, or the fallback root
    pub fn resolve_usb_path(&self) -> Result<ResolvedPath, ResolveError> {
        let volumes = self.source.storage_volumes()?;

        if let Some(volume) = select_removable(&volumes) {
            if let Some(path) = volume.usable_directory() {
                info!(
                    "Resolved removable volume {} at {}",
                    volume.device.as_deref().unwrap_or("<unknown>"),
                    path
                );
                return Ok(ResolvedPath {
                    path: path.to_string(),
                    origin: PathOrigin::RemovableVolume,
                });
            }
        }

        match self.fallback.to_str().filter(|path| !path.is_empty()) {
            Some(path) => {
                info!("No removable volume mounted, using fallback {}", path);
                Ok(ResolvedPath {
                    path: path.to_string(),
                    origin: PathOrigin::Fallback,
                })
            }
            None => Err(ResolveError::NotFound),
        }
    }
}

/// First volume in enumeration order that is removable and has a usable directory
pub fn select_removable(volumes: &[StorageVolume]) -> Option<&StorageVolume> {
    volumes.iter().find(|volume| {
        let qualifies = volume.is_removable && volume.usable_directory().is_some();
        if !qualifies {
            debug!(
                "Skipping volume {:?} (removable: {}, directory: {:?})",
                volume.device, volume.is_removable, volume.directory
            );
        }
        qualifies
    })
}

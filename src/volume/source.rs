//! Volume enumeration sources
//!
//! The resolver depends on this capability rather than on a concrete OS binding.

use crate::error::ResolveError;
use crate::volume::types::StorageVolume;

/// Enumerates the storage volumes currently known to the system.
///
/// Implementations must return volumes in the order the system reports them.
/// A failure to perform the enumeration is reported as
/// [`ResolveError::ServiceUnavailable`].
pub trait StorageVolumeSource: Send + Sync {
    fn storage_volumes(&self) -> Result<Vec<StorageVolume>, ResolveError>;
}

/// Fixed, in-memory volume list
#[derive(Debug, Clone, Default)]
pub struct StaticVolumeSource {
    volumes: Vec<StorageVolume>,
}

impl StaticVolumeSource {
    pub fn new(volumes: Vec<StorageVolume>) -> Self {
        Self { volumes }
    }
}

impl StorageVolumeSource for StaticVolumeSource {
    fn storage_volumes(&self) -> Result<Vec<StorageVolume>, ResolveError> {
        Ok(self.volumes.clone())
    }
}

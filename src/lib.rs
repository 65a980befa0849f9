pub mod channel;
pub mod config;
pub mod error;
pub mod resolver;
pub mod utils;
pub mod volume;

pub use config::ResolverConfig;
pub use error::ResolveError;
pub use resolver::{ResolvedPath, VolumeResolver};
pub use volume::{MountInfoSource, StaticVolumeSource, StorageVolume, StorageVolumeSource};

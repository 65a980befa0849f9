//! Storage volumes
//!
//! Volume records and the sources that enumerate them.

pub mod mountinfo;
pub mod source;
pub mod types;

pub use mountinfo::MountInfoSource;
pub use source::{StaticVolumeSource, StorageVolumeSource};
pub use types::StorageVolume;

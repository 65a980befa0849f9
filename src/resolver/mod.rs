//! Volume resolution
//!
//! Picks the removable volume whose mount directory should be reported,
//! falling back to the default external-storage root.

mod operations;
mod results;

pub use operations::{VolumeResolver, select_removable};
pub use results::{PathOrigin, ResolvedPath};

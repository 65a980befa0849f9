//! Result types for volume resolution

use std::fmt;

/// Where a resolved path came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathOrigin {
    RemovableVolume,
    Fallback,
}

/// A resolved, non-empty filesystem path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    pub path: String,
    pub origin: PathOrigin,
}

impl ResolvedPath {
    pub fn as_str(&self) -> &str {
        &self.path
    }

    pub fn is_fallback(&self) -> bool {
        self.origin == PathOrigin::Fallback
    }
}

impl fmt::Display for ResolvedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

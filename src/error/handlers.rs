//! Error handlers
//!
//! Maps resolver errors onto channel error codes.

use crate::error::types::ResolveError;
use log::error;

/// Channel code for "no path could be determined"
pub const UNAVAILABLE: &str = "UNAVAILABLE";

/// Channel code for a failed enumeration service
pub const SERVICE_UNAVAILABLE: &str = "SERVICE_UNAVAILABLE";

/// Handle a resolver error
pub fn handle_error(err: &ResolveError) {
    error!("Volume resolution error: {}", err);
}

/// Convert error to channel error code
pub fn error_to_channel_code(err: &ResolveError) -> &'static str {
    match err {
        ResolveError::NotFound => UNAVAILABLE,
        ResolveError::ServiceUnavailable(_) => SERVICE_UNAVAILABLE,
    }
}

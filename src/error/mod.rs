//! Error handling
//!
//! Defines error types and handling for volume resolution.

pub mod handlers;
pub mod types;

pub use types::*;

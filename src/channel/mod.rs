//! Caller boundary
//!
//! Accepts method calls from the UI/CLI layer and answers with a single
//! success, error or not-implemented response.

pub mod commands;
pub mod handlers;
pub mod responses;

pub use commands::{CHANNEL_NAME, Method};
pub use handlers::handle_method_call;
pub use responses::{ChannelResponse, format_response};

//! Channel responses

use crate::error::ResolveError;
use crate::error::handlers::error_to_channel_code;

/// Outcome of a single method call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelResponse {
    Success(String),
    Error { code: String, message: String },
    NotImplemented,
}

impl ChannelResponse {
    pub fn error(code: &str, message: impl Into<String>) -> Self {
        ChannelResponse::Error {
            code: code.to_string(),
            message: message.into(),
        }
    }
}

impl From<ResolveError> for ChannelResponse {
    fn from(err: ResolveError) -> Self {
        ChannelResponse::error(error_to_channel_code(&err), err.to_string())
    }
}

/// Format a response as a single line
pub fn format_response(response: &ChannelResponse) -> String {
    match response {
        ChannelResponse::Success(value) => value.clone(),
        ChannelResponse::Error { code, message } => format!("{}: {}", code, message),
        ChannelResponse::NotImplemented => "NOT_IMPLEMENTED".to_string(),
    }
}

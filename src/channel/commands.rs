//! Channel methods

/// Name of the channel the methods are served on
pub const CHANNEL_NAME: &str = "usb_path_reader/usb";

/// A method call received on the channel.
///
/// Method names are matched case-sensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    GetUsbPath,
    ListVolumes,
    Unknown(String),
}

impl Method {
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "getUsbPath" => Method::GetUsbPath,
            "listVolumes" => Method::ListVolumes,
            other => Method::Unknown(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Method::GetUsbPath => "getUsbPath",
            Method::ListVolumes => "listVolumes",
            Method::Unknown(name) => name,
        }
    }
}

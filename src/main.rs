//! USB path resolver - Entry Point
//!
//! Answers a single channel method (default `getUsbPath`) and prints the result.

use log::{error, info};
use std::process::ExitCode;
use std::sync::Arc;

use usb_path_resolver::channel::{self, ChannelResponse, Method, format_response};
use usb_path_resolver::utils::logging::setup_logging;
use usb_path_resolver::{MountInfoSource, ResolverConfig, VolumeResolver};

#[tokio::main]
async fn main() -> ExitCode {
    setup_logging();

    let config = match ResolverConfig::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            eprintln!("configuration error: {}", e);
            return ExitCode::from(2);
        }
    };

    let method = Method::parse(
        &std::env::args()
            .nth(1)
            .unwrap_or_else(|| "getUsbPath".to_string()),
    );
    info!("{} <- {}", channel::CHANNEL_NAME, method.name());

    let source = MountInfoSource::from_config(&config);
    let resolver = Arc::new(VolumeResolver::new(source, config.fallback_path_buf()));

    let response =
        channel::handle_method_call(&method, resolver, config.enumeration_timeout()).await;

    match &response {
        ChannelResponse::Success(_) => {
            println!("{}", format_response(&response));
            ExitCode::SUCCESS
        }
        ChannelResponse::Error { .. } => {
            eprintln!("{}", format_response(&response));
            ExitCode::FAILURE
        }
        ChannelResponse::NotImplemented => {
            eprintln!("{}: {}", format_response(&response), method.name());
            ExitCode::from(2)
        }
    }
}

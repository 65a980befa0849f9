//! Channel method handlers
//!
//! Runs the blocking enumeration on the tokio blocking pool, bounded by a timeout.

use log::{info, warn};
use std::sync::Arc;
use std::time::Duration;

use crate::channel::commands::Method;
use crate::channel::responses::ChannelResponse;
use crate::error::ResolveError;
use crate::error::handlers::handle_error;
use crate::resolver::{VolumeResolver, select_removable};
use crate::volume::{StorageVolume, StorageVolumeSource};

/// Dispatch a single method call and produce its response
pub async fn handle_method_call<S>(
    method: &Method,
    resolver: Arc<VolumeResolver<S>>,
    timeout: Duration,
) -> ChannelResponse
where
    S: StorageVolumeSource + 'static,
{
    info!("Handling method call: {}", method.name());

    match method {
        Method::GetUsbPath => {
            match run_bounded(timeout, move || resolver.resolve_usb_path()).await {
                Ok(resolved) => ChannelResponse::Success(resolved.path),
                Err(e) => {
                    handle_error(&e);
                    ChannelResponse::from(e)
                }
            }
        }
        Method::ListVolumes => match run_bounded(timeout, move || resolver.volumes()).await {
            Ok(volumes) => ChannelResponse::Success(render_volume_list(&volumes)),
            Err(e) => {
                handle_error(&e);
                ChannelResponse::from(e)
            }
        },
        Method::Unknown(name) => {
            warn!("Method not implemented: {}", name);
            ChannelResponse::NotImplemented
        }
    }
}

/// Runs `f` on the blocking pool; an elapsed timeout or a panicked worker is a service failure
async fn run_bounded<T, F>(timeout: Duration, f: F) -> Result<T, ResolveError>
where
    F: FnOnce() -> Result<T, ResolveError> + Send + 'static,
    T: Send + 'static,
{
    match tokio::time::timeout(timeout, tokio::task::spawn_blocking(f)).await {
        Ok(Ok(result)) => result,
        Ok(Err(join_error)) => Err(ResolveError::ServiceUnavailable(format!(
            "enumeration worker failed: {}",
            join_error
        ))),
        Err(_) => Err(ResolveError::ServiceUnavailable(format!(
            "enumeration timed out after {} ms",
            timeout.as_millis()
        ))),
    }
}

/// One line per volume; the volume `getUsbPath` would pick is marked with `*`
pub fn render_volume_list(volumes: &[StorageVolume]) -> String {
    if volumes.is_empty() {
        return "(no volumes)".to_string();
    }

    let selected = select_removable(volumes);

    volumes
        .iter()
        .map(|volume| {
            let marker = if selected.is_some_and(|s| std::ptr::eq(s, volume)) {
                "*"
            } else {
                " "
            };
            format!(
                "{} {:<10} {:<8} {:<9} {:<12} {}",
                marker,
                volume.device.as_deref().unwrap_or("-"),
                volume.fs_type.as_deref().unwrap_or("-"),
                if volume.is_removable { "removable" } else { "fixed" },
                volume.uuid.as_deref().unwrap_or("-"),
                volume
                    .directory
                    .as_deref()
                    .map(|dir| dir.display().to_string())
                    .unwrap_or_else(|| "-".to_string()),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

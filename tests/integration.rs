use std::sync::Arc;
use std::time::Duration;

use usb_path_resolver::channel::{ChannelResponse, Method, handle_method_call};
use usb_path_resolver::resolver::PathOrigin;
use usb_path_resolver::{
    MountInfoSource, ResolveError, StaticVolumeSource, StorageVolume, StorageVolumeSource,
    VolumeResolver,
};

const FALLBACK: &str = "/storage/emulated/0";

// Helper to build a resolver over a fixed volume list
fn static_resolver(volumes: Vec<StorageVolume>) -> VolumeResolver<StaticVolumeSource> {
    VolumeResolver::new(StaticVolumeSource::new(volumes), FALLBACK)
}

#[test]
fn test_removable_after_fixed_volume() {
    let resolver = static_resolver(vec![
        StorageVolume::default(),
        StorageVolume::removable("/mnt/usb1"),
    ]);
    assert_eq!(resolver.resolve_usb_path().unwrap().as_str(), "/mnt/usb1");
}

#[test]
fn test_no_volumes_returns_fallback() {
    let resolved = static_resolver(vec![]).resolve_usb_path().unwrap();
    assert_eq!(resolved.as_str(), FALLBACK);
    assert!(!resolved.as_str().is_empty());
}

#[test]
fn test_fixed_volumes_only_returns_fallback() {
    let resolver = static_resolver(vec![
        StorageVolume::fixed("/"),
        StorageVolume::fixed("/home"),
    ]);
    let resolved = resolver.resolve_usb_path().unwrap();
    assert_eq!(resolved.origin, PathOrigin::Fallback);
}

#[test]
fn test_uuid_only_volume_returns_fallback() {
    let volume = StorageVolume {
        is_removable: true,
        uuid: Some("ABCD-1234".into()),
        directory: None,
        ..StorageVolume::default()
    };
    let resolved = static_resolver(vec![volume]).resolve_usb_path().unwrap();
    assert_eq!(resolved.as_str(), FALLBACK);
}

#[test]
fn test_first_removable_in_enumeration_order() {
    let resolver = static_resolver(vec![
        StorageVolume::removable("/media/b"),
        StorageVolume::removable("/media/a"),
    ]);
    assert_eq!(resolver.resolve_usb_path().unwrap().as_str(), "/media/b");
}

#[test]
fn test_repeated_calls_are_idempotent() {
    let resolver = static_resolver(vec![
        StorageVolume::fixed("/"),
        StorageVolume::removable("/mnt/usb1"),
    ]);
    let first = resolver.resolve_usb_path().unwrap();
    for _ in 0..5 {
        assert_eq!(resolver.resolve_usb_path().unwrap(), first);
    }
}

struct UnavailableSource;

impl StorageVolumeSource for UnavailableSource {
    fn storage_volumes(&self) -> Result<Vec<StorageVolume>, ResolveError> {
        Err(ResolveError::ServiceUnavailable("permission denied".into()))
    }
}

#[test]
fn test_service_failure_is_distinct_from_not_found() {
    let resolver = VolumeResolver::new(UnavailableSource, FALLBACK);
    let err = resolver.resolve_usb_path().unwrap_err();
    assert_eq!(
        err,
        ResolveError::ServiceUnavailable("permission denied".into())
    );
}

#[tokio::test]
async fn test_channel_reports_service_failure() {
    let resolver = Arc::new(VolumeResolver::new(UnavailableSource, FALLBACK));
    let response = handle_method_call(&Method::GetUsbPath, resolver, Duration::from_secs(1)).await;
    match response {
        ChannelResponse::Error { code, .. } => assert_eq!(code, "SERVICE_UNAVAILABLE"),
        other => panic!("unexpected response {:?}", other),
    }
}

#[tokio::test]
async fn test_channel_reports_unavailable_without_path() {
    let resolver = Arc::new(VolumeResolver::new(StaticVolumeSource::default(), ""));
    let response = handle_method_call(&Method::GetUsbPath, resolver, Duration::from_secs(1)).await;
    assert_eq!(
        response,
        ChannelResponse::Error {
            code: "UNAVAILABLE".into(),
            message: "USB Path not available.".into(),
        }
    );
}

// Fake procfs/sysfs layout: sda1 on a SATA disk, sdb1 on a USB stick
#[cfg(unix)]
mod mountinfo {
    use super::*;
    use std::fs;
    use std::os::unix::fs::symlink;
    use std::path::Path;
    use tempfile::TempDir;

    const MOUNTINFO: &str = "\
22 1 8:1 / / rw,relatime shared:1 - ext4 /dev/sda1 rw
25 22 0:21 / /proc rw,nosuid - proc proc rw
31 22 0:45 / /run/user/1000 rw - tmpfs tmpfs rw
48 22 8:17 / /media/user/MY\\040STICK rw,nosuid,nodev shared:40 - vfat /dev/sdb1 rw,uid=1000
";

    fn add_block_device(root: &Path, dev: &str, device_path: &str, disk_removable: &str) {
        let device_dir = root.join("sys/devices").join(device_path);
        fs::create_dir_all(&device_dir).unwrap();
        fs::create_dir_all(root.join("sys/dev/block")).unwrap();
        fs::create_dir_all(root.join("sys/class/block")).unwrap();
        fs::write(device_dir.join("partition"), "1\n").unwrap();
        fs::write(
            device_dir.parent().unwrap().join("removable"),
            disk_removable,
        )
        .unwrap();
        symlink(&device_dir, root.join("sys/dev/block").join(dev)).unwrap();
        symlink(
            &device_dir,
            root.join("sys/class/block")
                .join(device_dir.file_name().unwrap()),
        )
        .unwrap();
    }

    fn fake_system(mountinfo: impl AsRef<[u8]>) -> (TempDir, MountInfoSource) {
        let dir = TempDir::new().unwrap();
        let root = dir.path();

        fs::write(root.join("mountinfo"), mountinfo).unwrap();
        add_block_device(root, "8:1", "pci0000:00/ata1/host0/block/sda/sda1", "0\n");
        add_block_device(
            root,
            "8:17",
            "pci0000:00/usb1/1-1/1-1:1.0/host6/block/sdb/sdb1",
            "1\n",
        );

        let uuid_dir = root.join("by-uuid");
        fs::create_dir_all(&uuid_dir).unwrap();
        symlink("../../sda1", uuid_dir.join("0f3c-root")).unwrap();
        symlink("../../sdb1", uuid_dir.join("ABCD-1234")).unwrap();

        let source = MountInfoSource::new(root.join("mountinfo"), root.join("sys"), uuid_dir);
        (dir, source)
    }

    #[test]
    fn test_enumerates_block_devices_in_order() {
        let (_dir, source) = fake_system(MOUNTINFO);
        let volumes = source.storage_volumes().unwrap();

        assert_eq!(volumes.len(), 2);
        assert_eq!(volumes[0].device.as_deref(), Some("sda1"));
        assert!(!volumes[0].is_removable);
        assert_eq!(volumes[1].device.as_deref(), Some("sdb1"));
        assert!(volumes[1].is_removable);
        assert_eq!(volumes[1].uuid.as_deref(), Some("ABCD-1234"));
        assert_eq!(volumes[1].fs_type.as_deref(), Some("vfat"));
    }

    #[test]
    fn test_resolves_usb_stick_mount_point() {
        let (_dir, source) = fake_system(MOUNTINFO);
        let resolver = VolumeResolver::new(source, FALLBACK);

        assert_eq!(
            resolver.resolve_usb_path().unwrap().as_str(),
            "/media/user/MY STICK"
        );
    }

    #[test]
    fn test_unplugged_stick_falls_back() {
        let only_root = "22 1 8:1 / / rw,relatime shared:1 - ext4 /dev/sda1 rw\n";
        let (_dir, source) = fake_system(only_root);
        let resolver = VolumeResolver::new(source, FALLBACK);

        let resolved = resolver.resolve_usb_path().unwrap();
        assert_eq!(resolved.as_str(), FALLBACK);
        assert!(resolved.is_fallback());
    }

    #[test]
    fn test_usb_bus_counts_as_removable() {
        let (dir, source) = fake_system(MOUNTINFO);
        // USB disks that report removable=0 (external SSDs) still sit on the USB bus
        fs::write(
            dir.path()
                .join("sys/devices/pci0000:00/usb1/1-1/1-1:1.0/host6/block/sdb/removable"),
            "0\n",
        )
        .unwrap();

        let volumes = source.storage_volumes().unwrap();
        assert!(volumes[1].is_removable);
    }

    #[test]
    fn test_missing_mountinfo_is_service_unavailable() {
        let dir = TempDir::new().unwrap();
        let source = MountInfoSource::new(
            dir.path().join("does-not-exist"),
            dir.path().join("sys"),
            dir.path().join("by-uuid"),
        );

        let err = VolumeResolver::new(source, FALLBACK)
            .resolve_usb_path()
            .unwrap_err();
        assert!(matches!(err, ResolveError::ServiceUnavailable(_)));
    }

    #[test]
    fn test_non_utf8_mount_point_does_not_hide_usb_stick() {
        let mut mountinfo = b"22 1 8:1 / /mnt/caf".to_vec();
        mountinfo.push(0xe9);
        mountinfo.extend_from_slice(
            b" rw,relatime - ext4 /dev/sda1 rw\n\
48 22 8:17 / /media/usb rw,nosuid - vfat /dev/sdb1 rw\n",
        );
        let (_dir, source) = fake_system(mountinfo);

        let volumes = source.storage_volumes().unwrap();
        assert_eq!(volumes.len(), 2);
        assert_eq!(volumes[0].usable_directory(), None);

        let resolver = VolumeResolver::new(source, FALLBACK);
        assert_eq!(resolver.resolve_usb_path().unwrap().as_str(), "/media/usb");
    }

    #[test]
    fn test_non_utf8_usb_mount_point_is_skipped() {
        let mut mountinfo = b"48 22 8:17 / /media/caf".to_vec();
        mountinfo.push(0xe9);
        mountinfo.extend_from_slice(b" rw,nosuid - vfat /dev/sdb1 rw\n");
        let (_dir, source) = fake_system(mountinfo);

        let resolved = VolumeResolver::new(source, FALLBACK)
            .resolve_usb_path()
            .unwrap();
        assert!(resolved.is_fallback());
    }

    #[test]
    fn test_btrfs_anonymous_device_resolved_through_source() {
        let btrfs = "22 1 8:1 / / rw,relatime - ext4 /dev/sda1 rw\n\
60 22 0:52 / /media/user/backup rw,nosuid - btrfs /dev/sdb1 rw,subvol=/\n";
        let (_dir, source) = fake_system(btrfs);

        let volumes = source.storage_volumes().unwrap();
        assert_eq!(volumes.len(), 2);
        assert_eq!(volumes[1].device.as_deref(), Some("sdb1"));
        assert!(volumes[1].is_removable);

        let resolver = VolumeResolver::new(source, FALLBACK);
        assert_eq!(
            resolver.resolve_usb_path().unwrap().as_str(),
            "/media/user/backup"
        );
    }

    #[test]
    fn test_missing_uuid_dir_leaves_uuid_empty() {
        let (dir, source) = fake_system(MOUNTINFO);
        fs::remove_dir_all(dir.path().join("by-uuid")).unwrap();

        let volumes = source.storage_volumes().unwrap();
        assert!(volumes.iter().all(|v| v.uuid.is_none()));
    }

    #[tokio::test]
    async fn test_list_volumes_marks_usb_stick() {
        let (_dir, source) = fake_system(MOUNTINFO);
        let resolver = Arc::new(VolumeResolver::new(source, FALLBACK));

        let response =
            handle_method_call(&Method::ListVolumes, resolver, Duration::from_secs(1)).await;
        let listing = match response {
            ChannelResponse::Success(listing) => listing,
            other => panic!("unexpected response {:?}", other),
        };
        let marked: Vec<&str> = listing.lines().filter(|l| l.starts_with('*')).collect();
        assert_eq!(marked.len(), 1);
        assert!(marked[0].contains("sdb1"));
    }
}

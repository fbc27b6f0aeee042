//! Locating the mounted sync drive by its volume label.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::SyncSettings;
use crate::error::SyncError;

/// Mount point of the first volume labeled `settings.volume_label`.
pub fn find_volume(settings: &SyncSettings) -> Result<PathBuf, SyncError> {
    let label = settings.volume_label.as_str();
    let found = platform::find(label, &settings.media_roots)?;
    match found {
        Some(path) => {
            log::info!("found {label} drive at {}", path.display());
            Ok(path)
        }
        None => {
            log::debug!("no {label} drive mounted");
            Err(SyncError::VolumeNotFound(label.to_string()))
        }
    }
}

#[cfg(target_os = "linux")]
mod platform {
    use std::fs;
    use std::path::{Path, PathBuf};

    use crate::error::SyncError;

    /// Where udev publishes filesystem labels.
    const BY_LABEL_DIR: &str = "/dev/disk/by-label";

    pub(super) fn find(label: &str, media_roots: &[PathBuf]) -> Result<Option<PathBuf>, SyncError> {
        let mounts = fs::read_to_string("/proc/self/mounts").unwrap_or_else(|e| {
            log::debug!("cannot read /proc/self/mounts: {e}");
            String::new()
        });

        if let Some(device) = super::device_with_label(Path::new(BY_LABEL_DIR), label) {
            if let Some(path) = super::mount_point_of(&mounts, &device, canonical_device) {
                return Ok(Some(path));
            }
            log::debug!("{label} is {} but it is not mounted", device.display());
        }

        // Unlabelled setups (no udev) still work when the mount point is
        // named after the label.
        if let Some(path) = super::mounts_with_label(&mounts, label).into_iter().next() {
            return Ok(Some(path));
        }
        Ok(super::scan_media_roots(media_roots, label, super::is_mount_point))
    }

    fn canonical_device(source: &Path) -> PathBuf {
        if source.starts_with("/dev") {
            fs::canonicalize(source).unwrap_or_else(|_| source.to_path_buf())
        } else {
            source.to_path_buf()
        }
    }
}

#[cfg(target_os = "macos")]
mod platform {
    use std::path::{Path, PathBuf};

    use crate::error::SyncError;

    pub(super) fn find(label: &str, _media_roots: &[PathBuf]) -> Result<Option<PathBuf>, SyncError> {
        let path = Path::new("/Volumes").join(label);
        Ok((path.is_dir() && super::is_mount_point(&path)).then_some(path))
    }
}

#[cfg(all(unix, not(any(target_os = "linux", target_os = "macos"))))]
mod platform {
    use std::path::PathBuf;

    use crate::error::SyncError;

    pub(super) fn find(label: &str, media_roots: &[PathBuf]) -> Result<Option<PathBuf>, SyncError> {
        Ok(super::scan_media_roots(media_roots, label, super::is_mount_point))
    }
}

#[cfg(target_os = "windows")]
mod platform {
    use std::{
        ffi::OsString,
        os::windows::ffi::{OsStrExt, OsStringExt},
        path::PathBuf,
    };

    use windows::{
        Win32::{
            Foundation::MAX_PATH,
            Storage::FileSystem::{GetLogicalDriveStringsW, GetVolumeInformationW},
        },
        core::PCWSTR,
    };

    use crate::error::SyncError;

    pub(super) fn find(label: &str, _media_roots: &[PathBuf]) -> Result<Option<PathBuf>, SyncError> {
        Ok(drives_with_labels()?
            .into_iter()
            .find(|(_, l)| l == label)
            .map(|(path, _)| path))
    }

    fn drives_with_labels() -> Result<Vec<(PathBuf, String)>, SyncError> {
        let mut buffer: [u16; 256] = [0; 256];
        let len = unsafe { GetLogicalDriveStringsW(Some(&mut buffer)) } as usize;
        if len == 0 {
            return Err(SyncError::Detection("failed to list logical drives".into()));
        }
        let len = len.min(buffer.len());

        let mut drives = Vec::new();
        let mut start = 0;
        while start < len {
            let end = buffer[start..len]
                .iter()
                .position(|&c| c == 0)
                .map_or(len, |p| p + start);
            if end == start {
                break;
            }
            let drive = OsString::from_wide(&buffer[start..end]);
            start = end + 1;

            let mut name: [u16; MAX_PATH as usize + 1] = [0; MAX_PATH as usize + 1];
            let drive_w: Vec<u16> = drive.encode_wide().chain(Some(0)).collect();
            let info = unsafe {
                GetVolumeInformationW(
                    PCWSTR(drive_w.as_ptr()),
                    Some(&mut name),
                    None,
                    None,
                    None,
                    None,
                )
            };

            // Empty card readers and the like fail here.
            if info.is_ok() {
                let label = OsString::from_wide(&name)
                    .to_string_lossy()
                    .trim_end_matches('\0')
                    .to_string();
                drives.push((PathBuf::from(drive), label));
            }
        }
        Ok(drives)
    }
}

/// Block device holding the filesystem labelled `label`, found through the
/// udev symlink under `by_label_dir`.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
pub(crate) fn device_with_label(by_label_dir: &Path, label: &str) -> Option<PathBuf> {
    fs::canonicalize(by_label_dir.join(udev_encode(label))).ok()
}

/// udev's escaping of label characters it considers unsafe in a file name.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn udev_encode(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    for c in label.chars() {
        if c.is_ascii_alphanumeric() || "#+-.:=@_".contains(c) || !c.is_ascii() {
            out.push(c);
        } else {
            out.push_str(&format!("\\x{:02x}", u32::from(c)));
        }
    }
    out
}

/// Mount point of `device` in `/proc/self/mounts` content. Each source is
/// passed through `canonical` first, as it may itself be a symlink.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
pub(crate) fn mount_point_of(
    mounts: &str,
    device: &Path,
    canonical: impl Fn(&Path) -> PathBuf,
) -> Option<PathBuf> {
    mounts.lines().find_map(|line| {
        let mut fields = line.split_whitespace();
        let source = PathBuf::from(unescape_mount_path(fields.next()?));
        let target = fields.next()?;
        (canonical(&source) == device).then(|| PathBuf::from(unescape_mount_path(target)))
    })
}

/// Mount points in `/proc/self/mounts` content whose last path component is
/// exactly `label`.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
pub(crate) fn mounts_with_label(mounts: &str, label: &str) -> Vec<PathBuf> {
    mounts
        .lines()
        .filter_map(|line| line.split_whitespace().nth(1))
        .map(|raw| PathBuf::from(unescape_mount_path(raw)))
        .filter(|path| path.file_name().is_some_and(|n| n == label))
        .collect()
}

/// Undo the kernel's octal escaping (`\040` for space and so on).
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn unescape_mount_path(raw: &str) -> String {
    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\\' && i + 4 <= bytes.len() {
            let digits = &bytes[i + 1..i + 4];
            if digits.iter().all(|d| (b'0'..=b'7').contains(d)) {
                let v = digits.iter().fold(0u32, |acc, d| acc * 8 + u32::from(d - b'0'));
                if let Ok(v) = u8::try_from(v) {
                    out.push(v);
                    i += 4;
                    continue;
                }
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Look for a `label` directory directly under each root, then one level
/// further down (`/media/<user>/<label>`), accepting the first that
/// `is_mount` confirms.
#[cfg_attr(any(target_os = "macos", windows), allow(dead_code))]
pub(crate) fn scan_media_roots(
    roots: &[PathBuf],
    label: &str,
    is_mount: impl Fn(&Path) -> bool,
) -> Option<PathBuf> {
    for root in roots {
        let direct = root.join(label);
        if direct.is_dir() && is_mount(&direct) {
            return Some(direct);
        }

        for dir in subdirs(root) {
            let candidate = dir.join(label);
            if candidate.is_dir() && is_mount(&candidate) {
                return Some(candidate);
            }
        }
    }
    None
}

fn subdirs(root: &Path) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(root) else {
        return Vec::new();
    };
    let mut dirs: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .collect();
    dirs.sort();
    dirs
}

/// A directory is a mount point when it sits on a different device than
/// its parent.
#[cfg(unix)]
pub(crate) fn is_mount_point(path: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;

    let Ok(meta) = fs::metadata(path) else {
        return false;
    };
    let parent = path.parent().unwrap_or(path);
    match fs::metadata(parent) {
        Ok(parent_meta) => meta.dev() != parent_meta.dev() || meta.ino() == parent_meta.ino(),
        Err(_) => false,
    }
}

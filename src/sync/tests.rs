use super::progress::{CancelToken, SyncEvent};
use super::reconcile::reconcile;
use super::volume::{device_with_label, mount_point_of, mounts_with_label, scan_media_roots};
use super::*;
use crate::config::{LibrarySettings, SyncSettings};
use crate::error::SyncError;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::{Duration, Instant};
use tempfile::tempdir;

fn write(path: &Path, content: &[u8]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn run(drive: &Path, local: &Path) -> Result<SyncReport, SyncError> {
    reconcile(
        drive,
        "music",
        local,
        &LibrarySettings::default(),
        &CancelToken::new(),
        None,
    )
}

#[test]
fn drive_without_music_folder_is_bootstrapped() {
    let drive = tempdir().unwrap();
    let local = tempdir().unwrap();
    write(&local.path().join("Albums/x.mp3"), b"local");

    let report = run(drive.path(), local.path()).unwrap();

    assert_eq!(
        report,
        SyncReport::Bootstrapped {
            drive: drive.path().to_path_buf()
        }
    );
    for folder in ["Albums", "Artists", "Playlists"] {
        assert!(drive.path().join("music").join(folder).is_dir());
    }
    // Nothing crosses in either direction on first use.
    assert_eq!(fs::read_dir(drive.path().join("music/Albums")).unwrap().count(), 0);
    assert_eq!(fs::read(local.path().join("Albums/x.mp3")).unwrap(), b"local");
}

#[test]
fn merge_copies_missing_audio_and_never_overwrites() {
    let drive = tempdir().unwrap();
    let local = tempdir().unwrap();
    let music = drive.path().join("music");
    write(&music.join("Albums/Blue/01.mp3"), b"drive one");
    write(&music.join("Albums/Blue/02.MP3"), b"drive two");
    write(&music.join("Albums/Blue/cover.jpg"), b"jpeg");
    write(&music.join("Albums/Blue/Disc 2/01.mp3"), b"disc two");
    write(&music.join("Artists/Someone/song.mp3"), b"artist song");
    write(&music.join("Playlists/road.mp3"), b"road");
    write(&local.path().join("Albums/Blue/01.mp3"), b"my own edit");

    let report = run(drive.path(), local.path()).unwrap();

    let SyncReport::Merged {
        files_copied,
        skipped,
        ..
    } = report
    else {
        panic!("expected a merge, got {report:?}");
    };
    assert_eq!(files_copied, 4);
    assert!(skipped.is_empty());

    let l = local.path();
    assert_eq!(fs::read(l.join("Albums/Blue/01.mp3")).unwrap(), b"my own edit");
    assert_eq!(fs::read(l.join("Albums/Blue/02.MP3")).unwrap(), b"drive two");
    assert_eq!(fs::read(l.join("Albums/Blue/Disc 2/01.mp3")).unwrap(), b"disc two");
    assert_eq!(fs::read(l.join("Artists/Someone/song.mp3")).unwrap(), b"artist song");
    assert_eq!(fs::read(l.join("Playlists/road.mp3")).unwrap(), b"road");
    assert!(!l.join("Albums/Blue/cover.jpg").exists());

    // Drive side is read only.
    assert_eq!(fs::read(music.join("Albums/Blue/01.mp3")).unwrap(), b"drive one");
}

#[test]
fn merge_mirrors_empty_directories() {
    let drive = tempdir().unwrap();
    let local = tempdir().unwrap();
    let music = drive.path().join("music");
    fs::create_dir_all(music.join("Albums/Empty/Nested")).unwrap();
    fs::create_dir_all(music.join("Artists")).unwrap();
    fs::create_dir_all(music.join("Playlists")).unwrap();

    let report = run(drive.path(), local.path()).unwrap();

    assert!(local.path().join("Albums/Empty/Nested").is_dir());
    assert!(matches!(
        report,
        SyncReport::Merged { files_copied: 0, dirs_created, .. } if dirs_created >= 2
    ));
}

#[test]
fn second_sync_copies_nothing() {
    let drive = tempdir().unwrap();
    let local = tempdir().unwrap();
    write(&drive.path().join("music/Albums/a.mp3"), b"a");

    run(drive.path(), local.path()).unwrap();
    let again = run(drive.path(), local.path()).unwrap();

    assert!(matches!(
        again,
        SyncReport::Merged {
            files_copied: 0,
            dirs_created: 0,
            ..
        }
    ));
}

#[test]
fn missing_drive_folder_is_skipped() {
    let drive = tempdir().unwrap();
    let local = tempdir().unwrap();
    write(&drive.path().join("music/Albums/a.mp3"), b"a");

    let report = run(drive.path(), local.path()).unwrap();

    match report {
        SyncReport::Merged {
            files_copied,
            skipped,
            ..
        } => {
            assert_eq!(files_copied, 1);
            assert_eq!(skipped, vec!["Artists".to_string(), "Playlists".to_string()]);
        }
        other => panic!("expected a merge, got {other:?}"),
    }
    assert!(local.path().join("Albums/a.mp3").is_file());
    assert!(!local.path().join("Artists").exists());
}

#[test]
fn custom_drive_music_dir_is_honoured() {
    let drive = tempdir().unwrap();
    let local = tempdir().unwrap();
    write(&drive.path().join("Tunes/Albums/a.mp3"), b"a");

    let report = reconcile(
        drive.path(),
        "Tunes",
        local.path(),
        &LibrarySettings::default(),
        &CancelToken::new(),
        None,
    )
    .unwrap();

    assert!(matches!(report, SyncReport::Merged { files_copied: 1, .. }));
    assert!(!drive.path().join("music").exists());
}

#[test]
fn cancelled_sync_stops_before_copying() {
    let drive = tempdir().unwrap();
    let local = tempdir().unwrap();
    write(&drive.path().join("music/Albums/a.mp3"), b"a");
    write(&drive.path().join("music/Albums/b.mp3"), b"b");
    let cancel = CancelToken::new();
    cancel.clone().cancel();

    let err = reconcile(
        drive.path(),
        "music",
        local.path(),
        &LibrarySettings::default(),
        &cancel,
        None,
    )
    .unwrap_err();

    assert!(matches!(err, SyncError::Cancelled));
    assert!(!local.path().join("Albums/a.mp3").exists());
    assert!(!local.path().join("Albums/b.mp3").exists());
}

#[test]
fn progress_reports_each_copy() {
    let drive = tempdir().unwrap();
    let local = tempdir().unwrap();
    write(&drive.path().join("music/Albums/a.mp3"), b"a");
    write(&drive.path().join("music/Playlists/b.mp3"), b"b");
    let (tx, rx) = mpsc::channel();

    reconcile(
        drive.path(),
        "music",
        local.path(),
        &LibrarySettings::default(),
        &CancelToken::new(),
        Some(&tx),
    )
    .unwrap();
    drop(tx);

    let events: Vec<(PathBuf, usize)> = rx
        .iter()
        .map(|e| match e {
            SyncEvent::Copied { path, copied } => (path, copied),
            SyncEvent::Finished(_) => panic!("reconcile does not send Finished"),
        })
        .collect();
    assert_eq!(
        events,
        vec![(PathBuf::from("a.mp3"), 1), (PathBuf::from("b.mp3"), 2)]
    );
}

#[test]
fn mounts_are_matched_on_exact_last_component() {
    let mounts = "\
/dev/sda1 / ext4 rw 0 0
/dev/sdb1 /media/pi/PIPOD2 vfat rw 0 0
/dev/sdc1 /media/pi/MY\\040PIPOD vfat rw 0 0
/dev/sdd1 /media/pi/PIPOD vfat rw 0 0
";
    assert_eq!(
        mounts_with_label(mounts, "PIPOD"),
        vec![PathBuf::from("/media/pi/PIPOD")]
    );
    assert_eq!(
        mounts_with_label(mounts, "MY PIPOD"),
        vec![PathBuf::from("/media/pi/MY PIPOD")]
    );
    assert!(mounts_with_label("", "PIPOD").is_empty());
}

#[test]
fn labelled_device_is_found_wherever_it_is_mounted() {
    let mounts = "\
/dev/sda1 / ext4 rw 0 0
/dev/disk/by-uuid/1234 /mnt/usb vfat rw 0 0
/dev/sdc1 /mnt/My\\040Stick vfat rw 0 0
";
    let resolve = |p: &Path| {
        if p == Path::new("/dev/disk/by-uuid/1234") {
            PathBuf::from("/dev/sdb1")
        } else {
            p.to_path_buf()
        }
    };

    assert_eq!(
        mount_point_of(mounts, Path::new("/dev/sdb1"), resolve),
        Some(PathBuf::from("/mnt/usb"))
    );
    assert_eq!(
        mount_point_of(mounts, Path::new("/dev/sdc1"), resolve),
        Some(PathBuf::from("/mnt/My Stick"))
    );
    assert_eq!(mount_point_of(mounts, Path::new("/dev/sdz9"), resolve), None);
}

#[cfg(unix)]
#[test]
fn label_symlinks_resolve_to_their_device() {
    let root = tempdir().unwrap();
    let dev = root.path().join("dev");
    let by_label = root.path().join("by-label");
    fs::create_dir_all(&dev).unwrap();
    fs::create_dir_all(&by_label).unwrap();
    fs::write(dev.join("sdb1"), b"").unwrap();
    fs::write(dev.join("sdc1"), b"").unwrap();
    std::os::unix::fs::symlink(dev.join("sdb1"), by_label.join("PIPOD")).unwrap();
    std::os::unix::fs::symlink(dev.join("sdc1"), by_label.join("MY\\x20POD")).unwrap();

    let sdb1 = fs::canonicalize(dev.join("sdb1")).unwrap();
    let sdc1 = fs::canonicalize(dev.join("sdc1")).unwrap();
    assert_eq!(device_with_label(&by_label, "PIPOD"), Some(sdb1));
    assert_eq!(device_with_label(&by_label, "MY POD"), Some(sdc1));
    assert_eq!(device_with_label(&by_label, "OTHER"), None);
}

#[test]
fn media_roots_are_scanned_one_and_two_levels_deep() {
    let root = tempdir().unwrap();
    let media = root.path().join("media");
    let mnt = root.path().join("mnt");
    fs::create_dir_all(media.join("pi/PIPOD")).unwrap();
    fs::create_dir_all(mnt.join("PIPOD")).unwrap();
    let roots = vec![root.path().join("missing"), media.clone(), mnt.clone()];

    assert_eq!(
        scan_media_roots(&roots, "PIPOD", |_| true),
        Some(media.join("pi/PIPOD"))
    );
    assert_eq!(
        scan_media_roots(&roots, "PIPOD", |p| p.starts_with(&mnt)),
        Some(mnt.join("PIPOD"))
    );
    assert_eq!(scan_media_roots(&roots, "PIPOD", |_| false), None);
    assert_eq!(scan_media_roots(&roots, "OTHER", |_| true), None);
}

#[cfg(unix)]
#[test]
fn plain_directory_is_not_a_mount_point() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("PIPOD");
    fs::create_dir(&sub).unwrap();
    assert!(!super::volume::is_mount_point(&sub));
    assert!(super::volume::is_mount_point(Path::new("/")));
}

#[test]
fn cancel_token_clones_share_state() {
    let token = CancelToken::new();
    let clone = token.clone();
    assert!(!token.is_cancelled());
    clone.cancel();
    assert!(token.is_cancelled());
}

#[test]
fn background_job_reports_missing_drive() {
    let empty = tempdir().unwrap();
    let local = tempdir().unwrap();
    let settings = SyncSettings {
        volume_label: "PIPOD_TEST_NO_SUCH_VOLUME".into(),
        media_roots: vec![empty.path().to_path_buf()],
        ..SyncSettings::default()
    };

    let mut job = SyncJob::spawn(settings, LibrarySettings::default(), local.path().to_path_buf())
        .unwrap();

    let deadline = Instant::now() + Duration::from_secs(10);
    let result = loop {
        match job.poll() {
            SyncPoll::Finished(result) => break result,
            SyncPoll::Running { .. } => {
                assert!(Instant::now() < deadline, "sync job never finished");
                std::thread::sleep(Duration::from_millis(10));
            }
        }
    };
    assert!(matches!(result, Err(SyncError::VolumeNotFound(label)) if label == "PIPOD_TEST_NO_SUCH_VOLUME"));
}

//! Snapshot watcher: reloads the channel file when it changes on disk.
//!
//! The parent directory is watched rather than the file itself, so a fetcher
//! that replaces the snapshot by renaming a temp file over it is still seen.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::RecursiveMode;
use notify_debouncer_full::{new_debouncer, DebounceEventResult};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use chan_proto::channel::ChannelSnapshot;

use crate::app::AppMessage;

/// True when one of `paths` names the snapshot file.
pub fn touches_snapshot(paths: &[PathBuf], snapshot: &Path) -> bool {
    let Some(name) = snapshot.file_name() else {
        return false;
    };
    paths.iter().any(|p| p.file_name() == Some(name))
}

/// Load `path` and wrap the outcome for the event loop.
pub fn reload(path: &Path) -> AppMessage {
    match ChannelSnapshot::load(path) {
        Ok(snapshot) => AppMessage::SnapshotLoaded(snapshot),
        Err(e) => {
            warn!("snapshot reload failed: {}", e);
            AppMessage::SnapshotError(e.to_string())
        }
    }
}

fn watch_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Watch `path` and send `SnapshotLoaded` / `SnapshotError` after each burst
/// of changes settles for `debounce`. Stops once the receiver is dropped.
pub fn spawn(path: PathBuf, debounce: Duration, tx: mpsc::Sender<AppMessage>) {
    tokio::task::spawn_blocking(move || run(path, debounce, tx));
}

fn run(path: PathBuf, debounce: Duration, tx: mpsc::Sender<AppMessage>) {
    let handler_tx = tx.clone();
    let snapshot = path.clone();

    let debouncer_result = new_debouncer(debounce, None, move |result: DebounceEventResult| {
        match result {
            Ok(events) => {
                let changed = events
                    .iter()
                    .any(|event| !event.kind.is_access() && touches_snapshot(&event.paths, &snapshot));
                if !changed {
                    return;
                }
                debug!("snapshot {} changed, reloading", snapshot.display());
                let _ = handler_tx.blocking_send(reload(&snapshot));
            }
            Err(errors) => {
                for error in errors {
                    warn!("snapshot watcher error: {:?}", error);
                }
            }
        }
    });

    let mut debouncer = match debouncer_result {
        Ok(d) => d,
        Err(e) => {
            error!("failed to create snapshot watcher: {}", e);
            return;
        }
    };

    let dir = watch_dir(&path);
    if let Err(e) = debouncer.watch(&dir, RecursiveMode::NonRecursive) {
        error!("failed to watch {}: {}", dir.display(), e);
        return;
    }
    info!("watching {}", path.display());

    while !tx.is_closed() {
        std::thread::sleep(Duration::from_millis(100));
    }
    info!("snapshot watcher stopping");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touches_snapshot_by_file_name() {
        let snapshot = Path::new("/data/channels.json");
        assert!(touches_snapshot(
            &[PathBuf::from("/data/channels.json")],
            snapshot
        ));
        assert!(touches_snapshot(
            &[
                PathBuf::from("/data/channels.json.tmp"),
                PathBuf::from("/data/channels.json"),
            ],
            snapshot
        ));
        assert!(!touches_snapshot(
            &[PathBuf::from("/data/channels.json.tmp")],
            snapshot
        ));
        assert!(!touches_snapshot(&[], snapshot));
    }

    #[test]
    fn test_watch_dir() {
        assert_eq!(
            watch_dir(Path::new("/data/channels.json")),
            PathBuf::from("/data")
        );
        assert_eq!(watch_dir(Path::new("channels.json")), PathBuf::from("."));
    }

    #[test]
    fn test_reload_reports_bad_file() {
        let msg = reload(Path::new("/nonexistent/chandash/channels.json"));
        assert!(matches!(msg, AppMessage::SnapshotError(_)));
    }
}

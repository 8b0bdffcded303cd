//! # External change watcher
//!
//! Watches the notes root and its immediate hierarchy for modifications made
//! by other programs, and forwards a unit signal per interesting event over
//! an [`mpsc`] channel. Debouncing and reloading are the orchestrator's job
//! ([`crate::notestore::NoteStore::pump`]); this module only answers "did
//! anything out there move?".
//!
//! Each directory gets its own non-recursive watch: the root plus every
//! non-hidden subdirectory found at start time. A directory created after
//! that is not watched until [`ChangeWatcher::refresh`] runs, which the
//! orchestrator does whenever its own rescan discovers new folders.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use walkdir::WalkDir;

use crate::error::{NotaError, Result};

/// One external filesystem change was observed. Carries no detail: the
/// response to any change is the same debounced rescan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeSignal;

pub struct ChangeWatcher {
    watcher: Option<RecommendedWatcher>,
    signals: Sender<ChangeSignal>,
    watched: Vec<PathBuf>,
    root: Option<PathBuf>,
}

impl ChangeWatcher {
    /// Create a watcher and the receiving end of its signal channel. The
    /// watcher is idle until [`start`](Self::start) is called.
    pub fn new() -> (Self, Receiver<ChangeSignal>) {
        let (tx, rx) = mpsc::channel();
        (
            ChangeWatcher {
                watcher: None,
                signals: tx,
                watched: Vec::new(),
                root: None,
            },
            rx,
        )
    }

    /// Begin watching `root` and its current non-hidden subdirectories.
    /// Replaces any previous watch set.
    pub fn start(&mut self, root: &Path) -> Result<()> {
        self.stop();

        let signals = self.signals.clone();
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            match res {
                Ok(event) => {
                    if is_interesting(&event.kind) {
                        // Receiver gone means the store is shutting down.
                        let _ = signals.send(ChangeSignal);
                    }
                }
                Err(err) => tracing::warn!(error = %err, "filesystem watch error"),
            }
        })
        .map_err(|e| NotaError::OperationFailed(format!("Failed to start watching: {e}")))?;

        let targets = watch_targets(root);
        for dir in &targets {
            if let Err(err) = watcher.watch(dir, RecursiveMode::NonRecursive) {
                tracing::warn!(path = %dir.display(), error = %err, "could not watch directory");
            }
        }

        self.watcher = Some(watcher);
        self.watched = targets;
        self.root = Some(root.to_path_buf());
        Ok(())
    }

    /// Stop and start again against the same root, re-enumerating its
    /// subdirectories. A plain "add what's missing" pass is not enough: the
    /// kernel silently drops the watch on a deleted directory, so one
    /// recreated at the same path must be watched from scratch. No-op while
    /// stopped.
    pub fn refresh(&mut self) {
        let Some(root) = self.root.clone() else {
            return;
        };
        if let Err(err) = self.start(&root) {
            tracing::warn!(path = %root.display(), error = %err, "failed to refresh watches");
        }
    }

    /// Stop watching. Safe to call repeatedly or while already stopped.
    pub fn stop(&mut self) {
        // Dropping the backend releases all its watches.
        self.watcher.take();
        self.watched.clear();
        self.root = None;
    }

    pub fn is_watching(&self) -> bool {
        self.watcher.is_some()
    }

    /// Directories currently under watch.
    pub fn watched(&self) -> &[PathBuf] {
        &self.watched
    }
}

impl Drop for ChangeWatcher {
    fn drop(&mut self) {
        self.stop();
    }
}

/// The root plus every non-hidden directory below it.
fn watch_targets(root: &Path) -> Vec<PathBuf> {
    let mut targets = vec![root.to_path_buf()];
    let walker = WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e.path()));
    for entry in walker.flatten() {
        if entry.file_type().is_dir() {
            targets.push(entry.path().to_path_buf());
        }
    }
    targets
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .map(|n| n.to_string_lossy().starts_with('.'))
        .unwrap_or(false)
}

/// Content and structure changes matter; access notifications do not.
fn is_interesting(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::Duration;
    use tempfile::TempDir;

    fn drain_within(rx: &Receiver<ChangeSignal>, window: Duration) -> usize {
        let mut count = 0;
        while rx.recv_timeout(window).is_ok() {
            count += 1;
        }
        count
    }

    #[test]
    fn start_watches_root_and_subdirectories() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::create_dir(dir.path().join(".hidden")).unwrap();

        let (mut watcher, _rx) = ChangeWatcher::new();
        watcher.start(dir.path()).unwrap();

        assert!(watcher.is_watching());
        assert_eq!(watcher.watched().len(), 2);
        assert!(!watcher
            .watched()
            .iter()
            .any(|p| p.ends_with(".hidden")));
    }

    #[test]
    fn external_writes_produce_signals() {
        let dir = TempDir::new().unwrap();
        let (mut watcher, rx) = ChangeWatcher::new();
        watcher.start(dir.path()).unwrap();

        fs::write(dir.path().join("note.txt"), "external edit").unwrap();

        assert!(drain_within(&rx, Duration::from_secs(3)) >= 1);
    }

    #[test]
    fn stop_is_idempotent_and_silences_signals() {
        let dir = TempDir::new().unwrap();
        let (mut watcher, rx) = ChangeWatcher::new();
        watcher.start(dir.path()).unwrap();

        watcher.stop();
        watcher.stop();
        assert!(!watcher.is_watching());

        fs::write(dir.path().join("note.txt"), "after stop").unwrap();
        assert_eq!(drain_within(&rx, Duration::from_millis(300)), 0);
    }

    #[test]
    fn refresh_picks_up_new_subdirectories() {
        let dir = TempDir::new().unwrap();
        let (mut watcher, _rx) = ChangeWatcher::new();
        watcher.start(dir.path()).unwrap();
        assert_eq!(watcher.watched().len(), 1);

        fs::create_dir(dir.path().join("later")).unwrap();
        watcher.refresh();
        assert_eq!(watcher.watched().len(), 2);
    }

    #[test]
    fn refresh_rewatches_a_recreated_directory() {
        let dir = TempDir::new().unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir(&sub).unwrap();

        let (mut watcher, rx) = ChangeWatcher::new();
        watcher.start(dir.path()).unwrap();

        // Deleting the directory drops its kernel watch; the same path
        // coming back must be watched anew.
        fs::remove_dir(&sub).unwrap();
        fs::create_dir(&sub).unwrap();
        watcher.refresh();

        // Swallow the signals from the delete/recreate themselves.
        while rx.recv_timeout(Duration::from_millis(200)).is_ok() {}

        fs::write(sub.join("note.txt"), "inside").unwrap();
        assert!(
            rx.recv_timeout(Duration::from_secs(3)).is_ok(),
            "write in recreated directory was not observed"
        );
    }
}

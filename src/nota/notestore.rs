//! # Note store orchestrator
//!
//! Owns the authoritative in-memory note collection and folder tree, and is
//! the only place that mutates them. Disk work is delegated to
//! [`FileStore`]; external changes arrive as signals from [`ChangeWatcher`]
//! and are reconciled here.
//!
//! ## Threading and the pump
//!
//! All state lives on whatever thread owns the `NoteStore`; the watcher's
//! callback thread only pushes unit signals into a channel. The host drives
//! reconciliation by calling [`NoteStore::pump`] from its own loop (a UI
//! tick, a select loop, a test): `pump` drains pending signals, arms the
//! debounce window on the first one, and runs at most one [`reload`]
//! (NoteStore::reload) once the window has passed. Mutation is therefore
//! always serialized, and a burst of filesystem events collapses into a
//! single reconciliation pass.
//!
//! ## Error posture
//!
//! User-initiated structural operations (rename, move, delete, folder ops)
//! propagate errors. Best-effort persistence (content autosave, tags, pin,
//! watcher-driven reload) swallows errors after logging: the in-memory state
//! still updates so the host stays responsive, at the cost of a silent
//! durability gap.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Receiver;
use std::time::Instant;

use uuid::Uuid;

use crate::config::NotaConfig;
use crate::error::{NotaError, Result};
use crate::model::{normalize_tags, sort_for_display, Note};
use crate::folder::FolderTree;
use crate::store::FileStore;
use crate::watcher::{ChangeSignal, ChangeWatcher};

/// Change notifications for hosts, drained via [`NoteStore::drain_events`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    NoteCreated(Uuid),
    NoteUpdated(Uuid),
    NoteDeleted(Uuid),
    /// The note collection changed shape or order.
    NotesChanged,
    FoldersChanged,
    /// The navigation cursor moved; carries the new current folder.
    CurrentFolderChanged(Option<Uuid>),
}

pub struct NoteStore {
    files: FileStore,
    config: NotaConfig,

    root_dir: Option<PathBuf>,
    tree: Option<FolderTree>,
    notes: Vec<Note>,

    current_folder: Option<Uuid>,
    history: VecDeque<Uuid>,
    editing: Option<Uuid>,

    watcher: ChangeWatcher,
    signals: Receiver<ChangeSignal>,
    pending_reload: Option<Instant>,

    events: VecDeque<StoreEvent>,
}

impl Default for NoteStore {
    fn default() -> Self {
        Self::new()
    }
}

impl NoteStore {
    pub fn new() -> Self {
        Self::with_config(NotaConfig::default())
    }

    pub fn with_config(config: NotaConfig) -> Self {
        let files = FileStore::new()
            .with_format(config.format.into())
            .with_permanent_delete(config.permanent_delete);
        let (watcher, signals) = ChangeWatcher::new();
        NoteStore {
            files,
            config,
            root_dir: None,
            tree: None,
            notes: Vec::new(),
            current_folder: None,
            history: VecDeque::new(),
            editing: None,
            watcher,
            signals,
            pending_reload: None,
            events: VecDeque::new(),
        }
    }

    // --- Lifecycle ---

    /// Select the notes root. Tears down any previous watcher, discovers the
    /// folder hierarchy, loads notes, and starts watching. On failure the
    /// store is left uninitialized, not half-switched.
    pub fn set_directory(&mut self, path: &Path) -> Result<()> {
        self.watcher.stop();
        self.pending_reload = None;
        // Signals queued for the old root must not trigger a reload of the
        // new one.
        while self.signals.try_recv().is_ok() {}

        self.root_dir = None;
        self.tree = None;
        self.notes.clear();
        self.current_folder = None;
        self.history.clear();
        self.editing = None;

        if !path.is_dir() {
            return Err(NotaError::DirectoryNotAccessible(path.to_path_buf()));
        }

        let snapshot = self.files.discover_hierarchy(path)?;
        let tree = FolderTree::from_snapshot(&snapshot);
        let mut notes = self.files.load_notes(path, true)?;
        sort_for_display(&mut notes);

        // Nothing is committed until the watcher is live; an error from any
        // step above leaves the store uninitialized, not half-switched.
        self.watcher.start(path)?;

        self.current_folder = Some(tree.root());
        self.root_dir = Some(path.to_path_buf());
        self.tree = Some(tree);
        self.notes = notes;

        self.emit(StoreEvent::FoldersChanged);
        self.emit(StoreEvent::NotesChanged);
        self.emit(StoreEvent::CurrentFolderChanged(self.current_folder));
        Ok(())
    }

    pub fn is_ready(&self) -> bool {
        self.root_dir.is_some()
    }

    pub fn root_dir(&self) -> Option<&Path> {
        self.root_dir.as_deref()
    }

    // --- Reconciliation ---

    /// Note an external change. Arms the debounce window if no reload is
    /// already pending; further signals inside the window are dropped.
    pub fn handle_external_change(&mut self) {
        if self.pending_reload.is_none() {
            self.pending_reload = Some(Instant::now() + self.config.debounce());
        }
    }

    /// Drain watcher signals and run the debounced reload when due. Call
    /// regularly from the host's loop. Returns true if a reload ran.
    pub fn pump(&mut self) -> bool {
        while self.signals.try_recv().is_ok() {
            self.handle_external_change();
        }

        let Some(deadline) = self.pending_reload else {
            return false;
        };
        if Instant::now() < deadline {
            return false;
        }
        self.pending_reload = None;

        if let Err(err) = self.reload() {
            tracing::warn!(error = %err, "watcher-triggered reload failed");
        }
        true
    }

    /// Re-read notes for the current location and merge into the in-memory
    /// collection.
    ///
    /// Merge rule: the note currently marked as being edited keeps its
    /// in-memory copy verbatim; every other note takes the freshly loaded
    /// one, re-attached to its existing id (matched by location) so ids stay
    /// stable across reloads.
    pub fn reload(&mut self) -> Result<()> {
        let location = self.current_location()?.to_path_buf();
        let mut fresh = self.files.load_notes(&location, true)?;

        // The root may have been switched while this reload was pending.
        match self.current_location() {
            Ok(current) if current == location => {}
            _ => return Ok(()),
        }

        for note in &mut fresh {
            let Some(existing) = self.notes.iter().find(|n| n.path == note.path) else {
                continue;
            };
            if Some(existing.id) == self.editing {
                *note = existing.clone();
            } else {
                note.id = existing.id;
                note.created_at = existing.created_at;
            }
        }

        self.notes = fresh;
        sort_for_display(&mut self.notes);
        self.emit(StoreEvent::NotesChanged);
        Ok(())
    }

    // --- Note operations ---

    /// Create a note in the current folder. Errors are swallowed at this
    /// layer: on failure, logs and returns `None`.
    pub fn create_note(&mut self, title: &str, content: &str) -> Option<Note> {
        let directory = match self.current_location() {
            Ok(dir) => dir.to_path_buf(),
            Err(err) => {
                tracing::warn!(error = %err, "cannot create note");
                return None;
            }
        };
        match self.files.create_note(&directory, title, content) {
            Ok(note) => {
                self.notes.insert(0, note.clone());
                self.emit(StoreEvent::NoteCreated(note.id));
                self.emit(StoreEvent::NotesChanged);
                Some(note)
            }
            Err(err) => {
                tracing::warn!(title, error = %err, "failed to create note");
                None
            }
        }
    }

    /// Replace a note's content in memory and persist best-effort. The
    /// in-memory edit sticks even if the disk write fails.
    pub fn update_content(&mut self, id: Uuid, content: &str) {
        let Some(idx) = self.index_of(id) else { return };
        self.notes[idx].content = content.to_string();
        self.notes[idx].modified_at = chrono::Utc::now();

        if let Err(err) = self.files.write_note(&self.notes[idx]) {
            tracing::warn!(note = %id, error = %err, "failed to persist content");
        }
        self.emit(StoreEvent::NoteUpdated(id));
        self.emit(StoreEvent::NotesChanged);
    }

    /// Replace a note's tag set and persist best-effort.
    pub fn update_tags<I, S>(&mut self, id: Uuid, tags: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let Some(idx) = self.index_of(id) else { return };
        self.notes[idx].tags = normalize_tags(tags);
        self.notes[idx].modified_at = chrono::Utc::now();

        let path = self.notes[idx].path.clone();
        let result = self
            .files
            .write_tags(&path, &self.notes[idx].tags)
            .and_then(|()| self.files.touch(&path));
        if let Err(err) = result {
            tracing::warn!(note = %id, error = %err, "failed to persist tags");
        }
        self.emit(StoreEvent::NoteUpdated(id));
    }

    /// Flip a note's pinned flag, persist best-effort, and re-sort.
    pub fn toggle_pin(&mut self, id: Uuid) {
        let Some(idx) = self.index_of(id) else { return };
        let pinned = !self.notes[idx].pinned;
        self.notes[idx].pinned = pinned;
        self.notes[idx].modified_at = chrono::Utc::now();

        let path = self.notes[idx].path.clone();
        let result = self
            .files
            .write_pinned(&path, pinned)
            .and_then(|()| self.files.touch(&path));
        if let Err(err) = result {
            tracing::warn!(note = %id, error = %err, "failed to persist pin");
        }

        sort_for_display(&mut self.notes);
        self.emit(StoreEvent::NotesChanged);
    }

    /// Rename a note's title (and its file). The content is re-read from
    /// disk afterwards since renaming re-serializes it.
    pub fn rename(&mut self, id: Uuid, new_title: &str) -> Result<()> {
        let idx = self
            .index_of(id)
            .ok_or_else(|| NotaError::OperationFailed("No such note".into()))?;

        let new_path = self.files.rename_note(&self.notes[idx], new_title)?;
        let mut reread = self.files.read_note(&new_path)?;
        reread.id = id;
        reread.created_at = self.notes[idx].created_at;
        self.notes[idx] = reread;

        self.emit(StoreEvent::NoteUpdated(id));
        self.emit(StoreEvent::NotesChanged);
        Ok(())
    }

    /// Move a note into another folder of the tree.
    pub fn move_note(&mut self, id: Uuid, folder: Uuid) -> Result<()> {
        let idx = self
            .index_of(id)
            .ok_or_else(|| NotaError::OperationFailed("No such note".into()))?;
        let destination = self
            .tree
            .as_ref()
            .and_then(|t| t.get(folder))
            .map(|f| f.path.clone())
            .ok_or_else(|| NotaError::OperationFailed("No such folder".into()))?;

        let new_path = self.files.move_note(&self.notes[idx], &destination)?;
        self.notes[idx].path = new_path;
        self.notes[idx].parent_dir = destination;

        self.emit(StoreEvent::NoteUpdated(id));
        self.emit(StoreEvent::NotesChanged);
        Ok(())
    }

    /// Delete a note (trash semantics unless configured otherwise).
    pub fn delete(&mut self, id: Uuid) -> Result<()> {
        let idx = self
            .index_of(id)
            .ok_or_else(|| NotaError::OperationFailed("No such note".into()))?;
        self.files.delete_note(&self.notes[idx].path)?;
        self.notes.remove(idx);
        if self.editing == Some(id) {
            self.editing = None;
        }
        self.emit(StoreEvent::NoteDeleted(id));
        self.emit(StoreEvent::NotesChanged);
        Ok(())
    }

    // --- Folder operations ---

    /// Create a subfolder under `parent` and patch the tree in place.
    pub fn create_subfolder(&mut self, parent: Uuid, name: &str) -> Result<Uuid> {
        let parent_path = self
            .tree
            .as_ref()
            .and_then(|t| t.get(parent))
            .map(|f| f.path.clone())
            .ok_or_else(|| NotaError::OperationFailed("No such folder".into()))?;

        let path = self.files.create_folder(name, &parent_path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| name.to_string());

        let tree = self.tree.as_mut().ok_or_else(Self::not_ready)?;
        let id = tree
            .insert_child(parent, &name, path)
            .ok_or_else(|| NotaError::OperationFailed("No such folder".into()))?;

        // The new directory needs its own watch.
        self.watcher.refresh();
        self.emit(StoreEvent::FoldersChanged);
        Ok(id)
    }

    /// Rename a folder on disk and in the tree, rewriting the location of
    /// every note underneath it.
    pub fn rename_folder(&mut self, id: Uuid, new_name: &str) -> Result<()> {
        let old_path = self
            .tree
            .as_ref()
            .and_then(|t| t.get(id))
            .map(|f| f.path.clone())
            .ok_or_else(|| NotaError::OperationFailed("No such folder".into()))?;

        let new_path = self.files.rename_folder(&old_path, new_name)?;
        let name = new_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| new_name.to_string());

        if let Some(tree) = self.tree.as_mut() {
            tree.rename(id, &name, new_path.clone());
        }
        for note in &mut self.notes {
            if let Ok(rest) = note.path.strip_prefix(&old_path).map(Path::to_path_buf) {
                note.path = new_path.join(&rest);
            }
            if let Ok(rest) = note.parent_dir.strip_prefix(&old_path).map(Path::to_path_buf) {
                note.parent_dir = new_path.join(&rest);
            }
        }

        self.emit(StoreEvent::FoldersChanged);
        self.emit(StoreEvent::NotesChanged);
        Ok(())
    }

    /// Delete a folder and evict every note underneath it. If the cursor was
    /// inside the deleted subtree, it moves to the folder's parent.
    pub fn delete_folder(&mut self, id: Uuid) -> Result<()> {
        let (path, parent) = self
            .tree
            .as_ref()
            .and_then(|t| t.get(id))
            .map(|f| (f.path.clone(), f.parent))
            .ok_or_else(|| NotaError::OperationFailed("No such folder".into()))?;

        self.files.delete_folder(&path)?;

        let evicted = self
            .tree
            .as_mut()
            .map(|t| t.remove(id))
            .unwrap_or_default();
        self.notes.retain(|n| !n.parent_dir.starts_with(&path));

        if let Some(cursor) = self.current_folder {
            if evicted.contains(&cursor) {
                self.current_folder = parent;
                self.emit(StoreEvent::CurrentFolderChanged(parent));
            }
        }

        self.emit(StoreEvent::FoldersChanged);
        self.emit(StoreEvent::NotesChanged);
        Ok(())
    }

    /// Re-discover the folder hierarchy from disk, rebuilding the tree. The
    /// cursor is re-attached by location; ids from the old tree go stale.
    pub fn refresh_folder_hierarchy(&mut self) -> Result<()> {
        let root = self
            .root_dir
            .clone()
            .ok_or_else(Self::not_ready)?;
        let cursor_path = self.current_location().ok().map(Path::to_path_buf);

        let snapshot = self.files.discover_hierarchy(&root)?;
        let tree = FolderTree::from_snapshot(&snapshot);

        self.current_folder = cursor_path
            .and_then(|p| tree.find_by_path(&p).map(|f| f.id))
            .or(Some(tree.root()));
        self.tree = Some(tree);

        self.watcher.refresh();
        self.emit(StoreEvent::FoldersChanged);
        Ok(())
    }

    // --- Navigation ---

    /// Move the cursor to `folder`, pushing the previous cursor onto the
    /// history stack, and reload notes scoped to the new location.
    pub fn set_current_folder(&mut self, folder: Uuid) -> Result<()> {
        self.go_to(folder, true)
    }

    pub fn navigate_to_parent(&mut self) -> Result<()> {
        let parent = self
            .current_folder
            .and_then(|id| self.tree.as_ref()?.get(id)?.parent)
            .ok_or_else(|| NotaError::OperationFailed("Already at the root".into()))?;
        self.go_to(parent, true)
    }

    pub fn navigate_to_root(&mut self) -> Result<()> {
        let root = self
            .tree
            .as_ref()
            .map(FolderTree::root)
            .ok_or_else(Self::not_ready)?;
        self.go_to(root, true)
    }

    /// Pop the history stack, skipping entries whose folders no longer
    /// exist, and navigate there without pushing.
    pub fn navigate_back(&mut self) -> Result<()> {
        while let Some(previous) = self.history.pop_back() {
            let exists = self
                .tree
                .as_ref()
                .is_some_and(|t| t.get(previous).is_some());
            if exists {
                return self.go_to(previous, false);
            }
        }
        Err(NotaError::OperationFailed("No navigation history".into()))
    }

    fn go_to(&mut self, folder: Uuid, push_history: bool) -> Result<()> {
        let tree = self.tree.as_ref().ok_or_else(Self::not_ready)?;
        if tree.get(folder).is_none() {
            return Err(NotaError::OperationFailed("No such folder".into()));
        }
        if self.current_folder == Some(folder) {
            return Ok(());
        }

        if push_history {
            if let Some(previous) = self.current_folder {
                self.history.push_back(previous);
                while self.history.len() > self.config.history_capacity {
                    self.history.pop_front();
                }
            }
        }

        self.current_folder = Some(folder);
        self.reload()?;
        self.emit(StoreEvent::CurrentFolderChanged(Some(folder)));
        Ok(())
    }

    pub fn current_folder(&self) -> Option<Uuid> {
        self.current_folder
    }

    pub fn folder_tree(&self) -> Option<&FolderTree> {
        self.tree.as_ref()
    }

    // --- Editing ---

    /// Mark which note (if any) is being actively edited; its in-memory copy
    /// is protected from reload merges.
    pub fn set_editing(&mut self, id: Option<Uuid>) {
        self.editing = id;
    }

    pub fn editing(&self) -> Option<Uuid> {
        self.editing
    }

    // --- Accessors ---

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn note(&self, id: Uuid) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    /// Note whose file sits at `path`, if loaded.
    pub fn note_at(&self, path: &Path) -> Option<&Note> {
        self.notes.iter().find(|n| n.path == path)
    }

    /// Notes sitting directly in the current folder (not its descendants).
    pub fn notes_in_current_folder(&self) -> Vec<&Note> {
        let Ok(location) = self.current_location() else {
            return Vec::new();
        };
        self.notes
            .iter()
            .filter(|n| n.parent_dir == location)
            .collect()
    }

    /// Union of all tags in the collection, sorted.
    pub fn all_tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = self
            .notes
            .iter()
            .flat_map(|n| n.tags.iter().cloned())
            .collect();
        tags.sort();
        tags.dedup();
        tags
    }

    pub fn all_titles(&self) -> Vec<String> {
        self.notes.iter().map(|n| n.title.clone()).collect()
    }

    /// Notes whose title starts with `prefix`, case-insensitively. Used for
    /// incremental-search completion.
    pub fn notes_matching_title_prefix(&self, prefix: &str) -> Vec<&Note> {
        let prefix = prefix.to_lowercase();
        self.notes
            .iter()
            .filter(|n| n.title.to_lowercase().starts_with(&prefix))
            .collect()
    }

    /// Notes whose title contains `fragment`, case-insensitively.
    pub fn notes_containing_title(&self, fragment: &str) -> Vec<&Note> {
        let fragment = fragment.to_lowercase();
        self.notes
            .iter()
            .filter(|n| n.title.to_lowercase().contains(&fragment))
            .collect()
    }

    /// Take all queued events, oldest first.
    pub fn drain_events(&mut self) -> Vec<StoreEvent> {
        self.events.drain(..).collect()
    }

    // --- Internals ---

    /// Directory the store currently reads from and creates in: the current
    /// folder's path, falling back to the root.
    fn current_location(&self) -> Result<&Path> {
        let tree = self.tree.as_ref().ok_or_else(Self::not_ready)?;
        let folder = self.current_folder.unwrap_or_else(|| tree.root());
        tree.get(folder)
            .or_else(|| tree.get(tree.root()))
            .map(|f| f.path.as_path())
            .ok_or_else(Self::not_ready)
    }

    fn index_of(&self, id: Uuid) -> Option<usize> {
        self.notes.iter().position(|n| n.id == id)
    }

    fn not_ready() -> NotaError {
        NotaError::OperationFailed("No notes directory selected".into())
    }

    fn emit(&mut self, event: StoreEvent) {
        self.events.push_back(event);
    }
}

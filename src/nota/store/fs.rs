use std::collections::BTreeSet;
use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use uuid::Uuid;
use walkdir::WalkDir;

use super::attrs::AttributeStore;
use crate::error::{NotaError, Result};
use crate::model::{Note, NoteFormat, SUPPORTED_EXTENSIONS};
use crate::richtext;

/// Recursive snapshot of the directory hierarchy under a root, as found on
/// disk. [`crate::folder::FolderTree`] turns this into its arena form.
#[derive(Debug, Clone)]
pub struct FolderSnapshot {
    pub name: String,
    pub path: PathBuf,
    pub children: Vec<FolderSnapshot>,
}

/// All content-bearing filesystem operations for notes and folders.
///
/// Attribute discipline: every operation that rewrites or relocates a file
/// reads tags and the pinned flag *before* touching it and re-applies them
/// afterwards, because the attribute side-channel does not survive atomic
/// replaces or cross-directory moves (see [`super::attrs`]).
pub struct FileStore {
    format: NoteFormat,
    attrs: AttributeStore,
    permanent_delete: bool,
}

impl Default for FileStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FileStore {
    pub fn new() -> Self {
        Self {
            format: NoteFormat::Rich,
            attrs: AttributeStore::new(),
            permanent_delete: false,
        }
    }

    /// Encoding used for newly created notes.
    pub fn with_format(mut self, format: NoteFormat) -> Self {
        self.format = format;
        self
    }

    /// Delete permanently instead of trashing. For tests and headless hosts.
    pub fn with_permanent_delete(mut self, permanent: bool) -> Self {
        self.permanent_delete = permanent;
        self
    }

    pub fn format(&self) -> NoteFormat {
        self.format
    }

    // --- Notes ---

    /// Load one note file: content bytes, filesystem timestamps, attributes.
    /// The title is the filename stem. Each read mints a fresh id; identity
    /// stabilization across reloads happens in the orchestrator's merge.
    pub fn read_note(&self, path: &Path) -> Result<Note> {
        let read_failed = |source: io::Error| NotaError::ReadFailed {
            path: path.to_path_buf(),
            source,
        };

        let content = fs::read_to_string(path).map_err(read_failed)?;
        let meta = fs::metadata(path).map_err(read_failed)?;

        let modified = meta.modified().unwrap_or_else(|_| SystemTime::now());
        let created = meta.created().unwrap_or(modified);

        let title = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Note {
            id: Uuid::new_v4(),
            title,
            content,
            path: path.to_path_buf(),
            created_at: DateTime::<Utc>::from(created),
            modified_at: DateTime::<Utc>::from(modified),
            tags: self.attrs.read_tags(path),
            pinned: self.attrs.read_pinned(path),
            parent_dir: path.parent().unwrap_or(Path::new("")).to_path_buf(),
        })
    }

    /// Persist a note's content with an atomic whole-file replace, bump the
    /// modification time, and re-apply the attributes the replace dropped.
    pub fn write_note(&self, note: &Note) -> Result<()> {
        let write_failed = |source: io::Error| NotaError::WriteFailed {
            path: note.path.clone(),
            source,
        };

        // Capture before the write: the replace loses the attribute.
        let was_pinned = note.pinned;

        self.atomic_write(&note.path, note.content.as_bytes())
            .map_err(write_failed)?;
        self.set_mtime_now(&note.path).map_err(write_failed)?;
        self.attrs
            .write_tags(&note.path, &note.tags)
            .map_err(write_failed)?;
        if was_pinned {
            self.attrs
                .write_pinned(&note.path, true)
                .map_err(write_failed)?;
        }
        Ok(())
    }

    /// Create a note file in `directory` and read it back.
    ///
    /// Filename collisions get a filename-safe timestamp suffix; after 1000
    /// attempts the create fails with [`NotaError::TooManyDuplicates`].
    /// Content is encoded in the configured format, falling back to plain
    /// text if rich encoding fails.
    pub fn create_note(&self, directory: &Path, title: &str, content: &str) -> Result<Note> {
        let stem = sanitize_filename(title);
        let ext = self.format.extension();

        let mut path = directory.join(format!("{stem}.{ext}"));
        let mut attempts = 1u32;
        while path.exists() {
            if attempts > 1000 {
                return Err(NotaError::TooManyDuplicates);
            }
            path = directory.join(format!("{stem}-{}.{ext}", timestamp_suffix()));
            attempts += 1;
        }

        let encoded = match self.format {
            NoteFormat::Rich => {
                richtext::to_rich(content).unwrap_or_else(|_| content.to_string())
            }
            NoteFormat::Plain | NoteFormat::Markdown => content.to_string(),
        };

        self.atomic_write(&path, encoded.as_bytes())
            .map_err(|source| NotaError::WriteFailed {
                path: path.clone(),
                source,
            })?;

        self.read_note(&path)
    }

    /// Move a note file to the platform trash (or delete it outright when
    /// configured with `with_permanent_delete`).
    pub fn delete_note(&self, path: &Path) -> Result<()> {
        self.remove(path).map_err(|source| NotaError::DeleteFailed {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Rename a note file to match `new_title` and re-serialize its content
    /// as `"<new title>\n\n<body>"` in the note's own format.
    ///
    /// Returns the new location. The extension is kept; collisions with a
    /// different file get a timestamp suffix.
    pub fn rename_note(&self, note: &Note, new_title: &str) -> Result<PathBuf> {
        let directory = note
            .path
            .parent()
            .ok_or_else(|| NotaError::OperationFailed("Note has no parent directory".into()))?;
        let ext = note
            .path
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.format.extension().to_string());

        let stem = sanitize_filename(new_title);
        let mut new_path = directory.join(format!("{stem}.{ext}"));
        if new_path.exists() && new_path != note.path {
            new_path = directory.join(format!("{stem}-{}.{ext}", timestamp_suffix()));
        }

        // Read attributes before any move or write: neither preserves them.
        let tags = self.attrs.read_tags(&note.path);
        let was_pinned = self.attrs.read_pinned(&note.path);

        let write_failed = |source: io::Error, path: &Path| NotaError::WriteFailed {
            path: path.to_path_buf(),
            source,
        };

        if new_path != note.path {
            fs::rename(&note.path, &new_path).map_err(|e| write_failed(e, &new_path))?;
        }

        let body = richtext::to_plain(&note.content);
        let full = format!("{new_title}\n\n{body}");
        let serialized = match NoteFormat::from_extension(&ext) {
            Some(NoteFormat::Rich) => richtext::to_rich(&full).unwrap_or(full),
            _ => full,
        };
        self.atomic_write(&new_path, serialized.as_bytes())
            .map_err(|e| write_failed(e, &new_path))?;

        self.attrs
            .write_tags(&new_path, &tags)
            .map_err(|e| write_failed(e, &new_path))?;
        if was_pinned {
            self.attrs
                .write_pinned(&new_path, true)
                .map_err(|e| write_failed(e, &new_path))?;
        }

        Ok(new_path)
    }

    /// Move a note file into `destination`, keeping its filename unless that
    /// collides with a different existing file. Attributes are carried over
    /// explicitly since a cross-directory move may drop them.
    pub fn move_note(&self, note: &Note, destination: &Path) -> Result<PathBuf> {
        let file_name = note
            .path
            .file_name()
            .ok_or_else(|| NotaError::OperationFailed("Note has no filename".into()))?;

        let mut dest_path = destination.join(file_name);
        if dest_path.exists() && dest_path != note.path {
            let stem = note
                .path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            let ext = note
                .path
                .extension()
                .map(|e| e.to_string_lossy().into_owned())
                .unwrap_or_default();
            dest_path = destination.join(format!("{stem}-{}.{ext}", timestamp_suffix()));
        }

        let tags = self.attrs.read_tags(&note.path);
        let was_pinned = self.attrs.read_pinned(&note.path);

        let write_failed = |source: io::Error| NotaError::WriteFailed {
            path: dest_path.clone(),
            source,
        };
        fs::rename(&note.path, &dest_path)
            .map_err(|source| NotaError::WriteFailed {
                path: dest_path.clone(),
                source,
            })?;

        self.attrs
            .write_tags(&dest_path, &tags)
            .map_err(write_failed)?;
        if was_pinned {
            self.attrs
                .write_pinned(&dest_path, true)
                .map_err(write_failed)?;
        }

        Ok(dest_path)
    }

    /// List note files in `directory`, optionally recursing through all
    /// non-hidden subdirectories. Individual unreadable files are skipped;
    /// the load only fails if the directory itself cannot be listed.
    /// Result is sorted by modification time, most recent first.
    pub fn load_notes(&self, directory: &Path, recursive: bool) -> Result<Vec<Note>> {
        if !directory.is_dir() {
            return Err(NotaError::DirectoryNotAccessible(directory.to_path_buf()));
        }

        let mut notes = Vec::new();

        if recursive {
            // A stat-able root can still be unlistable (permission loss);
            // only errors below the root are per-entry skips.
            fs::read_dir(directory)
                .map_err(|_| NotaError::DirectoryNotAccessible(directory.to_path_buf()))?;
            let walker = WalkDir::new(directory)
                .min_depth(1)
                .into_iter()
                .filter_entry(|e| e.depth() == 0 || !is_hidden(e.file_name()));
            for entry in walker {
                let Ok(entry) = entry else { continue };
                if !entry.file_type().is_file() || !has_supported_extension(entry.path()) {
                    continue;
                }
                match self.read_note(entry.path()) {
                    Ok(note) => notes.push(note),
                    Err(err) => tracing::debug!(
                        path = %entry.path().display(),
                        error = %err,
                        "skipping unreadable note file"
                    ),
                }
            }
        } else {
            let entries = fs::read_dir(directory)
                .map_err(|_| NotaError::DirectoryNotAccessible(directory.to_path_buf()))?;
            for entry in entries.flatten() {
                let path = entry.path();
                if is_hidden(&entry.file_name())
                    || !path.is_file()
                    || !has_supported_extension(&path)
                {
                    continue;
                }
                match self.read_note(&path) {
                    Ok(note) => notes.push(note),
                    Err(err) => tracing::debug!(
                        path = %path.display(),
                        error = %err,
                        "skipping unreadable note file"
                    ),
                }
            }
        }

        notes.sort_by(|a, b| b.modified_at.cmp(&a.modified_at));
        Ok(notes)
    }

    // --- Attribute-only updates ---

    pub fn write_tags(&self, path: &Path, tags: &BTreeSet<String>) -> Result<()> {
        self.attrs
            .write_tags(path, tags)
            .map_err(|source| NotaError::WriteFailed {
                path: path.to_path_buf(),
                source,
            })
    }

    pub fn write_pinned(&self, path: &Path, pinned: bool) -> Result<()> {
        self.attrs
            .write_pinned(path, pinned)
            .map_err(|source| NotaError::WriteFailed {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Bump a file's modification time to now.
    pub fn touch(&self, path: &Path) -> Result<()> {
        self.set_mtime_now(path)
            .map_err(|source| NotaError::WriteFailed {
                path: path.to_path_buf(),
                source,
            })
    }

    // --- Folders ---

    /// Recursively snapshot the directory hierarchy under `directory`.
    /// Hidden entries are skipped; children are sorted case-insensitively.
    pub fn discover_hierarchy(&self, directory: &Path) -> Result<FolderSnapshot> {
        let name = directory
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| directory.display().to_string());

        let entries = fs::read_dir(directory)
            .map_err(|_| NotaError::DirectoryNotAccessible(directory.to_path_buf()))?;

        let mut children = Vec::new();
        for entry in entries.flatten() {
            if is_hidden(&entry.file_name()) {
                continue;
            }
            if entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
                children.push(self.discover_hierarchy(&entry.path())?);
            }
        }
        children.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));

        Ok(FolderSnapshot {
            name,
            path: directory.to_path_buf(),
            children,
        })
    }

    pub fn create_folder(&self, name: &str, directory: &Path) -> Result<PathBuf> {
        let sanitized = sanitize_filename(name);
        let path = directory.join(&sanitized);

        if path.exists() {
            return Err(NotaError::OperationFailed(format!(
                "A folder named '{sanitized}' already exists"
            )));
        }

        fs::create_dir(&path)
            .map_err(|e| NotaError::folder_op(&format!("Failed to create folder '{sanitized}'"), &e))?;
        Ok(path)
    }

    pub fn rename_folder(&self, path: &Path, new_name: &str) -> Result<PathBuf> {
        let sanitized = sanitize_filename(new_name);
        let parent = path
            .parent()
            .ok_or_else(|| NotaError::OperationFailed("Cannot rename the root folder".into()))?;
        let new_path = parent.join(&sanitized);

        if new_path == path {
            return Ok(new_path);
        }
        if new_path.exists() {
            return Err(NotaError::OperationFailed(format!(
                "A folder named '{sanitized}' already exists"
            )));
        }

        fs::rename(path, &new_path)
            .map_err(|e| NotaError::folder_op(&format!("Failed to rename folder '{sanitized}'"), &e))?;
        Ok(new_path)
    }

    /// Move a directory to the platform trash (or delete it outright when
    /// configured with `with_permanent_delete`).
    pub fn delete_folder(&self, path: &Path) -> Result<()> {
        self.remove(path).map_err(|source| NotaError::DeleteFailed {
            path: path.to_path_buf(),
            source,
        })
    }

    // --- Internals ---

    fn remove(&self, path: &Path) -> std::result::Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if self.permanent_delete {
            if path.is_dir() {
                fs::remove_dir_all(path)?;
            } else {
                fs::remove_file(path)?;
            }
            Ok(())
        } else {
            trash::delete(path)
                .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)
        }
    }

    /// Whole-file replace: write a temp file in the same directory, then
    /// rename over the target. All-or-nothing for external observers, but
    /// drops extended attributes — callers re-apply them.
    fn atomic_write(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        let directory = path.parent().unwrap_or(Path::new("."));
        let tmp = directory.join(format!(".nota-{}.tmp", Uuid::new_v4()));
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, path)
    }

    fn set_mtime_now(&self, path: &Path) -> io::Result<()> {
        let file = fs::OpenOptions::new().write(true).open(path)?;
        file.set_modified(SystemTime::now())
    }
}

/// Replace filesystem-unsafe characters with hyphens, cap the length, and
/// never return an empty name. Idempotent.
pub fn sanitize_filename(title: &str) -> String {
    const INVALID: [char; 9] = ['/', '\\', ':', '*', '?', '"', '<', '>', '|'];
    let sanitized: String = title
        .chars()
        .map(|c| if INVALID.contains(&c) { '-' } else { c })
        .take(255)
        .collect();
    if sanitized.is_empty() {
        "untitled".to_string()
    } else {
        sanitized
    }
}

fn timestamp_suffix() -> String {
    Utc::now().format("%Y%m%d-%H%M%S%6f").to_string()
}

fn is_hidden(name: &OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}

fn has_supported_extension(path: &Path) -> bool {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> FileStore {
        FileStore::new()
            .with_format(NoteFormat::Plain)
            .with_permanent_delete(true)
    }

    #[test]
    fn sanitize_strips_invalid_chars() {
        let out = sanitize_filename("a/b\\c:d*e?f\"g<h>i|j");
        assert_eq!(out, "a-b-c-d-e-f-g-h-i-j");
        for c in ['/', '\\', ':', '*', '?', '"', '<', '>', '|'] {
            assert!(!out.contains(c));
        }
    }

    #[test]
    fn sanitize_is_idempotent() {
        for title in ["notes: draft?", "", "x".repeat(400).as_str(), "plain"] {
            let once = sanitize_filename(title);
            assert_eq!(sanitize_filename(&once), once);
        }
    }

    #[test]
    fn sanitize_truncates_and_falls_back() {
        assert!(sanitize_filename(&"x".repeat(400)).chars().count() <= 255);
        assert_eq!(sanitize_filename(""), "untitled");
    }

    #[test]
    fn create_then_read_round_trips() {
        let dir = TempDir::new().unwrap();
        let fs_store = store();

        let note = fs_store.create_note(dir.path(), "Foo", "bar").unwrap();
        assert_eq!(note.title, "Foo");
        assert_eq!(note.content, "bar");
        assert!(note.tags.is_empty());
        assert!(!note.pinned);
        assert_eq!(note.parent_dir, dir.path());

        let again = fs_store.read_note(&note.path).unwrap();
        assert_eq!(again.title, "Foo");
        assert_eq!(again.content, "bar");
    }

    #[test]
    fn rich_notes_decode_back_to_their_text() {
        let dir = TempDir::new().unwrap();
        let fs_store = FileStore::new().with_permanent_delete(true);

        let note = fs_store.create_note(dir.path(), "Foo", "bar").unwrap();
        assert!(note.path.extension().is_some_and(|e| e == "rtf"));
        assert!(richtext::is_rich(&note.content));
        assert_eq!(richtext::to_plain(&note.content), "bar");
    }

    #[test]
    fn duplicate_titles_get_distinct_files() {
        let dir = TempDir::new().unwrap();
        let fs_store = store();

        let first = fs_store.create_note(dir.path(), "Same", "one").unwrap();
        let second = fs_store.create_note(dir.path(), "Same", "two").unwrap();

        assert_ne!(first.path, second.path);
        assert_eq!(fs_store.read_note(&first.path).unwrap().content, "one");
        assert_eq!(fs_store.read_note(&second.path).unwrap().content, "two");
    }

    #[test]
    fn rename_moves_the_file_and_prepends_the_title() {
        let dir = TempDir::new().unwrap();
        let fs_store = store();

        let note = fs_store.create_note(dir.path(), "Old", "body text").unwrap();
        let new_path = fs_store.rename_note(&note, "New").unwrap();

        assert!(!note.path.exists());
        assert_eq!(new_path, dir.path().join("New.txt"));
        let reread = fs_store.read_note(&new_path).unwrap();
        assert_eq!(reread.title, "New");
        assert_eq!(reread.content, "New\n\nbody text");
    }

    #[test]
    fn rename_collision_gets_a_suffix() {
        let dir = TempDir::new().unwrap();
        let fs_store = store();

        let taken = fs_store.create_note(dir.path(), "Target", "x").unwrap();
        let note = fs_store.create_note(dir.path(), "Source", "y").unwrap();

        let new_path = fs_store.rename_note(&note, "Target").unwrap();
        assert_ne!(new_path, taken.path);
        assert!(new_path
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("Target-"));
    }

    #[test]
    fn move_keeps_the_filename() {
        let dir = TempDir::new().unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir(&sub).unwrap();
        let fs_store = store();

        let note = fs_store.create_note(dir.path(), "Roamer", "x").unwrap();
        let new_path = fs_store.move_note(&note, &sub).unwrap();

        assert_eq!(new_path, sub.join("Roamer.txt"));
        assert!(!note.path.exists());
    }

    #[test]
    fn move_collision_gets_a_suffix() {
        let dir = TempDir::new().unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir(&sub).unwrap();
        let fs_store = store();

        fs_store.create_note(&sub, "Clash", "there").unwrap();
        let note = fs_store.create_note(dir.path(), "Clash", "here").unwrap();

        let new_path = fs_store.move_note(&note, &sub).unwrap();
        assert_ne!(new_path, sub.join("Clash.txt"));
        assert_eq!(fs_store.read_note(&new_path).unwrap().content, "here");
    }

    #[test]
    fn load_notes_skips_hidden_and_unsupported() {
        let dir = TempDir::new().unwrap();
        let fs_store = store();

        fs_store.create_note(dir.path(), "Visible", "x").unwrap();
        fs::write(dir.path().join(".hidden.txt"), "no").unwrap();
        fs::write(dir.path().join("image.png"), "no").unwrap();

        let notes = fs_store.load_notes(dir.path(), false).unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].title, "Visible");
    }

    #[test]
    fn load_notes_recursive_spans_subfolders_but_not_hidden_ones() {
        let dir = TempDir::new().unwrap();
        let sub = dir.path().join("projects");
        let hidden = dir.path().join(".git");
        fs::create_dir(&sub).unwrap();
        fs::create_dir(&hidden).unwrap();
        let fs_store = store();

        fs_store.create_note(dir.path(), "Top", "x").unwrap();
        let nested = fs_store.create_note(&sub, "Nested", "y").unwrap();
        fs::write(hidden.join("config.txt"), "no").unwrap();

        let notes = fs_store.load_notes(dir.path(), true).unwrap();
        let titles: Vec<_> = notes.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(notes.len(), 2);
        assert!(titles.contains(&"Top"));
        assert!(titles.contains(&"Nested"));

        let nested_loaded = notes.iter().find(|n| n.title == "Nested").unwrap();
        assert_eq!(nested_loaded.parent_dir, nested.parent_dir);
    }

    #[test]
    fn load_notes_fails_only_for_a_missing_directory() {
        let dir = TempDir::new().unwrap();
        let fs_store = store();
        let missing = dir.path().join("gone");
        for recursive in [false, true] {
            assert!(matches!(
                fs_store.load_notes(&missing, recursive),
                Err(NotaError::DirectoryNotAccessible(_))
            ));
        }
    }

    #[test]
    fn load_notes_sorts_most_recent_first() {
        let dir = TempDir::new().unwrap();
        let fs_store = store();

        let older = fs_store.create_note(dir.path(), "Older", "x").unwrap();
        let newer = fs_store.create_note(dir.path(), "Newer", "y").unwrap();

        // Force distinct mtimes; note files created in the same tick tie.
        let past = SystemTime::now() - std::time::Duration::from_secs(60);
        fs::OpenOptions::new()
            .write(true)
            .open(&older.path)
            .unwrap()
            .set_modified(past)
            .unwrap();
        fs_store.touch(&newer.path).unwrap();

        let notes = fs_store.load_notes(dir.path(), false).unwrap();
        assert_eq!(notes[0].title, "Newer");
        assert_eq!(notes[1].title, "Older");
    }

    #[test]
    fn discover_hierarchy_sorts_case_insensitively_and_skips_hidden() {
        let dir = TempDir::new().unwrap();
        for name in ["zeta", "Alpha", "beta", ".cache"] {
            fs::create_dir(dir.path().join(name)).unwrap();
        }
        let fs_store = store();

        let snapshot = fs_store.discover_hierarchy(dir.path()).unwrap();
        let names: Vec<_> = snapshot.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "beta", "zeta"]);
    }

    #[test]
    fn create_folder_rejects_collisions() {
        let dir = TempDir::new().unwrap();
        let fs_store = store();

        fs_store.create_folder("Ideas", dir.path()).unwrap();
        let err = fs_store.create_folder("Ideas", dir.path()).unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }

    #[test]
    fn rename_folder_moves_the_directory() {
        let dir = TempDir::new().unwrap();
        let fs_store = store();

        let old = fs_store.create_folder("Drafts", dir.path()).unwrap();
        let new = fs_store.rename_folder(&old, "Archive").unwrap();
        assert!(!old.exists());
        assert!(new.ends_with("Archive"));
        assert!(new.is_dir());
    }

    #[test]
    fn delete_note_removes_the_file() {
        let dir = TempDir::new().unwrap();
        let fs_store = store();

        let note = fs_store.create_note(dir.path(), "Doomed", "x").unwrap();
        fs_store.delete_note(&note.path).unwrap();
        assert!(!note.path.exists());
    }
}

//! # Attribute side-channel
//!
//! Tags and the pinned flag are stored as extended file attributes, outside
//! the content stream. That keeps note files portable plain documents while
//! still carrying metadata, at a cost callers must respect:
//!
//! **Attribute storage is fragile across whole-file rewrites.** An atomic
//! replace (write-temp-then-rename) produces a new inode, and the attributes
//! of the old one are gone. Every destructive write in [`super::fs`] reads
//! the attributes it cares about first and re-applies them afterwards. This
//! module only promises that `read` never errors for "absent" and that
//! `write` surfaces real I/O failures.

use std::collections::BTreeSet;
use std::io;
use std::path::Path;

use crate::model::normalize_tags;

/// Attribute name for the comma-joined tag list.
pub const TAGS_ATTR: &str = "user.nota.tags";
/// Attribute name for the pinned flag, "1" or "0".
pub const PINNED_ATTR: &str = "user.nota.pinned";

/// Reads and writes small named byte strings attached to files.
#[derive(Debug, Clone, Copy, Default)]
pub struct AttributeStore;

impl AttributeStore {
    pub fn new() -> Self {
        AttributeStore
    }

    /// Raw attribute bytes, or `None` if unset or unreadable.
    pub fn read(&self, path: &Path, name: &str) -> Option<Vec<u8>> {
        xattr::get(path, name).ok().flatten()
    }

    /// Store raw attribute bytes. Fails if the file is missing or the
    /// filesystem refuses the write.
    pub fn write(&self, path: &Path, name: &str, value: &[u8]) -> io::Result<()> {
        xattr::set(path, name, value)
    }

    /// Tag set for a file: comma-split, trimmed, case-folded. Absent or
    /// unreadable attributes yield the empty set.
    pub fn read_tags(&self, path: &Path) -> BTreeSet<String> {
        let Some(raw) = self.read(path, TAGS_ATTR) else {
            return BTreeSet::new();
        };
        let Ok(joined) = String::from_utf8(raw) else {
            return BTreeSet::new();
        };
        normalize_tags(joined.split(','))
    }

    /// Persist a tag set as a sorted, comma-joined, lower-case string.
    ///
    /// Writing an empty set with no attribute present is a no-op, so
    /// untagged notes work on filesystems without attribute support.
    pub fn write_tags(&self, path: &Path, tags: &BTreeSet<String>) -> io::Result<()> {
        if tags.is_empty() && self.read(path, TAGS_ATTR).is_none() {
            return Ok(());
        }
        let joined = tags.iter().cloned().collect::<Vec<_>>().join(",");
        self.write(path, TAGS_ATTR, joined.as_bytes())
    }

    pub fn read_pinned(&self, path: &Path) -> bool {
        self.read(path, PINNED_ATTR)
            .is_some_and(|raw| raw == b"1")
    }

    pub fn write_pinned(&self, path: &Path, pinned: bool) -> io::Result<()> {
        let value: &[u8] = if pinned { b"1" } else { b"0" };
        self.write(path, PINNED_ATTR, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    /// Not every filesystem supports user extended attributes (tmpfs on
    /// older kernels notably does not). Probe before asserting on them.
    fn xattrs_supported(dir: &Path) -> bool {
        let probe = dir.join("xattr-probe");
        fs::write(&probe, "x").unwrap();
        xattr::set(&probe, "user.nota.probe", b"1").is_ok()
    }

    #[test]
    fn absent_attribute_reads_as_none() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("note.txt");
        fs::write(&file, "content").unwrap();

        let attrs = AttributeStore::new();
        assert_eq!(attrs.read(&file, TAGS_ATTR), None);
        assert_eq!(attrs.read_tags(&file), BTreeSet::new());
        assert!(!attrs.read_pinned(&file));
    }

    #[test]
    fn missing_file_write_fails() {
        let dir = TempDir::new().unwrap();
        let attrs = AttributeStore::new();
        let result = attrs.write(&dir.path().join("nope.txt"), TAGS_ATTR, b"x");
        assert!(result.is_err());
    }

    #[test]
    fn empty_tags_on_untagged_file_is_a_noop() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("note.txt");
        fs::write(&file, "content").unwrap();

        let attrs = AttributeStore::new();
        // Must succeed even where the filesystem lacks xattr support.
        attrs.write_tags(&file, &BTreeSet::new()).unwrap();
        assert_eq!(attrs.read_tags(&file), BTreeSet::new());
    }

    #[test]
    fn tags_round_trip_sorted_and_folded() {
        let dir = TempDir::new().unwrap();
        if !xattrs_supported(dir.path()) {
            eprintln!("skipping: no xattr support on test filesystem");
            return;
        }
        let file = dir.path().join("note.txt");
        fs::write(&file, "content").unwrap();

        let attrs = AttributeStore::new();
        let tags = normalize_tags(["Work", "urgent"]);
        attrs.write_tags(&file, &tags).unwrap();

        let raw = attrs.read(&file, TAGS_ATTR).unwrap();
        assert_eq!(String::from_utf8(raw).unwrap(), "urgent,work");
        assert_eq!(attrs.read_tags(&file), tags);
    }

    #[test]
    fn pinned_flag_round_trips() {
        let dir = TempDir::new().unwrap();
        if !xattrs_supported(dir.path()) {
            eprintln!("skipping: no xattr support on test filesystem");
            return;
        }
        let file = dir.path().join("note.txt");
        fs::write(&file, "content").unwrap();

        let attrs = AttributeStore::new();
        attrs.write_pinned(&file, true).unwrap();
        assert!(attrs.read_pinned(&file));
        attrs.write_pinned(&file, false).unwrap();
        assert!(!attrs.read_pinned(&file));
    }
}

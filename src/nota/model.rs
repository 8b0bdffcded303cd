//! # Domain Model: Notes
//!
//! A [`Note`] is the in-memory image of one file on disk. The file's content
//! bytes are the note's content; everything else rides alongside:
//!
//! - the **title** is derived from the filename stem and kept in sync with it
//!   (renaming a note renames the file),
//! - **tags** and the **pinned** flag live in extended file attributes, not in
//!   the file body (see [`crate::store::attrs`]),
//! - the **id** is process-stable: it never changes for the lifetime of the
//!   note, even as the file is renamed or moved. Reload merging re-attaches
//!   ids to freshly loaded notes by location.
//!
//! ## Tag normalization
//!
//! Tags are case-folded, trimmed and deduplicated on the way in. Storing them
//! in a `BTreeSet` gives the sorted, duplicate-free form the attribute codec
//! expects for free.

use std::collections::BTreeSet;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::richtext;

/// Content encodings a note file may use.
///
/// The rich format is primary; plain text and lightweight markup share the
/// same metadata model and differ only in how content bytes are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NoteFormat {
    Rich,
    Plain,
    Markdown,
}

impl NoteFormat {
    /// File extension for this format, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            NoteFormat::Rich => "rtf",
            NoteFormat::Plain => "txt",
            NoteFormat::Markdown => "md",
        }
    }

    pub fn from_extension(ext: &str) -> Option<NoteFormat> {
        match ext.to_lowercase().as_str() {
            "rtf" => Some(NoteFormat::Rich),
            "txt" => Some(NoteFormat::Plain),
            "md" => Some(NoteFormat::Markdown),
            _ => None,
        }
    }
}

/// Extensions recognized as note files, lower-case.
pub const SUPPORTED_EXTENSIONS: [&str; 3] = ["rtf", "txt", "md"];

#[derive(Debug, Clone, Serialize)]
pub struct Note {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub path: PathBuf,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
    pub tags: BTreeSet<String>,
    pub pinned: bool,
    /// Location of the directory the note file sits in.
    pub parent_dir: PathBuf,
}

impl Note {
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Plain-text preview of the first 100 characters, for list rows.
    pub fn preview(&self) -> String {
        let text = richtext::to_plain(&self.content);
        text.trim().chars().take(100).collect()
    }
}

impl PartialEq for Note {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Note {}

/// Normalize raw tag strings: trim, lower-case, drop empties, deduplicate.
pub fn normalize_tags<I, S>(raw: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    raw.into_iter()
        .map(|t| t.as_ref().trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Default display ordering: pinned notes first, then most recently modified.
pub fn sort_for_display(notes: &mut [Note]) {
    notes.sort_by(|a, b| {
        b.pinned
            .cmp(&a.pinned)
            .then_with(|| b.modified_at.cmp(&a.modified_at))
    });
}

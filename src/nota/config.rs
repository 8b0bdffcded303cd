//! # Configuration
//!
//! Tunables for the engine. Consumers construct a [`NotaConfig`]
//! programmatically (or deserialize one from their own preference storage —
//! preference persistence itself is a host concern, not ours) and hand it to
//! [`crate::notestore::NoteStore::with_config`].

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::model::NoteFormat;

/// Configuration for the note engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotaConfig {
    /// Encoding for newly created notes. Existing notes keep whatever
    /// extension they were found with.
    pub format: NewNoteFormat,

    /// Debounce window for watcher-triggered reloads, in milliseconds.
    pub debounce_ms: u64,

    /// Maximum number of folders remembered for back-navigation.
    pub history_capacity: usize,

    /// Delete permanently instead of moving to the platform trash. Meant for
    /// headless hosts and tests; interactive apps should leave this off.
    pub permanent_delete: bool,
}

/// Serializable mirror of [`NoteFormat`] for new-note creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewNoteFormat {
    Rich,
    Plain,
    Markdown,
}

impl From<NewNoteFormat> for NoteFormat {
    fn from(f: NewNoteFormat) -> Self {
        match f {
            NewNoteFormat::Rich => NoteFormat::Rich,
            NewNoteFormat::Plain => NoteFormat::Plain,
            NewNoteFormat::Markdown => NoteFormat::Markdown,
        }
    }
}

impl Default for NotaConfig {
    fn default() -> Self {
        Self {
            format: NewNoteFormat::Rich,
            debounce_ms: 500,
            history_capacity: 50,
            permanent_delete: false,
        }
    }
}

impl NotaConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

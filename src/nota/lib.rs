//! # nota
//!
//! A local-first storage and synchronization engine for plain-file note
//! collections. Notes are ordinary files in a user-chosen directory; folders
//! are ordinary directories; tags and pin state ride in extended file
//! attributes. The engine keeps an authoritative in-memory picture of that
//! directory, reconciles it against external edits (sync clients, other
//! editors), and exposes the mutating operations a note-taking host needs.
//!
//! ## Architecture
//!
//! The crate is layered; each layer only calls downward:
//!
//! ```text
//! notestore        orchestrator: authoritative state, merge rules, events
//!   ├── folder     in-memory folder tree (arena of stable ids)
//!   ├── watcher    external change detection (signals, no state)
//!   └── store
//!        ├── fs    note/folder filesystem operations, atomic writes
//!        └── attrs extended-attribute metadata side-channel
//! model, richtext, config, error    shared vocabulary underneath
//! ```
//!
//! ## Quick start
//!
//! ```no_run
//! use nota::notestore::NoteStore;
//! use std::path::Path;
//!
//! # fn main() -> nota::error::Result<()> {
//! let mut store = NoteStore::new();
//! store.set_directory(Path::new("/home/me/Notes"))?;
//!
//! store.create_note("Groceries", "milk, eggs");
//!
//! // Host loop: drive reconciliation and consume change events.
//! store.pump();
//! for event in store.drain_events() {
//!     println!("{event:?}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod folder;
pub mod model;
pub mod notestore;
pub mod richtext;
pub mod store;
pub mod watcher;

pub use config::NotaConfig;
pub use error::{NotaError, Result};
pub use model::{Note, NoteFormat};
pub use notestore::{NoteStore, StoreEvent};

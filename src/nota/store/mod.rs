//! # Storage layer
//!
//! Two cooperating halves:
//!
//! - [`fs`] owns the content stream: note files, folder directories, atomic
//!   replaces, trash deletion.
//! - [`attrs`] owns the metadata side-channel: tags and the pinned flag as
//!   extended file attributes.
//!
//! The split exists because the two have opposite durability: content
//! survives anything short of deletion, attributes are lost by the very
//! atomic-replace technique that makes content writes safe. [`fs::FileStore`]
//! encodes the read-before/restore-after discipline so callers above never
//! think about it.

pub mod attrs;
pub mod fs;

pub use attrs::AttributeStore;
pub use fs::{FileStore, FolderSnapshot};

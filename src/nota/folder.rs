//! # Folder tree
//!
//! In-memory arena of the folder hierarchy under the notes root. Folders are
//! identified by process-stable [`Uuid`]s and looked up through the arena
//! map; parent/child links are ids, never references, so the tree is plain
//! owned data with no lifetime entanglement.
//!
//! The tree is rebuilt from a [`FolderSnapshot`] whenever the store rescans
//! the disk, which means folder ids are stable only between rescans.
//! Navigation code that holds ids across a rebuild must tolerate lookups
//! returning `None`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::store::FolderSnapshot;

#[derive(Debug, Clone)]
pub struct Folder {
    pub id: Uuid,
    pub name: String,
    pub path: PathBuf,
    pub parent: Option<Uuid>,
    pub children: Vec<Uuid>,
    /// UI disclosure state, carried here so hosts need no side table.
    pub expanded: bool,
}

#[derive(Debug, Clone)]
pub struct FolderTree {
    folders: HashMap<Uuid, Folder>,
    root: Uuid,
}

impl FolderTree {
    /// Build a tree from a disk snapshot. The snapshot's own node becomes
    /// the root folder.
    pub fn from_snapshot(snapshot: &FolderSnapshot) -> Self {
        let mut folders = HashMap::new();
        let root = Self::insert_snapshot(&mut folders, snapshot, None);
        FolderTree { folders, root }
    }

    fn insert_snapshot(
        folders: &mut HashMap<Uuid, Folder>,
        snapshot: &FolderSnapshot,
        parent: Option<Uuid>,
    ) -> Uuid {
        let id = Uuid::new_v4();
        folders.insert(
            id,
            Folder {
                id,
                name: snapshot.name.clone(),
                path: snapshot.path.clone(),
                parent,
                children: Vec::new(),
                expanded: parent.is_none(),
            },
        );
        for child in &snapshot.children {
            let child_id = Self::insert_snapshot(folders, child, Some(id));
            if let Some(folder) = folders.get_mut(&id) {
                folder.children.push(child_id);
            }
        }
        id
    }

    pub fn root(&self) -> Uuid {
        self.root
    }

    pub fn get(&self, id: Uuid) -> Option<&Folder> {
        self.folders.get(&id)
    }

    pub fn get_mut(&mut self, id: Uuid) -> Option<&mut Folder> {
        self.folders.get_mut(&id)
    }

    pub fn len(&self) -> usize {
        self.folders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.folders.is_empty()
    }

    pub fn find_by_path(&self, path: &Path) -> Option<&Folder> {
        self.folders.values().find(|f| f.path == path)
    }

    /// Ids from the root down to `id`, inclusive. Empty if `id` is unknown.
    pub fn path_to(&self, id: Uuid) -> Vec<Uuid> {
        let mut chain = Vec::new();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let Some(folder) = self.folders.get(&current) else {
                return Vec::new();
            };
            chain.push(current);
            cursor = folder.parent;
        }
        chain.reverse();
        chain
    }

    /// Nesting depth below the root; the root itself is depth 0.
    pub fn depth(&self, id: Uuid) -> usize {
        self.path_to(id).len().saturating_sub(1)
    }

    /// Direct child of `parent` with the given name, compared
    /// case-insensitively to match the filesystem scan.
    pub fn subfolder_named(&self, parent: Uuid, name: &str) -> Option<&Folder> {
        let parent = self.folders.get(&parent)?;
        parent
            .children
            .iter()
            .filter_map(|id| self.folders.get(id))
            .find(|f| f.name.eq_ignore_ascii_case(name))
    }

    /// Insert a freshly created folder under `parent`, keeping that parent's
    /// children sorted. Returns the new folder's id.
    pub fn insert_child(&mut self, parent: Uuid, name: &str, path: PathBuf) -> Option<Uuid> {
        if !self.folders.contains_key(&parent) {
            return None;
        }
        let id = Uuid::new_v4();
        self.folders.insert(
            id,
            Folder {
                id,
                name: name.to_string(),
                path,
                parent: Some(parent),
                children: Vec::new(),
                expanded: false,
            },
        );
        if let Some(folder) = self.folders.get_mut(&parent) {
            folder.children.push(id);
        }
        self.sort_children(parent);
        Some(id)
    }

    /// Rename a folder in place, rewriting its own path and the path prefix
    /// of every descendant. Returns the folder's new path.
    pub fn rename(&mut self, id: Uuid, new_name: &str, new_path: PathBuf) -> Option<PathBuf> {
        let old_path = self.folders.get(&id)?.path.clone();

        let descendants = self.descendants(id);
        for desc_id in descendants {
            if let Some(folder) = self.folders.get_mut(&desc_id) {
                if let Ok(rest) = folder.path.strip_prefix(&old_path) {
                    folder.path = new_path.join(rest);
                }
            }
        }

        let folder = self.folders.get_mut(&id)?;
        folder.name = new_name.to_string();
        folder.path = new_path.clone();

        if let Some(parent) = folder.parent {
            self.sort_children(parent);
        }
        Some(new_path)
    }

    /// Remove a folder and its whole subtree from the arena. The root cannot
    /// be removed. Returns the ids that were evicted.
    pub fn remove(&mut self, id: Uuid) -> Vec<Uuid> {
        if id == self.root || !self.folders.contains_key(&id) {
            return Vec::new();
        }

        let mut evicted = vec![id];
        evicted.extend(self.descendants(id));

        if let Some(parent) = self.folders.get(&id).and_then(|f| f.parent) {
            if let Some(parent_folder) = self.folders.get_mut(&parent) {
                parent_folder.children.retain(|c| *c != id);
            }
        }
        for evicted_id in &evicted {
            self.folders.remove(evicted_id);
        }
        evicted
    }

    /// All ids strictly below `id`, depth-first.
    pub fn descendants(&self, id: Uuid) -> Vec<Uuid> {
        let mut out = Vec::new();
        let mut stack: Vec<Uuid> = self
            .folders
            .get(&id)
            .map(|f| f.children.clone())
            .unwrap_or_default();
        while let Some(current) = stack.pop() {
            out.push(current);
            if let Some(folder) = self.folders.get(&current) {
                stack.extend(folder.children.iter().copied());
            }
        }
        out
    }

    fn sort_children(&mut self, parent: Uuid) {
        let Some(folder) = self.folders.get(&parent) else {
            return;
        };
        let mut children = folder.children.clone();
        children.sort_by_cached_key(|id| {
            self.folders
                .get(id)
                .map(|f| f.name.to_lowercase())
                .unwrap_or_default()
        });
        if let Some(folder) = self.folders.get_mut(&parent) {
            folder.children = children;
        }
    }
}

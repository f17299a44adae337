//! Demo folder tree used to populate an empty store.

use chrono::Utc;
use uuid::Uuid;

use crate::models::folders::{File, Folder};

const ROOT_FOLDERS: usize = 4;
const CHILDREN_PER_FOLDER: usize = 10;
const FILES_PER_FOLDER: usize = 5;
const DEPTH: usize = 4;

#[derive(Debug, Default)]
pub struct SeedTree {
    /// Parents always come before their children.
    pub folders: Vec<Folder>,
    pub files: Vec<File>,
}

pub fn folder(name: &str, parent_id: Option<Uuid>) -> Folder {
    let now = Utc::now();
    Folder {
        id: Uuid::new_v4(),
        name: name.to_string(),
        parent_id,
        created_at: now,
        updated_at: now,
    }
}

pub fn file(name: &str, folder_id: Uuid) -> File {
    let now = Utc::now();
    File {
        id: Uuid::new_v4(),
        folder_id,
        name: name.to_string(),
        created_at: now,
        updated_at: now,
    }
}

/// Four roots, ten children per folder down to level four, five files in
/// every folder.
pub fn demo_tree() -> SeedTree {
    let mut tree = SeedTree::default();

    let mut level: Vec<Folder> = (1..=ROOT_FOLDERS)
        .map(|i| folder(&format!("Level 1 Folder {i}"), None))
        .collect();

    for depth in 1..=DEPTH {
        for parent in &level {
            tree.files.extend(
                (1..=FILES_PER_FOLDER)
                    .map(|i| file(&format!("File {i} {}", parent.name), parent.id)),
            );
        }

        let next: Vec<Folder> = if depth < DEPTH {
            level
                .iter()
                .flat_map(|parent| {
                    (1..=CHILDREN_PER_FOLDER).map(move |i| {
                        folder(&format!("Level {} Folder {i}", depth + 1), Some(parent.id))
                    })
                })
                .collect()
        } else {
            Vec::new()
        };

        tree.folders.append(&mut level);
        level = next;
    }

    tree
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn demo_tree_shape() {
        let tree = demo_tree();
        assert_eq!(tree.folders.len(), 4 + 40 + 400 + 4000);
        assert_eq!(tree.files.len(), tree.folders.len() * 5);
        assert_eq!(
            tree.folders.iter().filter(|f| f.parent_id.is_none()).count(),
            4
        );
    }

    #[test]
    fn parents_precede_children() {
        let tree = demo_tree();
        let mut seen = HashSet::new();
        for folder in &tree.folders {
            if let Some(parent) = folder.parent_id {
                assert!(seen.contains(&parent), "{} listed before its parent", folder.name);
            }
            seen.insert(folder.id);
        }
        assert!(tree.files.iter().all(|file| seen.contains(&file.folder_id)));
    }

    #[test]
    fn names_follow_levels() {
        let tree = demo_tree();
        let leaf = tree.folders.last().unwrap();
        assert_eq!(leaf.name, "Level 4 Folder 10");
        assert!(tree.files.iter().any(|file| file.name == "File 3 Level 2 Folder 7"));
    }
}

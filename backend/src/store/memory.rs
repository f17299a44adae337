use std::{
    cmp::Ordering,
    collections::{HashMap, HashSet},
    sync::Arc,
};

use tracing::debug;
use uuid::Uuid;

use super::{ContentLookup, FileLookup, FolderLookup, NameSearch};
use crate::{
    contents::cmp_names,
    error::AppError,
    models::folders::{ContentEntry, File, Folder},
    pagination::PageWindow,
    seed::SeedTree,
};

/// Immutable in-process snapshot of a folder tree.
///
/// Built once at startup and shared read-only. It has no combined ordering,
/// so merged listings go through the in-memory merge.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Snapshot>,
}

#[derive(Debug, Default)]
struct Snapshot {
    folder_ids: HashSet<Uuid>,
    roots: Vec<Folder>,
    children: HashMap<Uuid, Vec<Folder>>,
    files: HashMap<Uuid, Vec<File>>,
    all_folders: Vec<Folder>,
    all_files: Vec<File>,
}

impl MemoryStore {
    pub fn new(folders: Vec<Folder>, files: Vec<File>) -> Self {
        let mut snapshot = Snapshot {
            folder_ids: folders.iter().map(|folder| folder.id).collect(),
            ..Snapshot::default()
        };

        for folder in &folders {
            match folder.parent_id {
                Some(parent) => snapshot
                    .children
                    .entry(parent)
                    .or_default()
                    .push(folder.clone()),
                None => snapshot.roots.push(folder.clone()),
            }
        }
        for file in &files {
            snapshot
                .files
                .entry(file.folder_id)
                .or_default()
                .push(file.clone());
        }

        snapshot.roots.sort_by(cmp_folders);
        for list in snapshot.children.values_mut() {
            list.sort_by(cmp_folders);
        }
        for list in snapshot.files.values_mut() {
            list.sort_by(cmp_files);
        }

        snapshot.all_folders = folders;
        snapshot.all_folders.sort_by(cmp_folders);
        snapshot.all_files = files;
        snapshot.all_files.sort_by(cmp_files);

        debug!(
            folders = snapshot.all_folders.len(),
            files = snapshot.all_files.len(),
            "memory store snapshot built"
        );

        Self {
            inner: Arc::new(snapshot),
        }
    }

    pub fn from_seed(tree: SeedTree) -> Self {
        Self::new(tree.folders, tree.files)
    }
}

fn cmp_folders(a: &Folder, b: &Folder) -> Ordering {
    cmp_names(&a.name, &b.name).then_with(|| a.id.cmp(&b.id))
}

fn cmp_files(a: &File, b: &File) -> Ordering {
    cmp_names(&a.name, &b.name).then_with(|| a.id.cmp(&b.id))
}

fn to_usize(value: u64) -> usize {
    usize::try_from(value).unwrap_or(usize::MAX)
}

fn window_of<T: Clone>(items: &[T], skip: u64, take: u64) -> Vec<T> {
    items
        .iter()
        .skip(to_usize(skip))
        .take(to_usize(take))
        .cloned()
        .collect()
}

fn matches_needle(name: &str, needle: &str) -> bool {
    name.to_lowercase().contains(&needle.to_lowercase())
}

impl FolderLookup for MemoryStore {
    async fn folder_exists(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.inner.folder_ids.contains(&id))
    }

    async fn list_roots(&self, skip: u64, take: u64) -> Result<Vec<Folder>, AppError> {
        Ok(window_of(&self.inner.roots, skip, take))
    }

    async fn count_roots(&self) -> Result<u64, AppError> {
        Ok(self.inner.roots.len() as u64)
    }

    async fn list_children(
        &self,
        parent_id: Uuid,
        skip: u64,
        take: u64,
    ) -> Result<Vec<Folder>, AppError> {
        Ok(self
            .inner
            .children
            .get(&parent_id)
            .map(|list| window_of(list, skip, take))
            .unwrap_or_default())
    }

    async fn count_children(&self, parent_id: Uuid) -> Result<u64, AppError> {
        Ok(self
            .inner
            .children
            .get(&parent_id)
            .map_or(0, |list| list.len() as u64))
    }
}

impl FileLookup for MemoryStore {
    async fn list_files(
        &self,
        folder_id: Uuid,
        skip: u64,
        take: u64,
    ) -> Result<Vec<File>, AppError> {
        Ok(self
            .inner
            .files
            .get(&folder_id)
            .map(|list| window_of(list, skip, take))
            .unwrap_or_default())
    }

    async fn count_files(&self, folder_id: Uuid) -> Result<u64, AppError> {
        Ok(self
            .inner
            .files
            .get(&folder_id)
            .map_or(0, |list| list.len() as u64))
    }
}

impl ContentLookup for MemoryStore {
    async fn list_contents(
        &self,
        _folder_id: Uuid,
        _window: PageWindow,
    ) -> Result<Option<Vec<ContentEntry>>, AppError> {
        Ok(None)
    }
}

impl NameSearch for MemoryStore {
    async fn search_folders(
        &self,
        needle: &str,
        skip: u64,
        take: u64,
    ) -> Result<Vec<Folder>, AppError> {
        Ok(self
            .inner
            .all_folders
            .iter()
            .filter(|folder| matches_needle(&folder.name, needle))
            .skip(to_usize(skip))
            .take(to_usize(take))
            .cloned()
            .collect())
    }

    async fn count_folder_search(&self, needle: &str) -> Result<u64, AppError> {
        Ok(self
            .inner
            .all_folders
            .iter()
            .filter(|folder| matches_needle(&folder.name, needle))
            .count() as u64)
    }

    async fn search_files(
        &self,
        needle: &str,
        skip: u64,
        take: u64,
    ) -> Result<Vec<File>, AppError> {
        Ok(self
            .inner
            .all_files
            .iter()
            .filter(|file| matches_needle(&file.name, needle))
            .skip(to_usize(skip))
            .take(to_usize(take))
            .cloned()
            .collect())
    }

    async fn count_file_search(&self, needle: &str) -> Result<u64, AppError> {
        Ok(self
            .inner
            .all_files
            .iter()
            .filter(|file| matches_needle(&file.name, needle))
            .count() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::{file, folder};

    fn sample() -> (MemoryStore, Folder) {
        let root = folder("root", None);
        let other_root = folder("Archive", None);
        let folders = vec![
            root.clone(),
            other_root,
            folder("zeta", Some(root.id)),
            folder("Beta", Some(root.id)),
            folder("alpha", Some(root.id)),
        ];
        let files = vec![
            file("b.txt", root.id),
            file("A.md", root.id),
            file("c.log", root.id),
        ];
        (MemoryStore::new(folders, files), root)
    }

    #[tokio::test]
    async fn roots_are_name_ordered() {
        let (store, _) = sample();
        let names: Vec<String> = store
            .list_roots(0, 10)
            .await
            .unwrap()
            .into_iter()
            .map(|folder| folder.name)
            .collect();
        assert_eq!(names, ["Archive", "root"]);
        assert_eq!(store.count_roots().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn children_ignore_case_when_ordering() {
        let (store, root) = sample();
        let names: Vec<String> = store
            .list_children(root.id, 0, 10)
            .await
            .unwrap()
            .into_iter()
            .map(|folder| folder.name)
            .collect();
        assert_eq!(names, ["alpha", "Beta", "zeta"]);
    }

    #[tokio::test]
    async fn file_windows_skip_and_take() {
        let (store, root) = sample();
        let names: Vec<String> = store
            .list_files(root.id, 1, 1)
            .await
            .unwrap()
            .into_iter()
            .map(|file| file.name)
            .collect();
        assert_eq!(names, ["b.txt"]);
        assert_eq!(store.count_files(root.id).await.unwrap(), 3);
        assert!(store.list_files(root.id, 10, 5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_folder_is_empty_not_an_error() {
        let (store, _) = sample();
        let missing = Uuid::new_v4();
        assert!(!store.folder_exists(missing).await.unwrap());
        assert_eq!(store.count_children(missing).await.unwrap(), 0);
        assert!(store.list_files(missing, 0, 5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn no_native_merge() {
        let (store, root) = sample();
        let window = PageWindow {
            page: 1,
            per_page: 5,
            skip: 0,
        };
        assert!(store.list_contents(root.id, window).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn search_is_case_insensitive() {
        let (store, _) = sample();
        assert_eq!(store.count_folder_search("ETA").await.unwrap(), 2);
        let hits = store.search_files("A.", 0, 10).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "A.md");
    }
}

//! Read-only collaborators the listing use cases depend on.
//!
//! Every backend answers ordered, offset/limited slices plus exact counts.
//! Single-collection slices are ordered by case-insensitive name, then id.

mod memory;
mod postgres;

use std::future::Future;

use uuid::Uuid;

use crate::{
    error::AppError,
    models::folders::{ContentEntry, File, Folder},
    pagination::PageWindow,
};

pub use memory::MemoryStore;
pub use postgres::PgStore;

pub trait FolderLookup {
    fn folder_exists(&self, id: Uuid) -> impl Future<Output = Result<bool, AppError>> + Send;

    fn list_roots(
        &self,
        skip: u64,
        take: u64,
    ) -> impl Future<Output = Result<Vec<Folder>, AppError>> + Send;

    fn count_roots(&self) -> impl Future<Output = Result<u64, AppError>> + Send;

    fn list_children(
        &self,
        parent_id: Uuid,
        skip: u64,
        take: u64,
    ) -> impl Future<Output = Result<Vec<Folder>, AppError>> + Send;

    fn count_children(&self, parent_id: Uuid)
    -> impl Future<Output = Result<u64, AppError>> + Send;
}

pub trait FileLookup {
    fn list_files(
        &self,
        folder_id: Uuid,
        skip: u64,
        take: u64,
    ) -> impl Future<Output = Result<Vec<File>, AppError>> + Send;

    fn count_files(&self, folder_id: Uuid) -> impl Future<Output = Result<u64, AppError>> + Send;
}

/// Optional native merge of a folder's sub-folders and files.
pub trait ContentLookup {
    /// Returns the windowed, folder-first, name-ordered slice of the merged
    /// listing, or `None` when the backend cannot order across both
    /// collections and the caller has to merge.
    fn list_contents(
        &self,
        folder_id: Uuid,
        window: PageWindow,
    ) -> impl Future<Output = Result<Option<Vec<ContentEntry>>, AppError>> + Send;
}

/// Case-insensitive substring search on names.
pub trait NameSearch {
    fn search_folders(
        &self,
        needle: &str,
        skip: u64,
        take: u64,
    ) -> impl Future<Output = Result<Vec<Folder>, AppError>> + Send;

    fn count_folder_search(&self, needle: &str)
    -> impl Future<Output = Result<u64, AppError>> + Send;

    fn search_files(
        &self,
        needle: &str,
        skip: u64,
        take: u64,
    ) -> impl Future<Output = Result<Vec<File>, AppError>> + Send;

    fn count_file_search(&self, needle: &str) -> impl Future<Output = Result<u64, AppError>> + Send;
}

/// The backend picked at startup.
#[derive(Debug, Clone)]
pub enum Store {
    Postgres(PgStore),
    Memory(MemoryStore),
}

impl Store {
    pub fn backend_name(&self) -> &'static str {
        match self {
            Store::Postgres(_) => "postgres",
            Store::Memory(_) => "memory",
        }
    }
}

macro_rules! dispatch {
    ($self:ident, $store:ident => $call:expr) => {
        match $self {
            Store::Postgres($store) => $call.await,
            Store::Memory($store) => $call.await,
        }
    };
}

impl FolderLookup for Store {
    async fn folder_exists(&self, id: Uuid) -> Result<bool, AppError> {
        dispatch!(self, store => store.folder_exists(id))
    }

    async fn list_roots(&self, skip: u64, take: u64) -> Result<Vec<Folder>, AppError> {
        dispatch!(self, store => store.list_roots(skip, take))
    }

    async fn count_roots(&self) -> Result<u64, AppError> {
        dispatch!(self, store => store.count_roots())
    }

    async fn list_children(
        &self,
        parent_id: Uuid,
        skip: u64,
        take: u64,
    ) -> Result<Vec<Folder>, AppError> {
        dispatch!(self, store => store.list_children(parent_id, skip, take))
    }

    async fn count_children(&self, parent_id: Uuid) -> Result<u64, AppError> {
        dispatch!(self, store => store.count_children(parent_id))
    }
}

impl FileLookup for Store {
    async fn list_files(
        &self,
        folder_id: Uuid,
        skip: u64,
        take: u64,
    ) -> Result<Vec<File>, AppError> {
        dispatch!(self, store => store.list_files(folder_id, skip, take))
    }

    async fn count_files(&self, folder_id: Uuid) -> Result<u64, AppError> {
        dispatch!(self, store => store.count_files(folder_id))
    }
}

impl ContentLookup for Store {
    async fn list_contents(
        &self,
        folder_id: Uuid,
        window: PageWindow,
    ) -> Result<Option<Vec<ContentEntry>>, AppError> {
        dispatch!(self, store => store.list_contents(folder_id, window))
    }
}

impl NameSearch for Store {
    async fn search_folders(
        &self,
        needle: &str,
        skip: u64,
        take: u64,
    ) -> Result<Vec<Folder>, AppError> {
        dispatch!(self, store => store.search_folders(needle, skip, take))
    }

    async fn count_folder_search(&self, needle: &str) -> Result<u64, AppError> {
        dispatch!(self, store => store.count_folder_search(needle))
    }

    async fn search_files(
        &self,
        needle: &str,
        skip: u64,
        take: u64,
    ) -> Result<Vec<File>, AppError> {
        dispatch!(self, store => store.search_files(needle, skip, take))
    }

    async fn count_file_search(&self, needle: &str) -> Result<u64, AppError> {
        dispatch!(self, store => store.count_file_search(needle))
    }
}

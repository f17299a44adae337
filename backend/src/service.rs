//! Listing use cases. Each one checks its anchor folder, reads a slice and its
//! count, projects rows to DTOs and attaches pagination metadata.

use tracing::debug;
use uuid::Uuid;

use crate::{
    contents,
    error::AppError,
    models::folders::{ContentDto, FileDto, FolderDto},
    pagination::{PageWindow, PaginationMeta, build_meta},
    store::{ContentLookup, FileLookup, FolderLookup, NameSearch},
};

#[derive(Debug, Clone)]
pub struct Listing<T> {
    pub items: Vec<T>,
    pub meta: PaginationMeta,
}

impl<T> Listing<T> {
    fn new<R>(rows: Vec<R>, total: u64, base_url: &str, window: PageWindow) -> Self
    where
        T: From<R>,
    {
        Self {
            items: rows.into_iter().map(T::from).collect(),
            meta: build_meta(total, base_url, window.page, window.per_page),
        }
    }
}

async fn ensure_folder<S: FolderLookup>(store: &S, id: Uuid) -> Result<(), AppError> {
    if store.folder_exists(id).await? {
        Ok(())
    } else {
        debug!(folder_id = %id, "anchor folder missing");
        Err(AppError::folder_not_found())
    }
}

pub async fn root_folders<S: FolderLookup>(
    store: &S,
    window: PageWindow,
    base_url: &str,
) -> Result<Listing<FolderDto>, AppError> {
    let (rows, total) = tokio::try_join!(
        store.list_roots(window.skip, window.per_page),
        store.count_roots(),
    )?;
    Ok(Listing::new(rows, total, base_url, window))
}

pub async fn sub_folders<S: FolderLookup>(
    store: &S,
    parent_id: Uuid,
    window: PageWindow,
    base_url: &str,
) -> Result<Listing<FolderDto>, AppError> {
    ensure_folder(store, parent_id).await?;
    let (rows, total) = tokio::try_join!(
        store.list_children(parent_id, window.skip, window.per_page),
        store.count_children(parent_id),
    )?;
    Ok(Listing::new(rows, total, base_url, window))
}

pub async fn folder_files<S: FolderLookup + FileLookup>(
    store: &S,
    folder_id: Uuid,
    window: PageWindow,
    base_url: &str,
) -> Result<Listing<FileDto>, AppError> {
    ensure_folder(store, folder_id).await?;
    let (rows, total) = tokio::try_join!(
        store.list_files(folder_id, window.skip, window.per_page),
        store.count_files(folder_id),
    )?;
    Ok(Listing::new(rows, total, base_url, window))
}

pub async fn folder_contents<S: FolderLookup + FileLookup + ContentLookup>(
    store: &S,
    folder_id: Uuid,
    window: PageWindow,
    base_url: &str,
) -> Result<Listing<ContentDto>, AppError> {
    let page = contents::list_contents(store, folder_id, window).await?;
    Ok(Listing {
        items: page
            .entries
            .into_iter()
            .map(|entry| ContentDto::from_entry(entry, folder_id))
            .collect(),
        meta: build_meta(page.total, base_url, window.page, window.per_page),
    })
}

pub async fn search_folders<S: NameSearch>(
    store: &S,
    needle: &str,
    window: PageWindow,
    base_url: &str,
) -> Result<Listing<FolderDto>, AppError> {
    let (rows, total) = tokio::try_join!(
        store.search_folders(needle, window.skip, window.per_page),
        store.count_folder_search(needle),
    )?;
    Ok(Listing::new(rows, total, base_url, window))
}

pub async fn search_files<S: NameSearch>(
    store: &S,
    needle: &str,
    window: PageWindow,
    base_url: &str,
) -> Result<Listing<FileDto>, AppError> {
    let (rows, total) = tokio::try_join!(
        store.search_files(needle, window.skip, window.per_page),
        store.count_file_search(needle),
    )?;
    Ok(Listing::new(rows, total, base_url, window))
}

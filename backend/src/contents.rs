//! Merged folder contents: sub-folders and files as one ordered, paged list.
//!
//! Order is kind first, compared descending by kind name so `folder` sorts
//! ahead of `file`, then name ascending ignoring case. Equal names within a
//! kind keep the order the store returned them in.
//!
//! The page window applies to the merged sequence. A store that can order
//! across both collections answers directly; otherwise both sources are read
//! up to `skip + per_page` rows each and merged here.

use std::cmp::Ordering;

use tracing::debug;
use uuid::Uuid;

use crate::{
    error::AppError,
    models::folders::ContentEntry,
    pagination::PageWindow,
    store::{ContentLookup, FileLookup, FolderLookup},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentPage {
    pub entries: Vec<ContentEntry>,
    pub total: u64,
}

/// Case-insensitive name order.
pub fn cmp_names(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

pub fn cmp_entries(a: &ContentEntry, b: &ContentEntry) -> Ordering {
    b.kind
        .as_str()
        .cmp(a.kind.as_str())
        .then_with(|| cmp_names(&a.name, &b.name))
}

/// Two-pointer merge of two already-ordered sequences. On ties the left
/// element goes first, so the merge is stable.
pub fn merge_by<T, L, R, F>(left: L, right: R, mut compare: F) -> Vec<T>
where
    L: IntoIterator<Item = T>,
    R: IntoIterator<Item = T>,
    F: FnMut(&T, &T) -> Ordering,
{
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();
    let mut merged = Vec::with_capacity(left.size_hint().0 + right.size_hint().0);

    loop {
        let take_left = match (left.peek(), right.peek()) {
            (Some(l), Some(r)) => compare(l, r) != Ordering::Greater,
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (None, None) => break,
        };
        let next = if take_left { left.next() } else { right.next() };
        merged.extend(next);
    }

    merged
}

pub async fn list_contents<S>(
    store: &S,
    folder_id: Uuid,
    window: PageWindow,
) -> Result<ContentPage, AppError>
where
    S: FolderLookup + FileLookup + ContentLookup,
{
    if !store.folder_exists(folder_id).await? {
        return Err(AppError::folder_not_found());
    }

    let (folder_total, file_total, native) = tokio::try_join!(
        store.count_children(folder_id),
        store.count_files(folder_id),
        store.list_contents(folder_id, window),
    )?;
    let total = folder_total.saturating_add(file_total);

    if let Some(entries) = native {
        debug!(%folder_id, total, rows = entries.len(), "contents merged by store");
        return Ok(ContentPage { entries, total });
    }

    let reach = window.end();
    let (folders, files) = tokio::try_join!(
        store.list_children(folder_id, 0, reach.min(folder_total)),
        store.list_files(folder_id, 0, reach.min(file_total)),
    )?;

    let merged = merge_by(
        folders.into_iter().map(ContentEntry::from),
        files.into_iter().map(ContentEntry::from),
        cmp_entries,
    );
    let entries = merged
        .into_iter()
        .skip(usize::try_from(window.skip).unwrap_or(usize::MAX))
        .take(usize::try_from(window.per_page).unwrap_or(usize::MAX))
        .collect::<Vec<_>>();

    debug!(%folder_id, total, rows = entries.len(), "contents merged in memory");
    Ok(ContentPage { entries, total })
}

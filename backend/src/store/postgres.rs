use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::{debug, warn};
use uuid::Uuid;

use super::{ContentLookup, FileLookup, FolderLookup, NameSearch};
use crate::{
    error::AppError,
    models::folders::{ContentEntry, ContentKind, File, Folder},
    pagination::PageWindow,
};

const FOLDER_COLUMNS: &str = "id, name, parent_id, created_at, updated_at";
const FILE_COLUMNS: &str = "id, folder_id, name, created_at, updated_at";

/// PostgreSQL-backed store. Orders names with `lower(name) COLLATE "C"`,
/// which matches the in-memory comparator.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

#[derive(FromRow)]
struct ContentRow {
    id: Uuid,
    name: String,
    kind: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn to_sql_int(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn to_count(value: i64) -> u64 {
    value.max(0) as u64
}

fn like_pattern(needle: &str) -> String {
    let escaped = needle
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

fn to_content_entry(row: ContentRow) -> Result<ContentEntry, AppError> {
    let Some(kind) = ContentKind::from_db_value(&row.kind) else {
        warn!(id = %row.id, kind = %row.kind, "content row with unknown kind");
        return Err(AppError::Database(sqlx::Error::Decode(
            format!("unknown content kind `{}`", row.kind).into(),
        )));
    };
    Ok(ContentEntry {
        id: row.id,
        name: row.name,
        kind,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

impl FolderLookup for PgStore {
    async fn folder_exists(&self, id: Uuid) -> Result<bool, AppError> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM folders WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_roots(&self, skip: u64, take: u64) -> Result<Vec<Folder>, AppError> {
        debug!(skip, take, "listing root folders");
        sqlx::query_as::<_, Folder>(&format!(
            r#"
            SELECT {FOLDER_COLUMNS}
            FROM folders
            WHERE parent_id IS NULL
            ORDER BY lower(name) COLLATE "C", id
            OFFSET $1 LIMIT $2
            "#
        ))
        .bind(to_sql_int(skip))
        .bind(to_sql_int(take))
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn count_roots(&self) -> Result<u64, AppError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM folders WHERE parent_id IS NULL")
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(to_count(total))
    }

    async fn list_children(
        &self,
        parent_id: Uuid,
        skip: u64,
        take: u64,
    ) -> Result<Vec<Folder>, AppError> {
        debug!(%parent_id, skip, take, "listing child folders");
        sqlx::query_as::<_, Folder>(&format!(
            r#"
            SELECT {FOLDER_COLUMNS}
            FROM folders
            WHERE parent_id = $1
            ORDER BY lower(name) COLLATE "C", id
            OFFSET $2 LIMIT $3
            "#
        ))
        .bind(parent_id)
        .bind(to_sql_int(skip))
        .bind(to_sql_int(take))
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn count_children(&self, parent_id: Uuid) -> Result<u64, AppError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM folders WHERE parent_id = $1")
            .bind(parent_id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(to_count(total))
    }
}

impl FileLookup for PgStore {
    async fn list_files(
        &self,
        folder_id: Uuid,
        skip: u64,
        take: u64,
    ) -> Result<Vec<File>, AppError> {
        debug!(%folder_id, skip, take, "listing files");
        sqlx::query_as::<_, File>(&format!(
            r#"
            SELECT {FILE_COLUMNS}
            FROM files
            WHERE folder_id = $1
            ORDER BY lower(name) COLLATE "C", id
            OFFSET $2 LIMIT $3
            "#
        ))
        .bind(folder_id)
        .bind(to_sql_int(skip))
        .bind(to_sql_int(take))
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn count_files(&self, folder_id: Uuid) -> Result<u64, AppError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM files WHERE folder_id = $1")
            .bind(folder_id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(to_count(total))
    }
}

impl ContentLookup for PgStore {
    async fn list_contents(
        &self,
        folder_id: Uuid,
        window: PageWindow,
    ) -> Result<Option<Vec<ContentEntry>>, AppError> {
        debug!(%folder_id, skip = window.skip, take = window.per_page, "listing merged contents");
        let rows = sqlx::query_as::<_, ContentRow>(
            r#"
            SELECT id, name, kind, created_at, updated_at
            FROM (
                SELECT id, name, 'folder'::text AS kind, created_at, updated_at
                FROM folders
                WHERE parent_id = $1

                UNION ALL

                SELECT id, name, 'file'::text AS kind, created_at, updated_at
                FROM files
                WHERE folder_id = $1
            ) AS contents
            ORDER BY kind DESC, lower(name) COLLATE "C", id
            OFFSET $2 LIMIT $3
            "#,
        )
        .bind(folder_id)
        .bind(to_sql_int(window.skip))
        .bind(to_sql_int(window.per_page))
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)?;

        let entries = rows
            .into_iter()
            .map(to_content_entry)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Some(entries))
    }
}

impl NameSearch for PgStore {
    async fn search_folders(
        &self,
        needle: &str,
        skip: u64,
        take: u64,
    ) -> Result<Vec<Folder>, AppError> {
        sqlx::query_as::<_, Folder>(&format!(
            r#"
            SELECT {FOLDER_COLUMNS}
            FROM folders
            WHERE name ILIKE $1
            ORDER BY lower(name) COLLATE "C", id
            OFFSET $2 LIMIT $3
            "#
        ))
        .bind(like_pattern(needle))
        .bind(to_sql_int(skip))
        .bind(to_sql_int(take))
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn count_folder_search(&self, needle: &str) -> Result<u64, AppError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM folders WHERE name ILIKE $1")
            .bind(like_pattern(needle))
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(to_count(total))
    }

    async fn search_files(
        &self,
        needle: &str,
        skip: u64,
        take: u64,
    ) -> Result<Vec<File>, AppError> {
        sqlx::query_as::<_, File>(&format!(
            r#"
            SELECT {FILE_COLUMNS}
            FROM files
            WHERE name ILIKE $1
            ORDER BY lower(name) COLLATE "C", id
            OFFSET $2 LIMIT $3
            "#
        ))
        .bind(like_pattern(needle))
        .bind(to_sql_int(skip))
        .bind(to_sql_int(take))
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn count_file_search(&self, needle: &str) -> Result<u64, AppError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM files WHERE name ILIKE $1")
            .bind(like_pattern(needle))
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(to_count(total))
    }
}

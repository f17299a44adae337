use chrono::{DateTime, Utc};
use sqlx::{PgPool, postgres::PgPoolOptions};
use tracing::info;
use uuid::Uuid;

use crate::{error::AppError, seed::SeedTree};

const SEED_CHUNK: usize = 1000;

pub fn init_pool(database_url: &str, max_connections: u32) -> Result<PgPool, AppError> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect_lazy(database_url)
        .map_err(AppError::Database)
}

pub async fn prepare_schema(pool: &PgPool, reset: bool) -> Result<(), AppError> {
    if reset {
        reset_schema(pool).await?;
    }
    create_schema(pool).await
}

async fn reset_schema(pool: &PgPool) -> Result<(), AppError> {
    let drop_statements = ["DROP TABLE IF EXISTS files", "DROP TABLE IF EXISTS folders"];

    for statement in drop_statements {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(AppError::Database)?;
    }

    Ok(())
}

async fn create_schema(pool: &PgPool) -> Result<(), AppError> {
    let statements = [
        r#"CREATE EXTENSION IF NOT EXISTS "pgcrypto""#,
        r#"
        CREATE TABLE IF NOT EXISTS folders (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name TEXT NOT NULL CHECK (name <> ''),
            parent_id UUID REFERENCES folders(id) ON DELETE CASCADE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            CHECK (parent_id IS NULL OR parent_id <> id)
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS files (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            folder_id UUID NOT NULL REFERENCES folders(id) ON DELETE CASCADE,
            name TEXT NOT NULL CHECK (name <> ''),
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
        r#"
        CREATE INDEX IF NOT EXISTS idx_folders_parent_name
        ON folders (parent_id, (lower(name) COLLATE "C"), id)
        "#,
        r#"
        CREATE INDEX IF NOT EXISTS idx_files_folder_name
        ON files (folder_id, (lower(name) COLLATE "C"), id)
        "#,
    ];

    for statement in statements {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(AppError::Database)?;
    }

    Ok(())
}

/// Replaces all folders and files with `tree` in one transaction.
pub async fn seed(pool: &PgPool, tree: &SeedTree) -> Result<(), AppError> {
    let mut tx = pool.begin().await.map_err(AppError::Database)?;

    sqlx::query("DELETE FROM files")
        .execute(&mut *tx)
        .await
        .map_err(AppError::Database)?;
    sqlx::query("DELETE FROM folders")
        .execute(&mut *tx)
        .await
        .map_err(AppError::Database)?;

    for chunk in tree.folders.chunks(SEED_CHUNK) {
        let ids: Vec<Uuid> = chunk.iter().map(|folder| folder.id).collect();
        let names: Vec<String> = chunk.iter().map(|folder| folder.name.clone()).collect();
        let parents: Vec<Option<Uuid>> = chunk.iter().map(|folder| folder.parent_id).collect();
        let created: Vec<DateTime<Utc>> = chunk.iter().map(|folder| folder.created_at).collect();
        let updated: Vec<DateTime<Utc>> = chunk.iter().map(|folder| folder.updated_at).collect();

        sqlx::query(
            r#"
            INSERT INTO folders (id, name, parent_id, created_at, updated_at)
            SELECT * FROM UNNEST(
                $1::uuid[], $2::text[], $3::uuid[], $4::timestamptz[], $5::timestamptz[]
            )
            "#,
        )
        .bind(ids)
        .bind(names)
        .bind(parents)
        .bind(created)
        .bind(updated)
        .execute(&mut *tx)
        .await
        .map_err(AppError::Database)?;
    }

    for chunk in tree.files.chunks(SEED_CHUNK) {
        let ids: Vec<Uuid> = chunk.iter().map(|file| file.id).collect();
        let folders: Vec<Uuid> = chunk.iter().map(|file| file.folder_id).collect();
        let names: Vec<String> = chunk.iter().map(|file| file.name.clone()).collect();
        let created: Vec<DateTime<Utc>> = chunk.iter().map(|file| file.created_at).collect();
        let updated: Vec<DateTime<Utc>> = chunk.iter().map(|file| file.updated_at).collect();

        sqlx::query(
            r#"
            INSERT INTO files (id, folder_id, name, created_at, updated_at)
            SELECT * FROM UNNEST(
                $1::uuid[], $2::uuid[], $3::text[], $4::timestamptz[], $5::timestamptz[]
            )
            "#,
        )
        .bind(ids)
        .bind(folders)
        .bind(names)
        .bind(created)
        .bind(updated)
        .execute(&mut *tx)
        .await
        .map_err(AppError::Database)?;
    }

    tx.commit().await.map_err(AppError::Database)?;

    info!(
        folders = tree.folders.len(),
        files = tree.files.len(),
        "database seeded"
    );
    Ok(())
}

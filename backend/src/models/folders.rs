use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Folder {
    pub id: Uuid,
    pub name: String,
    pub parent_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct File {
    pub id: Uuid,
    pub folder_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Folder,
    File,
}

impl ContentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ContentKind::Folder => "folder",
            ContentKind::File => "file",
        }
    }

    pub fn from_db_value(value: &str) -> Option<Self> {
        if value.eq_ignore_ascii_case("folder") {
            Some(ContentKind::Folder)
        } else if value.eq_ignore_ascii_case("file") {
            Some(ContentKind::File)
        } else {
            None
        }
    }
}

/// One row of a merged folder listing. Built per request, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentEntry {
    pub id: Uuid,
    pub name: String,
    pub kind: ContentKind,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Folder> for ContentEntry {
    fn from(folder: Folder) -> Self {
        Self {
            id: folder.id,
            name: folder.name,
            kind: ContentKind::Folder,
            created_at: folder.created_at,
            updated_at: folder.updated_at,
        }
    }
}

impl From<File> for ContentEntry {
    fn from(file: File) -> Self {
        Self {
            id: file.id,
            name: file.name,
            kind: ContentKind::File,
            created_at: file.created_at,
            updated_at: file.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderDto {
    pub id: Uuid,
    pub name: String,
    pub parent_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Folder> for FolderDto {
    fn from(folder: Folder) -> Self {
        Self {
            id: folder.id,
            name: folder.name,
            parent_id: folder.parent_id,
            created_at: folder.created_at,
            updated_at: folder.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDto {
    pub id: Uuid,
    pub folder_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<File> for FileDto {
    fn from(file: File) -> Self {
        Self {
            id: file.id,
            folder_id: file.folder_id,
            name: file.name,
            created_at: file.created_at,
            updated_at: file.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentDto {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ContentKind,
    pub folder_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ContentDto {
    pub fn from_entry(entry: ContentEntry, folder_id: Uuid) -> Self {
        Self {
            id: entry.id,
            name: entry.name,
            kind: entry.kind,
            folder_id,
            created_at: entry.created_at,
            updated_at: entry.updated_at,
        }
    }
}

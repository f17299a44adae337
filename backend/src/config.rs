use std::{env, path::PathBuf, str::FromStr};

use crate::{error::AppError, pagination::PageDefaults};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    Postgres {
        database_url: String,
        max_connections: u32,
        reset_db: bool,
    },
    Memory,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub storage: StorageConfig,
    pub log_dir: PathBuf,
    pub seed_db: bool,
    pub page_defaults: PageDefaults,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.into());

        let host = var("SERVER_HOST", "0.0.0.0");
        let port: u16 = parse_var("SERVER_PORT", &var("SERVER_PORT", "8080"))?;

        let storage = match var("STORAGE_BACKEND", "postgres").to_ascii_lowercase().as_str() {
            "postgres" => StorageConfig::Postgres {
                database_url: lookup("DATABASE_URL")
                    .ok_or_else(|| AppError::Config("missing DATABASE_URL".into()))?,
                max_connections: parse_var(
                    "DB_MAX_CONNECTIONS",
                    &var("DB_MAX_CONNECTIONS", "5"),
                )?,
                reset_db: parse_var("RESET_DB", &var("RESET_DB", "false"))?,
            },
            "memory" => StorageConfig::Memory,
            other => {
                return Err(AppError::Config(format!(
                    "invalid STORAGE_BACKEND: {other} (expected postgres or memory)"
                )));
            }
        };

        let log_dir = PathBuf::from(var("LOG_DIR", "./log"));
        let seed_db = parse_var("SEED_DB", &var("SEED_DB", "false"))?;

        let fallback = PageDefaults::default();
        let page_defaults = PageDefaults {
            limit: parse_var(
                "PAGE_DEFAULT_LIMIT",
                &var("PAGE_DEFAULT_LIMIT", &fallback.limit.to_string()),
            )?,
            page: fallback.page,
            max: parse_var(
                "PAGE_MAX_LIMIT",
                &var("PAGE_MAX_LIMIT", &fallback.max.to_string()),
            )?,
        };
        if page_defaults.max == 0 {
            return Err(AppError::Config("PAGE_MAX_LIMIT must be at least 1".into()));
        }

        Ok(Self {
            host,
            port,
            storage,
            log_dir,
            seed_db,
            page_defaults,
        })
    }
}

fn parse_var<T>(key: &str, raw: &str) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|err| AppError::Config(format!("invalid {key}: {err}")))
}

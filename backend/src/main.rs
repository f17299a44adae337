mod config;
mod contents;
mod db;
mod error;
mod models;
mod pagination;
mod routes;
mod seed;
mod service;
mod store;

use std::fs;

use actix_cors::Cors;
use actix_web::{
    App, HttpServer,
    middleware::{DefaultHeaders, Logger},
    web,
};
use config::{AppConfig, StorageConfig};
use db::{init_pool, prepare_schema};
use error::AppError;
use pagination::PageDefaults;
use routes::{not_found, register};
use store::{MemoryStore, PgStore, Store};
use tracing::info;
use tracing_appender::rolling;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub struct AppState {
    pub store: Store,
    pub page_defaults: PageDefaults,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env().expect("failed to load config");

    fs::create_dir_all(&config.log_dir).expect("failed to create log directory");
    let file_appender = rolling::never(&config.log_dir, "backend.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
    let _guard = guard;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .expect("failed to init logging filter");

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer())
        .with(fmt::layer().with_ansi(false).with_writer(file_writer))
        .init();

    let store = open_store(&config)
        .await
        .expect("failed to open folder store");

    info!(
        host = %config.host,
        port = config.port,
        storage = store.backend_name(),
        max_page_size = config.page_defaults.max,
        "starting folder tree backend"
    );

    let bind_addr = format!("{}:{}", config.host, config.port);
    let shared_state = web::Data::new(AppState {
        store,
        page_defaults: config.page_defaults,
    });

    HttpServer::new(move || {
        App::new()
            .wrap(security_headers())
            .wrap(Logger::default())
            .wrap(Cors::permissive())
            .app_data(shared_state.clone())
            .configure(register)
            .default_service(web::to(not_found))
    })
    .bind(bind_addr)?
    .run()
    .await
}

async fn open_store(config: &AppConfig) -> Result<Store, AppError> {
    match &config.storage {
        StorageConfig::Postgres {
            database_url,
            max_connections,
            reset_db,
        } => {
            let pool = init_pool(database_url, *max_connections)?;
            prepare_schema(&pool, *reset_db).await?;
            let store = PgStore::new(pool);
            if config.seed_db {
                db::seed(store.pool(), &seed::demo_tree()).await?;
            }
            Ok(Store::Postgres(store))
        }
        StorageConfig::Memory => {
            let store = if config.seed_db {
                MemoryStore::from_seed(seed::demo_tree())
            } else {
                MemoryStore::default()
            };
            Ok(Store::Memory(store))
        }
    }
}

fn security_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add(("X-Content-Type-Options", "nosniff"))
        .add(("X-Frame-Options", "SAMEORIGIN"))
        .add(("Referrer-Policy", "no-referrer"))
        .add(("X-DNS-Prefetch-Control", "off"))
}

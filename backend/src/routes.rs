use actix_web::{HttpRequest, HttpResponse, ResponseError, error, get, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::{
    AppState,
    error::AppError,
    models::response::ApiResponse,
    pagination::{self, PageQuery, PageWindow},
    service::{self, Listing},
};

pub fn register(cfg: &mut web::ServiceConfig) {
    cfg.app_data(query_config("Invalid pagination"))
        .service(health)
        .service(
            web::scope("/api/v1")
                .service(
                    web::scope("/search")
                        .app_data(query_config("Invalid search query"))
                        .service(search_folders)
                        .service(search_files),
                )
                .service(get_roots)
                .service(get_sub_folders)
                .service(get_files)
                .service(get_contents),
        );
}

/// Rejects query strings that do not fit the expected parameter shape.
fn query_config(message: &'static str) -> web::QueryConfig {
    web::QueryConfig::default().error_handler(move |err, _req| {
        let detail = json!({ "query": [err.to_string()] });
        error::InternalError::from_response(
            err,
            AppError::invalid(message, Some(detail)).error_response(),
        )
        .into()
    })
}

pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error("Route not found", None))
}

#[get("/healthz")]
async fn health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "service": "folder-tree-backend",
        "storage": state.store.backend_name(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

#[get("/folders")]
async fn get_roots(
    req: HttpRequest,
    query: web::Query<PageQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let window = page_window(&query, &state);
    let listing = service::root_folders(&state.store, window, req.path()).await?;
    Ok(respond(listing))
}

#[get("/folders/{id}")]
async fn get_sub_folders(
    req: HttpRequest,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let folder_id = parse_folder_id(&path)?;
    let window = page_window(&query, &state);
    let listing = service::sub_folders(&state.store, folder_id, window, req.path()).await?;
    Ok(respond(listing))
}

#[get("/folders/{id}/files")]
async fn get_files(
    req: HttpRequest,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let folder_id = parse_folder_id(&path)?;
    let window = page_window(&query, &state);
    let listing = service::folder_files(&state.store, folder_id, window, req.path()).await?;
    Ok(respond(listing))
}

#[get("/folders/{id}/contents")]
async fn get_contents(
    req: HttpRequest,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let folder_id = parse_folder_id(&path)?;
    let window = page_window(&query, &state);
    let listing = service::folder_contents(&state.store, folder_id, window, req.path()).await?;
    Ok(respond(listing))
}

#[derive(Deserialize)]
struct SearchQuery {
    q: Option<String>,
    #[serde(flatten)]
    page: PageQuery,
}

#[get("/folders")]
async fn search_folders(
    req: HttpRequest,
    query: web::Query<SearchQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let needle = search_term(&query)?;
    let window = page_window(&query.page, &state);
    let listing = service::search_folders(&state.store, &needle, window, req.path()).await?;
    Ok(respond(listing))
}

#[get("/files")]
async fn search_files(
    req: HttpRequest,
    query: web::Query<SearchQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let needle = search_term(&query)?;
    let window = page_window(&query.page, &state);
    let listing = service::search_files(&state.store, &needle, window, req.path()).await?;
    Ok(respond(listing))
}

fn page_window(query: &PageQuery, state: &AppState) -> PageWindow {
    pagination::parse(query, state.page_defaults)
}

fn parse_folder_id(raw: &str) -> Result<Uuid, AppError> {
    raw.parse::<Uuid>().map_err(|_| {
        AppError::invalid("Invalid id", Some(json!({ "id": ["Invalid UUID"] })))
    })
}

fn search_term(query: &SearchQuery) -> Result<String, AppError> {
    query
        .q
        .as_deref()
        .map(str::trim)
        .filter(|term| !term.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            AppError::invalid(
                "Invalid search query",
                Some(json!({ "q": ["query parameter q is required"] })),
            )
        })
}

fn respond<T: Serialize>(listing: Listing<T>) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::success(listing.items, listing.meta))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::folders::{File, Folder},
        pagination::PageDefaults,
        seed::{file, folder},
        store::{MemoryStore, Store},
    };
    use actix_web::{App, http::StatusCode, test};
    use serde_json::Value;

    fn state_with(folders: Vec<Folder>, files: Vec<File>) -> web::Data<AppState> {
        web::Data::new(AppState {
            store: Store::Memory(MemoryStore::new(folders, files)),
            page_defaults: PageDefaults::default(),
        })
    }

    async fn get_json(state: web::Data<AppState>, uri: &str) -> (StatusCode, Value) {
        let app = test::init_service(
            App::new()
                .app_data(state)
                .configure(register)
                .default_service(web::to(not_found)),
        )
        .await;
        let request = test::TestRequest::get().uri(uri).to_request();
        let response = test::call_service(&app, request).await;
        let status = response.status();
        let body: Value = test::read_body_json(response).await;
        (status, body)
    }

    fn sample() -> (web::Data<AppState>, Uuid) {
        let root = folder("root", None);
        let folders = vec![
            root.clone(),
            folder("Zed", Some(root.id)),
            folder("Apple", Some(root.id)),
        ];
        let files = vec![file("readme.txt", root.id)];
        (state_with(folders, files), root.id)
    }

    #[actix_web::test]
    async fn contents_page_one() {
        let (state, root) = sample();
        let uri = format!("/api/v1/folders/{root}/contents?page=1&limit=2");
        let (status, body) = get_json(state, &uri).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "success");
        let data = body["data"].as_array().unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data[0]["name"], "Apple");
        assert_eq!(data[0]["type"], "folder");
        assert_eq!(data[1]["name"], "Zed");
        assert_eq!(data[0]["folderId"], root.to_string());
        assert_eq!(body["meta"]["total"], 3);
        assert_eq!(body["meta"]["lastPage"], 2);
        assert_eq!(
            body["meta"]["nextPageUrl"],
            format!("/api/v1/folders/{root}/contents?page=2&limit=2")
        );
    }

    #[actix_web::test]
    async fn contents_page_two() {
        let (state, root) = sample();
        let uri = format!("/api/v1/folders/{root}/contents?page=2&limit=2");
        let (_, body) = get_json(state, &uri).await;

        let data = body["data"].as_array().unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data[0]["name"], "readme.txt");
        assert_eq!(data[0]["type"], "file");
        assert!(body["meta"]["nextPageUrl"].is_null());
    }

    #[actix_web::test]
    async fn roots_on_empty_store() {
        let state = state_with(Vec::new(), Vec::new());
        let (status, body) = get_json(state, "/api/v1/folders").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], Value::Array(Vec::new()));
        assert_eq!(body["meta"]["total"], 0);
        assert_eq!(body["meta"]["lastPage"], 1);
        assert_eq!(body["meta"]["firstPageUrl"], "/api/v1/folders?page=1&limit=20");
        assert_eq!(body["meta"]["firstPageUrl"], body["meta"]["lastPageUrl"]);
    }

    #[actix_web::test]
    async fn oversized_limit_is_clamped() {
        let (state, root) = sample();
        let uri = format!("/api/v1/folders/{root}?limit=1000");
        let (status, body) = get_json(state, &uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["meta"]["perPage"], 100);
        assert_eq!(body["data"][0]["parentId"], root.to_string());
    }

    #[actix_web::test]
    async fn non_numeric_paging_falls_back() {
        let (state, root) = sample();
        let uri = format!("/api/v1/folders/{root}/files?page=abc&limit=");
        let (status, body) = get_json(state, &uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["meta"]["currentPage"], 1);
        assert_eq!(body["meta"]["perPage"], 20);
        assert_eq!(body["data"][0]["name"], "readme.txt");
    }

    #[actix_web::test]
    async fn malformed_id_is_rejected() {
        let (state, _) = sample();
        let (status, body) = get_json(state, "/api/v1/folders/not-a-uuid/contents").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], "error");
        assert_eq!(body["message"], "Invalid id");
        assert_eq!(body["errors"]["id"][0], "Invalid UUID");
    }

    #[actix_web::test]
    async fn unknown_folder_is_404() {
        let (state, _) = sample();
        let uri = format!("/api/v1/folders/{}/files", Uuid::new_v4());
        let (status, body) = get_json(state, &uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Folder not found");
    }

    #[actix_web::test]
    async fn repeated_page_key_is_invalid_pagination() {
        let (state, _) = sample();
        let (status, body) = get_json(state, "/api/v1/folders?page=1&page=2").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Invalid pagination");
    }

    #[actix_web::test]
    async fn search_requires_a_term() {
        let (state, _) = sample();
        let (status, body) = get_json(state.clone(), "/api/v1/search/files?q=%20").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Invalid search query");

        let (status, body) = get_json(state, "/api/v1/search/folders?q=ZE&limit=1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"][0]["name"], "Zed");
        assert_eq!(body["meta"]["total"], 1);
        assert_eq!(
            body["meta"]["firstPageUrl"],
            "/api/v1/search/folders?page=1&limit=1"
        );
    }

    #[actix_web::test]
    async fn repeated_search_key_is_invalid_search_query() {
        let (state, _) = sample();
        let (status, body) = get_json(state, "/api/v1/search/files?q=a&q=b").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Invalid search query");
        assert!(body["errors"]["query"][0].is_string());
    }

    #[actix_web::test]
    async fn unknown_route_uses_envelope() {
        let (state, _) = sample();
        let (status, body) = get_json(state, "/api/v2/nothing").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Route not found");
    }
}

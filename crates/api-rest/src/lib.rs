//! Depot REST API.
//!
//! Translates HTTP requests into upload service operations. Paths, response
//! shapes, and status codes are part of the service's compatibility
//! contract:
//!
//! | Method | Path                     | Success | Failure |
//! |--------|--------------------------|---------|---------|
//! | GET    | `/`                      | 200 welcome message | — |
//! | POST   | `/upload`                | 200 `{message, filename}` | 400 `{error}` |
//! | GET    | `/files`                 | 200 array of `{name, metadata}` | — |
//! | GET    | `/file-stats/:filename`  | 200 metadata object | 404 `{error}` |
//! | GET    | `/download/:filename`    | 200 raw bytes | 404 `{error}` |
//! | GET    | `/health`                | 200 `{ok, message}` | — |

pub mod error;
pub mod handlers;

pub use error::{ApiError, ApiResult, ErrorRes};

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use depot_core::UploadService;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;

/// Maximum accepted upload request size (50 MiB).
///
/// Applies to the whole multipart body. If running behind a reverse proxy,
/// the proxy's body size limit must be at least this value to avoid
/// inconsistent rejections.
pub const MAX_UPLOAD_BODY_SIZE: usize = 50 * 1024 * 1024;

/// Application state shared across REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub upload_service: UploadService,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::home,
        handlers::health,
        handlers::upload,
        handlers::list_files,
        handlers::file_stats,
        handlers::download,
    ),
    components(schemas(
        api_shared::HealthRes,
        error::ErrorRes,
        handlers::WelcomeRes,
        handlers::UploadRes,
        handlers::FileEntry,
        handlers::FileMetadataRes,
    ))
)]
pub struct ApiDoc;

/// Creates the application router.
///
/// CORS is permissive: the original service is consumed directly by a
/// browser frontend on another origin.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::home))
        .route("/health", get(handlers::health))
        .route("/upload", post(handlers::upload))
        .route("/files", get(handlers::list_files))
        .route("/file-stats/:filename", get(handlers::file_stats))
        .route("/download/:filename", get(handlers::download))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BODY_SIZE))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

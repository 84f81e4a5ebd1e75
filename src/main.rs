use std::path::PathBuf;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use api_rest::{ApiDoc, AppState};
use depot_core::{CoreConfig, UploadService};

/// Main entry point for the depot upload service.
///
/// Serves the REST API (with OpenAPI/Swagger UI) over a filesystem-backed
/// blob store and metadata document.
///
/// # Environment Variables
/// - `DEPOT_REST_ADDR`: REST server address (default: "0.0.0.0:5000")
/// - `DEPOT_DATA_DIR`: Directory for uploads and metadata (default: "data")
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
/// * `Err(anyhow::Error)` - If startup or runtime fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("depot_core=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("DEPOT_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:5000".into());
    let data_dir = std::env::var("DEPOT_DATA_DIR").unwrap_or_else(|_| "data".into());

    tracing::info!("++ Starting depot REST on {}", rest_addr);
    tracing::info!("++ Using data directory {}", data_dir);

    let cfg = Arc::new(CoreConfig::new(PathBuf::from(data_dir)));
    let upload_service = UploadService::open(cfg)?;

    let app = api_rest::create_router(AppState { upload_service })
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

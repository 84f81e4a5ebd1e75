//! Request handlers.

use crate::error::{ApiError, ApiResult, ErrorRes};
use crate::AppState;
use api_shared::{HealthRes, HealthService};
use axum::body::Bytes;
use axum::extract::{Multipart, Path as AxumPath, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use depot_core::MetadataRecord;
use depot_types::{FileName, NonEmptyText};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Welcome message returned from the service root.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct WelcomeRes {
    pub message: String,
}

/// Successful upload acknowledgement.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UploadRes {
    pub message: String,
    /// The accepted filename, used as the key for stats and download.
    pub filename: String,
}

/// Metadata for one uploaded file as served over the wire.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FileMetadataRes {
    pub position: String,
    /// Upload date formatted `MM/DD/YYYY`.
    pub upload_date: String,
}

impl From<MetadataRecord> for FileMetadataRes {
    fn from(record: MetadataRecord) -> Self {
        Self {
            position: record.position,
            upload_date: record.upload_date,
        }
    }
}

/// One entry of the upload listing.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FileEntry {
    pub name: String,
    pub metadata: FileMetadataRes,
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Welcome message", body = WelcomeRes)
    )
)]
/// Service root: a static welcome message.
pub async fn home() -> Json<WelcomeRes> {
    Json(WelcomeRes {
        message: "Welcome to the depot backend!".into(),
    })
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for monitoring and load balancer probes.
pub async fn health() -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    post,
    path = "/upload",
    responses(
        (status = 200, description = "File stored", body = UploadRes),
        (status = 400, description = "Missing file or position, or unsafe filename", body = ErrorRes)
    )
)]
/// Accepts a multipart upload with a `file` part and a `position` field.
///
/// On success the blob is stored and the metadata record is upserted with
/// today's date. A re-upload of an existing filename overwrites both.
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<UploadRes>> {
    let mut file: Option<(String, Bytes)> = None;
    let mut position: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid multipart request: {e}")))?
    {
        let field_name = field.name().map(str::to_owned);
        match field_name.as_deref() {
            Some("file") => {
                let file_name = field.file_name().unwrap_or_default().to_owned();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Invalid file part: {e}")))?;
                file = Some((file_name, data));
            }
            Some("position") => {
                position = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| ApiError::BadRequest(format!("Invalid position field: {e}")))?,
                );
            }
            // Unknown parts are ignored.
            _ => {}
        }
    }

    let (Some((raw_filename, content)), Some(raw_position)) = (file, position) else {
        return Err(ApiError::BadRequest("File and position are required".into()));
    };

    if raw_filename.is_empty() {
        return Err(ApiError::BadRequest("No selected file".into()));
    }

    let filename =
        FileName::new(&raw_filename).map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let position = NonEmptyText::new(&raw_position)
        .map_err(|_| ApiError::BadRequest("File and position are required".into()))?;

    state
        .upload_service
        .store_upload(&filename, &position, &content)?;

    Ok(Json(UploadRes {
        message: "File uploaded successfully".into(),
        filename: filename.into_string(),
    }))
}

#[utoipa::path(
    get,
    path = "/files",
    responses(
        (status = 200, description = "All uploads with metadata", body = [FileEntry])
    )
)]
/// Lists every upload with its metadata, ordered by filename.
pub async fn list_files(State(state): State<AppState>) -> Json<Vec<FileEntry>> {
    let files = state
        .upload_service
        .list_uploads()
        .into_iter()
        .map(|entry| FileEntry {
            name: entry.name,
            metadata: entry.metadata.into(),
        })
        .collect();

    Json(files)
}

#[utoipa::path(
    get,
    path = "/file-stats/{filename}",
    params(
        ("filename" = String, Path, description = "Uploaded file name")
    ),
    responses(
        (status = 200, description = "Metadata for the file", body = FileMetadataRes),
        (status = 404, description = "Unknown filename", body = ErrorRes)
    )
)]
/// Metadata for one uploaded file.
pub async fn file_stats(
    State(state): State<AppState>,
    AxumPath(filename): AxumPath<String>,
) -> ApiResult<Json<FileMetadataRes>> {
    state
        .upload_service
        .stats(&filename)
        .map(|record| Json(record.into()))
        .ok_or_else(|| ApiError::NotFound("File not found".into()))
}

#[utoipa::path(
    get,
    path = "/download/{filename}",
    params(
        ("filename" = String, Path, description = "Uploaded file name")
    ),
    responses(
        (status = 200, description = "Raw file bytes"),
        (status = 404, description = "File absent from the blob store", body = ErrorRes)
    )
)]
/// Serves the raw bytes of an uploaded file.
///
/// The content type is sniffed from the blob content, falling back to
/// `application/octet-stream`. Filenames that fail validation cannot name a
/// stored blob and are reported as not found.
pub async fn download(
    State(state): State<AppState>,
    AxumPath(filename): AxumPath<String>,
) -> ApiResult<Response> {
    let filename =
        FileName::new(&filename).map_err(|_| ApiError::NotFound("File not found".into()))?;

    let bytes = state.upload_service.read_upload(&filename)?;

    let content_type = depot_files::media_type(&bytes).unwrap_or("application/octet-stream");
    let disposition = format!(
        "attachment; filename=\"{}\"",
        filename.as_str().replace('"', "\\\"")
    );

    Ok((
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}

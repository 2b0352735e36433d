//!
//! Product HTTP handlers
//! ---------------------
//! The four admin endpoints operating on the product collection and its
//! photo attachments. Status/body contract:
//!
//! - `index`: 200 + JSON array, or 500 with empty body on store failure.
//! - `create`: 200 + persisted entity, or 500 with the error message as body.
//! - `upload_photo`: 200 + `{files: [{filename, size}, ...]}`, or 500 with
//!   empty body when the request carries no file parts or the stream fails
//!   mid-way; photos already written before a failure are removed, so an
//!   upload lands either fully or not at all.
//! - `delete_photo`: 200 empty on success; 500 empty when `filename` is
//!   missing; 500 with the failure message when the unlink fails.
//!
//! Nothing is retried; a failing store or filesystem call surfaces on the
//! first attempt.

use axum::extract::{Multipart, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::error;

use crate::error::AppError;
use crate::server::AppState;
use super::model::ProductDraft;

/// Reduce a client-supplied filename to its final path component, so photo
/// operations can never escape the photo directory.
fn sanitize_filename(name: &str) -> Option<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return None;
    }
    Path::new(trimmed)
        .file_name()
        .and_then(|s| s.to_str())
        .map(|s| s.to_string())
}

/// GET /admin/api/products
pub async fn index(State(state): State<AppState>) -> Response {
    match state.products.find_all() {
        Ok(products) => (StatusCode::OK, Json(products)).into_response(),
        Err(e) => {
            error!("product listing failed: {e}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// POST /admin/api/products
pub async fn create(
    State(state): State<AppState>,
    Json(draft): Json<ProductDraft>,
) -> Response {
    match state.products.insert(draft) {
        Ok(product) => (StatusCode::OK, Json(product)).into_response(),
        Err(e) => {
            error!("product create failed: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, e.message().to_string()).into_response()
        }
    }
}

/// Best-effort removal of photos written before an upload failed.
fn discard_partial(written: &[PathBuf]) {
    for path in written {
        let _ = fs::remove_file(path);
    }
}

/// POST /admin/api/products/upload_photo (multipart)
pub async fn upload_photo(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    let mut files = Vec::new();
    let mut written: Vec<PathBuf> = Vec::new();
    loop {
        match multipart.next_field().await {
            Ok(Some(field)) => {
                // Non-file parts carry no filename and are skipped
                let Some(raw_name) = field.file_name().map(|s| s.to_string()) else {
                    continue;
                };
                let Some(filename) = sanitize_filename(&raw_name) else {
                    continue;
                };
                let data = match field.bytes().await {
                    Ok(d) => d,
                    Err(e) => {
                        error!("photo upload read failed: {e}");
                        discard_partial(&written);
                        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
                    }
                };
                let dest = state.settings.product_photo_path.join(&filename);
                if let Err(e) = fs::write(&dest, &data) {
                    error!("photo write failed for {}: {e}", dest.display());
                    discard_partial(&written);
                    return StatusCode::INTERNAL_SERVER_ERROR.into_response();
                }
                files.push(json!({"filename": filename, "size": data.len()}));
                written.push(dest);
            }
            Ok(None) => break,
            Err(e) => {
                error!("malformed multipart request: {e}");
                discard_partial(&written);
                return StatusCode::INTERNAL_SERVER_ERROR.into_response();
            }
        }
    }
    if files.is_empty() {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    (StatusCode::OK, Json(json!({"files": files}))).into_response()
}

#[derive(Debug, Deserialize)]
pub struct DeletePhotoParams {
    filename: Option<String>,
}

/// DELETE /admin/api/products/delete_photo?filename=X
pub async fn delete_photo(
    State(state): State<AppState>,
    Query(params): Query<DeletePhotoParams>,
) -> Response {
    let Some(filename) = params.filename.as_deref().and_then(sanitize_filename) else {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    };
    let path = state.settings.product_photo_path.join(&filename);
    match fs::remove_file(&path).map_err(AppError::from) {
        Ok(()) => StatusCode::OK.into_response(),
        Err(e) => {
            error!("photo delete failed for {}: {e}", path.display());
            (StatusCode::INTERNAL_SERVER_ERROR, e.message().to_string()).into_response()
        }
    }
}

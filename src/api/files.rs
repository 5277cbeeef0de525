use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    routing::get,
    Router,
};

use crate::api::errors::ApiError;
use crate::api::guards::CurrentUser;
use crate::core::state::AppState;
use crate::services::storage;

pub(crate) fn router() -> Router<AppState> {
    Router::new().route("/:filename", get(serve_file))
}

async fn serve_file(
    Path(filename): Path<String>,
    CurrentUser(_user): CurrentUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    if !storage::is_safe_name(&filename) {
        return Err(ApiError::NotFound("File not found".to_string()));
    }

    let bytes = state
        .storage()
        .read(&filename)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to read stored file"))?
        .ok_or_else(|| ApiError::NotFound("File not found".to_string()))?;

    Ok(([(header::CONTENT_TYPE, content_type_for(&filename))], bytes))
}

fn content_type_for(filename: &str) -> &'static str {
    let extension = filename.rsplit('.').next().map(|ext| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("pdf") => "application/pdf",
        _ => "application/octet-stream",
    }
}

//! File upload endpoint.
//!
//! Accepts multipart form data, writes the first file field into the
//! public uploads directory under a timestamp-prefixed name, and returns
//! the public URL. The timestamp prefix is the only collision handling.

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use crate::AppState;

use super::error::ApiError;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub url: String,
}

/// Strip any path components a client smuggled into the filename.
fn sanitize_filename(name: &str) -> String {
    let base = name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(name)
        .trim();
    if base.is_empty() || base == "." || base == ".." {
        "upload".to_string()
    } else {
        base.to_string()
    }
}

/// Accept a multipart upload and return its public URL
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Malformed multipart body: {e}")))?
    {
        // Only file fields carry a filename; skip plain form values
        let Some(original) = field.file_name().map(sanitize_filename) else {
            continue;
        };

        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(format!("Failed to read upload: {e}")))?;

        let filename = format!("{}-{}", chrono::Utc::now().timestamp_millis(), original);
        let path = state.config.uploads.dir.join(&filename);

        tokio::fs::write(&path, &data).await.map_err(|e| {
            tracing::error!("Failed to write upload {}: {}", path.display(), e);
            ApiError::internal("Failed to store uploaded file")
        })?;

        tracing::info!("Stored upload {} ({} bytes)", filename, data.len());

        return Ok(Json(UploadResponse {
            url: format!("/uploads/{filename}"),
        }));
    }

    Err(ApiError::bad_request("No file field in form data"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("photo.jpg"), "photo.jpg");
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("dir\\evil.exe"), "evil.exe");
        assert_eq!(sanitize_filename(""), "upload");
        assert_eq!(sanitize_filename(".."), "upload");
    }
}

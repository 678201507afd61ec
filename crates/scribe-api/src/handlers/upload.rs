//! Presigned-upload handler.

use axum::Json;
use axum::extract::State;

use scribe_storage::PresignedUpload;

use crate::dto::request::{PresignBody, validate};
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/uploads/presign
///
/// Returns presigned PUT URLs the client uploads to directly; the API
/// never proxies file bytes.
pub async fn presign_upload(
    State(state): State<AppState>,
    _auth: AuthUser,
    Json(body): Json<PresignBody>,
) -> Result<Json<ApiResponse<Vec<PresignedUpload>>>, ApiError> {
    validate(&body)?;

    let uploads = state
        .presign_service
        .generate_upload_urls(
            &body.content_type,
            &body.folder,
            body.key_count,
            &body.old_keys,
        )
        .await?;

    Ok(Json(ApiResponse::ok(uploads)))
}

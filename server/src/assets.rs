use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use basegrid_assets::{AssetError, is_generated_name};
use tracing::warn;

use crate::AppState;
use crate::response::task_failed;

/// Serves a stored upload with its detected content type. Only generated
/// file names are looked up.
pub(crate) async fn serve_handler(
    State(state): State<AppState>,
    Path(file): Path<String>,
) -> Response {
    if !is_generated_name(&file) {
        return StatusCode::NOT_FOUND.into_response();
    }

    let assets = state.entities.assets().clone();
    let read = tokio::task::spawn_blocking(move || assets.read(&file)).await;
    match read {
        Ok(Ok((image_type, bytes))) => {
            ([(header::CONTENT_TYPE, image_type.mime_type())], bytes).into_response()
        }
        Ok(Err(AssetError::NotFound(_) | AssetError::InvalidReference(_))) => {
            StatusCode::NOT_FOUND.into_response()
        }
        Ok(Err(e)) => {
            warn!("Serving asset failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
        Err(e) => {
            warn!("Serving asset failed: {}", task_failed(e));
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

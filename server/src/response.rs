//! JSON bodies returned by the API and the mapping from store errors.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use basegrid_model::PlacementRecord;
use basegrid_storage::{ErrorKind, StorageError};
use serde::{Deserialize, Serialize};

/// Body of every catalog write.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CatalogResponse {
    /// `"success"` or `"error"`.
    pub status: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
}

impl CatalogResponse {
    pub fn success(message: impl Into<String>, id: i64) -> Self {
        Self {
            status: "success".to_string(),
            message: message.into(),
            id: Some(id),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
            id: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

/// Body of a grid load.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct GridLoadResponse {
    pub success: bool,
    pub items: Vec<PlacementRecord>,
    pub count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Body of a grid save or clear.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct GridWriteResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inserted: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GridWriteResponse {
    pub fn saved(inserted: usize) -> Self {
        Self {
            success: true,
            message: Some("Grid saved successfully".to_string()),
            inserted: Some(inserted),
            deleted: None,
            error: None,
        }
    }

    pub fn cleared(deleted: usize) -> Self {
        Self {
            success: true,
            message: Some("Grid cleared successfully".to_string()),
            inserted: None,
            deleted: Some(deleted),
            error: None,
        }
    }

    pub fn error(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: None,
            inserted: None,
            deleted: None,
            error: Some(error.into()),
        }
    }
}

pub(crate) fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::UnknownKind
        | ErrorKind::ValidationFailed
        | ErrorKind::UnsupportedImageType
        | ErrorKind::UploadFailed => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::StoreFailure => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub(crate) fn catalog_error(err: &StorageError) -> Response {
    (
        status_for(err.kind()),
        Json(CatalogResponse::error(err.to_string())),
    )
        .into_response()
}

pub(crate) fn grid_error(err: &StorageError) -> Response {
    (
        status_for(err.kind()),
        Json(GridWriteResponse::error(err.to_string())),
    )
        .into_response()
}

/// Error for a blocking task that panicked or was cancelled.
pub(crate) fn task_failed(err: tokio::task::JoinError) -> StorageError {
    StorageError::Storage(format!("request task failed: {err}"))
}

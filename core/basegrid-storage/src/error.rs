//! Error types for the storage layer.

use basegrid_assets::AssetError;
use basegrid_model::ModelError;
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur in catalog and grid operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Kind tag is not in the schema registry.
    #[error("unknown catalog kind: {0}")]
    UnknownKind(String),

    /// No row with this id in the kind's collection.
    #[error("{kind} not found: {id}")]
    NotFound { kind: String, id: i64 },

    /// A required field is missing or malformed.
    #[error("validation failed: {0}")]
    ValidationFailed(String),

    /// Uploaded file's detected type is not allowed.
    #[error("invalid file type ({0}). Allowed: PNG, JPG, GIF, WEBP")]
    UnsupportedImageType(String),

    /// Upload did not arrive or could not be stored.
    #[error("file upload error: {0}")]
    UploadFailed(String),

    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// IO error (file system).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Any other store-level failure.
    #[error("storage error: {0}")]
    Storage(String),
}

/// Coarse classification of a [`StorageError`], used at the request
/// boundary to choose a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    UnknownKind,
    NotFound,
    ValidationFailed,
    UnsupportedImageType,
    UploadFailed,
    StoreFailure,
}

impl StorageError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StorageError::UnknownKind(_) => ErrorKind::UnknownKind,
            StorageError::NotFound { .. } => ErrorKind::NotFound,
            StorageError::ValidationFailed(_) => ErrorKind::ValidationFailed,
            StorageError::UnsupportedImageType(_) => ErrorKind::UnsupportedImageType,
            StorageError::UploadFailed(_) => ErrorKind::UploadFailed,
            StorageError::Database(_) | StorageError::Io(_) | StorageError::Storage(_) => {
                ErrorKind::StoreFailure
            }
        }
    }
}

impl From<ModelError> for StorageError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::UnknownKind(tag) => StorageError::UnknownKind(tag),
            ModelError::ValidationFailed(msg) => StorageError::ValidationFailed(msg),
        }
    }
}

impl From<AssetError> for StorageError {
    fn from(err: AssetError) -> Self {
        match err {
            AssetError::UnsupportedImageType(t) => StorageError::UnsupportedImageType(t),
            AssetError::UploadFailed(msg) => StorageError::UploadFailed(msg),
            AssetError::Io(e) => StorageError::Io(e),
            other @ (AssetError::InvalidReference(_) | AssetError::NotFound(_)) => {
                StorageError::Storage(other.to_string())
            }
        }
    }
}

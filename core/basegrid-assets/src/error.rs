//! Error types for asset handling.

use thiserror::Error;

/// Result type for asset operations.
pub type AssetResult<T> = Result<T, AssetError>;

/// Errors that can occur while accepting or reading uploads.
#[derive(Debug, Error)]
pub enum AssetError {
    /// Detected content type is not on the allow-list.
    #[error("invalid file type ({0}). Allowed: PNG, JPG, GIF, WEBP")]
    UnsupportedImageType(String),

    /// The upload did not arrive intact.
    #[error("file upload error: {0}")]
    UploadFailed(String),

    /// Reference does not name a generated asset file.
    #[error("invalid asset reference: {0}")]
    InvalidReference(String),

    /// Asset file does not exist.
    #[error("asset not found: {0}")]
    NotFound(String),

    /// IO error (file system).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

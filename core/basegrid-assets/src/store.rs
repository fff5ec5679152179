use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use rand::RngCore;
use tracing::debug;

use crate::detect::{ImageType, detect_image_type};
use crate::error::{AssetError, AssetResult};
use crate::ASSET_PREFIX;

/// Random bytes in a generated file stem (hex-encoded to twice this length).
const NAME_BYTES: usize = 8;

const MAX_EXTENSION_LEN: usize = 8;

/// Attempts before giving up on finding an unused name.
const NAME_ATTEMPTS: usize = 4;

/// A file received with a create or update request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadedFile {
    Received {
        file_name: Option<String>,
        bytes: Vec<u8>,
    },
    /// The transport reported an error before the file was fully received.
    Failed(String),
}

impl UploadedFile {
    pub fn new(file_name: Option<String>, bytes: Vec<u8>) -> Self {
        Self::Received { file_name, bytes }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed(reason.into())
    }

    /// A form part with neither a filename nor content: no file was chosen.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Received { file_name, bytes } => {
                bytes.is_empty() && file_name.as_deref().is_none_or(str::is_empty)
            }
            Self::Failed(_) => false,
        }
    }
}

/// An upload written to the asset directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredAsset {
    /// Client-facing reference, e.g. `uploads/3f9a0c1d2e4b5a69.png`.
    pub reference: String,
    pub path: PathBuf,
    pub image_type: ImageType,
}

/// Flat directory of uploaded catalog images.
#[derive(Debug, Clone)]
pub struct AssetStore {
    root: PathBuf,
}

impl AssetStore {
    /// Opens (or creates) the asset directory at the given path.
    pub fn open(root: impl Into<PathBuf>) -> AssetResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Validates an upload and writes it under a freshly generated name.
    ///
    /// Nothing is written unless the detected content type is allowed.
    pub fn store(&self, upload: &UploadedFile) -> AssetResult<StoredAsset> {
        let (file_name, bytes) = match upload {
            UploadedFile::Received { file_name, bytes } => (file_name.as_deref(), bytes),
            UploadedFile::Failed(reason) => return Err(AssetError::UploadFailed(reason.clone())),
        };

        let image_type = detect_image_type(bytes)?;
        let extension = sanitize_extension(file_name, image_type);

        for _ in 0..NAME_ATTEMPTS {
            let name = format!("{}.{extension}", random_stem());
            let path = self.root.join(&name);
            let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            };
            if let Err(e) = file.write_all(bytes) {
                let _ = fs::remove_file(&path);
                return Err(AssetError::UploadFailed(format!("failed to store file: {e}")));
            }

            debug!("Stored {} upload as {}", image_type.mime_type(), name);
            return Ok(StoredAsset {
                reference: format!("{ASSET_PREFIX}{name}"),
                path,
                image_type,
            });
        }

        Err(AssetError::UploadFailed(
            "could not allocate a unique file name".to_string(),
        ))
    }

    /// Resolves a reference (`uploads/<name>`) or bare name to its file path.
    pub fn path_for(&self, reference: &str) -> AssetResult<PathBuf> {
        let name = reference.strip_prefix(ASSET_PREFIX).unwrap_or(reference);
        if !is_generated_name(name) {
            return Err(AssetError::InvalidReference(reference.to_string()));
        }
        Ok(self.root.join(name))
    }

    /// Reads a stored asset together with its detected type.
    pub fn read(&self, reference: &str) -> AssetResult<(ImageType, Vec<u8>)> {
        let path = self.path_for(reference)?;
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(AssetError::NotFound(reference.to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        let image_type = detect_image_type(&bytes)?;
        Ok((image_type, bytes))
    }
}

/// True if the value points at a stored upload rather than a literal glyph.
pub fn is_asset_reference(value: &str) -> bool {
    value.starts_with(ASSET_PREFIX)
}

/// True if `name` has the shape of a generated asset file name:
/// lowercase hex stem, a dot, and a short alphanumeric extension.
pub fn is_generated_name(name: &str) -> bool {
    let Some((stem, ext)) = name.split_once('.') else {
        return false;
    };
    stem.len() == NAME_BYTES * 2
        && stem.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
        && is_clean_extension(ext)
}

fn random_stem() -> String {
    let mut bytes = [0u8; NAME_BYTES];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

fn is_clean_extension(ext: &str) -> bool {
    (1..=MAX_EXTENSION_LEN).contains(&ext.len()) && ext.bytes().all(|b| b.is_ascii_alphanumeric())
}

/// Keeps the client's extension (lower-cased) when it is a plain short
/// token; otherwise falls back to the detected type's extension.
fn sanitize_extension(file_name: Option<&str>, detected: ImageType) -> String {
    file_name
        .and_then(|n| Path::new(n).extension())
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .filter(|e| is_clean_extension(e))
        .unwrap_or_else(|| detected.extension().to_string())
}

use crate::error::AssetResult;
use crate::store::{AssetStore, UploadedFile};

/// Whether the image is being resolved for a new record or an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveMode {
    Create,
    Update,
}

/// The value chosen for a record's `image` column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageResolution {
    /// A validated upload was stored; holds its `uploads/` reference.
    Uploaded(String),
    /// A non-empty literal glyph or text, stored verbatim.
    Literal(String),
    /// Create without file or literal: the kind's default glyph.
    Default(String),
    /// Update without file or literal: leave the stored value untouched.
    Keep,
}

impl ImageResolution {
    /// The value to write, or `None` when the column must be left as is.
    pub fn value(&self) -> Option<&str> {
        match self {
            ImageResolution::Uploaded(v)
            | ImageResolution::Literal(v)
            | ImageResolution::Default(v) => Some(v),
            ImageResolution::Keep => None,
        }
    }
}

/// Picks the image value for a create or update.
///
/// First match wins: a (validated, stored) upload, then a non-empty literal,
/// then `Keep` on update or `default_glyph` on create. An empty form part
/// counts as no upload. An invalid upload fails even when a literal is
/// present, and nothing is written in that case.
pub fn resolve_image(
    assets: &AssetStore,
    mode: ResolveMode,
    upload: Option<&UploadedFile>,
    literal: Option<&str>,
    default_glyph: &str,
) -> AssetResult<ImageResolution> {
    if let Some(upload) = upload.filter(|u| !u.is_empty()) {
        let stored = assets.store(upload)?;
        return Ok(ImageResolution::Uploaded(stored.reference));
    }

    if let Some(literal) = literal.filter(|l| !l.trim().is_empty()) {
        return Ok(ImageResolution::Literal(literal.to_string()));
    }

    Ok(match mode {
        ResolveMode::Update => ImageResolution::Keep,
        ResolveMode::Create => ImageResolution::Default(default_glyph.to_string()),
    })
}

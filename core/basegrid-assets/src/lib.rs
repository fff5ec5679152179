//! Uploaded image assets for BaseGrid.
//!
//! A catalog record's `image` is either a literal glyph (an emoji, a short
//! token) or a reference to a file stored by [`AssetStore`]. References
//! always start with [`ASSET_PREFIX`], which is how clients tell the two
//! apart.
//!
//! # Upload rules
//!
//! - The content type is detected from the file bytes; the client filename
//!   only contributes its extension.
//! - Only PNG, JPEG, GIF and WEBP are accepted.
//! - Stored names are 16 random hex characters plus the extension, and are
//!   never reused.
//!
//! [`resolve_image`] applies the precedence between an uploaded file, a
//! literal value and the record's existing or default image.

mod detect;
mod error;
mod resolver;
mod store;

pub use detect::{ImageType, detect_image_type};
pub use error::{AssetError, AssetResult};
pub use resolver::{ImageResolution, ResolveMode, resolve_image};
pub use store::{AssetStore, StoredAsset, UploadedFile, is_asset_reference, is_generated_name};

/// Prefix carried by every stored asset reference.
pub const ASSET_PREFIX: &str = "uploads/";

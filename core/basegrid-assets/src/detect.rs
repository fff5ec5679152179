use image::ImageFormat;

use crate::error::{AssetError, AssetResult};

/// Raster formats accepted for catalog images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageType {
    Png,
    Jpeg,
    Gif,
    WebP,
}

impl ImageType {
    pub const fn mime_type(self) -> &'static str {
        match self {
            ImageType::Png => "image/png",
            ImageType::Jpeg => "image/jpeg",
            ImageType::Gif => "image/gif",
            ImageType::WebP => "image/webp",
        }
    }

    /// Extension used when the client filename has no usable one.
    pub const fn extension(self) -> &'static str {
        match self {
            ImageType::Png => "png",
            ImageType::Jpeg => "jpg",
            ImageType::Gif => "gif",
            ImageType::WebP => "webp",
        }
    }
}

/// Detects the image type from the file's leading bytes.
///
/// Fails with [`AssetError::UnsupportedImageType`] for anything outside the
/// allow-list, including recognizable but disallowed formats (BMP, TIFF, ...).
pub fn detect_image_type(bytes: &[u8]) -> AssetResult<ImageType> {
    match image::guess_format(bytes) {
        Ok(ImageFormat::Png) => Ok(ImageType::Png),
        Ok(ImageFormat::Jpeg) => Ok(ImageType::Jpeg),
        Ok(ImageFormat::Gif) => Ok(ImageType::Gif),
        Ok(ImageFormat::WebP) => Ok(ImageType::WebP),
        Ok(other) => Err(AssetError::UnsupportedImageType(format!("{other:?}"))),
        Err(_) => Err(AssetError::UnsupportedImageType(
            "unrecognized content".to_string(),
        )),
    }
}

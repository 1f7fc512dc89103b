use image::{ColorType, DynamicImage};

use crate::error::DocTextError;

/// Dimensions and color mode of an image that decoded successfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    pub original_color: ColorType,
}

/// Decode image bytes and normalize them to 8-bit RGB.
///
/// Only used as a sanity check before OCR; the pixels are dropped.
pub fn check_image(bytes: &[u8]) -> Result<ImageInfo, DocTextError> {
    let decoded = image::load_from_memory(bytes).map_err(|e| DocTextError::Image(e.to_string()))?;
    let original_color = decoded.color();

    let rgb = match decoded {
        DynamicImage::ImageRgb8(buf) => buf,
        other => other.to_rgb8(),
    };

    Ok(ImageInfo {
        width: rgb.width(),
        height: rgb.height(),
        original_color,
    })
}

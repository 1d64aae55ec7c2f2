//! Image normalization before model consumption.
//!
//! Large photos are downsampled so the longer side fits the configured
//! maximum; small images pass through byte-for-byte. Decode failures degrade
//! gracefully to the original bytes. The downstream backend may still reject
//! them, but that failure surfaces there, not here.

use image::{GenericImageView, ImageFormat, ImageReader};

use crate::error::{GatewayError, Result};

/// Formats we re-encode to; anything else is forced to JPEG.
const TRANSMISSIBLE: [ImageFormat; 2] = [ImageFormat::Jpeg, ImageFormat::Png];

/// Normalize image bytes for a multimodal prompt. Never fails the caller.
pub fn normalize_image(bytes: Vec<u8>, max_dimension: u32) -> Vec<u8> {
    match downsample(&bytes, max_dimension) {
        Ok(Some(resized)) => resized,
        Ok(None) => bytes,
        Err(e) => {
            tracing::warn!(
                size = bytes.len(),
                error = %e,
                "Could not decode image for resizing, passing original bytes through"
            );
            bytes
        }
    }
}

/// MIME type for the data URL embedding, based on the (possibly normalized)
/// bytes. Unknown formats are labeled JPEG, matching the forced re-encode.
pub fn mime_type(bytes: &[u8]) -> &'static str {
    match image::guess_format(bytes) {
        Ok(ImageFormat::Png) => "image/png",
        _ => "image/jpeg",
    }
}

/// Returns `Ok(None)` when both dimensions are already within the limit.
fn downsample(bytes: &[u8], max_dimension: u32) -> Result<Option<Vec<u8>>> {
    let reader = ImageReader::new(std::io::Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| GatewayError::Internal(format!("Failed to read image: {e}")))?;

    let source_format = reader.format();
    let img = reader
        .decode()
        .map_err(|e| GatewayError::Internal(format!("Failed to decode image: {e}")))?;

    let (width, height) = img.dimensions();
    if width <= max_dimension && height <= max_dimension {
        return Ok(None);
    }

    // resize() fits within the bounds preserving aspect ratio, so the longer
    // side lands exactly on max_dimension.
    let resized = img.resize(
        max_dimension,
        max_dimension,
        image::imageops::FilterType::Lanczos3,
    );

    let target_format = match source_format {
        Some(fmt) if TRANSMISSIBLE.contains(&fmt) => fmt,
        _ => ImageFormat::Jpeg,
    };

    // JPEG has no alpha channel.
    let resized = if target_format == ImageFormat::Jpeg {
        image::DynamicImage::ImageRgb8(resized.to_rgb8())
    } else {
        resized
    };

    let mut output = Vec::new();
    resized
        .write_to(&mut std::io::Cursor::new(&mut output), target_format)
        .map_err(|e| GatewayError::Internal(format!("Failed to encode image: {e}")))?;

    Ok(Some(output))
}

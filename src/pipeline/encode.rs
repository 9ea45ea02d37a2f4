//! Final encoding: RGB canvas → JPEG bytes.
//!
//! The canvas is opaque by the time it gets here (band and caption already
//! blended), so the alpha channel is dropped and the image is written as a
//! baseline JPEG at the configured quality.

use image::codecs::jpeg::JpegEncoder;
use image::RgbImage;
use tracing::debug;

/// MIME type of every composed image.
pub const JPEG_MIME: &str = "image/jpeg";

/// Encode an RGB canvas as JPEG.
pub fn encode_jpeg(img: &RgbImage, quality: u8) -> Result<Vec<u8>, image::ImageError> {
    let mut buf = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buf, quality);
    img.write_with_encoder(encoder)?;
    debug!("Encoded {}x{} canvas → {} bytes JPEG (q={})", img.width(), img.height(), buf.len(), quality);
    Ok(buf)
}

//! JPEG data-URI codec for frames travelling to and from the backend.

use crate::error::{CaptureError, PayloadError};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::{self, FilterType};
use image::RgbImage;

pub const JPEG_DATA_URI_PREFIX: &str = "data:image/jpeg;base64,";

/// Scales captured frames to a fixed size and encodes them as JPEG data URIs
#[derive(Debug, Clone, Copy)]
pub struct FrameEncoder {
    width: u32,
    height: u32,
    quality: u8,
}

impl FrameEncoder {
    pub fn new(width: u32, height: u32, quality: u8) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            quality: quality.clamp(1, 100),
        }
    }

    /// All-black frame at the target size, sent when there is no camera
    pub fn blank_frame(&self) -> RgbImage {
        RgbImage::new(self.width, self.height)
    }

    pub fn encode(&self, frame: &RgbImage) -> Result<String, CaptureError> {
        let mut jpeg = Vec::new();
        {
            let mut encoder = JpegEncoder::new_with_quality(&mut jpeg, self.quality);
            let result = if frame.dimensions() == (self.width, self.height) {
                encoder.encode_image(frame)
            } else {
                let scaled = imageops::resize(frame, self.width, self.height, FilterType::Triangle);
                encoder.encode_image(&scaled)
            };
            result.map_err(|e| CaptureError::EncodeFailed(e.to_string()))?;
        }

        let mut uri = String::with_capacity(JPEG_DATA_URI_PREFIX.len() + jpeg.len() * 4 / 3 + 4);
        uri.push_str(JPEG_DATA_URI_PREFIX);
        STANDARD.encode_string(&jpeg, &mut uri);
        Ok(uri)
    }
}

/// Raw image bytes of a `data:<mime>;base64,<payload>` URI
pub fn decode_data_uri(uri: &str) -> Result<Vec<u8>, PayloadError> {
    let (header, encoded) = uri
        .split_once(',')
        .ok_or_else(|| PayloadError::InvalidImage("missing ',' separator".to_string()))?;

    if !header.starts_with("data:") || !header.ends_with(";base64") {
        return Err(PayloadError::InvalidImage(format!("unsupported header '{}'", header)));
    }

    STANDARD
        .decode(encoded.trim())
        .map_err(|e| PayloadError::InvalidImage(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_encode_scales_to_target_size() {
        let frame = RgbImage::from_pixel(320, 240, Rgb([20, 160, 60]));
        let uri = FrameEncoder::new(64, 48, 80).encode(&frame).expect("Failed to encode");
        assert!(uri.starts_with(JPEG_DATA_URI_PREFIX));

        let bytes = decode_data_uri(&uri).expect("Failed to decode");
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
        let decoded = image::load_from_memory(&bytes).expect("Not a JPEG");
        assert_eq!((decoded.width(), decoded.height()), (64, 48));
    }

    #[test]
    fn test_decode_rejects_bad_uris() {
        assert!(decode_data_uri("no separator").is_err());
        assert!(decode_data_uri("data:image/jpeg,plain").is_err());
        assert!(decode_data_uri("data:image/jpeg;base64,***").is_err());
    }

    #[test]
    fn test_decode_png_data_uri() {
        let bytes = decode_data_uri("data:image/png;base64,iVBORw0KGgo=").expect("Failed to decode");
        assert_eq!(&bytes[1..4], b"PNG");
    }
}

//! Image preparation for PDF embedding.
//!
//! Snapshot JPEGs are embedded exactly as delivered (DCTDecode
//! pass-through); only their dimensions and channel layout are probed.
//! Anything else, typically a PNG logo, is re-encoded to JPEG at a fixed
//! quality so the embedding stays deterministic.

use std::io::Cursor;

use image::{ImageEncoder, ImageFormat, ImageReader};

use crate::error::{ReportError, ReportResult};

/// JPEG quality used when a non-JPEG input has to be re-encoded.
const REENCODE_QUALITY: u8 = 90;

/// A decoded-and-ready image for the PDF writer.
#[derive(Debug, Clone)]
pub(crate) struct EmbeddedImage {
    /// JPEG bytes as they go into the image XObject stream.
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Single-channel image (DeviceGray instead of DeviceRGB).
    pub grayscale: bool,
}

/// Prepare arbitrary image bytes for embedding.
pub(crate) fn prepare_image(bytes: &[u8]) -> ReportResult<EmbeddedImage> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| ReportError::image(e.to_string()))?;
    let format = reader.format();

    let decoded = reader
        .decode()
        .map_err(|e| ReportError::image(e.to_string()))?;

    if format == Some(ImageFormat::Jpeg) {
        return Ok(EmbeddedImage {
            data: bytes.to_vec(),
            width: decoded.width(),
            height: decoded.height(),
            grayscale: decoded.color().channel_count() < 3,
        });
    }

    let rgb = decoded.to_rgb8();
    let mut data = Vec::new();
    let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut data, REENCODE_QUALITY);
    encoder
        .write_image(
            rgb.as_raw(),
            rgb.width(),
            rgb.height(),
            image::ExtendedColorType::Rgb8,
        )
        .map_err(|e| ReportError::image(e.to_string()))?;

    Ok(EmbeddedImage {
        width: rgb.width(),
        height: rgb.height(),
        data,
        grayscale: false,
    })
}

/// Prepare the cover logo. A logo that cannot be decoded is fatal for the
/// export, unlike a snapshot.
pub(crate) fn prepare_logo(bytes: &[u8]) -> ReportResult<EmbeddedImage> {
    prepare_image(bytes).map_err(|e| ReportError::logo(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jpeg_fixture() -> Vec<u8> {
        let img = image::RgbImage::from_pixel(8, 4, image::Rgb([10, 20, 30]));
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Jpeg)
            .unwrap();
        buf
    }

    fn png_fixture() -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(6, 3, image::Rgba([10, 20, 30, 255]));
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn test_jpeg_passes_through_unchanged() {
        let jpeg = jpeg_fixture();
        let embedded = prepare_image(&jpeg).unwrap();
        assert_eq!(embedded.data, jpeg);
        assert_eq!((embedded.width, embedded.height), (8, 4));
        assert!(!embedded.grayscale);
    }

    #[test]
    fn test_png_is_reencoded_to_jpeg() {
        let embedded = prepare_image(&png_fixture()).unwrap();
        assert_eq!((embedded.width, embedded.height), (6, 3));
        // Re-encoded bytes start with the JPEG SOI marker.
        assert_eq!(&embedded.data[..2], &[0xff, 0xd8]);
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(prepare_image(b"definitely not an image").is_err());
    }

    #[test]
    fn test_logo_error_variant() {
        assert!(matches!(
            prepare_logo(b"garbage"),
            Err(ReportError::Logo(_))
        ));
    }
}

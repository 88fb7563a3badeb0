use std::io::Cursor;

use image::{DynamicImage, ImageFormat};
use platter_core::image::validate_image;

/// Longest edge of a stored thumbnail, in pixels.
pub const THUMBNAIL_SIZE: u32 = 200;

/// A validated upload ready to store.
#[derive(Debug)]
pub struct ProcessedPhoto {
    pub content_type: String,
    pub thumbnail: Vec<u8>,
}

/// Validate an upload and render its JPEG thumbnail.
pub fn process_photo(data: &[u8]) -> Result<ProcessedPhoto, String> {
    let content_type = validate_image(data)?;

    let img = image::load_from_memory(data).map_err(|e| format!("Failed to decode image: {e}"))?;

    // thumbnail() keeps the aspect ratio; JPEG has no alpha channel
    let thumb = DynamicImage::ImageRgb8(img.thumbnail(THUMBNAIL_SIZE, THUMBNAIL_SIZE).to_rgb8());

    let mut buf = Cursor::new(Vec::new());
    thumb
        .write_to(&mut buf, ImageFormat::Jpeg)
        .map_err(|e| format!("Failed to encode thumbnail: {e}"))?;

    Ok(ProcessedPhoto {
        content_type,
        thumbnail: buf.into_inner(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([200, 120, 40, 128]));
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(img)
            .write_to(&mut buf, ImageFormat::Png)
            .unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_png_with_alpha_gets_jpeg_thumbnail() {
        let processed = process_photo(&png(640, 320)).unwrap();
        assert_eq!(processed.content_type, "image/png");

        let thumb = image::load_from_memory(&processed.thumbnail).unwrap();
        assert_eq!(thumb.width(), THUMBNAIL_SIZE);
        assert_eq!(thumb.height(), THUMBNAIL_SIZE / 2);
    }

    #[test]
    fn test_rejects_non_image() {
        assert!(process_photo(b"definitely not an image").is_err());
    }
}

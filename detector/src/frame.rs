//! Frame loading

use crate::error::{DetectionError, Result};
use image::{DynamicImage, RgbImage};
use std::path::Path;

/// Immutable decoded photograph, 8 bits per RGB channel
#[derive(Debug, Clone)]
pub struct Frame {
    image: RgbImage,
}

impl Frame {
    /// Wrap an RGB buffer, rejecting images without pixels
    pub fn from_rgb(image: RgbImage) -> Result<Self> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(DetectionError::EmptyFrame { width, height });
        }
        Ok(Self { image })
    }

    /// Convert any decoded image to RGB
    pub fn from_dynamic(image: DynamicImage) -> Result<Self> {
        Self::from_rgb(image.to_rgb8())
    }

    /// Load and decode an image file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let img = image::open(path)?;
        log::debug!(
            "Loaded {} ({}x{}, {:?})",
            path.display(),
            img.width(),
            img.height(),
            img.color()
        );
        Self::from_dynamic(img)
    }

    /// Decode an in-memory image (format is guessed from the content)
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let img = image::load_from_memory(bytes)?;
        Self::from_dynamic(img)
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// RGB value at (x, y)
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        self.image.get_pixel(x, y).0
    }

    pub fn as_rgb(&self) -> &RgbImage {
        &self.image
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb};
    use std::io::Cursor;

    #[test]
    fn test_from_bytes_png() {
        let img = RgbImage::from_pixel(6, 4, Rgb([10, 20, 30]));
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();

        let frame = Frame::from_bytes(&bytes).unwrap();
        assert_eq!(frame.dimensions(), (6, 4));
        assert_eq!(frame.pixel(5, 3), [10, 20, 30]);
    }

    #[test]
    fn test_from_bytes_garbage_is_decode_error() {
        let result = Frame::from_bytes(b"definitely not an image");
        assert!(matches!(result, Err(DetectionError::Decode(_))));
    }

    #[test]
    fn test_empty_frame_rejected() {
        let result = Frame::from_rgb(RgbImage::new(0, 10));
        assert!(matches!(
            result,
            Err(DetectionError::EmptyFrame {
                width: 0,
                height: 10
            })
        ));
    }

    #[test]
    fn test_open_missing_file() {
        let result = Frame::open("/nonexistent/path/to/frame.png");
        assert!(result.is_err());
    }
}

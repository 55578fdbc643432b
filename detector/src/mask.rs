//! Binary masks and the morphology applied to them

use image::{GrayImage, Luma};
use imageproc::distance_transform::Norm;
use imageproc::morphology;

const ON: Luma<u8> = Luma([255]);
const OFF: Luma<u8> = Luma([0]);

/// W×H membership grid, stored as a 0/255 gray image
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryMask {
    image: GrayImage,
}

impl BinaryMask {
    pub fn from_fn<F>(width: u32, height: u32, mut f: F) -> Self
    where
        F: FnMut(u32, u32) -> bool,
    {
        let image = GrayImage::from_fn(width, height, |x, y| if f(x, y) { ON } else { OFF });
        Self { image }
    }

    /// Mask with every pixel set to `value`
    pub fn filled(width: u32, height: u32, value: bool) -> Self {
        let image = GrayImage::from_pixel(width, height, if value { ON } else { OFF });
        Self { image }
    }

    /// Interpret any nonzero pixel as set
    pub fn from_gray(image: &GrayImage) -> Self {
        let (width, height) = image.dimensions();
        Self::from_fn(width, height, |x, y| image.get_pixel(x, y)[0] != 0)
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

    pub fn get(&self, x: u32, y: u32) -> bool {
        self.image.get_pixel(x, y)[0] != 0
    }

    pub fn set(&mut self, x: u32, y: u32, value: bool) {
        self.image.put_pixel(x, y, if value { ON } else { OFF });
    }

    /// Number of set pixels
    pub fn count(&self) -> usize {
        self.image.as_raw().iter().filter(|&&p| p != 0).count()
    }

    pub fn is_empty(&self) -> bool {
        self.image.as_raw().iter().all(|&p| p == 0)
    }

    pub fn is_full(&self) -> bool {
        self.image.as_raw().iter().all(|&p| p != 0)
    }

    pub fn as_gray(&self) -> &GrayImage {
        &self.image
    }

    /// Pixelwise AND
    ///
    /// # Panics
    ///
    /// Panics if the two masks differ in size.
    pub fn and(&self, other: &BinaryMask) -> BinaryMask {
        assert_eq!(
            self.dimensions(),
            other.dimensions(),
            "mask size mismatch in AND"
        );
        let mut image = self.image.clone();
        for (dst, src) in image.pixels_mut().zip(other.image.pixels()) {
            if src[0] == 0 {
                *dst = OFF;
            }
        }
        Self { image }
    }

    /// `rounds` erosions with a square element of the given radius
    pub fn erode(&self, radius: u32, rounds: u32) -> BinaryMask {
        match reach(radius, rounds) {
            0 => self.clone(),
            k => Self {
                image: morphology::erode(&self.image, Norm::LInf, k),
            },
        }
    }

    /// `rounds` dilations with a square element of the given radius
    pub fn dilate(&self, radius: u32, rounds: u32) -> BinaryMask {
        match reach(radius, rounds) {
            0 => self.clone(),
            k => Self {
                image: morphology::dilate(&self.image, Norm::LInf, k),
            },
        }
    }

    /// `rounds` erosions followed by as many dilations (removes specks)
    pub fn open(&self, radius: u32, rounds: u32) -> BinaryMask {
        self.erode(radius, rounds).dilate(radius, rounds)
    }

    /// `rounds` dilations followed by as many erosions (fills gaps)
    pub fn close(&self, radius: u32, rounds: u32) -> BinaryMask {
        self.dilate(radius, rounds).erode(radius, rounds)
    }
}

/// Iterating a square element `rounds` times equals one square of `radius * rounds`.
/// Callers validate the product against `MAX_MORPHOLOGY_RADIUS` up front.
fn reach(radius: u32, rounds: u32) -> u8 {
    radius.saturating_mul(rounds).min(u8::MAX as u32) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect_mask(w: u32, h: u32, x0: u32, y0: u32, rw: u32, rh: u32) -> BinaryMask {
        BinaryMask::from_fn(w, h, |x, y| x >= x0 && x < x0 + rw && y >= y0 && y < y0 + rh)
    }

    #[test]
    fn test_count_and_and() {
        let a = rect_mask(20, 20, 0, 0, 10, 10);
        let b = rect_mask(20, 20, 5, 5, 10, 10);
        assert_eq!(a.count(), 100);
        assert_eq!(a.and(&b).count(), 25);
        assert!(BinaryMask::filled(4, 4, false).is_empty());
        assert!(BinaryMask::filled(4, 4, true).is_full());
    }

    #[test]
    #[should_panic(expected = "mask size mismatch")]
    fn test_and_rejects_size_mismatch() {
        let a = BinaryMask::filled(10, 10, true);
        let b = BinaryMask::filled(10, 9, true);
        let _ = a.and(&b);
    }

    #[test]
    fn test_open_removes_specks_keeps_blocks() {
        let mut mask = rect_mask(40, 40, 10, 10, 12, 12);
        mask.set(2, 2, true);
        mask.set(30, 35, true);
        let opened = mask.open(1, 1);
        assert!(!opened.get(2, 2));
        assert!(!opened.get(30, 35));
        assert_eq!(opened, rect_mask(40, 40, 10, 10, 12, 12));
    }

    #[test]
    fn test_close_fills_small_gap() {
        // two blocks separated by a 2-pixel column
        let mask = BinaryMask::from_fn(30, 20, |x, y| {
            (5..20).contains(&y) && ((2..10).contains(&x) || (12..20).contains(&x))
        });
        let closed = mask.close(1, 1);
        assert!(closed.get(10, 10));
        assert!(closed.get(11, 10));
    }

    #[test]
    fn test_close_keeps_wide_gap() {
        // a 5-pixel gap survives two rounds of closing
        let mask = BinaryMask::from_fn(40, 20, |x, y| {
            (5..15).contains(&y) && ((2..10).contains(&x) || (15..25).contains(&x))
        });
        let closed = mask.close(1, 2);
        assert!(!closed.get(12, 10));
    }

    #[test]
    fn test_dilate_grows_by_radius() {
        let mask = rect_mask(30, 30, 10, 10, 5, 5);
        let grown = mask.dilate(1, 1);
        assert_eq!(grown, rect_mask(30, 30, 9, 9, 7, 7));
    }

    #[test]
    fn test_zero_rounds_is_identity() {
        let mask = rect_mask(10, 10, 2, 2, 3, 3);
        assert_eq!(mask.open(1, 0), mask);
        assert_eq!(mask.dilate(0, 3), mask);
    }

    #[test]
    fn test_foreground_at_border_not_eroded_by_edge() {
        let mask = BinaryMask::filled(10, 10, true);
        assert!(mask.erode(1, 2).is_full());
    }
}

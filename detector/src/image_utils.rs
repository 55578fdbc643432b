//! Drawing and cropping helpers for inspecting detections
use crate::color::hsv_to_rgb;
use crate::frame::Frame;
use crate::types::{ColorClassSpec, Detection, DetectionSet};
use image::{Rgb, RgbImage};

/// Box color for classes missing from the table
pub const FALLBACK_COLOR: Rgb<u8> = Rgb([0, 255, 0]);

/// Border width used by [`annotate`]
pub const BOX_THICKNESS: u32 = 2;

/// Drawing color of a class: the RGB value of its HSV midpoint
pub fn class_color(color_class: &str, classes: &[ColorClassSpec]) -> Rgb<u8> {
    classes
        .iter()
        .find(|spec| spec.name == color_class)
        .map(|spec| Rgb(hsv_to_rgb(spec.representative())))
        .unwrap_or(FALLBACK_COLOR)
}

/// Copy of the frame with every detection outlined in its class color
pub fn annotate(frame: &Frame, detections: &DetectionSet, classes: &[ColorClassSpec]) -> RgbImage {
    let mut img = frame.as_rgb().clone();
    for det in detections {
        let color = class_color(&det.color_class, classes);
        draw_rect(
            &mut img,
            det.bbox.x,
            det.bbox.y,
            det.bbox.width,
            det.bbox.height,
            color,
            BOX_THICKNESS,
        );
    }
    log::debug!("Annotated {} detections", detections.count());
    img
}

/// Draw a rectangle border growing inward from the given box
///
/// Stops early once the box is too small for another ring.
pub fn draw_rect(
    img: &mut RgbImage,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
    color: Rgb<u8>,
    thickness: u32,
) {
    use imageproc::drawing::draw_hollow_rect_mut;
    use imageproc::rect::Rect;

    for offset in 0..thickness {
        if width <= offset * 2 || height <= offset * 2 {
            break;
        }
        let ring = Rect::at((x + offset) as i32, (y + offset) as i32)
            .of_size(width - offset * 2, height - offset * 2);
        draw_hollow_rect_mut(img, ring, color);
    }
}

/// The frame region covered by a detection's box
pub fn crop_detection(frame: &Frame, detection: &Detection) -> RgbImage {
    let b = detection.bbox.clamped(frame.width(), frame.height());
    image::imageops::crop_imm(frame.as_rgb(), b.x, b.y, b.width, b.height).to_image()
}

#[cfg(test)]
mod tests {
    use super::*;
    use boxmerge::PixelBox;

    fn white_frame() -> Frame {
        Frame::from_rgb(RgbImage::from_pixel(100, 80, Rgb([255, 255, 255]))).unwrap()
    }

    #[test]
    fn test_class_color_from_table() {
        let classes = ColorClassSpec::default_table();
        let red = class_color("red", &classes);
        assert_eq!(red, Rgb(hsv_to_rgb(classes[0].representative())));
        assert!(red[0] > red[1] && red[0] > red[2]);
        assert_eq!(class_color("purple", &classes), FALLBACK_COLOR);
    }

    #[test]
    fn test_annotate_outlines_boxes() {
        let frame = white_frame();
        let classes = ColorClassSpec::default_table();
        let det = Detection::new("blue", PixelBox::new(10, 20, 30, 25), 500).unwrap();
        let set = DetectionSet::new(vec![det]);

        let img = annotate(&frame, &set, &classes);
        let blue = class_color("blue", &classes);
        assert_eq!(*img.get_pixel(10, 20), blue);
        assert_eq!(*img.get_pixel(11, 21), blue);
        assert_eq!(*img.get_pixel(39, 44), blue);
        assert_eq!(*img.get_pixel(25, 32), Rgb([255, 255, 255]));
        // the source frame is untouched
        assert_eq!(frame.pixel(10, 20), [255, 255, 255]);
    }

    #[test]
    fn test_annotate_box_on_frame_edge() {
        let frame = white_frame();
        let det = Detection::new("mystery", PixelBox::new(0, 0, 100, 80), 500).unwrap();
        let img = annotate(&frame, &DetectionSet::new(vec![det]), &[]);
        assert_eq!(*img.get_pixel(0, 0), FALLBACK_COLOR);
        assert_eq!(*img.get_pixel(99, 79), FALLBACK_COLOR);
    }

    #[test]
    fn test_draw_rect_tiny_box() {
        let mut img = RgbImage::new(10, 10);
        draw_rect(&mut img, 4, 4, 1, 1, Rgb([9, 9, 9]), 3);
        assert_eq!(*img.get_pixel(4, 4), Rgb([9, 9, 9]));
        assert_eq!(*img.get_pixel(5, 5), Rgb([0, 0, 0]));
    }

    #[test]
    fn test_crop_detection() {
        let img = RgbImage::from_fn(60, 40, |x, y| Rgb([x as u8, y as u8, 0]));
        let frame = Frame::from_rgb(img).unwrap();
        let det = Detection::new("red", PixelBox::new(5, 7, 20, 10), 100).unwrap();

        let crop = crop_detection(&frame, &det);
        assert_eq!(crop.dimensions(), (20, 10));
        assert_eq!(*crop.get_pixel(0, 0), Rgb([5, 7, 0]));
        assert_eq!(*crop.get_pixel(19, 9), Rgb([24, 16, 0]));
    }
}

//! Integer bounding box operations and overlap measures

use serde::{Deserialize, Serialize};
use std::fmt;

/// Axis-aligned box in pixel coordinates, covering `[x, x + width) × [y, y + height)`
///
/// Serializes as `[x, y, width, height]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "[u32; 4]", from = "[u32; 4]")]
pub struct PixelBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Integer point, used for region anchors. Serializes as `[x, y]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "[u32; 2]", from = "[u32; 2]")]
pub struct Point {
    pub x: u32,
    pub y: u32,
}

impl From<PixelBox> for [u32; 4] {
    fn from(b: PixelBox) -> Self {
        [b.x, b.y, b.width, b.height]
    }
}

impl From<[u32; 4]> for PixelBox {
    fn from([x, y, width, height]: [u32; 4]) -> Self {
        PixelBox::new(x, y, width, height)
    }
}

impl From<Point> for [u32; 2] {
    fn from(p: Point) -> Self {
        [p.x, p.y]
    }
}

impl From<[u32; 2]> for Point {
    fn from([x, y]: [u32; 2]) -> Self {
        Point { x, y }
    }
}

impl PixelBox {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build from half-open corner coordinates. Inverted corners yield an empty box.
    pub fn from_corners(x0: u32, y0: u32, x1: u32, y1: u32) -> Self {
        Self {
            x: x0,
            y: y0,
            width: x1.saturating_sub(x0),
            height: y1.saturating_sub(y0),
        }
    }

    /// Exclusive right edge
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    /// Exclusive bottom edge
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Center point, rounded down
    pub fn center(&self) -> Point {
        Point {
            x: self.x + self.width / 2,
            y: self.y + self.height / 2,
        }
    }

    /// Overlapping region of two boxes, `None` unless it has positive area
    pub fn intersection(&self, other: &PixelBox) -> Option<PixelBox> {
        let x0 = self.x.max(other.x);
        let y0 = self.y.max(other.y);
        let x1 = self.right().min(other.right());
        let y1 = self.bottom().min(other.bottom());

        if x1 <= x0 || y1 <= y0 {
            return None;
        }

        Some(PixelBox::from_corners(x0, y0, x1, y1))
    }

    /// Smallest box enclosing both boxes
    pub fn union(&self, other: &PixelBox) -> PixelBox {
        PixelBox::from_corners(
            self.x.min(other.x),
            self.y.min(other.y),
            self.right().max(other.right()),
            self.bottom().max(other.bottom()),
        )
    }

    /// True if `other` lies entirely inside this box
    pub fn contains(&self, other: &PixelBox) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Grow by `pad` on every side, then clamp to an image of `img_width × img_height`.
    ///
    /// Near the image edge the result can be smaller than the padded size; it is
    /// never rejected or wrapped.
    pub fn padded_clamped(&self, pad: u32, img_width: u32, img_height: u32) -> PixelBox {
        let x0 = self.x.saturating_sub(pad);
        let y0 = self.y.saturating_sub(pad);
        let x1 = self.right().saturating_add(pad).min(img_width);
        let y1 = self.bottom().saturating_add(pad).min(img_height);
        PixelBox::from_corners(x0, y0, x1, y1)
    }

    /// Clamp to an image of `img_width × img_height` without padding
    pub fn clamped(&self, img_width: u32, img_height: u32) -> PixelBox {
        self.padded_clamped(0, img_width, img_height)
    }
}

impl fmt::Display for PixelBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PixelBox({}, {}, {}x{})",
            self.x, self.y, self.width, self.height
        )
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Intersection area divided by the area of the smaller box.
///
/// Unlike IoU this reaches 1.0 whenever one box sits fully inside the other,
/// so contained fragments score high regardless of the size difference.
/// The denominator is floored at 1.
pub fn overlap_coefficient(a: &PixelBox, b: &PixelBox) -> f64 {
    match a.intersection(b) {
        Some(inter) => {
            let smaller = a.area().min(b.area()).max(1);
            inter.area() as f64 / smaller as f64
        }
        None => 0.0,
    }
}

/// Standard intersection over union
pub fn calculate_iou(a: &PixelBox, b: &PixelBox) -> f64 {
    let Some(inter) = a.intersection(b) else {
        return 0.0;
    };

    let inter_area = inter.area();
    let union = a.area() + b.area() - inter_area;

    if union > 0 {
        inter_area as f64 / union as f64
    } else {
        0.0
    }
}

//! Mapping between viewport pixels and normalized image coordinates
//!
//! The page renderer reports where the rasterized page is drawn inside the
//! viewport (its offset and pixel size). Everything the engine stores is
//! relative to that rectangle, so layouts survive re-rasterization at a
//! different resolution.

use super::config::EngineConfig;
use super::types::{FieldBox, Point, Size};

/// Where the rasterized page sits inside the viewport, in viewport pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageFrame {
    pub offset: Point,
    pub size: Size,
}

impl ImageFrame {
    pub fn new(offset: Point, size: Size) -> Self {
        Self { offset, size }
    }

    /// An image of `image` size centered inside a viewport of `viewport` size
    pub fn centered(viewport: Size, image: Size) -> Self {
        Self::new(
            Point::new(
                (viewport.width - image.width) / 2.0,
                (viewport.height - image.height) / 2.0,
            ),
            image,
        )
    }

    /// True when nothing has been rasterized yet
    pub fn is_empty(&self) -> bool {
        self.size.is_empty()
    }

    /// Viewport point to normalized image coordinates, clamped to `[0, 1]`
    pub fn to_normalized(&self, point: Point) -> Point {
        to_normalized(point, self.offset, self.size)
    }

    /// Normalized image coordinates to a viewport point inside the drawn image
    pub fn to_viewport(&self, point: Point) -> Point {
        to_viewport(point, self.offset, self.size)
    }

    /// A box's top-left corner and size in viewport pixels
    pub fn box_to_viewport(&self, rect: &FieldBox) -> (Point, Size) {
        (
            self.to_viewport(rect.origin()),
            Size::new(rect.w() * self.size.width, rect.h() * self.size.height),
        )
    }

    /// Pixel thresholds from the config, converted for this frame's resolution
    pub fn thresholds(&self, config: &EngineConfig) -> Thresholds {
        let per_axis = |pixels: f64, extent: f64| {
            if extent > 0.0 {
                (pixels / extent).clamp(0.0, 1.0)
            } else {
                1.0
            }
        };
        Thresholds {
            tolerance_x: per_axis(config.hit_tolerance_px, self.size.width),
            tolerance_y: per_axis(config.hit_tolerance_px, self.size.height),
            min_width: per_axis(config.min_box_px, self.size.width),
            min_height: per_axis(config.min_box_px, self.size.height),
        }
    }
}

/// Hit tolerance and minimum box size, in normalized units per axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub tolerance_x: f64,
    pub tolerance_y: f64,
    pub min_width: f64,
    pub min_height: f64,
}

impl Thresholds {
    /// Thresholds given directly in normalized units
    pub fn normalized(tolerance: f64, min_size: f64) -> Self {
        Self {
            tolerance_x: tolerance,
            tolerance_y: tolerance,
            min_width: min_size,
            min_height: min_size,
        }
    }
}

/// Map a viewport point into normalized image space.
///
/// Points outside the drawn image are clamped onto its border so drags that
/// leave the image keep tracking.
pub fn to_normalized(viewport: Point, image_offset: Point, image_size: Size) -> Point {
    let axis = |v: f64, offset: f64, extent: f64| {
        if extent > 0.0 {
            (v - offset) / extent
        } else {
            0.0
        }
    };
    Point::new(
        axis(viewport.x, image_offset.x, image_size.width),
        axis(viewport.y, image_offset.y, image_size.height),
    )
    .clamp_unit()
}

/// Map a normalized point back into viewport pixels, inside the drawn image
pub fn to_viewport(normalized: Point, image_offset: Point, image_size: Size) -> Point {
    let n = normalized.clamp_unit();
    Point::new(
        image_offset.x + n.x * image_size.width.max(0.0),
        image_offset.y + n.y * image_size.height.max(0.0),
    )
}

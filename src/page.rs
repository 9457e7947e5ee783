//! The page-renderer collaborator
//!
//! The engine never rasterizes anything itself. It only needs to know where
//! the current rasterization of the page is drawn in the viewport, and to
//! ask for a new one when the viewport settles at a new size.

use crate::layout::{ImageFrame, Point, Size};

/// Source of the current image geometry
pub trait PageRenderer {
    /// Pixel size of the latest rasterization
    fn current_image_size(&self) -> Size;

    /// Top-left corner of the drawn image inside the viewport
    fn current_image_offset(&self) -> Point;

    /// Re-rasterize for a new viewport size
    fn rerender(&mut self, viewport: Size);

    /// Both of the above as one frame
    fn frame(&self) -> ImageFrame {
        ImageFrame::new(self.current_image_offset(), self.current_image_size())
    }
}

/// How a page is fitted into the viewport
#[derive(Debug, Clone, PartialEq)]
pub struct FitPolicy {
    /// Space reserved for the side panel and window chrome
    pub chrome: Size,
    /// Smallest area the page is fitted into, however small the viewport
    pub min_area: Size,
    /// Fraction of the fitted scale actually used, so the page is not glued to the edges
    pub margin: f64,
}

impl Default for FitPolicy {
    fn default() -> Self {
        Self {
            chrome: Size::new(200.0, 100.0),
            min_area: Size::new(400.0, 300.0),
            margin: 0.95,
        }
    }
}

impl FitPolicy {
    /// Scale from page units (PDF points) to pixels for a viewport
    pub fn scale(&self, page: Size, viewport: Size) -> f64 {
        if page.is_empty() {
            return 0.0;
        }
        let avail_w = (viewport.width - self.chrome.width).max(self.min_area.width);
        let avail_h = (viewport.height - self.chrome.height).max(self.min_area.height);

        let scale = if page.width / page.height > avail_w / avail_h {
            avail_w / page.width
        } else {
            avail_h / page.height
        };
        scale * self.margin
    }
}

/// A page of known size fitted and centered in the viewport.
///
/// Stands in for a real rasterizer: it computes the geometry a rasterizer
/// would produce, and counts how often it was asked to render.
#[derive(Debug, Clone)]
pub struct FittedPage {
    page: Size,
    policy: FitPolicy,
    viewport: Size,
    frame: ImageFrame,
    renders: usize,
}

impl FittedPage {
    pub fn new(page: Size, viewport: Size) -> Self {
        Self::with_policy(page, viewport, FitPolicy::default())
    }

    pub fn with_policy(page: Size, viewport: Size, policy: FitPolicy) -> Self {
        let mut fitted = Self {
            page,
            policy,
            viewport,
            frame: ImageFrame::new(Point::new(0.0, 0.0), Size::new(0.0, 0.0)),
            renders: 0,
        };
        fitted.rerender(viewport);
        fitted
    }

    /// A4 portrait, in PDF points
    pub fn a4(viewport: Size) -> Self {
        Self::new(Size::new(595.0, 842.0), viewport)
    }

    pub fn page_size(&self) -> Size {
        self.page
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Number of rasterizations so far
    pub fn render_count(&self) -> usize {
        self.renders
    }
}

impl PageRenderer for FittedPage {
    fn current_image_size(&self) -> Size {
        self.frame.size
    }

    fn current_image_offset(&self) -> Point {
        self.frame.offset
    }

    fn rerender(&mut self, viewport: Size) {
        let scale = self.policy.scale(self.page, viewport);
        let image = Size::new(
            (self.page.width * scale).round(),
            (self.page.height * scale).round(),
        );
        self.viewport = viewport;
        self.frame = ImageFrame::centered(viewport, image);
        self.renders += 1;
    }
}

/// A renderer with a fixed frame, for hosts that rasterize elsewhere
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticFrame(pub ImageFrame);

impl PageRenderer for StaticFrame {
    fn current_image_size(&self) -> Size {
        self.0.size
    }

    fn current_image_offset(&self) -> Point {
        self.0.offset
    }

    fn rerender(&mut self, _viewport: Size) {}
}

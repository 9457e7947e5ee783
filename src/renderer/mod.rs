//! SVG overlay renderer
//!
//! Draws the current boxes over the rasterized page, in image pixels, with
//! CSS classes so hosts can style them.

pub mod config;
pub mod svg;

pub use config::OverlayConfig;
pub use svg::render_overlay;

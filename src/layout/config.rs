//! Configuration for the box-layout engine

use std::time::Duration;

/// Tuning knobs for hit-testing, gesture validation and persistence
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Distance from an edge, in viewport pixels, that still grabs the edge
    pub hit_tolerance_px: f64,

    /// Smallest box side, in viewport pixels, accepted at creation and kept by resize
    pub min_box_px: f64,

    /// Normalized size given to legacy point-only records (width, height)
    pub legacy_box_size: (f64, f64),

    /// Quiet period before a viewport resize triggers a re-render
    pub resize_debounce: Duration,

    /// Decimal places kept when a box is written
    pub precision: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            hit_tolerance_px: 6.0,
            min_box_px: 4.0,
            legacy_box_size: (0.05, 0.02),
            resize_debounce: Duration::from_millis(150),
            precision: 6,
        }
    }
}

impl EngineConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the edge grab tolerance
    pub fn with_hit_tolerance(mut self, pixels: f64) -> Self {
        self.hit_tolerance_px = pixels;
        self
    }

    /// Set the minimum box side
    pub fn with_min_box(mut self, pixels: f64) -> Self {
        self.min_box_px = pixels;
        self
    }

    /// Set the size synthesized for legacy records
    pub fn with_legacy_box_size(mut self, width: f64, height: f64) -> Self {
        self.legacy_box_size = (width, height);
        self
    }

    /// Set the resize debounce delay
    pub fn with_resize_debounce(mut self, delay: Duration) -> Self {
        self.resize_debounce = delay;
        self
    }

    /// Set the rounding precision
    pub fn with_precision(mut self, decimals: u32) -> Self {
        self.precision = decimals;
        self
    }
}

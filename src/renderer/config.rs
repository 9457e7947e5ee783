//! Configuration for the SVG overlay

/// How the overlay SVG is written out
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayConfig {
    /// Emit the XML declaration, for writing the overlay to its own file
    pub standalone: bool,

    /// One element per line, indented
    pub pretty_print: bool,

    /// Prefix for CSS class names (e.g., "ple-" for "ple-box")
    pub class_prefix: Option<String>,

    /// Font size of preview text, in image pixels
    pub font_size: f64,

    /// Distance between preview text lines, in image pixels
    pub line_height: f64,

    /// Half-length of the crosshair arms at a box's anchor corner
    pub crosshair: f64,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            standalone: true,
            pretty_print: true,
            class_prefix: Some("ple-".to_string()),
            font_size: 11.0,
            line_height: 14.0,
            crosshair: 6.0,
        }
    }
}

impl OverlayConfig {
    /// Default overlay settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle the XML declaration
    pub fn with_standalone(mut self, standalone: bool) -> Self {
        self.standalone = standalone;
        self
    }

    /// Toggle indentation and line breaks
    pub fn with_pretty_print(mut self, pretty: bool) -> Self {
        self.pretty_print = pretty;
        self
    }

    /// Prefix every CSS class and element id
    pub fn with_class_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.class_prefix = Some(prefix.into());
        self
    }

    /// Use bare class names
    pub fn without_class_prefix(mut self) -> Self {
        self.class_prefix = None;
        self
    }

    /// Set the preview text metrics
    pub fn with_text_metrics(mut self, font_size: f64, line_height: f64) -> Self {
        self.font_size = font_size;
        self.line_height = line_height;
        self
    }

    /// Set the crosshair arm length, 0 to disable
    pub fn with_crosshair(mut self, arm: f64) -> Self {
        self.crosshair = arm;
        self
    }
}

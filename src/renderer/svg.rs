//! SVG generation for the box overlay

use crate::layout::{FieldBox, FieldId, FieldRegistry, ImageFrame, Point, Size};

use super::OverlayConfig;

/// Build SVG elements incrementally
pub struct SvgBuilder {
    config: OverlayConfig,
    styles: Vec<String>,
    elements: Vec<String>,
    indent: usize,
}

impl SvgBuilder {
    /// Create a new SVG builder
    pub fn new(config: OverlayConfig) -> Self {
        Self {
            config,
            styles: vec![],
            elements: vec![],
            indent: 1,
        }
    }

    /// Add the default overlay colors
    pub fn add_default_style(&mut self) {
        let p = self.prefix();
        self.styles.push(format!(
            ".{p}box {{ fill: none; stroke: #d32f2f; }} \
             .{p}selected .{p}box {{ stroke: #1976d2; stroke-width: 2; }} \
             .{p}preview {{ fill: none; stroke: #1976d2; stroke-dasharray: 4 2; }} \
             .{p}text {{ fill: #d32f2f; }} \
             .{p}crosshair {{ stroke: #d32f2f; }}"
        ));
    }

    fn prefix(&self) -> String {
        self.config.class_prefix.clone().unwrap_or_default()
    }

    fn indent_str(&self) -> String {
        if self.config.pretty_print {
            "  ".repeat(self.indent)
        } else {
            String::new()
        }
    }

    fn newline(&self) -> &str {
        if self.config.pretty_print {
            "\n"
        } else {
            ""
        }
    }

    /// Add a rectangle element
    pub fn add_rect(&mut self, class: &str, origin: Point, size: Size) {
        let prefix = self.prefix();
        self.elements.push(format!(
            r#"{}<rect class="{}{}" x="{}" y="{}" width="{}" height="{}"/>"#,
            self.indent_str(),
            prefix,
            class,
            origin.x,
            origin.y,
            size.width,
            size.height
        ));
    }

    /// Add a line element
    pub fn add_line(&mut self, class: &str, from: Point, to: Point) {
        let prefix = self.prefix();
        self.elements.push(format!(
            r#"{}<line class="{}{}" x1="{}" y1="{}" x2="{}" y2="{}"/>"#,
            self.indent_str(),
            prefix,
            class,
            from.x,
            from.y,
            to.x,
            to.y
        ));
    }

    /// Add a text element with its baseline at `y`
    pub fn add_text(&mut self, text: &str, x: f64, y: f64) {
        let prefix = self.prefix();
        self.elements.push(format!(
            r#"{}<text class="{}text" x="{}" y="{}" font-size="{}">{}</text>"#,
            self.indent_str(),
            prefix,
            x,
            y,
            self.config.font_size,
            escape_xml(text)
        ));
    }

    /// Start a group element
    pub fn start_group(&mut self, id: &str, selected: bool) {
        let prefix = self.prefix();
        let class_list = if selected {
            format!("{prefix}field {prefix}selected")
        } else {
            format!("{prefix}field")
        };
        self.elements.push(format!(
            r#"{}<g id="{}field-{}" class="{}">"#,
            self.indent_str(),
            prefix,
            escape_xml(id),
            class_list
        ));
        self.indent += 1;
    }

    /// End a group element
    pub fn end_group(&mut self) {
        self.indent = self.indent.saturating_sub(1);
        self.elements.push(format!("{}</g>", self.indent_str()));
    }

    /// Build the final SVG string, sized to the image
    pub fn build(self, size: Size) -> String {
        let nl = self.newline();
        let pad = if self.config.pretty_print { "  " } else { "" };

        let mut svg = String::new();

        if self.config.standalone {
            svg.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
            svg.push_str(nl);
        }

        svg.push_str(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = size.width,
            h = size.height
        ));
        svg.push_str(nl);

        if !self.styles.is_empty() {
            svg.push_str(pad);
            svg.push_str("<style>");
            svg.push_str(nl);
            for style in &self.styles {
                svg.push_str(pad);
                svg.push_str(pad);
                svg.push_str(style);
                svg.push_str(nl);
            }
            svg.push_str(pad);
            svg.push_str("</style>");
            svg.push_str(nl);
        }

        for elem in &self.elements {
            svg.push_str(elem);
            svg.push_str(nl);
        }

        svg.push_str("</svg>");

        svg
    }
}

/// Render every set box, its preview text and anchor crosshair over an
/// image of `image` pixels. `preview` is a creation rectangle in progress.
pub fn render_overlay(
    registry: &FieldRegistry,
    selected: Option<FieldId>,
    preview: Option<(FieldId, FieldBox)>,
    image: Size,
    config: &OverlayConfig,
) -> String {
    let mut builder = SvgBuilder::new(config.clone());
    builder.add_default_style();

    let frame = ImageFrame::new(Point::new(0.0, 0.0), image);
    for (id, field, rect) in registry.placed() {
        let (origin, size) = frame.box_to_viewport(&rect);

        builder.start_group(&field.id, selected == Some(id));
        builder.add_rect("box", origin, size);
        for (i, line) in field.preview_text.lines().enumerate() {
            builder.add_text(
                line,
                origin.x + 2.0,
                origin.y + config.line_height * (i + 1) as f64,
            );
        }
        if config.crosshair > 0.0 {
            let arm = config.crosshair;
            builder.add_line(
                "crosshair",
                Point::new(origin.x - arm, origin.y),
                Point::new(origin.x + arm, origin.y),
            );
            builder.add_line(
                "crosshair",
                Point::new(origin.x, origin.y - arm),
                Point::new(origin.x, origin.y + arm),
            );
        }
        builder.end_group();
    }

    if let Some((_, rect)) = preview {
        let (origin, size) = frame.box_to_viewport(&rect);
        builder.add_rect("preview", origin, size);
    }

    builder.build(image)
}

/// Escape special XML characters
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

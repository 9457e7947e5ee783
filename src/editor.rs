//! Host-facing editor: viewport events in, registry updates and status out
//!
//! [`Editor`] owns the field registry, the drag machine and the page
//! renderer. Hosts feed it pointer events in viewport pixels; it converts
//! them through the renderer's current frame before they reach the engine.

use std::path::Path;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::catalog::EditorSettings;
use crate::debounce::ResizeDebouncer;
use crate::layout::{
    DiscardReason, DragMachine, DragSession, EngineConfig, FieldBox, FieldId, FieldRegistry,
    GestureOutcome, ImageFrame, LayoutError, Point, Size, Thresholds,
};
use crate::page::{FittedPage, PageRenderer};
use crate::persist::{self, LoadReport, PersistError};
use crate::renderer::{render_overlay, OverlayConfig};

/// Interactive layout editor over a page renderer
pub struct Editor<R: PageRenderer = FittedPage> {
    registry: FieldRegistry,
    drag: DragMachine,
    renderer: R,
    config: EngineConfig,
    selected: Option<FieldId>,
    debouncer: ResizeDebouncer,
    status: Option<String>,
}

impl<R: PageRenderer> Editor<R> {
    pub fn new(settings: EditorSettings, renderer: R) -> Self {
        let EditorSettings { engine, catalog } = settings;
        Self {
            registry: FieldRegistry::new(catalog),
            drag: DragMachine::new(engine.precision),
            debouncer: ResizeDebouncer::new(engine.resize_debounce),
            renderer,
            config: engine,
            selected: None,
            status: None,
        }
    }

    pub fn registry(&self) -> &FieldRegistry {
        &self.registry
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn session(&self) -> &DragSession {
        self.drag.session()
    }

    /// Last status message for the host's status bar
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn selected(&self) -> Option<FieldId> {
        self.selected
    }

    /// Select a field by id or label
    pub fn select(&mut self, name: &str) -> Result<FieldId, LayoutError> {
        let id = self.registry.catalog().resolve(name)?;
        self.select_field(id);
        Ok(id)
    }

    pub fn select_field(&mut self, id: FieldId) {
        debug!(field = %self.registry.catalog().field(id).id, "field selected");
        self.selected = Some(id);
    }

    /// Where the page is currently drawn in the viewport
    pub fn frame(&self) -> ImageFrame {
        self.renderer.frame()
    }

    /// Hit tolerance and minimum size for the current resolution
    pub fn thresholds(&self) -> Thresholds {
        self.frame().thresholds(&self.config)
    }

    /// The viewport point in normalized coordinates, if a page is drawn
    fn normalize(&self, viewport: Point) -> Option<(Point, Thresholds)> {
        let frame = self.frame();
        if frame.is_empty() {
            return None;
        }
        Some((frame.to_normalized(viewport), frame.thresholds(&self.config)))
    }

    pub fn pointer_down(&mut self, viewport: Point) -> GestureOutcome {
        let Some((pos, thresholds)) = self.normalize(viewport) else {
            debug!("pointer down before the page is drawn, ignoring");
            return GestureOutcome::Ignored;
        };
        let outcome = self
            .drag
            .pointer_down(&self.registry, pos, self.selected, &thresholds);
        if let GestureOutcome::Started { field, .. } = outcome {
            self.selected = Some(field);
        }
        outcome
    }

    pub fn pointer_move(&mut self, viewport: Point) -> GestureOutcome {
        let Some((pos, thresholds)) = self.normalize(viewport) else {
            return GestureOutcome::Ignored;
        };
        self.drag.pointer_move(&mut self.registry, pos, &thresholds)
    }

    pub fn pointer_up(&mut self, viewport: Point) -> GestureOutcome {
        let Some((pos, thresholds)) = self.normalize(viewport) else {
            return self.cancel();
        };
        let outcome = self.drag.pointer_up(&mut self.registry, pos, &thresholds);
        self.report(&outcome);
        outcome
    }

    /// Abort the current gesture, e.g. when the pointer capture is lost
    pub fn cancel(&mut self) -> GestureOutcome {
        let outcome = self.drag.cancel(&self.registry);
        self.report(&outcome);
        outcome
    }

    /// The rectangle being drawn by a creation gesture
    pub fn preview(&self) -> Option<(FieldId, FieldBox)> {
        self.drag.preview()
    }

    /// Record a viewport resize; the page is re-rendered once resizes settle
    pub fn viewport_resized(&mut self, size: Size, now: Instant) {
        self.debouncer.push(size, now);
    }

    /// Apply a settled viewport resize. Returns true if the page was re-rendered.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.debouncer.poll(now) {
            Some(size) => {
                debug!(width = size.width, height = size.height, "re-rendering page");
                self.renderer.rerender(size);
                true
            }
            None => false,
        }
    }

    /// Replace every box from a layout file.
    ///
    /// Never fails: unreadable files leave every field unset and say why in
    /// the returned report. A gesture in progress is cancelled first and the
    /// status line says so.
    pub fn load_layout(&mut self, path: &Path) -> LoadReport {
        let interrupted = if self.drag.is_active() {
            self.cancel();
            self.status.take()
        } else {
            None
        };

        let report = persist::load_file(path, self.registry.catalog(), &self.config);
        if self.registry.replace_layout(report.layout.clone()) {
            let loaded = format!(
                "Loaded {} of {} fields from {}",
                report.layout.placed_count(),
                report.layout.len(),
                path.display()
            );
            self.status = Some(match interrupted {
                Some(note) => format!("{}; {}", loaded, note),
                None => loaded,
            });
        } else {
            warn!("loaded layout does not match the catalog, keeping the current one");
            if interrupted.is_some() {
                self.status = interrupted;
            }
        }
        report
    }

    /// Write every box to a layout file
    pub fn save_layout(&mut self, path: &Path) -> Result<(), PersistError> {
        persist::save_file(path, self.registry.layout(), self.registry.catalog())?;
        self.status = Some(format!("Saved layout to {}", path.display()));
        Ok(())
    }

    /// SVG overlay of the current boxes at the current image size
    pub fn render_overlay(&self, config: &OverlayConfig) -> String {
        render_overlay(
            &self.registry,
            self.selected,
            self.preview(),
            self.frame().size,
            config,
        )
    }

    fn report(&mut self, outcome: &GestureOutcome) {
        let catalog = self.registry.catalog();
        let message = match outcome {
            GestureOutcome::Committed { field, rect } | GestureOutcome::Finished { field, rect } => {
                let message = format_status(&catalog.field(*field).id, rect);
                info!("{}", message);
                message
            }
            GestureOutcome::Discarded {
                field,
                reason: DiscardReason::TooSmall,
            } => format!("{}: box too small, discarded", catalog.field(*field).id),
            GestureOutcome::Discarded {
                field,
                reason: DiscardReason::Cancelled,
            } => format!("{}: creation cancelled", catalog.field(*field).id),
            _ => return,
        };
        self.status = Some(message);
    }
}

/// `"<id> -> (x, y, w, h)"`
fn format_status(id: &str, rect: &FieldBox) -> String {
    format!(
        "{} -> ({}, {}, {}, {})",
        id,
        rect.x(),
        rect.y(),
        rect.w(),
        rect.h()
    )
}

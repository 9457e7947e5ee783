//! Drag state machine: pointer gestures to create, move and resize boxes
//!
//! # States
//!
//! - `Idle`: no gesture in progress.
//! - `Creating`: a new box for the selected field is being drawn. The
//!   rectangle is only a preview until release; the registry is not touched.
//! - `Moving`: a box is being dragged by its body. Every move writes the
//!   translated box into the registry.
//! - `Resizing`: an edge or corner is being dragged. Every move writes the
//!   resized box into the registry.
//!
//! # Invariants
//!
//! 1. The session is replaced as a whole on every transition.
//! 2. Every registry write is a complete, valid, rounded [`FieldBox`].
//! 3. Move and resize deltas are computed from the box captured at
//!    pointer-down, not accumulated per event.
//! 4. Resize never moves the edge opposite the dragged one and never makes
//!    the box smaller than the minimum size.
//!
//! # Failure Modes
//!
//! - A pointer-down while a gesture is active abandons that gesture (moves
//!   and resizes keep their last written box) and starts over.
//! - Pointer-up or pointer-move with no active gesture is ignored.
//! - [`DragMachine::cancel`] (lost pointer capture) returns to `Idle`.

use tracing::{debug, info, warn};

use super::coords::Thresholds;
use super::hit_test::{hit_test, Hit};
use super::registry::{FieldId, FieldRegistry};
use super::types::{FieldBox, Handle, HitRegion, Point};

/// The transient state of one pointer gesture
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DragSession {
    #[default]
    Idle,
    Creating {
        field: FieldId,
        anchor: Point,
        current: Point,
    },
    Moving {
        field: FieldId,
        origin: FieldBox,
        anchor: Point,
    },
    Resizing {
        field: FieldId,
        origin: FieldBox,
        anchor: Point,
        handle: Handle,
    },
}

impl DragSession {
    /// The field targeted by the gesture, if any
    pub fn field(&self) -> Option<FieldId> {
        match self {
            DragSession::Idle => None,
            DragSession::Creating { field, .. }
            | DragSession::Moving { field, .. }
            | DragSession::Resizing { field, .. } => Some(*field),
        }
    }

    pub fn mode(&self) -> Option<DragMode> {
        match self {
            DragSession::Idle => None,
            DragSession::Creating { .. } => Some(DragMode::Create),
            DragSession::Moving { .. } => Some(DragMode::Move),
            DragSession::Resizing { handle, .. } => Some(DragMode::Resize(*handle)),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, DragSession::Idle)
    }
}

/// What a gesture does to its target box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragMode {
    Create,
    Move,
    Resize(Handle),
}

impl std::fmt::Display for DragMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DragMode::Create => f.write_str("create"),
            DragMode::Move => f.write_str("move"),
            DragMode::Resize(handle) => write!(f, "resize {}", handle),
        }
    }
}

/// Why a creation gesture left the registry untouched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscardReason {
    /// The drawn rectangle was below the minimum size
    TooSmall,
    /// The gesture was cancelled or interrupted
    Cancelled,
}

/// The observable effect of one pointer event
#[derive(Debug, Clone, PartialEq)]
pub enum GestureOutcome {
    /// Nothing happened
    Ignored,
    /// A gesture started on a field
    Started { field: FieldId, mode: DragMode },
    /// The creation preview changed; `None` while it is degenerate
    Preview {
        field: FieldId,
        rect: Option<FieldBox>,
    },
    /// A live move/resize write
    Updated { field: FieldId, rect: FieldBox },
    /// A new box was committed on release
    Committed { field: FieldId, rect: FieldBox },
    /// A move/resize ended; `rect` is the final box
    Finished { field: FieldId, rect: FieldBox },
    /// A creation gesture ended without touching the registry
    Discarded {
        field: FieldId,
        reason: DiscardReason,
    },
}

/// Owns the drag session and applies pointer events to a [`FieldRegistry`]
#[derive(Debug, Clone)]
pub struct DragMachine {
    session: DragSession,
    precision: u32,
}

impl Default for DragMachine {
    fn default() -> Self {
        Self::new(6)
    }
}

impl DragMachine {
    /// Create an idle machine that rounds written boxes to `precision` decimals
    pub fn new(precision: u32) -> Self {
        Self {
            session: DragSession::Idle,
            precision,
        }
    }

    pub fn session(&self) -> &DragSession {
        &self.session
    }

    pub fn is_active(&self) -> bool {
        !self.session.is_idle()
    }

    /// Start a gesture at a normalized position.
    ///
    /// `selected` is the field chosen in the host UI; it becomes the creation
    /// target when no box is under the pointer.
    pub fn pointer_down(
        &mut self,
        registry: &FieldRegistry,
        pos: Point,
        selected: Option<FieldId>,
        thresholds: &Thresholds,
    ) -> GestureOutcome {
        let pos = pos.clamp_unit();
        if let Some(field) = self.session.field() {
            warn!(field = field.index(), "pointer down during an active gesture, abandoning it");
            self.session = DragSession::Idle;
        }

        let next = match hit_test(registry, pos, thresholds) {
            Some(Hit { field, region }) => match registry.box_of(field) {
                Some(origin) => match region {
                    HitRegion::Body => DragSession::Moving {
                        field,
                        origin,
                        anchor: pos,
                    },
                    HitRegion::Handle(handle) => DragSession::Resizing {
                        field,
                        origin,
                        anchor: pos,
                        handle,
                    },
                },
                None => DragSession::Idle,
            },
            None => match selected {
                Some(field) => DragSession::Creating {
                    field,
                    anchor: pos,
                    current: pos,
                },
                None => DragSession::Idle,
            },
        };

        self.session = next;
        match (self.session.field(), self.session.mode()) {
            (Some(field), Some(mode)) => {
                debug!(field = field.index(), %mode, x = pos.x, y = pos.y, "gesture started");
                GestureOutcome::Started { field, mode }
            }
            _ => GestureOutcome::Ignored,
        }
    }

    /// Track the pointer; moves and resizes write through to the registry
    pub fn pointer_move(
        &mut self,
        registry: &mut FieldRegistry,
        pos: Point,
        thresholds: &Thresholds,
    ) -> GestureOutcome {
        let pos = pos.clamp_unit();
        match self.session.clone() {
            DragSession::Idle => GestureOutcome::Ignored,
            DragSession::Creating { field, anchor, .. } => {
                self.session = DragSession::Creating {
                    field,
                    anchor,
                    current: pos,
                };
                GestureOutcome::Preview {
                    field,
                    rect: FieldBox::spanning(anchor, pos),
                }
            }
            DragSession::Moving {
                field,
                origin,
                anchor,
            } => {
                let rect = origin
                    .translated_within(pos.x - anchor.x, pos.y - anchor.y)
                    .rounded(self.precision);
                registry.place(field, rect);
                GestureOutcome::Updated { field, rect }
            }
            DragSession::Resizing {
                field,
                origin,
                anchor,
                handle,
            } => {
                let rect = resize(&origin, handle, pos.x - anchor.x, pos.y - anchor.y, thresholds)
                    .rounded(self.precision);
                registry.place(field, rect);
                GestureOutcome::Updated { field, rect }
            }
        }
    }

    /// Finish the gesture at `pos`, committing a created box if it is large enough
    pub fn pointer_up(
        &mut self,
        registry: &mut FieldRegistry,
        pos: Point,
        thresholds: &Thresholds,
    ) -> GestureOutcome {
        if self.session.is_idle() {
            debug!("pointer up without a gesture, ignoring");
            return GestureOutcome::Ignored;
        }

        let last = self.pointer_move(registry, pos, thresholds);
        let session = std::mem::take(&mut self.session);
        match (session, last) {
            (DragSession::Creating { field, .. }, GestureOutcome::Preview { rect, .. }) => {
                match rect.filter(|r| r.w() > thresholds.min_width && r.h() > thresholds.min_height) {
                    Some(rect) => {
                        let rect = rect.rounded(self.precision);
                        registry.place(field, rect);
                        info!(field = field.index(), x = rect.x(), y = rect.y(), w = rect.w(), h = rect.h(), "box created");
                        GestureOutcome::Committed { field, rect }
                    }
                    None => {
                        debug!(field = field.index(), "creation below minimum size, discarded");
                        GestureOutcome::Discarded {
                            field,
                            reason: DiscardReason::TooSmall,
                        }
                    }
                }
            }
            (_, GestureOutcome::Updated { field, rect }) => {
                debug!(field = field.index(), "gesture finished");
                GestureOutcome::Finished { field, rect }
            }
            _ => GestureOutcome::Ignored,
        }
    }

    /// Drop the current gesture, e.g. on lost pointer capture.
    ///
    /// Moves and resizes keep their last written box; a creation is discarded.
    pub fn cancel(&mut self, registry: &FieldRegistry) -> GestureOutcome {
        match std::mem::take(&mut self.session) {
            DragSession::Idle => GestureOutcome::Ignored,
            DragSession::Creating { field, .. } => {
                debug!(field = field.index(), "creation cancelled");
                GestureOutcome::Discarded {
                    field,
                    reason: DiscardReason::Cancelled,
                }
            }
            DragSession::Moving { field, origin, .. }
            | DragSession::Resizing { field, origin, .. } => {
                let rect = registry.box_of(field).unwrap_or(origin);
                debug!(field = field.index(), "gesture cancelled, keeping last box");
                GestureOutcome::Finished { field, rect }
            }
        }
    }

    /// The rectangle being drawn by a creation gesture
    pub fn preview(&self) -> Option<(FieldId, FieldBox)> {
        match &self.session {
            DragSession::Creating {
                field,
                anchor,
                current,
            } => FieldBox::spanning(*anchor, *current).map(|rect| (*field, rect)),
            _ => None,
        }
    }
}

/// Move the edges named by `handle` by the pointer delta.
///
/// Each moving edge is clamped to the unit square and kept at least the
/// minimum size away from its fixed opposite edge.
pub fn resize(origin: &FieldBox, handle: Handle, dx: f64, dy: f64, thresholds: &Thresholds) -> FieldBox {
    let (mut left, mut top, mut right, mut bottom) =
        (origin.x(), origin.y(), origin.right(), origin.bottom());

    if handle.moves_left() {
        left = (left + dx).min(right - thresholds.min_width).max(0.0);
    }
    if handle.moves_right() {
        right = (right + dx).max(left + thresholds.min_width).min(1.0);
    }
    if handle.moves_top() {
        top = (top + dy).min(bottom - thresholds.min_height).max(0.0);
    }
    if handle.moves_bottom() {
        bottom = (bottom + dy).max(top + thresholds.min_height).min(1.0);
    }

    FieldBox::from_edges(left, top, right, bottom).unwrap_or(*origin)
}

//! Page Layout Editor - place named field boxes on a rendered page
//!
//! This library provides the box-layout engine behind a template editor:
//! each field of a document template gets a rectangle on the page, drawn,
//! moved and resized with the pointer, and stored in coordinates normalized
//! to the page so the layout does not depend on the render resolution.
//!
//! # Example
//!
//! ```rust
//! use page_layout_editor::{Editor, EditorSettings, FittedPage, GestureOutcome, Point, Size};
//!
//! let mut editor = Editor::new(EditorSettings::default(), FittedPage::a4(Size::new(1200.0, 1000.0)));
//! editor.select("intitule").unwrap();
//!
//! let frame = editor.frame();
//! editor.pointer_down(frame.to_viewport(Point::new(0.2, 0.2)));
//! let up = editor.pointer_up(frame.to_viewport(Point::new(0.4, 0.3)));
//!
//! assert!(matches!(up, GestureOutcome::Committed { .. }));
//! ```

pub mod catalog;
pub mod debounce;
pub mod editor;
pub mod error;
pub mod layout;
pub mod page;
pub mod persist;
pub mod renderer;
pub mod script;

pub use catalog::{CatalogError, EditorSettings};
pub use debounce::ResizeDebouncer;
pub use editor::Editor;
pub use error::{EditorError, ScriptError};
pub use layout::{
    DragMode, EngineConfig, FieldBox, FieldCatalog, FieldId, FieldRegistry, GestureOutcome,
    ImageFrame, Layout, LayoutError, Point, Size,
};
pub use page::{FitPolicy, FittedPage, PageRenderer, StaticFrame};
pub use persist::{LoadDiagnostic, LoadReport, PersistError};
pub use renderer::{render_overlay, OverlayConfig};

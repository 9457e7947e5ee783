//! Replay a gesture script through an [`Editor`]
//!
//! Time is simulated: it starts when the replay starts and only moves on
//! `wait`, so debounced resizes behave the same on every run.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::editor::Editor;
use crate::error::EditorError;
use crate::layout::{DiscardReason, FieldBox, FieldCatalog, GestureOutcome};
use crate::page::PageRenderer;

use super::ast::{Command, Script};
use super::parser::parse;

/// Parse `source` and replay it, returning one transcript line per command
pub fn run<R: PageRenderer>(editor: &mut Editor<R>, source: &str) -> Result<Vec<String>, EditorError> {
    let script = parse(source)?;
    replay(editor, &script, source)
}

/// Replay a parsed script. `source` is only used to number lines in errors.
pub fn replay<R: PageRenderer>(
    editor: &mut Editor<R>,
    script: &Script,
    source: &str,
) -> Result<Vec<String>, EditorError> {
    let start = Instant::now();
    let mut elapsed = Duration::ZERO;
    let mut transcript = Vec::with_capacity(script.commands.len());

    for spanned in &script.commands {
        let now = start + elapsed;
        let detail = match &spanned.node {
            Command::Select(name) => match editor.select(name) {
                Ok(id) => editor.registry().catalog().field(id).id.clone(),
                Err(source_err) => {
                    return Err(EditorError::Replay {
                        line: line_of(source, spanned.span.start),
                        source: source_err,
                    })
                }
            },
            Command::Down(pos) => {
                let outcome = editor.pointer_down(*pos);
                describe(editor.registry().catalog(), &outcome)
            }
            Command::Move(pos) => {
                let outcome = editor.pointer_move(*pos);
                describe(editor.registry().catalog(), &outcome)
            }
            Command::Up(pos) => {
                let outcome = editor.pointer_up(*pos);
                describe(editor.registry().catalog(), &outcome)
            }
            Command::Cancel => {
                let outcome = editor.cancel();
                describe(editor.registry().catalog(), &outcome)
            }
            Command::Resize(size) => {
                editor.viewport_resized(*size, now);
                format!("{}x{} pending", size.width, size.height)
            }
            Command::Wait(ms) => {
                elapsed += Duration::from_millis(*ms);
                if editor.poll(start + elapsed) {
                    let image = editor.frame().size;
                    format!("page re-rendered at {}x{}", image.width, image.height)
                } else {
                    "idle".to_string()
                }
            }
        };
        debug!(command = spanned.node.keyword(), %detail, "replayed");
        transcript.push(format!("{}: {}", spanned.node.keyword(), detail));
    }

    Ok(transcript)
}

fn describe(catalog: &FieldCatalog, outcome: &GestureOutcome) -> String {
    let field = match outcome {
        GestureOutcome::Ignored => return "ignored".to_string(),
        GestureOutcome::Started { field, .. }
        | GestureOutcome::Preview { field, .. }
        | GestureOutcome::Updated { field, .. }
        | GestureOutcome::Committed { field, .. }
        | GestureOutcome::Finished { field, .. }
        | GestureOutcome::Discarded { field, .. } => *field,
    };
    let id = &catalog.field(field).id;

    match outcome {
        GestureOutcome::Ignored => "ignored".to_string(),
        GestureOutcome::Started { mode, .. } => format!("{} {}", mode, id),
        GestureOutcome::Preview { rect: Some(rect), .. } => format!("{} preview {}", id, format_box(rect)),
        GestureOutcome::Preview { rect: None, .. } => format!("{} preview empty", id),
        GestureOutcome::Updated { rect, .. } => format!("{} at {}", id, format_box(rect)),
        GestureOutcome::Committed { rect, .. } | GestureOutcome::Finished { rect, .. } => {
            format!("{} -> {}", id, format_box(rect))
        }
        GestureOutcome::Discarded { reason: DiscardReason::TooSmall, .. } => {
            format!("{} discarded (too small)", id)
        }
        GestureOutcome::Discarded { reason: DiscardReason::Cancelled, .. } => {
            format!("{} discarded (cancelled)", id)
        }
    }
}

fn format_box(rect: &FieldBox) -> String {
    format!("({}, {}, {}, {})", rect.x(), rect.y(), rect.w(), rect.h())
}

/// 1-based line number of a byte offset
fn line_of(source: &str, offset: usize) -> usize {
    source[..offset.min(source.len())].matches('\n').count() + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::EditorSettings;
    use crate::layout::{ImageFrame, Point, Size};
    use crate::page::{FittedPage, StaticFrame};

    fn editor() -> Editor<StaticFrame> {
        let frame = ImageFrame::new(Point::new(100.0, 50.0), Size::new(1000.0, 800.0));
        Editor::new(EditorSettings::default(), StaticFrame(frame))
    }

    #[test]
    fn test_replay_create() {
        let mut editor = editor();
        let transcript = run(
            &mut editor,
            "select intitule\ndown 300 210\nmove 500 290\nup 500 290\n",
        )
        .unwrap();
        assert_eq!(transcript.len(), 4);
        assert_eq!(transcript[0], "select: intitule");
        assert_eq!(transcript[1], "down: create intitule");
        assert!(transcript[2].starts_with("move: intitule preview (0.2, 0.2, 0.2, "));
        assert_eq!(transcript[3], "up: intitule -> (0.2, 0.2, 0.2, 0.1)");
    }

    #[test]
    fn test_replay_select_by_label() {
        let mut editor = editor();
        let transcript = run(&mut editor, "select \"Nom du surveillant\"").unwrap();
        assert_eq!(transcript, vec!["select: nom_surveillant"]);
    }

    #[test]
    fn test_replay_unknown_field_reports_line() {
        let mut editor = editor();
        let err = run(&mut editor, "# setup\nselect datee\n").unwrap_err();
        match err {
            EditorError::Replay { line, source } => {
                assert_eq!(line, 2);
                assert_eq!(source.suggestions(), Some(&["date".to_string()][..]));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_replay_syntax_error() {
        let mut editor = editor();
        assert!(matches!(
            run(&mut editor, "down 1"),
            Err(EditorError::Script(_))
        ));
    }

    #[test]
    fn test_replay_debounced_resize() {
        let mut editor = Editor::new(EditorSettings::default(), FittedPage::a4(Size::new(1200.0, 1000.0)));
        let transcript = run(
            &mut editor,
            "resize 1300 1000\nwait 100\nresize 1400 1100\nwait 100\nwait 50\n",
        )
        .unwrap();
        assert_eq!(transcript[1], "wait: idle");
        assert_eq!(transcript[3], "wait: idle");
        assert!(transcript[4].starts_with("wait: page re-rendered at"));
        assert_eq!(editor.renderer().render_count(), 2);
    }

    #[test]
    fn test_line_of() {
        assert_eq!(line_of("a\nb\nc", 0), 1);
        assert_eq!(line_of("a\nb\nc", 4), 3);
    }
}

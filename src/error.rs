//! Error types for gesture scripts and the editor as a whole

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

use crate::catalog::CatalogError;
use crate::layout::LayoutError;
use crate::persist::PersistError;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScriptError {
    #[error("Syntax error at {span:?}: {message}")]
    Syntax {
        span: Span,
        message: String,
        expected: Vec<String>,
    },
}

impl ScriptError {
    pub fn syntax(span: Span, message: impl Into<String>, expected: &[&str]) -> Self {
        ScriptError::Syntax {
            span,
            message: message.into(),
            expected: expected.iter().map(|e| e.to_string()).collect(),
        }
    }

    pub fn span(&self) -> &Span {
        match self {
            ScriptError::Syntax { span, .. } => span,
        }
    }

    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        let mut buf = Vec::new();
        match self {
            ScriptError::Syntax {
                span,
                message,
                expected,
            } => {
                let expected_str = if expected.is_empty() {
                    String::new()
                } else {
                    format!("\nExpected: {}", expected.join(", "))
                };

                let _ = Report::build(ReportKind::Error, filename, span.start)
                    .with_message(message)
                    .with_label(
                        Label::new((filename, span.clone()))
                            .with_message(format!("{}{}", message, expected_str))
                            .with_color(Color::Red),
                    )
                    .finish()
                    .write((filename, Source::from(source)), &mut buf);
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }
}

/// Any error the editor can surface to its host
#[derive(Debug, Error)]
pub enum EditorError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("settings error: {0}")]
    Settings(#[from] CatalogError),

    #[error("layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("persistence error: {0}")]
    Persist(#[from] PersistError),

    #[error("script errors: {}", format_script_errors(.0))]
    Script(Vec<ScriptError>),

    #[error("script line {line}: {source}")]
    Replay { line: usize, source: LayoutError },
}

impl From<Vec<ScriptError>> for EditorError {
    fn from(errors: Vec<ScriptError>) -> Self {
        EditorError::Script(errors)
    }
}

fn format_script_errors(errors: &[ScriptError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

//! Error types for the box-layout engine

use thiserror::Error;

/// Errors raised while building the field catalog or resolving field names
#[derive(Debug, Error)]
pub enum LayoutError {
    /// A field id or label that is not in the catalog
    #[error("unknown field '{name}'{}", format_suggestions(.suggestions))]
    UnknownField {
        name: String,
        suggestions: Vec<String>,
    },

    /// Two catalog entries share an id
    #[error("duplicate field id '{id}'")]
    DuplicateField { id: String },

    /// A catalog entry with an empty id
    #[error("field #{position} has an empty id")]
    EmptyFieldId { position: usize },

    /// A catalog with no fields at all
    #[error("the field catalog is empty")]
    EmptyCatalog,
}

impl LayoutError {
    /// Create an unknown field error with suggestions
    pub fn unknown(name: impl Into<String>, suggestions: Vec<String>) -> Self {
        Self::UnknownField {
            name: name.into(),
            suggestions,
        }
    }

    /// Get suggestions if available
    pub fn suggestions(&self) -> Option<&[String]> {
        match self {
            Self::UnknownField { suggestions, .. } => Some(suggestions),
            _ => None,
        }
    }
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else {
        format!(" (did you mean: {}?)", suggestions.join(", "))
    }
}

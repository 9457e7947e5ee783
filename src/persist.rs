//! Layout persistence
//!
//! A layout file is a TOML document with one table per field id:
//!
//! ```toml
//! [intitule]
//! x_percent = 0.096072
//! y_percent = 0.231688
//! w_percent = 0.356178
//! h_percent = 0.017649
//! ```
//!
//! Unset fields are written with the `-1.0` sentinel rather than omitted.
//! Loading is best effort: unknown ids, malformed values and legacy
//! point-only records are reported as [`LoadDiagnostic`]s instead of
//! aborting the load.

use std::fmt;
use std::path::Path;

use thiserror::Error;
use toml::{Table, Value};
use tracing::{info, warn};

use crate::layout::{EngineConfig, FieldBox, FieldCatalog, Layout};

/// Wire value for an unset scalar
pub const UNSET_SENTINEL: f64 = -1.0;

pub const KEY_X: &str = "x_percent";
pub const KEY_Y: &str = "y_percent";
pub const KEY_W: &str = "w_percent";
pub const KEY_H: &str = "h_percent";

/// Errors that can occur when reading or writing layout files
#[derive(Error, Debug)]
pub enum PersistError {
    #[error("Failed to access layout file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse layout TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Failed to serialize layout: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Something noteworthy found while loading a layout
#[derive(Debug, Clone, PartialEq)]
pub enum LoadDiagnostic {
    /// The document could not be read or parsed at all
    Unreadable { reason: String },
    /// An id in the document that is not in the catalog
    UnknownField { id: String },
    /// A catalog field with no entry in the document
    MissingField { id: String },
    /// A field entry that is not a table
    NotATable { id: String },
    /// A scalar that is not a number in `[0, 1]` or the sentinel
    MalformedValue { id: String, key: &'static str },
    /// A record with one coordinate but not the other
    MissingValue { id: String, key: &'static str },
    /// A point-only record given the default size
    LegacyUpgraded { id: String },
    /// A box sticking out of the image, clamped back inside
    Clamped { id: String },
}

impl fmt::Display for LoadDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unreadable { reason } => write!(f, "layout unreadable: {}", reason),
            Self::UnknownField { id } => write!(f, "'{}' is not a known field, ignored", id),
            Self::MissingField { id } => write!(f, "'{}' missing from layout, left unset", id),
            Self::NotATable { id } => write!(f, "'{}' is not a table, left unset", id),
            Self::MalformedValue { id, key } => {
                write!(f, "'{}'.{} is malformed, treated as unset", id, key)
            }
            Self::MissingValue { id, key } => {
                write!(f, "'{}'.{} is missing, record left unset", id, key)
            }
            Self::LegacyUpgraded { id } => {
                write!(f, "'{}' has a position but no size, default size applied", id)
            }
            Self::Clamped { id } => write!(f, "'{}' extends past the page, clamped", id),
        }
    }
}

/// Result of a best-effort layout load
#[derive(Debug, Clone, PartialEq)]
pub struct LoadReport {
    pub layout: Layout,
    pub diagnostics: Vec<LoadDiagnostic>,
}

impl LoadReport {
    /// An all-unset layout explaining why nothing was loaded
    pub fn unreadable(catalog: &FieldCatalog, reason: impl Into<String>) -> Self {
        Self {
            layout: Layout::unset(catalog),
            diagnostics: vec![LoadDiagnostic::Unreadable {
                reason: reason.into(),
            }],
        }
    }

    /// True when the document loaded without any diagnostic
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Ids of fields upgraded from the legacy point-only format
    pub fn legacy_upgrades(&self) -> impl Iterator<Item = &str> + '_ {
        self.diagnostics.iter().filter_map(|d| match d {
            LoadDiagnostic::LegacyUpgraded { id } => Some(id.as_str()),
            _ => None,
        })
    }
}

/// Serialize a layout to a TOML document, one table per field in catalog order
pub fn serialize(layout: &Layout, catalog: &FieldCatalog) -> Result<String, PersistError> {
    let mut doc = Table::new();
    for (id, field) in catalog.iter() {
        let scalars = match layout.get(id) {
            Some(rect) => [rect.x(), rect.y(), rect.w(), rect.h()],
            None => [UNSET_SENTINEL; 4],
        };
        let mut record = Table::new();
        for (key, value) in [KEY_X, KEY_Y, KEY_W, KEY_H].into_iter().zip(scalars) {
            record.insert(key.to_string(), Value::Float(value));
        }
        doc.insert(field.id.clone(), Value::Table(record));
    }
    Ok(toml::to_string(&doc)?)
}

/// Deserialize a TOML document against a catalog.
///
/// Only a document that is not valid TOML is an error; everything else is
/// recovered field by field and reported in the [`LoadReport`].
pub fn deserialize(
    document: &str,
    catalog: &FieldCatalog,
    config: &EngineConfig,
) -> Result<LoadReport, PersistError> {
    let doc: Table = toml::from_str(document)?;
    let mut layout = Layout::unset(catalog);
    let mut diagnostics = Vec::new();

    for key in doc.keys() {
        if catalog.lookup(key).is_none() {
            diagnostics.push(LoadDiagnostic::UnknownField { id: key.clone() });
        }
    }

    for (id, field) in catalog.iter() {
        let Some(entry) = doc.get(&field.id) else {
            diagnostics.push(LoadDiagnostic::MissingField {
                id: field.id.clone(),
            });
            continue;
        };
        let Some(record) = entry.as_table() else {
            diagnostics.push(LoadDiagnostic::NotATable {
                id: field.id.clone(),
            });
            continue;
        };
        if let Some(rect) = decode_record(&field.id, record, config, &mut diagnostics) {
            layout.set(id, rect.rounded(config.precision));
        }
    }

    Ok(LoadReport {
        layout,
        diagnostics,
    })
}

/// Load a layout file; never fails, falling back to an all-unset layout
pub fn load_file(path: &Path, catalog: &FieldCatalog, config: &EngineConfig) -> LoadReport {
    let report = std::fs::read_to_string(path)
        .map_err(PersistError::from)
        .and_then(|content| deserialize(&content, catalog, config));

    match report {
        Ok(report) => {
            info!(
                path = %path.display(),
                placed = report.layout.placed_count(),
                diagnostics = report.diagnostics.len(),
                "layout loaded"
            );
            for diagnostic in &report.diagnostics {
                warn!(path = %path.display(), "{}", diagnostic);
            }
            report
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "layout not loaded");
            LoadReport::unreadable(catalog, err.to_string())
        }
    }
}

/// Write a layout file
pub fn save_file(path: &Path, layout: &Layout, catalog: &FieldCatalog) -> Result<(), PersistError> {
    let content = serialize(layout, catalog)?;
    std::fs::write(path, content)?;
    info!(path = %path.display(), placed = layout.placed_count(), "layout saved");
    Ok(())
}

/// One scalar of a record, classified
#[derive(Debug, Clone, Copy, PartialEq)]
enum Scalar {
    Missing,
    Unset,
    Value(f64),
    Malformed,
}

impl Scalar {
    fn read(record: &Table, key: &str) -> Self {
        let number = match record.get(key) {
            None => return Scalar::Missing,
            Some(Value::Float(f)) => *f,
            Some(Value::Integer(i)) => *i as f64,
            Some(_) => return Scalar::Malformed,
        };
        if !number.is_finite() {
            Scalar::Malformed
        } else if number < 0.0 {
            Scalar::Unset
        } else if number <= 1.0 {
            Scalar::Value(number)
        } else {
            Scalar::Malformed
        }
    }

    fn value(self) -> Option<f64> {
        match self {
            Scalar::Value(v) => Some(v),
            _ => None,
        }
    }
}

fn decode_record(
    id: &str,
    record: &Table,
    config: &EngineConfig,
    diagnostics: &mut Vec<LoadDiagnostic>,
) -> Option<FieldBox> {
    let scalars = [KEY_X, KEY_Y, KEY_W, KEY_H].map(|key| (key, Scalar::read(record, key)));
    for (key, scalar) in scalars {
        if scalar == Scalar::Malformed {
            diagnostics.push(LoadDiagnostic::MalformedValue {
                id: id.to_string(),
                key,
            });
        }
    }

    let [x, y, w, h] = scalars.map(|(_, scalar)| scalar.value());
    let (x, y) = match (x, y) {
        (Some(x), Some(y)) => (x, y),
        (Some(_), None) | (None, Some(_)) => {
            let (key, scalar) = if x.is_none() { scalars[0] } else { scalars[1] };
            if scalar != Scalar::Malformed {
                diagnostics.push(LoadDiagnostic::MissingValue {
                    id: id.to_string(),
                    key,
                });
            }
            return None;
        }
        (None, None) => return None,
    };

    let (Some(w), Some(h)) = (w, h) else {
        let (w, h) = config.legacy_box_size;
        let upgraded = FieldBox::new(x.min(1.0 - w).max(0.0), y.min(1.0 - h).max(0.0), w, h);
        diagnostics.push(match upgraded {
            Some(_) => LoadDiagnostic::LegacyUpgraded { id: id.to_string() },
            None => LoadDiagnostic::MalformedValue {
                id: id.to_string(),
                key: if w > 0.0 && w <= 1.0 { KEY_H } else { KEY_W },
            },
        });
        return upgraded;
    };

    if let Some(rect) = FieldBox::new(x, y, w, h) {
        return Some(rect);
    }

    let clamped = FieldBox::from_edges(x, y, (x + w).min(1.0), (y + h).min(1.0));
    diagnostics.push(match clamped {
        Some(_) => LoadDiagnostic::Clamped { id: id.to_string() },
        None => LoadDiagnostic::MalformedValue {
            id: id.to_string(),
            key: if w == 0.0 { KEY_W } else { KEY_H },
        },
    });
    clamped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Field;

    fn catalog() -> FieldCatalog {
        FieldCatalog::new(vec![
            Field::new("intitule", "Intitulé", "Initiation"),
            Field::new("date", "Date", "18/02/2025"),
        ])
        .unwrap()
    }

    fn load(doc: &str) -> LoadReport {
        deserialize(doc, &catalog(), &EngineConfig::default()).expect("valid TOML")
    }

    #[test]
    fn test_serialize_emits_sentinels_for_unset() {
        let catalog = catalog();
        let layout = Layout::unset(&catalog);
        let out = serialize(&layout, &catalog).unwrap();
        assert!(out.contains("[intitule]"));
        assert!(out.contains("[date]"));
        assert_eq!(out.matches("-1.0").count(), 8);
    }

    #[test]
    fn test_serialize_keeps_catalog_order() {
        let catalog = catalog();
        let out = serialize(&Layout::unset(&catalog), &catalog).unwrap();
        let first = out.find("[intitule]").unwrap();
        let second = out.find("[date]").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_full_record() {
        let report = load(
            r#"
[date]
x_percent = 0.891174
y_percent = 0.301675
w_percent = 0.067275
h_percent = 0.02
"#,
        );
        let id = catalog().lookup("date").unwrap();
        let rect = report.layout.get(id).unwrap();
        assert_eq!(rect.x(), 0.891174);
        assert_eq!(rect.h(), 0.02);
        assert_eq!(
            report.diagnostics,
            vec![LoadDiagnostic::MissingField {
                id: "intitule".into()
            }]
        );
    }

    #[test]
    fn test_legacy_record_gets_default_size() {
        let report = load(
            r#"
[intitule]
x_percent = 0.1
y_percent = 0.2
w_percent = -1.0
h_percent = -1.0
"#,
        );
        let id = catalog().lookup("intitule").unwrap();
        let rect = report.layout.get(id).unwrap();
        assert_eq!((rect.x(), rect.y()), (0.1, 0.2));
        assert_eq!((rect.w(), rect.h()), (0.05, 0.02));
        assert_eq!(report.legacy_upgrades().collect::<Vec<_>>(), vec!["intitule"]);
    }

    #[test]
    fn test_legacy_record_without_size_keys() {
        let report = load("[intitule]\nx_percent = 0.99\ny_percent = 0.5\n");
        let id = catalog().lookup("intitule").unwrap();
        let rect = report.layout.get(id).unwrap();
        assert!((rect.right() - 1.0).abs() < 1e-9);
        assert_eq!(rect.w(), 0.05);
    }

    #[test]
    fn test_unset_record_stays_unset() {
        let report = load(
            "[date]\nx_percent = -1.0\ny_percent = -1.0\nw_percent = -1.0\nh_percent = -1.0\n",
        );
        assert_eq!(report.layout.placed_count(), 0);
        assert_eq!(report.legacy_upgrades().count(), 0);
    }

    #[test]
    fn test_malformed_values_are_unset() {
        let report = load(
            r#"
[date]
x_percent = "left"
y_percent = 0.5
w_percent = 0.1
h_percent = 0.1

[intitule]
x_percent = 3.5
y_percent = 0.5
w_percent = 0.1
h_percent = 0.1
"#,
        );
        assert_eq!(report.layout.placed_count(), 0);
        assert!(report.diagnostics.contains(&LoadDiagnostic::MalformedValue {
            id: "date".into(),
            key: KEY_X
        }));
        assert!(report.diagnostics.contains(&LoadDiagnostic::MalformedValue {
            id: "intitule".into(),
            key: KEY_X
        }));
    }

    #[test]
    fn test_integer_scalars_accepted() {
        let report = load("[date]\nx_percent = 0\ny_percent = 0\nw_percent = 1\nh_percent = 1\n");
        let id = catalog().lookup("date").unwrap();
        assert_eq!(report.layout.get(id), FieldBox::new(0.0, 0.0, 1.0, 1.0));
    }

    #[test]
    fn test_overflowing_box_is_clamped() {
        let report = load("[date]\nx_percent = 0.9\ny_percent = 0.5\nw_percent = 0.2\nh_percent = 0.1\n");
        let id = catalog().lookup("date").unwrap();
        let rect = report.layout.get(id).unwrap();
        assert!((rect.w() - 0.1).abs() < 1e-9);
        assert!(report.diagnostics.contains(&LoadDiagnostic::Clamped { id: "date".into() }));
    }

    #[test]
    fn test_record_with_one_coordinate_is_reported() {
        let report = load("[date]\nx_percent = 0.4\nw_percent = 0.1\nh_percent = 0.1\n");
        assert_eq!(report.layout.placed_count(), 0);
        assert!(!report.is_clean());
        assert!(report.diagnostics.contains(&LoadDiagnostic::MissingValue {
            id: "date".into(),
            key: KEY_Y
        }));

        let report = load("[date]\nx_percent = -1.0\ny_percent = 0.3\n");
        assert!(report.diagnostics.contains(&LoadDiagnostic::MissingValue {
            id: "date".into(),
            key: KEY_X
        }));
        assert_eq!(report.legacy_upgrades().count(), 0);
    }

    #[test]
    fn test_malformed_coordinate_is_not_also_missing() {
        let report = load("[date]\nx_percent = \"left\"\ny_percent = 0.3\n");
        let date_diagnostics: Vec<_> = report
            .diagnostics
            .iter()
            .filter(|d| !matches!(d, LoadDiagnostic::MissingField { .. }))
            .collect();
        assert_eq!(
            date_diagnostics,
            vec![&LoadDiagnostic::MalformedValue {
                id: "date".into(),
                key: KEY_X
            }]
        );
    }

    #[test]
    fn test_unusable_legacy_size_is_not_reported_as_upgraded() {
        let config = EngineConfig::default().with_legacy_box_size(1.5, 0.02);
        let report = deserialize("[intitule]\nx_percent = 0.1\ny_percent = 0.2\n", &catalog(), &config)
            .unwrap();
        assert_eq!(report.layout.placed_count(), 0);
        assert_eq!(report.legacy_upgrades().count(), 0);
        assert!(report.diagnostics.contains(&LoadDiagnostic::MalformedValue {
            id: "intitule".into(),
            key: KEY_W
        }));
    }

    #[test]
    fn test_unknown_ids_ignored() {
        let report = load("[signature_col_morning1]\nx_percent = 0.2\ny_percent = 0.5\n");
        assert_eq!(report.layout.placed_count(), 0);
        assert!(report.diagnostics.contains(&LoadDiagnostic::UnknownField {
            id: "signature_col_morning1".into()
        }));
    }

    #[test]
    fn test_non_table_entry() {
        let report = load("date = 0.5\n");
        assert!(report.diagnostics.contains(&LoadDiagnostic::NotATable { id: "date".into() }));
    }

    #[test]
    fn test_invalid_toml_error() {
        let result = deserialize("this is not valid toml {{{{", &catalog(), &EngineConfig::default());
        assert!(matches!(result, Err(PersistError::Parse(_))));
    }

    #[test]
    fn test_load_missing_file_degrades() {
        let catalog = catalog();
        let report = load_file(
            Path::new("/nonexistent/dir/layout.toml"),
            &catalog,
            &EngineConfig::default(),
        );
        assert_eq!(report.layout, Layout::unset(&catalog));
        assert!(matches!(
            report.diagnostics.as_slice(),
            [LoadDiagnostic::Unreadable { .. }]
        ));
    }

    #[test]
    fn test_diagnostic_display() {
        let d = LoadDiagnostic::LegacyUpgraded { id: "date".into() };
        assert!(d.to_string().contains("default size"));
    }
}

//! Editor settings: the field catalog and engine tuning, loaded from TOML
//!
//! ```toml
//! [engine]
//! hit_tolerance_px = 8
//! resize_debounce_ms = 200
//!
//! [[fields]]
//! id = "intitule"
//! label = "Intitulé"
//! preview_text = "Initiation à la cybersécurité"
//! ```
//!
//! Every key is optional. A file without `[[fields]]` keeps the built-in
//! attendance-sheet catalog.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::layout::{EngineConfig, Field, FieldCatalog, LayoutError};

/// Errors that can occur when loading or parsing editor settings
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read settings file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse settings TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Invalid field catalog: {0}")]
    InvalidCatalog(#[from] LayoutError),
    #[error("Invalid engine setting '{key}' = {value}: {expected}")]
    InvalidEngine {
        key: &'static str,
        value: f64,
        expected: &'static str,
    },
}

/// Most decimals a layout value can be rounded to without overflowing
const MAX_PRECISION: u32 = 15;

/// Everything the editor needs at startup
#[derive(Debug, Clone)]
pub struct EditorSettings {
    pub engine: EngineConfig,
    pub catalog: FieldCatalog,
}

/// TOML structure for deserializing settings
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlSettings {
    engine: Option<TomlEngine>,
    #[serde(default)]
    fields: Vec<TomlField>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlEngine {
    hit_tolerance_px: Option<f64>,
    min_box_px: Option<f64>,
    legacy_box_width: Option<f64>,
    legacy_box_height: Option<f64>,
    resize_debounce_ms: Option<u64>,
    precision: Option<u32>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlField {
    id: String,
    label: Option<String>,
    #[serde(default)]
    preview_text: String,
}

/// Built-in catalog: the fields of the attendance sheet template
const DEFAULT_SETTINGS: &str = r#"
[[fields]]
id = "theme_origin"
label = "Theme/Origin"
preview_text = "Atelier Sécurité"

[[fields]]
id = "intitule"
label = "Intitulé"
preview_text = "Initiation à la cybersécurité"

[[fields]]
id = "fonds_concerne"
label = "Fonds concerné"
preview_text = "FSE+ Région Sud"

[[fields]]
id = "commentaire"
label = "Commentaire"
preview_text = "Présence obligatoire.\nMerci de signer."

[[fields]]
id = "duree_heures"
label = "Durée (heures)"
preview_text = "3"

[[fields]]
id = "duree_jours"
label = "Durée (jours)"
preview_text = "1"

[[fields]]
id = "matin_h1"
label = "Matin: Part 1 (heure)"
preview_text = "09"

[[fields]]
id = "matin_m1"
label = "Matin: Part 1 (minute)"
preview_text = "00"

[[fields]]
id = "matin_h2"
label = "Matin: Part 2 (heure)"
preview_text = "12"

[[fields]]
id = "matin_m2"
label = "Matin: Part 2 (minute)"
preview_text = "00"

[[fields]]
id = "aprem_h1"
label = "Aprem: Part 1 (heure)"
preview_text = "14"

[[fields]]
id = "aprem_m1"
label = "Aprem: Part 1 (minute)"
preview_text = "00"

[[fields]]
id = "aprem_h2"
label = "Aprem: Part 2 (heure)"
preview_text = "17"

[[fields]]
id = "aprem_m2"
label = "Aprem: Part 2 (minute)"
preview_text = "00"

[[fields]]
id = "premier_nom_etudiant"
label = "Premier nom d'Etudiant"
preview_text = "DURAND Bob"

[[fields]]
id = "nom_surveillant"
label = "Nom du surveillant"
preview_text = "DUPONT Jean"

[[fields]]
id = "pagination"
label = "Pagination"
preview_text = "1/2"

[[fields]]
id = "date"
label = "Date"
preview_text = "18/02/2025"
"#;

impl EditorSettings {
    /// Load settings from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load settings from a TOML string
    pub fn from_str(content: &str) -> Result<Self, CatalogError> {
        let parsed: TomlSettings = toml::from_str(content)?;

        let mut engine = EngineConfig::default();
        if let Some(overrides) = parsed.engine {
            overrides.apply(&mut engine);
            check_engine(&engine)?;
        }

        let catalog = if parsed.fields.is_empty() {
            Self::default_catalog()?
        } else {
            FieldCatalog::new(parsed.fields.into_iter().map(TomlField::into_field).collect())?
        };

        Ok(Self { engine, catalog })
    }

    fn default_catalog() -> Result<FieldCatalog, CatalogError> {
        let parsed: TomlSettings = toml::from_str(DEFAULT_SETTINGS)?;
        Ok(FieldCatalog::new(
            parsed.fields.into_iter().map(TomlField::into_field).collect(),
        )?)
    }
}

impl TomlEngine {
    fn apply(self, engine: &mut EngineConfig) {
        if let Some(px) = self.hit_tolerance_px {
            engine.hit_tolerance_px = px;
        }
        if let Some(px) = self.min_box_px {
            engine.min_box_px = px;
        }
        if let Some(w) = self.legacy_box_width {
            engine.legacy_box_size.0 = w;
        }
        if let Some(h) = self.legacy_box_height {
            engine.legacy_box_size.1 = h;
        }
        if let Some(ms) = self.resize_debounce_ms {
            engine.resize_debounce = Duration::from_millis(ms);
        }
        if let Some(decimals) = self.precision {
            engine.precision = decimals;
        }
    }
}

/// Reject engine values the gesture and load paths cannot work with
fn check_engine(engine: &EngineConfig) -> Result<(), CatalogError> {
    let invalid = |key, value, expected| CatalogError::InvalidEngine {
        key,
        value,
        expected,
    };
    let (legacy_w, legacy_h) = engine.legacy_box_size;

    let checks = [
        ("hit_tolerance_px", engine.hit_tolerance_px, engine.hit_tolerance_px >= 0.0, "a finite number >= 0"),
        ("min_box_px", engine.min_box_px, engine.min_box_px > 0.0, "a finite number > 0"),
        ("legacy_box_width", legacy_w, legacy_w > 0.0 && legacy_w <= 1.0, "a fraction in (0, 1]"),
        ("legacy_box_height", legacy_h, legacy_h > 0.0 && legacy_h <= 1.0, "a fraction in (0, 1]"),
    ];
    for (key, value, in_range, expected) in checks {
        if !value.is_finite() || !in_range {
            return Err(invalid(key, value, expected));
        }
    }

    if engine.precision > MAX_PRECISION {
        return Err(invalid("precision", engine.precision as f64, "at most 15 decimals"));
    }
    Ok(())
}

impl TomlField {
    fn into_field(self) -> Field {
        let label = self.label.unwrap_or_else(|| self.id.clone());
        Field::new(self.id, label, self.preview_text)
    }
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self::from_str(DEFAULT_SETTINGS).expect("Default settings should be valid TOML")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog() {
        let settings = EditorSettings::default();
        assert_eq!(settings.catalog.len(), 18);
        assert_eq!(settings.catalog.ids().next(), Some("theme_origin"));
        assert_eq!(settings.catalog.ids().last(), Some("date"));
        assert_eq!(settings.engine, EngineConfig::default());
    }

    #[test]
    fn test_default_preview_text_keeps_newlines() {
        let settings = EditorSettings::default();
        let id = settings.catalog.lookup("commentaire").unwrap();
        assert_eq!(settings.catalog.field(id).preview_text.lines().count(), 2);
    }

    #[test]
    fn test_engine_overrides_only() {
        let settings = EditorSettings::from_str(
            r#"
[engine]
hit_tolerance_px = 10
resize_debounce_ms = 300
"#,
        )
        .expect("Should parse");
        assert_eq!(settings.engine.hit_tolerance_px, 10.0);
        assert_eq!(settings.engine.resize_debounce, Duration::from_millis(300));
        assert_eq!(settings.engine.min_box_px, EngineConfig::default().min_box_px);
        assert_eq!(settings.catalog.len(), 18);
    }

    #[test]
    fn test_custom_fields() {
        let settings = EditorSettings::from_str(
            r#"
[[fields]]
id = "name"
label = "Name"
preview_text = "Ada"

[[fields]]
id = "signature"
"#,
        )
        .expect("Should parse");
        assert_eq!(settings.catalog.len(), 2);
        let sig = settings.catalog.lookup("signature").unwrap();
        assert_eq!(settings.catalog.field(sig).label, "signature");
        assert_eq!(settings.catalog.field(sig).preview_text, "");
    }

    #[test]
    fn test_duplicate_fields_rejected() {
        let result = EditorSettings::from_str("[[fields]]\nid = \"a\"\n[[fields]]\nid = \"a\"\n");
        assert!(matches!(result, Err(CatalogError::InvalidCatalog(_))));
    }

    #[test]
    fn test_invalid_toml_error() {
        let result = EditorSettings::from_str("this is not valid toml {{{{");
        assert!(matches!(result, Err(CatalogError::ParseError(_))));
    }

    fn engine_error(settings: &str) -> &'static str {
        match EditorSettings::from_str(settings) {
            Err(CatalogError::InvalidEngine { key, .. }) => key,
            other => panic!("expected an engine error, got {:?}", other.map(|s| s.engine)),
        }
    }

    #[test]
    fn test_legacy_size_must_fit_the_page() {
        assert_eq!(engine_error("[engine]\nlegacy_box_width = 1.5\n"), "legacy_box_width");
        assert_eq!(engine_error("[engine]\nlegacy_box_height = 0\n"), "legacy_box_height");
        assert_eq!(engine_error("[engine]\nlegacy_box_width = -0.05\n"), "legacy_box_width");

        let settings = EditorSettings::from_str("[engine]\nlegacy_box_width = 1\n").unwrap();
        assert_eq!(settings.engine.legacy_box_size, (1.0, 0.02));
    }

    #[test]
    fn test_pixel_thresholds_must_be_usable() {
        assert_eq!(engine_error("[engine]\nmin_box_px = -4\n"), "min_box_px");
        assert_eq!(engine_error("[engine]\nmin_box_px = 0\n"), "min_box_px");
        assert_eq!(engine_error("[engine]\nhit_tolerance_px = -1\n"), "hit_tolerance_px");
        assert_eq!(engine_error("[engine]\nhit_tolerance_px = nan\n"), "hit_tolerance_px");
        assert_eq!(engine_error("[engine]\nmin_box_px = inf\n"), "min_box_px");
        assert!(EditorSettings::from_str("[engine]\nhit_tolerance_px = 0\n").is_ok());
    }

    #[test]
    fn test_precision_is_bounded() {
        assert_eq!(engine_error("[engine]\nprecision = 400\n"), "precision");
        let message = EditorSettings::from_str("[engine]\nprecision = 400\n")
            .unwrap_err()
            .to_string();
        assert!(message.contains("precision"), "{message}");
    }

    #[test]
    fn test_unknown_key_rejected() {
        let result = EditorSettings::from_str("[engine]\ntolerance = 3\n");
        assert!(result.is_err());
    }
}

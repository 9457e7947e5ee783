//! Layout file round trips and recovery from damaged or legacy files

use std::fs;
use std::path::PathBuf;

use page_layout_editor::persist::{deserialize, serialize};
use page_layout_editor::{
    Editor, EditorSettings, EngineConfig, FieldBox, ImageFrame, Layout, LoadDiagnostic, Point,
    Size, StaticFrame,
};
use pretty_assertions::assert_eq;

fn scratch_file(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("page-layout-editor-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    dir.join(name)
}

fn editor() -> Editor<StaticFrame> {
    let frame = ImageFrame::new(Point::new(0.0, 0.0), Size::new(1000.0, 1000.0));
    Editor::new(EditorSettings::default(), StaticFrame(frame))
}

fn draw(editor: &mut Editor<StaticFrame>, id: &str, from: (f64, f64), to: (f64, f64)) {
    editor.select(id).unwrap();
    editor.pointer_down(Point::new(from.0, from.1));
    editor.pointer_up(Point::new(to.0, to.1));
}

#[test]
fn test_save_then_load_restores_layout() {
    let path = scratch_file("round_trip.toml");
    let mut first = editor();
    draw(&mut first, "intitule", (96.0, 231.0), (452.0, 249.0));
    draw(&mut first, "date", (891.0, 301.0), (958.0, 321.0));
    draw(&mut first, "commentaire", (100.0, 700.0), (333.333, 777.777));
    first.save_layout(&path).unwrap();
    assert_eq!(
        first.status(),
        Some(format!("Saved layout to {}", path.display()).as_str())
    );

    let mut second = editor();
    let report = second.load_layout(&path);

    // unset fields are saved as sentinels, so nothing is missing on load
    assert!(report.is_clean(), "{:?}", report.diagnostics);
    assert_eq!(second.registry().layout(), first.registry().layout());
    assert_eq!(second.registry().layout().placed_count(), 3);
}

#[test]
fn test_serialize_deserialize_is_identity_for_rounded_layouts() {
    let settings = EditorSettings::default();
    let catalog = &settings.catalog;
    let mut layout = Layout::unset(catalog);
    for (i, (id, _)) in catalog.iter().enumerate().filter(|(i, _)| i % 3 != 0) {
        let x = 0.05 * i as f64 / 2.0;
        layout.set(id, FieldBox::new(x, 0.5, 0.123457, 0.01).unwrap().rounded(6));
    }

    let doc = serialize(&layout, catalog).unwrap();
    let report = deserialize(&doc, catalog, &EngineConfig::default()).unwrap();
    assert!(report.is_clean());
    assert_eq!(report.layout, layout);
}

#[test]
fn test_legacy_point_records_get_default_size() {
    let settings = EditorSettings::default();
    let doc = r#"
[intitule]
x_percent = 0.1
y_percent = 0.2
w_percent = -1.0
h_percent = -1.0

[date]
x_percent = 0.99
y_percent = 0.5
"#;
    let report = deserialize(doc, &settings.catalog, &settings.engine).unwrap();

    let intitule = settings.catalog.lookup("intitule").unwrap();
    let date = settings.catalog.lookup("date").unwrap();
    let rect = report.layout.get(intitule).unwrap();
    assert!(rect.approx_eq(&FieldBox::new(0.1, 0.2, 0.05, 0.02).unwrap(), 1e-9));

    // shifted left so the default size fits on the page
    let rect = report.layout.get(date).unwrap();
    assert!((rect.right() - 1.0).abs() < 1e-9, "{rect:?}");
    assert!((rect.w() - 0.05).abs() < 1e-9);

    let upgraded: Vec<&str> = report.legacy_upgrades().collect();
    assert_eq!(upgraded, vec!["intitule", "date"]);
}

#[test]
fn test_unset_record_is_not_a_legacy_record() {
    let settings = EditorSettings::default();
    let doc = "[intitule]\nx_percent = -1.0\ny_percent = -1.0\nw_percent = -1.0\nh_percent = -1.0\n";
    let report = deserialize(doc, &settings.catalog, &settings.engine).unwrap();
    assert_eq!(report.layout.placed_count(), 0);
    assert_eq!(report.legacy_upgrades().count(), 0);
}

#[test]
fn test_bad_values_degrade_per_field() {
    let settings = EditorSettings::default();
    let doc = r#"
ghost = { x_percent = 0.1, y_percent = 0.1, w_percent = 0.1, h_percent = 0.1 }
date = "not a table"

[intitule]
x_percent = "left"
y_percent = 0.2
w_percent = 0.1
h_percent = 0.1

[pagination]
x_percent = 0.5
y_percent = 0.9
w_percent = 0.1
h_percent = 0.05
"#;
    let report = deserialize(doc, &settings.catalog, &settings.engine).unwrap();
    let pagination = settings.catalog.lookup("pagination").unwrap();

    assert_eq!(report.layout.placed_count(), 1);
    assert!(report.layout.get(pagination).is_some());
    assert!(report.diagnostics.contains(&LoadDiagnostic::UnknownField {
        id: "ghost".to_string()
    }));
    assert!(report.diagnostics.contains(&LoadDiagnostic::NotATable {
        id: "date".to_string()
    }));
    assert!(report.diagnostics.contains(&LoadDiagnostic::MalformedValue {
        id: "intitule".to_string(),
        key: "x_percent"
    }));
}

#[test]
fn test_missing_file_loads_nothing() {
    let mut editor = editor();
    draw(&mut editor, "date", (100.0, 100.0), (200.0, 200.0));

    let report = editor.load_layout(&scratch_file("does_not_exist.toml"));
    assert!(matches!(
        report.diagnostics.as_slice(),
        [LoadDiagnostic::Unreadable { .. }]
    ));
    // a failed load still replaces the layout, with every field unset
    assert_eq!(editor.registry().layout().placed_count(), 0);
}

#[test]
fn test_garbage_file_loads_nothing() {
    let path = scratch_file("garbage.toml");
    fs::write(&path, "this is {{ not toml").unwrap();

    let mut editor = editor();
    let report = editor.load_layout(&path);
    assert_eq!(report.layout.placed_count(), 0);
    assert!(!report.is_clean());
}

#[test]
fn test_save_failure_keeps_layout() {
    let mut editor = editor();
    draw(&mut editor, "date", (100.0, 100.0), (200.0, 200.0));
    let before = editor.registry().layout().clone();

    let dir = scratch_file("a_directory");
    fs::create_dir_all(&dir).unwrap();
    assert!(editor.save_layout(&dir).is_err());
    assert_eq!(editor.registry().layout(), &before);
}

//! Page Layout Editor CLI
//!
//! Usage:
//!   page-layout-editor [OPTIONS] <COMMAND>
//!
//! Commands:
//!   fields    List the field catalog
//!   check     Load a layout file and report every box and diagnostic
//!   preview   Render a layout file as an SVG overlay
//!   replay    Drive the editor from a gesture script
//!   grammar   Show the gesture script reference
//!
//! Options:
//!   -c, --config <FILE>  Editor settings file (TOML format)
//!   -h, --help           Print help

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use page_layout_editor::{
    persist, render_overlay, script, Editor, EditorError, EditorSettings, FieldRegistry,
    FittedPage, LoadReport, OverlayConfig, Size,
};

#[derive(Parser)]
#[command(name = "page-layout-editor")]
#[command(about = "Place named field boxes on a document page")]
struct Cli {
    /// Editor settings file with the field catalog (TOML format)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the field catalog in order
    Fields,

    /// Load a layout file and print every field's box
    Check {
        /// Layout file (TOML format)
        layout: PathBuf,

        /// Exit with an error if the load produced any diagnostic
        #[arg(long)]
        strict: bool,
    },

    /// Render a layout file as an SVG overlay
    Preview {
        /// Layout file (TOML format)
        layout: PathBuf,

        /// Image width in pixels
        #[arg(long, default_value_t = 595.0)]
        width: f64,

        /// Image height in pixels
        #[arg(long, default_value_t = 842.0)]
        height: f64,

        /// Output file (stdout if not provided)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Replay a gesture script against an A4 page
    Replay {
        /// Gesture script
        script: PathBuf,

        /// Layout to load before replaying
        #[arg(short, long)]
        layout: Option<PathBuf>,

        /// Where to save the layout afterwards
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Where to write an SVG overlay of the final state
        #[arg(long)]
        svg: Option<PathBuf>,

        /// Initial viewport width in pixels
        #[arg(long, default_value_t = 1200.0)]
        viewport_width: f64,

        /// Initial viewport height in pixels
        #[arg(long, default_value_t = 1000.0)]
        viewport_height: f64,
    },

    /// Show the gesture script reference
    Grammar,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => match EditorSettings::from_file(path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Error loading settings '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => EditorSettings::default(),
    };

    let result = match cli.command {
        Command::Fields => {
            print_fields(&settings);
            Ok(())
        }
        Command::Check { layout, strict } => check(&settings, &layout, strict),
        Command::Preview {
            layout,
            width,
            height,
            output,
        } => preview(&settings, &layout, Size::new(width, height), output.as_deref()),
        Command::Replay {
            script,
            layout,
            save,
            svg,
            viewport_width,
            viewport_height,
        } => replay(
            settings,
            &script,
            layout.as_deref(),
            save.as_deref(),
            svg.as_deref(),
            Size::new(viewport_width, viewport_height),
        ),
        Command::Grammar => {
            print_grammar();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn print_fields(settings: &EditorSettings) {
    for (_, field) in settings.catalog.iter() {
        let preview = field.preview_text.lines().collect::<Vec<_>>().join(" / ");
        println!("{:<22} {:<26} {}", field.id, field.label, preview);
    }
}

fn load(settings: &EditorSettings, path: &Path) -> LoadReport {
    let report = persist::load_file(path, &settings.catalog, &settings.engine);
    for diagnostic in &report.diagnostics {
        eprintln!("warning: {}", diagnostic);
    }
    report
}

fn check(settings: &EditorSettings, path: &Path, strict: bool) -> Result<(), EditorError> {
    let report = load(settings, path);
    for (id, field) in settings.catalog.iter() {
        match report.layout.get(id) {
            Some(rect) => println!(
                "{:<22} x={:<9} y={:<9} w={:<9} h={}",
                field.id,
                rect.x(),
                rect.y(),
                rect.w(),
                rect.h()
            ),
            None => println!("{:<22} unset", field.id),
        }
    }
    println!(
        "{} of {} fields placed, {} legacy record(s) upgraded",
        report.layout.placed_count(),
        report.layout.len(),
        report.legacy_upgrades().count()
    );

    if strict && !report.is_clean() {
        eprintln!("{} diagnostic(s) in strict mode", report.diagnostics.len());
        std::process::exit(2);
    }
    Ok(())
}

fn preview(
    settings: &EditorSettings,
    path: &Path,
    image: Size,
    output: Option<&Path>,
) -> Result<(), EditorError> {
    let report = load(settings, path);
    let mut registry = FieldRegistry::new(settings.catalog.clone());
    registry.replace_layout(report.layout);

    let svg = render_overlay(&registry, None, None, image, &OverlayConfig::default());
    write_output(output, &svg)
}

fn replay(
    settings: EditorSettings,
    script_path: &Path,
    layout: Option<&Path>,
    save: Option<&Path>,
    svg: Option<&Path>,
    viewport: Size,
) -> Result<(), EditorError> {
    let source = fs::read_to_string(script_path)?;
    let filename = script_path.display().to_string();

    let mut editor = Editor::new(settings, FittedPage::a4(viewport));
    if let Some(path) = layout {
        let report = editor.load_layout(path);
        for diagnostic in &report.diagnostics {
            eprintln!("warning: {}", diagnostic);
        }
    }

    let transcript = match script::run(&mut editor, &source) {
        Ok(lines) => lines,
        Err(EditorError::Script(errors)) => {
            for err in &errors {
                eprint!("{}", err.format(&source, &filename));
            }
            std::process::exit(1);
        }
        Err(e) => return Err(e),
    };
    for line in transcript {
        println!("{}", line);
    }

    if let Some(path) = save {
        editor.save_layout(path)?;
    }
    if let Some(path) = svg {
        write_output(Some(path), &editor.render_overlay(&OverlayConfig::default()))?;
    }
    if let Some(status) = editor.status() {
        println!("{}", status);
    }
    Ok(())
}

fn write_output(output: Option<&Path>, content: &str) -> Result<(), EditorError> {
    match output {
        Some(path) => {
            fs::write(path, content)?;
        }
        None => println!("{}", content),
    }
    Ok(())
}

fn print_grammar() {
    println!(
        r#"GESTURE SCRIPT REFERENCE
========================

One command per line. Positions and sizes are viewport pixels.

select <id>          Select a field by id
select "<label>"     Select a field by label
down <x> <y>         Pointer pressed
move <x> <y>         Pointer moved
up <x> <y>           Pointer released
cancel               Pointer capture lost
resize <w> <h>       Viewport resized (applied once resizes settle)
wait <ms>            Let time pass

Text after # is a comment.

EXAMPLE
-------
# draw the title box, then widen it from its right edge
select intitule
down 400 300
move 600 360
up 600 360
down 600 330
up 680 330"#
    );
}

//! Box-layout engine: field registry, coordinate mapping, hit-testing and drags
//!
//! Pointer events flow viewport → [`coords`] → [`hit_test`] → [`drag`], which
//! mutates the [`registry`]. All stored geometry is normalized to the
//! reference image so it does not depend on the render resolution.

pub mod config;
pub mod coords;
pub mod drag;
pub mod error;
pub mod registry;
pub mod types;

pub use config::EngineConfig;
pub use coords::{to_normalized, to_viewport, ImageFrame, Thresholds};
pub use drag::{DiscardReason, DragMachine, DragMode, DragSession, GestureOutcome};
pub use error::LayoutError;
pub use hit_test::{hit_test, Hit};
pub use registry::{Field, FieldCatalog, FieldId, FieldRegistry, Layout};
pub use types::*;

/// Edit distance between two identifiers, one row at a time
fn edit_distance(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut row: Vec<usize> = (0..=b.len()).collect();

    for (i, ca) in a.chars().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = diagonal + usize::from(ca != *cb);
            diagonal = row[j + 1];
            row[j + 1] = substitution.min(row[j] + 1).min(diagonal + 1);
        }
    }
    row[b.len()]
}

/// Up to three known ids close to `target`, closest first
pub(crate) fn find_similar(known: &[&str], target: &str, max_distance: usize) -> Vec<String> {
    let mut close: Vec<(usize, &str)> = known
        .iter()
        .map(|name| (edit_distance(name, target), *name))
        .filter(|(d, _)| (1..=max_distance).contains(d))
        .collect();
    close.sort_by_key(|(d, _)| *d);
    close.into_iter().take(3).map(|(_, name)| name.to_string()).collect()
}

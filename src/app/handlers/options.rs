//! Handler für Laufzeit-Optionen.

use crate::app::AppState;
use crate::shared::EditorOptions;

/// Verteilt die Optionen auf die Komponenten.
fn distribute(state: &mut AppState) {
    let options = &state.options;
    state.selection.style = options.selection.clone();
    state.selection.pick_tolerance_px = options.pick_tolerance_px;
    state
        .session
        .set_options(options.editing.clone(), options.pick_tolerance_px);
    state.session.transform.set_options(options.transform.clone());
}

/// Wendet neue Optionen an und persistiert sie.
pub fn apply_options(state: &mut AppState, options: EditorOptions) -> anyhow::Result<()> {
    state.options = options;
    distribute(state);
    let path = EditorOptions::config_path();
    state.options.save_to_file(&path)
}

/// Setzt Optionen auf Standardwerte zurück und persistiert sie.
pub fn reset_options(state: &mut AppState) -> anyhow::Result<()> {
    state.options = EditorOptions::default();
    distribute(state);
    let path = EditorOptions::config_path();
    state.options.save_to_file(&path)
}

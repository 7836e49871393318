//! Handler für die Editier-Sitzung und ihre Werkzeuge.

use crate::app::AppState;
use crate::core::{FeatureId, GeometryKind};

pub fn start(state: &mut AppState) {
    state.session.start(&mut state.map, &mut state.selection);
}

pub fn stop(state: &mut AppState) {
    state.session.stop(&mut state.map, &mut state.selection);
    state.cursor = Default::default();
}

/// Aktiviert das Zeichen-Werkzeug.
pub fn draw(state: &mut AppState, kind: GeometryKind, layer: Option<&str>) {
    if !state.session.draw(&mut state.map, kind, layer) {
        log::warn!("Zeichnen nicht möglich: {:?}", kind);
    }
}

pub fn draw_editable_type(state: &mut AppState, index: usize) {
    state.session.draw_editable_type(&mut state.map, index);
}

/// Stützpunkt-Bearbeitung für die aktuelle Selektion.
pub fn modify(state: &mut AppState) {
    state.session.modify(&mut state.map, &state.selection, None);
}

/// Verschieben für die aktuelle Selektion.
pub fn move_selected(state: &mut AppState) {
    state
        .session
        .move_features(&mut state.map, &state.selection, None);
}

pub fn transform(state: &mut AppState) {
    state.session.trans(&mut state.map, &mut state.selection);
}

/// Beendet das aktive Werkzeug.
pub fn deactivate_tool(state: &mut AppState) {
    state.session.deactivate_tools(&state.map);
    state.cursor = Default::default();
}

pub fn cancel_sketch(state: &mut AppState) {
    state.session.cancel_sketch();
}

/// Löscht Features (jeweils ein Verlaufsschritt).
pub fn delete_features(state: &mut AppState, ids: &[FeatureId]) {
    let deleted = ids
        .iter()
        .filter(|id| {
            state
                .session
                .delete(&mut state.map, &mut state.selection, id)
        })
        .count();
    log::info!("{} Features gelöscht", deleted);
}

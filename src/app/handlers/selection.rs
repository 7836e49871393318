//! Handler für Selektions-Operationen.

use crate::app::AppState;
use crate::core::{Extent, FeatureId};

pub fn activate_click(state: &mut AppState) {
    state.selection.select_by_click(&mut state.map);
}

pub fn activate_window(state: &mut AppState) {
    state.selection.select_by_window(&mut state.map);
}

/// Beendet den Selektionsmodus (leert die Selektion).
pub fn deactivate(state: &mut AppState) {
    state.selection.deactivate(&mut state.map);
    state.box_selecting = false;
}

/// Selektiert Features, optional mit Zoom auf die neuen.
pub fn select_features(state: &mut AppState, ids: &[FeatureId], zoom_to: bool) {
    let added = state.selection.select_features(&mut state.map, ids, zoom_to);
    log::debug!("{} von {} Features selektiert", added, ids.len());
}

pub fn unselect_features(state: &mut AppState, ids: &[FeatureId]) {
    state.selection.unselect_features(&mut state.map, ids);
}

/// Hebt die aktuelle Selektion auf.
pub fn clear(state: &mut AppState) {
    state.selection.clear_selection(&mut state.map);
}

/// Beginnt eine Rahmen-Geste (nur im Rahmen-Modus).
pub fn begin_box(state: &mut AppState) {
    state.box_selecting = state.selection.begin_box(&mut state.map);
}

/// Schließt die Rahmen-Geste ab.
pub fn finish_box(state: &mut AppState, extent: &Extent) {
    if !std::mem::take(&mut state.box_selecting) {
        log::debug!("Rahmen-Ende ohne Rahmen-Beginn");
    }
    state.selection.end_box(&mut state.map, extent);
}

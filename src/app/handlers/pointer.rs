//! Handler für Zeiger-Gesten. Das aktive Werkzeug bestimmt das Ziel.

use crate::app::AppState;
use crate::core::PointerEvent;

/// Zeiger gedrückt.
pub fn begin_gesture(state: &mut AppState, event: &PointerEvent) {
    state.pointer_coordinate = Some(event.coordinate);
    if state.session.pointer_down(&mut state.map, event) {
        log::debug!("Geste übernommen: {:?}", state.session.tool_kind());
    }
}

/// Zeiger bei gedrückter Taste bewegt.
pub fn continue_gesture(state: &mut AppState, event: &PointerEvent) {
    state.pointer_coordinate = Some(event.coordinate);
    state.session.pointer_drag(&mut state.map, event);
}

/// Zeiger losgelassen: abgeschlossene Änderungen landen im Verlauf.
pub fn end_gesture(state: &mut AppState, event: &PointerEvent) {
    state.pointer_coordinate = Some(event.coordinate);
    if state.session.pointer_up(&mut state.map) {
        state.selection.prune_missing(&state.map);
    }
}

/// Hover: Cursor-Hinweis und Position für die Skizzen-Vorschau.
pub fn hover(state: &mut AppState, event: &PointerEvent) {
    state.pointer_coordinate = Some(event.coordinate);
    state.cursor = state.session.pointer_move(&state.map, event);
}

/// Einzelklick an Werkzeug oder Selektion.
pub fn click(state: &mut AppState, event: &PointerEvent) {
    state
        .session
        .click(&mut state.map, &mut state.selection, event);
}

/// Doppelklick schließt eine Skizze ab.
pub fn double_click(state: &mut AppState, event: &PointerEvent) {
    state.session.double_click(&mut state.map, event);
}

//! Application State — zentrale Datenhaltung.

use glam::DVec2;

use super::editing::EditingSession;
use super::selection::SelectionManager;
use super::transform::CursorHint;
use super::CommandLog;
use crate::core::{FeatureMap, MapView};
use crate::shared::EditorOptions;

/// Hauptzustand der Anwendung
pub struct AppState {
    /// Layer, Features und Ansicht
    pub map: FeatureMap,
    pub selection: SelectionManager,
    /// Editier-Sitzung inkl. Werkzeuge, Transform-Interaktion und Verlauf
    pub session: EditingSession,
    /// Command-Log
    pub command_log: CommandLog,
    /// Laufzeit-Optionen
    pub options: EditorOptions,
    /// Letzter Cursor-Hinweis für den Host
    pub cursor: CursorHint,
    /// Letzte Zeigerposition in Kartenkoordinaten (für die Skizzen-Vorschau)
    pub pointer_coordinate: Option<DVec2>,
    /// Aktiver Box-Selektions-Drag
    pub box_selecting: bool,
}

impl AppState {
    /// Erstellt einen neuen, leeren App-State mit Standard-Optionen.
    pub fn new() -> Self {
        Self::with_options(EditorOptions::default())
    }

    /// Erstellt den State aus geladenen Optionen.
    pub fn with_options(options: EditorOptions) -> Self {
        let mut selection = SelectionManager::new(options.selection.clone());
        selection.pick_tolerance_px = options.pick_tolerance_px;
        let mut session = EditingSession::new(options.editing.clone(), options.pick_tolerance_px);
        session.transform.set_options(options.transform.clone());

        Self {
            map: FeatureMap::new(MapView::default()),
            selection,
            session,
            command_log: CommandLog::new(),
            options,
            cursor: CursorHint::Default,
            pointer_coordinate: None,
            box_selecting: false,
        }
    }

    /// Gibt die Anzahl selektierter Features zurück.
    pub fn selected_count(&self) -> usize {
        self.selection.len()
    }

    /// Gibt zurück, ob Undo für das aktuelle Feature möglich ist.
    pub fn can_undo(&self) -> bool {
        self.session
            .current_feature()
            .is_some_and(|id| self.session.history().can_undo(id))
    }

    /// Gibt zurück, ob Redo für das aktuelle Feature möglich ist.
    pub fn can_redo(&self) -> bool {
        self.session
            .current_feature()
            .is_some_and(|id| self.session.history().can_redo(id))
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

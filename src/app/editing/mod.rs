//! Editier-Sitzung: Werkzeug-Aktivierung, Feature-Lebenszyklus und Undo/Redo.
//!
//! Zustände `Stopped ↔ Editing`. Es ist höchstens ein Werkzeug aktiv; das
//! aktive Werkzeug entscheidet, wohin Zeiger-Events gehen (Selektion oder
//! Transform-Interaktion, nie beide).

pub mod draw;
pub mod modify;
pub mod translate;

use glam::DVec2;

use super::events::EventBus;
use super::history::{EditHistory, FeatureSnapshot};
use super::selection::SelectionManager;
use super::transform::{CursorHint, TransformInteraction};
use crate::core::{Feature, FeatureId, FeatureMap, GeometryKind, Layer, PointerEvent};
use crate::shared::options::{EditingOptions, TransformOptions};
use crate::shared::SketchPreview;

pub use draw::{DrawTool, ToolAction, ToolAnchor};
pub use modify::ModifyTool;
pub use translate::MoveTool;

/// Events der Editier-Sitzung
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    StartEditing,
    StopEditing,
    Created { feature: FeatureId },
    Updated { feature: FeatureId },
    Deleted { feature: FeatureId },
}

/// Aktives Werkzeug (genau eins oder keins)
#[derive(Debug, Clone, Default)]
pub enum ActiveTool {
    #[default]
    None,
    Draw(DrawTool),
    Modify(ModifyTool),
    Move(MoveTool),
    /// Die Interaktion selbst lebt dauerhaft in der Sitzung
    Transform,
}

/// Werkzeug-Art ohne Zustand (für Intents und Anzeige)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToolKind {
    #[default]
    None,
    Draw,
    Modify,
    Move,
    Transform,
}

impl ActiveTool {
    pub fn kind(&self) -> ToolKind {
        match self {
            ActiveTool::None => ToolKind::None,
            ActiveTool::Draw(_) => ToolKind::Draw,
            ActiveTool::Modify(_) => ToolKind::Modify,
            ActiveTool::Move(_) => ToolKind::Move,
            ActiveTool::Transform => ToolKind::Transform,
        }
    }
}

/// Eine Editier-Sitzung über einer `FeatureMap`.
#[derive(Debug)]
pub struct EditingSession {
    editing: bool,
    /// Nächste lokale ID für neu erzeugte Features (negativ, fallend)
    next_local_id: i64,
    history: EditHistory,
    current: Option<FeatureId>,
    tool: ActiveTool,
    options: EditingOptions,
    pick_tolerance_px: f64,
    pub transform: TransformInteraction,
    pub events: EventBus<EditorEvent>,
}

impl EditingSession {
    pub fn new(options: EditingOptions, pick_tolerance_px: f64) -> Self {
        Self {
            editing: false,
            next_local_id: -1,
            history: EditHistory::new(),
            current: None,
            tool: ActiveTool::None,
            options,
            pick_tolerance_px,
            transform: TransformInteraction::new(TransformOptions::session_tool()),
            events: EventBus::new(),
        }
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn options(&self) -> &EditingOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: EditingOptions, pick_tolerance_px: f64) {
        self.options = options;
        self.pick_tolerance_px = pick_tolerance_px;
    }

    pub fn history(&self) -> &EditHistory {
        &self.history
    }

    /// Zuletzt erzeugtes/geändertes Feature (Ziel von Undo/Redo).
    pub fn current_feature(&self) -> Option<&FeatureId> {
        self.current.as_ref()
    }

    pub fn active_tool(&self) -> &ActiveTool {
        &self.tool
    }

    pub fn tool_kind(&self) -> ToolKind {
        self.tool.kind()
    }

    /// Betritt den Editier-Modus und aktiviert die Klick-Selektion.
    ///
    /// Fehlt der Editor-Layer, wird er angelegt.
    pub fn start(&mut self, map: &mut FeatureMap, selection: &mut SelectionManager) {
        if self.editing {
            return;
        }
        if map.layer(&self.options.editor_layer).is_none() {
            map.add_layer(Layer::new(self.options.editor_layer.clone()).with_editable(true));
        }
        self.editing = true;
        log::info!("Editier-Sitzung gestartet");
        self.events.emit(&EditorEvent::StartEditing);
        selection.select_by_click(map);
    }

    /// Verlässt den Editier-Modus: alle Werkzeuge und die Selektion werden deaktiviert.
    pub fn stop(&mut self, map: &mut FeatureMap, selection: &mut SelectionManager) {
        if !self.editing {
            return;
        }
        self.events.emit(&EditorEvent::StopEditing);
        self.deactivate_tools(map);
        selection.deactivate(map);
        self.editing = false;
        log::info!("Editier-Sitzung beendet");
    }

    // ── Feature-Lebenszyklus ───────────────────────────────────────

    /// Vergibt eine neue negative Identität, fügt das Feature in den Layer ein
    /// und legt seinen Verlauf an.
    pub fn create(&mut self, map: &mut FeatureMap, mut feature: Feature, layer: &str) -> Option<FeatureId> {
        if !self.editing {
            return None;
        }
        if map.layer(layer).is_none() {
            log::warn!("Layer '{}' nicht gefunden, Feature nicht erzeugt", layer);
            return None;
        }
        // Belegte Identitäten (z.B. nachgeladen) überspringen, nie überschreiben
        let mut local = self.next_local_id;
        while map.feature(&FeatureId::new(layer, local)).is_some() {
            local -= 1;
        }
        let id = FeatureId::new(layer, local);
        feature.id = Some(id.clone());

        let snapshot = FeatureSnapshot::from_feature(&feature);
        if !map.insert_feature(feature) {
            log::warn!("Feature {} konnte nicht eingefügt werden", id);
            return None;
        }
        self.next_local_id = local - 1;
        if let Some(snapshot) = snapshot {
            self.history.seed(snapshot);
        }
        log::debug!("Feature erzeugt: {}", id);
        self.current = Some(id.clone());
        self.events.emit(&EditorEvent::Created {
            feature: id.clone(),
        });
        self.refresh_draw_snap(map);
        Some(id)
    }

    /// Hängt den neuen Zustand an den Verlauf an (fehlt er, mit `old` als Anfang).
    pub fn update(&mut self, old: &Feature, new: &Feature) -> bool {
        if !self.editing {
            return false;
        }
        let (Some(old_state), Some(new_state)) = (
            FeatureSnapshot::from_feature(old),
            FeatureSnapshot::from_feature(new),
        ) else {
            log::warn!("Update ohne Feature-Identität ignoriert");
            return false;
        };
        if old_state.id != new_state.id {
            log::warn!(
                "Update mit unterschiedlichen Identitäten ignoriert: {} / {}",
                old_state.id,
                new_state.id
            );
            return false;
        }
        self.commit(old_state, new_state);
        true
    }

    /// Entfernt ein Feature aus seinem Layer und vermerkt die Löschung im Verlauf.
    pub fn delete(
        &mut self,
        map: &mut FeatureMap,
        selection: &mut SelectionManager,
        id: &FeatureId,
    ) -> bool {
        if !self.editing {
            return false;
        }
        if map.feature(id).is_none() {
            return false;
        }
        selection.unselect_features(map, std::slice::from_ref(id));
        let Some(removed) = map.remove_feature(id) else {
            return false;
        };
        let (Some(old_state), Some(deleted)) = (
            FeatureSnapshot::from_feature(&removed),
            FeatureSnapshot::deleted(&removed),
        ) else {
            return false;
        };
        self.history.record(old_state, deleted);
        self.current = Some(id.clone());
        log::debug!("Feature gelöscht: {}", id);
        self.events.emit(&EditorEvent::Deleted {
            feature: id.clone(),
        });
        self.refresh_draw_snap(map);
        true
    }

    /// Undo: beim Zeichnen den letzten Stützpunkt, sonst einen Verlaufsschritt
    /// des aktuellen Features (Geometrie und Attribute).
    pub fn undo(&mut self, map: &mut FeatureMap, selection: &mut SelectionManager) -> bool {
        if !self.editing {
            return false;
        }
        if let ActiveTool::Draw(tool) = &mut self.tool {
            return tool.remove_last_point();
        }
        let Some(id) = self.current.clone() else {
            return false;
        };
        match self.history.previous(&id) {
            Some(state) => {
                apply_snapshot(map, selection, &state);
                true
            }
            None => false,
        }
    }

    /// Redo: symmetrisch zu Undo, gesperrt solange gezeichnet wird.
    pub fn redo(&mut self, map: &mut FeatureMap, selection: &mut SelectionManager) -> bool {
        if !self.editing || matches!(self.tool, ActiveTool::Draw(_)) {
            return false;
        }
        let Some(id) = self.current.clone() else {
            return false;
        };
        match self.history.next(&id) {
            Some(state) => {
                apply_snapshot(map, selection, &state);
                true
            }
            None => false,
        }
    }

    // ── Werkzeuge ──────────────────────────────────────────────────

    /// Aktiviert das Zeichnen. Ohne Layer wird der Editor-Layer verwendet.
    pub fn draw(&mut self, map: &mut FeatureMap, kind: GeometryKind, layer: Option<&str>) -> bool {
        if !self.editing {
            return false;
        }
        let layer = layer
            .unwrap_or(self.options.editor_layer.as_str())
            .to_string();
        if map.layer(&layer).is_none() {
            log::warn!("Zeichen-Layer '{}' nicht gefunden", layer);
            return false;
        }
        self.deactivate_tools(map);
        log::debug!("Zeichnen aktiviert: {:?} in '{}'", kind, layer);
        self.tool = ActiveTool::Draw(DrawTool::new(kind, layer, map));
        true
    }

    /// Aktiviert das Zeichnen für einen Eintrag aus `editable_types`.
    pub fn draw_editable_type(&mut self, map: &mut FeatureMap, index: usize) -> bool {
        let Some(entry) = self.options.editable_types.get(index).cloned() else {
            log::warn!("Unbekannter Feature-Typ: {}", index);
            return false;
        };
        self.draw(map, entry.kind, Some(entry.layer.as_str()))
    }

    /// Aktiviert die Stützpunkt-Bearbeitung für die Features (Standard: Selektion).
    pub fn modify(
        &mut self,
        map: &mut FeatureMap,
        selection: &SelectionManager,
        features: Option<Vec<FeatureId>>,
    ) -> bool {
        if !self.editing {
            return false;
        }
        self.deactivate_tools(map);
        let targets = features.unwrap_or_else(|| selection.selection());
        log::debug!("Bearbeiten aktiviert für {} Features", targets.len());
        self.tool = ActiveTool::Modify(ModifyTool::new(targets));
        true
    }

    /// Aktiviert das Verschieben für die Features (Standard: Selektion).
    /// Das Werkzeug endet nach einer Geste.
    pub fn move_features(
        &mut self,
        map: &mut FeatureMap,
        selection: &SelectionManager,
        features: Option<Vec<FeatureId>>,
    ) -> bool {
        if !self.editing {
            return false;
        }
        self.deactivate_tools(map);
        let targets = features.unwrap_or_else(|| selection.selection());
        self.tool = ActiveTool::Move(MoveTool::new(targets, self.pick_tolerance_px));
        true
    }

    /// Aktiviert die Transform-Interaktion mit den konfigurierten Schaltern
    /// (Voreinstellung: `TransformOptions::session_tool`). Zeichnen und
    /// Selektion werden beendet.
    pub fn trans(&mut self, map: &mut FeatureMap, selection: &mut SelectionManager) -> bool {
        if !self.editing {
            return false;
        }
        self.deactivate_tools(map);
        selection.deactivate(map);
        self.transform.set_active(map, true);
        self.tool = ActiveTool::Transform;
        true
    }

    pub fn deactivate_draw(&mut self) {
        if matches!(self.tool, ActiveTool::Draw(_)) {
            self.tool = ActiveTool::None;
        }
    }

    pub fn deactivate_modify(&mut self) {
        if matches!(self.tool, ActiveTool::Modify(_)) {
            self.tool = ActiveTool::None;
        }
    }

    pub fn deactivate_move(&mut self) {
        if matches!(self.tool, ActiveTool::Move(_)) {
            self.tool = ActiveTool::None;
        }
    }

    pub fn deactivate_transform(&mut self, map: &FeatureMap) {
        if matches!(self.tool, ActiveTool::Transform) {
            self.transform.set_active(map, false);
            self.tool = ActiveTool::None;
        }
    }

    /// Beendet das aktive Werkzeug, egal welches.
    pub fn deactivate_tools(&mut self, map: &FeatureMap) {
        self.deactivate_transform(map);
        self.tool = ActiveTool::None;
    }

    /// Skizze des Zeichen-Werkzeugs (leer ohne Zeichnen).
    pub fn draw_preview(&self, cursor: Option<DVec2>) -> Option<SketchPreview> {
        match &self.tool {
            ActiveTool::Draw(tool) => Some(tool.preview(cursor)),
            _ => None,
        }
    }

    /// Gibt es eine angefangene, noch nicht abgeschlossene Skizze?
    pub fn has_pending_sketch(&self) -> bool {
        matches!(&self.tool, ActiveTool::Draw(tool) if tool.has_pending_input())
    }

    /// Verwirft die Skizze, das Zeichen-Werkzeug bleibt aktiv.
    pub fn cancel_sketch(&mut self) -> bool {
        match &mut self.tool {
            ActiveTool::Draw(tool) if tool.has_pending_input() => {
                tool.reset();
                true
            }
            _ => false,
        }
    }

    // ── Zeiger-Routing ─────────────────────────────────────────────

    /// Zeiger gedrückt. `true` wenn ein Werkzeug die Geste übernimmt.
    pub fn pointer_down(&mut self, map: &mut FeatureMap, event: &PointerEvent) -> bool {
        let tolerance = map.view.pixels_to_map_units(self.options.snap_tolerance_px);
        match &mut self.tool {
            ActiveTool::Modify(tool) => tool.pointer_down(map, event, tolerance),
            ActiveTool::Move(tool) => tool.pointer_down(map, event),
            ActiveTool::Transform => self.transform.pointer_down(map, event),
            ActiveTool::None | ActiveTool::Draw(_) => false,
        }
    }

    pub fn pointer_drag(&mut self, map: &mut FeatureMap, event: &PointerEvent) {
        match &mut self.tool {
            ActiveTool::Modify(tool) => tool.pointer_drag(map, event),
            ActiveTool::Move(tool) => tool.pointer_drag(map, event),
            ActiveTool::Transform => self.transform.pointer_drag(map, event),
            ActiveTool::None | ActiveTool::Draw(_) => {}
        }
    }

    /// Zeiger losgelassen: abgeschlossene Gesten werden als Update committet.
    pub fn pointer_up(&mut self, map: &mut FeatureMap) -> bool {
        let original = match &mut self.tool {
            ActiveTool::Modify(tool) => tool.pointer_up(map),
            ActiveTool::Move(tool) => {
                let original = tool.pointer_up();
                if original.is_some() {
                    self.tool = ActiveTool::None;
                }
                original
            }
            ActiveTool::Transform => self.transform.pointer_up().and_then(|outcome| {
                let mut original = map.feature(&outcome.feature)?.clone();
                original.geometry = outcome.old_geometry;
                Some(original)
            }),
            ActiveTool::None | ActiveTool::Draw(_) => None,
        };
        self.commit_from_original(map, original)
    }

    /// Einzelklick. Ohne Werkzeug geht er an die Selektion.
    pub fn click(
        &mut self,
        map: &mut FeatureMap,
        selection: &mut SelectionManager,
        event: &PointerEvent,
    ) -> bool {
        let tolerance = map.view.pixels_to_map_units(self.options.snap_tolerance_px);
        match &mut self.tool {
            ActiveTool::Draw(tool) => {
                let action = tool.on_click(event.coordinate, tolerance);
                self.finish_draw(map, action);
                true
            }
            ActiveTool::Modify(tool) => {
                let original = tool.click(map, event, tolerance);
                self.commit_from_original(map, original)
            }
            ActiveTool::Transform => false,
            ActiveTool::None | ActiveTool::Move(_) => selection.handle_click(map, event),
        }
    }

    /// Doppelklick schließt eine Skizze ab.
    pub fn double_click(&mut self, map: &mut FeatureMap, event: &PointerEvent) -> bool {
        let tolerance = map.view.pixels_to_map_units(self.options.snap_tolerance_px);
        let ActiveTool::Draw(tool) = &mut self.tool else {
            return false;
        };
        let action = tool.on_double_click(event.coordinate, tolerance);
        self.finish_draw(map, action);
        true
    }

    /// Hover: Cursor-Hinweis der Transform-Interaktion.
    pub fn pointer_move(&mut self, map: &FeatureMap, event: &PointerEvent) -> CursorHint {
        match self.tool {
            ActiveTool::Transform => self.transform.pointer_move(map, event),
            _ => CursorHint::Default,
        }
    }

    fn finish_draw(&mut self, map: &mut FeatureMap, action: ToolAction) {
        let ToolAction::Finished(geometry) = action else {
            return;
        };
        let ActiveTool::Draw(tool) = &self.tool else {
            return;
        };
        let layer = tool.layer().to_string();
        self.create(map, Feature::new(geometry), &layer);
    }

    fn commit_from_original(&mut self, map: &FeatureMap, original: Option<Feature>) -> bool {
        let Some(original) = original else {
            return false;
        };
        let Some(live) = original.id.as_ref().and_then(|id| map.feature(id)).cloned() else {
            return false;
        };
        self.update(&original, &live)
    }

    fn commit(&mut self, old_state: FeatureSnapshot, new_state: FeatureSnapshot) {
        let id = new_state.id.clone();
        self.history.record(old_state, new_state);
        log::debug!("Feature aktualisiert: {}", id);
        self.current = Some(id.clone());
        self.events.emit(&EditorEvent::Updated { feature: id });
    }

    fn refresh_draw_snap(&mut self, map: &FeatureMap) {
        if let ActiveTool::Draw(tool) = &mut self.tool {
            tool.refresh_snap_index(map);
        }
    }
}

impl Default for EditingSession {
    fn default() -> Self {
        Self::new(
            EditingOptions::default(),
            crate::shared::options::SELECTION_PICK_TOLERANCE_PX,
        )
    }
}

/// Schreibt einen Snapshot auf das Live-Feature zurück.
///
/// Gelöschte Zustände entfernen das Feature, andere fügen es bei Bedarf
/// wieder ein. Ein Selektionsstil bleibt erhalten.
fn apply_snapshot(map: &mut FeatureMap, selection: &mut SelectionManager, state: &FeatureSnapshot) {
    if state.deleted {
        selection.unselect_features(map, std::slice::from_ref(&state.id));
        map.remove_feature(&state.id);
        return;
    }
    match map.feature_mut(&state.id) {
        Some(feature) => {
            feature.geometry = state.geometry.clone();
            feature.attributes = state.attributes.clone();
        }
        None => {
            map.insert_feature(state.to_feature());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Geometry, MapView};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn setup() -> (FeatureMap, SelectionManager, EditingSession) {
        let map = FeatureMap::new(MapView::new(DVec2::ZERO, 1.0, DVec2::new(200.0, 200.0)));
        (map, SelectionManager::default(), EditingSession::default())
    }

    fn started() -> (FeatureMap, SelectionManager, EditingSession) {
        let (mut map, mut selection, mut session) = setup();
        session.start(&mut map, &mut selection);
        (map, selection, session)
    }

    fn at(map: &FeatureMap, coordinate: DVec2) -> PointerEvent {
        PointerEvent::new(map.view.map_to_pixel(coordinate), coordinate)
    }

    #[test]
    fn start_creates_editor_layer_and_activates_click_selection() {
        let (mut map, mut selection, mut session) = setup();
        session.start(&mut map, &mut selection);
        assert!(session.is_editing());
        assert!(map.layer("editor").is_some());
        assert!(selection.is_active());
    }

    #[test]
    fn operations_outside_session_are_noops() {
        let (mut map, _, mut session) = setup();
        map.add_layer(Layer::new("editor"));
        assert!(session
            .create(&mut map, Feature::new(Geometry::Point(DVec2::ZERO)), "editor")
            .is_none());
        assert!(!session.draw(&mut map, GeometryKind::Point, None));
    }

    #[test]
    fn create_assigns_decreasing_negative_ids() {
        let (mut map, _, mut session) = started();
        let a = session.create(&mut map, Feature::new(Geometry::Point(DVec2::ZERO)), "editor");
        let b = session.create(&mut map, Feature::new(Geometry::Point(DVec2::ONE)), "editor");
        assert_eq!(a, Some(FeatureId::new("editor", -1)));
        assert_eq!(b, Some(FeatureId::new("editor", -2)));
        assert_eq!(session.current_feature(), b.as_ref());
    }

    #[test]
    fn create_skips_taken_identity_and_records_only_inserted_feature() {
        let (mut map, _, mut session) = started();
        let taken = FeatureId::new("editor", -1);
        map.insert_feature(Feature::new(Geometry::Point(DVec2::ONE)).with_id(taken.clone()));

        let id = session.create(&mut map, Feature::new(Geometry::Point(DVec2::ZERO)), "editor");

        assert_eq!(id, Some(FeatureId::new("editor", -2)));
        assert!(!session.history().contains(&taken));
        assert_eq!(
            map.feature(&taken).map(|f| f.geometry.clone()),
            Some(Geometry::Point(DVec2::ONE))
        );
        assert!(session.create(&mut map, Feature::new(Geometry::Point(DVec2::ZERO)), "missing").is_none());
        assert_eq!(session.history().len(), 1);
        assert_eq!(
            session.create(&mut map, Feature::new(Geometry::Point(DVec2::ZERO)), "editor"),
            Some(FeatureId::new("editor", -3))
        );
    }

    #[test]
    fn undo_redo_restores_geometry_and_attributes() {
        let (mut map, mut selection, mut session) = started();
        let id = session
            .create(
                &mut map,
                Feature::new(Geometry::Point(DVec2::ZERO)).with_attribute("name", "alt"),
                "editor",
            )
            .expect("erzeugt");
        let old = map.feature(&id).cloned().expect("Feature");
        let mut new = old.clone();
        new.geometry = Geometry::Point(DVec2::new(3.0, 4.0));
        new.attributes.insert("name".into(), "neu".into());
        if let Some(live) = map.feature_mut(&id) {
            *live = new.clone();
        }
        assert!(session.update(&old, &new));

        assert!(session.undo(&mut map, &mut selection));
        assert_eq!(map.feature(&id).map(|f| f.geometry.clone()), Some(old.geometry.clone()));
        assert_eq!(map.feature(&id).and_then(|f| f.get("name")).map(|v| v.to_string()), Some("alt".into()));
        assert!(!session.undo(&mut map, &mut selection));

        assert!(session.redo(&mut map, &mut selection));
        assert_eq!(map.feature(&id).map(|f| f.geometry.clone()), Some(new.geometry));
        assert!(!session.redo(&mut map, &mut selection));
    }

    #[test]
    fn delete_can_be_undone() {
        let (mut map, mut selection, mut session) = started();
        let id = session
            .create(&mut map, Feature::new(Geometry::Point(DVec2::ZERO)), "editor")
            .expect("erzeugt");
        selection.select_features(&mut map, std::slice::from_ref(&id), false);

        assert!(session.delete(&mut map, &mut selection, &id));
        assert!(map.feature(&id).is_none());
        assert!(selection.is_empty());

        assert!(session.undo(&mut map, &mut selection));
        assert!(map.feature(&id).is_some());
        assert!(session.redo(&mut map, &mut selection));
        assert!(map.feature(&id).is_none());
    }

    #[test]
    fn undo_while_drawing_removes_last_vertex_and_redo_is_blocked() {
        let (mut map, mut selection, mut session) = started();
        assert!(session.draw(&mut map, GeometryKind::LineString, None));
        let event = at(&map, DVec2::ZERO);
        session.click(&mut map, &mut selection, &event);
        let event = at(&map, DVec2::new(30.0, 0.0));
        session.click(&mut map, &mut selection, &event);

        assert!(session.undo(&mut map, &mut selection));
        assert_eq!(
            session.draw_preview(None).map(|p| p.vertices),
            Some(vec![DVec2::ZERO])
        );
        assert!(!session.redo(&mut map, &mut selection));
    }

    #[test]
    fn drawn_point_is_created_with_event() {
        let (mut map, mut selection, mut session) = started();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        session.events.subscribe(move |e| sink.borrow_mut().push(e.clone()));

        session.draw(&mut map, GeometryKind::Point, None);
        let event = at(&map, DVec2::new(5.0, 5.0));
        session.click(&mut map, &mut selection, &event);
        assert_eq!(
            *seen.borrow(),
            vec![EditorEvent::Created {
                feature: FeatureId::new("editor", -1)
            }]
        );
    }

    #[test]
    fn move_tool_commits_and_deactivates() {
        let (mut map, mut selection, mut session) = started();
        let id = session
            .create(&mut map, Feature::new(Geometry::Point(DVec2::ZERO)), "editor")
            .expect("erzeugt");
        assert!(session.move_features(&mut map, &selection, Some(vec![id.clone()])));

        let event = at(&map, DVec2::ZERO);
        assert!(session.pointer_down(&mut map, &event));
        let event = at(&map, DVec2::new(10.0, 0.0));
        session.pointer_drag(&mut map, &event);
        assert!(session.pointer_up(&mut map));

        assert_eq!(session.tool_kind(), ToolKind::None);
        assert!(session.history().can_undo(&id));
        assert!(session.undo(&mut map, &mut selection));
        assert_eq!(
            map.feature(&id).map(|f| f.geometry.clone()),
            Some(Geometry::Point(DVec2::ZERO))
        );
    }

    #[test]
    fn trans_deactivates_selection_and_draw() {
        let (mut map, mut selection, mut session) = started();
        session.draw(&mut map, GeometryKind::Point, None);
        assert!(session.trans(&mut map, &mut selection));
        assert_eq!(session.tool_kind(), ToolKind::Transform);
        assert!(session.transform.is_active());
        assert!(!selection.is_active());
    }

    #[test]
    fn stop_deactivates_everything() {
        let (mut map, mut selection, mut session) = started();
        session.trans(&mut map, &mut selection);
        session.stop(&mut map, &mut selection);
        assert!(!session.is_editing());
        assert_eq!(session.tool_kind(), ToolKind::None);
        assert!(!session.transform.is_active());
        assert!(!selection.is_active());
    }
}

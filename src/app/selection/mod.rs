//! Selektions-Manager: Selektion pro Layer, Klick- und Rahmen-Selektion.
//!
//! Ein Feature liegt höchstens in einem Bucket (dem seines Layers) und nur
//! Features selektierbarer Layer werden aufgenommen. Selektierte Features
//! tragen `StyleOverride::Selected`, das den vorherigen Stil für die
//! Wiederherstellung enthält.

pub mod highlight;

use indexmap::{IndexMap, IndexSet};

use super::events::EventBus;
use crate::core::{Extent, FeatureId, FeatureMap, PointerEvent, StyleOverride};
use crate::shared::options::SelectionStyleOptions;
use crate::shared::options::SELECTION_PICK_TOLERANCE_PX;

/// Aktiver Selektionsmodus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionMode {
    #[default]
    Inactive,
    /// Selektion per Klick
    Click,
    /// Selektion per Rahmen (Klick bleibt zusätzlich aktiv)
    Window,
}

/// Events des Selektions-Managers
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionEvent {
    /// Selektion geändert; enthält die gesamte, flache Selektion
    Selected { features: Vec<FeatureId> },
}

/// Verwaltet die aktuelle Selektion über alle Layer.
#[derive(Debug)]
pub struct SelectionManager {
    mode: SelectionMode,
    buckets: IndexMap<String, IndexSet<FeatureId>>,
    pub style: SelectionStyleOptions,
    pub pick_tolerance_px: f64,
    pub events: EventBus<SelectionEvent>,
}

impl SelectionManager {
    pub fn new(style: SelectionStyleOptions) -> Self {
        Self {
            mode: SelectionMode::Inactive,
            buckets: IndexMap::new(),
            style,
            pick_tolerance_px: SELECTION_PICK_TOLERANCE_PX,
            events: EventBus::new(),
        }
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    pub fn is_active(&self) -> bool {
        self.mode != SelectionMode::Inactive
    }

    /// Aktiviert die Klick-Selektion (ein aktiver Modus wird vorher beendet).
    pub fn select_by_click(&mut self, map: &mut FeatureMap) {
        if self.is_active() {
            self.deactivate(map);
        }
        self.mode = SelectionMode::Click;
        log::debug!("Selektionsmodus: Klick");
    }

    /// Aktiviert die Rahmen-Selektion (ein aktiver Modus wird vorher beendet).
    pub fn select_by_window(&mut self, map: &mut FeatureMap) {
        if self.is_active() {
            self.deactivate(map);
        }
        self.mode = SelectionMode::Window;
        log::debug!("Selektionsmodus: Rahmen");
    }

    /// Beendet den Selektionsmodus und hebt die Selektion auf.
    pub fn deactivate(&mut self, map: &mut FeatureMap) {
        self.mode = SelectionMode::Inactive;
        self.clear_selection(map);
    }

    pub fn is_selected(&self, id: &FeatureId) -> bool {
        self.buckets
            .get(&id.layer)
            .is_some_and(|bucket| bucket.contains(id))
    }

    /// Flache Selektion in Bucket-Reihenfolge.
    pub fn selection(&self) -> Vec<FeatureId> {
        self.buckets.values().flatten().cloned().collect()
    }

    /// Selektion eines einzelnen Layers.
    pub fn bucket(&self, layer: &str) -> Option<&IndexSet<FeatureId>> {
        self.buckets.get(layer)
    }

    /// Layer-Namen mit nicht-leerem Bucket.
    pub fn layers(&self) -> impl Iterator<Item = &str> {
        self.buckets
            .iter()
            .filter(|(_, bucket)| !bucket.is_empty())
            .map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.buckets.values().map(IndexSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fügt Features hinzu (idempotent).
    ///
    /// Unbekannte Features und Features nicht-selektierbarer Layer werden
    /// ignoriert. Ein Event gibt es nur, wenn mindestens eines neu ist.
    pub fn select_features(&mut self, map: &mut FeatureMap, ids: &[FeatureId], zoom_to: bool) -> usize {
        let mut added = Vec::new();
        for id in ids {
            if self.try_add(map, id) {
                added.push(id.clone());
            }
        }
        if zoom_to {
            map.zoom_to_features(&added);
        }
        if !added.is_empty() {
            self.emit_changed();
        }
        added.len()
    }

    /// Entfernt Features aus der Selektion und stellt ihren Stil wieder her.
    pub fn unselect_features(&mut self, map: &mut FeatureMap, ids: &[FeatureId]) -> usize {
        let mut removed = 0;
        for id in ids {
            let Some(bucket) = self.buckets.get_mut(&id.layer) else {
                continue;
            };
            if bucket.shift_remove(id) {
                restore_style(map, id);
                removed += 1;
            }
        }
        if removed > 0 {
            self.emit_changed();
        }
        removed
    }

    /// Leert alle Buckets. Meldet immer genau ein Event, auch wenn schon leer.
    pub fn clear_selection(&mut self, map: &mut FeatureMap) {
        self.clear_silently(map);
        self.emit_changed();
    }

    /// Klick-Selektion. `false` wenn kein Selektionsmodus aktiv ist.
    ///
    /// Ein Klick ohne Treffer hebt die gesamte Selektion auf.
    pub fn handle_click(&mut self, map: &mut FeatureMap, event: &PointerEvent) -> bool {
        if !self.is_active() {
            return false;
        }
        let hits: Vec<FeatureId> = map
            .features_at_pixel(event.pixel, self.pick_tolerance_px)
            .into_iter()
            .filter(|id| is_selectable(map, id))
            .collect();
        self.apply_hits(map, &hits);
        true
    }

    /// Beginn einer Rahmen-Geste: Selektion ohne Event verwerfen.
    pub fn begin_box(&mut self, map: &mut FeatureMap) -> bool {
        if self.mode != SelectionMode::Window {
            return false;
        }
        self.clear_silently(map);
        true
    }

    /// Ende einer Rahmen-Geste.
    ///
    /// Nimmt alle geladenen Features der Fachlayer auf, die den Rahmen schneiden.
    /// Ein Rahmen ohne Treffer hebt die Selektion auf.
    pub fn end_box(&mut self, map: &mut FeatureMap, extent: &Extent) -> bool {
        if self.mode != SelectionMode::Window {
            return false;
        }
        let hits: Vec<FeatureId> = map
            .operational_features_in_extent(extent)
            .into_iter()
            .filter(|id| is_selectable(map, id))
            .collect();
        log::debug!("Rahmen-Selektion: {} Treffer", hits.len());
        self.apply_hits(map, &hits);
        true
    }

    /// Entfernt Einträge, deren Features nicht mehr existieren (ohne Event).
    pub fn prune_missing(&mut self, map: &FeatureMap) {
        for bucket in self.buckets.values_mut() {
            bucket.retain(|id| map.feature(id).is_some());
        }
    }

    fn apply_hits(&mut self, map: &mut FeatureMap, hits: &[FeatureId]) {
        if hits.is_empty() {
            self.clear_selection(map);
            return;
        }
        let mut changed = false;
        for id in hits {
            changed |= self.try_add(map, id);
        }
        if changed {
            self.emit_changed();
        }
    }

    fn try_add(&mut self, map: &mut FeatureMap, id: &FeatureId) -> bool {
        if self.is_selected(id) || !is_selectable(map, id) {
            return false;
        }
        let Some(style) = map.style_override_mut(id) else {
            return false;
        };
        let previous = style.take().map(Box::new);
        *style = Some(StyleOverride::Selected { previous });
        self.buckets
            .entry(id.layer.clone())
            .or_default()
            .insert(id.clone());
        true
    }

    fn clear_silently(&mut self, map: &mut FeatureMap) {
        for id in self.buckets.values().flatten() {
            restore_style(map, id);
        }
        self.buckets.clear();
    }

    fn emit_changed(&mut self) {
        let features = self.selection();
        self.events.emit(&SelectionEvent::Selected { features });
    }
}

impl Default for SelectionManager {
    fn default() -> Self {
        Self::new(SelectionStyleOptions::default())
    }
}

fn is_selectable(map: &FeatureMap, id: &FeatureId) -> bool {
    map.owning_layer(id)
        .is_some_and(|layer| layer.selectable && layer.source.contains(id))
}

fn restore_style(map: &mut FeatureMap, id: &FeatureId) {
    let Some(style) = map.style_override_mut(id) else {
        return;
    };
    match style.take() {
        Some(StyleOverride::Selected { previous }) => *style = previous.map(|previous| *previous),
        other => {
            *style = other;
            log::debug!("Feature {} hatte keinen Selektionsstil", id);
        }
    }
}

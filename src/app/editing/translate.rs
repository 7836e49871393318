//! Verschiebe-Werkzeug: zieht ein Ziel-Feature als Ganzes.

use glam::DVec2;

use crate::core::{Feature, FeatureId, FeatureMap, PointerEvent};

#[derive(Debug, Clone)]
struct MoveDrag {
    feature: FeatureId,
    last: DVec2,
    original: Feature,
}

/// Verschiebt eines der Ziel-Features per Drag.
#[derive(Debug, Clone, Default)]
pub struct MoveTool {
    targets: Vec<FeatureId>,
    pick_tolerance_px: f64,
    drag: Option<MoveDrag>,
}

impl MoveTool {
    pub fn new(targets: Vec<FeatureId>, pick_tolerance_px: f64) -> Self {
        Self {
            targets,
            pick_tolerance_px,
            drag: None,
        }
    }

    pub fn targets(&self) -> &[FeatureId] {
        &self.targets
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Startet den Drag, wenn ein Ziel-Feature unter dem Zeiger liegt.
    pub fn pointer_down(&mut self, map: &FeatureMap, event: &PointerEvent) -> bool {
        let hit = map
            .features_at_pixel(event.pixel, self.pick_tolerance_px)
            .into_iter()
            .find(|id| self.targets.contains(id));
        let Some(feature) = hit else {
            return false;
        };
        let Some(original) = map.feature(&feature).cloned() else {
            return false;
        };
        self.drag = Some(MoveDrag {
            feature,
            last: event.coordinate,
            original,
        });
        true
    }

    pub fn pointer_drag(&mut self, map: &mut FeatureMap, event: &PointerEvent) {
        let Some(drag) = self.drag.as_mut() else {
            return;
        };
        if let Some(feature) = map.feature_mut(&drag.feature) {
            feature.geometry.translate(event.coordinate - drag.last);
        }
        drag.last = event.coordinate;
    }

    /// Beendet die Geste. Liefert das Feature vor dem Verschieben.
    pub fn pointer_up(&mut self) -> Option<Feature> {
        self.drag.take().map(|drag| drag.original)
    }
}

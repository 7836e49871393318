//! Stützpunkt-Bearbeitung: Ziehen, Einfügen auf Segmenten, Löschen per Shift+Klick.

use glam::DVec2;

use crate::core::{Feature, FeatureId, FeatureMap, PointerEvent, VertexRef};

/// Laufender Stützpunkt-Drag.
#[derive(Debug, Clone)]
struct VertexDrag {
    feature: FeatureId,
    vertex: VertexRef,
    /// Feature vor der Geste
    original: Feature,
}

/// Bearbeitet die Stützpunkte einer festen Feature-Menge.
#[derive(Debug, Clone, Default)]
pub struct ModifyTool {
    targets: Vec<FeatureId>,
    drag: Option<VertexDrag>,
}

impl ModifyTool {
    pub fn new(targets: Vec<FeatureId>) -> Self {
        Self {
            targets,
            drag: None,
        }
    }

    pub fn targets(&self) -> &[FeatureId] {
        &self.targets
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Zeiger gedrückt: greift den nächsten Stützpunkt oder fügt auf dem
    /// nächsten Segment einen ein. Mit Shift kein Drag (Löschgeste).
    pub fn pointer_down(&mut self, map: &mut FeatureMap, event: &PointerEvent, tolerance: f64) -> bool {
        if event.modifiers.shift {
            return false;
        }
        let coordinate = event.coordinate;

        if let Some((feature, vertex)) = self.nearest_vertex(map, coordinate, tolerance) {
            let Some(original) = map.feature(&feature).cloned() else {
                return false;
            };
            self.drag = Some(VertexDrag {
                feature,
                vertex,
                original,
            });
            return true;
        }

        let Some((feature, after, foot)) = self.nearest_segment(map, coordinate, tolerance) else {
            return false;
        };
        let Some(live) = map.feature_mut(&feature) else {
            return false;
        };
        let original = live.clone();
        if !live.geometry.insert_vertex(after, foot) {
            return false;
        }
        self.drag = Some(VertexDrag {
            feature,
            vertex: VertexRef {
                path: after.path,
                index: after.index + 1,
            },
            original,
        });
        true
    }

    pub fn pointer_drag(&mut self, map: &mut FeatureMap, event: &PointerEvent) {
        let Some(drag) = &self.drag else {
            return;
        };
        if let Some(feature) = map.feature_mut(&drag.feature) {
            feature.geometry.move_vertex(drag.vertex, event.coordinate);
        }
    }

    /// Zeiger losgelassen: liefert das Feature vor der Geste, falls sich die
    /// Geometrie geändert hat.
    pub fn pointer_up(&mut self, map: &FeatureMap) -> Option<Feature> {
        let drag = self.drag.take()?;
        let live = map.feature(&drag.feature)?;
        (live.geometry != drag.original.geometry).then_some(drag.original)
    }

    /// Shift+Klick auf einen Stützpunkt löscht ihn. Liefert das Feature vor der Änderung.
    pub fn click(&mut self, map: &mut FeatureMap, event: &PointerEvent, tolerance: f64) -> Option<Feature> {
        if !event.modifiers.shift {
            return None;
        }
        let (id, vertex) = self.nearest_vertex(map, event.coordinate, tolerance)?;
        let live = map.feature_mut(&id)?;
        let original = live.clone();
        if !live.geometry.remove_vertex(vertex) {
            log::debug!("Stützpunkt von {} kann nicht entfernt werden", id);
            return None;
        }
        Some(original)
    }

    fn nearest_vertex(
        &self,
        map: &FeatureMap,
        coordinate: DVec2,
        tolerance: f64,
    ) -> Option<(FeatureId, VertexRef)> {
        self.targets
            .iter()
            .filter_map(|id| {
                let (vertex, distance) = map.feature(id)?.geometry.nearest_vertex(coordinate)?;
                (distance <= tolerance).then(|| (id.clone(), vertex, distance))
            })
            .min_by(|a, b| a.2.total_cmp(&b.2))
            .map(|(id, vertex, _)| (id, vertex))
    }

    fn nearest_segment(
        &self,
        map: &FeatureMap,
        coordinate: DVec2,
        tolerance: f64,
    ) -> Option<(FeatureId, VertexRef, DVec2)> {
        self.targets
            .iter()
            .filter_map(|id| {
                let (after, distance, foot) =
                    map.feature(id)?.geometry.nearest_segment(coordinate)?;
                (distance <= tolerance).then(|| (id.clone(), after, foot, distance))
            })
            .min_by(|a, b| a.3.total_cmp(&b.3))
            .map(|(id, after, foot, _)| (id, after, foot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Geometry, Layer, Modifiers};

    fn setup() -> (FeatureMap, FeatureId) {
        let mut map = FeatureMap::default();
        map.add_layer(Layer::new("editor"));
        let id = FeatureId::new("editor", -1);
        map.insert_feature(
            Feature::new(Geometry::LineString(vec![
                DVec2::ZERO,
                DVec2::new(10.0, 0.0),
                DVec2::new(20.0, 0.0),
            ]))
            .with_id(id.clone()),
        );
        (map, id)
    }

    fn ev(coordinate: DVec2) -> PointerEvent {
        PointerEvent::new(DVec2::ZERO, coordinate)
    }

    fn line(map: &FeatureMap, id: &FeatureId) -> Vec<DVec2> {
        map.feature(id).map(|f| f.geometry.coordinates()).unwrap_or_default()
    }

    #[test]
    fn drag_vertex_reports_original() {
        let (mut map, id) = setup();
        let mut tool = ModifyTool::new(vec![id.clone()]);
        assert!(tool.pointer_down(&mut map, &ev(DVec2::new(10.5, 0.0)), 1.0));
        tool.pointer_drag(&mut map, &ev(DVec2::new(10.0, 5.0)));
        let original = tool.pointer_up(&map).expect("geändert");

        assert_eq!(original.geometry.coordinates()[1], DVec2::new(10.0, 0.0));
        assert_eq!(line(&map, &id)[1], DVec2::new(10.0, 5.0));
    }

    #[test]
    fn press_on_segment_inserts_vertex() {
        let (mut map, id) = setup();
        let mut tool = ModifyTool::new(vec![id.clone()]);
        assert!(tool.pointer_down(&mut map, &ev(DVec2::new(5.0, 0.5)), 1.0));
        assert!(tool.pointer_up(&map).is_some());
        assert_eq!(line(&map, &id)[1], DVec2::new(5.0, 0.0));
        assert_eq!(line(&map, &id).len(), 4);
    }

    #[test]
    fn release_without_change_commits_nothing() {
        let (mut map, id) = setup();
        let mut tool = ModifyTool::new(vec![id]);
        assert!(tool.pointer_down(&mut map, &ev(DVec2::new(20.0, 0.0)), 1.0));
        assert!(tool.pointer_up(&map).is_none());
    }

    #[test]
    fn shift_click_deletes_vertex_but_keeps_line_valid() {
        let (mut map, id) = setup();
        let mut tool = ModifyTool::new(vec![id.clone()]);
        let shift = ev(DVec2::new(10.0, 0.0)).with_modifiers(Modifiers::SHIFT);
        assert!(!tool.pointer_down(&mut map, &shift, 1.0));
        assert!(tool.click(&mut map, &shift, 1.0).is_some());
        assert_eq!(line(&map, &id).len(), 2);

        let again = ev(DVec2::ZERO).with_modifiers(Modifiers::SHIFT);
        assert!(tool.click(&mut map, &again, 1.0).is_none());
    }

    #[test]
    fn non_targets_are_ignored() {
        let (mut map, _) = setup();
        let mut tool = ModifyTool::new(vec![FeatureId::new("editor", -9)]);
        assert!(!tool.pointer_down(&mut map, &ev(DVec2::ZERO), 1.0));
    }
}

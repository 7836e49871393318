//! Transform-Interaktion: Zeiger-Zustandsautomat `Idle → Dragging(mode) → Idle`
//! für ein aktives Feature.
//!
//! Die Live-Geometrie gehört dem Feature in der `FeatureMap`. Die Interaktion
//! hält nur die Identität plus einen eigenen Snapshot vom Drag-Start.

pub mod drag;
pub mod handles;

use glam::DVec2;

use super::events::EventBus;
use crate::core::{Extent, FeatureId, FeatureMap, Geometry, PointerEvent};
use crate::shared::options::TransformOptions;

pub use handles::{AxisConstraint, CursorHint, Handle, HandleKind};

/// Drag-Modus einer Geste
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformMode {
    Translate,
    Rotate,
    Scale,
}

impl HandleKind {
    /// Drag-Modus, den das Handle startet.
    pub fn mode(&self) -> TransformMode {
        match self {
            HandleKind::Scale { .. } | HandleKind::Stretch { .. } => TransformMode::Scale,
            HandleKind::Rotate => TransformMode::Rotate,
            HandleKind::Translate => TransformMode::Translate,
        }
    }
}

/// Events der Transform-Interaktion
#[derive(Debug, Clone, PartialEq)]
pub enum TransformEvent {
    /// Aktives Feature gewechselt (`None` = keins)
    Select { feature: Option<FeatureId> },
    Start {
        mode: TransformMode,
        feature: FeatureId,
    },
    /// Inkrementeller Versatz seit dem letzten Drag-Event
    Translating { feature: FeatureId, delta: DVec2 },
    /// Gesamtwinkel seit Drag-Start (Radiant)
    Rotating { feature: FeatureId, angle: f64 },
    /// Gesamtfaktoren seit Drag-Start
    Scaling { feature: FeatureId, scale: DVec2 },
    /// Geste beendet; `old_geometry` ist der Stand vor dem Drag
    End {
        mode: TransformMode,
        feature: FeatureId,
        old_geometry: Geometry,
    },
}

/// Ergebnis einer abgeschlossenen Geste (für Commit in den Verlauf).
#[derive(Debug, Clone, PartialEq)]
pub struct DragOutcome {
    pub feature: FeatureId,
    pub mode: TransformMode,
    pub old_geometry: Geometry,
}

/// Zustand einer laufenden Geste.
#[derive(Debug, Clone)]
struct DragSession {
    feature: FeatureId,
    handle: HandleKind,
    start: DVec2,
    last: DVec2,
    start_geometry: Geometry,
    corners: [DVec2; 4],
    center: DVec2,
    /// Drehpunkt: Stützpunkt-Schwerpunkt, bleibt über mehrere Gesten stabil
    rotation_pivot: DVec2,
}

/// Zeiger-gesteuerte Manipulation eines Features über Handles.
#[derive(Debug)]
pub struct TransformInteraction {
    options: TransformOptions,
    active: bool,
    feature: Option<FeatureId>,
    is_point: bool,
    /// Erlaubte Layer; `None` = alle sichtbaren
    layers: Option<Vec<String>>,
    drag: Option<DragSession>,
    cursor: CursorHint,
    pub events: EventBus<TransformEvent>,
}

impl TransformInteraction {
    pub fn new(options: TransformOptions) -> Self {
        Self {
            options,
            active: false,
            feature: None,
            is_point: false,
            layers: None,
            drag: None,
            cursor: CursorHint::Default,
            events: EventBus::new(),
        }
    }

    /// Builder: beschränkt die greifbaren Features auf bestimmte Layer.
    pub fn with_layers(mut self, layers: Vec<String>) -> Self {
        self.layers = Some(layers);
        self
    }

    pub fn options(&self) -> &TransformOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: TransformOptions) {
        self.options = options;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Aktiviert (ohne aktives Feature) oder deaktiviert die Interaktion.
    pub fn set_active(&mut self, map: &FeatureMap, active: bool) {
        self.active = active;
        self.drag = None;
        self.cursor = CursorHint::Default;
        if active {
            self.select(map, None);
        } else {
            self.feature = None;
            self.is_point = false;
        }
    }

    pub fn active_feature(&self) -> Option<&FeatureId> {
        self.feature.as_ref()
    }

    /// Setzt das aktive Feature und meldet `Select`.
    pub fn select(&mut self, map: &FeatureMap, feature: Option<FeatureId>) {
        self.is_point = feature
            .as_ref()
            .and_then(|id| map.feature(id))
            .is_some_and(|f| f.geometry.is_point());
        self.feature = feature.clone();
        self.events.emit(&TransformEvent::Select { feature });
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn mode(&self) -> Option<TransformMode> {
        self.drag.as_ref().map(|d| d.handle.mode())
    }

    /// Letzter Cursor-Hinweis aus `pointer_move`.
    pub fn cursor(&self) -> CursorHint {
        self.cursor
    }

    /// Handles des aktiven Features bei der aktuellen Ansicht.
    pub fn handles(&self, map: &FeatureMap) -> Vec<Handle> {
        let Some(feature) = self.feature.as_ref().and_then(|id| map.feature(id)) else {
            return Vec::new();
        };
        let margin = map
            .view
            .pixels_to_map_units(self.options.point_handle_margin_px);
        handles::generate_handles(&feature.geometry, &self.options, margin)
    }

    /// Handle-Box des aktiven Features (für die Skizze des Hosts).
    pub fn handle_box(&self, map: &FeatureMap) -> Option<Extent> {
        let feature = map.feature(self.feature.as_ref()?)?;
        let margin = map
            .view
            .pixels_to_map_units(self.options.point_handle_margin_px);
        Some(handles::handle_box(&feature.geometry, margin))
    }

    /// Zeiger gedrückt. `true` wenn eine Geste startet.
    ///
    /// Ohne Handle-Treffer wird das Feature unter dem Zeiger (oder keins)
    /// zum aktiven Feature.
    pub fn pointer_down(&mut self, map: &FeatureMap, event: &PointerEvent) -> bool {
        if !self.active {
            return false;
        }
        let tolerance = map.view.pixels_to_map_units(self.options.handle_tolerance_px);
        let mut kind = handles::handle_at(&self.handles(map), event.coordinate, tolerance)
            .map(|h| h.kind);
        let hit = self.feature_at(map, event.pixel);

        let drags_feature =
            (self.is_point && self.options.translate) || self.options.translate_feature;
        if kind.is_none() && hit.is_some() && hit == self.feature && drags_feature {
            kind = Some(HandleKind::Translate);
        }

        let Some(kind) = kind else {
            self.select(map, hit);
            return false;
        };
        let Some((id, geometry)) = self
            .feature
            .as_ref()
            .and_then(|id| Some((id.clone(), map.feature(id)?.geometry.clone())))
        else {
            return false;
        };

        let extent = geometry.extent();
        let session = DragSession {
            feature: id.clone(),
            handle: kind,
            start: event.coordinate,
            last: event.coordinate,
            corners: extent.corners(),
            center: extent.center(),
            rotation_pivot: geometry.vertex_centroid().unwrap_or(extent.center()),
            start_geometry: geometry,
        };
        log::debug!("Transform-Start {:?} auf {}", kind.mode(), id);
        self.drag = Some(session);
        self.events.emit(&TransformEvent::Start {
            mode: kind.mode(),
            feature: id,
        });
        true
    }

    /// Zeiger gezogen. Ohne laufende Geste ein No-op.
    pub fn pointer_drag(&mut self, map: &mut FeatureMap, event: &PointerEvent) {
        let Some(drag) = self.drag.as_mut() else {
            return;
        };
        let Some(feature) = map.feature_mut(&drag.feature) else {
            return;
        };

        let emitted = match drag.handle {
            HandleKind::Translate => {
                let delta = event.coordinate - drag.last;
                feature.geometry.translate(delta);
                drag.last = event.coordinate;
                TransformEvent::Translating {
                    feature: drag.feature.clone(),
                    delta,
                }
            }
            HandleKind::Rotate => {
                let pivot = drag.rotation_pivot;
                let angle = drag::rotation_angle(pivot, drag.start, event.coordinate);
                // Punkte drehen sich nicht, das Event kommt trotzdem
                if !self.is_point {
                    feature.geometry = drag.start_geometry.rotated(angle, pivot);
                }
                TransformEvent::Rotating {
                    feature: drag.feature.clone(),
                    angle,
                }
            }
            HandleKind::Scale { corner: index } | HandleKind::Stretch { edge: index, .. } => {
                let pivot = if event.modifiers.ctrl_or_meta() {
                    drag.corners[(index + 2) % 4]
                } else {
                    drag.center
                };
                let constraint = match drag.handle {
                    HandleKind::Stretch { constraint, .. } => Some(constraint),
                    _ => None,
                };
                let keep = self.options.keep_aspect_ratio.evaluate(&event.modifiers);
                let scale =
                    drag::scale_factors(pivot, drag.start, event.coordinate, constraint, keep);
                feature.geometry = drag.start_geometry.scaled(scale.x, scale.y, pivot);
                TransformEvent::Scaling {
                    feature: drag.feature.clone(),
                    scale,
                }
            }
        };
        self.events.emit(&emitted);
    }

    /// Zeiger losgelassen. Liefert das Ergebnis, wenn eine Geste lief.
    pub fn pointer_up(&mut self) -> Option<DragOutcome> {
        let drag = self.drag.take()?;
        let outcome = DragOutcome {
            feature: drag.feature,
            mode: drag.handle.mode(),
            old_geometry: drag.start_geometry,
        };
        log::debug!("Transform-Ende {:?} auf {}", outcome.mode, outcome.feature);
        self.events.emit(&TransformEvent::End {
            mode: outcome.mode,
            feature: outcome.feature.clone(),
            old_geometry: outcome.old_geometry.clone(),
        });
        Some(outcome)
    }

    /// Hover ohne Geste: aktualisiert den Cursor-Hinweis.
    pub fn pointer_move(&mut self, map: &FeatureMap, event: &PointerEvent) -> CursorHint {
        if !self.active || self.drag.is_some() {
            return self.cursor;
        }
        let tolerance = map.view.pixels_to_map_units(self.options.handle_tolerance_px);
        self.cursor = match handles::handle_at(&self.handles(map), event.coordinate, tolerance) {
            Some(handle) => handle.kind.cursor(),
            None if self.feature_at(map, event.pixel).is_some() => CursorHint::Pointer,
            None => CursorHint::Default,
        };
        self.cursor
    }

    fn feature_at(&self, map: &FeatureMap, pixel: DVec2) -> Option<FeatureId> {
        map.features_at_pixel(pixel, self.options.handle_tolerance_px)
            .into_iter()
            .find(|id| {
                self.layers
                    .as_ref()
                    .is_none_or(|layers| layers.iter().any(|l| *l == id.layer))
            })
    }
}

impl Default for TransformInteraction {
    fn default() -> Self {
        Self::new(TransformOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Feature, Layer, MapView, Modifiers};
    use approx::assert_relative_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Ansicht 1:1, Pixel (50,50) = Karte (0,0).
    fn map_with(geometry: Geometry) -> (FeatureMap, FeatureId) {
        let mut map = FeatureMap::new(MapView::new(DVec2::ZERO, 1.0, DVec2::new(100.0, 100.0)));
        map.add_layer(Layer::new("a"));
        let id = FeatureId::new("a", 1);
        map.insert_feature(Feature::new(geometry).with_id(id.clone()));
        (map, id)
    }

    fn at(map: &FeatureMap, coordinate: DVec2) -> PointerEvent {
        PointerEvent::new(map.view.map_to_pixel(coordinate), coordinate)
    }

    fn square() -> Geometry {
        Geometry::polygon_from_extent(&Extent::from_corners(
            DVec2::new(-10.0, -10.0),
            DVec2::new(10.0, 10.0),
        ))
    }

    fn active(map: &FeatureMap, id: &FeatureId, options: TransformOptions) -> TransformInteraction {
        let mut t = TransformInteraction::new(options);
        t.set_active(map, true);
        t.select(map, Some(id.clone()));
        t
    }

    #[test]
    fn click_on_feature_selects_it() {
        let (map, id) = map_with(square());
        let mut t = TransformInteraction::default();
        t.set_active(&map, true);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        t.events.subscribe(move |e| sink.borrow_mut().push(e.clone()));

        assert!(!t.pointer_down(&map, &at(&map, DVec2::ZERO)));
        assert_eq!(t.active_feature(), Some(&id));
        assert_eq!(
            *seen.borrow(),
            vec![TransformEvent::Select {
                feature: Some(id.clone())
            }]
        );
    }

    #[test]
    fn translate_feature_moves_incrementally() {
        let (mut map, id) = map_with(square());
        let mut t = active(&map, &id, TransformOptions::default());

        assert!(t.pointer_down(&map, &at(&map, DVec2::ZERO)));
        let event = at(&map, DVec2::new(2.0, 0.0));
        t.pointer_drag(&mut map, &event);
        let event = at(&map, DVec2::new(5.0, 1.0));
        t.pointer_drag(&mut map, &event);
        let outcome = t.pointer_up().expect("Geste lief");

        assert_eq!(outcome.mode, TransformMode::Translate);
        assert_eq!(outcome.old_geometry, square());
        let extent = map.feature(&id).map(|f| f.geometry.extent()).expect("Feature");
        assert_eq!(extent.min, DVec2::new(-5.0, -9.0));
    }

    #[test]
    fn rotation_round_trip_restores_geometry() {
        let (mut map, id) = map_with(square());
        let mut t = active(&map, &id, TransformOptions::default());
        // Rotate-Handle an Ecke 3 = (10,-10)
        assert!(t.pointer_down(&map, &at(&map, DVec2::new(10.0, -10.0))));
        assert_eq!(t.mode(), Some(TransformMode::Rotate));
        let event = at(&map, DVec2::new(10.0, 10.0));
        t.pointer_drag(&mut map, &event);
        let event = at(&map, DVec2::new(10.0, -10.0));
        t.pointer_drag(&mut map, &event);
        t.pointer_up();

        let coords = map.feature(&id).map(|f| f.geometry.coordinates()).expect("Feature");
        for (a, b) in coords.iter().zip(square().coordinates()) {
            assert_relative_eq!(a.x, b.x, epsilon = 1e-9);
            assert_relative_eq!(a.y, b.y, epsilon = 1e-9);
        }
    }

    #[test]
    fn stretch_horizontal_never_changes_y() {
        let (mut map, id) = map_with(square());
        let mut t = active(&map, &id, TransformOptions::default());
        // Kante 0 (links) bei (-10, 0)
        assert!(t.pointer_down(&map, &at(&map, DVec2::new(-10.0, 0.0))));
        let event = at(&map, DVec2::new(-20.0, 7.0)).with_modifiers(Modifiers::SHIFT);
        t.pointer_drag(&mut map, &event);
        t.pointer_up();

        let before: Vec<f64> = square().coordinates().iter().map(|c| c.y).collect();
        let after: Vec<f64> = map
            .feature(&id)
            .map(|f| f.geometry.coordinates().iter().map(|c| c.y).collect())
            .expect("Feature");
        assert_eq!(before, after);
        let extent = map.feature(&id).map(|f| f.geometry.extent()).expect("Feature");
        assert_relative_eq!(extent.width(), 40.0);
    }

    #[test]
    fn ctrl_scales_around_opposite_corner() {
        let (mut map, id) = map_with(square());
        let mut t = active(&map, &id, TransformOptions::default());
        // Ecke 2 = (10,10), Pivot Ecke 0 = (-10,-10)
        assert!(t.pointer_down(&map, &at(&map, DVec2::new(10.0, 10.0))));
        let event = at(&map, DVec2::new(30.0, 30.0)).with_modifiers(Modifiers::CTRL);
        t.pointer_drag(&mut map, &event);
        t.pointer_up();

        let extent = map.feature(&id).map(|f| f.geometry.extent()).expect("Feature");
        assert_eq!(extent.min, DVec2::new(-10.0, -10.0));
        assert_eq!(extent.max, DVec2::new(30.0, 30.0));
    }

    #[test]
    fn rotating_a_point_keeps_geometry() {
        let (mut map, id) = map_with(Geometry::Point(DVec2::ZERO));
        let mut t = active(&map, &id, TransformOptions::default());
        // Punkt-Box ±10 px, Rotate-Handle bei (10,-10)
        assert_eq!(t.handles(&map).len(), 1);
        assert!(t.pointer_down(&map, &at(&map, DVec2::new(10.0, -10.0))));
        let event = at(&map, DVec2::new(-10.0, 10.0));
        t.pointer_drag(&mut map, &event);
        t.pointer_up();
        assert_eq!(
            map.feature(&id).map(|f| f.geometry.clone()),
            Some(Geometry::Point(DVec2::ZERO))
        );
    }

    #[test]
    fn release_without_drag_emits_nothing() {
        let (map, _) = map_with(square());
        let mut t = TransformInteraction::default();
        t.set_active(&map, true);
        let count = Rc::new(RefCell::new(0));
        let c = Rc::clone(&count);
        t.events.subscribe(move |_| *c.borrow_mut() += 1);
        assert!(t.pointer_up().is_none());
        assert_eq!(*count.borrow(), 0);
    }

    #[test]
    fn hover_reports_cursor_hints() {
        let (map, id) = map_with(square());
        let mut t = active(&map, &id, TransformOptions::default());
        assert_eq!(
            t.pointer_move(&map, &at(&map, DVec2::new(-10.0, -10.0))),
            CursorHint::NeResize
        );
        assert_eq!(
            t.pointer_move(&map, &at(&map, DVec2::new(0.0, 10.0))),
            CursorHint::NResize
        );
        assert_eq!(t.pointer_move(&map, &at(&map, DVec2::ZERO)), CursorHint::Pointer);
        assert_eq!(
            t.pointer_move(&map, &at(&map, DVec2::new(40.0, 40.0))),
            CursorHint::Default
        );
    }
}

//! Zeichen-Werkzeug: sammelt Stützpunkte per Klick und erzeugt eine Geometrie.
//!
//! Klicks rasten auf vorhandene Stützpunkte des Ziel-Layers ein (Fangradius
//! in Pixeln, über die Ansicht in Karteneinheiten umgerechnet).

use glam::DVec2;

use crate::core::{FeatureMap, Geometry, GeometryKind, VertexIndex};
use crate::shared::SketchPreview;

/// Anker eines Klicks: eingerastet oder freie Position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ToolAnchor {
    /// Auf vorhandenen Stützpunkt eingerastet
    Snapped(DVec2),
    Free(DVec2),
}

impl ToolAnchor {
    pub fn position(&self) -> DVec2 {
        match self {
            ToolAnchor::Snapped(pos) | ToolAnchor::Free(pos) => *pos,
        }
    }
}

/// Rückgabe eines Klicks, steuert den Zeichen-Flow.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolAction {
    /// Punkt registriert, weitere Eingabe nötig
    Continue,
    /// Skizze abgeschlossen
    Finished(Geometry),
}

/// Zeichnet ein Feature eines Geometrie-Typs in einen Layer.
#[derive(Debug, Clone)]
pub struct DrawTool {
    kind: GeometryKind,
    layer: String,
    vertices: Vec<DVec2>,
    snap_index: VertexIndex,
}

impl DrawTool {
    /// Erstellt das Werkzeug und indiziert die Stützpunkte des Ziel-Layers.
    pub fn new(kind: GeometryKind, layer: impl Into<String>, map: &FeatureMap) -> Self {
        let mut tool = Self {
            kind,
            layer: layer.into(),
            vertices: Vec::new(),
            snap_index: VertexIndex::default(),
        };
        tool.refresh_snap_index(map);
        tool
    }

    pub fn kind(&self) -> GeometryKind {
        self.kind
    }

    pub fn layer(&self) -> &str {
        &self.layer
    }

    /// Baut den Fang-Index aus dem Ziel-Layer neu auf.
    pub fn refresh_snap_index(&mut self, map: &FeatureMap) {
        let points = map
            .layer(&self.layer)
            .into_iter()
            .flat_map(|layer| layer.source.features())
            .flat_map(|feature| feature.geometry.coordinates());
        self.snap_index = VertexIndex::from_points(points);
        log::debug!(
            "Fang-Index für '{}': {} Stützpunkte",
            self.layer,
            self.snap_index.len()
        );
    }

    /// Rastet auf den nächsten Stützpunkt innerhalb `tolerance` ein.
    pub fn snap(&self, coordinate: DVec2, tolerance: f64) -> ToolAnchor {
        match self.snap_index.nearest_within(coordinate, tolerance) {
            Some(hit) => ToolAnchor::Snapped(hit.position),
            None => ToolAnchor::Free(coordinate),
        }
    }

    /// Einzelklick.
    ///
    /// Punkte sind sofort fertig. Ein Polygon schließt sich, wenn der Klick
    /// auf den ersten Stützpunkt fällt.
    pub fn on_click(&mut self, coordinate: DVec2, tolerance: f64) -> ToolAction {
        let position = self.snap(coordinate, tolerance).position();
        match self.kind {
            GeometryKind::Point | GeometryKind::MultiPoint => {
                self.vertices = vec![position];
                self.finish().map_or(ToolAction::Continue, ToolAction::Finished)
            }
            GeometryKind::Polygon | GeometryKind::MultiPolygon
                if self.vertices.len() >= 3
                    && self
                        .vertices
                        .first()
                        .is_some_and(|first| first.distance(coordinate) <= tolerance) =>
            {
                self.finish().map_or(ToolAction::Continue, ToolAction::Finished)
            }
            _ => {
                self.vertices.push(position);
                ToolAction::Continue
            }
        }
    }

    /// Doppelklick: letzten Punkt setzen und abschließen, falls genug Punkte da sind.
    pub fn on_double_click(&mut self, coordinate: DVec2, tolerance: f64) -> ToolAction {
        let position = self.snap(coordinate, tolerance).position();
        let duplicate = self
            .vertices
            .last()
            .is_some_and(|last| last.distance(position) <= tolerance);
        if !duplicate {
            return match self.on_click(coordinate, tolerance) {
                ToolAction::Continue => {
                    self.finish().map_or(ToolAction::Continue, ToolAction::Finished)
                }
                finished => finished,
            };
        }
        self.finish().map_or(ToolAction::Continue, ToolAction::Finished)
    }

    /// Schließt die Skizze ab. `None` (Skizze bleibt) bei zu wenigen Punkten.
    pub fn finish(&mut self) -> Option<Geometry> {
        let geometry = match self.kind {
            GeometryKind::Point => Geometry::Point(*self.vertices.first()?),
            GeometryKind::MultiPoint => Geometry::MultiPoint(vec![*self.vertices.first()?]),
            GeometryKind::LineString | GeometryKind::MultiLineString => {
                if self.vertices.len() < 2 {
                    return None;
                }
                let line = self.vertices.clone();
                if self.kind == GeometryKind::LineString {
                    Geometry::LineString(line)
                } else {
                    Geometry::MultiLineString(vec![line])
                }
            }
            GeometryKind::Polygon | GeometryKind::MultiPolygon => {
                if self.vertices.len() < 3 {
                    return None;
                }
                let mut ring = self.vertices.clone();
                ring.push(ring[0]);
                if self.kind == GeometryKind::Polygon {
                    Geometry::Polygon(vec![ring])
                } else {
                    Geometry::MultiPolygon(vec![vec![ring]])
                }
            }
        };
        self.vertices.clear();
        Some(geometry)
    }

    /// Entfernt den zuletzt gesetzten Punkt. `false` wenn die Skizze leer ist.
    pub fn remove_last_point(&mut self) -> bool {
        self.vertices.pop().is_some()
    }

    /// Hat das Werkzeug angefangene Eingaben?
    pub fn has_pending_input(&self) -> bool {
        !self.vertices.is_empty()
    }

    pub fn vertices(&self) -> &[DVec2] {
        &self.vertices
    }

    /// Skizze inklusive Zeigerposition.
    pub fn preview(&self, cursor: Option<DVec2>) -> SketchPreview {
        let mut vertices = self.vertices.clone();
        vertices.extend(cursor);
        SketchPreview {
            closed: matches!(
                self.kind,
                GeometryKind::Polygon | GeometryKind::MultiPolygon
            ) && vertices.len() >= 3,
            vertices,
        }
    }

    /// Verwirft die Skizze.
    pub fn reset(&mut self) {
        self.vertices.clear();
    }
}

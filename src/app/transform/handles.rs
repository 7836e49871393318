//! Handles der Transform-Interaktion: Erzeugung, Hit-Test und Cursor-Hinweise.

use glam::DVec2;

use crate::core::{Extent, Geometry};
use crate::shared::options::TransformOptions;

/// Achsenbeschränkung eines Kanten-Handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisConstraint {
    /// Nur X skaliert, Y-Faktor bleibt 1 (linke/rechte Kante)
    Horizontal,
    /// Nur Y skaliert, X-Faktor bleibt 1 (obere/untere Kante)
    Vertical,
}

impl AxisConstraint {
    /// Beschränkung aus dem Kantenindex: gerade = linke/rechte Kante.
    pub fn from_edge_index(index: usize) -> Self {
        if index % 2 == 0 {
            AxisConstraint::Horizontal
        } else {
            AxisConstraint::Vertical
        }
    }
}

/// Art eines Handles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleKind {
    /// Eck-Handle, `corner` indiziert `Extent::corners()`
    Scale { corner: usize },
    /// Kanten-Handle zwischen `corners()[edge]` und `corners()[edge + 1]`
    Stretch {
        edge: usize,
        constraint: AxisConstraint,
    },
    Rotate,
    Translate,
}

/// Ein greifbarer Punkt in Kartenkoordinaten.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    pub kind: HandleKind,
    pub position: DVec2,
}

/// Cursor-Hinweis für den Host beim Hover
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorHint {
    #[default]
    Default,
    /// Über einem Feature ohne Handle
    Pointer,
    Move,
    NeResize,
    NwResize,
    EResize,
    NResize,
}

impl HandleKind {
    /// Cursor-Hinweis für dieses Handle.
    pub fn cursor(&self) -> CursorHint {
        match self {
            HandleKind::Scale { corner } if corner % 2 == 0 => CursorHint::NeResize,
            HandleKind::Scale { .. } => CursorHint::NwResize,
            HandleKind::Stretch {
                constraint: AxisConstraint::Horizontal,
                ..
            } => CursorHint::EResize,
            HandleKind::Stretch {
                constraint: AxisConstraint::Vertical,
                ..
            } => CursorHint::NResize,
            HandleKind::Rotate | HandleKind::Translate => CursorHint::Move,
        }
    }
}

/// Box, an der die Handles hängen.
///
/// Punkte haben keine Ausdehnung und bekommen eine Box von `±point_margin`
/// Karteneinheiten.
pub fn handle_box(geometry: &Geometry, point_margin: f64) -> Extent {
    let extent = geometry.extent();
    if geometry.is_point() {
        Extent::around(extent.min, point_margin)
    } else {
        extent
    }
}

/// Erzeugt die Handles für die Geometrie gemäß den Optionen.
pub fn generate_handles(
    geometry: &Geometry,
    options: &TransformOptions,
    point_margin: f64,
) -> Vec<Handle> {
    let bbox = handle_box(geometry, point_margin);
    if bbox.is_empty() {
        return Vec::new();
    }
    let corners = bbox.corners();
    let mut handles = Vec::with_capacity(10);

    if !geometry.is_point() {
        if options.stretch && options.scale {
            for edge in 0..4 {
                handles.push(Handle {
                    kind: HandleKind::Stretch {
                        edge,
                        constraint: AxisConstraint::from_edge_index(edge),
                    },
                    position: edge_midpoint(&corners, edge),
                });
            }
        }
        if options.scale {
            for (corner, position) in corners.iter().enumerate() {
                handles.push(Handle {
                    kind: HandleKind::Scale { corner },
                    position: *position,
                });
            }
        }
        if options.translate && !options.translate_feature {
            handles.push(Handle {
                kind: HandleKind::Translate,
                position: bbox.center(),
            });
        }
    }
    if options.rotate {
        handles.push(Handle {
            kind: HandleKind::Rotate,
            position: corners[3],
        });
    }
    handles
}

/// Mittelpunkt der Kante `edge` (zwischen Ecke `edge` und `edge + 1`).
pub fn edge_midpoint(corners: &[DVec2; 4], edge: usize) -> DVec2 {
    (corners[edge % 4] + corners[(edge + 1) % 4]) * 0.5
}

/// Oberstes Handle innerhalb der Toleranz (zuletzt erzeugtes gewinnt).
pub fn handle_at(handles: &[Handle], coordinate: DVec2, tolerance: f64) -> Option<&Handle> {
    handles
        .iter()
        .rev()
        .filter(|h| h.position.distance(coordinate) <= tolerance)
        .min_by(|a, b| {
            a.position
                .distance(coordinate)
                .total_cmp(&b.position.distance(coordinate))
        })
}

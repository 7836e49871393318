//! Wertsemantische Geometrien und Extents in Kartenkoordinaten.
//!
//! Geometrien werden nie geteilt: jeder Klon ist eine eigenständige Kopie.
//! Rotation und Skalierung liefern neue Geometrien, damit Drag-Gesten immer
//! vom unveränderten Start-Snapshot aus rechnen können.

use glam::{DAffine2, DVec2};
use serde::{Deserialize, Serialize};

/// Geometrie-Typ eines Features
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeometryKind {
    /// Einzelpunkt
    Point,
    /// Linienzug
    LineString,
    /// Polygon mit Außenring und optionalen Löchern
    Polygon,
    /// Mehrere Punkte
    MultiPoint,
    /// Mehrere Linienzüge
    MultiLineString,
    /// Mehrere Polygone
    MultiPolygon,
}

/// Achsen-alignierter Ausschnitt in Kartenkoordinaten.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    /// Untere linke Ecke
    pub min: DVec2,
    /// Obere rechte Ecke
    pub max: DVec2,
}

impl Extent {
    /// Leerer Extent (neutral für `extend`).
    pub fn empty() -> Self {
        Self {
            min: DVec2::splat(f64::INFINITY),
            max: DVec2::splat(f64::NEG_INFINITY),
        }
    }

    /// Baut den Extent aus zwei beliebigen Eckpunkten.
    pub fn from_corners(a: DVec2, b: DVec2) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Extent um einen Punkt mit halber Kantenlänge `half`.
    pub fn around(center: DVec2, half: f64) -> Self {
        Self {
            min: center - DVec2::splat(half),
            max: center + DVec2::splat(half),
        }
    }

    /// Gibt `true` zurück, wenn der Extent keine Fläche und keinen Punkt enthält.
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    /// Erweitert den Extent um einen Punkt.
    pub fn extend_point(&mut self, p: DVec2) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    /// Erweitert den Extent um einen anderen Extent.
    pub fn extend(&mut self, other: &Extent) {
        if other.is_empty() {
            return;
        }
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }

    pub fn center(&self) -> DVec2 {
        (self.min + self.max) * 0.5
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Halbe Diagonale (Radius des umschließenden Kreises).
    pub fn half_diagonal(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        (self.max - self.min).length() * 0.5
    }

    /// Prüft ob sich zwei Extents berühren oder überlappen (inkl. Rand).
    pub fn intersects(&self, other: &Extent) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    /// Prüft ob ein Punkt im Extent liegt (inkl. Rand).
    pub fn contains_point(&self, p: DVec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Vergrößert den Extent in alle Richtungen um `amount`.
    pub fn buffered(&self, amount: f64) -> Self {
        Self {
            min: self.min - DVec2::splat(amount),
            max: self.max + DVec2::splat(amount),
        }
    }

    /// Die vier Ecken in Ring-Reihenfolge:
    /// `[min.x,min.y]`, `[min.x,max.y]`, `[max.x,max.y]`, `[max.x,min.y]`.
    ///
    /// Die Reihenfolge bestimmt Handle-Indizes und die Gegenecke `(i + 2) % 4`.
    pub fn corners(&self) -> [DVec2; 4] {
        [
            self.min,
            DVec2::new(self.min.x, self.max.y),
            self.max,
            DVec2::new(self.max.x, self.min.y),
        ]
    }
}

impl Default for Extent {
    fn default() -> Self {
        Self::empty()
    }
}

/// Verweis auf einen Stützpunkt: Pfad-Index (Ring/Teil) + Position im Pfad.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexRef {
    /// Index des Pfads in kanonischer Reihenfolge (siehe [`Geometry::paths`])
    pub path: usize,
    /// Index des Stützpunkts im Pfad
    pub index: usize,
}

/// Typisierte Geometrie eines Features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
    Point(DVec2),
    LineString(Vec<DVec2>),
    /// Ringe sind geschlossen (erster == letzter Punkt), Ring 0 ist der Außenring.
    Polygon(Vec<Vec<DVec2>>),
    MultiPoint(Vec<DVec2>),
    MultiLineString(Vec<Vec<DVec2>>),
    MultiPolygon(Vec<Vec<Vec<DVec2>>>),
}

impl Geometry {
    /// Rechteck-Polygon aus einem Extent (ein geschlossener Ring mit 5 Punkten).
    pub fn polygon_from_extent(extent: &Extent) -> Self {
        let c = extent.corners();
        Geometry::Polygon(vec![vec![c[0], c[1], c[2], c[3], c[0]]])
    }

    /// Gibt den Geometrie-Typ zurück.
    pub fn kind(&self) -> GeometryKind {
        match self {
            Geometry::Point(_) => GeometryKind::Point,
            Geometry::LineString(_) => GeometryKind::LineString,
            Geometry::Polygon(_) => GeometryKind::Polygon,
            Geometry::MultiPoint(_) => GeometryKind::MultiPoint,
            Geometry::MultiLineString(_) => GeometryKind::MultiLineString,
            Geometry::MultiPolygon(_) => GeometryKind::MultiPolygon,
        }
    }

    /// Nur echte Einzelpunkte zählen als Punktgeometrie (Handle-Box, Highlight-Reihenfolge).
    pub fn is_point(&self) -> bool {
        matches!(self, Geometry::Point(_))
    }

    /// Alle Pfade in kanonischer Reihenfolge mit Geschlossen-Flag.
    ///
    /// Punkte und Multi-Punkte liefern je einen Pfad der Länge 1,
    /// Polygone je Ring einen geschlossenen Pfad.
    pub fn paths(&self) -> Vec<(&[DVec2], bool)> {
        match self {
            Geometry::Point(p) => vec![(std::slice::from_ref(p), false)],
            Geometry::LineString(line) => vec![(line.as_slice(), false)],
            Geometry::Polygon(rings) => rings.iter().map(|r| (r.as_slice(), true)).collect(),
            Geometry::MultiPoint(points) => points
                .iter()
                .map(|p| (std::slice::from_ref(p), false))
                .collect(),
            Geometry::MultiLineString(lines) => {
                lines.iter().map(|l| (l.as_slice(), false)).collect()
            }
            Geometry::MultiPolygon(polygons) => polygons
                .iter()
                .flat_map(|rings| rings.iter().map(|r| (r.as_slice(), true)))
                .collect(),
        }
    }

    /// Alle Koordinaten (geschlossene Ringe inklusive Schlusspunkt).
    pub fn coordinates(&self) -> Vec<DVec2> {
        self.paths()
            .into_iter()
            .flat_map(|(path, _)| path.iter().copied())
            .collect()
    }

    /// Mittelwert der Stützpunkte, Schlusspunkte geschlossener Ringe zählen nicht doppelt.
    ///
    /// Bleibt unter Drehung um sich selbst fest (anders als die Box-Mitte).
    pub fn vertex_centroid(&self) -> Option<DVec2> {
        let mut sum = DVec2::ZERO;
        let mut count = 0usize;
        for (path, closed) in self.paths() {
            let open = match path {
                [first, .., last] if closed && first == last => &path[..path.len() - 1],
                _ => path,
            };
            sum += open.iter().copied().sum::<DVec2>();
            count += open.len();
        }
        (count > 0).then(|| sum / count as f64)
    }

    /// Anzahl aller gespeicherten Koordinaten.
    pub fn coordinate_count(&self) -> usize {
        self.paths().iter().map(|(path, _)| path.len()).sum()
    }

    /// Bounding-Box der Geometrie.
    pub fn extent(&self) -> Extent {
        let mut extent = Extent::empty();
        for (path, _) in self.paths() {
            for &p in path {
                extent.extend_point(p);
            }
        }
        extent
    }

    /// Wendet `f` auf jede Koordinate an (in-place).
    pub fn map_coords_in_place(&mut self, mut f: impl FnMut(DVec2) -> DVec2) {
        match self {
            Geometry::Point(p) => *p = f(*p),
            Geometry::LineString(line) | Geometry::MultiPoint(line) => {
                line.iter_mut().for_each(|p| *p = f(*p))
            }
            Geometry::Polygon(rings) | Geometry::MultiLineString(rings) => rings
                .iter_mut()
                .flat_map(|r| r.iter_mut())
                .for_each(|p| *p = f(*p)),
            Geometry::MultiPolygon(polygons) => polygons
                .iter_mut()
                .flat_map(|rings| rings.iter_mut())
                .flat_map(|r| r.iter_mut())
                .for_each(|p| *p = f(*p)),
        }
    }

    /// Verschiebt die Geometrie um `delta`.
    pub fn translate(&mut self, delta: DVec2) {
        if delta == DVec2::ZERO {
            return;
        }
        self.map_coords_in_place(|p| p + delta);
    }

    /// Liefert eine um `angle` (Radiant, gegen den Uhrzeigersinn) um `pivot` rotierte Kopie.
    pub fn rotated(&self, angle: f64, pivot: DVec2) -> Geometry {
        let transform = DAffine2::from_translation(pivot)
            * DAffine2::from_angle(angle)
            * DAffine2::from_translation(-pivot);
        let mut out = self.clone();
        out.map_coords_in_place(|p| transform.transform_point2(p));
        out
    }

    /// Liefert eine achsenweise um `pivot` skalierte Kopie.
    ///
    /// Eine Achse mit Faktor 1 wird nicht angefasst, ihre Koordinaten bleiben bitgenau erhalten.
    pub fn scaled(&self, sx: f64, sy: f64, pivot: DVec2) -> Geometry {
        let mut out = self.clone();
        out.map_coords_in_place(|p| {
            let mut q = p;
            if sx != 1.0 {
                q.x = pivot.x + (p.x - pivot.x) * sx;
            }
            if sy != 1.0 {
                q.y = pivot.y + (p.y - pivot.y) * sy;
            }
            q
        });
        out
    }

    /// Treffertest gegen einen Kartenpunkt mit Toleranz in Karteneinheiten.
    pub fn hit_test(&self, p: DVec2, tolerance: f64) -> bool {
        match self {
            Geometry::Polygon(rings) => polygon_hit(rings, p, tolerance),
            Geometry::MultiPolygon(polygons) => {
                polygons.iter().any(|rings| polygon_hit(rings, p, tolerance))
            }
            _ => self.paths().into_iter().any(|(path, _)| {
                if path.len() == 1 {
                    path[0].distance(p) <= tolerance
                } else {
                    path.windows(2)
                        .any(|s| point_segment_distance(p, s[0], s[1]) <= tolerance)
                }
            }),
        }
    }

    /// Prüft ob die Geometrie den Extent schneidet (exakt, nicht nur Bounding-Box).
    pub fn intersects_extent(&self, extent: &Extent) -> bool {
        if !self.extent().intersects(extent) {
            return false;
        }
        let path_hit = self.paths().into_iter().any(|(path, _)| {
            if path.len() == 1 {
                extent.contains_point(path[0])
            } else {
                path.windows(2)
                    .any(|s| segment_intersects_extent(s[0], s[1], extent))
            }
        });
        if path_hit {
            return true;
        }
        // Extent komplett innerhalb einer Fläche
        let sample = extent.center();
        match self {
            Geometry::Polygon(rings) => polygon_contains(rings, sample),
            Geometry::MultiPolygon(polygons) => {
                polygons.iter().any(|rings| polygon_contains(rings, sample))
            }
            _ => false,
        }
    }

    /// Nächster Stützpunkt zu `p` samt Distanz.
    ///
    /// Der Schlusspunkt geschlossener Ringe wird übersprungen (Duplikat von Index 0).
    pub fn nearest_vertex(&self, p: DVec2) -> Option<(VertexRef, f64)> {
        let mut best: Option<(VertexRef, f64)> = None;
        for (path_index, (path, closed)) in self.paths().into_iter().enumerate() {
            let count = if closed {
                path.len().saturating_sub(1)
            } else {
                path.len()
            };
            for (index, vertex) in path.iter().take(count).enumerate() {
                let distance = vertex.distance(p);
                if best.is_none_or(|(_, d)| distance < d) {
                    best = Some((
                        VertexRef {
                            path: path_index,
                            index,
                        },
                        distance,
                    ));
                }
            }
        }
        best
    }

    /// Nächstes Segment zu `p`: (Verweis auf Segment-Startpunkt, Distanz, Fußpunkt).
    pub fn nearest_segment(&self, p: DVec2) -> Option<(VertexRef, f64, DVec2)> {
        let mut best: Option<(VertexRef, f64, DVec2)> = None;
        for (path_index, (path, _)) in self.paths().into_iter().enumerate() {
            for (index, s) in path.windows(2).enumerate() {
                let foot = project_on_segment(p, s[0], s[1]);
                let distance = foot.distance(p);
                if best.is_none_or(|(_, d, _)| distance < d) {
                    best = Some((
                        VertexRef {
                            path: path_index,
                            index,
                        },
                        distance,
                        foot,
                    ));
                }
            }
        }
        best
    }

    /// Verschiebt einen Stützpunkt. Ringe bleiben geschlossen.
    pub fn move_vertex(&mut self, vertex: VertexRef, to: DVec2) -> bool {
        self.with_path_mut(vertex.path, |path, closed| {
            if vertex.index >= path.len() {
                return false;
            }
            path[vertex.index] = to;
            if closed {
                let last = path.len() - 1;
                if vertex.index == 0 {
                    path[last] = to;
                } else if vertex.index == last {
                    path[0] = to;
                }
            }
            true
        })
        .unwrap_or(false)
    }

    /// Fügt nach dem Segment-Startpunkt `after` einen neuen Stützpunkt ein.
    pub fn insert_vertex(&mut self, after: VertexRef, at: DVec2) -> bool {
        self.with_path_mut(after.path, |path, _| {
            if path.len() < 2 || after.index + 1 >= path.len() {
                return false;
            }
            path.insert(after.index + 1, at);
            true
        })
        .unwrap_or(false)
    }

    /// Entfernt einen Stützpunkt, solange der Pfad gültig bleibt
    /// (Linie ≥ 2 Punkte, Ring ≥ 3 verschiedene Punkte).
    pub fn remove_vertex(&mut self, vertex: VertexRef) -> bool {
        self.with_path_mut(vertex.path, |path, closed| {
            let distinct = if closed { path.len() - 1 } else { path.len() };
            let minimum = if closed { 3 } else { 2 };
            if distinct <= minimum || vertex.index >= distinct {
                return false;
            }
            path.remove(vertex.index);
            if closed && vertex.index == 0 {
                let first = path[0];
                if let Some(last) = path.last_mut() {
                    *last = first;
                }
            }
            true
        })
        .unwrap_or(false)
    }

    fn with_path_mut<R>(
        &mut self,
        path_index: usize,
        f: impl FnOnce(&mut Vec<DVec2>, bool) -> R,
    ) -> Option<R> {
        match self {
            Geometry::Point(p) => {
                if path_index != 0 {
                    return None;
                }
                let mut tmp = vec![*p];
                let result = f(&mut tmp, false);
                if let Some(first) = tmp.first() {
                    *p = *first;
                }
                Some(result)
            }
            Geometry::MultiPoint(points) => {
                let p = points.get_mut(path_index)?;
                let mut tmp = vec![*p];
                let result = f(&mut tmp, false);
                if let Some(first) = tmp.first() {
                    *p = *first;
                }
                Some(result)
            }
            Geometry::LineString(line) => (path_index == 0).then(|| f(line, false)),
            Geometry::Polygon(rings) => rings.get_mut(path_index).map(|r| f(r, true)),
            Geometry::MultiLineString(lines) => lines.get_mut(path_index).map(|l| f(l, false)),
            Geometry::MultiPolygon(polygons) => polygons
                .iter_mut()
                .flat_map(|rings| rings.iter_mut())
                .nth(path_index)
                .map(|r| f(r, true)),
        }
    }
}

/// Fußpunkt von `p` auf dem Segment `a`–`b`.
pub fn project_on_segment(p: DVec2, a: DVec2, b: DVec2) -> DVec2 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f64::EPSILON {
        return a;
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}

/// Abstand von `p` zum Segment `a`–`b`.
pub fn point_segment_distance(p: DVec2, a: DVec2, b: DVec2) -> f64 {
    project_on_segment(p, a, b).distance(p)
}

fn segments_intersect(a1: DVec2, a2: DVec2, b1: DVec2, b2: DVec2) -> bool {
    let d1 = (a2 - a1).perp_dot(b1 - a1);
    let d2 = (a2 - a1).perp_dot(b2 - a1);
    let d3 = (b2 - b1).perp_dot(a1 - b1);
    let d4 = (b2 - b1).perp_dot(a2 - b1);
    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }
    let on = |p: DVec2, q: DVec2, r: DVec2| {
        r.x >= p.x.min(q.x) && r.x <= p.x.max(q.x) && r.y >= p.y.min(q.y) && r.y <= p.y.max(q.y)
    };
    (d1 == 0.0 && on(a1, a2, b1))
        || (d2 == 0.0 && on(a1, a2, b2))
        || (d3 == 0.0 && on(b1, b2, a1))
        || (d4 == 0.0 && on(b1, b2, a2))
}

fn segment_intersects_extent(a: DVec2, b: DVec2, extent: &Extent) -> bool {
    if extent.contains_point(a) || extent.contains_point(b) {
        return true;
    }
    if !Extent::from_corners(a, b).intersects(extent) {
        return false;
    }
    let c = extent.corners();
    (0..4).any(|i| segments_intersect(a, b, c[i], c[(i + 1) % 4]))
}

/// Even-Odd-Test für einen einzelnen Ring.
fn ring_contains(ring: &[DVec2], p: DVec2) -> bool {
    let mut inside = false;
    let n = ring.len();
    if n < 3 {
        return false;
    }
    let mut j = n - 1;
    for i in 0..n {
        let (pi, pj) = (ring[i], ring[j]);
        if (pi.y > p.y) != (pj.y > p.y) && p.x < (pj.x - pi.x) * (p.y - pi.y) / (pj.y - pi.y) + pi.x
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

fn polygon_contains(rings: &[Vec<DVec2>], p: DVec2) -> bool {
    let Some((outer, holes)) = rings.split_first() else {
        return false;
    };
    ring_contains(outer, p) && !holes.iter().any(|hole| ring_contains(hole, p))
}

fn polygon_hit(rings: &[Vec<DVec2>], p: DVec2, tolerance: f64) -> bool {
    polygon_contains(rings, p)
        || rings.iter().any(|ring| {
            ring.windows(2)
                .any(|s| point_segment_distance(p, s[0], s[1]) <= tolerance)
        })
}

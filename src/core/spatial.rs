//! Spatial-Indizes (KD-Tree) für Feature-Extents und Stützpunkte.

use glam::DVec2;
use kiddo::{KdTree, SquaredEuclidean};

use super::feature::FeatureId;
use super::geometry::Extent;

/// Read-only Index über den Extents aller Features eines Layers.
///
/// Indexiert werden die Extent-Zentren. Abfragen erweitern den Suchkreis um die
/// größte halbe Diagonale und filtern danach exakt gegen die Extents.
#[derive(Debug, Clone)]
pub struct SpatialIndex {
    tree: KdTree<f64, 2>,
    ids: Vec<FeatureId>,
    extents: Vec<Extent>,
    max_half_diagonal: f64,
}

impl SpatialIndex {
    /// Erstellt einen leeren Index.
    pub fn empty() -> Self {
        Self {
            tree: (&Vec::<[f64; 2]>::new()).into(),
            ids: Vec::new(),
            extents: Vec::new(),
            max_half_diagonal: 0.0,
        }
    }

    /// Baut einen neuen Index aus (ID, Extent)-Paaren. Leere Extents werden übersprungen.
    pub fn from_extents<'a>(items: impl IntoIterator<Item = (&'a FeatureId, Extent)>) -> Self {
        let mut ids = Vec::new();
        let mut extents = Vec::new();
        let mut entries: Vec<[f64; 2]> = Vec::new();
        let mut max_half_diagonal: f64 = 0.0;

        for (id, extent) in items {
            if extent.is_empty() {
                continue;
            }
            let center = extent.center();
            entries.push([center.x, center.y]);
            max_half_diagonal = max_half_diagonal.max(extent.half_diagonal());
            ids.push(id.clone());
            extents.push(extent);
        }

        Self {
            tree: (&entries).into(),
            ids,
            extents,
            max_half_diagonal,
        }
    }

    /// Gibt die Anzahl indexierter Features zurück.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Gibt `true` zurück, wenn keine Features im Index liegen.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Alle Features, deren Extent den Such-Extent schneidet.
    pub fn intersecting(&self, query: &Extent) -> Vec<FeatureId> {
        if self.is_empty() || query.is_empty() {
            return Vec::new();
        }

        let center = query.center();
        let radius = query.half_diagonal() + self.max_half_diagonal;

        let mut hits: Vec<(usize, FeatureId)> = self
            .tree
            .within::<SquaredEuclidean>(&[center.x, center.y], radius * radius)
            .into_iter()
            .filter_map(|entry| {
                let slot = entry.item as usize;
                let extent = self.extents.get(slot)?;
                // Exakte Extent-Prüfung nach dem KD-Tree-Vorfilter
                if extent.intersects(query) {
                    Some((slot, self.ids.get(slot)?.clone()))
                } else {
                    None
                }
            })
            .collect();

        // Einfügereihenfolge beibehalten
        hits.sort_unstable_by_key(|(slot, _)| *slot);
        hits.into_iter().map(|(_, id)| id).collect()
    }
}

impl Default for SpatialIndex {
    fn default() -> Self {
        Self::empty()
    }
}

/// Ergebnis einer Distanzabfrage gegen den Stützpunkt-Index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexMatch {
    /// Position des gefundenen Stützpunkts
    pub position: DVec2,
    /// Euklidische Distanz zum Suchpunkt
    pub distance: f64,
}

/// Index über Stützpunkte (Fang-Hilfe beim Zeichnen).
#[derive(Debug, Clone)]
pub struct VertexIndex {
    tree: KdTree<f64, 2>,
    positions: Vec<DVec2>,
}

impl VertexIndex {
    /// Baut den Index aus beliebigen Punkten.
    pub fn from_points(points: impl IntoIterator<Item = DVec2>) -> Self {
        let positions: Vec<DVec2> = points.into_iter().collect();
        let entries: Vec<[f64; 2]> = positions.iter().map(|p| [p.x, p.y]).collect();
        Self {
            tree: (&entries).into(),
            positions,
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Findet den nächsten Stützpunkt zur gegebenen Kartenposition.
    pub fn nearest(&self, query: DVec2) -> Option<VertexMatch> {
        if self.is_empty() {
            return None;
        }

        let result = self.tree.nearest_one::<SquaredEuclidean>(&[query.x, query.y]);
        let position = *self.positions.get(result.item as usize)?;

        Some(VertexMatch {
            position,
            distance: result.distance.sqrt(),
        })
    }

    /// Nächster Stützpunkt innerhalb von `radius`, sonst `None`.
    pub fn nearest_within(&self, query: DVec2, radius: f64) -> Option<VertexMatch> {
        self.nearest(query).filter(|m| m.distance <= radius)
    }
}

impl Default for VertexIndex {
    fn default() -> Self {
        Self::from_points(std::iter::empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: i64) -> FeatureId {
        FeatureId::new("test", n)
    }

    #[test]
    fn extent_query_finds_large_feature_with_distant_center() {
        let big = (id(1), Extent::from_corners(DVec2::ZERO, DVec2::new(100.0, 100.0)));
        let small = (id(2), Extent::from_corners(DVec2::new(200.0, 0.0), DVec2::new(201.0, 1.0)));
        let index = SpatialIndex::from_extents([(&big.0, big.1), (&small.0, small.1)]);

        let hits = index.intersecting(&Extent::from_corners(
            DVec2::new(95.0, 95.0),
            DVec2::new(96.0, 96.0),
        ));
        assert_eq!(hits, vec![id(1)]);
    }

    #[test]
    fn extent_query_keeps_insertion_order() {
        let ids: Vec<FeatureId> = (1..=3).map(id).collect();
        let index = SpatialIndex::from_extents(ids.iter().enumerate().map(|(i, id)| {
            let p = DVec2::new(i as f64, 0.0);
            (id, Extent::around(p, 0.1))
        }));
        let hits = index.intersecting(&Extent::from_corners(
            DVec2::new(-1.0, -1.0),
            DVec2::new(5.0, 1.0),
        ));
        assert_eq!(hits, ids);
    }

    #[test]
    fn empty_index_has_no_entries() {
        let index = SpatialIndex::empty();
        assert!(index.is_empty());
        assert!(index
            .intersecting(&Extent::around(DVec2::ZERO, 10.0))
            .is_empty());
    }

    #[test]
    fn vertex_snap_respects_radius() {
        let index = VertexIndex::from_points([DVec2::new(0.0, 0.0), DVec2::new(10.0, 0.0)]);
        let hit = index
            .nearest_within(DVec2::new(9.5, 0.2), 1.0)
            .expect("Treffer erwartet");
        assert_eq!(hit.position, DVec2::new(10.0, 0.0));
        assert!(index.nearest_within(DVec2::new(5.0, 0.0), 1.0).is_none());
    }
}

//! Layer, Feature-Quellen und der Lade-Vertrag zum Datendienst.

use indexmap::IndexMap;

use super::feature::{Feature, FeatureId, StyleOverride};
use super::geometry::Extent;
use super::spatial::SpatialIndex;
use super::view::resolution_from_scale;
use crate::style::StyleResolver;

/// Lade-Vertrag zum (externen) Datendienst.
///
/// Der Kern parst kein Wire-Format, Implementierungen liefern fertige Features.
pub trait FeatureLoader {
    /// Lädt ein einzelnes Feature. `Ok(None)` wenn es nicht existiert.
    fn fetch_by_id(&self, id: &FeatureId) -> anyhow::Result<Option<Feature>>;

    /// Lädt alle Features eines Layers im Ausschnitt.
    fn fetch_extent(&self, layer: &str, extent: &Extent) -> anyhow::Result<Vec<Feature>>;
}

/// Feature-Sammlung eines Layers, eindeutig nach Identität.
#[derive(Debug, Clone, Default)]
pub struct FeatureSource {
    features: IndexMap<FeatureId, Feature>,
    index: SpatialIndex,
    /// Index veraltet, Abfragen fallen auf lineare Suche zurück
    index_dirty: bool,
    loaded_extents: Vec<Extent>,
}

impl FeatureSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Fügt ein Feature ein oder ersetzt eines mit gleicher Identität.
    /// Features ohne Identität werden abgelehnt.
    pub fn add_feature(&mut self, feature: Feature) -> bool {
        let Some(id) = feature.id.clone() else {
            log::warn!("Feature ohne Identität kann nicht eingefügt werden");
            return false;
        };
        self.features.insert(id, feature);
        self.index_dirty = true;
        true
    }

    /// Entfernt ein Feature und gibt es zurück.
    pub fn remove_feature(&mut self, id: &FeatureId) -> Option<Feature> {
        let removed = self.features.shift_remove(id);
        if removed.is_some() {
            self.index_dirty = true;
        }
        removed
    }

    pub fn get(&self, id: &FeatureId) -> Option<&Feature> {
        self.features.get(id)
    }

    /// Mutabler Zugriff; markiert den Spatial-Index als veraltet.
    pub fn get_mut(&mut self, id: &FeatureId) -> Option<&mut Feature> {
        let feature = self.features.get_mut(id)?;
        self.index_dirty = true;
        Some(feature)
    }

    /// Zugriff nur auf den Instanzstil; der Spatial-Index bleibt gültig.
    pub fn style_override_mut(&mut self, id: &FeatureId) -> Option<&mut Option<StyleOverride>> {
        self.features.get_mut(id).map(|feature| &mut feature.style_override)
    }

    /// `false`, solange Änderungen noch nicht im Spatial-Index stehen.
    pub fn is_index_current(&self) -> bool {
        !self.index_dirty
    }

    pub fn contains(&self, id: &FeatureId) -> bool {
        self.features.contains_key(id)
    }

    /// Iteriert über alle Features in Einfügereihenfolge.
    pub fn features(&self) -> impl Iterator<Item = &Feature> {
        self.features.values()
    }

    /// Mutabler Iterator; markiert den Spatial-Index als veraltet.
    pub fn features_mut(&mut self) -> impl Iterator<Item = &mut Feature> {
        self.index_dirty = true;
        self.features.values_mut()
    }

    /// Baut den Spatial-Index neu auf.
    pub fn rebuild_index(&mut self) {
        self.index = SpatialIndex::from_extents(
            self.features
                .iter()
                .map(|(id, feature)| (id, feature.geometry.extent())),
        );
        self.index_dirty = false;
        log::debug!("Spatial-Index neu aufgebaut: {} Features", self.index.len());
    }

    /// Baut den Index nur neu, wenn er veraltet ist.
    pub fn ensure_index(&mut self) {
        if self.index_dirty {
            self.rebuild_index();
        }
    }

    /// IDs aller Features, deren Geometrie den Extent schneidet.
    pub fn features_intersecting_extent(&self, extent: &Extent) -> Vec<FeatureId> {
        let candidates: Vec<FeatureId> = if self.index_dirty {
            self.features.keys().cloned().collect()
        } else {
            self.index.intersecting(extent)
        };
        candidates
            .into_iter()
            .filter(|id| {
                self.features
                    .get(id)
                    .is_some_and(|f| f.geometry.intersects_extent(extent))
            })
            .collect()
    }

    /// Übernimmt ein Ladeergebnis als Ganzes und merkt sich den Ausschnitt.
    pub fn apply_loaded(&mut self, extent: Extent, features: Vec<Feature>) -> usize {
        let mut count = 0;
        for feature in features {
            if self.add_feature(feature) {
                count += 1;
            }
        }
        self.loaded_extents.push(extent);
        self.rebuild_index();
        count
    }

    /// Bereits geladene Ausschnitte.
    pub fn loaded_extents(&self) -> &[Extent] {
        &self.loaded_extents
    }

    /// Prüft ob ein Ausschnitt vollständig in einem bereits geladenen liegt.
    pub fn is_loaded(&self, extent: &Extent) -> bool {
        self.loaded_extents.iter().any(|loaded| {
            loaded.contains_point(extent.min) && loaded.contains_point(extent.max)
        })
    }
}

/// Benannter, gestylter Feature-Layer mit Sichtbarkeits-Gating.
#[derive(Debug, Clone)]
pub struct Layer {
    pub name: String,
    pub visible: bool,
    /// Kleinste Auflösung, ab der der Layer gezeichnet wird
    pub min_resolution: f64,
    /// Größte Auflösung, bis zu der der Layer gezeichnet wird
    pub max_resolution: f64,
    pub selectable: bool,
    pub editable: bool,
    pub searchable: bool,
    /// Fachlayer (Rahmen-Selektion nur auf diesen)
    pub operational: bool,
    pub style: StyleResolver,
    pub source: FeatureSource,
}

impl Layer {
    /// Erstellt einen sichtbaren, selektierbaren Fachlayer mit Standardstil.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            visible: true,
            min_resolution: 0.0,
            max_resolution: f64::INFINITY,
            selectable: true,
            editable: false,
            searchable: false,
            operational: true,
            style: StyleResolver::default(),
            source: FeatureSource::new(),
        }
    }

    /// Builder: setzt die Stilregeln.
    pub fn with_style(mut self, style: StyleResolver) -> Self {
        self.style = style;
        self
    }

    /// Builder: Selektierbarkeit.
    pub fn with_selectable(mut self, selectable: bool) -> Self {
        self.selectable = selectable;
        self
    }

    /// Builder: Editierbarkeit.
    pub fn with_editable(mut self, editable: bool) -> Self {
        self.editable = editable;
        self
    }

    /// Builder: Sichtbarkeit über Maßstäbe (1:min_scale bis 1:max_scale).
    pub fn with_scale_range(mut self, min_scale: f64, max_scale: f64, meters_per_unit: f64) -> Self {
        self.min_resolution = resolution_from_scale(min_scale, meters_per_unit);
        self.max_resolution = resolution_from_scale(max_scale, meters_per_unit);
        self
    }

    /// Layer sichtbar und Auflösung innerhalb `[min_resolution, max_resolution]`.
    pub fn is_visible_at(&self, resolution: f64) -> bool {
        self.visible && resolution >= self.min_resolution && resolution <= self.max_resolution
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Geometry;
    use glam::DVec2;

    fn point(layer: &str, local: i64, x: f64, y: f64) -> Feature {
        Feature::new(Geometry::Point(DVec2::new(x, y))).with_id(FeatureId::new(layer, local))
    }

    #[test]
    fn source_is_unique_by_identity() {
        let mut source = FeatureSource::new();
        assert!(source.add_feature(point("a", 1, 0.0, 0.0)));
        assert!(source.add_feature(point("a", 1, 5.0, 5.0)));
        assert_eq!(source.len(), 1);
        assert_eq!(
            source.get(&FeatureId::new("a", 1)).map(|f| f.geometry.clone()),
            Some(Geometry::Point(DVec2::new(5.0, 5.0)))
        );
    }

    #[test]
    fn features_without_identity_are_rejected() {
        let mut source = FeatureSource::new();
        assert!(!source.add_feature(Feature::new(Geometry::Point(DVec2::ZERO))));
        assert!(source.is_empty());
    }

    #[test]
    fn extent_query_works_with_stale_and_fresh_index() {
        let mut source = FeatureSource::new();
        source.add_feature(point("a", 1, 0.0, 0.0));
        source.add_feature(point("a", 2, 50.0, 50.0));
        let query = Extent::around(DVec2::ZERO, 1.0);

        assert_eq!(source.features_intersecting_extent(&query), vec![FeatureId::new("a", 1)]);
        source.rebuild_index();
        assert_eq!(source.features_intersecting_extent(&query), vec![FeatureId::new("a", 1)]);
    }

    #[test]
    fn style_changes_keep_index_current() {
        let mut source = FeatureSource::new();
        source.add_feature(point("a", 1, 0.0, 0.0));
        assert!(!source.is_index_current());
        source.ensure_index();

        let id = FeatureId::new("a", 1);
        if let Some(style) = source.style_override_mut(&id) {
            *style = Some(StyleOverride::Selected { previous: None });
        }
        assert!(source.is_index_current());

        source.get_mut(&id);
        assert!(!source.is_index_current());
    }

    #[test]
    fn layer_visibility_is_gated_by_resolution() {
        let mut layer = Layer::new("a");
        layer.min_resolution = 1.0;
        layer.max_resolution = 10.0;
        assert!(layer.is_visible_at(5.0));
        assert!(!layer.is_visible_at(11.0));
        assert!(!layer.is_visible_at(0.5));
        layer.visible = false;
        assert!(!layer.is_visible_at(5.0));
    }
}

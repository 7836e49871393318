//! Karten-Modell: geordnete Layer + aktuelle Ansicht.
//!
//! Stellt die Abfragen bereit, die Selektion, Transformation und Editier-Sitzung
//! von der Kartenoberfläche brauchen (Treffer am Pixel, Ausschnitts-Abfragen,
//! Feature-Lookup über die Identität).

use glam::DVec2;
use indexmap::IndexMap;

use super::feature::{Feature, FeatureId, StyleOverride};
use super::geometry::Extent;
use super::layer::{FeatureLoader, Layer};
use super::view::MapView;

/// Layer in Zeichenreihenfolge (unten → oben) plus Kartenansicht.
#[derive(Debug, Clone, Default)]
pub struct FeatureMap {
    layers: IndexMap<String, Layer>,
    pub view: MapView,
}

impl FeatureMap {
    pub fn new(view: MapView) -> Self {
        Self {
            layers: IndexMap::new(),
            view,
        }
    }

    /// Fügt einen Layer oben hinzu (ersetzt einen gleichnamigen).
    pub fn add_layer(&mut self, layer: Layer) {
        log::debug!("Layer hinzugefügt: {}", layer.name);
        self.layers.insert(layer.name.clone(), layer);
    }

    pub fn remove_layer(&mut self, name: &str) -> Option<Layer> {
        self.layers.shift_remove(name)
    }

    pub fn layer(&self, name: &str) -> Option<&Layer> {
        self.layers.get(name)
    }

    pub fn layer_mut(&mut self, name: &str) -> Option<&mut Layer> {
        self.layers.get_mut(name)
    }

    /// Alle Layer in Zeichenreihenfolge.
    pub fn layers(&self) -> impl Iterator<Item = &Layer> {
        self.layers.values()
    }

    /// Aktuelle Auflösung der Ansicht.
    pub fn resolution(&self) -> f64 {
        self.view.resolution
    }

    /// Layer, dem die Identität gehört.
    pub fn owning_layer(&self, id: &FeatureId) -> Option<&Layer> {
        self.layers.get(&id.layer)
    }

    /// Feature-Lookup über die Identität.
    pub fn feature(&self, id: &FeatureId) -> Option<&Feature> {
        self.layers.get(&id.layer)?.source.get(id)
    }

    pub fn feature_mut(&mut self, id: &FeatureId) -> Option<&mut Feature> {
        self.layers.get_mut(&id.layer)?.source.get_mut(id)
    }

    /// Instanzstil eines Features, ohne den Spatial-Index zu invalidieren.
    pub fn style_override_mut(&mut self, id: &FeatureId) -> Option<&mut Option<StyleOverride>> {
        self.layers.get_mut(&id.layer)?.source.style_override_mut(id)
    }

    /// Fügt ein Feature in seinen Layer ein (Layer über die Identität).
    pub fn insert_feature(&mut self, feature: Feature) -> bool {
        let Some(layer_name) = feature.id.as_ref().map(|id| id.layer.clone()) else {
            return false;
        };
        match self.layers.get_mut(&layer_name) {
            Some(layer) => layer.source.add_feature(feature),
            None => {
                log::warn!("Layer '{}' nicht gefunden, Feature verworfen", layer_name);
                false
            }
        }
    }

    pub fn remove_feature(&mut self, id: &FeatureId) -> Option<Feature> {
        self.layers.get_mut(&id.layer)?.source.remove_feature(id)
    }

    /// Treffer an einer Pixelposition, oberster Layer zuerst.
    ///
    /// Berücksichtigt nur bei aktueller Auflösung sichtbare Layer.
    pub fn features_at_pixel(&self, pixel: DVec2, tolerance_px: f64) -> Vec<FeatureId> {
        let coordinate = self.view.pixel_to_map(pixel);
        let tolerance = self.view.pixels_to_map_units(tolerance_px);
        let query = Extent::around(coordinate, tolerance);
        let resolution = self.resolution();

        self.layers
            .values()
            .rev()
            .filter(|layer| layer.is_visible_at(resolution))
            .flat_map(|layer| {
                layer
                    .source
                    .features_intersecting_extent(&query)
                    .into_iter()
                    .filter(|id| {
                        layer
                            .source
                            .get(id)
                            .is_some_and(|f| f.geometry.hit_test(coordinate, tolerance))
                    })
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    /// Alle geladenen Features der Fachlayer, deren Geometrie den Extent schneidet.
    pub fn operational_features_in_extent(&self, extent: &Extent) -> Vec<FeatureId> {
        self.layers
            .values()
            .filter(|layer| layer.operational)
            .flat_map(|layer| layer.source.features_intersecting_extent(extent))
            .collect()
    }

    /// Vereinigung der Extents der angegebenen Features.
    pub fn extent_of(&self, ids: &[FeatureId]) -> Extent {
        let mut extent = Extent::empty();
        for id in ids {
            if let Some(feature) = self.feature(id) {
                extent.extend(&feature.geometry.extent());
            }
        }
        extent
    }

    /// Passt die Ansicht an die Features an. Ohne auflösbare Features: keine Änderung.
    pub fn zoom_to_features(&mut self, ids: &[FeatureId]) {
        let extent = self.extent_of(ids);
        if !extent.is_empty() {
            self.view.fit_extent(&extent);
        }
    }

    /// Baut alle veralteten Spatial-Indizes neu auf.
    pub fn ensure_spatial_index(&mut self) {
        for layer in self.layers.values_mut() {
            layer.source.ensure_index();
        }
    }

    /// Sind die Indizes aller Layer aktuell?
    pub fn is_spatial_index_current(&self) -> bool {
        self.layers.values().all(|layer| layer.source.is_index_current())
    }

    /// Lädt einen Ausschnitt eines Layers über den Loader.
    ///
    /// Schlägt das Laden fehl, bleibt der Layer unverändert.
    pub fn load_extent(
        &mut self,
        layer_name: &str,
        extent: &Extent,
        loader: &dyn FeatureLoader,
    ) -> anyhow::Result<usize> {
        if !self.layers.contains_key(layer_name) {
            anyhow::bail!("Layer '{}' nicht gefunden", layer_name);
        }
        let features = match loader.fetch_extent(layer_name, extent) {
            Ok(features) => features,
            Err(e) => {
                log::warn!("Laden von Layer '{}' fehlgeschlagen: {}", layer_name, e);
                return Err(e);
            }
        };
        let layer = self
            .layers
            .get_mut(layer_name)
            .ok_or_else(|| anyhow::anyhow!("Layer '{}' nicht gefunden", layer_name))?;
        let count = layer.source.apply_loaded(*extent, features);
        log::info!("{} Features in Layer '{}' geladen", count, layer_name);
        Ok(count)
    }

    /// Lädt ein einzelnes Feature nach. `Ok(false)` wenn der Dienst nichts liefert.
    pub fn load_feature(&mut self, id: &FeatureId, loader: &dyn FeatureLoader) -> anyhow::Result<bool> {
        match loader.fetch_by_id(id)? {
            Some(mut feature) => {
                feature.id.get_or_insert_with(|| id.clone());
                Ok(self.insert_feature(feature))
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Geometry;

    struct FailingLoader;

    impl FeatureLoader for FailingLoader {
        fn fetch_by_id(&self, _id: &FeatureId) -> anyhow::Result<Option<Feature>> {
            anyhow::bail!("offline")
        }

        fn fetch_extent(&self, _layer: &str, _extent: &Extent) -> anyhow::Result<Vec<Feature>> {
            anyhow::bail!("offline")
        }
    }

    struct StaticLoader(Vec<Feature>);

    impl FeatureLoader for StaticLoader {
        fn fetch_by_id(&self, id: &FeatureId) -> anyhow::Result<Option<Feature>> {
            Ok(self.0.iter().find(|f| f.id.as_ref() == Some(id)).cloned())
        }

        fn fetch_extent(&self, _layer: &str, _extent: &Extent) -> anyhow::Result<Vec<Feature>> {
            Ok(self.0.clone())
        }
    }

    fn map_with_layer() -> FeatureMap {
        let mut map = FeatureMap::new(MapView::new(DVec2::ZERO, 1.0, DVec2::new(100.0, 100.0)));
        map.add_layer(Layer::new("parcels"));
        map
    }

    fn point(local: i64, p: DVec2) -> Feature {
        Feature::new(Geometry::Point(p)).with_id(FeatureId::new("parcels", local))
    }

    #[test]
    fn failed_load_leaves_layer_unchanged() {
        let mut map = map_with_layer();
        map.insert_feature(point(1, DVec2::ZERO));
        let extent = Extent::around(DVec2::ZERO, 10.0);

        assert!(map.load_extent("parcels", &extent, &FailingLoader).is_err());
        let layer = map.layer("parcels").expect("Layer vorhanden");
        assert_eq!(layer.source.len(), 1);
        assert!(layer.source.loaded_extents().is_empty());
    }

    #[test]
    fn successful_load_records_extent() {
        let mut map = map_with_layer();
        let loader = StaticLoader(vec![point(7, DVec2::new(1.0, 1.0)), point(8, DVec2::new(2.0, 2.0))]);
        let extent = Extent::around(DVec2::ZERO, 10.0);

        assert_eq!(map.load_extent("parcels", &extent, &loader).ok(), Some(2));
        let layer = map.layer("parcels").expect("Layer vorhanden");
        assert!(layer.source.is_loaded(&Extent::around(DVec2::ZERO, 5.0)));
        assert!(map.feature(&FeatureId::new("parcels", 8)).is_some());
    }

    #[test]
    fn pixel_query_uses_tolerance() {
        let mut map = map_with_layer();
        map.insert_feature(point(1, DVec2::new(10.0, 0.0)));
        // Pixel (60, 50) entspricht Karte (10, 0)
        assert_eq!(
            map.features_at_pixel(DVec2::new(62.0, 50.0), 3.0),
            vec![FeatureId::new("parcels", 1)]
        );
        assert!(map.features_at_pixel(DVec2::new(70.0, 50.0), 3.0).is_empty());
    }

    #[test]
    fn lookup_of_unknown_layer_is_none() {
        let map = map_with_layer();
        assert!(map.feature(&FeatureId::new("missing", 1)).is_none());
        assert!(map.owning_layer(&FeatureId::new("missing", 1)).is_none());
    }
}

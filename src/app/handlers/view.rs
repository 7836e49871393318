//! Handler für Ansicht und Viewport.

use glam::DVec2;

use crate::app::AppState;
use crate::core::{FeatureId, MapView};

/// Aktualisiert die Viewport-Größe (Pixel).
pub fn set_viewport_size(state: &mut AppState, size: [f64; 2]) {
    state.map.view.viewport = DVec2::new(size[0].max(1.0), size[1].max(1.0));
}

/// Setzt Zentrum und Auflösung der Ansicht.
pub fn set_view(state: &mut AppState, center: DVec2, resolution: f64) {
    state.map.view.center = center;
    state.map.view.resolution = resolution.max(MapView::RESOLUTION_MIN);
}

/// Passt die Ansicht an die Ausdehnung der Features an.
pub fn zoom_to_features(state: &mut AppState, ids: &[FeatureId]) {
    if ids.is_empty() {
        log::debug!("Zoom auf Features: keine IDs");
        return;
    }
    state.map.zoom_to_features(ids);
}

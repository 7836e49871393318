//! Builder für Render-Szenen aus dem AppState.

use crate::app::selection::highlight::selected_style;
use crate::app::AppState;
use crate::core::{Feature, Layer, StyleOverride};
use crate::shared::options::SelectionStyleOptions;
use crate::shared::{RenderScene, StyledFeature};
use crate::style::StyleLayer;

/// Effektiver Stil eines Features.
///
/// Ein Instanz-Stil ersetzt die Layer-Regeln. Selektierte Features bekommen
/// ihre Hervorhebung über den Stil von vor der Selektion.
fn effective_styles(
    layer: &Layer,
    feature: &Feature,
    resolution: f64,
    selection: &SelectionStyleOptions,
) -> Vec<StyleLayer> {
    match &feature.style_override {
        Some(StyleOverride::Layers(styles)) => styles.clone(),
        Some(StyleOverride::Selected { previous }) => {
            let base = match previous.as_deref() {
                Some(StyleOverride::Layers(styles)) => styles.clone(),
                _ => layer.style.resolve(feature, resolution),
            };
            selected_style(selection, feature, base)
        }
        None => layer.style.resolve(feature, resolution),
    }
}

/// Baut eine RenderScene aus dem aktuellen AppState.
pub fn build(state: &AppState) -> RenderScene {
    let map = &state.map;
    let resolution = map.resolution();

    let features = map
        .layers()
        .filter(|layer| layer.is_visible_at(resolution))
        .flat_map(|layer| {
            layer.source.features().filter_map(move |feature| {
                let id = feature.id.clone()?;
                Some(StyledFeature {
                    selected: state.selection.is_selected(&id),
                    id,
                    geometry: feature.geometry.clone(),
                    styles: effective_styles(layer, feature, resolution, &state.selection.style),
                })
            })
        })
        .collect();

    let transform = &state.session.transform;
    RenderScene {
        view: map.view.clone(),
        features,
        handles: transform
            .handles(map)
            .into_iter()
            .map(|handle| handle.position)
            .collect(),
        handle_box: transform.handle_box(map),
        sketch: state.session.draw_preview(state.pointer_coordinate),
    }
}

//! Render-Szene als expliziter Übergabevertrag zwischen App und Host-Renderer.
//!
//! Lebt im shared-Modul, da `app` sie baut und der Host sie konsumiert.

use glam::DVec2;

use crate::core::{Extent, FeatureId, Geometry, MapView};
use crate::style::StyleLayer;

/// Ein Feature mit seinem effektiven Stil für diesen Frame.
#[derive(Debug, Clone, PartialEq)]
pub struct StyledFeature {
    pub id: FeatureId,
    pub geometry: Geometry,
    /// Stil-Layer in Zeichenreihenfolge
    pub styles: Vec<StyleLayer>,
    pub selected: bool,
}

/// Laufende Zeichen-Skizze.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SketchPreview {
    pub vertices: Vec<DVec2>,
    /// Ring schließt sich zum ersten Punkt (Polygon)
    pub closed: bool,
}

/// Read-only Daten für einen Render-Frame.
#[derive(Debug, Clone, Default)]
pub struct RenderScene {
    /// Ansicht für diesen Frame
    pub view: MapView,
    /// Features sichtbarer Layer, unterster Layer zuerst
    pub features: Vec<StyledFeature>,
    /// Handle-Positionen der Transform-Interaktion
    pub handles: Vec<DVec2>,
    /// Box, an der die Handles hängen
    pub handle_box: Option<Extent>,
    pub sketch: Option<SketchPreview>,
}

impl RenderScene {
    /// Gibt zurück, ob etwas zu zeichnen ist.
    pub fn has_content(&self) -> bool {
        !self.features.is_empty() || self.sketch.is_some() || !self.handles.is_empty()
    }

    pub fn selected_count(&self) -> usize {
        self.features.iter().filter(|f| f.selected).count()
    }
}

//! Kartenansicht: Zentrum, Auflösung und Pixel ↔ Karten-Umrechnung.

use glam::DVec2;

use super::geometry::Extent;

/// Zoll pro Meter (OGC-Standard für Maßstabsumrechnung).
const INCHES_PER_METER: f64 = 39.37;
/// Pixel pro Zoll bei 0,28 mm Pixelgröße.
const DOTS_PER_INCH: f64 = 25.4 / 0.28;

/// Rechnet einen Maßstab (1:scale) in eine Auflösung (Karteneinheiten pro Pixel) um.
pub fn resolution_from_scale(scale: f64, meters_per_unit: f64) -> f64 {
    scale / (meters_per_unit * INCHES_PER_METER * DOTS_PER_INCH)
}

/// Aktuelle Kartenansicht des Hosts.
///
/// Pixel-Ursprung ist oben links, die Y-Achse zeigt nach unten.
/// Karten-Y zeigt nach oben.
#[derive(Debug, Clone, PartialEq)]
pub struct MapView {
    /// Zentrum in Kartenkoordinaten
    pub center: DVec2,
    /// Karteneinheiten pro Pixel
    pub resolution: f64,
    /// Viewport-Größe in Pixeln
    pub viewport: DVec2,
    /// Meter pro Karteneinheit der Projektion
    pub meters_per_unit: f64,
}

impl MapView {
    /// Kleinste erlaubte Auflösung.
    pub const RESOLUTION_MIN: f64 = 1e-6;
    /// Auflösung beim Zoom auf einen Punkt (entspricht Web-Mercator-Zoomstufe 15).
    pub const POINT_ZOOM_RESOLUTION: f64 = 4.777_314_267_823_516;

    /// Erstellt eine Ansicht.
    pub fn new(center: DVec2, resolution: f64, viewport: DVec2) -> Self {
        Self {
            center,
            resolution: resolution.max(Self::RESOLUTION_MIN),
            viewport,
            meters_per_unit: 1.0,
        }
    }

    /// Konvertiert Pixel- zu Kartenkoordinaten.
    pub fn pixel_to_map(&self, pixel: DVec2) -> DVec2 {
        let offset = pixel - self.viewport * 0.5;
        DVec2::new(
            self.center.x + offset.x * self.resolution,
            self.center.y - offset.y * self.resolution,
        )
    }

    /// Konvertiert Karten- zu Pixelkoordinaten.
    pub fn map_to_pixel(&self, coordinate: DVec2) -> DVec2 {
        let delta = (coordinate - self.center) / self.resolution;
        DVec2::new(delta.x, -delta.y) + self.viewport * 0.5
    }

    /// Rechnet eine Pixel-Distanz in Karteneinheiten um.
    pub fn pixels_to_map_units(&self, pixels: f64) -> f64 {
        pixels * self.resolution
    }

    /// Sichtbarer Kartenausschnitt.
    pub fn visible_extent(&self) -> Extent {
        let half = self.viewport * 0.5 * self.resolution;
        Extent {
            min: self.center - half,
            max: self.center + half,
        }
    }

    /// Zentriert die Ansicht auf einen Punkt
    pub fn look_at(&mut self, target: DVec2) {
        self.center = target;
    }

    /// Passt Zentrum und Auflösung so an, dass der Extent vollständig sichtbar ist.
    ///
    /// Ein Extent ohne Fläche (Punkt) wird mit [`Self::POINT_ZOOM_RESOLUTION`] zentriert.
    pub fn fit_extent(&mut self, extent: &Extent) {
        if extent.is_empty() {
            return;
        }
        if extent.width() <= 0.0 || extent.height() <= 0.0 {
            self.center = extent.min;
            self.resolution = Self::POINT_ZOOM_RESOLUTION;
            return;
        }
        let viewport = self.viewport.max(DVec2::ONE);
        self.center = extent.center();
        self.resolution = (extent.width() / viewport.x)
            .max(extent.height() / viewport.y)
            .max(Self::RESOLUTION_MIN);
    }

    /// Maßstab → Auflösung in der Projektion dieser Ansicht.
    pub fn resolution_from_scale(&self, scale: f64) -> f64 {
        resolution_from_scale(scale, self.meters_per_unit)
    }
}

impl Default for MapView {
    fn default() -> Self {
        Self::new(DVec2::ZERO, 1.0, DVec2::new(800.0, 600.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn pixel_map_round_trip() {
        let view = MapView::new(DVec2::new(100.0, 50.0), 2.0, DVec2::new(400.0, 300.0));
        let map = view.pixel_to_map(DVec2::new(10.0, 20.0));
        let back = view.map_to_pixel(map);
        assert_relative_eq!(back.x, 10.0);
        assert_relative_eq!(back.y, 20.0);
    }

    #[test]
    fn viewport_center_maps_to_view_center() {
        let view = MapView::new(DVec2::new(7.0, -3.0), 0.5, DVec2::new(200.0, 100.0));
        assert_eq!(view.pixel_to_map(DVec2::new(100.0, 50.0)), DVec2::new(7.0, -3.0));
        // Pixel-Y nach unten = Karten-Y kleiner
        assert!(view.pixel_to_map(DVec2::new(100.0, 60.0)).y < -3.0);
    }

    #[test]
    fn scale_to_resolution_matches_ogc_formula() {
        let res = resolution_from_scale(1000.0, 1.0);
        assert_relative_eq!(res, 0.2800, epsilon = 1e-3);
    }

    #[test]
    fn fit_extent_covers_extent() {
        let mut view = MapView::new(DVec2::ZERO, 1.0, DVec2::new(100.0, 100.0));
        let extent = Extent::from_corners(DVec2::new(0.0, 0.0), DVec2::new(400.0, 200.0));
        view.fit_extent(&extent);
        assert_eq!(view.center, DVec2::new(200.0, 100.0));
        assert_relative_eq!(view.resolution, 4.0);
        let visible = view.visible_extent();
        assert!(visible.min.x <= 0.0 && visible.max.x >= 400.0);
    }

    #[test]
    fn fit_point_extent_uses_fallback_resolution() {
        let mut view = MapView::default();
        let p = DVec2::new(5.0, 5.0);
        view.fit_extent(&Extent::from_corners(p, p));
        assert_eq!(view.center, p);
        assert_relative_eq!(view.resolution, MapView::POINT_ZOOM_RESOLUTION);
    }
}

//! Aufgelöste, renderfertige Stil-Typen.

use std::sync::Arc;

use glam::DVec2;
use serde::Serialize;

/// Linienstil
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stroke {
    /// CSS-Farbe
    pub color: String,
    /// Linienbreite in Pixeln
    pub width: f64,
    pub line_dash: Option<Vec<f64>>,
}

impl Stroke {
    pub fn new(color: impl Into<String>, width: f64) -> Self {
        Self {
            color: color.into(),
            width,
            line_dash: None,
        }
    }
}

/// Flächenfüllung
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fill {
    /// CSS-Farbe
    pub color: String,
}

impl Fill {
    pub fn new(color: impl Into<String>) -> Self {
        Self {
            color: color.into(),
        }
    }
}

/// Kreissymbol für Punkte
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CircleSymbol {
    /// Radius in Pixeln
    pub radius: f64,
    pub fill: Option<Fill>,
    pub stroke: Option<Stroke>,
}

/// Bildsymbol für Punkte
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IconSymbol {
    /// Bildquelle (URL oder Data-URI)
    pub src: String,
    /// Rotation in Radiant
    pub rotation: f64,
    /// Ankerpunkt als Bruchteil der Bildgröße
    pub anchor: [f64; 2],
    pub opacity: f64,
    /// Bildgröße in Pixeln, falls bekannt
    pub size: Option<[f64; 2]>,
    pub scale: Option<f64>,
}

/// Punktsymbol
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Symbol {
    Circle(CircleSymbol),
    Icon(IconSymbol),
}

impl Symbol {
    /// Gezeichnete Größe in Pixeln, `None` bei Icons ohne bekannte Größe.
    pub fn size(&self) -> Option<DVec2> {
        match self {
            Symbol::Circle(circle) => Some(DVec2::splat(circle.radius * 2.0)),
            Symbol::Icon(icon) => icon
                .size
                .map(|[w, h]| DVec2::new(w, h) * icon.scale.unwrap_or(1.0)),
        }
    }
}

/// Text-Label eines Features (pro Feature und Auflösung berechnet).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextLabel {
    pub text: String,
    pub font: Option<String>,
    /// Versatz in Pixeln
    pub offset: [f64; 2],
    pub text_align: Option<String>,
    pub text_baseline: Option<String>,
    pub fill: Option<Fill>,
    pub stroke: Option<Stroke>,
}

/// Der regelabhängige Teil eines Stils (ohne Label).
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct BaseStyle {
    pub fill: Option<Fill>,
    pub stroke: Option<Stroke>,
    pub image: Option<Symbol>,
}

/// Ein renderbarer Stil-Layer: geteilter Basisstil + optionales Label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyleLayer {
    pub base: Arc<BaseStyle>,
    pub label: Option<TextLabel>,
}

impl StyleLayer {
    /// Stil-Layer ohne Label.
    pub fn new(base: BaseStyle) -> Self {
        Self {
            base: Arc::new(base),
            label: None,
        }
    }
}

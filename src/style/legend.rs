//! Legendenmodus: eine schematische Zeile pro Regel, unabhängig von Features.

use serde::Serialize;

use super::rule::{NumberOrRef, StyleRule};

/// Schematisches Symbol einer Legendenzeile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum LegendSwatch {
    /// Rechteck mit Füllung und Rand
    Polygon {
        stroke: String,
        width: f64,
        fill: String,
    },
    /// Horizontale Linie
    Line { stroke: String, width: f64 },
    /// Kreis
    Circle {
        radius: f64,
        stroke: Option<String>,
        width: f64,
        fill: Option<String>,
    },
    /// Bild
    Icon { src: String },
}

/// Eine Zeile der Legende
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendRow {
    pub name: String,
    pub swatches: Vec<LegendSwatch>,
}

/// Feature-unabhängige Breite: Referenzen (`$.feld`) zählen als 1 Pixel.
fn schematic_width(width: Option<&NumberOrRef>) -> Option<f64> {
    width.map(|w| match w {
        NumberOrRef::Number(n) => *n,
        NumberOrRef::Text(s) => s.trim().parse().unwrap_or(1.0),
    })
}

/// Symbole einer Regel, passend zu den vorhandenen Stil-Eigenschaften.
fn swatches_for(rule: &StyleRule) -> Vec<LegendSwatch> {
    let mut swatches = Vec::new();
    let width = schematic_width(rule.stroke_width.as_ref());

    match (&rule.stroke_color, width, &rule.fill_color) {
        (Some(stroke), Some(width), Some(fill)) => swatches.push(LegendSwatch::Polygon {
            stroke: stroke.clone(),
            width,
            fill: fill.clone(),
        }),
        (Some(stroke), Some(width), None) => swatches.push(LegendSwatch::Line {
            stroke: stroke.clone(),
            width,
        }),
        _ => {}
    }
    if let Some(icon) = &rule.icon {
        swatches.push(LegendSwatch::Icon {
            src: format!("{}{}", icon.kind.as_deref().unwrap_or(""), icon.src),
        });
    }
    if let Some(circle) = &rule.circle {
        swatches.push(LegendSwatch::Circle {
            radius: circle.radius,
            stroke: circle.stroke_color.clone(),
            width: schematic_width(circle.stroke_width.as_ref()).unwrap_or(1.0),
            fill: circle.fill_color.clone(),
        });
    }
    swatches
}

/// Eine Legendenzeile pro Regel in Deklarationsreihenfolge.
pub fn legend_rows(rules: &[StyleRule]) -> Vec<LegendRow> {
    rules
        .iter()
        .map(|rule| LegendRow {
            name: rule.name.clone(),
            swatches: swatches_for(rule),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rule_shows_polygon_and_circle() {
        let rows = legend_rows(&[StyleRule::default_rule()]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "default");
        assert!(matches!(rows[0].swatches[0], LegendSwatch::Polygon { .. }));
        assert!(matches!(rows[0].swatches[1], LegendSwatch::Circle { radius, .. } if radius == 5.0));
    }

    #[test]
    fn stroke_without_fill_is_a_line() {
        let rule: StyleRule =
            serde_json::from_str(r##"{"name": "weg", "strokeColor": "#333", "strokeWidth": 2}"##)
                .expect("gültiges JSON");
        assert_eq!(
            legend_rows(&[rule])[0].swatches,
            vec![LegendSwatch::Line {
                stroke: "#333".into(),
                width: 2.0
            }]
        );
    }
}

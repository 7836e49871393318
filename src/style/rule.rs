//! Stilregeln: Attribut-Prädikate + Stildefinition.
//!
//! Das JSON-Format entspricht der Layer-Konfiguration:
//!
//! ```json
//! { "name": "wald", "fields": { "typ": "$in(1,2)" },
//!   "fillColor": "$.farbe", "strokeColor": "#006400", "strokeWidth": 2,
//!   "text": { "labelMask": "{name}", "maxScale": 5000 } }
//! ```
//!
//! String-Werte mit Präfix `$.` verweisen auf ein Attribut des Features.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::model::{BaseStyle, CircleSymbol, Fill, IconSymbol, Stroke, Symbol};
use crate::core::{AttributeValue, Attributes};

/// Präfix für Attribut-Referenzen in Stilwerten.
pub const FIELD_REF_PREFIX: &str = "$.";
/// Marker für "Wert in Menge" in Prädikaten.
pub const IN_MARKER: &str = "$in";

/// Standard-Linienbreite, wenn eine Regel nur eine Farbe angibt.
const DEFAULT_STROKE_WIDTH: f64 = 1.0;

/// Zahl oder Attribut-Referenz (`"$.feld"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumberOrRef {
    Number(f64),
    Text(String),
}

impl NumberOrRef {
    fn is_field_ref(&self) -> bool {
        matches!(self, NumberOrRef::Text(s) if s.starts_with(FIELD_REF_PREFIX))
    }

    /// Löst den Wert gegen die Attribute auf.
    pub fn resolve(&self, attributes: &Attributes) -> Option<f64> {
        match self {
            NumberOrRef::Number(n) => Some(*n),
            NumberOrRef::Text(s) => match s.strip_prefix(FIELD_REF_PREFIX) {
                Some(field) => attributes.get(field).and_then(AttributeValue::as_f64),
                None => s.trim().parse().ok(),
            },
        }
    }
}

fn is_field_ref(value: &Option<String>) -> bool {
    value
        .as_deref()
        .is_some_and(|s| s.starts_with(FIELD_REF_PREFIX))
}

/// Löst einen Text-Stilwert auf: Literal direkt, `$.feld` aus den Attributen.
pub fn resolve_text(value: Option<&str>, attributes: &Attributes) -> Option<String> {
    let value = value?;
    match value.strip_prefix(FIELD_REF_PREFIX) {
        Some(field) => match attributes.get(field) {
            Some(AttributeValue::Null) | None => {
                log::debug!("Stil-Attribut '{}' nicht auflösbar", field);
                None
            }
            Some(v) => Some(v.to_string()),
        },
        None => Some(value.to_string()),
    }
}

/// Kreissymbol-Definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CircleRule {
    pub radius: f64,
    #[serde(default)]
    pub fill_color: Option<String>,
    #[serde(default)]
    pub stroke_color: Option<String>,
    #[serde(default)]
    pub stroke_width: Option<NumberOrRef>,
    #[serde(default)]
    pub line_dash: Option<Vec<f64>>,
}

/// Icon-Definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IconRule {
    pub src: String,
    /// Präfix vor `src` (z.B. `data:image/png;base64,`)
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    /// Rotation in Grad
    #[serde(default)]
    pub rotation: Option<f64>,
    #[serde(default)]
    pub anchor: Option<[f64; 2]>,
    #[serde(default)]
    pub opacity: Option<f64>,
    #[serde(default)]
    pub size: Option<[f64; 2]>,
    #[serde(default)]
    pub scale: Option<f64>,
}

/// Label-Definition mit `{attribut}`-Vorlage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextRule {
    pub label_mask: String,
    /// Größter Maßstab (1:n), bis zu dem das Label erscheint
    #[serde(default)]
    pub max_scale: Option<f64>,
    #[serde(default)]
    pub font: Option<String>,
    #[serde(default)]
    pub offset_x: Option<f64>,
    #[serde(default)]
    pub offset_y: Option<f64>,
    #[serde(default)]
    pub text_align: Option<String>,
    #[serde(default)]
    pub text_baseline: Option<String>,
    #[serde(default)]
    pub fill_color: Option<String>,
    #[serde(default)]
    pub stroke_color: Option<String>,
    #[serde(default)]
    pub stroke_width: Option<NumberOrRef>,
}

/// Ein einzelnes Attribut-Prädikat.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldMatch {
    /// Wert muss (locker) gleich sein
    Equals(AttributeValue),
    /// Wert muss in der Menge liegen (`$in(a,b,c)`)
    In(Vec<String>),
}

impl FieldMatch {
    /// Interpretiert einen konfigurierten Prädikatwert.
    pub fn parse(value: &AttributeValue) -> Self {
        match value {
            AttributeValue::Text(s) if s.contains(IN_MARKER) => {
                let inner = s
                    .replace(IN_MARKER, "")
                    .replace(['(', ')'], "");
                FieldMatch::In(
                    inner
                        .split(',')
                        .map(|v| v.trim().to_string())
                        .filter(|v| !v.is_empty())
                        .collect(),
                )
            }
            other => FieldMatch::Equals(other.clone()),
        }
    }

    /// Prüft das Prädikat gegen einen Attributwert (fehlend = `Null`).
    pub fn matches(&self, value: Option<&AttributeValue>) -> bool {
        let value = value.unwrap_or(&AttributeValue::Null);
        match self {
            FieldMatch::Equals(expected) => expected.loose_eq(value),
            FieldMatch::In(values) => values
                .iter()
                .any(|candidate| AttributeValue::Text(candidate.clone()).loose_eq(value)),
        }
    }
}

/// Eine Stilregel in Deklarationsreihenfolge.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleRule {
    #[serde(default)]
    pub name: String,
    /// Attribut-Prädikate; leer = passt immer
    #[serde(default)]
    pub fields: IndexMap<String, AttributeValue>,
    #[serde(default)]
    pub fill_color: Option<String>,
    #[serde(default)]
    pub stroke_color: Option<String>,
    #[serde(default)]
    pub stroke_width: Option<NumberOrRef>,
    #[serde(default)]
    pub line_dash: Option<Vec<f64>>,
    #[serde(default)]
    pub circle: Option<CircleRule>,
    #[serde(default)]
    pub icon: Option<IconRule>,
    #[serde(default)]
    pub text: Option<TextRule>,
}

impl StyleRule {
    /// Eingebaute Standardregel, wenn ein Layer keine Regeln konfiguriert.
    pub fn default_rule() -> Self {
        Self {
            name: "default".to_string(),
            fill_color: Some("rgba(192,192,192,0.5)".to_string()),
            stroke_color: Some("#808080".to_string()),
            stroke_width: Some(NumberOrRef::Number(3.0)),
            circle: Some(CircleRule {
                radius: 5.0,
                fill_color: Some("#1589FF".to_string()),
                stroke_color: Some("#2B3856".to_string()),
                stroke_width: Some(NumberOrRef::Number(2.0)),
                line_dash: None,
            }),
            ..Self::default()
        }
    }

    /// Alle Prädikate erfüllt? Eine Regel ohne Prädikate passt immer.
    pub fn matches(&self, attributes: &Attributes) -> bool {
        self.fields
            .iter()
            .all(|(key, value)| FieldMatch::parse(value).matches(attributes.get(key)))
    }

    /// Enthält der Basisstil Attribut-Referenzen? Solche Regeln werden nicht gecacht.
    pub fn is_dynamic(&self) -> bool {
        is_field_ref(&self.fill_color)
            || is_field_ref(&self.stroke_color)
            || self.stroke_width.as_ref().is_some_and(NumberOrRef::is_field_ref)
            || self.icon.as_ref().is_some_and(|icon| icon.src.starts_with(FIELD_REF_PREFIX))
            || self.circle.as_ref().is_some_and(|circle| {
                is_field_ref(&circle.fill_color)
                    || is_field_ref(&circle.stroke_color)
                    || circle
                        .stroke_width
                        .as_ref()
                        .is_some_and(NumberOrRef::is_field_ref)
            })
    }

    /// Baut den Basisstil für die gegebenen Attribute.
    ///
    /// Ein Kreissymbol hat Vorrang vor einem Icon.
    pub fn build_base(&self, attributes: &Attributes) -> BaseStyle {
        let stroke = build_stroke(
            self.stroke_color.as_deref(),
            self.stroke_width.as_ref(),
            self.line_dash.as_ref(),
            attributes,
        );
        let fill = resolve_text(self.fill_color.as_deref(), attributes).map(Fill::new);

        let image = if let Some(circle) = &self.circle {
            Some(Symbol::Circle(CircleSymbol {
                radius: circle.radius,
                fill: resolve_text(circle.fill_color.as_deref(), attributes).map(Fill::new),
                stroke: build_stroke(
                    circle.stroke_color.as_deref(),
                    circle.stroke_width.as_ref(),
                    circle.line_dash.as_ref(),
                    attributes,
                ),
            }))
        } else if let Some(icon) = &self.icon {
            resolve_text(Some(&icon.src), attributes).map(|src| {
                Symbol::Icon(IconSymbol {
                    src: format!("{}{}", icon.kind.as_deref().unwrap_or(""), src),
                    rotation: icon.rotation.unwrap_or(0.0).to_radians(),
                    anchor: icon.anchor.unwrap_or([0.5, 0.5]),
                    opacity: icon.opacity.unwrap_or(1.0),
                    size: icon.size,
                    scale: icon.scale,
                })
            })
        } else {
            None
        };

        BaseStyle {
            fill,
            stroke,
            image,
        }
    }
}

/// Linie nur, wenn eine Farbe auflösbar ist.
pub(crate) fn build_stroke(
    color: Option<&str>,
    width: Option<&NumberOrRef>,
    line_dash: Option<&Vec<f64>>,
    attributes: &Attributes,
) -> Option<Stroke> {
    let color = resolve_text(color, attributes)?;
    Some(Stroke {
        color,
        width: width
            .and_then(|w| w.resolve(attributes))
            .unwrap_or(DEFAULT_STROKE_WIDTH),
        line_dash: line_dash.cloned(),
    })
}

//! Features: Identität, Attribute und optionaler Instanz-Stil.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::geometry::Geometry;
use crate::style::StyleLayer;

/// Identität eines Features: `layerName + "." + localId`.
///
/// Client-seitig erzeugte Features bekommen negative, fallende IDs,
/// vom Server gelieferte behalten ihre eigene ID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FeatureId {
    /// Name des besitzenden Layers
    pub layer: String,
    /// Layer-lokale ID
    pub local: i64,
}

impl FeatureId {
    pub fn new(layer: impl Into<String>, local: i64) -> Self {
        Self {
            layer: layer.into(),
            local,
        }
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.layer, self.local)
    }
}

/// Fehler beim Parsen einer Feature-ID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFeatureIdError(pub String);

impl fmt::Display for ParseFeatureIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ungültige Feature-ID: '{}'", self.0)
    }
}

impl std::error::Error for ParseFeatureIdError {}

impl FromStr for FeatureId {
    type Err = ParseFeatureIdError;

    /// Trennt am letzten Punkt, Layer-Namen dürfen selbst Punkte enthalten.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (layer, local) = s
            .rsplit_once('.')
            .ok_or_else(|| ParseFeatureIdError(s.to_string()))?;
        if layer.is_empty() {
            return Err(ParseFeatureIdError(s.to_string()));
        }
        let local = local
            .parse::<i64>()
            .map_err(|_| ParseFeatureIdError(s.to_string()))?;
        Ok(Self::new(layer, local))
    }
}

/// Attributwert eines Features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum AttributeValue {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl AttributeValue {
    /// Gibt den Text zurück, falls der Wert ein String ist.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Numerische Interpretation (Zahlen direkt, Strings werden geparst).
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttributeValue::Number(n) => Some(*n),
            AttributeValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Lockerer Vergleich: `1` und `"1"` gelten als gleich.
    pub fn loose_eq(&self, other: &AttributeValue) -> bool {
        match (self, other) {
            (AttributeValue::Number(a), b) | (b, AttributeValue::Number(a)) => {
                b.as_f64().is_some_and(|b| b == *a)
            }
            (a, b) => a == b,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Null => Ok(()),
            AttributeValue::Bool(b) => write!(f, "{b}"),
            AttributeValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            AttributeValue::Number(n) => write!(f, "{n}"),
            AttributeValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Text(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::Text(value)
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        AttributeValue::Number(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Number(value as f64)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Bool(value)
    }
}

/// Geordnete Attribut-Map (Einfügereihenfolge bleibt erhalten).
pub type Attributes = IndexMap<String, AttributeValue>;

/// Instanz-Stil, der die Layer-Regeln für ein Feature ersetzt.
#[derive(Debug, Clone, PartialEq)]
pub enum StyleOverride {
    /// Feste Stil-Layer
    Layers(Vec<StyleLayer>),
    /// Selektions-Hervorhebung, wird beim Rendern berechnet.
    /// `previous` hält den Stil von vor der Selektion für die Wiederherstellung.
    Selected {
        previous: Option<Box<StyleOverride>>,
    },
}

/// Ein einzelnes Karten-Feature.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    /// Identität, `None` solange das Feature noch keinem Layer gehört
    pub id: Option<FeatureId>,
    pub geometry: Geometry,
    pub attributes: Attributes,
    pub style_override: Option<StyleOverride>,
}

impl Feature {
    /// Erstellt ein Feature ohne Identität und ohne Attribute.
    pub fn new(geometry: Geometry) -> Self {
        Self {
            id: None,
            geometry,
            attributes: Attributes::new(),
            style_override: None,
        }
    }

    /// Builder: setzt die Identität.
    pub fn with_id(mut self, id: FeatureId) -> Self {
        self.id = Some(id);
        self
    }

    /// Builder: setzt ein Attribut.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Liest ein Attribut.
    pub fn get(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }

    /// Gibt `true` zurück, wenn das Feature gerade als selektiert gestylt ist.
    pub fn is_highlighted(&self) -> bool {
        matches!(self.style_override, Some(StyleOverride::Selected { .. }))
    }
}

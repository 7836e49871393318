//! Import von Esri-"uniqueValue"-Renderern (`drawingInfo.renderer`) als Stilregeln.

use serde::Deserialize;

use super::rule::{IconRule, StyleRule, IN_MARKER};
use crate::core::AttributeValue;

const PNG_DATA_PREFIX: &str = "data:image/png;base64,";

/// Bildsymbol eines Renderers
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EsriSymbol {
    #[serde(default)]
    pub image_data: String,
}

/// Ein Eintrag der Wertetabelle
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EsriUniqueValueInfo {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub value: Option<AttributeValue>,
    /// Mehrere Werte für dasselbe Symbol
    #[serde(default)]
    pub values: Option<Vec<AttributeValue>>,
    pub symbol: EsriSymbol,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EsriRenderer {
    #[serde(default)]
    pub default_symbol: Option<EsriSymbol>,
    #[serde(default)]
    pub field1: Option<String>,
    #[serde(default)]
    pub unique_value_infos: Vec<EsriUniqueValueInfo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EsriDrawingInfo {
    pub renderer: EsriRenderer,
}

/// Layer-Stilkonfiguration im Esri-Format.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EsriStyleConfig {
    pub drawing_info: EsriDrawingInfo,
}

fn icon_rule(name: String, image_data: &str) -> StyleRule {
    StyleRule {
        name,
        icon: Some(IconRule {
            src: format!("{PNG_DATA_PREFIX}{image_data}"),
            kind: None,
            rotation: None,
            anchor: None,
            opacity: None,
            size: None,
            scale: None,
        }),
        ..StyleRule::default()
    }
}

/// Wandelt einen Renderer in Regeln um.
///
/// Jeder Tabelleneintrag wird zu einer Icon-Regel mit `field1 == value` bzw.
/// `$in(values)`, das Default-Symbol zur letzten Regel `default`.
pub fn rules_from_renderer(renderer: &EsriRenderer) -> Vec<StyleRule> {
    let mut rules = Vec::with_capacity(renderer.unique_value_infos.len() + 1);

    for info in &renderer.unique_value_infos {
        let mut rule = icon_rule(info.label.clone(), &info.symbol.image_data);
        if let Some(field) = &renderer.field1 {
            let predicate = match (&info.values, &info.value) {
                (Some(values), _) => {
                    let joined: Vec<String> = values.iter().map(ToString::to_string).collect();
                    AttributeValue::Text(format!("{IN_MARKER}({})", joined.join(",")))
                }
                (None, Some(value)) => value.clone(),
                (None, None) => AttributeValue::Null,
            };
            rule.fields.insert(field.clone(), predicate);
        }
        rules.push(rule);
    }

    // Regel ohne Prädikate passt immer, daher als Fallback ans Ende
    if let Some(symbol) = &renderer.default_symbol {
        rules.push(icon_rule("default".to_string(), &symbol.image_data));
    }

    log::debug!("Esri-Renderer importiert: {} Regeln", rules.len());
    rules
}

//! Regelbasierte Stil-Auflösung pro Layer.

use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;

use super::esri::{rules_from_renderer, EsriStyleConfig};
use super::label::build_label;
use super::legend::{legend_rows, LegendRow};
use super::model::{BaseStyle, StyleLayer};
use super::rule::StyleRule;
use crate::core::{Attributes, Feature};

/// Stilkonfiguration eines Layers: Regelliste oder Esri-Renderer.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum StyleConfig {
    Rules(Vec<StyleRule>),
    Esri(EsriStyleConfig),
}

/// Löst Feature-Attribute über die Regeln eines Layers in Stil-Layer auf.
///
/// Regeln werden in Deklarationsreihenfolge geprüft, die erste passende gewinnt,
/// sonst greift die letzte Regel. Statische Basisstile werden pro Regelname
/// gecacht und geteilt, Labels immer pro Feature neu berechnet.
#[derive(Debug, Clone)]
pub struct StyleResolver {
    rules: Vec<StyleRule>,
    meters_per_unit: f64,
    cache: RefCell<HashMap<String, Arc<BaseStyle>>>,
}

impl StyleResolver {
    /// Erstellt einen Resolver. Ohne Regeln gilt die eingebaute Standardregel.
    pub fn new(rules: Vec<StyleRule>) -> Self {
        let mut rules = if rules.is_empty() {
            vec![StyleRule::default_rule()]
        } else {
            rules
        };
        if let Some(first) = rules.first_mut() {
            if first.name.is_empty() {
                first.name = "default".to_string();
            }
        }
        Self {
            rules,
            meters_per_unit: 1.0,
            cache: RefCell::new(HashMap::new()),
        }
    }

    /// Baut den Resolver aus einer Stilkonfiguration.
    pub fn from_config(config: StyleConfig) -> Self {
        match config {
            StyleConfig::Rules(rules) => Self::new(rules),
            StyleConfig::Esri(esri) => Self::new(rules_from_renderer(&esri.drawing_info.renderer)),
        }
    }

    /// Parst eine JSON-Stilkonfiguration (Regelliste oder `drawingInfo`).
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let config: StyleConfig = serde_json::from_str(json)?;
        Ok(Self::from_config(config))
    }

    /// Builder: Meter pro Karteneinheit für die Label-Maßstabsgrenze.
    pub fn with_meters_per_unit(mut self, meters_per_unit: f64) -> Self {
        self.meters_per_unit = meters_per_unit;
        self
    }

    pub fn rules(&self) -> &[StyleRule] {
        &self.rules
    }

    /// Index und Regel, die für die Attribute gilt (erste passende, sonst die letzte).
    pub fn matching_rule(&self, attributes: &Attributes) -> Option<(usize, &StyleRule)> {
        self.rules
            .iter()
            .enumerate()
            .find(|(_, rule)| rule.matches(attributes))
            .or_else(|| self.rules.iter().enumerate().last())
    }

    /// Stil-Layer für ein Feature bei gegebener Auflösung.
    pub fn resolve(&self, feature: &Feature, resolution: f64) -> Vec<StyleLayer> {
        self.resolve_attributes(&feature.attributes, resolution)
    }

    /// Stil-Layer für einen Attributsatz bei gegebener Auflösung.
    pub fn resolve_attributes(&self, attributes: &Attributes, resolution: f64) -> Vec<StyleLayer> {
        let Some((index, rule)) = self.matching_rule(attributes) else {
            return Vec::new();
        };

        let base = if rule.is_dynamic() {
            Arc::new(rule.build_base(attributes))
        } else {
            let key = cache_key(index, rule);
            let mut cache = self.cache.borrow_mut();
            cache
                .entry(key)
                .or_insert_with(|| Arc::new(rule.build_base(attributes)))
                .clone()
        };

        let label = rule
            .text
            .as_ref()
            .and_then(|text| build_label(text, attributes, resolution, self.meters_per_unit));

        vec![StyleLayer { base, label }]
    }

    /// Legendenmodus: eine Zeile pro Regel, ohne Feature.
    pub fn legend(&self) -> Vec<LegendRow> {
        legend_rows(&self.rules)
    }

    /// Verwirft alle gecachten Basisstile.
    pub fn clear_cache(&self) {
        self.cache.borrow_mut().clear();
    }
}

impl Default for StyleResolver {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

/// Unbenannte Regeln bekommen einen Schlüssel aus ihrem Index.
fn cache_key(index: usize, rule: &StyleRule) -> String {
    if rule.name.is_empty() {
        format!("#{index}")
    } else {
        rule.name.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{AttributeValue, Geometry};
    use crate::style::model::Fill;
    use glam::DVec2;

    const RULES: &str = r##"[
        { "name": "a", "fields": { "type": 1 }, "fillColor": "#f00" },
        { "name": "fallback", "fields": { "type": 99 }, "fillColor": "#00f" }
    ]"##;

    fn feature(kind: f64) -> Feature {
        Feature::new(Geometry::Point(DVec2::ZERO)).with_attribute("type", kind)
    }

    fn fill_of(layers: &[StyleLayer]) -> Option<Fill> {
        layers.first().and_then(|l| l.base.fill.clone())
    }

    #[test]
    fn first_match_wins_and_last_rule_is_fallback() {
        let resolver = StyleResolver::from_json(RULES).expect("gültiges JSON");
        assert_eq!(fill_of(&resolver.resolve(&feature(1.0), 1.0)), Some(Fill::new("#f00")));
        assert_eq!(fill_of(&resolver.resolve(&feature(2.0), 1.0)), Some(Fill::new("#00f")));
    }

    #[test]
    fn exactly_one_layer_per_feature() {
        let resolver = StyleResolver::from_json(RULES).expect("gültiges JSON");
        assert_eq!(resolver.resolve(&feature(1.0), 1.0).len(), 1);
        assert_eq!(resolver.resolve(&feature(7.0), 1.0).len(), 1);
    }

    #[test]
    fn static_rules_share_cached_base_style() {
        let resolver = StyleResolver::from_json(RULES).expect("gültiges JSON");
        let first = resolver.resolve(&feature(1.0), 1.0);
        let second = resolver.resolve(&feature(1.0).with_attribute("other", "x"), 1.0);
        assert!(Arc::ptr_eq(&first[0].base, &second[0].base));
    }

    #[test]
    fn dynamic_rules_are_resolved_per_feature() {
        let resolver = StyleResolver::from_json(r#"[{ "name": "dyn", "fillColor": "$.farbe" }]"#)
            .expect("gültiges JSON");
        let red = Feature::new(Geometry::Point(DVec2::ZERO)).with_attribute("farbe", "red");
        let blue = Feature::new(Geometry::Point(DVec2::ZERO)).with_attribute("farbe", "blue");
        assert_eq!(fill_of(&resolver.resolve(&red, 1.0)), Some(Fill::new("red")));
        assert_eq!(fill_of(&resolver.resolve(&blue, 1.0)), Some(Fill::new("blue")));
    }

    #[test]
    fn empty_config_uses_default_rule() {
        let resolver = StyleResolver::default();
        assert_eq!(resolver.rules().len(), 1);
        assert_eq!(resolver.rules()[0].name, "default");
        let layers = resolver.resolve(&feature(1.0), 1.0);
        assert_eq!(fill_of(&layers), Some(Fill::new("rgba(192,192,192,0.5)")));
    }

    #[test]
    fn labels_are_recomputed_per_feature() {
        let resolver = StyleResolver::from_json(
            r#"[{ "name": "l", "text": { "labelMask": "{name}", "maxScale": 5000 } }]"#,
        )
        .expect("gültiges JSON");
        let a = Feature::new(Geometry::Point(DVec2::ZERO)).with_attribute("name", "A");
        let b = Feature::new(Geometry::Point(DVec2::ZERO)).with_attribute("name", "B");
        let la = resolver.resolve(&a, 0.1);
        let lb = resolver.resolve(&b, 0.1);
        assert_eq!(la[0].label.as_ref().map(|l| l.text.as_str()), Some("A"));
        assert_eq!(lb[0].label.as_ref().map(|l| l.text.as_str()), Some("B"));
        assert!(Arc::ptr_eq(&la[0].base, &lb[0].base));
        assert!(resolver.resolve(&a, 100.0)[0].label.is_none());
    }

    #[test]
    fn esri_config_is_accepted() {
        let json = r#"{ "drawingInfo": { "renderer": {
            "field1": "k",
            "defaultSymbol": { "imageData": "X" },
            "uniqueValueInfos": [ { "label": "eins", "value": 1, "symbol": { "imageData": "Y" } } ]
        } } }"#;
        let resolver = StyleResolver::from_json(json).expect("gültiges JSON");
        assert_eq!(resolver.rules().len(), 2);
        let (index, _) = resolver
            .matching_rule(&feature(5.0).attributes)
            .expect("Regel erwartet");
        assert_eq!(index, 1);
        let mut attrs = Attributes::new();
        attrs.insert("k".into(), AttributeValue::from(1.0));
        assert_eq!(resolver.matching_rule(&attrs).map(|(i, _)| i), Some(0));
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(StyleResolver::from_json("{ nope").is_err());
    }
}

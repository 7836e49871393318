//! Label-Vorlagen mit `{attribut}`-Platzhaltern.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::model::{Fill, TextLabel};
use super::rule::{build_stroke, resolve_text, TextRule};
use crate::core::view::resolution_from_scale;
use crate::core::Attributes;

/// Maßstab, bis zu dem Labels ohne eigene Angabe sichtbar sind (1:1000).
pub const DEFAULT_LABEL_MAX_SCALE: f64 = 1000.0;

static PLACEHOLDER: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\{([^{}]+)\}").ok());

/// Ersetzt `{name}`-Platzhalter durch Attributwerte.
/// Platzhalter ohne passendes Attribut werden entfernt.
pub fn format_template(mask: &str, attributes: &Attributes) -> String {
    let Some(re) = PLACEHOLDER.as_ref() else {
        return mask.to_string();
    };
    re.replace_all(mask, |caps: &Captures| {
        attributes
            .get(caps[1].trim())
            .map(|value| value.to_string())
            .unwrap_or_default()
    })
    .into_owned()
}

/// Baut das Label für ein Feature, falls die Auflösung es zulässt.
///
/// Über der maximalen Label-Auflösung gibt es kein Label.
pub fn build_label(
    rule: &TextRule,
    attributes: &Attributes,
    resolution: f64,
    meters_per_unit: f64,
) -> Option<TextLabel> {
    let max_resolution = resolution_from_scale(
        rule.max_scale.unwrap_or(DEFAULT_LABEL_MAX_SCALE),
        meters_per_unit,
    );
    if resolution > max_resolution {
        return None;
    }
    Some(TextLabel {
        text: format_template(&rule.label_mask, attributes),
        font: rule.font.clone(),
        offset: [rule.offset_x.unwrap_or(0.0), rule.offset_y.unwrap_or(0.0)],
        text_align: rule.text_align.clone(),
        text_baseline: rule.text_baseline.clone(),
        fill: resolve_text(rule.fill_color.as_deref(), attributes).map(Fill::new),
        stroke: build_stroke(
            rule.stroke_color.as_deref(),
            rule.stroke_width.as_ref(),
            None,
            attributes,
        ),
    })
}

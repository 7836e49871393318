//! Stil selektierter Features: fester Selektionsstil oder Layer-Stil + Hervorhebung.

use crate::core::Feature;
use crate::shared::options::SelectionStyleOptions;
use crate::style::{BaseStyle, CircleSymbol, Fill, Stroke, StyleLayer, Symbol};

/// Fester Selektionsstil (`use_default_style`).
pub fn default_select_style() -> StyleLayer {
    let fill = Fill::new("rgba(255,255,255,0.8)");
    let stroke = Stroke::new("#3399CC", 3.0);
    StyleLayer::new(BaseStyle {
        fill: Some(fill.clone()),
        stroke: Some(stroke.clone()),
        image: Some(Symbol::Circle(CircleSymbol {
            radius: 6.0,
            fill: Some(fill),
            stroke: Some(stroke),
        })),
    })
}

/// Hervorhebungs-Layer passend zum ersten Basis-Layer.
///
/// Ein Punktsymbol wird um `radius_ratio` vergrößert. Ohne Basisstil
/// gibt es einen breiten Rand und den konfigurierten Radius.
pub fn highlight_layer(options: &SelectionStyleOptions, base: &[StyleLayer]) -> StyleLayer {
    let fill = Fill::new(options.fill_color.clone());

    let Some(first) = base.first() else {
        let stroke = Stroke::new(options.stroke_color.clone(), 10.0);
        return StyleLayer::new(BaseStyle {
            fill: Some(fill.clone()),
            stroke: Some(stroke.clone()),
            image: Some(Symbol::Circle(CircleSymbol {
                radius: options.radius,
                fill: Some(fill),
                stroke: Some(stroke),
            })),
        });
    };

    let stroke = Stroke::new(options.stroke_color.clone(), options.stroke_width);
    let radius = first
        .base
        .image
        .as_ref()
        .and_then(Symbol::size)
        .map(|size| (size.x + size.x * options.radius_ratio) / 2.0)
        .unwrap_or(options.radius);

    StyleLayer::new(BaseStyle {
        fill: Some(fill.clone()),
        stroke: Some(stroke.clone()),
        image: Some(Symbol::Circle(CircleSymbol {
            radius,
            fill: Some(fill),
            stroke: Some(stroke),
        })),
    })
}

/// Stil-Layer eines selektierten Features.
///
/// Bei Punkten liegt die Hervorhebung vorne (unter dem Symbol), sonst hinten.
pub fn selected_style(
    options: &SelectionStyleOptions,
    feature: &Feature,
    mut base: Vec<StyleLayer>,
) -> Vec<StyleLayer> {
    if options.use_default_style {
        return vec![default_select_style()];
    }
    let highlight = highlight_layer(options, &base);
    if feature.geometry.is_point() {
        base.insert(0, highlight);
    } else {
        base.push(highlight);
    }
    base
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Geometry;
    use glam::DVec2;

    fn circle_base(radius: f64) -> Vec<StyleLayer> {
        vec![StyleLayer::new(BaseStyle {
            image: Some(Symbol::Circle(CircleSymbol {
                radius,
                fill: None,
                stroke: None,
            })),
            ..BaseStyle::default()
        })]
    }

    #[test]
    fn point_highlight_is_prepended() {
        let options = SelectionStyleOptions::default();
        let feature = Feature::new(Geometry::Point(DVec2::ZERO));
        let base = circle_base(5.0);
        let styles = selected_style(&options, &feature, base.clone());
        assert_eq!(styles.len(), 2);
        assert_eq!(styles[1], base[0]);
    }

    #[test]
    fn line_highlight_is_appended() {
        let options = SelectionStyleOptions::default();
        let feature = Feature::new(Geometry::LineString(vec![DVec2::ZERO, DVec2::ONE]));
        let base = circle_base(5.0);
        let styles = selected_style(&options, &feature, base.clone());
        assert_eq!(styles[0], base[0]);
    }

    #[test]
    fn highlight_radius_scales_with_symbol_size() {
        let options = SelectionStyleOptions::default();
        let layer = highlight_layer(&options, &circle_base(4.0));
        let Some(Symbol::Circle(circle)) = &layer.base.image else {
            panic!("Kreis erwartet");
        };
        // Durchmesser 8, +50% = 12, Radius 6
        assert_eq!(circle.radius, 6.0);
    }

    #[test]
    fn missing_base_style_uses_wide_stroke() {
        let options = SelectionStyleOptions::default();
        let layer = highlight_layer(&options, &[]);
        assert_eq!(layer.base.stroke.as_ref().map(|s| s.width), Some(10.0));
    }

    #[test]
    fn default_style_replaces_everything() {
        let options = SelectionStyleOptions {
            use_default_style: true,
            ..SelectionStyleOptions::default()
        };
        let feature = Feature::new(Geometry::Point(DVec2::ZERO));
        let styles = selected_style(&options, &feature, circle_base(5.0));
        assert_eq!(styles, vec![default_select_style()]);
    }
}

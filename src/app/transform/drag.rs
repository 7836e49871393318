//! Reine Drag-Mathematik: Rotationswinkel und Skalierungsfaktoren.
//!
//! Rotation und Skalierung rechnen immer vom Snapshot beim Drag-Start aus,
//! nie inkrementell auf der Live-Geometrie.

use std::f64::consts::{PI, TAU};

use glam::DVec2;

use super::handles::AxisConstraint;

/// Winkel (Radiant) zwischen Start- und aktueller Zeigerposition um `center`,
/// normiert auf `(-π, π]`.
pub fn rotation_angle(center: DVec2, start: DVec2, current: DVec2) -> f64 {
    let start_dir = center - start;
    let current_dir = center - current;
    let raw = current_dir.y.atan2(current_dir.x) - start_dir.y.atan2(start_dir.x);
    PI - (PI - raw).rem_euclid(TAU)
}

/// Skalierungsfaktoren relativ zu `pivot`.
///
/// Eine Achsenbeschränkung setzt den Faktor der anderen Achse auf 1.
/// Ohne Beschränkung erzwingt `keep_aspect_ratio` `sx = sy = min(sx, sy)`.
/// Liegt der Start auf der Pivot-Achse, bleibt der Faktor 1.
pub fn scale_factors(
    pivot: DVec2,
    start: DVec2,
    current: DVec2,
    constraint: Option<AxisConstraint>,
    keep_aspect_ratio: bool,
) -> DVec2 {
    let mut sx = axis_factor(current.x - pivot.x, start.x - pivot.x);
    let mut sy = axis_factor(current.y - pivot.y, start.y - pivot.y);
    match constraint {
        Some(AxisConstraint::Horizontal) => sy = 1.0,
        Some(AxisConstraint::Vertical) => sx = 1.0,
        None if keep_aspect_ratio => {
            let s = sx.min(sy);
            sx = s;
            sy = s;
        }
        None => {}
    }
    DVec2::new(sx, sy)
}

fn axis_factor(current: f64, start: f64) -> f64 {
    if start.abs() <= f64::EPSILON {
        1.0
    } else {
        current / start
    }
}

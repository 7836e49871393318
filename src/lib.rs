//! Geo Feature Editor Library.
//! Interaktives Editieren von Vektor-Features: Stil-Auflösung, Selektion,
//! Transform-Interaktion, Verlauf und Editier-Sitzung.

pub mod app;
pub mod core;
pub mod shared;
pub mod style;

pub use app::{
    AppCommand, AppController, AppIntent, AppState, EditingSession, SelectionManager,
    TransformInteraction,
};
pub use core::{Extent, Feature, FeatureId, FeatureMap, Geometry, GeometryKind, Layer, MapView};
pub use shared::{EditorOptions, RenderScene};
pub use style::{StyleLayer, StyleResolver};

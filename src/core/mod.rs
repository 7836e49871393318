//! Core-Domänentypen: Geometrien, Features, Layer, Kartenansicht, Spatial-Index.

pub mod feature;
pub mod geometry;
pub mod layer;
pub mod map;
pub mod pointer;
pub mod spatial;
pub mod view;

pub use feature::{
    AttributeValue, Attributes, Feature, FeatureId, ParseFeatureIdError, StyleOverride,
};
pub use geometry::{Extent, Geometry, GeometryKind, VertexRef};
pub use layer::{FeatureLoader, FeatureSource, Layer};
pub use map::FeatureMap;
pub use pointer::{Modifiers, PointerEvent};
pub use spatial::{SpatialIndex, VertexIndex, VertexMatch};
pub use view::{resolution_from_scale, MapView};

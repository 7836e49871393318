//! Stil-Auflösung: Regeln, Resolver, Label-Vorlagen, Legende, Esri-Import.

pub mod esri;
pub mod label;
pub mod legend;
pub mod model;
pub mod resolver;
pub mod rule;

pub use label::{format_template, DEFAULT_LABEL_MAX_SCALE};
pub use legend::{LegendRow, LegendSwatch};
pub use model::{BaseStyle, CircleSymbol, Fill, IconSymbol, Stroke, StyleLayer, Symbol, TextLabel};
pub use resolver::{StyleConfig, StyleResolver};
pub use rule::{FieldMatch, StyleRule};

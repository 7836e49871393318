//! Application-Layer: Controller, State, Events und Interaktionen.

pub mod command_log;
pub mod controller;
pub mod editing;
pub mod events;
pub mod handlers;
pub mod history;
mod intent_mapping;
pub mod render_scene;
pub mod selection;
/// Application State
///
/// Hält Karte, Selektion, Editier-Sitzung und Optionen.
pub mod state;
pub mod transform;

pub use command_log::CommandLog;
pub use controller::AppController;
pub use editing::{ActiveTool, EditingSession, EditorEvent, ToolKind};
pub use events::{AppCommand, AppIntent, EventBus, SubscriberId};
pub use history::{EditHistory, FeatureSnapshot, FeatureStates};
pub use render_scene::build as build_render_scene;
pub use selection::{SelectionEvent, SelectionManager, SelectionMode};
pub use state::AppState;
pub use transform::{CursorHint, HandleKind, TransformEvent, TransformInteraction, TransformMode};

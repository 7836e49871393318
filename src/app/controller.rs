//! Application Controller für zentrale Event-Verarbeitung.

use super::render_scene;
use super::{AppCommand, AppIntent, AppState};
use crate::shared::RenderScene;

/// Orchestriert Host-Events und Interaktionen auf den AppState.
#[derive(Default)]
pub struct AppController;

impl AppController {
    /// Erstellt einen neuen Controller.
    pub fn new() -> Self {
        Self
    }

    /// Verarbeitet einen Intent über Intent->Command Mapping.
    pub fn handle_intent(&mut self, state: &mut AppState, intent: AppIntent) -> anyhow::Result<()> {
        let commands = self.map_intent_to_commands(state, intent);
        for command in commands {
            self.handle_command(state, command)?;
        }

        Ok(())
    }

    fn map_intent_to_commands(&self, state: &AppState, intent: AppIntent) -> Vec<AppCommand> {
        super::intent_mapping::map_intent_to_commands(state, intent)
    }

    /// Führt mutierende Commands auf dem AppState aus.
    /// Dispatcht an Feature-Handler in `handlers/`.
    pub fn handle_command(
        &mut self,
        state: &mut AppState,
        command: AppCommand,
    ) -> anyhow::Result<()> {
        state.command_log.record(&command);
        // Während eines Drags genügt der lineare Fallback; der Index folgt beim Loslassen
        let refresh_index = !matches!(command, AppCommand::ContinuePointerGesture { .. });
        use super::handlers;

        match command {
            // === Ansicht ===
            AppCommand::SetViewportSize { size } => handlers::view::set_viewport_size(state, size),
            AppCommand::SetView { center, resolution } => {
                handlers::view::set_view(state, center, resolution)
            }
            AppCommand::ZoomToFeatures { ids } => handlers::view::zoom_to_features(state, &ids),

            // === Zeiger ===
            AppCommand::BeginPointerGesture { event } => {
                handlers::pointer::begin_gesture(state, &event)
            }
            AppCommand::ContinuePointerGesture { event } => {
                handlers::pointer::continue_gesture(state, &event)
            }
            AppCommand::EndPointerGesture { event } => handlers::pointer::end_gesture(state, &event),
            AppCommand::UpdateHover { event } => handlers::pointer::hover(state, &event),
            AppCommand::RouteClick { event } => handlers::pointer::click(state, &event),
            AppCommand::RouteDoubleClick { event } => {
                handlers::pointer::double_click(state, &event)
            }

            // === Selektion ===
            AppCommand::BeginBoxSelection => handlers::selection::begin_box(state),
            AppCommand::FinishBoxSelection { extent } => {
                handlers::selection::finish_box(state, &extent)
            }
            AppCommand::ActivateClickSelection => handlers::selection::activate_click(state),
            AppCommand::ActivateWindowSelection => handlers::selection::activate_window(state),
            AppCommand::DeactivateSelection => handlers::selection::deactivate(state),
            AppCommand::SelectFeatures { ids, zoom_to } => {
                handlers::selection::select_features(state, &ids, zoom_to)
            }
            AppCommand::UnselectFeatures { ids } => {
                handlers::selection::unselect_features(state, &ids)
            }
            AppCommand::ClearSelection => handlers::selection::clear(state),

            // === Editing ===
            AppCommand::StartEditing => handlers::editing::start(state),
            AppCommand::StopEditing => handlers::editing::stop(state),
            AppCommand::ActivateDraw { kind, layer } => {
                handlers::editing::draw(state, kind, layer.as_deref())
            }
            AppCommand::ActivateDrawEditableType { index } => {
                handlers::editing::draw_editable_type(state, index)
            }
            AppCommand::ActivateModify => handlers::editing::modify(state),
            AppCommand::ActivateMove => handlers::editing::move_selected(state),
            AppCommand::ActivateTransform => handlers::editing::transform(state),
            AppCommand::DeactivateTool => handlers::editing::deactivate_tool(state),
            AppCommand::CancelSketch => handlers::editing::cancel_sketch(state),
            AppCommand::DeleteFeatures { ids } => handlers::editing::delete_features(state, &ids),

            // === History ===
            AppCommand::Undo => handlers::history::undo(state),
            AppCommand::Redo => handlers::history::redo(state),

            // === Optionen ===
            AppCommand::ApplyOptions { options } => {
                handlers::options::apply_options(state, *options)?
            }
            AppCommand::ResetOptions => handlers::options::reset_options(state)?,
        }

        if refresh_index {
            state.map.ensure_spatial_index();
        }
        Ok(())
    }

    /// Baut die Render-Szene aus dem aktuellen AppState.
    pub fn build_render_scene(&self, state: &AppState) -> RenderScene {
        render_scene::build(state)
    }
}

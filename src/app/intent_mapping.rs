//! Mapping von UI-Intents auf mutierende App-Commands.

use super::editing::ToolKind;
use super::{AppCommand, AppIntent, AppState};

/// Übersetzt einen `AppIntent` in eine Sequenz ausführbarer `AppCommand`s.
pub fn map_intent_to_commands(state: &AppState, intent: AppIntent) -> Vec<AppCommand> {
    match intent {
        AppIntent::ViewportResized { size } => vec![AppCommand::SetViewportSize { size }],
        AppIntent::ViewChanged { center, resolution } => {
            vec![AppCommand::SetView { center, resolution }]
        }
        AppIntent::ZoomToFeaturesRequested { ids } => vec![AppCommand::ZoomToFeatures { ids }],

        AppIntent::PointerPressed { event } => vec![AppCommand::BeginPointerGesture { event }],
        AppIntent::PointerDragged { event } => {
            vec![AppCommand::ContinuePointerGesture { event }]
        }
        AppIntent::PointerReleased { event } => vec![AppCommand::EndPointerGesture { event }],
        AppIntent::PointerMoved { event } => vec![AppCommand::UpdateHover { event }],
        AppIntent::Clicked { event } => vec![AppCommand::RouteClick { event }],
        AppIntent::DoubleClicked { event } => vec![AppCommand::RouteDoubleClick { event }],

        AppIntent::BoxSelectionStarted => vec![AppCommand::BeginBoxSelection],
        AppIntent::BoxSelectionFinished { extent } => {
            vec![AppCommand::FinishBoxSelection { extent }]
        }

        AppIntent::SelectByClickRequested => vec![AppCommand::ActivateClickSelection],
        AppIntent::SelectByWindowRequested => vec![AppCommand::ActivateWindowSelection],
        AppIntent::SelectionDeactivated => vec![AppCommand::DeactivateSelection],
        AppIntent::SelectFeaturesRequested { ids, zoom_to } => {
            vec![AppCommand::SelectFeatures { ids, zoom_to }]
        }
        AppIntent::UnselectFeaturesRequested { ids } => {
            vec![AppCommand::UnselectFeatures { ids }]
        }
        AppIntent::ClearSelectionRequested => vec![AppCommand::ClearSelection],

        AppIntent::StartEditingRequested => vec![AppCommand::StartEditing],
        AppIntent::StopEditingRequested => vec![AppCommand::StopEditing],

        AppIntent::DrawRequested { kind, layer } => vec![AppCommand::ActivateDraw { kind, layer }],
        AppIntent::DrawEditableTypeRequested { index } => {
            vec![AppCommand::ActivateDrawEditableType { index }]
        }
        AppIntent::ModifyRequested => vec![AppCommand::ActivateModify],
        AppIntent::MoveRequested => vec![AppCommand::ActivateMove],
        AppIntent::TransformRequested => vec![AppCommand::ActivateTransform],
        AppIntent::ToolDeactivateRequested => vec![AppCommand::DeactivateTool],

        AppIntent::EscapePressed => {
            if state.session.has_pending_sketch() {
                vec![AppCommand::CancelSketch]
            } else if state.session.tool_kind() != ToolKind::None {
                vec![AppCommand::DeactivateTool]
            } else if !state.selection.is_empty() {
                vec![AppCommand::ClearSelection]
            } else {
                vec![]
            }
        }
        AppIntent::DeleteSelectedRequested => {
            if !state.session.is_editing() || state.selection.is_empty() {
                return vec![];
            }
            vec![AppCommand::DeleteFeatures {
                ids: state.selection.selection(),
            }]
        }
        AppIntent::UndoRequested => vec![AppCommand::Undo],
        AppIntent::RedoRequested => vec![AppCommand::Redo],

        AppIntent::OptionsChanged { options } => vec![AppCommand::ApplyOptions { options }],
        AppIntent::ResetOptionsRequested => vec![AppCommand::ResetOptions],
    }
}

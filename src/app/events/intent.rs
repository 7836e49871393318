use crate::core::{Extent, FeatureId, GeometryKind, PointerEvent};
use crate::shared::EditorOptions;

/// App-Intent und App-Command Events.
/// Intents sind Eingaben aus UI/System ohne direkte Mutationslogik.
#[derive(Debug, Clone)]
pub enum AppIntent {
    /// Viewport-Größe hat sich geändert (Pixel)
    ViewportResized { size: [f64; 2] },
    /// Ansicht verschoben oder gezoomt
    ViewChanged { center: glam::DVec2, resolution: f64 },
    /// Auf Features zoomen
    ZoomToFeaturesRequested { ids: Vec<FeatureId> },

    /// Zeiger gedrückt
    PointerPressed { event: PointerEvent },
    /// Zeiger bei gedrückter Taste bewegt
    PointerDragged { event: PointerEvent },
    /// Zeiger losgelassen
    PointerReleased { event: PointerEvent },
    /// Hover ohne gedrückte Taste
    PointerMoved { event: PointerEvent },
    /// Einzelklick
    Clicked { event: PointerEvent },
    /// Doppelklick
    DoubleClicked { event: PointerEvent },

    /// Box-Selektion begonnen
    BoxSelectionStarted,
    /// Box-Selektion abgeschlossen
    BoxSelectionFinished { extent: Extent },

    /// Klick-Selektion aktivieren
    SelectByClickRequested,
    /// Fenster-Selektion aktivieren
    SelectByWindowRequested,
    /// Selektion deaktivieren (leert sie)
    SelectionDeactivated,
    /// Features programmatisch selektieren
    SelectFeaturesRequested { ids: Vec<FeatureId>, zoom_to: bool },
    /// Features aus der Selektion nehmen
    UnselectFeaturesRequested { ids: Vec<FeatureId> },
    /// Selektion leeren
    ClearSelectionRequested,

    /// Editier-Sitzung starten
    StartEditingRequested,
    /// Editier-Sitzung beenden
    StopEditingRequested,

    /// Zeichnen aktivieren (ohne Layer: Editor-Layer)
    DrawRequested {
        kind: GeometryKind,
        layer: Option<String>,
    },
    /// Zeichnen für einen konfigurierten Feature-Typ
    DrawEditableTypeRequested { index: usize },
    /// Stützpunkt-Bearbeitung für die Selektion
    ModifyRequested,
    /// Verschieben für die Selektion
    MoveRequested,
    /// Transform-Interaktion aktivieren
    TransformRequested,
    /// Aktives Werkzeug beenden
    ToolDeactivateRequested,

    /// Escape: Skizze verwerfen, Werkzeug beenden oder Selektion leeren
    EscapePressed,
    /// Selektierte Features löschen
    DeleteSelectedRequested,
    /// Rückgängig
    UndoRequested,
    /// Wiederholen
    RedoRequested,

    /// Optionen wurden geändert
    OptionsChanged { options: Box<EditorOptions> },
    /// Optionen auf Standardwerte zurücksetzen
    ResetOptionsRequested,
}

use crate::core::{Extent, FeatureId, GeometryKind, PointerEvent};
use crate::shared::EditorOptions;

/// Commands sind mutierende Schritte, die zentral ausgeführt werden.
#[derive(Debug, Clone)]
pub enum AppCommand {
    /// Viewport-Größe setzen
    SetViewportSize { size: [f64; 2] },
    /// Ansicht setzen
    SetView { center: glam::DVec2, resolution: f64 },
    /// Ansicht auf Features einpassen
    ZoomToFeatures { ids: Vec<FeatureId> },

    /// Zeiger-Geste beginnen
    BeginPointerGesture { event: PointerEvent },
    /// Zeiger-Geste fortsetzen
    ContinuePointerGesture { event: PointerEvent },
    /// Zeiger-Geste beenden (committet Änderungen)
    EndPointerGesture { event: PointerEvent },
    /// Cursor-Hinweis und Skizzen-Vorschau aktualisieren
    UpdateHover { event: PointerEvent },
    /// Einzelklick an das aktive Werkzeug oder die Selektion
    RouteClick { event: PointerEvent },
    /// Doppelklick an das aktive Werkzeug
    RouteDoubleClick { event: PointerEvent },

    /// Box-Selektion beginnen
    BeginBoxSelection,
    /// Box-Selektion abschließen
    FinishBoxSelection { extent: Extent },

    /// Selektionsmodus: Klick
    ActivateClickSelection,
    /// Selektionsmodus: Fenster
    ActivateWindowSelection,
    /// Selektion deaktivieren
    DeactivateSelection,
    /// Features selektieren
    SelectFeatures { ids: Vec<FeatureId>, zoom_to: bool },
    /// Features abwählen
    UnselectFeatures { ids: Vec<FeatureId> },
    /// Selektion aufheben
    ClearSelection,

    /// Editier-Sitzung starten
    StartEditing,
    /// Editier-Sitzung beenden
    StopEditing,

    /// Zeichen-Werkzeug aktivieren
    ActivateDraw {
        kind: GeometryKind,
        layer: Option<String>,
    },
    /// Zeichen-Werkzeug für konfigurierten Typ
    ActivateDrawEditableType { index: usize },
    /// Stützpunkt-Bearbeitung aktivieren
    ActivateModify,
    /// Verschiebe-Werkzeug aktivieren
    ActivateMove,
    /// Transform-Interaktion aktivieren
    ActivateTransform,
    /// Aktives Werkzeug beenden
    DeactivateTool,
    /// Laufende Skizze verwerfen
    CancelSketch,

    /// Features löschen
    DeleteFeatures { ids: Vec<FeatureId> },
    /// Undo
    Undo,
    /// Redo
    Redo,

    /// Optionen anwenden
    ApplyOptions { options: Box<EditorOptions> },
    /// Optionen zurücksetzen
    ResetOptions,
}

//! Zentrale Konfiguration für den Feature-Editor.
//!
//! `EditorOptions` enthält alle zur Laufzeit änderbaren Werte.
//! Die `const`-Werte bleiben als Fallback/Default erhalten.

use serde::{Deserialize, Serialize};

use crate::core::{GeometryKind, Modifiers};

// ── Selektion ───────────────────────────────────────────────────────

/// Füllfarbe der Selektions-Hervorhebung.
pub const SELECTION_FILL_COLOR: &str = "rgba(48,144,199,0.8)";
/// Randfarbe der Selektions-Hervorhebung.
pub const SELECTION_STROKE_COLOR: &str = "#3399CC";
/// Randbreite der Selektions-Hervorhebung in Pixeln.
pub const SELECTION_STROKE_WIDTH: f64 = 3.0;
/// Vergrößerung des Punktsymbols relativ zur Symbolgröße.
pub const SELECTION_RADIUS_RATIO: f64 = 0.5;
/// Kreisradius der Hervorhebung, wenn kein Basisstil existiert.
pub const SELECTION_RADIUS: f64 = 6.0;
/// Pick-Toleranz in Screen-Pixeln.
pub const SELECTION_PICK_TOLERANCE_PX: f64 = 3.0;

// ── Transformation ──────────────────────────────────────────────────

/// Pick-Toleranz für Handles in Screen-Pixeln.
pub const TRANSFORM_HANDLE_TOLERANCE_PX: f64 = 8.0;
/// Halbe Kantenlänge der Handle-Box um Punktgeometrien in Pixeln.
pub const TRANSFORM_POINT_HANDLE_MARGIN_PX: f64 = 10.0;

// ── Editieren ───────────────────────────────────────────────────────

/// Name des Standard-Editor-Layers.
pub const EDITOR_LAYER_NAME: &str = "editor";
/// Fangradius beim Zeichnen in Screen-Pixeln.
pub const SNAP_TOLERANCE_PX: f64 = 10.0;

/// Tasten-Bedingung für Gesten-Optionen (z.B. Seitenverhältnis sperren).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum KeyCondition {
    Always,
    Never,
    #[default]
    Shift,
    Ctrl,
    Alt,
}

impl KeyCondition {
    /// Wertet die Bedingung gegen die gedrückten Modifier aus.
    pub fn evaluate(&self, modifiers: &Modifiers) -> bool {
        match self {
            KeyCondition::Always => true,
            KeyCondition::Never => false,
            KeyCondition::Shift => modifiers.shift,
            KeyCondition::Ctrl => modifiers.ctrl_or_meta(),
            KeyCondition::Alt => modifiers.alt,
        }
    }
}

/// Stil der Selektions-Hervorhebung
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SelectionStyleOptions {
    pub fill_color: String,
    pub stroke_color: String,
    pub stroke_width: f64,
    pub radius_ratio: f64,
    pub radius: f64,
    /// Fester Selektionsstil statt Layer-Stil + Hervorhebung
    pub use_default_style: bool,
}

impl Default for SelectionStyleOptions {
    fn default() -> Self {
        Self {
            fill_color: SELECTION_FILL_COLOR.to_string(),
            stroke_color: SELECTION_STROKE_COLOR.to_string(),
            stroke_width: SELECTION_STROKE_WIDTH,
            radius_ratio: SELECTION_RADIUS_RATIO,
            radius: SELECTION_RADIUS,
            use_default_style: false,
        }
    }
}

/// Schalter der Transform-Interaktion
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TransformOptions {
    /// Translate-Handle in der Box-Mitte
    pub translate: bool,
    /// Feature selbst ziehen verschiebt es
    pub translate_feature: bool,
    /// Kanten-Handles mit Achsenbeschränkung
    pub stretch: bool,
    /// Eck-Handles zum Skalieren
    pub scale: bool,
    pub rotate: bool,
    /// Bedingung für gleichmäßige Skalierung
    pub keep_aspect_ratio: KeyCondition,
    pub handle_tolerance_px: f64,
    pub point_handle_margin_px: f64,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            translate: true,
            translate_feature: true,
            stretch: true,
            scale: true,
            rotate: true,
            keep_aspect_ratio: KeyCondition::Shift,
            handle_tolerance_px: TRANSFORM_HANDLE_TOLERANCE_PX,
            point_handle_margin_px: TRANSFORM_POINT_HANDLE_MARGIN_PX,
        }
    }
}

impl TransformOptions {
    /// Voreinstellung des Transform-Werkzeugs der Editier-Sitzung:
    /// nur Rotation und Translate-Handle, Seitenverhältnis immer gesperrt.
    pub fn session_tool() -> Self {
        Self {
            translate: true,
            translate_feature: false,
            stretch: false,
            scale: false,
            rotate: true,
            keep_aspect_ratio: KeyCondition::Always,
            ..Self::default()
        }
    }
}

/// Zeichenbarer Feature-Typ der Editier-Sitzung
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EditableType {
    /// Anzeigename
    pub label: String,
    /// Ziel-Layer
    pub layer: String,
    pub kind: GeometryKind,
}

impl EditableType {
    pub fn new(label: impl Into<String>, layer: impl Into<String>, kind: GeometryKind) -> Self {
        Self {
            label: label.into(),
            layer: layer.into(),
            kind,
        }
    }
}

fn default_editable_types() -> Vec<EditableType> {
    vec![
        EditableType::new("Point", EDITOR_LAYER_NAME, GeometryKind::Point),
        EditableType::new("Line String", EDITOR_LAYER_NAME, GeometryKind::LineString),
        EditableType::new("Polygon", EDITOR_LAYER_NAME, GeometryKind::Polygon),
    ]
}

/// Einstellungen der Editier-Sitzung
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EditingOptions {
    pub editor_layer: String,
    pub editable_types: Vec<EditableType>,
    pub snap_tolerance_px: f64,
}

impl Default for EditingOptions {
    fn default() -> Self {
        Self {
            editor_layer: EDITOR_LAYER_NAME.to_string(),
            editable_types: default_editable_types(),
            snap_tolerance_px: SNAP_TOLERANCE_PX,
        }
    }
}

// ── Laufzeit-Optionen (serialisierbar) ─────────────────────────────

/// Alle zur Laufzeit änderbaren Editor-Optionen.
/// Wird als `geo_feature_editor.toml` neben der Binary gespeichert.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EditorOptions {
    /// Pick-Toleranz für Klick-Selektion (Pixel)
    #[serde(default = "default_pick_tolerance_px")]
    pub pick_tolerance_px: f64,
    #[serde(default)]
    pub selection: SelectionStyleOptions,
    /// Schalter des Transform-Werkzeugs; ohne Abschnitt `TransformOptions::session_tool`
    #[serde(default = "TransformOptions::session_tool")]
    pub transform: TransformOptions,
    #[serde(default)]
    pub editing: EditingOptions,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            pick_tolerance_px: SELECTION_PICK_TOLERANCE_PX,
            selection: SelectionStyleOptions::default(),
            transform: TransformOptions::session_tool(),
            editing: EditingOptions::default(),
        }
    }
}

/// Serde-Default für `pick_tolerance_px` (Abwärtskompatibilität bestehender TOML-Dateien).
fn default_pick_tolerance_px() -> f64 {
    SELECTION_PICK_TOLERANCE_PX
}

impl EditorOptions {
    /// Lädt Optionen aus einer TOML-Datei. Bei Fehler: Standardwerte.
    pub fn load_from_file(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::from_toml_or_default(&content, path),
            Err(_) => {
                log::info!("Keine Optionen-Datei gefunden, verwende Standardwerte");
                Self::default()
            }
        }
    }

    fn from_toml_or_default(content: &str, path: &std::path::Path) -> Self {
        match toml::from_str(content) {
            Ok(opts) => {
                log::info!("Optionen geladen aus: {}", path.display());
                opts
            }
            Err(e) => {
                log::warn!("Optionen-Datei fehlerhaft, verwende Standardwerte: {}", e);
                Self::default()
            }
        }
    }

    /// Speichert Optionen als TOML-Datei.
    pub fn save_to_file(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        log::info!("Optionen gespeichert nach: {}", path.display());
        Ok(())
    }

    /// Ermittelt den Pfad zur Optionen-Datei neben der Binary.
    pub fn config_path() -> std::path::PathBuf {
        std::env::current_exe()
            .unwrap_or_else(|_| std::path::PathBuf::from("geo_feature_editor"))
            .parent()
            .unwrap_or_else(|| std::path::Path::new("."))
            .join("geo_feature_editor.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn default_editable_types_target_editor_layer() {
        let opts = EditorOptions::default();
        let labels: Vec<_> = opts
            .editing
            .editable_types
            .iter()
            .map(|t| t.label.as_str())
            .collect();
        assert_eq!(labels, vec!["Point", "Line String", "Polygon"]);
        assert!(opts.editing.editable_types.iter().all(|t| t.layer == "editor"));
    }

    #[test]
    fn partial_toml_falls_back_to_defaults_per_field() {
        let opts = EditorOptions::from_toml_or_default(
            "[transform]\nkeep_aspect_ratio = \"ctrl\"\n",
            Path::new("test.toml"),
        );
        assert_eq!(opts.transform.keep_aspect_ratio, KeyCondition::Ctrl);
        assert!(opts.transform.rotate);
        assert_eq!(opts.selection, SelectionStyleOptions::default());
    }

    #[test]
    fn missing_transform_section_uses_session_tool_preset() {
        let opts = EditorOptions::from_toml_or_default("pick_tolerance_px = 4.0\n", Path::new("test.toml"));
        assert_eq!(opts.transform, TransformOptions::session_tool());
        assert_eq!(EditorOptions::default().transform, TransformOptions::session_tool());
    }

    #[test]
    fn malformed_toml_yields_defaults() {
        let opts = EditorOptions::from_toml_or_default("[[[kaputt", Path::new("test.toml"));
        assert_eq!(opts, EditorOptions::default());
    }

    #[test]
    fn toml_round_trip() {
        let mut opts = EditorOptions::default();
        opts.selection.use_default_style = true;
        let text = toml::to_string_pretty(&opts).expect("serialisierbar");
        let back: EditorOptions = toml::from_str(&text).expect("parsebar");
        assert_eq!(back, opts);
    }

    #[test]
    fn key_conditions_evaluate_modifiers() {
        assert!(KeyCondition::Always.evaluate(&Modifiers::NONE));
        assert!(!KeyCondition::Never.evaluate(&Modifiers::SHIFT));
        assert!(KeyCondition::Shift.evaluate(&Modifiers::SHIFT));
        assert!(!KeyCondition::Shift.evaluate(&Modifiers::CTRL));
        assert!(KeyCondition::Ctrl.evaluate(&Modifiers::CTRL));
    }

    #[test]
    fn session_tool_locks_aspect_ratio() {
        let t = TransformOptions::session_tool();
        assert!(t.rotate && t.translate);
        assert!(!t.scale && !t.stretch && !t.translate_feature);
        assert_eq!(t.keep_aspect_ratio, KeyCondition::Always);
    }
}

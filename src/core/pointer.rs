//! Zeiger-Eingaben des Hosts (Pixel + Kartenkoordinate + Modifier).

use glam::DVec2;

/// Gedrückte Modifier-Tasten zum Zeitpunkt eines Events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    /// Cmd (macOS) / Windows-Taste
    pub meta: bool,
}

impl Modifiers {
    /// Keine Modifier gedrückt.
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    /// Nur Shift gedrückt.
    pub const SHIFT: Self = Self {
        shift: true,
        ctrl: false,
        alt: false,
        meta: false,
    };

    /// Nur Ctrl gedrückt.
    pub const CTRL: Self = Self {
        shift: false,
        ctrl: true,
        alt: false,
        meta: false,
    };

    /// Ctrl oder Meta: wählt bei Skalierung die Gegenecke als Pivot.
    pub fn ctrl_or_meta(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Ein Zeiger-Event mit Pixel- und Kartenposition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// Position in Pixeln (Ursprung oben links)
    pub pixel: DVec2,
    /// Position in Kartenkoordinaten
    pub coordinate: DVec2,
    pub modifiers: Modifiers,
}

impl PointerEvent {
    pub fn new(pixel: DVec2, coordinate: DVec2) -> Self {
        Self {
            pixel,
            coordinate,
            modifiers: Modifiers::NONE,
        }
    }

    /// Builder: setzt die Modifier.
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

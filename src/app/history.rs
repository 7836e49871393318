//! Pro-Feature-Verlauf: append-only Snapshot-Folgen mit Cursor.

use std::collections::HashMap;

use crate::core::{Attributes, Feature, FeatureId, Geometry};

/// Unveränderlicher Zustand eines Features zu einem Commit.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSnapshot {
    pub id: FeatureId,
    pub geometry: Geometry,
    pub attributes: Attributes,
    /// Feature war zu diesem Zeitpunkt gelöscht
    pub deleted: bool,
}

impl FeatureSnapshot {
    /// Klont Geometrie und Attribute. `None` für Features ohne Identität.
    pub fn from_feature(feature: &Feature) -> Option<Self> {
        Some(Self {
            id: feature.id.clone()?,
            geometry: feature.geometry.clone(),
            attributes: feature.attributes.clone(),
            deleted: false,
        })
    }

    /// Snapshot, der das Feature als gelöscht markiert.
    pub fn deleted(feature: &Feature) -> Option<Self> {
        let mut snapshot = Self::from_feature(feature)?;
        snapshot.deleted = true;
        Some(snapshot)
    }

    /// Baut ein Live-Feature aus dem Snapshot (ohne Stil-Override).
    pub fn to_feature(&self) -> Feature {
        Feature {
            id: Some(self.id.clone()),
            geometry: self.geometry.clone(),
            attributes: self.attributes.clone(),
            style_override: None,
        }
    }
}

/// Snapshot-Folge eines Features mit Cursor in `[0, len-1]`.
#[derive(Debug, Clone)]
pub struct FeatureStates {
    states: Vec<FeatureSnapshot>,
    cursor: usize,
}

impl FeatureStates {
    /// Startet mit dem Ausgangszustand, Cursor auf 0.
    pub fn new(initial: FeatureSnapshot) -> Self {
        Self {
            states: vec![initial],
            cursor: 0,
        }
    }

    /// Hängt einen Zustand an und setzt den Cursor darauf.
    ///
    /// Zustände hinter dem Cursor (nach Undo) werden verworfen.
    pub fn add(&mut self, state: FeatureSnapshot) {
        self.states.truncate(self.cursor + 1);
        self.states.push(state);
        self.cursor = self.states.len() - 1;
    }

    /// Cursor einen Schritt zurück. `None` am Anfang.
    pub fn previous(&mut self) -> Option<&FeatureSnapshot> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        self.states.get(self.cursor)
    }

    /// Cursor einen Schritt vor. `None` am Ende.
    pub fn next(&mut self) -> Option<&FeatureSnapshot> {
        if self.cursor + 1 >= self.states.len() {
            return None;
        }
        self.cursor += 1;
        self.states.get(self.cursor)
    }

    pub fn current(&self) -> Option<&FeatureSnapshot> {
        self.states.get(self.cursor)
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.states.len()
    }
}

/// Verlauf aller Features einer Editier-Sitzung, nach Identität.
#[derive(Debug, Clone, Default)]
pub struct EditHistory {
    states: HashMap<FeatureId, FeatureStates>,
}

impl EditHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &FeatureId) -> bool {
        self.states.contains_key(id)
    }

    /// Legt einen neuen Verlauf an. `false` wenn für die Identität schon einer existiert.
    pub fn seed(&mut self, initial: FeatureSnapshot) -> bool {
        if self.states.contains_key(&initial.id) {
            log::error!("Feature bereits im Verlauf: {}", initial.id);
            return false;
        }
        self.states
            .insert(initial.id.clone(), FeatureStates::new(initial));
        true
    }

    /// Hängt `new_state` an; fehlt der Verlauf, wird er vorher mit `old_state` angelegt.
    pub fn record(&mut self, old_state: FeatureSnapshot, new_state: FeatureSnapshot) {
        self.states
            .entry(old_state.id.clone())
            .or_insert_with(|| FeatureStates::new(old_state))
            .add(new_state);
    }

    /// Cursor des Features zurück, liefert den dann gültigen Zustand.
    pub fn previous(&mut self, id: &FeatureId) -> Option<FeatureSnapshot> {
        self.states.get_mut(id)?.previous().cloned()
    }

    /// Cursor des Features vor, liefert den dann gültigen Zustand.
    pub fn next(&mut self, id: &FeatureId) -> Option<FeatureSnapshot> {
        self.states.get_mut(id)?.next().cloned()
    }

    pub fn states(&self, id: &FeatureId) -> Option<&FeatureStates> {
        self.states.get(id)
    }

    pub fn can_undo(&self, id: &FeatureId) -> bool {
        self.states.get(id).is_some_and(FeatureStates::can_undo)
    }

    pub fn can_redo(&self, id: &FeatureId) -> bool {
        self.states.get(id).is_some_and(FeatureStates::can_redo)
    }

    /// Anzahl der Features mit Verlauf.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Setzt den Verlauf zurück (Sitzungsende).
    pub fn clear(&mut self) {
        self.states.clear();
    }
}

//! Sparse per-surface color map keyed by canonical vertex position.

use std::collections::HashMap;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::canonical::CanonicalPosition;
use crate::types::Color;

/// One persisted color mapping
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorEntry {
    pub key: CanonicalPosition,
    pub color: Color,
}

impl ColorEntry {
    pub fn new(key: CanonicalPosition, color: Color) -> Self {
        Self { key, color }
    }
}

/// Raw (pre-compositing) vertex colors of one surface.
///
/// Only painted vertices have entries; everything else reads as
/// [`Color::TRANSPARENT`]. Compositing with the surface default color and
/// output buffer upkeep live in [`crate::surface::PaintableSurface`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VertexColorStore {
    colors: HashMap<CanonicalPosition, Color>,
}

impl VertexColorStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the color at a canonical key
    pub fn set(&mut self, key: CanonicalPosition, color: Color) {
        self.colors.insert(key, color);
    }

    /// Insert or overwrite the color of the vertex at `position`
    pub fn set_at(&mut self, position: Vec3, color: Color) -> CanonicalPosition {
        let key = CanonicalPosition::from_vec3(position);
        self.set(key, color);
        key
    }

    /// Stored color, or transparent if the key was never painted
    pub fn raw_color(&self, key: CanonicalPosition) -> Color {
        self.colors.get(&key).copied().unwrap_or(Color::TRANSPARENT)
    }

    /// Stored color of the vertex at `position`
    pub fn raw_color_at(&self, position: Vec3) -> Color {
        self.raw_color(CanonicalPosition::from_vec3(position))
    }

    pub fn contains(&self, key: CanonicalPosition) -> bool {
        self.colors.contains_key(&key)
    }

    pub fn remove(&mut self, key: CanonicalPosition) -> Option<Color> {
        self.colors.remove(&key)
    }

    pub fn clear(&mut self) {
        self.colors.clear();
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (CanonicalPosition, Color)> + '_ {
        self.colors.iter().map(|(&k, &c)| (k, c))
    }

    /// Persisted form: entries sorted by key so output is deterministic
    pub fn to_persisted(&self) -> Vec<ColorEntry> {
        let mut entries: Vec<ColorEntry> = self
            .colors
            .iter()
            .map(|(&key, &color)| ColorEntry::new(key, color))
            .collect();
        entries.sort_unstable_by_key(|entry| entry.key);
        entries
    }

    /// Rebuild a store from persisted entries.
    ///
    /// Later entries win when a key repeats.
    pub fn from_persisted(entries: &[ColorEntry]) -> Self {
        let colors = entries.iter().map(|e| (e.key, e.color)).collect();
        Self { colors }
    }
}

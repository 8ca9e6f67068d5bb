//! Undo support - snapshots of surface color maps taken before a stroke
//! writes to them.

use std::collections::BTreeMap;

use tracing::debug;

use crate::registry::SurfaceRegistry;
use crate::store::ColorEntry;
use crate::surface::PaintableSurface;
use crate::types::SurfaceId;

/// Receives surfaces right before a stroke first mutates them.
///
/// `record` is called at most once per surface per stroke, always before the
/// first write. `commit` closes the stroke (ended or cancelled).
pub trait UndoRecorder {
    fn record(&mut self, stroke_id: u64, surface: &PaintableSurface);

    fn commit(&mut self, _stroke_id: u64) {}
}

/// Recorder that keeps nothing
impl UndoRecorder for () {
    fn record(&mut self, _stroke_id: u64, _surface: &PaintableSurface) {}
}

/// An undo entry containing the color maps captured before a stroke
#[derive(Debug, Clone)]
pub struct UndoEntry {
    /// Stroke ID this entry corresponds to
    pub stroke_id: u64,
    /// Captured color maps (surface -> persisted entries)
    pub surfaces: BTreeMap<SurfaceId, Vec<ColorEntry>>,
}

/// Bounded stack of stroke snapshots
#[derive(Debug)]
pub struct UndoStack {
    /// Captures for the stroke in progress
    pending: Option<UndoEntry>,
    /// Undo stack (most recent at end)
    entries: Vec<UndoEntry>,
    /// Maximum undo levels
    max_levels: usize,
}

impl UndoStack {
    pub fn new(max_levels: usize) -> Self {
        Self {
            pending: None,
            entries: Vec::new(),
            max_levels,
        }
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.entries.is_empty()
    }

    /// Get the number of undo levels available
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Undo the most recent stroke by restoring its snapshots.
    ///
    /// Surfaces detached since the stroke are skipped. Returns the stroke id
    /// that was undone, or None if nothing was available.
    pub fn undo(&mut self, registry: &mut SurfaceRegistry) -> Option<u64> {
        let Some(entry) = self.entries.pop() else {
            debug!("Undo: no entries available");
            return None;
        };

        debug!(
            "Undoing stroke {} ({} surfaces)",
            entry.stroke_id,
            entry.surfaces.len()
        );

        for (id, colors) in &entry.surfaces {
            if let Some(surface) = registry.get_mut_or_warn(*id) {
                surface.load_persisted(colors);
                // Restored state differs from what was last saved
                surface.mark_unsaved();
            }
        }

        Some(entry.stroke_id)
    }
}

impl UndoRecorder for UndoStack {
    fn record(&mut self, stroke_id: u64, surface: &PaintableSurface) {
        let pending = self.pending.get_or_insert_with(|| UndoEntry {
            stroke_id,
            surfaces: BTreeMap::new(),
        });
        pending
            .surfaces
            .entry(surface.id())
            .or_insert_with(|| surface.to_persisted());
    }

    fn commit(&mut self, stroke_id: u64) {
        let Some(entry) = self.pending.take() else {
            return;
        };
        debug_assert_eq!(entry.stroke_id, stroke_id);

        debug!(
            "Saved undo entry for stroke {} ({} surfaces)",
            stroke_id,
            entry.surfaces.len()
        );
        self.entries.push(entry);

        // Limit undo stack size
        while self.entries.len() > self.max_levels {
            self.entries.remove(0);
        }
    }
}

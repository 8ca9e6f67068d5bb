//! Undo functionality for the painting pipeline

use tracing::{debug, info};

use crate::render::RenderSink;

use super::PaintPipeline;

impl PaintPipeline {
    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        self.undo_stack.can_undo()
    }

    /// Get the number of undo levels available
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    /// Undo the last stroke
    ///
    /// Restores the color maps captured before the stroke and flushes the
    /// recomputed buffers to `sink`. Ignored while a stroke is in progress.
    /// Returns true if undo was performed.
    pub fn undo(&mut self, sink: &mut dyn RenderSink) -> bool {
        if self.is_stroking() {
            debug!("undo: stroke in progress, ignoring");
            return false;
        }
        match self.undo_stack.undo(&mut self.surfaces) {
            Some(stroke_id) => {
                let uploaded = self.surfaces.flush_uploads(sink);
                info!("Undid stroke {} ({} buffers uploaded)", stroke_id, uploaded);
                true
            }
            None => false,
        }
    }
}

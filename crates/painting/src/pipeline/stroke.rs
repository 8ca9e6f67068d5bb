//! Stroke handling for the painting pipeline

use glam::Vec2;
use tracing::debug;

use crate::hit_test::{collect_hits, HitQuery, OcclusionTest, ScreenProjector};
use crate::layer::Layer;
use crate::render::RenderSink;
use crate::resolver::{score_hits, SampleReport, StrokeError, StrokeParams, StrokeSummary, VertexHit};
use crate::types::{BlendMode, SurfaceId};

use super::PaintPipeline;

impl PaintPipeline {
    /// Begin a stroke at the press position.
    ///
    /// The press is always a sample, so `hits` are resolved immediately.
    /// Returns the id assigned to the stroke.
    pub fn begin_stroke(&mut self, cursor: Vec2, hits: &[VertexHit]) -> Result<u64, StrokeError> {
        let stroke_id = self.next_stroke_id;
        self.resolver
            .begin(stroke_id, StrokeParams::from_brush(&self.brush))?;
        self.next_stroke_id += 1;

        self.gate.begin(cursor);
        self.sample(hits);
        Ok(stroke_id)
    }

    /// Continue a stroke with a new cursor position.
    ///
    /// `hits` is only called when the cursor moved far enough from the last
    /// sample. Returns None when no sample was taken.
    pub fn stroke_to<F>(&mut self, cursor: Vec2, hits: F) -> Option<SampleReport>
    where
        F: FnOnce() -> Vec<VertexHit>,
    {
        if !self.resolver.is_active() {
            debug!("stroke_to: no active stroke, ignoring");
            return None;
        }
        if !self.gate.should_sample(cursor) {
            return None;
        }
        let hits = hits();
        Some(self.sample(&hits))
    }

    /// Weight hits with the brush and resolve them
    pub(crate) fn sample(&mut self, hits: &[VertexHit]) -> SampleReport {
        let candidates = score_hits(hits, &self.brush);
        let report = self
            .resolver
            .resolve(&mut self.surfaces, &candidates, &mut self.undo_stack);
        debug!(
            "  sample: {} hits -> written={}, reused={}, skipped={}",
            hits.len(),
            report.written,
            report.reused,
            report.skipped
        );
        report
    }

    /// End the current stroke
    ///
    /// Recomputes touched surfaces, records the undo entry, remembers the
    /// brush color and flushes changed buffers to `sink`.
    pub fn end_stroke(&mut self, sink: &mut dyn RenderSink) -> Option<StrokeSummary> {
        let summary = self.resolver.end(&mut self.surfaces, &mut self.undo_stack)?;
        self.gate.end();

        if self.brush.mode == BlendMode::Paint {
            self.recent.push_if_changed(self.brush.color);
        }
        self.surfaces.flush_uploads(sink);
        Some(summary)
    }

    /// Cancel the current stroke
    ///
    /// Colors already written are NOT reverted. The partial stroke is still
    /// recorded for undo.
    pub fn cancel_stroke(&mut self, sink: &mut dyn RenderSink) -> Option<StrokeSummary> {
        let summary = self.resolver.cancel(&mut self.undo_stack)?;
        self.gate.end();
        self.surfaces.flush_uploads(sink);
        Some(summary)
    }

    /// Check if a stroke is currently in progress
    pub fn is_stroking(&self) -> bool {
        self.resolver.is_active()
    }

    /// Hit-test the brush against a layer's scope snapshot.
    ///
    /// Uses the current brush radius. `only_surface` restricts painting to
    /// the selected surface.
    pub fn layer_hits(
        &self,
        layer: &mut Layer,
        projector: &ScreenProjector,
        cursor: Vec2,
        only_surface: Option<SurfaceId>,
        occlusion: Option<&dyn OcclusionTest>,
    ) -> Vec<VertexHit> {
        let snapshot = layer.scope(&self.surfaces);
        let query = HitQuery {
            cursor,
            radius: self.brush.radius(),
            only_surface,
        };
        collect_hits(&snapshot, projector, &query, occlusion)
    }
}

//! Complete painting pipeline
//!
//! This module provides the main painting pipeline that connects:
//! - Input handling (press, drag and release from the host's input systems)
//! - Hit testing against a layer's scope snapshot
//! - Brush falloff and the per-stroke resolver
//! - Undo snapshots and recent colors
//! - Output buffer hand-off to the renderer
//!
//! The pipeline is designed to be driven from Bevy systems but does not
//! depend on Bevy itself.

mod stroke;
mod surface_ops;
mod undo;

use vertex_paint_config::PaintConfig;

use crate::brush::{BrushSettings, SampleGate};
use crate::recent::RecentColors;
use crate::registry::SurfaceRegistry;
use crate::resolver::StrokeResolver;
use crate::types::{BlendMode, Color};
use crate::undo::UndoStack;

/// Complete painting pipeline for a scene
///
/// This struct manages the full painting workflow:
/// 1. Input comes in via `begin_stroke`, `stroke_to`, `end_stroke`
/// 2. The sample gate decides which drag positions become samples
/// 3. Hits are weighted by the brush and resolved into raw colors
/// 4. Surfaces are snapshotted for undo before their first write
/// 5. Changed output buffers are flushed to a render sink
pub struct PaintPipeline {
    /// Every surface attached for painting
    pub surfaces: SurfaceRegistry,
    /// Current brush
    pub brush: BrushSettings,
    /// Recently used brush colors
    pub(crate) recent: RecentColors,
    /// Drag sampling state
    pub(crate) gate: SampleGate,
    /// Stroke state machine
    pub(crate) resolver: StrokeResolver,
    /// Undo snapshots (most recent at end)
    pub(crate) undo_stack: UndoStack,
    /// Id handed to the next stroke
    pub(crate) next_stroke_id: u64,
}

impl Default for PaintPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl PaintPipeline {
    /// Create a pipeline with default settings
    pub fn new() -> Self {
        Self::with_config(&PaintConfig::default())
    }

    /// Create a pipeline from configuration
    pub fn with_config(config: &PaintConfig) -> Self {
        Self {
            surfaces: SurfaceRegistry::new(),
            brush: BrushSettings::from_config(&config.brush),
            recent: RecentColors::new(config.recent_color_capacity),
            gate: SampleGate::new(config.drag_sample_threshold),
            resolver: StrokeResolver::new(),
            undo_stack: UndoStack::new(config.max_undo_levels),
            next_stroke_id: 1,
        }
    }

    /// Set the brush color
    pub fn set_color(&mut self, color: Color) {
        self.brush.color = color;
    }

    /// Get the current brush color
    pub fn color(&self) -> Color {
        self.brush.color
    }

    /// Set the blend mode
    pub fn set_blend_mode(&mut self, mode: BlendMode) {
        self.brush.mode = mode;
    }

    /// Get the current blend mode
    pub fn blend_mode(&self) -> BlendMode {
        self.brush.mode
    }

    /// Recently used brush colors, newest first
    pub fn recent_colors(&self) -> &RecentColors {
        &self.recent
    }

    /// Pick a recent color as the brush color
    pub fn use_recent_color(&mut self, index: usize) -> bool {
        match self.recent.get(index) {
            Some(color) => {
                self.brush.color = color;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::NullSink;
    use crate::resolver::VertexHit;
    use crate::types::SurfaceId;
    use glam::{Affine3A, Vec2, Vec3};

    fn hit(surface: SurfaceId, position: Vec3, screen_distance: f32) -> VertexHit {
        VertexHit {
            surface,
            position,
            screen_distance,
        }
    }

    fn pipeline_with_quad() -> (PaintPipeline, SurfaceId) {
        let mut pipeline = PaintPipeline::new();
        let id = pipeline
            .attach_surface(
                "quad",
                vec![Vec3::ZERO, Vec3::X, Vec3::new(1.0, 1.0, 0.0), Vec3::Y],
                Affine3A::IDENTITY,
            )
            .unwrap();
        (pipeline, id)
    }

    #[test]
    fn test_pipeline_creation() {
        let pipeline = PaintPipeline::new();
        assert_eq!(pipeline.brush.radius(), 50.0);
        assert_eq!(pipeline.blend_mode(), BlendMode::Paint);
        assert!(!pipeline.is_stroking());
        assert!(pipeline.recent_colors().is_empty());
    }

    #[test]
    fn test_pipeline_stroke() {
        let (mut pipeline, id) = pipeline_with_quad();
        pipeline.brush.set_hardness(1.0);
        pipeline.set_color(Color::rgb(1.0, 0.0, 0.0));

        pipeline
            .begin_stroke(Vec2::ZERO, &[hit(id, Vec3::ZERO, 0.0)])
            .unwrap();
        assert!(pipeline.is_stroking());

        // Within the drag threshold: hit testing is not even run
        let report = pipeline.stroke_to(Vec2::new(5.0, 0.0), || panic!("sampled too early"));
        assert!(report.is_none());

        let report = pipeline
            .stroke_to(Vec2::new(30.0, 0.0), || vec![hit(id, Vec3::X, 10.0)])
            .unwrap();
        assert_eq!(report.written, 1);

        let mut uploads = 0;
        let summary = pipeline
            .end_stroke(&mut |_: SurfaceId, _: &[Color]| uploads += 1)
            .unwrap();
        assert!(!pipeline.is_stroking());
        assert_eq!(summary.surfaces, vec![id]);
        assert_eq!(uploads, 1);

        let output = pipeline.output_buffer(id).unwrap();
        assert_eq!(output[0], Color::rgb(1.0, 0.0, 0.0));
        assert_eq!(output[1], Color::rgb(1.0, 0.0, 0.0));
        assert_eq!(output[2], Color::TRANSPARENT);
        assert_eq!(pipeline.recent_colors().peek(), Some(Color::rgb(1.0, 0.0, 0.0)));
    }

    #[test]
    fn test_pipeline_begin_while_stroking_fails() {
        let (mut pipeline, _) = pipeline_with_quad();
        pipeline.begin_stroke(Vec2::ZERO, &[]).unwrap();
        assert!(pipeline.begin_stroke(Vec2::ZERO, &[]).is_err());
    }

    #[test]
    fn test_pipeline_cancel_stroke() {
        let (mut pipeline, id) = pipeline_with_quad();
        pipeline.brush.set_hardness(1.0);
        pipeline.set_color(Color::WHITE);
        pipeline
            .begin_stroke(Vec2::ZERO, &[hit(id, Vec3::ZERO, 0.0)])
            .unwrap();
        pipeline.cancel_stroke(&mut NullSink);

        assert!(!pipeline.is_stroking());
        // Writes are kept, but the partial stroke can be undone
        assert_eq!(pipeline.output_buffer(id).unwrap()[0], Color::WHITE);
        assert!(pipeline.recent_colors().is_empty());
        assert!(pipeline.undo(&mut NullSink));
        assert_eq!(pipeline.output_buffer(id).unwrap()[0], Color::TRANSPARENT);
    }

    #[test]
    fn test_pipeline_undo() {
        let (mut pipeline, id) = pipeline_with_quad();
        pipeline.brush.set_hardness(1.0);

        pipeline.set_color(Color::rgb(0.0, 0.0, 1.0));
        pipeline
            .begin_stroke(Vec2::ZERO, &[hit(id, Vec3::ZERO, 0.0)])
            .unwrap();
        pipeline.end_stroke(&mut NullSink);

        pipeline.set_color(Color::rgb(0.0, 1.0, 0.0));
        pipeline
            .begin_stroke(Vec2::ZERO, &[hit(id, Vec3::ZERO, 0.0)])
            .unwrap();
        pipeline.end_stroke(&mut NullSink);
        assert_eq!(pipeline.undo_count(), 2);

        assert!(pipeline.undo(&mut NullSink));
        assert_eq!(
            pipeline.output_buffer(id).unwrap()[0],
            Color::rgb(0.0, 0.0, 1.0)
        );
        assert!(pipeline.undo(&mut NullSink));
        assert!(!pipeline.can_undo());
        assert!(!pipeline.undo(&mut NullSink));
    }

    #[test]
    fn test_recent_colors_skip_repeat() {
        let (mut pipeline, id) = pipeline_with_quad();
        for _ in 0..3 {
            pipeline
                .begin_stroke(Vec2::ZERO, &[hit(id, Vec3::ZERO, 0.0)])
                .unwrap();
            pipeline.end_stroke(&mut NullSink);
        }
        assert_eq!(pipeline.recent_colors().len(), 1);

        pipeline.set_color(Color::WHITE);
        pipeline.begin_stroke(Vec2::ZERO, &[]).unwrap();
        pipeline.end_stroke(&mut NullSink);
        assert_eq!(pipeline.recent_colors().len(), 2);

        assert!(pipeline.use_recent_color(1));
        assert_eq!(pipeline.color(), Color::BLACK);
        assert!(!pipeline.use_recent_color(5));
    }

    #[test]
    fn test_erase_stroke() {
        let (mut pipeline, id) = pipeline_with_quad();
        pipeline.set_vertex_color(id, Vec3::ZERO, Color::new(0.1, 0.2, 0.3, 0.3));
        pipeline.brush.set_hardness(1.0);
        pipeline.set_blend_mode(BlendMode::Erase);

        pipeline
            .begin_stroke(Vec2::ZERO, &[hit(id, Vec3::ZERO, 0.0)])
            .unwrap();
        pipeline.end_stroke(&mut NullSink);

        let raw = pipeline.surfaces.get(id).unwrap().raw_color_at(Vec3::ZERO);
        assert_eq!(raw, Color::new(0.1, 0.2, 0.3, 0.0));
        // Erasing does not record a recent color
        assert!(pipeline.recent_colors().is_empty());
    }
}

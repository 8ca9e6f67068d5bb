//! Surface operations for the painting pipeline

use glam::{Affine3A, Vec3};

use crate::persist::SurfaceDocument;
use crate::render::RenderSink;
use crate::types::{Color, SurfaceId};
use crate::validation::ValidationError;

use super::PaintPipeline;

impl PaintPipeline {
    /// Attach a mesh for painting
    pub fn attach_surface(
        &mut self,
        name: impl Into<String>,
        vertices: Vec<Vec3>,
        transform: Affine3A,
    ) -> Result<SurfaceId, ValidationError> {
        self.surfaces.attach(name, vertices, transform)
    }

    /// Detach a mesh, returning its final document for saving
    pub fn detach_surface(&mut self, id: SurfaceId) -> Option<SurfaceDocument> {
        self.surfaces
            .detach(id)
            .map(|surface| SurfaceDocument::from_surface(&surface))
    }

    /// Paint one vertex outside of a stroke (missing surfaces are ignored)
    pub fn set_vertex_color(&mut self, id: SurfaceId, position: Vec3, color: Color) {
        self.surfaces.set_color(id, position, color);
    }

    /// Set the default color composited under a surface's painted colors
    pub fn set_default_color(&mut self, id: SurfaceId, color: Color) {
        if let Some(surface) = self.surfaces.get_mut_or_warn(id) {
            surface.set_default_color(color);
        }
    }

    /// Clear all painted colors of a surface
    pub fn clear_surface(&mut self, id: SurfaceId) {
        self.surfaces.clear(id);
    }

    /// Get a surface's output buffer
    ///
    /// Returns None if the surface is not attached.
    pub fn output_buffer(&self, id: SurfaceId) -> Option<&[Color]> {
        self.surfaces.get(id).map(|surface| surface.output_buffer())
    }

    /// Hand changed output buffers to the renderer
    pub fn flush(&mut self, sink: &mut dyn RenderSink) -> usize {
        self.surfaces.flush_uploads(sink)
    }

    /// Documents for every surface changed since the last call
    pub fn take_unsaved_documents(&mut self) -> Vec<(SurfaceId, SurfaceDocument)> {
        self.surfaces
            .take_unsaved()
            .into_iter()
            .filter_map(|id| {
                self.surfaces
                    .get(id)
                    .map(|surface| (id, SurfaceDocument::from_surface(surface)))
            })
            .collect()
    }

    /// Load a saved document into an attached surface
    pub fn load_surface_document(&mut self, id: SurfaceId, document: &SurfaceDocument) -> bool {
        match self.surfaces.get_mut_or_warn(id) {
            Some(surface) => {
                document.apply_to(surface);
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

    #[test]
    fn test_unsaved_documents_drained() {
        let mut pipeline = PaintPipeline::new();
        let id = pipeline
            .attach_surface("tri", vec![Vec3::ZERO, Vec3::X, Vec3::Y], Affine3A::IDENTITY)
            .unwrap();
        assert!(pipeline.take_unsaved_documents().is_empty());

        pipeline.set_vertex_color(id, Vec3::X, Color::WHITE);
        let documents = pipeline.take_unsaved_documents();
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].1.entries.len(), 1);
        assert!(pipeline.take_unsaved_documents().is_empty());
    }

    #[test]
    fn test_detach_returns_document() {
        let mut pipeline = PaintPipeline::new();
        let id = pipeline
            .attach_surface("tri", vec![Vec3::ZERO], Affine3A::IDENTITY)
            .unwrap();
        pipeline.set_default_color(id, Color::BLACK);
        pipeline.set_vertex_color(id, Vec3::ZERO, Color::WHITE);

        let document = pipeline.detach_surface(id).unwrap();
        assert_eq!(document.default_color, Color::BLACK);
        assert!(pipeline.output_buffer(id).is_none());
        assert!(pipeline.detach_surface(id).is_none());

        // Re-attach and reload
        let id = pipeline
            .attach_surface("tri", vec![Vec3::ZERO], Affine3A::IDENTITY)
            .unwrap();
        assert!(pipeline.load_surface_document(id, &document));
        assert_eq!(pipeline.output_buffer(id).unwrap()[0], Color::WHITE);
        assert_eq!(pipeline.flush(&mut NullSink), 1);
    }

    #[test]
    fn test_attach_rejects_oversized_mesh() {
        let mut pipeline = PaintPipeline::new();
        let result = pipeline.attach_surface(
            "big",
            vec![Vec3::ZERO; crate::constants::MAX_VERTEX_COLORS + 1],
            Affine3A::IDENTITY,
        );
        assert!(result.is_err());
        assert!(pipeline.surfaces.is_empty());
    }
}

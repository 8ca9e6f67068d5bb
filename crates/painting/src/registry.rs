//! Surface registry - typed lookup of paintable surfaces by handle

use std::collections::BTreeMap;

use glam::{Affine3A, Vec3};
use tracing::{info, warn};

use crate::render::RenderSink;
use crate::surface::PaintableSurface;
use crate::types::{Color, SurfaceId};
use crate::validation::ValidationError;

/// Owns every paintable surface known to the paint system.
///
/// Surfaces are addressed by [`SurfaceId`]. Lookups return `Option`; the
/// `*_or_warn` variants additionally log the absence so interactive callers
/// can fall through to a no-op.
#[derive(Debug, Default)]
pub struct SurfaceRegistry {
    surfaces: BTreeMap<SurfaceId, PaintableSurface>,
    next_id: u32,
}

impl SurfaceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a mesh to the paint system
    pub fn attach(
        &mut self,
        name: impl Into<String>,
        vertices: Vec<Vec3>,
        transform: Affine3A,
    ) -> Result<SurfaceId, ValidationError> {
        let name = name.into();
        let id = SurfaceId(self.next_id);
        let surface = match PaintableSurface::new(id, name.clone(), vertices, transform) {
            Ok(surface) => surface,
            Err(err) => {
                warn!("Cannot attach '{}' for painting: {}", name, err);
                return Err(err);
            }
        };
        self.next_id += 1;
        info!(
            "Attached {} ('{}', {} vertices)",
            id,
            name,
            surface.vertex_count()
        );
        self.surfaces.insert(id, surface);
        Ok(id)
    }

    /// Detach a surface, returning it so the caller can persist its colors
    pub fn detach(&mut self, id: SurfaceId) -> Option<PaintableSurface> {
        let removed = self.surfaces.remove(&id);
        if removed.is_some() {
            info!("Detached {}", id);
        }
        removed
    }

    pub fn get(&self, id: SurfaceId) -> Option<&PaintableSurface> {
        self.surfaces.get(&id)
    }

    pub fn get_mut(&mut self, id: SurfaceId) -> Option<&mut PaintableSurface> {
        self.surfaces.get_mut(&id)
    }

    /// Lookup that logs when the surface is missing
    pub fn get_or_warn(&self, id: SurfaceId) -> Option<&PaintableSurface> {
        let surface = self.surfaces.get(&id);
        if surface.is_none() {
            warn!("{} is not attached to the paint system", id);
        }
        surface
    }

    /// Mutable lookup that logs when the surface is missing
    pub fn get_mut_or_warn(&mut self, id: SurfaceId) -> Option<&mut PaintableSurface> {
        let surface = self.surfaces.get_mut(&id);
        if surface.is_none() {
            warn!("{} is not attached to the paint system", id);
        }
        surface
    }

    pub fn contains(&self, id: SurfaceId) -> bool {
        self.surfaces.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = SurfaceId> + '_ {
        self.surfaces.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PaintableSurface> {
        self.surfaces.values()
    }

    /// Paint one vertex of a surface outside of a stroke.
    ///
    /// Missing surfaces are logged and ignored.
    pub fn set_color(&mut self, id: SurfaceId, position: Vec3, color: Color) {
        if let Some(surface) = self.get_mut_or_warn(id) {
            surface.set_color(position, color);
        }
    }

    /// Clear the colors of one surface (logged no-op when missing)
    pub fn clear(&mut self, id: SurfaceId) {
        if let Some(surface) = self.get_mut_or_warn(id) {
            surface.clear();
        }
    }

    /// Hand every changed output buffer to the renderer.
    ///
    /// Returns the number of buffers uploaded.
    pub fn flush_uploads(&mut self, sink: &mut dyn RenderSink) -> usize {
        let mut uploaded = 0;
        for surface in self.surfaces.values_mut() {
            if surface.take_needs_upload() {
                sink.upload(surface.id(), surface.output_buffer());
                uploaded += 1;
            }
        }
        uploaded
    }

    /// Surfaces whose color maps changed since the last call
    pub fn take_unsaved(&mut self) -> Vec<SurfaceId> {
        self.surfaces
            .values_mut()
            .filter_map(|surface| surface.take_needs_save().then(|| surface.id()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Vec<Vec3> {
        vec![Vec3::ZERO, Vec3::X, Vec3::Y]
    }

    #[test]
    fn test_attach_assigns_sequential_ids() {
        let mut registry = SurfaceRegistry::new();
        let a = registry.attach("a", triangle(), Affine3A::IDENTITY).unwrap();
        let b = registry.attach("b", triangle(), Affine3A::IDENTITY).unwrap();
        assert_eq!(a, SurfaceId(0));
        assert_eq!(b, SurfaceId(1));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_missing_surface_is_noop() {
        let mut registry = SurfaceRegistry::new();
        registry.set_color(SurfaceId(42), Vec3::ZERO, Color::WHITE);
        registry.clear(SurfaceId(42));
        assert!(registry.get_or_warn(SurfaceId(42)).is_none());
    }

    #[test]
    fn test_flush_uploads_only_changed() {
        let mut registry = SurfaceRegistry::new();
        let a = registry.attach("a", triangle(), Affine3A::IDENTITY).unwrap();
        registry.attach("b", triangle(), Affine3A::IDENTITY).unwrap();

        let mut uploads: Vec<SurfaceId> = Vec::new();
        let mut sink = |id: SurfaceId, _colors: &[Color]| uploads.push(id);

        // Freshly attached surfaces have never been uploaded
        assert_eq!(registry.flush_uploads(&mut sink), 2);
        assert_eq!(registry.flush_uploads(&mut sink), 0);

        registry.set_color(a, Vec3::X, Color::WHITE);
        assert_eq!(registry.flush_uploads(&mut sink), 1);
        drop(sink);
        assert_eq!(uploads.last(), Some(&a));
    }

    #[test]
    fn test_take_unsaved() {
        let mut registry = SurfaceRegistry::new();
        let a = registry.attach("a", triangle(), Affine3A::IDENTITY).unwrap();
        assert!(registry.take_unsaved().is_empty());

        registry.set_color(a, Vec3::ZERO, Color::WHITE);
        assert_eq!(registry.take_unsaved(), vec![a]);
        assert!(registry.take_unsaved().is_empty());
    }

    #[test]
    fn test_detach() {
        let mut registry = SurfaceRegistry::new();
        let a = registry.attach("a", triangle(), Affine3A::IDENTITY).unwrap();
        assert!(registry.detach(a).is_some());
        assert!(!registry.contains(a));
        assert!(registry.detach(a).is_none());
    }
}

//! Paintable surface - one mesh's color map, default color and output buffer

use std::collections::BTreeMap;

use glam::{Affine3A, Vec3};
use tracing::{debug, info, warn};

use crate::canonical::CanonicalPosition;
use crate::constants::MAX_VERTEX_COLORS;
use crate::store::{ColorEntry, VertexColorStore};
use crate::types::{Color, SurfaceId};
use crate::validation::{validate_vertex_count, ValidationError};

/// A mesh attached to the paint system.
///
/// Holds the sparse raw color map, the default (ambient) color composited
/// under it, the local-space vertex positions, and the fixed-size output
/// buffer the renderer consumes. The output buffer is recomputed after every
/// color-mutating call except [`Self::write_raw`], which the stroke resolver
/// batches.
#[derive(Debug, Clone)]
pub struct PaintableSurface {
    id: SurfaceId,
    name: String,
    store: VertexColorStore,
    default_color: Color,
    vertices: Vec<Vec3>,
    transform: Affine3A,
    /// Composited colors, always `MAX_VERTEX_COLORS` long
    output: Vec<Color>,
    /// Bumped whenever vertices or transform change
    revision: u64,
    /// Output buffer changed since the renderer last took it
    needs_upload: bool,
    /// Color map changed since the persistence layer last saved it
    needs_save: bool,
}

impl PaintableSurface {
    /// Create a surface for the given geometry.
    ///
    /// Fails if the geometry has more vertices than the output buffer holds.
    pub fn new(
        id: SurfaceId,
        name: impl Into<String>,
        vertices: Vec<Vec3>,
        transform: Affine3A,
    ) -> Result<Self, ValidationError> {
        validate_vertex_count(vertices.len())?;

        let mut surface = Self {
            id,
            name: name.into(),
            store: VertexColorStore::new(),
            default_color: Color::TRANSPARENT,
            vertices,
            transform,
            output: vec![Color::TRANSPARENT; MAX_VERTEX_COLORS],
            revision: 0,
            needs_upload: false,
            needs_save: false,
        };
        surface.recompute();
        Ok(surface)
    }

    pub fn id(&self) -> SurfaceId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn transform(&self) -> Affine3A {
        self.transform
    }

    /// Geometry/transform revision, compared by scope snapshots for staleness
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn set_transform(&mut self, transform: Affine3A) {
        self.transform = transform;
        self.revision += 1;
    }

    pub fn store(&self) -> &VertexColorStore {
        &self.store
    }

    pub fn default_color(&self) -> Color {
        self.default_color
    }

    /// Change the ambient color composited under painted colors
    pub fn set_default_color(&mut self, color: Color) {
        self.default_color = color;
        self.recompute();
        self.needs_save = true;
    }

    /// Paint a vertex position directly and refresh the output buffer
    pub fn set_color(&mut self, position: Vec3, color: Color) -> CanonicalPosition {
        let key = self.store.set_at(position, color);
        self.recompute();
        self.needs_save = true;
        key
    }

    /// Write a raw color without recomputing the output buffer.
    ///
    /// Callers writing many vertices must call [`Self::recompute`] afterwards.
    pub fn write_raw(&mut self, key: CanonicalPosition, color: Color) {
        self.store.set(key, color);
        self.needs_save = true;
    }

    pub fn raw_color(&self, key: CanonicalPosition) -> Color {
        self.store.raw_color(key)
    }

    pub fn raw_color_at(&self, position: Vec3) -> Color {
        self.store.raw_color_at(position)
    }

    /// Composite every live vertex over the default color.
    ///
    /// `output[i] = lerp(default, raw, raw.a)` for vertex `i`; slots past the
    /// vertex count stay transparent. Keys with no vertex in the current
    /// geometry never show up.
    pub fn compute_output_buffer(&self) -> Vec<Color> {
        let mut buffer = vec![Color::TRANSPARENT; MAX_VERTEX_COLORS];
        for (slot, vertex) in buffer.iter_mut().zip(&self.vertices) {
            let raw = self.store.raw_color_at(*vertex);
            *slot = self.default_color.lerp(raw, raw.a);
        }
        buffer
    }

    /// Recompute the cached output buffer and flag it for upload
    pub fn recompute(&mut self) {
        self.output = self.compute_output_buffer();
        self.needs_upload = true;
    }

    /// Cached output buffer (`MAX_VERTEX_COLORS` long)
    pub fn output_buffer(&self) -> &[Color] {
        &self.output
    }

    /// Cached output buffer as raw bytes for GPU upload
    pub fn output_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.output)
    }

    /// Remove every painted color
    pub fn clear(&mut self) {
        let had_colors = !self.store.is_empty();
        self.store.clear();
        self.recompute();
        if had_colors {
            self.needs_save = true;
        }
        info!("Cleared vertex colors on {} ({})", self.id, self.name);
    }

    /// Swap in re-imported geometry, keeping colors by canonical position.
    ///
    /// Vertex order may change freely; colors follow positions.
    pub fn refresh_geometry(&mut self, vertices: Vec<Vec3>) -> Result<(), ValidationError> {
        if let Err(err) = validate_vertex_count(vertices.len()) {
            warn!("Refusing geometry refresh on {}: {}", self.id, err);
            return Err(err);
        }
        self.vertices = vertices;
        self.revision += 1;
        self.recompute();
        debug!(
            "Refreshed geometry on {}: {} vertices, {} painted keys",
            self.id,
            self.vertices.len(),
            self.store.len()
        );
        Ok(())
    }

    /// Swap in unrelated geometry and drop all painted colors
    pub fn replace_geometry(&mut self, vertices: Vec<Vec3>) -> Result<(), ValidationError> {
        if let Err(err) = validate_vertex_count(vertices.len()) {
            warn!("Refusing geometry replacement on {}: {}", self.id, err);
            return Err(err);
        }
        self.vertices = vertices;
        self.revision += 1;
        self.clear();
        Ok(())
    }

    /// Raw vertex indices grouped by canonical identity.
    ///
    /// Groups with more than one index are the duplicated vertices that a
    /// single brush hit paints together.
    pub fn shared_vertex_groups(&self) -> BTreeMap<CanonicalPosition, Vec<usize>> {
        let mut groups: BTreeMap<CanonicalPosition, Vec<usize>> = BTreeMap::new();
        for (index, vertex) in self.vertices.iter().enumerate() {
            groups
                .entry(CanonicalPosition::from_vec3(*vertex))
                .or_default()
                .push(index);
        }
        groups
    }

    /// Persisted color entries, sorted by key
    pub fn to_persisted(&self) -> Vec<ColorEntry> {
        self.store.to_persisted()
    }

    /// Replace the color map with persisted entries and recompute
    pub fn load_persisted(&mut self, entries: &[ColorEntry]) {
        self.store = VertexColorStore::from_persisted(entries);
        self.recompute();
        self.needs_save = false;
    }

    /// Take the upload flag (returns true once per change)
    pub fn take_needs_upload(&mut self) -> bool {
        std::mem::take(&mut self.needs_upload)
    }

    pub fn needs_upload(&self) -> bool {
        self.needs_upload
    }

    /// Take the save flag (returns true once per change)
    pub fn take_needs_save(&mut self) -> bool {
        std::mem::take(&mut self.needs_save)
    }

    pub fn needs_save(&self) -> bool {
        self.needs_save
    }

    /// Flag the color map as changed relative to its last save
    pub fn mark_unsaved(&mut self) {
        self.needs_save = true;
    }
}

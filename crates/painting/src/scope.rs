//! Layer scope cache - snapshot of every vertex a stroke may hit
//!
//! The snapshot is rebuilt only on request. Geometry or transform edits on a
//! member surface leave the cached snapshot untouched; callers compare
//! [`ScopeSnapshot::is_stale`] or the cache version to decide when to
//! refresh.

use std::sync::Arc;

use glam::{Affine3A, Vec3};
use tracing::{debug, warn};

use crate::registry::SurfaceRegistry;
use crate::types::SurfaceId;

/// Captured geometry of one member surface
#[derive(Debug, Clone, PartialEq)]
pub struct ScopeEntry {
    pub surface: SurfaceId,
    /// Owning transform at capture time
    pub transform: Affine3A,
    /// Local-space vertex positions at capture time
    pub vertices: Vec<Vec3>,
    /// Surface revision at capture time
    pub revision: u64,
}

/// Immutable scope snapshot.
///
/// Shared through `Arc`; a refresh builds a new snapshot, so readers holding
/// an older one keep a consistent view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScopeSnapshot {
    version: u64,
    entries: Vec<ScopeEntry>,
}

impl ScopeSnapshot {
    /// Cache version this snapshot was built at
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn entries(&self) -> &[ScopeEntry] {
        &self.entries
    }

    /// Every `(surface, local vertex, owning transform)` triple
    pub fn triples(&self) -> impl Iterator<Item = (SurfaceId, Vec3, Affine3A)> + '_ {
        self.entries.iter().flat_map(|entry| {
            entry
                .vertices
                .iter()
                .map(move |vertex| (entry.surface, *vertex, entry.transform))
        })
    }

    pub fn vertex_count(&self) -> usize {
        self.entries.iter().map(|entry| entry.vertices.len()).sum()
    }

    pub fn contains(&self, surface: SurfaceId) -> bool {
        self.entries.iter().any(|entry| entry.surface == surface)
    }

    /// True if any captured surface was detached or changed geometry or
    /// transform since capture
    pub fn is_stale(&self, registry: &SurfaceRegistry) -> bool {
        self.entries.iter().any(|entry| {
            registry
                .get(entry.surface)
                .is_none_or(|surface| surface.revision() != entry.revision)
        })
    }
}

/// Lazily built, explicitly refreshed scope snapshot
#[derive(Debug, Default)]
pub struct ScopeCache {
    snapshot: Option<Arc<ScopeSnapshot>>,
    /// Incremented on every refresh
    version: u64,
}

impl ScopeCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Current snapshot without building one
    pub fn snapshot(&self) -> Option<Arc<ScopeSnapshot>> {
        self.snapshot.clone()
    }

    /// Capture the current geometry of `members` and swap in a new snapshot.
    ///
    /// Members that are not attached, or have no vertices, are skipped.
    pub fn refresh(
        &mut self,
        members: impl IntoIterator<Item = SurfaceId>,
        registry: &SurfaceRegistry,
    ) -> Arc<ScopeSnapshot> {
        let mut entries = Vec::new();
        for id in members {
            let Some(surface) = registry.get(id) else {
                warn!("Scope member {} is not attached, skipping", id);
                continue;
            };
            if surface.vertex_count() == 0 {
                warn!("Scope member {} has no vertices, skipping", id);
                continue;
            }
            entries.push(ScopeEntry {
                surface: id,
                transform: surface.transform(),
                vertices: surface.vertices().to_vec(),
                revision: surface.revision(),
            });
        }

        self.version += 1;
        let snapshot = Arc::new(ScopeSnapshot {
            version: self.version,
            entries,
        });
        debug!(
            "Refreshed scope v{}: {} surfaces, {} vertices",
            self.version,
            snapshot.entries.len(),
            snapshot.vertex_count()
        );
        self.snapshot = Some(Arc::clone(&snapshot));
        snapshot
    }

    /// Latest snapshot, building one if none exists
    pub fn get(
        &mut self,
        members: impl IntoIterator<Item = SurfaceId>,
        registry: &SurfaceRegistry,
    ) -> Arc<ScopeSnapshot> {
        if let Some(snapshot) = &self.snapshot {
            return Arc::clone(snapshot);
        }
        self.refresh(members, registry)
    }

    /// Drop the snapshot so the next `get` rebuilds it
    pub fn invalidate(&mut self) {
        self.snapshot = None;
    }

    /// True if there is no snapshot or the snapshot is stale
    pub fn is_stale(&self, registry: &SurfaceRegistry) -> bool {
        self.snapshot
            .as_ref()
            .is_none_or(|snapshot| snapshot.is_stale(registry))
    }
}

//! Layers - named groups of surfaces sharing an ambient color, a palette and
//! a scope cache

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::recent::RecentColors;
use crate::registry::SurfaceRegistry;
use crate::scope::{ScopeCache, ScopeSnapshot};
use crate::surface::PaintableSurface;
use crate::types::{Color, SurfaceId};

/// Ordered, duplicate-free list of colors.
///
/// Duplicates are detected with [`Color::approx_eq`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Palette {
    colors: Vec<Color>,
}

impl Palette {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a palette from a list, dropping duplicates
    pub fn from_colors(colors: impl IntoIterator<Item = Color>) -> Self {
        let mut palette = Self::new();
        for color in colors {
            palette.add(color);
        }
        palette
    }

    /// Append a color unless an equal one exists. Returns true if added.
    pub fn add(&mut self, color: Color) -> bool {
        if self.contains(color) {
            return false;
        }
        self.colors.push(color);
        true
    }

    pub fn contains(&self, color: Color) -> bool {
        self.colors.iter().any(|c| c.approx_eq(&color))
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn get(&self, index: usize) -> Option<Color> {
        self.colors.get(index).copied()
    }

    pub fn remove(&mut self, index: usize) -> Option<Color> {
        (index < self.colors.len()).then(|| self.colors.remove(index))
    }

    /// Remove the color equal to `color`, if present
    pub fn remove_color(&mut self, color: Color) -> bool {
        match self.colors.iter().position(|c| c.approx_eq(&color)) {
            Some(index) => {
                self.colors.remove(index);
                true
            }
            None => false,
        }
    }

    /// Copy a recently used color into the palette
    pub fn promote_recent(&mut self, recent: &RecentColors, index: usize) -> bool {
        match recent.get(index) {
            Some(color) => self.add(color),
            None => {
                debug!("No recent color at index {}", index);
                false
            }
        }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

/// A named group of paintable surfaces
#[derive(Debug)]
pub struct Layer {
    name: String,
    /// Default color pushed to members by [`Layer::set_ambient_for_all`]
    ambient_color: Color,
    pub palette: Palette,
    members: BTreeSet<SurfaceId>,
    scope: ScopeCache,
}

impl Layer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ambient_color: Color::WHITE,
            palette: Palette::new(),
            members: BTreeSet::new(),
            scope: ScopeCache::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ambient_color(&self) -> Color {
        self.ambient_color
    }

    pub fn set_ambient_color(&mut self, color: Color) {
        self.ambient_color = color;
    }

    /// Add a surface. The scope is not rebuilt until refreshed.
    pub fn add_surface(&mut self, id: SurfaceId) -> bool {
        self.members.insert(id)
    }

    pub fn remove_surface(&mut self, id: SurfaceId) -> bool {
        self.members.remove(&id)
    }

    pub fn contains(&self, id: SurfaceId) -> bool {
        self.members.contains(&id)
    }

    pub fn members(&self) -> impl Iterator<Item = SurfaceId> + '_ {
        self.members.iter().copied()
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Apply `f` to every attached member, warning about missing ones.
    /// Returns the number of surfaces visited.
    fn for_each_member(
        &self,
        registry: &mut SurfaceRegistry,
        mut f: impl FnMut(&mut PaintableSurface),
    ) -> usize {
        let mut visited = 0;
        for id in &self.members {
            match registry.get_mut(*id) {
                Some(surface) => {
                    f(surface);
                    visited += 1;
                }
                None => warn!("Layer '{}': member {} is not attached", self.name, id),
            }
        }
        visited
    }

    /// Set every member's default color to the layer ambient color
    pub fn set_ambient_for_all(&self, registry: &mut SurfaceRegistry) -> usize {
        let ambient = self.ambient_color;
        let count = self.for_each_member(registry, |surface| surface.set_default_color(ambient));
        info!("Layer '{}': ambient applied to {} surfaces", self.name, count);
        count
    }

    /// Reset every member's default color to transparent
    pub fn clear_default_for_all(&self, registry: &mut SurfaceRegistry) -> usize {
        let count = self.for_each_member(registry, |surface| {
            surface.set_default_color(Color::TRANSPARENT)
        });
        info!("Layer '{}': default color cleared on {} surfaces", self.name, count);
        count
    }

    /// Remove painted colors from every member
    pub fn clear_all_colors(&self, registry: &mut SurfaceRegistry) -> usize {
        self.for_each_member(registry, |surface| surface.clear())
    }

    /// Recompute and re-upload every member's output buffer
    pub fn reapply_all(&self, registry: &mut SurfaceRegistry) -> usize {
        self.for_each_member(registry, |surface| surface.recompute())
    }

    /// Rebuild the scope snapshot and reapply colors
    pub fn refresh_all(&mut self, registry: &mut SurfaceRegistry) -> Arc<ScopeSnapshot> {
        let snapshot = self.refresh_scope(registry);
        self.reapply_all(registry);
        snapshot
    }

    /// Latest scope snapshot, built on first use
    pub fn scope(&mut self, registry: &SurfaceRegistry) -> Arc<ScopeSnapshot> {
        self.scope.get(self.members.iter().copied(), registry)
    }

    pub fn refresh_scope(&mut self, registry: &SurfaceRegistry) -> Arc<ScopeSnapshot> {
        self.scope.refresh(self.members.iter().copied(), registry)
    }

    pub fn invalidate_scope(&mut self) {
        self.scope.invalidate();
    }

    pub fn scope_cache(&self) -> &ScopeCache {
        &self.scope
    }
}

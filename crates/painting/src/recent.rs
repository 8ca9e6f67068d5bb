//! Most-recently-used brush colors

use std::collections::VecDeque;

use vertex_paint_config::RECENT_COLOR_CAPACITY;

use crate::types::Color;

/// Fixed-capacity MRU stack of colors, newest first.
///
/// Pushing beyond capacity evicts the oldest color. UI state only; never
/// persisted.
#[derive(Debug, Clone)]
pub struct RecentColors {
    colors: VecDeque<Color>,
    capacity: usize,
}

impl Default for RecentColors {
    fn default() -> Self {
        Self::new(RECENT_COLOR_CAPACITY)
    }
}

impl RecentColors {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            colors: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Push a color to the front, evicting the oldest beyond capacity
    pub fn push(&mut self, color: Color) {
        self.colors.push_front(color);
        self.colors.truncate(self.capacity);
    }

    /// Push unless the color matches the newest entry.
    ///
    /// Returns true if the color was pushed.
    pub fn push_if_changed(&mut self, color: Color) -> bool {
        if self.peek().is_some_and(|top| top.approx_eq(&color)) {
            return false;
        }
        self.push(color);
        true
    }

    /// Newest color
    pub fn peek(&self) -> Option<Color> {
        self.colors.front().copied()
    }

    /// Color at `index`, 0 being the newest
    pub fn get(&self, index: usize) -> Option<Color> {
        self.colors.get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = Color> + '_ {
        self.colors.iter().copied()
    }

    pub fn contains(&self, color: Color) -> bool {
        self.colors.iter().any(|c| c.approx_eq(&color))
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn clear(&mut self) {
        self.colors.clear();
    }
}

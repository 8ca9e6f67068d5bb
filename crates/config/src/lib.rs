//! Shared configuration for vertex-paint
//!
//! This crate provides the single source of truth for brush limits, drag
//! sampling, and the auxiliary tool state shared by every host that embeds
//! the paint engine (native Bevy editor, headless tooling).

use serde::{Deserialize, Serialize};

#[cfg(feature = "bevy")]
use bevy::prelude::Resource;

/// Default brush radius in screen pixels
pub const DEFAULT_RADIUS: f32 = 50.0;

/// Smallest allowed brush radius in screen pixels
pub const MIN_RADIUS: f32 = 1.0;

/// Largest allowed brush radius in screen pixels
pub const MAX_RADIUS: f32 = 500.0;

/// Radius change applied by a single size hotkey press
pub const RADIUS_STEP: f32 = 10.0;

/// Smallest allowed brush opacity
pub const MIN_OPACITY: f32 = 0.01;

/// Largest allowed brush opacity
pub const MAX_OPACITY: f32 = 1.0;

/// Minimum cursor travel, in pixels, between two drag samples
pub const DRAG_SAMPLE_THRESHOLD: f32 = 20.0;

/// Number of recently used brush colors kept around
pub const RECENT_COLOR_CAPACITY: usize = 8;

/// Maximum undo levels kept by the paint pipeline
pub const MAX_UNDO_LEVELS: usize = 20;

/// Brush configuration (limits and starting values)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "bevy", derive(Resource))]
#[serde(default)]
pub struct BrushConfig {
    /// Starting radius in screen pixels
    pub radius: f32,
    /// Lower radius bound
    pub min_radius: f32,
    /// Upper radius bound
    pub max_radius: f32,
    /// Radius hotkey increment
    pub radius_step: f32,
    /// Starting opacity
    pub opacity: f32,
    /// Lower opacity bound
    pub min_opacity: f32,
    /// Upper opacity bound
    pub max_opacity: f32,
    /// Starting hardness (0.0 = linear falloff, 1.0 = hard edge)
    pub hardness: f32,
    /// Starting brush color [r, g, b, a]
    pub color: [f32; 4],
}

impl Default for BrushConfig {
    fn default() -> Self {
        Self {
            radius: DEFAULT_RADIUS,
            min_radius: MIN_RADIUS,
            max_radius: MAX_RADIUS,
            radius_step: RADIUS_STEP,
            opacity: MAX_OPACITY,
            min_opacity: MIN_OPACITY,
            max_opacity: MAX_OPACITY,
            hardness: 0.0,
            color: [0.0, 0.0, 0.0, 1.0], // Default to black
        }
    }
}

impl BrushConfig {
    /// Clamp a radius into the configured range
    pub fn clamp_radius(&self, radius: f32) -> f32 {
        radius.clamp(self.min_radius, self.max_radius)
    }

    /// Clamp an opacity into the configured range
    pub fn clamp_opacity(&self, opacity: f32) -> f32 {
        opacity.clamp(self.min_opacity, self.max_opacity)
    }
}

/// Tool configuration for the paint pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "bevy", derive(Resource))]
#[serde(default)]
pub struct PaintConfig {
    /// Brush limits and starting values
    pub brush: BrushConfig,
    /// Minimum cursor travel between drag samples, in pixels
    pub drag_sample_threshold: f32,
    /// Capacity of the recent colors ring
    pub recent_color_capacity: usize,
    /// Maximum number of strokes kept for undo
    pub max_undo_levels: usize,
}

impl Default for PaintConfig {
    fn default() -> Self {
        Self {
            brush: BrushConfig::default(),
            drag_sample_threshold: DRAG_SAMPLE_THRESHOLD,
            recent_color_capacity: RECENT_COLOR_CAPACITY,
            max_undo_levels: MAX_UNDO_LEVELS,
        }
    }
}

impl PaintConfig {
    /// Build a config from defaults overridden by environment variables
    ///
    /// Recognized variables: `VERTEX_PAINT_RADIUS`, `VERTEX_PAINT_OPACITY`,
    /// `VERTEX_PAINT_HARDNESS`, `VERTEX_PAINT_DRAG_THRESHOLD`,
    /// `VERTEX_PAINT_UNDO_LEVELS`. Unparseable values are ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from defaults overridden by an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let parse_f32 = |key: &str| lookup(key).and_then(|v| v.trim().parse::<f32>().ok());

        if let Some(radius) = parse_f32("VERTEX_PAINT_RADIUS") {
            config.brush.radius = config.brush.clamp_radius(radius);
        }
        if let Some(opacity) = parse_f32("VERTEX_PAINT_OPACITY") {
            config.brush.opacity = config.brush.clamp_opacity(opacity);
        }
        if let Some(hardness) = parse_f32("VERTEX_PAINT_HARDNESS") {
            config.brush.hardness = hardness.clamp(0.0, 1.0);
        }
        if let Some(threshold) = parse_f32("VERTEX_PAINT_DRAG_THRESHOLD") {
            config.drag_sample_threshold = threshold.max(0.0);
        }
        if let Some(levels) =
            lookup("VERTEX_PAINT_UNDO_LEVELS").and_then(|v| v.trim().parse::<usize>().ok())
        {
            config.max_undo_levels = levels;
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PaintConfig::default();
        assert_eq!(config.brush.radius, DEFAULT_RADIUS);
        assert_eq!(config.drag_sample_threshold, DRAG_SAMPLE_THRESHOLD);
        assert_eq!(config.recent_color_capacity, 8);
        assert_eq!(config.max_undo_levels, 20);
    }

    #[test]
    fn test_clamp_ranges() {
        let brush = BrushConfig::default();
        assert_eq!(brush.clamp_radius(0.0), MIN_RADIUS);
        assert_eq!(brush.clamp_radius(9000.0), MAX_RADIUS);
        assert_eq!(brush.clamp_opacity(0.0), MIN_OPACITY);
        assert_eq!(brush.clamp_opacity(2.0), MAX_OPACITY);
    }

    #[test]
    fn test_lookup_overrides() {
        let config = PaintConfig::from_lookup(|key| match key {
            "VERTEX_PAINT_RADIUS" => Some("1200".to_string()),
            "VERTEX_PAINT_HARDNESS" => Some("0.5".to_string()),
            "VERTEX_PAINT_UNDO_LEVELS" => Some("not a number".to_string()),
            _ => None,
        });
        assert_eq!(config.brush.radius, MAX_RADIUS);
        assert_eq!(config.brush.hardness, 0.5);
        assert_eq!(config.max_undo_levels, MAX_UNDO_LEVELS);
    }
}

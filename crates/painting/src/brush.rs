//! Brush settings, falloff weighting and drag sampling
//!
//! The brush works in screen space: the hit-testing side reports how far
//! each vertex projects from the cursor, and [`falloff_weight`] turns that
//! distance into a blend weight.

use glam::Vec2;
use tracing::debug;
use vertex_paint_config::{BrushConfig, DRAG_SAMPLE_THRESHOLD};

use crate::types::{BlendMode, Color};

/// Falloff weight for a vertex `distance` pixels from the brush center.
///
/// - `hardness >= 1`: hard edge, weight 1 everywhere
/// - `hardness <= 0`: linear falloff `1 - d/r`
/// - otherwise `(1 - d/r)^e` with `e` going from 1 to 3 as hardness rises
///
/// `distance` must already be filtered to `<= radius`; the result is not
/// clamped. A non-positive radius paints nothing.
pub fn falloff_weight(distance: f32, radius: f32, hardness: f32) -> f32 {
    if radius <= 0.0 {
        return 0.0;
    }
    let normalized = distance / radius;

    if hardness >= 1.0 {
        1.0
    } else if hardness <= 0.0 {
        1.0 - normalized
    } else {
        let exponent = 1.0 + (3.0 - 1.0) * hardness;
        (1.0 - normalized).powf(exponent)
    }
}

/// Current brush parameters
#[derive(Debug, Clone)]
pub struct BrushSettings {
    /// Brush color; its alpha channel is ignored when painting
    pub color: Color,
    /// Radius in screen pixels
    radius: f32,
    /// Opacity applied on top of the falloff weight
    opacity: f32,
    /// Hardness 0.0 (linear falloff) to 1.0 (hard edge)
    hardness: f32,
    /// Paint or erase
    pub mode: BlendMode,
    /// Limits the radius and opacity are clamped to
    limits: BrushConfig,
}

impl Default for BrushSettings {
    fn default() -> Self {
        Self::from_config(&BrushConfig::default())
    }
}

impl BrushSettings {
    /// Create brush settings starting from the configured values
    pub fn from_config(config: &BrushConfig) -> Self {
        Self {
            color: Color::from(config.color),
            radius: config.clamp_radius(config.radius),
            opacity: config.clamp_opacity(config.opacity),
            hardness: config.hardness.clamp(0.0, 1.0),
            mode: BlendMode::Paint,
            limits: config.clone(),
        }
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn set_radius(&mut self, radius: f32) {
        self.radius = self.limits.clamp_radius(radius);
    }

    /// Grow (positive steps) or shrink (negative steps) the radius by the
    /// configured hotkey increment
    pub fn step_radius(&mut self, steps: i32) {
        self.set_radius(self.radius + self.limits.radius_step * steps as f32);
        debug!("Brush radius now {:.1}", self.radius);
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn set_opacity(&mut self, opacity: f32) {
        self.opacity = self.limits.clamp_opacity(opacity);
    }

    pub fn hardness(&self) -> f32 {
        self.hardness
    }

    pub fn set_hardness(&mut self, hardness: f32) {
        self.hardness = hardness.clamp(0.0, 1.0);
    }

    /// Falloff weight for a screen-space distance with these settings
    pub fn weight(&self, distance: f32) -> f32 {
        falloff_weight(distance, self.radius, self.hardness)
    }

    /// Whether a screen-space distance falls under the brush
    pub fn covers(&self, distance: f32) -> bool {
        distance <= self.radius
    }
}

/// Decides which cursor positions become paint samples.
///
/// The press always samples. While dragging, a new sample is taken only
/// once the cursor has moved more than the threshold away from the last
/// sample, so overlapping dabs are not stacked on every mouse event.
#[derive(Debug, Clone)]
pub struct SampleGate {
    threshold: f32,
    /// Last sampled position (None if no stroke in progress)
    last_sample: Option<Vec2>,
}

impl Default for SampleGate {
    fn default() -> Self {
        Self::new(DRAG_SAMPLE_THRESHOLD)
    }
}

impl SampleGate {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold: threshold.max(0.0),
            last_sample: None,
        }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Start a stroke at the press position (always a sample)
    pub fn begin(&mut self, cursor: Vec2) {
        self.last_sample = Some(cursor);
    }

    /// Returns true if the drag position should be sampled
    pub fn should_sample(&mut self, cursor: Vec2) -> bool {
        let Some(last) = self.last_sample else {
            return false;
        };
        if cursor.distance(last) > self.threshold {
            self.last_sample = Some(cursor);
            true
        } else {
            false
        }
    }

    /// End the current stroke
    pub fn end(&mut self) {
        self.last_sample = None;
    }

    pub fn is_active(&self) -> bool {
        self.last_sample.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hard_brush_is_constant() {
        for d in [0.0, 10.0, 49.0, 50.0] {
            assert_eq!(falloff_weight(d, 50.0, 1.0), 1.0);
        }
    }

    #[test]
    fn test_soft_brush_is_linear() {
        assert!((falloff_weight(0.0, 50.0, 0.0) - 1.0).abs() < 1e-6);
        assert!((falloff_weight(25.0, 50.0, 0.0) - 0.5).abs() < 1e-6);
        assert!(falloff_weight(50.0, 50.0, 0.0).abs() < 1e-6);
    }

    #[test]
    fn test_mid_hardness_uses_exponent() {
        // hardness 0.5 -> exponent 2
        let w = falloff_weight(25.0, 50.0, 0.5);
        assert!((w - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_weight_is_monotonic() {
        for hardness in [0.1, 0.35, 0.5, 0.8, 0.99] {
            let mut previous = f32::INFINITY;
            for step in 0..=100 {
                let d = step as f32 * 0.5;
                let w = falloff_weight(d, 50.0, hardness);
                assert!(w <= previous, "hardness {} at d={}", hardness, d);
                assert!((0.0..=1.0).contains(&w));
                previous = w;
            }
        }
    }

    #[test]
    fn test_zero_radius_paints_nothing() {
        assert_eq!(falloff_weight(0.0, 0.0, 0.5), 0.0);
    }

    #[test]
    fn test_settings_clamp() {
        let mut brush = BrushSettings::default();
        assert_eq!(brush.radius(), 50.0);

        brush.set_radius(0.0);
        assert_eq!(brush.radius(), 1.0);
        brush.step_radius(100);
        assert_eq!(brush.radius(), 500.0);
        brush.step_radius(-1);
        assert_eq!(brush.radius(), 490.0);

        brush.set_opacity(0.0);
        assert_eq!(brush.opacity(), 0.01);
        brush.set_hardness(4.0);
        assert_eq!(brush.hardness(), 1.0);
    }

    #[test]
    fn test_sample_gate_threshold() {
        let mut gate = SampleGate::new(20.0);
        assert!(!gate.should_sample(Vec2::ZERO));

        gate.begin(Vec2::ZERO);
        assert!(!gate.should_sample(Vec2::new(10.0, 0.0)));
        assert!(!gate.should_sample(Vec2::new(20.0, 0.0)));
        assert!(gate.should_sample(Vec2::new(25.0, 0.0)));
        // Measured from the last sample, not the press
        assert!(!gate.should_sample(Vec2::new(40.0, 0.0)));
        assert!(gate.should_sample(Vec2::new(46.0, 0.0)));

        gate.end();
        assert!(!gate.is_active());
        assert!(!gate.should_sample(Vec2::new(500.0, 0.0)));
    }
}

//! Per-vertex paint and erase blending
//!
//! Raw colors are stored with straight (non-premultiplied) alpha.

use crate::types::{BlendMode, Color};

/// Paint `brush` over `old` with the given effective weight
/// (brush opacity times falloff).
///
/// Standard "over" compositing: the old color contributes in proportion to
/// its own alpha, and alpha accumulates as `w + a_old * (1 - w)`. The brush
/// alpha channel is ignored; only `weight` controls strength.
pub fn paint_over(old: Color, brush: Color, weight: f32) -> Color {
    let w = weight.clamp(0.0, 1.0);
    let keep = old.a * (1.0 - w);
    let alpha = w + keep;

    if alpha <= 0.0 {
        return Color::TRANSPARENT;
    }

    // Composite premultiplied, then store straight alpha
    Color::new(
        (brush.r * w + old.r * keep) / alpha,
        (brush.g * w + old.g * keep) / alpha,
        (brush.b * w + old.b * keep) / alpha,
        alpha,
    )
}

/// Remove `weight` of alpha from `old`, keeping its RGB
pub fn erase(old: Color, weight: f32) -> Color {
    old.with_alpha((old.a - weight).clamp(0.0, 1.0))
}

/// Dispatch on blend mode
pub fn blend(mode: BlendMode, old: Color, brush: Color, weight: f32) -> Color {
    match mode {
        BlendMode::Paint => paint_over(old, brush, weight),
        BlendMode::Erase => erase(old, weight),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_color_near(actual: Color, expected: Color) {
        let a = actual.to_array();
        let e = expected.to_array();
        for i in 0..4 {
            assert!((a[i] - e[i]).abs() < 1e-5, "{:?} != {:?}", actual, expected);
        }
    }

    #[test]
    fn test_full_weight_replaces() {
        let old = Color::new(1.0, 0.0, 0.0, 0.5);
        let brush = Color::new(0.0, 0.0, 1.0, 0.25);
        assert_eq!(paint_over(old, brush, 1.0), Color::new(0.0, 0.0, 1.0, 1.0));
    }

    #[test]
    fn test_half_weight_on_unpainted() {
        let out = paint_over(Color::TRANSPARENT, Color::rgb(1.0, 0.0, 0.0), 0.5);
        assert_color_near(out, Color::new(1.0, 0.0, 0.0, 0.5));
    }

    #[test]
    fn test_alpha_accumulates() {
        let brush = Color::rgb(0.0, 1.0, 0.0);
        let once = paint_over(Color::TRANSPARENT, brush, 0.5);
        let twice = paint_over(once, brush, 0.5);
        assert!((twice.a - 0.75).abs() < 1e-6);
        assert_color_near(twice.with_alpha(1.0), Color::rgb(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_mixes_with_existing_color() {
        let old = Color::new(1.0, 0.0, 0.0, 1.0);
        let out = paint_over(old, Color::rgb(0.0, 0.0, 1.0), 0.25);
        assert_color_near(out, Color::new(0.75, 0.0, 0.25, 1.0));
    }

    #[test]
    fn test_zero_weight_on_transparent_stays_transparent() {
        assert_eq!(
            paint_over(Color::TRANSPARENT, Color::WHITE, 0.0),
            Color::TRANSPARENT
        );
    }

    #[test]
    fn test_erase_clamps() {
        let old = Color::new(0.2, 0.4, 0.6, 0.3);
        let out = erase(old, 1.0);
        assert_eq!(out, Color::new(0.2, 0.4, 0.6, 0.0));
        assert_eq!(erase(out, 1.0).a, 0.0);
    }

    #[test]
    fn test_erase_partial() {
        let out = erase(Color::new(1.0, 1.0, 1.0, 0.8), 0.5);
        assert!((out.a - 0.3).abs() < 1e-6);
        assert_eq!(blend(BlendMode::Erase, Color::WHITE, Color::BLACK, 0.25).r, 1.0);
    }
}

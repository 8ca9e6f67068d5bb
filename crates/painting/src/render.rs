//! Hand-off point between the paint engine and the renderer

use crate::types::{Color, SurfaceId};

/// Consumer of recomputed surface color buffers.
///
/// A renderer implementation typically uploads the buffer as a
/// per-instance vector array on the surface's material. The buffer is
/// always `MAX_VERTEX_COLORS` long, indexed by raw vertex index.
pub trait RenderSink {
    fn upload(&mut self, surface: SurfaceId, colors: &[Color]);
}

impl<F> RenderSink for F
where
    F: FnMut(SurfaceId, &[Color]),
{
    fn upload(&mut self, surface: SurfaceId, colors: &[Color]) {
        self(surface, colors)
    }
}

/// Sink that discards uploads, for headless use
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl RenderSink for NullSink {
    fn upload(&mut self, _surface: SurfaceId, _colors: &[Color]) {}
}

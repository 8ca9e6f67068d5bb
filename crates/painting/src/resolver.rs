//! Stroke resolver - turns weighted vertex candidates into raw color writes
//!
//! A stroke is a press-drag-release interaction. Within one stroke, the
//! first candidate to reach a `(surface, canonical position)` pair computes
//! the blended color; every later candidate for the same pair reuses that
//! result. Split-normal duplicates and overlapping dabs therefore receive a
//! single blend per stroke instead of compounding.

use std::collections::{BTreeSet, HashMap};

use glam::Vec3;
use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::blend::blend;
use crate::brush::BrushSettings;
use crate::canonical::CanonicalPosition;
use crate::registry::SurfaceRegistry;
use crate::types::{BlendMode, Color, SurfaceId};
use crate::undo::UndoRecorder;

/// Errors from stroke state transitions
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StrokeError {
    #[error("stroke {0} is already in progress")]
    AlreadyActive(u64),
}

/// A vertex under the brush, as reported by hit testing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexHit {
    pub surface: SurfaceId,
    /// Local-space vertex position
    pub position: Vec3,
    /// Screen-space distance from the brush center, in pixels
    pub screen_distance: f32,
}

/// A vertex with its falloff weight, ready to be blended
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub surface: SurfaceId,
    pub position: Vec3,
    pub weight: f32,
}

/// Score hits with the brush falloff, dropping anything outside the radius
pub fn score_hits(hits: &[VertexHit], brush: &BrushSettings) -> Vec<Candidate> {
    hits.iter()
        .filter(|hit| brush.covers(hit.screen_distance))
        .map(|hit| Candidate {
            surface: hit.surface,
            position: hit.position,
            weight: brush.weight(hit.screen_distance),
        })
        .collect()
}

/// Parameters fixed for the duration of a stroke
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeParams {
    pub mode: BlendMode,
    /// Brush color; alpha is ignored
    pub color: Color,
    /// Multiplied into every candidate weight
    pub opacity: f32,
}

impl StrokeParams {
    pub fn from_brush(brush: &BrushSettings) -> Self {
        Self {
            mode: brush.mode,
            color: brush.color,
            opacity: brush.opacity(),
        }
    }
}

/// What one sample did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SampleReport {
    /// Candidates that computed a fresh blend
    pub written: usize,
    /// Candidates that reused a result from earlier in the stroke
    pub reused: usize,
    /// Candidates on surfaces that are not attached
    pub skipped: usize,
}

/// What a finished stroke touched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrokeSummary {
    pub stroke_id: u64,
    /// Surfaces written during the stroke, in id order
    pub surfaces: Vec<SurfaceId>,
    /// Total blend computations across the stroke
    pub blends: usize,
    pub samples: usize,
}

/// Stroke lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokeState {
    Idle,
    Active { stroke_id: u64 },
}

#[derive(Debug)]
struct ActiveStroke {
    stroke_id: u64,
    params: StrokeParams,
    /// Surfaces already handed to the undo recorder
    touched: BTreeSet<SurfaceId>,
    /// Per-stroke result cache
    results: HashMap<(SurfaceId, CanonicalPosition), Color>,
    blends: usize,
    samples: usize,
}

impl ActiveStroke {
    fn summary(&self) -> StrokeSummary {
        StrokeSummary {
            stroke_id: self.stroke_id,
            surfaces: self.touched.iter().copied().collect(),
            blends: self.blends,
            samples: self.samples,
        }
    }
}

/// Resolves candidate batches for one stroke at a time
#[derive(Debug, Default)]
pub struct StrokeResolver {
    active: Option<ActiveStroke>,
}

impl StrokeResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> StrokeState {
        match &self.active {
            Some(active) => StrokeState::Active {
                stroke_id: active.stroke_id,
            },
            None => StrokeState::Idle,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Blends computed so far in the current stroke
    pub fn blend_count(&self) -> usize {
        self.active.as_ref().map_or(0, |active| active.blends)
    }

    /// Start a stroke with an empty result cache
    pub fn begin(&mut self, stroke_id: u64, params: StrokeParams) -> Result<(), StrokeError> {
        if let Some(active) = &self.active {
            return Err(StrokeError::AlreadyActive(active.stroke_id));
        }
        debug!(
            "Begin stroke {}: mode={:?}, opacity={:.2}",
            stroke_id, params.mode, params.opacity
        );
        self.active = Some(ActiveStroke {
            stroke_id,
            params,
            touched: BTreeSet::new(),
            results: HashMap::new(),
            blends: 0,
            samples: 0,
        });
        Ok(())
    }

    /// Apply one sample's candidates.
    ///
    /// Every surface about to be written for the first time this stroke is
    /// handed to `undo` before any write. Surfaces written by this sample get
    /// one output recompute at the end. Calls outside a stroke are ignored.
    pub fn resolve(
        &mut self,
        registry: &mut SurfaceRegistry,
        candidates: &[Candidate],
        undo: &mut dyn UndoRecorder,
    ) -> SampleReport {
        let mut report = SampleReport::default();
        let Some(active) = self.active.as_mut() else {
            debug!("resolve: no active stroke, ignoring");
            return report;
        };
        active.samples += 1;

        let mut sample_surfaces = BTreeSet::new();
        let mut missing = BTreeSet::new();
        for candidate in candidates {
            let id = candidate.surface;
            if active.touched.contains(&id) {
                sample_surfaces.insert(id);
                continue;
            }
            if missing.contains(&id) {
                continue;
            }
            match registry.get(id) {
                Some(surface) => {
                    undo.record(active.stroke_id, surface);
                    active.touched.insert(id);
                    sample_surfaces.insert(id);
                }
                None => {
                    warn!("Stroke {} hit {} which is not attached", active.stroke_id, id);
                    missing.insert(id);
                }
            }
        }

        let params = active.params;
        for candidate in candidates {
            let id = candidate.surface;
            let Some(surface) = registry.get_mut(id).filter(|_| !missing.contains(&id)) else {
                report.skipped += 1;
                continue;
            };

            let key = CanonicalPosition::from_vec3(candidate.position);
            if active.results.contains_key(&(id, key)) {
                report.reused += 1;
                continue;
            }

            let old = surface.raw_color(key);
            let new = blend(
                params.mode,
                old,
                params.color,
                params.opacity * candidate.weight,
            );
            trace!("{} {:?}: {:?} -> {:?}", id, key, old, new);
            surface.write_raw(key, new);
            active.results.insert((id, key), new);
            active.blends += 1;
            report.written += 1;
        }

        for id in &sample_surfaces {
            if let Some(surface) = registry.get_mut(*id) {
                surface.recompute();
            }
        }

        report
    }

    /// Finish the stroke: recompute every touched surface and close the
    /// undo entry. Returns None if no stroke was active.
    pub fn end(
        &mut self,
        registry: &mut SurfaceRegistry,
        undo: &mut dyn UndoRecorder,
    ) -> Option<StrokeSummary> {
        let active = self.active.take()?;
        for id in &active.touched {
            if let Some(surface) = registry.get_mut_or_warn(*id) {
                surface.recompute();
                surface.mark_unsaved();
            }
        }
        undo.commit(active.stroke_id);

        let summary = active.summary();
        debug!(
            "End stroke {}: {} samples, {} blends, {} surfaces",
            summary.stroke_id,
            summary.samples,
            summary.blends,
            summary.surfaces.len()
        );
        Some(summary)
    }

    /// Abandon the stroke without rolling back writes already made.
    ///
    /// The undo entry is still committed so the partial stroke can be
    /// undone.
    pub fn cancel(&mut self, undo: &mut dyn UndoRecorder) -> Option<StrokeSummary> {
        let active = self.active.take()?;
        undo.commit(active.stroke_id);
        debug!(
            "Cancelled stroke {} after {} blends",
            active.stroke_id, active.blends
        );
        Some(active.summary())
    }
}

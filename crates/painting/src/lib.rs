//! vertex-paint - per-vertex color painting engine
//!
//! This crate provides the core of the vertex painting system:
//! - [`canonical`] - Quantized vertex identity shared by duplicated vertices
//! - [`store`] - Sparse color map keyed by canonical position
//! - [`surface`] - Paintable surface with default color and output buffer
//! - [`registry`] - Typed lookup of attached surfaces
//! - [`brush`] - Brush settings, falloff weighting and drag sampling
//! - [`blend`] - Paint and erase blending
//! - [`resolver`] - Per-stroke deduplicating blend resolver
//! - [`scope`] - Layer scope snapshots for hit testing
//! - [`hit_test`] - Screen-space vertex hit collection
//! - [`layer`] - Layers and palettes
//! - [`persist`] - JSON documents for surfaces and layers
//! - [`pipeline`] - Complete painting pipeline

pub mod blend;
pub mod brush;
pub mod canonical;
pub mod constants;
pub mod layer;
pub mod persist;
pub mod pipeline;
pub mod recent;
pub mod registry;
pub mod render;
pub mod resolver;
pub mod scope;
pub mod store;
pub mod surface;
pub mod types;
pub mod undo;
pub mod validation;

pub use blend::*;
pub use brush::*;
pub use canonical::*;
pub use constants::*;
pub use hit_test::*;
pub use layer::*;
pub use persist::*;
pub use pipeline::*;
pub use recent::*;
pub use registry::*;
pub use render::*;
pub use resolver::*;
pub use scope::*;
pub use store::*;
pub use surface::*;
pub use types::*;
pub use undo::*;
pub use validation::*;

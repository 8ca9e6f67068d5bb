//! JSON documents for surface color maps and layer settings
//!
//! Every document carries a schema version. Surface documents also record
//! the canonical precision their keys were produced with, since keys from a
//! different precision would silently miss every vertex.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::constants::{CANONICAL_PRECISION, PERSIST_SCHEMA_VERSION};
use crate::layer::{Layer, Palette};
use crate::store::ColorEntry;
use crate::surface::PaintableSurface;
use crate::types::Color;
use crate::validation::{validate_precision, ValidationError};

/// Errors from loading or saving documents
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Unsupported schema version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },
}

fn check_version(found: u32) -> Result<(), PersistError> {
    if found != PERSIST_SCHEMA_VERSION {
        return Err(PersistError::UnsupportedVersion {
            found,
            expected: PERSIST_SCHEMA_VERSION,
        });
    }
    Ok(())
}

/// Persisted color map of one surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceDocument {
    pub schema_version: u32,
    pub precision: u32,
    pub name: String,
    pub default_color: Color,
    pub entries: Vec<ColorEntry>,
}

impl SurfaceDocument {
    pub fn from_surface(surface: &PaintableSurface) -> Self {
        Self {
            schema_version: PERSIST_SCHEMA_VERSION,
            precision: CANONICAL_PRECISION,
            name: surface.name().to_string(),
            default_color: surface.default_color(),
            entries: surface.to_persisted(),
        }
    }

    pub fn to_json(&self) -> Result<String, PersistError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse and validate a document
    pub fn from_json(json: &str) -> Result<Self, PersistError> {
        let document: Self = serde_json::from_str(json)?;
        check_version(document.schema_version)?;
        validate_precision(document.precision)?;
        Ok(document)
    }

    /// Load the default color and color map into a surface.
    ///
    /// The surface ends up clean (nothing to save).
    pub fn apply_to(&self, surface: &mut PaintableSurface) {
        if self.name != surface.name() {
            warn!(
                "Loading colors saved for '{}' into '{}'",
                self.name,
                surface.name()
            );
        }
        surface.set_default_color(self.default_color);
        surface.load_persisted(&self.entries);
        debug!(
            "Loaded {} color entries into {}",
            self.entries.len(),
            surface.id()
        );
    }
}

/// Persisted layer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerDocument {
    pub schema_version: u32,
    pub name: String,
    pub ambient_color: Color,
    pub palette: Palette,
}

impl LayerDocument {
    pub fn from_layer(layer: &Layer) -> Self {
        Self {
            schema_version: PERSIST_SCHEMA_VERSION,
            name: layer.name().to_string(),
            ambient_color: layer.ambient_color(),
            palette: layer.palette.clone(),
        }
    }

    pub fn to_json(&self) -> Result<String, PersistError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, PersistError> {
        let document: Self = serde_json::from_str(json)?;
        check_version(document.schema_version)?;
        Ok(document)
    }

    /// Create a layer with no members from these settings
    pub fn into_layer(self) -> Layer {
        let mut layer = Layer::new(self.name);
        layer.set_ambient_color(self.ambient_color);
        // Re-add through the dedup path in case the file was hand edited
        layer.palette = Palette::from_colors(self.palette.colors().iter().copied());
        layer
    }
}

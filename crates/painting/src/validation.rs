use crate::constants::{CANONICAL_PRECISION, MAX_VERTEX_COLORS};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Geometry has {count} vertices, output buffer holds at most {max}")]
    CapacityExceeded { count: usize, max: usize },
    #[error("Canonical precision {found} does not match the engine precision {expected}")]
    PrecisionMismatch { found: u32, expected: u32 },
}

/// Check that a vertex count fits the fixed output buffer
pub fn validate_vertex_count(count: usize) -> Result<(), ValidationError> {
    if count > MAX_VERTEX_COLORS {
        return Err(ValidationError::CapacityExceeded {
            count,
            max: MAX_VERTEX_COLORS,
        });
    }
    Ok(())
}

/// Check that persisted keys were produced with the engine precision
pub fn validate_precision(precision: u32) -> Result<(), ValidationError> {
    if precision != CANONICAL_PRECISION {
        return Err(ValidationError::PrecisionMismatch {
            found: precision,
            expected: CANONICAL_PRECISION,
        });
    }
    Ok(())
}

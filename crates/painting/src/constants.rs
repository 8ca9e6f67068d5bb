/// Decimal digits kept when canonicalizing vertex positions.
/// Changing it invalidates every persisted color map.
pub const CANONICAL_PRECISION: u32 = 3;

/// Fixed element count of a surface output color buffer.
pub const MAX_VERTEX_COLORS: usize = 1024;

/// Schema version written into persisted documents.
pub const PERSIST_SCHEMA_VERSION: u32 = 1;

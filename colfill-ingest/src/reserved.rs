//! Reserved column names recognized by the ingestion engine.
//!
//! These are protocol constants, not user data: a source column named
//! [`INDEX_SENTINEL_NAME`] carries explicit row index values, and the two
//! synthesized index columns land under [`PKEY_COLUMN_NAME`] and
//! [`OKEY_COLUMN_NAME`] on every fill.

/// Source column name marking an explicit row index.
///
/// Recognized by name rather than by schema type; the sentinel column is
/// filled into the primary-key column instead of a data column of its own.
pub const INDEX_SENTINEL_NAME: &str = "__INDEX__";

/// Destination name of the synthesized primary-key column.
pub const PKEY_COLUMN_NAME: &str = "cf_pkey";

/// Destination name of the synthesized order-key column.
///
/// Always equal in value to the primary-key column immediately after
/// synthesis.
pub const OKEY_COLUMN_NAME: &str = "cf_okey";

/// Check whether a destination column name is claimed by the engine.
#[inline]
pub fn is_reserved_column_name(name: &str) -> bool {
    name == INDEX_SENTINEL_NAME || name == PKEY_COLUMN_NAME || name == OKEY_COLUMN_NAME
}

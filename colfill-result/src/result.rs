use crate::error::Error;

/// Result alias used throughout the colfill crates.
pub type Result<T> = std::result::Result<T, Error>;

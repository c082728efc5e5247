//! Error types and result definitions for the colfill ingestion engine.
//!
//! All crates in the workspace share a single error enum ([`Error`]) and a
//! result alias ([`Result<T>`]). Operations that can fail return `Result<T>`
//! so failures propagate naturally with the `?` operator and callers can
//! match on specific variants where recovery is possible.
//!
//! Only a handful of conditions are unrecoverable for a whole fill call:
//! using the engine before initialization, naming a column the source does
//! not supply, discovering an unrecognized source buffer during type
//! inference, and requesting row-number index generation with a zero limit.
//! Everything else (bulk-copy incompatibility, out-of-range values, NaN
//! sentinels) is recovered locally by the engine and never surfaces here.

pub mod error;
pub mod result;

pub use error::Error;
pub use result::Result;

#![forbid(unsafe_code)]

//! The destination column store.
//!
//! A [`Table`] owns named, typed [`Column`]s sized to a fixed row capacity.
//! Each column pairs tagged-union storage ([`ColumnData`]) with a parallel
//! validity bitmap: absence is a bitmap state, never a stored sentinel
//! value. Type promotion constructs a new storage variant and rehydrates
//! prior rows; storage is never reinterpreted through an incompatible
//! view.

pub mod bitmap;
pub mod column;
pub mod table;

pub use bitmap::Bitmap;
pub use column::{Column, ColumnData};
pub use table::Table;

pub use colfill_result::{Error, Result};

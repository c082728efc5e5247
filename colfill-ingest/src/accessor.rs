//! Source-side contracts: element buffers and the accessor trait.

use colfill_result::Result;
use colfill_types::{CellValue, ColumnType, ElementKind};

/// A source column's element storage.
///
/// The ten numeric variants hold contiguous fixed-width values and are
/// eligible for bulk copy. `Bool` and `Object` columns can only be filled
/// through the per-element path. Scalar access goes through the checked
/// views below; there is no raw reinterpretation of buffer memory.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementBuffer {
    Int8(Vec<i8>),
    Int16(Vec<i16>),
    Int32(Vec<i32>),
    Int64(Vec<i64>),
    UInt8(Vec<u8>),
    UInt16(Vec<u16>),
    UInt32(Vec<u32>),
    UInt64(Vec<u64>),
    Float32(Vec<f32>),
    Float64(Vec<f64>),
    Bool(Vec<bool>),
    /// Heterogeneous or boxed cells; `CellValue::Null` marks a hole.
    Object(Vec<CellValue>),
}

impl ElementBuffer {
    pub fn kind(&self) -> ElementKind {
        match self {
            ElementBuffer::Int8(_) => ElementKind::Int8,
            ElementBuffer::Int16(_) => ElementKind::Int16,
            ElementBuffer::Int32(_) => ElementKind::Int32,
            ElementBuffer::Int64(_) => ElementKind::Int64,
            ElementBuffer::UInt8(_) => ElementKind::UInt8,
            ElementBuffer::UInt16(_) => ElementKind::UInt16,
            ElementBuffer::UInt32(_) => ElementKind::UInt32,
            ElementBuffer::UInt64(_) => ElementKind::UInt64,
            ElementBuffer::Float32(_) => ElementKind::Float32,
            ElementBuffer::Float64(_) => ElementKind::Float64,
            ElementBuffer::Bool(_) => ElementKind::Bool,
            ElementBuffer::Object(_) => ElementKind::Object,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ElementBuffer::Int8(v) => v.len(),
            ElementBuffer::Int16(v) => v.len(),
            ElementBuffer::Int32(v) => v.len(),
            ElementBuffer::Int64(v) => v.len(),
            ElementBuffer::UInt8(v) => v.len(),
            ElementBuffer::UInt16(v) => v.len(),
            ElementBuffer::UInt32(v) => v.len(),
            ElementBuffer::UInt64(v) => v.len(),
            ElementBuffer::Float32(v) => v.len(),
            ElementBuffer::Float64(v) => v.len(),
            ElementBuffer::Bool(v) => v.len(),
            ElementBuffer::Object(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Checked 64-bit float view of element `idx`.
    ///
    /// `None` when the element has no numeric reading (out of range, bool,
    /// non-numeric object cell). NaN floats read as `Some(NaN)`; callers
    /// decide whether that is a null marker or a promotion trigger.
    pub fn get_f64(&self, idx: usize) -> Option<f64> {
        match self {
            ElementBuffer::Int8(v) => v.get(idx).map(|&x| x as f64),
            ElementBuffer::Int16(v) => v.get(idx).map(|&x| x as f64),
            ElementBuffer::Int32(v) => v.get(idx).map(|&x| x as f64),
            ElementBuffer::Int64(v) => v.get(idx).map(|&x| x as f64),
            ElementBuffer::UInt8(v) => v.get(idx).map(|&x| x as f64),
            ElementBuffer::UInt16(v) => v.get(idx).map(|&x| x as f64),
            ElementBuffer::UInt32(v) => v.get(idx).map(|&x| x as f64),
            ElementBuffer::UInt64(v) => v.get(idx).map(|&x| x as f64),
            ElementBuffer::Float32(v) => v.get(idx).map(|&x| x as f64),
            ElementBuffer::Float64(v) => v.get(idx).copied(),
            ElementBuffer::Bool(_) => None,
            ElementBuffer::Object(v) => v.get(idx).and_then(CellValue::as_f64),
        }
    }

    /// Checked 64-bit integer view of element `idx`.
    ///
    /// Floats must be finite (truncated toward zero); an unsigned value
    /// beyond `i64::MAX` has no integer reading.
    pub fn get_i64(&self, idx: usize) -> Option<i64> {
        match self {
            ElementBuffer::Int8(v) => v.get(idx).map(|&x| x as i64),
            ElementBuffer::Int16(v) => v.get(idx).map(|&x| x as i64),
            ElementBuffer::Int32(v) => v.get(idx).map(|&x| x as i64),
            ElementBuffer::Int64(v) => v.get(idx).copied(),
            ElementBuffer::UInt8(v) => v.get(idx).map(|&x| x as i64),
            ElementBuffer::UInt16(v) => v.get(idx).map(|&x| x as i64),
            ElementBuffer::UInt32(v) => v.get(idx).map(|&x| x as i64),
            ElementBuffer::UInt64(v) => v.get(idx).and_then(|&x| i64::try_from(x).ok()),
            ElementBuffer::Float32(v) => v
                .get(idx)
                .and_then(|&x| x.is_finite().then_some(x as i64)),
            ElementBuffer::Float64(v) => v
                .get(idx)
                .and_then(|&x| x.is_finite().then_some(x as i64)),
            ElementBuffer::Bool(_) => None,
            ElementBuffer::Object(v) => v.get(idx).and_then(CellValue::as_i64),
        }
    }
}

/// One source column as handed to the engine for a single fill call:
/// element storage plus the sparse list of row offsets that are null.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceColumn {
    pub buffer: ElementBuffer,
    pub nulls: Vec<usize>,
}

impl SourceColumn {
    pub fn new(buffer: ElementBuffer) -> Self {
        Self {
            buffer,
            nulls: Vec::new(),
        }
    }

    pub fn with_nulls(buffer: ElementBuffer, nulls: Vec<usize>) -> Self {
        Self { buffer, nulls }
    }
}

/// Supplies source data to the ingestion engine.
///
/// Implementations own data discovery and parsing; the engine only ever
/// reads. All methods are synchronous and called from a single thread.
pub trait SourceAccessor {
    /// Number of rows in the source data set.
    fn row_count(&self) -> usize;

    /// Column names in source order. Stable across one ingestion call.
    fn column_names(&self) -> Vec<String>;

    /// The element kind of the column at `index`.
    ///
    /// Fails with [`colfill_result::Error::UnsupportedSourceBuffer`] when
    /// the column is not backed by a recognized typed array. Fatal during
    /// type inference, since ingestion assumes uniform array-backed
    /// columns.
    fn column_kind(&self, index: usize) -> Result<ElementKind>;

    /// A fresh buffer and null-position list for the named column.
    ///
    /// `dtype` is the destination type the engine is about to fill, for
    /// accessors that shape their output per target.
    fn column_buffer(&self, name: &str, dtype: ColumnType) -> Result<SourceColumn>;

    /// Marshal a single cell for a `date`, `str`, or `bool` destination
    /// (including columns promoted to `str` mid-fill). `None` means the
    /// cell has no value.
    fn marshal_cell(
        &self,
        column: usize,
        row: usize,
        dtype: ColumnType,
    ) -> Result<Option<CellValue>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checked_views_on_numeric_buffers() {
        let buf = ElementBuffer::Int64(vec![1, -5, i64::MAX]);
        assert_eq!(buf.get_i64(1), Some(-5));
        assert_eq!(buf.get_f64(0), Some(1.0));
        assert_eq!(buf.get_i64(3), None);

        let floats = ElementBuffer::Float64(vec![1.5, f64::NAN]);
        assert_eq!(floats.get_f64(0), Some(1.5));
        assert!(floats.get_f64(1).is_some_and(f64::is_nan));
        assert_eq!(floats.get_i64(1), None);
    }

    #[test]
    fn checked_views_on_object_buffers() {
        let buf = ElementBuffer::Object(vec![
            CellValue::Int64(9),
            CellValue::Str("x".into()),
            CellValue::Null,
        ]);
        assert_eq!(buf.kind(), ElementKind::Object);
        assert_eq!(buf.get_i64(0), Some(9));
        assert_eq!(buf.get_f64(1), None);
        assert_eq!(buf.get_f64(2), None);
    }
}

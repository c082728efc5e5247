//! Typed destination columns.
//!
//! Storage is a tagged union sized to the table's row capacity at creation.
//! Every slot always holds a value of the tagged type (a placeholder until
//! first write); presence is tracked exclusively by the validity bitmap.

use colfill_result::{Error, Result};
use colfill_types::{CellValue, ColumnType};
use time::Date;

use crate::bitmap::Bitmap;

/// Placeholder stored in date slots that have never been written.
const DATE_PLACEHOLDER: Date = Date::MIN;

/// Tagged-union column storage, one variant per [`ColumnType`].
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
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
    Date(Vec<Date>),
    DateTime(Vec<i64>),
    Str(Vec<String>),
}

impl ColumnData {
    /// Zeroed (placeholder-filled) storage of `len` slots for `dtype`.
    pub fn with_len(dtype: ColumnType, len: usize) -> Self {
        match dtype {
            ColumnType::Int8 => ColumnData::Int8(vec![0; len]),
            ColumnType::Int16 => ColumnData::Int16(vec![0; len]),
            ColumnType::Int32 => ColumnData::Int32(vec![0; len]),
            ColumnType::Int64 => ColumnData::Int64(vec![0; len]),
            ColumnType::UInt8 => ColumnData::UInt8(vec![0; len]),
            ColumnType::UInt16 => ColumnData::UInt16(vec![0; len]),
            ColumnType::UInt32 => ColumnData::UInt32(vec![0; len]),
            ColumnType::UInt64 => ColumnData::UInt64(vec![0; len]),
            ColumnType::Float32 => ColumnData::Float32(vec![0.0; len]),
            ColumnType::Float64 => ColumnData::Float64(vec![0.0; len]),
            ColumnType::Bool => ColumnData::Bool(vec![false; len]),
            ColumnType::Date => ColumnData::Date(vec![DATE_PLACEHOLDER; len]),
            ColumnType::DateTime => ColumnData::DateTime(vec![0; len]),
            ColumnType::Str => ColumnData::Str(vec![String::new(); len]),
        }
    }

    pub fn dtype(&self) -> ColumnType {
        match self {
            ColumnData::Int8(_) => ColumnType::Int8,
            ColumnData::Int16(_) => ColumnType::Int16,
            ColumnData::Int32(_) => ColumnType::Int32,
            ColumnData::Int64(_) => ColumnType::Int64,
            ColumnData::UInt8(_) => ColumnType::UInt8,
            ColumnData::UInt16(_) => ColumnType::UInt16,
            ColumnData::UInt32(_) => ColumnType::UInt32,
            ColumnData::UInt64(_) => ColumnType::UInt64,
            ColumnData::Float32(_) => ColumnType::Float32,
            ColumnData::Float64(_) => ColumnType::Float64,
            ColumnData::Bool(_) => ColumnType::Bool,
            ColumnData::Date(_) => ColumnType::Date,
            ColumnData::DateTime(_) => ColumnType::DateTime,
            ColumnData::Str(_) => ColumnType::Str,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ColumnData::Int8(v) => v.len(),
            ColumnData::Int16(v) => v.len(),
            ColumnData::Int32(v) => v.len(),
            ColumnData::Int64(v) => v.len(),
            ColumnData::UInt8(v) => v.len(),
            ColumnData::UInt16(v) => v.len(),
            ColumnData::UInt32(v) => v.len(),
            ColumnData::UInt64(v) => v.len(),
            ColumnData::Float32(v) => v.len(),
            ColumnData::Float64(v) => v.len(),
            ColumnData::Bool(v) => v.len(),
            ColumnData::Date(v) => v.len(),
            ColumnData::DateTime(v) => v.len(),
            ColumnData::Str(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn reset_slot(&mut self, row: usize) {
        match self {
            ColumnData::Int8(v) => v[row] = 0,
            ColumnData::Int16(v) => v[row] = 0,
            ColumnData::Int32(v) => v[row] = 0,
            ColumnData::Int64(v) => v[row] = 0,
            ColumnData::UInt8(v) => v[row] = 0,
            ColumnData::UInt16(v) => v[row] = 0,
            ColumnData::UInt32(v) => v[row] = 0,
            ColumnData::UInt64(v) => v[row] = 0,
            ColumnData::Float32(v) => v[row] = 0.0,
            ColumnData::Float64(v) => v[row] = 0.0,
            ColumnData::Bool(v) => v[row] = false,
            ColumnData::Date(v) => v[row] = DATE_PLACEHOLDER,
            ColumnData::DateTime(v) => v[row] = 0,
            ColumnData::Str(v) => v[row].clear(),
        }
    }
}

/// A named, typed destination column with validity tracking.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    certain: bool,
    data: ColumnData,
    validity: Bitmap,
}

impl Column {
    pub(crate) fn new(name: impl Into<String>, dtype: ColumnType, certain: bool, len: usize) -> Self {
        Self {
            name: name.into(),
            certain,
            data: ColumnData::with_len(dtype, len),
            validity: Bitmap::new_all_absent(len),
        }
    }

    pub(crate) fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            certain: self.certain,
            data: self.data.clone(),
            validity: self.validity.clone(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dtype(&self) -> ColumnType {
        self.data.dtype()
    }

    /// Whether the declared type was known-exact at creation rather than
    /// inferred from source buffers.
    pub fn is_type_certain(&self) -> bool {
        self.certain
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn data(&self) -> &ColumnData {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut ColumnData {
        &mut self.data
    }

    pub fn is_valid(&self, row: usize) -> bool {
        row < self.validity.len() && self.validity.get(row)
    }

    pub fn null_count(&self) -> usize {
        self.size() - self.validity.count_ones()
    }

    /// Write `value` at `row` and mark the row present.
    pub fn set_nth(&mut self, row: usize, value: CellValue) -> Result<()> {
        if row >= self.size() {
            return Err(Error::Internal(format!(
                "row {row} out of bounds for column '{}' of length {}",
                self.name,
                self.size()
            )));
        }

        match (&mut self.data, value) {
            (ColumnData::Int8(v), CellValue::Int8(x)) => v[row] = x,
            (ColumnData::Int16(v), CellValue::Int16(x)) => v[row] = x,
            (ColumnData::Int32(v), CellValue::Int32(x)) => v[row] = x,
            (ColumnData::Int64(v), CellValue::Int64(x)) => v[row] = x,
            (ColumnData::UInt8(v), CellValue::UInt8(x)) => v[row] = x,
            (ColumnData::UInt16(v), CellValue::UInt16(x)) => v[row] = x,
            (ColumnData::UInt32(v), CellValue::UInt32(x)) => v[row] = x,
            (ColumnData::UInt64(v), CellValue::UInt64(x)) => v[row] = x,
            (ColumnData::Float32(v), CellValue::Float32(x)) => v[row] = x,
            (ColumnData::Float64(v), CellValue::Float64(x)) => v[row] = x,
            (ColumnData::Bool(v), CellValue::Bool(x)) => v[row] = x,
            (ColumnData::Date(v), CellValue::Date(x)) => v[row] = x,
            (ColumnData::DateTime(v), CellValue::DateTime(x)) => v[row] = x,
            (ColumnData::Str(v), CellValue::Str(x)) => v[row] = x,
            (data, value) => {
                return Err(Error::TypeMismatch {
                    expected: data.dtype().label(),
                    got: value.label(),
                });
            }
        }

        self.validity.set(row, true);
        Ok(())
    }

    /// Update semantics: the row transitions from present to absent; the
    /// stored value is left in place.
    pub fn unset(&mut self, row: usize) {
        if row < self.validity.len() {
            self.validity.set(row, false);
        }
    }

    /// Load semantics: the row is absent ab initio; the slot is reset to
    /// the placeholder as well.
    pub fn clear(&mut self, row: usize) {
        if row < self.validity.len() {
            self.validity.set(row, false);
            self.data.reset_slot(row);
        }
    }

    /// Mark every row present. Used after a successful bulk copy, before
    /// the source's null positions are applied.
    pub fn fill_validity_all_present(&mut self) {
        self.validity.set_all();
    }

    /// The value at `row`, or `None` if the row is absent.
    pub fn value_at(&self, row: usize) -> Option<CellValue> {
        if !self.is_valid(row) {
            return None;
        }
        Some(match &self.data {
            ColumnData::Int8(v) => CellValue::Int8(v[row]),
            ColumnData::Int16(v) => CellValue::Int16(v[row]),
            ColumnData::Int32(v) => CellValue::Int32(v[row]),
            ColumnData::Int64(v) => CellValue::Int64(v[row]),
            ColumnData::UInt8(v) => CellValue::UInt8(v[row]),
            ColumnData::UInt16(v) => CellValue::UInt16(v[row]),
            ColumnData::UInt32(v) => CellValue::UInt32(v[row]),
            ColumnData::UInt64(v) => CellValue::UInt64(v[row]),
            ColumnData::Float32(v) => CellValue::Float32(v[row]),
            ColumnData::Float64(v) => CellValue::Float64(v[row]),
            ColumnData::Bool(v) => CellValue::Bool(v[row]),
            ColumnData::Date(v) => CellValue::Date(v[row]),
            ColumnData::DateTime(v) => CellValue::DateTime(v[row]),
            ColumnData::Str(v) => CellValue::Str(v[row].clone()),
        })
    }

    /// Build the promoted successor of this column.
    ///
    /// Constructs fresh storage for `new_dtype`. With `copy_existing`, rows
    /// before `from_row` are converted into the new representation and keep
    /// their validity; without it the new column starts fully absent and the
    /// caller is expected to rewrite it.
    pub(crate) fn promoted(
        &self,
        new_dtype: ColumnType,
        from_row: usize,
        copy_existing: bool,
    ) -> Result<Column> {
        let len = self.size();
        let mut next = Column {
            name: self.name.clone(),
            certain: self.certain,
            data: ColumnData::with_len(new_dtype, len),
            validity: Bitmap::new_all_absent(len),
        };

        if copy_existing {
            for row in 0..from_row.min(len) {
                if let Some(value) = self.value_at(row) {
                    next.set_nth(row, cast_for_promotion(value, new_dtype)?)?;
                }
            }
        }

        Ok(next)
    }
}

/// Convert an already-stored value into a promoted column's representation.
///
/// Only widening conversions exist: any numeric into `Float64`, and any
/// numeric into `Str`. Everything else is a promotion the engine never
/// requests.
fn cast_for_promotion(value: CellValue, target: ColumnType) -> Result<CellValue> {
    let mismatch = |value: &CellValue| Error::TypeMismatch {
        expected: target.label(),
        got: value.label(),
    };

    match target {
        ColumnType::Float64 => {
            let x = match value {
                CellValue::Int8(x) => x as f64,
                CellValue::Int16(x) => x as f64,
                CellValue::Int32(x) => x as f64,
                CellValue::Int64(x) => x as f64,
                CellValue::UInt8(x) => x as f64,
                CellValue::UInt16(x) => x as f64,
                CellValue::UInt32(x) => x as f64,
                CellValue::UInt64(x) => x as f64,
                CellValue::Float32(x) => x as f64,
                CellValue::Float64(x) => x,
                other => return Err(mismatch(&other)),
            };
            Ok(CellValue::Float64(x))
        }
        ColumnType::Str => {
            let s = match value {
                CellValue::Int8(x) => x.to_string(),
                CellValue::Int16(x) => x.to_string(),
                CellValue::Int32(x) => x.to_string(),
                CellValue::Int64(x) => x.to_string(),
                CellValue::UInt8(x) => x.to_string(),
                CellValue::UInt16(x) => x.to_string(),
                CellValue::UInt32(x) => x.to_string(),
                CellValue::UInt64(x) => x.to_string(),
                CellValue::Float32(x) => x.to_string(),
                CellValue::Float64(x) => x.to_string(),
                CellValue::Str(s) => s,
                other => return Err(mismatch(&other)),
            };
            Ok(CellValue::Str(s))
        }
        other => Err(Error::Internal(format!(
            "promotion to {other} is not supported"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_unset_clear_semantics() {
        let mut col = Column::new("a", ColumnType::Int32, true, 3);
        col.set_nth(0, CellValue::Int32(7)).unwrap();
        col.set_nth(1, CellValue::Int32(8)).unwrap();
        assert_eq!(col.value_at(0), Some(CellValue::Int32(7)));
        assert_eq!(col.null_count(), 1);

        // unset keeps the stored value, clear resets it.
        col.unset(0);
        col.clear(1);
        assert_eq!(col.value_at(0), None);
        assert_eq!(col.value_at(1), None);
        match col.data() {
            ColumnData::Int32(v) => {
                assert_eq!(v[0], 7);
                assert_eq!(v[1], 0);
            }
            other => panic!("unexpected storage {other:?}"),
        }
    }

    #[test]
    fn set_nth_rejects_wrong_type() {
        let mut col = Column::new("a", ColumnType::Int32, true, 1);
        let err = col.set_nth(0, CellValue::Str("x".into())).unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { .. }));
        assert!(!col.is_valid(0));
    }

    #[test]
    fn promoted_to_float_keeps_prefix() {
        let mut col = Column::new("a", ColumnType::Int32, false, 4);
        col.set_nth(0, CellValue::Int32(1)).unwrap();
        col.set_nth(2, CellValue::Int32(-3)).unwrap();

        let next = col.promoted(ColumnType::Float64, 3, true).unwrap();
        assert_eq!(next.dtype(), ColumnType::Float64);
        assert_eq!(next.value_at(0), Some(CellValue::Float64(1.0)));
        assert_eq!(next.value_at(1), None);
        assert_eq!(next.value_at(2), Some(CellValue::Float64(-3.0)));
        assert_eq!(next.value_at(3), None);
    }

    #[test]
    fn promoted_without_copy_starts_absent() {
        let mut col = Column::new("a", ColumnType::Int64, false, 2);
        col.set_nth(0, CellValue::Int64(5)).unwrap();

        let next = col.promoted(ColumnType::Str, 1, false).unwrap();
        assert_eq!(next.dtype(), ColumnType::Str);
        assert_eq!(next.null_count(), 2);
    }
}

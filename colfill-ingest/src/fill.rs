//! Per-column fill paths: bulk copy and the element-by-element fallback.
//!
//! The bulk path is a straight slice copy between identical element
//! encodings. The fallback converts row by row, dispatched on the
//! destination type, and is the only place type promotion can happen.

use colfill_result::{Error, Result};
use colfill_store::{Column, ColumnData, Table};
use colfill_types::{CellValue, ColumnType};

use crate::accessor::{ElementBuffer, SourceAccessor, SourceColumn};

/// Source timestamps arrive in a unit 1000x coarser than the stored
/// millisecond encoding.
const COARSE_TO_MILLIS: i64 = 1000;

/// Outcome of a bulk copy attempt. `Fallback` is not an error: the caller
/// recovers by filling element by element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BulkCopy {
    Copied,
    Fallback,
}

/// Outcome of one numeric scan segment.
enum NumericScan {
    Done,
    /// An int32 destination observed a value outside the 32-bit range at
    /// this row.
    WidenToFloat(usize),
    /// An int64/float64 destination observed a NaN/invalid sentinel at
    /// this row.
    WidenToStr(usize),
}

/// Copy `dest.size()` elements from `src` starting at `write_offset`.
///
/// Only identical element encodings copy. Every other combination (bool,
/// object, any width or signedness mismatch, a short source) reports
/// `Fallback`. Validity is untouched: mask reconciliation is the caller's
/// job.
pub(crate) fn copy_array(
    src: &ElementBuffer,
    dest: &mut Column,
    write_offset: usize,
) -> BulkCopy {
    match (src, dest.data_mut()) {
        (ElementBuffer::Int8(s), ColumnData::Int8(d)) => copy_slice(s, d, write_offset),
        (ElementBuffer::Int16(s), ColumnData::Int16(d)) => copy_slice(s, d, write_offset),
        (ElementBuffer::Int32(s), ColumnData::Int32(d)) => copy_slice(s, d, write_offset),
        (ElementBuffer::Int64(s), ColumnData::Int64(d)) => copy_slice(s, d, write_offset),
        (ElementBuffer::UInt8(s), ColumnData::UInt8(d)) => copy_slice(s, d, write_offset),
        (ElementBuffer::UInt16(s), ColumnData::UInt16(d)) => copy_slice(s, d, write_offset),
        (ElementBuffer::UInt32(s), ColumnData::UInt32(d)) => copy_slice(s, d, write_offset),
        (ElementBuffer::UInt64(s), ColumnData::UInt64(d)) => copy_slice(s, d, write_offset),
        (ElementBuffer::Float32(s), ColumnData::Float32(d)) => copy_slice(s, d, write_offset),
        (ElementBuffer::Float64(s), ColumnData::Float64(d)) => copy_slice(s, d, write_offset),
        _ => BulkCopy::Fallback,
    }
}

fn copy_slice<T: Copy>(src: &[T], dest: &mut [T], offset: usize) -> BulkCopy {
    let Some(window) = dest.get_mut(offset..) else {
        return BulkCopy::Fallback;
    };
    let Some(values) = src.get(..window.len()) else {
        return BulkCopy::Fallback;
    };
    window.copy_from_slice(values);
    BulkCopy::Copied
}

#[inline]
fn mark_absent(col: &mut Column, row: usize, is_update: bool) {
    if is_update {
        col.unset(row);
    } else {
        col.clear(row);
    }
}

/// Fill one column element by element, dispatched on the destination type.
pub(crate) fn fill_column_iter<A: SourceAccessor>(
    accessor: &A,
    table: &mut Table,
    dest_name: &str,
    source: &SourceColumn,
    dtype: ColumnType,
    src_idx: usize,
    is_update: bool,
) -> Result<()> {
    match dtype {
        ColumnType::DateTime => fill_datetime(table, dest_name, source, is_update),
        ColumnType::Date => fill_date(accessor, table, dest_name, src_idx, is_update),
        ColumnType::Bool => fill_bool(accessor, table, dest_name, src_idx, is_update),
        ColumnType::Str => fill_string(accessor, table, dest_name, src_idx, is_update),
        _ => fill_numeric(accessor, table, dest_name, source, dtype, src_idx, is_update),
    }
}

/// Numeric fill with on-the-fly promotion.
///
/// Scans resume where they stopped after a promotion rebinds the column.
/// Each transition is terminal for the call: a column already promoted
/// here marks later sentinels absent instead of promoting again.
fn fill_numeric<A: SourceAccessor>(
    accessor: &A,
    table: &mut Table,
    dest_name: &str,
    source: &SourceColumn,
    dtype: ColumnType,
    src_idx: usize,
    is_update: bool,
) -> Result<()> {
    let mut dtype = dtype;
    let mut start = 0usize;
    let mut promoted = false;

    loop {
        let outcome = {
            let col = table.column_mut(dest_name)?;
            scan_numeric(col, &source.buffer, dtype, start, promoted, is_update)?
        };
        match outcome {
            NumericScan::Done => return Ok(()),
            NumericScan::WidenToFloat(row) => {
                tracing::warn!(
                    "promoting column '{dest_name}' from int32 to float64 at row {row}"
                );
                table.promote_column(dest_name, ColumnType::Float64, row, true)?;
                dtype = ColumnType::Float64;
                start = row;
                promoted = true;
            }
            NumericScan::WidenToStr(row) => {
                tracing::warn!("promoting column '{dest_name}' from {dtype} to str at row {row}");
                table.promote_column(dest_name, ColumnType::Str, row, false)?;
                // The whole column is re-marshaled as text: a tagged-union
                // column cannot keep earlier rows in a numeric encoding.
                return fill_string(accessor, table, dest_name, src_idx, is_update);
            }
        }
    }
}

fn scan_numeric(
    col: &mut Column,
    buf: &ElementBuffer,
    dtype: ColumnType,
    start: usize,
    promoted: bool,
    is_update: bool,
) -> Result<NumericScan> {
    for row in start..col.size() {
        match dtype {
            ColumnType::Int8 => match buf.get_i64(row) {
                Some(x) => col.set_nth(row, CellValue::Int8(x as i8))?,
                None => mark_absent(col, row, is_update),
            },
            ColumnType::Int16 => match buf.get_i64(row) {
                Some(x) => col.set_nth(row, CellValue::Int16(x as i16))?,
                None => mark_absent(col, row, is_update),
            },
            ColumnType::UInt8 => match buf.get_i64(row) {
                Some(x) => col.set_nth(row, CellValue::UInt8(x as u8))?,
                None => mark_absent(col, row, is_update),
            },
            ColumnType::UInt16 => match buf.get_i64(row) {
                Some(x) => col.set_nth(row, CellValue::UInt16(x as u16))?,
                None => mark_absent(col, row, is_update),
            },
            ColumnType::UInt32 => match buf.get_i64(row) {
                Some(x) => col.set_nth(row, CellValue::UInt32(x as u32))?,
                None => mark_absent(col, row, is_update),
            },
            ColumnType::UInt64 => match buf.get_i64(row) {
                Some(x) => col.set_nth(row, CellValue::UInt64(x as u64))?,
                None => mark_absent(col, row, is_update),
            },
            ColumnType::Float32 => match buf.get_f64(row) {
                Some(x) if !x.is_nan() => col.set_nth(row, CellValue::Float32(x as f32))?,
                _ => mark_absent(col, row, is_update),
            },
            ColumnType::Int32 => {
                let Some(item) = buf.get_f64(row) else {
                    mark_absent(col, row, is_update);
                    continue;
                };
                if item.is_nan() {
                    mark_absent(col, row, is_update);
                    continue;
                }
                if item > i32::MAX as f64 || item < i32::MIN as f64 {
                    return Ok(NumericScan::WidenToFloat(row));
                }
                // Prefer the integer view when the source has one; the
                // float view loses precision past 2^53.
                match buf.get_i64(row) {
                    Some(x) => col.set_nth(row, CellValue::Int32(x as i32))?,
                    None => col.set_nth(row, CellValue::Int32(item as i32))?,
                }
            }
            ColumnType::Int64 => match buf.get_i64(row) {
                Some(x) => col.set_nth(row, CellValue::Int64(x))?,
                None if promoted => mark_absent(col, row, is_update),
                None => return Ok(NumericScan::WidenToStr(row)),
            },
            ColumnType::Float64 => match buf.get_f64(row) {
                Some(x) if !x.is_nan() => col.set_nth(row, CellValue::Float64(x))?,
                _ if promoted => mark_absent(col, row, is_update),
                _ => return Ok(NumericScan::WidenToStr(row)),
            },
            ColumnType::Bool | ColumnType::Date | ColumnType::DateTime | ColumnType::Str => {
                return Err(Error::Internal(format!(
                    "numeric fill dispatched for {dtype} column '{}'",
                    col.name()
                )));
            }
        }
    }
    Ok(NumericScan::Done)
}

/// Raw 64-bit timestamps in a coarser unit, scaled to milliseconds.
fn fill_datetime(
    table: &mut Table,
    dest_name: &str,
    source: &SourceColumn,
    is_update: bool,
) -> Result<()> {
    let col = table.column_mut(dest_name)?;
    for row in 0..col.size() {
        match source.buffer.get_i64(row) {
            // i64::MIN is the not-a-time sentinel.
            Some(raw) if raw != i64::MIN => match raw.checked_mul(COARSE_TO_MILLIS) {
                Some(millis) => col.set_nth(row, CellValue::DateTime(millis))?,
                None => mark_absent(col, row, is_update),
            },
            _ => mark_absent(col, row, is_update),
        }
    }
    Ok(())
}

fn fill_date<A: SourceAccessor>(
    accessor: &A,
    table: &mut Table,
    dest_name: &str,
    src_idx: usize,
    is_update: bool,
) -> Result<()> {
    let col = table.column_mut(dest_name)?;
    for row in 0..col.size() {
        match accessor.marshal_cell(src_idx, row, ColumnType::Date)? {
            None => mark_absent(col, row, is_update),
            Some(value @ CellValue::Date(_)) => col.set_nth(row, value)?,
            Some(other) => {
                return Err(Error::TypeMismatch {
                    expected: "date",
                    got: other.label(),
                });
            }
        }
    }
    Ok(())
}

pub(crate) fn fill_string<A: SourceAccessor>(
    accessor: &A,
    table: &mut Table,
    dest_name: &str,
    src_idx: usize,
    is_update: bool,
) -> Result<()> {
    let col = table.column_mut(dest_name)?;
    for row in 0..col.size() {
        match accessor.marshal_cell(src_idx, row, ColumnType::Str)? {
            None => mark_absent(col, row, is_update),
            // Marshaled text is already canonical UTF-8.
            Some(value @ CellValue::Str(_)) => col.set_nth(row, value)?,
            Some(other) => {
                return Err(Error::TypeMismatch {
                    expected: "str",
                    got: other.label(),
                });
            }
        }
    }
    Ok(())
}

fn fill_bool<A: SourceAccessor>(
    accessor: &A,
    table: &mut Table,
    dest_name: &str,
    src_idx: usize,
    is_update: bool,
) -> Result<()> {
    let col = table.column_mut(dest_name)?;
    for row in 0..col.size() {
        match accessor.marshal_cell(src_idx, row, ColumnType::Bool)? {
            None => mark_absent(col, row, is_update),
            Some(value @ CellValue::Bool(_)) => col.set_nth(row, value)?,
            Some(other) => {
                return Err(Error::TypeMismatch {
                    expected: "bool",
                    got: other.label(),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use colfill_types::Schema;

    fn table_with(name: &str, dtype: ColumnType, rows: usize) -> Table {
        Table::from_schema(&Schema::new().with_column(name, dtype), rows)
    }

    #[test]
    fn copy_array_matches_identical_encodings_only() {
        let mut table = table_with("a", ColumnType::Int32, 3);
        let col = table.column_mut("a").unwrap();

        let matching = ElementBuffer::Int32(vec![1, 2, 3]);
        assert_eq!(copy_array(&matching, col, 0), BulkCopy::Copied);
        assert_eq!(col.data(), &ColumnData::Int32(vec![1, 2, 3]));

        // Same width, different interpretation: never bulk-copied.
        let wrong_class = ElementBuffer::Float32(vec![1.0, 2.0, 3.0]);
        assert_eq!(copy_array(&wrong_class, col, 0), BulkCopy::Fallback);

        let wider = ElementBuffer::Int64(vec![1, 2, 3]);
        assert_eq!(copy_array(&wider, col, 0), BulkCopy::Fallback);
    }

    #[test]
    fn copy_array_rejects_short_source() {
        let mut table = table_with("a", ColumnType::Int64, 4);
        let col = table.column_mut("a").unwrap();
        let short = ElementBuffer::Int64(vec![1, 2]);
        assert_eq!(copy_array(&short, col, 0), BulkCopy::Fallback);
    }

    #[test]
    fn copy_array_rejects_non_numeric() {
        let mut table = table_with("a", ColumnType::Bool, 2);
        let col = table.column_mut("a").unwrap();
        let bools = ElementBuffer::Bool(vec![true, false]);
        assert_eq!(copy_array(&bools, col, 0), BulkCopy::Fallback);
    }

    #[test]
    fn datetime_scales_and_handles_sentinel() {
        let mut table = table_with("t", ColumnType::DateTime, 3);
        let source =
            SourceColumn::new(ElementBuffer::Int64(vec![1_700_000_000, i64::MIN, 42]));
        fill_datetime(&mut table, "t", &source, false).unwrap();

        let col = table.column("t").unwrap();
        assert_eq!(
            col.value_at(0),
            Some(CellValue::DateTime(1_700_000_000_000))
        );
        assert_eq!(col.value_at(1), None);
        assert_eq!(col.value_at(2), Some(CellValue::DateTime(42_000)));
    }
}

//! An in-memory [`SourceAccessor`] over owned element buffers.
//!
//! Covers in-process ingestion and the test suite. Null positions are
//! supplied explicitly per column; object buffers may additionally hold
//! `CellValue::Null` cells, which marshal as absent.

use colfill_result::{Error, Result};
use colfill_types::{CellValue, ColumnType, ElementKind};

use crate::accessor::{ElementBuffer, SourceAccessor, SourceColumn};

#[derive(Debug, Default, Clone)]
pub struct MemAccessor {
    names: Vec<String>,
    buffers: Vec<ElementBuffer>,
    nulls: Vec<Vec<usize>>,
}

impl MemAccessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column with no null positions.
    pub fn with_column(self, name: impl Into<String>, buffer: ElementBuffer) -> Self {
        self.with_column_nulls(name, buffer, Vec::new())
    }

    /// Append a column with an explicit sparse null-position list.
    pub fn with_column_nulls(
        mut self,
        name: impl Into<String>,
        buffer: ElementBuffer,
        nulls: Vec<usize>,
    ) -> Self {
        self.names.push(name.into());
        self.buffers.push(buffer);
        self.nulls.push(nulls);
        self
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n.as_str() == name)
    }

    /// Text form of a cell for string marshaling; `None` when the cell has
    /// no value (object hole, NaN float).
    fn text_of(&self, column: usize, row: usize) -> Option<String> {
        match &self.buffers[column] {
            ElementBuffer::Int8(v) => v.get(row).map(|x| x.to_string()),
            ElementBuffer::Int16(v) => v.get(row).map(|x| x.to_string()),
            ElementBuffer::Int32(v) => v.get(row).map(|x| x.to_string()),
            ElementBuffer::Int64(v) => v.get(row).map(|x| x.to_string()),
            ElementBuffer::UInt8(v) => v.get(row).map(|x| x.to_string()),
            ElementBuffer::UInt16(v) => v.get(row).map(|x| x.to_string()),
            ElementBuffer::UInt32(v) => v.get(row).map(|x| x.to_string()),
            ElementBuffer::UInt64(v) => v.get(row).map(|x| x.to_string()),
            ElementBuffer::Float32(v) => v
                .get(row)
                .and_then(|x| (!x.is_nan()).then(|| x.to_string())),
            ElementBuffer::Float64(v) => v
                .get(row)
                .and_then(|x| (!x.is_nan()).then(|| x.to_string())),
            ElementBuffer::Bool(v) => v.get(row).map(|x| x.to_string()),
            ElementBuffer::Object(v) => match v.get(row)? {
                CellValue::Null => None,
                CellValue::Int8(x) => Some(x.to_string()),
                CellValue::Int16(x) => Some(x.to_string()),
                CellValue::Int32(x) => Some(x.to_string()),
                CellValue::Int64(x) => Some(x.to_string()),
                CellValue::UInt8(x) => Some(x.to_string()),
                CellValue::UInt16(x) => Some(x.to_string()),
                CellValue::UInt32(x) => Some(x.to_string()),
                CellValue::UInt64(x) => Some(x.to_string()),
                CellValue::Float32(x) => (!x.is_nan()).then(|| x.to_string()),
                CellValue::Float64(x) => (!x.is_nan()).then(|| x.to_string()),
                CellValue::Bool(x) => Some(x.to_string()),
                CellValue::Date(d) => Some(format!(
                    "{:04}-{:02}-{:02}",
                    d.year(),
                    u8::from(d.month()),
                    d.day()
                )),
                CellValue::DateTime(ms) => Some(ms.to_string()),
                CellValue::Str(s) => Some(s.clone()),
            },
        }
    }
}

impl SourceAccessor for MemAccessor {
    fn row_count(&self) -> usize {
        self.buffers.first().map_or(0, ElementBuffer::len)
    }

    fn column_names(&self) -> Vec<String> {
        self.names.clone()
    }

    fn column_kind(&self, index: usize) -> Result<ElementKind> {
        self.buffers
            .get(index)
            .map(ElementBuffer::kind)
            .ok_or_else(|| {
                Error::Internal(format!("source column index {index} out of range"))
            })
    }

    fn column_buffer(&self, name: &str, _dtype: ColumnType) -> Result<SourceColumn> {
        let idx = self
            .position(name)
            .ok_or_else(|| Error::UnknownColumn(name.to_string()))?;
        Ok(SourceColumn::with_nulls(
            self.buffers[idx].clone(),
            self.nulls[idx].clone(),
        ))
    }

    fn marshal_cell(
        &self,
        column: usize,
        row: usize,
        dtype: ColumnType,
    ) -> Result<Option<CellValue>> {
        let buffer = self.buffers.get(column).ok_or_else(|| {
            Error::Internal(format!("marshal for source column {column} out of range"))
        })?;

        if self.nulls[column].contains(&row) {
            return Ok(None);
        }

        let value = match dtype {
            ColumnType::Str => self.text_of(column, row).map(CellValue::Str),
            ColumnType::Bool => match buffer {
                ElementBuffer::Bool(v) => v.get(row).map(|&b| CellValue::Bool(b)),
                ElementBuffer::Object(v) => match v.get(row) {
                    Some(CellValue::Bool(b)) => Some(CellValue::Bool(*b)),
                    _ => None,
                },
                _ => None,
            },
            ColumnType::Date => match buffer {
                ElementBuffer::Object(v) => match v.get(row) {
                    Some(CellValue::Date(d)) => Some(CellValue::Date(*d)),
                    _ => None,
                },
                _ => None,
            },
            // Marshal is only defined for date/str/bool destinations.
            _ => None,
        };

        Ok(value)
    }
}

//! A fixed-capacity table of named columns.

use colfill_result::{Error, Result};
use colfill_types::{ColumnType, Schema};
use rustc_hash::FxHashMap;

use crate::column::Column;

/// Owns the destination columns for one ingestion target.
///
/// Row capacity is fixed at construction; every column is sized to it. The
/// table is exclusively owned by the caller for the duration of a fill;
/// there is no interior locking.
#[derive(Debug, Default)]
pub struct Table {
    rows: usize,
    columns: Vec<Column>,
    by_name: FxHashMap<String, usize>,
}

impl Table {
    pub fn new(rows: usize) -> Self {
        Self {
            rows,
            columns: Vec::new(),
            by_name: FxHashMap::default(),
        }
    }

    /// A table with one column per schema entry, all slots absent.
    pub fn from_schema(schema: &Schema, rows: usize) -> Self {
        let mut table = Table::new(rows);
        for (name, dtype) in schema.iter() {
            table.add_column(name, dtype, false);
        }
        table
    }

    /// Row capacity of the table.
    pub fn size(&self) -> usize {
        self.rows
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Column names in insertion order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name()).collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Add a column sized to the table's row capacity, replacing any
    /// existing column of the same name. Index columns are recreated this
    /// way on every fill.
    pub fn add_column(&mut self, name: &str, dtype: ColumnType, certain: bool) -> &mut Column {
        let column = Column::new(name, dtype, certain, self.rows);
        let slot = match self.by_name.get(name).copied() {
            Some(slot) => {
                self.columns[slot] = column;
                slot
            }
            None => {
                self.columns.push(column);
                self.by_name.insert(name.to_string(), self.columns.len() - 1);
                self.columns.len() - 1
            }
        };
        &mut self.columns[slot]
    }

    pub fn column(&self, name: &str) -> Result<&Column> {
        self.by_name
            .get(name)
            .map(|&slot| &self.columns[slot])
            .ok_or_else(|| Error::ColumnNotFound(name.to_string()))
    }

    pub fn column_mut(&mut self, name: &str) -> Result<&mut Column> {
        match self.by_name.get(name).copied() {
            Some(slot) => Ok(&mut self.columns[slot]),
            None => Err(Error::ColumnNotFound(name.to_string())),
        }
    }

    /// Copy `src` (values, validity, and type) into a column named `dst`,
    /// replacing any existing column of that name.
    pub fn clone_column(&mut self, src: &str, dst: &str) -> Result<()> {
        let copy = self.column(src)?.renamed(dst);
        match self.by_name.get(dst).copied() {
            Some(slot) => self.columns[slot] = copy,
            None => {
                self.columns.push(copy);
                self.by_name.insert(dst.to_string(), self.columns.len() - 1);
            }
        }
        Ok(())
    }

    /// Rewrite a column's type in place.
    ///
    /// Constructs a new storage variant for `new_dtype`; rows before
    /// `from_row` are carried over per `copy_existing`. Handles obtained
    /// before the call are invalid; callers re-fetch the column.
    pub fn promote_column(
        &mut self,
        name: &str,
        new_dtype: ColumnType,
        from_row: usize,
        copy_existing: bool,
    ) -> Result<()> {
        let slot = *self
            .by_name
            .get(name)
            .ok_or_else(|| Error::ColumnNotFound(name.to_string()))?;
        self.columns[slot] = self.columns[slot].promoted(new_dtype, from_row, copy_existing)?;
        Ok(())
    }
}

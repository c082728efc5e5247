//! The ingestion engine: schema resolution, fill dispatch, and index
//! synthesis.

use colfill_result::{Error, Result};
use colfill_store::Table;
use colfill_types::{CellValue, ColumnType, ElementKind, Schema};

use crate::accessor::SourceAccessor;
use crate::fill::{self, BulkCopy};
use crate::infer::infer_dtype;
use crate::reserved::{INDEX_SENTINEL_NAME, OKEY_COLUMN_NAME, PKEY_COLUMN_NAME};

/// Drives one source accessor's data into destination tables.
///
/// `init` must run first: it caches the source's column names and infers a
/// destination type per column, and every other operation fails with
/// [`Error::NotInitialized`] until it has.
pub struct Loader<A> {
    accessor: A,
    init: bool,
    names: Vec<String>,
    kinds: Vec<ElementKind>,
    dtypes: Vec<ColumnType>,
}

impl<A: SourceAccessor> Loader<A> {
    pub fn new(accessor: A) -> Self {
        Self {
            accessor,
            init: false,
            names: Vec::new(),
            kinds: Vec::new(),
            dtypes: Vec::new(),
        }
    }

    /// Cache column names and inferred destination types.
    ///
    /// Fails if any source column is not a recognized typed buffer:
    /// ingestion assumes uniform array-backed columns across the table.
    pub fn init(&mut self) -> Result<()> {
        self.names = self.accessor.column_names();
        self.kinds = (0..self.names.len())
            .map(|idx| self.accessor.column_kind(idx))
            .collect::<Result<Vec<_>>>()?;
        self.dtypes = self.kinds.iter().map(|&kind| infer_dtype(kind)).collect();
        self.init = true;
        Ok(())
    }

    fn ensure_init(&self) -> Result<()> {
        if self.init {
            Ok(())
        } else {
            Err(Error::NotInitialized)
        }
    }

    /// Source column names, in source order.
    pub fn names(&self) -> Result<&[String]> {
        self.ensure_init()?;
        Ok(&self.names)
    }

    /// Inferred destination type per source column.
    pub fn types(&self) -> Result<&[ColumnType]> {
        self.ensure_init()?;
        Ok(&self.dtypes)
    }

    /// The accessor's declared row count.
    pub fn row_count(&self) -> Result<usize> {
        self.ensure_init()?;
        Ok(self.accessor.row_count())
    }

    /// A schema pairing each source column with its inferred type.
    pub fn inferred_schema(&self) -> Result<Schema> {
        self.ensure_init()?;
        Ok(Schema::from_columns(
            self.names.iter().cloned().zip(self.dtypes.iter().copied()),
        ))
    }

    /// Fill every schema column into `table`, then synthesize the index
    /// columns.
    ///
    /// A schema column named [`INDEX_SENTINEL_NAME`] supplies explicit
    /// index values: it is filled into the primary-key column and mirrored
    /// into the order-key column. Otherwise an explicit `index` column is
    /// cloned into both; with no index at all, both are generated as
    /// `(row + offset) % limit`.
    pub fn fill_table(
        &self,
        table: &mut Table,
        schema: &Schema,
        index: Option<&str>,
        offset: u32,
        limit: u32,
        is_update: bool,
    ) -> Result<()> {
        self.ensure_init()?;
        let mut implicit_index = false;

        for (name, dtype) in schema.iter() {
            if name == INDEX_SENTINEL_NAME {
                implicit_index = true;
                table.add_column(PKEY_COLUMN_NAME, dtype, true);
                self.fill_column(table, PKEY_COLUMN_NAME, INDEX_SENTINEL_NAME, dtype, is_update)?;
                table.clone_column(PKEY_COLUMN_NAME, OKEY_COLUMN_NAME)?;
                continue;
            }
            self.fill_column(table, name, name, dtype, is_update)?;
        }

        // Index columns are recreated on every fill.
        if !implicit_index {
            match index {
                Some(index_name) => {
                    table.clone_column(index_name, PKEY_COLUMN_NAME)?;
                    table.clone_column(index_name, OKEY_COLUMN_NAME)?;
                }
                None => {
                    if limit == 0 {
                        return Err(Error::InvalidLimit(limit));
                    }
                    table.add_column(PKEY_COLUMN_NAME, ColumnType::Int32, true);
                    table.add_column(OKEY_COLUMN_NAME, ColumnType::Int32, true);
                    for row in 0..table.size() {
                        let value = ((row as u32).wrapping_add(offset) % limit) as i32;
                        table
                            .column_mut(PKEY_COLUMN_NAME)?
                            .set_nth(row, CellValue::Int32(value))?;
                        table
                            .column_mut(OKEY_COLUMN_NAME)?
                            .set_nth(row, CellValue::Int32(value))?;
                    }
                }
            }
        }

        Ok(())
    }

    /// Fill the destination column `dest_name` from the source column
    /// `source_name`, declared as `dtype`.
    pub fn fill_column(
        &self,
        table: &mut Table,
        dest_name: &str,
        source_name: &str,
        dtype: ColumnType,
        is_update: bool,
    ) -> Result<()> {
        self.ensure_init()?;

        // Resolve by name, not position: the index column shifts positions
        // between the schema and the source.
        let src_idx = self
            .names
            .iter()
            .position(|n| n.as_str() == source_name)
            .ok_or_else(|| Error::UnknownColumn(source_name.to_string()))?;

        let source = self.accessor.column_buffer(source_name, dtype)?;
        let src_kind = self.kinds[src_idx];

        // A 64-bit integer source must never be bulk-copied into 32-bit
        // integer or 64-bit float storage: the raw elements would be
        // truncated or misread. Happens when a table built from scalar
        // data is later updated with array data.
        if src_kind == ElementKind::Int64
            && matches!(dtype, ColumnType::Int32 | ColumnType::Float64)
        {
            tracing::debug!(
                "column '{dest_name}': {src_kind} source feeding {dtype} destination, \
                 filling iteratively"
            );
            return fill::fill_column_iter(
                &self.accessor,
                table,
                dest_name,
                &source,
                dtype,
                src_idx,
                is_update,
            );
        }

        let copied = {
            let col = table.column_mut(dest_name)?;
            fill::copy_array(&source.buffer, col, 0)
        };

        match copied {
            BulkCopy::Copied => {
                let col = table.column_mut(dest_name)?;
                col.fill_validity_all_present();
                for &row in &source.nulls {
                    if is_update {
                        col.unset(row);
                    } else {
                        col.clear(row);
                    }
                }
                Ok(())
            }
            BulkCopy::Fallback => fill::fill_column_iter(
                &self.accessor,
                table,
                dest_name,
                &source,
                dtype,
                src_idx,
                is_update,
            ),
        }
    }
}

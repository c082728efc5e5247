use crate::ColumnType;

/// An ordered mapping from column name to declared destination type.
///
/// Insertion order is the fill order, and it is significant: when two
/// entries share a name, the later fill overwrites the earlier one's
/// destination column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    columns: Vec<(String, ColumnType)>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a schema from `(name, dtype)` pairs, preserving order.
    pub fn from_columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = (S, ColumnType)>,
        S: Into<String>,
    {
        Self {
            columns: columns
                .into_iter()
                .map(|(name, dtype)| (name.into(), dtype))
                .collect(),
        }
    }

    pub fn push(&mut self, name: impl Into<String>, dtype: ColumnType) {
        self.columns.push((name.into(), dtype));
    }

    /// Builder-style [`push`](Self::push).
    pub fn with_column(mut self, name: impl Into<String>, dtype: ColumnType) -> Self {
        self.push(name, dtype);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, ColumnType)> {
        self.columns
            .iter()
            .map(|(name, dtype)| (name.as_str(), *dtype))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn dtype_of(&self, name: &str) -> Option<ColumnType> {
        self.iter()
            .find(|(n, _)| *n == name)
            .map(|(_, dtype)| dtype)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_preserves_insertion_order() {
        let schema = Schema::new()
            .with_column("b", ColumnType::Int32)
            .with_column("a", ColumnType::Str)
            .with_column("b", ColumnType::Float64);

        let names: Vec<&str> = schema.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["b", "a", "b"]);
        // Lookup by name resolves the first entry.
        assert_eq!(schema.dtype_of("b"), Some(ColumnType::Int32));
    }
}

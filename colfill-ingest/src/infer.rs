//! Destination type inference from source element kinds.

use colfill_types::{ColumnType, ElementKind};

/// Map a source buffer's element kind to the destination type it fills.
///
/// The ten numeric widths map 1:1 and booleans stay booleans. Everything
/// else (object-typed buffers, mixed containers) becomes a string
/// column, the only representation every cell can marshal into.
pub fn infer_dtype(kind: ElementKind) -> ColumnType {
    match kind {
        ElementKind::Int8 => ColumnType::Int8,
        ElementKind::Int16 => ColumnType::Int16,
        ElementKind::Int32 => ColumnType::Int32,
        ElementKind::Int64 => ColumnType::Int64,
        ElementKind::UInt8 => ColumnType::UInt8,
        ElementKind::UInt16 => ColumnType::UInt16,
        ElementKind::UInt32 => ColumnType::UInt32,
        ElementKind::UInt64 => ColumnType::UInt64,
        ElementKind::Float32 => ColumnType::Float32,
        ElementKind::Float64 => ColumnType::Float64,
        ElementKind::Bool => ColumnType::Bool,
        ElementKind::Object => ColumnType::Str,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_kinds_map_one_to_one() {
        let pairs = [
            (ElementKind::Int8, ColumnType::Int8),
            (ElementKind::Int16, ColumnType::Int16),
            (ElementKind::Int32, ColumnType::Int32),
            (ElementKind::Int64, ColumnType::Int64),
            (ElementKind::UInt8, ColumnType::UInt8),
            (ElementKind::UInt16, ColumnType::UInt16),
            (ElementKind::UInt32, ColumnType::UInt32),
            (ElementKind::UInt64, ColumnType::UInt64),
            (ElementKind::Float32, ColumnType::Float32),
            (ElementKind::Float64, ColumnType::Float64),
        ];
        for (kind, dtype) in pairs {
            assert_eq!(infer_dtype(kind), dtype);
        }
    }

    #[test]
    fn non_numeric_kinds() {
        assert_eq!(infer_dtype(ElementKind::Bool), ColumnType::Bool);
        assert_eq!(infer_dtype(ElementKind::Object), ColumnType::Str);
    }
}

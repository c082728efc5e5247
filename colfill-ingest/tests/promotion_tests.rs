use colfill_ingest::{ElementBuffer, Loader, MemAccessor};
use colfill_store::Table;
use colfill_types::{CellValue, ColumnType, Schema};

fn loader_for(accessor: MemAccessor) -> Loader<MemAccessor> {
    colfill_test_utils::init_tracing_for_tests();
    let mut loader = Loader::new(accessor);
    loader.init().expect("init");
    loader
}

fn filled(accessor: MemAccessor, name: &str, dtype: ColumnType) -> Table {
    let loader = loader_for(accessor);
    let schema = Schema::new().with_column(name, dtype);
    let mut table = Table::from_schema(&schema, loader.row_count().expect("rows"));
    loader
        .fill_table(&mut table, &schema, None, 0, u32::MAX, false)
        .expect("fill");
    table
}

#[test]
fn int32_overflow_promotes_to_float64() {
    // A long run of small values before one that cannot fit in 32 bits:
    // the inferred-type trap the promotion path exists for.
    let values = vec![1i64, 2, 3_000_000_000, 4];
    let table = filled(
        MemAccessor::new().with_column("n", ElementBuffer::Int64(values)),
        "n",
        ColumnType::Int32,
    );

    let col = table.column("n").unwrap();
    assert_eq!(col.dtype(), ColumnType::Float64);
    // Rows before the trigger stay numerically equal when reread as float.
    assert_eq!(col.value_at(0), Some(CellValue::Float64(1.0)));
    assert_eq!(col.value_at(1), Some(CellValue::Float64(2.0)));
    // The trigger and everything after it are stored as floats.
    assert_eq!(col.value_at(2), Some(CellValue::Float64(3_000_000_000.0)));
    assert_eq!(col.value_at(3), Some(CellValue::Float64(4.0)));
}

#[test]
fn int32_underflow_promotes_to_float64() {
    let values = vec![0i64, -2_200_000_000, 5];
    let table = filled(
        MemAccessor::new().with_column("n", ElementBuffer::Int64(values)),
        "n",
        ColumnType::Int32,
    );

    let col = table.column("n").unwrap();
    assert_eq!(col.dtype(), ColumnType::Float64);
    assert_eq!(col.value_at(1), Some(CellValue::Float64(-2_200_000_000.0)));
}

#[test]
fn int64_invalid_cell_promotes_to_string() {
    let table = filled(
        MemAccessor::new().with_column(
            "n",
            ElementBuffer::Object(vec![
                CellValue::Int64(7),
                CellValue::Str("x".into()),
                CellValue::Int64(9),
            ]),
        ),
        "n",
        ColumnType::Int64,
    );

    let col = table.column("n").unwrap();
    assert_eq!(col.dtype(), ColumnType::Str);
    // The triggering cell holds exactly its marshaled text, and earlier
    // rows are re-encoded through the same marshal path.
    assert_eq!(col.value_at(0), Some(CellValue::Str("7".into())));
    assert_eq!(col.value_at(1), Some(CellValue::Str("x".into())));
    assert_eq!(col.value_at(2), Some(CellValue::Str("9".into())));
}

#[test]
fn int64_hole_promotes_to_string_with_absent_row() {
    let table = filled(
        MemAccessor::new().with_column(
            "n",
            ElementBuffer::Object(vec![
                CellValue::Int64(7),
                CellValue::Null,
                CellValue::Int64(9),
            ]),
        ),
        "n",
        ColumnType::Int64,
    );

    let col = table.column("n").unwrap();
    assert_eq!(col.dtype(), ColumnType::Str);
    assert_eq!(col.value_at(0), Some(CellValue::Str("7".into())));
    assert_eq!(col.value_at(1), None);
    assert_eq!(col.value_at(2), Some(CellValue::Str("9".into())));
}

#[test]
fn float64_nan_promotes_to_string() {
    // A float32 source cannot be bulk-copied into float64 storage, so the
    // NaN is observed by the element-by-element path.
    let table = filled(
        MemAccessor::new().with_column(
            "f",
            ElementBuffer::Float32(vec![1.5, f32::NAN, 2.0]),
        ),
        "f",
        ColumnType::Float64,
    );

    let col = table.column("f").unwrap();
    assert_eq!(col.dtype(), ColumnType::Str);
    assert_eq!(col.value_at(0), Some(CellValue::Str("1.5".into())));
    assert_eq!(col.value_at(1), None);
    assert_eq!(col.value_at(2), Some(CellValue::Str("2".into())));
}

#[test]
fn nan_inside_a_float64_buffer_stays_a_value_on_the_bulk_path() {
    // An exact encoding match takes the bulk path, which never inspects
    // cell contents; only the null-position list produces absent rows.
    let table = filled(
        MemAccessor::new().with_column(
            "f",
            ElementBuffer::Float64(vec![1.0, f64::NAN, 2.0]),
        ),
        "f",
        ColumnType::Float64,
    );

    let col = table.column("f").unwrap();
    assert_eq!(col.dtype(), ColumnType::Float64);
    assert!(col.is_valid(1));
    match col.value_at(1) {
        Some(CellValue::Float64(x)) => assert!(x.is_nan()),
        other => panic!("unexpected value {other:?}"),
    }
}

#[test]
fn one_transition_per_fill_call() {
    // After the int32 -> float64 widening, a later hole marks the row
    // absent instead of promoting again: the first transition is terminal
    // for the call.
    let table = filled(
        MemAccessor::new().with_column(
            "n",
            ElementBuffer::Object(vec![
                CellValue::Int64(1),
                CellValue::Int64(3_000_000_000),
                CellValue::Null,
                CellValue::Int64(2),
            ]),
        ),
        "n",
        ColumnType::Int32,
    );

    let col = table.column("n").unwrap();
    assert_eq!(col.dtype(), ColumnType::Float64);
    assert_eq!(col.value_at(0), Some(CellValue::Float64(1.0)));
    assert_eq!(col.value_at(1), Some(CellValue::Float64(3_000_000_000.0)));
    assert_eq!(col.value_at(2), None);
    assert_eq!(col.value_at(3), Some(CellValue::Float64(2.0)));
}

#[test]
fn in_range_int64_source_fills_int32_without_promotion() {
    // The wide-source guard forces the element path, but in-range values
    // keep the declared type.
    let table = filled(
        MemAccessor::new().with_column("n", ElementBuffer::Int64(vec![10, -20, 30])),
        "n",
        ColumnType::Int32,
    );

    let col = table.column("n").unwrap();
    assert_eq!(col.dtype(), ColumnType::Int32);
    assert_eq!(col.value_at(0), Some(CellValue::Int32(10)));
    assert_eq!(col.value_at(1), Some(CellValue::Int32(-20)));
    assert_eq!(col.value_at(2), Some(CellValue::Int32(30)));
}

#[test]
fn int64_source_into_float64_avoids_bulk_reinterpretation() {
    // Same width, different encoding: the guard routes this through the
    // element path, which converts values instead of copying bits.
    let table = filled(
        MemAccessor::new().with_column("n", ElementBuffer::Int64(vec![1, 2, 3])),
        "n",
        ColumnType::Float64,
    );

    let col = table.column("n").unwrap();
    assert_eq!(col.dtype(), ColumnType::Float64);
    assert_eq!(col.value_at(0), Some(CellValue::Float64(1.0)));
    assert_eq!(col.value_at(2), Some(CellValue::Float64(3.0)));
}

//! Tests for data module

use super::*;

#[test]
fn test_series_creation() {
    let float_series = Series::float(vec![1.0, 2.0, 3.0]);
    assert_eq!(float_series.len(), 3);
    assert_eq!(float_series.dtype(), "float64");

    let int_series = Series::int(vec![1, 2, 3]);
    assert_eq!(int_series.dtype(), "int64");
    assert!(int_series.is_numeric());

    let bool_series = Series::bool(vec![true, false, true]);
    assert_eq!(bool_series.dtype(), "bool");

    let string_series = Series::string(&["a", "b"]);
    assert_eq!(string_series.len(), 2);
    assert!(!string_series.is_numeric());

    let cat_series = Series::categorical(&["B", "A", "B", "C"]);
    assert_eq!(cat_series.len(), 4);
    assert_eq!(cat_series.dtype(), "categorical");
    assert_eq!(
        cat_series.levels().unwrap(),
        &["A".to_string(), "B".to_string(), "C".to_string()]
    );
    assert_eq!(cat_series.get(0), Some(SeriesValue::String("B".into())));
}

#[test]
fn test_categorical_with_explicit_levels() {
    let series = Series::categorical_with_levels(&["lo", "hi", "lo"], &["lo", "hi"]).unwrap();
    assert_eq!(series.levels().unwrap()[0], "lo");
    if let Series::Categorical(codes, _) = &series {
        assert_eq!(codes.to_vec(), vec![0, 1, 0]);
    }

    let err = Series::categorical_with_levels(&["lo", "mid"], &["lo", "hi"]).unwrap_err();
    assert!(matches!(err, DataError::UnknownLevel { .. }));
}

#[test]
fn test_series_to_float() {
    assert_eq!(
        Series::bool(vec![true, false]).to_float().unwrap().to_vec(),
        vec![1.0, 0.0]
    );
    assert_eq!(
        Series::int(vec![2, 3]).to_float().unwrap().to_vec(),
        vec![2.0, 3.0]
    );
    assert!(matches!(
        Series::string(&["x"]).to_float(),
        Err(DataError::NonNumericData("string"))
    ));
}

#[test]
fn test_dataframe_creation() {
    let df = DataFrame::from_columns(vec![
        ("x", Series::float(vec![1.0, 2.0, 3.0])),
        ("y", Series::int(vec![4, 5, 6])),
    ])
    .unwrap();

    assert_eq!(df.shape(), (3, 2));
    assert_eq!(df.column_names(), vec!["x", "y"]);
    assert!(df.has_column("x"));
    assert!(df.get_column("z").is_none());
}

#[test]
fn test_dataframe_dimension_mismatch() {
    let result = DataFrameBuilder::new()
        .with_column("x", Series::float(vec![1.0, 2.0]))
        .unwrap()
        .with_column("y", Series::float(vec![1.0]));

    assert!(matches!(result, Err(DataError::DimensionMismatch { .. })));
}

#[test]
fn test_dataframe_duplicate_column() {
    let result = DataFrameBuilder::new()
        .with_column("x", Series::float(vec![1.0]))
        .unwrap()
        .with_column("x", Series::float(vec![2.0]));

    assert!(matches!(result, Err(DataError::DuplicateColumn(name)) if name == "x"));
}

#[test]
fn test_dataframe_select_and_row() {
    let df = DataFrame::from_columns(vec![
        ("a", Series::float(vec![1.0, 2.0])),
        ("b", Series::string(&["u", "v"])),
        ("c", Series::bool(vec![true, false])),
    ])
    .unwrap();

    let selected = df.select(["c", "a"]).unwrap();
    assert_eq!(selected.column_names(), vec!["c", "a"]);
    assert!(matches!(
        df.select(["nope"]),
        Err(DataError::ColumnNotFound(_))
    ));

    let row = df.get_row(1).unwrap();
    assert_eq!(row[0], ("a", SeriesValue::Float(2.0)));
    assert_eq!(row[1], ("b", SeriesValue::String("v".into())));
    assert!(matches!(
        df.get_row(2),
        Err(DataError::IndexOutOfBounds { index: 2, len: 2 })
    ));
}

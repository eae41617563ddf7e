//! Type inference tests

use super::*;
use crate::decode::{CsvDecoder, TableDecoder};
use crate::header::HeaderLocator;
use crate::types::{Cell, HeaderedTable, TypedValue};
use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use test_case::test_case;

fn column(cells: Vec<Cell>) -> HeaderedTable {
    HeaderedTable::new(
        vec!["value".to_string()],
        cells.into_iter().map(|c| vec![c]).collect(),
    )
}

fn texts(values: &[&str]) -> Vec<Cell> {
    values.iter().map(|v| Cell::text(*v)).collect()
}

fn date(y: i32, m: u32, d: u32) -> TypedValue {
    TypedValue::Date(
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap(),
    )
}

// ============================================================================
// Classification Tests
// ============================================================================

#[test]
fn test_all_empty_column_is_string() {
    let (typed, manifest) =
        TypeInferencer::new().infer_and_cast(column(vec![Cell::Empty, Cell::text("  ")]));

    assert_eq!(manifest.get("value"), Some(ColumnType::String));
    assert_eq!(
        typed.columns()[0].values,
        vec![TypedValue::Null, TypedValue::Null]
    );
}

#[test]
fn test_spreadsheet_booleans_stay_text() {
    let flag = |b: bool| Cell::Other(b.to_string());
    let (typed, manifest) = TypeInferencer::new().infer_and_cast(column(vec![
        flag(true),
        flag(false),
        Cell::Number(1.0),
    ]));

    assert_eq!(manifest.get("value"), Some(ColumnType::String));
    assert_eq!(
        typed.column("value").unwrap().values,
        vec![
            TypedValue::Text("true".to_string()),
            TypedValue::Text("false".to_string()),
            TypedValue::Text("1".to_string()),
        ]
    );
}

#[test]
fn test_numeric_strings() {
    let (typed, manifest) =
        TypeInferencer::new().infer_and_cast(column(texts(&["1", " 2.5 ", "", "-3e2"])));

    assert_eq!(manifest.get("value"), Some(ColumnType::Numeric));
    assert_eq!(
        typed.columns()[0].values,
        vec![
            TypedValue::Number(1.0),
            TypedValue::Number(2.5),
            TypedValue::Null,
            TypedValue::Number(-300.0),
        ]
    );
}

#[test]
fn test_numeric_exactly_half_is_promoted() {
    let (typed, manifest) =
        TypeInferencer::new().infer_and_cast(column(texts(&["1", "2", "x", "y"])));

    assert_eq!(manifest.get("value"), Some(ColumnType::Numeric));
    assert_eq!(typed.columns()[0].null_count(), 2);
}

#[test]
fn test_numeric_below_half_is_string() {
    let (typed, manifest) =
        TypeInferencer::new().infer_and_cast(column(texts(&["1", "x", "y"])));

    assert_eq!(manifest.get("value"), Some(ColumnType::String));
    assert_eq!(
        typed.columns()[0].values,
        vec![
            TypedValue::Text("1".to_string()),
            TypedValue::Text("x".to_string()),
            TypedValue::Text("y".to_string()),
        ]
    );
}

#[test]
fn test_nulls_do_not_count_against_threshold() {
    // 1 of 2 non-null cells parses; the empties are ignored
    let (_, manifest) =
        TypeInferencer::new().infer_and_cast(column(texts(&["", "", "", "7", "n/a"])));
    assert_eq!(manifest.get("value"), Some(ColumnType::Numeric));
}

#[test_case("inf" ; "infinity")]
#[test_case("NaN" ; "not a number")]
fn test_non_finite_text_is_not_numeric(value: &str) {
    let (_, manifest) = TypeInferencer::new().infer_and_cast(column(texts(&[value])));
    assert_eq!(manifest.get("value"), Some(ColumnType::String));
}

#[test]
fn test_date_strings() {
    let (typed, manifest) = TypeInferencer::new()
        .infer_and_cast(column(texts(&["2020-01-01", "2021-06-15", "soon"])));

    assert_eq!(manifest.get("value"), Some(ColumnType::Date));
    assert_eq!(
        typed.columns()[0].values,
        vec![date(2020, 1, 1), date(2021, 6, 15), TypedValue::Null]
    );
}

#[test]
fn test_date_format_is_strict() {
    let (_, manifest) = TypeInferencer::new()
        .infer_and_cast(column(texts(&["01/02/2020", "15/06/2021", "2021-06-15"])));
    assert_eq!(manifest.get("value"), Some(ColumnType::String));
}

#[test]
fn test_native_date_cells() {
    let d = NaiveDate::from_ymd_opt(2023, 3, 9)
        .unwrap()
        .and_hms_opt(8, 30, 0)
        .unwrap();
    let (typed, manifest) =
        TypeInferencer::new().infer_and_cast(column(vec![Cell::Date(d), Cell::Empty]));

    assert_eq!(manifest.get("value"), Some(ColumnType::Date));
    assert_eq!(
        typed.columns()[0].values,
        vec![TypedValue::Date(d), TypedValue::Null]
    );
}

#[test]
fn test_numbers_win_over_dates() {
    let cells = vec![
        Cell::Number(1.0),
        Cell::text("2020-01-01"),
        Cell::text("2020-01-02"),
        Cell::Number(2.0),
    ];
    let (typed, manifest) = TypeInferencer::new().infer_and_cast(column(cells));

    assert_eq!(manifest.get("value"), Some(ColumnType::Numeric));
    assert_eq!(typed.columns()[0].null_count(), 2);
}

#[test]
fn test_string_column_keeps_numeric_spelling() {
    let cells = vec![
        Cell::NumericText {
            value: 7.0,
            text: "007".to_string(),
        },
        Cell::text("abc"),
        Cell::text("xyz"),
        Cell::NumericText {
            value: 1.5,
            text: "1.50".to_string(),
        },
        Cell::text("pqr"),
    ];
    let (typed, manifest) = TypeInferencer::new().infer_and_cast(column(cells));

    assert_eq!(manifest.get("value"), Some(ColumnType::String));
    assert_eq!(
        typed.columns()[0].values,
        vec![
            TypedValue::Text("007".to_string()),
            TypedValue::Text("abc".to_string()),
            TypedValue::Text("xyz".to_string()),
            TypedValue::Text("1.50".to_string()),
            TypedValue::Text("pqr".to_string()),
        ]
    );
}

#[test]
fn test_numeric_text_casts_to_its_value() {
    let cells = vec![
        Cell::NumericText {
            value: 1000.0,
            text: "1e3".to_string(),
        },
        Cell::text("n/a"),
    ];
    let (typed, manifest) = TypeInferencer::new().infer_and_cast(column(cells));

    assert_eq!(manifest.get("value"), Some(ColumnType::Numeric));
    assert_eq!(
        typed.columns()[0].values,
        vec![TypedValue::Number(1000.0), TypedValue::Null]
    );
}

#[test]
fn test_custom_ratio_and_format() {
    let inferencer = TypeInferencer::new()
        .with_promotion_ratio(0.75)
        .with_date_format("%d/%m/%Y");

    let (_, manifest) = inferencer.infer_and_cast(column(texts(&["1", "2", "x", "y"])));
    assert_eq!(manifest.get("value"), Some(ColumnType::String));

    let (typed, manifest) = inferencer.infer_and_cast(column(texts(&["01/02/2020"])));
    assert_eq!(manifest.get("value"), Some(ColumnType::Date));
    assert_eq!(typed.columns()[0].values, vec![date(2020, 2, 1)]);
}

// ============================================================================
// Table-level Tests
// ============================================================================

#[test]
fn test_columns_are_preserved_in_order() {
    let table = HeaderedTable::new(
        vec!["id".to_string(), "empty".to_string(), "label".to_string()],
        vec![
            vec![Cell::Number(1.0), Cell::Empty, Cell::text("a")],
            vec![Cell::Number(2.0), Cell::Empty, Cell::text("b")],
        ],
    );

    let (typed, manifest) = TypeInferencer::new().infer_and_cast(table);

    assert_eq!(typed.num_columns(), 3);
    assert_eq!(typed.num_rows(), 2);
    assert_eq!(typed.column_names(), vec!["id", "empty", "label"]);
    let tags: Vec<_> = manifest.iter().map(|(_, t)| t).collect();
    assert_eq!(
        tags,
        vec![ColumnType::Numeric, ColumnType::String, ColumnType::String]
    );
}

#[test]
fn test_inference_is_idempotent() {
    let table = HeaderedTable::new(
        vec![
            "amount".to_string(),
            "when".to_string(),
            "who".to_string(),
            "blank".to_string(),
        ],
        vec![
            texts(&["10", "2020-01-01", "Alice", ""]),
            texts(&["oops", "not a date", "Bob", ""]),
            texts(&["12.5", "2020-03-04", "", ""]),
        ],
    );

    let inferencer = TypeInferencer::new();
    let (typed, manifest) = inferencer.infer_and_cast(table);
    let (retyped, remanifest) = inferencer.infer_and_cast(typed.to_headered());

    assert_eq!(manifest, remanifest);
    assert_eq!(typed, retyped);
}

#[test]
fn test_inference_is_idempotent_on_decoded_csv() {
    let body = "\
id,zip,amount,closed
1,02139,10,2021-01-05
2,SW1A 1AA,12.50,2021-02-01
3,EC1A,n/a,2021-13-01
";
    let raw = CsvDecoder::new().decode(body.as_bytes()).unwrap();
    let headered = HeaderLocator::new().locate_and_apply(raw).unwrap();

    let inferencer = TypeInferencer::new();
    let (typed, manifest) = inferencer.infer_and_cast(headered);

    assert_eq!(manifest.get("id"), Some(ColumnType::Numeric));
    assert_eq!(manifest.get("zip"), Some(ColumnType::String));
    assert_eq!(manifest.get("amount"), Some(ColumnType::Numeric));
    assert_eq!(manifest.get("closed"), Some(ColumnType::Date));
    assert_eq!(
        typed.column("zip").unwrap().values[0],
        TypedValue::Text("02139".to_string())
    );

    let (retyped, remanifest) = inferencer.infer_and_cast(typed.to_headered());
    assert_eq!(manifest, remanifest);
    assert_eq!(typed, retyped);
}

#[test]
fn test_manifest_json() {
    let mut manifest = TypeManifest::new();
    manifest.insert("name", ColumnType::String);
    manifest.insert("age", ColumnType::Numeric);
    manifest.insert("joindate", ColumnType::Date);

    assert_eq!(
        serde_json::to_string(&manifest).unwrap(),
        r#"{"name":"string","age":"numeric","joindate":"date"}"#
    );
    assert_eq!(manifest.to_json()["age"], "numeric");
    assert_eq!(manifest.len(), 3);
}

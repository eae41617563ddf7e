//! Tests for event module

use super::*;
use crate::error::Error;
use pretty_assertions::assert_eq;
use serde_json::json;
use test_case::test_case;

#[test]
fn test_parse_notification() {
    let json = r#"{
        "Records": [{
            "eventVersion": "2.1",
            "eventName": "ObjectCreated:Put",
            "s3": {
                "bucket": {"name": "inbox", "arn": "arn:aws:s3:::inbox"},
                "object": {"key": "uploads/Deal.xlsx", "size": 1024}
            }
        }]
    }"#;

    let event = StorageEvent::from_json(json).unwrap();
    let (bucket, key) = event.first_object().unwrap();
    assert_eq!(bucket, "inbox");
    assert_eq!(key, "uploads/Deal.xlsx");
}

#[test_case("Q1+Report.csv", "Q1 Report.csv" ; "plus is space")]
#[test_case("Q1%20Report.csv", "Q1 Report.csv" ; "percent space")]
#[test_case("caf%C3%A9.xlsx", "café.xlsx" ; "utf8 escape")]
#[test_case("a%2Bb.csv", "a+b.csv" ; "encoded plus")]
fn test_key_is_decoded(raw: &str, expected: &str) {
    let event = StorageEvent::single("inbox", raw);
    let (_, key) = event.first_object().unwrap();
    assert_eq!(key, expected);
}

#[test]
fn test_first_record_wins() {
    let mut event = StorageEvent::single("first", "a.csv");
    event
        .records
        .extend(StorageEvent::single("second", "b.csv").records);

    assert_eq!(
        event.first_object().unwrap(),
        ("first".to_string(), "a.csv".to_string())
    );
}

#[test]
fn test_no_records() {
    let event = StorageEvent::from_json("{}").unwrap();
    let err = event.first_object().unwrap_err();
    assert!(matches!(err, Error::Event { .. }));
    assert!(err.is_fatal_input());
}

#[test]
fn test_empty_key_rejected() {
    let err = StorageEvent::single("inbox", "").first_object().unwrap_err();
    assert!(matches!(err, Error::Event { .. }));
}

#[test]
fn test_malformed_json() {
    let err = StorageEvent::from_json(r#"{"Records": [{"s3": {}}]}"#).unwrap_err();
    assert!(matches!(err, Error::JsonParse(_)));
}

#[test]
fn test_receipt_shape() {
    let receipt = IngestReceipt::ok("processed/Deal.csv", "processed/Deal_metadata.json");

    assert_eq!(
        serde_json::to_value(&receipt).unwrap(),
        json!({
            "statusCode": 200,
            "body": {
                "output_key": "processed/Deal.csv",
                "metadata_key": "processed/Deal_metadata.json"
            }
        })
    );
}

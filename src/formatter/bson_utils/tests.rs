//! Tests for BSON cell rendering

use super::helpers::*;
use super::*;
use mongodb::bson::{Binary, Bson, DateTime, doc, oid::ObjectId, spec::BinarySubtype};

// ===== Helper Function Tests =====

#[test]
fn test_datetime_export_format() {
    // 2024-01-01T10:00:00.750Z
    let dt = DateTime::from_millis(1_704_103_200_750);
    assert_eq!(
        datetime_to_export_string(&dt).as_deref(),
        Some("2024-01-01 10:00:00")
    );
}

#[test]
fn test_datetime_before_epoch() {
    let dt = DateTime::from_millis(-1_000);
    assert_eq!(
        datetime_to_export_string(&dt).as_deref(),
        Some("1969-12-31 23:59:59")
    );
}

#[test]
fn test_format_double() {
    assert_eq!(format_double(10.0), "10.0");
    assert_eq!(format_double(12.5), "12.5");
    assert_eq!(format_double(0.1), "0.1");
    assert_eq!(format_double(-3.0), "-3.0");
    assert_eq!(format_double(f64::NAN), "nan");
    assert_eq!(format_double(f64::NEG_INFINITY), "-inf");
    assert_eq!(format_double(0.0), "0.0");
}

#[test]
fn test_format_double_exponent_ranges() {
    assert_eq!(format_double(1e16), "1e+16");
    assert_eq!(format_double(1e17), "1e+17");
    assert_eq!(format_double(-2.5e20), "-2.5e+20");
    assert_eq!(format_double(1.5e300), "1.5e+300");
    assert_eq!(format_double(0.00001), "1e-05");
    assert_eq!(format_double(1.5e-7), "1.5e-07");
    assert_eq!(format_double(0.0001), "0.0001");
    assert_eq!(format_double(9999999999999998.0), "9999999999999998.0");
    assert_eq!(format_double(123456789.125), "123456789.125");
}

#[test]
fn test_binary_to_hex() {
    let bin = Binary {
        subtype: BinarySubtype::Generic,
        bytes: vec![0x01, 0x02, 0x03, 0xff],
    };
    assert_eq!(binary_to_hex(&bin), "010203ff");
}

// ===== PlainTextConverter Tests =====

#[test]
fn test_plain_text_scalars() {
    let converter = PlainTextConverter::new();

    assert_eq!(converter.convert(&Bson::String("done".into())), "done");
    assert_eq!(converter.convert(&Bson::Int32(10)), "10");
    assert_eq!(converter.convert(&Bson::Int64(250)), "250");
    assert_eq!(converter.convert(&Bson::Double(99.5)), "99.5");
    assert_eq!(converter.convert(&Bson::Boolean(true)), "True");
    assert_eq!(converter.convert(&Bson::Null), "");
}

#[test]
fn test_plain_text_object_id() {
    let converter = PlainTextConverter::new();
    let oid = ObjectId::parse_str("65a1f0c2e4b0a1b2c3d4e5f6").unwrap();
    assert_eq!(
        converter.convert(&Bson::ObjectId(oid)),
        "65a1f0c2e4b0a1b2c3d4e5f6"
    );
}

#[test]
fn test_plain_text_optional() {
    let converter = PlainTextConverter::new();
    let order = doc! { "status": "pending", "paymentId": Bson::Null };

    assert_eq!(converter.convert_optional(None), "");
    assert_eq!(converter.convert_optional(order.get("status")), "pending");
    assert_eq!(converter.convert_optional(order.get("paymentId")), "");
}

#[test]
fn test_plain_text_nested_values() {
    let converter = PlainTextConverter::new();

    let nested = doc! { "name": "Samosa" };
    assert_eq!(converter.convert(&Bson::Document(nested)), r#"{"name":"Samosa"}"#);

    let arr = vec![Bson::Int32(1), Bson::String("two".into())];
    assert_eq!(converter.convert(&Bson::Array(arr)), r#"[1,"two"]"#);
}

#[test]
fn test_plain_text_datetime_uses_export_format() {
    let converter = PlainTextConverter::new();
    let dt = DateTime::from_millis(1_704_103_200_000);
    assert_eq!(converter.convert(&Bson::DateTime(dt)), "2024-01-01 10:00:00");
}

//! Strategy implementations for BSON conversion

use mongodb::bson::{Binary, Bson, DateTime, Decimal128, Document, Regex, Timestamp, oid::ObjectId};

use super::converter::{BsonConverter, BsonStringConverter};
use super::helpers::*;

/// Plain text converter for CSV cells
///
/// No type wrappers, no quoting; quoting is the writer's job.
pub struct PlainTextConverter;

impl PlainTextConverter {
    /// Create a new plain text converter
    pub fn new() -> Self {
        Self
    }
}

impl Default for PlainTextConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl BsonConverter for PlainTextConverter {
    type Output = String;

    fn convert(&self, value: &Bson) -> String {
        self.convert_to_string(value)
    }
}

impl BsonStringConverter for PlainTextConverter {
    fn format_string(&self, s: &str) -> String {
        s.to_string()
    }

    fn format_int32(&self, n: i32) -> String {
        n.to_string()
    }

    fn format_int64(&self, n: i64) -> String {
        n.to_string()
    }

    fn format_double(&self, f: f64) -> String {
        format_double(f)
    }

    fn format_boolean(&self, b: bool) -> String {
        if b { "True" } else { "False" }.to_string()
    }

    fn format_null(&self) -> String {
        String::new()
    }

    fn format_object_id(&self, oid: &ObjectId) -> String {
        oid.to_hex()
    }

    fn format_datetime(&self, dt: &DateTime) -> String {
        datetime_to_export_string(dt).unwrap_or_else(|| dt.timestamp_millis().to_string())
    }

    fn format_decimal128(&self, d: &Decimal128) -> String {
        d.to_string()
    }

    fn format_array(&self, arr: &[Bson]) -> String {
        Bson::Array(arr.to_vec()).into_relaxed_extjson().to_string()
    }

    fn format_document(&self, doc: &Document) -> String {
        Bson::Document(doc.clone()).into_relaxed_extjson().to_string()
    }

    fn format_binary(&self, bin: &Binary) -> String {
        binary_to_hex(bin)
    }

    fn format_regex(&self, regex: &Regex) -> String {
        format!("/{}/{}", regex.pattern, regex.options)
    }

    fn format_timestamp(&self, ts: &Timestamp) -> String {
        format!("Timestamp({}, {})", ts.time, ts.increment)
    }

    fn format_unknown(&self, value: &Bson) -> String {
        format!("{:?}", value)
    }
}

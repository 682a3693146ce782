//! Value formatting for CSV cells
//!
//! Source documents are loosely typed, so every cell goes through a BSON to
//! plain-text conversion before it reaches the CSV writer.

pub mod bson_utils;

pub use bson_utils::{BsonConverter, PlainTextConverter, datetime_to_export_string};

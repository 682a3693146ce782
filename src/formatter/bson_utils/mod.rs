//! BSON value conversion utilities
//!
//! The conversion is split into a generic [`BsonConverter`] trait, a
//! per-type [`converter::BsonStringConverter`] dispatch, and the
//! [`PlainTextConverter`] strategy used for export cells.

mod converter;
mod helpers;
mod strategies;

pub use converter::{BsonConverter, BsonStringConverter};
pub use helpers::{EXPORT_DATETIME_FORMAT, datetime_to_export_string, format_double};
pub use strategies::PlainTextConverter;

#[cfg(test)]
mod tests;

//! LightCSV Library
//!
//! A small reader for CSV-like delimited text that infers a type for every
//! cell. Lines are split honoring a configurable quote character, and each
//! value is classified as null, integer, float, string, date, datetime or time.
//!
//! This library provides tools for:
//! - Quote-aware tokenization with configurable separator and quote characters
//! - An ordered classification cascade that callers can extend
//! - Header, explicit-name or positional field keys
//! - Strict or lenient handling of malformed input
//! - Lazy, restartable row iteration over files, strings and line sources
//!
//! ```rust
//! use lightcsv::{CellValue, LightCsvReader, ReaderConfig};
//!
//! let reader = LightCsvReader::new(ReaderConfig::default().with_field_names(["id", "day"]))?;
//! let row = reader.read_str("7,2021-02-05\n").next().unwrap()?;
//!
//! assert_eq!(row.get("id"), Some(&CellValue::Integer(7)));
//! assert_eq!(row.get("day").map(CellValue::kind), Some(lightcsv::CellKind::Date));
//! # Ok::<(), lightcsv::LightCsvError>(())
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod parser;
pub mod reader;

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use config::ReaderConfig;
pub use error::{LightCsvError, ParseErrorKind, Result};
pub use models::{CellKind, CellValue, FieldKey, Row};
pub use parser::{ClassifierPlacement, TokenClassifier};
pub use reader::{LightCsvReader, Rows};

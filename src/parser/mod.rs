//! Line parsing pipeline for delimited text
//!
//! Each non-blank line goes through three stages:
//!
//! - [`tokenizer`] - quote-aware splitting of a line into raw tokens
//! - [`classifier`] - typing of each token through an ordered classifier chain
//! - [`assembler`] - key-set resolution, arity checks and row construction
//!
//! [`field_parsers`] holds the pure per-type predicates the built-in
//! classifier is made of.
//!
//! ## Usage
//!
//! ```rust
//! use lightcsv::parser::{ClassifierChain, RowAssembler};
//! use lightcsv::{CellValue, ReaderConfig};
//!
//! let config = ReaderConfig::default().with_headers(true);
//! let chain = ClassifierChain::new(config.quote_char, config.strict);
//! let mut assembler = RowAssembler::new(&config, &chain);
//!
//! assert!(assembler.feed(1, "id,name").unwrap().is_none());
//! let row = assembler.feed(2, "7,\"Ada\"").unwrap().unwrap();
//! assert_eq!(row.get("id"), Some(&CellValue::Integer(7)));
//! ```

pub mod assembler;
pub mod classifier;
pub mod field_parsers;
pub mod tokenizer;

#[cfg(test)]
mod tests;

pub use assembler::{AssemblerState, RowAssembler};
pub use classifier::{BuiltinClassifier, ClassifierChain, ClassifierPlacement, TokenClassifier};
pub use tokenizer::{LineTokenizer, TokenizeError, tokenize};

//! Test utilities shared by the parser test modules

use crate::config::ReaderConfig;
use crate::error::Result;
use crate::models::{CellValue, Row};
use crate::parser::{ClassifierChain, RowAssembler};


/// Classify a single token with the default lenient chain
pub fn classify_lenient(token: &str) -> CellValue {
    ClassifierChain::new('"', false).classify(1, token).unwrap()
}

/// Classify a single token with the default strict chain
pub fn classify_strict(token: &str) -> Result<CellValue> {
    ClassifierChain::new('"', true).classify(1, token)
}

/// Feed every line through a fresh assembler, stopping at the first error
pub fn assemble_all(config: &ReaderConfig, lines: &[&str]) -> Result<Vec<Row>> {
    let chain = ClassifierChain::new(config.quote_char, config.strict);
    let mut assembler = RowAssembler::new(config, &chain);
    let mut rows = Vec::new();

    for (index, line) in lines.iter().enumerate() {
        if let Some(row) = assembler.feed(index + 1, line)? {
            rows.push(row);
        }
    }

    assembler.finish();
    Ok(rows)
}

pub fn text(value: &str) -> CellValue {
    CellValue::String(value.to_string())
}

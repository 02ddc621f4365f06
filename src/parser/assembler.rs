//! Row assembly state machine
//!
//! Turns trimmed lines into rows: resolves the key set from the first
//! non-blank line, classifies every token and enforces arity.

use tracing::{debug, warn};

use super::classifier::ClassifierChain;
use super::tokenizer::LineTokenizer;
use crate::config::ReaderConfig;
use crate::error::{LightCsvError, Result};
use crate::models::{CellValue, FieldKey, Row};

/// Progress of one read pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssemblerState {
    /// Next non-blank line is data and fixes the key set
    AwaitingFirstLine,
    /// Next non-blank line is the header
    AwaitingHeader,
    /// Key set fixed; every non-blank line is a row
    ReadingRows,
    /// Source exhausted or a fatal error occurred
    Done,
}

/// Per-pass row assembler
///
/// A fresh assembler is created for every pass, so the key set never leaks
/// from one stream to the next.
#[derive(Debug)]
pub struct RowAssembler<'r> {
    config: &'r ReaderConfig,
    classifiers: &'r ClassifierChain,
    state: AssemblerState,
    keys: Vec<FieldKey>,
}

impl<'r> RowAssembler<'r> {
    pub fn new(config: &'r ReaderConfig, classifiers: &'r ClassifierChain) -> Self {
        let state = if config.has_headers {
            AssemblerState::AwaitingHeader
        } else {
            AssemblerState::AwaitingFirstLine
        };

        Self {
            config,
            classifiers,
            state,
            keys: Vec::new(),
        }
    }

    pub fn state(&self) -> AssemblerState {
        self.state
    }

    pub fn is_done(&self) -> bool {
        self.state == AssemblerState::Done
    }

    /// Key set of this pass, once resolved
    pub fn keys(&self) -> Option<&[FieldKey]> {
        match self.state {
            AssemblerState::AwaitingFirstLine | AssemblerState::AwaitingHeader => None,
            AssemblerState::ReadingRows | AssemblerState::Done if self.keys.is_empty() => None,
            AssemblerState::ReadingRows | AssemblerState::Done => Some(&self.keys),
        }
    }

    /// Mark the source as exhausted
    pub fn finish(&mut self) {
        self.state = AssemblerState::Done;
    }

    /// Feed one physical line; `line_number` is 1-based
    ///
    /// Returns `Ok(None)` for blank and header lines. Any error moves the
    /// assembler to [`AssemblerState::Done`].
    pub fn feed(&mut self, line_number: usize, line: &str) -> Result<Option<Row>> {
        let line = line.trim();
        if line.is_empty() || self.is_done() {
            return Ok(None);
        }

        let result = self.step(line_number, line);
        if result.is_err() {
            self.state = AssemblerState::Done;
        }
        result
    }

    fn step(&mut self, line_number: usize, line: &str) -> Result<Option<Row>> {
        match self.state {
            AssemblerState::AwaitingHeader => {
                let (tokens, _) = self.split(line_number, line)?;
                self.keys = tokens
                    .into_iter()
                    .map(|token| FieldKey::Name(self.classifiers.header_name(token)))
                    .collect();
                self.state = AssemblerState::ReadingRows;
                debug!("Line {}: header resolved {} fields", line_number, self.keys.len());
                Ok(None)
            }
            AssemblerState::AwaitingFirstLine => {
                let values = self.values(line_number, line)?;
                self.keys = match &self.config.field_names {
                    Some(names) => names.iter().cloned().map(FieldKey::Name).collect(),
                    None => (0..values.len()).map(FieldKey::Index).collect(),
                };
                self.state = AssemblerState::ReadingRows;
                debug!("Line {}: key set fixed at {} fields", line_number, self.keys.len());
                self.assemble(line_number, values).map(Some)
            }
            AssemblerState::ReadingRows => {
                let values = self.values(line_number, line)?;
                self.assemble(line_number, values).map(Some)
            }
            AssemblerState::Done => Ok(None),
        }
    }

    /// Tokenize a line; the flag reports a lenient-mode truncation
    fn split<'l>(&self, line_number: usize, line: &'l str) -> Result<(Vec<&'l str>, bool)> {
        let mut tokens = Vec::new();

        for token in LineTokenizer::new(line, self.config.separator, self.config.quote_char) {
            match token {
                Ok(token) => tokens.push(token),
                Err(e) if self.config.strict => {
                    return Err(LightCsvError::malformed_quoting(line_number, e.column, line));
                }
                Err(e) => {
                    warn!(
                        "Line {}: malformed quoting at column {}, rest of line read as null",
                        line_number, e.column
                    );
                    return Ok((tokens, true));
                }
            }
        }

        Ok((tokens, false))
    }

    fn values(&self, line_number: usize, line: &str) -> Result<Vec<CellValue>> {
        let (tokens, truncated) = self.split(line_number, line)?;

        let mut values = tokens
            .into_iter()
            .map(|token| self.classifiers.classify(line_number, token))
            .collect::<Result<Vec<_>>>()?;

        if truncated {
            values.push(CellValue::Null);
        }
        Ok(values)
    }

    fn assemble(&self, line_number: usize, values: Vec<CellValue>) -> Result<Row> {
        if values.len() != self.keys.len() {
            if self.config.strict {
                return Err(LightCsvError::arity(
                    line_number,
                    self.keys.len(),
                    values.len(),
                ));
            }
            warn!(
                "Line {} has {} values, expected {}; pairing positionally",
                line_number,
                values.len(),
                self.keys.len()
            );
        }

        Ok(self.keys.iter().cloned().zip(values).collect())
    }
}

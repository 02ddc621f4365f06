//! Stream reader: the public entry point for reading typed rows.
//!
//! [`LightCsvReader`] holds a validated configuration and the classifier
//! chain. Every call to one of its `read*` methods starts an independent pass
//! and returns a lazy [`Rows`] iterator; nothing is read until the caller
//! pulls a row.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::iter::FusedIterator;
use std::path::Path;
use tracing::{debug, info, trace};

use crate::config::ReaderConfig;
use crate::error::{LightCsvError, Result};
use crate::models::{FieldKey, Row};
use crate::parser::{ClassifierChain, ClassifierPlacement, RowAssembler, TokenClassifier};

const BOM: char = '\u{feff}';

/// Typed delimited-text reader
///
/// ```rust
/// use lightcsv::{CellValue, LightCsvReader, ReaderConfig};
///
/// let reader = LightCsvReader::new(ReaderConfig::default().with_headers(true))?;
/// let rows = reader
///     .read_str("name,age\n\"Ada\",36\n")
///     .collect::<lightcsv::Result<Vec<_>>>()?;
///
/// assert_eq!(rows[0].get("age"), Some(&CellValue::Integer(36)));
/// # Ok::<(), lightcsv::LightCsvError>(())
/// ```
#[derive(Debug)]
pub struct LightCsvReader {
    config: ReaderConfig,
    classifiers: ClassifierChain,
}

impl LightCsvReader {
    /// Create a reader, rejecting inconsistent configuration up front
    pub fn new(config: ReaderConfig) -> Result<Self> {
        config.validate()?;
        let classifiers = ClassifierChain::new(config.quote_char, config.strict);
        Ok(Self {
            config,
            classifiers,
        })
    }

    /// Add a custom classifier before or after the built-in cascade
    pub fn with_classifier<C>(mut self, classifier: C, placement: ClassifierPlacement) -> Self
    where
        C: TokenClassifier + 'static,
    {
        self.classifiers.push(Box::new(classifier), placement);
        self
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    pub fn classifiers(&self) -> &ClassifierChain {
        &self.classifiers
    }

    /// Read rows from any buffered text source
    ///
    /// Invalid UTF-8 surfaces as an [`LightCsvError::Io`] item.
    pub fn read<B: BufRead>(&self, source: B) -> Rows<'_, io::Lines<B>> {
        Rows::new(self, source.lines())
    }

    /// Read rows from an in-memory string
    pub fn read_str<'a>(&'a self, text: &'a str) -> Rows<'a, io::Lines<&'a [u8]>> {
        self.read(text.as_bytes())
    }

    /// Read rows from an iterator of lines (without line terminators)
    pub fn read_lines<I, S>(&self, lines: I) -> Rows<'_, impl Iterator<Item = io::Result<String>>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Rows::new(
            self,
            lines
                .into_iter()
                .map(|line| Ok::<String, io::Error>(line.into())),
        )
    }

    /// Open a UTF-8 file and read rows from it
    ///
    /// The returned iterator owns the file handle; dropping it closes the file.
    pub fn read_file(&self, path: &Path) -> Result<Rows<'_, io::Lines<BufReader<File>>>> {
        let file = File::open(path).map_err(|e| {
            LightCsvError::Io(io::Error::new(
                e.kind(),
                format!("Failed to open {}: {}", path.display(), e),
            ))
        })?;
        info!("Reading delimited file: {}", path.display());
        Ok(self.read(BufReader::new(file)))
    }
}

impl Default for LightCsvReader {
    fn default() -> Self {
        let config = ReaderConfig::default();
        let classifiers = ClassifierChain::new(config.quote_char, config.strict);
        Self {
            config,
            classifiers,
        }
    }
}

/// Lazy iterator over the rows of one read pass
///
/// Yields `Err` at most once; the pass is over after an error.
#[derive(Debug)]
pub struct Rows<'r, L> {
    lines: L,
    assembler: RowAssembler<'r>,
    line_number: usize,
    rows_emitted: usize,
}

impl<'r, L> Rows<'r, L>
where
    L: Iterator<Item = io::Result<String>>,
{
    fn new(reader: &'r LightCsvReader, lines: L) -> Self {
        Self {
            lines,
            assembler: RowAssembler::new(&reader.config, &reader.classifiers),
            line_number: 0,
            rows_emitted: 0,
        }
    }

    /// Key set of this pass, once the first non-blank line has been read
    pub fn keys(&self) -> Option<&[FieldKey]> {
        self.assembler.keys()
    }

    /// Number of physical lines consumed so far
    pub fn line_number(&self) -> usize {
        self.line_number
    }
}

impl<L> Iterator for Rows<'_, L>
where
    L: Iterator<Item = io::Result<String>>,
{
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.assembler.is_done() {
            return None;
        }

        loop {
            let Some(line) = self.lines.next() else {
                self.assembler.finish();
                debug!(
                    "Read pass finished: {} lines, {} rows",
                    self.line_number, self.rows_emitted
                );
                return None;
            };
            self.line_number += 1;

            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    self.assembler.finish();
                    return Some(Err(e.into()));
                }
            };
            let line = if self.line_number == 1 {
                line.strip_prefix(BOM).unwrap_or(&line)
            } else {
                &line
            };

            match self.assembler.feed(self.line_number, line) {
                Ok(Some(row)) => {
                    self.rows_emitted += 1;
                    trace!("Line {}: emitted row with {} values", self.line_number, row.len());
                    return Some(Ok(row));
                }
                Ok(None) => continue,
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

impl<L> FusedIterator for Rows<'_, L> where L: Iterator<Item = io::Result<String>> {}

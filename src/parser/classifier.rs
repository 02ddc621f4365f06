//! Token classification
//!
//! The built-in cascade tries each cell type in a fixed order and returns
//! the first match. Callers extend it by registering their own
//! [`TokenClassifier`]s before or after the built-in one.

use std::fmt;
use tracing::warn;

use super::field_parsers::{
    is_null, is_quoted, parse_date, parse_datetime, parse_float, parse_integer, parse_time,
    unquote,
};
use crate::error::{LightCsvError, Result};
use crate::models::CellValue;

/// Strategy turning a trimmed token into a typed value
///
/// Returning `None` passes the token on to the next classifier in the chain.
/// Closures of the shape `Fn(&str) -> Option<CellValue>` implement this trait.
pub trait TokenClassifier: Send + Sync {
    fn classify(&self, token: &str) -> Option<CellValue>;
}

impl<F> TokenClassifier for F
where
    F: Fn(&str) -> Option<CellValue> + Send + Sync,
{
    fn classify(&self, token: &str) -> Option<CellValue> {
        self(token)
    }
}

/// Where a custom classifier sits relative to the built-in cascade
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifierPlacement {
    /// Consulted first; can claim tokens the built-in cascade would accept
    BeforeBuiltin,
    /// Consulted only for tokens the built-in cascade does not recognize
    AfterBuiltin,
}

/// Built-in cascade: null, integer, float, quoted string, date, datetime, time
#[derive(Debug, Clone, Copy)]
pub struct BuiltinClassifier {
    quote_char: char,
}

impl BuiltinClassifier {
    pub fn new(quote_char: char) -> Self {
        Self { quote_char }
    }
}

impl TokenClassifier for BuiltinClassifier {
    fn classify(&self, token: &str) -> Option<CellValue> {
        if is_null(token) {
            return Some(CellValue::Null);
        }
        if let Some(value) = parse_integer(token) {
            return Some(CellValue::Integer(value));
        }
        if let Some(value) = parse_float(token) {
            return Some(CellValue::Float(value));
        }
        if is_quoted(token, self.quote_char) {
            return Some(CellValue::String(unquote(token, self.quote_char)));
        }
        if let Some(date) = parse_date(token) {
            return Some(CellValue::Date(date));
        }
        if let Some((datetime, offset)) = parse_datetime(token) {
            return Some(CellValue::DateTime { datetime, offset });
        }
        parse_time(token).map(CellValue::Time)
    }
}

/// Ordered classifiers plus the strict-mode fallback policy
pub struct ClassifierChain {
    before: Vec<Box<dyn TokenClassifier>>,
    builtin: BuiltinClassifier,
    after: Vec<Box<dyn TokenClassifier>>,
    quote_char: char,
    strict: bool,
}

impl ClassifierChain {
    pub fn new(quote_char: char, strict: bool) -> Self {
        Self {
            before: Vec::new(),
            builtin: BuiltinClassifier::new(quote_char),
            after: Vec::new(),
            quote_char,
            strict,
        }
    }

    /// Register a classifier; classifiers with the same placement run in
    /// registration order
    pub fn push(&mut self, classifier: Box<dyn TokenClassifier>, placement: ClassifierPlacement) {
        match placement {
            ClassifierPlacement::BeforeBuiltin => self.before.push(classifier),
            ClassifierPlacement::AfterBuiltin => self.after.push(classifier),
        }
    }

    fn classifiers(&self) -> impl Iterator<Item = &dyn TokenClassifier> {
        self.before
            .iter()
            .map(|c| c.as_ref())
            .chain(std::iter::once(&self.builtin as &dyn TokenClassifier))
            .chain(self.after.iter().map(|c| c.as_ref()))
    }

    /// Classify a raw token found on `line`
    ///
    /// Unrecognized tokens fail in strict mode and are kept verbatim (trimmed,
    /// quotes untouched) otherwise.
    pub fn classify(&self, line: usize, raw: &str) -> Result<CellValue> {
        let token = raw.trim();

        if let Some(value) = self.classifiers().find_map(|c| c.classify(token)) {
            return Ok(value);
        }

        if self.strict {
            return Err(LightCsvError::unrecognized_token(line, token));
        }

        warn!(
            "Line {}: keeping unrecognized value '{}' as text",
            line, token
        );
        Ok(CellValue::String(token.to_string()))
    }

    /// Header names are always text: quoted names are unquoted, anything
    /// else is taken as written
    pub fn header_name(&self, raw: &str) -> String {
        let token = raw.trim();
        if is_quoted(token, self.quote_char) {
            unquote(token, self.quote_char)
        } else {
            token.to_string()
        }
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }
}

impl fmt::Debug for ClassifierChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassifierChain")
            .field("before", &self.before.len())
            .field("builtin", &self.builtin)
            .field("after", &self.after.len())
            .field("strict", &self.strict)
            .finish()
    }
}

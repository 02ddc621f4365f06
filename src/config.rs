//! Reader configuration and validation.
//!
//! A [`ReaderConfig`] carries the separator and quote characters, optional
//! explicit field names and the strict/has-headers switches. It is validated
//! once when a reader is constructed and never changes afterwards.

use crate::constants::{
    DEFAULT_HAS_HEADERS, DEFAULT_QUOTE_CHAR, DEFAULT_SEPARATOR, DEFAULT_STRICT,
};
use crate::error::{LightCsvError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

/// Configuration for a [`crate::LightCsvReader`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// Field separator
    pub separator: char,

    /// Quote character; doubled inside a quoted field to escape itself
    pub quote_char: char,

    /// Explicit field names; mutually exclusive with `has_headers`
    pub field_names: Option<Vec<String>>,

    /// Fail on malformed lines, unknown values and arity mismatches
    pub strict: bool,

    /// Treat the first non-blank line as a header
    pub has_headers: bool,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR,
            quote_char: DEFAULT_QUOTE_CHAR,
            field_names: None,
            strict: DEFAULT_STRICT,
            has_headers: DEFAULT_HAS_HEADERS,
        }
    }
}

impl ReaderConfig {
    /// Load a configuration from a JSON file and validate it
    ///
    /// Missing keys fall back to their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: ReaderConfig = serde_json::from_str(&content).map_err(|e| {
            LightCsvError::configuration(format!(
                "Invalid configuration file {}: {}",
                path.display(),
                e
            ))
        })?;
        config.validate()?;
        debug!("Loaded reader configuration from {}", path.display());
        Ok(config)
    }

    /// Set the field separator
    pub fn with_separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    /// Set the quote character
    pub fn with_quote_char(mut self, quote_char: char) -> Self {
        self.quote_char = quote_char;
        self
    }

    /// Set explicit field names
    pub fn with_field_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.field_names = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Enable or disable strict mode
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Shorthand for `with_strict(false)`
    pub fn lenient(self) -> Self {
        self.with_strict(false)
    }

    /// Treat the first non-blank line as a header
    pub fn with_headers(mut self, has_headers: bool) -> Self {
        self.has_headers = has_headers;
        self
    }

    /// Check option consistency
    pub fn validate(&self) -> Result<()> {
        if self.separator == self.quote_char {
            return Err(LightCsvError::configuration(format!(
                "Separator and quote character must differ (both are {:?})",
                self.separator
            )));
        }

        for (name, ch) in [("separator", self.separator), ("quote_char", self.quote_char)] {
            if ch == '\n' || ch == '\r' {
                return Err(LightCsvError::configuration(format!(
                    "{} cannot be a line break",
                    name
                )));
            }
        }

        if let Some(names) = &self.field_names {
            if self.has_headers {
                return Err(LightCsvError::configuration(
                    "Cannot use field_names if has_headers is true",
                ));
            }

            if names.is_empty() {
                return Err(LightCsvError::configuration(
                    "field_names must contain at least one name",
                ));
            }

            let mut seen = HashSet::new();
            if let Some(duplicate) = names.iter().find(|name| !seen.insert(name.as_str())) {
                return Err(LightCsvError::configuration(format!(
                    "Duplicate field name '{}'",
                    duplicate
                )));
            }
        }

        Ok(())
    }
}

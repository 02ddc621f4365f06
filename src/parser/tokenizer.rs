//! Quote-aware line tokenizer
//!
//! Splits one logical line into raw field tokens. Quoted tokens keep their
//! wrapping quotes and doubled-quote escapes; unescaping happens during
//! classification. Text following a closing quote, other than padding and a
//! separator, ends the line; only an unterminated quote is an error.

use std::iter::FusedIterator;

/// Position of an unterminated quote within a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenizeError {
    /// 1-based character column where the problem starts
    pub column: usize,
}

/// Iterator over the raw tokens of a single line
///
/// Yields `Err` at most once, after which the iterator is exhausted.
#[derive(Debug, Clone)]
pub struct LineTokenizer<'a> {
    line: &'a str,
    separator: char,
    quote_char: char,
    position: usize,
    finished: bool,
}

impl<'a> LineTokenizer<'a> {
    pub fn new(line: &'a str, separator: char, quote_char: char) -> Self {
        Self {
            line,
            separator,
            quote_char,
            position: 0,
            finished: false,
        }
    }

    /// Skip whitespace that is not the separator itself
    fn skip_padding(&self, from: usize) -> usize {
        let rest = &self.line[from..];
        let separator = self.separator;
        let trimmed = rest.trim_start_matches(|c: char| c.is_whitespace() && c != separator);
        from + (rest.len() - trimmed.len())
    }

    fn column_at(&self, offset: usize) -> usize {
        self.line[..offset].chars().count() + 1
    }

    fn fail(&mut self, offset: usize) -> Option<Result<&'a str, TokenizeError>> {
        self.finished = true;
        Some(Err(TokenizeError {
            column: self.column_at(offset),
        }))
    }

    /// Byte length of the quoted span starting at `start`, closing quote included
    fn quoted_span_len(&self, start: usize) -> Option<usize> {
        let quote = self.quote_char;
        let mut chars = self.line[start..].char_indices().skip(1).peekable();

        while let Some((index, c)) = chars.next() {
            if c != quote {
                continue;
            }
            if matches!(chars.peek(), Some(&(_, next)) if next == quote) {
                chars.next();
                continue;
            }
            return Some(index + c.len_utf8());
        }

        None
    }
}

impl<'a> Iterator for LineTokenizer<'a> {
    type Item = Result<&'a str, TokenizeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let line = self.line;
        let start = self.skip_padding(self.position);
        let field = &line[start..];

        if field.starts_with(self.quote_char) {
            let Some(span_len) = self.quoted_span_len(start) else {
                return self.fail(start);
            };
            let token = &field[..span_len];

            // Anything but a separator after the closing quote ends the line
            let after = self.skip_padding(start + span_len);
            match line[after..].chars().next() {
                Some(c) if c == self.separator => self.position = after + c.len_utf8(),
                _ => self.finished = true,
            }

            return Some(Ok(token));
        }

        match field.find(self.separator) {
            Some(len) => {
                self.position = start + len + self.separator.len_utf8();
                Some(Ok(&field[..len]))
            }
            None => {
                self.finished = true;
                Some(Ok(field))
            }
        }
    }
}

impl FusedIterator for LineTokenizer<'_> {}

/// Tokenize a whole line, stopping at the first malformed field
pub fn tokenize(
    line: &str,
    separator: char,
    quote_char: char,
) -> Result<Vec<&str>, TokenizeError> {
    LineTokenizer::new(line, separator, quote_char).collect()
}

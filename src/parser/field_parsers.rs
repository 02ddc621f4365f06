//! Field parsing utilities for raw tokens
//!
//! Pure predicates and parsers, one per cell type. Every function expects a
//! token that has already been trimmed.

use crate::constants::DATETIME_SEPARATORS;
use chrono::format::{Parsed, StrftimeItems, parse};
use chrono::{FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMATS: [&str; 2] = ["%H:%M:%S%.f", "%H:%M"];
const OFFSET_FORMATS: [&str; 3] = ["%:z", "%z", "%#z"];

/// Empty or all-whitespace token
pub fn is_null(token: &str) -> bool {
    token.trim().is_empty()
}

/// `[-+]?[0-9]+`, anchored to the whole token
pub fn is_integer(token: &str) -> bool {
    let digits = token.strip_prefix(['+', '-']).unwrap_or(token);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Parse an integer-shaped token; `None` if it does not fit in i64
pub fn parse_integer(token: &str) -> Option<i64> {
    if is_integer(token) {
        token.parse::<i64>().ok()
    } else {
        None
    }
}

pub fn parse_float(token: &str) -> Option<f64> {
    token.parse::<f64>().ok()
}

/// At least two characters, starting and ending with the quote character
pub fn is_quoted(token: &str, quote_char: char) -> bool {
    let mut chars = token.chars();
    matches!(
        (chars.next(), chars.next_back()),
        (Some(first), Some(last)) if first == quote_char && last == quote_char
    )
}

/// Strip the outer quotes and collapse doubled quotes
pub fn unquote(token: &str, quote_char: char) -> String {
    let width = quote_char.len_utf8();
    let inner = &token[width..token.len() - width];
    let doubled: String = [quote_char, quote_char].iter().collect();
    inner.replace(&doubled, quote_char.encode_utf8(&mut [0; 4]))
}

fn all_digits(bytes: Option<&[u8]>) -> bool {
    bytes.is_some_and(|bytes| bytes.iter().all(u8::is_ascii_digit))
}

// chrono accepts single-digit fields; these guards pin the zero-padded forms
fn has_date_shape(token: &str) -> bool {
    let bytes = token.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

fn has_time_shape(token: &str) -> bool {
    let bytes = token.as_bytes();
    let hour_minute = all_digits(bytes.get(0..2))
        && bytes.get(2) == Some(&b':')
        && all_digits(bytes.get(3..5));

    match bytes.len() {
        5 => hour_minute,
        8 => hour_minute && bytes[5] == b':' && all_digits(bytes.get(6..8)),
        len if len > 8 => {
            hour_minute && bytes[5] == b':' && all_digits(bytes.get(6..8)) && bytes[8] == b'.'
        }
        _ => false,
    }
}

/// `YYYY-MM-DD`
pub fn parse_date(token: &str) -> Option<NaiveDate> {
    if !has_date_shape(token) {
        return None;
    }
    NaiveDate::parse_from_str(token, DATE_FORMAT).ok()
}

/// `HH:MM` or `HH:MM:SS[.fraction]`
pub fn parse_time(token: &str) -> Option<NaiveTime> {
    if !has_time_shape(token) {
        return None;
    }
    TIME_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(token, format).ok())
}

/// `Z`, `+HH:MM`, `+HHMM` or `+HH` (and the `-` forms); `Some(None)` when absent
fn parse_offset(text: &str) -> Option<Option<FixedOffset>> {
    match text {
        "" => Some(None),
        "Z" | "z" => Some(FixedOffset::east_opt(0)),
        _ => OFFSET_FORMATS
            .iter()
            .find_map(|format| {
                let mut parsed = Parsed::new();
                parse(&mut parsed, text, StrftimeItems::new(format)).ok()?;
                parsed.to_fixed_offset().ok()
            })
            .map(Some),
    }
}

/// Date, a `T`/space separator, a time of day and an optional UTC offset
pub fn parse_datetime(token: &str) -> Option<(NaiveDateTime, Option<FixedOffset>)> {
    let date = parse_date(token.get(..10)?)?;

    let mut rest = token[10..].chars();
    if !DATETIME_SEPARATORS.contains(&rest.next()?) {
        return None;
    }
    let rest = rest.as_str();

    let (time_text, offset_text) = match rest.find(['+', '-', 'Z', 'z']) {
        Some(index) => rest.split_at(index),
        None => (rest, ""),
    };
    let time = parse_time(time_text)?;
    let offset = parse_offset(offset_text)?;

    Some((date.and_time(time), offset))
}

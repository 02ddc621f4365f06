//! Default values shared by the reader configuration and the CLI.

/// Default field separator
pub const DEFAULT_SEPARATOR: char = ',';

/// Default quote character
pub const DEFAULT_QUOTE_CHAR: char = '"';

/// Strict mode is on unless explicitly disabled
pub const DEFAULT_STRICT: bool = true;

/// The first line is data unless headers are requested
pub const DEFAULT_HAS_HEADERS: bool = false;

/// Separator between date and time accepted in combined datetime values
pub const DATETIME_SEPARATORS: [char; 3] = ['T', 't', ' '];

/// Log target used when building the default `EnvFilter`
pub const LOG_TARGET: &str = "lightcsv";

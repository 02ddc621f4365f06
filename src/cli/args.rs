//! Command-line argument definitions for the lightcsv binary
//!
//! Defines the CLI interface using the clap derive API. Reader options are
//! shared by every subcommand and layered over an optional JSON config file.

use crate::config::ReaderConfig;
use crate::error::{LightCsvError, Result};
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::str::FromStr;

/// CLI arguments for the lightcsv reader
///
/// Reads delimited text and prints every row with a typed value per cell.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "lightcsv",
    version,
    about = "Read delimited text and infer a type for every cell",
    long_about = "Reads CSV-like text line by line, splits each line honoring quotes and \
                  classifies every cell as null, integer, float, string, date, datetime or time. \
                  Rows are printed as human-readable listings, JSON lines or normalized CSV.",
    arg_required_else_help = true
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Read a file (or stdin) and print typed rows
    Read(ReadArgs),
    /// Classify individual values and print their inferred types
    Classify(ClassifyArgs),
}

/// Options controlling how lines are split and typed
#[derive(Debug, Clone, ClapArgs)]
pub struct ReaderArgs {
    /// Field separator (single character)
    #[arg(short = 's', long = "separator", value_name = "CHAR")]
    pub separator: Option<char>,

    /// Quote character (single character)
    #[arg(long = "quote", value_name = "CHAR")]
    pub quote_char: Option<char>,

    /// Explicit field names as a comma-separated list
    #[arg(
        short = 'n',
        long = "field-names",
        value_name = "LIST",
        conflicts_with = "has_headers"
    )]
    pub field_names: Option<FieldNameList>,

    /// Treat the first non-blank line as a header
    #[arg(short = 'H', long = "has-headers")]
    pub has_headers: bool,

    /// Degrade malformed input to null/text instead of failing
    #[arg(long = "lenient")]
    pub lenient: bool,

    /// Reader configuration file (JSON); flags override its values
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_file: Option<PathBuf>,
}

impl ReaderArgs {
    /// Build the reader configuration from the config file and flags
    pub fn to_config(&self) -> Result<ReaderConfig> {
        let mut config = match &self.config_file {
            Some(path) => ReaderConfig::from_json_file(path)?,
            None => ReaderConfig::default(),
        };

        if let Some(separator) = self.separator {
            config = config.with_separator(separator);
        }
        if let Some(quote_char) = self.quote_char {
            config = config.with_quote_char(quote_char);
        }
        if let Some(names) = &self.field_names {
            config = config.with_field_names(names.names.iter().cloned());
        }
        if self.has_headers {
            config = config.with_headers(true);
        }
        if self.lenient {
            config = config.lenient();
        }

        config.validate()?;
        Ok(config)
    }
}

/// Arguments for the read command
#[derive(Debug, Clone, Parser)]
pub struct ReadArgs {
    /// Input file; reads stdin when omitted or `-`
    #[arg(value_name = "FILE")]
    pub input: Option<PathBuf>,

    #[command(flatten)]
    pub reader: ReaderArgs,

    /// Output format
    #[arg(long = "format", value_enum, default_value = "human")]
    pub output_format: OutputFormat,

    /// Stop after this many rows
    #[arg(long = "limit", value_name = "N")]
    pub limit: Option<usize>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Only show errors
    #[arg(short = 'q', long = "quiet", conflicts_with = "verbose")]
    pub quiet: bool,
}

impl ReadArgs {
    /// Input path, `None` meaning stdin
    pub fn input_path(&self) -> Option<&PathBuf> {
        self.input.as_ref().filter(|path| path.as_os_str() != "-")
    }

    pub fn get_log_level(&self) -> &'static str {
        log_level(self.verbose, self.quiet)
    }
}

/// Arguments for the classify command
#[derive(Debug, Clone, Parser)]
pub struct ClassifyArgs {
    /// Values to classify, exactly as they would appear in a field
    #[arg(value_name = "VALUE", required = true, allow_hyphen_values = true)]
    pub values: Vec<String>,

    #[command(flatten)]
    pub reader: ReaderArgs,

    /// Output format
    #[arg(long = "format", value_enum, default_value = "human")]
    pub output_format: OutputFormat,

    /// Logging verbosity level
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl ClassifyArgs {
    pub fn get_log_level(&self) -> &'static str {
        log_level(self.verbose, false)
    }
}

fn log_level(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Output format for printed rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable listing
    Human,
    /// One JSON object per line
    Json,
    /// Normalized delimited text
    Csv,
}

/// Wrapper for parsing comma-separated field names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldNameList {
    pub names: Vec<String>,
}

impl FromStr for FieldNameList {
    type Err = LightCsvError;

    fn from_str(s: &str) -> Result<Self> {
        let names: Vec<String> = s.split(',').map(|name| name.trim().to_string()).collect();

        if names.iter().any(String::is_empty) {
            return Err(LightCsvError::configuration(format!(
                "Empty field name in list '{}'",
                s
            )));
        }

        Ok(FieldNameList { names })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_read_command() {
        let args = Args::try_parse_from([
            "lightcsv", "read", "data.csv", "-s", ";", "--has-headers", "--lenient", "--format",
            "json",
        ])
        .unwrap();

        let Commands::Read(read) = args.command else {
            panic!("Expected read command");
        };
        assert_eq!(read.input_path(), Some(&PathBuf::from("data.csv")));
        assert_eq!(read.output_format, OutputFormat::Json);

        let config = read.reader.to_config().unwrap();
        assert_eq!(config.separator, ';');
        assert!(config.has_headers);
        assert!(!config.strict);
    }

    #[test]
    fn test_stdin_dash() {
        let args = Args::try_parse_from(["lightcsv", "read", "-"]).unwrap();
        let Commands::Read(read) = args.command else {
            panic!("Expected read command");
        };
        assert_eq!(read.input_path(), None);
        assert_eq!(read.get_log_level(), "warn");
    }

    #[test]
    fn test_field_names_conflict_with_headers() {
        let result = Args::try_parse_from([
            "lightcsv",
            "read",
            "--field-names",
            "a,b",
            "--has-headers",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_field_name_list() {
        let list: FieldNameList = "id, name ,score".parse().unwrap();
        assert_eq!(list.names, vec!["id", "name", "score"]);
        assert!("a,,b".parse::<FieldNameList>().is_err());
    }

    #[test]
    fn test_classify_accepts_negative_values() {
        let args = Args::try_parse_from(["lightcsv", "classify", "-7", "2.5", "-vv"]).unwrap();
        let Commands::Classify(classify) = args.command else {
            panic!("Expected classify command");
        };
        assert_eq!(classify.values, vec!["-7", "2.5"]);
        assert_eq!(classify.get_log_level(), "debug");
    }

    #[test]
    fn test_log_levels() {
        assert_eq!(log_level(0, false), "warn");
        assert_eq!(log_level(3, false), "trace");
        assert_eq!(log_level(2, true), "error");
    }
}

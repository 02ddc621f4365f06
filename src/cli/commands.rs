//! Command implementations for the lightcsv binary

use anyhow::{Context, Result};
use colored::*;
use serde_json::json;
use std::io::{self, BufWriter, Write};
use tracing::{debug, info};

use crate::cli::args::{Args, ClassifyArgs, Commands, OutputFormat, ReadArgs};
use crate::config::ReaderConfig;
use crate::constants::LOG_TARGET;
use crate::models::{CellKind, CellValue, FieldKey, Row};
use crate::reader::{LightCsvReader, Rows};

/// Summary of a completed command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub rows_written: usize,
    pub lines_read: usize,
}

/// Main entry point for command execution
pub fn run(args: Args) -> Result<RunSummary> {
    match args.command {
        Commands::Read(read_args) => run_read(read_args),
        Commands::Classify(classify_args) => run_classify(classify_args),
    }
}

/// Read a file or stdin and print every row
pub fn run_read(args: ReadArgs) -> Result<RunSummary> {
    setup_logging(args.get_log_level(), args.quiet);

    let config = args
        .reader
        .to_config()
        .context("Invalid reader configuration")?;
    debug!("Reader configuration: {:?}", config);
    let reader = LightCsvReader::new(config)?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    let summary = match args.input_path() {
        Some(path) => {
            let rows = reader.read_file(path)?;
            write_rows(rows, args.output_format, args.limit, reader.config(), &mut out)?
        }
        None => {
            info!("Reading from stdin");
            let stdin = io::stdin();
            let rows = reader.read(stdin.lock());
            write_rows(rows, args.output_format, args.limit, reader.config(), &mut out)?
        }
    };
    out.flush().context("Failed to flush output")?;

    info!(
        "Wrote {} rows from {} lines",
        summary.rows_written, summary.lines_read
    );
    Ok(summary)
}

/// Write rows in the requested format, stopping after `limit` rows
pub fn write_rows<L, W>(
    mut rows: Rows<'_, L>,
    format: OutputFormat,
    limit: Option<usize>,
    config: &ReaderConfig,
    out: &mut W,
) -> Result<RunSummary>
where
    L: Iterator<Item = io::Result<String>>,
    W: Write,
{
    let mut written = 0;

    while limit.is_none_or(|limit| written < limit) {
        let Some(row) = rows.next() else {
            break;
        };
        let row = row.with_context(|| format!("Failed to read input after {} rows", written))?;

        if written == 0 && format == OutputFormat::Csv {
            if let Some(keys) = rows.keys() {
                write_csv_header(keys, config, out)?;
            }
        }

        match format {
            OutputFormat::Human => write_human_row(written + 1, &row, out)?,
            OutputFormat::Json => {
                serde_json::to_writer(&mut *out, &row)?;
                writeln!(out)?;
            }
            OutputFormat::Csv => write_csv_row(&row, config, out)?,
        }
        written += 1;
    }

    Ok(RunSummary {
        rows_written: written,
        lines_read: rows.line_number(),
    })
}

/// Header line for CSV output, written only for named columns
fn write_csv_header<W: Write>(
    keys: &[FieldKey],
    config: &ReaderConfig,
    out: &mut W,
) -> Result<()> {
    if !keys.iter().all(|key| matches!(key, FieldKey::Name(_))) {
        return Ok(());
    }

    let names: Vec<String> = keys
        .iter()
        .map(|key| CellValue::String(key.to_string()).to_field(config.quote_char))
        .collect();
    writeln!(out, "{}", names.join(&config.separator.to_string()))?;
    Ok(())
}

fn write_csv_row<W: Write>(row: &Row, config: &ReaderConfig, out: &mut W) -> Result<()> {
    let fields: Vec<String> = row
        .values()
        .map(|value| value.to_field(config.quote_char))
        .collect();
    writeln!(out, "{}", fields.join(&config.separator.to_string()))?;
    Ok(())
}

fn write_human_row<W: Write>(number: usize, row: &Row, out: &mut W) -> Result<()> {
    let cells: Vec<String> = row
        .iter()
        .map(|(key, value)| format!("{}={}", key.to_string().cyan(), colorize(value)))
        .collect();
    writeln!(out, "{} {}", format!("[{}]", number).dimmed(), cells.join("  "))?;
    Ok(())
}

fn colorize(value: &CellValue) -> ColoredString {
    let text = match value {
        CellValue::Null => "null".to_string(),
        CellValue::String(_) => value.to_field('"'),
        other => other.to_string(),
    };

    match value.kind() {
        CellKind::Null => text.dimmed(),
        CellKind::Integer | CellKind::Float => text.yellow(),
        CellKind::String => text.green(),
        CellKind::Date | CellKind::DateTime | CellKind::Time => text.blue(),
    }
}

/// Classify each value on the command line and print its kind
pub fn run_classify(args: ClassifyArgs) -> Result<RunSummary> {
    setup_logging(args.get_log_level(), false);

    let config = args
        .reader
        .to_config()
        .context("Invalid reader configuration")?;
    let reader = LightCsvReader::new(config)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let failures = classify_values(&reader, &args.values, args.output_format, &mut out)?;

    if failures > 0 {
        anyhow::bail!(
            "{} of {} values could not be classified",
            failures,
            args.values.len()
        );
    }

    Ok(RunSummary {
        rows_written: args.values.len(),
        lines_read: 0,
    })
}

/// Classify values one by one; returns the number that failed
pub fn classify_values<W: Write>(
    reader: &LightCsvReader,
    values: &[String],
    format: OutputFormat,
    out: &mut W,
) -> Result<usize> {
    let classifiers = reader.classifiers();
    let quote_char = reader.config().quote_char;
    let mut failures = 0;
    debug!(
        "Classifying {} values (strict: {})",
        values.len(),
        classifiers.is_strict()
    );

    for input in values {
        match (classifiers.classify(1, input), format) {
            (Ok(value), OutputFormat::Json) => {
                let record = json!({
                    "input": input,
                    "kind": value.kind().as_str(),
                    "value": value,
                });
                writeln!(out, "{}", record)?;
            }
            (Ok(value), OutputFormat::Csv) => {
                writeln!(out, "{}", value.to_field(quote_char))?;
            }
            (Ok(value), OutputFormat::Human) => {
                writeln!(
                    out,
                    "{:<24} {:<9} {}",
                    input,
                    value.kind().as_str().bold(),
                    colorize(&value)
                )?;
            }
            (Err(e), OutputFormat::Json) => {
                failures += 1;
                let record = json!({ "input": input, "error": e.to_string() });
                writeln!(out, "{}", record)?;
            }
            (Err(e), _) => {
                failures += 1;
                writeln!(out, "{:<24} {}", input, e.to_string().red())?;
            }
        }
    }

    Ok(failures)
}

/// Set up logging on stderr, honoring `RUST_LOG` when present
fn setup_logging(log_level: &str, quiet: bool) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{}={}", LOG_TARGET, log_level)));

    let layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_writer(std::io::stderr);

    // try_init: tests may install a subscriber more than once
    let result = if quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(layer.compact().without_time())
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(layer.with_timer(fmt::time::uptime()))
            .try_init()
    };

    if result.is_err() {
        debug!("Logging already initialized");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(
        input: &str,
        config: ReaderConfig,
        format: OutputFormat,
        limit: Option<usize>,
    ) -> (String, RunSummary) {
        colored::control::set_override(false);
        let reader = LightCsvReader::new(config).unwrap();
        let mut out = Vec::new();
        let rows = reader.read_str(input);
        let summary = write_rows(rows, format, limit, reader.config(), &mut out).unwrap();
        (String::from_utf8(out).unwrap(), summary)
    }

    #[test]
    fn test_json_lines_output() {
        let config = ReaderConfig::default().with_headers(true);
        let (output, summary) = render("a,b\n1,\"x\"\n,2.5\n", config, OutputFormat::Json, None);

        assert_eq!(output, "{\"a\":1,\"b\":\"x\"}\n{\"a\":null,\"b\":2.5}\n");
        assert_eq!(summary, RunSummary { rows_written: 2, lines_read: 3 });
    }

    #[test]
    fn test_csv_output_with_header() {
        let config = ReaderConfig::default().with_headers(true);
        let (output, _) = render(
            "name,when\n\"a \"\"b\"\"\",2021-02-05 23:50:12\n",
            config,
            OutputFormat::Csv,
            None,
        );

        assert_eq!(output, "\"name\",\"when\"\n\"a \"\"b\"\"\",2021-02-05T23:50:12\n");
    }

    #[test]
    fn test_csv_output_positional_has_no_header() {
        let (output, _) = render("1,2.0\n", ReaderConfig::default(), OutputFormat::Csv, None);
        assert_eq!(output, "1,2.0\n");
    }

    #[test]
    fn test_limit_stops_early() {
        let (output, summary) = render(
            "1\n2\n3\n",
            ReaderConfig::default(),
            OutputFormat::Csv,
            Some(2),
        );
        assert_eq!(output, "1\n2\n");
        assert_eq!(summary.rows_written, 2);
        assert_eq!(summary.lines_read, 2);
    }

    #[test]
    fn test_human_output() {
        let config = ReaderConfig::default().with_field_names(["id", "name"]);
        let (output, _) = render("7,\"Ada\"\n", config, OutputFormat::Human, None);
        assert_eq!(output, "[1] id=7  name=\"Ada\"\n");
    }

    #[test]
    fn test_read_error_is_reported_with_context() {
        let reader = LightCsvReader::default();
        let mut out = Vec::new();
        let error = write_rows(
            reader.read_str("1,2\n3\n"),
            OutputFormat::Json,
            None,
            reader.config(),
            &mut out,
        )
        .unwrap_err();

        let message = format!("{:#}", error);
        assert!(message.contains("after 1 rows"));
        assert!(message.contains("Line 2 has 1 values, expected 2"));
    }

    #[test]
    fn test_classify_values() {
        colored::control::set_override(false);
        let reader = LightCsvReader::default();
        let values: Vec<String> = ["42", "\"hi\"", "hello"].iter().map(|s| s.to_string()).collect();
        let mut out = Vec::new();

        let failures = classify_values(&reader, &values, OutputFormat::Json, &mut out).unwrap();
        let output = String::from_utf8(out).unwrap();
        let lines: Vec<serde_json::Value> = output
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();

        assert_eq!(failures, 1);
        assert_eq!(lines[0]["kind"], "integer");
        assert_eq!(lines[0]["value"], 42);
        assert_eq!(lines[1]["value"], "hi");
        assert!(lines[2]["error"].as_str().unwrap().contains("cannot classify value"));
    }
}

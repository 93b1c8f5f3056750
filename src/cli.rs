use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about = "Probe delimited files and infer column data kinds", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Scan a delimited file and infer one feature descriptor per column
    Probe(ProbeArgs),
    /// List the columns of a saved feature descriptor file
    Columns(ColumnsArgs),
    /// Show the parse mask and best-guess conversion for literal values
    Kinds(KindsArgs),
    /// Preview rows converted through inferred or saved descriptors
    Preview(PreviewArgs),
}

#[derive(Debug, Args)]
pub struct ProbeArgs {
    /// Input delimited file to inspect ('-' reads stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Destination feature file; prints to stdout when omitted
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// Number of data rows to sample when inferring kinds (0 means full scan)
    #[arg(long, default_value_t = 2000)]
    pub sample_rows: usize,
    /// Zero-based row index holding column names (defaults to the first row)
    #[arg(long = "header-row")]
    pub header_row: Option<usize>,
    /// Treat the input as headerless and synthesize column names
    #[arg(long)]
    pub no_header: bool,
    /// Zero-based row index where data begins
    #[arg(long = "data-start")]
    pub data_start: Option<usize>,
    /// Prefix for synthesized column names
    #[arg(long = "name-prefix", default_value = "column")]
    pub name_prefix: String,
    /// Delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// Emit the descriptors as JSON instead of YAML
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct ColumnsArgs {
    /// Feature descriptor file to list
    #[arg(short = 's', long = "schema")]
    pub schema: PathBuf,
}

#[derive(Debug, Args)]
pub struct KindsArgs {
    /// Literal values to classify
    #[arg(required = true)]
    pub values: Vec<String>,
}

#[derive(Debug, Args)]
pub struct PreviewArgs {
    /// Input delimited file to preview
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Feature descriptor file; inferred from the input when omitted
    #[arg(short = 's', long = "schema")]
    pub schema: Option<PathBuf>,
    /// Number of data rows to display
    #[arg(long, default_value_t = 10)]
    pub rows: usize,
    /// Treat the input as headerless
    #[arg(long)]
    pub no_header: bool,
    /// Delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delimiter_tokens_resolve_to_bytes() {
        assert_eq!(parse_delimiter("tab"), Ok(b'\t'));
        assert_eq!(parse_delimiter(";"), Ok(b';'));
        assert_eq!(parse_delimiter("x"), Ok(b'x'));
        assert!(parse_delimiter("").is_err());
        assert!(parse_delimiter("ab").is_err());
    }
}

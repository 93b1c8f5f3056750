pub mod cli;
pub mod convert;
pub mod descriptor;
pub mod error;
pub mod infer;
pub mod io_utils;
pub mod kind;
pub mod rows;
pub mod scan;
pub mod table;
pub mod value;

use std::{env, path::Path, sync::OnceLock};

use anyhow::{Context, Result, bail};
use clap::Parser;
use log::{LevelFilter, info};

use crate::{
    cli::{Cli, ColumnsArgs, Commands, KindsArgs, PreviewArgs, ProbeArgs},
    convert::{convert_to_object, get_data_kind},
    descriptor::FeatureSet,
    rows::{DelimitedRowSource, RowSource, parse_typed_row},
    scan::ScanLayout,
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("tabtype", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Probe(args) => handle_probe(&args),
        Commands::Columns(args) => handle_columns(&args),
        Commands::Kinds(args) => handle_kinds(&args),
        Commands::Preview(args) => handle_preview(&args),
    }
}

fn open_source(
    path: &Path,
    delimiter: Option<u8>,
    encoding_label: Option<&str>,
) -> Result<DelimitedRowSource<Box<dyn std::io::Read>>> {
    let delimiter = io_utils::resolve_delimiter(path, delimiter);
    let encoding = io_utils::resolve_encoding(encoding_label)?;
    let input = io_utils::open_input(path)?;
    Ok(DelimitedRowSource::new(input, delimiter, encoding))
}

fn probe_layout(args: &ProbeArgs) -> ScanLayout {
    let header_row = if args.no_header {
        None
    } else {
        args.header_row.or(Some(0))
    };
    ScanLayout {
        header_row,
        data_start_row: args.data_start,
        max_rows: (args.sample_rows > 0).then_some(args.sample_rows),
        name_prefix: args.name_prefix.clone(),
    }
}

fn handle_probe(args: &ProbeArgs) -> Result<()> {
    info!("Probing '{}'", args.input.display());
    let layout = probe_layout(args);
    let source = open_source(args.input.as_path(), args.delimiter, args.input_encoding.as_deref())?;
    let columns = scan::scan_columns(source, &layout)
        .with_context(|| format!("Scanning {:?}", args.input))?;
    let set = FeatureSet::new(columns);

    let rendered = if args.json {
        set.to_json_string()?
    } else {
        set.to_yaml_string()?
    };
    match &args.output {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("Writing feature file {path:?}"))?;
            info!(
                "Inferred {} column(s) written to {:?}",
                set.columns.len(),
                path
            );
        }
        None => print!("{rendered}"),
    }
    Ok(())
}

fn handle_columns(args: &ColumnsArgs) -> Result<()> {
    let set = FeatureSet::load(&args.schema)
        .with_context(|| format!("Loading features from {:?}", args.schema))?;
    if set.columns.is_empty() {
        info!("Feature file {:?} does not define any columns", args.schema);
        return Ok(());
    }

    let headers = ["#", "name", "kind", "scale", "possible"]
        .map(str::to_string)
        .to_vec();
    let rows: Vec<Vec<String>> = set
        .columns
        .iter()
        .enumerate()
        .map(|(idx, column)| {
            vec![
                (idx + 1).to_string(),
                column.name().to_string(),
                column.kind().to_string(),
                column.scale().to_string(),
                column.possible_kinds().to_string(),
            ]
        })
        .collect();
    table::print_table(&headers, &rows);
    info!("Listed {} column(s) from {:?}", set.columns.len(), args.schema);
    Ok(())
}

fn handle_kinds(args: &KindsArgs) -> Result<()> {
    let headers = ["value", "possible", "best", "kind"]
        .map(str::to_string)
        .to_vec();
    let rows: Vec<Vec<String>> = args
        .values
        .iter()
        .map(|raw| {
            let trimmed = raw.trim();
            let mask = get_data_kind(trimmed);
            let best = convert_to_object(trimmed);
            vec![
                raw.clone(),
                mask.to_string(),
                best.render(),
                best.kind().to_string(),
            ]
        })
        .collect();
    table::print_table(&headers, &rows);
    Ok(())
}

fn handle_preview(args: &PreviewArgs) -> Result<()> {
    let set = match &args.schema {
        Some(path) => {
            FeatureSet::load(path).with_context(|| format!("Loading features from {path:?}"))?
        }
        None => {
            if io_utils::is_dash(&args.input) {
                bail!("Previewing stdin requires --schema, the input cannot be read twice");
            }
            let layout = if args.no_header {
                ScanLayout::headerless()
            } else {
                ScanLayout::default()
            };
            let source =
                open_source(args.input.as_path(), args.delimiter, args.input_encoding.as_deref())?;
            FeatureSet::new(
                scan::scan_columns(source, &layout)
                    .with_context(|| format!("Scanning {:?}", args.input))?,
            )
        }
    };

    let mut source =
        open_source(args.input.as_path(), args.delimiter, args.input_encoding.as_deref())?;
    if !args.no_header {
        // Skip the header row; names come from the feature set.
        source.next_row()?;
    }

    let mut rows = Vec::with_capacity(args.rows);
    while rows.len() < args.rows {
        let Some(raw) = source.next_row()? else { break };
        let typed = parse_typed_row(&set.columns, &raw)
            .with_context(|| format!("Converting preview row {}", rows.len() + 1))?;
        rows.push(
            typed
                .iter()
                .map(|cell| cell.as_ref().map(|value| value.render()).unwrap_or_default())
                .collect(),
        );
    }

    table::print_table(&set.headers(), &rows);
    info!(
        "Previewed {} row(s) across {} column(s)",
        rows.len(),
        set.columns.len()
    );
    Ok(())
}

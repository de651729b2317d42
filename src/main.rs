//! csvdiff - Positional diff for tabular data

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::debug;

use csvdiff::config::{Config, FieldSelection, OutputFormat};
use csvdiff::diff::DiffEngine;
use csvdiff::model::FieldSelector;
use csvdiff::output::render_to_stdout;
use csvdiff::parser::parse_table;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliOutputFormat {
    Terminal,
    Json,
    Unified,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(f: CliOutputFormat) -> Self {
        match f {
            CliOutputFormat::Terminal => OutputFormat::Terminal,
            CliOutputFormat::Json => OutputFormat::Json,
            CliOutputFormat::Unified => OutputFormat::Unified,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ColorMode {
    Auto,
    Always,
    Never,
}

/// Compare two CSV files field by field and row by row
#[derive(Parser, Debug)]
#[command(name = "csvdiff")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// First file to compare
    old_file: PathBuf,

    /// Second file to compare
    new_file: PathBuf,

    /// First row of data represents field labels
    #[arg(short, long)]
    label: bool,

    /// Fields to skip (comma separated, use @field_number or field_label if using -l)
    #[arg(short, long, conflicts_with = "only_fields")]
    skip_fields: Option<String>,

    /// Use only these fields (same syntax as skip)
    #[arg(short, long)]
    only_fields: Option<String>,

    /// Ignore case when comparing field names and data
    #[arg(short, long)]
    ignore_case: bool,

    /// Ignore the order of the columns if using labels
    #[arg(short = 'g', long, requires = "label")]
    ignore_order: bool,

    /// Level of verbosity to use
    #[arg(short, long, default_value_t = 2)]
    verbosity: u8,

    /// Output format
    #[arg(short, long, value_enum, default_value = "terminal")]
    format: CliOutputFormat,

    /// Only show statistics, not detailed changes
    #[arg(long)]
    stats_only: bool,

    /// When to color terminal output
    #[arg(long, value_enum, default_value = "auto")]
    color: ColorMode,

    /// Field delimiter (defaults to tab for .tsv files, comma otherwise)
    #[arg(long, value_parser = parse_delimiter)]
    delimiter: Option<u8>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn parse_delimiter(s: &str) -> std::result::Result<u8, String> {
    match s {
        "\\t" | "tab" => Ok(b'\t'),
        _ if s.len() == 1 && s.is_ascii() => Ok(s.as_bytes()[0]),
        _ => Err(format!("delimiter must be a single ASCII character, got '{}'", s)),
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(has_changes) => {
            if has_changes {
                ExitCode::from(1) // Differences found
            } else {
                ExitCode::SUCCESS // No differences
            }
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn run() -> Result<bool> {
    let cli = Cli::parse();

    let level = if cli.debug {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    let skip = parse_selectors(cli.skip_fields.as_deref())?;
    let only = parse_selectors(cli.only_fields.as_deref())?;

    let mut config = Config::new(cli.old_file, cli.new_file)
        .with_label_first_row(cli.label)
        .with_ignore_case(cli.ignore_case)
        .with_ignore_order(cli.ignore_order)
        .with_fields(FieldSelection::from_lists(skip, only)?)
        .with_verbosity(cli.verbosity)
        .with_output_format(cli.format.into())
        .with_stats_only(cli.stats_only);
    if let Some(d) = cli.delimiter {
        config = config.with_delimiter(d);
    }
    config.validate()?;
    debug!("{:?}", config);

    // Parse files
    let old_table = parse_table(&config.old_file, &config)
        .with_context(|| format!("Failed to parse old file: {}", config.old_file.display()))?;
    let new_table = parse_table(&config.new_file, &config)
        .with_context(|| format!("Failed to parse new file: {}", config.new_file.display()))?;

    let options = config.diff_options(old_table.schema(), new_table.schema())?;
    let mut engine = DiffEngine::new(old_table, new_table, options)?;

    // Handle stats-only mode
    if config.stats_only {
        let diff = engine.diff()?;
        println!("Old file: {}", config.old_file.display());
        println!("New file: {}", config.new_file.display());
        println!();
        if diff.rows_skipped {
            println!("Fields changed: {}", diff.schema.len());
            println!("Rows not compared");
        } else {
            println!("Added:     {}", diff.stats.rows_added);
            println!("Deleted:   {}", diff.stats.rows_deleted);
            println!("Changed:   {}", diff.stats.rows_changed);
            println!("Unchanged: {}", diff.stats.rows_unchanged);
            println!("Cells changed: {}", diff.stats.cells_changed);
        }
        return Ok(diff.has_changes());
    }

    let color = match cli.color {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => std::io::stdout().is_terminal(),
    };

    render_to_stdout(
        &mut engine,
        config.output_format,
        color,
        &config.old_file,
        &config.new_file,
    )
}

fn parse_selectors(list: Option<&str>) -> Result<Vec<FieldSelector>> {
    Ok(list
        .map(FieldSelector::parse_list)
        .transpose()?
        .unwrap_or_default())
}

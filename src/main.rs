use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, ValueEnum};
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;

use yangtree::config::Config;
use yangtree::document::{parse, DataFormat, ParseOptions};
use yangtree::export::{export, export_tree, write_path_values};
use yangtree::file::loader::{format_from_path, load_schema_files, read_data_file, read_data_from_stdin};
use yangtree::log::{LogLevel, LogSink, TracingSink};
use yangtree::schema::SchemaContext;

/// yangtree - Parse YANG instance data and print it as path/value lines
#[derive(Parser)]
#[command(name = "yangtree")]
#[command(version)]
#[command(about = "Parse YANG instance data and print it as path/value lines", long_about = None)]
struct Cli {
    /// Instance data file (omit to read from stdin)
    file: Option<PathBuf>,

    /// Module definition file (YAML); may be repeated
    #[arg(short, long = "schema", value_name = "FILE")]
    schemas: Vec<PathBuf>,

    /// Data format (default: from the file name, then the config)
    #[arg(short, long)]
    format: Option<DataFormat>,

    /// Print only the subtrees selected by this path query
    #[arg(short, long)]
    query: Option<String>,

    /// What kind of document the data is
    #[arg(short, long, value_enum, default_value_t = Mode::Data)]
    mode: Mode,

    /// Treat unknown elements as errors
    #[arg(long)]
    strict: bool,

    /// Store leaf values without type checks
    #[arg(long)]
    trusted: bool,

    /// List the features of every loaded module and exit
    #[arg(long)]
    features: bool,

    /// More diagnostics (-v verbose, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    Data,
    Config,
    Get,
    GetConfig,
    Edit,
}

impl Mode {
    fn options(self) -> ParseOptions {
        match self {
            Mode::Data => ParseOptions::DATA,
            Mode::Config => ParseOptions::CONFIG,
            Mode::Get => ParseOptions::GET,
            Mode::GetConfig => ParseOptions::GET_CONFIG,
            Mode::Edit => ParseOptions::EDIT,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load();

    let sink = init_logging(&config, cli.verbose);

    let mut schema_files = config.schema_files.clone();
    schema_files.extend(cli.schemas.iter().cloned());
    if schema_files.is_empty() {
        bail!("No module definitions given; pass --schema FILE or set schema_files in the config");
    }
    let ctx = load_schema_files(&schema_files)?;

    if cli.features {
        return print_features(&ctx);
    }

    let (buffer, format) = match &cli.file {
        Some(path) => {
            let format = cli
                .format
                .or_else(|| format_from_path(path))
                .unwrap_or(config.default_format);
            (read_data_file(path)?, format)
        }
        None => {
            if io::stdin().is_terminal() {
                bail!("No input file given and stdin is a terminal");
            }
            (read_data_from_stdin()?, cli.format.unwrap_or(config.default_format))
        }
    };

    let mut options = cli.mode.options();
    if cli.strict || config.strict {
        options |= ParseOptions::STRICT;
    }
    if cli.trusted {
        options |= ParseOptions::TRUSTED;
    }

    let tree = parse(&ctx, &buffer, format, options, sink.as_ref().map(|s| s as &dyn LogSink))
        .ok_or_else(|| anyhow!("Failed to parse {} data", format))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match &cli.query {
        Some(query) => {
            let matches = tree
                .find_path(query)
                .with_context(|| format!("Invalid query '{}'", query))?;
            let pairs = matches.iter().flat_map(export);
            write_path_values(&mut out, pairs, &config.separator)?;
        }
        None => {
            write_path_values(&mut out, export_tree(&tree), &config.separator)?;
        }
    }
    out.flush()?;

    Ok(())
}

/// Installs a stderr `tracing` subscriber and returns the sink feeding it,
/// or `None` when diagnostics are switched off.
fn init_logging(config: &Config, verbose: u8) -> Option<TracingSink> {
    if !config.show_logs && verbose == 0 {
        return None;
    }

    let level = match verbose {
        0 => config.log_level(),
        1 => config.log_level().max(LogLevel::Verbose),
        _ => LogLevel::Debug,
    };
    let max_level = match level {
        LogLevel::Error => tracing::Level::ERROR,
        LogLevel::Warning => tracing::Level::WARN,
        LogLevel::Verbose => tracing::Level::INFO,
        LogLevel::Debug => tracing::Level::DEBUG,
    };

    tracing_subscriber::fmt()
        .with_max_level(max_level)
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    Some(TracingSink)
}

fn print_features(ctx: &SchemaContext) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for module in ctx.modules() {
        let mut index = 0;
        while let Some(name) = module.feature_name(index) {
            writeln!(out, "{}:{}", module.name(), name)?;
            index += 1;
        }
    }
    Ok(())
}

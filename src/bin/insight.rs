//! Insight CLI - Command-line interface for Mobility Insight
//!
//! Commands:
//! - build: Turn an analysis payload into the rendering-layer view envelope
//! - validate: Report kept and dropped records per stream
//! - schema: Print the fields read from each stream

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use mobility_insight::encoder::ViewEncoder;
use mobility_insight::normalizer::StreamReport;
use mobility_insight::pipeline::{build_dashboard, stream_reports, AnalysisSnapshot};
use mobility_insight::{Stream, ViewConfig, INSIGHT_VERSION, PRODUCER_NAME};

/// Insight - view models for mobility and nutrition analysis results
#[derive(Parser)]
#[command(name = "insight")]
#[command(version = INSIGHT_VERSION)]
#[command(about = "Turn analysis results into chart-ready view models", long_about = None)]
struct Cli {
    /// Log filter (overrides RUST_LOG), e.g. "debug" or "mobility_insight=trace"
    #[arg(long, global = true)]
    log: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the view envelope for one analysis payload
    Build {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Output format
        #[arg(long, default_value = "json-pretty")]
        format: OutputFormat,

        /// View configuration file (JSON)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Report kept and dropped records per stream
    Validate {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output validation report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the fields read from each stream
    Schema {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Compact JSON
    Json,
    /// Pretty-printed JSON
    JsonPretty,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log.as_deref());

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e)).unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn init_logging(filter: Option<&str>) {
    let filter = match filter {
        Some(f) => EnvFilter::new(f),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), InsightCliError> {
    match cli.command {
        Commands::Build {
            input,
            output,
            format,
            config,
        } => cmd_build(&input, &output, format, config.as_deref()),
        Commands::Validate { input, json } => cmd_validate(&input, json),
        Commands::Schema { json } => cmd_schema(json),
    }
}

fn cmd_build(
    input: &Path,
    output: &Path,
    format: OutputFormat,
    config: Option<&Path>,
) -> Result<(), InsightCliError> {
    let config = match config {
        Some(path) => ViewConfig::from_json(&fs::read_to_string(path)?)?,
        None => ViewConfig::default(),
    };

    let snapshot = AnalysisSnapshot::from_json(&read_input(input)?)?;
    let view = build_dashboard(&snapshot.payload, &config);
    let envelope = ViewEncoder::new(config).encode(&snapshot, &view);

    let mut output_data = match format {
        OutputFormat::Json => serde_json::to_string(&envelope)?,
        OutputFormat::JsonPretty => serde_json::to_string_pretty(&envelope)?,
    };
    output_data.push('\n');

    if output.to_string_lossy() == "-" {
        print!("{}", output_data);
    } else {
        fs::write(output, output_data)?;
    }

    Ok(())
}

fn cmd_validate(input: &Path, json: bool) -> Result<(), InsightCliError> {
    let snapshot = AnalysisSnapshot::from_json(&read_input(input)?)?;
    let streams = stream_reports(&snapshot.payload);

    let report = ValidationReport {
        total_records: streams.iter().map(|s| s.total).sum(),
        kept_records: streams.iter().map(|s| s.kept).sum(),
        dropped_records: streams.iter().map(|s| s.dropped.len()).sum(),
        streams,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Validation Report");
        println!("=================");
        for stream in &report.streams {
            if !stream.present {
                println!("  {:<18} missing", stream.stream.as_str());
                continue;
            }
            println!(
                "  {:<18} {} kept / {} total",
                stream.stream.as_str(),
                stream.kept,
                stream.total
            );
            if !stream.dropped.is_empty() {
                let indices: Vec<String> = stream.dropped.iter().map(|i| i.to_string()).collect();
                println!("  {:<18} dropped at index {}", "", indices.join(", "));
            }
        }
        println!();
        println!("Total records:   {}", report.total_records);
        println!("Kept records:    {}", report.kept_records);
        println!("Dropped records: {}", report.dropped_records);
    }

    // Dropped records are expected with partial histories; only the payload
    // itself can fail validation.
    Ok(())
}

fn cmd_schema(json: bool) -> Result<(), InsightCliError> {
    let entries: Vec<SchemaEntry> = Stream::ALL
        .iter()
        .map(|s| SchemaEntry {
            stream: s.as_str(),
            payload_path: s.payload_path(),
            required: s.required_fields(),
            optional: s.optional_fields(),
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        println!("Input: analysis payload ({} {})", PRODUCER_NAME, INSIGHT_VERSION);
        println!();
        println!("A JSON object, optionally wrapped in {{\"analysis_results\": ...}}.");
        println!("Every stream is optional; malformed records are dropped.");
        println!();
        for entry in &entries {
            println!("{} ({})", entry.stream, entry.payload_path);
            println!("   required: {}", entry.required.join(", "));
            if !entry.optional.is_empty() {
                println!("   optional: {}", entry.optional.join(", "));
            }
        }
    }

    Ok(())
}

// Helper functions

fn read_input(input: &Path) -> Result<String, InsightCliError> {
    if input.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(input)?)
    }
}

// Report types

#[derive(serde::Serialize)]
struct ValidationReport {
    total_records: usize,
    kept_records: usize,
    dropped_records: usize,
    streams: Vec<StreamReport>,
}

#[derive(serde::Serialize)]
struct SchemaEntry {
    stream: &'static str,
    payload_path: &'static str,
    required: &'static [&'static str],
    optional: &'static [&'static str],
}

// Error types

#[derive(Debug)]
enum InsightCliError {
    Io(io::Error),
    View(mobility_insight::ViewError),
    Json(serde_json::Error),
}

impl From<io::Error> for InsightCliError {
    fn from(e: io::Error) -> Self {
        InsightCliError::Io(e)
    }
}

impl From<mobility_insight::ViewError> for InsightCliError {
    fn from(e: mobility_insight::ViewError) -> Self {
        InsightCliError::View(e)
    }
}

impl From<serde_json::Error> for InsightCliError {
    fn from(e: serde_json::Error) -> Self {
        InsightCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<InsightCliError> for CliError {
    fn from(e: InsightCliError) -> Self {
        match e {
            InsightCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            InsightCliError::View(e @ mobility_insight::ViewError::Config(_)) => CliError {
                code: "CONFIG_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check the view configuration file".to_string()),
            },
            InsightCliError::View(e) => CliError {
                code: "PAYLOAD_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("The input must be a JSON object produced by the analysis backend".to_string()),
            },
            InsightCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: None,
            },
        }
    }
}

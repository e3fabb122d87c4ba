//! facilitymap - command-line shell for facility map data
//!
//! Parses shareable shape links, filters facility data against them,
//! searches facilities (optionally with the geocoder) and extracts
//! equipment names from descriptions.

use clap::{Parser, Subcommand};
use facilitymap_core::config::Config;
use facilitymap_core::error::{exit_codes, Error};
use facilitymap_telemetry::TelemetryConfig;
use owo_colors::OwoColorize;
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;

use commands::{equipment, layers, nearby, search, shapes, Context, OutputFormat};

/// Facility map command-line tools
#[derive(Parser)]
#[command(name = "facilitymap")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file (default: facilitymap.toml in the working or config directory)
    #[arg(short, long, global = true, env = "FACILITYMAP_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a shape link and show the shapes it describes
    Shapes {
        /// Query string or full link, e.g. "shape=circle&lat=25&lng=120&radius=50"
        query: String,

        /// Emit the shapes as a GeoJSON FeatureCollection
        #[arg(long)]
        geojson: bool,
    },

    /// List facilities inside or near the shapes of a link
    Nearby {
        /// GeoJSON FeatureCollection with the facility data
        #[arg(short, long)]
        data: PathBuf,

        /// Query string or full link
        query: String,

        /// Only consider facilities in this layer
        #[arg(short, long)]
        layer: Option<String>,

        /// Override the nearby buffer in kilometers
        #[arg(short, long)]
        buffer: Option<f64>,
    },

    /// Search facilities by name and description
    Search {
        /// GeoJSON FeatureCollection with the facility data
        #[arg(short, long)]
        data: PathBuf,

        /// Search text; Traditional and Simplified characters match each other
        query: String,

        /// Top up few local matches with geocoder results
        #[arg(short, long)]
        remote: bool,

        /// Maximum number of results
        #[arg(short, long)]
        max: Option<usize>,
    },

    /// List layers with their facility counts
    Layers {
        /// GeoJSON FeatureCollection with the facility data
        #[arg(short, long)]
        data: PathBuf,
    },

    /// Extract equipment names from a description
    Equipment {
        /// Description text, or "-" to read standard input
        text: String,

        /// Resolve the names through the page-summary service
        #[arg(long)]
        lookup: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let format = cli.format;

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report(&e, format);
            exit_code(&e)
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load(cli.config.as_deref())?;

    let mut telemetry = TelemetryConfig::from(&config.schema.logging);
    if cli.verbose {
        telemetry = telemetry.verbose();
    }
    facilitymap_telemetry::init_with_config(telemetry)?;
    if let Some(path) = &config.path {
        tracing::debug!(path = %path.display(), "Loaded configuration");
    }

    let ctx = Context::new(config.schema, cli.format);

    let result = match cli.command {
        Commands::Shapes { query, geojson } => shapes::run(&ctx, &query, geojson),
        Commands::Nearby { data, query, layer, buffer } => {
            nearby::run(&ctx, &data, &query, layer.as_deref(), buffer)
        }
        Commands::Search { data, query, remote, max } => {
            search::run(&ctx, &data, &query, remote, max).await
        }
        Commands::Layers { data } => layers::run(&ctx, &data),
        Commands::Equipment { text, lookup } => equipment::run(&ctx, &text, lookup).await,
    };

    if let Ok(summary) = serde_json::to_string(&facilitymap_telemetry::metrics().snapshot()) {
        tracing::debug!(
            session_id = facilitymap_telemetry::session_id(),
            metrics = %summary,
            "Run finished"
        );
    }
    result
}

fn report(err: &anyhow::Error, format: OutputFormat) {
    match (format, err.downcast_ref::<Error>()) {
        (OutputFormat::Json, Some(e)) => {
            let report = serde_json::json!({ "error": e.to_report() });
            eprintln!("{report}");
        }
        (OutputFormat::Json, None) => {
            let report = serde_json::json!({ "error": { "message": format!("{err:#}") } });
            eprintln!("{report}");
        }
        (OutputFormat::Text, _) => eprintln!("{} {:#}", "Error:".red().bold(), err),
    }
}

fn exit_code(err: &anyhow::Error) -> ExitCode {
    let code = err
        .downcast_ref::<Error>()
        .map_or(exit_codes::FAILURE, Error::exit_code);
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}

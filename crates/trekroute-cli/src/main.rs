mod parse;
mod resolve;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;
use trekroute_core::InterpolationMode;

#[derive(Debug, Parser)]
#[command(name = "trekroute")]
#[command(about = "Resolve trek itineraries into drawable routes")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Resolve the treks in a catalogue file (YAML or JSON)
    Resolve {
        file: PathBuf,
        /// Only resolve the trek with this id
        #[arg(long)]
        trek: Option<String>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
        /// Overrides `TREKROUTE_INTERPOLATION`
        #[arg(long)]
        interpolation: Option<InterpolationMode>,
        /// Never call the geocoder, even when a token is configured
        #[arg(long)]
        offline: bool,
        /// Treks resolved at the same time
        #[arg(long, default_value_t = 4)]
        concurrency: usize,
    },
    /// Show the place name extracted from one itinerary line
    Parse { text: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    #[value(name = "geojson")]
    GeoJson,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = trekroute_core::load_engine_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Resolve {
            file,
            trek,
            format,
            interpolation,
            offline,
            concurrency,
        } => {
            let options = resolve::ResolveOptions {
                trek,
                format,
                interpolation: interpolation.unwrap_or(config.interpolation),
                offline,
                concurrency,
            };
            resolve::run_resolve(&config, &file, &options).await?;
        }
        Commands::Parse { text } => parse::run_parse(&text)?,
    }

    Ok(())
}

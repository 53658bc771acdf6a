//! asset-mask command line.
//!
//! ```text
//! asset-mask [--config FILE] resolve <PATH>   markup for one request path
//! asset-mask [--config FILE] templates        every inline template block
//! asset-mask [--config FILE] check            validate, then list masks
//! asset-mask [--config FILE] serve            run the preview server
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;

use asset_mask::config::{load_config, AppConfig};
use asset_mask::lifecycle::{shutdown_on_signal, Shutdown};
use asset_mask::observability::{logging, metrics};
use asset_mask::resources::MapEntry;
use asset_mask::{AssetPipeline, HttpServer, RequestPath};

const DEFAULT_CONFIG: &str = "assets.toml";

#[derive(Parser)]
#[command(name = "asset-mask")]
#[command(about = "Per-request asset selection and template aggregation", long_about = None)]
struct Cli {
    /// Configuration file; `assets.toml` is used when present.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the resource markup for a request path
    Resolve {
        /// Request target, e.g. `/user/42?tab=posts`
        path: String,
    },
    /// Print every inline template block
    Templates,
    /// Validate the configuration and list the masks
    Check,
    /// Run the preview server
    Serve {
        /// Override `server.bind_address`
        #[arg(short, long)]
        bind: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut config = read_config(cli.config.as_deref())?;

    logging::init_logging(&config.observability)?;

    let pipeline = AssetPipeline::from_config(&config).map_err(|errors| {
        errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    })?;

    match cli.command {
        Commands::Resolve { path } => {
            let request = RequestPath::from_target(&path);
            if let Some(markup) = pipeline.resolve_resources(&request) {
                println!("{markup}");
            }
        }
        Commands::Templates => {
            if let Some(markup) = pipeline.collect_templates()? {
                println!("{markup}");
            }
        }
        Commands::Check => {
            let map = pipeline.registry().snapshot();
            for entry in map.entries() {
                let kind = match entry {
                    MapEntry::Bundle { mask, .. } => mask.kind().as_str(),
                    MapEntry::Reference { .. } => "reference",
                };
                println!("{:<10} {} ({} refs)", kind, entry.key(), entry.references().len());
            }
            println!("configuration OK: {} entries", map.len());
        }
        Commands::Serve { bind } => {
            if let Some(bind) = bind {
                config.server.bind_address = bind;
            }
            serve(config, pipeline).await?;
        }
    }

    Ok(())
}

fn read_config(path: Option<&Path>) -> Result<AppConfig, Box<dyn std::error::Error>> {
    match path {
        Some(path) => Ok(load_config(path)?),
        None if Path::new(DEFAULT_CONFIG).exists() => Ok(load_config(Path::new(DEFAULT_CONFIG))?),
        None => Ok(AppConfig::default()),
    }
}

async fn serve(config: AppConfig, pipeline: AssetPipeline) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        bind_address = %config.server.bind_address,
        request_timeout_secs = config.server.request_timeout_secs,
        scan_timeout_secs = config.server.scan_timeout_secs,
        entries = pipeline.registry().snapshot().len(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.server.bind_address).await?;

    let shutdown = Shutdown::new();
    let server = HttpServer::new(&config.server, Arc::new(pipeline));
    let stopped = shutdown.subscribe();
    let _signals = shutdown_on_signal(shutdown);

    server.run(listener, stopped).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

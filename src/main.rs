use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use neighborhood_aliases::app::ports::HttpClientPort;
use neighborhood_aliases::infra::http_client::ReqwestHttp;
use neighborhood_aliases::pipeline::boundary_source;
use neighborhood_aliases::{logging, normalize_name, Config, Pipeline};

#[derive(Parser)]
#[command(name = "neighborhood_aliases")]
#[command(about = "Attach 311 neighborhood aliases to boundary GeoJSON")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch boundaries (if needed), resolve aliases and write the output file
    Run {
        #[command(flatten)]
        opts: RunOpts,
    },
    /// Only make sure the local boundary cache exists
    Fetch {
        #[command(flatten)]
        opts: RunOpts,
    },
    /// Print the comparison key for one or more neighborhood labels
    Normalize {
        #[arg(required = true)]
        values: Vec<String>,
    },
}

#[derive(Args)]
struct RunOpts {
    /// TOML config file (defaults to ./aliases.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Boundary endpoint URL
    #[arg(long)]
    boundary_url: Option<String>,
    /// Local boundary cache
    #[arg(long)]
    cache: Option<PathBuf>,
    /// Where to write the aliased collection
    #[arg(long)]
    output: Option<PathBuf>,
    /// Tab-delimited source file; repeat to scan several in order
    #[arg(long = "source")]
    sources: Vec<PathBuf>,
    /// Re-fetch boundaries even if the cache exists
    #[arg(long)]
    refresh: bool,
}

impl RunOpts {
    fn into_config(self) -> anyhow::Result<(Config, bool)> {
        let mut config = Config::load(self.config.as_deref())?;
        if let Some(url) = self.boundary_url {
            config.boundary_url = url;
        }
        if let Some(cache) = self.cache {
            config.cache_path = cache;
        }
        if let Some(output) = self.output {
            config.output_path = output;
        }
        if !self.sources.is_empty() {
            config.source_paths = self.sources;
        }
        config.validate()?;
        Ok((config, self.refresh))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load environment variables
    dotenv::dotenv().ok();

    match cli.command {
        Commands::Run { opts } => {
            let (config, refresh) = opts.into_config()?;
            logging::init_logging(&config.log_dir);

            let http: Arc<dyn HttpClientPort> = Arc::new(ReqwestHttp::new());
            let pipeline = Pipeline::from_config(&config, http, refresh);
            let result = pipeline.run().await?;

            if result.unaliased > 0 {
                warn!(
                    "{} neighborhoods without alias: {}",
                    result.unaliased,
                    result.unaliased_names().join(", ")
                );
            }
            println!(
                "✅ {} of {} neighborhoods aliased, written to {}",
                result.aliased,
                result.aliased + result.unaliased,
                config.output_path.display()
            );
        }
        Commands::Fetch { opts } => {
            let (config, refresh) = opts.into_config()?;
            logging::init_logging(&config.log_dir);

            let http = ReqwestHttp::new();
            let ctx =
                boundary_source::obtain(&http, &config.endpoint(), &config.cache_path, refresh)
                    .await?;
            info!("Boundary cache ready at {}", ctx.local_path.display());
        }
        Commands::Normalize { values } => {
            for value in values {
                println!("{}\t{}", value, normalize_name(&value));
            }
        }
    }

    Ok(())
}

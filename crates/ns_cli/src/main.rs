use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use ns_scrapers::cli::{ScraperArgs, ScraperCommands};
use ns_scrapers::{handle_command, init_logging, FetchConfig, HttpFetcher, ScraperRegistry};
use ns_web::AppState;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Multi-source news scraper", long_about = None)]
pub struct Cli {
    #[arg(long, env = "NS_LOG_LEVEL", default_value = "info")]
    log_level: String,
    /// HTTP timeout for page fetches, in seconds
    #[arg(long, env = "NS_TIMEOUT_SECS", default_value_t = 30)]
    timeout_secs: u64,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    #[command(flatten)]
    Scrape(ScraperCommands),
    /// Serve the HTTP API
    Serve {
        #[arg(long, env = "NS_ADDR", default_value = "0.0.0.0:8000")]
        addr: SocketAddr,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let logger = init_logging(&cli.log_level);

    let fetcher = HttpFetcher::new(&FetchConfig {
        timeout_secs: cli.timeout_secs,
    })?;
    let registry = ScraperRegistry::with_builtin(Arc::new(fetcher))?;
    info!("🦗 Scrapers initialized successfully: {}", registry.list_names().join(", "));
    let registry = registry.into_shared();

    match cli.command {
        Commands::Scrape(command) => {
            handle_command(ScraperArgs { command }, &registry).await?;
        }
        Commands::Serve { addr } => {
            logger.info(&format!("Starting web server on {}", addr));
            ns_web::serve(AppState { registry }, addr).await?;
        }
    }

    Ok(())
}

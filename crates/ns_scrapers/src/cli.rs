use clap::{Args, Subcommand};
use ns_core::Result;
use serde_json::{json, Value};

use crate::registry::{list_shared, resolve_shared, SharedRegistry};

#[derive(Args, Debug, Clone)]
pub struct ScraperArgs {
    #[command(subcommand)]
    pub command: ScraperCommands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ScraperCommands {
    /// List available sources
    Sources,
    /// List the categories linked from a page of a source
    Pages {
        /// Source name (e.g. reuters, bbc)
        source: String,
        #[arg(long, default_value = "world")]
        page: String,
    },
    /// List the articles on a page/category of a source
    News {
        /// Source name (e.g. reuters, bbc)
        source: String,
        #[arg(long, default_value = "world")]
        page: String,
        #[arg(long, default_value = "")]
        category: String,
        #[arg(long, default_value = "")]
        subcategory: String,
    },
}

/// Runs one scrape command and returns its JSON payload.
pub async fn run_command(command: &ScraperCommands, registry: &SharedRegistry) -> Result<Value> {
    match command {
        ScraperCommands::Sources => {
            let sources = list_shared(registry);
            Ok(json!({ "total": sources.len(), "sources": sources }))
        }
        ScraperCommands::Pages { source, page } => {
            let scraper = resolve_shared(registry, source)?;
            let listing = scraper.list_categories(page).await?;
            Ok(serde_json::to_value(listing)?)
        }
        ScraperCommands::News {
            source,
            page,
            category,
            subcategory,
        } => {
            let scraper = resolve_shared(registry, source)?;
            let feed = scraper.list_articles(page, category, subcategory).await?;
            Ok(serde_json::to_value(feed)?)
        }
    }
}

pub async fn handle_command(args: ScraperArgs, registry: &SharedRegistry) -> Result<()> {
    let value = run_command(&args.command, registry).await?;
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

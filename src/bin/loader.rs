use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use portfolio_index::{ChromaStore, PortfolioDataset, PortfolioIndex};

#[derive(Parser, Debug)]
#[command(
    name = "portfolio-loader",
    about = "Load a Techstack/Links CSV into the portfolio vector collection"
)]
struct LoaderCli {
    /// Path to the portfolio CSV (Techstack and Links columns)
    #[arg(long, env = "PORTFOLIO_DATASET")]
    dataset: PathBuf,

    /// Base URL of the Chroma-compatible vector store
    #[arg(
        long,
        env = "PORTFOLIO_STORE_URL",
        default_value = "http://127.0.0.1:8000"
    )]
    store_url: String,

    /// Optional API key sent with every store request
    #[arg(long, env = "PORTFOLIO_STORE_API_KEY")]
    api_key: Option<String>,

    /// Collection holding the portfolio entries
    #[arg(long, env = "PORTFOLIO_COLLECTION", default_value = "portfolio")]
    collection: String,

    /// Seconds before store requests time out
    #[arg(long, env = "PORTFOLIO_STORE_TIMEOUT_SECS", default_value_t = 30)]
    timeout_secs: u64,
}

fn main() -> Result<()> {
    let cli = LoaderCli::parse();
    let store = ChromaStore::new(
        cli.store_url,
        cli.api_key,
        Duration::from_secs(cli.timeout_secs.max(1)),
    )?;
    let collection = store
        .get_or_create_collection(&cli.collection)
        .with_context(|| format!("failed to open collection '{}'", cli.collection))?;

    let dataset = PortfolioDataset::read(&cli.dataset);
    let mut index = PortfolioIndex::new(dataset, collection);
    index.load();
    Ok(())
}

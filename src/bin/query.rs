use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use portfolio_index::{ChromaStore, PortfolioDataset, PortfolioIndex, LINKS_KEY};

#[derive(Parser, Debug)]
#[command(
    name = "portfolio-query",
    about = "Print the portfolio links best matching a set of skills"
)]
struct QueryCli {
    /// Skills to match, comma separated
    #[arg(long)]
    skills: String,

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
    let cli = QueryCli::parse();
    let skills = skills_vec(&cli.skills);
    let store = ChromaStore::new(
        cli.store_url,
        cli.api_key,
        Duration::from_secs(cli.timeout_secs.max(1)),
    )?;
    let collection = store
        .get_or_create_collection(&cli.collection)
        .with_context(|| format!("failed to open collection '{}'", cli.collection))?;

    let index = PortfolioIndex::new(PortfolioDataset::empty(), collection);
    let groups = index.query_links(skills.clone());
    if groups.is_empty() {
        println!("No links matched.");
        return Ok(());
    }

    for (skill, group) in skills.iter().zip(&groups) {
        println!("--- {skill} ---");
        if group.is_empty() {
            println!("(no matches)");
            continue;
        }
        for metadata in group {
            match metadata.get(LINKS_KEY).and_then(|value| value.as_str()) {
                Some(link) => println!("{link}"),
                None => println!("{}", serde_json::Value::Object(metadata.clone())),
            }
        }
    }
    Ok(())
}

fn skills_vec(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|skill| skill.trim().to_string())
        .filter(|skill| !skill.is_empty())
        .collect()
}

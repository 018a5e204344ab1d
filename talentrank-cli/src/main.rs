//! TalentRank CLI - drives the ranking pipeline from the shell
//!
//! # Commands
//!
//! ```bash
//! # Show what a title looks like after normalization
//! talentrank normalize "Senior Software Engineers @ ACME"
//!
//! # Normalize titles and drop duplicates, print the result as JSON
//! talentrank preprocess candidates.csv
//!
//! # Rank against a query (local word2vec by default)
//! talentrank rank candidates.csv "aspiring human resources"
//!
//! # Pretrained model, minus two candidates, top 10 only
//! talentrank rank candidates.json "hr manager" --strategy pretrained --delete 7 --delete 12 --top 10
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use talentrank_lib::{
    config::RankingConfig,
    dataset::Dataset,
    embed::{Embedder, ParaphraseEmbedder},
    fusion::RankedRecord,
    normalize::TextNormalizer,
    pipeline::RankingPipeline,
    score::Strategy,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "talentrank")]
#[command(about = "Rank candidate job titles against a free-text query")]
#[command(version)]
struct Cli {
    /// TOML config file; built-in defaults when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize a piece of text and print it
    Normalize {
        /// Text to normalize
        text: String,
    },

    /// Normalize titles, drop duplicates and print the dataset as JSON
    Preprocess {
        /// CSV with id, job_title, connection columns (or a JSON array of such objects)
        input: PathBuf,
    },

    /// Rank a dataset against a query
    Rank {
        /// CSV with id, job_title, connection columns (or a JSON array of such objects)
        input: PathBuf,

        /// Query to rank against
        query: String,

        /// Similarity strategy: "local" or "pretrained"
        #[arg(short, long, default_value = "local")]
        strategy: Strategy,

        /// Ids to remove before ranking (repeatable)
        #[arg(short, long = "delete", value_name = "ID")]
        delete: Vec<String>,

        /// Skip preprocessing (titles are used as given)
        #[arg(long)]
        raw: bool,

        /// Only print the first k results
        #[arg(short = 'k', long)]
        top: Option<usize>,
    },
}

fn load_config(path: Option<&Path>) -> Result<RankingConfig> {
    match path {
        Some(path) => RankingConfig::load(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(RankingConfig::default()),
    }
}

fn load_dataset(path: &Path) -> Result<Dataset> {
    Dataset::load(path).with_context(|| format!("loading dataset {}", path.display()))
}

/// Preprocess, delete and rank on a blocking thread; training and ONNX
/// inference are CPU-bound.
async fn run_ranking<E: Embedder + 'static>(
    mut pipeline: RankingPipeline<E>,
    dataset: Dataset,
    query: String,
    strategy: Strategy,
    delete: HashSet<String>,
    raw: bool,
) -> Result<Vec<RankedRecord>> {
    tokio::task::spawn_blocking(move || {
        let dataset = if raw {
            dataset
        } else {
            pipeline.preprocess(&dataset)?
        };
        let dataset = pipeline.delete(&dataset, &delete);
        pipeline.rank(&dataset, &query, strategy)
    })
    .await
    .context("ranking task failed")?
    .map_err(Into::into)
}

fn print_ranking(ranked: &[RankedRecord], top: Option<usize>) {
    let shown = top.unwrap_or(ranked.len()).min(ranked.len());
    println!(
        "{:>4}  {:<10} {:<40} {:>10} {:>6} {:>6} {:>7}",
        "#", "id", "job_title", "connection", "sim", "conn", "ranking"
    );
    for (i, r) in ranked.iter().take(shown).enumerate() {
        let title: String = r.record.title.chars().take(40).collect();
        println!(
            "{:>4}  {:<10} {:<40} {:>10} {:>6.2} {:>6.2} {:>7.2}",
            i + 1,
            r.record.id,
            title,
            r.record.connections.to_string(),
            r.similarity,
            r.connections_normalized,
            r.ranking
        );
    }
    if shown < ranked.len() {
        println!("... {} more", ranked.len() - shown);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Normalize { text } => {
            println!("{}", TextNormalizer::new().normalize(&text));
        }

        Commands::Preprocess { input } => {
            let dataset = load_dataset(&input)?;
            let pipeline = RankingPipeline::new(&config)?;
            let cleaned = pipeline.preprocess(&dataset)?;
            info!(before = dataset.len(), after = cleaned.len(), "preprocessed");
            println!("{}", serde_json::to_string_pretty(cleaned.records())?);
        }

        Commands::Rank {
            input,
            query,
            strategy,
            delete,
            raw,
            top,
        } => {
            let dataset = load_dataset(&input)?;
            let delete: HashSet<String> = delete.into_iter().collect();

            let ranked = match strategy {
                Strategy::Local => {
                    let pipeline = RankingPipeline::new(&config)?;
                    run_ranking(pipeline, dataset, query, strategy, delete, raw).await?
                }
                Strategy::Pretrained => {
                    println!(
                        "Loading {} (first run downloads the model)...",
                        config.pretrained.model.name()
                    );
                    let pretrained = config.pretrained.clone();
                    let embedder = tokio::task::spawn_blocking(move || ParaphraseEmbedder::new(&pretrained))
                        .await
                        .context("model loading task failed")??;
                    let pipeline = RankingPipeline::with_pretrained(&config, embedder)?;
                    run_ranking(pipeline, dataset, query, strategy, delete, raw).await?
                }
            };

            print_ranking(&ranked, top);
        }
    }

    Ok(())
}

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use tracing::info;

use lingo::config::ClusteringConfigBuilder;
use lingo::output;
use lingo::{ClusteringAlgorithm, Document, Language, LanguageRegistry, LingoClusterer};

/// Lingo: search-result clustering.
///
/// Groups short documents (title + snippet) into labeled topics, so a result
/// list can be browsed by theme instead of by rank.
#[derive(Parser)]
#[command(name = "lingo", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Cluster documents from a JSON file (an array of {"id", "title", "summary", ...})
    Cluster {
        /// Path to the JSON document array
        input: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value = "terminal")]
        format: Format,

        /// Document language (ISO code or English name)
        #[arg(long)]
        language: Option<Language>,

        /// Score multiplier for multi-word labels
        #[arg(long)]
        phrase_label_boost: Option<f64>,

        /// Label similarity at which two clusters merge (0-1)
        #[arg(long)]
        cluster_merging_threshold: Option<f64>,

        /// Smallest cluster kept as a topic
        #[arg(long)]
        min_cluster_size: Option<usize>,

        /// Seed for the factorization's random start
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Show the effective configuration (defaults + LINGO_* environment)
    Config,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Terminal,
    Json,
}

fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("lingo=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Cluster {
            input,
            format,
            language,
            phrase_label_boost,
            cluster_merging_threshold,
            min_cluster_size,
            seed,
        } => {
            let mut builder = ClusteringConfigBuilder::from_env()?;
            if let Some(language) = language {
                builder = builder.language(language);
            }
            if let Some(boost) = phrase_label_boost {
                builder = builder.phrase_label_boost(boost);
            }
            if let Some(threshold) = cluster_merging_threshold {
                builder = builder.cluster_merging_threshold(threshold);
            }
            if let Some(size) = min_cluster_size {
                builder = builder.min_cluster_size(size);
            }
            if let Some(seed) = seed {
                builder = builder.seed(seed);
            }
            let config = builder.build()?;

            let documents = read_documents(&input)?;
            info!(
                documents = documents.len(),
                language = %config.language,
                "Loaded documents"
            );

            let registry = Arc::new(LanguageRegistry::load(&[config.language])?);
            let title_field = config.title_field.clone();
            let clusterer = LingoClusterer::new(registry, config)?;
            let result = clusterer.cluster(&documents)?;

            match format {
                Format::Terminal => {
                    output::terminal::display_clusters(&result, &documents, &title_field)
                }
                Format::Json => {
                    let json = serde_json::to_string_pretty(&output::to_json(&result, &documents))?;
                    println!("{json}");
                }
            }
        }

        Commands::Config => match ClusteringConfigBuilder::from_env().and_then(|b| b.build()) {
            Ok(config) => output::terminal::display_config(&config),
            Err(e) => {
                println!("{} {}", "Invalid configuration:".red().bold(), e);
                std::process::exit(1);
            }
        },
    }

    Ok(())
}

/// Read a JSON array of documents. Documents without an id get their
/// position as id.
fn read_documents(path: &Path) -> Result<Vec<Document>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let mut documents: Vec<Document> = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a JSON array of documents", path.display()))?;
    for (i, doc) in documents.iter_mut().enumerate() {
        if doc.id.is_empty() {
            doc.id = i.to_string();
        }
    }
    Ok(documents)
}

//! # ragcell CLI
//!
//! Command-line surface for the multi-tenant document retrieval engine.
//!
//! ## Commands
//!
//! - `ragcell ingest <FILE>` - Chunk and index a document for a tenant
//! - `ragcell query <QUERY>` - Rank a tenant's chunks against a query
//! - `ragcell clear` - Drop all state for a tenant
//! - `ragcell stats` - Show store-wide statistics
//! - `ragcell config show|init|path` - Manage configuration
//!
//! ## Examples
//!
//! ```bash
//! ragcell ingest notes.txt --tenant alice
//! ragcell query "error budgets" --tenant alice --top-k 3
//! ragcell query "error budgets" --format json
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use ragcell_chunker::FixedChunker;
use ragcell_core::{
    BackendKind, FileReader, IngestOutcome, QueryOutcome, RemoteIndex, SimilarityBackend,
    DEFAULT_TENANT,
};
use ragcell_embed::{EmbedderPool, RemoteEmbedder, RemoteEmbedderConfig};
use ragcell_ingest::{IngestMode, IngestPipeline};
use ragcell_query::{LexicalBackend, PrefilterConfig, QueryEngine, RemoteBackend, VectorBackend};
use ragcell_store::{snapshot, DocumentStore, RemoteVectorStore, RemoteVectorStoreConfig};

mod config;
mod reader;

use config::{config_path, Config};
use reader::{content_type_for, PlainTextReader};

#[derive(Parser)]
#[command(name = "ragcell")]
#[command(about = "Multi-tenant document retrieval engine")]
#[command(version)]
struct Cli {
    /// Path to config file (default: ~/.config/ragcell/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest a document
    Ingest {
        /// File to ingest
        file: PathBuf,

        /// Tenant that owns the document
        #[arg(short, long, default_value = DEFAULT_TENANT)]
        tenant: String,

        /// Source label stored in chunk metadata (defaults to the file path)
        #[arg(short, long)]
        source: Option<String>,
    },

    /// Query a tenant's corpus
    Query {
        /// Query string
        query: String,

        /// Tenant to query
        #[arg(short, long, default_value = DEFAULT_TENANT)]
        tenant: String,

        /// Maximum results
        #[arg(short = 'k', long)]
        top_k: Option<usize>,
    },

    /// Remove all state for a tenant
    Clear {
        /// Tenant to clear
        #[arg(short, long, default_value = DEFAULT_TENANT)]
        tenant: String,
    },

    /// Show store statistics
    Stats,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration
    Show,
    /// Print sample configuration file
    Init,
    /// Show config file path
    Path,
}

#[derive(Serialize)]
struct ClearOutput {
    tenant: String,
    removed: usize,
}

#[derive(Serialize)]
struct StatsOutput {
    backend: String,
    tenants: u64,
    total_chunks: u64,
    tenant_names: Vec<String>,
}

/// The assembled engine: one store, one ingest pipeline, one query engine,
/// all sharing the backend named in the config.
struct Engine {
    store: Arc<DocumentStore>,
    pipeline: IngestPipeline,
    query: QueryEngine,
    snapshot_path: Option<PathBuf>,
}

impl Engine {
    fn build(config: &Config) -> Result<Self> {
        let store = Arc::new(DocumentStore::new());
        let chunker = FixedChunker::new(config.chunking.chunk_size);

        let (mode, backend): (IngestMode, Arc<dyn SimilarityBackend>) = match config.backend {
            BackendKind::Lexical => (IngestMode::Lexical, Arc::new(LexicalBackend::new())),
            BackendKind::Vector => {
                let embedder = RemoteEmbedder::new(RemoteEmbedderConfig {
                    endpoint: config.embedding.endpoint.clone(),
                    model: config.embedding.model.clone(),
                    api_key: std::env::var(&config.embedding.api_key_env).unwrap_or_default(),
                    dimension: config.embedding.dimension,
                    timeout: Duration::from_secs(config.embedding.timeout_secs),
                })
                .context("failed to build embedding client")?;
                let pool = Arc::new(EmbedderPool::new(
                    Arc::new(embedder),
                    config.embedding.max_concurrent,
                ));
                (
                    IngestMode::Vector {
                        pool: Arc::clone(&pool),
                    },
                    Arc::new(VectorBackend::new(
                        pool,
                        Arc::clone(&store),
                        config.embedding.metric,
                    )),
                )
            }
            BackendKind::Remote => {
                let remote: Arc<dyn RemoteIndex> = Arc::new(
                    RemoteVectorStore::new(RemoteVectorStoreConfig {
                        endpoint: config.remote.endpoint.clone(),
                        api_key: std::env::var(&config.remote.api_key_env).unwrap_or_default(),
                        timeout: Duration::from_secs(config.remote.timeout_secs),
                    })
                    .context("failed to build remote store client")?,
                );
                (
                    IngestMode::Remote {
                        remote: Arc::clone(&remote),
                    },
                    Arc::new(RemoteBackend::new(remote)),
                )
            }
        };

        let pipeline = IngestPipeline::new(Arc::clone(&store), chunker, mode);
        let query = QueryEngine::new(
            Arc::clone(&store),
            backend,
            PrefilterConfig {
                conversational: config.query.conversational_filter,
                translation: config.query.translation_filter,
            },
            Duration::from_secs(config.query.timeout_secs),
        );

        Ok(Self {
            store,
            pipeline,
            query,
            snapshot_path: config.snapshot_path(),
        })
    }

    async fn load_snapshot(&self) -> Result<()> {
        if let Some(path) = &self.snapshot_path {
            snapshot::load(&self.store, path)
                .await
                .context("failed to load snapshot")?;
        }
        Ok(())
    }

    async fn save_snapshot(&self) -> Result<()> {
        if let Some(path) = &self.snapshot_path {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            snapshot::save(&self.store, path)
                .await
                .context("failed to save snapshot")?;
        }
        Ok(())
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_ingest(outcome: &IngestOutcome, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(outcome)?,
        OutputFormat::Text => match &outcome.error {
            Some(error) => println!("ingest failed: {error}"),
            None => println!("ingested {} chunks (ids {:?})", outcome.count, outcome.ids),
        },
    }
    Ok(())
}

fn print_query(outcome: &QueryOutcome, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(outcome)?,
        OutputFormat::Text => {
            if outcome.is_empty() {
                println!("no results");
                return Ok(());
            }
            for i in 0..outcome.len() {
                let preview: String = outcome.documents[i].chars().take(120).collect();
                println!(
                    "#{} id={} score={:.4} source={}\n  {}",
                    i + 1,
                    outcome.ids[i],
                    outcome.distances[i],
                    outcome.metadatas[i].source,
                    preview
                );
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    let config = Config::load(cli.config.as_ref())?;

    match cli.command {
        Commands::Ingest {
            file,
            tenant,
            source,
        } => {
            let engine = Engine::build(&config)?;
            engine.load_snapshot().await?;

            let content_type = content_type_for(&file);
            let source = source.unwrap_or_else(|| file.display().to_string());

            // reader failures become structured ingest failures, matching
            // the pipeline's own error reporting
            let outcome = match PlainTextReader::new().read(&file, content_type) {
                Ok(text) => {
                    engine
                        .pipeline
                        .ingest(&tenant, &text, &source, content_type)
                        .await
                }
                Err(e) => IngestOutcome::failed(e.to_string()),
            };

            if outcome.error.is_none() {
                engine.save_snapshot().await?;
            }
            print_ingest(&outcome, cli.format)?;
        }

        Commands::Query {
            query,
            tenant,
            top_k,
        } => {
            let engine = Engine::build(&config)?;
            engine.load_snapshot().await?;

            let top_k = top_k
                .unwrap_or(config.query.default_top_k)
                .min(config.query.max_top_k);
            let outcome = engine.query.query(&tenant, &query, top_k).await?;
            print_query(&outcome, cli.format)?;
        }

        Commands::Clear { tenant } => {
            let engine = Engine::build(&config)?;
            engine.load_snapshot().await?;

            // in remote mode this also drops the external namespace
            let removed = engine.pipeline.clear(&tenant).await?;
            engine.save_snapshot().await?;

            let output = ClearOutput { tenant, removed };
            match cli.format {
                OutputFormat::Json => print_json(&output)?,
                OutputFormat::Text => {
                    println!("removed {} chunks for {}", output.removed, output.tenant);
                }
            }
        }

        Commands::Stats => {
            let engine = Engine::build(&config)?;
            engine.load_snapshot().await?;

            let stats = engine.store.stats().await;
            let output = StatsOutput {
                backend: engine.query.backend_kind().to_string(),
                tenants: stats.tenants,
                total_chunks: stats.total_chunks,
                tenant_names: engine.store.tenants().await,
            };
            match cli.format {
                OutputFormat::Json => print_json(&output)?,
                OutputFormat::Text => {
                    println!("backend:      {}", output.backend);
                    println!("tenants:      {}", output.tenants);
                    println!("total chunks: {}", output.total_chunks);
                    for name in &output.tenant_names {
                        println!("  - {name}");
                    }
                }
            }
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => {
                println!("{}", toml::to_string_pretty(&config)?);
            }
            ConfigAction::Init => {
                println!("{}", Config::sample_toml());
            }
            ConfigAction::Path => match config_path() {
                Some(path) => println!("{}", path.display()),
                None => println!("no config directory available"),
            },
        },
    }

    Ok(())
}

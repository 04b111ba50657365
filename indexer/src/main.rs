use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use textdex_core::ingest::{index_folders, index_records, IndexOptions, RecordConfig, DEFAULT_WINDOW};
use textdex_core::persist::{load_store, save_store, IndexPaths};
use textdex_core::search::search;
use textdex_core::IndexOutcome;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "textdex")]
#[command(about = "Build and query a chunked TF-IDF text index", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Index every file directly inside the given folders (non-recursive)
    Build {
        /// Folders to index
        #[arg(long, required = true, num_args = 1..)]
        folder: Vec<PathBuf>,
        /// Output index directory
        #[arg(long)]
        output: PathBuf,
        /// Strip HTML markup before tokenizing
        #[arg(long, default_value_t = false)]
        html: bool,
        /// Context window size in tokens
        #[arg(long, default_value_t = DEFAULT_WINDOW)]
        window: usize,
    },
    /// Index the files named by a JSON array of metadata records
    BuildRecords {
        /// Path to a JSON file holding an array of records
        #[arg(long)]
        records: PathBuf,
        /// Record field holding the file path
        #[arg(long, default_value = "file_path")]
        path_field: String,
        /// Record field holding the document id
        #[arg(long, default_value = "id")]
        link_field: String,
        /// Output index directory
        #[arg(long)]
        output: PathBuf,
        /// Strip HTML markup before tokenizing
        #[arg(long, default_value_t = false)]
        html: bool,
        /// Context window size in tokens
        #[arg(long, default_value_t = DEFAULT_WINDOW)]
        window: usize,
    },
    /// Run a query against a persisted index
    Search {
        /// Index directory
        #[arg(long, default_value = "./index")]
        index: PathBuf,
        /// Free-text query
        query: String,
        /// Maximum number of results
        #[arg(long)]
        limit: Option<usize>,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { folder, output, html, window } => {
            let outcome = index_folders(&folder, &IndexOptions { html, window })?;
            persist_outcome(&outcome, &output)
        }
        Commands::BuildRecords { records, path_field, link_field, output, html, window } => {
            let raw = std::fs::read_to_string(&records)
                .with_context(|| format!("reading {}", records.display()))?;
            let records: Vec<serde_json::Value> = serde_json::from_str(&raw)?;
            let config = RecordConfig { path_field, link_field };
            let outcome = index_records(&records, &config, &IndexOptions { html, window })?;
            persist_outcome(&outcome, &output)
        }
        Commands::Search { index, query, limit } => {
            let store = load_store(&IndexPaths::new(&index))?;
            let hits = search(&store, &query, limit);
            println!("{}", serde_json::to_string_pretty(&hits)?);
            Ok(())
        }
    }
}

fn persist_outcome(outcome: &IndexOutcome, output: &Path) -> Result<()> {
    save_store(&IndexPaths::new(output), &outcome.store)?;
    for err in &outcome.errors {
        tracing::warn!(path = %err.path, reason = %err.reason, "document skipped");
    }
    tracing::info!(
        docs = outcome.store.num_docs(),
        errors = outcome.errors.len(),
        output = %output.display(),
        "index build complete"
    );
    Ok(())
}

use anyhow::Result;
use clap::Parser;
use fts_core::dump::load_path;
use fts_core::{Document, InvertedIndex, SearchOutcome};
use std::collections::HashMap;
use std::time::Instant;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "fts")]
#[command(about = "Index a Wikipedia abstract dump and run an AND query against it", long_about = None)]
struct Cli {
    /// Wiki abstract dump path (file or directory of *.xml / *.xml.gz)
    #[arg(short = 'p', long = "path", default_value = "enwiki-latest-abstract1.xml.gz")]
    dump_path: String,
    /// Search query
    #[arg(short = 'q', long = "query", default_value = "Small wild cat")]
    query: String,
    /// Print at most this many matches
    #[arg(long)]
    limit: Option<usize>,
    /// Reject documents whose ids are not strictly ascending
    #[arg(long, default_value_t = false)]
    checked: bool,
}

fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let cli = Cli::parse();
    tracing::info!("running full text search");

    let start = Instant::now();
    let documents = load_path(&cli.dump_path)?;
    tracing::info!(count = documents.len(), elapsed = ?start.elapsed(), "loaded documents");

    let start = Instant::now();
    let index = build_index(&documents, cli.checked)?;
    tracing::info!(count = documents.len(), num_terms = index.num_terms(), elapsed = ?start.elapsed(), "indexed documents");

    let start = Instant::now();
    let outcome = index.search(&cli.query);
    tracing::info!(count = outcome.len(), elapsed = ?start.elapsed(), "search finished");
    if let SearchOutcome::NoMatch(reason) = &outcome {
        tracing::debug!(?reason, "no match");
    }

    let by_id: HashMap<_, &Document> = documents.iter().map(|d| (d.id, d)).collect();
    let limit = cli.limit.unwrap_or(usize::MAX);
    for doc_id in outcome.doc_ids().iter().take(limit) {
        if let Some(doc) = by_id.get(doc_id) {
            println!("{}\t{}", doc_id, doc.text);
        }
    }
    Ok(())
}

fn build_index(documents: &[Document], checked: bool) -> Result<InvertedIndex> {
    let mut index = InvertedIndex::new();
    if checked {
        index.add_checked(documents)?;
    } else {
        index.add(documents);
    }
    Ok(index)
}

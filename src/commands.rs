use anyhow::{Context, Result};
use tracing::info;

use crate::config::Config;
use crate::indexer::Indexer;
use crate::llm::OllamaClient;
use crate::query::QueryEngine;
use crate::store::QdrantStore;

/// Index every document under the configured repository directory
#[inline]
pub async fn index() -> Result<()> {
    let config = Config::from_env()?;
    info!(
        "Indexing documents from {}",
        config.repository_path.display()
    );

    let ollama = OllamaClient::new(&config.ollama)?;
    let store =
        QdrantStore::new(&config.qdrant.url).context("Failed to connect to vector store")?;

    let stats = Indexer::new(&ollama, &store, &config).index().await?;

    if stats.documents_loaded == 0 {
        println!(
            "No documents found in '{}'. Add .pdf or .txt files and run again.",
            config.repository_path.display()
        );
        return Ok(());
    }

    println!("Indexing complete!");
    println!("  Documents loaded: {}", stats.documents_loaded);
    println!("  Chunks created: {}", stats.chunks_created);
    println!("  Points upserted: {}", stats.points_upserted);

    Ok(())
}

/// Answer a question from the indexed documents
#[inline]
pub async fn query(question: &str) -> Result<()> {
    let config = Config::from_env()?;
    info!("Answering question: {}", question);

    let ollama = OllamaClient::new(&config.ollama)?;
    let store =
        QdrantStore::new(&config.qdrant.url).context("Failed to connect to vector store")?;

    let engine = QueryEngine::new(&ollama, &ollama, &store, &config);
    let answer = engine.answer(question).await?;

    println!("Question: {}", question);
    println!();
    println!("{}", answer);

    Ok(())
}

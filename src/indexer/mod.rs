// Indexer module
// Orchestrates loading, chunking, embedding, and vector store writes


use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use crate::chunking::{self, Chunk};
use crate::config::Config;
use crate::llm::EmbeddingClient;
use crate::loader;
use crate::store::{Point, PointPayload, VectorStore};

/// Number of chunks embedded and upserted per batch. Batching bounds peak
/// memory during embedding; it is not a parallelism mechanism.
const UPSERT_BATCH_SIZE: usize = 100;

/// Throwaway input used to probe the embedding model's dimensionality.
const DIMENSION_PROBE_TEXT: &str = "sample text for dimension detection";

/// Counts reported by one indexing run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexingStats {
    pub documents_loaded: usize,
    pub chunks_created: usize,
    pub points_upserted: usize,
}

/// Sequential pipeline that turns the repository directory into a populated
/// vector collection.
pub struct Indexer<'a, E, S> {
    embeddings: &'a E,
    store: &'a S,
    config: &'a Config,
}

impl<'a, E: EmbeddingClient, S: VectorStore> Indexer<'a, E, S> {
    #[inline]
    pub fn new(embeddings: &'a E, store: &'a S, config: &'a Config) -> Self {
        Self {
            embeddings,
            store,
            config,
        }
    }

    /// Index every document beneath the configured repository path.
    ///
    /// Writes are batched; a failure mid-run leaves previously upserted
    /// batches persisted. Finding no documents is a clean no-op.
    #[inline]
    pub async fn index(&self) -> Result<IndexingStats> {
        let documents = loader::load_documents(&self.config.repository_path)?;
        if documents.is_empty() {
            warn!("No documents found to index");
            return Ok(IndexingStats::default());
        }
        info!("{} document pages loaded", documents.len());

        let chunks = chunking::split_documents(&documents, &self.config.chunking);
        info!("{} chunks created", chunks.len());

        // One probe call determines the dimensionality the collection must have.
        let probe = self
            .embeddings
            .embed(DIMENSION_PROBE_TEXT)
            .context("Failed to determine embedding dimension")?;
        let dimension = probe.len() as u64;
        info!("Embedding dimension: {}", dimension);

        self.ensure_collection(dimension).await?;

        let points_upserted = self.embed_and_upsert(&chunks).await?;

        info!(
            "Indexing finished: {} chunks indexed into '{}'",
            points_upserted, self.config.qdrant.collection
        );

        Ok(IndexingStats {
            documents_loaded: documents.len(),
            chunks_created: chunks.len(),
            points_upserted,
        })
    }

    /// Make sure the target collection exists with the given dimensionality.
    ///
    /// A collection with a different dimensionality is destructively deleted
    /// and recreated; its existing points are lost.
    async fn ensure_collection(&self, dimension: u64) -> Result<()> {
        let collection = &self.config.qdrant.collection;

        match self.store.collection_dimension(collection).await? {
            None => {
                info!("Creating new collection '{}'", collection);
                self.store.create_collection(collection, dimension).await?;
            }
            Some(existing) if existing != dimension => {
                warn!(
                    "Collection '{}' has vector dimension {} but current embeddings have {}; \
                     recreating it",
                    collection, existing, dimension
                );
                self.store.delete_collection(collection).await?;
                self.store.create_collection(collection, dimension).await?;
            }
            Some(_) => {
                info!("Using existing collection '{}'", collection);
            }
        }

        Ok(())
    }

    async fn embed_and_upsert(&self, chunks: &[Chunk]) -> Result<usize> {
        let collection = &self.config.qdrant.collection;
        let batch_count = chunks.len().div_ceil(UPSERT_BATCH_SIZE);

        let progress = ProgressBar::new(batch_count as u64).with_style(
            ProgressStyle::with_template("{msg} [{bar:40}] {pos}/{len}")
                .context("Invalid progress bar template")?,
        );
        progress.set_message("Embedding batches");

        let mut next_id: u64 = 0;
        let mut points_upserted = 0;

        for batch in chunks.chunks(UPSERT_BATCH_SIZE) {
            let texts: Vec<String> = batch.iter().map(|chunk| chunk.text.clone()).collect();
            let vectors = self
                .embeddings
                .embed_batch(&texts)
                .with_context(|| format!("Failed to embed batch of {} chunks", batch.len()))?;

            let points: Vec<Point> = batch
                .iter()
                .zip(vectors)
                .map(|(chunk, vector)| {
                    let id = next_id;
                    next_id += 1;
                    Point {
                        id,
                        vector,
                        payload: PointPayload {
                            text: chunk.text.clone(),
                            source: chunk.metadata.source.clone(),
                            page: chunk.metadata.page,
                        },
                    }
                })
                .collect();

            points_upserted += points.len();
            self.store
                .upsert(collection, points)
                .await
                .context("Failed to upsert batch")?;

            progress.inc(1);
        }

        progress.finish_and_clear();
        Ok(points_upserted)
    }
}

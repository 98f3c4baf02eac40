#![expect(
    clippy::tests_outside_test_module,
    reason = "integration tests are only compiled in test mode"
)]

// End-to-end index-then-query tests against the in-memory vector store,
// with deterministic stand-ins for the Ollama models.

use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use docrag::config::{ChunkingConfig, Config, OllamaConfig, QdrantConfig};
use docrag::indexer::Indexer;
use docrag::llm::{EmbeddingClient, GenerationClient};
use docrag::query::{FALLBACK_ANSWER, QueryEngine};
use docrag::store::{InMemoryStore, VectorStore};
use tempfile::TempDir;

const DIMENSION: usize = 16;

/// Deterministic embedder: a byte histogram folded into a fixed-width vector.
/// Identical texts embed identically, so a query matching an indexed chunk
/// word for word is always its nearest neighbor.
struct HistogramEmbedder;

impl EmbeddingClient for HistogramEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vector = vec![0.0_f32; DIMENSION];
        for byte in text.bytes() {
            vector[byte as usize % DIMENSION] += 1.0;
        }
        Ok(vector)
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        texts.iter().map(|text| self.embed(text)).collect()
    }
}

/// Echoes the prompt back so assertions can inspect exactly what the
/// generation model would have been asked.
struct EchoGenerator;

impl GenerationClient for EchoGenerator {
    fn generate(&self, prompt: &str) -> Result<String> {
        Ok(prompt.to_string())
    }
}

fn test_config(repository: PathBuf) -> Config {
    Config {
        ollama: OllamaConfig::default(),
        qdrant: QdrantConfig {
            url: "http://localhost:6334".to_string(),
            collection: "pipeline-test".to_string(),
        },
        chunking: ChunkingConfig {
            chunk_size: 200,
            chunk_overlap: 40,
        },
        repository_path: repository,
    }
}

#[tokio::test]
async fn index_then_query_round_trip() {
    let repo = TempDir::new().expect("temp dir");
    fs::write(
        repo.path().join("animals.txt"),
        "The quick brown fox jumps over the lazy dog.",
    )
    .expect("write file");
    fs::write(
        repo.path().join("colors.txt"),
        "The sky is blue and the grass is green.",
    )
    .expect("write file");

    let config = test_config(repo.path().to_path_buf());
    let embedder = HistogramEmbedder;
    let store = InMemoryStore::new();

    let stats = Indexer::new(&embedder, &store, &config)
        .index()
        .await
        .expect("indexing");

    assert_eq!(stats.documents_loaded, 2);
    assert_eq!(stats.chunks_created, 2);
    assert_eq!(stats.points_upserted, 2);

    let generator = EchoGenerator;
    let engine = QueryEngine::new(&embedder, &generator, &store, &config);
    let answer = engine
        .answer("The quick brown fox jumps over the lazy dog.")
        .await
        .expect("query");

    assert!(answer.contains("The quick brown fox jumps over the lazy dog."));
    assert!(answer.contains("Question: The quick brown fox jumps over the lazy dog."));
}

#[tokio::test]
async fn query_against_unindexed_empty_collection_falls_back() {
    let repo = TempDir::new().expect("temp dir");
    let config = test_config(repo.path().to_path_buf());
    let embedder = HistogramEmbedder;
    let store = InMemoryStore::new();
    store
        .create_collection("pipeline-test", DIMENSION as u64)
        .await
        .expect("create");

    let generator = EchoGenerator;
    let engine = QueryEngine::new(&embedder, &generator, &store, &config);
    let answer = engine.answer("is anything here?").await.expect("query");

    assert_eq!(answer, FALLBACK_ANSWER);
}

#[tokio::test]
async fn reindexing_replaces_points_in_place() {
    let repo = TempDir::new().expect("temp dir");
    fs::write(repo.path().join("note.txt"), "original content").expect("write file");

    let config = test_config(repo.path().to_path_buf());
    let embedder = HistogramEmbedder;
    let store = InMemoryStore::new();
    let indexer = Indexer::new(&embedder, &store, &config);

    indexer.index().await.expect("first indexing");
    fs::write(repo.path().join("note.txt"), "rewritten content").expect("rewrite file");
    let stats = indexer.index().await.expect("second indexing");

    assert_eq!(stats.points_upserted, 1);

    let generator = EchoGenerator;
    let engine = QueryEngine::new(&embedder, &generator, &store, &config);
    let answer = engine.answer("rewritten content").await.expect("query");

    assert!(answer.contains("rewritten content"));
}

#[tokio::test]
async fn empty_repository_indexes_nothing_and_queries_fail_cleanly() {
    let repo = TempDir::new().expect("temp dir");
    let config = test_config(repo.path().to_path_buf());
    let embedder = HistogramEmbedder;
    let store = InMemoryStore::new();

    let stats = Indexer::new(&embedder, &store, &config)
        .index()
        .await
        .expect("indexing");

    assert_eq!(stats.documents_loaded, 0);
    assert_eq!(stats.points_upserted, 0);

    // No collection was ever created, so a query surfaces an error rather
    // than silently returning the fallback.
    let generator = EchoGenerator;
    let engine = QueryEngine::new(&embedder, &generator, &store, &config);
    assert!(engine.answer("anything?").await.is_err());
}

#[tokio::test]
async fn long_document_is_chunked_and_every_chunk_is_retrievable() {
    let repo = TempDir::new().expect("temp dir");
    let long_text = (0..40)
        .map(|i| format!("Paragraph number {i} talks about topic {i} in some detail."))
        .collect::<Vec<_>>()
        .join("\n\n");
    fs::write(repo.path().join("long.txt"), &long_text).expect("write file");

    let config = test_config(repo.path().to_path_buf());
    let embedder = HistogramEmbedder;
    let store = InMemoryStore::new();

    let stats = Indexer::new(&embedder, &store, &config)
        .index()
        .await
        .expect("indexing");

    assert_eq!(stats.documents_loaded, 1);
    assert!(stats.chunks_created > 1, "expected the text to be split");
    assert_eq!(stats.chunks_created, stats.points_upserted);
}

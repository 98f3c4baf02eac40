// Configuration management module
// Builds the process-wide configuration from environment variables


use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use thiserror::Error;
use url::Url;

/// Process-wide configuration, constructed once at startup and passed by
/// reference into the indexing and query pipelines.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub ollama: OllamaConfig,
    pub qdrant: QdrantConfig,
    pub chunking: ChunkingConfig,
    /// Directory scanned (recursively) for documents to index.
    pub repository_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OllamaConfig {
    pub base_url: String,
    pub embedding_model: String,
    pub generation_model: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QdrantConfig {
    pub url: String,
    pub collection: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChunkingConfig {
    /// Maximum chunk size in characters.
    pub chunk_size: usize,
    /// Overlap in characters between consecutive chunks.
    pub chunk_overlap: usize,
}

impl Default for OllamaConfig {
    #[inline]
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            embedding_model: "nomic-embed-text".to_string(),
            generation_model: "llama3.2".to_string(),
        }
    }
}

impl Default for QdrantConfig {
    #[inline]
    fn default() -> Self {
        Self {
            url: "http://localhost:6334".to_string(),
            collection: "documents".to_string(),
        }
    }
}

impl Default for ChunkingConfig {
    #[inline]
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid URL for {0}: {1}")]
    InvalidUrl(&'static str, String),
    #[error("Invalid value for {0}: {1} (must be a positive integer)")]
    InvalidInteger(&'static str, String),
    #[error("Invalid model name: {0} (cannot be empty)")]
    InvalidModel(String),
    #[error("Invalid collection name (cannot be empty)")]
    InvalidCollection,
    #[error("Invalid chunk size: {0} (must be greater than zero)")]
    InvalidChunkSize(usize),
    #[error("Chunk overlap ({0}) must be smaller than chunk size ({1})")]
    OverlapTooLarge(usize, usize),
}

impl Config {
    /// Build the configuration from the process environment.
    #[inline]
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    ///
    /// Unset variables fall back to their defaults. Values that are set but
    /// malformed are errors, never silently replaced.
    #[inline]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults_ollama = OllamaConfig::default();
        let defaults_qdrant = QdrantConfig::default();
        let defaults_chunking = ChunkingConfig::default();

        let config = Self {
            ollama: OllamaConfig {
                base_url: lookup("OLLAMA_BASE_URL").unwrap_or(defaults_ollama.base_url),
                embedding_model: lookup("OLLAMA_EMBEDDING_MODEL")
                    .unwrap_or(defaults_ollama.embedding_model),
                generation_model: lookup("OLLAMA_GENERATION_MODEL")
                    .unwrap_or(defaults_ollama.generation_model),
            },
            qdrant: QdrantConfig {
                url: lookup("QDRANT_URL").unwrap_or(defaults_qdrant.url),
                collection: lookup("QDRANT_COLLECTION_NAME").unwrap_or(defaults_qdrant.collection),
            },
            chunking: ChunkingConfig {
                chunk_size: parse_usize(&lookup, "CHUNK_SIZE", defaults_chunking.chunk_size)?,
                chunk_overlap: parse_usize(
                    &lookup,
                    "CHUNK_OVERLAP",
                    defaults_chunking.chunk_overlap,
                )?,
            },
            repository_path: PathBuf::from(
                lookup("REPOSITORY_PATH").unwrap_or_else(|| "repository".to_string()),
            ),
        };

        config
            .validate()
            .context("Configuration validation failed")?;

        Ok(config)
    }

    #[inline]
    pub fn validate(&self) -> Result<(), ConfigError> {
        Url::parse(&self.ollama.base_url)
            .map_err(|_| ConfigError::InvalidUrl("OLLAMA_BASE_URL", self.ollama.base_url.clone()))?;
        Url::parse(&self.qdrant.url)
            .map_err(|_| ConfigError::InvalidUrl("QDRANT_URL", self.qdrant.url.clone()))?;

        if self.ollama.embedding_model.trim().is_empty() {
            return Err(ConfigError::InvalidModel(self.ollama.embedding_model.clone()));
        }
        if self.ollama.generation_model.trim().is_empty() {
            return Err(ConfigError::InvalidModel(self.ollama.generation_model.clone()));
        }
        if self.qdrant.collection.trim().is_empty() {
            return Err(ConfigError::InvalidCollection);
        }

        if self.chunking.chunk_size == 0 {
            return Err(ConfigError::InvalidChunkSize(self.chunking.chunk_size));
        }
        if self.chunking.chunk_overlap >= self.chunking.chunk_size {
            return Err(ConfigError::OverlapTooLarge(
                self.chunking.chunk_overlap,
                self.chunking.chunk_size,
            ));
        }

        Ok(())
    }
}

fn parse_usize(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: usize,
) -> Result<usize, ConfigError> {
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidInteger(key, raw)),
        None => Ok(default),
    }
}

// LLM module
// Client traits for embedding and generation, plus the Ollama implementation

pub mod ollama;

use anyhow::Result;

pub use ollama::OllamaClient;

/// Maps text to fixed-length embedding vectors. One blocking HTTP call per
/// method; implementations do not retry.
pub trait EmbeddingClient: Send + Sync {
    /// Embed a single text.
    fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed a batch of texts, preserving order.
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
}

/// Maps a prompt to a text completion with a single blocking call.
pub trait GenerationClient: Send + Sync {
    fn generate(&self, prompt: &str) -> Result<String>;
}

// Query module
// Retrieval-augmented answering: embed, search, prompt, generate


use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::config::Config;
use crate::llm::{EmbeddingClient, GenerationClient};
use crate::store::{SearchHit, VectorStore};

/// How many of the nearest chunks are packed into the prompt context.
const TOP_K: u64 = 5;

/// Returned without invoking the generation model when the search yields
/// nothing to build a context from.
pub const FALLBACK_ANSWER: &str =
    "I could not find any relevant information to answer this question.";

/// Sequential pipeline that answers a question from the indexed corpus.
pub struct QueryEngine<'a, E, G, S> {
    embeddings: &'a E,
    generator: &'a G,
    store: &'a S,
    config: &'a Config,
}

impl<'a, E, G, S> QueryEngine<'a, E, G, S>
where
    E: EmbeddingClient,
    G: GenerationClient,
    S: VectorStore,
{
    #[inline]
    pub fn new(embeddings: &'a E, generator: &'a G, store: &'a S, config: &'a Config) -> Self {
        Self {
            embeddings,
            generator,
            store,
            config,
        }
    }

    /// Answer `question` from the indexed documents.
    ///
    /// Retrieves the top-K most similar chunks, assembles them into a context
    /// block (most similar first), and asks the generation model to answer
    /// from that context alone. With zero search hits the fixed
    /// [`FALLBACK_ANSWER`] is returned and generation is skipped entirely.
    #[inline]
    pub async fn answer(&self, question: &str) -> Result<String> {
        let query_vector = self
            .embeddings
            .embed(question)
            .context("Failed to embed question")?;

        let hits = self
            .store
            .search(&self.config.qdrant.collection, &query_vector, TOP_K)
            .await?;

        if hits.is_empty() {
            info!("Search returned no results, skipping generation");
            return Ok(FALLBACK_ANSWER.to_string());
        }

        debug!("Retrieved {} chunks for context", hits.len());

        let prompt = build_prompt(&hits, question);
        self.generator
            .generate(&prompt)
            .context("Failed to generate answer")
    }
}

/// Assemble the fixed prompt: retrieved texts in descending similarity order,
/// separated by blank lines, followed by the question.
fn build_prompt(hits: &[SearchHit], question: &str) -> String {
    let context = hits
        .iter()
        .map(|hit| hit.payload.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "You are an expert assistant. Answer using only the information in the context below.\n\
         If the context does not contain the answer, say so explicitly.\n\
         \n\
         Context:\n\
         {context}\n\
         \n\
         Question: {question}\n\
         \n\
         Answer:\n"
    )
}

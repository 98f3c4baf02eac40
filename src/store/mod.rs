// Vector store module
// Collection management, point upsert, and similarity search

pub mod memory;
pub mod qdrant;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Result;

pub use memory::InMemoryStore;
pub use qdrant::QdrantStore;

/// Payload stored alongside each vector: the chunk text and its provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointPayload {
    pub text: String,
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
}

/// A vector point ready for upsert. IDs are assigned sequentially by the
/// indexing pipeline, starting at 0 for each run.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub id: u64,
    pub vector: Vec<f32>,
    pub payload: PointPayload,
}

/// A search hit: the stored payload plus its similarity score.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub payload: PointPayload,
    pub score: f32,
}

/// Persistent store for embedding vectors, searchable by cosine similarity.
///
/// All points in a collection share one vector dimensionality; the indexing
/// pipeline enforces this by recreating the collection when the dimensionality
/// of freshly computed embeddings differs.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Dimensionality of the named collection, or `None` if the collection
    /// does not exist. Lookup failures other than absence are errors.
    async fn collection_dimension(&self, collection: &str) -> Result<Option<u64>>;

    /// Create a collection with the given vector dimensionality.
    async fn create_collection(&self, collection: &str, dimension: u64) -> Result<()>;

    /// Delete a collection and all of its points.
    async fn delete_collection(&self, collection: &str) -> Result<()>;

    /// Insert or overwrite points by ID.
    async fn upsert(&self, collection: &str, points: Vec<Point>) -> Result<()>;

    /// Return the `top_k` nearest points to `vector`, most similar first.
    async fn search(&self, collection: &str, vector: &[f32], top_k: u64)
    -> Result<Vec<SearchHit>>;
}

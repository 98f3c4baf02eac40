// In-memory vector store using cosine similarity
// Backs tests and local development without a Qdrant server


use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::store::{Point, SearchHit, VectorStore};
use crate::{RagError, Result};

/// A [`VectorStore`] held entirely in memory.
///
/// Collections map point IDs to their vectors and payloads; search is a full
/// scan scored by cosine similarity. Intended for tests and small corpora.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    collections: RwLock<HashMap<String, Collection>>,
}

#[derive(Debug)]
struct Collection {
    dimension: u64,
    points: BTreeMap<u64, Point>,
}

impl InMemoryStore {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of points in a collection; 0 if the collection does not exist.
    #[inline]
    pub async fn len(&self, collection: &str) -> usize {
        let collections = self.collections.read().await;
        collections.get(collection).map_or(0, |c| c.points.len())
    }

    #[inline]
    pub async fn is_empty(&self, collection: &str) -> bool {
        self.len(collection).await == 0
    }

    /// All point IDs in a collection, in ascending order.
    #[inline]
    pub async fn point_ids(&self, collection: &str) -> Vec<u64> {
        let collections = self.collections.read().await;
        collections
            .get(collection)
            .map(|c| c.points.keys().copied().collect())
            .unwrap_or_default()
    }

    fn missing(collection: &str) -> RagError {
        RagError::VectorStore(format!("Collection '{collection}' does not exist"))
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[async_trait]
impl VectorStore for InMemoryStore {
    async fn collection_dimension(&self, collection: &str) -> Result<Option<u64>> {
        let collections = self.collections.read().await;
        Ok(collections.get(collection).map(|c| c.dimension))
    }

    async fn create_collection(&self, collection: &str, dimension: u64) -> Result<()> {
        let mut collections = self.collections.write().await;
        collections.insert(
            collection.to_string(),
            Collection {
                dimension,
                points: BTreeMap::new(),
            },
        );
        Ok(())
    }

    async fn delete_collection(&self, collection: &str) -> Result<()> {
        let mut collections = self.collections.write().await;
        collections.remove(collection);
        Ok(())
    }

    async fn upsert(&self, collection: &str, points: Vec<Point>) -> Result<()> {
        let mut collections = self.collections.write().await;
        let entry = collections
            .get_mut(collection)
            .ok_or_else(|| Self::missing(collection))?;

        for point in points {
            if point.vector.len() as u64 != entry.dimension {
                return Err(RagError::VectorStore(format!(
                    "Point {} has dimension {} but collection '{}' expects {}",
                    point.id,
                    point.vector.len(),
                    collection,
                    entry.dimension
                )));
            }
            entry.points.insert(point.id, point);
        }
        Ok(())
    }

    async fn search(
        &self,
        collection: &str,
        vector: &[f32],
        top_k: u64,
    ) -> Result<Vec<SearchHit>> {
        let collections = self.collections.read().await;
        let entry = collections
            .get(collection)
            .ok_or_else(|| Self::missing(collection))?;

        let mut hits: Vec<SearchHit> = entry
            .points
            .values()
            .map(|point| SearchHit {
                payload: point.payload.clone(),
                score: cosine_similarity(&point.vector, vector),
            })
            .collect();

        hits.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        hits.truncate(top_k as usize);
        Ok(hits)
    }
}

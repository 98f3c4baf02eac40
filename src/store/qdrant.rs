// Qdrant-backed vector store over gRPC

use async_trait::async_trait;
use qdrant_client::Qdrant;
use qdrant_client::qdrant::value::Kind;
use qdrant_client::qdrant::vectors_config::Config as VectorsConfigKind;
use qdrant_client::qdrant::{
    CreateCollectionBuilder, Distance, PointStruct, SearchPointsBuilder, UpsertPointsBuilder,
    Value as QdrantValue, VectorParamsBuilder,
};
use tracing::debug;

use crate::store::{Point, PointPayload, SearchHit, VectorStore};
use crate::{RagError, Result};

/// A [`VectorStore`] backed by a Qdrant server, using cosine distance.
///
/// Chunk text and provenance are stored as point payload; point IDs are the
/// sequential integers assigned at indexing time.
pub struct QdrantStore {
    client: Qdrant,
}

impl QdrantStore {
    /// Connect to the Qdrant gRPC endpoint at `url`.
    #[inline]
    pub fn new(url: &str) -> Result<Self> {
        let client = Qdrant::from_url(url).build().map_err(Self::map_err)?;
        Ok(Self { client })
    }

    fn map_err(e: qdrant_client::QdrantError) -> RagError {
        RagError::VectorStore(e.to_string())
    }

    fn extract_string(value: &QdrantValue) -> Option<String> {
        match &value.kind {
            Some(Kind::StringValue(s)) => Some(s.clone()),
            _ => None,
        }
    }

    fn extract_integer(value: &QdrantValue) -> Option<i64> {
        match &value.kind {
            Some(Kind::IntegerValue(i)) => Some(*i),
            _ => None,
        }
    }
}

#[async_trait]
impl VectorStore for QdrantStore {
    async fn collection_dimension(&self, collection: &str) -> Result<Option<u64>> {
        // Absence is detected explicitly; any other lookup failure propagates
        // instead of being conflated with "does not exist".
        let exists = self
            .client
            .collection_exists(collection)
            .await
            .map_err(Self::map_err)?;
        if !exists {
            return Ok(None);
        }

        let info = self
            .client
            .collection_info(collection)
            .await
            .map_err(Self::map_err)?;

        let dimension = info
            .result
            .and_then(|r| r.config)
            .and_then(|c| c.params)
            .and_then(|p| p.vectors_config)
            .and_then(|v| v.config)
            .and_then(|kind| match kind {
                VectorsConfigKind::Params(params) => Some(params.size),
                VectorsConfigKind::ParamsMap(_) => None,
            })
            .ok_or_else(|| {
                RagError::VectorStore(format!(
                    "Could not determine vector dimension of collection '{collection}'"
                ))
            })?;

        Ok(Some(dimension))
    }

    async fn create_collection(&self, collection: &str, dimension: u64) -> Result<()> {
        self.client
            .create_collection(
                CreateCollectionBuilder::new(collection)
                    .vectors_config(VectorParamsBuilder::new(dimension, Distance::Cosine)),
            )
            .await
            .map_err(Self::map_err)?;

        debug!(collection, dimension, "created qdrant collection");
        Ok(())
    }

    async fn delete_collection(&self, collection: &str) -> Result<()> {
        self.client
            .delete_collection(collection)
            .await
            .map_err(Self::map_err)?;

        debug!(collection, "deleted qdrant collection");
        Ok(())
    }

    async fn upsert(&self, collection: &str, points: Vec<Point>) -> Result<()> {
        if points.is_empty() {
            return Ok(());
        }

        let count = points.len();
        let qdrant_points: Vec<PointStruct> = points
            .into_iter()
            .map(|point| {
                let payload_value = serde_json::to_value(&point.payload).map_err(|e| {
                    RagError::VectorStore(format!("Failed to serialize payload: {e}"))
                })?;
                let payload = qdrant_client::Payload::try_from(payload_value)
                    .map_err(|e| RagError::VectorStore(format!("Invalid payload: {e}")))?;
                Ok(PointStruct::new(point.id, point.vector, payload))
            })
            .collect::<Result<_>>()?;

        self.client
            .upsert_points(UpsertPointsBuilder::new(collection, qdrant_points).wait(true))
            .await
            .map_err(Self::map_err)?;

        debug!(collection, count, "upserted points to qdrant");
        Ok(())
    }

    async fn search(
        &self,
        collection: &str,
        vector: &[f32],
        top_k: u64,
    ) -> Result<Vec<SearchHit>> {
        let response = self
            .client
            .search_points(
                SearchPointsBuilder::new(collection, vector.to_vec(), top_k).with_payload(true),
            )
            .await
            .map_err(Self::map_err)?;

        let hits = response
            .result
            .into_iter()
            .map(|scored| {
                let text = scored
                    .payload
                    .get("text")
                    .and_then(Self::extract_string)
                    .unwrap_or_default();
                let source = scored
                    .payload
                    .get("source")
                    .and_then(Self::extract_string)
                    .unwrap_or_default();
                let page = scored
                    .payload
                    .get("page")
                    .and_then(Self::extract_integer)
                    .and_then(|p| u32::try_from(p).ok());

                SearchHit {
                    payload: PointPayload { text, source, page },
                    score: scored.score,
                }
            })
            .collect();

        Ok(hits)
    }
}

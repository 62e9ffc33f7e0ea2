//! Domain types shared by the loader, the index and the answer generator.

use serde::{Deserialize, Serialize};

pub type ChunkId = String;

/// A chunk of the source document that is independently embedded.
///
/// - `id`: `"{doc_id}:{chunk_index}"`
/// - `doc_id`: stable document identity (file stem)
/// - `doc_path`: original path to the source PDF
/// - `content`: the text payload of the chunk
/// - `chunk_index`/`total_chunks`: position within the parent document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentChunk {
    pub id: ChunkId,
    pub doc_id: String,
    pub doc_path: String,
    pub content: String,
    pub chunk_index: usize,
    pub total_chunks: usize,
}

impl DocumentChunk {
    /// Build a standalone chunk, mostly useful for fixtures and ad-hoc corpora.
    pub fn new(doc_id: &str, chunk_index: usize, content: impl Into<String>) -> Self {
        Self {
            id: format!("{doc_id}:{chunk_index}"),
            doc_id: doc_id.to_string(),
            doc_path: String::new(),
            content: content.into(),
            chunk_index,
            total_chunks: 0,
        }
    }
}

/// Distance used by the vector index. Lower is always more similar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMetric {
    /// Squared Euclidean distance (L2²). Range: \[0, ∞).
    #[default]
    Euclidean,
    /// Cosine distance: `1 - cosine_similarity`. Range: \[0, 2\].
    Cosine,
}

/// One nearest-neighbour result.
///
/// `distance` follows the index's [`DistanceMetric`]. `rank` is the
/// zero-based position in the result list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: ChunkId,
    pub content: String,
    pub distance: f32,
    pub rank: usize,
}

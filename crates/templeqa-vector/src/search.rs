use anyhow::Result;
use std::hash::Hasher;
use twox_hash::XxHash64;

use templeqa_core::error::Error;
use templeqa_core::traits::{Embedder, VectorIndexer};
use templeqa_core::types::{DistanceMetric, DocumentChunk, SearchHit};

use crate::distance::distance;

/// Brute-force index: every query scans every stored vector.
///
/// Entries are appended once at build time and never mutated afterwards.
pub struct FlatIndex {
    dim: usize,
    metric: DistanceMetric,
    chunks: Vec<DocumentChunk>,
    vectors: Vec<Vec<f32>>,
}

impl FlatIndex {
    pub fn new(dim: usize, metric: DistanceMetric) -> Self {
        Self { dim, metric, chunks: Vec::new(), vectors: Vec::new() }
    }

    /// Embed every chunk once and store the pairs in chunk order.
    pub fn build(chunks: &[DocumentChunk], embedder: &dyn Embedder, metric: DistanceMetric) -> Result<Self> {
        let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let embeddings = embedder.embed_batch(&texts)?;
        let mut index = Self::new(embedder.dim(), metric);
        index.add(chunks, embeddings)?;
        tracing::info!(entries = index.len(), dim = index.dim, metric = ?metric, "built vector index");
        Ok(index)
    }

    pub fn add(&mut self, chunks: &[DocumentChunk], embeddings: Vec<Vec<f32>>) -> Result<()> {
        if chunks.len() != embeddings.len() {
            return Err(Error::Operation(format!("{} chunks but {} embeddings", chunks.len(), embeddings.len())).into());
        }
        if let Some(bad) = embeddings.iter().find(|e| e.len() != self.dim) {
            return Err(Error::Operation(format!("embedding has {} dims, index expects {}", bad.len(), self.dim)).into());
        }
        self.chunks.extend_from_slice(chunks);
        self.vectors.extend(embeddings);
        Ok(())
    }

    pub fn dim(&self) -> usize { self.dim }

    /// Top-`k` chunks by ascending distance; ties keep insertion order.
    pub fn search(&self, query_vec: &[f32], k: usize) -> Result<Vec<SearchHit>> {
        if query_vec.len() != self.dim {
            return Err(Error::Operation(format!("query has {} dims, index expects {}", query_vec.len(), self.dim)).into());
        }
        let mut scored: Vec<(usize, f32)> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(i, v)| (i, distance(self.metric, query_vec, v)))
            .collect();
        // sort_by is stable, so equal distances stay in insertion order
        scored.sort_by(|a, b| a.1.total_cmp(&b.1));
        Ok(scored
            .into_iter()
            .take(k)
            .enumerate()
            .map(|(rank, (i, d))| SearchHit {
                id: self.chunks[i].id.clone(),
                content: self.chunks[i].content.clone(),
                distance: d,
                rank,
            })
            .collect())
    }

    /// Content hash over every stored id, text and vector bit pattern.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = XxHash64::with_seed(0);
        for (chunk, vector) in self.chunks.iter().zip(&self.vectors) {
            hasher.write(chunk.id.as_bytes());
            hasher.write_u8(0);
            hasher.write(chunk.content.as_bytes());
            hasher.write_u8(0);
            for x in vector {
                hasher.write_u32(x.to_bits());
            }
        }
        hasher.finish()
    }
}

impl VectorIndexer for FlatIndex {
    fn len(&self) -> usize { self.chunks.len() }
    fn search_vec(&self, query_vec: &[f32], k: usize) -> Result<Vec<SearchHit>> { self.search(query_vec, k) }
}

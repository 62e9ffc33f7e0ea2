use crate::types::SearchHit;

pub trait Embedder: Send + Sync {
    /// Output dimensionality; identical before and after fitting.
    fn dim(&self) -> usize;
    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>>;
}

pub trait VectorIndexer: Send + Sync {
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    fn search_vec(&self, query_vec: &[f32], k: usize) -> anyhow::Result<Vec<SearchHit>>;
}

/// Blocking prompt-in, text-out completion call.
pub trait LanguageModel: Send + Sync {
    fn name(&self) -> &str;
    fn complete(&self, prompt: &str) -> anyhow::Result<String>;
}

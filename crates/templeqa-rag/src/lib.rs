//! Retrieval-augmented answering over the indexed document.
//!
//! [`RagContext`] holds everything built at startup (chunks, fitted
//! vectorizer, vector index) and is read-only afterwards.
//! [`AnswerGenerator`] pairs it with a [`LanguageModel`].

use anyhow::Result;
use std::sync::Arc;

use templeqa_core::config::Config;
use templeqa_core::data_processor::DataProcessor;
use templeqa_core::traits::{LanguageModel, VectorIndexer};
use templeqa_core::types::{DistanceMetric, DocumentChunk, SearchHit};
use templeqa_embed::TfidfVectorizer;
use templeqa_vector::FlatIndex;

pub const NOT_FOUND_ANSWER: &str =
    "Sorry, I couldn't find relevant information about that topic in the Annavaram Temple knowledge base.";

pub fn build_prompt(context: &str, question: &str) -> String {
    format!(
        "Based on the following context from the Annavaram Temple knowledge base, answer the question concisely.\n\n\
         Context:\n{context}\n\n\
         Question: {question}\n\n\
         Answer:"
    )
}

pub struct RagContext {
    vectorizer: TfidfVectorizer,
    index: FlatIndex,
    top_k: usize,
}

impl RagContext {
    /// Load the document, chunk it, fit the vectorizer and build the index.
    pub fn build(config: &Config) -> Result<Self> {
        let settings = config.settings();
        let processor = DataProcessor::with_config(settings.chunking.clone())?;
        let chunks = processor.process_pdf(&config.document_path())?;
        Self::from_chunks(&chunks, settings.embedding.max_features, settings.retrieval.metric, settings.retrieval.top_k)
    }

    pub fn from_chunks(chunks: &[DocumentChunk], max_features: usize, metric: DistanceMetric, top_k: usize) -> Result<Self> {
        let mut vectorizer = TfidfVectorizer::new(max_features);
        let corpus: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        vectorizer.fit(&corpus);
        let index = FlatIndex::build(chunks, &vectorizer, metric)?;
        Ok(Self { vectorizer, index, top_k })
    }

    pub fn index(&self) -> &FlatIndex { &self.index }
    pub fn vectorizer(&self) -> &TfidfVectorizer { &self.vectorizer }
    pub fn top_k(&self) -> usize { self.top_k }

    pub fn retrieve(&self, question: &str) -> Result<Vec<SearchHit>> {
        let q_vec = self.vectorizer.embed(question);
        self.index.search_vec(&q_vec, self.top_k)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Generated { text: String, prompt: String },
    NotFound,
}

impl Answer {
    /// The text returned to the user.
    pub fn text(&self) -> &str {
        match self {
            Answer::Generated { text, .. } => text,
            Answer::NotFound => NOT_FOUND_ANSWER,
        }
    }
}

pub struct AnswerGenerator {
    context: Arc<RagContext>,
    llm: Arc<dyn LanguageModel>,
}

impl AnswerGenerator {
    pub fn new(context: Arc<RagContext>, llm: Arc<dyn LanguageModel>) -> Self { Self { context, llm } }

    pub fn context(&self) -> &RagContext { &self.context }

    /// Retrieve, prompt, complete. No hits means no model call.
    pub fn answer(&self, question: &str) -> Result<Answer> {
        let hits = self.context.retrieve(question)?;
        if hits.is_empty() {
            tracing::info!("no chunks retrieved; returning fallback answer");
            return Ok(Answer::NotFound);
        }
        let context = hits.iter().map(|h| h.content.as_str()).collect::<Vec<_>>().join("\n\n");
        let prompt = build_prompt(&context, question);
        tracing::debug!(hits = hits.len(), model = self.llm.name(), "sending prompt");
        let text = self.llm.complete(&prompt)?;
        Ok(Answer::Generated { text, prompt })
    }
}

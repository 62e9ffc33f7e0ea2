//! Term-frequency / inverse-document-frequency vectorizer.
//!
//! The model is fitted once over the chunk corpus and then maps arbitrary
//! text onto its fixed vocabulary. Output vectors always have
//! `max_features` dimensions; slots beyond the fitted vocabulary stay zero.

use anyhow::Result;
use std::collections::{HashMap, HashSet};

use templeqa_core::traits::Embedder;

mod norm;
pub mod tokenize;

pub use norm::l2_normalize;
pub use tokenize::tokenize;

#[derive(Debug, Clone)]
pub struct TfidfModel {
    /// Alphabetically ordered vocabulary; position is the vector slot.
    terms: Vec<String>,
    index: HashMap<String, usize>,
    idf: Vec<f32>,
}

impl TfidfModel {
    pub fn terms(&self) -> &[String] { &self.terms }
    pub fn idf(&self, term: &str) -> Option<f32> { self.index.get(term).map(|&i| self.idf[i]) }
}

pub struct TfidfVectorizer {
    max_features: usize,
    model: Option<TfidfModel>,
}

impl TfidfVectorizer {
    pub fn new(max_features: usize) -> Self { Self { max_features, model: None } }

    pub fn is_fitted(&self) -> bool { self.model.is_some() }

    pub fn model(&self) -> Option<&TfidfModel> { self.model.as_ref() }

    /// Build the vocabulary and IDF weights from `corpus`.
    ///
    /// Keeps the `max_features` most frequent terms across the corpus, ties
    /// broken alphabetically. IDF is smoothed: `ln((1 + n) / (1 + df)) + 1`.
    pub fn fit(&mut self, corpus: &[String]) {
        let mut term_freq: HashMap<String, u64> = HashMap::new();
        let mut doc_freq: HashMap<String, u64> = HashMap::new();
        for doc in corpus {
            let tokens = tokenize(doc);
            let mut seen: HashSet<&str> = HashSet::new();
            for token in &tokens {
                *term_freq.entry(token.clone()).or_insert(0) += 1;
                if seen.insert(token.as_str()) {
                    *doc_freq.entry(token.clone()).or_insert(0) += 1;
                }
            }
        }

        let mut ranked: Vec<(String, u64)> = term_freq.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(self.max_features);
        let mut terms: Vec<String> = ranked.into_iter().map(|(t, _)| t).collect();
        terms.sort();

        let n = corpus.len() as f32;
        let idf = terms
            .iter()
            .map(|t| {
                let df = doc_freq.get(t).copied().unwrap_or(0) as f32;
                ((1.0 + n) / (1.0 + df)).ln() + 1.0
            })
            .collect();
        let index = terms.iter().enumerate().map(|(i, t)| (t.clone(), i)).collect();
        tracing::info!(documents = corpus.len(), vocabulary = terms.len(), "fitted tf-idf model");
        self.model = Some(TfidfModel { terms, index, idf });
    }

    /// Project `text` onto the fitted vocabulary. Unfitted models yield zeros.
    pub fn embed(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0f32; self.max_features];
        let Some(model) = &self.model else {
            tracing::debug!(dim = self.max_features, "vectorizer not fitted; returning zero vector");
            return v;
        };
        for token in tokenize(text) {
            if let Some(&i) = model.index.get(&token) {
                v[i] += 1.0;
            }
        }
        for (slot, weight) in v.iter_mut().zip(&model.idf) {
            *slot *= weight;
        }
        l2_normalize(&mut v);
        v
    }

    pub fn fit_embed(&mut self, corpus: &[String]) -> Vec<Vec<f32>> {
        self.fit(corpus);
        corpus.iter().map(|t| self.embed(t)).collect()
    }
}

impl Embedder for TfidfVectorizer {
    fn dim(&self) -> usize { self.max_features }
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed(t)).collect())
    }
}

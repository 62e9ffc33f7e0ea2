use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::path::Path;

use crate::error::{Error, Result};
use crate::pdf;
use crate::types::DocumentChunk;

/// Character-based splitter settings. Lengths count Unicode scalar values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkingConfig {
    pub separator: String,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self { separator: "\n".to_string(), chunk_size: 800, chunk_overlap: 200 }
    }
}

impl ChunkingConfig {
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(Error::InvalidConfig("chunking.chunk_size must be > 0".to_string()));
        }
        if self.chunk_overlap > self.chunk_size {
            return Err(Error::InvalidConfig(format!(
                "chunking.chunk_overlap ({}) is larger than chunking.chunk_size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct DataProcessor {
    chunking_config: ChunkingConfig,
}

impl DataProcessor {
    pub fn new() -> Self { Self::default() }

    pub fn with_config(chunking_config: ChunkingConfig) -> Result<Self> {
        chunking_config.validate()?;
        Ok(Self { chunking_config })
    }

    /// Extract the PDF at `file_path` and split it into chunks.
    pub fn process_pdf(&self, file_path: &Path) -> Result<Vec<DocumentChunk>> {
        let content = pdf::extract_text(file_path)?;
        let doc_id = extract_doc_id(file_path);
        let chunks = self.chunk_content(&content, &doc_id, file_path);
        tracing::info!(doc_id = %doc_id, chunks = chunks.len(), "processed document");
        Ok(chunks)
    }

    pub fn chunk_content(&self, content: &str, doc_id: &str, file_path: &Path) -> Vec<DocumentChunk> {
        let pieces = split_text(content, &self.chunking_config);
        let total_chunks = pieces.len();
        let doc_path = file_path.to_string_lossy().to_string();
        pieces
            .into_iter()
            .enumerate()
            .map(|(chunk_index, content)| DocumentChunk {
                id: format!("{doc_id}:{chunk_index}"),
                doc_id: doc_id.to_string(),
                doc_path: doc_path.clone(),
                content,
                chunk_index,
                total_chunks,
            })
            .collect()
    }
}

fn extract_doc_id(file_path: &Path) -> String {
    file_path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "document".to_string())
}

fn char_len(s: &str) -> usize { s.chars().count() }

/// Split `text` on the separator and greedily merge the pieces back into
/// chunks of at most `chunk_size` characters, carrying up to `chunk_overlap`
/// characters of trailing context into the next chunk.
///
/// A single piece longer than `chunk_size` cannot be split further and is
/// emitted as an oversized chunk.
pub fn split_text(text: &str, config: &ChunkingConfig) -> Vec<String> {
    let pieces: Vec<&str> = if config.separator.is_empty() {
        text.char_indices().map(|(i, c)| &text[i..i + c.len_utf8()]).collect()
    } else {
        text.split(config.separator.as_str()).filter(|s| !s.is_empty()).collect()
    };
    merge_pieces(&pieces, config)
}

fn merge_pieces(pieces: &[&str], config: &ChunkingConfig) -> Vec<String> {
    let sep = config.separator.as_str();
    let sep_len = char_len(sep);
    let mut chunks = Vec::new();
    let mut current: VecDeque<&str> = VecDeque::new();
    let mut total = 0usize;

    for &piece in pieces {
        let len = char_len(piece);
        let joiner = if current.is_empty() { 0 } else { sep_len };
        if total + len + joiner > config.chunk_size {
            if total > config.chunk_size {
                tracing::warn!(size = total, max = config.chunk_size, "created a chunk longer than the configured size");
            }
            if !current.is_empty() {
                if let Some(chunk) = join_pieces(&current, sep) {
                    chunks.push(chunk);
                }
                // Keep a tail of at most `chunk_overlap` that leaves room for the next piece.
                while let Some(front) = current.front() {
                    let must_pop = total > config.chunk_overlap
                        || (total + len + sep_len > config.chunk_size && total > 0);
                    if !must_pop {
                        break;
                    }
                    total -= char_len(front) + if current.len() > 1 { sep_len } else { 0 };
                    current.pop_front();
                }
            }
        }
        current.push_back(piece);
        total += len + if current.len() > 1 { sep_len } else { 0 };
    }
    if let Some(chunk) = join_pieces(&current, sep) {
        chunks.push(chunk);
    }
    chunks
}

fn join_pieces(pieces: &VecDeque<&str>, sep: &str) -> Option<String> {
    let joined = pieces.iter().copied().collect::<Vec<_>>().join(sep);
    let trimmed = joined.trim();
    if trimmed.is_empty() { None } else { Some(trimmed.to_string()) }
}

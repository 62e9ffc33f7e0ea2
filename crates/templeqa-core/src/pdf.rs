//! PDF text extraction.
//!
//! Pages are read in page-number order and their text concatenated with no
//! separator. Pages that fail to decode or yield an empty string are skipped;
//! whitespace-only pages are kept.

use lopdf::Document;
use std::path::Path;

use crate::error::{Error, Result};

pub fn extract_text(path: &Path) -> Result<String> {
    let doc = Document::load(path).map_err(|e| Error::Document {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    let pages = doc.get_pages();
    let mut raw_text = String::new();
    let mut skipped = 0usize;
    for &page_number in pages.keys() {
        match doc.extract_text(&[page_number]) {
            Ok(content) if has_text(&content) => raw_text.push_str(&content),
            Ok(_) => {
                skipped += 1;
                tracing::debug!(page = page_number, "page has no extractable text");
            }
            Err(e) => {
                skipped += 1;
                tracing::debug!(page = page_number, error = %e, "skipping undecodable page");
            }
        }
    }
    tracing::info!(
        path = %path.display(),
        pages = pages.len(),
        skipped,
        chars = raw_text.chars().count(),
        "extracted document text"
    );
    Ok(raw_text)
}

fn has_text(content: &str) -> bool {
    !content.is_empty()
}

// Chunking module
// Splits documents into overlapping fixed-size windows for embedding


use tracing::debug;

use crate::config::ChunkingConfig;
use crate::loader::{Document, DocumentMetadata};

/// A bounded-size slice of a document's text, inheriting the document's
/// metadata. Created during chunking and discarded after upsert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub text: String,
    pub metadata: DocumentMetadata,
}

/// Split points tried in order of preference before falling back to a
/// mid-token cut at the window edge.
const SEPARATORS: [&str; 3] = ["\n\n", "\n", " "];

/// Split every document into overlapping windows of at most
/// `config.chunk_size` characters. Empty input yields empty output.
#[inline]
pub fn split_documents(documents: &[Document], config: &ChunkingConfig) -> Vec<Chunk> {
    let chunks: Vec<Chunk> = documents
        .iter()
        .flat_map(|document| {
            split_text(&document.text, config)
                .into_iter()
                .map(|text| Chunk {
                    text,
                    metadata: document.metadata.clone(),
                })
        })
        .collect();

    debug!(
        "Split {} documents into {} chunks",
        documents.len(),
        chunks.len()
    );
    chunks
}

/// Split `text` into windows of at most `chunk_size` characters, each
/// overlapping the previous one by `chunk_overlap` characters.
///
/// Windows are cut at the latest paragraph break inside the window, then at
/// the latest line break, then at the latest space, and only mid-token when
/// no such boundary leaves room for the overlap. Consecutive chunks share
/// exactly `chunk_overlap` characters, so concatenating the first chunk with
/// every later chunk minus its leading overlap reconstructs the source text.
#[inline]
pub fn split_text(text: &str, config: &ChunkingConfig) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    // Byte offset of every char boundary, plus the end of the text, so the
    // windowing below can work in characters rather than bytes.
    let boundaries: Vec<usize> = text
        .char_indices()
        .map(|(offset, _)| offset)
        .chain(std::iter::once(text.len()))
        .collect();
    let total_chars = boundaries.len() - 1;

    if total_chars <= config.chunk_size {
        return vec![text.to_string()];
    }

    let overlap = config.chunk_overlap.min(config.chunk_size.saturating_sub(1));
    let mut chunks = Vec::new();
    let mut start = 0;

    loop {
        let window_end = (start + config.chunk_size).min(total_chars);
        let window = &text[boundaries[start]..boundaries[window_end]];

        if window_end == total_chars {
            chunks.push(window.to_string());
            break;
        }

        // A cut before this offset would leave the next window starting at or
        // before the current one.
        let min_cut = boundaries[start + overlap + 1] - boundaries[start];
        let cut = cut_point(window, min_cut);

        let chunk = &window[..cut];
        chunks.push(chunk.to_string());

        start = start + chunk.chars().count() - overlap;
    }

    chunks
}

/// Byte offset to cut `window` at: just after the last occurrence of the
/// highest-preference separator that is not before `min_cut`, or the full
/// window when no separator qualifies.
fn cut_point(window: &str, min_cut: usize) -> usize {
    for separator in SEPARATORS {
        if let Some(position) = window.rfind(separator) {
            let cut = position + separator.len();
            if cut >= min_cut {
                return cut;
            }
        }
    }
    window.len()
}

// Document loader module
// Reads PDF and TXT files from the repository directory into raw documents

#[cfg(test)]
mod tests;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Provenance of a piece of text, carried from loading through to the
/// vector store payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Path of the source file.
    pub source: String,
    /// 1-based page number for PDF pages; `None` for plain text files.
    pub page: Option<u32>,
}

/// A raw text segment read from disk. PDF files yield one document per page,
/// text files yield a single document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub text: String,
    pub metadata: DocumentMetadata,
}

/// Load all `*.pdf` and `*.txt` documents beneath `repository`, recursively.
///
/// A missing repository directory is reported and yields an empty list rather
/// than an error. Files with other extensions are skipped. Entries are visited
/// in sorted order so repeated runs produce the same document sequence.
#[inline]
pub fn load_documents(repository: &Path) -> Result<Vec<Document>> {
    if !repository.exists() {
        warn!(
            "Repository directory {} does not exist, nothing to load",
            repository.display()
        );
        return Ok(Vec::new());
    }

    let mut documents = Vec::new();
    visit_directory(repository, &mut documents)?;

    info!(
        "Loaded {} document pages from {}",
        documents.len(),
        repository.display()
    );
    Ok(documents)
}

fn visit_directory(dir: &Path, documents: &mut Vec<Document>) -> Result<()> {
    let mut entries: Vec<_> = fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory {}", dir.display()))?
        .collect::<Result<_, _>>()
        .with_context(|| format!("Failed to read directory entry in {}", dir.display()))?;
    entries.sort_by_key(|entry| entry.path());

    for entry in entries {
        let path = entry.path();
        if path.is_dir() {
            visit_directory(&path, documents)?;
            continue;
        }

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("txt") => documents.push(load_text(&path)?),
            Some("pdf") => documents.extend(load_pdf(&path)?),
            _ => debug!("Skipping unsupported file {}", path.display()),
        }
    }

    Ok(())
}

fn load_text(path: &Path) -> Result<Document> {
    info!("Loading TXT: {}", path.display());

    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read text file {}", path.display()))?;

    Ok(Document {
        text,
        metadata: DocumentMetadata {
            source: path.display().to_string(),
            page: None,
        },
    })
}

fn load_pdf(path: &Path) -> Result<Vec<Document>> {
    info!("Loading PDF: {}", path.display());

    let pages = pdf_extract::extract_text_by_pages(path)
        .map_err(|e| anyhow::anyhow!("Failed to extract text from {}: {}", path.display(), e))?;

    let documents = pages
        .into_iter()
        .enumerate()
        .filter(|(_, text)| !text.trim().is_empty())
        .map(|(index, text)| Document {
            text,
            metadata: DocumentMetadata {
                source: path.display().to_string(),
                page: Some(index as u32 + 1),
            },
        })
        .collect();

    Ok(documents)
}

//! Document loading contracts and a plain-text file loader

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::chunker::TextChunker;
use crate::config::StreamingConfig;
use crate::error::{Error, Result};

/// A loaded document able to produce its chunk fragments
pub trait LoadedDocument: Send + Sync {
    /// Chunk fragments in document order
    fn chunk(&self) -> Result<Vec<String>>;
}

/// Loads every document found at a source path
///
/// IO failures are returned as errors and end the stream that requested them.
#[async_trait]
pub trait DocumentLoader: Send + Sync {
    async fn load(&self, source: &Path) -> Result<Vec<Box<dyn LoadedDocument>>>;
}

/// In-memory text document
#[derive(Debug, Clone)]
pub struct TextDocument {
    path: PathBuf,
    content: String,
    chunker: TextChunker,
}

impl TextDocument {
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>, chunker: TextChunker) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            chunker,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

impl LoadedDocument for TextDocument {
    fn chunk(&self) -> Result<Vec<String>> {
        Ok(self.chunker.chunk_text(&self.content))
    }
}

/// Loads `.txt` and markdown files from a file or directory tree
#[derive(Debug, Clone)]
pub struct TextFileLoader {
    chunker: TextChunker,
}

impl TextFileLoader {
    /// File extensions picked up when walking a directory
    pub const EXTENSIONS: &'static [&'static str] = &["txt", "text", "md", "markdown"];

    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            chunker: TextChunker::new(chunk_size, chunk_overlap),
        }
    }

    /// Loader chunking at the configured `chunk_size`, without overlap
    pub fn from_config(config: &StreamingConfig) -> Self {
        Self::new(config.chunk_size, 0)
    }

    fn is_supported(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| Self::EXTENSIONS.contains(&ext.to_lowercase().as_str()))
            .unwrap_or(false)
    }

    fn collect_paths(source: &Path) -> Result<Vec<PathBuf>> {
        let mut paths = Vec::new();
        for entry in WalkDir::new(source).follow_links(true).sort_by_file_name() {
            let entry = entry.map_err(|e| Error::loader(e.to_string()))?;
            let path = entry.path();
            if path.is_file() && Self::is_supported(path) {
                paths.push(path.to_path_buf());
            }
        }
        Ok(paths)
    }
}

impl Default for TextFileLoader {
    fn default() -> Self {
        Self::from_config(&StreamingConfig::default())
    }
}

#[async_trait]
impl DocumentLoader for TextFileLoader {
    async fn load(&self, source: &Path) -> Result<Vec<Box<dyn LoadedDocument>>> {
        let metadata = tokio::fs::metadata(source)
            .await
            .map_err(|e| Error::loader(format!("{}: {}", source.display(), e)))?;

        let paths = if metadata.is_dir() {
            Self::collect_paths(source)?
        } else {
            vec![source.to_path_buf()]
        };

        let mut documents: Vec<Box<dyn LoadedDocument>> = Vec::with_capacity(paths.len());
        for path in paths {
            let content = tokio::fs::read_to_string(&path).await?;
            documents.push(Box::new(TextDocument::new(path, content, self.chunker)));
        }

        tracing::debug!(
            source = %source.display(),
            documents = documents.len(),
            "Loaded text documents"
        );
        Ok(documents)
    }
}

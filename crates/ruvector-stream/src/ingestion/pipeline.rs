//! Collaborator handle passed to each streaming call

use std::sync::Arc;

use super::loader::DocumentLoader;
use crate::providers::{EmbeddingProvider, Retriever};

/// Loader, embedder and retriever used by one ingestion run
///
/// Cheap to clone; the engine borrows it per call and never owns the
/// backends behind it.
#[derive(Clone)]
pub struct IngestPipeline {
    pub loader: Arc<dyn DocumentLoader>,
    pub embedder: Arc<dyn EmbeddingProvider>,
    pub retriever: Arc<dyn Retriever>,
}

impl IngestPipeline {
    pub fn new(
        loader: Arc<dyn DocumentLoader>,
        embedder: Arc<dyn EmbeddingProvider>,
        retriever: Arc<dyn Retriever>,
    ) -> Self {
        Self {
            loader,
            embedder,
            retriever,
        }
    }
}

impl std::fmt::Debug for IngestPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IngestPipeline")
            .field("embedder", &self.embedder.name())
            .field("retriever", &self.retriever.name())
            .finish_non_exhaustive()
    }
}

//! Vector storage trait used after embedding

use async_trait::async_trait;
use crate::error::Result;

/// Trait for persisting embeddings
///
/// Only completion matters to the streaming engine; whatever the store
/// returns beyond success or failure is ignored.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Retriever: Send + Sync {
    /// Store a batch of vectors
    async fn store(&self, vectors: &[Vec<f32>]) -> Result<()>;

    /// Get store name
    fn name(&self) -> &str {
        "retriever"
    }
}

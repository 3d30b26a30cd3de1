//! Provider abstractions for embedding generation and vector storage
//!
//! The streaming engine only awaits these; concrete backends live with the
//! host application.

pub mod embedding;
pub mod retriever;

pub use embedding::EmbeddingProvider;
pub use retriever::Retriever;

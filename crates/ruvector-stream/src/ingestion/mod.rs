//! Document loading, chunking and the per-call pipeline handle

mod chunker;
mod loader;
mod pipeline;
mod stream;

pub use chunker::TextChunker;
pub use loader::{DocumentLoader, LoadedDocument, TextDocument, TextFileLoader};
pub use pipeline::IngestPipeline;
pub use stream::load_in_chunks;

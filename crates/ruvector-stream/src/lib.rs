//! ruvector-stream: Memory-safe streaming ingestion for RAG pipelines
//!
//! Documents are loaded, chunked, embedded and stored one chunk at a time.
//! A [`BackpressureController`] suspends intake while process memory or the
//! result buffer crosses its pause threshold, and a per-stream token budget
//! stops runaway inputs before they reach the embedder.
//!
//! ```no_run
//! use futures::StreamExt;
//! use ruvector_stream::{IngestPipeline, StreamingConfig, StreamingProcessor};
//!
//! # async fn run(pipeline: IngestPipeline) -> ruvector_stream::Result<()> {
//! let processor = StreamingProcessor::new(StreamingConfig::default())?;
//! let mut results = processor.process_document_stream("./docs", &pipeline);
//! while let Some(result) = results.next().await {
//!     let result = result?;
//!     if !result.processed {
//!         eprintln!("chunk failed: {:?}", result.error);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod backpressure;
pub mod config;
pub mod error;
pub mod ingestion;
pub mod memory;
pub mod processing;
pub mod providers;

pub use backpressure::{BackpressureController, BackpressureStatus, ReliefTimerState};
pub use config::{BackpressureConfig, StreamingConfig, StreamingPreset};
pub use error::{Error, Result};
pub use ingestion::{load_in_chunks, DocumentLoader, IngestPipeline, LoadedDocument, TextFileLoader};
pub use memory::{MemoryMonitor, MemoryReport, MemoryStatus, MemorySource};
pub use processing::{ProcessingResult, StreamProgress, StreamStats, StreamingProcessor};
pub use providers::{EmbeddingProvider, Retriever};

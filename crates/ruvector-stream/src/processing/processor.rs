//! Backpressure-aware document ingestion stream
//!
//! ```text
//! loader -> chunks -> [token budget] -> embed + store -> buffer -> consumer
//!                                                        ^
//!                                     BackpressureController gate
//! ```
//!
//! Chunks are processed strictly one at a time and yielded in input order.
//! Embedding and storage failures are reported on the yielded result; the
//! token budget and loader failures end the stream with an error.

use futures::stream::{BoxStream, Stream, StreamExt, TryStreamExt};
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

use super::gc::{GcHint, NoopGcHint};
use super::result::{ProcessingResult, StreamProgress, StreamStats};
use super::tokens::TokenEstimator;
use crate::backpressure::BackpressureController;
use crate::config::StreamingConfig;
use crate::error::{Error, Result};
use crate::ingestion::{load_in_chunks, IngestPipeline};
use crate::memory::{MemoryMonitor, MemorySource};

/// Chunks between "approaching token limit" checks
pub const TOKEN_WARNING_INTERVAL: usize = 10;
/// Chunks between GC hints
pub const GC_HINT_INTERVAL: usize = 50;

/// Drives chunk ingestion under memory and token budgets
pub struct StreamingProcessor {
    config: StreamingConfig,
    monitor: MemoryMonitor,
    estimator: TokenEstimator,
    gc_hint: Arc<dyn GcHint>,
    stats: Arc<Mutex<StreamStats>>,
}

impl StreamingProcessor {
    /// Create a processor watching the current process's memory
    pub fn new(config: StreamingConfig) -> Result<Self> {
        let monitor = MemoryMonitor::new(config.max_memory_mb);
        Self::with_monitor(config, monitor)
    }

    /// Create a processor reading memory from `source`
    pub fn with_memory_source(
        config: StreamingConfig,
        source: Arc<dyn MemorySource>,
    ) -> Result<Self> {
        let monitor = MemoryMonitor::with_source(config.max_memory_mb, source);
        Self::with_monitor(config, monitor)
    }

    fn with_monitor(config: StreamingConfig, monitor: MemoryMonitor) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            estimator: TokenEstimator::new(config.chars_per_token),
            config,
            monitor,
            gc_hint: Arc::new(NoopGcHint),
            stats: Arc::new(Mutex::new(StreamStats::default())),
        })
    }

    /// Install a memory release hook
    pub fn with_gc_hint(mut self, gc_hint: Arc<dyn GcHint>) -> Self {
        self.gc_hint = gc_hint;
        self
    }

    pub fn config(&self) -> &StreamingConfig {
        &self.config
    }

    pub fn monitor(&self) -> &MemoryMonitor {
        &self.monitor
    }

    /// Counters of the running or most recent stream.
    ///
    /// One set of counters is shared by every stream of this processor and is
    /// reset when a stream starts, so with overlapping streams the last one
    /// to start or advance wins. Use a processor per stream to keep them apart.
    pub fn stats(&self) -> StreamStats {
        *self.stats.lock()
    }

    /// Ingest every chunk found at `source`.
    ///
    /// Yields one result per chunk, in order, each annotated with progress.
    /// A token budget overrun or a loader failure is yielded as the final
    /// `Err`. The stream owns its backpressure controller; dropping the
    /// stream early cancels any pending relief check.
    pub fn process_document_stream(
        &self,
        source: impl Into<PathBuf>,
        pipeline: &IngestPipeline,
    ) -> BoxStream<'static, Result<ProcessingResult>> {
        let run = StreamRun {
            stream_id: Uuid::new_v4(),
            source: source.into(),
            pipeline: pipeline.clone(),
            config: self.config.clone(),
            monitor: self.monitor.clone(),
            estimator: self.estimator,
            gc_hint: self.gc_hint.clone(),
            stats: self.stats.clone(),
        };
        run.into_stream().boxed()
    }

    /// Embed and store a single chunk.
    ///
    /// Never fails: collaborator errors are captured on the result.
    pub async fn process_chunk(chunk: impl Into<String>, pipeline: &IngestPipeline) -> ProcessingResult {
        let chunk = chunk.into();
        let started = Instant::now();
        let outcome = embed_and_store(&chunk, pipeline).await;
        let duration_ms = started.elapsed().as_millis() as u64;

        match outcome {
            Ok(vector) => ProcessingResult::success(chunk, vector, duration_ms),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    chunk_chars = chunk.chars().count(),
                    "Chunk processing failed"
                );
                ProcessingResult::failure(chunk, e.to_string(), duration_ms)
            }
        }
    }
}

impl std::fmt::Debug for StreamingProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamingProcessor")
            .field("config", &self.config)
            .field("monitor", &self.monitor)
            .finish_non_exhaustive()
    }
}

async fn embed_and_store(chunk: &str, pipeline: &IngestPipeline) -> Result<Vec<f32>> {
    let vector = pipeline
        .embedder
        .embed(&[chunk.to_owned()])
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| Error::embedding("embedder returned no vectors"))?;

    pipeline.retriever.store(std::slice::from_ref(&vector)).await?;
    Ok(vector)
}

/// Everything one stream needs, detached from the processor
struct StreamRun {
    stream_id: Uuid,
    source: PathBuf,
    pipeline: IngestPipeline,
    config: StreamingConfig,
    monitor: MemoryMonitor,
    estimator: TokenEstimator,
    gc_hint: Arc<dyn GcHint>,
    stats: Arc<Mutex<StreamStats>>,
}

impl StreamRun {
    fn into_stream(self) -> impl Stream<Item = Result<ProcessingResult>> + Send + 'static {
        async_stream::stream! {
            *self.stats.lock() = StreamStats::default();
            let controller: BackpressureController<ProcessingResult> =
                match BackpressureController::new(self.config.backpressure(), self.monitor.clone()) {
                    Ok(controller) => controller,
                    Err(e) => {
                        tracing::error!(
                            stream_id = %self.stream_id,
                            error = %e,
                            code = e.code(),
                            "Document stream failed"
                        );
                        yield Err(e);
                        return;
                    }
                };
            let mut total_tokens = 0usize;
            let mut chunk_count = 0usize;

            let chunks: Vec<String> =
                match load_in_chunks(self.source.clone(), self.pipeline.loader.clone())
                    .try_collect()
                    .await
                {
                    Ok(chunks) => chunks,
                    Err(e) => {
                        self.log_failure(&e, total_tokens, chunk_count, &controller);
                        yield Err(e);
                        return;
                    }
                };

            let mut progress = StreamProgress::new(chunks.len());
            tracing::info!(
                stream_id = %self.stream_id,
                source = %self.source.display(),
                total_chunks = chunks.len(),
                "Document stream started"
            );

            for chunk in chunks {
                controller.wait_for_relief().await;

                chunk_count += 1;
                total_tokens += self.estimator.estimate(&chunk);
                {
                    let mut stats = self.stats.lock();
                    stats.total_tokens = total_tokens;
                    stats.chunks_seen = chunk_count;
                }

                if total_tokens > self.config.token_limit {
                    tracing::error!(
                        stream_id = %self.stream_id,
                        total_tokens,
                        token_limit = self.config.token_limit,
                        "Token limit exceeded"
                    );
                    let e = Error::token_limit_exceeded(total_tokens, self.config.token_limit);
                    self.log_failure(&e, total_tokens, chunk_count, &controller);
                    yield Err(e);
                    return;
                }

                if total_tokens as f64 > self.config.token_warning_level()
                    && chunk_count % TOKEN_WARNING_INTERVAL == 0
                {
                    tracing::warn!(
                        stream_id = %self.stream_id,
                        total_tokens,
                        token_limit = self.config.token_limit,
                        chunk = chunk_count,
                        "Approaching token limit"
                    );
                    self.stats.lock().token_warnings += 1;
                }

                let result = StreamingProcessor::process_chunk(chunk, &self.pipeline).await;
                controller.add_to_buffer(result).await;

                for result in controller.remove_from_buffer(1) {
                    yield Ok(self.annotate(result, &mut progress));
                }

                if chunk_count % GC_HINT_INTERVAL == 0 {
                    tracing::debug!(stream_id = %self.stream_id, chunk = chunk_count, "GC hint");
                    self.gc_hint.collect();
                }
            }

            for result in controller.drain_buffer() {
                yield Ok(self.annotate(result, &mut progress));
            }

            tracing::info!(
                stream_id = %self.stream_id,
                chunks = chunk_count,
                total_tokens,
                processed = progress.processed,
                failed = progress.failed,
                "Document stream completed"
            );
            controller.close();
        }
    }

    fn annotate(&self, mut result: ProcessingResult, progress: &mut StreamProgress) -> ProcessingResult {
        progress.record(result.processed);
        {
            let mut stats = self.stats.lock();
            stats.processed = progress.processed;
            stats.failed = progress.failed;
        }
        result.progress = Some(*progress);
        result
    }

    fn log_failure(
        &self,
        error: &Error,
        total_tokens: usize,
        chunk_count: usize,
        controller: &BackpressureController<ProcessingResult>,
    ) {
        let status = controller.status();
        tracing::error!(
            stream_id = %self.stream_id,
            source = %self.source.display(),
            error = %error,
            code = error.code(),
            total_tokens,
            chunks = chunk_count,
            buffer_size = status.buffer_size,
            memory_percent = status.memory.usage_percentage,
            memory_status = %status.memory.status,
            "Document stream failed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingestion::{DocumentLoader, LoadedDocument, TextFileLoader};
    use crate::memory::ManualMemorySource;
    use crate::providers::embedding::MockEmbeddingProvider;
    use crate::providers::retriever::MockRetriever;
    use async_trait::async_trait;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tracing_subscriber::layer::{Context, SubscriberExt};
    use tracing_subscriber::Layer;

    struct Prechunked(Vec<String>);

    impl LoadedDocument for Prechunked {
        fn chunk(&self) -> Result<Vec<String>> {
            Ok(self.0.clone())
        }
    }

    struct StaticLoader(Vec<String>);

    #[async_trait]
    impl DocumentLoader for StaticLoader {
        async fn load(&self, _source: &Path) -> Result<Vec<Box<dyn LoadedDocument>>> {
            Ok(vec![Box::new(Prechunked(self.0.clone()))])
        }
    }

    struct BrokenLoader;

    #[async_trait]
    impl DocumentLoader for BrokenLoader {
        async fn load(&self, source: &Path) -> Result<Vec<Box<dyn LoadedDocument>>> {
            Err(Error::loader(format!("{} is unreadable", source.display())))
        }
    }

    /// Memory source that counts how often it is read
    struct SampledMemory {
        inner: ManualMemorySource,
        samples: AtomicUsize,
    }

    impl SampledMemory {
        fn with_heap_used_mb(mb: u64) -> Self {
            Self {
                inner: ManualMemorySource::with_heap_used_mb(mb),
                samples: AtomicUsize::new(0),
            }
        }

        fn samples(&self) -> usize {
            self.samples.load(Ordering::SeqCst)
        }
    }

    impl MemorySource for SampledMemory {
        fn sample(&self) -> crate::memory::MemoryUsageSnapshot {
            self.samples.fetch_add(1, Ordering::SeqCst);
            self.inner.sample()
        }
    }

    #[derive(Default)]
    struct CountingGcHint(AtomicUsize);

    impl GcHint for CountingGcHint {
        fn collect(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// Records the message of every tracing event
    #[derive(Clone, Default)]
    struct CaptureLayer(Arc<Mutex<Vec<String>>>);

    struct MessageVisitor<'a>(&'a mut String);

    impl tracing::field::Visit for MessageVisitor<'_> {
        fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
            if field.name() == "message" {
                *self.0 = format!("{:?}", value);
            }
        }
    }

    impl<S: tracing::Subscriber> Layer<S> for CaptureLayer {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            let mut message = String::new();
            event.record(&mut MessageVisitor(&mut message));
            self.0.lock().push(message);
        }
    }

    fn chunks(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|s| s.to_string()).collect()
    }

    fn embedder_ok() -> MockEmbeddingProvider {
        let mut embedder = MockEmbeddingProvider::new();
        embedder
            .expect_embed()
            .returning(|texts| Ok(texts.iter().map(|t| vec![t.len() as f32]).collect()));
        embedder
    }

    fn retriever_ok() -> MockRetriever {
        let mut retriever = MockRetriever::new();
        retriever.expect_store().returning(|_| Ok(()));
        retriever
    }

    fn pipeline(
        loader: impl DocumentLoader + 'static,
        embedder: MockEmbeddingProvider,
        retriever: MockRetriever,
    ) -> IngestPipeline {
        IngestPipeline::new(Arc::new(loader), Arc::new(embedder), Arc::new(retriever))
    }

    fn processor(config: StreamingConfig) -> (StreamingProcessor, Arc<ManualMemorySource>) {
        let source = Arc::new(ManualMemorySource::with_heap_used_mb(10));
        let processor = StreamingProcessor::with_memory_source(config, source.clone()).unwrap();
        (processor, source)
    }

    #[tokio::test]
    async fn test_streams_all_chunks_in_order() {
        let mut retriever = MockRetriever::new();
        retriever.expect_store().times(4).returning(|_| Ok(()));
        let pipeline = pipeline(
            StaticLoader(chunks(&["c1", "c2", "c3", "c4"])),
            embedder_ok(),
            retriever,
        );
        let (processor, _) = processor(StreamingConfig::default());

        let results: Vec<ProcessingResult> = processor
            .process_document_stream("doc.txt", &pipeline)
            .try_collect()
            .await
            .unwrap();

        let texts: Vec<&str> = results.iter().map(|r| r.chunk.as_str()).collect();
        assert_eq!(texts, vec!["c1", "c2", "c3", "c4"]);
        assert!(results.iter().all(|r| r.processed && r.vector.is_some()));
        assert_eq!(
            results.last().unwrap().progress,
            Some(StreamProgress {
                processed: 4,
                failed: 0,
                total: 4
            })
        );
        assert_eq!(results[1].progress.unwrap().processed, 2);
    }

    #[tokio::test]
    async fn test_token_limit_is_fatal() {
        let mut embedder = MockEmbeddingProvider::new();
        embedder.expect_embed().never();
        let mut retriever = MockRetriever::new();
        retriever.expect_store().never();
        let pipeline = pipeline(StaticLoader(vec!["x".repeat(60)]), embedder, retriever);

        let config = StreamingConfig {
            token_limit: 10,
            ..Default::default()
        };
        let (processor, _) = processor(config);

        let mut stream = processor.process_document_stream("doc.txt", &pipeline);
        let err = stream.next().await.unwrap().unwrap_err();
        assert_eq!(err.code(), "TOKEN_LIMIT_EXCEEDED");
        assert!(matches!(
            err,
            Error::TokenLimitExceeded {
                current: 15,
                limit: 10
            }
        ));
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn test_token_limit_stops_midway() {
        let pipeline = pipeline(
            StaticLoader(vec!["y".repeat(40); 5]),
            embedder_ok(),
            retriever_ok(),
        );
        let config = StreamingConfig {
            token_limit: 25,
            ..Default::default()
        };
        let (processor, _) = processor(config);

        let items: Vec<Result<ProcessingResult>> =
            processor.process_document_stream("doc.txt", &pipeline).collect().await;
        // 10 tokens per chunk: the third chunk crosses 25
        assert_eq!(items.len(), 3);
        assert!(items[0].is_ok() && items[1].is_ok());
        assert_eq!(items[2].as_ref().unwrap_err().code(), "TOKEN_LIMIT_EXCEEDED");
        assert_eq!(processor.stats().total_tokens, 30);
    }

    #[tokio::test]
    async fn test_embed_failures_are_reported_per_chunk() {
        let mut embedder = MockEmbeddingProvider::new();
        embedder
            .expect_embed()
            .times(5)
            .returning(|_| Err(Error::embedding("model not loaded")));
        let mut retriever = MockRetriever::new();
        retriever.expect_store().never();
        let pipeline = pipeline(
            StaticLoader(chunks(&["a", "b", "c", "d", "e"])),
            embedder,
            retriever,
        );
        let (processor, _) = processor(StreamingConfig::default());

        let results: Vec<ProcessingResult> = processor
            .process_document_stream("doc.txt", &pipeline)
            .try_collect()
            .await
            .unwrap();

        assert_eq!(results.len(), 5);
        for result in &results {
            assert!(!result.processed);
            assert!(result.vector.is_none());
            assert!(result.error.as_deref().unwrap().contains("model not loaded"));
            assert!(result.duration_ms >= 1);
        }
        assert_eq!(results[4].progress.unwrap().failed, 5);
        assert_eq!(processor.stats().failed, 5);
    }

    #[tokio::test]
    async fn test_store_failure_marks_chunk_failed() {
        let mut retriever = MockRetriever::new();
        retriever
            .expect_store()
            .times(1)
            .returning(|_| Err(Error::retriever("index read-only")));
        let pipeline = pipeline(StaticLoader(vec![]), embedder_ok(), retriever);

        let result = StreamingProcessor::process_chunk("lonely chunk", &pipeline).await;
        assert!(!result.processed);
        assert!(result.vector.is_none());
        assert_eq!(
            result.error.as_deref(),
            Some("Vector storage failed: index read-only")
        );
    }

    #[tokio::test]
    async fn test_empty_embedding_response_is_a_failure() {
        let mut embedder = MockEmbeddingProvider::new();
        embedder.expect_embed().returning(|_| Ok(Vec::new()));
        let pipeline = pipeline(StaticLoader(vec![]), embedder, retriever_ok());

        let result = StreamingProcessor::process_chunk("chunk", &pipeline).await;
        assert!(!result.processed);
        assert!(result.error.unwrap().contains("no vectors"));
    }

    #[tokio::test]
    async fn test_warns_when_approaching_token_limit() {
        let capture = CaptureLayer::default();
        let subscriber = tracing_subscriber::registry().with(capture.clone());
        let _guard = tracing::subscriber::set_default(subscriber);

        let pipeline = pipeline(
            StaticLoader(vec!["z".repeat(328); 10]),
            embedder_ok(),
            retriever_ok(),
        );
        let config = StreamingConfig {
            token_limit: 1000,
            token_warning_threshold: 0.8,
            ..Default::default()
        };
        let (processor, _) = processor(config);

        let results: Vec<ProcessingResult> = processor
            .process_document_stream("doc.txt", &pipeline)
            .try_collect()
            .await
            .unwrap();

        assert_eq!(results.len(), 10);
        assert_eq!(processor.stats().total_tokens, 820);
        assert_eq!(processor.stats().token_warnings, 1);

        let messages = capture.0.lock();
        let warnings = messages
            .iter()
            .filter(|m| m.as_str() == "Approaching token limit")
            .count();
        assert_eq!(warnings, 1);
        assert!(messages.iter().any(|m| m == "Document stream completed"));
    }

    #[tokio::test]
    async fn test_loader_failure_is_fatal() {
        let pipeline = pipeline(BrokenLoader, embedder_ok(), retriever_ok());
        let (processor, _) = processor(StreamingConfig::default());

        let items: Vec<Result<ProcessingResult>> =
            processor.process_document_stream("missing.txt", &pipeline).collect().await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].as_ref().unwrap_err().code(), "LOADER_ERROR");
    }

    #[tokio::test(start_paused = true)]
    async fn test_memory_pressure_delays_but_completes() {
        let pipeline = pipeline(
            StaticLoader(chunks(&["p1", "p2", "p3"])),
            embedder_ok(),
            retriever_ok(),
        );
        let config = StreamingConfig {
            max_memory_mb: 100,
            ..Default::default()
        };
        let (processor, memory) = processor(config);
        memory.set_heap_used_mb(95);

        tokio::spawn({
            let memory = memory.clone();
            async move {
                tokio::time::sleep(Duration::from_secs(3)).await;
                memory.set_heap_used_mb(20);
            }
        });

        let started = tokio::time::Instant::now();
        let results: Vec<ProcessingResult> = processor
            .process_document_stream("doc.txt", &pipeline)
            .try_collect()
            .await
            .unwrap();

        assert_eq!(results.len(), 3);
        assert!(started.elapsed() >= Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_paused_stream_stops_relief_checks() {
        let pipeline = pipeline(
            StaticLoader(chunks(&["q1", "q2"])),
            embedder_ok(),
            retriever_ok(),
        );
        let config = StreamingConfig {
            max_memory_mb: 100,
            ..Default::default()
        };
        let memory = Arc::new(SampledMemory::with_heap_used_mb(95));
        let processor = StreamingProcessor::with_memory_source(config, memory.clone()).unwrap();

        let mut stream = processor.process_document_stream("doc.txt", &pipeline);
        let pending = tokio::time::timeout(Duration::from_secs(5), stream.next()).await;
        assert!(pending.is_err(), "stream should stay suspended under memory pressure");
        assert_eq!(processor.stats().chunks_seen, 0);

        // The relief task samples memory on every tick while paused
        let before = memory.samples();
        tokio::time::sleep(Duration::from_secs(3)).await;
        assert!(memory.samples() > before);

        drop(stream);
        let after_drop = memory.samples();
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(memory.samples(), after_drop);
    }

    #[tokio::test]
    async fn test_overlapping_streams_share_stats() {
        let pipeline = pipeline(
            StaticLoader(chunks(&["aaaa", "bbbb", "cccc"])),
            embedder_ok(),
            retriever_ok(),
        );
        let (processor, _) = processor(StreamingConfig::default());

        let mut first = processor.process_document_stream("a.txt", &pipeline);
        first.next().await.unwrap().unwrap();
        first.next().await.unwrap().unwrap();
        assert_eq!(processor.stats().processed, 2);

        let mut second = processor.process_document_stream("b.txt", &pipeline);
        second.next().await.unwrap().unwrap();
        let stats = processor.stats();
        assert_eq!(stats.chunks_seen, 1);
        assert_eq!(stats.processed, 1);
    }

    #[tokio::test]
    async fn test_gc_hint_every_fifty_chunks() {
        let gc = Arc::new(CountingGcHint::default());
        let pipeline = pipeline(StaticLoader(vec!["g".to_string(); 120]), embedder_ok(), retriever_ok());
        let (processor, _) = processor(StreamingConfig::default());
        let processor = processor.with_gc_hint(gc.clone());

        let results: Vec<ProcessingResult> = processor
            .process_document_stream("doc.txt", &pipeline)
            .try_collect()
            .await
            .unwrap();

        assert_eq!(results.len(), 120);
        assert_eq!(gc.0.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_stats_reset_for_each_stream() {
        let pipeline = pipeline(StaticLoader(chunks(&["abcd", "efgh"])), embedder_ok(), retriever_ok());
        let (processor, _) = processor(StreamingConfig::default());

        for _ in 0..2 {
            let results: Vec<ProcessingResult> = processor
                .process_document_stream("doc.txt", &pipeline)
                .try_collect()
                .await
                .unwrap();
            assert_eq!(results.len(), 2);
            assert_eq!(processor.stats().total_tokens, 2);
            assert_eq!(processor.stats().processed, 2);
        }
    }

    #[tokio::test]
    async fn test_streams_text_files_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.md"), "Short note.").unwrap();
        std::fs::write(dir.path().join("b.txt"), "Another note.").unwrap();

        let pipeline = IngestPipeline::new(
            Arc::new(TextFileLoader::default()),
            Arc::new(embedder_ok()),
            Arc::new(retriever_ok()),
        );
        let (processor, _) = processor(StreamingConfig::default());

        let results: Vec<ProcessingResult> = processor
            .process_document_stream(dir.path(), &pipeline)
            .try_collect()
            .await
            .unwrap();

        let texts: Vec<&str> = results.iter().map(|r| r.chunk.as_str()).collect();
        assert_eq!(texts, vec!["Short note.", "Another note."]);
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = StreamingConfig {
            pause_threshold: 0.5,
            resume_threshold: 0.6,
            ..Default::default()
        };
        assert!(StreamingProcessor::new(config).is_err());
    }
}

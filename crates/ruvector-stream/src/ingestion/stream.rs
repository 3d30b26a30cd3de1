//! Lazy chunk enumeration over loaded documents

use futures::stream::{BoxStream, Stream, StreamExt};
use std::path::PathBuf;
use std::sync::Arc;

use super::loader::DocumentLoader;
use crate::error::Result;

/// Stream every chunk fragment found at `source`.
///
/// All documents are loaded up front, then each one is chunked only when the
/// stream reaches it and dropped once its fragments have been handed out.
/// Fragments come in document order, then fragment order. The stream is
/// finite and single-use; a load or chunking error is its last item.
pub fn load_in_chunks(
    source: impl Into<PathBuf>,
    loader: Arc<dyn DocumentLoader>,
) -> BoxStream<'static, Result<String>> {
    chunk_stream(source.into(), loader).boxed()
}

fn chunk_stream(
    source: PathBuf,
    loader: Arc<dyn DocumentLoader>,
) -> impl Stream<Item = Result<String>> + Send + 'static {
    async_stream::try_stream! {
        let documents = loader.load(&source).await?;
        tracing::debug!(
            source = %source.display(),
            documents = documents.len(),
            "Enumerating document chunks"
        );

        for document in documents {
            let fragments = document.chunk()?;
            drop(document);
            for fragment in fragments {
                yield fragment;
            }
        }
    }
}

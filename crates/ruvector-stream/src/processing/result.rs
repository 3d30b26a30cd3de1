//! Per-chunk results and stream progress

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Progress counters attached to each yielded result
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamProgress {
    /// Chunks embedded and stored
    pub processed: usize,
    /// Chunks whose embedding or storage failed
    pub failed: usize,
    /// Chunks enumerated for the stream
    pub total: usize,
}

impl StreamProgress {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Default::default()
        }
    }

    pub(crate) fn record(&mut self, processed: bool) {
        if processed {
            self.processed += 1;
        } else {
            self.failed += 1;
        }
    }

    pub fn completed(&self) -> usize {
        self.processed + self.failed
    }

    pub fn percent_complete(&self) -> f32 {
        if self.total == 0 {
            return 0.0;
        }
        self.completed() as f32 / self.total as f32 * 100.0
    }
}

/// Outcome of processing one chunk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingResult {
    pub chunk: String,
    /// Embedding, present iff `processed`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vector: Option<Vec<f32>>,
    pub processed: bool,
    /// Failure message, present iff `!processed`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Wall-clock processing time, at least 1ms
    pub duration_ms: u64,
    pub timestamp: DateTime<Utc>,
    /// Set when the result is yielded from a document stream
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<StreamProgress>,
}

impl ProcessingResult {
    pub fn success(chunk: String, vector: Vec<f32>, duration_ms: u64) -> Self {
        Self {
            chunk,
            vector: Some(vector),
            processed: true,
            error: None,
            duration_ms: duration_ms.max(1),
            timestamp: Utc::now(),
            progress: None,
        }
    }

    pub fn failure(chunk: String, error: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            chunk,
            vector: None,
            processed: false,
            error: Some(error.into()),
            duration_ms: duration_ms.max(1),
            timestamp: Utc::now(),
            progress: None,
        }
    }
}

/// Live counters of the current (or last) stream of a processor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamStats {
    pub total_tokens: usize,
    pub chunks_seen: usize,
    pub processed: usize,
    pub failed: usize,
    pub token_warnings: usize,
}

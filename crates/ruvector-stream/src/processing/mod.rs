//! Chunk processing: token budget, embed + store, result streaming

mod gc;
mod processor;
mod result;
mod throttle;
mod tokens;

pub use gc::{GcHint, NoopGcHint};
pub use processor::{StreamingProcessor, GC_HINT_INTERVAL, TOKEN_WARNING_INTERVAL};
pub use result::{ProcessingResult, StreamProgress, StreamStats};
pub use throttle::throttle;
pub use tokens::TokenEstimator;

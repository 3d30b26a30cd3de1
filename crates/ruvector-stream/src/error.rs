//! Error types for the streaming ingestion engine

use thiserror::Error;

/// Result type alias for streaming operations
pub type Result<T> = std::result::Result<T, Error>;

/// Streaming ingestion errors
#[derive(Debug, Error)]
pub enum Error {
    /// Cumulative token estimate for a stream went over the configured budget
    #[error("Token limit exceeded: {current} > {limit}")]
    TokenLimitExceeded { current: usize, limit: usize },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Document loading error
    #[error("Failed to load documents: {0}")]
    Loader(String),

    /// Embedding error
    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    /// Vector storage error
    #[error("Vector storage failed: {0}")]
    Retriever(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML config parse error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a token limit error
    pub fn token_limit_exceeded(current: usize, limit: usize) -> Self {
        Self::TokenLimitExceeded { current, limit }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a loader error
    pub fn loader(message: impl Into<String>) -> Self {
        Self::Loader(message.into())
    }

    /// Create an embedding error
    pub fn embedding(message: impl Into<String>) -> Self {
        Self::Embedding(message.into())
    }

    /// Create a retriever error
    pub fn retriever(message: impl Into<String>) -> Self {
        Self::Retriever(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Stable machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            Error::TokenLimitExceeded { .. } => "TOKEN_LIMIT_EXCEEDED",
            Error::Config(_) => "CONFIG_ERROR",
            Error::Loader(_) => "LOADER_ERROR",
            Error::Embedding(_) => "EMBEDDING_ERROR",
            Error::Retriever(_) => "RETRIEVER_ERROR",
            Error::Io(_) => "IO_ERROR",
            Error::Toml(_) => "CONFIG_ERROR",
            Error::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether this error ends the stream it was raised in
    ///
    /// Embedding and storage failures are captured per chunk, everything else
    /// unwinds the stream.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Error::Embedding(_) | Error::Retriever(_))
    }
}

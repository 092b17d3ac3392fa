//! Boundary to the external preprocessing + inference pipeline.

use arrow::record_batch::RecordBatch;
use async_trait::async_trait;
use thiserror::Error;

/// Phrase the trained encoder uses when it meets a token it never saw.
pub const UNKNOWN_CATEGORIES: &str = "unknown categories";

/// Structured failure reported by a pipeline binding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    /// A categorical value was not in the encoder's training vocabulary.
    #[error("{0}")]
    UnknownCategory(String),
    #[error("{0}")]
    Other(String),
}

impl PipelineError {
    /// Classify raw error text from the underlying runtime.
    ///
    /// This is the only place free-text matching happens.
    pub fn from_message(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.contains(UNKNOWN_CATEGORIES) {
            Self::UnknownCategory(message)
        } else {
            Self::Other(message)
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::UnknownCategory(m) | Self::Other(m) => m,
        }
    }
}

/// The external pipeline: a single-row request in, a sequence of predictions out.
#[async_trait]
pub trait PredictionPipeline: Send + Sync {
    /// Short name for logs, e.g. `onnx` or `remote`.
    fn name(&self) -> &str;

    async fn predict(&self, request: &RecordBatch) -> Result<Vec<f64>, PipelineError>;
}

//! Submission handling shared by every presentation shell.
//!
//! A submission runs through a fixed sequence: validate the scores, map the
//! display labels to tokens, build the request row, invoke the pipeline once,
//! interpret the score. Shells only collect input and render the outcome.

use std::sync::Arc;
use std::time::Duration;

use arrow::record_batch::RecordBatch;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, error, info, warn};

use crate::error::SubmissionError;
use crate::features::{RawSubmission, StudentFeatures, ValidationError, validate_scores};
use crate::pipeline::{PipelineError, PredictionPipeline};
use crate::schema::build_request;
use crate::tier::Tier;

/// Default bound on a single pipeline call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Outcome of a successful submission.
#[derive(Debug, Clone)]
pub struct Prediction {
    pub score: f64,
    pub tier: Tier,
    /// The normalized values that were sent.
    pub features: StudentFeatures,
    /// The request row exactly as the pipeline received it.
    pub request: RecordBatch,
    /// Everything the pipeline returned; `score` is element 0.
    pub raw_output: Vec<f64>,
    pub predicted_at: DateTime<Utc>,
}

/// The stages of a submission, consumed identically by every shell.
#[async_trait]
pub trait SubmissionHandler: Send + Sync {
    fn validate(&self, raw: &RawSubmission) -> Result<(), ValidationError> {
        validate_scores(raw.reading_score, raw.writing_score)
    }

    fn map(&self, raw: &RawSubmission) -> StudentFeatures {
        StudentFeatures::from_submission(raw)
    }

    fn build(&self, features: &StudentFeatures) -> Result<RecordBatch, SubmissionError> {
        build_request(features).map_err(|e| SubmissionError::prediction(e.to_string()))
    }

    /// Call the pipeline and return its full output sequence.
    async fn invoke(&self, request: &RecordBatch) -> Result<Vec<f64>, SubmissionError>;

    fn interpret(&self, score: f64) -> Tier {
        Tier::from_score(score)
    }

    /// Run every stage in order. Validation happens before anything else.
    async fn submit(&self, raw: RawSubmission) -> Result<Prediction, SubmissionError> {
        debug!(?raw, "submission received");

        if let Err(e) = self.validate(&raw) {
            warn!(field = ?e.field, value = e.value, "score rejected");
            return Err(e.into());
        }

        let features = self.map(&raw);
        let request = self.build(&features)?;
        let raw_output = self.invoke(&request).await?;
        let score = *raw_output
            .first()
            .ok_or_else(|| SubmissionError::prediction("pipeline returned no predictions"))?;
        let tier = self.interpret(score);

        info!(score, tier = %tier, "prediction produced");
        Ok(Prediction {
            score,
            tier,
            features,
            request,
            raw_output,
            predicted_at: Utc::now(),
        })
    }
}

/// [`SubmissionHandler`] backed by a concrete pipeline binding.
///
/// A call that exceeds the timeout is abandoned, not cancelled: the caller
/// gets a Prediction error while a blocking binding may still be running.
#[derive(Clone)]
pub struct Predictor {
    pipeline: Arc<dyn PredictionPipeline>,
    timeout: Duration,
}

impl Predictor {
    pub fn new(pipeline: Arc<dyn PredictionPipeline>) -> Self {
        Self {
            pipeline,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn pipeline_name(&self) -> &str {
        self.pipeline.name()
    }
}

#[async_trait]
impl SubmissionHandler for Predictor {
    async fn invoke(&self, request: &RecordBatch) -> Result<Vec<f64>, SubmissionError> {
        let pipeline = self.pipeline.name();
        let outcome = tokio::time::timeout(self.timeout, self.pipeline.predict(request)).await;

        match outcome {
            Ok(Ok(output)) => Ok(output),
            Ok(Err(PipelineError::UnknownCategory(detail))) => {
                warn!(pipeline, %detail, "pipeline rejected a categorical value");
                Err(SubmissionError::UnknownCategory { detail })
            }
            Ok(Err(PipelineError::Other(detail))) => {
                error!(pipeline, %detail, "error during prediction");
                Err(SubmissionError::Prediction { detail })
            }
            Err(_) => {
                let detail = format!(
                    "prediction timed out after {:.1}s",
                    self.timeout.as_secs_f64()
                );
                error!(pipeline, %detail, "error during prediction");
                Err(SubmissionError::Prediction { detail })
            }
        }
    }
}

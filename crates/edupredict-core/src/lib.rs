//! Prediction request normalisation: label mapping, score validation, the
//! Arrow request schema, pipeline invocation and score interpretation.

pub mod error;
pub mod features;
pub mod handler;
pub mod labels;
pub mod pipeline;
pub mod schema;
pub mod tier;

pub use error::{ErrorKind, SubmissionError};
pub use features::{RawSubmission, StudentFeatures, ValidationError, validate_scores};
pub use handler::{DEFAULT_TIMEOUT, Prediction, Predictor, SubmissionHandler};
pub use labels::{Choice, Field, Gender, Lunch, ParentalEducation, RaceEthnicity, TestPreparation};
pub use pipeline::{PipelineError, PredictionPipeline};
pub use tier::Tier;

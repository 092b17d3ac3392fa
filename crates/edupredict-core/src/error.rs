use thiserror::Error;

use crate::features::ValidationError;

/// Guidance shown when the encoder rejects a categorical value.
pub const UNKNOWN_CATEGORY_CAUSE: &str = "One or more categorical values sent to the trained \
encoder do not exactly match the categories used during training.";

pub const UNKNOWN_CATEGORY_ACTIONS: &[&str] = &[
    "Use the exact dropdown options in the UI (labels are mapped to the expected values)",
    "Re-train the pipeline with normalized casing/values if you want case-insensitive inputs",
];

/// Coarse failure kind, recorded on shell-side failure logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    UnknownCategory,
    Prediction,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SubmissionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("unknown category: {detail}")]
    UnknownCategory { detail: String },

    #[error("prediction failed: {detail}")]
    Prediction { detail: String },
}

impl SubmissionError {
    pub fn prediction(detail: impl Into<String>) -> Self {
        Self::Prediction {
            detail: detail.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::UnknownCategory { .. } => ErrorKind::UnknownCategory,
            Self::Prediction { .. } => ErrorKind::Prediction,
        }
    }

    /// Headline shown to the user.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(e) => e.to_string(),
            Self::UnknownCategory { .. } | Self::Prediction { .. } => {
                "An error occurred during prediction. Please try again.".to_string()
            }
        }
    }

    /// Raw pipeline text, for the failures that came from the pipeline.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Validation(_) => None,
            Self::UnknownCategory { detail } | Self::Prediction { detail } => Some(detail),
        }
    }

    /// Likely cause and suggested fixes, only for unknown categories.
    pub fn remediation(&self) -> Option<(&'static str, &'static [&'static str])> {
        match self {
            Self::UnknownCategory { .. } => Some((UNKNOWN_CATEGORY_CAUSE, UNKNOWN_CATEGORY_ACTIONS)),
            _ => None,
        }
    }
}

//! Request-scoped input records and score validation.

use thiserror::Error;

use crate::labels::{Choice, Gender, Lunch, ParentalEducation, RaceEthnicity, TestPreparation};

pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 100.0;
/// Initial value of both score inputs.
pub const DEFAULT_SCORE: f64 = 70.0;

/// What a shell collected from the user: display choices plus raw scores.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawSubmission {
    pub gender: Gender,
    pub race_ethnicity: RaceEthnicity,
    pub parental_level_of_education: ParentalEducation,
    pub lunch: Lunch,
    pub test_preparation_course: TestPreparation,
    pub reading_score: f64,
    pub writing_score: f64,
}

impl Default for RawSubmission {
    fn default() -> Self {
        Self {
            gender: Gender::default(),
            race_ethnicity: RaceEthnicity::default(),
            parental_level_of_education: ParentalEducation::default(),
            lunch: Lunch::default(),
            test_preparation_course: TestPreparation::default(),
            reading_score: DEFAULT_SCORE,
            writing_score: DEFAULT_SCORE,
        }
    }
}

/// The normalized request record sent to the pipeline.
///
/// Categorical fields hold encoder tokens, never display labels.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentFeatures {
    pub gender: &'static str,
    pub race_ethnicity: &'static str,
    pub parental_level_of_education: &'static str,
    pub lunch: &'static str,
    pub test_preparation_course: &'static str,
    pub reading_score: f64,
    pub writing_score: f64,
}

impl StudentFeatures {
    /// Map every display choice to its token.
    pub fn from_submission(raw: &RawSubmission) -> Self {
        Self {
            gender: raw.gender.token(),
            race_ethnicity: raw.race_ethnicity.token(),
            parental_level_of_education: raw.parental_level_of_education.token(),
            lunch: raw.lunch.token(),
            test_preparation_course: raw.test_preparation_course.token(),
            reading_score: raw.reading_score,
            writing_score: raw.writing_score,
        }
    }
}

/// Which score failed the range check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreField {
    Reading,
    Writing,
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("Scores must be between 0 and 100.")]
pub struct ValidationError {
    pub field: ScoreField,
    pub value: f64,
}

fn in_range(score: f64) -> bool {
    (MIN_SCORE..=MAX_SCORE).contains(&score)
}

/// Check both scores lie in the closed interval [0, 100].
///
/// NaN is rejected. Reading is checked first.
pub fn validate_scores(reading: f64, writing: f64) -> Result<(), ValidationError> {
    if !in_range(reading) {
        return Err(ValidationError {
            field: ScoreField::Reading,
            value: reading,
        });
    }
    if !in_range(writing) {
        return Err(ValidationError {
            field: ScoreField::Writing,
            value: writing,
        });
    }
    Ok(())
}

//! The posted form body and its conversion into a [`RawSubmission`].

use edupredict_core::labels::UnknownLabel;
use edupredict_core::{Choice, RawSubmission};
use serde::Deserialize;
use thiserror::Error;

/// Urlencoded body of `POST /predictdata`.
///
/// Every field defaults to empty so a missing field surfaces as a flash
/// message instead of an extractor rejection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PredictForm {
    pub gender: String,
    pub ethnicity: String,
    pub parental_level_of_education: String,
    pub lunch: String,
    pub test_preparation_course: String,
    pub reading_score: String,
    pub writing_score: String,
}

#[derive(Debug, Error)]
pub enum FormError {
    #[error("Please enter valid scores")]
    InvalidScores,

    #[error("Please choose a valid {} option", .0.field.caption())]
    UnknownOption(#[from] UnknownLabel),
}

impl PredictForm {
    pub fn parse(&self) -> Result<RawSubmission, FormError> {
        let reading_score = parse_score(&self.reading_score)?;
        let writing_score = parse_score(&self.writing_score)?;

        Ok(RawSubmission {
            gender: self.gender.parse()?,
            race_ethnicity: self.ethnicity.parse()?,
            parental_level_of_education: self.parental_level_of_education.parse()?,
            lunch: self.lunch.parse()?,
            test_preparation_course: self.test_preparation_course.parse()?,
            reading_score,
            writing_score,
        })
    }
}

fn parse_score(s: &str) -> Result<f64, FormError> {
    s.trim().parse().map_err(|_| FormError::InvalidScores)
}

/// Values to pre-fill the form with.
#[derive(Debug, Clone, PartialEq)]
pub struct FormValues {
    pub gender: &'static str,
    pub ethnicity: &'static str,
    pub parental_level_of_education: &'static str,
    pub lunch: &'static str,
    pub test_preparation_course: &'static str,
    pub reading_score: String,
    pub writing_score: String,
}

impl Default for FormValues {
    fn default() -> Self {
        Self::from(&RawSubmission::default())
    }
}

impl From<&RawSubmission> for FormValues {
    fn from(raw: &RawSubmission) -> Self {
        Self {
            gender: raw.gender.label(),
            ethnicity: raw.race_ethnicity.label(),
            parental_level_of_education: raw.parental_level_of_education.label(),
            lunch: raw.lunch.label(),
            test_preparation_course: raw.test_preparation_course.label(),
            reading_score: format_score(raw.reading_score),
            writing_score: format_score(raw.writing_score),
        }
    }
}

fn format_score(score: f64) -> String {
    if score.fract() == 0.0 {
        format!("{score:.0}")
    } else {
        score.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use edupredict_core::{Gender, Lunch, ParentalEducation, RaceEthnicity, TestPreparation};

    fn form() -> PredictForm {
        PredictForm {
            gender: "Female".into(),
            ethnicity: "Group D".into(),
            parental_level_of_education: "Some High School".into(),
            lunch: "Free / Reduced".into(),
            test_preparation_course: "None".into(),
            reading_score: " 64 ".into(),
            writing_score: "58.5".into(),
        }
    }

    #[test]
    fn parses_labels_and_scores() {
        let raw = form().parse().unwrap();
        assert_eq!(raw.gender, Gender::Female);
        assert_eq!(raw.race_ethnicity, RaceEthnicity::GroupD);
        assert_eq!(raw.parental_level_of_education, ParentalEducation::SomeHighSchool);
        assert_eq!(raw.lunch, Lunch::FreeReduced);
        assert_eq!(raw.test_preparation_course, TestPreparation::None);
        assert_eq!(raw.reading_score, 64.0);
        assert_eq!(raw.writing_score, 58.5);
    }

    #[test]
    fn non_numeric_score() {
        let bad = PredictForm {
            writing_score: "ninety".into(),
            ..form()
        };
        let err = bad.parse().unwrap_err();
        assert!(matches!(err, FormError::InvalidScores));
        assert_eq!(err.to_string(), "Please enter valid scores");
    }

    #[test]
    fn empty_form_reports_scores_first() {
        let err = PredictForm::default().parse().unwrap_err();
        assert!(matches!(err, FormError::InvalidScores));
    }

    #[test]
    fn token_instead_of_label_is_rejected() {
        let bad = PredictForm {
            ethnicity: "group D".into(),
            ..form()
        };
        let err = bad.parse().unwrap_err();
        assert_eq!(err.to_string(), "Please choose a valid Ethnicity Group option");
    }

    #[test]
    fn out_of_range_scores_still_parse() {
        // Range checking belongs to the submission handler.
        let raw = PredictForm {
            reading_score: "105".into(),
            ..form()
        }
        .parse()
        .unwrap();
        assert_eq!(raw.reading_score, 105.0);
    }

    #[test]
    fn form_values_round_scores() {
        let values = FormValues::default();
        assert_eq!(values.reading_score, "70");
        assert_eq!(values.gender, "Male");
        let raw = form().parse().unwrap();
        assert_eq!(FormValues::from(&raw).writing_score, "58.5");
    }
}

//! Vertical card display for one prediction.
//!
//! Renders the single-row request batch grouped the way the form groups
//! its fields, followed by the score, the tier and optional raw output.

use std::fmt::Write;

use edupredict_core::schema::{CellValue, row_values};
use edupredict_core::{Prediction, SubmissionError};

const PERSONAL: &[&str] = &["gender", "race_ethnicity", "parental_level_of_education"];

const ACADEMIC: &[&str] = &[
    "lunch",
    "test_preparation_course",
    "writing_score",
    "reading_score",
];

pub fn render_card(prediction: &Prediction, details: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "=== Predicted Math Score: {:.1} / 100 ===",
        prediction.score
    );
    let _ = writeln!(out, "{}", prediction.tier.message());
    out.push('\n');

    match row_values(&prediction.request, 0) {
        Ok(values) => {
            write_section(&mut out, &values, "Personal Details", PERSONAL);
            write_section(&mut out, &values, "Academic Details", ACADEMIC);
        }
        Err(e) => {
            let _ = writeln!(out, "Model input unavailable: {e}\n");
        }
    }

    let _ = writeln!(out, "Prediction");
    let _ = writeln!(out, "  {:<28} {}", "tier", prediction.tier);
    let _ = writeln!(
        out,
        "  {:<28} {}",
        "predicted_at",
        prediction.predicted_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    if details {
        let raw: Vec<String> = prediction.raw_output.iter().map(|v| v.to_string()).collect();
        let _ = writeln!(out, "  {:<28} [{}]", "raw_output", raw.join(", "));
    }
    out
}

/// User-facing text for a failed submission, headline first.
pub fn render_failure(err: &SubmissionError) -> String {
    let mut out = format!("{}\n", err.user_message());
    if let Some(detail) = err.detail() {
        let _ = writeln!(out, "Error message: {detail}");
    }
    if let Some((cause, actions)) = err.remediation() {
        let _ = writeln!(out, "\nLikely cause: {cause}");
        let _ = writeln!(out, "What you can do:");
        for action in actions {
            let _ = writeln!(out, "  - {action}");
        }
    }
    out
}

fn write_section(out: &mut String, values: &[(String, CellValue)], header: &str, cols: &[&str]) {
    let _ = writeln!(out, "{header}");
    for &col_name in cols {
        if let Some((_, value)) = values.iter().find(|(name, _)| name == col_name) {
            let _ = writeln!(out, "  {col_name:<28} {value}");
        }
    }
    out.push('\n');
}

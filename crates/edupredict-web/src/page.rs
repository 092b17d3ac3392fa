//! HTML rendering for the landing page and the prediction form.

use std::fmt::Write;

use edupredict_core::Prediction;
use edupredict_core::labels::{Field, mapping};
use edupredict_core::schema::row_values;

use crate::flash::Flash;
use crate::form::FormValues;

const STYLE: &str = r#"
body { background-color: #f8f9fa; font-family: -apple-system, "Segoe UI", Roboto, sans-serif; color: #222; margin: 0; }
main { max-width: 760px; margin: 2rem auto; padding: 0 1rem; }
header { display: flex; align-items: center; gap: 1rem; margin-bottom: 1.5rem; }
header h1 { margin: 0; }
.intro { background-color: #e3f2fd; padding: 1rem; border-radius: 10px; margin-bottom: 2rem; }
form.card { background-color: white; border-radius: 10px; padding: 2rem; box-shadow: 0 4px 6px rgba(0, 0, 0, 0.1); }
.columns { display: flex; gap: 2rem; }
.columns > div { flex: 1; }
label { display: block; margin-top: 0.75rem; font-size: 0.9rem; }
select, input { width: 100%; padding: 0.4rem; border-radius: 8px; border: 1px solid #ccc; box-sizing: border-box; }
button { margin-top: 1.5rem; background-color: #4a6fa5; color: white; border: none; border-radius: 8px; padding: 0.5rem 1rem; width: 100%; font-size: 1rem; cursor: pointer; transition: all 0.3s ease; }
button:hover { background-color: #3a5a8a; transform: translateY(-2px); }
.flash { padding: 0.75rem 1rem; border-radius: 8px; margin-bottom: 0.75rem; }
.flash.success { background-color: #e8f5e9; color: #2e7d32; }
.flash.error { background-color: #fdecea; color: #b71c1c; }
.flash.info { background-color: #e3f2fd; color: #0d47a1; }
.success-prediction { font-size: 1.5rem; text-align: center; padding: 1.5rem; background-color: #e8f5e9; border-radius: 10px; border-left: 5px solid #4caf50; margin-top: 1rem; }
.interpretation { background-color: #e3f2fd; padding: 1rem; border-radius: 10px; margin-top: 1rem; }
details { margin-top: 1rem; }
table { border-collapse: collapse; margin-top: 0.5rem; }
td, th { border: 1px solid #ddd; padding: 0.3rem 0.6rem; text-align: left; }
footer { text-align: center; color: #666; font-size: 0.9rem; margin: 2rem 0; border-top: 1px solid #ddd; padding-top: 1rem; }
"#;

/// Minimal escaping for text and attribute positions.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<style>{STYLE}</style>
</head>
<body>
<main>
<header>
<div>
<h1>EduPredict</h1>
<strong>Math Performance Predictor</strong>
</div>
</header>
{body}
<footer>EduPredict Math Score Predictor</footer>
</main>
</body>
</html>
"#,
        title = escape(title),
    )
}

pub fn index_page() -> String {
    layout(
        "EduPredict",
        r#"<div class="intro">
Predict a student's math score from their background and their reading and
writing scores.
</div>
<p><a href="/predictdata">Open the predictor</a></p>"#,
    )
}

/// What the form page shows besides the form itself.
pub struct FormView<'a> {
    pub values: &'a FormValues,
    pub flashes: &'a [Flash],
    pub prediction: Option<&'a Prediction>,
}

pub fn form_page(view: &FormView<'_>) -> String {
    let mut body = String::new();

    for flash in view.flashes {
        let _ = writeln!(
            body,
            r#"<div class="flash {}">{}</div>"#,
            flash.level.as_str(),
            escape(&flash.message)
        );
    }

    body.push_str(
        r#"<div class="intro">
Enter student details below to predict their math score. The model expects exact
category strings as provided in the dropdown menus.
</div>
"#,
    );

    let v = view.values;
    let _ = write!(
        body,
        r#"<form class="card" method="post" action="/predictdata">
<h2>Student Information</h2>
<div class="columns">
<div>
<strong>Personal Details</strong>
{gender}{ethnicity}{parental}
</div>
<div>
<strong>Academic Details</strong>
{lunch}{test_prep}{writing}{reading}
</div>
</div>
<button type="submit">Predict Math Score</button>
</form>
"#,
        gender = select("gender", Field::Gender, v.gender),
        ethnicity = select("ethnicity", Field::RaceEthnicity, v.ethnicity),
        parental = select(
            "parental_level_of_education",
            Field::ParentalLevelOfEducation,
            v.parental_level_of_education
        ),
        lunch = select("lunch", Field::Lunch, v.lunch),
        test_prep = select(
            "test_preparation_course",
            Field::TestPreparationCourse,
            v.test_preparation_course
        ),
        writing = score_input("writing_score", "Writing Score (0-100)", &v.writing_score),
        reading = score_input("reading_score", "Reading Score (0-100)", &v.reading_score),
    );

    if let Some(prediction) = view.prediction {
        body.push_str(&result_section(prediction));
    }

    layout("EduPredict - Math Score Predictor", &body)
}

fn select(name: &str, field: Field, selected: &str) -> String {
    let mut html = format!(
        r#"<label for="{name}">{}</label><select id="{name}" name="{name}">"#,
        field.caption()
    );
    for (label, _) in mapping(field) {
        let attr = if label == selected { " selected" } else { "" };
        let label = escape(label);
        let _ = write!(html, r#"<option value="{label}"{attr}>{label}</option>"#);
    }
    html.push_str("</select>\n");
    html
}

fn score_input(name: &str, caption: &str, value: &str) -> String {
    format!(
        r#"<label for="{name}">{caption}</label><input type="number" id="{name}" name="{name}" min="0" max="100" step="1" value="{}" required>
"#,
        escape(value)
    )
}

fn result_section(prediction: &Prediction) -> String {
    let mut html = format!(
        r#"<div class="success-prediction">Predicted Math Score: <strong>{:.1} / 100</strong></div>
<div class="interpretation"><strong>Performance Interpretation:</strong> {}</div>
"#,
        prediction.score,
        escape(prediction.tier.message())
    );

    html.push_str("<details><summary>Show prediction details</summary>\n<p>Model Input Data:</p>\n<table>\n");
    match row_values(&prediction.request, 0) {
        Ok(values) => {
            for (column, value) in values {
                let _ = writeln!(
                    html,
                    "<tr><th>{}</th><td>{}</td></tr>",
                    escape(&column),
                    escape(&value.to_string())
                );
            }
        }
        Err(e) => {
            let _ = writeln!(html, "<tr><td>{}</td></tr>", escape(&e.to_string()));
        }
    }
    let raw: Vec<String> = prediction.raw_output.iter().map(|v| format!("{v}")).collect();
    let _ = write!(
        html,
        "</table>\n<p>Raw Prediction Output: [{}]</p>\n</details>\n",
        escape(&raw.join(", "))
    );
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape(r#"<b>"Bachelor's" & co</b>"#),
            "&lt;b&gt;&quot;Bachelor&#39;s&quot; &amp; co&lt;/b&gt;"
        );
    }

    #[test]
    fn form_lists_every_label_and_defaults() {
        let values = FormValues::default();
        let html = form_page(&FormView {
            values: &values,
            flashes: &[],
            prediction: None,
        });
        for field in Field::ALL {
            for (label, _) in mapping(field) {
                assert!(html.contains(&escape(label)), "missing option {label}");
            }
        }
        assert!(html.contains(r#"name="reading_score" min="0" max="100" step="1" value="70""#));
        assert!(html.contains(r#"<option value="Male" selected>"#));
        assert!(!html.contains("success-prediction\">"));
    }

    #[test]
    fn flashes_are_escaped() {
        let values = FormValues::default();
        let flashes = [Flash::error("<script>")];
        let html = form_page(&FormView {
            values: &values,
            flashes: &flashes,
            prediction: None,
        });
        assert!(html.contains(r#"<div class="flash error">&lt;script&gt;</div>"#));
    }
}

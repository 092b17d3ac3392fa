use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use edupredict_core::schema::row_values;
use edupredict_core::{Choice, Field, Prediction, SubmissionError};

use crate::form::{Focus, FormState, Outcome};
use crate::theme::Theme;

pub const SPINNER_TEXT: &str = "Analyzing student data...";

pub fn draw(f: &mut Frame, state: &FormState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(9),
            Constraint::Length(3),
            Constraint::Min(6),
            Constraint::Length(1),
        ])
        .split(f.size());

    f.render_widget(header(), rows[0]);
    draw_fields(f, rows[1], state);
    f.render_widget(submit_button(state.focus == Focus::Submit), rows[2]);
    f.render_widget(result(state), rows[3]);
    f.render_widget(help(), rows[4]);
}

fn header() -> Paragraph<'static> {
    let lines = vec![
        Line::from(Span::styled("EduPredict: Math Performance Predictor", Theme::title())),
        Line::from(Span::styled(
            "The model expects exact category strings as provided in the option lists.",
            Theme::muted(),
        )),
    ];
    Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).border_style(Theme::border()))
        .wrap(Wrap { trim: true })
}

fn draw_fields(f: &mut Frame, area: Rect, state: &FormState) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let personal = vec![
        choice_row(state, Focus::Gender, Field::Gender, state.gender),
        choice_row(state, Focus::RaceEthnicity, Field::RaceEthnicity, state.race_ethnicity),
        choice_row(
            state,
            Focus::ParentalEducation,
            Field::ParentalLevelOfEducation,
            state.parental_level_of_education,
        ),
    ];
    let academic = vec![
        choice_row(state, Focus::Lunch, Field::Lunch, state.lunch),
        choice_row(
            state,
            Focus::TestPreparation,
            Field::TestPreparationCourse,
            state.test_preparation_course,
        ),
        score_row(state, Focus::WritingScore, "Writing Score (0-100)", &state.writing_input),
        score_row(state, Focus::ReadingScore, "Reading Score (0-100)", &state.reading_input),
    ];

    f.render_widget(panel("Personal Details", personal), cols[0]);
    f.render_widget(panel("Academic Details", academic), cols[1]);
}

fn panel<'a>(title: &'a str, lines: Vec<Line<'a>>) -> Paragraph<'a> {
    Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Theme::border())
            .title(title),
    )
}

fn choice_row<C: Choice>(state: &FormState, focus: Focus, field: Field, value: C) -> Line<'static> {
    row(
        state.focus == focus,
        field.caption(),
        format!("< {} >", value.label()),
    )
}

fn score_row(state: &FormState, focus: Focus, caption: &'static str, input: &str) -> Line<'static> {
    let cursor = if state.focus == focus { "_" } else { "" };
    row(state.focus == focus, caption, format!("[{input}{cursor}]"))
}

fn row(focused: bool, caption: &'static str, value: String) -> Line<'static> {
    let marker = if focused { "> " } else { "  " };
    let style = if focused { Theme::focused() } else { Theme::text() };
    Line::from(vec![
        Span::styled(format!("{marker}{caption}: "), style),
        Span::styled(value, style),
    ])
}

fn submit_button(focused: bool) -> Paragraph<'static> {
    let style = if focused { Theme::focused() } else { Theme::button() };
    Paragraph::new(Line::from(Span::styled(" Predict Math Score ", style)))
        .block(Block::default().borders(Borders::ALL).border_style(Theme::border()))
}

fn result(state: &FormState) -> Paragraph<'_> {
    let lines = match &state.outcome {
        None => vec![Line::from(Span::styled(
            "Fill in the form and press Enter to predict.",
            Theme::muted(),
        ))],
        Some(Outcome::Pending) => vec![Line::from(Span::styled(SPINNER_TEXT, Theme::info()))],
        Some(Outcome::InputError(msg)) => {
            vec![Line::from(Span::styled(msg.clone(), Theme::error()))]
        }
        Some(Outcome::Done(Ok(prediction))) => prediction_lines(prediction, state.show_details),
        Some(Outcome::Done(Err(err))) => error_lines(err),
    };

    Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Theme::border())
                .title("Result"),
        )
        .wrap(Wrap { trim: false })
}

/// Score card, interpretation and, when expanded, the model input and raw output.
pub fn prediction_lines(prediction: &Prediction, show_details: bool) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(
            format!("Predicted Math Score: {:.1} / 100", prediction.score),
            Theme::ok(),
        )),
        Line::from(vec![
            Span::styled("Performance Interpretation: ", Theme::text()),
            Span::styled(prediction.tier.message(), Theme::info()),
        ]),
    ];

    if !show_details {
        lines.push(Line::from(Span::styled(
            "Press d to show prediction details",
            Theme::muted(),
        )));
        return lines;
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Model Input Data:", Theme::text())));
    match row_values(&prediction.request, 0) {
        Ok(values) => {
            for (column, value) in values {
                lines.push(Line::from(format!("  {column:<28} {value}")));
            }
        }
        Err(e) => lines.push(Line::from(Span::styled(e.to_string(), Theme::error()))),
    }
    let raw: Vec<String> = prediction.raw_output.iter().map(|v| v.to_string()).collect();
    lines.push(Line::from(format!(
        "Raw Prediction Output: [{}]",
        raw.join(", ")
    )));
    lines
}

pub fn error_lines(err: &SubmissionError) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled(err.user_message(), Theme::error()))];
    if let Some(detail) = err.detail() {
        lines.push(Line::from(format!("Error message: {detail}")));
    }
    if let Some((cause, actions)) = err.remediation() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("Likely cause: {cause}"),
            Theme::info(),
        )));
        lines.push(Line::from(Span::styled("What you can do:", Theme::info())));
        for action in actions {
            lines.push(Line::from(format!("  - {action}")));
        }
    }
    lines
}

fn help() -> Paragraph<'static> {
    Paragraph::new(Line::from(Span::styled(
        "Up/Down move  Left/Right change  digits edit  Enter next/predict  d details  q quit",
        Theme::muted(),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use edupredict_core::schema::build_request;
    use edupredict_core::{RawSubmission, StudentFeatures, Tier};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn prediction(score: f64) -> Prediction {
        let features = StudentFeatures::from_submission(&RawSubmission::default());
        Prediction {
            score,
            tier: Tier::from_score(score),
            request: build_request(&features).unwrap(),
            features,
            raw_output: vec![score],
            predicted_at: chrono::Utc::now(),
        }
    }

    fn text(lines: &[Line<'_>]) -> String {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn render(state: &FormState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal.draw(|f| draw(f, state)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn details_are_collapsed_by_default() {
        let p = prediction(81.26);
        let collapsed = text(&prediction_lines(&p, false));
        assert!(collapsed.contains("Predicted Math Score: 81.3 / 100"));
        assert!(collapsed.contains("Good performance"));
        assert!(!collapsed.contains("Raw Prediction Output"));

        let expanded = text(&prediction_lines(&p, true));
        assert!(expanded.contains("race_ethnicity"));
        assert!(expanded.contains("group A"));
        assert!(expanded.contains("Raw Prediction Output: [81.26]"));
    }

    #[test]
    fn unknown_category_lists_remediation() {
        let err = SubmissionError::UnknownCategory {
            detail: "Found unknown categories ['x']".into(),
        };
        let out = text(&error_lines(&err));
        assert!(out.starts_with("An error occurred during prediction. Please try again."));
        assert!(out.contains("Error message: Found unknown categories ['x']"));
        assert!(out.contains("Likely cause:"));
        assert!(out.contains("  - "));
    }

    #[test]
    fn generic_error_has_no_remediation() {
        let out = text(&error_lines(&SubmissionError::prediction("boom")));
        assert!(out.contains("Error message: boom"));
        assert!(!out.contains("Likely cause"));
    }

    #[test]
    fn renders_form_and_spinner() {
        let mut state = FormState::new();
        let screen = render(&state);
        assert!(screen.contains("> Gender: < Male >"));
        assert!(screen.contains("Reading Score (0-100): [70]"));
        assert!(screen.contains("Predict Math Score"));

        state.outcome = Some(Outcome::Pending);
        assert!(render(&state).contains(SPINNER_TEXT));
    }

    #[test]
    fn renders_prediction_card() {
        let mut state = FormState::new();
        state.outcome = Some(Outcome::Done(Ok(prediction(91.0))));
        let screen = render(&state);
        assert!(screen.contains("Predicted Math Score: 91.0 / 100"));
        assert!(screen.contains("Excellent performance"));
    }
}

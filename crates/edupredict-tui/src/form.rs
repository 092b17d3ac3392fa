//! Form state and key handling, independent of the terminal.

use crossterm::event::KeyCode;
use edupredict_core::features::{DEFAULT_SCORE, MAX_SCORE, MIN_SCORE};
use edupredict_core::{
    Choice, Gender, Lunch, ParentalEducation, Prediction, RaceEthnicity, RawSubmission,
    SubmissionError, TestPreparation,
};

/// Focusable rows, in on-screen order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Gender,
    RaceEthnicity,
    ParentalEducation,
    Lunch,
    TestPreparation,
    WritingScore,
    ReadingScore,
    Submit,
}

impl Focus {
    pub const ORDER: [Focus; 8] = [
        Focus::Gender,
        Focus::RaceEthnicity,
        Focus::ParentalEducation,
        Focus::Lunch,
        Focus::TestPreparation,
        Focus::WritingScore,
        Focus::ReadingScore,
        Focus::Submit,
    ];

    fn position(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    fn next(self) -> Self {
        Self::ORDER[(self.position() + 1) % Self::ORDER.len()]
    }

    fn prev(self) -> Self {
        let n = Self::ORDER.len();
        Self::ORDER[(self.position() + n - 1) % n]
    }
}

#[derive(Debug)]
pub enum Outcome {
    /// The pipeline call is in flight.
    Pending,
    /// A score box could not be read as a number.
    InputError(String),
    Done(Result<Prediction, SubmissionError>),
}

#[derive(Debug, PartialEq)]
pub enum Action {
    None,
    Submit(RawSubmission),
    Quit,
}

#[derive(Debug)]
pub struct FormState {
    pub focus: Focus,
    pub gender: Gender,
    pub race_ethnicity: RaceEthnicity,
    pub parental_level_of_education: ParentalEducation,
    pub lunch: Lunch,
    pub test_preparation_course: TestPreparation,
    pub writing_input: String,
    pub reading_input: String,
    pub outcome: Option<Outcome>,
    pub show_details: bool,
}

impl Default for FormState {
    fn default() -> Self {
        Self::new()
    }
}

impl FormState {
    pub fn new() -> Self {
        let defaults = RawSubmission::default();
        Self {
            focus: Focus::Gender,
            gender: defaults.gender,
            race_ethnicity: defaults.race_ethnicity,
            parental_level_of_education: defaults.parental_level_of_education,
            lunch: defaults.lunch,
            test_preparation_course: defaults.test_preparation_course,
            writing_input: format!("{DEFAULT_SCORE:.0}"),
            reading_input: format!("{DEFAULT_SCORE:.0}"),
            outcome: None,
            show_details: false,
        }
    }

    pub fn handle_key(&mut self, code: KeyCode) -> Action {
        match code {
            KeyCode::Esc | KeyCode::Char('q') => return Action::Quit,
            KeyCode::Down | KeyCode::Tab => self.focus = self.focus.next(),
            KeyCode::Up | KeyCode::BackTab => self.focus = self.focus.prev(),
            KeyCode::Left => self.adjust(false),
            KeyCode::Right => self.adjust(true),
            KeyCode::Char('d') => self.show_details = !self.show_details,
            KeyCode::Char(c) if c.is_ascii_digit() || c == '.' => {
                if let Some(input) = self.score_input_mut() {
                    input.push(c);
                }
            }
            KeyCode::Backspace => {
                if let Some(input) = self.score_input_mut() {
                    input.pop();
                }
            }
            KeyCode::Enter if self.focus != Focus::Submit => self.focus = self.focus.next(),
            KeyCode::Enter => match self.submission() {
                Ok(raw) => return Action::Submit(raw),
                Err(msg) => self.outcome = Some(Outcome::InputError(msg)),
            },
            _ => {}
        }
        Action::None
    }

    /// Read the current widget values. Range checking is left to the
    /// submission handler; only unparsable text is rejected here.
    pub fn submission(&self) -> Result<RawSubmission, String> {
        let parse = |s: &str| {
            s.trim()
                .parse::<f64>()
                .map_err(|_| "Please enter valid scores".to_string())
        };
        Ok(RawSubmission {
            gender: self.gender,
            race_ethnicity: self.race_ethnicity,
            parental_level_of_education: self.parental_level_of_education,
            lunch: self.lunch,
            test_preparation_course: self.test_preparation_course,
            reading_score: parse(&self.reading_input)?,
            writing_score: parse(&self.writing_input)?,
        })
    }

    fn score_input_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            Focus::WritingScore => Some(&mut self.writing_input),
            Focus::ReadingScore => Some(&mut self.reading_input),
            _ => None,
        }
    }

    fn adjust(&mut self, forward: bool) {
        match self.focus {
            Focus::Gender => self.gender = cycle(self.gender, forward),
            Focus::RaceEthnicity => self.race_ethnicity = cycle(self.race_ethnicity, forward),
            Focus::ParentalEducation => {
                self.parental_level_of_education =
                    cycle(self.parental_level_of_education, forward)
            }
            Focus::Lunch => self.lunch = cycle(self.lunch, forward),
            Focus::TestPreparation => {
                self.test_preparation_course = cycle(self.test_preparation_course, forward)
            }
            Focus::WritingScore => step(&mut self.writing_input, forward),
            Focus::ReadingScore => step(&mut self.reading_input, forward),
            Focus::Submit => {}
        }
    }
}

fn cycle<C: Choice>(current: C, forward: bool) -> C {
    let n = C::ALL.len();
    let i = current.index();
    let next = if forward { (i + 1) % n } else { (i + n - 1) % n };
    C::ALL[next]
}

/// Step a score box by one, clamped to the valid range. Unparsable text
/// resets to the default.
fn step(input: &mut String, up: bool) {
    let value = match input.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => {
            let delta = if up { 1.0 } else { -1.0 };
            (v + delta).clamp(MIN_SCORE, MAX_SCORE)
        }
        _ => DEFAULT_SCORE,
    };
    *input = if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        value.to_string()
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn focus_on(state: &mut FormState, target: Focus) {
        while state.focus != target {
            state.handle_key(KeyCode::Tab);
        }
    }

    #[test]
    fn starts_on_defaults() {
        let state = FormState::new();
        let raw = state.submission().unwrap();
        assert_eq!(raw, RawSubmission::default());
        assert_eq!(state.reading_input, "70");
        assert!(state.outcome.is_none());
    }

    #[test]
    fn focus_wraps_both_ways() {
        let mut state = FormState::new();
        state.handle_key(KeyCode::Up);
        assert_eq!(state.focus, Focus::Submit);
        state.handle_key(KeyCode::Down);
        assert_eq!(state.focus, Focus::Gender);
    }

    #[test]
    fn left_right_cycle_choices() {
        let mut state = FormState::new();
        state.handle_key(KeyCode::Left);
        assert_eq!(state.gender, Gender::Other);
        state.handle_key(KeyCode::Right);
        state.handle_key(KeyCode::Right);
        assert_eq!(state.gender, Gender::Female);

        focus_on(&mut state, Focus::Lunch);
        state.handle_key(KeyCode::Right);
        assert_eq!(state.lunch, Lunch::Standard);
    }

    #[test]
    fn score_steps_are_clamped() {
        let mut state = FormState::new();
        focus_on(&mut state, Focus::ReadingScore);
        state.reading_input = "100".into();
        state.handle_key(KeyCode::Right);
        assert_eq!(state.reading_input, "100");
        state.handle_key(KeyCode::Left);
        assert_eq!(state.reading_input, "99");

        state.reading_input = "abc".into();
        state.handle_key(KeyCode::Left);
        assert_eq!(state.reading_input, "70");
    }

    #[test]
    fn typing_edits_only_score_boxes() {
        let mut state = FormState::new();
        state.handle_key(KeyCode::Char('5'));
        assert_eq!(state.writing_input, "70");

        focus_on(&mut state, Focus::WritingScore);
        state.handle_key(KeyCode::Backspace);
        state.handle_key(KeyCode::Backspace);
        for c in ['8', '2', '.', '5'] {
            state.handle_key(KeyCode::Char(c));
        }
        assert_eq!(state.writing_input, "82.5");
    }

    #[test]
    fn enter_submits_current_values() {
        let mut state = FormState::new();
        focus_on(&mut state, Focus::RaceEthnicity);
        state.handle_key(KeyCode::Right);
        assert_eq!(state.handle_key(KeyCode::Enter), Action::None);
        assert_eq!(state.focus, Focus::ParentalEducation);

        focus_on(&mut state, Focus::Submit);
        let action = state.handle_key(KeyCode::Enter);
        let Action::Submit(raw) = action else {
            panic!("expected submit, got {action:?}");
        };
        assert_eq!(raw.race_ethnicity, RaceEthnicity::GroupB);
        assert_eq!(raw.writing_score, 70.0);
    }

    #[test]
    fn out_of_range_text_still_submits() {
        let mut state = FormState::new();
        state.reading_input = "105".into();
        state.focus = Focus::Submit;
        assert!(matches!(state.handle_key(KeyCode::Enter), Action::Submit(_)));
    }

    #[test]
    fn empty_score_is_an_input_error() {
        let mut state = FormState::new();
        state.writing_input.clear();
        state.focus = Focus::Submit;
        assert_eq!(state.handle_key(KeyCode::Enter), Action::None);
        assert!(matches!(
            state.outcome,
            Some(Outcome::InputError(ref m)) if m == "Please enter valid scores"
        ));
    }

    #[test]
    fn quit_and_details_toggle() {
        let mut state = FormState::new();
        assert_eq!(state.handle_key(KeyCode::Char('d')), Action::None);
        assert!(state.show_details);
        assert_eq!(state.handle_key(KeyCode::Esc), Action::Quit);
        assert_eq!(state.handle_key(KeyCode::Char('q')), Action::Quit);
    }
}

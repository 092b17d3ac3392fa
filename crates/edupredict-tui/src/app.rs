use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use edupredict_core::{RawSubmission, SubmissionHandler};
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::runtime::Handle;
use tracing::debug;

use crate::form::{Action, FormState, Outcome};
use crate::widgets;

struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen)?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

/// Run the terminal form until the user quits.
///
/// Must be called off the async runtime's worker threads (for example from
/// `spawn_blocking`); submissions block on `runtime` while the spinner shows.
///
/// # Errors
/// Returns an error if terminal setup or rendering fails. Prediction
/// failures are shown in the form, not returned.
pub fn run(handler: Arc<dyn SubmissionHandler>, runtime: Handle) -> Result<()> {
    let _guard = TerminalGuard::enter()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let mut state = FormState::new();

    loop {
        terminal.draw(|f| widgets::draw(f, &state))?;

        if event::poll(Duration::from_millis(120))? {
            if let Event::Key(k) = event::read()? {
                if k.kind != KeyEventKind::Press {
                    continue;
                }
                match state.handle_key(k.code) {
                    Action::Quit => break,
                    Action::Submit(raw) => {
                        state.outcome = Some(Outcome::Pending);
                        terminal.draw(|f| widgets::draw(f, &state))?;
                        submit(&mut state, handler.as_ref(), &runtime, raw);
                    }
                    Action::None => {}
                }
            }
        }
    }

    terminal.show_cursor()?;
    Ok(())
}

/// Run one submission to completion and record its outcome.
pub fn submit(
    state: &mut FormState,
    handler: &dyn SubmissionHandler,
    runtime: &Handle,
    raw: RawSubmission,
) {
    let result = runtime.block_on(handler.submit(raw));
    debug!(ok = result.is_ok(), "submission finished");
    state.outcome = Some(Outcome::Done(result));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use arrow::record_batch::RecordBatch;
    use async_trait::async_trait;
    use crossterm::event::KeyCode;
    use edupredict_core::{ErrorKind, SubmissionError};

    use crate::form::Focus;

    struct Fixed {
        score: f64,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl SubmissionHandler for Fixed {
        async fn invoke(&self, _request: &RecordBatch) -> Result<Vec<f64>, SubmissionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![self.score])
        }
    }

    fn runtime() -> tokio::runtime::Runtime {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
    }

    #[test]
    fn submit_records_prediction() {
        let rt = runtime();
        let handler = Fixed {
            score: 64.0,
            calls: AtomicUsize::new(0),
        };
        let mut state = FormState::new();
        state.focus = Focus::Submit;
        let Action::Submit(raw) = state.handle_key(KeyCode::Enter) else {
            panic!("default form should submit");
        };

        submit(&mut state, &handler, rt.handle(), raw);

        let Some(Outcome::Done(Ok(prediction))) = &state.outcome else {
            panic!("expected a prediction, got {:?}", state.outcome);
        };
        assert_eq!(prediction.score, 64.0);
        assert_eq!(prediction.tier.as_str(), "Average");
        assert_eq!(handler.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn out_of_range_score_is_rejected_before_invoke() {
        let rt = runtime();
        let handler = Fixed {
            score: 64.0,
            calls: AtomicUsize::new(0),
        };
        let mut state = FormState::new();
        state.writing_input = "150".into();
        state.focus = Focus::Submit;
        let Action::Submit(raw) = state.handle_key(KeyCode::Enter) else {
            panic!("unparsed range errors belong to the handler");
        };

        submit(&mut state, &handler, rt.handle(), raw);

        let Some(Outcome::Done(Err(err))) = &state.outcome else {
            panic!("expected an error, got {:?}", state.outcome);
        };
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.user_message(), "Scores must be between 0 and 100.");
        assert_eq!(handler.calls.load(Ordering::SeqCst), 0);
    }
}

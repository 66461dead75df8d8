//! Main TUI application loop.
//!
//! One screen, one action: edit the three fields, press Enter, read the
//! prediction. Each Enter runs one synchronous computation; inference over
//! the loaded artifact is microseconds, so there is no background worker,
//! no queuing, and no cancellation.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};

use crate::application::PredictionService;
use crate::ports::Pipeline;

use super::ui::{
    form::{render_form, FormState, ResultState},
    render_disclaimer,
};

/// Main application state.
pub struct App<P: Pipeline> {
    service: Arc<PredictionService<P>>,
    form: FormState,
    result: ResultState,
    should_quit: bool,
}

impl<P: Pipeline> App<P> {
    /// Create the application around an injected prediction service
    /// (Composition Root pattern: `main.rs` loads the artifact and wires
    /// everything up).
    #[must_use]
    pub fn new(service: Arc<PredictionService<P>>) -> Self {
        Self {
            service,
            form: FormState::default(),
            result: ResultState::Idle,
            should_quit: false,
        }
    }

    /// Run the main application loop.
    ///
    /// # Errors
    /// Returns error if terminal operations fail.
    pub fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.main_loop(&mut terminal);

        // Restore terminal
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        loop {
            terminal.draw(|f| {
                let area = f.area();
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Min(0), Constraint::Length(3)])
                    .split(area);

                render_form(f, chunks[0], &self.form, &self.result);
                render_disclaimer(f, chunks[1]);
            })?;

            // Short poll to stay responsive.
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key(key.code, key.modifiers);
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        if key == KeyCode::Char('q') && modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match key {
            KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Down | KeyCode::Tab => {
                self.form.next_field();
            }
            KeyCode::Up | KeyCode::BackTab => {
                self.form.prev_field();
            }
            KeyCode::Left | KeyCode::Right | KeyCode::Char(' ') => {
                self.form.toggle_selected();
            }
            KeyCode::Backspace => {
                self.form.delete_char();
            }
            KeyCode::Delete => {
                self.form.clear_field();
            }
            KeyCode::Enter => {
                self.submit();
            }
            KeyCode::Char(c) if c.is_ascii_digit() => {
                self.form.input_char(c);
            }
            KeyCode::Char('d') | KeyCode::Char('D') => {
                self.form.reset();
                self.result = ResultState::Idle;
            }
            _ => {}
        }
    }

    /// Run one prediction from the current field values.
    ///
    /// Inference failures surface in the result pane as an error string;
    /// form-level problems (unparseable age) stay in the form footer.
    fn submit(&mut self) {
        match self.form.to_request() {
            Ok(request) => {
                self.form.error_message = None;
                self.result = match self.service.predict(&request) {
                    Ok(prediction) => ResultState::Ready { prediction },
                    Err(e) => {
                        tracing::warn!("Prediction failed: {e}");
                        ResultState::Failed {
                            message: e.to_string(),
                        }
                    }
                };
            }
            Err(message) => {
                self.form.error_message = Some(message);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FeatureRow;
    use crate::ports::PipelineError;

    struct FixedPipeline {
        names: Vec<String>,
        result: Result<f64, ()>,
    }

    impl Pipeline for FixedPipeline {
        fn feature_names(&self) -> &[String] {
            &self.names
        }

        fn predict_proba(&self, _row: &FeatureRow) -> Result<[f64; 2], PipelineError> {
            match self.result {
                Ok(p) => Ok([1.0 - p, p]),
                Err(()) => Err(PipelineError::MissingColumn("AGE".into())),
            }
        }
    }

    fn app_with(result: Result<f64, ()>) -> App<FixedPipeline> {
        let pipeline = FixedPipeline {
            names: vec!["AGE".into()],
            result,
        };
        App::new(Arc::new(PredictionService::new(Arc::new(pipeline))))
    }

    #[test]
    fn test_enter_runs_prediction() {
        let mut app = app_with(Ok(0.25));
        app.handle_key(KeyCode::Enter, KeyModifiers::NONE);
        assert!(matches!(app.result, ResultState::Ready { .. }));
    }

    #[test]
    fn test_pipeline_failure_reaches_result_pane() {
        let mut app = app_with(Err(()));
        app.handle_key(KeyCode::Enter, KeyModifiers::NONE);
        match &app.result {
            ResultState::Failed { message } => assert!(message.contains("AGE")),
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_age_stays_in_form() {
        let mut app = app_with(Ok(0.25));
        app.handle_key(KeyCode::Delete, KeyModifiers::NONE);
        app.handle_key(KeyCode::Enter, KeyModifiers::NONE);
        assert!(app.form.error_message.is_some());
        assert!(matches!(app.result, ResultState::Idle));
    }

    #[test]
    fn test_quit_keys() {
        let mut app = app_with(Ok(0.25));
        app.handle_key(KeyCode::Char('q'), KeyModifiers::CONTROL);
        assert!(app.should_quit);

        let mut app = app_with(Ok(0.25));
        app.handle_key(KeyCode::Esc, KeyModifiers::NONE);
        assert!(app.should_quit);
    }

    #[test]
    fn test_defaults_key_resets_result() {
        let mut app = app_with(Ok(0.25));
        app.handle_key(KeyCode::Enter, KeyModifiers::NONE);
        assert!(matches!(app.result, ResultState::Ready { .. }));

        app.handle_key(KeyCode::Char('d'), KeyModifiers::NONE);
        assert!(matches!(app.result, ResultState::Idle));
    }
}

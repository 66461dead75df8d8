//! Prediction form and result pane.
//!
//! Three input fields and a Predict action on the left, the prediction
//! output on the right.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use crate::domain::{Gender, Prediction, PredictionRequest, Rural, DEFAULT_AGE, MAX_AGE};
use crate::tui::styles::Theme;

/// Which form field has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Age,
    Gender,
    Rural,
}

impl Field {
    const ORDER: [Field; 3] = [Field::Age, Field::Gender, Field::Rural];
}

/// Editable form state.
pub struct FormState {
    /// Age entry buffer (digits only)
    pub age_input: String,
    pub gender: Gender,
    pub rural: Rural,
    pub selected: Field,
    pub error_message: Option<String>,
}

impl Default for FormState {
    /// Initial values: 60 / MALE / NO.
    fn default() -> Self {
        Self {
            age_input: DEFAULT_AGE.to_string(),
            gender: Gender::Male,
            rural: Rural::No,
            selected: Field::Age,
            error_message: None,
        }
    }
}

impl FormState {
    /// Move focus to the next field.
    pub fn next_field(&mut self) {
        let idx = Field::ORDER.iter().position(|f| *f == self.selected).unwrap_or(0);
        self.selected = Field::ORDER[(idx + 1) % Field::ORDER.len()];
    }

    /// Move focus to the previous field.
    pub fn prev_field(&mut self) {
        let idx = Field::ORDER.iter().position(|f| *f == self.selected).unwrap_or(0);
        self.selected = Field::ORDER[(idx + Field::ORDER.len() - 1) % Field::ORDER.len()];
    }

    /// Type into the focused field. Only the age field takes text, and only
    /// digits; three digits cover the whole 0-120 range.
    pub fn input_char(&mut self, c: char) {
        if self.selected == Field::Age && c.is_ascii_digit() && self.age_input.len() < 3 {
            self.age_input.push(c);
            self.error_message = None;
        }
    }

    /// Delete the last character of the age field.
    pub fn delete_char(&mut self) {
        if self.selected == Field::Age {
            self.age_input.pop();
        }
    }

    /// Clear the age field.
    pub fn clear_field(&mut self) {
        if self.selected == Field::Age {
            self.age_input.clear();
        }
    }

    /// Toggle the focused enum field.
    pub fn toggle_selected(&mut self) {
        match self.selected {
            Field::Age => {}
            Field::Gender => self.gender = self.gender.toggled(),
            Field::Rural => self.rural = self.rural.toggled(),
        }
        self.error_message = None;
    }

    /// Restore the form defaults.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Validate and convert the current field values into a request.
    ///
    /// # Errors
    /// Returns a message suitable for the form footer.
    pub fn to_request(&self) -> Result<PredictionRequest, String> {
        if self.age_input.is_empty() {
            return Err("Age: enter a value".to_string());
        }
        let age: u32 = self
            .age_input
            .parse()
            .map_err(|_| "Age: invalid number".to_string())?;

        let request = PredictionRequest::new(age, self.gender, self.rural);
        request.validate()?;
        Ok(request)
    }
}

/// Outcome of the last Predict action.
#[derive(Debug, Clone, Default)]
pub enum ResultState {
    /// No prediction yet
    #[default]
    Idle,
    /// Prediction succeeded
    Ready { prediction: Prediction },
    /// Inference failed; message is already user-facing
    Failed { message: String },
}

/// Render the whole screen: form on the left, result pane on the right.
pub fn render_form(f: &mut Frame, area: Rect, state: &FormState, result: &ResultState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(3), // Footer
        ])
        .split(area);

    render_header(f, chunks[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[1]);

    render_fields(f, columns[0], state);
    render_result(f, columns[1], result);
    render_footer(f, chunks[2], state);
}

fn render_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", Theme::text()),
        Span::styled("Hospital Mortality Risk Predictor", Theme::title()),
        Span::styled(" │ Admission Profile", Theme::text_secondary()),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Theme::border()),
    );

    f.render_widget(header, area);
}

fn render_fields(f: &mut Frame, area: Rect, state: &FormState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .margin(1)
        .split(area);

    render_age_field(f, chunks[0], state);
    render_choice_field(
        f,
        chunks[1],
        "Gender",
        state.gender.as_str(),
        state.selected == Field::Gender,
    );
    render_choice_field(
        f,
        chunks[2],
        "Rural",
        state.rural.as_str(),
        state.selected == Field::Rural,
    );
}

fn field_block(label: &str, focused: bool) -> Block<'static> {
    let border_style = if focused {
        Theme::border_focused()
    } else {
        Theme::border()
    };
    let title_style = if focused {
        Theme::focused()
    } else {
        Theme::text_secondary()
    };

    Block::default()
        .title(Span::styled(format!(" {label} "), title_style))
        .borders(Borders::ALL)
        .border_style(border_style)
}

fn render_age_field(f: &mut Frame, area: Rect, state: &FormState) {
    let focused = state.selected == Field::Age;

    let value_display = if state.age_input.is_empty() {
        Span::styled(format!("years (0-{MAX_AGE})"), Theme::text_muted())
    } else {
        Span::styled(state.age_input.clone(), Theme::text())
    };

    let content = Paragraph::new(Line::from(vec![
        Span::raw(" "),
        value_display,
        if focused {
            Span::styled("▌", Theme::focused())
        } else {
            Span::raw("")
        },
    ]))
    .block(field_block("Age", focused));

    f.render_widget(content, area);
}

fn render_choice_field(f: &mut Frame, area: Rect, label: &str, value: &str, focused: bool) {
    let content = Paragraph::new(Line::from(vec![
        Span::raw(" "),
        Span::styled(value.to_string(), Theme::text()),
        Span::styled(
            if focused { "  ◂ ▸" } else { "" },
            Theme::text_muted(),
        ),
    ]))
    .block(field_block(label, focused));

    f.render_widget(content, area);
}

fn render_result(f: &mut Frame, area: Rect, result: &ResultState) {
    match result {
        ResultState::Idle => render_idle(f, area),
        ResultState::Ready { prediction } => render_prediction(f, area, prediction),
        ResultState::Failed { message } => render_error(f, area, message),
    }
}

fn render_idle(f: &mut Frame, area: Rect) {
    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            "No prediction yet",
            Theme::text_secondary(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Fill in the fields and press [Enter]",
            Theme::text_muted(),
        )),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .title(Span::styled(" Prediction ", Theme::subtitle()))
            .borders(Borders::ALL)
            .border_style(Theme::border()),
    );

    f.render_widget(content, area);
}

fn render_prediction(f: &mut Frame, area: Rect, prediction: &Prediction) {
    let block = Block::default()
        .title(Span::styled(" Prediction ", Theme::subtitle()))
        .borders(Borders::ALL)
        .border_style(Theme::border_focused());

    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Summary line
            Constraint::Length(3), // Probability gauge
            Constraint::Length(2), // Band description
            Constraint::Min(0),
        ])
        .margin(1)
        .split(inner);

    let band_style = Theme::risk_band(prediction.band);

    let summary = Paragraph::new(vec![
        Line::from(Span::styled(
            prediction.summary(),
            Theme::text().add_modifier(ratatui::style::Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("Risk band: {}", prediction.band),
            band_style,
        )),
    ])
    .alignment(Alignment::Center);
    f.render_widget(summary, chunks[0]);

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Theme::border()),
        )
        .gauge_style(band_style)
        .percent((prediction.probability * 100.0) as u16)
        .label(format!("{:.2}%", prediction.probability * 100.0));
    f.render_widget(gauge, chunks[1]);

    let description = Paragraph::new(Line::from(Span::styled(
        prediction.band.description(),
        Theme::text_secondary(),
    )))
    .alignment(Alignment::Center);
    f.render_widget(description, chunks[2]);
}

fn render_error(f: &mut Frame, area: Rect, message: &str) {
    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("⚠️ Error: {message}"),
            Theme::danger(),
        )),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .title(Span::styled(" Prediction ", Theme::subtitle()))
            .borders(Borders::ALL)
            .border_style(Theme::danger()),
    );

    f.render_widget(content, area);
}

fn render_footer(f: &mut Frame, area: Rect, state: &FormState) {
    let content = if let Some(err) = &state.error_message {
        Line::from(vec![
            Span::styled("! ", Theme::danger()),
            Span::styled(err.clone(), Theme::danger()),
        ])
    } else {
        Line::from(vec![
            Span::styled("[↑↓] ", Theme::key_hint()),
            Span::styled("Navigate ", Theme::key_desc()),
            Span::styled("[◂▸] ", Theme::key_hint()),
            Span::styled("Toggle ", Theme::key_desc()),
            Span::styled("[Enter] ", Theme::key_hint()),
            Span::styled("Predict ", Theme::key_desc()),
            Span::styled("[D] ", Theme::key_hint()),
            Span::styled("Defaults ", Theme::key_desc()),
            Span::styled("[Esc] ", Theme::key_hint()),
            Span::styled("Quit", Theme::key_desc()),
        ])
    };

    let footer = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(Theme::border()),
    );

    f.render_widget(footer, area);
}

use crossterm::event::{Event, KeyCode, KeyModifiers};
use keystrike::{Phase, ScoringMode, SessionConfig, SessionError, TypingSession};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};

use crate::{
    app::Context,
    config::{LessonConfig, LessonKind},
    page,
    passages,
    speech::Playback,
    utils::{KeyEventHelper, center, format_duration},
};

use super::Message;

/// Shown in place of dictated characters that haven't been typed yet
const HIDDEN_CHARACTER: char = '_';
/// Shown for line breaks in the lesson text
const NEWLINE_SYMBOL: &str = "↵";

/// What a typing session is for
#[derive(Debug, Clone)]
pub enum Purpose {
    Lesson {
        id: String,
        title: String,
        kind: LessonKind,
        playback_speed: f32,
    },
    /// The placement assessment
    Assessment,
}

impl Purpose {
    pub fn title(&self) -> &str {
        match self {
            Self::Lesson { title, .. } => title,
            Self::Assessment => "Placement assessment",
        }
    }

    /// Dictation lessons hide the text until it is typed
    const fn hides_text(&self) -> bool {
        matches!(self, Self::Lesson { kind, .. } if kind.is_audio())
    }

    const fn playback_speed(&self) -> f32 {
        match self {
            Self::Lesson { playback_speed, .. } => *playback_speed,
            Self::Assessment => 1.0,
        }
    }
}

/// Page: TypingSession
#[derive(Debug)]
pub struct Session {
    typing: TypingSession,
    /// Content of the input field
    input: String,
    /// The text to type, for speech
    text: String,
    purpose: Purpose,
    playback: Option<Playback>,
    /// Latest notice for the learner, e.g. a speech failure
    status: Option<String>,
}

impl Session {
    /// Creates a session for a lesson
    pub fn lesson(lesson: &LessonConfig, is_first_completion: bool) -> Result<Self, SessionError> {
        let meta = &lesson.meta;
        let config =
            SessionConfig::new(meta.kind.scoring_mode()).with_backspace(meta.backspace_enabled);
        let purpose = Purpose::Lesson {
            id: meta.id.clone(),
            title: meta.title.clone(),
            kind: meta.kind,
            playback_speed: meta.playback_speed.unwrap_or(1.0),
        };

        Self::create(lesson.text(), config, purpose)
            .map(|session| session.with_first_completion(is_first_completion))
    }

    /// Creates a placement assessment with one of the built-in passages
    pub fn assessment() -> Result<Self, SessionError> {
        Self::create(
            passages::pick(),
            SessionConfig::new(ScoringMode::Net),
            Purpose::Assessment,
        )
    }

    fn create(text: &str, config: SessionConfig, purpose: Purpose) -> Result<Self, SessionError> {
        Ok(Self {
            typing: TypingSession::new(text, config)?,
            input: String::new(),
            text: text.to_string(),
            purpose,
            playback: None,
            status: None,
        })
    }

    fn with_first_completion(mut self, is_first_completion: bool) -> Self {
        self.typing = self.typing.with_first_completion(is_first_completion);
        self
    }
}

impl Session {
    /// Change the input field and hand the whole new content to the session
    fn edit(&mut self, change: impl FnOnce(&mut String)) {
        let mut input = self.input.clone();
        change(&mut input);
        self.typing.apply_edit(&input);
        // The session may reject the edit
        self.input = self.typing.input().iter().collect();
    }

    fn speak(&mut self, context: &Context) {
        match context
            .speech
            .speak(&self.text, self.purpose.playback_speed())
        {
            Ok(playback) => {
                self.playback = Some(playback);
                self.status = None;
            }
            Err(error) => {
                log::warn!("Speech failed: {error}");
                self.status = Some(error.to_string());
            }
        }
    }
}

// Rendering logic
impl Session {
    pub fn render(&self, frame: &mut Frame, area: Rect, context: &Context) {
        let area = center(area, Constraint::Percentage(80), Constraint::Percentage(80));
        let lines = self.render_text(context);

        let width = area.width.max(1) as usize;
        let height = lines
            .iter()
            .map(|line| line.width().div_ceil(width).max(1))
            .sum::<usize>() as u16;

        let [_, text_area, _, status_area, _] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(height),
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Fill(1),
        ])
        .areas(area);

        frame.render_widget(
            Paragraph::new(lines).wrap(Wrap { trim: false }),
            text_area,
        );
        frame.render_widget(
            Paragraph::new(self.render_status(context)).centered(),
            status_area,
        );
    }

    /// The lesson text, colored by what has been typed so far
    fn render_text(&self, context: &Context) -> Vec<Line<'static>> {
        let theme = &context.config.settings.theme.text;
        let input = self.typing.input();
        let hidden = self.purpose.hides_text();

        let mut lines = Vec::new();
        let mut spans = Vec::new();

        for (index, expected) in self.typing.text().chars().enumerate() {
            let mut style = Style::new();
            let shown = match input.get(index) {
                Some(&typed) if typed == expected => {
                    style = style.fg(theme.success);
                    expected
                }
                Some(&typed) => {
                    style = if expected == ' ' || typed == ' ' {
                        style.bg(theme.error)
                    } else {
                        style.fg(theme.error)
                    };
                    if hidden { typed } else { expected }
                }
                None => {
                    style = style.fg(theme.pending);
                    if hidden && !expected.is_whitespace() {
                        HIDDEN_CHARACTER
                    } else {
                        expected
                    }
                }
            };

            if index == input.len() {
                style = style.add_modifier(Modifier::REVERSED);
            }

            if expected == '\n' {
                spans.push(Span::styled(NEWLINE_SYMBOL, style));
                lines.push(Line::from(std::mem::take(&mut spans)));
            } else {
                spans.push(Span::styled(shown.to_string(), style.add_modifier(Modifier::BOLD)));
            }
        }

        // Typed past the end of the text
        for &extra in input.iter().skip(self.typing.text_len()) {
            spans.push(Span::styled(extra.to_string(), Style::new().fg(theme.error)));
        }

        lines.push(Line::from(spans));
        lines
    }

    fn render_status(&self, context: &Context) -> Vec<Line<'_>> {
        let mut hints = match self.typing.phase() {
            Phase::NotStarted if self.purpose.hides_text() => {
                "<Enter> to start listening | <CTRL-P> to play again".to_string()
            }
            Phase::NotStarted => "<Enter> to start".to_string(),
            Phase::Running | Phase::Finished => "<CTRL-F> to finish early".to_string(),
        };
        if !self.typing.config().backspace_enabled {
            hints.push_str(" | Backspace disabled");
        }

        let mut lines = vec![Line::from(hints).dim()];
        if let Some(status) = &self.status {
            lines.push(Line::from(status.as_str()).fg(context.config.settings.theme.text.error));
        }
        lines
    }

    pub fn render_top(&self, _context: &Context) -> Option<Line<'_>> {
        if self.typing.phase() == Phase::NotStarted {
            return Some(Line::raw(self.purpose.title()));
        }

        let live = self.typing.live();
        Some(Line::raw(format!(
            "{} | WPM: {} | ACC: {}% | {:.0}%",
            format_duration(self.typing.elapsed()),
            live.wpm,
            live.accuracy,
            self.typing.completion_percentage(),
        )))
    }

    pub fn poll(&mut self, _context: &Context) -> Option<Message> {
        if self
            .playback
            .as_mut()
            .is_some_and(|playback| !playback.is_playing())
        {
            self.playback = None;
        }

        let result = *self.typing.result()?;
        let results = page::Results::new(self.purpose.clone(), result, self.typing.placement());
        Some(Message::Show(results.into()))
    }

    pub fn handle_events(&mut self, event: &Event, context: &Context) -> Option<Message> {
        let Event::Key(key) = event else {
            return None;
        };
        if !key.is_press() {
            return None;
        }

        if key.is_ctrl_press_char('f') {
            self.typing.finish_early();
            return None;
        }
        if key.is_ctrl_press_char('p') {
            self.speak(context);
            return None;
        }
        if key.has_mods(KeyModifiers::CONTROL) {
            return None;
        }

        match (self.typing.phase(), key.code) {
            (Phase::NotStarted, KeyCode::Enter) => {
                self.typing.start();
                if self.purpose.hides_text() {
                    self.speak(context);
                }
            }
            (Phase::Running, KeyCode::Char(character)) => {
                self.edit(|input| input.push(character))
            }
            (Phase::Running, KeyCode::Enter) => self.edit(|input| input.push('\n')),
            (Phase::Running, KeyCode::Backspace | KeyCode::Delete)
                if !self.typing.config().backspace_enabled =>
            {
                self.status = Some("Backspace is disabled for this lesson".to_string());
            }
            (Phase::Running, KeyCode::Backspace) => self.edit(|input| {
                input.pop();
            }),
            _ => (),
        }

        None
    }
}

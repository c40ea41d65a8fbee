use std::io::stdout;
use std::time::Duration;

use crossterm::cursor::SetCursorStyle;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::execute;
use ratatui::{Frame, style::Stylize, text::ToLine, widgets::Padding};

use crate::config::Config;
use crate::page;
use crate::speech::SpeechProvider;
use crate::store::ProgressStore;
use crate::utils::ROUNDED_BLOCK;

/// How long to wait for input before redrawing, so the live statistics keep ticking
const TICK: Duration = Duration::from_millis(100);

/// An app message
pub enum Message {
    /// An error occurred
    Error(Box<dyn std::error::Error + Send>),
    /// Show a specific page
    Show(page::Page),
    /// Reset to the main menu
    Reset,
    /// Quit the application
    Quit,
}

/// Everything pages need besides their own state
pub struct Context {
    pub config: Config,
    pub store: Box<dyn ProgressStore>,
    pub speech: Box<dyn SpeechProvider>,
    /// The learner progress is recorded for
    pub user: String,
}

/// The app itself
pub struct App {
    page: page::Page,
    context: Context,
}

impl App {
    /// Creates a new `App`, starting at the menu or straight in the placement assessment
    ///
    /// Learners without a profile always start with the assessment.
    pub fn new(context: Context, assess: bool) -> Self {
        let unassessed = match context.store.profile(&context.user) {
            Ok(profile) => profile.is_none(),
            Err(error) => {
                log::error!("Failed to load profile: {error}");
                false
            }
        };

        let page = if assess || unassessed {
            page::Session::assessment()
                .map(page::Page::from)
                .unwrap_or_else(|error| page::Error::from(error).into())
        } else {
            page::Menu::new(&context).into()
        };
        Self { page, context }
    }

    /// Runs the app
    pub fn run(&mut self) -> std::io::Result<()> {
        let mut terminal = ratatui::init();

        execute!(stdout(), SetCursorStyle::SteadyBar)?;

        loop {
            let event = event::poll(TICK)?.then(event::read).transpose()?;
            if let Some(message) = self.handle_events(event) {
                match message {
                    Message::Error(error) => {
                        log::error!("{error}");
                        self.page = page::Error::from(error).into();
                    }
                    Message::Show(page) => self.page = page,
                    Message::Reset => self.page = page::Menu::new(&self.context).into(),
                    Message::Quit => break,
                }
            }
            terminal.draw(|frame| self.draw(frame))?;
        }

        ratatui::restore();

        Ok(())
    }

    /// Draws the next frame
    fn draw(&mut self, frame: &mut Frame) {
        let mut block = ROUNDED_BLOCK
            .padding(Padding::new(1, 1, 0, 0))
            .title_top("TYPEMIND".to_line().bold().centered())
            .title_top("<CTRL-Q> to exit".to_line().right_aligned());

        if let Some(top_msg) = self.page.render_top(&self.context) {
            block = block.title_top(top_msg);
        }

        let area = frame.area();
        let content = block.inner(area);

        frame.render_widget(block, area);

        self.page.render(frame, content, &self.context);
    }

    /// Global event handler
    fn handle_events(&mut self, event_opt: Option<Event>) -> Option<Message> {
        event_opt
            .and_then(|event| {
                self.page
                    .handle_events(&event, &self.context)
                    .or_else(|| match event {
                        Event::Key(key) => self.handle_key_event(key),
                        _ => None,
                    })
            })
            .or_else(|| self.page.poll(&self.context))
    }

    /// Global key events
    const fn handle_key_event(&self, key: KeyEvent) -> Option<Message> {
        match (key.code, key.modifiers) {
            (KeyCode::Char('q'), KeyModifiers::CONTROL) => Some(Message::Quit),
            (KeyCode::Esc, KeyModifiers::NONE) => Some(Message::Reset),
            _ => None,
        }
    }
}

use crossterm::event::Event;
use ratatui::{Frame, layout::Rect, text::Line};

pub mod error;
pub mod menu;
pub mod results;
pub mod session;

pub use error::Error;
pub use menu::Menu;
pub use results::Results;
pub use session::Session;

use crate::app::{Context, Message};

macro_rules! make_page_enum {
    ($($t:tt),*) => {
        pub enum Page {
            $(
                $t(Box<$t>),
            )*
        }

        $(
            impl From<$t> for Page {
                fn from(value: $t) -> Page {
                    Page::$t(Box::new(value))
                }
            }
        )*
    };
}

make_page_enum!(Menu, Session, Results, Error);

impl Page {
    pub fn render(&mut self, frame: &mut Frame, area: Rect, context: &Context) {
        match self {
            Self::Menu(page) => page.render(frame, area, context),
            Self::Session(page) => page.render(frame, area, context),
            Self::Results(page) => page.render(frame, area, context),
            Self::Error(page) => page.render(frame, area, context),
        }
    }

    pub fn render_top(&mut self, context: &Context) -> Option<Line<'_>> {
        match self {
            Self::Menu(_) => None,
            Self::Session(page) => page.render_top(context),
            Self::Results(page) => page.render_top(context),
            Self::Error(page) => page.render_top(context),
        }
    }

    pub fn handle_events(&mut self, event: &Event, context: &Context) -> Option<Message> {
        match self {
            Self::Menu(page) => page.handle_events(event, context),
            Self::Session(page) => page.handle_events(event, context),
            Self::Results(page) => page.handle_events(event, context),
            Self::Error(page) => page.handle_events(event, context),
        }
    }

    pub fn poll(&mut self, context: &Context) -> Option<Message> {
        match self {
            Self::Session(page) => page.poll(context),
            Self::Menu(_) | Self::Results(_) | Self::Error(_) => None,
        }
    }
}

use std::collections::HashSet;

use crossterm::event::{Event, KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Gauge, List, Paragraph},
};

use crate::{
    app::Context,
    config::LessonConfig,
    page::session::Session,
    store::{Profile, StoreError, UserRanking, completed_lessons},
    utils::{ROUNDED_BLOCK, center, centered_padding},
};

use super::Message;

const NO_LESSONS_HINT: &str = "No lessons found. Add lesson files to your lessons directory.";

#[derive(Debug, Clone, Copy)]
enum Entry {
    Assessment,
    /// Index into the configured lessons
    Lesson(usize),
}

/// What the menu knows about the learner
#[derive(Debug, Default)]
struct Progress {
    profile: Option<Profile>,
    ranking: Option<UserRanking>,
    completed: HashSet<String>,
}

impl Progress {
    fn load(context: &Context) -> Result<Self, StoreError> {
        let ids: Vec<&str> = context
            .config
            .lessons
            .iter()
            .map(|lesson| lesson.meta.id.as_str())
            .collect();

        Ok(Self {
            profile: context.store.profile(&context.user)?,
            ranking: context.store.ranking_for(&context.user)?,
            completed: completed_lessons(context.store.as_ref(), &context.user, &ids)?,
        })
    }
}

/// Page: Main menu
#[derive(Debug)]
pub struct Menu {
    entries: Vec<Entry>,
    index: usize,
    progress: Progress,
    /// Set if progress couldn't be loaded
    warning: Option<String>,
}

impl Menu {
    /// Creates a new menu
    pub fn new(context: &Context) -> Self {
        let (progress, warning) = match Progress::load(context) {
            Ok(progress) => (progress, None),
            Err(error) => {
                log::error!("Failed to load progress: {error}");
                (Progress::default(), Some(error.to_string()))
            }
        };

        let placement = progress.profile.as_ref().map(|profile| profile.level);
        let show_all = context.config.settings.show_all_levels;

        let entries = std::iter::once(Entry::Assessment)
            .chain(
                context
                    .config
                    .lessons
                    .iter()
                    .enumerate()
                    .filter(|(_, lesson)| show_all || lesson.meta.level.is_available_to(placement))
                    .map(|(index, _)| Entry::Lesson(index)),
            )
            .collect();

        Self {
            entries,
            index: 0,
            progress,
            warning,
        }
    }

    fn lesson<'a>(&self, context: &'a Context, entry: Entry) -> Option<&'a LessonConfig> {
        match entry {
            Entry::Lesson(index) => context.config.lessons.get(index),
            Entry::Assessment => None,
        }
    }
}

// Rendering logic
impl Menu {
    pub fn render(&self, frame: &mut Frame, area: Rect, context: &Context) {
        let area = center(area, Constraint::Percentage(90), Constraint::Percentage(80));
        let [lessons, card] =
            Layout::horizontal([Constraint::Percentage(65), Constraint::Percentage(35)])
                .areas(area);

        self.render_lessons(frame, lessons, context);
        self.render_rank_card(frame, card, context);
    }

    fn render_lessons(&self, frame: &mut Frame, area: Rect, context: &Context) {
        let theme = &context.config.settings.theme.text;

        let items = self.entries.iter().enumerate().map(|(i, entry)| {
            let mut selector = "  ";
            let style = if i == self.index {
                selector = "> ";
                Style::new().fg(theme.highlight).reversed()
            } else {
                Style::new()
            };

            let label = match self.lesson(context, *entry) {
                Some(lesson) => {
                    let check = if self.progress.completed.contains(&lesson.meta.id) {
                        "[x]"
                    } else {
                        "[ ]"
                    };
                    format!(
                        "{selector}{check} {} ({}, {})",
                        lesson.meta.title, lesson.meta.level, lesson.meta.kind
                    )
                }
                None => format!("{selector}Placement assessment"),
            };
            Line::from(Span::styled(label, style))
        });

        let mut list_block = Block::new().title("Select Lesson");
        if context.config.lessons.is_empty() {
            list_block = list_block.title_bottom(Line::from(NO_LESSONS_HINT).dim());
        }

        frame.render_widget(List::new(items).block(list_block), area);
    }

    fn render_rank_card(&self, frame: &mut Frame, area: Rect, context: &Context) {
        let theme = &context.config.settings.theme;
        let block = ROUNDED_BLOCK.title(context.user.as_str());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut lines = vec![match &self.progress.profile {
            Some(profile) => Line::raw(format!(
                "Level: {} ({} WPM)",
                profile.level, profile.assessed_wpm
            )),
            None => Line::raw("Not assessed yet").italic(),
        }];
        if self.progress.profile.is_none() {
            lines.push(Line::raw("Take the assessment to unlock level lessons").dim());
        }

        let gauge = match &self.progress.ranking {
            Some(ranking) => {
                let progress = ranking.progress();
                lines.extend([
                    Line::styled(
                        format!("{} - {}", ranking.tier, ranking.tier.title()),
                        Style::new().bold().fg(theme.rank),
                    ),
                    Line::raw(format!("Position: #{}", ranking.position)),
                ]);
                if let (Some(level), Some(position)) = (ranking.level, ranking.level_position) {
                    lines.push(Line::raw(format!("Position in {level}: #{position}")));
                }
                lines.extend([
                    Line::raw(format!("Points: {}", ranking.total_points)),
                    Line::raw(format!("Average WPM: {:.0}", ranking.average_wpm)),
                    Line::raw(format!("Average accuracy: {:.0}%", ranking.average_accuracy)),
                    Line::raw(format!("Lessons completed: {}", ranking.lessons_completed)),
                ]);

                progress.next.map(|next| {
                    Gauge::default()
                        .gauge_style(Style::new().fg(theme.rank))
                        .ratio((progress.percent / 100.0).clamp(0.0, 1.0))
                        .label(format!("{} points to {next}", progress.points_needed))
                })
            }
            None => {
                lines.push(Line::raw("Complete a lesson to get ranked").dim());
                None
            }
        };

        if let Some(warning) = &self.warning {
            lines.push(Line::default());
            lines.push(Line::raw("Could not load progress:").fg(theme.text.error));
            lines.push(Line::raw(warning.as_str()).fg(theme.text.error));
        }

        let [text_area, gauge_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(inner);
        let padding = centered_padding(text_area, lines.len() as u16);

        frame.render_widget(
            Paragraph::new(lines).block(Block::new().padding(padding)),
            text_area,
        );
        if let Some(gauge) = gauge {
            frame.render_widget(gauge, gauge_area);
        }
    }

    pub fn handle_events(&mut self, event: &Event, context: &Context) -> Option<Message> {
        if let Event::Key(key) = event
            && key.is_press()
        {
            return self.handle_key(key, context);
        }

        None
    }
}

// Event handlers
impl Menu {
    fn handle_key(&mut self, key: &KeyEvent, context: &Context) -> Option<Message> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => previous_index(&mut self.index, self.entries.len()),
            KeyCode::Down | KeyCode::Char('j') => next_index(&mut self.index, self.entries.len()),
            KeyCode::Enter => return Some(self.open(context)),
            _ => (),
        };

        None
    }

    fn open(&self, context: &Context) -> Message {
        let Some(&entry) = self.entries.get(self.index) else {
            return Message::Reset;
        };

        let session = match self.lesson(context, entry) {
            Some(lesson) => match context.store.has_completed(&context.user, &lesson.meta.id) {
                Ok(completed) => Session::lesson(lesson, !completed),
                Err(error) => return Message::Error(Box::new(error)),
            },
            None => Session::assessment(),
        };

        match session {
            Ok(session) => Message::Show(session.into()),
            Err(error) => Message::Error(Box::new(error)),
        }
    }
}

const fn previous_index(index: &mut usize, len: usize) {
    *index = if *index == 0 { len - 1 } else { *index - 1 }
}

const fn next_index(index: &mut usize, len: usize) {
    *index = (*index + 1) % len
}

#[cfg(test)]
mod tests {
    use keystrike::{Placement, PlacementLevel, SessionResult};

    use super::*;
    use crate::{app::tests::test_context, page::Page, store::CompletionRecord};

    fn lesson(id: &str, level: &str) -> LessonConfig {
        LessonConfig::parse(&format!(
            "content = \"text\"\n[meta]\nid = \"{id}\"\ntitle = \"{id}\"\nlevel = \"{level}\"\n"
        ))
        .unwrap()
    }

    #[test]
    fn test_lessons_filtered_by_placement() {
        let (_dir, mut context) = test_context();
        context.config.lessons = vec![
            lesson("basics", "beginner"),
            lesson("speed", "advanced"),
            lesson("anyone", "all"),
        ];

        // Without a placement only the assessment and lessons for all levels are listed
        let menu = Menu::new(&context);
        let ids: Vec<&str> = menu
            .entries
            .iter()
            .filter_map(|entry| menu.lesson(&context, *entry))
            .map(|lesson| lesson.meta.id.as_str())
            .collect();
        assert_eq!(menu.entries.len(), 2);
        assert_eq!(ids, ["anyone"]);

        let placement = Placement {
            wpm: 20,
            accuracy: 90,
            level: PlacementLevel::Beginner,
        };
        context
            .store
            .save_profile(&Profile::new("ada", &placement))
            .unwrap();

        let menu = Menu::new(&context);
        let ids: Vec<&str> = menu
            .entries
            .iter()
            .filter_map(|entry| menu.lesson(&context, *entry))
            .map(|lesson| lesson.meta.id.as_str())
            .collect();
        assert_eq!(ids, ["basics", "anyone"]);

        context.config.settings.show_all_levels = true;
        assert_eq!(Menu::new(&context).entries.len(), 4);
    }

    #[test]
    fn test_progress_is_loaded() {
        let (_dir, mut context) = test_context();
        context.config.lessons = vec![lesson("basics", "all")];

        let result = SessionResult {
            wpm: 30,
            accuracy: 90,
            score: 30,
            time_spent_seconds: 10,
            is_first_completion: true,
        };
        context
            .store
            .record_completion(&CompletionRecord::new("ada", "basics", &result))
            .unwrap();
        context.store.recompute_rankings().unwrap();

        let menu = Menu::new(&context);
        assert!(menu.progress.completed.contains("basics"));
        assert_eq!(menu.progress.ranking.as_ref().unwrap().total_points, 30);
        assert!(menu.warning.is_none());
    }

    #[test]
    fn test_navigation_wraps_and_opens() {
        let (_dir, mut context) = test_context();
        context.config.lessons = vec![lesson("basics", "all")];
        let mut menu = Menu::new(&context);

        previous_index(&mut menu.index, menu.entries.len());
        assert_eq!(menu.index, 1);
        next_index(&mut menu.index, menu.entries.len());
        assert_eq!(menu.index, 0);

        assert!(matches!(menu.open(&context), Message::Show(Page::Session(_))));
    }
}

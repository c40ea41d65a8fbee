use crossterm::event::{Event, KeyCode};
use keystrike::{Placement, SessionResult};
use ratatui::{
    Frame,
    layout::{Constraint, Rect},
    style::{Style, Stylize},
    text::Line,
    widgets::{Block, Paragraph},
};

use crate::{
    app::Context,
    page::session::Purpose,
    store::{CompletionRecord, Profile, StoreError, UserRanking},
    utils::{ROUNDED_BLOCK, center, centered_padding, format_seconds},
};

use super::Message;

#[derive(Debug)]
enum SaveState {
    Unsaved,
    /// Nothing was stored
    Failed(String),
    /// The completion is stored, the rankings are not up to date yet
    Recorded(String),
    Saved(Option<UserRanking>),
}

/// Page: Results
///
/// Shows the outcome of a session and saves it on request. A failed save keeps the result
/// on screen so it can be retried.
#[derive(Debug)]
pub struct Results {
    purpose: Purpose,
    result: SessionResult,
    placement: Placement,
    state: SaveState,
}

impl Results {
    pub const fn new(purpose: Purpose, result: SessionResult, placement: Placement) -> Self {
        Self {
            purpose,
            result,
            placement,
            state: SaveState::Unsaved,
        }
    }

    /// Store the outcome and refresh the rankings.
    ///
    /// A retry after [SaveState::Recorded] only refreshes the rankings, so the completion is
    /// never stored twice.
    fn save(&mut self, context: &Context) {
        if !matches!(self.state, SaveState::Recorded(_))
            && let Err(error) = self.store_outcome(context)
        {
            log::error!("Failed to save progress: {error}");
            self.state = SaveState::Failed(error.to_string());
            return;
        }

        self.state = match context.store.recompute_rankings() {
            Ok(leaderboard) => SaveState::Saved(leaderboard.get(&context.user).cloned()),
            Err(error) => {
                log::error!("Failed to update rankings: {error}");
                SaveState::Recorded(error.to_string())
            }
        };
    }

    fn store_outcome(&self, context: &Context) -> Result<(), StoreError> {
        match &self.purpose {
            Purpose::Lesson { id, .. } => context.store.record_completion(&CompletionRecord::new(
                &context.user,
                id,
                &self.result,
            )),
            Purpose::Assessment => context
                .store
                .save_profile(&Profile::new(&context.user, &self.placement)),
        }
    }
}

// Rendering logic
impl Results {
    pub fn render(&self, frame: &mut Frame, area: Rect, context: &Context) {
        let theme = &context.config.settings.theme;
        let heading = Style::new().bold().fg(theme.text.highlight);

        let mut lines = match &self.purpose {
            Purpose::Lesson { .. } => vec![
                Line::styled(format!("Score: {}", self.result.score), heading),
                Line::raw(format!("WPM: {}", self.result.wpm)),
                Line::raw(format!("Accuracy: {}%", self.result.accuracy)),
                Line::raw(format!(
                    "Time: {}",
                    format_seconds(self.result.time_spent_seconds)
                )),
                if self.result.is_first_completion {
                    Line::raw(format!(
                        "+{} points added to your ranking",
                        self.result.score
                    ))
                    .italic()
                } else {
                    Line::raw("Practice session - no points awarded").italic()
                },
            ],
            Purpose::Assessment => vec![
                Line::styled(format!("Level: {}", self.placement.level), heading),
                Line::raw(format!("WPM: {}", self.placement.wpm)),
                Line::raw(format!("Accuracy: {}%", self.placement.accuracy)),
            ],
        };
        lines.push(Line::default());

        match &self.state {
            SaveState::Unsaved => lines.push(Line::raw("<Enter> to save your progress").dim()),
            SaveState::Saved(ranking) => {
                let saved = match ranking {
                    Some(ranking) => format!(
                        "Progress saved. {} points, {} (#{})",
                        ranking.total_points, ranking.tier, ranking.position
                    ),
                    None => "Progress saved".to_string(),
                };
                lines.push(Line::raw(saved).fg(theme.text.success));
                lines.push(Line::raw("<Enter> to return to menu").dim());
            }
            SaveState::Failed(error) | SaveState::Recorded(error) => {
                lines.push(Line::raw("Failed to save progress").fg(theme.text.error));
                lines.push(Line::raw(error.as_str()).fg(theme.text.error));
                lines.push(Line::raw("<Enter> to retry").dim());
            }
        }

        let area = center(area, Constraint::Percentage(60), Constraint::Percentage(80));
        let block = ROUNDED_BLOCK.title(self.purpose.title().to_string());
        let inner = block.inner(area);
        let padding = centered_padding(inner, lines.len() as u16);

        frame.render_widget(block, area);
        frame.render_widget(
            Paragraph::new(lines)
                .centered()
                .block(Block::new().padding(padding)),
            inner,
        );
    }

    pub fn render_top(&self, _context: &Context) -> Option<Line<'_>> {
        Some(Line::raw("<Esc> to return to menu"))
    }

    pub fn handle_events(&mut self, event: &Event, context: &Context) -> Option<Message> {
        if let Event::Key(key) = event
            && key.is_press()
            && key.code == KeyCode::Enter
        {
            if matches!(self.state, SaveState::Saved(_)) {
                return Some(Message::Reset);
            }
            self.save(context);
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use keystrike::PlacementLevel;

    use super::*;
    use crate::app::tests::test_context;

    fn result() -> SessionResult {
        SessionResult {
            wpm: 60,
            accuracy: 95,
            score: 47,
            time_spent_seconds: 42,
            is_first_completion: true,
        }
    }

    fn placement() -> Placement {
        Placement {
            wpm: 45,
            accuracy: 90,
            level: PlacementLevel::Intermediate,
        }
    }

    fn lesson() -> Purpose {
        Purpose::Lesson {
            id: "vitals".to_string(),
            title: "Vital signs".to_string(),
            kind: crate::config::LessonKind::Text,
            playback_speed: 1.0,
        }
    }

    #[test]
    fn test_saving_a_lesson_updates_rankings() {
        let (_dir, context) = test_context();
        let mut results = Results::new(lesson(), result(), placement());

        results.save(&context);

        let SaveState::Saved(Some(ranking)) = &results.state else {
            panic!("expected a saved ranking, got {:?}", results.state);
        };
        assert_eq!(ranking.total_points, 47);
        assert!(context.store.has_completed("ada", "vitals").unwrap());
    }

    #[test]
    fn test_saving_an_assessment_stores_the_profile() {
        let (_dir, context) = test_context();
        let mut results = Results::new(Purpose::Assessment, result(), placement());

        results.save(&context);

        assert!(matches!(results.state, SaveState::Saved(None)));
        let profile = context.store.profile("ada").unwrap().unwrap();
        assert_eq!(profile.level, PlacementLevel::Intermediate);
    }

    #[test]
    fn test_failed_save_can_be_retried() {
        let (dir, context) = test_context();
        let completions = dir.path().join("data").join("completions.json");
        std::fs::write(&completions, "corrupt").unwrap();

        let mut results = Results::new(lesson(), result(), placement());
        results.save(&context);
        assert!(matches!(results.state, SaveState::Failed(_)));

        std::fs::remove_file(&completions).unwrap();
        results.save(&context);
        assert!(matches!(results.state, SaveState::Saved(Some(_))));
    }

    #[test]
    fn test_ranking_retry_keeps_a_single_completion() {
        let (dir, context) = test_context();
        // A directory in place of the rankings file makes that write fail
        let rankings = dir.path().join("data").join("rankings.json");
        std::fs::create_dir(&rankings).unwrap();

        let mut results = Results::new(lesson(), result(), placement());
        results.save(&context);
        assert!(matches!(results.state, SaveState::Recorded(_)));

        std::fs::remove_dir(&rankings).unwrap();
        results.save(&context);

        let SaveState::Saved(Some(ranking)) = &results.state else {
            panic!("expected a saved ranking, got {:?}", results.state);
        };
        assert_eq!(ranking.total_points, 47);
        assert_eq!(ranking.total_time_seconds, 42);

        let content = std::fs::read_to_string(dir.path().join("data").join("completions.json"))
            .unwrap();
        let records: Vec<CompletionRecord> = serde_json::from_str(&content).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_replay_saves_without_points() {
        let (_dir, context) = test_context();

        let mut first = Results::new(lesson(), result(), placement());
        first.save(&context);

        let replay = SessionResult {
            score: 60,
            is_first_completion: false,
            ..result()
        };
        let mut again = Results::new(lesson(), replay, placement());
        again.save(&context);

        let SaveState::Saved(Some(ranking)) = &again.state else {
            panic!("expected a saved ranking, got {:?}", again.state);
        };
        assert_eq!(ranking.total_points, 47);
    }
}

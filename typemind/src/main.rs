use std::path::PathBuf;

use clap::Parser;

mod app;
mod config;
mod logging;
mod page;
mod passages;
mod speech;
mod store;
mod utils;

use app::{App, Context};
use config::{Config, Settings};
use speech::CommandSpeech;
use store::{JsonStore, Leaderboard, ProgressStore};
use utils::format_seconds;

/// Used when no name is configured and `$USER` is unset
const FALLBACK_USER: &str = "learner";

/// A typing trainer for your terminal
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Directory with `settings.toml` and lessons
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Record progress under this name
    #[arg(short, long)]
    user: Option<String>,

    /// Start with the placement assessment
    #[arg(long)]
    assess: bool,

    /// Print the available lessons and exit
    #[arg(long, conflicts_with = "rankings")]
    list: bool,

    /// Print the leaderboard and exit
    #[arg(long)]
    rankings: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = Config::get(cli.config)?;
    logging::init(&config.data_dir)?;

    let user = resolve_user(cli.user, &config.settings);
    let store = JsonStore::new(config.data_dir.clone())?;

    if cli.list {
        print_lessons(&config);
        return Ok(());
    }

    if cli.rankings {
        print_rankings(&store.recompute_rankings()?);
        return Ok(());
    }

    log::info!("Starting session for '{user}'");
    let context = Context {
        speech: Box::new(CommandSpeech::new(&config.settings.speech)),
        store: Box::new(store),
        config,
        user,
    };

    App::new(context, cli.assess).run()?;

    Ok(())
}

/// The name from the command line, then settings, then the environment
fn resolve_user(cli_user: Option<String>, settings: &Settings) -> String {
    cli_user
        .or_else(|| settings.user.clone())
        .or_else(|| std::env::var("USER").ok())
        .filter(|user| !user.trim().is_empty())
        .unwrap_or_else(|| FALLBACK_USER.to_string())
}

fn print_lessons(config: &Config) {
    if config.lessons.is_empty() {
        println!("No lessons found");
        return;
    }

    for lesson in &config.lessons {
        let meta = &lesson.meta;
        println!(
            "{:<20} {:<30} {:<12} {}",
            meta.id,
            meta.title,
            meta.level.to_string(),
            meta.kind
        );
    }
}

fn print_rankings(leaderboard: &Leaderboard) {
    if leaderboard.rankings.is_empty() {
        println!("No completed lessons yet");
        return;
    }

    println!(
        "{:>3}  {:<20} {:<18} {:>7}  {:<7} {:>5} {:>5} {:>8} {:>7}",
        "#", "User", "Level", "Points", "Rank", "WPM", "Acc", "Time", "Lessons"
    );
    for ranking in &leaderboard.rankings {
        let level = match (ranking.level, ranking.level_position) {
            (Some(level), Some(position)) => format!("{level} #{position}"),
            _ => "-".to_string(),
        };
        println!(
            "{:>3}  {:<20} {:<18} {:>7}  {:<7} {:>5.0} {:>4.0}% {:>8} {:>7}",
            ranking.position,
            ranking.user,
            level,
            ranking.total_points,
            ranking.tier.to_string(),
            ranking.average_wpm,
            ranking.average_accuracy,
            format_seconds(ranking.total_time_seconds),
            ranking.lessons_completed,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_flags() {
        let cli = Cli::parse_from(["typemind", "--user", "ada", "--assess"]);
        assert_eq!(cli.user.as_deref(), Some("ada"));
        assert!(cli.assess);
        assert!(!cli.list);

        assert!(Cli::try_parse_from(["typemind", "--list", "--rankings"]).is_err());
    }

    #[test]
    fn test_user_from_cli_wins() {
        let settings = Settings {
            user: Some("grace".to_string()),
            ..Settings::default()
        };

        assert_eq!(resolve_user(Some("ada".to_string()), &settings), "ada");
        assert_eq!(resolve_user(None, &settings), "grace");
    }

    #[test]
    fn test_blank_user_falls_back() {
        let settings = Settings::default();
        assert_eq!(resolve_user(Some("  ".to_string()), &settings), FALLBACK_USER);
    }
}

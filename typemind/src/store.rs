//! Progress persistence and rankings.
//!
//! The app only talks to [ProgressStore]. [JsonStore] keeps everything as JSON files in
//! the data directory:
//!
//! - `completions.json` - every finished lesson
//! - `profiles.json` - placement results per user
//! - `rankings.json` - the leaderboard, rebuilt after each completion

use std::{
    collections::{BTreeMap, HashMap, HashSet},
    fs,
    path::PathBuf,
};

use keystrike::{Placement, PlacementLevel, RankProgress, RankTier, SessionResult};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de::DeserializeOwned};
use thiserror::Error;
use web_time::SystemTime;

const COMPLETIONS_FILE: &str = "completions.json";
const PROFILES_FILE: &str = "profiles.json";
const RANKINGS_FILE: &str = "rankings.json";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to create data directory: {0}")]
    CreateDirectory(std::io::Error),

    #[error("Failed to read '{path}': {error}")]
    ReadFile { path: PathBuf, error: std::io::Error },

    #[error("Failed to write '{path}': {error}")]
    WriteFile { path: PathBuf, error: std::io::Error },

    #[error("Failed to parse '{path}': {error}")]
    Parse {
        path: PathBuf,
        error: serde_json::Error,
    },

    #[error("Failed to serialize progress: {0}")]
    Serialize(serde_json::Error),
}

#[derive(Serialize, Deserialize)]
#[serde(remote = "PlacementLevel", rename_all = "snake_case")]
enum PlacementLevelDef {
    Beginner,
    Intermediate,
    Advanced,
}

#[derive(Serialize, Deserialize)]
#[serde(remote = "RankTier")]
enum RankTierDef {
    D,
    C,
    B,
    A,
    S,
}

/// Serde adapter for an optional [PlacementLevel]
mod optional_level {
    use super::*;

    #[derive(Serialize, Deserialize)]
    struct Level(#[serde(with = "PlacementLevelDef")] PlacementLevel);

    pub fn serialize<S: Serializer>(
        level: &Option<PlacementLevel>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        level.map(Level).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<PlacementLevel>, D::Error> {
        Ok(Option::<Level>::deserialize(deserializer)?.map(|Level(level)| level))
    }
}

/// One finished lesson
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRecord {
    pub user: String,
    pub lesson_id: String,
    pub wpm: u32,
    pub accuracy: u32,
    pub score: u32,
    pub time_spent_seconds: u64,
    pub is_first_completion: bool,
    pub timestamp: SystemTime,
}

impl CompletionRecord {
    pub fn new(user: &str, lesson_id: &str, result: &SessionResult) -> Self {
        Self {
            user: user.to_string(),
            lesson_id: lesson_id.to_string(),
            wpm: result.wpm,
            accuracy: result.accuracy,
            score: result.score,
            time_spent_seconds: result.time_spent_seconds,
            is_first_completion: result.is_first_completion,
            timestamp: SystemTime::now(),
        }
    }
}

/// A learner's placement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub user: String,
    #[serde(with = "PlacementLevelDef")]
    pub level: PlacementLevel,
    pub assessed_wpm: u32,
    pub assessed_accuracy: u32,
    pub updated_at: SystemTime,
}

impl Profile {
    pub fn new(user: &str, placement: &Placement) -> Self {
        Self {
            user: user.to_string(),
            level: placement.level,
            assessed_wpm: placement.wpm,
            assessed_accuracy: placement.accuracy,
            updated_at: SystemTime::now(),
        }
    }
}

/// A learner's standing on the leaderboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRanking {
    /// 1-based
    pub position: usize,
    pub user: String,
    /// Placement level, if the user has been assessed
    #[serde(default, with = "optional_level")]
    pub level: Option<PlacementLevel>,
    /// 1-based position among users of the same level
    #[serde(default)]
    pub level_position: Option<usize>,
    pub total_points: u64,
    #[serde(with = "RankTierDef")]
    pub tier: RankTier,
    pub average_wpm: f64,
    pub average_accuracy: f64,
    pub total_time_seconds: u64,
    pub lessons_completed: usize,
}

impl UserRanking {
    pub fn progress(&self) -> RankProgress {
        RankProgress::new(self.total_points)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leaderboard {
    pub generated_at: SystemTime,
    pub rankings: Vec<UserRanking>,
}

impl Default for Leaderboard {
    fn default() -> Self {
        Self {
            generated_at: SystemTime::UNIX_EPOCH,
            rankings: Vec::new(),
        }
    }
}

impl Leaderboard {
    /// Rank every user found in `records`.
    ///
    /// Only first completions earn points, so replaying a lesson is practice and never
    /// changes the ranking. Averages and time are taken over all completions. Users with a
    /// profile in `profiles` are also ranked within their placement level.
    pub fn compute(records: &[CompletionRecord], profiles: &[Profile]) -> Self {
        #[derive(Default)]
        struct Totals<'a> {
            points: u64,
            lessons: HashSet<&'a str>,
            wpm: u64,
            accuracy: u64,
            time: u64,
            count: u64,
        }

        // BTreeMap keeps ties ordered by user name
        let mut users = BTreeMap::<&str, Totals>::new();
        for record in records {
            let totals = users.entry(record.user.as_str()).or_default();
            if record.is_first_completion {
                totals.points += u64::from(record.score);
            }
            totals.lessons.insert(record.lesson_id.as_str());
            totals.wpm += u64::from(record.wpm);
            totals.accuracy += u64::from(record.accuracy);
            totals.time += record.time_spent_seconds;
            totals.count += 1;
        }

        let mut rankings: Vec<UserRanking> = users
            .into_iter()
            .map(|(user, totals)| {
                let count = totals.count.max(1) as f64;
                UserRanking {
                    position: 0,
                    user: user.to_string(),
                    level: profiles
                        .iter()
                        .find(|profile| profile.user == user)
                        .map(|profile| profile.level),
                    level_position: None,
                    total_points: totals.points,
                    tier: RankTier::for_points(totals.points),
                    average_wpm: totals.wpm as f64 / count,
                    average_accuracy: totals.accuracy as f64 / count,
                    total_time_seconds: totals.time,
                    lessons_completed: totals.lessons.len(),
                }
            })
            .collect();

        // Stable sort keeps name order among equal points
        rankings.sort_by(|a, b| b.total_points.cmp(&a.total_points));

        let mut level_counts = HashMap::<PlacementLevel, usize>::new();
        for (index, ranking) in rankings.iter_mut().enumerate() {
            ranking.position = index + 1;
            ranking.level_position = ranking.level.map(|level| {
                let count = level_counts.entry(level).or_default();
                *count += 1;
                *count
            });
        }

        Self {
            generated_at: SystemTime::now(),
            rankings,
        }
    }

    pub fn get(&self, user: &str) -> Option<&UserRanking> {
        self.rankings.iter().find(|ranking| ranking.user == user)
    }
}

/// Where learner progress is kept
pub trait ProgressStore {
    /// Returns true if `user` has finished `lesson_id` before
    fn has_completed(&self, user: &str, lesson_id: &str) -> Result<bool, StoreError>;

    fn record_completion(&self, record: &CompletionRecord) -> Result<(), StoreError>;

    /// Rebuild the leaderboard from all completions and profiles
    fn recompute_rankings(&self) -> Result<Leaderboard, StoreError>;

    /// The last computed ranking of `user`
    fn ranking_for(&self, user: &str) -> Result<Option<UserRanking>, StoreError>;

    fn profile(&self, user: &str) -> Result<Option<Profile>, StoreError>;

    fn save_profile(&self, profile: &Profile) -> Result<(), StoreError>;
}

/// [ProgressStore] backed by JSON files in a directory
#[derive(Debug)]
pub struct JsonStore {
    directory: PathBuf,
}

impl JsonStore {
    pub fn new(directory: PathBuf) -> Result<Self, StoreError> {
        if !directory.exists() {
            fs::create_dir_all(&directory).map_err(StoreError::CreateDirectory)?;
        }
        Ok(Self { directory })
    }

    /// Read a JSON file, or the default value if it doesn't exist yet
    fn read<T: DeserializeOwned + Default>(&self, file: &str) -> Result<T, StoreError> {
        let path = self.directory.join(file);
        if !path.exists() {
            return Ok(T::default());
        }

        let content = fs::read_to_string(&path).map_err(|error| StoreError::ReadFile {
            path: path.clone(),
            error,
        })?;
        serde_json::from_str(&content).map_err(|error| StoreError::Parse { path, error })
    }

    fn write<T: Serialize>(&self, file: &str, value: &T) -> Result<(), StoreError> {
        let path = self.directory.join(file);
        let json = serde_json::to_string_pretty(value).map_err(StoreError::Serialize)?;
        fs::write(&path, json).map_err(|error| StoreError::WriteFile { path, error })
    }

    fn completions(&self) -> Result<Vec<CompletionRecord>, StoreError> {
        self.read(COMPLETIONS_FILE)
    }
}

impl ProgressStore for JsonStore {
    fn has_completed(&self, user: &str, lesson_id: &str) -> Result<bool, StoreError> {
        Ok(self
            .completions()?
            .iter()
            .any(|record| record.user == user && record.lesson_id == lesson_id))
    }

    fn record_completion(&self, record: &CompletionRecord) -> Result<(), StoreError> {
        let mut completions = self.completions()?;
        completions.push(record.clone());
        self.write(COMPLETIONS_FILE, &completions)?;

        log::info!(
            "Recorded completion of '{}' for '{}' (score {})",
            record.lesson_id,
            record.user,
            record.score
        );
        Ok(())
    }

    fn recompute_rankings(&self) -> Result<Leaderboard, StoreError> {
        let profiles: Vec<Profile> = self.read(PROFILES_FILE)?;
        let leaderboard = Leaderboard::compute(&self.completions()?, &profiles);
        self.write(RANKINGS_FILE, &leaderboard)?;
        Ok(leaderboard)
    }

    fn ranking_for(&self, user: &str) -> Result<Option<UserRanking>, StoreError> {
        let leaderboard: Leaderboard = self.read(RANKINGS_FILE)?;
        Ok(leaderboard.get(user).cloned())
    }

    fn profile(&self, user: &str) -> Result<Option<Profile>, StoreError> {
        let profiles: Vec<Profile> = self.read(PROFILES_FILE)?;
        Ok(profiles.into_iter().find(|profile| profile.user == user))
    }

    fn save_profile(&self, profile: &Profile) -> Result<(), StoreError> {
        let mut profiles: Vec<Profile> = self.read(PROFILES_FILE)?;
        profiles.retain(|existing| existing.user != profile.user);
        profiles.push(profile.clone());
        self.write(PROFILES_FILE, &profiles)?;

        log::info!("Placed '{}' at level {}", profile.user, profile.level);
        Ok(())
    }
}

/// Lesson ids `user` has completed
pub fn completed_lessons(
    store: &dyn ProgressStore,
    user: &str,
    lesson_ids: &[&str],
) -> Result<HashSet<String>, StoreError> {
    let mut completed = HashSet::new();
    for id in lesson_ids {
        if store.has_completed(user, id)? {
            completed.insert(id.to_string());
        }
    }
    Ok(completed)
}

//! # Rank Module - Point Tiers
//!
//! Lesson scores add up to a learner's total points, which place them in one of five rank
//! tiers. The top tier is open-ended.
//!
//! | Tier | Title        | Points      |
//! |------|--------------|-------------|
//! | D    | Beginner     | 0 - 499     |
//! | C    | Intermediate | 500 - 1499  |
//! | B    | Advanced     | 1500 - 2999 |
//! | A    | Expert       | 3000 - 4999 |
//! | S    | Master       | 5000+       |

/// A rank tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RankTier {
    D,
    C,
    B,
    A,
    S,
}

impl RankTier {
    /// All tiers, lowest first
    pub const ALL: [Self; 5] = [Self::D, Self::C, Self::B, Self::A, Self::S];

    /// Points needed to reach the tier
    pub const fn min_points(&self) -> u64 {
        match self {
            Self::D => 0,
            Self::C => 500,
            Self::B => 1500,
            Self::A => 3000,
            Self::S => 5000,
        }
    }

    pub const fn title(&self) -> &'static str {
        match self {
            Self::D => "Beginner",
            Self::C => "Intermediate",
            Self::B => "Advanced",
            Self::A => "Expert",
            Self::S => "Master",
        }
    }

    pub const fn next(&self) -> Option<Self> {
        match self {
            Self::D => Some(Self::C),
            Self::C => Some(Self::B),
            Self::B => Some(Self::A),
            Self::A => Some(Self::S),
            Self::S => None,
        }
    }

    /// The tier a point total falls into
    pub fn for_points(points: u64) -> Self {
        Self::ALL
            .into_iter()
            .rev()
            .find(|tier| points >= tier.min_points())
            .unwrap_or(Self::D)
    }
}

impl std::fmt::Display for RankTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}-Rank")
    }
}

/// How far a learner is on their way to the next tier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankProgress {
    pub points: u64,
    pub tier: RankTier,
    pub next: Option<RankTier>,
    /// Between 0.0 and 100.0. Always 100.0 in the top tier.
    pub percent: f64,
    /// Points left until the next tier, 0 in the top tier
    pub points_needed: u64,
}

impl RankProgress {
    pub fn new(points: u64) -> Self {
        let tier = RankTier::for_points(points);
        let next = tier.next();

        let (percent, points_needed) = next.map_or((100.0, 0), |next| {
            let span = next.min_points() - tier.min_points();
            let progress = points - tier.min_points();
            (
                (progress as f64 / span as f64) * 100.0,
                next.min_points() - points,
            )
        });

        Self {
            points,
            tier,
            next,
            percent,
            points_needed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(RankTier::for_points(0), RankTier::D);
        assert_eq!(RankTier::for_points(499), RankTier::D);
        assert_eq!(RankTier::for_points(500), RankTier::C);
        assert_eq!(RankTier::for_points(1499), RankTier::C);
        assert_eq!(RankTier::for_points(1500), RankTier::B);
        assert_eq!(RankTier::for_points(3000), RankTier::A);
        assert_eq!(RankTier::for_points(5000), RankTier::S);
        assert_eq!(RankTier::for_points(1_000_000), RankTier::S);
    }

    #[test]
    fn test_progress() {
        let progress = RankProgress::new(1000);
        assert_eq!(progress.tier, RankTier::C);
        assert_eq!(progress.next, Some(RankTier::B));
        assert_eq!(progress.percent, 50.0);
        assert_eq!(progress.points_needed, 500);

        let progress = RankProgress::new(0);
        assert_eq!(progress.percent, 0.0);
        assert_eq!(progress.points_needed, 500);
    }

    #[test]
    fn test_progress_at_top_tier() {
        let progress = RankProgress::new(7200);
        assert_eq!(progress.tier, RankTier::S);
        assert_eq!(progress.next, None);
        assert_eq!(progress.percent, 100.0);
        assert_eq!(progress.points_needed, 0);
    }

    #[test]
    fn test_display() {
        assert_eq!(RankTier::B.to_string(), "B-Rank");
        assert_eq!(RankTier::S.title(), "Master");
    }
}

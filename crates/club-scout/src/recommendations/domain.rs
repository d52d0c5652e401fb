use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier wrapper for players in the candidate pool.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub String);

/// Identifier wrapper for clubs issuing recommendation requests.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClubId(pub String);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for ClubId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Playing position recognised by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Position {
    Forward,
    Midfielder,
    Defender,
    Goalkeeper,
}

impl Position {
    pub const ALL: [Position; 4] = [
        Position::Forward,
        Position::Midfielder,
        Position::Defender,
        Position::Goalkeeper,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Position::Forward => "Forward",
            Position::Midfielder => "Midfielder",
            Position::Defender => "Defender",
            Position::Goalkeeper => "Goalkeeper",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Raised when a caller names a position outside the known set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown position '{0}' (expected Forward, Midfielder, Defender or Goalkeeper)")]
pub struct UnknownPosition(pub String);

impl FromStr for Position {
    type Err = UnknownPosition;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim();
        Position::ALL
            .into_iter()
            .find(|position| position.label().eq_ignore_ascii_case(normalized))
            .ok_or_else(|| UnknownPosition(value.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreferredFoot {
    Left,
    Right,
    Both,
}

/// Kinds of negative signal that feed availability and risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    Injury,
    Suspension,
    Disciplinary,
    Volatility,
}

impl SignalKind {
    /// Injuries and suspensions take the player out of selection, not just add risk.
    pub fn blocks_selection(&self) -> bool {
        matches!(self, SignalKind::Injury | SignalKind::Suspension)
    }
}

/// Negative signal attached to a player, optionally expiring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSignal {
    pub kind: SignalKind,
    /// Magnitude in `[0, 1]`.
    pub severity: f32,
    #[serde(default)]
    pub expires_on: Option<NaiveDate>,
}

impl PlayerSignal {
    pub fn is_active(&self, as_of: NaiveDate) -> bool {
        self.expires_on.map(|expiry| expiry > as_of).unwrap_or(true)
    }
}

/// Single news item referencing a player, already scored upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsMention {
    /// Sentiment/impact in `[-1, 1]`.
    pub sentiment: f32,
    /// Extraction confidence in `[0, 1]`.
    pub confidence: f32,
    pub published_on: NaiveDate,
}

/// Candidate player as supplied by the data-access collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub position: Position,
    #[serde(default)]
    pub secondary_positions: Vec<Position>,
    pub age: u8,
    #[serde(default)]
    pub current_club: Option<String>,
    #[serde(default)]
    pub rating: Option<f32>,
    #[serde(default)]
    pub market_value_eur: Option<u64>,
    #[serde(default)]
    pub preferred_foot: Option<PreferredFoot>,
    pub available: bool,
    /// Fraction of the requested window the player can actually cover.
    #[serde(default)]
    pub availability_window: Option<f32>,
    #[serde(default)]
    pub signals: Vec<PlayerSignal>,
    #[serde(default)]
    pub news: Vec<NewsMention>,
}

impl Player {
    /// Positions the player can be fielded in, primary first.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        std::iter::once(self.position).chain(self.secondary_positions.iter().copied())
    }
}

/// Inclusive age bounds requested by a club.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeRange {
    pub min: u8,
    pub max: u8,
}

impl AgeRange {
    pub fn contains(&self, age: u8) -> bool {
        (self.min..=self.max).contains(&age)
    }
}

/// Relative importance of each requirement when composing the fit score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RequirementPriorities {
    pub position: f32,
    pub age: f32,
    pub budget: f32,
    pub foot: f32,
}

impl Default for RequirementPriorities {
    fn default() -> Self {
        Self {
            position: 0.4,
            age: 0.3,
            budget: 0.2,
            foot: 0.1,
        }
    }
}

impl RequirementPriorities {
    pub fn total(&self) -> f32 {
        self.position + self.age + self.budget + self.foot
    }

    pub fn is_valid(&self) -> bool {
        let parts = [self.position, self.age, self.budget, self.foot];
        parts.iter().all(|value| value.is_finite() && *value >= 0.0) && self.total() > 0.0
    }
}

/// Declared recruitment need for a club.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClubNeed {
    pub club_id: ClubId,
    #[serde(default)]
    pub club_name: Option<String>,
    pub positions: Vec<Position>,
    #[serde(default)]
    pub age_range: Option<AgeRange>,
    #[serde(default)]
    pub budget_max_eur: Option<u64>,
    #[serde(default)]
    pub preferred_foot: Option<PreferredFoot>,
    #[serde(default)]
    pub priorities: Option<RequirementPriorities>,
}

impl ClubNeed {
    pub fn priorities(&self) -> RequirementPriorities {
        self.priorities.unwrap_or_default()
    }

    /// Returns a description of the first structural problem, if any.
    pub fn validation_error(&self) -> Option<String> {
        if self.club_id.0.trim().is_empty() {
            return Some("club need must name a club".to_string());
        }
        if self.positions.is_empty() {
            return Some("club need must list at least one position".to_string());
        }
        if let Some(range) = self.age_range {
            if range.min > range.max {
                return Some(format!(
                    "age range minimum {} exceeds maximum {}",
                    range.min, range.max
                ));
            }
        }
        if self.budget_max_eur == Some(0) {
            return Some("budget ceiling must be positive".to_string());
        }
        if let Some(priorities) = self.priorities {
            if !priorities.is_valid() {
                return Some(
                    "requirement priorities must be non-negative with a positive total"
                        .to_string(),
                );
            }
        }
        None
    }
}

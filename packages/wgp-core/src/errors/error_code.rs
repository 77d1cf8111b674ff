//! Error codes exposed to callers of the rules core.
//!
//! Add new codes here; never pass ad-hoc strings as error codes.
//! All error codes are SCREAMING_SNAKE_CASE.

use core::fmt;

use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Input validation
    /// Handicap outside 0..=54
    InvalidHandicap,
    /// Stroke index outside 1..=18 or not a permutation
    InvalidStrokeIndex,
    /// Malformed course definition
    InvalidCourse,
    /// Malformed roster
    InvalidRoster,
    /// Player id not on the roster
    PlayerNotFound,
    /// Gross score missing or out of range
    InvalidScore,
    /// Malformed shot record
    InvalidShot,
    /// Snapshot could not be reconstructed
    InvalidSnapshot,
    /// Rule configuration rejected
    ConfigError,
    /// General validation error
    ValidationError,

    // Rule violations
    /// Operation not legal in the current hole/game phase
    PhaseMismatch,
    /// Team formation rule broken
    TeamFormation,
    /// Wager escalation rule broken
    BettingRule,
    /// Ball/score sequencing rule broken
    HolePlay,
    /// Edit could not be replayed
    EditRejected,

    // Internal
    /// Internal invariant broken
    Consistency,
}

impl ErrorCode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidHandicap => "INVALID_HANDICAP",
            Self::InvalidStrokeIndex => "INVALID_STROKE_INDEX",
            Self::InvalidCourse => "INVALID_COURSE",
            Self::InvalidRoster => "INVALID_ROSTER",
            Self::PlayerNotFound => "PLAYER_NOT_FOUND",
            Self::InvalidScore => "INVALID_SCORE",
            Self::InvalidShot => "INVALID_SHOT",
            Self::InvalidSnapshot => "INVALID_SNAPSHOT",
            Self::ConfigError => "CONFIG_ERROR",
            Self::ValidationError => "VALIDATION_ERROR",

            Self::PhaseMismatch => "PHASE_MISMATCH",
            Self::TeamFormation => "TEAM_FORMATION",
            Self::BettingRule => "BETTING_RULE",
            Self::HolePlay => "HOLE_PLAY",
            Self::EditRejected => "EDIT_REJECTED",

            Self::Consistency => "CONSISTENCY",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for ErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

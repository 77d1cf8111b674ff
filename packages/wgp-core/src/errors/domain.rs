//! Domain-level error type used across the rules engine and the registry.
//!
//! Malformed input is a `Validation` error. An action outside its legal
//! timing or role window is a `RuleViolation`. A broken internal invariant is
//! a `Consistency` error. Every failing operation leaves the session untouched.

use thiserror::Error;

use crate::errors::error_code::ErrorCode;

/// Malformed-input kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationKind {
    Handicap,
    StrokeIndex,
    Course,
    Roster,
    UnknownPlayer,
    Score,
    Shot,
    Config,
    Snapshot,
    Other(String),
}

/// Rule-violation kinds (legal input, illegal moment or role).
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RuleKind {
    HoleNotOpen,
    HoleAlreadyOpen,
    HittingOrder,
    TeamsAlreadyFormed,
    TeamsNotFormed,
    OfferPending,
    NoOfferPending,
    SelfPartnership,
    NotCaptain,
    IneligibleCandidate,
    ShotRequired,
    WageringClosed,
    FloatAlreadyUsed,
    OptionUnavailable,
    SoloMultiplier,
    FixedValue,
    CarryOver,
    DoubleOffer,
    Aardvark,
    BallHoled,
    ScoresRequired,
    ScoresAlreadyEntered,
    GameComplete,
    Edit,
}

/// Central error type for the rules core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("validation error ({0:?}): {1}")]
    Validation(ValidationKind, String),
    #[error("rule violation ({0:?}): {1}")]
    RuleViolation(RuleKind, String),
    #[error("consistency error: {0}")]
    Consistency(String),
}

impl GameError {
    pub fn validation(kind: ValidationKind, detail: impl Into<String>) -> Self {
        Self::Validation(kind, detail.into())
    }

    pub fn rule(kind: RuleKind, detail: impl Into<String>) -> Self {
        Self::RuleViolation(kind, detail.into())
    }

    pub fn consistency(detail: impl Into<String>) -> Self {
        Self::Consistency(detail.into())
    }

    /// Stable machine-readable code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            GameError::Validation(kind, _) => match kind {
                ValidationKind::Handicap => ErrorCode::InvalidHandicap,
                ValidationKind::StrokeIndex => ErrorCode::InvalidStrokeIndex,
                ValidationKind::Course => ErrorCode::InvalidCourse,
                ValidationKind::Roster => ErrorCode::InvalidRoster,
                ValidationKind::UnknownPlayer => ErrorCode::PlayerNotFound,
                ValidationKind::Score => ErrorCode::InvalidScore,
                ValidationKind::Shot => ErrorCode::InvalidShot,
                ValidationKind::Config => ErrorCode::ConfigError,
                ValidationKind::Snapshot => ErrorCode::InvalidSnapshot,
                ValidationKind::Other(_) => ErrorCode::ValidationError,
            },
            GameError::RuleViolation(kind, _) => match kind {
                RuleKind::HoleNotOpen
                | RuleKind::HoleAlreadyOpen
                | RuleKind::HittingOrder
                | RuleKind::GameComplete => ErrorCode::PhaseMismatch,
                RuleKind::TeamsAlreadyFormed
                | RuleKind::TeamsNotFormed
                | RuleKind::OfferPending
                | RuleKind::NoOfferPending
                | RuleKind::SelfPartnership
                | RuleKind::NotCaptain
                | RuleKind::IneligibleCandidate
                | RuleKind::ShotRequired
                | RuleKind::Aardvark => ErrorCode::TeamFormation,
                RuleKind::WageringClosed
                | RuleKind::FloatAlreadyUsed
                | RuleKind::OptionUnavailable
                | RuleKind::SoloMultiplier
                | RuleKind::FixedValue
                | RuleKind::CarryOver
                | RuleKind::DoubleOffer => ErrorCode::BettingRule,
                RuleKind::BallHoled
                | RuleKind::ScoresRequired
                | RuleKind::ScoresAlreadyEntered => ErrorCode::HolePlay,
                RuleKind::Edit => ErrorCode::EditRejected,
            },
            GameError::Consistency(_) => ErrorCode::Consistency,
        }
    }

    pub fn is_rule_violation(&self) -> bool {
        matches!(self, GameError::RuleViolation(..))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, GameError::Validation(..))
    }
}

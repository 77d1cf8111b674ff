//! House-rule configuration.
//!
//! The mid-round doubling window and the late phase are per player count.

use std::env;

use serde::{Deserialize, Serialize};

use crate::domain::points::Wager;
use crate::errors::domain::{GameError, ValidationKind};

pub const MIN_PLAYERS: usize = 4;
pub const MAX_PLAYERS: usize = 6;
pub const COURSE_HOLES: u8 = 18;

/// Environment variable holding a JSON-encoded `GameRules` override.
pub const RULES_ENV_VAR: &str = "WGP_RULES_JSON";

/// Inclusive hole range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoleRange {
    pub first: u8,
    pub last: u8,
}

impl HoleRange {
    pub const fn new(first: u8, last: u8) -> Self {
        Self { first, last }
    }

    pub fn contains(&self, hole: u8) -> bool {
        (self.first..=self.last).contains(&hole)
    }
}

/// Phase windows for one player count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseWindows {
    /// Holes whose base wager is doubled ("Vinnie's Variation").
    pub mid_round: Option<HoleRange>,
    /// First hole of the late phase ("Hoepfinger"); runs to the last hole.
    pub late_start: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameRules {
    pub base_wager: Wager,
    pub total_holes: u8,
    pub four_player: PhaseWindows,
    pub five_player: PhaseWindows,
    pub six_player: PhaseWindows,
    /// Values the trailing player may fix a late-phase hole at.
    pub fixed_value_options: Vec<Wager>,
    pub carry_over_enabled: bool,
    pub max_gross_score: u8,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            base_wager: 1,
            total_holes: COURSE_HOLES,
            four_player: PhaseWindows {
                mid_round: Some(HoleRange::new(13, 16)),
                late_start: 17,
            },
            five_player: PhaseWindows {
                mid_round: Some(HoleRange::new(13, 15)),
                late_start: 16,
            },
            six_player: PhaseWindows {
                mid_round: None,
                late_start: 13,
            },
            fixed_value_options: vec![2, 4, 8],
            carry_over_enabled: true,
            max_gross_score: 15,
        }
    }
}

impl GameRules {
    /// Parse and validate rules from JSON. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, GameError> {
        let rules: GameRules = serde_json::from_str(json).map_err(|e| {
            GameError::validation(ValidationKind::Config, format!("invalid rules JSON: {e}"))
        })?;
        rules.validate()?;
        Ok(rules)
    }

    /// Load rules from `WGP_RULES_JSON`, falling back to defaults when unset
    /// or blank.
    pub fn from_env() -> Result<Self, GameError> {
        match env::var(RULES_ENV_VAR) {
            Ok(raw) if !raw.trim().is_empty() => Self::from_json(&raw),
            _ => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), GameError> {
        if self.base_wager == 0 {
            return Err(config_err("base_wager must be positive"));
        }
        if self.total_holes < COURSE_HOLES {
            return Err(config_err(format!(
                "total_holes must be at least {COURSE_HOLES}, got {}",
                self.total_holes
            )));
        }
        if self.fixed_value_options.is_empty() || self.fixed_value_options.contains(&0) {
            return Err(config_err("fixed_value_options must be non-empty and positive"));
        }
        if self.max_gross_score == 0 {
            return Err(config_err("max_gross_score must be positive"));
        }
        for (count, windows) in [
            (4, &self.four_player),
            (5, &self.five_player),
            (6, &self.six_player),
        ] {
            self.validate_windows(count, windows)?;
        }
        Ok(())
    }

    fn validate_windows(&self, count: usize, windows: &PhaseWindows) -> Result<(), GameError> {
        if windows.late_start < 2 || windows.late_start > self.total_holes {
            return Err(config_err(format!(
                "{count}-player late_start {} outside 2..={}",
                windows.late_start, self.total_holes
            )));
        }
        if let Some(mid) = windows.mid_round {
            if mid.first == 0 || mid.first > mid.last {
                return Err(config_err(format!(
                    "{count}-player mid_round range {}..={} is empty",
                    mid.first, mid.last
                )));
            }
            if mid.last >= windows.late_start {
                return Err(config_err(format!(
                    "{count}-player mid_round range overlaps the late phase starting at {}",
                    windows.late_start
                )));
            }
        }
        Ok(())
    }

    pub fn windows_for(&self, player_count: usize) -> Result<&PhaseWindows, GameError> {
        match player_count {
            4 => Ok(&self.four_player),
            5 => Ok(&self.five_player),
            6 => Ok(&self.six_player),
            n => Err(GameError::validation(
                ValidationKind::Roster,
                format!("Wolf Goat Pig needs {MIN_PLAYERS}..={MAX_PLAYERS} players, got {n}"),
            )),
        }
    }

    pub fn is_fixed_value_option(&self, value: Wager) -> bool {
        self.fixed_value_options.contains(&value)
    }
}

fn config_err(detail: impl Into<String>) -> GameError {
    GameError::validation(ValidationKind::Config, detail)
}

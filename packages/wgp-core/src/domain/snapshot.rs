//! Serialisable session state.
//!
//! A `SessionSnapshot` carries everything needed to rebuild a session: the
//! rules, course and starting roster plus each hole's action log. The
//! derived `SessionView` rides along so a reader can inspect standings
//! without replaying, and so reconstruction can detect a tampered log.

use serde::{Deserialize, Serialize};

use crate::config::course::Course;
use crate::config::game_rules::GameRules;
use crate::domain::betting::{CarryOver, WagerSummary};
use crate::domain::hole::{HoleAction, HoleStart, HoleState};
use crate::domain::phase::Phase;
use crate::domain::roster::{Player, PlayerId, PlayerSpec};
use crate::domain::session::HoleSummary;

pub const SNAPSHOT_VERSION: u32 = 1;

/// The accepted actions of one hole, in order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoleLog {
    pub number: u8,
    #[serde(default)]
    pub start: HoleStart,
    pub actions: Vec<HoleAction>,
    /// The hole was scored and archived.
    pub completed: bool,
}

impl HoleLog {
    pub(crate) fn from_hole(hole: &HoleState, completed: bool) -> Self {
        Self {
            number: hole.number,
            start: hole.start,
            actions: hole.actions.clone(),
            completed,
        }
    }
}

/// The open hole plus its wager breakdown.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoleView {
    pub hole: HoleState,
    pub wager: WagerSummary,
}

impl HoleView {
    pub fn from_hole(hole: &HoleState) -> Self {
        Self {
            hole: hole.clone(),
            wager: hole.betting.summary(),
        }
    }
}

/// Read-only picture of a session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionView {
    pub players: Vec<Player>,
    pub phase: Phase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_chooser: Option<PlayerId>,
    /// The open hole, or the next one to start.
    pub hole_number: u8,
    pub holes_completed: u8,
    pub current_hole: Option<HoleView>,
    pub carry_over: Option<CarryOver>,
    pub history: Vec<HoleSummary>,
}

impl SessionView {
    /// Players from most ahead to furthest behind; seat order breaks ties.
    pub fn leaderboard(&self) -> Vec<&Player> {
        let mut ranked: Vec<&Player> = self.players.iter().collect();
        ranked.sort_by(|a, b| b.points.cmp(&a.points).then(a.id.cmp(&b.id)));
        ranked
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub version: u32,
    pub rules: GameRules,
    pub course: Course,
    pub players: Vec<PlayerSpec>,
    pub log: Vec<HoleLog>,
    pub view: SessionView,
}

impl SessionSnapshot {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

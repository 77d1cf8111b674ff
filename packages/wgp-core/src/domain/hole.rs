//! Single-hole state and the closed set of actions a caller can take on it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::betting::BettingState;
use crate::domain::phase::Phase;
use crate::domain::points::Wager;
use crate::domain::roster::{PlayerId, Roster};
use crate::domain::scoring::{HoleOutcome, PointDeltas};
use crate::domain::strokes::net_score;
use crate::domain::teams::{Formation, TeamId};
use crate::errors::domain::{GameError, RuleKind, ValidationKind};

pub const MAX_SHOTS: u8 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lie {
    Tee,
    Fairway,
    Rough,
    Bunker,
    Hazard,
    Green,
    Holed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BallProgress {
    pub shots: u8,
    /// Yards to the hole after the last shot; `None` before the tee shot.
    pub distance_remaining: Option<u32>,
    pub lie: Lie,
}

impl Default for BallProgress {
    fn default() -> Self {
        Self {
            shots: 0,
            distance_remaining: None,
            lie: Lie::Tee,
        }
    }
}

impl BallProgress {
    pub fn is_holed(&self) -> bool {
        self.lie == Lie::Holed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HoleStatus {
    Open,
    Completed,
    Conceded,
}

/// Caller input when opening a hole.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoleStart {
    /// Late phase only: where the trailing player slots into the hitting order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hitting_position: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BettingAction {
    Double { by: PlayerId },
    OfferDouble { by: PlayerId },
    RespondDouble { by: PlayerId, accept: bool },
    Float { by: PlayerId },
    ApplyOption { captain: PlayerId },
    DisableOption { captain: PlayerId },
    SoloMultiplier { player: PlayerId },
    FixedValue { by: PlayerId, value: Wager },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum HoleAction {
    RecordShot {
        player: PlayerId,
        distance_remaining: u32,
        lie: Lie,
    },
    RequestPartnership {
        captain: PlayerId,
        candidate: PlayerId,
    },
    RespondPartnership {
        candidate: PlayerId,
        accept: bool,
    },
    WithdrawPartnership {
        captain: PlayerId,
    },
    GoSolo {
        captain: PlayerId,
    },
    AardvarkRequestJoin {
        aardvark: PlayerId,
        team: TeamId,
    },
    AardvarkRespond {
        aardvark: PlayerId,
        by: PlayerId,
        accept: bool,
    },
    AardvarkGoSolo {
        aardvark: PlayerId,
    },
    Betting(BettingAction),
    Concede {
        by: PlayerId,
    },
    EnterScores {
        scores: Vec<GrossScore>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrossScore {
    pub player: PlayerId,
    pub gross: u8,
}

impl GrossScore {
    pub fn new(player: PlayerId, gross: u8) -> Self {
        Self { player, gross }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoleState {
    pub number: u8,
    pub par: u8,
    pub stroke_index: u8,
    pub phase: Phase,
    /// Trailing player who chose the hitting position (late phase only).
    pub order_chooser: Option<PlayerId>,
    pub start: HoleStart,
    pub formation: Formation,
    pub betting: BettingState,
    pub balls: BTreeMap<PlayerId, BallProgress>,
    pub gross_scores: Option<BTreeMap<PlayerId, u8>>,
    pub net_scores: Option<BTreeMap<PlayerId, i16>>,
    pub conceded_by: Option<TeamId>,
    pub status: HoleStatus,
    pub outcome: Option<HoleOutcome>,
    pub deltas: Option<PointDeltas>,
    /// Accepted actions in order; replaying them rebuilds this hole.
    pub actions: Vec<HoleAction>,
}

impl HoleState {
    pub fn captain(&self) -> PlayerId {
        self.formation.captain
    }

    pub fn hitting_order(&self) -> &[PlayerId] {
        &self.formation.order
    }

    pub fn has_shot(&self, player: PlayerId) -> bool {
        self.balls.get(&player).is_some_and(|b| b.shots > 0)
    }

    pub fn require_open(&self) -> Result<(), GameError> {
        if self.status != HoleStatus::Open {
            return Err(GameError::rule(
                RuleKind::HoleNotOpen,
                format!("hole {} is {:?}", self.number, self.status),
            ));
        }
        Ok(())
    }

    pub fn require_teams(&self) -> Result<(), GameError> {
        if !self.formation.teams.is_formed() {
            return Err(GameError::rule(
                RuleKind::TeamsNotFormed,
                format!("teams are not formed on hole {}", self.number),
            ));
        }
        Ok(())
    }

    /// Side the player is on, failing if they have not been placed yet.
    pub fn require_side(&self, player: PlayerId) -> Result<TeamId, GameError> {
        self.require_teams()?;
        self.formation.teams.side_of(player).ok_or_else(|| {
            GameError::rule(
                RuleKind::Aardvark,
                format!("player {player} is not on a side yet"),
            )
        })
    }

    pub fn record_shot(
        &mut self,
        player: PlayerId,
        distance_remaining: u32,
        lie: Lie,
    ) -> Result<bool, GameError> {
        self.require_open()?;
        if lie == Lie::Holed && distance_remaining != 0 {
            return Err(GameError::validation(
                ValidationKind::Shot,
                "a holed ball has no distance remaining",
            ));
        }
        if lie == Lie::Tee {
            return Err(GameError::validation(
                ValidationKind::Shot,
                "a ball cannot come to rest on the tee",
            ));
        }
        let ball = self.balls.get_mut(&player).ok_or_else(|| {
            GameError::consistency(format!("no ball record for player {player}"))
        })?;
        if ball.is_holed() {
            return Err(GameError::rule(
                RuleKind::BallHoled,
                format!("player {player} has already holed out"),
            ));
        }
        if ball.shots >= MAX_SHOTS {
            return Err(GameError::validation(
                ValidationKind::Shot,
                format!("player {player} has reached {MAX_SHOTS} shots"),
            ));
        }
        ball.shots += 1;
        ball.distance_remaining = Some(distance_remaining);
        ball.lie = lie;
        Ok(lie == Lie::Holed)
    }

    /// Validate gross scores and derive net scores for every participant.
    /// A hole takes one card; corrections go through `GameSession::edit_hole`.
    pub fn enter_scores(
        &mut self,
        scores: &[GrossScore],
        roster: &Roster,
        max_gross: u8,
    ) -> Result<(), GameError> {
        self.require_open()?;
        self.require_teams()?;
        if self.gross_scores.is_some() {
            return Err(GameError::rule(
                RuleKind::ScoresAlreadyEntered,
                format!(
                    "hole {} already has scores; edit the hole to correct them",
                    self.number
                ),
            ));
        }
        let mut gross = BTreeMap::new();
        for entry in scores {
            if gross.insert(entry.player, entry.gross).is_some() {
                return Err(GameError::validation(
                    ValidationKind::Score,
                    format!("player {} has more than one gross score", entry.player),
                ));
            }
        }
        let mut net = BTreeMap::new();
        for &player in self.hitting_order() {
            let score = *gross.get(&player).ok_or_else(|| {
                GameError::validation(
                    ValidationKind::Score,
                    format!("missing gross score for player {player}"),
                )
            })?;
            if score == 0 || score > max_gross {
                return Err(GameError::validation(
                    ValidationKind::Score,
                    format!("gross score {score} for player {player} outside 1..={max_gross}"),
                ));
            }
            let handicap = roster.require(player)?.handicap;
            net.insert(player, net_score(score, handicap, self.stroke_index)?);
        }
        if let Some(extra) = gross.keys().find(|p| !self.hitting_order().contains(p)) {
            return Err(GameError::validation(
                ValidationKind::UnknownPlayer,
                format!("score given for player {extra} who is not playing this hole"),
            ));
        }
        self.gross_scores = Some(gross);
        self.net_scores = Some(net);
        Ok(())
    }

    /// Outcome from concession or best net score per side.
    pub fn decide_outcome(&self) -> Result<HoleOutcome, GameError> {
        if let Some(conceding) = self.conceded_by {
            return Ok(HoleOutcome::Won {
                winner: conceding.other(),
                by_concession: true,
            });
        }
        let net = self.net_scores.as_ref().ok_or_else(|| {
            GameError::rule(
                RuleKind::ScoresRequired,
                format!("hole {} needs scores or a concession", self.number),
            )
        })?;
        let (team1, team2) = self
            .formation
            .teams
            .sides()
            .ok_or_else(|| GameError::consistency("scored hole has no teams"))?;
        let best = |side: &[PlayerId]| -> Result<i16, GameError> {
            side.iter()
                .map(|p| {
                    net.get(p).copied().ok_or_else(|| {
                        GameError::consistency(format!("no net score for player {p}"))
                    })
                })
                .try_fold(i16::MAX, |acc, s| s.map(|s| acc.min(s)))
        };
        let (b1, b2) = (best(&team1)?, best(&team2)?);
        Ok(match b1.cmp(&b2) {
            std::cmp::Ordering::Less => HoleOutcome::Won {
                winner: TeamId::Team1,
                by_concession: false,
            },
            std::cmp::Ordering::Greater => HoleOutcome::Won {
                winner: TeamId::Team2,
                by_concession: false,
            },
            std::cmp::Ordering::Equal => HoleOutcome::Halved,
        })
    }
}

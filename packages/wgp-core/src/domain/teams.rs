//! Per-hole team formation.
//!
//! `Pending` moves to exactly one formed shape (`Partners`, `Solo` or
//! `AardvarkSolo`) and never back. A partnership request parks an offer
//! between request and answer; a declined candidate cannot be asked again on
//! the same hole. In 5 and 6 player games the last hitters are aardvarks and
//! resolve their own side once the Captain has formed teams.

use serde::{Deserialize, Serialize};

use crate::domain::roster::PlayerId;
use crate::errors::domain::{GameError, RuleKind};

/// Hitters after the first four are aardvarks.
pub const CORE_PLAYERS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamId {
    /// The Captain's side (or the lone soloist).
    Team1,
    Team2,
}

impl TeamId {
    pub fn other(self) -> TeamId {
        match self {
            TeamId::Team1 => TeamId::Team2,
            TeamId::Team2 => TeamId::Team1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum Teams {
    Pending,
    Partners {
        team1: Vec<PlayerId>,
        team2: Vec<PlayerId>,
    },
    Solo {
        captain: PlayerId,
        opponents: Vec<PlayerId>,
    },
    AardvarkSolo {
        aardvark: PlayerId,
        opponents: Vec<PlayerId>,
    },
}

impl Teams {
    pub fn is_formed(&self) -> bool {
        !matches!(self, Teams::Pending)
    }

    /// `(team1, team2)`; the soloist is always team1.
    pub fn sides(&self) -> Option<(Vec<PlayerId>, Vec<PlayerId>)> {
        match self {
            Teams::Pending => None,
            Teams::Partners { team1, team2 } => Some((team1.clone(), team2.clone())),
            Teams::Solo { captain, opponents } => Some((vec![*captain], opponents.clone())),
            Teams::AardvarkSolo {
                aardvark,
                opponents,
            } => Some((vec![*aardvark], opponents.clone())),
        }
    }

    pub fn side_of(&self, player: PlayerId) -> Option<TeamId> {
        let (team1, team2) = self.sides()?;
        if team1.contains(&player) {
            Some(TeamId::Team1)
        } else if team2.contains(&player) {
            Some(TeamId::Team2)
        } else {
            None
        }
    }

    pub fn members(&self, team: TeamId) -> Vec<PlayerId> {
        match (self.sides(), team) {
            (Some((t1, _)), TeamId::Team1) => t1,
            (Some((_, t2)), TeamId::Team2) => t2,
            (None, _) => Vec::new(),
        }
    }

    /// The player standing alone against everyone, if any.
    pub fn lone_player(&self) -> Option<PlayerId> {
        match self {
            Teams::Solo { captain, .. } => Some(*captain),
            Teams::AardvarkSolo { aardvark, .. } => Some(*aardvark),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartnershipOffer {
    pub captain: PlayerId,
    pub candidate: PlayerId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AardvarkStatus {
    Unresolved,
    Requested { team: TeamId },
    Joined { team: TeamId },
    /// Rejected by `requested`, so placed on the other side.
    Tossed { requested: TeamId },
    Solo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AardvarkSeat {
    pub player: PlayerId,
    pub status: AardvarkStatus,
}

/// What a successful formation step changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormationEvent {
    OfferMade { candidate: PlayerId },
    OfferWithdrawn { candidate: PlayerId },
    PartnershipAccepted { partner: PlayerId },
    PartnershipDeclined { candidate: PlayerId },
    WentSolo { player: PlayerId },
    AardvarkRequested { aardvark: PlayerId, team: TeamId },
    AardvarkJoined { aardvark: PlayerId, team: TeamId },
    AardvarkTossed { aardvark: PlayerId, by_team: TeamId },
}

impl FormationEvent {
    /// True when this step moved the hole out of `Pending`.
    pub fn formed_teams(&self) -> bool {
        matches!(
            self,
            FormationEvent::PartnershipAccepted { .. } | FormationEvent::WentSolo { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Formation {
    pub captain: PlayerId,
    /// Hitting order for the hole.
    pub order: Vec<PlayerId>,
    pub teams: Teams,
    pub offer: Option<PartnershipOffer>,
    pub declined: Vec<PlayerId>,
    pub aardvarks: Vec<AardvarkSeat>,
}

impl Formation {
    pub fn new(order: Vec<PlayerId>) -> Result<Self, GameError> {
        let captain = *order
            .first()
            .ok_or_else(|| GameError::consistency("hitting order is empty; no Captain"))?;
        let aardvarks = order
            .iter()
            .skip(CORE_PLAYERS)
            .map(|&player| AardvarkSeat {
                player,
                status: AardvarkStatus::Unresolved,
            })
            .collect();
        Ok(Self {
            captain,
            order,
            teams: Teams::Pending,
            offer: None,
            declined: Vec::new(),
            aardvarks,
        })
    }

    pub fn is_aardvark(&self, player: PlayerId) -> bool {
        self.aardvarks.iter().any(|a| a.player == player)
    }

    pub fn aardvark_status(&self, player: PlayerId) -> Option<AardvarkStatus> {
        self.aardvarks
            .iter()
            .find(|a| a.player == player)
            .map(|a| a.status)
    }

    fn core_players(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.order.iter().copied().take(CORE_PLAYERS)
    }

    fn others(&self, excluded: &[PlayerId]) -> Vec<PlayerId> {
        self.order
            .iter()
            .copied()
            .filter(|p| !excluded.contains(p))
            .collect()
    }

    fn require_pending(&self) -> Result<(), GameError> {
        if self.teams.is_formed() {
            return Err(GameError::rule(
                RuleKind::TeamsAlreadyFormed,
                "teams are already set for this hole",
            ));
        }
        Ok(())
    }

    fn require_no_offer(&self) -> Result<(), GameError> {
        if let Some(offer) = self.offer {
            return Err(GameError::rule(
                RuleKind::OfferPending,
                format!(
                    "partnership offer to player {} is still outstanding",
                    offer.candidate
                ),
            ));
        }
        Ok(())
    }

    fn require_captain(&self, player: PlayerId) -> Result<(), GameError> {
        if player != self.captain {
            return Err(GameError::rule(
                RuleKind::NotCaptain,
                format!("player {player} is not the Captain (player {})", self.captain),
            ));
        }
        Ok(())
    }

    pub fn request_partnership(
        &mut self,
        captain: PlayerId,
        candidate: PlayerId,
        has_shot: impl Fn(PlayerId) -> bool,
    ) -> Result<FormationEvent, GameError> {
        self.require_pending()?;
        self.require_no_offer()?;
        self.require_captain(captain)?;
        if candidate == captain {
            return Err(GameError::rule(
                RuleKind::SelfPartnership,
                "the Captain cannot partner with themselves",
            ));
        }
        if !self.core_players().any(|p| p == candidate) {
            return Err(GameError::rule(
                RuleKind::IneligibleCandidate,
                format!("player {candidate} cannot be asked to partner this hole"),
            ));
        }
        if self.declined.contains(&candidate) {
            return Err(GameError::rule(
                RuleKind::IneligibleCandidate,
                format!("player {candidate} already declined this hole"),
            ));
        }
        for who in [captain, candidate] {
            if !has_shot(who) {
                return Err(GameError::rule(
                    RuleKind::ShotRequired,
                    format!("player {who} has not hit yet"),
                ));
            }
        }
        self.offer = Some(PartnershipOffer { captain, candidate });
        Ok(FormationEvent::OfferMade { candidate })
    }

    pub fn respond_partnership(
        &mut self,
        candidate: PlayerId,
        accept: bool,
    ) -> Result<FormationEvent, GameError> {
        self.require_pending()?;
        let offer = self.offer.ok_or_else(|| {
            GameError::rule(RuleKind::NoOfferPending, "no partnership offer is outstanding")
        })?;
        if offer.candidate != candidate {
            return Err(GameError::rule(
                RuleKind::IneligibleCandidate,
                format!(
                    "the outstanding offer is to player {}, not player {candidate}",
                    offer.candidate
                ),
            ));
        }
        self.offer = None;
        if !accept {
            self.declined.push(candidate);
            return Ok(FormationEvent::PartnershipDeclined { candidate });
        }
        let team1 = vec![offer.captain, offer.candidate];
        let team2 = self
            .core_players()
            .filter(|p| !team1.contains(p))
            .collect();
        self.teams = Teams::Partners { team1, team2 };
        Ok(FormationEvent::PartnershipAccepted { partner: candidate })
    }

    /// Return an unanswered offer to `Pending`. The candidate stays eligible.
    pub fn withdraw_offer(&mut self, captain: PlayerId) -> Result<FormationEvent, GameError> {
        self.require_captain(captain)?;
        let offer = self.offer.take().ok_or_else(|| {
            GameError::rule(RuleKind::NoOfferPending, "no partnership offer is outstanding")
        })?;
        Ok(FormationEvent::OfferWithdrawn {
            candidate: offer.candidate,
        })
    }

    pub fn go_solo(&mut self, captain: PlayerId) -> Result<FormationEvent, GameError> {
        self.require_pending()?;
        self.require_no_offer()?;
        self.require_captain(captain)?;
        let opponents = self.others(&[captain]);
        for seat in &mut self.aardvarks {
            seat.status = AardvarkStatus::Joined {
                team: TeamId::Team2,
            };
        }
        self.teams = Teams::Solo { captain, opponents };
        Ok(FormationEvent::WentSolo { player: captain })
    }

    pub fn aardvark_go_solo(&mut self, aardvark: PlayerId) -> Result<FormationEvent, GameError> {
        self.require_pending()?;
        self.require_no_offer()?;
        if !self.is_aardvark(aardvark) {
            return Err(not_aardvark(aardvark));
        }
        let opponents = self.others(&[aardvark]);
        for seat in &mut self.aardvarks {
            seat.status = if seat.player == aardvark {
                AardvarkStatus::Solo
            } else {
                AardvarkStatus::Joined {
                    team: TeamId::Team2,
                }
            };
        }
        self.teams = Teams::AardvarkSolo {
            aardvark,
            opponents,
        };
        Ok(FormationEvent::WentSolo { player: aardvark })
    }

    pub fn aardvark_request_join(
        &mut self,
        aardvark: PlayerId,
        team: TeamId,
    ) -> Result<FormationEvent, GameError> {
        self.require_partners()?;
        let seat = self.seat_mut(aardvark)?;
        if seat.status != AardvarkStatus::Unresolved {
            return Err(GameError::rule(
                RuleKind::Aardvark,
                format!("aardvark {aardvark} has already chosen a side"),
            ));
        }
        seat.status = AardvarkStatus::Requested { team };
        Ok(FormationEvent::AardvarkRequested { aardvark, team })
    }

    /// A member of the requested team accepts or tosses the aardvark.
    pub fn aardvark_respond(
        &mut self,
        aardvark: PlayerId,
        by: PlayerId,
        accept: bool,
    ) -> Result<FormationEvent, GameError> {
        self.require_partners()?;
        let status = self.aardvark_status(aardvark).ok_or_else(|| not_aardvark(aardvark))?;
        let AardvarkStatus::Requested { team } = status else {
            return Err(GameError::rule(
                RuleKind::Aardvark,
                format!("aardvark {aardvark} has no outstanding join request"),
            ));
        };
        if self.teams.side_of(by) != Some(team) {
            return Err(GameError::rule(
                RuleKind::Aardvark,
                format!("player {by} is not on the team aardvark {aardvark} asked to join"),
            ));
        }
        let (joined, event, status) = if accept {
            (
                team,
                FormationEvent::AardvarkJoined { aardvark, team },
                AardvarkStatus::Joined { team },
            )
        } else {
            (
                team.other(),
                FormationEvent::AardvarkTossed {
                    aardvark,
                    by_team: team,
                },
                AardvarkStatus::Tossed { requested: team },
            )
        };
        self.place_aardvark(aardvark, joined)?;
        self.seat_mut(aardvark)?.status = status;
        Ok(event)
    }

    /// The window closed before the Captain chose: any open request lapses
    /// and the Captain plays alone. `None` when teams were already set.
    pub fn default_captain_solo(&mut self) -> Result<Option<FormationEvent>, GameError> {
        if self.teams.is_formed() {
            return Ok(None);
        }
        self.offer = None;
        self.go_solo(self.captain).map(Some)
    }

    /// Place every still-undecided aardvark against the Captain. Called when
    /// wagering closes; returns who was placed.
    pub fn resolve_unplaced_aardvarks(&mut self) -> Result<Vec<PlayerId>, GameError> {
        if !matches!(self.teams, Teams::Partners { .. }) {
            return Ok(Vec::new());
        }
        let unplaced: Vec<PlayerId> = self
            .aardvarks
            .iter()
            .filter(|a| {
                matches!(
                    a.status,
                    AardvarkStatus::Unresolved | AardvarkStatus::Requested { .. }
                )
            })
            .map(|a| a.player)
            .collect();
        for &aardvark in &unplaced {
            self.place_aardvark(aardvark, TeamId::Team2)?;
            self.seat_mut(aardvark)?.status = AardvarkStatus::Joined {
                team: TeamId::Team2,
            };
        }
        Ok(unplaced)
    }

    /// True when every participant sits on a side.
    pub fn all_placed(&self) -> bool {
        self.teams.is_formed() && self.order.iter().all(|p| self.teams.side_of(*p).is_some())
    }

    fn require_partners(&self) -> Result<(), GameError> {
        match self.teams {
            Teams::Partners { .. } => Ok(()),
            Teams::Pending => Err(GameError::rule(
                RuleKind::TeamsNotFormed,
                "aardvarks choose a side after the Captain forms teams",
            )),
            _ => Err(GameError::rule(
                RuleKind::Aardvark,
                "no partnership to join: a soloist is playing everyone",
            )),
        }
    }

    fn seat_mut(&mut self, aardvark: PlayerId) -> Result<&mut AardvarkSeat, GameError> {
        self.aardvarks
            .iter_mut()
            .find(|a| a.player == aardvark)
            .ok_or_else(|| not_aardvark(aardvark))
    }

    fn place_aardvark(&mut self, aardvark: PlayerId, team: TeamId) -> Result<(), GameError> {
        let Teams::Partners { team1, team2 } = &mut self.teams else {
            return Err(GameError::consistency(
                "aardvark placement requires a partnership",
            ));
        };
        if team1.contains(&aardvark) || team2.contains(&aardvark) {
            return Err(GameError::consistency(format!(
                "aardvark {aardvark} is already on a side"
            )));
        }
        match team {
            TeamId::Team1 => team1.push(aardvark),
            TeamId::Team2 => team2.push(aardvark),
        }
        Ok(())
    }
}

fn not_aardvark(player: PlayerId) -> GameError {
    GameError::rule(
        RuleKind::Aardvark,
        format!("player {player} is not an aardvark this hole"),
    )
}

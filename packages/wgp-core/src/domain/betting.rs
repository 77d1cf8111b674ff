//! Per-hole wager escalation.
//!
//! Every rule that touched the wager is kept as an `InvokedRule` record, in
//! order, and every legality check reads that list. `current_wager` only ever
//! grows inside a hole; the next hole starts again from its own base.

use serde::{Deserialize, Serialize};

use crate::config::game_rules::GameRules;
use crate::domain::phase::Phase;
use crate::domain::points::Wager;
use crate::domain::roster::PlayerId;
use crate::domain::teams::TeamId;
use crate::errors::domain::{GameError, RuleKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoloVariant {
    /// Captain alone ("Duncan").
    Duncan,
    /// Aardvark alone ("Tunkarri").
    Tunkarri,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CloseReason {
    BallHoled,
    Conceded,
    ScoresEntered,
    DoubleDeclined,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum InvokedRule {
    CarryOverApplied { from_hole: u8 },
    OptionOffered { captain: PlayerId },
    OptionApplied { captain: PlayerId },
    OptionDisabled { captain: PlayerId },
    FixedValue { by: PlayerId, value: Wager },
    Float { by: PlayerId },
    SoloMultiplier { player: PlayerId, variant: SoloVariant },
    Double { by: PlayerId, side: TeamId },
    DoubleOffered { by: PlayerId, side: TeamId },
    DoubleAccepted { by: PlayerId, side: TeamId },
    DoubleDeclined { by: PlayerId, side: TeamId },
    AardvarkTossed { aardvark: PlayerId, by_team: TeamId },
    WageringClosed { reason: CloseReason },
}

/// A halved hole's pending carry into the next hole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarryOver {
    pub from_hole: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionState {
    Unavailable,
    Available,
    Applied,
    Disabled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoubleOffer {
    pub by: PlayerId,
    pub side: TeamId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BettingState {
    pub base_wager: Wager,
    pub current_wager: Wager,
    pub rules: Vec<InvokedRule>,
}

/// Derived view of the betting state for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WagerSummary {
    pub base_wager: Wager,
    pub current_wager: Wager,
    pub double_count: u32,
    /// Times the doubling initiative switched sides ("ping-pong").
    pub oscillations: u32,
    pub option: OptionState,
    pub solo_multiplier: Option<SoloVariant>,
    pub fixed_value: Option<Wager>,
    pub carry_over_from: Option<u8>,
    pub pending_double: Option<DoubleOffer>,
    pub closed: bool,
}

/// Called when a hole finishes: a halved hole carries into the next one.
pub fn mark_carry_over(hole_number: u8, halved: bool, rules: &GameRules) -> Option<CarryOver> {
    (halved && rules.carry_over_enabled).then_some(CarryOver {
        from_hole: hole_number,
    })
}

impl BettingState {
    /// Open a hole's betting at the phase-adjusted base.
    pub fn open(base_wager: Wager) -> Self {
        Self {
            base_wager,
            current_wager: base_wager,
            rules: Vec::new(),
        }
    }

    // ---- derived queries ------------------------------------------------

    pub fn is_closed(&self) -> bool {
        self.rules
            .iter()
            .any(|r| matches!(r, InvokedRule::WageringClosed { .. }))
    }

    pub fn close_reason(&self) -> Option<CloseReason> {
        self.rules.iter().find_map(|r| match r {
            InvokedRule::WageringClosed { reason } => Some(*reason),
            _ => None,
        })
    }

    pub fn option_state(&self) -> OptionState {
        let mut state = OptionState::Unavailable;
        for rule in &self.rules {
            state = match rule {
                InvokedRule::OptionOffered { .. } => OptionState::Available,
                InvokedRule::OptionApplied { .. } => OptionState::Applied,
                InvokedRule::OptionDisabled { .. } => OptionState::Disabled,
                _ => state,
            };
        }
        state
    }

    pub fn solo_multiplier(&self) -> Option<SoloVariant> {
        self.rules.iter().find_map(|r| match r {
            InvokedRule::SoloMultiplier { variant, .. } => Some(*variant),
            _ => None,
        })
    }

    pub fn fixed_value(&self) -> Option<Wager> {
        self.rules.iter().find_map(|r| match r {
            InvokedRule::FixedValue { value, .. } => Some(*value),
            _ => None,
        })
    }

    pub fn carry_over_from(&self) -> Option<u8> {
        self.rules.iter().find_map(|r| match r {
            InvokedRule::CarryOverApplied { from_hole } => Some(*from_hole),
            _ => None,
        })
    }

    pub fn float_invoked_by(&self) -> Option<PlayerId> {
        self.rules.iter().find_map(|r| match r {
            InvokedRule::Float { by } => Some(*by),
            _ => None,
        })
    }

    pub fn pending_double(&self) -> Option<DoubleOffer> {
        let mut pending = None;
        for rule in &self.rules {
            match rule {
                InvokedRule::DoubleOffered { by, side } => {
                    pending = Some(DoubleOffer {
                        by: *by,
                        side: *side,
                    })
                }
                InvokedRule::DoubleAccepted { .. } | InvokedRule::DoubleDeclined { .. } => {
                    pending = None
                }
                _ => {}
            }
        }
        pending
    }

    pub fn double_count(&self) -> u32 {
        self.rules
            .iter()
            .filter(|r| {
                matches!(
                    r,
                    InvokedRule::Double { .. } | InvokedRule::DoubleAccepted { .. }
                )
            })
            .count() as u32
    }

    pub fn oscillations(&self) -> u32 {
        let mut last: Option<TeamId> = None;
        let mut count = 0;
        for rule in &self.rules {
            let side = match rule {
                InvokedRule::Double { side, .. } | InvokedRule::DoubleOffered { side, .. } => *side,
                _ => continue,
            };
            if last.is_some_and(|prev| prev != side) {
                count += 1;
            }
            last = Some(side);
        }
        count
    }

    pub fn summary(&self) -> WagerSummary {
        WagerSummary {
            base_wager: self.base_wager,
            current_wager: self.current_wager,
            double_count: self.double_count(),
            oscillations: self.oscillations(),
            option: self.option_state(),
            solo_multiplier: self.solo_multiplier(),
            fixed_value: self.fixed_value(),
            carry_over_from: self.carry_over_from(),
            pending_double: self.pending_double(),
            closed: self.is_closed(),
        }
    }

    // ---- guards ----------------------------------------------------------

    fn require_open(&self) -> Result<(), GameError> {
        if self.is_closed() {
            return Err(GameError::rule(
                RuleKind::WageringClosed,
                "wagering is closed for this hole",
            ));
        }
        Ok(())
    }

    fn require_no_pending_double(&self) -> Result<(), GameError> {
        if let Some(offer) = self.pending_double() {
            return Err(GameError::rule(
                RuleKind::DoubleOffer,
                format!("a double offered by player {} awaits an answer", offer.by),
            ));
        }
        Ok(())
    }

    fn doubled(&self) -> Result<Wager, GameError> {
        self.current_wager
            .checked_mul(2)
            .ok_or_else(|| GameError::consistency("wager overflow"))
    }

    // ---- operations --------------------------------------------------------

    /// Apply a pending carry-over once. A second application is rejected.
    pub fn apply_carry_over(&mut self, carry: CarryOver) -> Result<(), GameError> {
        if self.carry_over_from().is_some() {
            return Err(GameError::rule(
                RuleKind::CarryOver,
                "carry-over already applied to this hole",
            ));
        }
        let next = self.doubled()?;
        self.current_wager = next;
        self.rules.push(InvokedRule::CarryOverApplied {
            from_hole: carry.from_hole,
        });
        Ok(())
    }

    pub fn offer_option(&mut self, captain: PlayerId) {
        if self.option_state() == OptionState::Unavailable {
            self.rules.push(InvokedRule::OptionOffered { captain });
        }
    }

    pub fn double(&mut self, by: PlayerId, side: TeamId) -> Result<(), GameError> {
        self.require_open()?;
        self.require_no_pending_double()?;
        let next = self.doubled()?;
        self.current_wager = next;
        self.rules.push(InvokedRule::Double { by, side });
        Ok(())
    }

    pub fn offer_double(&mut self, by: PlayerId, side: TeamId) -> Result<(), GameError> {
        self.require_open()?;
        self.require_no_pending_double()?;
        // Validate the eventual double now so acceptance cannot fail.
        self.doubled()?;
        self.rules.push(InvokedRule::DoubleOffered { by, side });
        Ok(())
    }

    /// Answer a pending double. Returns the offer so the caller can concede
    /// the hole on a decline.
    pub fn respond_double(
        &mut self,
        by: PlayerId,
        side: TeamId,
        accept: bool,
    ) -> Result<DoubleOffer, GameError> {
        self.require_open()?;
        let offer = self.pending_double().ok_or_else(|| {
            GameError::rule(RuleKind::DoubleOffer, "no double offer is outstanding")
        })?;
        if offer.side == side {
            return Err(GameError::rule(
                RuleKind::DoubleOffer,
                "only the opposing side may answer a double",
            ));
        }
        if accept {
            let next = self.doubled()?;
            self.current_wager = next;
            self.rules.push(InvokedRule::DoubleAccepted { by, side });
        } else {
            self.rules.push(InvokedRule::DoubleDeclined { by, side });
            self.close(CloseReason::DoubleDeclined);
        }
        Ok(offer)
    }

    /// The Captain's once-per-game Float. `already_used` is game-wide state.
    pub fn float(
        &mut self,
        by: PlayerId,
        captain: PlayerId,
        already_used: bool,
    ) -> Result<(), GameError> {
        if by != captain {
            return Err(GameError::rule(
                RuleKind::NotCaptain,
                format!("only the Captain may float; player {by} is not Captain"),
            ));
        }
        if already_used || self.float_invoked_by().is_some() {
            return Err(GameError::rule(
                RuleKind::FloatAlreadyUsed,
                format!("player {by} has already used their float"),
            ));
        }
        self.require_open()?;
        let next = self.doubled()?;
        self.current_wager = next;
        self.rules.push(InvokedRule::Float { by });
        Ok(())
    }

    pub fn apply_option(&mut self, captain: PlayerId) -> Result<(), GameError> {
        match self.option_state() {
            OptionState::Available => {}
            state => {
                return Err(GameError::rule(
                    RuleKind::OptionUnavailable,
                    format!("the option cannot be applied ({state:?})"),
                ))
            }
        }
        self.require_open()?;
        let next = self.doubled()?;
        self.current_wager = next;
        self.rules.push(InvokedRule::OptionApplied { captain });
        Ok(())
    }

    pub fn disable_option(&mut self, captain: PlayerId) -> Result<(), GameError> {
        if self.option_state() != OptionState::Available {
            return Err(GameError::rule(
                RuleKind::OptionUnavailable,
                "the option is not available to turn off",
            ));
        }
        self.rules.push(InvokedRule::OptionDisabled { captain });
        Ok(())
    }

    /// Teams just formed: an option nobody turned off now applies itself.
    pub fn on_teams_formed(&mut self, captain: PlayerId) -> Result<bool, GameError> {
        if self.option_state() == OptionState::Available && !self.is_closed() {
            self.apply_option(captain)?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Flag a 3-for-2 solo payout. The caller has already checked that the
    /// player is going solo from `Pending`.
    pub fn invoke_solo_multiplier(
        &mut self,
        player: PlayerId,
        variant: SoloVariant,
    ) -> Result<(), GameError> {
        if self.solo_multiplier().is_some() {
            return Err(GameError::rule(
                RuleKind::SoloMultiplier,
                "a solo multiplier is already in force",
            ));
        }
        self.require_open()?;
        self.rules
            .push(InvokedRule::SoloMultiplier { player, variant });
        Ok(())
    }

    /// Fix the hole's value ("Joe's Special"). Replaces base and current.
    pub fn set_fixed_value(
        &mut self,
        by: PlayerId,
        value: Wager,
        phase: Phase,
        order_chooser: Option<PlayerId>,
        rules: &GameRules,
    ) -> Result<(), GameError> {
        if phase != Phase::LatePhase {
            return Err(GameError::rule(
                RuleKind::FixedValue,
                "a fixed hole value may only be set in the late phase",
            ));
        }
        if order_chooser != Some(by) {
            return Err(GameError::rule(
                RuleKind::FixedValue,
                format!("only the trailing player may fix the value; player {by} may not"),
            ));
        }
        if self.fixed_value().is_some() {
            return Err(GameError::rule(
                RuleKind::FixedValue,
                "the hole value is already fixed",
            ));
        }
        if !rules.is_fixed_value_option(value) {
            return Err(GameError::rule(
                RuleKind::FixedValue,
                format!(
                    "{value} is not one of the allowed values {:?}",
                    rules.fixed_value_options
                ),
            ));
        }
        if value < self.current_wager {
            return Err(GameError::rule(
                RuleKind::FixedValue,
                format!(
                    "fixed value {value} is below the current wager {}",
                    self.current_wager
                ),
            ));
        }
        self.require_open()?;
        self.base_wager = value;
        self.current_wager = value;
        self.rules.push(InvokedRule::FixedValue { by, value });
        Ok(())
    }

    pub fn record_toss(&mut self, aardvark: PlayerId, by_team: TeamId) -> Result<(), GameError> {
        self.require_open()?;
        let next = self.doubled()?;
        self.current_wager = next;
        self.rules
            .push(InvokedRule::AardvarkTossed { aardvark, by_team });
        Ok(())
    }

    pub fn close(&mut self, reason: CloseReason) {
        if !self.is_closed() {
            self.rules.push(InvokedRule::WageringClosed { reason });
        }
    }
}

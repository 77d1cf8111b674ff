//! Game phase derivation.
//!
//! Phase is always recomputed from the hole number, player count and live
//! standings; nothing here is cached on the session.

use serde::{Deserialize, Serialize};

use crate::config::game_rules::GameRules;
use crate::domain::points::Wager;
use crate::domain::roster::{PlayerId, Standings};
use crate::errors::domain::{GameError, RuleKind, ValidationKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Normal,
    /// Base wager doubled ("Vinnie's Variation").
    MidRoundVariant,
    /// Trailing player picks hitting position ("Hoepfinger").
    LatePhase,
    Complete,
}

/// Phase plus, in the late phase, who chooses the hitting position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseInfo {
    pub phase: Phase,
    pub order_chooser: Option<PlayerId>,
}

pub fn phase_for_hole(
    hole_number: u8,
    player_count: usize,
    rules: &GameRules,
) -> Result<Phase, GameError> {
    if hole_number == 0 {
        return Err(GameError::validation(
            ValidationKind::Other("HOLE_NUMBER".into()),
            "hole numbers are 1-based",
        ));
    }
    let windows = rules.windows_for(player_count)?;
    if hole_number > rules.total_holes {
        return Ok(Phase::Complete);
    }
    if hole_number >= windows.late_start {
        return Ok(Phase::LatePhase);
    }
    if windows.mid_round.is_some_and(|r| r.contains(hole_number)) {
        return Ok(Phase::MidRoundVariant);
    }
    Ok(Phase::Normal)
}

pub fn derive_phase(
    hole_number: u8,
    standings: &Standings,
    rules: &GameRules,
) -> Result<PhaseInfo, GameError> {
    let phase = phase_for_hole(hole_number, standings.entries().len(), rules)?;
    let order_chooser = match phase {
        Phase::LatePhase => standings.trailing(),
        _ => None,
    };
    Ok(PhaseInfo {
        phase,
        order_chooser,
    })
}

/// Phase-adjusted starting wager before carry-over.
pub fn base_wager_for(phase: Phase, rules: &GameRules) -> Result<Wager, GameError> {
    match phase {
        Phase::MidRoundVariant => rules
            .base_wager
            .checked_mul(2)
            .ok_or_else(|| GameError::consistency("base wager overflow")),
        _ => Ok(rules.base_wager),
    }
}

/// Hitting order for a hole. In the late phase the trailing player may be
/// moved to `chosen_position`; otherwise the rotation stands.
pub fn hitting_order(
    rotation: &[PlayerId],
    info: &PhaseInfo,
    chosen_position: Option<usize>,
) -> Result<Vec<PlayerId>, GameError> {
    let Some(position) = chosen_position else {
        return Ok(rotation.to_vec());
    };
    let Some(chooser) = info.order_chooser else {
        return Err(GameError::rule(
            RuleKind::HittingOrder,
            "only the trailing player in the late phase may choose a hitting position",
        ));
    };
    if position >= rotation.len() {
        return Err(GameError::validation(
            ValidationKind::Other("HITTING_POSITION".into()),
            format!(
                "hitting position {position} outside 0..{}",
                rotation.len()
            ),
        ));
    }
    let mut order: Vec<PlayerId> = rotation.iter().copied().filter(|p| *p != chooser).collect();
    if order.len() + 1 != rotation.len() {
        return Err(GameError::consistency(format!(
            "trailing player {chooser} missing from rotation"
        )));
    }
    order.insert(position, chooser);
    Ok(order)
}

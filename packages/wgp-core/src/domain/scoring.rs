//! Point distribution for a finished hole.
//!
//! Scoring is a pure function of the formed teams, the final betting state,
//! the outcome, and the standings before the hole. Uneven splits go through
//! [`split_pot`], which always leaves the player furthest behind with the
//! smallest share ("Karl Marx rule").

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::betting::BettingState;
use crate::domain::points::Points;
use crate::domain::roster::{PlayerId, Standings};
use crate::domain::teams::{TeamId, Teams};
use crate::errors::domain::GameError;

pub type PointDeltas = BTreeMap<PlayerId, Points>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum HoleOutcome {
    Won { winner: TeamId, by_concession: bool },
    Halved,
}

/// Split `pot` across `members` in whole units. Leftover units go one at a
/// time to members in standings order, most ahead first, so the trailing
/// player ends up with the smallest share. Works the same for gains and
/// payments: the caller negates for payers.
pub fn split_pot(
    pot: Points,
    members: &[PlayerId],
    standings: &Standings,
) -> Result<BTreeMap<PlayerId, Points>, GameError> {
    if members.is_empty() {
        return Err(GameError::consistency("cannot split a pot across no players"));
    }
    if pot.halves() < 0 {
        return Err(GameError::consistency("pot must be non-negative"));
    }
    let k = members.len() as i64;
    let unit = Points::from_units(1).halves();
    let per_member = (pot.halves() / (unit * k)) * unit;
    let mut remainder = pot.halves() - per_member * k;

    let mut shares = BTreeMap::new();
    for id in standings.rank_desc(members) {
        let chunk = remainder.min(unit);
        remainder -= chunk;
        shares.insert(id, Points::from_halves(per_member + chunk));
    }
    Ok(shares)
}

pub fn score_hole(
    teams: &Teams,
    betting: &BettingState,
    outcome: HoleOutcome,
    standings: &Standings,
) -> Result<PointDeltas, GameError> {
    let (team1, team2) = teams
        .sides()
        .ok_or_else(|| GameError::consistency("cannot score a hole without teams"))?;

    let mut deltas: PointDeltas = team1
        .iter()
        .chain(team2.iter())
        .map(|id| (*id, Points::ZERO))
        .collect();

    let HoleOutcome::Won {
        winner,
        by_concession,
    } = outcome
    else {
        return Ok(deltas);
    };

    let (winners, losers) = match winner {
        TeamId::Team1 => (&team1, &team2),
        TeamId::Team2 => (&team2, &team1),
    };
    let wager = Points::from_wager(betting.current_wager)?;

    match teams.lone_player() {
        Some(solo) => {
            let solo_won = winners.as_slice() == [solo];
            let mut stake = wager;
            if solo_won {
                if betting.solo_multiplier().is_some() {
                    stake = stake.three_for_two()?;
                }
                if by_concession {
                    stake = stake.checked_mul(2)?;
                }
            }
            let opponents = if solo_won { losers } else { winners };
            let total = stake.checked_mul(opponents.len() as i64)?;
            let sign = if solo_won { 1 } else { -1 };
            for id in opponents {
                deltas.insert(*id, stake.checked_mul(-sign)?);
            }
            deltas.insert(solo, total.checked_mul(sign)?);
        }
        None => {
            if winners.len() == losers.len() {
                for id in winners {
                    deltas.insert(*id, wager);
                }
                for id in losers {
                    deltas.insert(*id, wager.checked_neg()?);
                }
            } else {
                let (larger, smaller, larger_won) = if winners.len() > losers.len() {
                    (winners, losers, true)
                } else {
                    (losers, winners, false)
                };
                let pot = wager.checked_mul(larger.len() as i64)?;
                let shares = split_pot(pot, smaller, standings)?;
                let (large_sign, small_sign) = if larger_won { (1, -1) } else { (-1, 1) };
                for id in larger {
                    deltas.insert(*id, wager.checked_mul(large_sign)?);
                }
                for (id, share) in shares {
                    deltas.insert(id, share.checked_mul(small_sign)?);
                }
            }
        }
    }

    let net = Points::checked_sum(deltas.values().copied())?;
    if !net.is_zero() {
        return Err(GameError::consistency(format!(
            "hole deltas do not balance (net {net})"
        )));
    }
    Ok(deltas)
}

use crate::domain::betting::{BettingState, SoloVariant};
use crate::domain::points::Points;
use crate::domain::roster::{PlayerId, Standings};
use crate::domain::scoring::{score_hole, split_pot, HoleOutcome, PointDeltas};
use crate::domain::teams::{TeamId, Teams};
use crate::errors::domain::GameError;

fn level(n: u8) -> Standings {
    Standings::new((0..n).map(|id| (id, Points::ZERO)).collect())
}

fn standings(points: &[(PlayerId, i64)]) -> Standings {
    Standings::new(
        points
            .iter()
            .map(|&(id, units)| (id, Points::from_units(units)))
            .collect(),
    )
}

fn halves(deltas: &PointDeltas) -> Vec<(PlayerId, i64)> {
    deltas.iter().map(|(id, p)| (*id, p.halves())).collect()
}

fn won(winner: TeamId) -> HoleOutcome {
    HoleOutcome::Won {
        winner,
        by_concession: false,
    }
}

fn conceded_to(winner: TeamId) -> HoleOutcome {
    HoleOutcome::Won {
        winner,
        by_concession: true,
    }
}

fn pairs() -> Teams {
    Teams::Partners {
        team1: vec![0, 1],
        team2: vec![2, 3],
    }
}

fn solo_captain() -> Teams {
    Teams::Solo {
        captain: 0,
        opponents: vec![1, 2, 3],
    }
}

#[test]
fn partners_trade_the_wager() {
    let deltas = score_hole(&pairs(), &BettingState::open(1), won(TeamId::Team2), &level(4)).unwrap();
    assert_eq!(halves(&deltas), vec![(0, -2), (1, -2), (2, 2), (3, 2)]);
}

#[test]
fn solo_multiplier_pays_three_for_two() {
    let mut betting = BettingState::open(1);
    betting.invoke_solo_multiplier(0, SoloVariant::Duncan).unwrap();
    let deltas = score_hole(&solo_captain(), &betting, won(TeamId::Team1), &level(4)).unwrap();
    assert_eq!(deltas[&0], Points::from_halves(9));
    for id in 1..4 {
        assert_eq!(deltas[&id], Points::from_halves(-3));
    }
}

#[test]
fn losing_soloist_pays_plain_wager_even_with_multiplier() {
    let mut betting = BettingState::open(2);
    betting.invoke_solo_multiplier(0, SoloVariant::Duncan).unwrap();
    let deltas = score_hole(&solo_captain(), &betting, won(TeamId::Team2), &level(4)).unwrap();
    assert_eq!(deltas[&0], Points::from_units(-6));
    assert_eq!(deltas[&3], Points::from_units(2));
}

#[test]
fn concession_to_lone_victor_pays_double() {
    let deltas = score_hole(
        &solo_captain(),
        &BettingState::open(1),
        conceded_to(TeamId::Team1),
        &level(4),
    )
    .unwrap();
    assert_eq!(deltas[&0], Points::from_units(6));
    assert_eq!(deltas[&1], Points::from_units(-2));
}

#[test]
fn concession_between_pairs_pays_single_wager() {
    let deltas = score_hole(
        &pairs(),
        &BettingState::open(2),
        conceded_to(TeamId::Team1),
        &level(4),
    )
    .unwrap();
    assert_eq!(deltas[&0], Points::from_units(2));
    assert_eq!(deltas[&3], Points::from_units(-2));
}

#[test]
fn halved_hole_moves_nothing_but_lists_everyone() {
    let deltas = score_hole(&pairs(), &BettingState::open(4), HoleOutcome::Halved, &level(4)).unwrap();
    assert_eq!(deltas.len(), 4);
    assert!(deltas.values().all(|p| p.is_zero()));
}

#[test]
fn aardvark_solo_scored_like_captain_solo() {
    let teams = Teams::AardvarkSolo {
        aardvark: 4,
        opponents: vec![0, 1, 2, 3],
    };
    let mut betting = BettingState::open(2);
    betting.invoke_solo_multiplier(4, SoloVariant::Tunkarri).unwrap();
    let deltas = score_hole(&teams, &betting, won(TeamId::Team1), &level(5)).unwrap();
    assert_eq!(deltas[&4], Points::from_units(12));
    assert_eq!(deltas[&0], Points::from_units(-3));
}

#[test]
fn trailing_player_receives_the_smaller_share() {
    let st = standings(&[(0, 5), (1, -2)]);
    let shares = split_pot(Points::from_units(3), &[0, 1], &st).unwrap();
    assert_eq!(shares[&0], Points::from_units(2));
    assert_eq!(shares[&1], Points::from_units(1));
}

#[test]
fn even_pot_splits_evenly() {
    let st = standings(&[(0, 5), (1, -2)]);
    let shares = split_pot(Points::from_units(4), &[0, 1], &st).unwrap();
    assert_eq!(shares[&0], shares[&1]);
}

#[test]
fn split_needs_members() {
    assert!(matches!(
        split_pot(Points::from_units(1), &[], &level(4)),
        Err(GameError::Consistency(_))
    ));
}

#[test]
fn uneven_sides_split_pot_across_smaller_side() {
    // 5 players: a pair against three (aardvark joined team2).
    let teams = Teams::Partners {
        team1: vec![0, 1],
        team2: vec![2, 3, 4],
    };
    let st = standings(&[(0, -4), (1, 3), (2, 0), (3, 0), (4, 1)]);

    // The pair loses 3 units between them; the trailing player 0 pays less.
    let deltas = score_hole(&teams, &BettingState::open(1), won(TeamId::Team2), &st).unwrap();
    assert_eq!(deltas[&1], Points::from_units(-2));
    assert_eq!(deltas[&0], Points::from_units(-1));
    for id in 2..5 {
        assert_eq!(deltas[&id], Points::from_units(1));
    }

    // The pair wins 3 units between them; the trailing player 0 receives less.
    let deltas = score_hole(&teams, &BettingState::open(1), won(TeamId::Team1), &st).unwrap();
    assert_eq!(deltas[&1], Points::from_units(2));
    assert_eq!(deltas[&0], Points::from_units(1));
}

#[test]
fn scoring_is_idempotent() {
    let teams = Teams::Partners {
        team1: vec![0, 1],
        team2: vec![2, 3, 4],
    };
    let st = standings(&[(0, 2), (1, 2), (2, -1), (3, 0), (4, 0)]);
    let mut betting = BettingState::open(1);
    betting.double(2, TeamId::Team2).unwrap();
    let first = score_hole(&teams, &betting, won(TeamId::Team2), &st).unwrap();
    let second = score_hole(&teams, &betting, won(TeamId::Team2), &st).unwrap();
    assert_eq!(first, second);
    assert!(Points::checked_sum(first.values().copied()).unwrap().is_zero());
}

#[test]
fn pending_teams_cannot_be_scored() {
    assert!(matches!(
        score_hole(&Teams::Pending, &BettingState::open(1), HoleOutcome::Halved, &level(4)),
        Err(GameError::Consistency(_))
    ));
}

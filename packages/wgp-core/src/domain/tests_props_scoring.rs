//! Property tests for point distribution.
//!
//! Contract:
//! - every hole is zero-sum
//! - scoring is a pure function of its inputs
//! - uneven pots split in whole units, never favouring the player furthest behind

use proptest::prelude::*;

use crate::domain::betting::BettingState;
use crate::domain::points::Points;
use crate::domain::roster::PlayerId;
use crate::domain::scoring::{score_hole, split_pot, HoleOutcome};
use crate::domain::teams::{TeamId, Teams};
use crate::domain::test_gens;
use crate::domain::test_prelude;

fn outcome() -> impl Strategy<Value = HoleOutcome> {
    prop_oneof![
        Just(HoleOutcome::Halved),
        (test_gens::team(), any::<bool>()).prop_map(|(winner, by_concession)| {
            HoleOutcome::Won {
                winner,
                by_concession,
            }
        }),
    ]
}

/// Random split of players `0..n` into two non-empty sides.
fn partner_sides(n: u8) -> impl Strategy<Value = Teams> {
    prop::collection::vec(any::<bool>(), n as usize)
        .prop_filter("both sides need a player", |mask| {
            mask.iter().any(|b| *b) && mask.iter().any(|b| !*b)
        })
        .prop_map(|mask| {
            let (team1, team2): (Vec<PlayerId>, Vec<PlayerId>) =
                (0..mask.len() as PlayerId).partition(|p| mask[*p as usize]);
            Teams::Partners { team1, team2 }
        })
}

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    #[test]
    fn prop_split_is_whole_units_and_sums_to_pot(
        pot_units in 0i64..50,
        standings in test_gens::standings(6),
        k in 1usize..=4,
    ) {
        let members: Vec<PlayerId> = (0..k as PlayerId).collect();
        let pot = Points::from_units(pot_units);
        let shares = split_pot(pot, &members, &standings).unwrap();

        prop_assert_eq!(shares.len(), k);
        prop_assert_eq!(Points::checked_sum(shares.values().copied()).unwrap(), pot);
        let min = shares.values().min().unwrap().halves();
        let max = shares.values().max().unwrap().halves();
        prop_assert!(max - min <= 2, "shares differ by more than a unit");
        prop_assert!(shares.values().all(|s| s.halves() % 2 == 0));
    }

    #[test]
    fn prop_trailing_member_never_gets_more(
        pot_units in 1i64..50,
        standings in test_gens::standings(4),
    ) {
        let members: Vec<PlayerId> = vec![0, 1, 2, 3];
        let shares = split_pot(Points::from_units(pot_units), &members, &standings).unwrap();
        let trailing = standings.trailing().unwrap();
        for id in &members {
            prop_assert!(shares[&trailing] <= shares[id]);
        }
    }

    #[test]
    fn prop_partner_holes_are_zero_sum_and_pure(
        teams in partner_sides(6),
        wager in 1u64..64,
        outcome in outcome(),
        standings in test_gens::standings(6),
    ) {
        let betting = BettingState::open(wager);
        let first = score_hole(&teams, &betting, outcome, &standings).unwrap();
        let second = score_hole(&teams, &betting, outcome, &standings).unwrap();
        prop_assert_eq!(&first, &second);
        prop_assert!(Points::checked_sum(first.values().copied()).unwrap().is_zero());
        prop_assert_eq!(first.len(), 6);
    }

    #[test]
    fn prop_solo_holes_are_zero_sum(
        opponents in 3u8..=5,
        wager in 1u64..64,
        outcome in outcome(),
        multiplier in any::<bool>(),
    ) {
        let teams = Teams::Solo {
            captain: 0,
            opponents: (1..=opponents).collect(),
        };
        let mut betting = BettingState::open(wager);
        if multiplier {
            betting
                .invoke_solo_multiplier(0, crate::domain::betting::SoloVariant::Duncan)
                .unwrap();
        }
        let standings = crate::domain::roster::Standings::new(
            (0..=opponents).map(|id| (id, Points::ZERO)).collect(),
        );
        let deltas = score_hole(&teams, &betting, outcome, &standings).unwrap();
        prop_assert!(Points::checked_sum(deltas.values().copied()).unwrap().is_zero());
        if let HoleOutcome::Won { winner: TeamId::Team1, .. } = outcome {
            prop_assert!(deltas[&0] > Points::ZERO);
        }
    }

    /// Property: reconstruct(serialize(s)) == s for any reachable session.
    #[test]
    fn prop_snapshot_round_trip(s in test_gens::session_after(4)) {
        let snapshot = s.serialize().unwrap();
        let json = snapshot.to_json().unwrap();
        let parsed = crate::domain::snapshot::SessionSnapshot::from_json(&json).unwrap();
        let rebuilt = crate::domain::session::GameSession::reconstruct(&parsed).unwrap();
        prop_assert_eq!(&rebuilt, &s);
    }
}

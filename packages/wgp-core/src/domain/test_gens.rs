// Proptest generators for domain types.
// Player ids are drawn from a slightly wider range than the roster so that
// unknown-player handling is exercised too.

use proptest::prelude::*;

use crate::domain::hole::{BettingAction, GrossScore, HoleAction, HoleStart, Lie};
use crate::domain::points::Points;
use crate::domain::roster::{PlayerId, Standings};
use crate::domain::session::GameSession;
use crate::domain::teams::TeamId;
use crate::domain::test_state_helpers::session;

pub fn player(n: u8) -> impl Strategy<Value = PlayerId> {
    0..n + 1
}

pub fn team() -> impl Strategy<Value = TeamId> {
    prop_oneof![Just(TeamId::Team1), Just(TeamId::Team2)]
}

pub fn lie() -> impl Strategy<Value = Lie> {
    prop_oneof![
        Just(Lie::Fairway),
        Just(Lie::Rough),
        Just(Lie::Bunker),
        Just(Lie::Hazard),
        Just(Lie::Green),
    ]
}

pub fn betting_action(n: u8) -> impl Strategy<Value = BettingAction> {
    prop_oneof![
        player(n).prop_map(|by| BettingAction::Double { by }),
        player(n).prop_map(|by| BettingAction::OfferDouble { by }),
        (player(n), any::<bool>()).prop_map(|(by, accept)| BettingAction::RespondDouble { by, accept }),
        player(n).prop_map(|by| BettingAction::Float { by }),
        player(n).prop_map(|captain| BettingAction::ApplyOption { captain }),
        player(n).prop_map(|captain| BettingAction::DisableOption { captain }),
        player(n).prop_map(|player| BettingAction::SoloMultiplier { player }),
        (player(n), prop_oneof![Just(2u64), Just(4), Just(8)])
            .prop_map(|(by, value)| BettingAction::FixedValue { by, value }),
    ]
}

/// Any in-hole action except score entry.
pub fn hole_action(n: u8) -> impl Strategy<Value = HoleAction> {
    prop_oneof![
        4 => (player(n), 1u32..400, lie()).prop_map(|(player, distance_remaining, lie)| {
            HoleAction::RecordShot { player, distance_remaining, lie }
        }),
        1 => player(n).prop_map(|player| HoleAction::RecordShot {
            player,
            distance_remaining: 0,
            lie: Lie::Holed,
        }),
        2 => (player(n), player(n)).prop_map(|(captain, candidate)| {
            HoleAction::RequestPartnership { captain, candidate }
        }),
        2 => (player(n), any::<bool>()).prop_map(|(candidate, accept)| {
            HoleAction::RespondPartnership { candidate, accept }
        }),
        2 => (player(n), any::<bool>()).prop_map(|(captain, withdraw)| {
            if withdraw {
                HoleAction::WithdrawPartnership { captain }
            } else {
                HoleAction::GoSolo { captain }
            }
        }),
        1 => (player(n), team()).prop_map(|(aardvark, team)| {
            HoleAction::AardvarkRequestJoin { aardvark, team }
        }),
        1 => (player(n), player(n), any::<bool>()).prop_map(|(aardvark, by, accept)| {
            HoleAction::AardvarkRespond { aardvark, by, accept }
        }),
        1 => player(n).prop_map(|aardvark| HoleAction::AardvarkGoSolo { aardvark }),
        4 => betting_action(n).prop_map(HoleAction::Betting),
        1 => player(n).prop_map(|by| HoleAction::Concede { by }),
    ]
}

/// One valid gross score per player in `0..n`.
pub fn gross_scores(n: u8) -> impl Strategy<Value = Vec<GrossScore>> {
    prop::collection::vec(2u8..=9, n as usize).prop_map(|grosses| {
        grosses
            .into_iter()
            .enumerate()
            .map(|(player, gross)| GrossScore::new(player as PlayerId, gross))
            .collect()
    })
}

/// Standings for players `0..n`, in half units so solo payouts show up.
pub fn standings(n: u8) -> impl Strategy<Value = Standings> {
    prop::collection::vec(-40i64..40, n as usize).prop_map(|halves| {
        Standings::new(
            halves
                .into_iter()
                .enumerate()
                .map(|(id, h)| (id as PlayerId, Points::from_halves(h)))
                .collect(),
        )
    })
}

/// A session after a few holes of random (mostly rejected) play. Holes not
/// marked to finish stay open and keep collecting actions.
pub fn session_after(n: u8) -> impl Strategy<Value = GameSession> {
    let hole = (
        prop::collection::vec(hole_action(n), 0..25),
        gross_scores(n),
        any::<bool>(),
    );
    prop::collection::vec(hole, 0..4).prop_map(move |holes| {
        let mut s = session(n as usize);
        for (actions, scores, finish) in holes {
            if s.current_hole().is_none() && s.start_hole(HoleStart::default()).is_err() {
                break;
            }
            for action in actions {
                let _ = s.apply(action);
            }
            if finish {
                if let Some(hole) = s.current_hole() {
                    if !hole.formation.teams.is_formed() {
                        let captain = hole.captain();
                        let _ = s.apply(HoleAction::GoSolo { captain });
                    }
                }
                let _ = s.apply(HoleAction::EnterScores { scores });
                let _ = s.complete_hole();
            }
        }
        s
    })
}

//! Builders for sessions and holes used across unit tests.

use crate::config::course::{Course, HoleSpec};
use crate::config::game_rules::GameRules;
use crate::domain::hole::{GrossScore, HoleAction, HoleStart, Lie};
use crate::domain::points::Points;
use crate::domain::roster::{PlayerId, PlayerSpec};
use crate::domain::session::GameSession;
use crate::domain::teams::TeamId;

const PARS: [u8; 18] = [4, 4, 3, 5, 4, 4, 3, 4, 5, 4, 4, 3, 5, 4, 4, 3, 4, 5];
const STROKE_INDEXES: [u8; 18] = [7, 1, 15, 3, 11, 5, 17, 9, 13, 8, 2, 16, 4, 12, 6, 18, 10, 14];
const NAMES: [&str; 6] = ["Ann", "Bob", "Cal", "Dee", "Eve", "Fay"];

pub fn standard_course() -> Course {
    let holes = PARS
        .iter()
        .zip(STROKE_INDEXES)
        .map(|(&par, stroke_index)| HoleSpec { par, stroke_index })
        .collect();
    Course {
        name: "Test Links".to_string(),
        holes,
    }
}

/// `n` players, all scratch, so net equals gross.
pub fn scratch_specs(n: usize) -> Vec<PlayerSpec> {
    NAMES.iter().take(n).map(|name| PlayerSpec::new(*name, 0)).collect()
}

pub fn session_with(rules: GameRules, n: usize) -> GameSession {
    GameSession::new(rules, standard_course(), &scratch_specs(n)).unwrap()
}

pub fn session(n: usize) -> GameSession {
    session_with(GameRules::default(), n)
}

pub fn no_carry_rules() -> GameRules {
    GameRules {
        carry_over_enabled: false,
        ..GameRules::default()
    }
}

pub fn start(session: &mut GameSession) {
    session.start_hole(HoleStart::default()).unwrap();
}

pub fn shot(player: PlayerId) -> HoleAction {
    HoleAction::RecordShot {
        player,
        distance_remaining: 150,
        lie: Lie::Fairway,
    }
}

pub fn holed(player: PlayerId) -> HoleAction {
    HoleAction::RecordShot {
        player,
        distance_remaining: 0,
        lie: Lie::Holed,
    }
}

/// Both players hit, the Captain asks and the partner accepts.
pub fn partner_up(session: &mut GameSession, captain: PlayerId, partner: PlayerId) {
    session.apply(shot(captain)).unwrap();
    session.apply(shot(partner)).unwrap();
    session
        .apply(HoleAction::RequestPartnership {
            captain,
            candidate: partner,
        })
        .unwrap();
    session
        .apply(HoleAction::RespondPartnership {
            candidate: partner,
            accept: true,
        })
        .unwrap();
}

pub fn scores(entries: &[(PlayerId, u8)]) -> HoleAction {
    HoleAction::EnterScores {
        scores: entries
            .iter()
            .map(|&(player, gross)| GrossScore::new(player, gross))
            .collect(),
    }
}

/// Every player in the open hole's order scores `gross`, except `winner`
/// who scores one better.
pub fn scores_won_by(session: &GameSession, winner: Option<PlayerId>, gross: u8) -> HoleAction {
    let hole = session.current_hole().unwrap();
    let entries: Vec<(PlayerId, u8)> = hole
        .hitting_order()
        .iter()
        .map(|&p| (p, if Some(p) == winner { gross - 1 } else { gross }))
        .collect();
    scores(&entries)
}

/// Start, partner the Captain with the next hitter, halve and complete.
pub fn play_halved_hole(session: &mut GameSession) {
    start(session);
    let order = session.current_hole().unwrap().hitting_order().to_vec();
    partner_up(session, order[0], order[1]);
    let action = scores_won_by(session, None, 4);
    session.apply(action).unwrap();
    session.complete_hole().unwrap();
}

pub fn set_points(session: &mut GameSession, points: &[(PlayerId, i64)]) {
    for &(id, units) in points {
        session.roster_mut().require_mut(id).unwrap().points = Points::from_units(units);
    }
}

pub fn side_of(session: &GameSession, player: PlayerId) -> Option<TeamId> {
    session
        .current_hole()
        .and_then(|h| h.formation.teams.side_of(player))
}

//! Players, seating rotation and live standings.

use serde::{Deserialize, Serialize};

use crate::config::game_rules::{MAX_PLAYERS, MIN_PLAYERS};
use crate::domain::points::Points;
use crate::domain::strokes::validate_handicap;
use crate::errors::domain::{GameError, ValidationKind};

/// Seat number, 0-based in roster order.
pub type PlayerId = u8;

/// Inbound player description used to build a roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSpec {
    pub name: String,
    pub handicap: u8,
}

impl PlayerSpec {
    pub fn new(name: impl Into<String>, handicap: u8) -> Self {
        Self {
            name: name.into(),
            handicap,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub handicap: u8,
    pub points: Points,
    /// The once-per-game Float has been spent.
    pub float_used: bool,
    pub solo_count: u16,
    pub holes_won: u16,
    pub holes_lost: u16,
    pub holes_halved: u16,
}

impl Player {
    fn from_spec(id: PlayerId, spec: &PlayerSpec) -> Self {
        Self {
            id,
            name: spec.name.trim().to_string(),
            handicap: spec.handicap,
            points: Points::ZERO,
            float_used: false,
            solo_count: 0,
            holes_won: 0,
            holes_lost: 0,
            holes_halved: 0,
        }
    }
}

/// Ordered players. Seat order is also the base rotation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    players: Vec<Player>,
}

impl Roster {
    pub fn new(specs: &[PlayerSpec]) -> Result<Self, GameError> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&specs.len()) {
            return Err(GameError::validation(
                ValidationKind::Roster,
                format!(
                    "roster needs {MIN_PLAYERS}..={MAX_PLAYERS} players, got {}",
                    specs.len()
                ),
            ));
        }
        let mut names: Vec<String> = Vec::with_capacity(specs.len());
        for spec in specs {
            validate_handicap(spec.handicap)?;
            let name = spec.name.trim().to_lowercase();
            if name.is_empty() {
                return Err(GameError::validation(
                    ValidationKind::Roster,
                    "player name must not be empty",
                ));
            }
            if names.contains(&name) {
                return Err(GameError::validation(
                    ValidationKind::Roster,
                    format!("duplicate player name '{}'", spec.name.trim()),
                ));
            }
            names.push(name);
        }
        let players = specs
            .iter()
            .enumerate()
            .map(|(seat, spec)| Player::from_spec(seat as PlayerId, spec))
            .collect();
        Ok(Self { players })
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn ids(&self) -> Vec<PlayerId> {
        self.players.iter().map(|p| p.id).collect()
    }

    pub fn contains(&self, id: PlayerId) -> bool {
        (id as usize) < self.players.len()
    }

    pub fn require(&self, id: PlayerId) -> Result<&Player, GameError> {
        self.players.get(id as usize).ok_or_else(|| unknown_player(id))
    }

    pub fn require_mut(&mut self, id: PlayerId) -> Result<&mut Player, GameError> {
        self.players
            .get_mut(id as usize)
            .ok_or_else(|| unknown_player(id))
    }

    pub fn specs(&self) -> Vec<PlayerSpec> {
        self.players
            .iter()
            .map(|p| PlayerSpec::new(p.name.clone(), p.handicap))
            .collect()
    }

    pub fn standings(&self) -> Standings {
        Standings::new(self.players.iter().map(|p| (p.id, p.points)).collect())
    }

    /// Rotation for a 1-based hole: the order shifts left one seat per hole.
    pub fn rotation_for_hole(&self, hole_number: u8) -> Vec<PlayerId> {
        let n = self.players.len();
        if n == 0 {
            return Vec::new();
        }
        let shift = (hole_number.saturating_sub(1) as usize) % n;
        (0..n).map(|i| ((i + shift) % n) as PlayerId).collect()
    }
}

pub(crate) fn unknown_player(id: PlayerId) -> GameError {
    GameError::validation(
        ValidationKind::UnknownPlayer,
        format!("player {id} is not on the roster"),
    )
}

/// Cumulative points in roster order. Roster order breaks every tie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standings {
    entries: Vec<(PlayerId, Points)>,
}

impl Standings {
    pub fn new(mut entries: Vec<(PlayerId, Points)>) -> Self {
        entries.sort_by_key(|(id, _)| *id);
        Self { entries }
    }

    pub fn entries(&self) -> &[(PlayerId, Points)] {
        &self.entries
    }

    pub fn points(&self, id: PlayerId) -> Points {
        self.entries
            .iter()
            .find(|(pid, _)| *pid == id)
            .map(|(_, pts)| *pts)
            .unwrap_or(Points::ZERO)
    }

    /// Player furthest behind; the earliest seat wins a tie.
    pub fn trailing(&self) -> Option<PlayerId> {
        self.entries
            .iter()
            .min_by(|a, b| a.1.cmp(&b.1).then(a.0.cmp(&b.0)))
            .map(|(id, _)| *id)
    }

    /// True only when `id` alone holds the lowest total.
    pub fn is_strictly_trailing(&self, id: PlayerId) -> bool {
        let mine = self.points(id);
        self.entries
            .iter()
            .all(|(other, pts)| *other == id || *pts > mine)
    }

    /// `members` ordered from most ahead to furthest behind.
    pub fn rank_desc(&self, members: &[PlayerId]) -> Vec<PlayerId> {
        let mut ranked = members.to_vec();
        ranked.sort_by(|a, b| self.points(*b).cmp(&self.points(*a)).then(a.cmp(b)));
        ranked
    }
}

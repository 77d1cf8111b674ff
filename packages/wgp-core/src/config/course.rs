//! Course definition: par and stroke index for each of the 18 holes.

use serde::{Deserialize, Serialize};

use crate::config::game_rules::COURSE_HOLES;
use crate::domain::strokes::validate_stroke_indexes;
use crate::errors::domain::{GameError, ValidationKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoleSpec {
    pub par: u8,
    /// Difficulty rank, 1 = hardest.
    pub stroke_index: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub name: String,
    pub holes: Vec<HoleSpec>,
}

impl Course {
    /// Build and validate a course.
    pub fn new(name: impl Into<String>, holes: Vec<HoleSpec>) -> Result<Self, GameError> {
        let course = Self {
            name: name.into(),
            holes,
        };
        course.validate()?;
        Ok(course)
    }

    pub fn validate(&self) -> Result<(), GameError> {
        if self.holes.len() != COURSE_HOLES as usize {
            return Err(GameError::validation(
                ValidationKind::Course,
                format!(
                    "course must define {COURSE_HOLES} holes, got {}",
                    self.holes.len()
                ),
            ));
        }
        if let Some((i, hole)) = self
            .holes
            .iter()
            .enumerate()
            .find(|(_, h)| !(3..=6).contains(&h.par))
        {
            return Err(GameError::validation(
                ValidationKind::Course,
                format!("hole {} has par {} outside 3..=6", i + 1, hole.par),
            ));
        }
        let indexes: Vec<u8> = self.holes.iter().map(|h| h.stroke_index).collect();
        validate_stroke_indexes(&indexes)
    }

    /// Course hole for a 1-based round hole number; rounds longer than 18
    /// holes replay the course from the first hole.
    pub fn hole(&self, hole_number: u8) -> Result<HoleSpec, GameError> {
        if hole_number == 0 {
            return Err(GameError::validation(
                ValidationKind::Other("HOLE_NUMBER".into()),
                "hole numbers are 1-based",
            ));
        }
        let idx = (hole_number as usize - 1) % self.holes.len().max(1);
        self.holes.get(idx).copied().ok_or_else(|| {
            GameError::consistency(format!("course has no hole for round hole {hole_number}"))
        })
    }
}

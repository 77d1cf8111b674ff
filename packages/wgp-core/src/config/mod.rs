//! Validated game configuration: house-rule windows and course definitions.

pub mod course;
pub mod game_rules;

pub use course::{Course, HoleSpec};
pub use game_rules::{GameRules, HoleRange, PhaseWindows};

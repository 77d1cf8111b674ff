//! Error handling for the Wolf Goat Pig rules core.

pub mod domain;
pub mod error_code;

pub use domain::{GameError, RuleKind, ValidationKind};
pub use error_code::ErrorCode;

#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod config;
pub mod domain;
pub mod errors;
pub mod services;


// Re-exports for public API
pub use config::{Course, GameRules, HoleSpec};
pub use domain::{
    BettingAction, EditOutcome, GameSession, GrossScore, HoleAction, HoleStart, Phase, PlayerId, PlayerSpec,
    Points, SessionSnapshot, SessionView, TeamId,
};
pub use errors::{ErrorCode, GameError};
pub use services::registry::{RegistryError, SessionId, SessionRegistry};

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    test_bootstrap::logging::init();
}

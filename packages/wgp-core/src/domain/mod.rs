//! Domain layer: pure game logic types and helpers.

pub mod betting;
pub mod hole;
pub mod phase;
pub mod points;
pub mod roster;
pub mod scoring;
pub mod session;
pub mod snapshot;
pub mod strokes;
pub mod teams;

#[cfg(test)]
pub(crate) mod test_gens;
#[cfg(test)]
pub(crate) mod test_state_helpers;
#[cfg(test)]
mod tests_props_scoring;
#[cfg(test)]
mod tests_scoring;

// Re-exports for ergonomics
pub use betting::{BettingState, CarryOver, InvokedRule, OptionState, SoloVariant, WagerSummary};
pub use hole::{BallProgress, BettingAction, GrossScore, HoleAction, HoleStart, HoleState, HoleStatus, Lie};
pub use phase::{Phase, PhaseInfo};
pub use points::{Points, Wager};
pub use roster::{Player, PlayerId, PlayerSpec, Roster, Standings};
pub use scoring::{HoleOutcome, PointDeltas};
pub use session::{EditOutcome, GameSession, HoleSummary};
pub use snapshot::{HoleLog, HoleView, SessionSnapshot, SessionView};
pub use teams::{TeamId, Teams};

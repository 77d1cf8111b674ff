//! Services layer: hosting sessions for concurrent callers.

pub mod registry;

//! Test support shared by the workspace's integration tests.

pub mod logging;

pub use logging::init as init_logging;

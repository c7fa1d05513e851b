// Library surface for the binary, headless integration tests and reuse.
pub mod announcer;
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod drill;
pub mod error;
pub mod logging;
pub mod runtime;
pub mod session;
pub mod setup;
pub mod ui;

pub use drill::{DrillSession, TickOutcome};
pub use error::DrillError;
pub use session::{Decision, DrillConfig, DrillResult, DrillSnapshot, Phase};

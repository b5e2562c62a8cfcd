//! Domain models for the discovery harness.
//!
//! Canonical definitions for the core entities:
//! - `RunContext`: Immutable metadata shared by every module of a run
//! - `Finding`: Normalized observation emitted by a module
//! - `OrchestratorEvent`: Non-fatal execution anomaly
//! - `RunResult`: Terminal aggregate of one run

pub mod context;
pub mod error;
pub mod event;
pub mod finding;
pub mod result;

pub use context::RunContext;
pub use error::{ContextError, FindingError, ModuleError, ModuleResult};
pub use event::{EventType, OrchestratorEvent};
pub use finding::{Evidence, Finding};
pub use result::RunResult;

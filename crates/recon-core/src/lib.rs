//! Recon Core Library
//!
//! The orchestration contract of the discovery harness: the immutable run
//! context, the finding/event data model, the [`DiscoveryModule`] trait and
//! the [`Orchestrator`] that runs modules with per-module failure isolation.

pub mod domain;
pub mod module;
pub mod obs;
pub mod orchestrator;
pub mod reporting;
pub mod telemetry;
pub mod timestamp;

pub use domain::{
    ContextError, EventType, Evidence, Finding, FindingError, ModuleError, ModuleResult,
    OrchestratorEvent, RunContext, RunResult,
};

pub use module::{DiscoveryModule, FindingRecord, ModuleOutput};

pub use orchestrator::{MismatchPolicy, Orchestrator, OrchestratorConfig};

pub use obs::{
    emit_context_mismatch, emit_module_failed, emit_module_finished, emit_module_started,
    emit_run_finished, emit_run_started,
};

pub use reporting::{
    render_markdown_report, serialize_run, write_markdown_report, write_run_json, RunReport,
};

pub use telemetry::init_tracing;

pub use timestamp::{format_utc, parse_utc, utc_now, TimestampError};

//! Structured observability hooks for the discovery run lifecycle.
//!
//! Emission functions for run start/finish and per-module outcomes. The
//! run-scoped span itself is opened by `Orchestrator::run` via `#[instrument]`.
//!
//! Events are emitted at `info!` level, failures and mismatches at `warn!`.
//! Verbosity follows `RUST_LOG` (see [`crate::telemetry::init_tracing`]).

use tracing::{info, warn};

/// Emit event: run started against a target with a number of modules.
pub fn emit_run_started(target: &str, module_count: usize) {
    info!(event = "run.started", target = %target, modules = module_count);
}

/// Emit event: a module is about to execute.
pub fn emit_module_started(module: &str) {
    info!(event = "module.started", module = %module);
}

/// Emit event: a module finished and contributed findings.
pub fn emit_module_finished(module: &str, findings: usize, duration_ms: u64) {
    info!(
        event = "module.finished",
        module = %module,
        findings = findings,
        duration_ms = duration_ms,
    );
}

/// Emit event: a module failed and was contained (warning level).
pub fn emit_module_failed(module: &str, kind: &str, error: &dyn std::fmt::Display) {
    warn!(event = "module.failed", module = %module, kind = %kind, error = %error);
}

/// Emit event: a module is bound to a different context (warning level).
pub fn emit_context_mismatch(module: &str, expected_target: &str, module_target: &str) {
    warn!(
        event = "module.context_mismatch",
        module = %module,
        expected_target = %expected_target,
        module_target = %module_target,
    );
}

/// Emit event: run finished with aggregate counts.
pub fn emit_run_finished(target: &str, findings: usize, events: usize, duration_ms: u64) {
    info!(
        event = "run.finished",
        target = %target,
        findings = findings,
        events = events,
        duration_ms = duration_ms,
    );
}

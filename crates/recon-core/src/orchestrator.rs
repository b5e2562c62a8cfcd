//! Sequential module execution with per-module failure containment.
//!
//! The orchestrator knows nothing about domain internals. For each module, in
//! list order, it checks the module's bound context against the run context,
//! executes it, normalizes the output into [`Finding`]s and aggregates them.
//! Every fault a module can produce (an `Err`, a malformed record, a panic) is
//! caught in the loop body and recorded as a `module_error` event; the run
//! always completes.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use futures::FutureExt;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::{debug, instrument};

use crate::domain::{
    EventType, Finding, ModuleError, OrchestratorEvent, RunContext, RunResult,
};
use crate::module::DiscoveryModule;
use crate::obs::{
    emit_context_mismatch, emit_module_failed, emit_module_finished, emit_module_started,
    emit_run_finished, emit_run_started,
};

const MISMATCH_MESSAGE: &str = "Module context does not match orchestrator run context.";

/// What to do with a module bound to a different context than the run's.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MismatchPolicy {
    /// Record a `context_mismatch` event, then execute the module anyway.
    #[default]
    Execute,

    /// Record a `context_mismatch` event and do not execute the module.
    Skip,
}

/// Orchestrator configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Handling of modules whose context is not the run context.
    #[serde(default)]
    pub mismatch_policy: MismatchPolicy,
}

/// Coordinates discovery modules and aggregates their results.
pub struct Orchestrator {
    modules: Vec<Box<dyn DiscoveryModule>>,
    config: OrchestratorConfig,
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field(
                "modules",
                &self.modules.iter().map(|m| m.name()).collect::<Vec<_>>(),
            )
            .field("config", &self.config)
            .finish()
    }
}

impl Orchestrator {
    /// Create an orchestrator with the default configuration.
    pub fn new(modules: Vec<Box<dyn DiscoveryModule>>) -> Self {
        Self::with_config(modules, OrchestratorConfig::default())
    }

    /// Create an orchestrator with an explicit configuration.
    pub fn with_config(modules: Vec<Box<dyn DiscoveryModule>>, config: OrchestratorConfig) -> Self {
        Self { modules, config }
    }

    /// Names of the configured modules, in execution order.
    pub fn module_names(&self) -> Vec<&str> {
        self.modules.iter().map(|m| m.name()).collect()
    }

    /// Execute all modules against `context` and return the aggregate.
    ///
    /// Modules run one at a time in list order. Findings and events keep
    /// module order, then emission order. The returned result holds the same
    /// `Arc` that was passed in.
    #[instrument(skip_all, fields(target = %context.target, run_id = ?context.run_id))]
    pub async fn run(&self, context: &Arc<RunContext>) -> RunResult {
        let start = Instant::now();
        emit_run_started(&context.target, self.modules.len());

        let mut findings: Vec<Finding> = Vec::new();
        let mut events: Vec<OrchestratorEvent> = Vec::new();

        for module in &self.modules {
            let name = module.name();

            if !Arc::ptr_eq(module.context(), context) {
                let module_target = &module.context().target;
                emit_context_mismatch(name, &context.target, module_target);

                let mut details = Map::new();
                details.insert("expected_target".to_string(), json!(context.target));
                details.insert("module_target".to_string(), json!(module_target));
                events.push(OrchestratorEvent::new(
                    name,
                    EventType::ContextMismatch,
                    MISMATCH_MESSAGE,
                    details,
                ));

                if self.config.mismatch_policy == MismatchPolicy::Skip {
                    debug!(module = %name, "Skipping module bound to a foreign context");
                    continue;
                }
            }

            emit_module_started(name);
            let module_start = Instant::now();

            match invoke(module.as_ref()).await {
                Ok(module_findings) => {
                    emit_module_finished(
                        name,
                        module_findings.len(),
                        module_start.elapsed().as_millis() as u64,
                    );
                    findings.extend(module_findings);
                }
                Err(failure) => {
                    emit_module_failed(name, failure.kind(), &failure.message());
                    events.push(failure.into_event(name));
                }
            }
        }

        emit_run_finished(
            &context.target,
            findings.len(),
            events.len(),
            start.elapsed().as_millis() as u64,
        );

        RunResult {
            context: Arc::clone(context),
            findings,
            events,
        }
    }
}

/// Why a module contributed nothing to the run.
enum ModuleFailure {
    Error(ModuleError),
    Panic(String),
}

impl ModuleFailure {
    fn kind(&self) -> &'static str {
        match self {
            ModuleFailure::Error(e) => e.kind(),
            ModuleFailure::Panic(_) => "panic",
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            ModuleFailure::Error(e) => e.type_name(),
            ModuleFailure::Panic(_) => "Panic",
        }
    }

    fn message(&self) -> String {
        match self {
            ModuleFailure::Error(e) => e.to_string(),
            ModuleFailure::Panic(msg) => format!("module panicked: {msg}"),
        }
    }

    fn into_event(self, module: &str) -> OrchestratorEvent {
        let mut details = Map::new();
        details.insert("error_kind".to_string(), Value::from(self.kind()));
        details.insert("error_type".to_string(), Value::from(self.type_name()));
        OrchestratorEvent::new(module, EventType::ModuleError, self.message(), details)
    }
}

/// Execute one module and normalize its output: the single containment point.
async fn invoke(module: &dyn DiscoveryModule) -> Result<Vec<Finding>, ModuleFailure> {
    let outcome = AssertUnwindSafe(module.execute()).catch_unwind().await;

    match outcome {
        Ok(Ok(output)) => output.into_findings().map_err(ModuleFailure::Error),
        Ok(Err(e)) => Err(ModuleFailure::Error(e)),
        Err(payload) => Err(ModuleFailure::Panic(panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

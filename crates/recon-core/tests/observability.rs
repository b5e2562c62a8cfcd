//! Observability tests for the run lifecycle.
//!
//! `#[traced_test]` captures every event emitted during the test so the
//! structured fields written by the orchestrator can be asserted on.

use std::sync::Arc;

use async_trait::async_trait;
use recon_core::{
    emit_module_failed, emit_run_finished, emit_run_started, DiscoveryModule, ModuleError,
    ModuleOutput, ModuleResult, Orchestrator, RunContext,
};
use tracing_test::traced_test;

struct Failing {
    context: Arc<RunContext>,
}

#[async_trait]
impl DiscoveryModule for Failing {
    fn name(&self) -> &str {
        "failing"
    }

    fn context(&self) -> &Arc<RunContext> {
        &self.context
    }

    async fn execute(&self) -> ModuleResult<ModuleOutput> {
        Err(ModuleError::Probe("listener vanished".to_string()))
    }
}

#[traced_test]
#[test]
fn test_emit_run_started_logs_target() {
    emit_run_started("10.0.0.5", 2);
    assert!(logs_contain("run.started"));
    assert!(logs_contain("10.0.0.5"));
}

#[traced_test]
#[test]
fn test_emit_run_finished_logs_counts() {
    emit_run_finished("10.0.0.5", 7, 1, 1500);
    assert!(logs_contain("run.finished"));
}

#[traced_test]
#[test]
fn test_emit_module_failed_logs_warning() {
    emit_module_failed("identity", "timeout", &"tcp connect timed out");
    assert!(logs_contain("module.failed"));
    assert!(logs_contain("WARN"));
}

#[traced_test]
#[tokio::test]
async fn test_orchestrator_logs_contained_failure() {
    let ctx = RunContext::new("127.0.0.1", "test-host", vec![])
        .expect("context")
        .shared();
    let orchestrator = Orchestrator::new(vec![Box::new(Failing {
        context: Arc::clone(&ctx),
    })]);

    let result = orchestrator.run(&ctx).await;
    assert_eq!(result.events.len(), 1);
    assert!(logs_contain("module.started"));
    assert!(logs_contain("module.failed"));
    assert!(logs_contain("listener vanished"));
    assert!(logs_contain("run.finished"));
}

#[traced_test]
#[tokio::test]
async fn test_orchestrator_logs_context_mismatch() {
    let ctx = RunContext::new("127.0.0.1", "test-host", vec![])
        .expect("context")
        .shared();
    let foreign = RunContext::new("10.1.1.1", "test-host", vec![])
        .expect("context")
        .shared();
    let orchestrator = Orchestrator::new(vec![Box::new(Failing { context: foreign })]);

    orchestrator.run(&ctx).await;
    assert!(logs_contain("module.context_mismatch"));
    assert!(logs_contain("10.1.1.1"));
}

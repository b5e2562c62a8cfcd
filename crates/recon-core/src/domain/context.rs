//! Immutable metadata for one discovery run.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::error::ContextError;
use crate::timestamp::{utc_now, z_format};

/// Execution metadata shared by every module of a run.
///
/// A context is built once by the caller, wrapped in an [`Arc`] via
/// [`RunContext::shared`], and handed to each module. The orchestrator
/// compares contexts by pointer identity, so two structurally equal contexts
/// are still different runs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunContext {
    /// Identifier for the assessment subject (host, IP or hostname).
    pub target: String,

    /// When the run began (UTC).
    #[serde(with = "z_format")]
    pub run_started_at: DateTime<Utc>,

    /// Identity of the machine executing the run.
    pub source_host: String,

    /// Scope and safety constraints, in declaration order.
    pub assumptions: Vec<String>,

    /// Optional correlation identifier.
    pub run_id: Option<String>,
}

impl RunContext {
    /// Create a context starting now.
    pub fn new(
        target: impl Into<String>,
        source_host: impl Into<String>,
        assumptions: Vec<String>,
    ) -> Result<Self, ContextError> {
        let target = target.into();
        if target.trim().is_empty() {
            return Err(ContextError::EmptyTarget);
        }

        Ok(Self {
            target,
            run_started_at: utc_now(),
            source_host: source_host.into(),
            assumptions,
            run_id: None,
        })
    }

    /// Attach a run identifier.
    pub fn with_run_id(mut self, run_id: impl Into<String>) -> Self {
        self.run_id = Some(run_id.into());
        self
    }

    /// Override the run start time.
    pub fn with_started_at(mut self, started_at: DateTime<Utc>) -> Self {
        self.run_started_at = started_at;
        self
    }

    /// Freeze the context for sharing across modules.
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn assumptions() -> Vec<String> {
        vec!["No credentials".to_string(), "Agentless execution".to_string()]
    }

    #[test]
    fn test_new_context_defaults() {
        let ctx = RunContext::new("10.0.0.5", "scanner-01", assumptions()).expect("context");
        assert_eq!(ctx.target, "10.0.0.5");
        assert_eq!(ctx.source_host, "scanner-01");
        assert_eq!(ctx.assumptions.len(), 2);
        assert!(ctx.run_id.is_none());
    }

    #[test]
    fn test_empty_target_rejected() {
        let err = RunContext::new("   ", "scanner-01", vec![]).unwrap_err();
        assert!(matches!(err, ContextError::EmptyTarget));
    }

    #[test]
    fn test_structurally_equal_contexts_are_distinct_shares() {
        let ts = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        let a = RunContext::new("host", "src", assumptions())
            .expect("context")
            .with_started_at(ts)
            .shared();
        let b = RunContext::clone(&a).shared();

        assert_eq!(*a, *b);
        assert!(!Arc::ptr_eq(&a, &b));
        assert!(Arc::ptr_eq(&a, &Arc::clone(&a)));
    }

    #[test]
    fn test_context_serializes_with_z_timestamp() {
        let ts = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        let ctx = RunContext::new("host", "src", assumptions())
            .expect("context")
            .with_started_at(ts)
            .with_run_id("run-42");

        let raw = serde_json::to_value(&ctx).expect("serialize");
        assert_eq!(raw["run_started_at"], "2026-03-01T09:00:00Z");
        assert_eq!(raw["run_id"], "run-42");
        assert_eq!(raw["assumptions"][0], "No credentials");

        let back: RunContext = serde_json::from_value(raw).expect("deserialize");
        assert_eq!(back, ctx);
    }
}

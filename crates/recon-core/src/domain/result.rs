//! Aggregated outcome of one orchestrated run.

use std::sync::Arc;

use crate::domain::context::RunContext;
use crate::domain::event::OrchestratorEvent;
use crate::domain::finding::Finding;

/// Findings and orchestrator events collected by a single run.
///
/// Both sequences are ordered by module-list position, then by the order in
/// which each module emitted them.
#[derive(Debug, Clone)]
pub struct RunResult {
    /// The context the run was executed against (shared, not copied).
    pub context: Arc<RunContext>,

    /// Normalized findings across all modules.
    pub findings: Vec<Finding>,

    /// Execution anomalies recorded by the orchestrator.
    pub events: Vec<OrchestratorEvent>,
}

impl RunResult {
    /// True when no module produced an orchestrator event.
    pub fn is_clean(&self) -> bool {
        self.events.is_empty()
    }

    /// Findings grouped by category, categories in first-seen order.
    pub fn findings_by_category(&self) -> Vec<(&str, Vec<&Finding>)> {
        let mut groups: Vec<(&str, Vec<&Finding>)> = Vec::new();
        for finding in &self.findings {
            match groups.iter_mut().find(|(c, _)| *c == finding.category()) {
                Some((_, bucket)) => bucket.push(finding),
                None => groups.push((finding.category(), vec![finding])),
            }
        }
        groups
    }

    /// Events recorded for a given module name.
    pub fn events_for_module<'a>(
        &'a self,
        module: &'a str,
    ) -> impl Iterator<Item = &'a OrchestratorEvent> + 'a {
        self.events.iter().filter(move |e| e.module() == module)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::event::EventType;
    use crate::domain::finding::Evidence;

    fn finding(category: &str, target: &str) -> Finding {
        Finding::new("network", category, target, Evidence::new(), 0.5).expect("finding")
    }

    fn ctx() -> Arc<RunContext> {
        RunContext::new("host", "src", vec![]).expect("context").shared()
    }

    #[test]
    fn test_group_by_category_preserves_first_seen_order() {
        let result = RunResult {
            context: ctx(),
            findings: vec![
                finding("host_presence", "host"),
                finding("open_port", "host:22"),
                finding("port_probe_error", "host:23"),
                finding("open_port", "host:80"),
            ],
            events: vec![],
        };

        let groups = result.findings_by_category();
        let names: Vec<&str> = groups.iter().map(|(c, _)| *c).collect();
        assert_eq!(names, vec!["host_presence", "open_port", "port_probe_error"]);
        assert_eq!(groups[1].1.len(), 2);
        assert_eq!(groups[1].1[1].target(), "host:80");
        assert!(result.is_clean());
    }

    #[test]
    fn test_events_for_module() {
        let result = RunResult {
            context: ctx(),
            findings: vec![],
            events: vec![
                OrchestratorEvent::new("a", EventType::ModuleError, "x", Default::default()),
                OrchestratorEvent::new("b", EventType::ContextMismatch, "y", Default::default()),
            ],
        };

        assert!(!result.is_clean());
        assert_eq!(result.events_for_module("a").count(), 1);
        assert_eq!(result.events_for_module("c").count(), 0);
    }
}

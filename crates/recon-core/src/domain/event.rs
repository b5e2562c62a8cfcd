//! Orchestrator-level execution anomalies.
//!
//! Events live in a separate stream from findings so that failure telemetry
//! never contaminates domain observations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::timestamp::{format_utc, utc_now, z_format};

/// Classification of an orchestrator event.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// A module was bound to a different context than the one being run.
    ContextMismatch,

    /// A module failed during execution or normalization.
    ModuleError,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::ContextMismatch => "context_mismatch",
            EventType::ModuleError => "module_error",
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A non-fatal execution issue captured while running modules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrchestratorEvent {
    module: String,
    event_type: EventType,
    message: String,
    #[serde(with = "z_format")]
    observed_at: DateTime<Utc>,
    details: Map<String, Value>,
}

impl OrchestratorEvent {
    pub(crate) fn new(
        module: impl Into<String>,
        event_type: EventType,
        message: impl Into<String>,
        details: Map<String, Value>,
    ) -> Self {
        Self {
            module: module.into(),
            event_type,
            message: message.into(),
            observed_at: utc_now(),
            details,
        }
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn event_type(&self) -> EventType {
        self.event_type
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn observed_at(&self) -> DateTime<Utc> {
        self.observed_at
    }

    pub fn details(&self) -> &Map<String, Value> {
        &self.details
    }

    /// Canonical mapping representation, with a Z-suffixed `observed_at`.
    pub fn to_mapping(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("module".to_string(), Value::String(self.module.clone()));
        map.insert(
            "event_type".to_string(),
            Value::String(self.event_type.as_str().to_string()),
        );
        map.insert("message".to_string(), Value::String(self.message.clone()));
        map.insert(
            "observed_at".to_string(),
            Value::String(format_utc(&self.observed_at)),
        );
        map.insert("details".to_string(), Value::Object(self.details.clone()));
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_type_wire_names() {
        assert_eq!(
            serde_json::to_value(EventType::ContextMismatch).unwrap(),
            json!("context_mismatch")
        );
        assert_eq!(
            serde_json::to_value(EventType::ModuleError).unwrap(),
            json!("module_error")
        );
        assert_eq!(EventType::ModuleError.to_string(), "module_error");
    }

    #[test]
    fn test_event_mapping_matches_serialization() {
        let mut details = Map::new();
        details.insert("error_kind".to_string(), json!("io"));
        let event = OrchestratorEvent::new("network", EventType::ModuleError, "boom", details);

        let map = event.to_mapping();
        let serialized = serde_json::to_value(&event).expect("serialize");
        assert_eq!(Value::Object(map), serialized);
        assert!(serialized["observed_at"].as_str().unwrap().ends_with('Z'));
    }
}

//! The capability contract every discovery domain implements.
//!
//! A module is bound to one [`RunContext`] at construction and exposes a
//! single `execute` operation. Its output may be canonical [`Finding`]s or
//! loosely-structured mappings; the orchestrator normalizes both through
//! [`ModuleOutput::into_findings`].

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::error::{FindingError, ModuleError, ModuleResult};
use crate::domain::{Finding, RunContext};

/// A pluggable discovery domain.
#[async_trait]
pub trait DiscoveryModule: Send + Sync {
    /// Name recorded in orchestrator events and logs.
    fn name(&self) -> &str;

    /// The context this module was constructed with.
    fn context(&self) -> &Arc<RunContext>;

    /// Run the domain's discovery logic.
    ///
    /// Anticipated conditions (closed ports, timeouts) should be expressed as
    /// absent or low-confidence findings, not errors.
    async fn execute(&self) -> ModuleResult<ModuleOutput>;
}

/// One element of a module's output before normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum FindingRecord {
    /// An already-validated finding.
    Canonical(Finding),

    /// A mapping with the same fields as a finding.
    Raw(Value),
}

impl FindingRecord {
    /// Convert to a canonical finding.
    pub fn normalize(self) -> Result<Finding, FindingError> {
        match self {
            FindingRecord::Canonical(finding) => Ok(finding),
            FindingRecord::Raw(Value::Object(map)) => Finding::from_mapping(map),
            FindingRecord::Raw(other) => Err(FindingError::NotAnObject {
                found: json_type_name(&other),
            }),
        }
    }
}

impl From<Finding> for FindingRecord {
    fn from(finding: Finding) -> Self {
        FindingRecord::Canonical(finding)
    }
}

impl From<Value> for FindingRecord {
    fn from(value: Value) -> Self {
        FindingRecord::Raw(value)
    }
}

/// Everything a module can hand back from `execute`.
#[derive(Debug, Clone, PartialEq)]
pub enum ModuleOutput {
    /// A finite, ordered sequence of records.
    Records(Vec<FindingRecord>),

    /// An untyped payload that must be a JSON array of finding mappings.
    Json(Value),
}

impl ModuleOutput {
    /// An output with no findings.
    pub fn empty() -> Self {
        ModuleOutput::Records(Vec::new())
    }

    /// Normalize every record, all-or-nothing.
    ///
    /// Any element that cannot become a finding fails the whole output, so
    /// a module never contributes a partial sequence.
    pub fn into_findings(self) -> ModuleResult<Vec<Finding>> {
        let records: Vec<FindingRecord> = match self {
            ModuleOutput::Records(records) => records,
            ModuleOutput::Json(Value::Array(items)) => {
                items.into_iter().map(FindingRecord::Raw).collect()
            }
            ModuleOutput::Json(other) => {
                return Err(ModuleError::ContractViolation(format!(
                    "execute() must return a sequence of findings, got {}",
                    json_type_name(&other)
                )))
            }
        };

        records
            .into_iter()
            .enumerate()
            .map(|(index, record)| match record.normalize() {
                Ok(finding) => Ok(finding),
                Err(FindingError::NotAnObject { found }) => Err(ModuleError::ContractViolation(
                    format!("unsupported finding type at index {index}: {found}"),
                )),
                Err(e) => Err(ModuleError::InvalidFinding(e)),
            })
            .collect()
    }
}

impl From<Vec<Finding>> for ModuleOutput {
    fn from(findings: Vec<Finding>) -> Self {
        ModuleOutput::Records(findings.into_iter().map(FindingRecord::Canonical).collect())
    }
}

impl From<Vec<Value>> for ModuleOutput {
    fn from(mappings: Vec<Value>) -> Self {
        ModuleOutput::Records(mappings.into_iter().map(FindingRecord::Raw).collect())
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "mapping",
    }
}

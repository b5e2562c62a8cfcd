//! Error taxonomy for the discovery harness.

use crate::timestamp::TimestampError;

/// Errors produced while constructing a [`RunContext`](super::RunContext).
#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    #[error("run context target must not be empty")]
    EmptyTarget,
}

/// Errors produced while building or normalizing a [`Finding`](super::Finding).
#[derive(Debug, thiserror::Error)]
pub enum FindingError {
    #[error("confidence {value} outside [0.0, 1.0]")]
    ConfidenceOutOfRange { value: f64 },

    #[error("finding mapping missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("finding mapping has unexpected field: {field}")]
    UnexpectedField { field: String },

    #[error("finding field {field} must be {expected}")]
    InvalidFieldType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("finding record must be a mapping, got {found}")]
    NotAnObject { found: &'static str },

    #[error("finding observed_at: {0}")]
    InvalidTimestamp(#[from] TimestampError),
}

/// Faults a discovery module can surface from `execute`.
///
/// Every variant is contained by the orchestrator and recorded as a
/// `module_error` event; none of them abort a run.
#[derive(Debug, thiserror::Error)]
pub enum ModuleError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{operation} timed out after {after_ms}ms")]
    Timeout { operation: String, after_ms: u64 },

    #[error("contract violation: {0}")]
    ContractViolation(String),

    #[error("invalid finding: {0}")]
    InvalidFinding(#[from] FindingError),

    #[error("probe error: {0}")]
    Probe(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ModuleError {
    /// Stable classification string recorded in `module_error` event details.
    pub fn kind(&self) -> &'static str {
        match self {
            ModuleError::Io(_) => "io",
            ModuleError::Timeout { .. } => "timeout",
            ModuleError::ContractViolation(_) => "contract_violation",
            ModuleError::InvalidFinding(_) => "invalid_finding",
            ModuleError::Probe(_) => "probe",
            ModuleError::Internal(_) => "internal",
        }
    }

    /// Variant name, recorded alongside [`ModuleError::kind`].
    pub fn type_name(&self) -> &'static str {
        match self {
            ModuleError::Io(_) => "Io",
            ModuleError::Timeout { .. } => "Timeout",
            ModuleError::ContractViolation(_) => "ContractViolation",
            ModuleError::InvalidFinding(_) => "InvalidFinding",
            ModuleError::Probe(_) => "Probe",
            ModuleError::Internal(_) => "Internal",
        }
    }
}

/// Result type for module execution.
pub type ModuleResult<T> = std::result::Result<T, ModuleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_error_display() {
        let err = ContextError::EmptyTarget;
        assert!(err.to_string().contains("target"));
    }

    #[test]
    fn test_module_error_kinds() {
        let err = ModuleError::Timeout {
            operation: "tcp connect".to_string(),
            after_ms: 1000,
        };
        assert_eq!(err.kind(), "timeout");
        assert!(err.to_string().contains("1000ms"));

        let err = ModuleError::ContractViolation("not a sequence".to_string());
        assert_eq!(err.kind(), "contract_violation");
        assert_eq!(err.type_name(), "ContractViolation");

        let err: ModuleError = anyhow::anyhow!("boom").into();
        assert_eq!(err.kind(), "internal");
        assert_eq!(err.to_string(), "boom");
    }

    #[test]
    fn test_timestamp_fault_is_an_invalid_finding() {
        let ts_err = crate::timestamp::parse_utc("not-a-time").unwrap_err();
        let err: ModuleError = FindingError::from(ts_err).into();
        assert_eq!(err.kind(), "invalid_finding");
        assert_eq!(err.type_name(), "InvalidFinding");

        let err: ModuleError = FindingError::MissingField { field: "domain" }.into();
        assert_eq!(err.kind(), "invalid_finding");
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset");
        let err: ModuleError = io.into();
        assert_eq!(err.kind(), "io");
        assert!(err.to_string().contains("reset"));
    }
}

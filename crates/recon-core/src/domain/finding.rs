//! Normalized findings emitted by discovery domains.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::error::FindingError;
use crate::timestamp::{format_utc, parse_utc, utc_now, z_format};

/// Free-form structured detail attached to a finding.
pub type Evidence = Map<String, Value>;

const FIELDS: [&str; 6] = [
    "domain",
    "category",
    "target",
    "evidence",
    "confidence",
    "observed_at",
];

/// One normalized, evidence-bearing observation about a target.
///
/// Fields are private: a `Finding` can only be obtained through a validating
/// constructor, so `confidence` always lies in `[0.0, 1.0]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct Finding {
    domain: String,
    category: String,
    target: String,
    evidence: Evidence,
    confidence: f64,
    #[serde(with = "z_format")]
    observed_at: DateTime<Utc>,
}

impl Finding {
    /// Create a finding observed now.
    pub fn new(
        domain: impl Into<String>,
        category: impl Into<String>,
        target: impl Into<String>,
        evidence: Evidence,
        confidence: f64,
    ) -> Result<Self, FindingError> {
        if !(0.0..=1.0).contains(&confidence) {
            return Err(FindingError::ConfidenceOutOfRange { value: confidence });
        }

        Ok(Self {
            domain: domain.into(),
            category: category.into(),
            target: target.into(),
            evidence,
            confidence,
            observed_at: utc_now(),
        })
    }

    /// Override the observation time.
    pub fn with_observed_at(mut self, observed_at: DateTime<Utc>) -> Self {
        self.observed_at = observed_at;
        self
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn evidence(&self) -> &Evidence {
        &self.evidence
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn observed_at(&self) -> DateTime<Utc> {
        self.observed_at
    }

    /// Canonical mapping representation, with a Z-suffixed `observed_at`.
    pub fn to_mapping(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("domain".to_string(), Value::String(self.domain.clone()));
        map.insert("category".to_string(), Value::String(self.category.clone()));
        map.insert("target".to_string(), Value::String(self.target.clone()));
        map.insert("evidence".to_string(), Value::Object(self.evidence.clone()));
        map.insert("confidence".to_string(), Value::from(self.confidence));
        map.insert(
            "observed_at".to_string(),
            Value::String(format_utc(&self.observed_at)),
        );
        map
    }

    /// Build a finding from its mapping representation.
    ///
    /// Every field is required and no other keys are allowed. `observed_at`
    /// must be an ISO-8601 string; a trailing `Z` is accepted as UTC.
    pub fn from_mapping(mut map: Map<String, Value>) -> Result<Self, FindingError> {
        if let Some(unknown) = map.keys().find(|k| !FIELDS.contains(&k.as_str())) {
            return Err(FindingError::UnexpectedField {
                field: unknown.clone(),
            });
        }

        let domain = take_string(&mut map, "domain")?;
        let category = take_string(&mut map, "category")?;
        let target = take_string(&mut map, "target")?;

        let evidence = match take(&mut map, "evidence")? {
            Value::Object(obj) => obj,
            _ => {
                return Err(FindingError::InvalidFieldType {
                    field: "evidence",
                    expected: "a mapping",
                })
            }
        };

        let confidence = take(&mut map, "confidence")?
            .as_f64()
            .ok_or(FindingError::InvalidFieldType {
                field: "confidence",
                expected: "a number",
            })?;

        let observed_at = match take(&mut map, "observed_at")? {
            Value::String(raw) => parse_utc(&raw)?,
            _ => {
                return Err(FindingError::InvalidFieldType {
                    field: "observed_at",
                    expected: "an ISO-8601 string",
                })
            }
        };

        Ok(Self::new(domain, category, target, evidence, confidence)?.with_observed_at(observed_at))
    }
}

impl TryFrom<Map<String, Value>> for Finding {
    type Error = FindingError;

    fn try_from(map: Map<String, Value>) -> Result<Self, Self::Error> {
        Self::from_mapping(map)
    }
}

fn take(map: &mut Map<String, Value>, field: &'static str) -> Result<Value, FindingError> {
    map.remove(field).ok_or(FindingError::MissingField { field })
}

fn take_string(map: &mut Map<String, Value>, field: &'static str) -> Result<String, FindingError> {
    match take(map, field)? {
        Value::String(s) => Ok(s),
        _ => Err(FindingError::InvalidFieldType {
            field,
            expected: "a string",
        }),
    }
}

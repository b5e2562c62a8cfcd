//! UTC timestamp helpers.
//!
//! Every timestamp that leaves the harness is rendered as ISO-8601 with a
//! literal trailing `Z`. Parsing accepts both `Z` and an explicit `+00:00`
//! offset; any other explicit offset is converted to UTC.

use chrono::{DateTime, SecondsFormat, Utc};

/// Errors produced while parsing timestamp strings.
#[derive(Debug, thiserror::Error)]
pub enum TimestampError {
    #[error("invalid timestamp {input:?}: {source}")]
    Parse {
        input: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// Current time as an aware UTC timestamp.
pub fn utc_now() -> DateTime<Utc> {
    Utc::now()
}

/// Render a timestamp as ISO-8601 with a trailing `Z` designator.
///
/// Sub-second digits are emitted only when present (milli/micro/nano as
/// needed), so whole-second timestamps render as `2026-01-01T00:00:00Z`.
pub fn format_utc(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Offset-bearing ISO-8601 layouts accepted besides strict RFC 3339.
const EXTENDED_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M%:z",
];

/// Parse an ISO-8601 timestamp carrying a UTC designator or offset.
///
/// A trailing `Z` is rewritten to `+00:00` before parsing. RFC 3339 is tried
/// first, then minute precision (`2026-02-14T08:00Z`) and a space in place of
/// the `T` separator. Strings without any offset are rejected: a timestamp
/// without a zone cannot be made aware.
pub fn parse_utc(input: &str) -> Result<DateTime<Utc>, TimestampError> {
    let trimmed = input.trim();
    let normalized = match trimmed.strip_suffix(|c: char| c == 'Z' || c == 'z') {
        Some(head) => format!("{head}+00:00"),
        None => trimmed.to_string(),
    };

    let parsed = DateTime::parse_from_rfc3339(&normalized).or_else(|rfc_err| {
        EXTENDED_FORMATS
            .iter()
            .find_map(|fmt| DateTime::parse_from_str(&normalized, fmt).ok())
            .ok_or(rfc_err)
    });

    parsed
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|source| TimestampError::Parse {
            input: input.to_string(),
            source,
        })
}

/// Serde adapter for `DateTime<Utc>` fields using the Z-suffixed wire form.
pub mod z_format {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_utc(ts))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_utc(&raw).map_err(serde::de::Error::custom)
    }
}

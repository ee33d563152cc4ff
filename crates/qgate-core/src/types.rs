use chrono::{DateTime, FixedOffset, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outcome of a remote lookup that distinguishes "not there" from failure.
///
/// HTTP 404 (and the API's embedded `err_code` flavor of it) decodes to
/// `Missing`; callers decide whether that means "create it", "no data
/// yet", or a fatal condition. Ignoring it is not an option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<T> {
    Found(T),
    Missing,
}

impl<T> Lookup<T> {
    pub fn found(self) -> Option<T> {
        match self {
            Lookup::Found(value) => Some(value),
            Lookup::Missing => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Lookup::Missing)
    }
}

/// Resource metadata the gate service holds for one tracked project.
///
/// The raw response body is retained so that id-parse failures can name
/// the offending payload verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectMetadata {
    pub id: Option<String>,
    pub key: String,
    pub last_analysis: Option<DateTime<FixedOffset>>,
    pub raw: String,
}

/// Latest gate verdict for a project key. A blank payload decodes to the
/// all-`None` value, which counts as a pass (no gate configured yet).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GateEvaluation {
    pub level: Option<String>,
    pub conditions: Option<Vec<Value>>,
}

impl GateEvaluation {
    /// Only the `ERROR` level, compared case-insensitively, breaks a build.
    pub fn is_error_level(&self) -> bool {
        self.level
            .as_deref()
            .is_some_and(|level| level.eq_ignore_ascii_case("ERROR"))
    }
}

/// One entry of the gate service's full project listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedProject {
    pub id: String,
    pub key: String,
}

/// One branch as reported by the repository host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoBranch {
    pub id: String,
    pub display_id: String,
}

/// Parse a timestamp as the gate service and the pipeline emit them:
/// `2016-05-01T12:00:00+0200`, RFC 3339, or a bare local date-time.
pub fn parse_timestamp(value: &str) -> Result<DateTime<FixedOffset>, chrono::ParseError> {
    DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%z")
        .or_else(|_| DateTime::parse_from_rfc3339(value))
        .or_else(|_| {
            value
                .parse::<NaiveDateTime>()
                .map(|naive| naive.and_utc().fixed_offset())
        })
}

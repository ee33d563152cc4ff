use std::num::ParseIntError;

/// Failure while decoding a JSON payload from the gate service.
#[derive(Debug, thiserror::Error)]
pub enum JsonError {
    #[error("could not parse json\n{payload}")]
    Malformed {
        payload: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("expected a json object or a one-element array of objects, got\n{payload}")]
    UnexpectedShape { payload: String },
}

/// Transport-level failure talking to a remote API.
///
/// A 404 is not an error: lookups report it as [`crate::types::Lookup::Missing`]
/// and every caller decides what "not there" means for its step.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("request to {url} failed")]
    Transport {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("{url} answered {status}: {body}")]
    Status { url: String, status: u16, body: String },
    #[error("unreadable last-analysis timestamp '{value}' for {key}")]
    Timestamp {
        key: String,
        value: String,
        #[source]
        source: chrono::ParseError,
    },
    #[error(transparent)]
    Json(#[from] JsonError),
}

/// Business-level failure of a gate operation.
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    #[error(transparent)]
    Client(#[from] ClientError),

    /// The quality gate evaluated to `ERROR`. The report is the literal
    /// text contract: banner, `Conditions:` header, one condition per line.
    #[error("{report}")]
    GateNotMet { report: String },

    #[error("we waited for {elapsed} seconds, but no update on last run (i.e. date field) occurred")]
    Timeout { elapsed: u64 },

    #[error("could not get project id from json {payload}")]
    ProjectId {
        payload: String,
        #[source]
        source: ParseIntError,
    },

    #[error("quality gate '{name}' is not known to the server")]
    UnknownGate { name: String },
}

/// The local git collaborator failed; always wraps the underlying cause.
#[derive(Debug, thiserror::Error)]
#[error("failed to resolve the current git branch")]
pub struct GitError {
    #[from]
    source: std::io::Error,
}

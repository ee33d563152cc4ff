//! Pure decoders for the gate service's response bodies.
//!
//! Kept free of any transport concern so the wire quirks (object/array
//! framing, JSON-in-a-string nesting, embedded 404 envelopes) are
//! testable without a live server.

use qgate_core::errors::ClientError;
use qgate_core::json;
use qgate_core::types::{parse_timestamp, GateEvaluation, Lookup, ProjectMetadata, RepoBranch, TrackedProject};

/// Decode a resource-lookup body. The API sometimes answers a 200 whose
/// body carries `err_code: 404` instead of an HTTP 404; both mean
/// `Missing`.
pub(crate) fn decode_resource(
    project_key: &str,
    body: &str,
) -> Result<Lookup<ProjectMetadata>, ClientError> {
    if json::field_at(body, "err_code")?.as_deref() == Some("404") {
        return Ok(Lookup::Missing);
    }
    let last_analysis = match json::field_at(body, "date")? {
        Some(value) => Some(parse_timestamp(&value).map_err(|source| ClientError::Timestamp {
            key: project_key.to_string(),
            value,
            source,
        })?),
        None => None,
    };
    Ok(Lookup::Found(ProjectMetadata {
        id: json::id_field(body)?,
        key: project_key.to_string(),
        last_analysis,
        raw: body.to_string(),
    }))
}

/// Decode the gate-evaluation body: the verdict hides in `msr` → `data`,
/// where `msr` may be array-wrapped and `data` is JSON encoded as a
/// string. A blank body decodes to the empty evaluation (a pass).
pub(crate) fn decode_evaluation(body: &str) -> Result<GateEvaluation, ClientError> {
    let msr = json::field_at(body, "msr")?.unwrap_or_default();
    if msr.trim().is_empty() {
        return Ok(GateEvaluation::default());
    }
    let data = json::field_at(&msr, "data")?.unwrap_or_default();
    if data.trim().is_empty() {
        return Ok(GateEvaluation::default());
    }
    let level = json::field_at(&data, "level")?;
    let conditions = match json::field_at(&data, "conditions")? {
        Some(text) => Some(json::parse_array(&text)?),
        None => None,
    };
    Ok(GateEvaluation { level, conditions })
}

/// Decode the full project listing (`id` plus key under `k`), keeping
/// server order. Entries without both fields are dropped.
pub(crate) fn decode_tracked(body: &str) -> Result<Vec<TrackedProject>, ClientError> {
    let entries = json::parse_array(body)?;
    let mut projects = Vec::new();
    for entry in &entries {
        let id = entry.get("id").map(render);
        let key = entry.get("k").map(render);
        if let (Some(id), Some(key)) = (id, key) {
            projects.push(TrackedProject { id, key });
        }
    }
    Ok(projects)
}

/// Decode the repository host's `{values: [{id, displayId}]}` listing.
pub(crate) fn decode_branches(body: &str) -> Result<Vec<RepoBranch>, ClientError> {
    let object = json::parse_object(body)?;
    let mut branches = Vec::new();
    if let Some(values) = object.get("values").and_then(|v| v.as_array()) {
        for value in values {
            let id = value.get("id").map(render);
            let display_id = value.get("displayId").map(render);
            if let (Some(id), Some(display_id)) = (id, display_id) {
                branches.push(RepoBranch { id, display_id });
            }
        }
    }
    Ok(branches)
}

fn render(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

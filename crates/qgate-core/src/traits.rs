use crate::errors::ClientError;
use crate::types::{GateEvaluation, Lookup, ProjectMetadata, RepoBranch, TrackedProject};

/// Client-side view of the quality-gate service.
///
/// Pure request/response: no retry logic, no connection state between
/// calls. Every lookup that can 404 returns a [`Lookup`] so callers
/// handle "not there" explicitly.
pub trait GateServer {
    /// Resource metadata for a project key, including its last-analysis
    /// timestamp.
    fn resource(&self, project_key: &str) -> Result<Lookup<ProjectMetadata>, ClientError>;

    /// Create a project under the given key, returning its metadata.
    fn create_project(&self, project_key: &str) -> Result<ProjectMetadata, ClientError>;

    /// Resolve a named gate configuration to its server-side id.
    fn gate_definition(&self, gate_name: &str) -> Result<Lookup<String>, ClientError>;

    /// Bind a project to a gate by their resolved ids.
    fn bind_gate(&self, project_id: i64, gate_id: &str) -> Result<(), ClientError>;

    /// Latest gate verdict for a project key.
    fn gate_evaluation(&self, project_key: &str) -> Result<Lookup<GateEvaluation>, ClientError>;

    /// Every project the service tracks, in server order.
    fn tracked_projects(&self) -> Result<Vec<TrackedProject>, ClientError>;

    /// Delete a tracked project by id, returning the server's response text.
    fn delete_project(&self, project_id: &str) -> Result<String, ClientError>;
}

/// Lists the branches that still exist on the repository host.
pub trait BranchSource {
    fn branches(&self, listing_url: &str) -> Result<Vec<RepoBranch>, ClientError>;
}

//! Hand-rolled `GateServer`/`BranchSource` doubles for engine tests.

use std::cell::RefCell;

use qgate_core::errors::ClientError;
use qgate_core::traits::{BranchSource, GateServer};
use qgate_core::types::{
    parse_timestamp, GateEvaluation, Lookup, ProjectMetadata, RepoBranch, TrackedProject,
};

/// Scripted gate server: resource lookups replay a sequence (the last
/// entry repeats), everything else is fixed; all calls are recorded.
#[derive(Default)]
pub(crate) struct MockServer {
    resources: Vec<Lookup<ProjectMetadata>>,
    resource_cursor: RefCell<usize>,
    created: Option<ProjectMetadata>,
    gate_id: Option<String>,
    evaluation: Option<GateEvaluation>,
    tracked: Vec<TrackedProject>,
    failing_deletes: bool,

    pub create_calls: RefCell<u32>,
    pub gate_lookups: RefCell<u32>,
    pub bound: RefCell<Vec<(i64, String)>>,
    pub deleted: RefCell<Vec<String>>,
}

impl MockServer {
    pub fn with_resource(mut self, lookup: Lookup<ProjectMetadata>) -> Self {
        self.resources.push(lookup);
        self
    }

    pub fn with_created(mut self, metadata: ProjectMetadata) -> Self {
        self.created = Some(metadata);
        self
    }

    pub fn with_gate_id(mut self, id: &str) -> Self {
        self.gate_id = Some(id.to_string());
        self
    }

    pub fn with_evaluation(mut self, evaluation: GateEvaluation) -> Self {
        self.evaluation = Some(evaluation);
        self
    }

    pub fn with_tracked(mut self, id: &str, key: &str) -> Self {
        self.tracked.push(TrackedProject {
            id: id.to_string(),
            key: key.to_string(),
        });
        self
    }

    /// Every deletion is still recorded, then answered with a 500.
    pub fn with_failing_deletes(mut self) -> Self {
        self.failing_deletes = true;
        self
    }
}

impl GateServer for MockServer {
    fn resource(&self, _project_key: &str) -> Result<Lookup<ProjectMetadata>, ClientError> {
        if self.resources.is_empty() {
            return Ok(Lookup::Missing);
        }
        let mut cursor = self.resource_cursor.borrow_mut();
        let index = (*cursor).min(self.resources.len() - 1);
        *cursor += 1;
        Ok(self.resources[index].clone())
    }

    fn create_project(&self, project_key: &str) -> Result<ProjectMetadata, ClientError> {
        *self.create_calls.borrow_mut() += 1;
        Ok(self
            .created
            .clone()
            .unwrap_or_else(|| metadata(project_key, None, None)))
    }

    fn gate_definition(&self, _gate_name: &str) -> Result<Lookup<String>, ClientError> {
        *self.gate_lookups.borrow_mut() += 1;
        Ok(match &self.gate_id {
            Some(id) => Lookup::Found(id.clone()),
            None => Lookup::Missing,
        })
    }

    fn bind_gate(&self, project_id: i64, gate_id: &str) -> Result<(), ClientError> {
        self.bound.borrow_mut().push((project_id, gate_id.to_string()));
        Ok(())
    }

    fn gate_evaluation(&self, _project_key: &str) -> Result<Lookup<GateEvaluation>, ClientError> {
        Ok(match &self.evaluation {
            Some(evaluation) => Lookup::Found(evaluation.clone()),
            None => Lookup::Missing,
        })
    }

    fn tracked_projects(&self) -> Result<Vec<TrackedProject>, ClientError> {
        Ok(self.tracked.clone())
    }

    fn delete_project(&self, project_id: &str) -> Result<String, ClientError> {
        self.deleted.borrow_mut().push(project_id.to_string());
        if self.failing_deletes {
            return Err(ClientError::Status {
                url: format!("/api/projects/{project_id}"),
                status: 500,
                body: "deletion refused".to_string(),
            });
        }
        Ok(format!("deleted {project_id}"))
    }
}

/// Fixed branch listing, regardless of URL; queried URLs are recorded.
#[derive(Default)]
pub(crate) struct MockBranchSource {
    branches: Vec<RepoBranch>,

    pub listings: RefCell<Vec<String>>,
}

impl MockBranchSource {
    pub fn with_branch(mut self, display_id: &str) -> Self {
        self.branches.push(RepoBranch {
            id: format!("refs/heads/{display_id}"),
            display_id: display_id.to_string(),
        });
        self
    }
}

impl BranchSource for MockBranchSource {
    fn branches(&self, listing_url: &str) -> Result<Vec<RepoBranch>, ClientError> {
        self.listings.borrow_mut().push(listing_url.to_string());
        Ok(self.branches.clone())
    }
}

pub(crate) fn metadata(key: &str, id: Option<&str>, date: Option<&str>) -> ProjectMetadata {
    ProjectMetadata {
        id: id.map(str::to_string),
        key: key.to_string(),
        last_analysis: date.map(|d| parse_timestamp(d).expect("test timestamp")),
        raw: format!(r#"{{"key":"{key}"}}"#),
    }
}

//! Project/gate reconciliation: make sure a project exists remotely and
//! is bound to a named quality gate. Used standalone and as the
//! validation engine's recovery path for missing projects.

use tracing::info;

use qgate_core::errors::GateError;
use qgate_core::traits::GateServer;
use qgate_core::types::{Lookup, ProjectMetadata};

use crate::retry::{self, Pacing};

/// Look the project up by key, creating it when absent, then bind it to
/// the named gate. Returns the resolved numeric project id. Creation,
/// gate lookup, and binding each happen at most once.
pub fn ensure_linked(
    server: &dyn GateServer,
    project_key: &str,
    gate_name: &str,
    pacing: &Pacing,
) -> Result<i64, GateError> {
    let metadata = match server.resource(project_key)? {
        Lookup::Found(metadata) => metadata,
        Lookup::Missing => {
            let created = server.create_project(project_key)?;
            info!(key = %project_key, id = ?created.id, "created project, waiting for it to be published");
            // Best effort: the wait is not verified, by contract.
            retry::settle(pacing.settle);
            created
        }
    };
    let project_id = numeric_id(&metadata)?;

    let gate_id = match server.gate_definition(gate_name)? {
        Lookup::Found(id) => id,
        Lookup::Missing => {
            return Err(GateError::UnknownGate {
                name: gate_name.to_string(),
            })
        }
    };

    info!(
        key = %project_key,
        project_id,
        gate = %gate_name,
        gate_id = %gate_id,
        "link project to quality gate"
    );
    server.bind_gate(project_id, &gate_id)?;
    Ok(project_id)
}

fn numeric_id(metadata: &ProjectMetadata) -> Result<i64, GateError> {
    metadata
        .id
        .as_deref()
        .unwrap_or("")
        .parse()
        .map_err(|source| GateError::ProjectId {
            payload: metadata.raw.clone(),
            source,
        })
}

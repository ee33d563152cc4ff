//! Branch reconciliation: delete tracked project-branches whose source
//! branches no longer exist. One-way by design; projects are only ever
//! created lazily during analysis runs, never here.

use std::collections::{HashMap, HashSet};

use tracing::{error, info};

use qgate_core::config::RepoMapping;
use qgate_core::errors::GateError;
use qgate_core::key::sanitize_branch;
use qgate_core::traits::{BranchSource, GateServer};
use qgate_core::types::TrackedProject;

/// Reconcile one (project prefix, branch listing) pair: every tracked
/// branch suffix with no matching repository branch (raw or sanitized
/// form) is deleted from the gate service.
pub fn reconcile_branches(
    server: &dyn GateServer,
    source: &dyn BranchSource,
    mapping: &RepoMapping,
) -> Result<(), GateError> {
    let existing = existing_branches(source, &mapping.branch_listing_url)?;
    let tracked = tracked_branches(server, &mapping.project_prefix)?;

    let mut doomed: Vec<(&String, &TrackedProject)> = tracked
        .iter()
        .filter(|(suffix, _)| !existing.contains(*suffix))
        .collect();
    doomed.sort_by(|a, b| a.0.cmp(b.0));

    info!(
        prefix = %mapping.project_prefix,
        branches = ?doomed.iter().map(|(suffix, _)| suffix.as_str()).collect::<Vec<_>>(),
        "branches to delete"
    );
    for (suffix, project) in doomed {
        let response = server.delete_project(&project.id)?;
        info!(branch = %suffix, key = %project.key, response = %response, "deleted stale project");
    }
    Ok(())
}

/// Run every mapping entry in order. The first failing entry aborts the
/// remainder after logging; partial progress on earlier entries stands.
pub fn run_sync(
    server: &dyn GateServer,
    source: &dyn BranchSource,
    mappings: &[RepoMapping],
) -> Result<(), GateError> {
    for mapping in mappings {
        if let Err(err) = reconcile_branches(server, source, mapping) {
            error!(prefix = %mapping.project_prefix, error = %err, "branch sync failed");
            return Err(err);
        }
    }
    Ok(())
}

/// Tracked projects under the prefix, keyed by branch suffix. Every
/// `"<prefix>:"` occurrence is stripped, as historical keys may carry the
/// prefix twice; the last project wins on duplicate suffixes.
fn tracked_branches(
    server: &dyn GateServer,
    prefix: &str,
) -> Result<HashMap<String, TrackedProject>, GateError> {
    let marker = format!("{prefix}:");
    let mut by_suffix = HashMap::new();
    for project in server.tracked_projects()? {
        if project.key.starts_with(prefix) {
            let suffix = project.key.replace(&marker, "");
            by_suffix.insert(suffix, project);
        }
    }
    Ok(by_suffix)
}

/// Branch names still present on the repository host, in both raw and
/// sanitized spelling: historical projects may be keyed under either.
fn existing_branches(
    source: &dyn BranchSource,
    listing_url: &str,
) -> Result<HashSet<String>, GateError> {
    let mut names = HashSet::new();
    for branch in source.branches(listing_url)? {
        names.insert(sanitize_branch(&branch.display_id));
        names.insert(branch.display_id);
    }
    Ok(names)
}

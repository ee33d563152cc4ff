//! Local VCS collaborator: asks git for the current branch name.

use std::process::Command;

use tracing::info;

use qgate_core::errors::GitError;

/// Current branch of the working tree, or an empty string when git
/// reports none. Process-level failures wrap into [`GitError`].
pub fn current_branch() -> Result<String, GitError> {
    let output = Command::new("git")
        .args(["rev-parse", "--abbrev-ref", "HEAD"])
        .output()?;
    let name = String::from_utf8_lossy(&output.stdout)
        .lines()
        .next()
        .unwrap_or("")
        .trim()
        .to_string();
    info!(branch = %name, "resolved git branch");
    Ok(name)
}

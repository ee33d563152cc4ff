//! Project-key composition and branch-name sanitizing.

/// Compose the key the gate service tracks a project under.
///
/// Base form is `group:artifact`. An explicit override replaces that
/// prefix wholesale; a non-blank branch name is appended as a third
/// segment. The result is never blank.
pub fn compose_project_key(
    group: &str,
    artifact: &str,
    key_override: Option<&str>,
    branch: Option<&str>,
) -> String {
    let mut key = match key_override.filter(|k| !k.trim().is_empty()) {
        Some(k) => k.to_string(),
        None => format!("{group}:{artifact}"),
    };
    if let Some(branch) = branch.filter(|b| !b.trim().is_empty()) {
        key.push(':');
        key.push_str(branch);
    }
    key
}

/// Replace path separators so a branch name is safe as a key segment.
pub fn sanitize_branch(name: &str) -> String {
    name.replace('/', "-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composes_group_and_artifact() {
        assert_eq!(compose_project_key("be.viae", "gate", None, None), "be.viae:gate");
    }

    #[test]
    fn appends_non_blank_branch() {
        assert_eq!(
            compose_project_key("be.viae", "gate", None, Some("develop")),
            "be.viae:gate:develop"
        );
        assert_eq!(
            compose_project_key("be.viae", "gate", None, Some("  ")),
            "be.viae:gate"
        );
    }

    #[test]
    fn override_replaces_the_prefix_entirely() {
        assert_eq!(
            compose_project_key("be.viae", "gate", Some("custom:key"), Some("develop")),
            "custom:key:develop"
        );
        // A blank override is no override.
        assert_eq!(
            compose_project_key("be.viae", "gate", Some(""), None),
            "be.viae:gate"
        );
    }

    #[test]
    fn sanitize_replaces_path_separators() {
        assert_eq!(sanitize_branch("feature/login"), "feature-login");
        assert_eq!(sanitize_branch("master"), "master");
    }
}

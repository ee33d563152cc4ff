//! Configuration surface shared by the CLI and the engine.

use std::str::FromStr;
use std::time::Duration;

/// Sleep between freshness polls while waiting for new analysis results.
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Best-effort wait after creating a project, for the creation to
/// propagate server-side. Not a poll; see the reconciler.
pub const CREATION_SETTLE: Duration = Duration::from_secs(10);

/// Default wall-clock budget for the freshness wait, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 500;

/// Quality-gate server endpoint plus credentials, passed per call.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub url: String,
    pub login: String,
    pub password: String,
}

/// Credentials for the repository host's branch-listing API.
#[derive(Debug, Clone)]
pub struct RepoCredentials {
    pub login: String,
    pub password: String,
}

/// One entry of the branch-sync mapping: every tracked project whose key
/// starts with `project_prefix` is reconciled against the branches at
/// `branch_listing_url`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoMapping {
    pub project_prefix: String,
    pub branch_listing_url: String,
}

#[derive(Debug, thiserror::Error)]
#[error("invalid repo mapping '{0}', expected <project-prefix>=<branch-listing-url>")]
pub struct RepoMappingParseError(String);

impl FromStr for RepoMapping {
    type Err = RepoMappingParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('=') {
            Some((prefix, url)) if !prefix.trim().is_empty() && !url.trim().is_empty() => {
                Ok(RepoMapping {
                    project_prefix: prefix.trim().to_string(),
                    branch_listing_url: url.trim().to_string(),
                })
            }
            _ => Err(RepoMappingParseError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_prefix_and_url() {
        let mapping: RepoMapping = "be.viae:gate=https://repo/rest/branches".parse().unwrap();
        assert_eq!(mapping.project_prefix, "be.viae:gate");
        assert_eq!(mapping.branch_listing_url, "https://repo/rest/branches");
    }

    #[test]
    fn url_may_itself_contain_equals_signs() {
        let mapping: RepoMapping = "p=https://repo/branches?limit=100".parse().unwrap();
        assert_eq!(mapping.branch_listing_url, "https://repo/branches?limit=100");
    }

    #[test]
    fn rejects_entries_without_both_halves() {
        assert!("just-a-prefix".parse::<RepoMapping>().is_err());
        assert!("=https://repo".parse::<RepoMapping>().is_err());
        assert!("prefix=".parse::<RepoMapping>().is_err());
    }
}

#![forbid(unsafe_code)]

use std::process::ExitCode;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use qgate_client::{HttpBranchSource, HttpGateServer};
use qgate_core::config::{RepoCredentials, RepoMapping, ServerConfig, DEFAULT_TIMEOUT_SECS};
use qgate_core::key::{compose_project_key, sanitize_branch};
use qgate_core::types::parse_timestamp;
use qgate_engine::retry::Pacing;
use qgate_engine::{git, link, sync, validate};

#[derive(Parser)]
#[command(
    name = "qg",
    version,
    about = "Break builds on failed quality gates; keep gate projects in sync with git."
)]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Validate a project against its linked quality gate; non-zero exit
    /// when the gate is not met.
    Validate {
        #[command(flatten)]
        server: ServerArgs,

        #[command(flatten)]
        key: KeyArgs,

        /// Name of the quality gate to enforce.
        #[arg(long)]
        gate: String,

        /// Only accept analysis results newer than this instant
        /// (ISO-8601 date-time). Omit to evaluate the current verdict.
        #[arg(long)]
        execution_start: Option<String>,

        /// Wall-clock budget for waiting on fresh results, in seconds.
        #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
        timeout_secs: u64,
    },

    /// Create the project if needed and bind it to a named quality gate.
    Link {
        #[command(flatten)]
        server: ServerArgs,

        #[command(flatten)]
        key: KeyArgs,

        /// Name of the quality gate to bind.
        #[arg(long)]
        gate: String,
    },

    /// Delete tracked project-branches whose git branches are gone.
    SyncBranches {
        #[command(flatten)]
        server: ServerArgs,

        /// Login for the repository host.
        #[arg(long)]
        repo_login: String,

        /// Password for the repository host.
        #[arg(long)]
        repo_password: String,

        /// Mapping entry <project-prefix>=<branch-listing-url>; repeatable.
        #[arg(long = "repo", required = true)]
        repos: Vec<String>,
    },

    /// Print the sanitized current git branch (empty when none).
    Branch,

    /// Print the last-analysis timestamp for a project, or now when the
    /// project has none; feed it back via --execution-start.
    ExecutionStart {
        #[command(flatten)]
        server: ServerArgs,

        #[command(flatten)]
        key: KeyArgs,
    },
}

#[derive(Args)]
struct ServerArgs {
    /// Quality-gate server base URL.
    #[arg(long)]
    server: String,

    /// Login for the quality-gate server.
    #[arg(long)]
    login: String,

    /// Password for the quality-gate server.
    #[arg(long)]
    password: String,
}

impl ServerArgs {
    fn into_config(self) -> ServerConfig {
        ServerConfig {
            url: self.server,
            login: self.login,
            password: self.password,
        }
    }
}

#[derive(Args)]
struct KeyArgs {
    /// Project group id (first key segment).
    #[arg(long)]
    group: Option<String>,

    /// Project artifact id (second key segment).
    #[arg(long)]
    artifact: Option<String>,

    /// Explicit project key, replacing group:artifact.
    #[arg(long)]
    project_key: Option<String>,

    /// Branch qualifier appended to the key.
    #[arg(long)]
    branch: Option<String>,
}

impl KeyArgs {
    fn compose(&self) -> Result<String> {
        if self.project_key.is_none() && (self.group.is_none() || self.artifact.is_none()) {
            bail!("supply either --project-key or both --group and --artifact");
        }
        let key = compose_project_key(
            self.group.as_deref().unwrap_or(""),
            self.artifact.as_deref().unwrap_or(""),
            self.project_key.as_deref(),
            self.branch.as_deref(),
        );
        info!(key = %key, "composed project key");
        Ok(key)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // Full cause chain; the pipeline halts on the exit code.
            error!("{err:?}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.cmd {
        Cmd::Validate {
            server,
            key,
            gate,
            execution_start,
            timeout_secs,
        } => cmd_validate(server, &key, &gate, execution_start.as_deref(), timeout_secs),

        Cmd::Link { server, key, gate } => cmd_link(server, &key, &gate),

        Cmd::SyncBranches {
            server,
            repo_login,
            repo_password,
            repos,
        } => cmd_sync_branches(server, repo_login, repo_password, &repos),

        Cmd::Branch => cmd_branch(),

        Cmd::ExecutionStart { server, key } => cmd_execution_start(server, &key),
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_validate(
    server: ServerArgs,
    key: &KeyArgs,
    gate: &str,
    execution_start: Option<&str>,
    timeout_secs: u64,
) -> Result<()> {
    let project_key = key.compose()?;
    let execution_start = execution_start
        .filter(|value| !value.trim().is_empty())
        .map(|value| {
            parse_timestamp(value).with_context(|| format!("invalid execution start '{value}'"))
        })
        .transpose()?;

    info!(server = %server.server, gate, "validate quality gate");
    let client = HttpGateServer::new(server.into_config());
    validate::validate(
        &client,
        &project_key,
        gate,
        execution_start,
        Duration::from_secs(timeout_secs),
        &Pacing::default(),
    )?;
    Ok(())
}

fn cmd_link(server: ServerArgs, key: &KeyArgs, gate: &str) -> Result<()> {
    let project_key = key.compose()?;
    info!(server = %server.server, gate, "link project to quality gate");
    let client = HttpGateServer::new(server.into_config());
    let project_id = link::ensure_linked(&client, &project_key, gate, &Pacing::default())?;
    info!(project_id, "project linked");
    Ok(())
}

fn cmd_sync_branches(
    server: ServerArgs,
    repo_login: String,
    repo_password: String,
    repos: &[String],
) -> Result<()> {
    let mappings = repos
        .iter()
        .map(|entry| entry.parse::<RepoMapping>())
        .collect::<Result<Vec<_>, _>>()?;

    info!(server = %server.server, entries = mappings.len(), "sync git branches");
    let client = HttpGateServer::new(server.into_config());
    let source = HttpBranchSource::new(RepoCredentials {
        login: repo_login,
        password: repo_password,
    });
    sync::run_sync(&client, &source, &mappings)?;
    Ok(())
}

fn cmd_branch() -> Result<()> {
    let branch = git::current_branch()?;
    println!("{}", sanitize_branch(&branch));
    Ok(())
}

fn cmd_execution_start(server: ServerArgs, key: &KeyArgs) -> Result<()> {
    let project_key = key.compose()?;
    let client = HttpGateServer::new(server.into_config());
    let stamp = validate::last_analysis_or_now(&client, &project_key)?;
    println!("{}", stamp.to_rfc3339());
    Ok(())
}

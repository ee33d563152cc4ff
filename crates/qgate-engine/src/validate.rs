//! Gate validation: wait for a fresh analysis result, then break on an
//! `ERROR` verdict.

use std::time::Duration;

use chrono::{DateTime, FixedOffset, Utc};
use tracing::{debug, info};

use qgate_core::errors::GateError;
use qgate_core::traits::GateServer;
use qgate_core::types::{GateEvaluation, Lookup};

use crate::link;
use crate::retry::{self, Pacing, WaitError};

/// Validate a project against its linked quality gate.
///
/// With an `execution_start`, first wait (bounded by `timeout`) until the
/// service reports an analysis newer than that instant and evaluation
/// data exists; without one, evaluate the current verdict immediately.
pub fn validate(
    server: &dyn GateServer,
    project_key: &str,
    gate_name: &str,
    execution_start: Option<DateTime<FixedOffset>>,
    timeout: Duration,
    pacing: &Pacing,
) -> Result<(), GateError> {
    if let Some(start) = execution_start {
        wait_for_fresh_results(server, project_key, gate_name, start, timeout, pacing)?;
    }
    evaluate_gate_state(server, project_key)
}

/// Poll until the last-analysis timestamp moves past `execution_start`
/// and gate-evaluation data is available.
fn wait_for_fresh_results(
    server: &dyn GateServer,
    project_key: &str,
    gate_name: &str,
    execution_start: DateTime<FixedOffset>,
    timeout: Duration,
    pacing: &Pacing,
) -> Result<(), GateError> {
    // The create-and-link recovery runs at most once per validation;
    // afterwards a missing project reads as "no timestamp yet".
    let mut recovered = false;
    let result = retry::wait_until(pacing.poll_interval, timeout, || {
        let last_run = last_analysis(server, project_key, gate_name, pacing, &mut recovered)?;
        let fresh = last_run.is_some_and(|stamp| stamp > execution_start);
        if !fresh {
            debug!(key = %project_key, ?last_run, "analysis not fresh yet");
            return Ok(false);
        }
        Ok(!server.gate_evaluation(project_key)?.is_missing())
    });
    match result {
        Ok(()) => Ok(()),
        Err(WaitError::Budget { elapsed }) => Err(GateError::Timeout { elapsed }),
        Err(WaitError::Probe(err)) => Err(err),
    }
}

fn last_analysis(
    server: &dyn GateServer,
    project_key: &str,
    gate_name: &str,
    pacing: &Pacing,
    recovered: &mut bool,
) -> Result<Option<DateTime<FixedOffset>>, GateError> {
    match server.resource(project_key)? {
        Lookup::Found(metadata) => Ok(metadata.last_analysis),
        Lookup::Missing if !*recovered => {
            *recovered = true;
            info!(key = %project_key, "project not tracked yet, creating and linking it");
            link::ensure_linked(server, project_key, gate_name, pacing)?;
            Ok(server
                .resource(project_key)?
                .found()
                .and_then(|metadata| metadata.last_analysis))
        }
        Lookup::Missing => Ok(None),
    }
}

/// Fetch the current verdict and fail on an `ERROR` level. No evaluation
/// data, a blank payload, or any other level is a pass.
pub fn evaluate_gate_state(server: &dyn GateServer, project_key: &str) -> Result<(), GateError> {
    let evaluation = match server.gate_evaluation(project_key)? {
        Lookup::Found(evaluation) => evaluation,
        Lookup::Missing => {
            debug!(key = %project_key, "no gate evaluation data, nothing to enforce");
            return Ok(());
        }
    };
    if evaluation.is_error_level() {
        return Err(GateError::GateNotMet {
            report: render_report(&evaluation),
        });
    }
    info!(key = %project_key, level = ?evaluation.level, "quality gate met");
    Ok(())
}

/// The project's last-analysis timestamp, or the current time when the
/// project or its timestamp is not known yet. Pipelines record this
/// before triggering an analysis and pass it back as `execution_start`.
pub fn last_analysis_or_now(
    server: &dyn GateServer,
    project_key: &str,
) -> Result<DateTime<FixedOffset>, GateError> {
    let last = server
        .resource(project_key)?
        .found()
        .and_then(|metadata| metadata.last_analysis);
    Ok(last.unwrap_or_else(|| Utc::now().fixed_offset()))
}

// Literal failure-report contract: downstream tooling greps for these
// exact lines.
fn render_report(evaluation: &GateEvaluation) -> String {
    let mut lines = vec![
        String::new(),
        "############################".to_string(),
        "############################".to_string(),
        "### quality gate not met ###".to_string(),
        "############################".to_string(),
        "############################".to_string(),
    ];
    match &evaluation.conditions {
        Some(conditions) if !conditions.is_empty() => {
            lines.push("Conditions:".to_string());
            for condition in conditions {
                lines.push(condition.to_string());
            }
        }
        _ => lines.push("no condition details in response".to_string()),
    }
    lines.join("\n")
}

//! Sequential driver over the normalized file-spec sequence
//!
//! Processes entries strictly in order, folding every per-file failure
//! into result data; only request decoding aborts a run. Two entries
//! naming the same path are processed independently, last writer wins.

use crate::evaluate::{self, ComplianceIssue};
use crate::inspect;
use crate::remediate;
use crate::report::{FileResult, FixOutcome, Response, Status};
use crate::request::Request;

/// Run a request to completion and aggregate the response.
pub fn run(request: &Request) -> Response {
    let mut files_checked = 0;
    let mut files_fixed = 0;
    let mut compliance_issues = Vec::new();
    let mut details = Vec::new();
    let mut any_fix_failed = false;
    let mut any_unresolved = false;

    for spec in &request.files {
        if spec.path.is_empty() {
            tracing::debug!("skipping entry with empty path");
            continue;
        }
        files_checked += 1;

        let inspection = inspect::inspect(spec);
        let issues = evaluate::evaluate(spec, &inspection);
        if issues.is_empty() {
            tracing::debug!(path = %spec.path, "compliant");
            details.push(FileResult {
                path: spec.path.clone(),
                compliant: true,
                issues,
                outcome: FixOutcome::NotAttempted,
            });
            continue;
        }

        tracing::debug!(path = %spec.path, issues = issues.len(), "non-compliant");
        // The aggregate reflects what was found, including issues fixed
        // later in this same run.
        compliance_issues.extend(issues.iter().map(ComplianceIssue::to_string));

        if request.check_only {
            any_unresolved = true;
            details.push(FileResult {
                path: spec.path.clone(),
                compliant: false,
                issues,
                outcome: FixOutcome::NotAttempted,
            });
            continue;
        }

        let steps = remediate::plan(spec, &issues);
        match remediate::execute(spec, &steps) {
            Ok(fixes) => {
                if issues.iter().all(ComplianceIssue::fixable) {
                    files_fixed += 1;
                } else {
                    // Check errors have no corrective step; the entry stays
                    // unresolved even though no fix failed.
                    any_unresolved = true;
                }
                details.push(FileResult {
                    path: spec.path.clone(),
                    compliant: false,
                    issues,
                    outcome: FixOutcome::Applied(fixes),
                });
            }
            Err(error) => {
                tracing::warn!(path = %spec.path, error = %error, "remediation failed");
                any_fix_failed = true;
                details.push(FileResult {
                    path: spec.path.clone(),
                    compliant: false,
                    issues,
                    outcome: FixOutcome::Failed(error),
                });
            }
        }
    }

    let status = if any_fix_failed {
        Status::PartialFailure
    } else if any_unresolved {
        Status::NonCompliant
    } else {
        Status::Success
    };

    tracing::info!(
        status = status.as_str(),
        files_checked,
        files_fixed,
        issues_found = compliance_issues.len(),
        "run complete"
    );

    Response {
        status,
        files_checked,
        files_fixed,
        compliance_issues,
        details,
    }
}

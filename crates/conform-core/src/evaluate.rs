//! Compliance evaluation
//!
//! Pure comparison of a file spec against the inspected state. Checks run
//! in a fixed order (existence, mode, owner, group, content) so issue
//! lists are deterministic and mirror the remediation order. A missing
//! file short-circuits to a single `file_missing` issue.

use std::fmt;

use crate::inspect::{Attributes, ContentCheck, Inspection, MODE_MASK};
use crate::request::FileSpec;

/// A specific detected deviation from a file spec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComplianceIssue {
    FileMissing,
    ModeMismatch { current: String, required: String },
    OwnerMismatch { current: String, required: String },
    GroupMismatch { current: String, required: String },
    ContentMismatch,
    StatFailed,
    ContentSourceReadError,
    ContentReadError,
}

impl ComplianceIssue {
    /// Whether a remediation step exists for this issue.
    ///
    /// Check errors (stat and read failures) have no corrective action;
    /// they leave an entry unresolved even after a fixing run.
    pub fn fixable(&self) -> bool {
        !matches!(
            self,
            Self::StatFailed | Self::ContentSourceReadError | Self::ContentReadError
        )
    }
}

impl fmt::Display for ComplianceIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileMissing => f.write_str("file_missing"),
            Self::ModeMismatch { current, required } => {
                write!(f, "mode_mismatch: current={current}, required={required}")
            }
            Self::OwnerMismatch { current, required } => {
                write!(f, "owner_mismatch: current={current}, required={required}")
            }
            Self::GroupMismatch { current, required } => {
                write!(f, "group_mismatch: current={current}, required={required}")
            }
            Self::ContentMismatch => f.write_str("content_mismatch"),
            Self::StatFailed => f.write_str("stat_failed"),
            Self::ContentSourceReadError => f.write_str("content_source_read_error"),
            Self::ContentReadError => f.write_str("content_read_error"),
        }
    }
}

/// Evaluate a spec against the inspected state.
///
/// Only dimensions with a value in the spec are checked. The entry is
/// compliant exactly when the returned list is empty.
pub fn evaluate(spec: &FileSpec, inspection: &Inspection) -> Vec<ComplianceIssue> {
    let (attrs, content) = match inspection {
        Inspection::Missing => return vec![ComplianceIssue::FileMissing],
        Inspection::StatFailed => return vec![ComplianceIssue::StatFailed],
        Inspection::Present { attrs, content } => (attrs, content),
    };

    let mut issues = Vec::new();
    check_mode(spec, attrs, &mut issues);
    if let Some(required) = spec.owner.as_deref() {
        if attrs.owner != required {
            issues.push(ComplianceIssue::OwnerMismatch {
                current: attrs.owner.clone(),
                required: required.to_string(),
            });
        }
    }
    if let Some(required) = spec.group.as_deref() {
        if attrs.group != required {
            issues.push(ComplianceIssue::GroupMismatch {
                current: attrs.group.clone(),
                required: required.to_string(),
            });
        }
    }
    match content {
        Some(ContentCheck::Mismatch) => issues.push(ComplianceIssue::ContentMismatch),
        Some(ContentCheck::SourceUnreadable) => {
            issues.push(ComplianceIssue::ContentSourceReadError);
        }
        Some(ContentCheck::TargetUnreadable) => issues.push(ComplianceIssue::ContentReadError),
        Some(ContentCheck::Match) | None => {}
    }
    issues
}

fn check_mode(spec: &FileSpec, attrs: &Attributes, issues: &mut Vec<ComplianceIssue>) {
    let Some(required) = spec.mode.as_deref() else {
        return;
    };
    // An unparseable required mode can never match; remediation reports it
    // as a hard fix failure.
    let matches = u32::from_str_radix(required, 8)
        .map(|bits| bits & MODE_MASK == attrs.mode)
        .unwrap_or(false);
    if !matches {
        issues.push(ComplianceIssue::ModeMismatch {
            current: format!("{:o}", attrs.mode),
            required: required.to_string(),
        });
    }
}

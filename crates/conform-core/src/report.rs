//! Result model and its canonical encoding
//!
//! The response object is built in one fixed key order so encoded output
//! is reproducible run to run and byte-comparable in tests. Counts are
//! integers and flags are booleans; the value tree carries that
//! distinction in its variants, nothing is inferred from numeric values.

use conform_codec::Value;

use crate::evaluate::ComplianceIssue;
use crate::remediate::{FixError, FixKind};

/// Overall run outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Everything compliant, or every issue fully remediated.
    Success,
    /// Issues found and left standing (check-only run or unfixable).
    NonCompliant,
    /// At least one fix attempt failed.
    PartialFailure,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::NonCompliant => "non_compliant",
            Self::PartialFailure => "partial_failure",
        }
    }
}

/// What remediation did for one entry, if it ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixOutcome {
    /// Remediation was not attempted (compliant entry or check-only run).
    NotAttempted,
    /// Every step succeeded; the fixes applied, in order.
    Applied(Vec<FixKind>),
    /// A step failed. Earlier fixes stayed on disk but only the error is
    /// reported; `fixes_applied` and `error` are mutually exclusive.
    Failed(FixError),
}

/// Per-entry result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileResult {
    pub path: String,
    pub compliant: bool,
    pub issues: Vec<ComplianceIssue>,
    pub outcome: FixOutcome,
}

impl FileResult {
    fn to_value(&self) -> Value {
        let mut members = vec![
            ("path".to_string(), Value::from(self.path.as_str())),
            ("compliant".to_string(), Value::Bool(self.compliant)),
            (
                "issues".to_string(),
                Value::Array(
                    self.issues
                        .iter()
                        .map(|issue| Value::String(issue.to_string()))
                        .collect(),
                ),
            ),
        ];
        match &self.outcome {
            FixOutcome::NotAttempted => {}
            FixOutcome::Applied(fixes) => members.push((
                "fixes_applied".to_string(),
                Value::Array(fixes.iter().map(|k| Value::from(k.as_str())).collect()),
            )),
            FixOutcome::Failed(error) => members.push((
                "error".to_string(),
                Value::Object(vec![
                    ("type".to_string(), Value::from(error.kind())),
                    ("message".to_string(), Value::String(error.to_string())),
                ]),
            )),
        }
        Value::Object(members)
    }
}

/// Aggregated run response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: Status,
    /// Count of entries with a non-empty path.
    pub files_checked: i64,
    /// Count of entries whose remediation fully succeeded.
    pub files_fixed: i64,
    /// In-order concatenation of every non-compliant entry's issue strings.
    pub compliance_issues: Vec<String>,
    /// One result per processed entry, in processing order.
    pub details: Vec<FileResult>,
}

impl Response {
    /// Build the canonical value tree, keys in fixed order.
    pub fn to_value(&self) -> Value {
        Value::Object(vec![
            ("status".to_string(), Value::from(self.status.as_str())),
            ("files_checked".to_string(), Value::Int(self.files_checked)),
            ("files_fixed".to_string(), Value::Int(self.files_fixed)),
            (
                "compliance_issues".to_string(),
                Value::Array(
                    self.compliance_issues
                        .iter()
                        .map(|issue| Value::from(issue.as_str()))
                        .collect(),
                ),
            ),
            (
                "details".to_string(),
                Value::Array(self.details.iter().map(FileResult::to_value).collect()),
            ),
        ])
    }

    /// Encode to the deterministic wire form.
    pub fn encode(&self) -> String {
        conform_codec::encode(&self.to_value())
    }
}

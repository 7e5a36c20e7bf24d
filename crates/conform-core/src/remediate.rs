//! Remediation of compliance issues
//!
//! Derives an explicit ordered plan from an entry's issue list and applies
//! it step by step. The sequence (create, content, permissions, ownership)
//! is fixed and idempotent. The first failing step stops the remaining
//! steps for that entry; prior successful fixes are kept, not rolled back.

use std::fmt;
use std::fs::{self, OpenOptions, Permissions};
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use crate::content;
use crate::evaluate::ComplianceIssue;
use crate::identity;
use crate::inspect::MODE_MASK;
use crate::request::FileSpec;

/// A specific remediation action applied to a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixKind {
    CreatedFile,
    WroteContent,
    FixedContent,
    FixedPermissions,
    FixedOwner,
    FixedGroup,
}

impl FixKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreatedFile => "created_file",
            Self::WroteContent => "wrote_content",
            Self::FixedContent => "fixed_content",
            Self::FixedPermissions => "fixed_permissions",
            Self::FixedOwner => "fixed_owner",
            Self::FixedGroup => "fixed_group",
        }
    }
}

impl fmt::Display for FixKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed remediation step.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FixError {
    #[error("failed to create {path}: {message}")]
    CreateFailed { path: String, message: String },

    #[error("failed to write {path}: {message}")]
    WriteFailed { path: String, message: String },

    #[error("invalid mode {mode:?}: not an octal permission value")]
    InvalidMode { mode: String },

    #[error("failed to set permissions on {path}: {message}")]
    ChmodFailed { path: String, message: String },

    #[error("unknown owner {name:?}")]
    UnknownOwner { name: String },

    #[error("unknown group {name:?}")]
    UnknownGroup { name: String },

    #[error("failed to change ownership of {path}: {message}")]
    ChownFailed { path: String, message: String },
}

impl FixError {
    /// Stable identifier carried in the response's error object.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::CreateFailed { .. } => "create_failed",
            Self::WriteFailed { .. } => "write_failed",
            Self::InvalidMode { .. } => "invalid_mode",
            Self::ChmodFailed { .. } => "chmod_failed",
            Self::UnknownOwner { .. } | Self::UnknownGroup { .. } => "unknown_identity",
            Self::ChownFailed { .. } => "chown_failed",
        }
    }
}

/// One step of a remediation plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixStep {
    /// Create an empty file at the path.
    CreateFile,
    /// Overwrite content; `populate` marks a just-created file.
    WriteContent { populate: bool },
    /// Parse and apply the spec's mode.
    SetMode,
    /// Resolve and apply requested owner/group in one call.
    ApplyOwnership,
}

/// Derive the ordered remediation plan for an entry.
///
/// A missing file evaluates to the single `file_missing` issue, so the
/// content and permission steps also trigger on creation: one fixing run
/// must leave every requested dimension settled. Ownership is planned
/// whenever an owner or group was requested, not only on a flagged
/// mismatch: the step is total and repeat applications are no-ops, which
/// keeps the sequence idempotent.
pub fn plan(spec: &FileSpec, issues: &[ComplianceIssue]) -> Vec<FixStep> {
    if issues.is_empty() {
        return Vec::new();
    }
    let missing = issues
        .iter()
        .any(|i| matches!(i, ComplianceIssue::FileMissing));
    let content_mismatch = issues
        .iter()
        .any(|i| matches!(i, ComplianceIssue::ContentMismatch));
    let mode_mismatch = issues
        .iter()
        .any(|i| matches!(i, ComplianceIssue::ModeMismatch { .. }));

    let mut steps = Vec::new();
    if missing {
        steps.push(FixStep::CreateFile);
    }
    if content_mismatch || missing {
        steps.push(FixStep::WriteContent { populate: missing });
    }
    if spec.mode.is_some() && (mode_mismatch || missing) {
        steps.push(FixStep::SetMode);
    }
    if spec.owner.is_some() || spec.group.is_some() {
        steps.push(FixStep::ApplyOwnership);
    }
    steps
}

/// Execute a remediation plan, returning the fixes applied in order.
///
/// # Errors
///
/// Returns the first step failure. Earlier fixes stay applied; later steps
/// are not attempted.
pub fn execute(spec: &FileSpec, steps: &[FixStep]) -> Result<Vec<FixKind>, FixError> {
    let path = Path::new(&spec.path);
    let mut applied = Vec::new();
    for step in steps {
        match step {
            FixStep::CreateFile => {
                create_file(path)?;
                applied.push(FixKind::CreatedFile);
            }
            FixStep::WriteContent { populate } => {
                if let Some(kind) = write_content(spec, path, *populate)? {
                    applied.push(kind);
                }
            }
            FixStep::SetMode => {
                set_mode(spec, path)?;
                applied.push(FixKind::FixedPermissions);
            }
            FixStep::ApplyOwnership => apply_ownership(spec, path, &mut applied)?,
        }
    }
    Ok(applied)
}

fn create_file(path: &Path) -> Result<(), FixError> {
    tracing::debug!(path = %path.display(), "creating empty file");
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)
        .map(|_| ())
        .map_err(|e| FixError::CreateFailed {
            path: path.display().to_string(),
            message: e.to_string(),
        })
}

fn write_content(spec: &FileSpec, path: &Path, populate: bool) -> Result<Option<FixKind>, FixError> {
    let target = content::resolve(spec).map_err(|e| FixError::WriteFailed {
        path: path.display().to_string(),
        message: format!("resolving content source: {e}"),
    })?;
    // A spec with no content requirement never assigns a body.
    let Some(target) = target else {
        return Ok(None);
    };
    tracing::debug!(path = %path.display(), "overwriting content");
    target.write_to(path).map_err(|e| FixError::WriteFailed {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    Ok(Some(if populate {
        FixKind::WroteContent
    } else {
        FixKind::FixedContent
    }))
}

fn set_mode(spec: &FileSpec, path: &Path) -> Result<(), FixError> {
    let mode = spec.mode.as_deref().unwrap_or_default();
    let bits = u32::from_str_radix(mode, 8).map_err(|_| FixError::InvalidMode {
        mode: mode.to_string(),
    })?;
    tracing::debug!(path = %path.display(), mode, "setting permissions");
    fs::set_permissions(path, Permissions::from_mode(bits & MODE_MASK)).map_err(|e| {
        FixError::ChmodFailed {
            path: path.display().to_string(),
            message: e.to_string(),
        }
    })
}

fn apply_ownership(
    spec: &FileSpec,
    path: &Path,
    applied: &mut Vec<FixKind>,
) -> Result<(), FixError> {
    let uid = spec
        .owner
        .as_deref()
        .map(|name| {
            identity::uid_for_user(name).ok_or_else(|| FixError::UnknownOwner {
                name: name.to_string(),
            })
        })
        .transpose()?;
    let gid = spec
        .group
        .as_deref()
        .map(|name| {
            identity::gid_for_group(name).ok_or_else(|| FixError::UnknownGroup {
                name: name.to_string(),
            })
        })
        .transpose()?;
    tracing::debug!(path = %path.display(), ?uid, ?gid, "applying ownership");
    // Owner and group change in one call; `None` leaves that identity
    // unchanged.
    std::os::unix::fs::chown(path, uid, gid).map_err(|e| FixError::ChownFailed {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    if uid.is_some() {
        applied.push(FixKind::FixedOwner);
    }
    if gid.is_some() {
        applied.push(FixKind::FixedGroup);
    }
    Ok(())
}

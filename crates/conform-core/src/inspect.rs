//! Filesystem attribute inspection
//!
//! Reads the current state of a target path: permission bits, owning user
//! and group, and (when the spec carries a content requirement) a digest
//! comparison against the resolved target bytes. A missing path yields
//! [`Inspection::Missing`] and nothing else — the other dimensions are
//! meaningless without a file and are skipped, not reported.

use std::fs;
use std::io;
use std::os::unix::fs::MetadataExt;
use std::path::Path;

use crate::content;
use crate::digest;
use crate::identity;
use crate::request::FileSpec;

/// Permission bits relevant to compliance: rwx for user/group/other plus
/// setuid, setgid, and the sticky bit.
pub const MODE_MASK: u32 = 0o7777;

/// Observed state of a target path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inspection {
    /// The path does not exist.
    Missing,
    /// The path exists but its metadata could not be read.
    StatFailed,
    /// The path exists and was examined.
    Present {
        attrs: Attributes,
        content: Option<ContentCheck>,
    },
}

/// Metadata attributes of an existing file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attributes {
    /// Permission bits masked to [`MODE_MASK`].
    pub mode: u32,
    /// Owner name, or the numeric uid as a string when unmapped.
    pub owner: String,
    /// Group name, or the numeric gid as a string when unmapped.
    pub group: String,
}

/// Outcome of comparing current content against the resolved target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentCheck {
    Match,
    Mismatch,
    /// The required content source could not be read.
    SourceUnreadable,
    /// The file itself could not be read for comparison.
    TargetUnreadable,
}

/// Inspect the current state of a spec's target path.
pub fn inspect(spec: &FileSpec) -> Inspection {
    let path = Path::new(&spec.path);
    let metadata = match fs::metadata(path) {
        Ok(md) => md,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(path = %spec.path, "target does not exist");
            return Inspection::Missing;
        }
        Err(e) => {
            tracing::warn!(path = %spec.path, error = %e, "stat failed");
            return Inspection::StatFailed;
        }
    };

    let uid = metadata.uid();
    let gid = metadata.gid();
    let attrs = Attributes {
        mode: metadata.mode() & MODE_MASK,
        owner: identity::user_for_uid(uid).unwrap_or_else(|| uid.to_string()),
        group: identity::group_for_gid(gid).unwrap_or_else(|| gid.to_string()),
    };

    let content = check_content(spec, path);
    Inspection::Present { attrs, content }
}

/// Compare current content against the spec's resolved target, if any.
///
/// Both sides go through digests, never a byte-for-byte comparison of two
/// in-memory payloads. A read failure on either side is its own finding
/// and does not imply a mismatch.
fn check_content(spec: &FileSpec, path: &Path) -> Option<ContentCheck> {
    let target = match content::resolve(spec) {
        Ok(Some(target)) => target,
        Ok(None) => return None,
        Err(_) => return Some(ContentCheck::SourceUnreadable),
    };
    let required = match target.digest() {
        Ok(d) => d,
        Err(_) => return Some(ContentCheck::SourceUnreadable),
    };
    let current = match digest::digest_file(path) {
        Ok(d) => d,
        Err(_) => return Some(ContentCheck::TargetUnreadable),
    };
    Some(if current == required {
        ContentCheck::Match
    } else {
        ContentCheck::Mismatch
    })
}

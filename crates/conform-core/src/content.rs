//! Target-content resolution shared by inspection and remediation
//!
//! `content_source` wins when its path currently exists; otherwise the
//! literal `content` applies. A resolved target that is empty counts as no
//! requirement at all: nothing is checked and nothing is written, which
//! keeps a fixing run idempotent.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;

use crate::digest;
use crate::request::FileSpec;

/// The authoritative content for a spec, once resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentTarget<'a> {
    /// Literal bytes from the spec.
    Literal(&'a str),
    /// An existing, non-empty source file whose current bytes govern.
    Source(&'a Path),
}

/// Resolve the content requirement of a spec.
///
/// Returns `Ok(None)` when the spec carries no content requirement. A
/// source path that does not currently exist is ignored in favor of the
/// literal content.
///
/// # Errors
///
/// Returns an error when the source exists but cannot be examined.
pub fn resolve(spec: &FileSpec) -> io::Result<Option<ContentTarget<'_>>> {
    if let Some(source) = spec.content_source.as_deref() {
        let path = Path::new(source);
        if path.exists() {
            let metadata = std::fs::metadata(path)?;
            if metadata.len() == 0 {
                return Ok(None);
            }
            return Ok(Some(ContentTarget::Source(path)));
        }
        tracing::debug!(source, "content_source absent, literal content governs");
    }
    match spec.content.as_deref() {
        Some(content) if !content.is_empty() => Ok(Some(ContentTarget::Literal(content))),
        _ => Ok(None),
    }
}

impl ContentTarget<'_> {
    /// Digest of the target bytes.
    ///
    /// # Errors
    ///
    /// Returns an error when a source file cannot be read.
    pub fn digest(&self) -> io::Result<String> {
        match self {
            Self::Literal(text) => Ok(digest::digest_bytes(text.as_bytes())),
            Self::Source(path) => digest::digest_file(path),
        }
    }

    /// Overwrite `dest` with the target bytes.
    ///
    /// Truncates in place so the destination keeps its inode and its
    /// permission bits; source bytes are streamed, not buffered whole.
    ///
    /// # Errors
    ///
    /// Returns an error when the source cannot be read or the destination
    /// cannot be written.
    pub fn write_to(&self, dest: &Path) -> io::Result<()> {
        match self {
            Self::Literal(text) => std::fs::write(dest, text),
            Self::Source(path) => {
                let mut reader = File::open(path)?;
                let mut writer = OpenOptions::new()
                    .write(true)
                    .create(true)
                    .truncate(true)
                    .open(dest)?;
                io::copy(&mut reader, &mut writer)?;
                Ok(())
            }
        }
    }
}

//! SHA-256 content digests
//!
//! Provides a single canonical digest format (`sha256:<hex>`) used for
//! content comparison. File digests stream through the hasher, so
//! comparing a large file never holds its payload in memory alongside the
//! target bytes.

use sha2::{Digest, Sha256};
use std::fs::File;
use std::io;
use std::path::Path;

/// Prefix for all digests produced by this module
const PREFIX: &str = "sha256:";

/// Compute the digest of in-memory bytes.
pub fn digest_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{}{:x}", PREFIX, hasher.finalize())
}

/// Compute the digest of a file's contents by streaming.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or read.
pub fn digest_file(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)?;
    Ok(format!("{}{:x}", PREFIX, hasher.finalize()))
}

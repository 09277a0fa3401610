// Cache path utilities.
// Locates the platform cache directory and maps cache keys to file names.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use sha2::{Digest, Sha256};

/// Namespace holding star cache entries.
pub const STARS_NAMESPACE: &str = "github-stars";

/// Get the base cache directory (~/.cache/starboard on Linux).
pub fn cache_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "starboard").map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Directory for a named cache namespace.
pub fn namespace_dir(namespace: &str) -> Option<PathBuf> {
    cache_dir().map(|dir| dir.join(sanitize_name(namespace)))
}

/// Longest sanitized key kept verbatim as a file stem. Leaves room for the
/// extension and temp-file suffix under the 255-byte file name limit.
const MAX_STEM_LEN: usize = 200;

/// Path of the file holding `key` inside a namespace directory.
///
/// Keys too long for a file name are stored under their SHA-256 digest.
pub fn entry_path(root: &Path, key: &str) -> PathBuf {
    let stem = sanitize_name(key);
    if stem.len() <= MAX_STEM_LEN {
        return root.join(format!("{stem}.json"));
    }

    let digest = hex::encode(Sha256::digest(key.as_bytes()));
    root.join(format!("sha256_{digest}.json"))
}

/// Sanitize a name for use in filesystem paths.
/// Replaces problematic characters with underscores.
fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            _ => c,
        })
        .collect()
}

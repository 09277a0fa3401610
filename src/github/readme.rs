// README retrieval helpers.
// Decodes contents-API payloads and rewrites relative links to absolute GitHub URLs.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::error::{Result, StarboardError};

/// Candidate README paths, tried in order.
pub const README_CANDIDATES: [&str; 6] = [
    "README.md",
    "README.rst",
    "README.txt",
    "readme.md",
    "readme.rst",
    "readme.txt",
];

/// Branch assumed when rewriting relative links.
pub const DEFAULT_BRANCH: &str = "main";

static IMAGE_LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"!\[([^\]]*)\]\(([^)\s]+)\)").expect("Invalid image link regex")
});

static DOC_LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[([^\]]+)\]\(([^)\s]+)\.md\)").expect("Invalid document link regex")
});

/// Decode base64 file content as returned by the contents API.
/// GitHub wraps the payload at 60 columns, so whitespace is ignored.
pub fn decode_content(encoded: &str) -> Result<String> {
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD
        .decode(compact)
        .map_err(|e| StarboardError::Decode(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| StarboardError::Decode(e.to_string()))
}

/// Whether a link target already points somewhere absolute.
fn is_absolute(target: &str) -> bool {
    target.contains("://")
        || target.starts_with("//")
        || target.starts_with('#')
        || target.starts_with("mailto:")
        || target.starts_with("data:")
}

fn relative_path(target: &str) -> &str {
    target.trim_start_matches("./").trim_start_matches('/')
}

/// Rewrite relative links in a Markdown README.
///
/// Images resolve through `raw_url`, linked `.md` documents through `blob_url`.
/// Both closures receive the repository-relative path.
pub fn rewrite_relative_links(
    content: &str,
    raw_url: impl Fn(&str) -> String,
    blob_url: impl Fn(&str) -> String,
) -> String {
    let content = IMAGE_LINK.replace_all(content, |caps: &Captures| {
        let target = &caps[2];
        if is_absolute(target) {
            caps[0].to_string()
        } else {
            format!("![{}]({})", &caps[1], raw_url(relative_path(target)))
        }
    });

    DOC_LINK
        .replace_all(&content, |caps: &Captures| {
            let target = &caps[2];
            if is_absolute(target) {
                caps[0].to_string()
            } else {
                let path = format!("{}.md", relative_path(target));
                format!("[{}]({})", &caps[1], blob_url(&path))
            }
        })
        .into_owned()
}

//! Lexical path canonicalization.
//!
//! Turns an arbitrary path into an absolute, normalized form without
//! touching the filesystem: no symlink resolution, no existence checks.
//! The whitelist only ever sees paths produced here.

use thiserror::Error;

/// A relative path used more `..` segments than its starting directory
/// has components.
///
/// The canonical behavior for *absolute* paths is to clamp at the root
/// (`/../../x` is `/x`). A relative path that climbs past the root is
/// reported instead of silently guessed at; `clamped` carries the
/// root-clamped form so the event can still be logged.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("path '{raw}' escapes the root of its working directory (clamps to '{clamped}')")]
pub struct EscapesRoot {
    /// The path as the caller supplied it.
    pub raw: String,
    /// Root-clamped canonical form.
    pub clamped: String,
}

/// Canonicalize `raw` against `current_dir`.
///
/// Relative inputs are anchored by prepending `current_dir` (which is
/// expected to be absolute). Segments are then processed in one pass:
/// empty and `.` segments are dropped, `..` pops the previous segment,
/// and `..` at the root of an absolute input is discarded since it
/// cannot escape the root. The result starts with `/`, contains no `.`
/// or `..` segments, no doubled separators, and no trailing separator
/// unless it is `/` itself.
///
/// Idempotent and O(input length).
pub fn normalize(raw: &str, current_dir: &str) -> Result<String, EscapesRoot> {
    let relative = !raw.starts_with('/');
    let joined;
    let full = if relative {
        joined = format!("{current_dir}/{raw}");
        joined.as_str()
    } else {
        raw
    };

    let mut stack: Vec<&str> = Vec::new();
    let mut clamped_at_root = false;
    for segment in full.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if stack.pop().is_none() {
                    clamped_at_root = true;
                }
            }
            other => stack.push(other),
        }
    }

    let canonical = if stack.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", stack.join("/"))
    };

    if relative && clamped_at_root {
        return Err(EscapesRoot {
            raw: raw.to_string(),
            clamped: canonical,
        });
    }
    Ok(canonical)
}

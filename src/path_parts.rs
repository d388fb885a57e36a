//! Validation and splitting of filesystem paths.
//!
//! Paths are forward slash separated and relative: no leading or trailing slash, no empty
//! segments and no `.` or `..` segments. The lone sentinel `.` names the root of a filesystem.
//! Any other character, backslashes and colons included, is an ordinary part of a name.
//!
//! # Example
//!
//! ```
//! use memfs::path_parts;
//!
//! assert!(path_parts::valid("a/b/c"));
//! assert!(path_parts::valid("."));
//! assert!(!path_parts::valid("/a"));
//! assert!(!path_parts::valid("a/../b"));
//!
//! assert_eq!(path_parts::split("a/b/c"), Some(("a/b", "c")));
//! assert_eq!(path_parts::split("c"), Some((".", "c")));
//! assert_eq!(path_parts::split("."), None);
//! ```

use crate::errors::{Error, Result};

/// The path naming the root directory.
pub const ROOT: &str = ".";

/// Reports whether `path` is a valid filesystem path.
pub fn valid(path: &str) -> bool {
    if path == ROOT {
        return true;
    }
    if path.is_empty() {
        return false;
    }
    path.split('/').all(|part| !part.is_empty() && part != "." && part != "..")
}

/// Returns `path` unchanged if it is valid, or `InvalidPath` otherwise.
pub fn validate(path: &str) -> Result<&str> {
    if valid(path) {
        Ok(path)
    } else {
        Err(Error::invalid_path(path))
    }
}

/// Reports whether `path` names the root directory.
pub fn is_root(path: &str) -> bool {
    path == ROOT
}

/// Returns an iterator over the segments of a validated path. The root has no segments.
pub fn parts(path: &str) -> impl Iterator<Item = &str> {
    let path = if is_root(path) { "" } else { path };
    path.split('/').filter(|part| !part.is_empty())
}

/// Splits a validated path into its parent directory path and its base name.
///
/// The parent of a top level name is the root `.`; the root itself has no parent and returns
/// `None`.
pub fn split(path: &str) -> Option<(&str, &str)> {
    if is_root(path) {
        return None;
    }
    match path.rfind('/') {
        Some(at) => Some((&path[..at], &path[at + 1..])),
        None => Some((ROOT, path)),
    }
}

/// Joins a validated directory path and a relative path below it.
pub fn join(dir: &str, rel: &str) -> String {
    match (is_root(dir), is_root(rel)) {
        (true, _) => rel.to_string(),
        (false, true) => dir.to_string(),
        (false, false) => format!("{}/{}", dir, rel),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn validity() {
        for path in &[".", "a", "a/b", "a/b/c.txt", "..a", "a./b", ".hidden/x", "a\\b", "c:/x"] {
            assert!(valid(path), "{:?} should be valid", path);
        }
        for path in &["", "/", "/a", "a/", "a//b", "./a", "a/.", "a/..", ".."] {
            assert!(!valid(path), "{:?} should be invalid", path);
        }
        assert!(matches!(validate("/x"), Err(Error::InvalidPath(p)) if p == "/x"));
    }

    #[test]
    fn parts_and_split() {
        assert_eq!(parts(".").count(), 0);
        assert_eq!(parts("a/b/c").collect::<Vec<_>>(), vec!["a", "b", "c"]);

        assert_eq!(split("a"), Some((".", "a")));
        assert_eq!(split("a/b"), Some(("a", "b")));
        assert_eq!(split("a/b/c"), Some(("a/b", "c")));
        assert_eq!(split("."), None);
    }

    #[test]
    fn joins() {
        assert_eq!(join(".", "a/b"), "a/b");
        assert_eq!(join("a", "."), "a");
        assert_eq!(join("a/b", "c"), "a/b/c");
        assert_eq!(join(".", "."), ".");
    }
}

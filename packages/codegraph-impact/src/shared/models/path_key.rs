//! Canonical path keys
//!
//! Every graph key and every file reference crossing module boundaries is a
//! [`CanonicalPath`]: absolute, `/`-separated, lexically normalized (no `.` or
//! `..` segments) and case-folded on case-insensitive platforms. Paths are
//! normalized once at ingestion so lookups never need defensive reformatting.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

const CASE_INSENSITIVE_FS: bool = cfg!(any(windows, target_os = "macos"));

/// Canonical, forward-slash absolute path used as a map key
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalPath(String);

impl CanonicalPath {
    /// Canonicalize a path, absolutizing relative input against the current directory
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if is_absolute_like(&path.to_string_lossy()) {
            return Self(normalize(&path.to_string_lossy()));
        }
        match std::env::current_dir() {
            Ok(cwd) => Self::from_base(&cwd, path),
            Err(_) => Self(normalize(&path.to_string_lossy())),
        }
    }

    /// Canonicalize `path` relative to `base` (absolute paths ignore `base`)
    pub fn from_base(base: &Path, path: impl AsRef<Path>) -> Self {
        let raw = path.as_ref().to_string_lossy();
        if is_absolute_like(&raw) {
            return Self(normalize(&raw));
        }
        let joined = format!("{}/{}", base.to_string_lossy(), raw);
        Self(normalize(&joined))
    }

    /// Borrow the canonical key
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn to_path_buf(&self) -> PathBuf {
        PathBuf::from(&self.0)
    }

    /// Parent directory, `None` at the filesystem root
    pub fn parent(&self) -> Option<CanonicalPath> {
        let idx = self.0.rfind('/')?;
        let root_len = root_prefix_len(&self.0);
        if idx + 1 <= root_len {
            if self.0.len() > root_len {
                return Some(Self(self.0[..root_len].to_string()));
            }
            return None;
        }
        Some(Self(self.0[..idx].to_string()))
    }

    /// Join a relative (possibly `..`-containing) segment and renormalize
    pub fn join(&self, segment: &str) -> CanonicalPath {
        if is_absolute_like(segment) {
            return Self(normalize(segment));
        }
        Self(normalize(&format!("{}/{}", self.0, segment)))
    }

    pub fn file_name(&self) -> Option<&str> {
        self.0.rsplit('/').next().filter(|s| !s.is_empty())
    }

    pub fn extension(&self) -> Option<&str> {
        let name = self.file_name()?;
        let dot = name.rfind('.')?;
        if dot == 0 {
            return None;
        }
        Some(&name[dot + 1..])
    }

    /// Path-segment aware prefix test
    pub fn starts_with(&self, other: &CanonicalPath) -> bool {
        if self.0 == other.0 {
            return true;
        }
        let prefix = other.0.trim_end_matches('/');
        self.0.len() > prefix.len()
            && self.0.starts_with(prefix)
            && self.0.as_bytes()[prefix.len()] == b'/'
    }

    /// Path relative to `root`, if inside it
    pub fn relative_to(&self, root: &CanonicalPath) -> Option<&str> {
        if !self.starts_with(root) || self.0 == root.0 {
            return None;
        }
        let prefix = root.0.trim_end_matches('/');
        Some(&self.0[prefix.len() + 1..])
    }
}

impl fmt::Display for CanonicalPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CanonicalPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn is_absolute_like(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    raw.starts_with('/')
        || raw.starts_with('\\')
        || (bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':')
}

/// Length of the root prefix: `/` or `c:/`
fn root_prefix_len(s: &str) -> usize {
    let bytes = s.as_bytes();
    if bytes.len() >= 3 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' && bytes[2] == b'/' {
        3
    } else if s.starts_with('/') {
        1
    } else {
        0
    }
}

fn normalize(raw: &str) -> String {
    let unified = raw.replace('\\', "/");
    let bytes = unified.as_bytes();

    let (mut out, rest) = if bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' {
        (
            format!("{}:/", (bytes[0] as char).to_ascii_lowercase()),
            &unified[2..],
        )
    } else if unified.starts_with('/') {
        ("/".to_string(), &unified[1..])
    } else {
        (String::new(), unified.as_str())
    };

    let mut parts: Vec<&str> = Vec::new();
    for segment in rest.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            s => parts.push(s),
        }
    }
    out.push_str(&parts.join("/"));

    if CASE_INSENSITIVE_FS {
        out.to_lowercase()
    } else {
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalizes_dot_segments() {
        let p = CanonicalPath::new("/repo/src/./a/../b.ts");
        assert_eq!(p.as_str(), "/repo/src/b.ts");
    }

    #[test]
    fn test_backslashes_unified() {
        let a = CanonicalPath::new("/repo\\src\\b.ts");
        let b = CanonicalPath::new("/repo/src/b.ts");
        assert_eq!(a, b);
    }

    #[test]
    fn test_from_base_relative() {
        let p = CanonicalPath::from_base(Path::new("/repo/src"), "../lib/x.ts");
        assert_eq!(p.as_str(), "/repo/lib/x.ts");
    }

    #[test]
    fn test_parent_and_join() {
        let p = CanonicalPath::new("/repo/src/b.ts");
        let dir = p.parent().unwrap();
        assert_eq!(dir.as_str(), "/repo/src");
        assert_eq!(dir.join("./c").as_str(), "/repo/src/c");
        assert_eq!(CanonicalPath::new("/repo").parent().unwrap().as_str(), "/");
        assert!(CanonicalPath::new("/").parent().is_none());
    }

    #[test]
    fn test_starts_with_is_segment_aware() {
        let root = CanonicalPath::new("/repo/src");
        assert!(CanonicalPath::new("/repo/src/a.ts").starts_with(&root));
        assert!(!CanonicalPath::new("/repo/srcx/a.ts").starts_with(&root));
        assert_eq!(
            CanonicalPath::new("/repo/src/a/b.ts").relative_to(&root),
            Some("a/b.ts")
        );
    }

    #[test]
    fn test_extension() {
        assert_eq!(CanonicalPath::new("/r/a.test.ts").extension(), Some("ts"));
        assert_eq!(CanonicalPath::new("/r/.eslintrc").extension(), None);
    }
}

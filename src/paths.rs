//! Mapping of request URL paths onto the filesystem.
//!
//! The join is lexical: `..` segments pop components and may climb above the
//! root. Use [`ensure_within_root`] when that must be refused.

use std::path::{Component, Path, PathBuf};

use tracing::warn;

use crate::error::FileServerError;

/// Percent-decode `raw_url_path` and join it onto `root`.
///
/// A leading `/` does not make the request path absolute; `.` segments are
/// dropped and `..` segments remove the previous component.
pub fn resolve(raw_url_path: &str, root: &Path) -> Result<PathBuf, FileServerError> {
    let decoded = urlencoding::decode(raw_url_path)
        .map_err(|e| FileServerError::InvalidPath(format!("{raw_url_path}: {e}")))?;

    let mut result = root.to_path_buf();
    for component in Path::new(&*decoded).components() {
        match component {
            Component::Normal(name) => result.push(name),
            Component::ParentDir => {
                result.pop();
            }
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }

    Ok(result)
}

/// Containment check for a path produced by [`resolve`].
pub fn ensure_within_root(path: &Path, root: &Path) -> Result<(), FileServerError> {
    if path.starts_with(root) {
        Ok(())
    } else {
        warn!(
            "Path traversal attempt: {} is outside {}",
            path.display(),
            root.display()
        );
        Err(FileServerError::PathTraversal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_simple() {
        let root = PathBuf::from("/srv");
        assert_eq!(resolve("/a/b.txt", &root).unwrap(), PathBuf::from("/srv/a/b.txt"));
    }

    #[test]
    fn test_resolve_root() {
        let root = PathBuf::from("/srv");
        assert_eq!(resolve("/", &root).unwrap(), root);
        assert_eq!(resolve("", &root).unwrap(), root);
    }

    #[test]
    fn test_resolve_percent_decodes() {
        let root = PathBuf::from("/srv");
        assert_eq!(resolve("/a%20b.txt", &root).unwrap(), PathBuf::from("/srv/a b.txt"));
        assert_eq!(
            resolve("/caf%C3%A9/menu.pdf", &root).unwrap(),
            PathBuf::from("/srv/café/menu.pdf")
        );
    }

    #[test]
    fn test_resolve_trailing_slash() {
        let root = PathBuf::from("/srv");
        assert_eq!(resolve("/sub/", &root).unwrap(), PathBuf::from("/srv/sub"));
    }

    #[test]
    fn test_resolve_dot_segments() {
        let root = PathBuf::from("/srv");
        assert_eq!(resolve("/a/./b/../c.txt", &root).unwrap(), PathBuf::from("/srv/a/c.txt"));
    }

    #[test]
    fn test_resolve_can_leave_root() {
        // No containment here; the caller opts into ensure_within_root.
        let root = PathBuf::from("/srv/share");
        assert_eq!(resolve("/../../etc/passwd", &root).unwrap(), PathBuf::from("/etc/passwd"));
        assert_eq!(resolve("/%2e%2e/secret", &root).unwrap(), PathBuf::from("/srv/secret"));
    }

    #[test]
    fn test_resolve_invalid_utf8() {
        let root = PathBuf::from("/srv");
        assert!(matches!(resolve("/%ff%fe", &root), Err(FileServerError::InvalidPath(_))));
    }

    #[test]
    fn test_ensure_within_root() {
        let root = PathBuf::from("/srv/share");
        assert!(ensure_within_root(&PathBuf::from("/srv/share/a.txt"), &root).is_ok());
        assert!(ensure_within_root(&root, &root).is_ok());
        assert!(matches!(
            ensure_within_root(&PathBuf::from("/srv/secret"), &root),
            Err(FileServerError::PathTraversal)
        ));
        // prefix match is per component, not per character
        assert!(ensure_within_root(&PathBuf::from("/srv/share2/x"), &root).is_err());
    }
}

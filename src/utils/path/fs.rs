//! Path normalization utilities.
//!
//! Provides consistent path handling across the codebase:
//! - `absolutize` - lexical absolute path (no symlink resolution)
//! - `relative_path` - `os.path.relpath`-style relative path as a `/` string
//! - `common_prefix` / `parent_dir` - string-level helpers for input patterns

use std::path::{Component, Path, PathBuf};

/// Make a path absolute without touching the filesystem.
///
/// Relative paths are joined onto the current directory, then `.` segments
/// are dropped and `..` segments fold into their parent. Symlinks are not
/// resolved, so two different spellings of the same file only compare equal
/// when they are lexically equivalent.
///
/// # Example
/// ```ignore
/// let abs = absolutize(Path::new("out/./img/../app.css"));
/// assert!(abs.ends_with("out/app.css"));
/// ```
pub fn absolutize(path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
    };
    normalize_lexically(&joined)
}

/// Fold `.` and `..` segments without consulting the filesystem.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // `..` above the root stays at the root
                let leading_parent = matches!(out.components().next_back(), Some(Component::ParentDir));
                if leading_parent || (!out.pop() && !out.has_root()) {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Path of `path` relative to `base`, with `/` separators.
///
/// Both sides are absolutized first. Identical paths yield `"."`.
pub fn relative_path(path: &Path, base: &Path) -> String {
    let path = absolutize(path);
    let base = absolutize(base);
    let rel = pathdiff::diff_paths(&path, &base).unwrap_or(path);
    let rel = to_slash(&rel);
    if rel.is_empty() { ".".to_string() } else { rel }
}

/// Render a path with `/` separators regardless of platform.
pub fn to_slash(path: &Path) -> String {
    let mut parts = Vec::new();
    let mut rooted = false;
    for component in path.components() {
        match component {
            Component::RootDir => rooted = true,
            Component::Prefix(prefix) => parts.push(prefix.as_os_str().to_string_lossy().into_owned()),
            other => parts.push(other.as_os_str().to_string_lossy().into_owned()),
        }
    }
    let joined = parts.join("/");
    if rooted { format!("/{joined}") } else { joined }
}

/// Longest common leading substring of all inputs, compared char by char.
///
/// Works on raw strings, so the result may end in the middle of a path
/// segment (`["img/a.png", "img/b.png"]` gives `"img/"`).
pub fn common_prefix<S: AsRef<str>>(items: &[S]) -> String {
    let Some((first, rest)) = items.split_first() else {
        return String::new();
    };
    let first = first.as_ref();
    let mut end = first.len();
    for item in rest {
        let common = first
            .char_indices()
            .zip(item.as_ref().chars())
            .find(|((_, a), b)| a != b)
            .map_or_else(|| first.len().min(item.as_ref().len()), |((i, _), _)| i);
        end = end.min(common);
    }
    first[..end].to_string()
}

/// Directory part of a `/`-separated path string (`dirname`).
///
/// Returns `"."` when the path has no directory part.
pub fn parent_dir(path: &str) -> String {
    let head = match path.rfind('/') {
        Some(i) => &path[..=i],
        None => "",
    };
    let trimmed = head.trim_end_matches('/');
    if trimmed.is_empty() {
        if head.is_empty() { ".".to_string() } else { "/".to_string() }
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_lexically() {
        assert_eq!(
            normalize_lexically(Path::new("/out/./img/../app.css")),
            PathBuf::from("/out/app.css")
        );
        assert_eq!(normalize_lexically(Path::new("/..")), PathBuf::from("/"));
        assert_eq!(normalize_lexically(Path::new("a/../../b")), PathBuf::from("../b"));
    }

    #[test]
    fn test_absolutize_relative() {
        let abs = absolutize(Path::new("relative/./path/file.txt"));
        assert!(abs.is_absolute());
        assert!(abs.ends_with("relative/path/file.txt"));
    }

    #[test]
    fn test_relative_path() {
        assert_eq!(relative_path(Path::new("/a/b/c.css"), Path::new("/a")), "b/c.css");
        assert_eq!(relative_path(Path::new("/a/c.css"), Path::new("/a/b")), "../c.css");
        assert_eq!(relative_path(Path::new("/a/b"), Path::new("/a/b/")), ".");
    }

    #[test]
    fn test_common_prefix() {
        assert_eq!(common_prefix(&["img/a.png", "img/b.png"]), "img/");
        assert_eq!(common_prefix(&["img/*.png"]), "img/*.png");
        assert_eq!(common_prefix(&["css/x", "js/y"]), "");
        assert_eq!(common_prefix::<&str>(&[]), "");
        assert_eq!(common_prefix(&["styles", "styles/app.css"]), "styles");
    }

    #[test]
    fn test_parent_dir() {
        assert_eq!(parent_dir("img/*.png"), "img");
        assert_eq!(parent_dir("a/b/"), "a/b");
        assert_eq!(parent_dir("file.css"), ".");
        assert_eq!(parent_dir("/file.css"), "/");
        assert_eq!(parent_dir("out/im"), "out");
    }
}

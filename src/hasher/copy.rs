//! Timestamp-preserving copy with on-demand parent creation.

use std::fs;
use std::io;
use std::path::Path;

use filetime::FileTime;

use super::HashError;
use crate::logger::Logger;
use crate::{debug, log};

/// What [`copy_preserving`] ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyResult {
    Copied,
    /// Source and destination are the same file.
    SameFile,
    /// Source is a directory, nothing to copy.
    Directory,
}

/// Copy `src` to `dst` keeping access and modification times.
///
/// A missing destination directory is created and the copy retried once.
pub fn copy_preserving(src: &Path, dst: &Path, log: &Logger) -> Result<CopyResult, HashError> {
    if src.is_dir() {
        return Ok(CopyResult::Directory);
    }
    if is_same_file(src, dst) {
        debug!(log, "cp"; "won't copy '{}' to itself", src.display());
        return Ok(CopyResult::SameFile);
    }

    match copy_once(src, dst) {
        Err(e) if e.kind() == io::ErrorKind::NotFound && src.exists() => {
            let Some(parent) = dst.parent() else {
                return Err(HashError::copy(src, dst, e));
            };
            log!(log, "mkdir"; "-p {}", parent.display());
            fs::create_dir_all(parent).map_err(|source| HashError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
            copy_once(src, dst).map_err(|e| HashError::copy(src, dst, e))?;
        }
        Err(e) => return Err(HashError::copy(src, dst, e)),
        Ok(()) => {}
    }
    Ok(CopyResult::Copied)
}

fn copy_once(src: &Path, dst: &Path) -> io::Result<()> {
    fs::copy(src, dst)?;
    let meta = fs::metadata(src)?;
    filetime::set_file_times(
        dst,
        FileTime::from_last_access_time(&meta),
        FileTime::from_last_modification_time(&meta),
    )
}

/// Same path after normalization, or the same inode on unix (hard links).
fn is_same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    let (Ok(ma), Ok(mb)) = (fs::metadata(a), fs::metadata(b)) else {
        return false;
    };
    #[cfg(unix)]
    {
        use std::os::unix::fs::MetadataExt;
        ma.dev() == mb.dev() && ma.ino() == mb.ino()
    }
    #[cfg(not(unix))]
    {
        let _ = (ma, mb);
        matches!((a.canonicalize(), b.canonicalize()), (Ok(x), Ok(y)) if x == y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::Level;
    use tempfile::TempDir;

    #[test]
    fn test_copy_creates_parent_once() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("a.css");
        let dst = dir.path().join("out/deep/x.css");
        fs::write(&src, "body{}").unwrap();
        let (log, lines) = Logger::memory(Level::Info);

        assert_eq!(copy_preserving(&src, &dst, &log).unwrap(), CopyResult::Copied);
        assert_eq!(fs::read_to_string(&dst).unwrap(), "body{}");
        assert_eq!(lines.lock().len(), 1);
        assert!(lines.lock()[0].starts_with("[mkdir] -p"));
    }

    #[test]
    fn test_copy_preserves_mtime() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("a.css");
        let dst = dir.path().join("b.css");
        fs::write(&src, "body{}").unwrap();
        let past = FileTime::from_unix_time(1_000_000_000, 0);
        filetime::set_file_mtime(&src, past).unwrap();

        copy_preserving(&src, &dst, &Logger::memory(Level::Info).0).unwrap();
        let meta = fs::metadata(&dst).unwrap();
        assert_eq!(FileTime::from_last_modification_time(&meta), past);
    }

    #[test]
    fn test_same_file_and_directory() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("a.css");
        fs::write(&src, "body{}").unwrap();
        let log = Logger::memory(Level::Info).0;

        assert_eq!(copy_preserving(&src, &src, &log).unwrap(), CopyResult::SameFile);
        assert_eq!(copy_preserving(dir.path(), &dir.path().join("x"), &log).unwrap(), CopyResult::Directory);
    }

    #[cfg(unix)]
    #[test]
    fn test_hard_link_is_same_file() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("a.css");
        let link = dir.path().join("b.css");
        fs::write(&src, "body{}").unwrap();
        fs::hard_link(&src, &link).unwrap();

        let log = Logger::memory(Level::Info).0;
        assert_eq!(copy_preserving(&src, &link, &log).unwrap(), CopyResult::SameFile);
    }

    #[test]
    fn test_missing_source_is_fatal() {
        let dir = TempDir::new().unwrap();
        let log = Logger::memory(Level::Info).0;
        let err = copy_preserving(&dir.path().join("gone.css"), &dir.path().join("x.css"), &log).unwrap_err();
        assert!(matches!(err, HashError::Copy { .. }));
    }
}

//! Input discovery (reads the filesystem, no side effects).
//!
//! ```text
//! inputs: ["static/img", "static/css/*.css"]
//! base:   "static"
//!
//! static/css/app.css        -> css/app.css     (glob result)
//! static/img/logo.png       -> img/logo.png    (walked from static/img)
//! static/img/icons/a.svg    -> img/icons/a.svg (walked)
//! ```

use std::path::{Path, PathBuf};

use glob::Pattern;
use indexmap::IndexSet;
use jwalk::WalkDir;

use super::MapError;
use crate::debug;
use crate::logger::Logger;
use crate::utils::path::{common_prefix, parent_dir, to_slash};

/// Directory all map keys are relative to.
///
/// The longest common prefix of the raw input patterns, or its parent when
/// that prefix is not itself an existing directory.
pub fn base_dir<S: AsRef<str>>(inputs: &[S]) -> PathBuf {
    let prefix = common_prefix(inputs);
    if !prefix.is_empty() && Path::new(&prefix).is_dir() {
        PathBuf::from(prefix)
    } else {
        PathBuf::from(parent_dir(&prefix))
    }
}

/// Exclude patterns, glob-style and matched against whole discovered paths.
///
/// A pattern not ending in `*` gets one appended, so `static/vendor` acts
/// as a prefix match. `*` also crosses `/`.
#[derive(Debug, Clone, Default)]
pub struct ExcludeSet {
    patterns: Vec<Pattern>,
}

impl ExcludeSet {
    pub fn new<S: AsRef<str>>(excludes: &[S]) -> Result<Self, MapError> {
        let patterns = excludes
            .iter()
            .map(|raw| {
                let raw = raw.as_ref();
                let pattern = if raw.ends_with('*') { raw.to_string() } else { format!("{raw}*") };
                Pattern::new(&pattern).map_err(|source| MapError::Pattern { pattern, source })
            })
            .collect::<Result<_, _>>()?;
        Ok(Self { patterns })
    }

    pub fn is_excluded(&self, path: &Path) -> bool {
        let path = to_slash(path);
        self.patterns.iter().any(|p| p.matches(&path))
    }
}

/// Expand input patterns into files, in discovery order.
///
/// Glob results come first (files only), then the contents of every
/// matched directory in walk order. Duplicates keep their first position.
pub fn discover_files<S: AsRef<str>>(
    inputs: &[S],
    excludes: &ExcludeSet,
    log: &Logger,
) -> Result<Vec<PathBuf>, MapError> {
    let mut files = IndexSet::new();
    let mut dirs = Vec::new();

    for input in inputs {
        let input = input.as_ref();
        let paths = glob::glob(input).map_err(|source| MapError::Pattern {
            pattern: input.to_string(),
            source,
        })?;
        for entry in paths {
            match entry {
                Ok(path) if path.is_dir() => dirs.push(path),
                Ok(path) => {
                    files.insert(path);
                }
                Err(e) => debug!(log, "glob"; "skipping unreadable '{}': {}", e.path().display(), e.error()),
            }
        }
    }
    debug!(log, "glob"; "{} files, {} directories from {} patterns", files.len(), dirs.len(), inputs.len());

    for dir in &dirs {
        walk_files(dir, &mut files);
    }

    let before = files.len();
    files.retain(|path| !excludes.is_excluded(path));
    if files.len() != before {
        debug!(log, "exclude"; "evicted {} files", before - files.len());
    }

    Ok(files.into_iter().collect())
}

/// Recursively collect non-directory entries below `dir`, sorted per directory.
fn walk_files(dir: &Path, files: &mut IndexSet<PathBuf>) {
    let entries = WalkDir::new(dir)
        .sort(true)
        .skip_hidden(false)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| !e.file_type().is_dir());

    for entry in entries {
        files.insert(entry.path());
    }
}

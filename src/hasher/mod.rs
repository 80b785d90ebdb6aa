//! The hashing engine.
//!
//! Walks the asset map in order and brings each entry up to date:
//!
//! ```text
//! hash name ──fail──► skip (entry untouched)
//!     │
//!     ▼
//! previous output exists? ──same name──► unchanged
//!     │ different name: rm old, unset
//!     ▼
//! copy source → output/name (mkdir -p on demand)
//!     │
//!     ▼
//! record name
//! ```
//!
//! Files are processed strictly one at a time in map order.

mod copy;

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub use copy::{CopyResult, copy_preserving};

use crate::logger::Logger;
use crate::map::AssetMap;
use crate::rewrite::{RewriteRule, SourceFile};
use crate::utils::path::absolutize;
use crate::{debug, error, log};

/// Fatal errors that abort the run.
#[derive(Debug, Error)]
pub enum HashError {
    #[error("cannot copy `{}` to `{}`", from.display(), to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot create directory `{}`", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl HashError {
    fn copy(from: &Path, to: &Path, source: std::io::Error) -> Self {
        Self::Copy {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
            source,
        }
    }
}

/// What happened to one map entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    /// Output from a previous run is still current.
    Unchanged,
    Copied {
        /// A stale output was deleted from disk first.
        replaced: bool,
    },
    /// Map-only mode: name recorded, nothing copied.
    Recorded { replaced: bool },
    /// Source already is the destination; name recorded.
    SameFile { replaced: bool },
    /// Source could not be read; entry left as it was.
    Unreadable,
    /// Source is a directory; entry left unset.
    Directory,
}

/// Totals for a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub copied: usize,
    /// Stale outputs actually deleted.
    pub removed: usize,
    pub unchanged: usize,
    /// Recorded without copying (map-only or same file).
    pub recorded: usize,
    /// Unreadable sources and directories.
    pub skipped: usize,
}

impl RunStats {
    fn add(&mut self, outcome: FileOutcome) {
        let replaced = match outcome {
            FileOutcome::Unchanged => {
                self.unchanged += 1;
                false
            }
            FileOutcome::Copied { replaced } => {
                self.copied += 1;
                replaced
            }
            FileOutcome::Recorded { replaced } | FileOutcome::SameFile { replaced } => {
                self.recorded += 1;
                replaced
            }
            FileOutcome::Unreadable | FileOutcome::Directory => {
                self.skipped += 1;
                false
            }
        };
        if replaced {
            self.removed += 1;
        }
    }
}

/// Drives one run over a borrowed [`AssetMap`].
pub struct AssetHasher<'a> {
    map: &'a mut AssetMap,
    rule: &'a RewriteRule,
    map_only: bool,
    log: Logger,
}

impl<'a> AssetHasher<'a> {
    pub fn new(map: &'a mut AssetMap, rule: &'a RewriteRule, map_only: bool, log: Logger) -> Self {
        Self {
            map,
            rule,
            map_only,
            log,
        }
    }

    /// Process every key in map order.
    pub fn run(&mut self) -> Result<RunStats, HashError> {
        let mut stats = RunStats::default();
        for key in self.map.keys() {
            stats.add(self.process_file(&key)?);
        }
        Ok(stats)
    }

    /// Bring a single entry up to date.
    pub fn process_file(&mut self, key: &str) -> Result<FileOutcome, HashError> {
        let source = SourceFile::new(key, self.map.basedir());
        let hashed = match self.rule.apply(&source) {
            Ok(hashed) => hashed,
            Err(e) => {
                debug!(self.log, "hash"; "skipping '{}': {}", key, e);
                return Ok(FileOutcome::Unreadable);
            }
        };

        let src = absolutize(&self.map.basedir().join(key));
        // Content rules already failed above for a missing source
        if !self.rule.reads_content() && !src.exists() {
            debug!(self.log, "hash"; "skipping '{}': source is gone", key);
            return Ok(FileOutcome::Unreadable);
        }

        let mut replaced = false;
        if let Some(old) = self.map.get(key).map(str::to_string) {
            let old_path = self.map.output_dir().join(&old);
            if old_path.exists() {
                if old == hashed {
                    debug!(self.log, "hash"; "'{}' unchanged", key);
                    return Ok(FileOutcome::Unchanged);
                }
                if !self.map_only {
                    match fs::remove_file(&old_path) {
                        Ok(()) => {
                            log!(self.log, "rm"; "'{}'", old_path.display());
                            replaced = true;
                        }
                        Err(e) => error!(self.log, "rm"; "cannot remove '{}': {}", old_path.display(), e),
                    }
                }
                self.map.unset(key);
            }
        }

        let dst = absolutize(&self.map.output_dir().join(&hashed));

        let outcome = if self.map_only {
            FileOutcome::Recorded { replaced }
        } else {
            match copy_preserving(&src, &dst, &self.log)? {
                CopyResult::Copied => {
                    log!(self.log, "cp"; "'{}' '{}'", src.display(), dst.display());
                    FileOutcome::Copied { replaced }
                }
                CopyResult::SameFile => FileOutcome::SameFile { replaced },
                CopyResult::Directory => return Ok(FileOutcome::Directory),
            }
        };

        self.map.set(key, hashed);
        Ok(outcome)
    }
}

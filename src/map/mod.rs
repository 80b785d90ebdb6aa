//! The asset map: original relative path → hashed relative path.
//!
//! Keys are relative to the base directory (see [`base_dir`]) and appear in
//! discovery order. Values are relative to the output directory and stay
//! `None` until the file is hashed in the current run, or until a previous
//! map supplies them via [`AssetMap::read`].
//!
//! On disk, paths are expressed relative to the reference directory, which
//! defaults to the output directory:
//!
//! ```text
//! output:    public/static
//! reference: public/index.html  -> public
//!
//! in memory: app.css        -> Xx.css
//! on disk:   static/app.css -> static/Xx.css
//! ```

mod discover;

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use thiserror::Error;

pub use discover::{ExcludeSet, base_dir, discover_files};

use crate::logger::Logger;
use crate::serializer::{MapFormat, Mapping};
use crate::utils::path::relative_path;
use crate::{debug, error};

/// Map file name meaning "standard output".
pub const STDOUT: &str = "-";

/// Errors from building, reading or writing the map.
#[derive(Debug, Error)]
pub enum MapError {
    #[error("invalid pattern `{pattern}`")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("IO error on map file `{}`", .0.display())]
    Io(PathBuf, #[source] std::io::Error),
}

/// Everything needed to build an [`AssetMap`].
#[derive(Debug, Clone)]
pub struct MapOptions {
    /// Input paths, may contain glob wildcards.
    pub inputs: Vec<String>,
    pub output_dir: PathBuf,
    /// Variable or mixin name for formats that embed one.
    pub name: String,
    pub format: MapFormat,
    /// Directory (or file inside it) that on-disk paths are relative to.
    pub reference: Option<PathBuf>,
    pub excludes: Vec<String>,
}

#[derive(Debug)]
pub struct AssetMap {
    entries: IndexMap<String, Option<String>>,
    basedir: PathBuf,
    output_dir: PathBuf,
    refdir: PathBuf,
    name: String,
    format: MapFormat,
    log: Logger,
}

impl AssetMap {
    /// Discover input files and seed one unset entry per file.
    pub fn new(options: MapOptions, log: Logger) -> Result<Self, MapError> {
        let MapOptions {
            inputs,
            output_dir,
            name,
            format,
            reference,
            excludes,
        } = options;

        debug!(log, "map"; "incoming files: {:?}", inputs);
        let basedir = base_dir(&inputs);
        debug!(log, "map"; "basedir is '{}'", basedir.display());
        debug!(log, "map"; "output dir is '{}'", output_dir.display());

        let excludes = ExcludeSet::new(&excludes)?;
        let files = discover_files(&inputs, &excludes, &log)?;

        let mut entries = IndexMap::with_capacity(files.len());
        for file in &files {
            let key = relative_path(file, &basedir);
            if key != "." {
                entries.entry(key).or_insert(None);
            }
        }
        debug!(log, "map"; "initialized with {} entries", entries.len());

        let refdir = resolve_reference(reference.as_deref(), &output_dir);
        debug!(log, "map"; "reference dir is '{}'", refdir.display());

        Ok(Self {
            entries,
            basedir,
            output_dir,
            refdir,
            name,
            format,
            log,
        })
    }

    pub fn basedir(&self) -> &Path {
        &self.basedir
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn reference_dir(&self) -> &Path {
        &self.refdir
    }

    pub const fn format(&self) -> MapFormat {
        self.format
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Snapshot of the keys in map order.
    pub fn keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    /// Hashed name for `key`, if one is known.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).and_then(|v| v.as_deref())
    }

    /// Record `hashed` for `key`. New keys go to the end.
    pub fn set(&mut self, key: &str, hashed: impl Into<String>) {
        match self.entries.get_mut(key) {
            Some(value) => *value = Some(hashed.into()),
            None => {
                self.entries.insert(key.to_string(), Some(hashed.into()));
            }
        }
    }

    /// Forget the hashed name for `key`, keeping its position.
    pub fn unset(&mut self, key: &str) {
        if let Some(value) = self.entries.get_mut(key) {
            *value = None;
        }
    }

    /// All entries in order, including unset ones.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    /// Merge a previously written map.
    ///
    /// Missing or empty `filename` is a no-op. Entries merge by key, so keys
    /// that are no longer discovered survive with their last known value.
    /// Content that does not parse is reported and treated as an empty map.
    pub fn read(&mut self, filename: &str) -> Result<(), MapError> {
        if filename.is_empty() || filename == STDOUT {
            return Ok(());
        }
        let path = Path::new(filename);
        if !path.exists() {
            return Ok(());
        }

        let content = fs::read_to_string(path).map_err(|e| MapError::Io(path.to_path_buf(), e))?;
        let previous = match self.format.deserialize(&content) {
            Ok(previous) => previous,
            Err(e) => {
                error!(self.log, "map"; "ignoring unreadable {} map '{}': {}", self.format, filename, e);
                return Ok(());
            }
        };

        for (key, hashed) in previous {
            let key = self.from_reference(&key);
            let hashed = self.from_reference(&hashed);
            self.set(&key, hashed);
        }
        debug!(self.log, "map"; "read {} entries from '{}'", self.entries.len(), filename);
        Ok(())
    }

    /// Serialize all set entries in map order, relative to the reference dir.
    pub fn serialize(&self) -> String {
        let mapping: Mapping = self
            .iter()
            .filter_map(|(key, hashed)| Some((self.to_reference(key), self.to_reference(hashed?))))
            .collect();
        self.format.serialize(&mapping, &self.name)
    }

    /// Write the map to `filename`, or stdout for `-`. Empty name is a no-op.
    pub fn write(&self, filename: &str) -> Result<(), MapError> {
        if filename.is_empty() {
            return Ok(());
        }

        let serialized = self.serialize();
        if filename == STDOUT {
            let mut out = std::io::stdout().lock();
            out.write_all(serialized.as_bytes())
                .and_then(|()| out.flush())
                .map_err(|e| MapError::Io(PathBuf::from(STDOUT), e))?;
        } else {
            fs::write(filename, serialized).map_err(|e| MapError::Io(PathBuf::from(filename), e))?;
        }
        debug!(self.log, "map"; "wrote {} map to '{}'", self.format, filename);
        Ok(())
    }

    /// Output-relative path → reference-relative path.
    fn to_reference(&self, path: &str) -> String {
        relative_path(&self.output_dir.join(path), &self.refdir)
    }

    /// Reference-relative path → output-relative path.
    fn from_reference(&self, path: &str) -> String {
        relative_path(&self.refdir.join(path), &self.output_dir)
    }
}

/// Directory that on-disk map paths are relative to.
///
/// No reference means the output directory. A path naming an existing
/// directory is used as is; anything else stands for its parent.
pub fn resolve_reference(reference: Option<&Path>, output_dir: &Path) -> PathBuf {
    match reference {
        None => output_dir.to_path_buf(),
        Some(path) if path.is_dir() => path.to_path_buf(),
        Some(path) => match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        },
    }
}

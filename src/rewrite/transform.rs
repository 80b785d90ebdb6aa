//! Named transforms that make up a rewrite pipeline.
//!
//! ```text
//! /to/input/bar/baz.txt
//! ..............^^^^^^^  complete_filename
//! ..............^^^....  filename
//! .................^^^^  suffix
//! ..................^^^  extension
//! ..........^^^^^^^^^^^  relpath
//! ..........^^^^.......  reldir
//! ^^^^^^^^^^^^^^^^^^^^^  abspath
//! ```
//!
//! A pipeline starts with one path operation and threads its bytes through
//! any number of stages: `abspath|content|sha1|base64|8`.

use std::fmt;
use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};
use sha1::Sha1;

use super::RewriteError;
use crate::utils::path::{absolutize, to_slash};

/// Content digest used for hashed names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum HashFun {
    /// Keep the original file name.
    #[value(skip)]
    Identity,
    Md5,
    #[default]
    Sha1,
}

impl HashFun {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Identity => "identity",
            Self::Md5 => "md5",
            Self::Sha1 => "sha1",
        }
    }

    /// Digest `data`. `Identity` passes the bytes through.
    pub fn digest(self, data: &[u8]) -> Vec<u8> {
        match self {
            Self::Identity => data.to_vec(),
            Self::Md5 => Md5::digest(data).to_vec(),
            Self::Sha1 => Sha1::digest(data).to_vec(),
        }
    }
}

/// A file being renamed: its path relative to the base directory.
#[derive(Debug, Clone)]
pub struct SourceFile {
    relpath: String,
    basedir: PathBuf,
}

impl SourceFile {
    pub fn new(relpath: impl Into<String>, basedir: impl Into<PathBuf>) -> Self {
        Self {
            relpath: relpath.into(),
            basedir: basedir.into(),
        }
    }

    pub fn relpath(&self) -> &str {
        &self.relpath
    }

    pub fn abspath(&self) -> PathBuf {
        absolutize(&self.basedir.join(&self.relpath))
    }

    fn complete_filename(&self) -> &str {
        match self.relpath.rfind('/') {
            Some(i) => &self.relpath[i + 1..],
            None => &self.relpath,
        }
    }

    fn extension(&self) -> &str {
        Path::new(self.complete_filename())
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
    }
}

/// Source of a pipeline: a view of the file's path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathOp {
    AbsPath,
    RelDir,
    RelPath,
    CompleteFilename,
    Filename,
    Suffix,
    Extension,
}

impl PathOp {
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "abspath" => Self::AbsPath,
            "reldir" => Self::RelDir,
            "relpath" => Self::RelPath,
            "complete_filename" => Self::CompleteFilename,
            "filename" => Self::Filename,
            "suffix" => Self::Suffix,
            "extension" => Self::Extension,
            _ => return None,
        })
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::AbsPath => "abspath",
            Self::RelDir => "reldir",
            Self::RelPath => "relpath",
            Self::CompleteFilename => "complete_filename",
            Self::Filename => "filename",
            Self::Suffix => "suffix",
            Self::Extension => "extension",
        }
    }

    pub fn apply(self, file: &SourceFile) -> String {
        match self {
            Self::AbsPath => to_slash(&file.abspath()),
            Self::RelDir => {
                let name = file.complete_filename();
                let dir = file.relpath()[..file.relpath().len() - name.len()].trim_end_matches('/');
                if dir.is_empty() { String::new() } else { format!("{dir}/") }
            }
            Self::RelPath => file.relpath().to_string(),
            Self::CompleteFilename => file.complete_filename().to_string(),
            Self::Filename => {
                let name = file.complete_filename();
                let ext = file.extension();
                if ext.is_empty() {
                    name.to_string()
                } else {
                    name[..name.len() - ext.len() - 1].to_string()
                }
            }
            Self::Suffix => match file.extension() {
                "" => String::new(),
                ext => format!(".{ext}"),
            },
            Self::Extension => file.extension().to_string(),
        }
    }
}

/// One step applied to the bytes flowing through a pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Treat the value as a path and read the file's bytes.
    Content,
    Hash(HashFun),
    /// URL-safe base64 without `=` padding.
    Base64,
    /// Keep the first N characters.
    Truncate(usize),
}

impl Stage {
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "content" => Self::Content,
            "identity" => Self::Hash(HashFun::Identity),
            "md5" => Self::Hash(HashFun::Md5),
            "sha1" | "hash" => Self::Hash(HashFun::Sha1),
            "base64" => Self::Base64,
            digits if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) => {
                Self::Truncate(digits.parse().ok()?)
            }
            _ => return None,
        })
    }

    pub fn apply(self, value: Vec<u8>) -> Result<Vec<u8>, RewriteError> {
        Ok(match self {
            Self::Content => {
                let path = PathBuf::from(String::from_utf8_lossy(&value).into_owned());
                std::fs::read(&path).map_err(|source| RewriteError::Unreadable { path, source })?
            }
            Self::Hash(fun) => fun.digest(&value),
            Self::Base64 => URL_SAFE_NO_PAD.encode(value).into_bytes(),
            Self::Truncate(n) => String::from_utf8_lossy(&value)
                .chars()
                .take(n)
                .collect::<String>()
                .into_bytes(),
        })
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Content => f.write_str("content"),
            Self::Hash(fun) => f.write_str(fun.name()),
            Self::Base64 => f.write_str("base64"),
            Self::Truncate(n) => write!(f, "{n}"),
        }
    }
}

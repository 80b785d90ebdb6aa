//! Run configuration.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── error.rs   # ConfigError
//! ├── file.rs    # hashedassets.toml
//! └── mod.rs     # Config (this file)
//! ```
//!
//! Values are resolved in this order, later wins:
//!
//! | Source              | Example                       |
//! |---------------------|-------------------------------|
//! | built-in defaults   | sha1, 27 chars, `hashedassets` |
//! | `hashedassets.toml` | `digest = "md5"`              |
//! | command line        | `-d md5`                      |
//!
//! Excludes are the exception: file and command-line patterns are combined.

mod error;
mod file;

pub use error::ConfigError;
pub use file::FileConfig;

use std::path::{Path, PathBuf};

use crate::cli::Cli;
use crate::logger::Level;
use crate::map::{MapOptions, STDOUT};
use crate::rewrite::{HashFun, RewriteRule};
use crate::serializer::MapFormat;

/// Full SHA-1 digest length in unpadded base64.
pub const DEFAULT_DIGEST_LENGTH: usize = 27;
pub const DEFAULT_MAP_NAME: &str = "hashedassets";

/// Validated, immutable settings for one run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Map file path, `-` for stdout.
    pub map_file: String,
    pub sources: Vec<String>,
    pub output_dir: PathBuf,
    pub hash: HashFun,
    /// `None` keeps the full digest.
    pub digest_length: Option<usize>,
    pub keep_dirs: bool,
    pub strip_extensions: bool,
    pub map_only: bool,
    pub map_format: MapFormat,
    pub map_name: String,
    pub reference: Option<PathBuf>,
    pub excludes: Vec<String>,
    /// Custom name template replacing the computed one.
    pub rewrite: Option<String>,
    pub verbosity: Level,
    /// Unknown keys found in the config file.
    pub ignored_keys: Vec<String>,
}

impl Config {
    /// Resolve command-line arguments and the optional config file.
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let (file, ignored_keys) = FileConfig::load(cli.config.as_deref())?;
        Self::resolve(cli, file, ignored_keys)
    }

    fn resolve(cli: &Cli, file: FileConfig, ignored_keys: Vec<String>) -> Result<Self, ConfigError> {
        let map_only = cli.map_only || file.map_only;
        let (map_file, sources, output_dir) = split_paths(&cli.paths, map_only)?;

        let identity = cli.identity || file.identity;
        let hash = if identity {
            HashFun::Identity
        } else {
            cli.digest.or(file.digest).unwrap_or_default()
        };
        let keep_dirs = identity || cli.keep_dirs || file.keep_dirs;

        let digest_length = match cli.digest_length.or(file.digest_length) {
            Some(0) => None,
            Some(n) => Some(n),
            None => Some(DEFAULT_DIGEST_LENGTH),
        };

        let map_format = match cli.map_type.or(file.map_type) {
            Some(format) => format,
            None => MapFormat::from_path(Path::new(&map_file))?,
        };

        if !map_only && output_dir.exists() && !output_dir.is_dir() {
            return Err(ConfigError::OutputNotDirectory(output_dir));
        }

        let rewrite = cli.rewrite.clone().or(file.rewrite);
        if let Some(template) = &rewrite {
            template.parse::<RewriteRule>()?;
        }

        let mut excludes = file.exclude;
        excludes.extend(cli.excludes.iter().cloned());

        Ok(Self {
            map_file,
            sources,
            output_dir,
            hash,
            digest_length,
            keep_dirs,
            strip_extensions: cli.strip_extensions || file.strip_extensions,
            map_only,
            map_format,
            map_name: cli
                .map_name
                .clone()
                .or(file.map_name)
                .unwrap_or_else(|| DEFAULT_MAP_NAME.to_string()),
            reference: cli.reference.clone().or(file.reference),
            excludes,
            rewrite,
            verbosity: Level::from_flags(cli.verbose, cli.quiet),
            ignored_keys,
        })
    }

    /// The rewrite rule for this run: the custom template, or the one
    /// derived from the hashing options.
    pub fn rewrite_rule(&self) -> Result<RewriteRule, ConfigError> {
        match &self.rewrite {
            Some(template) => Ok(template.parse()?),
            None => Ok(RewriteRule::from_config(
                self.hash,
                self.digest_length,
                self.keep_dirs,
                self.strip_extensions,
            )),
        }
    }

    pub fn map_options(&self) -> MapOptions {
        MapOptions {
            inputs: self.sources.clone(),
            output_dir: self.output_dir.clone(),
            name: self.map_name.clone(),
            format: self.map_format,
            reference: self.reference.clone(),
            excludes: self.excludes.clone(),
        }
    }

    /// Whether the map goes to stdout, leaving stdout unusable for logs.
    pub fn map_to_stdout(&self) -> bool {
        self.map_file == STDOUT
    }
}

/// Split positionals into `(MAPFILE, SOURCE..., DEST)`.
///
/// Map-only runs have no DEST and use the current directory.
fn split_paths(paths: &[String], map_only: bool) -> Result<(String, Vec<String>, PathBuf), ConfigError> {
    if map_only {
        match paths {
            [map_file, sources @ ..] if !sources.is_empty() => {
                Ok((map_file.clone(), sources.to_vec(), PathBuf::from(".")))
            }
            _ => Err(ConfigError::MissingArguments(
                "You need to specify at least MAPFILE and SOURCE",
            )),
        }
    } else {
        match paths {
            [map_file, sources @ .., dest] if !sources.is_empty() => Ok((
                map_file.clone(),
                sources.to_vec(),
                PathBuf::from(trim_trailing_slash(dest)),
            )),
            _ => Err(ConfigError::MissingArguments(
                "You need to specify at least MAPFILE SOURCE and DEST",
            )),
        }
    }
}

/// `out/` → `out`, but `/` stays `/`.
fn trim_trailing_slash(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() && !path.is_empty() { "/" } else { trimmed }
}

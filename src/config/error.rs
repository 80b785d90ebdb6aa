//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

use crate::rewrite::RewriteError;
use crate::serializer::UnknownFormat;

/// Configuration-related errors, all reported before any file is touched.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0}")]
    MissingArguments(&'static str),

    #[error(transparent)]
    UnknownMapFormat(#[from] UnknownFormat),

    #[error("Output dir at '{}' is not a directory", .0.display())]
    OutputNotDirectory(PathBuf),

    #[error("cannot read `{}`: {}", .0.display(), .1)]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Config file parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid rewrite template: {0}")]
    Rewrite(#[from] RewriteError),
}

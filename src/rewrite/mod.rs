//! Name rewriting: relative source path + file content → hashed name.
//!
//! - [`transform`]: the named path operations and content stages
//! - [`rule`]: `%(pipeline)s` templates composed from those transforms

mod rule;
mod transform;

use std::path::PathBuf;
use thiserror::Error;

pub use rule::RewriteRule;
pub use transform::{HashFun, SourceFile};

/// Errors from parsing or applying a rewrite rule.
#[derive(Debug, Error)]
pub enum RewriteError {
    #[error("unknown transform `{0}`")]
    UnknownTransform(String),

    #[error("`{0}` is a stage and cannot start a pipeline")]
    NotASource(String),

    #[error("unterminated placeholder in `{0}` (expected `)s`)")]
    Unterminated(String),

    #[error("empty rewrite template")]
    Empty,

    #[error("cannot hash `{}`", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("`{0}` does not produce text (missing `base64`?)")]
    NotText(String),
}

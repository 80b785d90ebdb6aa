//! Path utilities.
//!
//! Pure functions for path manipulation. No side effects.
//!
//! - [`fs`]: lexical normalization and `relpath` (`absolutize`, `relative_path`)
//!   plus string helpers for raw input patterns (`common_prefix`, `parent_dir`)

pub mod fs;

pub use fs::{absolutize, common_prefix, parent_dir, relative_path, to_slash};

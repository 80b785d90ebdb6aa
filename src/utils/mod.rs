//! Utility modules shared by the asset map and the hasher.

pub mod path;

//! Optional project file `hashedassets.toml`.
//!
//! Top-level keys mirror the long command-line options:
//!
//! ```toml
//! digest = "md5"
//! digest-length = 8
//! keep-dirs = true
//! map-type = "json"
//! map-name = "assets"
//! reference = "~/site/public"
//! exclude = ["static/vendor", "*.map"]
//! ```

use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

use super::ConfigError;
use crate::rewrite::HashFun;
use crate::serializer::MapFormat;

/// File looked up in the current directory when `-C` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "hashedassets.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FileConfig {
    pub digest: Option<HashFun>,
    pub digest_length: Option<usize>,
    #[serde(default)]
    pub keep_dirs: bool,
    #[serde(default)]
    pub identity: bool,
    #[serde(default)]
    pub strip_extensions: bool,
    #[serde(default)]
    pub map_only: bool,
    pub map_type: Option<MapFormat>,
    pub map_name: Option<String>,
    pub reference: Option<PathBuf>,
    #[serde(default)]
    pub exclude: Vec<String>,
    pub rewrite: Option<String>,
}

impl FileConfig {
    /// Load `explicit` (which must exist) or the default file if present.
    ///
    /// Returns the parsed file plus the dotted paths of ignored keys.
    pub fn load(explicit: Option<&Path>) -> Result<(Self, Vec<String>), ConfigError> {
        let path = match explicit {
            Some(path) => path,
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if !default.is_file() {
                    return Ok((Self::default(), Vec::new()));
                }
                default
            }
        };

        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        let (mut config, ignored) = Self::parse_with_ignored(&content)?;
        config.expand_paths();
        Ok((config, ignored))
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    fn expand_paths(&mut self) {
        if let Some(reference) = self.reference.take() {
            self.reference = Some(expand_tilde(&reference));
        }
        for pattern in &mut self.exclude {
            *pattern = shellexpand::tilde(pattern.as_str()).into_owned();
        }
    }
}

fn expand_tilde(path: &Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path.to_str().unwrap_or_default()).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_keys() {
        let content = r#"
digest = "md5"
digest-length = 8
keep-dirs = true
map-type = "text"
exclude = ["a", "b*"]
rewrite = "%(relpath)s"
"#;
        let (config, ignored) = FileConfig::parse_with_ignored(content).unwrap();
        assert!(ignored.is_empty());
        assert_eq!(config.digest, Some(HashFun::Md5));
        assert_eq!(config.digest_length, Some(8));
        assert!(config.keep_dirs);
        assert!(!config.map_only);
        assert_eq!(config.map_type, Some(MapFormat::Txt));
        assert_eq!(config.exclude, ["a", "b*"]);
        assert_eq!(config.rewrite.as_deref(), Some("%(relpath)s"));
    }

    #[test]
    fn test_unknown_keys_are_collected() {
        let (config, ignored) =
            FileConfig::parse_with_ignored("map-name = \"x\"\nmapname = \"y\"\n").unwrap();
        assert_eq!(config.map_name.as_deref(), Some("x"));
        assert_eq!(ignored, ["mapname"]);
    }

    #[test]
    fn test_bad_value_is_error() {
        let err = FileConfig::parse_with_ignored("digest = \"crc32\"").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn test_explicit_file_must_exist() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.toml");
        let err = FileConfig::load(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::Io(..)));
        let message = err.to_string();
        assert!(message.starts_with(&format!("cannot read `{}`: ", path.display())));
        assert!(message.len() > format!("cannot read `{}`: ", path.display()).len());
    }

    #[test]
    fn test_load_expands_tilde() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("hashedassets.toml");
        fs::write(&path, "reference = \"~/public\"\nexclude = [\"~/vendor\"]\n").unwrap();

        let (config, _) = FileConfig::load(Some(&path)).unwrap();
        let reference = config.reference.unwrap();
        let home = shellexpand::tilde("~").into_owned();
        assert_eq!(reference, Path::new(&home).join("public"));
        assert!(config.exclude[0].starts_with(&home));
    }
}

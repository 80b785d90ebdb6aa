//! Command-line interface definitions.

use clap::{ColorChoice, Parser};
use std::path::PathBuf;

use crate::rewrite::HashFun;
use crate::serializer::MapFormat;

/// Copy files to content-hashed names and write a map of the renames
#[derive(Parser, Debug, Clone)]
#[command(
    version,
    about,
    long_about = None,
    arg_required_else_help = true,
    override_usage = "hashedassets [OPTIONS] MAPFILE SOURCE... DEST\n       hashedassets --map-only [OPTIONS] MAPFILE SOURCE..."
)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, default_value = "auto")]
    pub color: ColorChoice,

    /// Increase verbosity (-vv for debug traces)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only print errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Name of the map in js, jsonp, scss and php output [default: hashedassets]
    #[arg(short = 'n', long, value_name = "MAPNAME")]
    pub map_name: Option<String>,

    /// Type of the map [default: guessed from MAPFILE]
    #[arg(short = 't', long, value_name = "MAPTYPE")]
    pub map_type: Option<MapFormat>,

    /// Length of the generated names without extension, 0 keeps the full digest [default: 27]
    #[arg(short = 'l', long, value_name = "LENGTH")]
    pub digest_length: Option<usize>,

    /// Hash function [default: sha1]
    #[arg(short = 'd', long, value_name = "HASHFUN")]
    pub digest: Option<HashFun>,

    /// Mirror the SOURCE directory structure in DEST
    #[arg(short, long)]
    pub keep_dirs: bool,

    /// Keep all file names (implies --keep-dirs)
    #[arg(short, long)]
    pub identity: bool,

    /// Drop file extensions from hashed names
    #[arg(short, long)]
    pub strip_extensions: bool,

    /// Only write the map, copy nothing (no DEST)
    #[arg(short = 'M', long)]
    pub map_only: bool,

    /// Write map paths relative to this directory (or the directory of this file)
    #[arg(short, long, value_name = "PATH", value_hint = clap::ValueHint::AnyPath)]
    pub reference: Option<PathBuf>,

    /// Skip files matching this pattern (repeatable)
    #[arg(short, long = "exclude", value_name = "PATTERN")]
    pub excludes: Vec<String>,

    /// Custom name template, e.g. `%(reldir)s%(abspath|content|md5|base64|8)s%(suffix)s`
    #[arg(long, value_name = "TEMPLATE")]
    pub rewrite: Option<String>,

    /// Config file path (default: hashedassets.toml if present)
    #[arg(short = 'C', long, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// MAPFILE (`-` for stdout), then SOURCE paths or globs, then DEST
    #[arg(value_name = "PATHS", required = true)]
    pub paths: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_options_and_paths() {
        let cli = Cli::try_parse_from([
            "hashedassets",
            "-vv",
            "-t",
            "json",
            "-d",
            "md5",
            "-l",
            "8",
            "-e",
            "a",
            "--exclude",
            "b",
            "map.txt",
            "img/*.png",
            "out",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.map_type, Some(MapFormat::Json));
        assert_eq!(cli.digest, Some(HashFun::Md5));
        assert_eq!(cli.digest_length, Some(8));
        assert_eq!(cli.excludes, ["a", "b"]);
        assert_eq!(cli.paths, ["map.txt", "img/*.png", "out"]);
    }

    #[test]
    fn test_identity_is_not_a_digest() {
        assert!(Cli::try_parse_from(["hashedassets", "-d", "identity", "m.txt", "a", "b"]).is_err());
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["hashedassets", "-q", "-v", "m.txt", "a", "b"]).is_err());
    }
}

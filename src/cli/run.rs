//! One full run: prepare output, load map, hash, write map.

use anyhow::{Context, Result};
use std::fs;

use crate::config::Config;
use crate::hasher::{AssetHasher, RunStats};
use crate::logger::Logger;
use crate::map::AssetMap;
use crate::{debug, log};

/// Execute the run described by `config`.
///
/// The map file is rewritten only after every file was processed.
pub fn run(config: &Config, log: Logger) -> Result<RunStats> {
    for key in &config.ignored_keys {
        log!(log, "config"; "ignoring unknown key `{}`", key);
    }

    prepare_output_dir(config, &log)?;

    let rule = config.rewrite_rule()?;
    debug!(log, "rewrite"; "template is '{}'", rule);

    let mut map = AssetMap::new(config.map_options(), log.clone()).context("Failed to collect input files")?;
    map.read(&config.map_file)
        .with_context(|| format!("Failed to read map '{}'", config.map_file))?;

    let stats = AssetHasher::new(&mut map, &rule, config.map_only, log.clone()).run()?;

    map.write(&config.map_file)
        .with_context(|| format!("Failed to write map '{}'", config.map_file))?;
    debug!(
        log, "map";
        "{} entries as {}, relative to '{}'",
        map.len(), map.format(), map.reference_dir().display()
    );

    debug!(
        log, "done";
        "{} copied, {} removed, {} unchanged, {} recorded, {} skipped",
        stats.copied, stats.removed, stats.unchanged, stats.recorded, stats.skipped
    );
    Ok(stats)
}

/// Create the output directory unless it exists or nothing is copied.
fn prepare_output_dir(config: &Config, log: &Logger) -> Result<()> {
    if config.map_only || config.output_dir.exists() {
        return Ok(());
    }
    fs::create_dir_all(&config.output_dir)
        .with_context(|| format!("Failed to create output dir '{}'", config.output_dir.display()))?;
    log!(log, "mkdir"; "'{}'", config.output_dir.display());
    Ok(())
}

//! Command handler modules for gw-cli.
//!
//! Shared utilities used by multiple command paths live here.
//! Command-specific logic lives in the submodules.

pub mod config_show;
pub mod lookup;
pub mod roster_diff;
pub mod source;
pub mod watch;

use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use gw_config::{
    load_layered_yaml, report_unused_keys, AppConfig, ConfigUse, LoadedConfig, UnusedKeyPolicy,
};
use gw_ingest::{HttpStatsSource, StatsSource};
use tracing::warn;

use source::FileSource;

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Parse `--now`, or take the wall clock when absent.
pub fn parse_now(raw: Option<&str>) -> Result<DateTime<Utc>> {
    match raw {
        None => Ok(Utc::now()),
        Some(s) => {
            let t = DateTime::parse_from_rfc3339(s.trim())
                .with_context(|| format!("invalid --now '{s}': expected RFC 3339"))?;
            Ok(t.with_timezone(&Utc))
        }
    }
}

/// Merge config layers, apply environment overrides, and report unused keys
/// for `use_`.
pub fn load_config(paths: &[String], use_: ConfigUse, strict: bool) -> Result<LoadedConfig> {
    let refs: Vec<&str> = paths.iter().map(String::as_str).collect();
    let mut loaded = load_layered_yaml(&refs)?;

    let policy = if strict {
        UnusedKeyPolicy::Fail
    } else {
        UnusedKeyPolicy::Warn
    };
    let report = report_unused_keys(use_, &loaded.config_json, policy)?;
    if !report.is_clean() {
        warn!(
            use_ = %report.use_,
            unused = ?report.unused_leaf_pointers,
            "config carries keys this command does not read"
        );
    }

    loaded.app.apply_process_env();
    loaded.app.validate()?;
    Ok(loaded)
}

pub fn build_http_source(cfg: &AppConfig) -> Result<HttpStatsSource> {
    let source = HttpStatsSource::new(
        &cfg.api.base_url,
        Duration::from_secs(cfg.api.timeout_secs),
        &cfg.api.user_agent,
    )
    .with_context(|| format!("failed to build http source for {}", cfg.api.base_url))?;
    Ok(source)
}

/// Offline files when given, otherwise the configured HTTP source.
pub fn source_for(
    files: Option<FileSource>,
    config_paths: &[String],
    strict: bool,
) -> Result<Box<dyn StatsSource>> {
    if let Some(files) = files {
        return Ok(Box::new(files));
    }
    let cfg = load_config(config_paths, ConfigUse::Lookup, strict)?;
    Ok(Box::new(build_http_source(&cfg.app)?))
}

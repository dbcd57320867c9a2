//! gw-config
//!
//! Layered YAML configuration for the fetch and watch collaborators.
//!
//! Documents are merged in order (later overrides earlier, objects merge
//! key by key), rendered as canonical JSON, fingerprinted, and then read
//! into a typed [`AppConfig`] where every field has a default.

mod unused;

use std::fs;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

pub use unused::{
    consumed_pointers_for, report_unused_keys, ConfigUse, UnusedKeyPolicy, UnusedKeyReport,
};

pub const DEFAULT_BASE_URL: &str = "https://api.wynncraft.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_USER_AGENT: &str = concat!("guildwatch/", env!("CARGO_PKG_VERSION"));
pub const DEFAULT_INTERVAL_SECS: u64 = 60;

/// Environment variable overriding `api.base_url`.
pub const ENV_BASE_URL: &str = "GW_API_BASE_URL";

// ---------------------------------------------------------------------------
// Typed config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Guild polled by `gw watch` when none is given on the command line.
    pub guild: Option<String>,
    pub interval_secs: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            guild: None,
            interval_secs: DEFAULT_INTERVAL_SECS,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub watch: WatchConfig,
}

impl AppConfig {
    pub fn from_json(v: &Value) -> Result<Self> {
        let cfg: AppConfig =
            serde_json::from_value(v.clone()).context("config does not match expected shape")?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Apply environment overrides through `lookup` (normally `std::env::var`).
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_BASE_URL) {
            let url = url.trim();
            if !url.is_empty() {
                tracing::debug!(base_url = %url, env = ENV_BASE_URL, "api.base_url overridden");
                self.api.base_url = url.to_string();
            }
        }
    }

    pub fn apply_process_env(&mut self) {
        self.apply_env(|k| std::env::var(k).ok());
    }

    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            bail!("CONFIG_INVALID: api.base_url must not be empty");
        }
        if self.api.timeout_secs == 0 {
            bail!("CONFIG_INVALID: api.timeout_secs must be > 0");
        }
        if self.watch.interval_secs == 0 {
            bail!("CONFIG_INVALID: watch.interval_secs must be > 0");
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// SHA-256 of `canonical_json`, lowercase hex.
    pub config_hash: String,
    pub canonical_json: String,
    pub config_json: Value,
    pub app: AppConfig,
}

/// Read and merge the YAML files at `paths`, first to last.
pub fn load_layered_yaml(paths: &[&str]) -> Result<LoadedConfig> {
    let docs = paths
        .iter()
        .map(|p| fs::read_to_string(p).with_context(|| format!("cannot read config layer {p}")))
        .collect::<Result<Vec<String>>>()?;
    let refs: Vec<&str> = docs.iter().map(String::as_str).collect();
    load_layered_yaml_from_strings(&refs)
}

pub fn load_layered_yaml_from_strings(yaml_docs: &[&str]) -> Result<LoadedConfig> {
    let mut merged = Value::Object(serde_json::Map::new());
    for (i, raw) in yaml_docs.iter().enumerate() {
        let layer: serde_yaml::Value = serde_yaml::from_str(raw)
            .with_context(|| format!("config layer {i} is not valid yaml"))?;
        let layer = serde_json::to_value(layer)
            .with_context(|| format!("config layer {i} has no json form"))?;
        match layer {
            // Empty document.
            Value::Null => continue,
            Value::Object(_) => merge_into(&mut merged, layer),
            _ => bail!("config layer {i} must be a mapping at the top level"),
        }
    }

    // serde_json's map is key-sorted, so this rendering is canonical.
    let canonical_json = serde_json::to_string(&merged).context("cannot render merged config")?;
    let config_hash = fingerprint(canonical_json.as_bytes());
    let app = AppConfig::from_json(&merged)?;

    Ok(LoadedConfig {
        config_hash,
        canonical_json,
        config_json: merged,
        app,
    })
}

/// Overlay `top` onto `base`. Objects merge key by key; anything else in
/// `top` replaces what `base` had.
fn merge_into(base: &mut Value, top: Value) {
    match (base, top) {
        (Value::Object(base_map), Value::Object(top_map)) => {
            for (k, v) in top_map {
                match base_map.get_mut(&k) {
                    Some(existing) => merge_into(existing, v),
                    None => {
                        base_map.insert(k, v);
                    }
                }
            }
        }
        (slot, other) => *slot = other,
    }
}

fn fingerprint(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

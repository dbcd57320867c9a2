//! Unused-key report.
//!
//! Each command family declares the JSON-pointer prefixes it actually reads.
//! A config leaf under any consumed prefix is used; every other leaf is
//! reported, so typos like `api.timout_secs` do not silently fall back to a
//! default.
//!
//! - prefix `/api` consumes `/api/base_url` and `/api/timeout_secs`
//! - prefix `/api/base_url` does not consume `/api/base_urls`

use std::collections::BTreeSet;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Which command family is reading the config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigUse {
    /// One-shot lookups: stats, characters, guild-online.
    Lookup,
    /// Periodic roster polling.
    Watch,
    /// Offline roster diff of two files. Reads nothing.
    Offline,
}

impl ConfigUse {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigUse::Lookup => "LOOKUP",
            ConfigUse::Watch => "WATCH",
            ConfigUse::Offline => "OFFLINE",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnusedKeyPolicy {
    Warn,
    Fail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnusedKeyReport {
    #[serde(rename = "use")]
    pub use_: String,
    /// Sorted, unique.
    pub consumed_prefixes: Vec<String>,
    /// Sorted.
    pub unused_leaf_pointers: Vec<String>,
}

impl UnusedKeyReport {
    pub fn is_clean(&self) -> bool {
        self.unused_leaf_pointers.is_empty()
    }
}

/// Prefixes read by each command family. Keep in step with `AppConfig`.
pub fn consumed_pointers_for(u: ConfigUse) -> &'static [&'static str] {
    match u {
        ConfigUse::Lookup => &["/api/base_url", "/api/timeout_secs", "/api/user_agent"],
        ConfigUse::Watch => &[
            "/api/base_url",
            "/api/timeout_secs",
            "/api/user_agent",
            "/watch/guild",
            "/watch/interval_secs",
        ],
        ConfigUse::Offline => &[],
    }
}

/// Unused-key report for `u`.
///
/// `Fail` turns a non-clean report into an error; `Warn` always returns the
/// report.
pub fn report_unused_keys(
    u: ConfigUse,
    config_json: &Value,
    policy: UnusedKeyPolicy,
) -> Result<UnusedKeyReport> {
    let consumed: BTreeSet<String> = consumed_pointers_for(u)
        .iter()
        .map(|p| canonical_prefix(p))
        .collect();

    let unused: Vec<String> = leaf_pointers(config_json)
        .into_iter()
        .filter(|leaf| !consumed.iter().any(|prefix| covers(prefix, leaf)))
        .collect();

    let report = UnusedKeyReport {
        use_: u.as_str().to_string(),
        consumed_prefixes: consumed.into_iter().collect(),
        unused_leaf_pointers: unused,
    };

    if policy == UnusedKeyPolicy::Fail && !report.is_clean() {
        let first: Vec<&str> = report
            .unused_leaf_pointers
            .iter()
            .take(12)
            .map(String::as_str)
            .collect();
        bail!(
            "CONFIG_UNUSED_KEYS (use={}): {} key(s) not read: {}",
            report.use_,
            report.unused_leaf_pointers.len(),
            first.join(", ")
        );
    }

    Ok(report)
}

/// `"api/"` and `" /api"` both become `"/api"`; blank becomes the root `"/"`.
fn canonical_prefix(p: &str) -> String {
    let trimmed = p.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return "/".to_string();
    }
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

/// `"/a/b"` covers `"/a/b"` and `"/a/b/c"` but not `"/a/bc"`.
fn covers(prefix: &str, leaf: &str) -> bool {
    prefix == "/"
        || leaf == prefix
        || leaf
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// JSON pointers of every scalar (or empty container) under `root`, sorted.
fn leaf_pointers(root: &Value) -> BTreeSet<String> {
    let mut out = BTreeSet::new();
    let mut stack: Vec<(String, &Value)> = vec![(String::new(), root)];

    while let Some((path, v)) = stack.pop() {
        match v {
            Value::Object(map) if !map.is_empty() => {
                for (k, child) in map {
                    stack.push((format!("{path}/{}", escape_token(k)), child));
                }
            }
            Value::Array(items) if !items.is_empty() => {
                for (i, child) in items.iter().enumerate() {
                    stack.push((format!("{path}/{i}"), child));
                }
            }
            // An empty root has no leaves.
            _ if path.is_empty() => {}
            _ => {
                out.insert(path);
            }
        }
    }
    out
}

fn escape_token(s: &str) -> String {
    s.replace('~', "~0").replace('/', "~1")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_respects_segment_boundary() {
        assert!(covers("/api", "/api/base_url"));
        assert!(covers("/api/base_url", "/api/base_url"));
        assert!(!covers("/api/base_url", "/api/base_urls"));
        assert!(covers("/", "/anything"));
    }

    #[test]
    fn prefixes_are_canonicalized() {
        assert_eq!(canonical_prefix("api/"), "/api");
        assert_eq!(canonical_prefix("  "), "/");
        assert_eq!(canonical_prefix("/watch/guild"), "/watch/guild");
    }

    #[test]
    fn tokens_with_slash_are_escaped() {
        let v = serde_json::json!({"a/b": {"c~d": 1}});
        let leaves: Vec<String> = leaf_pointers(&v).into_iter().collect();
        assert_eq!(leaves, vec!["/a~1b/c~0d".to_string()]);
    }

    #[test]
    fn array_items_and_empty_containers_are_leaves() {
        let v = serde_json::json!({"watch": {"extra": [1, 2], "empty": {}}});
        let leaves: Vec<String> = leaf_pointers(&v).into_iter().collect();
        assert_eq!(
            leaves,
            vec![
                "/watch/empty".to_string(),
                "/watch/extra/0".to_string(),
                "/watch/extra/1".to_string(),
            ]
        );
    }

    #[test]
    fn empty_root_has_no_leaves() {
        assert!(leaf_pointers(&serde_json::json!({})).is_empty());
    }
}

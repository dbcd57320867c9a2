//! Offline roster diff of two saved guild payloads.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use gw_ingest::parse_guild;
use gw_reconcile::{diff, RosterDiff, SnapshotWatermark};
use gw_schemas::GuildSnapshot;
use tracing::warn;

use crate::render;

fn load_guild(path: &Path) -> Result<GuildSnapshot> {
    let bytes =
        fs::read(path).with_context(|| format!("read guild payload failed: {}", path.display()))?;
    parse_guild(&bytes).with_context(|| format!("invalid guild payload: {}", path.display()))
}

/// Diff `prior` against `current`. Files in the wrong order are still diffed,
/// with a warning.
pub fn diff_files(prior: &Path, current: &Path) -> Result<RosterDiff> {
    let before = load_guild(prior)?;
    let after = load_guild(current)?;

    if before.name != after.name {
        bail!(
            "payloads are for different guilds: '{}' vs '{}'",
            before.name,
            after.name
        );
    }

    let mut wm = SnapshotWatermark::new();
    wm.accept(&before);
    let freshness = wm.check(&after);
    if freshness.is_stale() {
        warn!(guild = %after.name, ?freshness, "current payload was requested before prior");
    }

    Ok(diff(&before, &after))
}

pub fn run(prior: &Path, current: &Path, json: bool) -> Result<()> {
    let d = diff_files(prior, current)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&d)?);
    } else {
        print!("{}", render::roster_diff(&d));
    }
    Ok(())
}

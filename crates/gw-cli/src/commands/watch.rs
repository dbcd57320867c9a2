//! Periodic roster polling.
//!
//! One poll at a time: each tick fetches the guild, then feeds the snapshot
//! through [`RosterWatch`]. A failed or rejected poll is logged and the loop
//! keeps going. Without `max_polls` the loop runs until the process is stopped.

use std::time::Duration;

use anyhow::Result;
use gw_ingest::{fetch_guild, StatsSource};
use gw_reconcile::{RosterWatch, WatchOutcome};
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use crate::render;

#[derive(Debug, Clone)]
pub struct WatchOptions {
    pub guild: String,
    pub interval: Duration,
    pub max_polls: Option<u64>,
    pub json: bool,
}

/// Counters for a finished watch loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WatchStats {
    pub polls: u64,
    pub changes: u64,
    pub failures: u64,
    pub rejections: u64,
}

/// Poll until `max_polls` (if any), handing every accepted outcome to `emit`.
pub async fn poll_loop<F>(source: &dyn StatsSource, opts: &WatchOptions, mut emit: F) -> WatchStats
where
    F: FnMut(&WatchOutcome),
{
    let mut ticker = tokio::time::interval(opts.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut watch = RosterWatch::new();
    let mut stats = WatchStats::default();

    loop {
        ticker.tick().await;

        stats.polls += 1;
        match fetch_guild(source, &opts.guild).await {
            Ok(snap) => match watch.observe(snap) {
                Ok(outcome) => {
                    if outcome.diff().is_some() {
                        stats.changes += 1;
                    }
                    emit(&outcome);
                }
                // Already logged by the watch.
                Err(_) => stats.rejections += 1,
            },
            Err(e) => {
                stats.failures += 1;
                warn!(guild = %opts.guild, error = %e, poll = stats.polls, "roster poll failed");
            }
        }

        if opts.max_polls.is_some_and(|max| stats.polls >= max) {
            break;
        }
    }

    info!(
        guild = %opts.guild,
        polls = stats.polls,
        changes = stats.changes,
        failures = stats.failures,
        rejections = stats.rejections,
        "watch stopped"
    );
    stats
}

pub async fn run(source: &dyn StatsSource, opts: &WatchOptions) -> Result<()> {
    let guild = opts.guild.clone();
    let json = opts.json;
    let mut print_err: Option<serde_json::Error> = None;

    poll_loop(source, opts, |outcome| {
        if json {
            if let Some(d) = outcome.diff() {
                match serde_json::to_string(d) {
                    Ok(line) => println!("{line}"),
                    Err(e) => print_err = Some(e),
                }
            }
        } else {
            print!("{}", render::watch_outcome(&guild, outcome));
        }
    })
    .await;

    if let Some(e) = print_err {
        return Err(e.into());
    }
    Ok(())
}

//! Last-known-roster slot for periodic polling.
//!
//! [`RosterWatch::observe`] runs every incoming snapshot through the
//! watermark, diffs it against the last accepted snapshot, and keeps it as
//! the new baseline. Snapshots without a request time are diffed as they
//! come. `&mut self` serializes updates, so at most one
//! observation is ever in flight.

use std::fmt;

use gw_schemas::GuildSnapshot;
use tracing::{debug, info, warn};

use crate::watermark::{SnapshotFreshness, SnapshotWatermark};
use crate::{diff, RosterDiff};

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WatchOutcome {
    /// First accepted snapshot. Nothing to compare against yet.
    Baseline { members: usize },
    Unchanged,
    Changed(RosterDiff),
}

impl WatchOutcome {
    pub fn diff(&self) -> Option<&RosterDiff> {
        match self {
            WatchOutcome::Changed(d) => Some(d),
            _ => None,
        }
    }
}

/// A snapshot the watch refused. The stored baseline is untouched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WatchRejection {
    /// Requested before the last accepted timed snapshot.
    Stale { watermark_secs: i64, got_secs: i64 },
    /// The snapshot is for a different guild than the baseline.
    GuildMismatch { expected: String, got: String },
}

impl fmt::Display for WatchRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WatchRejection::Stale {
                watermark_secs,
                got_secs,
            } => write!(
                f,
                "stale guild snapshot rejected: watermark={watermark_secs}s got={got_secs}s"
            ),
            WatchRejection::GuildMismatch { expected, got } => {
                write!(f, "snapshot is for guild '{got}', watching '{expected}'")
            }
        }
    }
}

impl std::error::Error for WatchRejection {}

// ---------------------------------------------------------------------------
// Watch
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Default)]
pub struct RosterWatch {
    watermark: SnapshotWatermark,
    last: Option<GuildSnapshot>,
}

impl RosterWatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&GuildSnapshot> {
        self.last.as_ref()
    }

    pub fn watermark(&self) -> &SnapshotWatermark {
        &self.watermark
    }

    pub fn observe(&mut self, snap: GuildSnapshot) -> Result<WatchOutcome, WatchRejection> {
        if let Some(last) = &self.last {
            if last.name != snap.name {
                let rejection = WatchRejection::GuildMismatch {
                    expected: last.name.clone(),
                    got: snap.name.clone(),
                };
                warn!(%rejection, "roster snapshot rejected");
                return Err(rejection);
            }
        }

        match self.watermark.accept(&snap) {
            SnapshotFreshness::Current => {}
            SnapshotFreshness::Untimed => {
                debug!(guild = %snap.name, "roster snapshot has no request time; diffing anyway");
            }
            SnapshotFreshness::Stale {
                watermark_secs,
                got_secs,
            } => {
                let rejection = WatchRejection::Stale {
                    watermark_secs,
                    got_secs,
                };
                warn!(guild = %snap.name, %rejection, "roster snapshot rejected");
                return Err(rejection);
            }
        }

        let outcome = match self.last.as_ref() {
            None => {
                info!(guild = %snap.name, members = snap.members.len(), "roster baseline taken");
                WatchOutcome::Baseline {
                    members: snap.members.len(),
                }
            }
            Some(prior) => {
                let d = diff(prior, &snap);
                if d.is_empty() {
                    WatchOutcome::Unchanged
                } else {
                    info!(
                        guild = %snap.name,
                        joined = ?d.joined_names(),
                        left = ?d.left_names(),
                        renamed = d.renamed.len(),
                        rank_changes = d.rank_changes.len(),
                        "roster changed"
                    );
                    WatchOutcome::Changed(d)
                }
            }
        };

        self.last = Some(snap);
        Ok(outcome)
    }
}

//! gw-reconcile
//!
//! Roster reconciliation between guild snapshots.
//!
//! - Membership identity is the member uuid, never list position or name
//! - Joined = current minus prior, left = prior minus current
//! - Renames and rank changes are reported for uuids present on both sides
//! - Online membership joins the roster to the presence feed by name
//! - Snapshots older than the last accepted one are rejected by the watermark
//!
//! Deterministic, pure logic. No IO. The only state is [`RosterWatch`], owned
//! by whoever polls.

mod engine;
mod types;
mod watch;
mod watermark;

pub use engine::{diff, online_by_server, online_members};
pub use types::*;
pub use watch::{RosterWatch, WatchOutcome, WatchRejection};
pub use watermark::{SnapshotFreshness, SnapshotWatermark};

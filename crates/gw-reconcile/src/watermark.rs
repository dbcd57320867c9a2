//! Guild snapshot ordering by upstream request time.
//!
//! A cached or out-of-order response would otherwise read as members leaving
//! and then rejoining, so a snapshot requested before the latest timed one
//! seen is refused. Equal times pass. A snapshot with no request time cannot
//! be ordered: it passes and leaves the mark where it was.

use gw_schemas::GuildSnapshot;

/// How a [`GuildSnapshot`] sits relative to the watermark.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SnapshotFreshness {
    /// Requested at or after the mark.
    Current,
    /// Upstream sent no request time.
    Untimed,
    /// Requested strictly before the mark.
    Stale { watermark_secs: i64, got_secs: i64 },
}

impl SnapshotFreshness {
    pub fn is_stale(&self) -> bool {
        matches!(self, SnapshotFreshness::Stale { .. })
    }
}

#[derive(Clone, Debug, Default)]
pub struct SnapshotWatermark {
    mark: Option<i64>,
}

impl SnapshotWatermark {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify `snap` without moving the mark.
    pub fn check(&self, snap: &GuildSnapshot) -> SnapshotFreshness {
        match (snap.requested_at_secs, self.mark) {
            (None, _) => SnapshotFreshness::Untimed,
            (Some(got), Some(mark)) if got < mark => SnapshotFreshness::Stale {
                watermark_secs: mark,
                got_secs: got,
            },
            (Some(_), _) => SnapshotFreshness::Current,
        }
    }

    /// Classify `snap`; a current snapshot raises the mark to its request time.
    pub fn accept(&mut self, snap: &GuildSnapshot) -> SnapshotFreshness {
        let freshness = self.check(snap);
        if freshness == SnapshotFreshness::Current {
            self.mark = snap.requested_at_secs;
        }
        freshness
    }

    /// Request time of the latest timed snapshot accepted, if any.
    pub fn mark_secs(&self) -> Option<i64> {
        self.mark
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(secs: Option<i64>) -> GuildSnapshot {
        GuildSnapshot {
            name: "G".to_string(),
            prefix: String::new(),
            members: Vec::new(),
            level: 0,
            xp: 0.0,
            territories: 0,
            created: None,
            banner: None,
            requested_at_secs: secs,
        }
    }

    #[test]
    fn untimed_snapshot_between_timed_ones_keeps_the_mark() {
        let mut wm = SnapshotWatermark::new();
        assert_eq!(wm.accept(&at(Some(50))), SnapshotFreshness::Current);
        assert_eq!(wm.accept(&at(None)), SnapshotFreshness::Untimed);
        assert_eq!(wm.mark_secs(), Some(50));
        assert!(wm.check(&at(Some(49))).is_stale());
    }
}

use std::collections::BTreeMap;

use gw_schemas::Member;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Same uuid, different name.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Rename {
    pub uuid: Uuid,
    pub from: String,
    pub to: String,
}

/// Same uuid, different rank string.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RankChange {
    pub uuid: Uuid,
    pub name: String,
    pub from: String,
    pub to: String,
}

/// Membership difference between a prior and a current roster.
///
/// Built fresh by [`crate::diff`] and never mutated afterwards. Every
/// collection is keyed or sorted by uuid, so output order is stable.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterDiff {
    /// In current, not in prior. Values are the current records.
    pub joined: BTreeMap<Uuid, Member>,
    /// In prior, not in current. Values are the prior records.
    pub left: BTreeMap<Uuid, Member>,
    pub renamed: Vec<Rename>,
    pub rank_changes: Vec<RankChange>,
}

impl RosterDiff {
    pub fn empty() -> Self {
        Self::default()
    }

    /// No membership change at all (joins, leaves, renames, rank changes).
    pub fn is_empty(&self) -> bool {
        self.joined.is_empty()
            && self.left.is_empty()
            && self.renamed.is_empty()
            && self.rank_changes.is_empty()
    }

    /// Only joins and leaves; renames and rank changes keep membership intact.
    pub fn membership_changed(&self) -> bool {
        !self.joined.is_empty() || !self.left.is_empty()
    }

    pub fn joined_names(&self) -> Vec<&str> {
        self.joined.values().map(|m| m.name.as_str()).collect()
    }

    pub fn left_names(&self) -> Vec<&str> {
        self.left.values().map(|m| m.name.as_str()).collect()
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Parsed guild-stats record.
///
/// `members` keeps upstream order, which matters for positional displays only.
/// Identity comparisons go through [`Member::uuid`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuildSnapshot {
    pub name: String,
    pub prefix: String,
    pub members: Vec<Member>,
    pub level: u32,
    /// Progress toward the next guild level, normalized numeric.
    pub xp: f64,
    pub territories: i64,
    pub created: Option<DateTime<Utc>>,
    pub banner: Option<Banner>,
    /// Upstream request timestamp (epoch seconds). `None` when the response
    /// carried none, or a zero.
    pub requested_at_secs: Option<i64>,
}

impl GuildSnapshot {
    pub fn member_by_name(&self, name: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.name == name)
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub name: String,
    /// Stable identity. Names change upstream; uuids do not.
    pub uuid: Uuid,
    pub rank: String,
    pub contributed: i64,
    pub joined: Option<DateTime<Utc>>,
}

impl Member {
    pub fn new(name: impl Into<String>, uuid: Uuid, rank: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            uuid,
            rank: rank.into(),
            contributed: 0,
            joined: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Banner {
    pub base: String,
    pub tier: i64,
    pub structure: String,
    pub layers: Vec<BannerLayer>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BannerLayer {
    pub colour: String,
    pub pattern: String,
}

use std::fmt;

use chrono::{DateTime, Utc};
use gw_schemas::PlayerSnapshot;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::elapsed::Elapsed;
use crate::playtime::{playtime_hours, playtime_hours_2dp};
use crate::rank::tier_marker;

// ---------------------------------------------------------------------------
// Presence
// ---------------------------------------------------------------------------

/// Where (or how long ago) a player was last seen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LastSeen {
    Online { server: Option<String> },
    Offline(Elapsed),
    /// Offline with no recorded last join.
    Unknown,
}

impl LastSeen {
    pub fn from_snapshot(p: &PlayerSnapshot, now: DateTime<Utc>) -> Self {
        if p.presence.online {
            return LastSeen::Online {
                server: p.presence.server.clone(),
            };
        }
        match p.last_join {
            Some(at) => LastSeen::Offline(Elapsed::between(at, now)),
            None => LastSeen::Unknown,
        }
    }
}

impl fmt::Display for LastSeen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LastSeen::Online {
                server: Some(server),
            } => write!(f, "Online at {server}"),
            LastSeen::Online { server: None } => f.write_str("Online"),
            LastSeen::Offline(elapsed) => write!(f, "{elapsed}"),
            LastSeen::Unknown => f.write_str("Unknown"),
        }
    }
}

// ---------------------------------------------------------------------------
// Player summary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildLine {
    pub name: String,
    pub rank: Option<String>,
    /// Star marker for known ranks, the rank itself otherwise.
    pub tier: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSummary {
    pub username: String,
    /// `"{username} [{tag}]"` when a tag is displayed, else the username.
    pub display_name: String,
    pub rank: Option<String>,
    pub veteran: bool,
    pub guild: Option<GuildLine>,
    pub playtime_hours: i64,
    pub playtime_hours_2dp: f64,
    pub logins: i64,
    pub deaths: i64,
    pub last_seen: LastSeen,
    /// Time since first join; `None` when upstream has no first-join instant.
    pub first_joined: Option<Elapsed>,
}

pub fn display_name(p: &PlayerSnapshot) -> String {
    match &p.tag {
        Some(tag) => format!("{} [{}]", p.username, tag),
        None => p.username.clone(),
    }
}

/// Build the stats summary of `p` as seen at `now`.
pub fn summarize_player(p: &PlayerSnapshot, now: DateTime<Utc>) -> PlayerSummary {
    let last_seen = LastSeen::from_snapshot(p, now);
    if let LastSeen::Offline(e) = &last_seen {
        if e.skewed {
            warn!(
                player = %p.username,
                last_join = ?p.last_join,
                %now,
                "last join lies in the future"
            );
        }
    }

    let first_joined = p.first_join.map(|at| Elapsed::between(at, now));
    if first_joined.is_some_and(|e| e.skewed) {
        warn!(
            player = %p.username,
            first_join = ?p.first_join,
            %now,
            "first join lies in the future"
        );
    }

    let guild = p.guild.as_ref().map(|g| GuildLine {
        name: g.name.clone(),
        rank: g.rank.clone(),
        tier: g.rank.as_deref().map(|r| tier_marker(r).to_string()),
    });

    PlayerSummary {
        username: p.username.clone(),
        display_name: display_name(p),
        rank: p.rank.clone(),
        veteran: p.veteran,
        guild,
        playtime_hours: playtime_hours(p.playtime),
        playtime_hours_2dp: playtime_hours_2dp(p.playtime),
        logins: p.global.logins,
        deaths: p.global.deaths,
        last_seen,
        first_joined,
    }
}

// ---------------------------------------------------------------------------
// Characters
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterSummary {
    /// Display position, from 1. Carries no identity.
    pub index: usize,
    pub id: String,
    pub class_type: String,
    pub total_level: u32,
    pub combat_level: u32,
    /// Progress toward the next combat level, as reported.
    pub combat_xp_percent: f64,
}

/// One line per character, in the snapshot's map iteration order.
pub fn summarize_characters(p: &PlayerSnapshot) -> Vec<CharacterSummary> {
    p.characters
        .values()
        .enumerate()
        .map(|(i, c)| {
            let combat = c.combat();
            CharacterSummary {
                index: i + 1,
                id: c.id.clone(),
                class_type: c.class_type.clone(),
                total_level: c.level,
                combat_level: combat.level,
                combat_xp_percent: combat.xp,
            }
        })
        .collect()
}

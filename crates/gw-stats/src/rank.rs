use serde::{Deserialize, Serialize};

/// Guild ranks the upstream API reports, lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GuildRank {
    Recruit,
    Recruiter,
    Captain,
    Strategist,
    Chief,
    Owner,
}

impl GuildRank {
    pub const ALL: [GuildRank; 6] = [
        GuildRank::Recruit,
        GuildRank::Recruiter,
        GuildRank::Captain,
        GuildRank::Strategist,
        GuildRank::Chief,
        GuildRank::Owner,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GuildRank::Recruit => "RECRUIT",
            GuildRank::Recruiter => "RECRUITER",
            GuildRank::Captain => "CAPTAIN",
            GuildRank::Strategist => "STRATEGIST",
            GuildRank::Chief => "CHIEF",
            GuildRank::Owner => "OWNER",
        }
    }

    /// Exact match on the upstream spelling.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.as_str() == s)
    }

    /// Star-count symbol. Recruits get a dash.
    pub fn marker(&self) -> &'static str {
        match self {
            GuildRank::Recruit => "-",
            GuildRank::Recruiter => "*",
            GuildRank::Captain => "**",
            GuildRank::Strategist => "***",
            GuildRank::Chief => "****",
            GuildRank::Owner => "*****",
        }
    }
}

/// Tier marker for an upstream rank string; unknown ranks pass through verbatim.
pub fn tier_marker(rank: &str) -> &str {
    match GuildRank::parse(rank) {
        Some(r) => r.marker(),
        None => rank,
    }
}

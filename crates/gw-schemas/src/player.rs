use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

/// Parsed player-stats record.
///
/// A player that does not exist upstream never produces one of these; the
/// parser reports `NotFound` instead so callers can tell "absent" apart from
/// "present with zeros".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub username: String,
    pub uuid: Uuid,
    /// Site rank (e.g. `"Player"`, `"Moderator"`).
    pub rank: Option<String>,
    /// Cosmetic tag, only set when upstream flags it for display.
    pub tag: Option<String>,
    pub veteran: bool,
    pub guild: Option<GuildAffiliation>,
    pub presence: Presence,
    pub first_join: Option<DateTime<Utc>>,
    pub last_join: Option<DateTime<Utc>>,
    /// Raw playtime in upstream playtime units (see `gw-stats` for hours).
    pub playtime: f64,
    pub global: GlobalStats,
    /// Keyed by the opaque per-character id. Iteration order carries no meaning.
    pub characters: BTreeMap<String, CharacterRecord>,
}

impl PlayerSnapshot {
    pub fn guild_name(&self) -> Option<&str> {
        self.guild.as_ref().map(|g| g.name.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildAffiliation {
    pub name: String,
    pub rank: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Presence {
    pub online: bool,
    pub server: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PvpStats {
    pub kills: i64,
    pub deaths: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotalLevel {
    pub combat: i64,
    pub profession: i64,
    pub combined: i64,
}

/// Account-wide aggregate counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalStats {
    pub blocks_walked: i64,
    pub items_identified: i64,
    pub mobs_killed: i64,
    pub total_level: TotalLevel,
    pub pvp: PvpStats,
    pub logins: i64,
    pub deaths: i64,
    pub discoveries: i64,
    pub events_won: i64,
}

// ---------------------------------------------------------------------------
// Characters
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterRecord {
    pub id: String,
    /// Class name as reported upstream (e.g. `"MAGE"`, `"ARCHER"`).
    pub class_type: String,
    /// Total level across combat and professions.
    pub level: u32,
    pub professions: BTreeMap<Profession, ProfessionEntry>,
    pub dungeons: CompletionLog,
    pub raids: CompletionLog,
    pub quests: QuestLog,
    pub items_identified: i64,
    pub mobs_killed: i64,
    pub blocks_walked: i64,
    pub logins: i64,
    pub deaths: i64,
    pub playtime: i64,
    pub discoveries: i64,
    pub events_won: i64,
    pub pvp: PvpStats,
    pub skills: SkillPoints,
    pub game_modes: GameModes,
    pub pre_economy_update: bool,
}

impl CharacterRecord {
    /// Entry for `profession`, or the zero entry when upstream omitted it.
    pub fn profession(&self, profession: Profession) -> ProfessionEntry {
        self.professions
            .get(&profession)
            .copied()
            .unwrap_or_default()
    }

    pub fn combat(&self) -> ProfessionEntry {
        self.profession(Profession::Combat)
    }
}

/// One leveling track. `xp` is the progress value after numeric
/// normalization, whatever encoding upstream used.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfessionEntry {
    pub level: u32,
    pub xp: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionLog {
    pub completed: i64,
    /// `(name, times completed)` in upstream order.
    pub entries: Vec<(String, i64)>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestLog {
    pub completed: i64,
    pub list: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillPoints {
    pub strength: i64,
    pub dexterity: i64,
    pub intelligence: i64,
    pub defence: i64,
    pub agility: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameModes {
    pub hardcore: bool,
    pub ironman: bool,
    pub craftsman: bool,
    pub hunted: bool,
}

// ---------------------------------------------------------------------------
// Professions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profession {
    Combat,
    Alchemism,
    Armouring,
    Cooking,
    Farming,
    Fishing,
    Jeweling,
    Mining,
    Scribing,
    Tailoring,
    Weaponsmithing,
    Woodcutting,
    Woodworking,
}

impl Profession {
    pub const ALL: [Profession; 13] = [
        Profession::Combat,
        Profession::Alchemism,
        Profession::Armouring,
        Profession::Cooking,
        Profession::Farming,
        Profession::Fishing,
        Profession::Jeweling,
        Profession::Mining,
        Profession::Scribing,
        Profession::Tailoring,
        Profession::Weaponsmithing,
        Profession::Woodcutting,
        Profession::Woodworking,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Profession::Combat => "combat",
            Profession::Alchemism => "alchemism",
            Profession::Armouring => "armouring",
            Profession::Cooking => "cooking",
            Profession::Farming => "farming",
            Profession::Fishing => "fishing",
            Profession::Jeweling => "jeweling",
            Profession::Mining => "mining",
            Profession::Scribing => "scribing",
            Profession::Tailoring => "tailoring",
            Profession::Weaponsmithing => "weaponsmithing",
            Profession::Woodcutting => "woodcutting",
            Profession::Woodworking => "woodworking",
        }
    }

    /// Case-insensitive lookup of an upstream profession key.
    pub fn parse(s: &str) -> Option<Self> {
        let key = s.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|p| p.as_str() == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profession_parse_round_trips_every_variant() {
        for p in Profession::ALL {
            assert_eq!(Profession::parse(p.as_str()), Some(p));
        }
        assert_eq!(Profession::parse("  Mining "), Some(Profession::Mining));
        assert_eq!(Profession::parse("fletching"), None);
    }

    #[test]
    fn missing_profession_reads_as_zero_entry() {
        let c = CharacterRecord {
            id: "c1".to_string(),
            class_type: "MAGE".to_string(),
            level: 1,
            professions: BTreeMap::new(),
            dungeons: CompletionLog::default(),
            raids: CompletionLog::default(),
            quests: QuestLog::default(),
            items_identified: 0,
            mobs_killed: 0,
            blocks_walked: 0,
            logins: 0,
            deaths: 0,
            playtime: 0,
            discoveries: 0,
            events_won: 0,
            pvp: PvpStats::default(),
            skills: SkillPoints::default(),
            game_modes: GameModes::default(),
            pre_economy_update: false,
        };
        assert_eq!(c.combat(), ProfessionEntry::default());
        assert_eq!(c.game_modes, GameModes::default());
    }
}

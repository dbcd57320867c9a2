//! gw-stats
//!
//! Derived, display-ready values computed from parsed snapshots: elapsed-time
//! decomposition, playtime hours, guild rank tiers, and the player and
//! character summaries built from them.
//!
//! Everything here is a pure function of its inputs. "Now" is always passed
//! in by the caller.

pub mod elapsed;
pub mod playtime;
pub mod rank;
pub mod summary;

pub use elapsed::{Elapsed, LongElapsed};
pub use playtime::{playtime_hours, playtime_hours_2dp, CONVERSION_FACTOR};
pub use rank::{tier_marker, GuildRank};
pub use summary::{
    display_name, summarize_characters, summarize_player, CharacterSummary, GuildLine, LastSeen,
    PlayerSummary,
};

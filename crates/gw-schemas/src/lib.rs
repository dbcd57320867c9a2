//! gw-schemas
//!
//! Internal snapshot model shared by ingest, stats and reconcile.
//!
//! Every type here is a plain immutable value record. Parsing lives in
//! `gw-ingest`; nothing in this crate touches JSON wire shapes directly.

mod guild;
mod player;

pub use guild::*;
pub use player::*;

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Per-server listing of the player names currently online.
///
/// Derived from the online-players endpoint on every poll. It is not owned by
/// any snapshot and carries no uuids, so name is the only join key available.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnlinePresenceFeed {
    pub servers: BTreeMap<String, Vec<String>>,
}

impl OnlinePresenceFeed {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Union of every server's player list.
    pub fn all_players(&self) -> BTreeSet<&str> {
        self.servers
            .values()
            .flat_map(|names| names.iter().map(String::as_str))
            .collect()
    }

    /// Every server listing `name`. A name may appear on more than one server
    /// when unrelated players share it across worlds.
    pub fn servers_of<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.servers
            .iter()
            .filter(move |(_, names)| names.iter().any(|n| n == name))
            .map(|(server, _)| server.as_str())
    }

    pub fn player_count(&self) -> usize {
        self.servers.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed() -> OnlinePresenceFeed {
        let mut servers = BTreeMap::new();
        servers.insert("WC1".to_string(), vec!["Alice".to_string(), "Dan".to_string()]);
        servers.insert("WC2".to_string(), vec!["Carol".to_string(), "Alice".to_string()]);
        OnlinePresenceFeed { servers }
    }

    #[test]
    fn all_players_is_union_without_duplicates() {
        let f = feed();
        let all = f.all_players();
        assert_eq!(all.len(), 3);
        assert!(all.contains("Alice"));
        assert!(all.contains("Carol"));
        assert_eq!(f.player_count(), 4);
    }

    #[test]
    fn servers_of_lists_every_matching_server() {
        let f = feed();
        let servers: Vec<&str> = f.servers_of("Alice").collect();
        assert_eq!(servers, vec!["WC1", "WC2"]);
        assert_eq!(f.servers_of("Nobody").count(), 0);
    }
}

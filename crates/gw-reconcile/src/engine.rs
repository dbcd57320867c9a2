use std::collections::{BTreeMap, BTreeSet};

use gw_schemas::{GuildSnapshot, Member, OnlinePresenceFeed};
use uuid::Uuid;

use crate::{RankChange, Rename, RosterDiff};

fn by_uuid(g: &GuildSnapshot) -> BTreeMap<Uuid, &Member> {
    g.members.iter().map(|m| (m.uuid, m)).collect()
}

/// Deterministic roster reconciliation keyed by uuid:
/// - uuid only in `current` => joined
/// - uuid only in `prior` => left
/// - uuid on both sides with a different name => renamed
/// - uuid on both sides with a different rank => rank change
///
/// Position in the member list never matters.
pub fn diff(prior: &GuildSnapshot, current: &GuildSnapshot) -> RosterDiff {
    let before = by_uuid(prior);
    let after = by_uuid(current);

    let mut out = RosterDiff::empty();

    for (uuid, m) in &after {
        match before.get(uuid) {
            None => {
                out.joined.insert(*uuid, (*m).clone());
            }
            Some(old) => {
                if old.name != m.name {
                    out.renamed.push(Rename {
                        uuid: *uuid,
                        from: old.name.clone(),
                        to: m.name.clone(),
                    });
                }
                if old.rank != m.rank {
                    out.rank_changes.push(RankChange {
                        uuid: *uuid,
                        name: m.name.clone(),
                        from: old.rank.clone(),
                        to: m.rank.clone(),
                    });
                }
            }
        }
    }

    for (uuid, m) in &before {
        if !after.contains_key(uuid) {
            out.left.insert(*uuid, (*m).clone());
        }
    }

    out
}

/// Roster members whose name appears on any server in `feed`.
///
/// Roster order is kept and each member appears at most once, even when the
/// name is listed on several servers.
pub fn online_members(guild: &GuildSnapshot, feed: &OnlinePresenceFeed) -> Vec<Member> {
    let online: BTreeSet<&str> = feed.all_players();
    guild
        .members
        .iter()
        .filter(|m| online.contains(m.name.as_str()))
        .cloned()
        .collect()
}

/// Online roster members grouped by the server listing them.
///
/// Servers with no roster member are omitted. Within a server, roster order
/// is kept.
pub fn online_by_server(
    guild: &GuildSnapshot,
    feed: &OnlinePresenceFeed,
) -> BTreeMap<String, Vec<Member>> {
    let mut out: BTreeMap<String, Vec<Member>> = BTreeMap::new();
    for m in &guild.members {
        for server in feed.servers_of(&m.name) {
            out.entry(server.to_string()).or_default().push(m.clone());
        }
    }
    out
}

//! Plain-text rendering of the core records.
//!
//! Nothing here computes: every value arrives already derived, this module
//! only lays it out.

use std::collections::BTreeMap;

use gw_reconcile::{RosterDiff, WatchOutcome};
use gw_schemas::Member;
use gw_stats::{CharacterSummary, PlayerSummary};

/// Newline-terminated block.
fn block(lines: Vec<String>) -> String {
    lines.into_iter().map(|l| l + "\n").collect()
}

pub fn stats(s: &PlayerSummary) -> String {
    let guild = match &s.guild {
        Some(g) => format!("Guild: {} [{}]", g.name, g.tier.as_deref().unwrap_or("")),
        None => "Guild: none".to_string(),
    };
    let first_joined = match &s.first_joined {
        Some(e) => e.long().to_string(),
        None => "Unknown".to_string(),
    };
    block(vec![
        s.display_name.clone(),
        guild,
        format!("Playtime: {} hours", s.playtime_hours),
        format!("Logins / Deaths: {} / {}", s.logins, s.deaths),
        format!("Last Seen: {}", s.last_seen),
        format!("First joined: {first_joined}"),
    ])
}

pub fn characters(username: &str, lines: &[CharacterSummary]) -> String {
    let mut out = vec![format!("{username}'s Character(s)")];
    if lines.is_empty() {
        out.push("(no characters)".to_string());
    }
    for c in lines {
        out.push(String::new());
        out.push(format!("[ {} ] {}", c.index, c.class_type));
        out.push(format!("Total Level : {}", c.total_level));
        out.push(format!(
            "Combat Level : {} [ {}% ]",
            c.combat_level, c.combat_xp_percent
        ));
    }
    block(out)
}

pub fn guild_online(
    guild: &str,
    roster_size: usize,
    online: &[Member],
    by_server: &BTreeMap<String, Vec<Member>>,
) -> String {
    let names: Vec<&str> = online.iter().map(|m| m.name.as_str()).collect();
    let names = if names.is_empty() {
        "none".to_string()
    } else {
        names.join(", ")
    };
    let mut out = vec![format!(
        "Online guild members of {guild} ({}/{roster_size}): {names}",
        online.len()
    )];
    for (server, members) in by_server {
        for m in members {
            out.push(format!("{server} : {}", m.name));
        }
    }
    block(out)
}

pub fn roster_diff(d: &RosterDiff) -> String {
    if d.is_empty() {
        return "no changes\n".to_string();
    }
    let mut out = Vec::new();
    for m in d.joined.values() {
        out.push(format!("{} joined the guild", m.name));
    }
    for m in d.left.values() {
        out.push(format!("{} left the guild", m.name));
    }
    for r in &d.renamed {
        out.push(format!("{} is now known as {}", r.from, r.to));
    }
    for r in &d.rank_changes {
        out.push(format!("{} rank {} -> {}", r.name, r.from, r.to));
    }
    block(out)
}

pub fn watch_outcome(guild: &str, outcome: &WatchOutcome) -> String {
    match outcome {
        WatchOutcome::Baseline { members } => {
            format!("watching {guild}: baseline of {members} member(s)\n")
        }
        WatchOutcome::Unchanged => String::new(),
        WatchOutcome::Changed(d) => roster_diff(d),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gw_stats::{Elapsed, GuildLine, LastSeen};

    fn summary() -> PlayerSummary {
        PlayerSummary {
            username: "Salted".to_string(),
            display_name: "Salted [VIP+]".to_string(),
            rank: None,
            veteran: false,
            guild: Some(GuildLine {
                name: "Sins of Seedia".to_string(),
                rank: Some("CAPTAIN".to_string()),
                tier: Some("**".to_string()),
            }),
            playtime_hours: 39,
            playtime_hours_2dp: 39.17,
            logins: 842,
            deaths: 245,
            last_seen: LastSeen::Offline(Elapsed::from_millis(90_061_234)),
            first_joined: None,
        }
    }

    #[test]
    fn stats_layout() {
        let text = stats(&summary());
        assert_eq!(
            text,
            "Salted [VIP+]\n\
             Guild: Sins of Seedia [**]\n\
             Playtime: 39 hours\n\
             Logins / Deaths: 842 / 245\n\
             Last Seen: 1d 1h 1m 1s 234ms\n\
             First joined: Unknown\n"
        );
    }

    #[test]
    fn empty_diff_says_so() {
        assert_eq!(roster_diff(&RosterDiff::empty()), "no changes\n");
    }

    #[test]
    fn nobody_online() {
        let text = guild_online("G", 3, &[], &BTreeMap::new());
        assert_eq!(text, "Online guild members of G (0/3): none\n");
    }

    #[test]
    fn character_lines_are_separated_by_blank_lines() {
        let c = CharacterSummary {
            index: 1,
            id: "abc".to_string(),
            class_type: "MAGE".to_string(),
            total_level: 210,
            combat_level: 98,
            combat_xp_percent: 12.5,
        };
        assert_eq!(
            characters("Salted", &[c]),
            "Salted's Character(s)\n\n[ 1 ] MAGE\nTotal Level : 210\nCombat Level : 98 [ 12.5% ]\n"
        );
        assert_eq!(characters("x", &[]), "x's Character(s)\n(no characters)\n");
    }

    const UUID_A: &str = "00000000-0000-0000-0000-000000000001";
    const UUID_B: &str = "00000000-0000-0000-0000-000000000002";

    #[test]
    fn diff_lists_joins_before_departures() {
        let mut d = RosterDiff::empty();
        let ben = Member::new("Ben", UUID_B.parse().unwrap(), "RECRUIT");
        let ann = Member::new("Ann", UUID_A.parse().unwrap(), "OWNER");
        d.joined.insert(ben.uuid, ben);
        d.left.insert(ann.uuid, ann);
        assert_eq!(roster_diff(&d), "Ben joined the guild\nAnn left the guild\n");
    }
}

use std::collections::BTreeMap;

use gw_reconcile::*;
use gw_schemas::{GuildSnapshot, Member, OnlinePresenceFeed};
use uuid::Uuid;

fn guild(names: &[&str]) -> GuildSnapshot {
    GuildSnapshot {
        name: "G".to_string(),
        prefix: "G".to_string(),
        members: names
            .iter()
            .map(|n| Member::new(*n, Uuid::new_v4(), "RECRUIT"))
            .collect(),
        level: 1,
        xp: 0.0,
        territories: 0,
        created: None,
        banner: None,
        requested_at_secs: Some(1),
    }
}

/// `(server, name)` pairs; a server may repeat.
fn feed(pairs: &[(&str, &str)]) -> OnlinePresenceFeed {
    let mut servers: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (server, name) in pairs {
        servers
            .entry(server.to_string())
            .or_default()
            .push(name.to_string());
    }
    OnlinePresenceFeed { servers }
}

#[test]
fn scenario_only_roster_members_listed_online_are_returned() {
    let g = guild(&["Alice", "Bob"]);
    let f = feed(&[("serverA", "Alice"), ("serverB", "Carol")]);

    let online = online_members(&g, &f);
    let names: Vec<&str> = online.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["Alice"]);
}

#[test]
fn scenario_online_members_keep_roster_order() {
    let g = guild(&["Zed", "Amy", "Kim"]);
    let f = feed(&[("WC1", "Kim"), ("WC1", "Amy"), ("WC2", "Zed")]);

    let names: Vec<String> = online_members(&g, &f).into_iter().map(|m| m.name).collect();
    assert_eq!(names, vec!["Zed", "Amy", "Kim"]);
}

#[test]
fn scenario_empty_feed_means_nobody_online() {
    let g = guild(&["Alice"]);
    assert!(online_members(&g, &OnlinePresenceFeed::empty()).is_empty());
    assert!(online_by_server(&g, &OnlinePresenceFeed::empty()).is_empty());
}

#[test]
fn scenario_online_grouped_by_server() {
    let g = guild(&["Alice", "Bob", "Dan"]);
    let f = feed(&[
        ("WC1", "Bob"),
        ("WC1", "Eve"),
        ("WC2", "Carol"),
        ("WC3", "Dan"),
        ("WC3", "Alice"),
    ]);

    let grouped = online_by_server(&g, &f);

    assert_eq!(grouped.keys().collect::<Vec<_>>(), vec!["WC1", "WC3"]);
    let wc3: Vec<&str> = grouped["WC3"].iter().map(|m| m.name.as_str()).collect();
    assert_eq!(wc3, vec!["Alice", "Dan"]);
}

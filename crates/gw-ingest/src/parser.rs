//! Snapshot parser: raw response bodies → `gw-schemas` snapshots.
//!
//! Pure transformations. Required identity fields are the only things that
//! can fail on absence; every nested optional substructure falls back to its
//! empty form. Unknown fields are ignored.

use std::collections::{BTreeMap, BTreeSet};

use gw_schemas::{
    Banner, BannerLayer, CharacterRecord, CompletionLog, GameModes, GlobalStats, GuildAffiliation,
    GuildSnapshot, Member, OnlinePresenceFeed, PlayerSnapshot, Presence, Profession,
    ProfessionEntry, PvpStats, QuestLog, SkillPoints, TotalLevel,
};
use serde_json::Value;
use tracing::debug;

use crate::error::{json_type, IngestError, SchemaError};
use crate::normalizer::Fields;

/// Metadata key the online-players endpoint mixes into its server map.
pub const REQUEST_METADATA_KEY: &str = "request";

fn decode(body: &[u8]) -> Result<Value, SchemaError> {
    serde_json::from_slice(body).map_err(|e| SchemaError::Malformed {
        reason: e.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

/// Parse a player-stats response body.
///
/// An empty (or missing) `data` collection is the upstream "player does not
/// exist" answer and yields [`IngestError::NotFound`].
pub fn parse_player(body: &[u8]) -> Result<PlayerSnapshot, IngestError> {
    let doc = decode(body)?;
    let root = Fields::root(&doc)?;

    let data = root.array("data")?;
    let Some(first) = data.first() else {
        return Err(IngestError::NotFound { what: "player" });
    };
    if data.len() > 1 {
        debug!(
            entries = data.len(),
            "player response carried extra data entries; using the first"
        );
    }

    Ok(player_from(&Fields::at("data[0]", Some(first))?)?)
}

fn player_from(p: &Fields<'_>) -> Result<PlayerSnapshot, SchemaError> {
    let username = p.required_text("username")?;
    let uuid = p.required_uuid("uuid")?;

    let meta = p.child("meta")?;
    let location = meta.child("location")?;
    let presence = Presence {
        online: location.flag("online")?,
        server: location.text("server")?,
    };

    let tag_obj = meta.child("tag")?;
    let tag = if tag_obj.flag("display")? {
        tag_obj.text("value")?
    } else {
        None
    };

    let guild_obj = p.child("guild")?;
    let guild = match guild_obj.text("name")? {
        Some(name) => Some(GuildAffiliation {
            name,
            rank: guild_obj.text("rank")?,
        }),
        None => None,
    };

    let mut characters = BTreeMap::new();
    let chars = p.child("characters")?;
    for (id, raw) in chars.entries() {
        let c = Fields::at(chars.field(id), Some(raw))?;
        characters.insert(id.clone(), character_from(id, &c)?);
    }

    Ok(PlayerSnapshot {
        username,
        uuid,
        rank: p.text("rank")?,
        tag,
        veteran: meta.flag("veteran")?,
        guild,
        presence,
        first_join: meta.instant("firstJoin")?,
        last_join: meta.instant("lastJoin")?,
        playtime: meta.numeric("playtime")?,
        global: global_from(&p.child("global")?)?,
        characters,
    })
}

fn pvp_from(o: &Fields<'_>) -> Result<PvpStats, SchemaError> {
    Ok(PvpStats {
        kills: o.count("kills")?,
        deaths: o.count("deaths")?,
    })
}

fn global_from(g: &Fields<'_>) -> Result<GlobalStats, SchemaError> {
    let total = g.child("totalLevel")?;
    Ok(GlobalStats {
        blocks_walked: g.count("blocksWalked")?,
        items_identified: g.count("itemsIdentified")?,
        mobs_killed: g.count("mobsKilled")?,
        total_level: TotalLevel {
            combat: total.count("combat")?,
            profession: total.count("profession")?,
            combined: total.count("combined")?,
        },
        pvp: pvp_from(&g.child("pvp")?)?,
        logins: g.count("logins")?,
        deaths: g.count("deaths")?,
        discoveries: g.count("discoveries")?,
        events_won: g.count("eventsWon")?,
    })
}

fn completion_log_from(o: &Fields<'_>) -> Result<CompletionLog, SchemaError> {
    let key = "list";
    let mut entries = Vec::new();
    for (i, raw) in o.array(key)?.iter().enumerate() {
        let e = Fields::at(format!("{}[{i}]", o.field(key)), Some(raw))?;
        let name = e.text("name")?.unwrap_or_default();
        entries.push((name, e.count("completed")?));
    }
    Ok(CompletionLog {
        completed: o.count("completed")?,
        entries,
    })
}

fn quest_log_from(o: &Fields<'_>) -> Result<QuestLog, SchemaError> {
    let key = "list";
    let mut list = Vec::new();
    for (i, raw) in o.array(key)?.iter().enumerate() {
        match raw {
            Value::String(s) => list.push(s.clone()),
            other => {
                return Err(SchemaError::WrongType {
                    field: format!("{}[{i}]", o.field(key)),
                    expected: "string",
                    found: json_type(other),
                })
            }
        }
    }
    Ok(QuestLog {
        completed: o.count("completed")?,
        list,
    })
}

fn professions_from(o: &Fields<'_>) -> Result<BTreeMap<Profession, ProfessionEntry>, SchemaError> {
    let mut out = BTreeMap::new();
    for (key, raw) in o.entries() {
        let Some(profession) = Profession::parse(key) else {
            debug!(path = %o.field(key), "skipping unrecognised profession");
            continue;
        };
        let e = Fields::at(o.field(key), Some(raw))?;
        out.insert(
            profession,
            ProfessionEntry {
                level: e.level("level")?,
                xp: e.numeric("xp")?,
            },
        );
    }
    Ok(out)
}

fn character_from(id: &str, c: &Fields<'_>) -> Result<CharacterRecord, SchemaError> {
    let skills = c.child("skills")?;
    let modes = c.child("gamemode")?;

    Ok(CharacterRecord {
        id: id.to_string(),
        class_type: c.text("type")?.unwrap_or_default(),
        level: c.level("level")?,
        professions: professions_from(&c.child("professions")?)?,
        dungeons: completion_log_from(&c.child("dungeons")?)?,
        raids: completion_log_from(&c.child("raids")?)?,
        quests: quest_log_from(&c.child("quests")?)?,
        items_identified: c.count("itemsIdentified")?,
        mobs_killed: c.count("mobsKilled")?,
        blocks_walked: c.count("blocksWalked")?,
        logins: c.count("logins")?,
        deaths: c.count("deaths")?,
        playtime: c.count("playtime")?,
        discoveries: c.count("discoveries")?,
        events_won: c.count("eventsWon")?,
        pvp: pvp_from(&c.child("pvp")?)?,
        skills: SkillPoints {
            strength: skills.count("strength")?,
            dexterity: skills.count("dexterity")?,
            intelligence: skills.count("intelligence")?,
            // Upstream reports both spellings; only one is ever populated.
            defence: skills.count("defence")?.max(skills.count("defense")?),
            agility: skills.count("agility")?,
        },
        game_modes: GameModes {
            hardcore: modes.flag("hardcore")?,
            ironman: modes.flag("ironman")?,
            craftsman: modes.flag("craftsman")?,
            hunted: modes.flag("hunted")?,
        },
        pre_economy_update: c.flag("preEconomyUpdate")?,
    })
}

// ---------------------------------------------------------------------------
// Guild
// ---------------------------------------------------------------------------

/// Parse a guild-stats response body.
///
/// Member order is kept exactly as upstream sent it. Member names and uuids
/// must be unique within the roster.
pub fn parse_guild(body: &[u8]) -> Result<GuildSnapshot, IngestError> {
    let doc = decode(body)?;
    let root = Fields::root(&doc)?;

    if !root.contains("name") && root.contains("error") {
        debug!(error = ?root.get("error"), "guild lookup answered with an error envelope");
        return Err(IngestError::NotFound { what: "guild" });
    }

    Ok(guild_from(&root)?)
}

fn guild_from(g: &Fields<'_>) -> Result<GuildSnapshot, SchemaError> {
    let name = g.required_text("name")?;

    let mut members = Vec::new();
    let mut seen_names: BTreeSet<String> = BTreeSet::new();
    let mut seen_uuids = BTreeSet::new();
    for (i, raw) in g.array("members")?.iter().enumerate() {
        let m = member_from(&Fields::at(format!("members[{i}]"), Some(raw))?)?;
        if !seen_names.insert(m.name.clone()) {
            return Err(SchemaError::DuplicateMember {
                key: "name",
                value: m.name,
            });
        }
        if !seen_uuids.insert(m.uuid) {
            return Err(SchemaError::DuplicateMember {
                key: "uuid",
                value: m.uuid.to_string(),
            });
        }
        members.push(m);
    }

    let banner_obj = g.child("banner")?;
    let banner = if banner_obj.is_present() {
        Some(banner_from(&banner_obj)?)
    } else {
        None
    };

    Ok(GuildSnapshot {
        name,
        prefix: g.text("prefix")?.unwrap_or_default(),
        members,
        level: g.level("level")?,
        xp: g.numeric("xp")?,
        territories: g.count("territories")?,
        created: g.instant("created")?,
        banner,
        requested_at_secs: request_timestamp(&g.child("request")?)?,
    })
}

/// Absent and zero both mean upstream did not say when it answered.
fn request_timestamp(request: &Fields<'_>) -> Result<Option<i64>, SchemaError> {
    let secs = request.count("timestamp")?;
    Ok((secs > 0).then_some(secs))
}

fn member_from(m: &Fields<'_>) -> Result<Member, SchemaError> {
    Ok(Member {
        name: m.required_text("name")?,
        uuid: m.required_uuid("uuid")?,
        rank: m.text("rank")?.unwrap_or_default(),
        contributed: m.count("contributed")?,
        joined: m.instant("joined")?,
    })
}

fn banner_from(b: &Fields<'_>) -> Result<Banner, SchemaError> {
    let mut layers = Vec::new();
    for (i, raw) in b.array("layers")?.iter().enumerate() {
        let l = Fields::at(format!("{}[{i}]", b.field("layers")), Some(raw))?;
        layers.push(BannerLayer {
            colour: l.text("colour")?.unwrap_or_default(),
            pattern: l.text("pattern")?.unwrap_or_default(),
        });
    }
    Ok(Banner {
        base: b.text("base")?.unwrap_or_default(),
        tier: b.count("tier")?,
        structure: b.text("structure")?.unwrap_or_default(),
        layers,
    })
}

// ---------------------------------------------------------------------------
// Online players
// ---------------------------------------------------------------------------

/// Parse an online-players response body into a per-server name listing.
///
/// The `request` metadata key is dropped, as is any other key whose value is
/// not an array (counters and similar metadata).
pub fn parse_online_feed(body: &[u8]) -> Result<OnlinePresenceFeed, IngestError> {
    let doc = decode(body)?;
    let root = Fields::root(&doc)?;

    let mut servers = BTreeMap::new();
    for (key, raw) in root.entries() {
        if key == REQUEST_METADATA_KEY {
            continue;
        }
        let Value::Array(items) = raw else {
            debug!(key = %key, "dropping non-roster key from online feed");
            continue;
        };
        let mut names = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            match item {
                Value::String(s) => names.push(s.clone()),
                other => {
                    return Err(SchemaError::WrongType {
                        field: format!("{key}[{i}]"),
                        expected: "string",
                        found: json_type(other),
                    }
                    .into())
                }
            }
        }
        servers.insert(key.clone(), names);
    }

    Ok(OnlinePresenceFeed { servers })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const UUID_A: &str = "1ed075fc-5aa9-42e0-a29f-640326c1d80c";
    const UUID_B: &str = "2ed075fc-5aa9-42e0-a29f-640326c1d80c";

    #[test]
    fn empty_data_is_not_found() {
        let err = parse_player(br#"{"kind":"wynncraft/player/stats","code":200,"data":[]}"#)
            .unwrap_err();
        assert_eq!(err, IngestError::NotFound { what: "player" });
    }

    #[test]
    fn missing_data_is_not_found() {
        let err = parse_player(br#"{"code":400}"#).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn missing_uuid_is_schema_error() {
        let err = parse_player(br#"{"data":[{"username":"Salted"}]}"#).unwrap_err();
        assert_eq!(
            err,
            IngestError::Schema(SchemaError::MissingField {
                field: "data[0].uuid".to_string()
            })
        );
    }

    #[test]
    fn minimal_player_defaults_every_substructure() {
        let body = format!(r#"{{"data":[{{"username":"Salted","uuid":"{UUID_A}"}}]}}"#);
        let p = parse_player(body.as_bytes()).unwrap();
        assert_eq!(p.username, "Salted");
        assert_eq!(p.guild, None);
        assert!(!p.presence.online);
        assert_eq!(p.first_join, None);
        assert_eq!(p.playtime, 0.0);
        assert_eq!(p.global, GlobalStats::default());
        assert!(p.characters.is_empty());
    }

    #[test]
    fn not_json_is_malformed() {
        let err = parse_player(b"<html>502</html>").unwrap_err();
        assert!(matches!(
            err,
            IngestError::Schema(SchemaError::Malformed { .. })
        ));
    }

    #[test]
    fn profession_xp_accepts_both_encodings() {
        let body = format!(
            r#"{{"data":[{{"username":"x","uuid":"{UUID_A}","characters":{{
                "c1":{{"type":"MAGE","level":12,"professions":{{
                    "combat":{{"level":10,"xp":55.5}},
                    "mining":{{"level":3,"xp":120}},
                    "fletching":{{"level":1,"xp":1}}
                }}}}
            }}}}]}}"#
        );
        let p = parse_player(body.as_bytes()).unwrap();
        let c = &p.characters["c1"];
        assert_eq!(c.combat(), ProfessionEntry { level: 10, xp: 55.5 });
        assert_eq!(c.profession(Profession::Mining).xp, 120.0);
        assert_eq!(c.professions.len(), 2);
    }

    #[test]
    fn profession_xp_as_string_is_schema_error() {
        let body = format!(
            r#"{{"data":[{{"username":"x","uuid":"{UUID_A}","characters":{{
                "c1":{{"professions":{{"combat":{{"level":1,"xp":"55"}}}}}}
            }}}}]}}"#
        );
        let err = parse_player(body.as_bytes()).unwrap_err();
        assert_eq!(
            err,
            IngestError::Schema(SchemaError::NotNumeric {
                field: "data[0].characters.c1.professions.combat.xp".to_string(),
                found: "string"
            })
        );
    }

    #[test]
    fn defence_takes_either_spelling() {
        let body = format!(
            r#"{{"data":[{{"username":"x","uuid":"{UUID_A}","characters":{{
                "c1":{{"skills":{{"defence":0,"defense":40}}}}
            }}}}]}}"#
        );
        let p = parse_player(body.as_bytes()).unwrap();
        assert_eq!(p.characters["c1"].skills.defence, 40);
    }

    #[test]
    fn guild_keeps_member_order() {
        let body = format!(
            r#"{{"name":"Sins of Seedia","prefix":"SoS","members":[
                {{"name":"Zed","uuid":"{UUID_A}","rank":"OWNER"}},
                {{"name":"Amy","uuid":"{UUID_B}","rank":"RECRUIT"}}
            ],"request":{{"timestamp":1660000000,"version":1}}}}"#
        );
        let g = parse_guild(body.as_bytes()).unwrap();
        let names: Vec<&str> = g.members.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Zed", "Amy"]);
        assert_eq!(g.requested_at_secs, Some(1_660_000_000));
        assert_eq!(g.banner, None);
    }

    #[test]
    fn guild_without_request_block_has_no_timestamp() {
        let body = format!(r#"{{"name":"G","members":[{{"name":"A","uuid":"{UUID_A}"}}]}}"#);
        assert_eq!(parse_guild(body.as_bytes()).unwrap().requested_at_secs, None);

        let zero = format!(
            r#"{{"name":"G","members":[{{"name":"A","uuid":"{UUID_A}"}}],
                "request":{{"timestamp":0}}}}"#
        );
        assert_eq!(parse_guild(zero.as_bytes()).unwrap().requested_at_secs, None);
    }

    #[test]
    fn guild_rejects_duplicate_uuid() {
        let body = format!(
            r#"{{"name":"G","members":[
                {{"name":"A","uuid":"{UUID_A}"}},
                {{"name":"B","uuid":"{UUID_A}"}}
            ]}}"#
        );
        let err = parse_guild(body.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            IngestError::Schema(SchemaError::DuplicateMember { key: "uuid", .. })
        ));
    }

    #[test]
    fn guild_error_envelope_is_not_found() {
        let err = parse_guild(br#"{"error":"Guild not found"}"#).unwrap_err();
        assert_eq!(err, IngestError::NotFound { what: "guild" });
    }

    #[test]
    fn online_feed_drops_request_metadata() {
        let feed = parse_online_feed(
            br#"{"WC1":["Alice","Bob"],"WC2":[],"request":{"timestamp":1,"version":1}}"#,
        )
        .unwrap();
        assert_eq!(feed.servers.len(), 2);
        assert_eq!(feed.servers["WC1"], vec!["Alice", "Bob"]);
        assert!(!feed.servers.contains_key("request"));
    }

    #[test]
    fn online_feed_rejects_non_string_names() {
        let err = parse_online_feed(br#"{"WC1":["Alice", 7]}"#).unwrap_err();
        assert!(matches!(
            err,
            IngestError::Schema(SchemaError::WrongType { .. })
        ));
    }
}

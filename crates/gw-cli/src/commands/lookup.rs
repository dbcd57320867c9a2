//! One-shot lookups: stats, characters, guild-online.
//!
//! [`handle`] is the request surface. It fetches through any
//! [`StatsSource`], derives the record, and hands back a [`Response`]; [`run`]
//! renders that for the terminal.

use std::collections::BTreeMap;

use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use gw_ingest::{fetch_guild, fetch_online, fetch_player, LookupError, StatsSource};
use gw_reconcile::{online_by_server, online_members};
use gw_schemas::Member;
use gw_stats::{summarize_characters, summarize_player, CharacterSummary, PlayerSummary};
use serde::Serialize;

use crate::render;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Stats(String),
    Characters(String),
    GuildOnline(String),
}

impl Request {
    /// The name the user asked about.
    pub fn subject(&self) -> &str {
        match self {
            Request::Stats(username) | Request::Characters(username) => username,
            Request::GuildOnline(guild) => guild,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Response {
    Stats(PlayerSummary),
    Characters {
        username: String,
        characters: Vec<CharacterSummary>,
    },
    GuildOnline {
        guild: String,
        roster_size: usize,
        online: Vec<Member>,
        by_server: BTreeMap<String, Vec<Member>>,
    },
}

pub async fn handle(
    req: &Request,
    source: &dyn StatsSource,
    now: DateTime<Utc>,
) -> Result<Response, LookupError> {
    match req {
        Request::Stats(username) => {
            let p = fetch_player(source, username).await?;
            Ok(Response::Stats(summarize_player(&p, now)))
        }
        Request::Characters(username) => {
            let p = fetch_player(source, username).await?;
            Ok(Response::Characters {
                characters: summarize_characters(&p),
                username: p.username,
            })
        }
        Request::GuildOnline(guild) => {
            // Sequential: the roster first, then the feed it is joined against.
            let g = fetch_guild(source, guild).await?;
            let feed = fetch_online(source).await?;
            Ok(Response::GuildOnline {
                online: online_members(&g, &feed),
                by_server: online_by_server(&g, &feed),
                roster_size: g.member_count(),
                guild: g.name,
            })
        }
    }
}

pub fn render_text(resp: &Response) -> String {
    match resp {
        Response::Stats(s) => render::stats(s),
        Response::Characters {
            username,
            characters,
        } => render::characters(username, characters),
        Response::GuildOnline {
            guild,
            roster_size,
            online,
            by_server,
        } => render::guild_online(guild, *roster_size, online, by_server),
    }
}

/// Handle `req` and print the outcome.
///
/// Not found is an answer, printed on stdout with a zero exit. Schema and
/// fetch failures are errors.
pub async fn run(
    req: &Request,
    source: &dyn StatsSource,
    now: DateTime<Utc>,
    json: bool,
) -> Result<()> {
    match handle(req, source, now).await {
        Ok(resp) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&resp)?);
            } else {
                print!("{}", render_text(&resp));
            }
            Ok(())
        }
        Err(LookupError::NotFound { what }) => {
            if json {
                let v = serde_json::json!({
                    "kind": "not_found",
                    "what": what,
                    "name": req.subject(),
                });
                println!("{}", serde_json::to_string_pretty(&v)?);
            } else {
                println!("{what} '{}' not found", req.subject());
            }
            Ok(())
        }
        Err(LookupError::Schema(e)) => {
            bail!("unexpected upstream data for '{}': {e}", req.subject())
        }
        Err(LookupError::Fetch(e)) => bail!("no data for '{}': {e}", req.subject()),
    }
}

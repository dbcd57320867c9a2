//! Fetch-then-parse helpers over any [`StatsSource`].

use std::fmt;

use gw_schemas::{GuildSnapshot, OnlinePresenceFeed, PlayerSnapshot};
use tracing::{debug, warn};

use crate::error::{IngestError, SchemaError};
use crate::parser::{parse_guild, parse_online_feed, parse_player};
use crate::provider::{FetchError, StatsSource};

/// Failure of a combined fetch + parse.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupError {
    NotFound { what: &'static str },
    Schema(SchemaError),
    Fetch(FetchError),
}

impl LookupError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, LookupError::NotFound { .. })
    }
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupError::NotFound { what } => write!(f, "{what} not found"),
            LookupError::Schema(e) => write!(f, "schema error: {e}"),
            LookupError::Fetch(e) => write!(f, "fetch failed: {e}"),
        }
    }
}

impl std::error::Error for LookupError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LookupError::Schema(e) => Some(e),
            LookupError::Fetch(e) => Some(e),
            LookupError::NotFound { .. } => None,
        }
    }
}

impl From<IngestError> for LookupError {
    fn from(e: IngestError) -> Self {
        match e {
            IngestError::NotFound { what } => LookupError::NotFound { what },
            IngestError::Schema(s) => LookupError::Schema(s),
        }
    }
}

fn fetch_failed(what: &'static str, source: &str, e: FetchError) -> LookupError {
    if e.is_not_found() {
        debug!(source, what, "upstream answered 404");
        return LookupError::NotFound { what };
    }
    LookupError::Fetch(e)
}

fn parse_failed(what: &'static str, source: &str, e: IngestError) -> LookupError {
    if let IngestError::Schema(s) = &e {
        warn!(source, what, error = %s, "payload rejected");
    }
    e.into()
}

pub async fn fetch_player(
    source: &dyn StatsSource,
    username: &str,
) -> Result<PlayerSnapshot, LookupError> {
    let name = source.source_name();
    let body = source
        .player_stats(username)
        .await
        .map_err(|e| fetch_failed("player", name, e))?;
    parse_player(&body).map_err(|e| parse_failed("player", name, e))
}

pub async fn fetch_guild(
    source: &dyn StatsSource,
    guild: &str,
) -> Result<GuildSnapshot, LookupError> {
    let name = source.source_name();
    let body = source
        .guild_stats(guild)
        .await
        .map_err(|e| fetch_failed("guild", name, e))?;
    parse_guild(&body).map_err(|e| parse_failed("guild", name, e))
}

pub async fn fetch_online(source: &dyn StatsSource) -> Result<OnlinePresenceFeed, LookupError> {
    let name = source.source_name();
    let body = source
        .online_players()
        .await
        .map_err(|e| fetch_failed("online players", name, e))?;
    parse_online_feed(&body).map_err(|e| parse_failed("online players", name, e))
}

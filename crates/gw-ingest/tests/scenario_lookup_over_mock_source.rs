use std::collections::BTreeMap;

use gw_ingest::*;

const GUILD: &[u8] = include_bytes!("fixtures/guild_sos.json");
const ONLINE: &[u8] = include_bytes!("fixtures/online_players.json");

/// In-process source serving canned bodies by key.
struct MockSource {
    players: BTreeMap<String, Vec<u8>>,
    guild: Result<Vec<u8>, FetchError>,
    online: Vec<u8>,
}

#[async_trait::async_trait]
impl StatsSource for MockSource {
    fn source_name(&self) -> &'static str {
        "mock"
    }

    async fn player_stats(&self, username: &str) -> Result<Vec<u8>, FetchError> {
        Ok(self
            .players
            .get(username)
            .cloned()
            .unwrap_or_else(|| br#"{"data":[]}"#.to_vec()))
    }

    async fn guild_stats(&self, _guild: &str) -> Result<Vec<u8>, FetchError> {
        self.guild.clone()
    }

    async fn online_players(&self) -> Result<Vec<u8>, FetchError> {
        Ok(self.online.clone())
    }
}

fn mock() -> MockSource {
    MockSource {
        players: BTreeMap::new(),
        guild: Ok(GUILD.to_vec()),
        online: ONLINE.to_vec(),
    }
}

#[tokio::test]
async fn scenario_unknown_player_is_not_found() {
    let err = fetch_player(&mock(), "Ghost").await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "player not found");
}

#[tokio::test]
async fn scenario_schema_failure_surfaces_as_schema() {
    let mut m = mock();
    m.players
        .insert("Broken".to_string(), br#"{"data":[{"username":"Broken"}]}"#.to_vec());

    let err = fetch_player(&m, "Broken").await.unwrap_err();
    assert!(matches!(err, LookupError::Schema(SchemaError::MissingField { .. })));
}

#[tokio::test]
async fn scenario_transport_failure_surfaces_as_fetch() {
    let mut m = mock();
    m.guild = Err(FetchError::Transport("timed out".to_string()));

    let err = fetch_guild(&m, "Sins of Seedia").await.unwrap_err();
    assert_eq!(err.to_string(), "fetch failed: transport error: timed out");
}

#[tokio::test]
async fn scenario_guild_and_feed_fetched_through_trait_object() {
    let source: Box<dyn StatsSource> = Box::new(mock());

    let guild = fetch_guild(source.as_ref(), "Sins of Seedia").await.unwrap();
    let feed = fetch_online(source.as_ref()).await.unwrap();

    assert_eq!(guild.member_count(), 3);
    assert_eq!(feed.servers.len(), 4);
}

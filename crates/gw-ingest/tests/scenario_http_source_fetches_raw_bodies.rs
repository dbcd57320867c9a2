use std::time::Duration;

use gw_ingest::*;
use httpmock::prelude::*;

const PLAYER: &str = include_str!("fixtures/player_salted.json");
const GUILD: &str = include_str!("fixtures/guild_sos.json");

fn source(server: &MockServer) -> HttpStatsSource {
    HttpStatsSource::new(&server.base_url(), Duration::from_secs(5), "gw-test/0.1").unwrap()
}

#[tokio::test]
async fn scenario_player_lookup_hits_versioned_stats_path() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v2/player/Salted/stats")
                .header("user-agent", "gw-test/0.1");
            then.status(200)
                .header("content-type", "application/json")
                .body(PLAYER);
        })
        .await;

    let p = fetch_player(&source(&server), "Salted").await.unwrap();

    mock.assert_async().await;
    assert_eq!(p.username, "Salted");
}

#[tokio::test]
async fn scenario_guild_lookup_uses_legacy_query_endpoint() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/public_api.php")
                .query_param("action", "guildStats")
                .query_param("command", "Seedia");
            then.status(200).body(GUILD);
        })
        .await;

    let g = fetch_guild(&source(&server), "Seedia").await.unwrap();

    mock.assert_async().await;
    assert_eq!(g.members.len(), 3);
}

#[tokio::test]
async fn scenario_http_404_maps_to_not_found() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v2/player/Nobody/stats");
            then.status(404).body("{}");
        })
        .await;

    let err = fetch_player(&source(&server), "Nobody").await.unwrap_err();
    assert_eq!(err, LookupError::NotFound { what: "player" });
}

#[tokio::test]
async fn scenario_http_server_error_is_a_fetch_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/public_api.php");
            then.status(503).body("maintenance");
        })
        .await;

    let err = source(&server).online_players().await.unwrap_err();
    assert_eq!(
        err,
        FetchError::Status {
            status: 503,
            body: "maintenance".to_string()
        }
    );
}

//! Integration tests for the provider retrievers.
//!
//! Each test stands up a local mock provider and drives a retriever through
//! the public API.

use std::time::Duration;

use achievements_core::config::{GogSettings, HttpSettings, SteamSettings};
use achievements_core::parser::ParseError;
use achievements_core::{
    AchievementSource, AchievementsRetriever, AppConfig, GogRetriever, RetrieveError, Retriever,
    SteamRetriever, UnlockState,
};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod support;
use support::socket_guard::start_mock_server_or_skip;

const STEAM_PATH: &str = "/ISteamUserStats/GetPlayerAchievements/v0001/";
const STEAM_BODY: &str = include_str!("fixtures/steam_player_achievements.json");
const GOG_PAGE: &str = include_str!("fixtures/gog_profile.html");

fn steam_settings(server: &MockServer) -> SteamSettings {
    SteamSettings {
        address_api: format!("{}{STEAM_PATH}", server.uri()),
        application_id: "236850".to_string(),
        authentication_key: "test-key".to_string(),
        steam_id: "76561198000000000".to_string(),
        language: "english".to_string(),
    }
}

fn gog_settings(server: &MockServer, game_name: Option<&str>) -> GogSettings {
    GogSettings {
        address_api: format!("{}/u/{{User}}/game/{{GameId}}", server.uri()),
        user: "player".to_string(),
        game_id: "1207664643".to_string(),
        game_name: game_name.map(str::to_string),
    }
}

#[tokio::test]
async fn test_steam_fetch_sends_parameters_and_parses_body() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path(STEAM_PATH))
        .and(query_param("appid", "236850"))
        .and(query_param("key", "test-key"))
        .and(query_param("steamid", "76561198000000000"))
        .and(query_param("l", "english"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(STEAM_BODY))
        .expect(1)
        .mount(&server)
        .await;

    let retriever = SteamRetriever::new(steam_settings(&server), HttpSettings::default()).unwrap();
    let result = retriever.fetch_all().await.unwrap();

    assert!(result.success);
    assert_eq!(result.status_code, 200);
    assert_eq!(result.game_name.as_deref(), Some("Europa Universalis IV"));
    let states: Vec<UnlockState> = result.achievements.iter().map(|a| a.unlock).collect();
    assert_eq!(
        states,
        vec![UnlockState::Unlocked, UnlockState::Locked, UnlockState::Locked]
    );
    assert_eq!(result.achievements[1].name, "Holy Horder");
}

#[tokio::test]
async fn test_steam_fetch_non_success_status_is_unsuccessful_result() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path(STEAM_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_string("Bad Request"))
        .expect(1)
        .mount(&server)
        .await;

    let retriever = SteamRetriever::new(steam_settings(&server), HttpSettings::default()).unwrap();
    let result = retriever.fetch_all().await.unwrap();

    assert!(!result.success);
    assert_eq!(result.status_code, 400);
    assert!(result.achievements.is_empty());
    assert!(result.error_message.is_some());
}

#[tokio::test]
async fn test_steam_fetch_missing_key_sends_nothing() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(STEAM_BODY))
        .expect(0)
        .mount(&server)
        .await;

    let mut settings = steam_settings(&server);
    settings.authentication_key.clear();
    let retriever = SteamRetriever::new(settings, HttpSettings::default()).unwrap();
    let err = retriever.fetch_all().await.unwrap_err();

    assert!(matches!(
        err,
        RetrieveError::Configuration {
            provider: "steam",
            field: "authentication_key"
        }
    ));
}

#[tokio::test]
async fn test_steam_fetch_invalid_json_is_parse_error() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path(STEAM_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let retriever = SteamRetriever::new(steam_settings(&server), HttpSettings::default()).unwrap();
    let err = retriever.fetch_all().await.unwrap_err();

    assert!(matches!(err, RetrieveError::Parse(ParseError::Decode { .. })));
}

#[tokio::test]
async fn test_steam_fetch_slow_provider_times_out() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path(STEAM_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(STEAM_BODY)
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let http = HttpSettings {
        connect_timeout_secs: 1,
        read_timeout_secs: 1,
    };
    let retriever = SteamRetriever::new(steam_settings(&server), http).unwrap();
    let err = retriever.fetch_all().await.unwrap_err();

    assert!(matches!(err, RetrieveError::Timeout { .. }), "got: {err}");
    assert!(err.is_transport());
}

#[tokio::test]
async fn test_steam_fetch_error_never_shows_key() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    let settings = steam_settings(&server);
    drop(server);

    let retriever = SteamRetriever::new(settings, HttpSettings::default()).unwrap();
    let err = retriever.fetch_all().await.unwrap_err();

    assert!(err.is_transport(), "got: {err}");
    assert!(!err.to_string().contains("test-key"));
}

#[tokio::test]
async fn test_gog_fetch_parses_embedded_achievements() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path("/u/player/game/1207664643"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(GOG_PAGE))
        .expect(1)
        .mount(&server)
        .await;

    let retriever = GogRetriever::new(
        gog_settings(&server, Some("Europa Universalis IV")),
        HttpSettings::default(),
    )
    .unwrap();
    let result = retriever.fetch_all().await.unwrap();

    assert!(result.success);
    assert_eq!(result.game_name.as_deref(), Some("Europa Universalis IV"));
    let summary: Vec<(&str, UnlockState)> = result
        .achievements
        .iter()
        .map(|a| (a.name.as_str(), a.unlock))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("A Blessed Nation", UnlockState::Unlocked),
            ("Holy Horder", UnlockState::Locked),
            ("The Great Khan", UnlockState::Unknown),
        ]
    );
    assert_eq!(
        result.achievements[1].description,
        "Reform the Tengri religion as the [Golden Horde]."
    );
}

#[tokio::test]
async fn test_gog_fetch_without_game_name_falls_back_to_game_id() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(GOG_PAGE))
        .mount(&server)
        .await;

    let retriever = GogRetriever::new(gog_settings(&server, None), HttpSettings::default()).unwrap();
    let result = retriever.fetch_all().await.unwrap();

    assert_eq!(result.game_name.as_deref(), Some("1207664643"));
}

#[tokio::test]
async fn test_gog_fetch_page_without_assignment_is_decode_error() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><body>Private profile</body></html>"))
        .mount(&server)
        .await;

    let retriever = GogRetriever::new(gog_settings(&server, None), HttpSettings::default()).unwrap();
    let err = retriever.fetch_all().await.unwrap_err();

    assert!(matches!(err, RetrieveError::Parse(ParseError::Decode { .. })));
}

#[tokio::test]
async fn test_gog_fetch_not_found_is_unsuccessful_result() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let retriever = GogRetriever::new(gog_settings(&server, None), HttpSettings::default()).unwrap();
    let result = retriever.fetch_all().await.unwrap();

    assert!(!result.success);
    assert_eq!(result.status_code, 404);
}

#[tokio::test]
async fn test_gog_fetch_missing_user_sends_nothing() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(GOG_PAGE))
        .expect(0)
        .mount(&server)
        .await;

    let mut settings = gog_settings(&server, None);
    settings.user = String::new();
    let retriever = GogRetriever::new(settings, HttpSettings::default()).unwrap();

    assert!(matches!(
        retriever.fetch_all().await.unwrap_err(),
        RetrieveError::Configuration { field: "user", .. }
    ));
}

#[tokio::test]
async fn test_retriever_dispatches_on_configured_source() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path("/u/player/game/1207664643"))
        .respond_with(ResponseTemplate::new(200).set_body_string(GOG_PAGE))
        .expect(1)
        .mount(&server)
        .await;

    let config = AppConfig {
        source: "gog".to_string(),
        gog: gog_settings(&server, Some("Europa Universalis IV")),
        steam: steam_settings(&server),
        ..AppConfig::default()
    };
    let retriever = Retriever::from_config(&config).unwrap();
    assert_eq!(retriever.source(), AchievementSource::Gog);

    let result = retriever.fetch_all().await.unwrap();
    assert_eq!(result.achievements.len(), 3);
}

#[test]
fn test_retriever_rejects_unknown_source() {
    let config = AppConfig {
        source: "999".to_string(),
        ..AppConfig::default()
    };
    let err = Retriever::from_config(&config).unwrap_err();
    assert!(err.to_string().contains("unsupported achievement source: 999"));
}

//! Page routes against a mock fantasy API.

mod common;

use std::time::{Duration, Instant};

use reqwest::header::ACCEPT;
use serde_json::{json, Value};

use common::{
    fantasy_api, start_gateway, start_mock_upstream, start_slow_upstream, unreachable_base_url,
};

async fn get_json(url: &str) -> (u16, Value) {
    let response = reqwest::Client::new()
        .get(url)
        .header(ACCEPT, "application/json")
        .send()
        .await
        .unwrap();
    let status = response.status().as_u16();
    (status, response.json().await.unwrap())
}

#[tokio::test]
async fn test_team_detail_populates_every_slot() {
    let upstream = start_mock_upstream(fantasy_api).await;
    let gateway = start_gateway(&upstream.base_url()).await;

    let (status, model) = get_json(&gateway.url("/team/12")).await;

    assert_eq!(status, 200);
    assert_eq!(model["team"]["name"], "Hawks");
    assert_eq!(model["roster"].as_array().unwrap().len(), 2);
    assert!(model.get("error").is_none());

    let mut calls = upstream.summary();
    calls.sort();
    assert_eq!(calls, ["GET /teams/12", "GET /teams/12/roster"]);
}

#[tokio::test]
async fn test_one_failed_call_degrades_the_whole_view() {
    let upstream = start_mock_upstream(|method, path| {
        if path == "/teams/12/roster" {
            return (500, Some(json!({"message": "database on fire"})));
        }
        fantasy_api(method, path)
    })
    .await;
    let gateway = start_gateway(&upstream.base_url()).await;

    let (status, model) = get_json(&gateway.url("/team/12")).await;

    assert_eq!(status, 200);
    assert_eq!(
        model,
        json!({"team": null, "roster": [], "error": "Failed to load team details"})
    );
    // Upstream detail is logged, never shown.
    assert!(!model.to_string().contains("database on fire"));
}

#[tokio::test]
async fn test_degraded_page_still_renders_html() {
    let gateway = start_gateway(&unreachable_base_url()).await;

    let response = reqwest::get(gateway.url("/teams")).await.unwrap();
    assert_eq!(response.status().as_u16(), 200);
    assert!(response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("text/html")));
    assert!(response.headers().contains_key("x-request-id"));

    let body = response.text().await.unwrap();
    assert!(body.contains("data-template=\"teams\""));
    assert!(body.contains("role=\"alert\">Failed to load teams</div>"));
}

#[tokio::test]
async fn test_player_search_takes_precedence() {
    let upstream = start_mock_upstream(fantasy_api).await;
    let gateway = start_gateway(&upstream.base_url()).await;

    let (_, model) = get_json(&gateway.url("/players?search=Mahomes&position=QB&teamId=5")).await;

    assert_eq!(upstream.summary(), ["GET /players/search?name=Mahomes"]);
    assert_eq!(model["searchName"], "Mahomes");
    assert_eq!(model["position"], "QB");
    assert_eq!(model["teamId"], "5");
    assert_eq!(model["players"][0]["name"], "Patrick Mahomes");
}

#[tokio::test]
async fn test_player_filters_fall_through_in_order() {
    let upstream = start_mock_upstream(fantasy_api).await;
    let gateway = start_gateway(&upstream.base_url()).await;

    get_json(&gateway.url("/players?position=QB&teamId=5")).await;
    get_json(&gateway.url("/players?teamId=5")).await;
    get_json(&gateway.url("/players?search=")).await;

    assert_eq!(
        upstream.summary(),
        [
            "GET /players/position/QB",
            "GET /players/available/5",
            "GET /players/active",
        ]
    );
}

#[tokio::test]
async fn test_players_failure_resets_echo_slots() {
    let gateway = start_gateway(&unreachable_base_url()).await;

    let (_, model) = get_json(&gateway.url("/players?search=Mahomes")).await;

    assert_eq!(
        model,
        json!({
            "players": [],
            "searchName": "",
            "position": "",
            "teamId": "",
            "error": "Failed to load players",
        })
    );
}

#[tokio::test]
async fn test_lineup_and_player_detail() {
    let upstream = start_mock_upstream(fantasy_api).await;
    let gateway = start_gateway(&upstream.base_url()).await;

    let (_, lineup) = get_json(&gateway.url("/team/12/lineup")).await;
    assert_eq!(lineup["starters"][0]["name"], "Patrick Mahomes");
    assert_eq!(lineup["bench"][0]["name"], "Tyreek Hill");

    let (_, player) = get_json(&gateway.url("/player/7")).await;
    assert_eq!(player["player"]["stats"]["passingYards"], 4183);

    let (_, missing) = get_json(&gateway.url("/player/99")).await;
    assert_eq!(missing["error"], "Failed to load player");
    assert_eq!(missing["player"], Value::Null);
}

#[tokio::test]
async fn test_calls_are_issued_concurrently() {
    let upstream = start_slow_upstream(Duration::from_millis(300), fantasy_api).await;
    let gateway = start_gateway(&upstream.base_url()).await;

    let started = Instant::now();
    let (_, model) = get_json(&gateway.url("/team/12/lineup")).await;

    assert!(model.get("error").is_none());
    assert_eq!(upstream.calls().len(), 3);
    // Three sequential calls would take at least 900ms.
    assert!(started.elapsed() < Duration::from_millis(850));
}

#[tokio::test]
async fn test_health_touches_no_upstream() {
    let upstream = start_mock_upstream(fantasy_api).await;
    let gateway = start_gateway(&upstream.base_url()).await;

    let (status, body) = get_json(&gateway.url("/health")).await;

    assert_eq!(status, 200);
    assert_eq!(body["status"], "ok");
    assert!(upstream.calls().is_empty());
}

mod common;

use std::{collections::HashMap, sync::Arc, time::Duration};

use axum::{
    Form, Json, Router,
    extract::{Path, Query},
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};
use common::{FakeCatalog, FakeChat, run_fast_arguments};
use serde_json::{Value, json};
use spotifygpt::{
    config::Config,
    error::PipelineError,
    generator,
    openai::{ChatModel, OpenAiClient},
    pipeline::Pipeline,
    server::{self, AppState},
    spotify::{MusicCatalog, SpotifyClient, auth::wait_for_token},
    types::{CreatePlaylistRequest, PkceToken, UserPreference},
};
use tokio::net::TcpListener;

async fn spawn(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn bearer(headers: &HeaderMap) -> String {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

async fn search(
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    if bearer(&headers) != "Bearer BQC-token" {
        return (StatusCode::UNAUTHORIZED, Json(json!({}))).into_response();
    }
    assert_eq!(params.get("type").map(String::as_str), Some("track"));
    assert_eq!(params.get("limit").map(String::as_str), Some("1"));

    let items = match params.get("q").map(String::as_str) {
        Some("Song C Artist3,Artist4") => json!([
            {"id": "3", "name": "Song C", "uri": "spotify:track:3"}
        ]),
        _ => json!([]),
    };
    Json(json!({ "tracks": { "items": items } })).into_response()
}

async fn me() -> Json<Value> {
    Json(json!({ "id": "listener", "display_name": "Listener" }))
}

async fn create_playlist(
    Path(user_id): Path<String>,
    Json(body): Json<CreatePlaylistRequest>,
) -> impl IntoResponse {
    assert_eq!(user_id, "listener");
    (
        StatusCode::CREATED,
        Json(json!({
            "id": "pl1",
            "name": body.name,
            "description": body.description,
            "public": body.public,
            "external_urls": { "spotify": "https://open.spotify.com/playlist/pl1" }
        })),
    )
}

async fn add_tracks(Path(playlist_id): Path<String>, Json(body): Json<Value>) -> impl IntoResponse {
    assert_eq!(playlist_id, "pl1");
    let uris = body["uris"].as_array().cloned().unwrap_or_default();
    if uris.iter().any(|u| u.as_str() == Some("spotify:track:bad")) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": {"status": 400, "message": "Invalid base62 id"}})),
        );
    }
    (StatusCode::CREATED, Json(json!({ "snapshot_id": "snap" })))
}

async fn chat_completions(headers: HeaderMap, Json(body): Json<Value>) -> impl IntoResponse {
    if bearer(&headers) != "Bearer sk-test" {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": {"message": "Incorrect API key provided"}})),
        );
    }
    assert_eq!(body["model"], "gpt-4o");
    assert_eq!(body["functions"][0]["name"], "createPlaylist");
    assert_eq!(body["function_call"]["name"], "createPlaylist");
    assert_eq!(body["messages"][0]["role"], "system");
    assert_eq!(body["messages"][1]["role"], "user");

    (
        StatusCode::OK,
        Json(json!({
            "choices": [{
                "index": 0,
                "message": {
                    "role": "assistant",
                    "content": null,
                    "function_call": {
                        "name": "createPlaylist",
                        "arguments": run_fast_arguments()
                    }
                },
                "finish_reason": "function_call"
            }]
        })),
    )
}

async fn token(headers: HeaderMap, Form(form): Form<HashMap<String, String>>) -> impl IntoResponse {
    // base64("client-id:client-secret")
    if bearer(&headers) != "Basic Y2xpZW50LWlkOmNsaWVudC1zZWNyZXQ=" {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "invalid_client"})),
        );
    }
    assert_eq!(
        form.get("grant_type").map(String::as_str),
        Some("authorization_code")
    );
    assert_eq!(form.get("code_verifier").map(String::as_str), Some("verifier"));
    if form.get("code").map(String::as_str) != Some("good-code") {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "invalid_grant"})),
        );
    }
    (
        StatusCode::OK,
        Json(json!({
            "access_token": "BQC-token",
            "token_type": "Bearer",
            "scope": "playlist-modify-private",
            "expires_in": 3600,
            "refresh_token": "AQD-refresh"
        })),
    )
}

async fn stub_services() -> String {
    let app = Router::new()
        .route("/v1/search", get(search))
        .route("/v1/me", get(me))
        .route("/v1/users/{user_id}/playlists", post(create_playlist))
        .route("/v1/playlists/{playlist_id}/tracks", post(add_tracks))
        .route("/v1/chat/completions", post(chat_completions))
        .route("/api/token", post(token));
    spawn(app).await
}

fn config_for(base: &str) -> Config {
    let base = base.to_string();
    Config::from_lookup(move |key: &str| match key {
        "SPOTIFY_CLIENT_ID" => Some("client-id".to_string()),
        "SPOTIFY_CLIENT_SECRET" => Some("client-secret".to_string()),
        "OPENAI_API_KEY" => Some("sk-test".to_string()),
        "OPENAI_API_URL" => Some(format!("{base}/v1")),
        "SPOTIFY_API_URL" => Some(format!("{base}/v1")),
        "SPOTIFY_API_TOKEN_URL" => Some(format!("{base}/api/token")),
        "SPOTIFYGPT_SERVER_ADDRESS" => Some("127.0.0.1:0".to_string()),
        _ => None,
    })
    .unwrap()
}

#[tokio::test]
async fn test_spotify_search_top_hit() {
    let base = stub_services().await;
    let client = SpotifyClient::new(format!("{base}/v1"), "BQC-token");

    let hits = client
        .search_tracks("Song C Artist3,Artist4", 1)
        .await
        .unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].uri, "spotify:track:3");

    let none = client.search_tracks("Unknown Nobody", 1).await.unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn test_spotify_search_rejected_token() {
    let base = stub_services().await;
    let client = SpotifyClient::new(format!("{base}/v1"), "expired");

    let err = client.search_tracks("Song A Artist1", 1).await.unwrap_err();
    assert!(matches!(err, PipelineError::Http { service: "Spotify", .. }));
}

#[tokio::test]
async fn test_spotify_publish_calls() {
    let base = stub_services().await;
    let client = SpotifyClient::new(format!("{base}/v1"), "BQC-token");

    let user = client.current_user().await.unwrap();
    assert_eq!(user.id, "listener");

    let created = client
        .create_playlist(
            &user.id,
            &CreatePlaylistRequest {
                name: "SpotifyGPT - Run Fast".to_string(),
                description: "High-energy tracks".to_string(),
                public: false,
            },
        )
        .await
        .unwrap();
    assert_eq!(created.id, "pl1");
    assert_eq!(
        created.external_urls.spotify,
        "https://open.spotify.com/playlist/pl1"
    );

    let added = client
        .add_tracks("pl1", &["spotify:track:3".to_string()])
        .await
        .unwrap();
    assert_eq!(added.snapshot_id, "snap");

    let err = client
        .add_tracks("pl1", &["spotify:track:bad".to_string()])
        .await
        .unwrap_err();
    match err {
        PipelineError::Publish(message) => assert!(message.contains("Invalid base62 id")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_openai_function_call_round_trip() {
    let base = stub_services().await;
    let client = OpenAiClient::new(format!("{base}/v1"), "sk-test");

    let request = generator::build_request("gpt-4o", &UserPreference::new("upbeat", 3));
    let response = client.complete(&request).await.unwrap();

    let call = response.choices[0].message.function_call.as_ref().unwrap();
    assert_eq!(call.name, "createPlaylist");
    assert!(call.arguments.contains("Run Fast"));
}

#[tokio::test]
async fn test_openai_rejection_is_generation_error() {
    let base = stub_services().await;
    let client = OpenAiClient::new(format!("{base}/v1"), "sk-wrong");

    let request = generator::build_request("gpt-4o", &UserPreference::new("upbeat", 3));
    match client.complete(&request).await {
        Err(PipelineError::Generation(message)) => {
            assert!(message.contains("401"));
            assert!(message.contains("Incorrect API key"));
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

async fn spawn_app(state: AppState) -> String {
    spawn(server::router(state)).await
}

#[tokio::test]
async fn test_callback_exchanges_code() {
    let base = stub_services().await;
    let state = AppState::new(Arc::new(config_for(&base)));
    *state.auth.lock().await = Some(PkceToken {
        code_verifier: "verifier".to_string(),
        state: "xyz".to_string(),
        token: None,
        error: None,
    });
    let app = spawn_app(state.clone()).await;

    let page = reqwest::get(format!("{app}/callback?code=good-code&state=xyz"))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(page.contains("Authentication successful"));

    let token = wait_for_token(state.auth.clone(), Duration::from_secs(1))
        .await
        .unwrap();
    assert_eq!(token.access_token, "BQC-token");
    assert_eq!(token.scope, "playlist-modify-private");
    assert_eq!(token.expires_in, 3600);
    assert!(!token.is_expired_at(token.obtained_at));
}

#[tokio::test]
async fn test_callback_rejects_state_mismatch() {
    let base = stub_services().await;
    let state = AppState::new(Arc::new(config_for(&base)));
    *state.auth.lock().await = Some(PkceToken {
        code_verifier: "verifier".to_string(),
        state: "xyz".to_string(),
        token: None,
        error: None,
    });
    let app = spawn_app(state.clone()).await;

    reqwest::get(format!("{app}/callback?code=good-code&state=forged"))
        .await
        .unwrap();

    let err = wait_for_token(state.auth.clone(), Duration::from_secs(1))
        .await
        .unwrap_err();
    assert!(err.contains("state"));
}

#[tokio::test]
async fn test_callback_reports_declined_consent() {
    let base = stub_services().await;
    let state = AppState::new(Arc::new(config_for(&base)));
    *state.auth.lock().await = Some(PkceToken {
        code_verifier: "verifier".to_string(),
        state: "xyz".to_string(),
        token: None,
        error: None,
    });
    let app = spawn_app(state.clone()).await;

    let page = reqwest::get(format!("{app}/callback?error=access_denied&state=xyz"))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(page.contains("declined"));

    let err = wait_for_token(state.auth.clone(), Duration::from_secs(1))
        .await
        .unwrap_err();
    assert!(err.contains("access_denied"));
}

#[tokio::test]
async fn test_wait_for_token_times_out() {
    let shared = Arc::new(tokio::sync::Mutex::new(None));
    let err = wait_for_token(shared, Duration::from_millis(300))
        .await
        .unwrap_err();
    assert_eq!(err, "authorization timed out");
}

#[tokio::test]
async fn test_health() {
    let state = AppState::new(Arc::new(config_for("http://127.0.0.1:9")));
    let app = spawn_app(state).await;

    let body: Value = reqwest::get(format!("{app}/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["authorized"], false);
}

#[tokio::test]
async fn test_form_page_defaults() {
    let state = AppState::new(Arc::new(config_for("http://127.0.0.1:9")));
    let app = spawn_app(state).await;

    let page = reqwest::get(format!("{app}/"))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(page.contains("What type of music are you feeling today?"));
    assert!(page.contains(r#"min="1" max="20" value="5""#));
    assert!(page.contains("Create Playlist!"));
}

#[tokio::test]
async fn test_form_submit_before_authorization() {
    let state = AppState::new(Arc::new(config_for("http://127.0.0.1:9")));
    let app = spawn_app(state).await;

    let page = reqwest::Client::new()
        .post(format!("{app}/"))
        .form(&[("vibe", "lofi"), ("count", "4")])
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(page.contains("waiting for Spotify authorization"));
    assert!(page.contains(">lofi</textarea>"));
}

#[tokio::test]
async fn test_form_submit_creates_playlist() {
    let state = AppState::new(Arc::new(config_for("http://127.0.0.1:9")));
    let chat = Arc::new(FakeChat::with_arguments(&run_fast_arguments()));
    let catalog = Arc::new(FakeCatalog::knowing(&[
        "Song A Artist1",
        "Song B Artist2",
        "Song C Artist3,Artist4",
    ]));
    let _ = state
        .pipeline
        .set(Pipeline::new(chat.clone(), catalog.clone(), "gpt-4o"));
    let app = spawn_app(state).await;

    let client = reqwest::Client::new();

    // empty vibe re-renders the form and sends nothing
    let page = client
        .post(format!("{app}/"))
        .form(&[("vibe", ""), ("count", "3")])
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(!page.contains("Playlist Created"));
    assert_eq!(chat.request_count(), 0);

    let page = client
        .post(format!("{app}/"))
        .form(&[("vibe", "upbeat running music"), ("count", "3")])
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(page.contains("Playlist Created."));
    assert!(page.contains(r#"href="https://open.spotify.com/playlist/pl1""#));
    assert_eq!(chat.request_count(), 1);
    assert_eq!(catalog.added()[0].1.len(), 3);
}

#[tokio::test]
async fn test_form_submit_shows_resolution_failure() {
    let state = AppState::new(Arc::new(config_for("http://127.0.0.1:9")));
    let chat = Arc::new(FakeChat::with_arguments(&run_fast_arguments()));
    let catalog = Arc::new(FakeCatalog::knowing(&["Song A Artist1"]));
    let _ = state
        .pipeline
        .set(Pipeline::new(chat, catalog.clone(), "gpt-4o"));
    let app = spawn_app(state).await;

    let page = reqwest::Client::new()
        .post(format!("{app}/"))
        .form(&[("vibe", "upbeat running music"), ("count", "3")])
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(page.contains("could not find a catalog match for &#39;Song B&#39; by Artist2"));
    assert!(catalog.created().is_empty());
}

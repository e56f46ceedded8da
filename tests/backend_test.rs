use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use axum::{
    Form, Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header::COOKIE},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;

use musicmood::MoodError;
use musicmood::backend::BackendClient;
use musicmood::catalog::CatalogClient;
use musicmood::management::{LikedPlaylists, Session, TokenProvider};

const SESSION_COOKIE: &str = "JSESSIONID=abc123";

#[derive(Debug, Clone, Copy, PartialEq)]
enum LikeMode {
    Json,
    Failing,
    Html,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum PreviewMode {
    Previews,
    LinksOnly,
    Failing,
}

struct Mock {
    like_mode: LikeMode,
    preview_mode: PreviewMode,
    catalog_ok: bool,
    server_likes: Mutex<Vec<String>>,
    like_hits: AtomicUsize,
    catalog_hits: AtomicUsize,
    profile_hits: AtomicUsize,
    last_form: Mutex<HashMap<String, String>>,
    last_cookie: Mutex<Option<String>>,
}

impl Mock {
    fn new() -> Self {
        Self {
            like_mode: LikeMode::Json,
            preview_mode: PreviewMode::Previews,
            catalog_ok: true,
            server_likes: Mutex::new(vec!["liked-elsewhere".to_string()]),
            like_hits: AtomicUsize::new(0),
            catalog_hits: AtomicUsize::new(0),
            profile_hits: AtomicUsize::new(0),
            last_form: Mutex::new(HashMap::new()),
            last_cookie: Mutex::new(None),
        }
    }

    fn form(&self, key: &str) -> Option<String> {
        self.last_form.lock().unwrap().get(key).cloned()
    }
}

fn remember(mock: &Mock, headers: &HeaderMap, form: HashMap<String, String>) {
    *mock.last_form.lock().unwrap() = form;
    *mock.last_cookie.lock().unwrap() = headers
        .get(COOKIE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
}

async fn like(
    State(mock): State<Arc<Mock>>,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    mock.like_hits.fetch_add(1, Ordering::SeqCst);
    let playlist_id = form.get("playlistId").cloned().unwrap_or_default();
    let add = form.get("likeAction").map(String::as_str) == Some("add");
    remember(&mock, &headers, form);

    match mock.like_mode {
        LikeMode::Json => {
            let mut likes = mock.server_likes.lock().unwrap();
            if add {
                likes.push(playlist_id);
            } else {
                likes.retain(|id| *id != playlist_id);
            }
            Json(json!({ "status": "OK", "likedPlaylistIds": likes.clone() })).into_response()
        }
        LikeMode::Failing => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "status": "ERROR", "message": "database unavailable" })),
        )
            .into_response(),
        LikeMode::Html => Html("<html><body>ok</body></html>").into_response(),
    }
}

async fn preview(
    State(mock): State<Arc<Mock>>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    assert_eq!(query.get("action").map(String::as_str), Some("preview"));
    assert_eq!(query.get("format").map(String::as_str), Some("json"));

    match mock.preview_mode {
        PreviewMode::Previews => Json(json!({
            "status": "OK",
            "playlistName": "Server Drive",
            "tracks": [
                {
                    "id": "s1", "name": "Blueming", "artist": "IU",
                    "preview_url": "https://p.example/s1.mp3", "has_preview": true,
                    "spotify_url": "https://open.spotify.com/track/s1"
                },
                {
                    "id": "s2", "name": "Hype Boy", "artist": "NewJeans",
                    "preview_url": "https://open.spotify.com/track/s2", "has_preview": false
                }
            ]
        }))
        .into_response(),
        PreviewMode::LinksOnly => Json(json!({
            "status": "OK",
            "playlistName": "Server Drive",
            "tracks": [
                {
                    "id": "s2", "name": "Hype Boy", "artist": "NewJeans",
                    "preview_url": "https://open.spotify.com/track/s2", "has_preview": false
                }
            ]
        }))
        .into_response(),
        PreviewMode::Failing => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

async fn profile(
    State(mock): State<Arc<Mock>>,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    mock.profile_hits.fetch_add(1, Ordering::SeqCst);
    remember(&mock, &headers, form);
    Html("<html><body>profile</body></html>").into_response()
}

async fn token() -> Response {
    Json(json!({ "status": "SUCCESS", "access_token": "token-1" })).into_response()
}

async fn catalog_playlist(State(mock): State<Arc<Mock>>, Path(id): Path<String>) -> Response {
    mock.catalog_hits.fetch_add(1, Ordering::SeqCst);
    if !mock.catalog_ok {
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    }
    Json(json!({ "id": id, "name": "Catalog Drive" })).into_response()
}

async fn catalog_tracks(State(mock): State<Arc<Mock>>, Path(_id): Path<String>) -> Response {
    mock.catalog_hits.fetch_add(1, Ordering::SeqCst);
    if !mock.catalog_ok {
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    }
    Json(json!({
        "items": [
            { "track": {
                "id": "c1", "name": "Love wins all", "artists": [{ "name": "IU" }],
                "preview_url": "https://p.example/c1.mp3"
            } }
        ]
    }))
    .into_response()
}

async fn spawn_mock(mock: Mock) -> (Arc<Mock>, String) {
    let mock = Arc::new(mock);
    let app = Router::new()
        .route("/playlist.do", get(preview).post(like))
        .route("/profile.do", post(profile))
        .route("/api/token", get(token))
        .route("/v1/playlists/{id}", get(catalog_playlist))
        .route("/v1/playlists/{id}/tracks", get(catalog_tracks))
        .with_state(Arc::clone(&mock));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (mock, format!("http://{}", addr))
}

// Helper function to create a session against the mock server
fn create_session(base: &str, user_id: Option<&str>, liked: &[&str]) -> Session {
    let backend = BackendClient::new(base, Some(SESSION_COOKIE.to_string()));
    let tokens = Arc::new(TokenProvider::new(backend.clone()));
    let catalog = CatalogClient::new(format!("{}/v1", base), "KR", tokens);
    let liked = LikedPlaylists::new(liked.iter().map(|id| id.to_string()).collect());

    Session::new(user_id.map(str::to_string), liked, backend, catalog)
}

#[tokio::test]
async fn test_like_reconciles_with_server_list() {
    let (mock, base) = spawn_mock(Mock::new()).await;
    let mut session = create_session(&base, Some("user-1"), &[]);

    let changed = session.set_liked("p1", true).await.unwrap();

    assert!(changed);
    assert_eq!(
        session.liked().ids(),
        ["liked-elsewhere".to_string(), "p1".to_string()]
    );
    assert_eq!(mock.form("action").as_deref(), Some("like"));
    assert_eq!(mock.form("playlistId").as_deref(), Some("p1"));
    assert_eq!(mock.form("likeAction").as_deref(), Some("add"));
    assert_eq!(
        mock.last_cookie.lock().unwrap().as_deref(),
        Some(SESSION_COOKIE)
    );
}

#[tokio::test]
async fn test_unlike_sends_remove() {
    let (mock, base) = spawn_mock(Mock::new()).await;
    let mut session = create_session(&base, Some("user-1"), &["liked-elsewhere"]);

    session.set_liked("liked-elsewhere", false).await.unwrap();

    assert!(session.liked().is_empty());
    assert_eq!(mock.form("likeAction").as_deref(), Some("remove"));
}

#[tokio::test]
async fn test_like_in_desired_state_skips_request() {
    let (mock, base) = spawn_mock(Mock::new()).await;
    let mut session = create_session(&base, Some("user-1"), &["p1"]);

    assert!(!session.set_liked("p1", true).await.unwrap());
    assert!(!session.set_liked("p2", false).await.unwrap());
    assert_eq!(mock.like_hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_like_requires_sign_in() {
    let (mock, base) = spawn_mock(Mock::new()).await;
    let mut session = create_session(&base, None, &[]);

    let err = session.set_liked("p1", true).await.unwrap_err();

    assert_eq!(err, MoodError::SignInRequired);
    assert!(session.liked().is_empty());
    assert_eq!(mock.like_hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_failed_like_rolls_back() {
    let mut mock = Mock::new();
    mock.like_mode = LikeMode::Failing;
    let (_mock, base) = spawn_mock(mock).await;
    let mut session = create_session(&base, Some("user-1"), &["p0"]);

    let err = session.set_liked("p1", true).await.unwrap_err();

    assert_eq!(err, MoodError::Backend("database unavailable".to_string()));
    assert_eq!(session.liked().ids(), ["p0".to_string()]);
}

#[tokio::test]
async fn test_non_json_like_response_counts_as_success() {
    let mut mock = Mock::new();
    mock.like_mode = LikeMode::Html;
    let (_mock, base) = spawn_mock(mock).await;
    let mut session = create_session(&base, Some("user-1"), &[]);

    assert!(session.set_liked("p1", true).await.unwrap());
    assert!(session.is_liked("p1"));
}

#[tokio::test]
async fn test_server_preview_is_preferred() {
    let (mock, base) = spawn_mock(Mock::new()).await;
    let session = create_session(&base, None, &[]);

    let loaded = session.load_playlist_tracks("p1").await.unwrap();

    assert_eq!(loaded.name, "Server Drive");
    assert_eq!(loaded.tracks.len(), 2);
    assert!(loaded.tracks[0].has_preview());
    assert_eq!(loaded.tracks[1].preview_url(), None);
    assert_eq!(
        loaded.tracks[1].catalog_url(),
        Some("https://open.spotify.com/track/s2")
    );
    assert_eq!(mock.catalog_hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_links_only_preview_falls_back_to_catalog() {
    let mut mock = Mock::new();
    mock.preview_mode = PreviewMode::LinksOnly;
    let (mock, base) = spawn_mock(mock).await;
    let session = create_session(&base, None, &[]);

    let loaded = session.load_playlist_tracks("p1").await.unwrap();

    assert_eq!(loaded.name, "Catalog Drive");
    assert_eq!(loaded.tracks.len(), 1);
    assert_eq!(loaded.tracks[0].id(), "c1");
    assert_eq!(mock.catalog_hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_links_only_preview_survives_catalog_failure() {
    let mut mock = Mock::new();
    mock.preview_mode = PreviewMode::LinksOnly;
    mock.catalog_ok = false;
    let (_mock, base) = spawn_mock(mock).await;
    let session = create_session(&base, None, &[]);

    let loaded = session.load_playlist_tracks("p1").await.unwrap();

    assert_eq!(loaded.name, "Server Drive");
    assert_eq!(loaded.tracks[0].id(), "s2");
}

#[tokio::test]
async fn test_both_sources_failing_is_an_error() {
    let mut mock = Mock::new();
    mock.preview_mode = PreviewMode::Failing;
    mock.catalog_ok = false;
    let (_mock, base) = spawn_mock(mock).await;
    let session = create_session(&base, None, &[]);

    let err = session.load_playlist_tracks("p1").await.unwrap_err();

    assert_eq!(err, MoodError::Catalog { status: 503 });
}

#[tokio::test]
async fn test_profile_update_sends_field_and_value() {
    let (mock, base) = spawn_mock(Mock::new()).await;
    let backend = BackendClient::new(base, Some(SESSION_COOKIE.to_string()));

    backend.update_profile("phone", "010-1234-5678").await.unwrap();

    assert_eq!(mock.form("field").as_deref(), Some("phone"));
    assert_eq!(mock.form("value").as_deref(), Some("010-1234-5678"));
    assert_eq!(
        mock.last_cookie.lock().unwrap().as_deref(),
        Some(SESSION_COOKIE)
    );
}

#[tokio::test]
async fn test_invalid_profile_value_is_not_sent() {
    let (mock, base) = spawn_mock(Mock::new()).await;
    let backend = BackendClient::new(base, Some(SESSION_COOKIE.to_string()));

    let err = backend.update_profile("password", "abc").await.unwrap_err();

    assert!(matches!(err, MoodError::Invalid(_)));
    assert_eq!(mock.profile_hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_profile_update_requires_session() {
    let (mock, base) = spawn_mock(Mock::new()).await;
    let backend = BackendClient::new(base, None);

    let err = backend.update_profile("name", "Kim").await.unwrap_err();

    assert_eq!(err, MoodError::SignInRequired);
    assert_eq!(mock.profile_hits.load(Ordering::SeqCst), 0);
}

use super::*;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{RawQuery, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, patch},
    Json, Router,
};
use serde_json::{json, Value};
use shared::error::ErrorCode;
use tokio::net::TcpListener;

fn test_settings(server_url: &str) -> Settings {
    Settings {
        project_url: server_url.to_string(),
        anon_key: "test-anon-key".into(),
        ..Settings::default()
    }
}

#[derive(Debug, Clone, Default)]
struct RecordedRequest {
    apikey: Option<String>,
    authorization: Option<String>,
    client_info: Option<String>,
    query: String,
}

fn header_string(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

#[derive(Clone, Default)]
struct RosterState {
    seen: Arc<Mutex<Option<RecordedRequest>>>,
}

async fn handle_roster(
    State(state): State<RosterState>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> Json<Value> {
    *state.seen.lock().expect("lock roster state") = Some(RecordedRequest {
        apikey: header_string(&headers, "apikey"),
        authorization: header_string(&headers, "authorization"),
        client_info: header_string(&headers, "x-client-info"),
        query: query.unwrap_or_default(),
    });
    Json(json!([
        {
            "id": 1,
            "ho_ten": "Lê Minh Châu",
            "avatar_url": "https://cdn.example.com/avatars/chau.png",
            "hoa_hong_gia_tri": 150000,
            "hoa_hong_loai": "money",
            "updated_at": "2025-08-01T09:30:00Z"
        },
        {
            "id": 2,
            "ho_ten": "Trần Thu Hà",
            "avatar_url": null,
            "hoa_hong_gia_tri": null,
            "hoa_hong_loai": null
        }
    ]))
}

async fn spawn_roster_server() -> anyhow::Result<(String, RosterState)> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let state = RosterState::default();
    let app = Router::new()
        .route("/rest/v1/nhan_su", get(handle_roster))
        .with_state(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok((format!("http://{addr}"), state))
}

#[derive(Debug, Clone)]
struct RecordedPatch {
    query: String,
    prefer: Option<String>,
    body: Value,
}

#[derive(Clone, Default)]
struct PatchState {
    unauthorized: bool,
    patches: Arc<Mutex<Vec<RecordedPatch>>>,
}

async fn handle_patch(
    State(state): State<PatchState>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
    Json(body): Json<Value>,
) -> Response {
    state.patches.lock().expect("lock patch state").push(RecordedPatch {
        query: query.unwrap_or_default(),
        prefer: header_string(&headers, "prefer"),
        body,
    });
    if state.unauthorized {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "JWT expired" })),
        )
            .into_response()
    } else {
        StatusCode::NO_CONTENT.into_response()
    }
}

async fn spawn_patch_server(unauthorized: bool) -> anyhow::Result<(String, PatchState)> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let state = PatchState {
        unauthorized,
        patches: Arc::new(Mutex::new(Vec::new())),
    };
    let app = Router::new()
        .route("/rest/v1/nhan_su", patch(handle_patch))
        .with_state(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok((format!("http://{addr}"), state))
}

#[derive(Clone, Default)]
struct MediaState {
    probe_paths: Arc<Mutex<Vec<String>>>,
    avatar_saw_apikey: Arc<Mutex<Option<bool>>>,
}

async fn handle_probe(State(state): State<MediaState>) -> Json<Value> {
    state
        .probe_paths
        .lock()
        .expect("lock media state")
        .push("/rest/v1/khach_hang".to_string());
    Json(json!([{ "id": 1 }]))
}

async fn handle_avatar(State(state): State<MediaState>, headers: HeaderMap) -> Vec<u8> {
    *state.avatar_saw_apikey.lock().expect("lock media state") =
        Some(headers.contains_key("apikey"));
    b"png-bytes".to_vec()
}

async fn spawn_media_server() -> anyhow::Result<(String, MediaState)> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let state = MediaState::default();
    let app = Router::new()
        .route("/rest/v1/khach_hang", get(handle_probe))
        .route("/avatars/chau.png", get(handle_avatar))
        .with_state(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok((format!("http://{addr}"), state))
}

#[test]
fn rejects_settings_without_credentials() {
    let err = BackendClient::new(&Settings::default()).expect_err("empty settings must fail");
    assert!(err.to_string().contains("project url"));
}

#[tokio::test]
async fn lists_members_with_project_headers() {
    let (server_url, state) = spawn_roster_server().await.expect("spawn server");
    let client = BackendClient::new(&test_settings(&server_url)).expect("build client");

    let rows = client.list_members().await.expect("list members");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].commission(), Commission::money(150_000.0));
    assert_eq!(rows[0].profile().name, "Lê Minh Châu");
    assert!(rows[1].commission().is_zero());
    assert_eq!(rows[1].profile().avatar_url, None);

    let seen = state
        .seen
        .lock()
        .expect("lock roster state")
        .clone()
        .expect("request recorded");
    assert_eq!(seen.apikey.as_deref(), Some("test-anon-key"));
    assert_eq!(seen.authorization.as_deref(), Some("Bearer test-anon-key"));
    assert_eq!(seen.client_info.as_deref(), Some("xoxo-erp-crm"));
    assert!(seen.query.contains("order=ho_ten.asc"));
    assert!(seen.query.contains("hoa_hong_gia_tri"));
}

#[tokio::test]
async fn update_commission_targets_row_with_filter_and_payload() {
    let (server_url, state) = spawn_patch_server(false).await.expect("spawn server");
    let client = BackendClient::new(&test_settings(&server_url)).expect("build client");

    client
        .update_member_commission(MemberId(7), Commission::percent(12.5))
        .await
        .expect("update commission");

    let patches = state.patches.lock().expect("lock patch state");
    assert_eq!(patches.len(), 1);
    let recorded = &patches[0];
    assert_eq!(recorded.query, "id=eq.7");
    assert_eq!(recorded.prefer.as_deref(), Some("return=minimal"));
    assert_eq!(recorded.body["hoa_hong_gia_tri"], json!(12.5));
    assert_eq!(recorded.body["hoa_hong_loai"], json!("percent"));
    assert!(recorded.body["updated_at"].is_string());
}

#[tokio::test]
async fn clear_commission_writes_the_zero_state() {
    let (server_url, state) = spawn_patch_server(false).await.expect("spawn server");
    let client = BackendClient::new(&test_settings(&server_url)).expect("build client");

    client
        .clear_member_commission(MemberId(3))
        .await
        .expect("clear commission");

    let patches = state.patches.lock().expect("lock patch state");
    assert_eq!(patches[0].query, "id=eq.3");
    assert_eq!(patches[0].body["hoa_hong_gia_tri"], json!(0.0));
    assert_eq!(patches[0].body["hoa_hong_loai"], json!("money"));
}

#[tokio::test]
async fn maps_unauthorized_response_to_api_exception() {
    let (server_url, _state) = spawn_patch_server(true).await.expect("spawn server");
    let client = BackendClient::new(&test_settings(&server_url)).expect("build client");

    let err = client
        .update_member_commission(MemberId(7), Commission::money(50_000.0))
        .await
        .expect_err("unauthorized patch must fail");
    let exception = err
        .downcast_ref::<ApiException>()
        .expect("error carries the api exception");
    assert_eq!(exception.code, ErrorCode::Unauthorized);
    assert!(exception.message.contains("JWT expired"));
}

#[tokio::test]
async fn connection_check_probes_the_customers_table() {
    let (server_url, state) = spawn_media_server().await.expect("spawn server");
    let client = BackendClient::new(&test_settings(&server_url)).expect("build client");

    client.check_connection().await.expect("connection check");
    assert_eq!(state.probe_paths.lock().expect("lock media state").len(), 1);
}

#[tokio::test]
async fn avatar_fetch_skips_project_headers() {
    let (server_url, state) = spawn_media_server().await.expect("spawn server");
    let client = BackendClient::new(&test_settings(&server_url)).expect("build client");

    let bytes = client
        .fetch_avatar(&format!("{server_url}/avatars/chau.png"))
        .await
        .expect("fetch avatar");
    assert_eq!(bytes, b"png-bytes");
    assert_eq!(
        *state.avatar_saw_apikey.lock().expect("lock media state"),
        Some(false)
    );
}

//! End-to-end client properties against an in-process household backend.
//!
//! The fake backend speaks raw JSON over loopback HTTP so these tests cover
//! the full wire contract: `ApiClient` serialization, error derivation, and
//! the controllers' state transitions on top of it.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use hearth_agent::AgentSessionController;
use hearth_api::{ApiClient, ApiClientConfig, HouseholdBackend};
use hearth_connections::ConnectionRegistry;
use hearth_core::{
    AuthScheme, ConnectionCredentials, ConnectionDraft, MessageRole, ServiceKind,
};
use hearth_dashboard::{render_widget, DashboardOrchestrator, DashboardView};

const FIXED_STAMP: &str = "2026-08-07T10:00:00Z";

#[derive(Default)]
struct HouseholdState {
    connections: Mutex<Vec<Value>>,
    widgets: Mutex<Vec<Value>>,
    last_refreshed_at: Mutex<Option<String>>,
    sessions: Mutex<Vec<Value>>,
    next_connection: Mutex<u32>,
    next_session: Mutex<u32>,
}

fn not_found(detail: &str) -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, Json(json!({ "detail": detail })))
}

async fn list_connections(State(state): State<Arc<HouseholdState>>) -> Json<Value> {
    Json(Value::Array(state.connections.lock().unwrap().clone()))
}

async fn create_connection(
    State(state): State<Arc<HouseholdState>>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let mut next = state.next_connection.lock().unwrap();
    *next += 1;
    let connection = json!({
        "id": format!("c{}", *next),
        "service_type": body["service_type"],
        "display_name": body["display_name"],
        "base_url": body["base_url"],
        "frontend_url": body.get("frontend_url").cloned().unwrap_or(Value::Null),
        "auth_type": body["auth_type"],
        "endpoints": [],
        "enabled": true,
        "last_sync_at": null,
        "last_sync_status": null,
        "last_sync_error": null,
        "created_at": FIXED_STAMP,
        "updated_at": FIXED_STAMP,
    });
    state.connections.lock().unwrap().push(connection.clone());
    (StatusCode::CREATED, Json(connection))
}

async fn update_connection(
    State(state): State<Arc<HouseholdState>>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let mut connections = state.connections.lock().unwrap();
    let connection = connections
        .iter_mut()
        .find(|connection| connection["id"].as_str() == Some(id.as_str()))
        .ok_or_else(|| not_found("Connection not found"))?;
    if let Some(enabled) = body.get("enabled") {
        connection["enabled"] = enabled.clone();
    }
    Ok(Json(connection.clone()))
}

async fn delete_connection(
    State(state): State<Arc<HouseholdState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, (StatusCode, Json<Value>)> {
    let mut connections = state.connections.lock().unwrap();
    let before = connections.len();
    connections.retain(|connection| connection["id"].as_str() != Some(id.as_str()));
    if connections.len() == before {
        return Err(not_found("Connection not found"));
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn test_connection(
    State(state): State<Arc<HouseholdState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let connections = state.connections.lock().unwrap();
    if !connections
        .iter()
        .any(|connection| connection["id"].as_str() == Some(id.as_str()))
    {
        return Err(not_found("Connection not found"));
    }
    Ok(Json(
        json!({ "success": true, "message": "Connection successful" }),
    ))
}

async fn get_dashboard(State(state): State<Arc<HouseholdState>>) -> Json<Value> {
    Json(json!({
        "widgets": state.widgets.lock().unwrap().clone(),
        "last_refreshed_at": state.last_refreshed_at.lock().unwrap().clone(),
        "refresh_errors": [],
    }))
}

async fn refresh_dashboard(State(state): State<Arc<HouseholdState>>) -> Json<Value> {
    let connections = state.connections.lock().unwrap().clone();
    let widgets: Vec<Value> = connections
        .iter()
        .filter(|connection| connection["enabled"] == json!(true))
        .map(|connection| {
            json!({
                "service_type": connection["service_type"],
                "service_name": connection["display_name"],
                "frontend_url": connection["frontend_url"],
                "endpoint_name": "tasks",
                "label": "Tasks",
                "data": [{ "name": "Laundry", "status": "completed" }],
                "error": null,
            })
        })
        .collect();
    let count = widgets.len();
    *state.widgets.lock().unwrap() = widgets;
    *state.last_refreshed_at.lock().unwrap() = Some(FIXED_STAMP.to_string());
    Json(json!({
        "success": true,
        "message": "Dashboard refreshed",
        "widgets_count": count,
    }))
}

fn session_summary(detail: &Value) -> Value {
    json!({
        "id": detail["id"],
        "title": detail["title"],
        "created_at": detail["created_at"],
        "updated_at": detail["updated_at"],
        "message_count": detail["messages"].as_array().map(Vec::len).unwrap_or(0),
    })
}

async fn list_sessions(State(state): State<Arc<HouseholdState>>) -> Json<Value> {
    let sessions = state.sessions.lock().unwrap();
    Json(Value::Array(sessions.iter().map(session_summary).collect()))
}

async fn get_session(
    State(state): State<Arc<HouseholdState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let sessions = state.sessions.lock().unwrap();
    sessions
        .iter()
        .find(|session| session["id"].as_str() == Some(id.as_str()))
        .cloned()
        .map(Json)
        .ok_or_else(|| not_found("Session not found"))
}

async fn delete_session(
    State(state): State<Arc<HouseholdState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, (StatusCode, Json<Value>)> {
    let mut sessions = state.sessions.lock().unwrap();
    let before = sessions.len();
    sessions.retain(|session| session["id"].as_str() != Some(id.as_str()));
    if sessions.len() == before {
        return Err(not_found("Session not found"));
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn chat(
    State(state): State<Arc<HouseholdState>>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let message = body["message"].as_str().unwrap_or_default().to_string();
    if message == "explode" {
        return Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "detail": "agent backend unavailable" })),
        ));
    }

    let mut sessions = state.sessions.lock().unwrap();
    let session_id = match body["session_id"].as_str() {
        Some(id) => id.to_string(),
        None => {
            let mut next = state.next_session.lock().unwrap();
            *next += 1;
            let id = format!("s{}", *next);
            sessions.push(json!({
                "id": id,
                "title": message,
                "messages": [],
                "created_at": FIXED_STAMP,
                "updated_at": FIXED_STAMP,
            }));
            id
        }
    };

    let session = sessions
        .iter_mut()
        .find(|session| session["id"].as_str() == Some(session_id.as_str()))
        .ok_or_else(|| not_found("Session not found"))?;
    let reply = json!({
        "role": "assistant",
        "content": "You have 2 events today.",
        "timestamp": FIXED_STAMP,
    });
    let messages = session["messages"].as_array_mut().expect("messages array");
    messages.push(json!({ "role": "user", "content": message, "timestamp": FIXED_STAMP }));
    messages.push(reply.clone());

    Ok(Json(json!({ "session_id": session_id, "message": reply })))
}

fn router(state: Arc<HouseholdState>) -> Router {
    Router::new()
        .route(
            "/api/connections",
            get(list_connections).post(create_connection),
        )
        .route(
            "/api/connections/{id}",
            axum::routing::put(update_connection).delete(delete_connection),
        )
        .route("/api/connections/{id}/test", post(test_connection))
        .route("/api/dashboard", get(get_dashboard))
        .route("/api/dashboard/refresh", post(refresh_dashboard))
        .route("/api/agent/sessions", get(list_sessions))
        .route(
            "/api/agent/sessions/{id}",
            get(get_session).delete(delete_session),
        )
        .route("/api/agent/chat", post(chat))
        .with_state(state)
}

async fn spawn_backend() -> (SocketAddr, Arc<HouseholdState>, tokio::task::JoinHandle<()>) {
    let state = Arc::new(HouseholdState::default());
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral listener");
    let addr = listener.local_addr().expect("resolve listener addr");
    let app = router(Arc::clone(&state));
    let handle = tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    tokio::time::sleep(Duration::from_millis(20)).await;
    (addr, state, handle)
}

fn backend_client(addr: SocketAddr) -> Arc<dyn HouseholdBackend> {
    Arc::new(
        ApiClient::new(ApiClientConfig {
            api_base: format!("http://{addr}"),
            auth_token: Some("integration-token".to_string()),
            request_timeout_ms: 2_000,
        })
        .expect("build client"),
    )
}

fn tracker_draft() -> ConnectionDraft {
    ConnectionDraft {
        service_type: ServiceKind::Track,
        display_name: "Chore Tracker".to_string(),
        base_url: "http://localhost:8010".to_string(),
        frontend_url: Some("http://localhost:8090".to_string()),
        auth_type: AuthScheme::JwtPassword,
        credentials: ConnectionCredentials::Password {
            username: "ada".to_string(),
            password: "secret".to_string(),
        },
        endpoints: Vec::new(),
    }
}

#[tokio::test]
async fn dashboard_flows_from_onboarding_to_widgets() {
    let (addr, _state, handle) = spawn_backend().await;
    let backend = backend_client(addr);
    let registry = ConnectionRegistry::new(Arc::clone(&backend));
    let orchestrator = DashboardOrchestrator::new(Arc::clone(&backend));

    // Nothing configured: the onboarding view, not an empty widget grid.
    orchestrator.load().await.expect("load");
    assert_eq!(orchestrator.view(), DashboardView::NoConnections);

    // A connection without widget data yet: the no-data view.
    registry.create(&tracker_draft()).await.expect("create");
    orchestrator.load().await.expect("load");
    assert!(matches!(orchestrator.view(), DashboardView::NoWidgets { .. }));

    // Refresh recomputes widgets, then the grid renders.
    let report = orchestrator.refresh().await.expect("refresh");
    assert_eq!(report.map(|report| report.widgets_count), Some(1));
    let DashboardView::Widgets { dashboard } = orchestrator.view() else {
        panic!("expected widget view");
    };
    let lines = render_widget(&dashboard.widgets[0]);
    assert!(lines.contains(&"[x] Laundry".to_string()));
    assert_eq!(orchestrator.quick_links().len(), 1);

    handle.abort();
}

#[tokio::test]
async fn deleted_connection_widgets_never_resurface() {
    let (addr, _state, handle) = spawn_backend().await;
    let backend = backend_client(addr);
    let registry = ConnectionRegistry::new(Arc::clone(&backend));
    let orchestrator = DashboardOrchestrator::new(Arc::clone(&backend));

    registry.create(&tracker_draft()).await.expect("create");
    orchestrator.refresh().await.expect("refresh");
    let DashboardView::Widgets { dashboard } = orchestrator.view() else {
        panic!("expected widget view");
    };
    assert_eq!(dashboard.widgets[0].service_name, "Chore Tracker");

    let id = registry.connections()[0].id.clone();
    registry.delete(&id).await.expect("delete");

    orchestrator.refresh().await.expect("refresh");
    assert_eq!(orchestrator.view(), DashboardView::NoConnections);
    assert!(orchestrator
        .connections()
        .iter()
        .all(|connection| connection.id != id));

    handle.abort();
}

#[tokio::test]
async fn disabled_connection_is_excluded_from_the_next_refresh() {
    let (addr, _state, handle) = spawn_backend().await;
    let backend = backend_client(addr);
    let registry = ConnectionRegistry::new(Arc::clone(&backend));
    let orchestrator = DashboardOrchestrator::new(Arc::clone(&backend));

    registry.create(&tracker_draft()).await.expect("create");
    let id = registry.connections()[0].id.clone();
    let enabled = registry.toggle(&id).await.expect("toggle");
    assert!(!enabled);

    let report = orchestrator.refresh().await.expect("refresh");
    assert_eq!(report.map(|report| report.widgets_count), Some(0));

    handle.abort();
}

#[tokio::test]
async fn chat_round_trip_promotes_and_keeps_the_server_session() {
    let (addr, _state, handle) = spawn_backend().await;
    let backend = backend_client(addr);
    let agent = AgentSessionController::new(Arc::clone(&backend));

    let report = agent
        .send("What's on my calendar today?")
        .await
        .expect("send");
    assert!(report.delivered);
    assert_eq!(agent.active_session_id().as_deref(), Some("s1"));

    let transcript = agent.transcript();
    assert_eq!(transcript.len(), 2);
    assert_eq!(transcript[0].content, "What's on my calendar today?");
    assert_eq!(transcript[1].content, "You have 2 events today.");

    // The id stays stable across the next send in the same session.
    agent.send("And tomorrow?").await.expect("send");
    assert_eq!(agent.active_session_id().as_deref(), Some("s1"));
    assert_eq!(agent.transcript().len(), 4);

    // The server-side transcript matches send order.
    agent.load_session("s1").await.expect("load");
    let stored = agent.transcript();
    assert_eq!(stored.len(), 4);
    assert_eq!(stored[0].role, MessageRole::User);
    assert_eq!(stored[2].content, "And tomorrow?");

    handle.abort();
}

#[tokio::test]
async fn failed_send_over_http_preserves_user_intent() {
    let (addr, _state, handle) = spawn_backend().await;
    let backend = backend_client(addr);
    let agent = AgentSessionController::new(Arc::clone(&backend));

    let report = agent.send("explode").await.expect("send");
    assert!(!report.delivered);

    let transcript = agent.transcript();
    assert_eq!(transcript.len(), 2);
    assert_eq!(transcript[0].content, "explode");
    assert!(transcript[1].content.starts_with("Error:"));
    assert!(transcript[1].content.contains("agent backend unavailable"));
    assert_eq!(agent.active_session_id(), None);

    handle.abort();
}

#[tokio::test]
async fn session_list_is_idempotent_and_delete_resets_active() {
    let (addr, _state, handle) = spawn_backend().await;
    let backend = backend_client(addr);
    let agent = AgentSessionController::new(Arc::clone(&backend));

    agent.send("first question").await.expect("send");
    agent.list_sessions().await.expect("list");
    let first = agent.sessions();
    agent.list_sessions().await.expect("list");
    assert_eq!(first, agent.sessions());
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].message_count, 2);

    agent.delete_session("s1").await.expect("delete");
    assert_eq!(agent.active_session_id(), None);
    assert!(agent.transcript().is_empty());
    assert!(agent.sessions().is_empty());

    handle.abort();
}

#[tokio::test]
async fn testing_a_vanished_connection_reports_failure_in_place() {
    let (addr, _state, handle) = spawn_backend().await;
    let backend = backend_client(addr);
    let registry = ConnectionRegistry::new(backend);

    let report = registry.test("ghost").await.expect("test yields a report");
    assert!(!report.success);
    assert!(report.message.contains("Connection not found"));

    handle.abort();
}

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::time_utils::now_rfc3339;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
/// Enumerates supported `ServiceKind` values.
///
/// Unknown service types deserialize as `Other` so that a backend introducing
/// a new kind never breaks existing clients.
pub enum ServiceKind {
    Track,
    Calendar,
    #[serde(other)]
    Other,
}

impl ServiceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Track => "track",
            Self::Calendar => "calendar",
            Self::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
/// Enumerates supported `AuthScheme` values.
pub enum AuthScheme {
    #[default]
    JwtPassword,
    JwtJson,
    ApiKey,
}

impl AuthScheme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::JwtPassword => "jwt_password",
            Self::JwtJson => "jwt_json",
            Self::ApiKey => "api_key",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
/// Public struct `EndpointConfig` used across Hearth components.
pub struct EndpointConfig {
    pub name: String,
    pub path: String,
    pub method: String,
    #[serde(default)]
    pub dashboard_label: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
/// One configured link to an external household service.
pub struct Connection {
    pub id: String,
    pub service_type: ServiceKind,
    pub display_name: String,
    pub base_url: String,
    #[serde(default)]
    pub frontend_url: Option<String>,
    pub auth_type: AuthScheme,
    #[serde(default)]
    pub endpoints: Vec<EndpointConfig>,
    pub enabled: bool,
    #[serde(default)]
    pub last_sync_at: Option<String>,
    #[serde(default)]
    pub last_sync_status: Option<String>,
    #[serde(default)]
    pub last_sync_error: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
/// Credentials for a service connection, discriminated by the auth scheme.
///
/// Serialized untagged so the wire shape is exactly `{"api_key": …}` or
/// `{"username": …, "password": …}`.
pub enum ConnectionCredentials {
    ApiKey { api_key: String },
    Password { username: String, password: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
/// Body of a create-connection request.
pub struct ConnectionDraft {
    pub service_type: ServiceKind,
    pub display_name: String,
    pub base_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frontend_url: Option<String>,
    pub auth_type: AuthScheme,
    pub credentials: ConnectionCredentials,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub endpoints: Vec<EndpointConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
/// Partial-update body for an existing connection. `None` fields are omitted.
pub struct ConnectionUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frontend_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_type: Option<AuthScheme>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials: Option<ConnectionCredentials>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoints: Option<Vec<EndpointConfig>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

impl ConnectionUpdate {
    pub fn enabled(enabled: bool) -> Self {
        Self {
            enabled: Some(enabled),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
/// Outcome of a connection reachability test.
pub struct ConnectionTestReport {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
/// One unit of dashboard data sourced from one connection endpoint.
///
/// `error` being present is authoritative: renderers ignore `data` for a
/// widget that failed to load. Widgets are never mutated after delivery.
pub struct WidgetData {
    pub service_type: ServiceKind,
    pub service_name: String,
    #[serde(default)]
    pub frontend_url: Option<String>,
    pub endpoint_name: String,
    pub label: String,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
/// Public struct `DashboardData` used across Hearth components.
pub struct DashboardData {
    #[serde(default)]
    pub widgets: Vec<WidgetData>,
    #[serde(default)]
    pub last_refreshed_at: Option<String>,
    #[serde(default)]
    pub refresh_errors: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
/// Response of the dashboard refresh trigger.
pub struct RefreshReport {
    pub success: bool,
    pub message: String,
    pub widgets_count: usize,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
/// Enumerates supported `MessageRole` values.
pub enum MessageRole {
    User,
    Assistant,
    System,
}

impl MessageRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::System => "system",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
/// Public struct `ChatMessage` used across Hearth components.
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<Map<String, Value>>>,
}

impl ChatMessage {
    /// Builds a user message stamped with the current client time.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
            timestamp: now_rfc3339(),
            tool_calls: None,
        }
    }

    /// Builds an assistant message stamped with the current client time.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
            timestamp: now_rfc3339(),
            tool_calls: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
/// Summary record for one chat session, distinct from the full transcript.
pub struct ChatSession {
    pub id: String,
    pub title: String,
    pub created_at: String,
    pub updated_at: String,
    pub message_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
/// Full transcript of one chat session.
pub struct ChatSessionDetail {
    pub id: String,
    pub title: String,
    pub messages: Vec<ChatMessage>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
/// Body of a chat send. `session_id` is null while the session is a draft.
pub struct ChatTurnRequest {
    pub message: String,
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
/// Public struct `ChatTurnResponse` used across Hearth components.
pub struct ChatTurnResponse {
    pub session_id: String,
    pub message: ChatMessage,
}

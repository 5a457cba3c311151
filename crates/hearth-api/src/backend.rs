use async_trait::async_trait;
use serde_json::Value;

use hearth_core::{
    ChatSession, ChatSessionDetail, ChatTurnRequest, ChatTurnResponse, Connection, ConnectionDraft,
    ConnectionTestReport, ConnectionUpdate, DashboardData, RefreshReport,
};

use crate::client::ApiClient;
use crate::error::RequestError;

#[async_trait]
/// Trait contract for the household backend's REST surface.
///
/// One typed method per route. Controllers hold `Arc<dyn HouseholdBackend>`
/// so unit tests can substitute scripted fakes for the HTTP client.
pub trait HouseholdBackend: Send + Sync {
    async fn list_connections(&self) -> Result<Vec<Connection>, RequestError>;
    async fn create_connection(&self, draft: &ConnectionDraft) -> Result<Connection, RequestError>;
    async fn update_connection(
        &self,
        id: &str,
        update: &ConnectionUpdate,
    ) -> Result<Connection, RequestError>;
    async fn delete_connection(&self, id: &str) -> Result<(), RequestError>;
    async fn test_connection(&self, id: &str) -> Result<ConnectionTestReport, RequestError>;
    async fn fetch_dashboard(&self) -> Result<DashboardData, RequestError>;
    async fn trigger_refresh(&self) -> Result<RefreshReport, RequestError>;
    async fn list_sessions(&self) -> Result<Vec<ChatSession>, RequestError>;
    async fn fetch_session(&self, id: &str) -> Result<ChatSessionDetail, RequestError>;
    async fn delete_session(&self, id: &str) -> Result<(), RequestError>;
    async fn send_chat(&self, request: &ChatTurnRequest) -> Result<ChatTurnResponse, RequestError>;
}

fn to_body<T: serde::Serialize>(value: &T) -> Result<Value, RequestError> {
    serde_json::to_value(value).map_err(RequestError::Decode)
}

#[async_trait]
impl HouseholdBackend for ApiClient {
    async fn list_connections(&self) -> Result<Vec<Connection>, RequestError> {
        self.get("/api/connections").await
    }

    async fn create_connection(&self, draft: &ConnectionDraft) -> Result<Connection, RequestError> {
        let body = to_body(draft)?;
        self.post("/api/connections", Some(&body)).await
    }

    async fn update_connection(
        &self,
        id: &str,
        update: &ConnectionUpdate,
    ) -> Result<Connection, RequestError> {
        let body = to_body(update)?;
        self.put(&format!("/api/connections/{id}"), Some(&body))
            .await
    }

    async fn delete_connection(&self, id: &str) -> Result<(), RequestError> {
        self.delete(&format!("/api/connections/{id}")).await
    }

    async fn test_connection(&self, id: &str) -> Result<ConnectionTestReport, RequestError> {
        self.post(&format!("/api/connections/{id}/test"), None)
            .await
    }

    async fn fetch_dashboard(&self) -> Result<DashboardData, RequestError> {
        self.get("/api/dashboard").await
    }

    async fn trigger_refresh(&self) -> Result<RefreshReport, RequestError> {
        self.post("/api/dashboard/refresh", None).await
    }

    async fn list_sessions(&self) -> Result<Vec<ChatSession>, RequestError> {
        self.get("/api/agent/sessions").await
    }

    async fn fetch_session(&self, id: &str) -> Result<ChatSessionDetail, RequestError> {
        self.get(&format!("/api/agent/sessions/{id}")).await
    }

    async fn delete_session(&self, id: &str) -> Result<(), RequestError> {
        self.delete(&format!("/api/agent/sessions/{id}")).await
    }

    async fn send_chat(&self, request: &ChatTurnRequest) -> Result<ChatTurnResponse, RequestError> {
        let body = to_body(request)?;
        self.post("/api/agent/chat", Some(&body)).await
    }
}

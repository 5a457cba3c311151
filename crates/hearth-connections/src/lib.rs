//! Connection registry controller.
//!
//! Owns the list of service connections plus the in-flight operation state
//! for each connection id. Operations on the same id are mutually exclusive
//! (`Idle → Testing → Idle`, `Idle → Deleting → Removed`); operations on
//! distinct ids never block each other. The list is always replaced
//! wholesale after a mutation, never merged incrementally.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use thiserror::Error;

use hearth_api::{HouseholdBackend, RequestError};
use hearth_core::{
    AuthScheme, Connection, ConnectionCredentials, ConnectionDraft, ConnectionTestReport,
    ConnectionUpdate,
};


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Enumerates supported `ConnectionOp` values.
pub enum ConnectionOp {
    Testing,
    Deleting,
}

impl ConnectionOp {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Testing => "testing",
            Self::Deleting => "deleting",
        }
    }
}

impl std::fmt::Display for ConnectionOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
/// Enumerates supported `RegistryError` values.
pub enum RegistryError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("connection {id} already has a {op} operation pending")]
    OperationPending { id: String, op: ConnectionOp },
    #[error(transparent)]
    Request(#[from] RequestError),
}

#[derive(Default)]
struct RegistryState {
    connections: Vec<Connection>,
    ops: HashMap<String, ConnectionOp>,
    test_reports: HashMap<String, ConnectionTestReport>,
}

/// Controller owning the connection set and per-id async operation state.
pub struct ConnectionRegistry {
    backend: Arc<dyn HouseholdBackend>,
    state: Mutex<RegistryState>,
}

impl ConnectionRegistry {
    pub fn new(backend: Arc<dyn HouseholdBackend>) -> Self {
        Self {
            backend,
            state: Mutex::new(RegistryState::default()),
        }
    }

    pub fn connections(&self) -> Vec<Connection> {
        self.lock().connections.clone()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().connections.is_empty()
    }

    pub fn op(&self, id: &str) -> Option<ConnectionOp> {
        self.lock().ops.get(id).copied()
    }

    pub fn is_testing(&self, id: &str) -> bool {
        self.op(id) == Some(ConnectionOp::Testing)
    }

    pub fn is_deleting(&self, id: &str) -> bool {
        self.op(id) == Some(ConnectionOp::Deleting)
    }

    pub fn test_report(&self, id: &str) -> Option<ConnectionTestReport> {
        self.lock().test_reports.get(id).cloned()
    }

    /// Fetches the full connection set and replaces prior state wholesale.
    pub async fn list(&self) -> Result<(), RegistryError> {
        let fetched = self.backend.list_connections().await?;
        self.lock().connections = fetched;
        Ok(())
    }

    /// Creates a connection, then re-lists. Validation runs before any
    /// network call and blocks submission on missing required fields.
    pub async fn create(&self, draft: &ConnectionDraft) -> Result<(), RegistryError> {
        validate_draft(draft)?;
        self.backend.create_connection(draft).await?;
        self.list().await
    }

    /// Sends the logical negation of the connection's `enabled` flag, then
    /// re-lists. No optimistic flip: toggling changes dashboard composition,
    /// so the list is re-read from the backend.
    pub async fn toggle(&self, id: &str) -> Result<bool, RegistryError> {
        let enabled = self
            .lock()
            .connections
            .iter()
            .find(|connection| connection.id == id)
            .map(|connection| connection.enabled)
            .ok_or_else(|| RegistryError::Validation(format!("unknown connection id {id}")))?;
        let update = ConnectionUpdate::enabled(!enabled);
        self.backend.update_connection(id, &update).await?;
        self.list().await?;
        Ok(!enabled)
    }

    /// Runs a reachability test for one connection id.
    ///
    /// The network call failing is itself a test outcome, so a
    /// `RequestError` folds into `{ success: false, message }` instead of
    /// propagating. The report is stored keyed by id and returned.
    pub async fn test(&self, id: &str) -> Result<ConnectionTestReport, RegistryError> {
        self.begin_op(id, ConnectionOp::Testing)?;
        self.lock().test_reports.remove(id);

        let report = match self.backend.test_connection(id).await {
            Ok(report) => report,
            Err(error) => ConnectionTestReport {
                success: false,
                message: error.to_string(),
            },
        };

        let mut state = self.lock();
        state.test_reports.insert(id.to_string(), report.clone());
        state.ops.remove(id);
        Ok(report)
    }

    /// Deletes one connection id.
    ///
    /// HTTP 404 counts as already gone and still removes the entry together
    /// with any session-local state referencing it. Any other failure
    /// returns the connection to idle and propagates.
    pub async fn delete(&self, id: &str) -> Result<(), RegistryError> {
        self.begin_op(id, ConnectionOp::Deleting)?;

        match self.backend.delete_connection(id).await {
            Ok(()) => {}
            Err(error) if error.is_not_found() => {
                tracing::warn!(id, "connection already gone on backend, removing locally");
            }
            Err(error) => {
                self.lock().ops.remove(id);
                return Err(error.into());
            }
        }

        let mut state = self.lock();
        state.connections.retain(|connection| connection.id != id);
        state.test_reports.remove(id);
        state.ops.remove(id);
        Ok(())
    }

    fn begin_op(&self, id: &str, op: ConnectionOp) -> Result<(), RegistryError> {
        let mut state = self.lock();
        if let Some(pending) = state.ops.get(id) {
            return Err(RegistryError::OperationPending {
                id: id.to_string(),
                op: *pending,
            });
        }
        state.ops.insert(id.to_string(), op);
        Ok(())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, RegistryState> {
        // Never held across an await; poisoning would mean a panic mid-update.
        self.state.lock().expect("registry state lock poisoned")
    }
}

/// Caller-side validation for a create submission. Runs before any network
/// call; failures render inline and never reach the gateway client.
pub fn validate_draft(draft: &ConnectionDraft) -> Result<(), RegistryError> {
    if draft.display_name.trim().is_empty() {
        return Err(RegistryError::Validation(
            "display name is required".to_string(),
        ));
    }
    if draft.base_url.trim().is_empty() {
        return Err(RegistryError::Validation("base URL is required".to_string()));
    }
    match (&draft.auth_type, &draft.credentials) {
        (AuthScheme::ApiKey, ConnectionCredentials::ApiKey { api_key }) => {
            if api_key.trim().is_empty() {
                return Err(RegistryError::Validation("API key is required".to_string()));
            }
        }
        (AuthScheme::ApiKey, ConnectionCredentials::Password { .. }) => {
            return Err(RegistryError::Validation(
                "API-key auth requires an api_key credential".to_string(),
            ));
        }
        (_, ConnectionCredentials::Password { username, password }) => {
            if username.trim().is_empty() || password.trim().is_empty() {
                return Err(RegistryError::Validation(
                    "username and password are required".to_string(),
                ));
            }
        }
        (_, ConnectionCredentials::ApiKey { .. }) => {
            return Err(RegistryError::Validation(
                "password-based auth requires username and password credentials".to_string(),
            ));
        }
    }
    Ok(())
}

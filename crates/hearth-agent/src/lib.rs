//! Agent session controller.
//!
//! Owns the chat session list, the active transcript, and the optimistic
//! send flow. The transcript is an append-only local buffer reconciled with
//! the server by appending confirmed replies, never by two-way diffing: a
//! user message stays in place even when the send fails, with a synthetic
//! assistant error message appended so the conversation always reads
//! coherently.

use std::sync::{Arc, Mutex};

use thiserror::Error;

use hearth_api::{HouseholdBackend, RequestError};
use hearth_core::{ChatMessage, ChatSession, ChatTurnRequest};


#[derive(Debug, Error)]
/// Enumerates supported `AgentError` values.
pub enum AgentError {
    #[error("message is empty")]
    EmptyMessage,
    #[error("a send is already in flight")]
    SendPending,
    #[error(transparent)]
    Request(#[from] RequestError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Outcome of one send. A network failure is not an error here: the failure
/// is folded into the transcript and `delivered` is false.
pub struct SendReport {
    pub delivered: bool,
    pub session_id: Option<String>,
}

#[derive(Default)]
struct AgentState {
    sessions: Vec<ChatSession>,
    active_session_id: Option<String>,
    transcript: Vec<ChatMessage>,
    sending: bool,
}

/// Controller for the conversational agent surface.
pub struct AgentSessionController {
    backend: Arc<dyn HouseholdBackend>,
    state: Mutex<AgentState>,
}

impl AgentSessionController {
    pub fn new(backend: Arc<dyn HouseholdBackend>) -> Self {
        Self {
            backend,
            state: Mutex::new(AgentState::default()),
        }
    }

    pub fn sessions(&self) -> Vec<ChatSession> {
        self.lock().sessions.clone()
    }

    pub fn transcript(&self) -> Vec<ChatMessage> {
        self.lock().transcript.clone()
    }

    pub fn active_session_id(&self) -> Option<String> {
        self.lock().active_session_id.clone()
    }

    /// True only while a send for this controller is awaiting the backend.
    /// Unrelated background fetches never set this.
    pub fn is_sending(&self) -> bool {
        self.lock().sending
    }

    /// Fetches the session summaries and replaces the list wholesale.
    pub async fn list_sessions(&self) -> Result<(), AgentError> {
        let sessions = self.backend.list_sessions().await?;
        self.lock().sessions = sessions;
        Ok(())
    }

    /// Loads a full transcript and makes it the active session, replacing
    /// any unsent draft.
    pub async fn load_session(&self, id: &str) -> Result<(), AgentError> {
        let detail = self.backend.fetch_session(id).await?;
        let mut state = self.lock();
        state.active_session_id = Some(detail.id);
        state.transcript = detail.messages;
        Ok(())
    }

    /// Pure local reset back to a draft session. No network call.
    pub fn start_new_chat(&self) {
        let mut state = self.lock();
        state.active_session_id = None;
        state.transcript.clear();
    }

    /// Sends one user message.
    ///
    /// The user message is appended optimistically with a client-stamped
    /// timestamp before the network call resolves. On success the server's
    /// session id becomes (or confirms) the active id and the assistant
    /// reply is appended; the session list refresh afterwards is
    /// best-effort. On failure the user message is retained and a synthetic
    /// assistant error message is appended in the reply's place.
    pub async fn send(&self, text: &str) -> Result<SendReport, AgentError> {
        let content = text.trim();
        if content.is_empty() {
            return Err(AgentError::EmptyMessage);
        }

        let session_id = {
            let mut state = self.lock();
            if state.sending {
                return Err(AgentError::SendPending);
            }
            state.sending = true;
            state.transcript.push(ChatMessage::user(content));
            state.active_session_id.clone()
        };

        let request = ChatTurnRequest {
            message: content.to_string(),
            session_id,
        };

        match self.backend.send_chat(&request).await {
            Ok(response) => {
                {
                    let mut state = self.lock();
                    state.active_session_id = Some(response.session_id.clone());
                    state.transcript.push(response.message);
                    state.sending = false;
                }
                if let Err(error) = self.list_sessions().await {
                    tracing::warn!(%error, "session list refresh after send failed");
                }
                Ok(SendReport {
                    delivered: true,
                    session_id: Some(response.session_id),
                })
            }
            Err(error) => {
                let mut state = self.lock();
                state
                    .transcript
                    .push(ChatMessage::assistant(format!("Error: {error}")));
                state.sending = false;
                Ok(SendReport {
                    delivered: false,
                    session_id: state.active_session_id.clone(),
                })
            }
        }
    }

    /// Deletes a session on the backend. When the deleted session was
    /// active, the controller resets to no-active-session before the list
    /// refresh; an active session must never reference a deleted id.
    pub async fn delete_session(&self, id: &str) -> Result<(), AgentError> {
        self.backend.delete_session(id).await?;
        {
            let mut state = self.lock();
            if state.active_session_id.as_deref() == Some(id) {
                state.active_session_id = None;
                state.transcript.clear();
            }
        }
        self.list_sessions().await
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, AgentState> {
        // Never held across an await.
        self.state.lock().expect("agent state lock poisoned")
    }
}

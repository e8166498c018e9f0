// ABOUTME: Session bootstrap — returns the cached session id or creates one on the backend.
// ABOUTME: Fail-stop: a failed create-session call is logged and never retried.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::session::{SessionId, SessionStore};

/// Why a session identifier could not be obtained.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("session endpoint returned {0}")]
    Status(reqwest::StatusCode),
    #[error("malformed session response: {0}")]
    MalformedResponse(String),
    #[error("failed to persist session id: {0}")]
    Store(String),
}

/// Remote side of session creation.
#[async_trait]
pub trait SessionApi: Send + Sync {
    async fn create_session(&self) -> Result<SessionId, SessionError>;
}

/// `POST {api_url}/chat/session` with an empty body; the response carries `id`.
pub struct HttpSessionApi {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpSessionApi {
    pub fn new(api_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: format!("{}/chat/session", api_url.trim_end_matches('/')),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl SessionApi for HttpSessionApi {
    async fn create_session(&self) -> Result<SessionId, SessionError> {
        let response = self.client.post(&self.endpoint).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SessionError::Status(status));
        }
        let body = response.text().await?;
        parse_session_response(&body)
    }
}

/// Extract the session id from a create-session response body.
///
/// The backend serializes integer primary keys, so numeric ids are accepted
/// and rendered as their decimal string.
pub fn parse_session_response(body: &str) -> Result<SessionId, SessionError> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| SessionError::MalformedResponse(e.to_string()))?;
    match value.get("id") {
        Some(Value::String(id)) if !id.trim().is_empty() => Ok(SessionId::new(id.clone())),
        Some(Value::Number(id)) => Ok(SessionId::new(id.to_string())),
        Some(other) => Err(SessionError::MalformedResponse(format!(
            "unusable `id` value: {other}"
        ))),
        None => Err(SessionError::MalformedResponse(
            "missing `id` field".to_string(),
        )),
    }
}

/// Obtains the session identifier, consulting the store before the backend.
pub struct SessionBootstrapper {
    store: Box<dyn SessionStore>,
    api: Arc<dyn SessionApi>,
}

impl SessionBootstrapper {
    pub fn new(store: Box<dyn SessionStore>, api: Arc<dyn SessionApi>) -> Self {
        Self { store, api }
    }

    pub fn store(&self) -> &dyn SessionStore {
        self.store.as_ref()
    }

    pub fn store_mut(&mut self) -> &mut dyn SessionStore {
        self.store.as_mut()
    }

    /// Return the cached session id, or create and persist a new one.
    ///
    /// A cached value is returned unchanged without touching the backend.
    /// Otherwise exactly one create-session call is made and its result is
    /// stored before returning.
    pub async fn ensure_session(&mut self) -> Result<SessionId, SessionError> {
        if let Some(id) = self.store.get() {
            tracing::debug!(session = %id, "reusing cached session");
            return Ok(id);
        }

        let id = match self.api.create_session().await {
            Ok(id) => id,
            Err(e) => {
                tracing::error!(error = %e, "error creating session");
                return Err(e);
            }
        };

        if let Err(e) = self.store.set(id.clone()) {
            tracing::error!(error = %e, "error persisting session");
            return Err(SessionError::Store(format!("{e:#}")));
        }

        tracing::info!(session = %id, "created chat session");
        Ok(id)
    }
}

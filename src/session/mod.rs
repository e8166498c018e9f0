// ABOUTME: Session module — durable visitor identity and its bootstrap.
// ABOUTME: Stores the session identifier on disk and creates one remotely when missing.

pub mod bootstrap;
pub mod store;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use bootstrap::{HttpSessionApi, SessionApi, SessionBootstrapper, SessionError};
pub use store::{FileSessionStore, MemorySessionStore, SessionStore};

/// Opaque identifier of a visitor's chat session, issued by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Leading characters of the identifier, for compact display.
    pub fn short(&self) -> String {
        self.0.chars().take(8).collect()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_plain_string() {
        let id = SessionId::new("abc123");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"abc123\"");
    }

    #[test]
    fn short_truncates_by_characters() {
        assert_eq!(SessionId::new("0123456789").short(), "01234567");
        assert_eq!(SessionId::new("é1").short(), "é1");
    }
}

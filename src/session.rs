use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use reqwest::RequestBuilder;
use tracing::debug;

use crate::error::ApiResult;

/// Key the bearer token is persisted under.
pub const TOKEN_KEY: &str = "token";

/// Where the session token survives between runs.
#[derive(Debug, Clone)]
pub enum TokenStore {
    Memory,
    File(PathBuf),
}

impl TokenStore {
    fn read(&self) -> ApiResult<Option<String>> {
        let path = match self {
            TokenStore::Memory => return Ok(None),
            TokenStore::File(path) => path,
        };
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path)?;
        let mut entries: HashMap<String, String> = serde_json::from_str(&content)?;
        Ok(entries.remove(TOKEN_KEY).filter(|token| !token.is_empty()))
    }

    fn write(&self, token: &str) -> ApiResult<()> {
        if let TokenStore::File(path) = self {
            let entries = HashMap::from([(TOKEN_KEY, token)]);
            std::fs::write(path, serde_json::to_string_pretty(&entries)?)?;
        }
        Ok(())
    }

    fn remove(&self) -> ApiResult<()> {
        if let TokenStore::File(path) = self {
            if path.exists() {
                std::fs::remove_file(path)?;
            }
        }
        Ok(())
    }
}

/// The signed-in state shared by the transport and the views.
///
/// Cloning is cheap and every clone sees the same token.
#[derive(Debug, Clone)]
pub struct Session {
    store: TokenStore,
    token: Arc<RwLock<Option<String>>>,
}

impl Session {
    pub fn in_memory() -> Self {
        Session {
            store: TokenStore::Memory,
            token: Arc::new(RwLock::new(None)),
        }
    }

    /// Starts a session from whatever token the store already holds.
    pub fn load(store: TokenStore) -> ApiResult<Self> {
        let token = store.read()?;
        debug!(authenticated = token.is_some(), "session loaded");
        Ok(Session {
            store,
            token: Arc::new(RwLock::new(token)),
        })
    }

    pub fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// Stores a new token. An empty token signs the session out.
    pub fn set_token(&self, token: impl Into<String>) -> ApiResult<()> {
        let token = token.into();
        if token.is_empty() {
            return self.clear();
        }
        self.store.write(&token)?;
        *self
            .token
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(token);
        Ok(())
    }

    /// Forgets the token locally. The server is never told.
    pub fn clear(&self) -> ApiResult<()> {
        self.store.remove()?;
        *self
            .token
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = None;
        Ok(())
    }

    pub fn authorize(&self, request_builder: RequestBuilder) -> RequestBuilder {
        match self.token() {
            Some(token) => request_builder.bearer_auth(token),
            None => request_builder,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_lifecycle() {
        let session = Session::in_memory();
        assert!(!session.is_authenticated());

        session.set_token("abc").unwrap();
        assert_eq!(session.token().as_deref(), Some("abc"));

        let shared = session.clone();
        shared.clear().unwrap();
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_file_store_survives_reload() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("lantern.session");

        let session = Session::load(TokenStore::File(path.clone())).unwrap();
        assert!(session.token().is_none());
        session.set_token("persisted").unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let stored: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(stored["token"], "persisted");

        let reloaded = Session::load(TokenStore::File(path.clone())).unwrap();
        assert_eq!(reloaded.token().as_deref(), Some("persisted"));

        reloaded.clear().unwrap();
        assert!(!path.exists());
        reloaded.clear().unwrap();
        assert!(Session::load(TokenStore::File(path)).unwrap().token().is_none());
    }

    #[test]
    fn test_empty_token_signs_out() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("lantern.session");
        let session = Session::load(TokenStore::File(path.clone())).unwrap();
        session.set_token("abc").unwrap();

        session.set_token("").unwrap();
        assert!(!session.is_authenticated());
        assert!(!path.exists());
        let reloaded = Session::load(TokenStore::File(path)).unwrap();
        assert_eq!(reloaded.is_authenticated(), session.is_authenticated());

        let request = session
            .authorize(reqwest::Client::new().get("http://localhost/albums"))
            .build()
            .unwrap();
        assert!(request.headers().get("authorization").is_none());
    }

    #[test]
    fn test_corrupt_store_is_an_error() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("lantern.session");
        std::fs::write(&path, "not json").unwrap();

        assert!(Session::load(TokenStore::File(path)).is_err());
    }

    #[test]
    fn test_authorize_adds_bearer_only_with_token() {
        let client = reqwest::Client::new();
        let session = Session::in_memory();

        let request = session
            .authorize(client.get("http://localhost/albums"))
            .build()
            .unwrap();
        assert!(request.headers().get("authorization").is_none());

        session.set_token("abc").unwrap();
        let request = session
            .authorize(client.get("http://localhost/albums"))
            .build()
            .unwrap();
        assert_eq!(request.headers()["authorization"], "Bearer abc");
    }
}

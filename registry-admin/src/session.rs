//! Session context handed to the top-level view.
//!
//! Persisted as a small JSON file so it survives restarts. Credentials are
//! checked elsewhere; this only records who is signed in.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Session file error: {0}")]
    Io(#[from] io::Error),
    #[error("Session encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl CurrentUser {
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.username)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub is_authenticated: bool,
    pub current_user: Option<CurrentUser>,
}

/// Owns the persisted session: `init` on startup, `update` on login,
/// `clear` on logout.
#[derive(Debug)]
pub struct SessionStore {
    path: PathBuf,
    session: Session,
}

impl SessionStore {
    /// Reads the persisted session. A missing or unreadable file means anonymous.
    pub fn init(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let session = match fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<Session>(&content) {
                Ok(session) if session.is_authenticated && session.current_user.is_some() => {
                    session
                }
                Ok(_) => Session::default(),
                Err(e) => {
                    log::warn!("⚠️ Ignoring corrupt session file {}: {}", path.display(), e);
                    Session::default()
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => Session::default(),
            Err(e) => {
                log::warn!("⚠️ Could not read session file {}: {}", path.display(), e);
                Session::default()
            }
        };

        Self { path, session }
    }

    pub fn update(&mut self, user: CurrentUser) -> Result<(), SessionError> {
        let session = Session {
            is_authenticated: true,
            current_user: Some(user),
        };
        fs::write(&self.path, serde_json::to_string_pretty(&session)?)?;
        log::info!("🔐 Signed in as {}", session.current_user.as_ref().map_or("", |u| u.username.as_str()));
        self.session = session;
        Ok(())
    }

    pub fn clear(&mut self) -> Result<(), SessionError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        self.session = Session::default();
        log::info!("🔓 Signed out");
        Ok(())
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated
    }

    pub fn current_user(&self) -> Option<&CurrentUser> {
        self.session.current_user.as_ref()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> CurrentUser {
        CurrentUser {
            username: "admin".to_string(),
            display_name: Some("Secretaría".to_string()),
        }
    }

    #[test]
    fn test_missing_file_is_anonymous() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::init(dir.path().join("session.json"));
        assert!(!store.is_authenticated());
        assert!(store.current_user().is_none());
    }

    #[test]
    fn test_update_persists_across_init() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let mut store = SessionStore::init(&path);
        store.update(user()).unwrap();
        assert!(store.is_authenticated());

        let reloaded = SessionStore::init(&path);
        assert!(reloaded.is_authenticated());
        assert_eq!(reloaded.current_user(), Some(&user()));
        assert_eq!(reloaded.current_user().unwrap().label(), "Secretaría");
    }

    #[test]
    fn test_clear_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let mut store = SessionStore::init(&path);
        store.update(user()).unwrap();
        store.clear().unwrap();

        assert!(!store.is_authenticated());
        assert!(!path.exists());
        assert!(!SessionStore::init(&path).is_authenticated());

        // Clearing twice is fine
        store.clear().unwrap();
    }

    #[test]
    fn test_corrupt_file_is_anonymous() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "{ not json").unwrap();

        assert_eq!(SessionStore::init(&path).session(), &Session::default());
    }

    #[test]
    fn test_flag_without_user_is_anonymous() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, r#"{"is_authenticated":true,"current_user":null}"#).unwrap();

        assert!(!SessionStore::init(&path).is_authenticated());
    }
}

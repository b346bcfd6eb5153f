use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use client::{ApiError, TokenProvider};
use models::LoginResponse;
use thiserror::Error;

use crate::auth::AuthState;
use crate::shared::Shared;

/// Storage keys mirror the browser build's localStorage entries.
pub const STORAGE_PREFIX: &str = "CasaGialla_";
const KEY_TOKEN: &str = "CasaGialla_authToken";
const KEY_ACCOUNT: &str = "CasaGialla_idAccount";
const KEY_RECORD: &str = "CasaGialla_idAnagrafica";
const KEY_EMAIL: &str = "CasaGialla_email";

/// Client-held credential bundle; not a server entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub account_id: i64,
    pub record_id: i64,
    pub email: String,
}

impl Session {
    pub fn from_login(response: LoginResponse, email: impl Into<String>) -> Self {
        Self {
            token: response.access_token,
            account_id: response.account_id,
            record_id: response.record_id,
            email: email.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no platform data directory available")]
    NoDataDir,
    #[error("failed to persist the session: {0}")]
    Io(#[from] io::Error),
    #[error("failed to encode the session: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Two-state holder: Anonymous (no session) or Authenticated. The session
/// file is written at the Authenticated transition and erased at the
/// Anonymous one, so credentials survive a restart but never a logout.
pub struct SessionHolder {
    path: PathBuf,
    current: Mutex<Option<Session>>,
}

impl SessionHolder {
    /// Opens the holder against an explicit file, seeding from whatever the
    /// previous process left there. An unreadable file counts as Anonymous.
    pub fn open(path: PathBuf) -> Self {
        let current = load(&path);
        Self {
            path,
            current: Mutex::new(current),
        }
    }

    /// Opens the holder in the platform data directory.
    pub fn in_user_data_dir() -> Result<Self, SessionError> {
        let dir = dirs::data_local_dir().ok_or(SessionError::NoDataDir)?;
        Ok(Self::open(dir.join("casa-gialla").join("session.json")))
    }

    pub fn current(&self) -> Option<Session> {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current().is_some()
    }

    /// Anonymous → Authenticated. The in-memory session is always updated;
    /// a persistence failure is reported but does not undo the transition.
    pub fn establish(&self, session: Session) -> Result<(), SessionError> {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = Some(session.clone());

        let mut entries = BTreeMap::new();
        entries.insert(KEY_TOKEN, session.token.clone());
        entries.insert(KEY_ACCOUNT, session.account_id.to_string());
        entries.insert(KEY_RECORD, session.record_id.to_string());
        entries.insert(KEY_EMAIL, session.email.clone());

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let body = serde_json::to_vec_pretty(&entries)?;
        std::fs::write(&self.path, body)?;
        Ok(())
    }

    /// Authenticated → Anonymous. Erases all persisted entries.
    pub fn clear(&self) -> Result<(), SessionError> {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = None;
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(error.into()),
        }
    }
}

impl TokenProvider for SessionHolder {
    fn token(&self) -> Option<String> {
        self.current().map(|session| session.token)
    }
}

fn load(path: &Path) -> Option<Session> {
    let body = std::fs::read_to_string(path).ok()?;
    let entries: BTreeMap<String, String> = match serde_json::from_str(&body) {
        Ok(entries) => entries,
        Err(error) => {
            tracing::warn!(%error, path = %path.display(), "unreadable session file, starting anonymous");
            return None;
        }
    };
    let token = entries.get(KEY_TOKEN).filter(|token| !token.is_empty())?;
    let account_id = entries.get(KEY_ACCOUNT)?.parse().ok()?;
    let record_id = entries.get(KEY_RECORD)?.parse().ok()?;
    let email = entries.get(KEY_EMAIL)?;
    Some(Session {
        token: token.clone(),
        account_id,
        record_id,
        email: email.clone(),
    })
}

/// Reacts to backend 401s: any authenticated operation that is rejected
/// drops the session and the in-memory identity, flipping the app to
/// Anonymous.
#[derive(Clone)]
pub struct SessionGuard {
    session: Arc<SessionHolder>,
    auth: Shared<AuthState>,
}

impl SessionGuard {
    pub fn new(session: Arc<SessionHolder>, auth: Shared<AuthState>) -> Self {
        Self { session, auth }
    }

    pub fn check(&self, error: &ApiError) {
        if !error.is_unauthorized() {
            return;
        }
        tracing::info!("backend rejected the session token, dropping credentials");
        if let Err(error) = self.session.clear() {
            tracing::warn!(%error, "failed to erase the persisted session");
        }
        self.auth.write(|state| state.clear_identity());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session {
            token: "jwt".to_string(),
            account_id: 4,
            record_id: 9,
            email: "tutor@casagialla.it".to_string(),
        }
    }

    #[test]
    fn establish_persists_all_four_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let holder = SessionHolder::open(path.clone());

        holder.establish(session()).unwrap();

        let body = std::fs::read_to_string(&path).unwrap();
        let entries: BTreeMap<String, String> = serde_json::from_str(&body).unwrap();
        assert_eq!(entries.len(), 4);
        assert!(entries.keys().all(|key| key.starts_with(STORAGE_PREFIX)));
        assert_eq!(entries[KEY_TOKEN], "jwt");
        assert_eq!(entries[KEY_ACCOUNT], "4");
        assert_eq!(entries[KEY_RECORD], "9");
        assert_eq!(entries[KEY_EMAIL], "tutor@casagialla.it");
    }

    #[test]
    fn a_new_holder_seeds_from_the_persisted_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        SessionHolder::open(path.clone()).establish(session()).unwrap();

        let reopened = SessionHolder::open(path);
        assert_eq!(reopened.current(), Some(session()));
        assert_eq!(reopened.token().as_deref(), Some("jwt"));
    }

    #[test]
    fn clear_erases_the_file_and_the_memory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let holder = SessionHolder::open(path.clone());
        holder.establish(session()).unwrap();

        holder.clear().unwrap();

        assert!(holder.current().is_none());
        assert!(!path.exists());
        // Clearing while already anonymous is not an error.
        holder.clear().unwrap();
    }

    #[test]
    fn an_unreadable_file_counts_as_anonymous() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(SessionHolder::open(path).current().is_none());
    }

    #[test]
    fn a_partial_file_counts_as_anonymous() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(
            &path,
            format!(r#"{{"{KEY_TOKEN}":"jwt","{KEY_EMAIL}":"tutor@casagialla.it"}}"#),
        )
        .unwrap();
        assert!(SessionHolder::open(path).current().is_none());
    }
}

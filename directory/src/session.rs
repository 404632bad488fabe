use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("no cache directory available on this platform")]
    NoCacheDir,
    #[error("session file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed session file: {0}")]
    Json(#[from] serde_json::Error),
}

/// A logged-in admin.
#[derive(Debug, Clone)]
pub struct AdminSession {
    pub email: String,
    pub token: SecretString,
}

impl AdminSession {
    pub fn new(email: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            token: SecretString::from(token.into()),
        }
    }
}

impl PartialEq for AdminSession {
    fn eq(&self, other: &Self) -> bool {
        self.email == other.email && self.token.expose_secret() == other.token.expose_secret()
    }
}

#[derive(Serialize, Deserialize)]
struct StoredSession {
    email: String,
    token: String,
}

/// Admin token on disk, readable by the owner only.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new() -> Result<Self, SessionError> {
        let cache_dir = dirs::cache_dir()
            .ok_or(SessionError::NoCacheDir)?
            .join("directory");
        Ok(Self::at(cache_dir.join("session.json")))
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn save(&self, session: &AdminSession) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(&StoredSession {
            email: session.email.clone(),
            token: session.token.expose_secret().to_string(),
        })?;
        fs::write(&self.path, json)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(&self.path)?.permissions();
            perms.set_mode(0o600);
            fs::set_permissions(&self.path, perms)?;
        }

        Ok(())
    }

    pub fn load(&self) -> Result<Option<AdminSession>, SessionError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(&self.path)?;
        let stored: StoredSession = serde_json::from_str(&json)?;
        Ok(Some(AdminSession::new(stored.email, stored.token)))
    }

    pub fn clear(&self) -> Result<(), SessionError> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_load_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::at(dir.path().join("nested").join("session.json"));
        assert!(store.load().unwrap().is_none());

        let session = AdminSession::new("admin@example.com", "header.payload.sig");
        store.save(&session).unwrap();
        assert_eq!(store.load().unwrap(), Some(session));

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
        store.clear().unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_session_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        SessionStore::at(&path)
            .save(&AdminSession::new("admin@example.com", "t"))
            .unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "not json").unwrap();
        assert!(matches!(
            SessionStore::at(&path).load(),
            Err(SessionError::Json(_))
        ));
    }
}

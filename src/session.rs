//! Session token persistence.
//!
//! The auth token lives in a single plaintext file under the config
//! directory (`~/.config/tidings/token`), the terminal analog of the
//! browser client's `token` cookie. An absent or empty file means logged
//! out. The file is created with user-only permissions on Unix.

use secrecy::{ExposeSecret, SecretString};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to read token file: {0}")]
    Read(std::io::Error),
    #[error("failed to write token file: {0}")]
    Write(std::io::Error),
    #[error("failed to remove token file: {0}")]
    Remove(std::io::Error),
}

/// On-disk session store. Holds the token in memory as a [`SecretString`]
/// so it never shows up in Debug output or logs.
pub struct Session {
    path: PathBuf,
    token: Option<SecretString>,
}

impl Session {
    /// Load the session from `<config_dir>/token`. A missing file is a
    /// logged-out session, not an error.
    pub fn load(config_dir: &Path) -> Result<Self, SessionError> {
        let path = config_dir.join("token");
        let token = match std::fs::read_to_string(&path) {
            Ok(raw) => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(SecretString::from(trimmed.to_string()))
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => return Err(SessionError::Read(e)),
        };
        Ok(Self { path, token })
    }

    /// Create a session that is not backed by an existing file.
    pub fn at(config_dir: &Path) -> Self {
        Self {
            path: config_dir.join("token"),
            token: None,
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.token.is_some()
    }

    /// The raw token value for constructing the Authorization header.
    pub fn token(&self) -> Option<String> {
        self.token
            .as_ref()
            .map(|t| t.expose_secret().to_string())
    }

    /// Persist a new token, replacing any previous one.
    pub fn store(&mut self, token: &str) -> Result<(), SessionError> {
        std::fs::write(&self.path, token).map_err(SessionError::Write)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Err(e) =
                std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))
            {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Failed to set token file permissions to 0600"
                );
            }
        }

        self.token = Some(SecretString::from(token.to_string()));
        Ok(())
    }

    /// Forget the token, both in memory and on disk. Used on explicit
    /// logout and whenever the server answers 403.
    pub fn clear(&mut self) -> Result<(), SessionError> {
        self.token = None;
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SessionError::Remove(e)),
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("path", &self.path)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "tidings-session-{}-{}",
            name,
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_missing_file_is_logged_out() {
        let dir = temp_dir("missing");
        let session = Session::load(&dir).unwrap();
        assert!(!session.is_logged_in());
        assert_eq!(session.token(), None);
    }

    #[test]
    fn test_store_then_load_round_trip() {
        let dir = temp_dir("roundtrip");
        let mut session = Session::at(&dir);
        session.store("abc123").unwrap();
        assert!(session.is_logged_in());

        let reloaded = Session::load(&dir).unwrap();
        assert_eq!(reloaded.token().as_deref(), Some("abc123"));
    }

    #[test]
    fn test_clear_removes_token() {
        let dir = temp_dir("clear");
        let mut session = Session::at(&dir);
        session.store("abc123").unwrap();
        session.clear().unwrap();
        assert!(!session.is_logged_in());

        let reloaded = Session::load(&dir).unwrap();
        assert!(!reloaded.is_logged_in());

        // Clearing an already-clear session is fine.
        session.clear().unwrap();
    }

    #[test]
    fn test_whitespace_only_file_is_logged_out() {
        let dir = temp_dir("whitespace");
        std::fs::write(dir.join("token"), "  \n").unwrap();
        let session = Session::load(&dir).unwrap();
        assert!(!session.is_logged_in());
    }
}

//! Signed-in session stored at ~/.config/panchax/session.json.
//!
//! The file is written by whatever signs the user in and holds the bearer
//! token plus the user's display identity:
//!
//! ```json
//! { "token": "eyJhbGciOi...", "user": { "email": "ada@example.com", "name": "Ada" } }
//! ```
//!
//! A missing file means signed out. `PANCHAX_TOKEN` replaces the stored token.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

const MAX_FILE_SIZE: u64 = 64 * 1024;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Failed to read session file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid session file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Session file too large ({0} bytes)")]
    TooLarge(u64),
}

/// Who is signed in. Shown in the header; never sent to the server.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct UserIdentity {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
}

impl UserIdentity {
    /// Name for the header, falling back to the email address.
    pub fn display_name(&self) -> &str {
        if !self.name.trim().is_empty() {
            &self.name
        } else if !self.email.trim().is_empty() {
            &self.email
        } else {
            "signed in"
        }
    }
}

#[derive(Deserialize)]
struct SessionFile {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    user: Option<UserIdentity>,
}

/// Loaded session. `Debug` never prints the token.
#[derive(Default)]
pub struct Session {
    token: Option<SecretString>,
    user: Option<UserIdentity>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("user", &self.user)
            .finish()
    }
}

impl Session {
    pub fn new(token: Option<SecretString>, user: Option<UserIdentity>) -> Self {
        Self { token, user }
    }

    /// Reads the session file. A missing file is an empty (signed-out) session.
    pub fn load(path: &Path) -> Result<Self, SessionError> {
        let meta = match std::fs::metadata(path) {
            Ok(meta) => meta,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No session file, signed out");
                return Ok(Self::default());
            }
            Err(e) => return Err(SessionError::Io(e)),
        };
        if meta.len() > MAX_FILE_SIZE {
            return Err(SessionError::TooLarge(meta.len()));
        }

        let content = std::fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let file: SessionFile = serde_json::from_str(&content)?;

        let token = file
            .token
            .filter(|t| !t.trim().is_empty())
            .map(SecretString::from);
        tracing::debug!(
            path = %path.display(),
            has_token = token.is_some(),
            has_user = file.user.is_some(),
            "Loaded session"
        );
        Ok(Self {
            token,
            user: file.user,
        })
    }

    /// Replaces the stored token, e.g. with `PANCHAX_TOKEN`.
    pub fn with_token_override(mut self, token: Option<SecretString>) -> Self {
        if let Some(token) = token.filter(|t| !t.expose_secret().trim().is_empty()) {
            self.token = Some(token);
        }
        self
    }

    pub fn token(&self) -> Option<SecretString> {
        self.token.clone()
    }

    /// The signed-in user. A session counts as signed in once it has a token;
    /// a token without stored user details yields an unnamed identity.
    pub fn identity(&self) -> Option<UserIdentity> {
        self.token.as_ref()?;
        Some(self.user.clone().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn write_session(name: &str, content: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("panchax_session_test_{}", name));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("session.json");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_missing_file_is_signed_out() {
        let session = Session::load(Path::new("/tmp/panchax_no_such_session.json")).unwrap();
        assert!(session.identity().is_none());
        assert!(session.token().is_none());
    }

    #[test]
    fn test_full_session() {
        let path = write_session(
            "full",
            r#"{"token": "abc", "user": {"email": "ada@example.com", "name": "Ada"}}"#,
        );
        let session = Session::load(&path).unwrap();
        assert_eq!(
            session.identity(),
            Some(UserIdentity {
                email: "ada@example.com".to_string(),
                name: "Ada".to_string(),
            })
        );
        assert_eq!(session.token().unwrap().expose_secret(), "abc");
        std::fs::remove_dir_all(path.parent().unwrap()).ok();
    }

    #[test]
    fn test_user_without_token_is_signed_out() {
        let path = write_session("no_token", r#"{"user": {"email": "ada@example.com"}}"#);
        let session = Session::load(&path).unwrap();
        assert!(session.identity().is_none());
        std::fs::remove_dir_all(path.parent().unwrap()).ok();
    }

    #[test]
    fn test_env_token_overrides() {
        let session = Session::new(Some(SecretString::from("stored".to_string())), None)
            .with_token_override(Some(SecretString::from("from-env".to_string())));
        assert_eq!(session.token().unwrap().expose_secret(), "from-env");
        assert_eq!(session.identity(), Some(UserIdentity::default()));

        let session = Session::default().with_token_override(Some(SecretString::from(" ".to_string())));
        assert!(session.identity().is_none());
    }

    #[test]
    fn test_malformed_file_is_error() {
        let path = write_session("malformed", "{not json");
        assert!(matches!(Session::load(&path), Err(SessionError::Parse(_))));
        std::fs::remove_dir_all(path.parent().unwrap()).ok();
    }

    #[test]
    fn test_debug_hides_token() {
        let session = Session::new(Some(SecretString::from("hunter2".to_string())), None);
        assert!(!format!("{:?}", session).contains("hunter2"));
    }

    #[test]
    fn test_display_name_falls_back_to_email() {
        let user = UserIdentity {
            email: "ada@example.com".to_string(),
            name: String::new(),
        };
        assert_eq!(user.display_name(), "ada@example.com");
        assert_eq!(UserIdentity::default().display_name(), "signed in");
    }
}

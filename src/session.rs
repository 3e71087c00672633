//! Signed-in session, persisted next to the settings file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::payloads::{AuthResponse, User};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Session {
    pub token: String,
    pub user: User,
    #[serde(default)]
    pub demo: bool,
}

impl Session {
    /// Builds a session from a login or register reply, filling gaps the
    /// backend left empty.
    pub fn from_auth(resp: AuthResponse, email: &str, name: Option<&str>) -> Self {
        let user = resp.user.unwrap_or_else(|| User {
            name: name
                .map(str::to_string)
                .unwrap_or_else(|| local_part(email).to_string()),
            email: email.to_string(),
            role: None,
        });
        let token = resp
            .token
            .or(resp.access_token)
            .unwrap_or_else(|| "demo-token".to_string());
        Self {
            token,
            user,
            demo: false,
        }
    }

    /// Offline session used when the auth endpoints cannot be reached.
    pub fn demo(email: &str, name: Option<&str>) -> Self {
        let role = if email.contains("teacher") {
            "teacher"
        } else {
            "student"
        };
        Self {
            token: format!("demo-token-{}", chrono::Utc::now().timestamp_millis()),
            user: User {
                name: name
                    .map(str::to_string)
                    .unwrap_or_else(|| local_part(email).to_string()),
                email: email.to_string(),
                role: Some(role.to_string()),
            },
            demo: true,
        }
    }

    pub fn demo_teacher() -> Self {
        Self {
            token: "demo-token-123".to_string(),
            user: User {
                name: "Dr. Priya Sharma".to_string(),
                email: "priya@mentorai.edu".to_string(),
                role: Some("teacher".to_string()),
            },
            demo: true,
        }
    }
}

fn local_part(email: &str) -> &str {
    email.split('@').next().unwrap_or(email)
}

#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(base: &Path) -> Self {
        Self {
            path: base.join("config").join("session.json"),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `Ok(None)` when signed out. A corrupt file counts as signed out.
    pub fn load(&self) -> io::Result<Option<Session>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&self.path)?;
        match serde_json::from_str::<Session>(&contents) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                log::warn!(target: "session", "ignoring unreadable session file: {e}");
                Ok(None)
            }
        }
    }

    pub fn save(&self, session: &Session) -> io::Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(session)?;
        fs::write(&self.path, json)
    }

    pub fn clear(&self) -> io::Result<()> {
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_means_signed_out() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path());
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn save_load_clear_lifecycle() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path());
        let session = Session::demo_teacher();
        store.save(&session).unwrap();
        assert_eq!(store.load().unwrap(), Some(session));
        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
        store.clear().unwrap();
    }

    #[test]
    fn corrupt_file_loads_as_signed_out() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path());
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "{not json").unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn auth_reply_prefers_token_then_access_token() {
        let resp: AuthResponse =
            serde_json::from_str(r#"{"access_token":"abc"}"#).unwrap();
        let session = Session::from_auth(resp, "meera@school.edu", None);
        assert_eq!(session.token, "abc");
        assert_eq!(session.user.name, "meera");
        assert!(!session.demo);

        let resp: AuthResponse = serde_json::from_str(
            r#"{"token":"t1","access_token":"t2","user":{"name":"Meera Joshi","email":"m@x"}}"#,
        )
        .unwrap();
        let session = Session::from_auth(resp, "ignored@x", None);
        assert_eq!(session.token, "t1");
        assert_eq!(session.user.name, "Meera Joshi");
    }

    #[test]
    fn demo_session_infers_role_from_email() {
        let t = Session::demo("head.teacher@school.edu", None);
        assert_eq!(t.user.role.as_deref(), Some("teacher"));
        assert_eq!(t.user.name, "head.teacher");
        assert!(t.token.starts_with("demo-token-"));

        let s = Session::demo("kid@school.edu", Some("Kid"));
        assert_eq!(s.user.role.as_deref(), Some("student"));
        assert_eq!(s.user.name, "Kid");
    }
}

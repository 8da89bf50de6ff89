//! Session token lifecycle
//!
//! The token is opaque: presence means "logged in", nothing is checked
//! locally. Every read and write goes through a [`SessionStore`] so there is
//! exactly one place that touches persisted state.

use gymdesk_core::{Error, Result, config::SessionConfig};
use parking_lot::Mutex;
use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// An authenticated session, passed explicitly to the API client
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    token: String,
}

impl Session {
    /// Wrap a bearer token
    ///
    /// # Errors
    ///
    /// Returns [`Error::Session`] if the token is blank.
    pub fn new(token: impl Into<String>) -> Result<Self> {
        let token = token.into();
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(Error::session("token must not be empty"));
        }
        Ok(Self {
            token: trimmed.to_string(),
        })
    }

    /// The bearer token
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session").field("token", &"<redacted>").finish()
    }
}

/// Persistent storage for the session token
pub trait SessionStore: Send + Sync {
    /// Read the stored session, `None` when nobody is logged in
    ///
    /// # Errors
    ///
    /// Returns an error if the storage exists but cannot be read.
    fn load(&self) -> Result<Option<Session>>;

    /// Persist a session, replacing any previous one
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be written.
    fn save(&self, session: &Session) -> Result<()>;

    /// Forget the stored session
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be removed.
    fn clear(&self) -> Result<()>;
}

/// Token kept in a single file named after the storage key
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    /// Store the token at `path`
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store the token at the configured directory and key
    #[must_use]
    pub fn from_config(config: &SessionConfig) -> Self {
        Self::new(config.token_path())
    }

    /// Location of the token file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<Session>> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(None),
            Ok(contents) => Session::new(contents).map(Some),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::session(format!(
                "cannot read {}: {e}",
                self.path.display()
            ))),
        }
    }

    fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, session.token())?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))?;
        }

        debug!(path = %self.path.display(), "session saved");
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "session cleared");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Process-local store, for tests and embedding
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    session: Mutex<Option<Session>>,
}

impl MemorySessionStore {
    /// Empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that starts out logged in
    #[must_use]
    pub fn with_session(session: Session) -> Self {
        Self {
            session: Mutex::new(Some(session)),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<Session>> {
        Ok(self.session.lock().clone())
    }

    fn save(&self, session: &Session) -> Result<()> {
        *self.session.lock() = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.session.lock() = None;
        Ok(())
    }
}

impl<T: SessionStore + ?Sized> SessionStore for std::sync::Arc<T> {
    fn load(&self) -> Result<Option<Session>> {
        (**self).load()
    }

    fn save(&self, session: &Session) -> Result<()> {
        (**self).save(session)
    }

    fn clear(&self) -> Result<()> {
        (**self).clear()
    }
}

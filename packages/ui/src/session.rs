//! Durable storage for the logged-in [`Session`].
//!
//! On native targets the session lives in `<data_dir>/bloglist/loggedBlogappUser.json`,
//! following the same `dirs::data_dir()` layout the rest of the workspace uses.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use store::Session;

use crate::UiError;

/// Key the session is stored under.
pub const SESSION_KEY: &str = "loggedBlogappUser";

pub trait SessionStore: Send + Sync {
    /// The stored session, or `None` if nobody is logged in.
    fn load(&self) -> Result<Option<Session>, UiError>;
    fn save(&self, session: &Session) -> Result<(), UiError>;
    /// Remove the stored session. Clearing an empty store is not an error.
    fn clear(&self) -> Result<(), UiError>;
}

/// JSON file under a directory.
#[derive(Clone, Debug)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{SESSION_KEY}.json")),
        }
    }

    /// Store in the platform data directory (`~/.local/share/bloglist` on Linux).
    pub fn in_data_dir() -> Self {
        let dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("bloglist");
        Self::new(dir)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<Session>, UiError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(serde_json::from_str(&contents)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, session: &Session) -> Result<(), UiError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string(session)?)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), UiError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-process store; clones share the slot.
#[derive(Clone, Debug, Default)]
pub struct MemorySessionStore {
    slot: Arc<Mutex<Option<Session>>>,
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<Session>, UiError> {
        Ok(self
            .slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn save(&self, session: &Session) -> Result<(), UiError> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), UiError> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

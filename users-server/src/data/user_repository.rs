use std::fs;
use std::io;
use std::path::PathBuf;
#[cfg(test)]
use std::sync::Mutex;

use async_trait::async_trait;
use tracing::error;

use crate::domain::user::User;

/// The store behind the user collection. The whole collection is the unit
/// of persistence: callers load everything, mutate in memory and save
/// everything back.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// A missing backing file is an empty collection, not an error. Any
    /// other failure is logged and also degrades to an empty collection.
    async fn load(&self) -> Vec<User>;
    /// Returns false instead of erroring when the write fails.
    async fn save(&self, users: &[User]) -> bool;
}

/// Flat-file store: one pretty-printed JSON array, rewritten wholesale on
/// every mutation. Writes go through a sibling temp file and a rename, so
/// a concurrent reader sees either the old or the new content, never a
/// partial file.
#[derive(Clone)]
pub struct JsonFileUserRepository {
    path: PathBuf,
}

impl JsonFileUserRepository {
    pub fn new(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        Ok(Self { path })
    }
}

#[async_trait]
impl UserRepository for JsonFileUserRepository {
    async fn load(&self) -> Vec<User> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                error!(path = %self.path.display(), "failed to read user collection: {e}");
                return Vec::new();
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(users) => users,
            Err(e) => {
                error!(path = %self.path.display(), "failed to parse user collection: {e}");
                Vec::new()
            }
        }
    }

    async fn save(&self, users: &[User]) -> bool {
        let json = match serde_json::to_vec_pretty(users) {
            Ok(json) => json,
            Err(e) => {
                error!("failed to serialize user collection: {e}");
                return false;
            }
        };

        let tmp = self.path.with_extension("tmp");
        if let Err(e) = fs::write(&tmp, &json) {
            error!(path = %tmp.display(), "failed to write user collection: {e}");
            return false;
        }
        if let Err(e) = fs::rename(&tmp, &self.path) {
            error!(path = %self.path.display(), "failed to replace user collection: {e}");
            return false;
        }
        true
    }
}

/// Filesystem-free store backing the service-level tests.
#[cfg(test)]
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
}

#[cfg(test)]
#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn load(&self) -> Vec<User> {
        self.users.lock().expect("store lock poisoned").clone()
    }

    async fn save(&self, users: &[User]) -> bool {
        *self.users.lock().expect("store lock poisoned") = users.to_vec();
        true
    }
}

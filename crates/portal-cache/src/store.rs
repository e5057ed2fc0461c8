//! Session store trait.

use std::sync::Arc;

use portal_core::PortalConfig;

use crate::error::CacheResult;
use crate::file::FileSessionStore;
use crate::memory::MemorySessionStore;

/// Durable string key-value store backing the session.
///
/// Implementations must be thread-safe. Writes are last-writer-wins; there is
/// no transactional grouping of keys.
pub trait SessionStore: Send + Sync {
    /// Gets a value.
    ///
    /// Returns `None` if the key doesn't exist.
    fn get(&self, key: &str) -> CacheResult<Option<String>>;

    /// Sets a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> CacheResult<()>;

    /// Removes a value.
    ///
    /// Returns `Ok(())` even if the key doesn't exist.
    fn remove(&self, key: &str) -> CacheResult<()>;

    /// Removes every key (end of the browsing session).
    fn clear(&self) -> CacheResult<()>;
}

/// Opens the session store selected by the configuration.
///
/// A configured `session_file` yields a [`FileSessionStore`]; otherwise the
/// cache lives in memory.
///
/// # Errors
///
/// Returns an error if the session file exists but cannot be read.
pub fn open_store(config: &PortalConfig) -> CacheResult<Arc<dyn SessionStore>> {
    match &config.session_file {
        Some(path) => Ok(Arc::new(FileSessionStore::open(path)?)),
        None => Ok(Arc::new(MemorySessionStore::new())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_without_session_file() {
        let store = open_store(&PortalConfig::default()).unwrap();
        store.set("token", "abc").unwrap();
        assert_eq!(store.get("token").unwrap().as_deref(), Some("abc"));
    }

    #[test]
    fn file_store_with_session_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = PortalConfig {
            session_file: Some(dir.path().join("session.json")),
            ..PortalConfig::default()
        };

        open_store(&config).unwrap().set("role", "admin").unwrap();

        let reopened = open_store(&config).unwrap();
        assert_eq!(reopened.get("role").unwrap().as_deref(), Some("admin"));
    }
}

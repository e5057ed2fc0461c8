//! # portal-cache
//!
//! Session cache abstraction for the portal identity client.
//!
//! The session cache is a string-keyed, string-valued store that survives
//! reloads within a browsing session and is cleared when that session ends.
//!
//! ## Stores
//!
//! - [`SessionStore`] - the get / set / remove interface the session manager needs
//! - [`MemorySessionStore`] - process-local store
//! - [`FileSessionStore`] - JSON file store that survives process restarts
//!
//! ## Example
//!
//! ```ignore
//! use portal_cache::{MemorySessionStore, SessionStore};
//!
//! let store = MemorySessionStore::new();
//! store.set("role", "user")?;
//! assert_eq!(store.get("role")?.as_deref(), Some("user"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod file;
pub mod memory;
pub mod store;

pub use error::{CacheError, CacheResult};
pub use file::FileSessionStore;
pub use memory::MemorySessionStore;
pub use store::{open_store, SessionStore};

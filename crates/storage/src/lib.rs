//! Persistence for the hunter application.
//!
//! Hunter data lives in a flat key-value namespace scoped to an anonymous
//! per-installation user:
//!
//! - [`KeyValueStore`]: the storage seam, with [`FileStore`] (JSON files in
//!   the data directory) and [`MemoryStore`] implementations
//! - [`identity`]: minting and caching the anonymous [`UserId`]
//! - [`ProfileStore`]: loading a [`ProgressionEngine`](hunter_protocol::ProgressionEngine)
//!   from the user's keys and writing it back after each change
//!
//! # Examples
//!
//! ```no_run
//! use hunter_storage::{FileStore, ProfileStore};
//!
//! # fn example() -> hunter_storage::Result<()> {
//! let profile = ProfileStore::open(Box::new(FileStore::new()?))?;
//! let engine = profile.load(true)?;
//! println!("{} has {} dungeons", profile.user_id(), engine.tasks().len());
//! profile.save(&engine)?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod identity;
pub mod profile;
pub mod store;

pub use error::{Result, StorageError};
pub use identity::{USER_ID_KEY, UserId, resolve_user_id};
pub use profile::ProfileStore;
pub use store::{FileStore, KeyValueStore, MemoryStore};

//! Anonymous per-installation user identity.
//!
//! A hunter has no account. The first run mints an identifier of the form
//! `hunter-<unix millis>-<9 base36 chars>` and caches it in the store under
//! the unscoped key [`USER_ID_KEY`]; every later run reuses it. All other
//! persisted keys are prefixed with this identifier.

use std::fmt;

use chrono::Utc;
use rand::Rng;
use serde_json::Value;
use tracing::{info, instrument, warn};

use crate::error::Result;
use crate::store::KeyValueStore;

/// Unscoped key holding the installation's user identifier.
pub const USER_ID_KEY: &str = "hunter-user-id";

const SUFFIX_LEN: usize = 9;
const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// An anonymous user identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserId(String);

impl UserId {
    /// Wraps an existing identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the store key for a per-user value.
    ///
    /// # Examples
    ///
    /// ```
    /// use hunter_storage::UserId;
    ///
    /// let user = UserId::new("hunter-1700000000000-k3j9x0abc");
    /// assert_eq!(user.scoped_key("tasks"), "hunter-1700000000000-k3j9x0abc-tasks");
    /// ```
    #[must_use]
    pub fn scoped_key(&self, key: &str) -> String {
        format!("{}-{key}", self.0)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Mints a new identifier from a timestamp and a random source.
///
/// # Examples
///
/// ```
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
/// use hunter_storage::identity::generate_user_id;
///
/// let mut rng = StdRng::seed_from_u64(7);
/// let id = generate_user_id(1_700_000_000_000, &mut rng);
/// assert!(id.as_str().starts_with("hunter-1700000000000-"));
/// assert_eq!(id.as_str().len(), "hunter-1700000000000-".len() + 9);
/// ```
pub fn generate_user_id(millis: i64, rng: &mut impl Rng) -> UserId {
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| char::from(BASE36[rng.gen_range(0..BASE36.len())]))
        .collect();
    UserId(format!("hunter-{millis}-{suffix}"))
}

/// Returns the stored identifier, minting and saving one if none exists.
///
/// A stored value that is not a non-empty string is replaced.
///
/// # Errors
///
/// Returns an error if the store cannot be read or written.
#[instrument(skip(store))]
pub fn resolve_user_id(store: &dyn KeyValueStore) -> Result<UserId> {
    match store.get(USER_ID_KEY)? {
        Some(Value::String(id)) if !id.is_empty() => return Ok(UserId(id)),
        Some(other) => warn!(stored = %other, "ignoring unusable stored user id"),
        None => {}
    }

    let id = generate_user_id(Utc::now().timestamp_millis(), &mut rand::thread_rng());
    store.set(USER_ID_KEY, &Value::String(id.0.clone()))?;
    info!(user = %id, "created new hunter identity");
    Ok(id)
}

//! Loading and saving a hunter's progression.
//!
//! A profile is four values stored under user-scoped keys:
//!
//! | Key | Value |
//! |---|---|
//! | `<userId>-tasks` | array of task documents |
//! | `<userId>-playerLevel` | number |
//! | `<userId>-playerXP` | number |
//! | `<userId>-streak` | number |
//!
//! Absent keys load as defaults. A value of the wrong shape fails the load
//! with [`StorageError::Undecodable`] and is left in the store untouched.

use hunter_protocol::seed::seed_tasks;
use hunter_protocol::{PlayerProgression, ProgressionEngine, Task};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::error::{Result, StorageError};
use crate::identity::{UserId, resolve_user_id};
use crate::store::KeyValueStore;

pub const TASKS_KEY: &str = "tasks";
pub const LEVEL_KEY: &str = "playerLevel";
pub const XP_KEY: &str = "playerXP";
pub const STREAK_KEY: &str = "streak";

/// A user's view of a [`KeyValueStore`].
///
/// # Examples
///
/// ```
/// use hunter_protocol::Rank;
/// use hunter_storage::{MemoryStore, ProfileStore};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let profile = ProfileStore::open(Box::new(MemoryStore::new()))?;
///
/// let mut engine = profile.load(false)?;
/// engine.register_task("Gate", "", Rank::C, "General")?;
/// profile.save(&engine)?;
///
/// assert_eq!(profile.load(false)?.tasks().len(), 1);
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```
pub struct ProfileStore {
    store: Box<dyn KeyValueStore>,
    user: UserId,
}

impl std::fmt::Debug for ProfileStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileStore")
            .field("user", &self.user)
            .finish_non_exhaustive()
    }
}

impl ProfileStore {
    /// Opens the profile of this installation's user, minting an identity on
    /// first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the user identifier cannot be read or saved.
    pub fn open(store: Box<dyn KeyValueStore>) -> Result<Self> {
        let user = resolve_user_id(store.as_ref())?;
        Ok(Self { store, user })
    }

    /// Opens the profile of a specific user.
    #[must_use]
    pub fn with_user(store: Box<dyn KeyValueStore>, user: UserId) -> Self {
        Self { store, user }
    }

    #[must_use]
    pub fn user_id(&self) -> &UserId {
        &self.user
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    /// Returns `true` if no task list has ever been saved for this user.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn is_first_run(&self) -> Result<bool> {
        Ok(self.read(TASKS_KEY)?.is_none())
    }

    /// Loads the engine state.
    ///
    /// When no task list has been saved yet, the starter dungeons are
    /// installed if `seed_on_first_run` is set. A saved empty list stays
    /// empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or a stored value cannot
    /// be decoded.
    #[instrument(skip(self), fields(user = %self.user))]
    pub fn load(&self, seed_on_first_run: bool) -> Result<ProgressionEngine> {
        let tasks = match self.read(TASKS_KEY)? {
            Some(value) => self.decode_tasks(value)?,
            None if seed_on_first_run => {
                debug!("no saved tasks, installing starter dungeons");
                seed_tasks()
            }
            None => Vec::new(),
        };

        let player = PlayerProgression {
            level: self.read_count(LEVEL_KEY, 1)?,
            xp: self.read_count(XP_KEY, 0)?,
            streak: self.read_count(STREAK_KEY, 0)?,
        };

        debug!(tasks = tasks.len(), xp = player.xp, "profile loaded");
        Ok(ProgressionEngine::from_parts(tasks, player))
    }

    /// Writes every profile key from the engine state.
    ///
    /// # Errors
    ///
    /// Returns an error if any value cannot be serialized or written.
    #[instrument(skip(self, engine), fields(user = %self.user, tasks = engine.tasks().len()))]
    pub fn save(&self, engine: &ProgressionEngine) -> Result<()> {
        let tasks = serde_json::to_value(engine.tasks()).map_err(|source| {
            StorageError::Serialize {
                key: self.user.scoped_key(TASKS_KEY),
                source,
            }
        })?;
        let player = engine.player();

        self.write(TASKS_KEY, &tasks)?;
        self.write(LEVEL_KEY, &Value::from(player.level))?;
        self.write(XP_KEY, &Value::from(player.xp))?;
        self.write(STREAK_KEY, &Value::from(player.streak))?;
        debug!("profile saved");
        Ok(())
    }

    /// Removes every profile key. The user identity is kept.
    ///
    /// # Errors
    ///
    /// Returns an error if a stored value cannot be removed.
    #[instrument(skip(self), fields(user = %self.user))]
    pub fn clear(&self) -> Result<()> {
        for key in [TASKS_KEY, LEVEL_KEY, XP_KEY, STREAK_KEY] {
            self.store.remove(&self.user.scoped_key(key))?;
        }
        Ok(())
    }

    fn read(&self, key: &str) -> Result<Option<Value>> {
        self.store.get(&self.user.scoped_key(key))
    }

    fn write(&self, key: &str, value: &Value) -> Result<()> {
        self.store.set(&self.user.scoped_key(key), value)
    }

    fn read_count(&self, key: &str, default: u32) -> Result<u32> {
        let Some(value) = self.read(key)? else {
            return Ok(default);
        };
        decode_count(&value).ok_or_else(|| {
            warn!(key, stored = %value, "unusable stored number");
            StorageError::Undecodable {
                key: self.user.scoped_key(key),
                reason: format!("expected a non-negative number, found {value}"),
            }
        })
    }

    fn decode_tasks(&self, value: Value) -> Result<Vec<Task>> {
        serde_json::from_value(value).map_err(|e| {
            warn!(error = %e, "stored task list is unreadable");
            StorageError::Undecodable {
                key: self.user.scoped_key(TASKS_KEY),
                reason: e.to_string(),
            }
        })
    }
}

/// Reads a non-negative whole number, truncating fractional values.
fn decode_count(value: &Value) -> Option<u32> {
    if let Some(n) = value.as_u64() {
        return Some(u32::try_from(n).unwrap_or(u32::MAX));
    }
    value
        .as_f64()
        .filter(|f| f.is_finite() && *f >= 0.0)
        .map(|f| f as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{FileStore, MemoryStore};
    use hunter_protocol::Rank;
    use serde_json::json;
    use tempfile::TempDir;

    fn memory_profile() -> ProfileStore {
        ProfileStore::with_user(Box::new(MemoryStore::new()), UserId::new("hunter-1-test00000"))
    }

    #[test]
    fn empty_store_loads_defaults() {
        let profile = memory_profile();
        let engine = profile.load(false).expect("load");

        assert!(engine.tasks().is_empty());
        assert_eq!(*engine.player(), PlayerProgression::default());
        assert!(profile.is_first_run().unwrap());
    }

    #[test]
    fn first_run_installs_seed() {
        let profile = memory_profile();
        let engine = profile.load(true).expect("load");

        assert_eq!(engine.tasks().len(), 2);
        assert_eq!(engine.tasks()[0].title, "Master Advanced React Patterns");
    }

    #[test]
    fn saved_empty_list_is_not_reseeded() {
        let profile = memory_profile();
        profile.save(&ProgressionEngine::new()).expect("save");

        assert!(!profile.is_first_run().unwrap());
        assert!(profile.load(true).expect("load").tasks().is_empty());
    }

    #[test]
    fn save_writes_scoped_keys() {
        let profile = memory_profile();
        let mut engine = ProgressionEngine::new();
        let task = engine.register_task("Gate", "", Rank::B, "General").unwrap();
        engine.complete_task(task.id).unwrap();
        engine.set_streak(4);
        profile.save(&engine).expect("save");

        let store = profile.store();
        assert_eq!(store.get("hunter-1-test00000-playerXP").unwrap(), Some(json!(100)));
        assert_eq!(store.get("hunter-1-test00000-playerLevel").unwrap(), Some(json!(1)));
        assert_eq!(store.get("hunter-1-test00000-streak").unwrap(), Some(json!(4)));
        let tasks = store.get("hunter-1-test00000-tasks").unwrap().expect("tasks");
        assert_eq!(tasks[0]["title"], "Gate");
        assert_eq!(tasks[0]["completed"], true);
    }

    #[test]
    fn save_then_load_restores_engine() {
        let profile = memory_profile();
        let mut engine = ProgressionEngine::new();
        let task = engine.register_task("Gate", "desc", Rank::A, "Raid").unwrap();
        engine.add_subtask(task.id, "Scout").unwrap();
        engine.log_time(task.id, 25).unwrap();
        profile.save(&engine).expect("save");

        let loaded = profile.load(true).expect("load");
        assert_eq!(loaded.tasks(), engine.tasks());
        assert_eq!(loaded.player(), engine.player());
    }

    #[test]
    fn stale_level_is_recomputed_from_xp() {
        let profile = memory_profile();
        profile.write(XP_KEY, &json!(450)).unwrap();
        profile.write(LEVEL_KEY, &json!(9)).unwrap();

        let engine = profile.load(false).expect("load");
        assert_eq!(engine.player().level, 3);
    }

    #[test]
    fn unreadable_task_entry_fails_load_and_keeps_stored_list() {
        let profile = memory_profile();
        let mut engine = ProgressionEngine::new();
        engine.register_task("Gate", "", Rank::B, "General").unwrap();
        profile.save(&engine).unwrap();

        let mut stored = profile.read(TASKS_KEY).unwrap().expect("tasks");
        let mut bad = stored[0].clone();
        bad["rank"] = json!("z");
        stored.as_array_mut().unwrap().push(bad);
        profile.write(TASKS_KEY, &stored).unwrap();

        let err = profile.load(true).unwrap_err();
        assert!(matches!(
            err,
            StorageError::Undecodable { ref key, .. } if key == "hunter-1-test00000-tasks"
        ));
        assert_eq!(profile.read(TASKS_KEY).unwrap(), Some(stored));
    }

    #[test]
    fn task_list_of_wrong_shape_fails_load() {
        let profile = memory_profile();
        profile.write(TASKS_KEY, &json!({ "not": "a list" })).unwrap();
        assert!(matches!(
            profile.load(true),
            Err(StorageError::Undecodable { .. })
        ));
    }

    #[test]
    fn unusable_counters_fail_load() {
        let profile = memory_profile();
        profile.write(XP_KEY, &json!("lots")).unwrap();
        let err = profile.load(false).unwrap_err();
        assert_eq!(
            err.to_string(),
            "unusable value stored under 'hunter-1-test00000-playerXP': expected a non-negative number, found \"lots\""
        );

        profile.write(XP_KEY, &json!(10)).unwrap();
        profile.write(STREAK_KEY, &json!(-3)).unwrap();
        assert!(matches!(
            profile.load(false),
            Err(StorageError::Undecodable { ref key, .. }) if key == "hunter-1-test00000-streak"
        ));
    }

    #[test]
    fn fractional_numbers_are_truncated() {
        assert_eq!(decode_count(&json!(250.0)), Some(250));
        assert_eq!(decode_count(&json!(7.9)), Some(7));
        assert_eq!(decode_count(&json!(null)), None);
    }

    #[test]
    fn clear_removes_profile_but_keeps_identity() {
        let store = MemoryStore::new();
        store
            .set(crate::identity::USER_ID_KEY, &json!("hunter-1-keepme000"))
            .unwrap();
        let profile = ProfileStore::open(Box::new(store)).expect("open");
        profile.save(&ProgressionEngine::new()).unwrap();

        profile.clear().expect("clear");
        assert!(profile.is_first_run().unwrap());
        assert_eq!(
            profile.store().get(crate::identity::USER_ID_KEY).unwrap(),
            Some(json!("hunter-1-keepme000"))
        );
    }

    #[test]
    fn users_do_not_see_each_other() {
        let temp = TempDir::new().expect("temp dir");
        let open = |user: &str| {
            let store = FileStore::with_path(temp.path().to_path_buf()).expect("store");
            ProfileStore::with_user(Box::new(store), UserId::new(user))
        };

        let alice = open("hunter-1-aaaaaaaaa");
        let mut engine = ProgressionEngine::new();
        engine.register_task("Alice's gate", "", Rank::E, "General").unwrap();
        alice.save(&engine).unwrap();

        let bob = open("hunter-2-bbbbbbbbb");
        assert!(bob.load(false).unwrap().tasks().is_empty());
        assert_eq!(open("hunter-1-aaaaaaaaa").load(false).unwrap().tasks().len(), 1);
    }
}

//! One CLI invocation's view of the hunter profile.
//!
//! A [`Session`] owns the loaded engine and the profile it was read from.
//! Every mutation goes through [`Session::mutate`], which persists the new
//! state afterwards. Storage problems never abort a command: an unreadable
//! profile falls back to an in-memory one and a failed write is reported as
//! a warning.

use std::path::PathBuf;

use anyhow::{Context, anyhow, bail};
use hunter_config::Config;
use hunter_protocol::seed::seed_tasks;
use hunter_protocol::{
    PlayerProgression, ProgressionEngine, SharedEngine, SubtaskId, Task, TaskId,
};
use hunter_storage::{FileStore, KeyValueStore, ProfileStore, StorageError};
use tracing::{debug, warn};

/// Shortest id prefix accepted when addressing a task.
pub const MIN_ID_PREFIX: usize = 4;

/// Where this session's state lives.
#[derive(Debug)]
enum Backing {
    Profile {
        profile: ProfileStore,
        location: Option<PathBuf>,
    },
    Memory,
}

#[derive(Debug)]
pub struct Session {
    engine: SharedEngine,
    backing: Backing,
}

impl Session {
    /// Opens the profile in the configured data directory.
    ///
    /// Falls back to an unsaved in-memory profile with a warning when the
    /// store cannot be opened or read.
    pub fn open(config: &Config) -> Self {
        match Self::open_file_profile(config) {
            Ok(session) => session,
            Err(err) => {
                warn!(error = %format!("{err:#}"), "profile storage unavailable, progress will not be saved");
                eprintln!("warning: profile storage unavailable ({err:#}); progress will not be saved");
                Self::in_memory(config.seed_on_first_run)
            }
        }
    }

    fn open_file_profile(config: &Config) -> anyhow::Result<Self> {
        let data_dir = config.data_dir()?;
        let store = FileStore::in_data_dir(&data_dir)
            .with_context(|| format!("cannot open store in {}", data_dir.display()))?;
        let location = store.base_path().to_path_buf();
        let profile = ProfileStore::open(Box::new(store))?;
        let mut session = Self::with_profile(profile, config.seed_on_first_run)?;
        if let Backing::Profile { location: slot, .. } = &mut session.backing {
            *slot = Some(location);
        }
        Ok(session)
    }

    /// Opens a session over an existing profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the profile cannot be read.
    pub fn with_profile(profile: ProfileStore, seed_on_first_run: bool) -> anyhow::Result<Self> {
        let engine = profile.load(seed_on_first_run)?;
        debug!(user = %profile.user_id(), tasks = engine.tasks().len(), "session opened");
        Ok(Self {
            engine: SharedEngine::new(engine),
            backing: Backing::Profile {
                profile,
                location: None,
            },
        })
    }

    /// A session that is never saved.
    #[must_use]
    pub fn in_memory(seed_on_first_run: bool) -> Self {
        let engine = if seed_on_first_run {
            ProgressionEngine::from_parts(seed_tasks(), PlayerProgression::default())
        } else {
            ProgressionEngine::new()
        };
        Self {
            engine: SharedEngine::new(engine),
            backing: Backing::Memory,
        }
    }

    #[must_use]
    pub fn engine(&self) -> &SharedEngine {
        &self.engine
    }

    /// A copy of the current state, for rendering.
    #[must_use]
    pub fn snapshot(&self) -> ProgressionEngine {
        self.engine.snapshot()
    }

    #[must_use]
    pub fn is_persistent(&self) -> bool {
        matches!(self.backing, Backing::Profile { .. })
    }

    /// The profile's user id, when backed by a store.
    #[must_use]
    pub fn user_id(&self) -> Option<String> {
        match &self.backing {
            Backing::Profile { profile, .. } => Some(profile.user_id().to_string()),
            Backing::Memory => None,
        }
    }

    /// The directory holding the profile files, when backed by a file store.
    #[must_use]
    pub fn location(&self) -> Option<&std::path::Path> {
        match &self.backing {
            Backing::Profile { location, .. } => location.as_deref(),
            Backing::Memory => None,
        }
    }

    /// The underlying key-value store, when backed by one.
    #[must_use]
    pub fn store(&self) -> Option<&dyn KeyValueStore> {
        match &self.backing {
            Backing::Profile { profile, .. } => Some(profile.store()),
            Backing::Memory => None,
        }
    }

    /// Applies `f` to the engine and saves the result.
    ///
    /// The engine error, if any, is returned untouched and nothing is saved.
    /// A failed save is logged and printed but does not fail the command.
    ///
    /// # Errors
    ///
    /// Returns whatever `f` returns.
    pub fn mutate<T, E>(
        &self,
        f: impl FnOnce(&mut ProgressionEngine) -> Result<T, E>,
    ) -> Result<T, E> {
        let value = self.engine.with(f)?;
        if let Err(err) = self.save() {
            warn!(error = %err, "failed to save profile");
            eprintln!("warning: progress was not saved: {err}");
        }
        Ok(value)
    }

    /// Writes the current state to the profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the write.
    pub fn save(&self) -> Result<(), StorageError> {
        match &self.backing {
            Backing::Profile { profile, .. } => self.engine.with(|engine| profile.save(engine)),
            Backing::Memory => {
                debug!("in-memory session, nothing saved");
                Ok(())
            }
        }
    }

    /// Erases the profile and resets the engine to an empty state.
    ///
    /// # Errors
    ///
    /// Returns an error if stored values cannot be removed.
    pub fn reset(&self) -> Result<(), StorageError> {
        if let Backing::Profile { profile, .. } = &self.backing {
            profile.clear()?;
        }
        self.engine.with(|engine| *engine = ProgressionEngine::new());
        self.save()
    }

    /// Resolves a user-supplied task reference.
    ///
    /// # Errors
    ///
    /// Returns an error if nothing or more than one task matches.
    pub fn resolve_task(&self, query: &str) -> anyhow::Result<TaskId> {
        self.engine.with(|engine| resolve_task(engine.tasks(), query))
    }
}

/// Finds a task by full id, unique id prefix or case-insensitive title.
///
/// # Errors
///
/// Returns an error if no task matches or if a prefix or title is ambiguous.
pub fn resolve_task(tasks: &[Task], query: &str) -> anyhow::Result<TaskId> {
    let query = query.trim();
    if query.is_empty() {
        bail!("no dungeon given");
    }

    if let Ok(id) = query.parse::<TaskId>() {
        return tasks
            .iter()
            .find(|t| t.id == id)
            .map(|t| t.id)
            .ok_or_else(|| anyhow!("no dungeon with id {id}"));
    }

    let lowered = query.to_lowercase();

    if lowered.len() >= MIN_ID_PREFIX && lowered.chars().all(|c| c.is_ascii_hexdigit() || c == '-') {
        let by_prefix: Vec<&Task> = tasks
            .iter()
            .filter(|t| t.id.to_string().starts_with(&lowered))
            .collect();
        match by_prefix.as_slice() {
            [task] => return Ok(task.id),
            [] => {}
            many => bail!(
                "id prefix '{query}' matches {} dungeons, use a longer prefix",
                many.len()
            ),
        }
    }

    let by_title: Vec<&Task> = tasks
        .iter()
        .filter(|t| t.title.to_lowercase() == lowered)
        .collect();
    match by_title.as_slice() {
        [task] => Ok(task.id),
        [] => bail!("no dungeon matches '{query}'"),
        many => {
            let ids: Vec<String> = many.iter().map(|t| short_id(t.id)).collect();
            bail!(
                "{} dungeons are named '{query}' ({}), use an id instead",
                many.len(),
                ids.join(", ")
            )
        }
    }
}

/// Finds an objective by 1-based position or case-insensitive title.
///
/// # Errors
///
/// Returns an error if no objective matches or a title is ambiguous.
pub fn resolve_objective(task: &Task, query: &str) -> anyhow::Result<SubtaskId> {
    let query = query.trim();

    if let Ok(position) = query.parse::<usize>() {
        return position
            .checked_sub(1)
            .and_then(|index| task.subtasks.get(index))
            .map(|s| s.id)
            .ok_or_else(|| {
                anyhow!(
                    "'{}' has no objective #{position} (it has {})",
                    task.title,
                    task.subtasks.len()
                )
            });
    }

    let lowered = query.to_lowercase();
    let matches: Vec<SubtaskId> = task
        .subtasks
        .iter()
        .filter(|s| s.title.to_lowercase() == lowered)
        .map(|s| s.id)
        .collect();
    match matches.as_slice() {
        [id] => Ok(*id),
        [] => bail!("'{}' has no objective named '{query}'", task.title),
        _ => bail!("several objectives are named '{query}', use its number instead"),
    }
}

/// The first block of a task id, as shown in listings.
#[must_use]
pub fn short_id(id: TaskId) -> String {
    id.to_string()[..8].to_string()
}
